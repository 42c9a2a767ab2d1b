use log::LevelFilter;
use serde::Deserialize;

use crate::board::BOARD_SIZE;
use crate::error::ConfigError;

/// Pixel size of one board square. Used for clicks, hover and overlay layout.
pub const DEFAULT_CELL_SIZE: u32 = 100;
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const SQUARE_COLOR: &str = "#33cc33";
pub const GRID_COLOR: &str = "black";
pub const BLACK_PIECE_COLOR: &str = "#000";
pub const WHITE_PIECE_COLOR: &str = "#fff";
pub const OVERLAY_COLOR: &str = "black";
pub const OVERLAY_ALPHA: f64 = 0.8;
pub const OVERLAY_TEXT_COLOR: &str = "ivory";
/// Piece radius as a fraction of the cell size.
pub const PIECE_RADIUS_RATIO: f64 = 0.4;

/// Runtime settings supplied by the host page. Missing fields use defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub cell_size: u32,
    pub log_level: String,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.cell_size.checked_mul(BOARD_SIZE as u32).is_none() {
            return Err(ConfigError::CellSizeTooLarge(self.cell_size));
        }
        self.level_filter().map(|_| ())
    }

    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::UnknownLogLevel(self.log_level.clone()))
    }

    /// Side length of the square canvas. Saturates for unvalidated sizes.
    pub fn canvas_size(&self) -> u32 {
        self.cell_size.saturating_mul(BOARD_SIZE as u32)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
