use thiserror::Error;

/// Why a checked move was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("square ({x}, {y}) is off the board")]
    OutOfRange { x: usize, y: usize },
    #[error("game is already over")]
    GameOver,
    #[error("illegal move at ({x}, {y})")]
    Illegal { x: usize, y: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("cellSize must be greater than zero")]
    ZeroCellSize,
    #[error("cellSize {0} makes the canvas too large")]
    CellSizeTooLarge(u32),
    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),
}
