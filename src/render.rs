use serde::Serialize;

use crate::board::BOARD_SIZE;
use crate::config::{
    BLACK_PIECE_COLOR, GRID_COLOR, OVERLAY_ALPHA, OVERLAY_COLOR, OVERLAY_TEXT_COLOR,
    PIECE_RADIUS_RATIO, SQUARE_COLOR, WHITE_PIECE_COLOR,
};
use crate::game::GameState;
use crate::types::{Player, Winner};

/// Canvas-like drawing primitives.
pub trait RenderSurface {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str);
    fn set_alpha(&mut self, alpha: f64);
}

/// One recorded primitive, serialized for the JS host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawCommand {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    FillCircle {
        cx: f64,
        cy: f64,
        radius: f64,
        color: String,
    },
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: String,
        color: String,
    },
    SetAlpha {
        alpha: f64,
    },
}

/// Surface that records primitives instead of painting them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl RenderSurface for DrawList {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.commands.push(DrawCommand::StrokeRect {
            x,
            y,
            width,
            height,
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: &str) {
        self.commands.push(DrawCommand::FillCircle {
            cx,
            cy,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: &str) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            font: font.to_string(),
            color: color.to_string(),
        });
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::SetAlpha { alpha });
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardRenderer {
    cell_size: f64,
}

impl BoardRenderer {
    pub fn new(cell_size: u32) -> Self {
        Self {
            cell_size: f64::from(cell_size),
        }
    }

    /// Paints all 64 squares and their pieces.
    pub fn render_board<S: RenderSurface>(&self, state: &GameState, surface: &mut S) {
        let size = self.cell_size;
        for y in 0..BOARD_SIZE {
            for x in 0..BOARD_SIZE {
                let (left, top) = (x as f64 * size, y as f64 * size);
                surface.fill_rect(left, top, size, size, SQUARE_COLOR);
                surface.stroke_rect(left, top, size, size, GRID_COLOR);
                if let Some(owner) = state.board().cell(x, y).owner() {
                    self.render_piece(owner, x, y, surface);
                }
            }
        }
    }

    pub fn render_piece<S: RenderSurface>(
        &self,
        player: Player,
        x: usize,
        y: usize,
        surface: &mut S,
    ) {
        let size = self.cell_size;
        let color = match player {
            Player::Black => BLACK_PIECE_COLOR,
            Player::White => WHITE_PIECE_COLOR,
        };
        surface.fill_circle(
            x as f64 * size + size / 2.0,
            y as f64 * size + size / 2.0,
            size * PIECE_RADIUS_RATIO,
            color,
        );
    }

    /// Draws the mover's piece on (x, y) if that square is legal.
    /// Returns whether a preview was drawn.
    pub fn render_preview<S: RenderSurface>(
        &self,
        state: &GameState,
        x: usize,
        y: usize,
        surface: &mut S,
    ) -> bool {
        if state.is_over() || !state.is_legal_move(x, y) {
            return false;
        }
        self.render_piece(state.turn(), x, y, surface);
        true
    }

    /// Dimmed full-board overlay with the winner, final counts and the
    /// restart prompt. Layout scales with the cell size (800px reference).
    pub fn render_game_over<S: RenderSurface>(&self, state: &GameState, surface: &mut S) {
        let scale = self.cell_size / 100.0;
        let side = self.cell_size * BOARD_SIZE as f64;
        let counts = state.piece_counts();

        surface.set_alpha(OVERLAY_ALPHA);
        surface.fill_rect(0.0, 0.0, side, side, OVERLAY_COLOR);
        surface.set_alpha(1.0);

        surface.fill_text(
            &format!("Game Over, {}", winner_text(state.determine_winner())),
            80.0 * scale,
            300.0 * scale,
            &font(60.0 * scale),
            OVERLAY_TEXT_COLOR,
        );
        surface.fill_text(
            &format!(
                "Points:  Black - {},  White - {}",
                counts.black, counts.white
            ),
            60.0 * scale,
            450.0 * scale,
            &font(50.0 * scale),
            OVERLAY_TEXT_COLOR,
        );
        surface.fill_text(
            "-Press any key for new game-",
            150.0 * scale,
            700.0 * scale,
            &font(40.0 * scale),
            OVERLAY_TEXT_COLOR,
        );
    }
}

fn winner_text(winner: Winner) -> &'static str {
    match winner {
        Winner::Black => "Black wins!",
        Winner::White => "White wins!",
        Winner::Tie => "It is a tie!",
    }
}

fn font(px: f64) -> String {
    format!("{}px sans-serif", px.round())
}
