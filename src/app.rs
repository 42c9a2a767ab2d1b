use log::{debug, info, trace};

use crate::board::BOARD_SIZE;
use crate::config::AppConfig;
use crate::game::GameState;
use crate::render::{BoardRenderer, DrawCommand, DrawList};
use crate::types::{Position, TurnOutcome};

/// Presentation adapter: turns pointer and key events into rules-engine
/// calls and keeps the latest frame for the host to paint.
///
/// Every handler returns `true` when the frame changed and must be redrawn.
#[derive(Debug, Clone)]
pub struct App {
    config: AppConfig,
    renderer: BoardRenderer,
    state: GameState,
    frame: DrawList,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut app = Self {
            renderer: BoardRenderer::new(config.cell_size),
            config,
            state: GameState::new(),
            frame: DrawList::new(),
        };
        app.redraw();
        app
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn frame(&self) -> &[DrawCommand] {
        self.frame.commands()
    }

    /// Maps pixel coordinates to a square; anything off the board is `None`.
    pub fn board_position(&self, px: f64, py: f64) -> Option<Position> {
        let cell = f64::from(self.config.cell_size);
        let x = (px / cell).floor();
        let y = (py / cell).floor();
        let range = 0.0..BOARD_SIZE as f64;
        if !range.contains(&x) || !range.contains(&y) {
            return None;
        }
        Some(Position::new(x as u8, y as u8))
    }

    /// Primary button press: play the square under the pointer if legal.
    pub fn pointer_down(&mut self, px: f64, py: f64) -> bool {
        if self.state.is_over() {
            return false;
        }
        let Some(pos) = self.board_position(px, py) else {
            return false;
        };

        match self.state.play(pos.x as usize, pos.y as usize) {
            Ok(outcome) => {
                self.redraw();
                if let TurnOutcome::Passed { player } = outcome {
                    debug!("{player:?} passed; {:?} to move", self.state.turn());
                }
                true
            }
            Err(err) => {
                trace!("ignored click: {err}");
                false
            }
        }
    }

    /// Pointer movement: repaint with a preview piece on a legal hovered square.
    pub fn pointer_move(&mut self, px: f64, py: f64) -> bool {
        if self.state.is_over() {
            return false;
        }
        self.frame.clear();
        self.renderer.render_board(&self.state, &mut self.frame);
        if let Some(pos) = self.board_position(px, py) {
            self.renderer
                .render_preview(&self.state, pos.x as usize, pos.y as usize, &mut self.frame);
        }
        true
    }

    /// Any key after game over starts a fresh game.
    pub fn key_down(&mut self) -> bool {
        if !self.state.is_over() {
            return false;
        }
        info!("starting a new game");
        self.state = GameState::new();
        self.frame = DrawList::new();
        self.redraw();
        true
    }

    fn redraw(&mut self) {
        self.frame.clear();
        self.renderer.render_board(&self.state, &mut self.frame);
        if self.state.is_over() {
            self.renderer.render_game_over(&self.state, &mut self.frame);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}
