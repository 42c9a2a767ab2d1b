pub mod app;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod logging;
pub mod render;
pub mod types;
pub mod wasm;

pub use app::App;
pub use board::Board;
pub use config::AppConfig;
pub use error::{ConfigError, MoveError};
pub use game::GameState;
pub use types::{Cell, PieceCounts, Player, Position, TurnOutcome, Winner};
