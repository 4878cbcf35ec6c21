//! Board model: grid state, move validation, line enumeration and win
//! detection

pub mod lines;
pub mod state;

pub use lines::Line;
pub use state::{Board, Cell, Move, Player, TerminalStatus};
