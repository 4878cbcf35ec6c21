//! Generalized m,n,k tic-tac-toe: an n x n board with optional blocked
//! cells, won by placing `s` consecutive symbols in a row, column or
//! diagonal.
//!
//! The crate provides the board representation ([`board`]), the fringe
//! heuristics ([`eval`]), depth- and time-bounded minimax and alpha-beta
//! search ([`search`]), per-search and per-game statistics ([`stats`]) and
//! a turn-taking controller for full games ([`game`]).

pub mod board;
pub mod cli;
pub mod error;
pub mod eval;
pub mod game;
pub mod search;
pub mod stats;

pub use error::{Error, Result};
