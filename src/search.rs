//! Adversarial search: minimax and alpha-beta bounded by depth and
//! wall-clock time

pub mod deadline;
pub mod engine;

pub use deadline::{Deadline, SOFT_MARGIN};
pub use engine::{SearchAlgorithm, SearchParams, SearchReport, SearchResult, search};
