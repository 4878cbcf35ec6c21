//! Wall-clock budget for one top-level search call
//!
//! The budget has two named thresholds. The soft threshold sits half a
//! second before the limit and diverts the search to the fringe heuristic;
//! the hard threshold is the limit itself and forces a worst-case sentinel.
//! Both are sampled only at node entry, so a large subtree can overshoot the
//! budget; the limit is advisory, not a real-time guarantee.

use std::time::{Duration, Instant};

/// Margin before the limit at which the soft threshold triggers.
pub const SOFT_MARGIN: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Duration,
}

impl Deadline {
    /// Start the clock for one top-level search call.
    pub fn start(limit: Duration) -> Self {
        Deadline {
            started: Instant::now(),
            limit,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Elapsed time is within [`SOFT_MARGIN`] of the limit.
    pub fn soft_expired(&self) -> bool {
        self.started.elapsed() >= self.limit.saturating_sub(SOFT_MARGIN)
    }

    /// Elapsed time has reached the limit itself.
    pub fn hard_expired(&self) -> bool {
        self.started.elapsed() >= self.limit
    }
}
