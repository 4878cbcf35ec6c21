//! Search statistics: per-call accumulators and per-game aggregation
//!
//! Counters are threaded through each top-level search call and returned
//! with its result; the [`StatsCollector`] then merges them into a per-game
//! [`GameOutcome`]. Nothing here performs I/O and nothing is shared between
//! independent search calls.

use std::{collections::BTreeMap, time::Duration};

use serde::{Deserialize, Serialize};

use crate::board::Player;

/// Count of finalized search-node returns keyed by the ply at which they
/// occurred. The root of a search sits at ply 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthHistogram(BTreeMap<usize, u64>);

impl DepthHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, ply: usize) {
        *self.0.entry(ply).or_insert(0) += 1;
    }

    /// Key-wise sum of another histogram into this one.
    pub fn merge(&mut self, other: &DepthHistogram) {
        for (&ply, &count) in &other.0 {
            *self.0.entry(ply).or_insert(0) += count;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn count_at(&self, ply: usize) -> u64 {
        self.0.get(&ply).copied().unwrap_or(0)
    }

    /// Mean ply weighted by counts, or None for an empty histogram.
    pub fn weighted_mean(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let weighted: u64 = self.0.iter().map(|(&ply, &count)| ply as u64 * count).sum();
        Some(weighted as f64 / total as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.0.iter().map(|(&ply, &count)| (ply, count))
    }
}

/// Heuristic invocation counts, tracked separately per evaluator identity
/// since each side may use a different evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalCounts {
    /// Calls made through X's evaluator.
    pub x: u64,
    /// Calls made through O's evaluator.
    pub o: u64,
}

impl EvalCounts {
    pub fn total(&self) -> u64 {
        self.x + self.o
    }

    pub fn add(&mut self, other: EvalCounts) {
        self.x += other.x;
        self.o += other.o;
    }
}

/// Statistics of one top-level search call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes entered, including terminal and fringe nodes.
    pub nodes: u64,
    pub evals: EvalCounts,
    pub histogram: DepthHistogram,
    pub elapsed: Duration,
}

/// Winner-or-draw symbol of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Win(Player),
    Draw,
}

/// Aggregated record of one finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOutcome {
    pub result: GameResult,
    /// Moves actually played, by either side.
    pub moves_played: usize,
    pub evals: EvalCounts,
    pub histogram: DepthHistogram,
    /// Wall-clock time spent inside recorded searches.
    pub search_time: Duration,
    /// Mean of the per-move weighted-mean evaluation depths; None when no
    /// searches were recorded.
    pub average_depth: Option<f64>,
}

/// Pure aggregation of per-move search statistics into a per-game total.
#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    evals: EvalCounts,
    histogram: DepthHistogram,
    search_time: Duration,
    depth_mean_sum: f64,
    searches: usize,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one search call's statistics into the game totals.
    pub fn record(&mut self, stats: &SearchStats) {
        self.evals.add(stats.evals);
        self.histogram.merge(&stats.histogram);
        self.search_time += stats.elapsed;
        if let Some(mean) = stats.histogram.weighted_mean() {
            self.depth_mean_sum += mean;
            self.searches += 1;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Produce the finished game's outcome.
    pub fn finalize(&self, result: GameResult, moves_played: usize) -> GameOutcome {
        let average_depth = if self.searches > 0 {
            Some(self.depth_mean_sum / self.searches as f64)
        } else {
            None
        };
        GameOutcome {
            result,
            moves_played,
            evals: self.evals,
            histogram: self.histogram.clone(),
            search_time: self.search_time,
            average_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_record_and_total() {
        let mut histogram = DepthHistogram::new();
        histogram.record(1);
        histogram.record(3);
        histogram.record(3);
        assert_eq!(histogram.total(), 3);
        assert_eq!(histogram.count_at(3), 2);
        assert_eq!(histogram.count_at(2), 0);
    }

    #[test]
    fn test_histogram_merge_is_keywise() {
        let mut a = DepthHistogram::new();
        a.record(1);
        a.record(2);
        let mut b = DepthHistogram::new();
        b.record(2);
        b.record(5);
        a.merge(&b);
        assert_eq!(a.count_at(1), 1);
        assert_eq!(a.count_at(2), 2);
        assert_eq!(a.count_at(5), 1);
        assert_eq!(a.total(), 4);
    }

    #[test]
    fn test_weighted_mean() {
        let mut histogram = DepthHistogram::new();
        assert_eq!(histogram.weighted_mean(), None);
        histogram.record(2);
        histogram.record(4);
        histogram.record(4);
        let mean = histogram.weighted_mean().unwrap();
        assert!((mean - 10.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_collector_accumulates() {
        let mut first = SearchStats::default();
        first.nodes = 10;
        first.evals = EvalCounts { x: 4, o: 0 };
        first.histogram.record(1);
        first.histogram.record(2);
        first.elapsed = Duration::from_millis(30);

        let mut second = SearchStats::default();
        second.evals = EvalCounts { x: 0, o: 6 };
        second.histogram.record(2);
        second.elapsed = Duration::from_millis(20);

        let mut collector = StatsCollector::new();
        collector.record(&first);
        collector.record(&second);

        let outcome = collector.finalize(GameResult::Draw, 9);
        assert_eq!(outcome.moves_played, 9);
        assert_eq!(outcome.evals.total(), 10);
        assert_eq!(outcome.histogram.total(), 3);
        assert_eq!(outcome.search_time, Duration::from_millis(50));
        // per-move means are 1.5 and 2.0
        let average = outcome.average_depth.unwrap();
        assert!((average - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_average_depth_undefined_without_searches() {
        let collector = StatsCollector::new();
        let outcome = collector.finalize(GameResult::Win(Player::X), 0);
        assert_eq!(outcome.average_depth, None);
    }

    #[test]
    fn test_collector_clear() {
        let mut collector = StatsCollector::new();
        let mut stats = SearchStats::default();
        stats.histogram.record(1);
        collector.record(&stats);
        collector.clear();
        let outcome = collector.finalize(GameResult::Draw, 0);
        assert!(outcome.histogram.is_empty());
        assert_eq!(outcome.average_depth, None);
    }
}
