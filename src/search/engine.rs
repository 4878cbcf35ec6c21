//! Recursive minimax and alpha-beta search over a shared board
//!
//! The search owns a mutable borrow of the board for the duration of one
//! call tree and backtracks through the strict apply/undo pair, so the board
//! leaves every call bit-identical to how it entered. O maximizes and X
//! minimizes. All statistics are accumulated in a per-call [`SearchStats`]
//! and returned to the caller; nothing survives between calls.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::deadline::Deadline;
use crate::{
    board::{Board, Move, Player, TerminalStatus},
    eval::{Heuristic, O_WIN_SCORE, X_WIN_SCORE},
    stats::SearchStats,
};

/// Which search algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchAlgorithm {
    Minimax,
    AlphaBeta,
}

impl SearchAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            SearchAlgorithm::Minimax => "minimax",
            SearchAlgorithm::AlphaBeta => "alphabeta",
        }
    }
}

/// Parameters for one top-level search call.
#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    pub algorithm: SearchAlgorithm,
    /// Remaining plies of exact search for the side to move; 0 searches only
    /// the fringe heuristic.
    pub depth: u32,
    pub time_limit: Duration,
    /// Fringe evaluator used when X is the side to move at a fringe node.
    pub x_heuristic: Heuristic,
    /// Fringe evaluator used when O is the side to move at a fringe node.
    pub o_heuristic: Heuristic,
}

/// Score and chosen move of one search call.
///
/// `best` is None when the position was already terminal (or the hard time
/// cutoff fired at the root).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub score: f64,
    pub best: Option<Move>,
}

/// A [`SearchResult`] together with the statistics of the call that
/// produced it.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub result: SearchResult,
    pub stats: SearchStats,
}

/// Search `board` for the best move of `to_move`.
///
/// Legal on an already-terminal board: returns the terminal sentinel with no
/// move. Never fails; the time limit only bends the search toward the fringe
/// heuristic or, under alpha-beta's hard cutoff, toward a forced worst-case
/// value.
pub fn search(board: &mut Board, to_move: Player, params: &SearchParams) -> SearchReport {
    let deadline = Deadline::start(params.time_limit);
    let mut searcher = Searcher {
        board,
        x_heuristic: params.x_heuristic,
        o_heuristic: params.o_heuristic,
        deadline,
        stats: SearchStats::default(),
    };

    let maximizing = to_move == Player::O;
    let (score, best) = match params.algorithm {
        SearchAlgorithm::Minimax => searcher.minimax(maximizing, params.depth, 1),
        SearchAlgorithm::AlphaBeta => searcher.alphabeta(
            f64::NEG_INFINITY,
            f64::INFINITY,
            maximizing,
            params.depth,
            1,
        ),
    };

    let mut stats = searcher.stats;
    stats.elapsed = deadline.elapsed();
    SearchReport {
        result: SearchResult { score, best },
        stats,
    }
}

struct Searcher<'a> {
    board: &'a mut Board,
    x_heuristic: Heuristic,
    o_heuristic: Heuristic,
    deadline: Deadline,
    stats: SearchStats,
}

impl Searcher<'_> {
    /// Sentinel for a position that is already decided, if any.
    fn terminal_score(&self) -> Option<f64> {
        match self.board.terminal_status() {
            TerminalStatus::XWins => Some(X_WIN_SCORE),
            TerminalStatus::OWins => Some(O_WIN_SCORE),
            TerminalStatus::Draw => Some(0.0),
            TerminalStatus::Ongoing => None,
        }
    }

    /// One-ply heuristic lookahead over every legal move.
    ///
    /// This is not a static evaluation of the current position: each legal
    /// move is applied, scored with the mover's evaluator and undone, and
    /// the extremal score wins. Strict comparisons keep the first move found
    /// in row-major order on ties.
    fn fringe(&mut self, maximizing: bool, ply: usize) -> (f64, Option<Move>) {
        let mut value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best = None;
        let mover = if maximizing { Player::O } else { Player::X };

        let n = self.board.size();
        for row in 0..n {
            for col in 0..n {
                let mv = Move::new(row, col);
                if !self.board.is_valid(mv) {
                    continue;
                }
                self.board.apply(mv, mover);
                let score = if maximizing {
                    self.o_heuristic.evaluate(self.board, &mut self.stats.evals.o)
                } else {
                    self.x_heuristic.evaluate(self.board, &mut self.stats.evals.x)
                };
                self.board.undo(mv);
                if (maximizing && score > value) || (!maximizing && score < value) {
                    value = score;
                    best = Some(mv);
                }
            }
        }

        self.stats.histogram.record(ply);
        (value, best)
    }

    fn minimax(&mut self, maximizing: bool, depth: u32, ply: usize) -> (f64, Option<Move>) {
        self.stats.nodes += 1;

        if let Some(score) = self.terminal_score() {
            self.stats.histogram.record(ply);
            return (score, None);
        }
        if depth == 0 || self.deadline.soft_expired() {
            return self.fringe(maximizing, ply);
        }

        let mut value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best = None;
        let mover = if maximizing { Player::O } else { Player::X };

        let n = self.board.size();
        for row in 0..n {
            for col in 0..n {
                let mv = Move::new(row, col);
                if !self.board.is_valid(mv) {
                    continue;
                }
                self.board.apply(mv, mover);
                let (child, _) = self.minimax(!maximizing, depth - 1, ply + 1);
                self.board.undo(mv);
                if (maximizing && child > value) || (!maximizing && child < value) {
                    value = child;
                    best = Some(mv);
                }
            }
        }

        self.stats.histogram.record(ply);
        (value, best)
    }

    fn alphabeta(
        &mut self,
        mut alpha: f64,
        mut beta: f64,
        maximizing: bool,
        depth: u32,
        ply: usize,
    ) -> (f64, Option<Move>) {
        self.stats.nodes += 1;

        if let Some(score) = self.terminal_score() {
            self.stats.histogram.record(ply);
            return (score, None);
        }
        if depth == 0 || self.deadline.soft_expired() {
            if self.deadline.hard_expired() {
                // Past the limit itself: treat this branch as lost for the
                // side to move rather than returning an unevaluated score
                self.stats.histogram.record(ply);
                let forced = if maximizing {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                };
                return (forced, None);
            }
            return self.fringe(maximizing, ply);
        }

        let mut value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best = None;
        let mover = if maximizing { Player::O } else { Player::X };

        let n = self.board.size();
        for row in 0..n {
            for col in 0..n {
                let mv = Move::new(row, col);
                if !self.board.is_valid(mv) {
                    continue;
                }
                self.board.apply(mv, mover);
                let (child, _) = self.alphabeta(alpha, beta, !maximizing, depth - 1, ply + 1);
                self.board.undo(mv);
                if (maximizing && child > value) || (!maximizing && child < value) {
                    value = child;
                    best = Some(mv);
                }
                if maximizing {
                    if value >= beta {
                        self.stats.histogram.record(ply);
                        return (value, best);
                    }
                    if value > alpha {
                        alpha = value;
                    }
                } else {
                    if value <= alpha {
                        self.stats.histogram.record(ply);
                        return (value, best);
                    }
                    if value < beta {
                        beta = value;
                    }
                }
            }
        }

        self.stats.histogram.record(ply);
        (value, best)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::board::Move;

    const NO_LIMIT: Duration = Duration::from_secs(3600);

    fn params(algorithm: SearchAlgorithm, depth: u32) -> SearchParams {
        SearchParams {
            algorithm,
            depth,
            time_limit: NO_LIMIT,
            x_heuristic: Heuristic::LineDensity,
            o_heuristic: Heuristic::LineDensity,
        }
    }

    fn board_with(n: usize, s: usize, cells: &[(usize, usize, Player)]) -> Board {
        let mut board = Board::new(n, s, &[]).unwrap();
        for &(row, col, player) in cells {
            board.apply(Move::new(row, col), player);
        }
        board
    }

    #[test]
    fn test_terminal_board_returns_sentinel_without_move() {
        let mut board = board_with(
            3,
            3,
            &[(0, 0, Player::X), (0, 1, Player::X), (0, 2, Player::X)],
        );
        for algorithm in [SearchAlgorithm::Minimax, SearchAlgorithm::AlphaBeta] {
            let report = search(&mut board, Player::O, &params(algorithm, 4));
            assert_eq!(report.result.score, X_WIN_SCORE);
            assert_eq!(report.result.best, None);
            assert_eq!(report.stats.nodes, 1);
            assert_eq!(report.stats.histogram.total(), 1);
        }
    }

    #[test]
    fn test_finds_immediate_win() {
        // X to move completes the top row
        let mut board = board_with(
            3,
            3,
            &[
                (0, 0, Player::X),
                (0, 1, Player::X),
                (1, 0, Player::O),
                (1, 1, Player::O),
            ],
        );
        for algorithm in [SearchAlgorithm::Minimax, SearchAlgorithm::AlphaBeta] {
            let report = search(&mut board, Player::X, &params(algorithm, 2));
            assert_eq!(report.result.best, Some(Move::new(0, 2)));
            assert_eq!(report.result.score, X_WIN_SCORE);
        }
    }

    #[test]
    fn test_search_restores_board() {
        let mut board = board_with(3, 3, &[(0, 0, Player::X), (1, 1, Player::O)]);
        let snapshot = board.clone();
        search(&mut board, Player::X, &params(SearchAlgorithm::Minimax, 4));
        assert_eq!(board, snapshot);
        search(&mut board, Player::X, &params(SearchAlgorithm::AlphaBeta, 4));
        assert_eq!(board, snapshot);
    }

    #[test]
    fn test_depth_zero_is_fringe_only() {
        let mut board = Board::new(3, 3, &[]).unwrap();
        let report = search(&mut board, Player::X, &params(SearchAlgorithm::Minimax, 0));
        assert_eq!(report.stats.nodes, 1);
        // one heuristic call per legal move, all through X's evaluator
        assert_eq!(report.stats.evals.x, 9);
        assert_eq!(report.stats.evals.o, 0);
        assert!(report.result.best.is_some());
        assert_eq!(report.stats.histogram.total(), 1);
    }

    #[test]
    fn test_fringe_ties_keep_first_row_major_move() {
        // With line-density, every opening X move scores -4: each cell sits
        // on exactly one row, column and diagonal of either family
        let mut board = Board::new(3, 3, &[]).unwrap();
        let report = search(&mut board, Player::X, &params(SearchAlgorithm::Minimax, 0));
        assert_eq!(report.result.best, Some(Move::new(0, 0)));
        assert_eq!(report.result.score, -4.0);
    }

    #[test]
    fn test_per_side_evaluator_counters() {
        let mut board = Board::new(3, 3, &[]).unwrap();
        let report = search(&mut board, Player::O, &params(SearchAlgorithm::Minimax, 1));
        // Root is an internal node for O; every child is an X fringe
        assert_eq!(report.stats.evals.o, 0);
        assert!(report.stats.evals.x > 0);
    }

    #[test]
    fn test_hard_cutoff_is_alphabeta_only() {
        let mut board = board_with(3, 3, &[(1, 1, Player::X)]);

        // Alpha-beta past the limit forfeits the node for the side to move
        let mut p = params(SearchAlgorithm::AlphaBeta, 4);
        p.time_limit = Duration::ZERO;
        let report = search(&mut board, Player::O, &p);
        assert_eq!(report.result.score, f64::NEG_INFINITY);
        assert_eq!(report.result.best, None);

        let report = search(&mut board, Player::X, &p);
        assert_eq!(report.result.score, f64::INFINITY);

        // Minimax has only the soft cutoff: it still evaluates the fringe
        p.algorithm = SearchAlgorithm::Minimax;
        let report = search(&mut board, Player::O, &p);
        assert!(report.result.best.is_some());
        assert!(report.result.score.is_finite());
    }

    #[test]
    fn test_histogram_plies_start_at_root() {
        let mut board = Board::new(3, 3, &[]).unwrap();
        let report = search(&mut board, Player::X, &params(SearchAlgorithm::Minimax, 2));
        let plies: Vec<usize> = report.stats.histogram.iter().map(|(ply, _)| ply).collect();
        assert_eq!(plies, vec![1, 2, 3]);
        // one root return, nine internal children, 9 * 8 fringe nodes
        assert_eq!(report.stats.histogram.count_at(1), 1);
        assert_eq!(report.stats.histogram.count_at(2), 9);
        assert_eq!(report.stats.histogram.count_at(3), 72);
    }

    #[test]
    fn test_blocking_move_found() {
        // O must block X's open row at (0, 2)
        let mut board = board_with(
            3,
            3,
            &[(0, 0, Player::X), (0, 1, Player::X), (1, 1, Player::O)],
        );
        let report = search(&mut board, Player::O, &params(SearchAlgorithm::AlphaBeta, 4));
        assert_eq!(report.result.best, Some(Move::new(0, 2)));
    }
}
