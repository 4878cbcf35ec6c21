//! Fringe heuristics for positions the search does not resolve exactly
//!
//! Two interchangeable evaluators score a board from O's perspective: more
//! positive is better for O, more negative better for X. Both are pure
//! functions of the board; the invocation counter is owned by the caller and
//! passed in explicitly, so independent searches stay independent.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Line};

/// Score of a position X has already won: the most negative representable
/// value, distinguishable from any ordinary heuristic score.
pub const X_WIN_SCORE: f64 = f64::MIN;

/// Score of a position O has already won.
pub const O_WIN_SCORE: f64 = f64::MAX;

/// Fringe evaluator, selected once per side at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Heuristic {
    /// Count symbols on single-owner lines; win runs short-circuit.
    LineDensity,
    /// Weigh symbols by their proximity to the board's center.
    CenterProximity,
}

impl Heuristic {
    pub fn name(self) -> &'static str {
        match self {
            Heuristic::LineDensity => "line-density",
            Heuristic::CenterProximity => "center-proximity",
        }
    }

    /// Score the board, incrementing the caller's invocation counter.
    pub fn evaluate(self, board: &Board, calls: &mut u64) -> f64 {
        *calls += 1;
        match self {
            Heuristic::LineDensity => line_density(board),
            Heuristic::CenterProximity => center_proximity(board),
        }
    }
}

/// Line-density score.
///
/// Lines are enumerated columns first, then rows, then diagonals of both
/// families at every offset. The first line holding a full winning run ends
/// the scan immediately (X checked before O within a line); this first-match
/// behavior is part of the evaluator's contract, not an optimization.
/// Otherwise each line owned by a single player contributes that player's
/// symbol count, signed; mixed lines contribute nothing.
fn line_density(board: &Board) -> f64 {
    let n = board.size();
    let s = board.win_length();
    let mut score: i64 = 0;

    for line in Line::columns(n).chain(Line::rows(n)).chain(Line::diagonals(n)) {
        let mut x_count: i64 = 0;
        let mut o_count: i64 = 0;
        let mut x_run = 0;
        let mut o_run = 0;
        let mut x_won = false;
        let mut o_won = false;

        for (row, col) in line.cells() {
            match board.cell(row, col) {
                Cell::X => {
                    x_count += 1;
                    x_run += 1;
                    o_run = 0;
                }
                Cell::O => {
                    o_count += 1;
                    o_run += 1;
                    x_run = 0;
                }
                Cell::Empty | Cell::Blocked => {
                    x_run = 0;
                    o_run = 0;
                }
            }
            x_won |= x_run >= s;
            o_won |= o_run >= s;
        }

        if x_won {
            return X_WIN_SCORE;
        }
        if o_won {
            return O_WIN_SCORE;
        }
        if o_count > 0 && x_count == 0 {
            score += o_count;
        } else if x_count > 0 && o_count == 0 {
            score -= x_count;
        }
    }

    score as f64
}

/// Center-proximity score.
///
/// The geometric center is (n/2, n/2) with integer division. Each X subtracts
/// `center - distance`, each O adds it, so cells near the center weigh more
/// heavily in either direction. Empty and Blocked cells contribute nothing.
fn center_proximity(board: &Board) -> f64 {
    let center = (board.size() / 2) as f64;
    let mut score = 0.0;

    for row in 0..board.size() {
        for col in 0..board.size() {
            let dr = row as f64 - center;
            let dc = col as f64 - center;
            let weight = center - (dr * dr + dc * dc).sqrt();
            match board.cell(row, col) {
                Cell::X => score -= weight,
                Cell::O => score += weight,
                Cell::Empty | Cell::Blocked => {}
            }
        }
    }

    score
}
