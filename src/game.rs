//! Turn-taking game controller
//!
//! The controller owns the board for the lifetime of one game and drives the
//! Setup -> (ComputeMove -> ApplyMove -> CheckTerminal)* -> Finished loop.
//! Engine-controlled sides get their moves from the search; human-controlled
//! sides get them from an external [`MoveSource`], retried until valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    board::{Board, Move, Player, TerminalStatus},
    eval::Heuristic,
    search::{self, SearchAlgorithm, SearchParams, SearchReport},
    stats::{GameOutcome, GameResult, StatsCollector},
};

/// Who controls a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerKind {
    Human,
    Ai,
}

/// Per-side configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub kind: PlayerKind,
    /// Search depth; 0 means fringe heuristic only, no recursion.
    pub depth: u32,
    pub heuristic: Heuristic,
}

/// Full configuration of one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board size n for an n x n grid.
    pub size: usize,
    /// Consecutive symbols needed to win.
    pub win_length: usize,
    /// Cells blocked for the whole game.
    pub blocked: Vec<(usize, usize)>,
    pub x: PlayerSpec,
    pub o: PlayerSpec,
    pub algorithm: SearchAlgorithm,
    /// Wall-clock budget per search, in seconds.
    pub time_limit_secs: f64,
}

impl GameConfig {
    /// Check the parts the board construction cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.time_limit_secs.is_finite() || self.time_limit_secs <= 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "time limit must be a positive number of seconds, got {}",
                    self.time_limit_secs
                ),
            });
        }
        Ok(())
    }

    pub fn spec(&self, player: Player) -> &PlayerSpec {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }

    fn time_limit(&self) -> Duration {
        Duration::from_secs_f64(self.time_limit_secs)
    }

    fn search_params(&self, side: Player) -> SearchParams {
        SearchParams {
            algorithm: self.algorithm,
            depth: self.spec(side).depth,
            time_limit: self.time_limit(),
            x_heuristic: self.x.heuristic,
            o_heuristic: self.o.heuristic,
        }
    }
}

/// External provider of moves for a human-controlled side.
///
/// Implementations may propose invalid moves; the controller validates every
/// proposal against the board and asks again until one passes, so bad input
/// never crashes a game.
pub trait MoveSource {
    fn propose(&mut self, board: &Board) -> Result<Move>;
}

/// Turn-taking state machine for one game.
pub struct GameController {
    config: GameConfig,
    board: Board,
    collector: StatsCollector,
    moves_played: usize,
    outcome: Option<GameOutcome>,
}

impl GameController {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        let board = Board::new(config.size, config.win_length, &config.blocked)?;
        Ok(GameController {
            config,
            board,
            collector: StatsCollector::new(),
            moves_played: 0,
            outcome: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Player {
        self.board.to_move()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    /// Search the current position for the side to move without applying
    /// anything or touching the game statistics.
    pub fn recommend(&mut self) -> SearchReport {
        let side = self.board.to_move();
        let params = self.config.search_params(side);
        search::search(&mut self.board, side, &params)
    }

    /// Run one engine turn: search, apply the chosen move, record its
    /// statistics and check for the end of the game.
    pub fn play_engine_turn(&mut self) -> Result<SearchReport> {
        if self.outcome.is_some() {
            return Err(Error::GameOver);
        }
        let report = self.recommend();
        // The hard time cutoff can surface at the root with no move chosen;
        // the game must still advance, so take the first legal cell
        let mv = match report.result.best {
            Some(mv) => mv,
            None => self.board.empty_positions().next().ok_or(Error::GameOver)?,
        };
        self.collector.record(&report.stats);
        self.advance(mv);
        Ok(report)
    }

    /// Apply an externally supplied move for a human-controlled side.
    ///
    /// The board is left untouched when the move is invalid.
    pub fn play_human_move(&mut self, mv: Move) -> Result<TerminalStatus> {
        if self.outcome.is_some() {
            return Err(Error::GameOver);
        }
        self.board.validate_move(mv)?;
        Ok(self.advance(mv))
    }

    /// Pull proposals from `source` until one is valid, then play it.
    pub fn play_human_turn(&mut self, source: &mut dyn MoveSource) -> Result<(Move, TerminalStatus)> {
        if self.outcome.is_some() {
            return Err(Error::GameOver);
        }
        let mv = loop {
            let candidate = source.propose(&self.board)?;
            if self.board.is_valid(candidate) {
                break candidate;
            }
        };
        let status = self.advance(mv);
        Ok((mv, status))
    }

    /// Drive a full engine-vs-engine game to completion.
    pub fn run_auto(&mut self) -> Result<GameOutcome> {
        loop {
            if let Some(outcome) = &self.outcome {
                return Ok(outcome.clone());
            }
            let side = self.board.to_move();
            if self.config.spec(side).kind != PlayerKind::Ai {
                return Err(Error::NotAutomated {
                    player: side.to_char(),
                });
            }
            self.play_engine_turn()?;
        }
    }

    /// Start a fresh game with the same configuration.
    pub fn reset(&mut self) -> Result<()> {
        self.board = Board::new(self.config.size, self.config.win_length, &self.config.blocked)?;
        self.collector.clear();
        self.moves_played = 0;
        self.outcome = None;
        Ok(())
    }

    /// ApplyMove and CheckTerminal: place the symbol, hand the turn over and
    /// finalize the outcome once the board reports a decided game.
    fn advance(&mut self, mv: Move) -> TerminalStatus {
        let mover = self.board.to_move();
        self.board.apply(mv, mover);
        self.board.switch_player();
        self.moves_played += 1;

        let status = self.board.terminal_status();
        let result = match status {
            TerminalStatus::XWins => Some(GameResult::Win(Player::X)),
            TerminalStatus::OWins => Some(GameResult::Win(Player::O)),
            TerminalStatus::Draw => Some(GameResult::Draw),
            TerminalStatus::Ongoing => None,
        };
        if let Some(result) = result {
            self.outcome = Some(self.collector.finalize(result, self.moves_played));
        }
        status
    }
}
