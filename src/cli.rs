//! Command-line front end: argument parsing, terminal input and output
//! formatting for a single game

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use clap::Parser;

use crate::{
    board::{Board, Move, Player},
    eval::Heuristic,
    game::{GameConfig, GameController, MoveSource, PlayerKind, PlayerSpec},
    search::{SearchAlgorithm, SearchReport},
    stats::{GameOutcome, GameResult},
};

#[derive(Parser, Debug)]
#[command(about = "Play one game between any mix of human and engine players")]
pub struct PlayArgs {
    /// Board size (n for an n x n grid)
    #[arg(long, short = 'n', default_value_t = 3)]
    pub size: usize,

    /// Consecutive symbols needed to win
    #[arg(long, short = 's', default_value_t = 3)]
    pub win_length: usize,

    /// Blocked cell as `row,col` (repeatable)
    #[arg(long = "block", value_name = "ROW,COL")]
    pub blocks: Vec<String>,

    /// Search algorithm: `minimax` or `alphabeta`
    #[arg(long, short = 'a', default_value = "alphabeta")]
    pub algorithm: String,

    /// Who controls X: `human` or `ai`
    #[arg(long, default_value = "ai")]
    pub x_player: String,

    /// Who controls O: `human` or `ai`
    #[arg(long, default_value = "ai")]
    pub o_player: String,

    /// Search depth for X (0 = fringe heuristic only)
    #[arg(long, default_value_t = 4)]
    pub x_depth: u32,

    /// Search depth for O (0 = fringe heuristic only)
    #[arg(long, default_value_t = 4)]
    pub o_depth: u32,

    /// Fringe heuristic for X: `line-density` or `center-proximity`
    #[arg(long, default_value = "line-density")]
    pub x_heuristic: String,

    /// Fringe heuristic for O: `line-density` or `center-proximity`
    #[arg(long, default_value = "center-proximity")]
    pub o_heuristic: String,

    /// Wall-clock budget per search, in seconds
    #[arg(long, short = 't', default_value_t = 10.0)]
    pub time_limit: f64,

    /// Skip the recommended-move search before human turns
    #[arg(long)]
    pub no_recommend: bool,

    /// Emit the final outcome as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let config = build_config(&args)?;
    let mut controller = GameController::new(config)?;
    let mut input = TerminalSource::new();

    loop {
        println!("\n{}\n", controller.board());
        if controller.is_finished() {
            break;
        }

        let side = controller.to_move();
        match controller.config().spec(side).kind {
            PlayerKind::Ai => {
                let report = controller.play_engine_turn()?;
                announce_engine_move(side, &report);
            }
            PlayerKind::Human => {
                if !args.no_recommend {
                    let report = controller.recommend();
                    print_recommendation(&report);
                }
                controller.play_human_turn(&mut input)?;
            }
        }
    }

    let outcome = controller
        .outcome()
        .context("finished game has no outcome")?;
    print_outcome(outcome);
    if args.json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    }
    Ok(())
}

fn build_config(args: &PlayArgs) -> Result<GameConfig> {
    Ok(GameConfig {
        size: args.size,
        win_length: args.win_length,
        blocked: args
            .blocks
            .iter()
            .map(|raw| parse_block(raw))
            .collect::<Result<Vec<_>>>()?,
        x: PlayerSpec {
            kind: parse_kind(&args.x_player, "--x-player")?,
            depth: args.x_depth,
            heuristic: parse_heuristic(&args.x_heuristic, "--x-heuristic")?,
        },
        o: PlayerSpec {
            kind: parse_kind(&args.o_player, "--o-player")?,
            depth: args.o_depth,
            heuristic: parse_heuristic(&args.o_heuristic, "--o-heuristic")?,
        },
        algorithm: parse_algorithm(&args.algorithm)?,
        time_limit_secs: args.time_limit,
    })
}

fn parse_kind(value: &str, flag: &str) -> Result<PlayerKind> {
    match value.to_lowercase().as_str() {
        "human" => Ok(PlayerKind::Human),
        "ai" | "engine" => Ok(PlayerKind::Ai),
        other => bail!("invalid {flag} '{other}'. Expected one of: human, ai"),
    }
}

fn parse_heuristic(value: &str, flag: &str) -> Result<Heuristic> {
    match value.to_lowercase().as_str() {
        "line-density" | "e1" => Ok(Heuristic::LineDensity),
        "center-proximity" | "e2" => Ok(Heuristic::CenterProximity),
        other => bail!("invalid {flag} '{other}'. Expected one of: line-density, center-proximity"),
    }
}

fn parse_algorithm(value: &str) -> Result<SearchAlgorithm> {
    match value.to_lowercase().as_str() {
        "minimax" => Ok(SearchAlgorithm::Minimax),
        "alphabeta" | "alpha-beta" => Ok(SearchAlgorithm::AlphaBeta),
        other => bail!("invalid --algorithm '{other}'. Expected one of: minimax, alphabeta"),
    }
}

fn parse_block(raw: &str) -> Result<(usize, usize)> {
    let (row, col) = raw
        .split_once(',')
        .with_context(|| format!("invalid --block '{raw}': expected 'row,col'"))?;
    let row = row
        .trim()
        .parse()
        .with_context(|| format!("invalid --block row in '{raw}'"))?;
    let col = col
        .trim()
        .parse()
        .with_context(|| format!("invalid --block column in '{raw}'"))?;
    Ok((row, col))
}

fn announce_engine_move(side: Player, report: &SearchReport) {
    println!("Evaluation time: {:.7}s", report.stats.elapsed.as_secs_f64());
    if let Some(mv) = report.result.best {
        println!("Player {side} under engine control plays: {mv}");
    }
}

fn print_recommendation(report: &SearchReport) {
    println!("Evaluation time: {:.7}s", report.stats.elapsed.as_secs_f64());
    if let Some(mv) = report.result.best {
        println!("Recommended move: {mv}");
    }
}

fn print_outcome(outcome: &GameOutcome) {
    match outcome.result {
        GameResult::Win(player) => println!("The winner is {player}!"),
        GameResult::Draw => println!("It's a tie!"),
    }

    println!();
    print_kv("Moves played", &outcome.moves_played.to_string());
    print_kv(
        "Heuristic calls",
        &format!(
            "{} (X: {}, O: {})",
            outcome.evals.total(),
            outcome.evals.x,
            outcome.evals.o
        ),
    );
    print_kv(
        "Search time",
        &format!("{:.3}s", outcome.search_time.as_secs_f64()),
    );
    match outcome.average_depth {
        Some(depth) => print_kv("Average depth", &format!("{depth:.2}")),
        None => print_kv("Average depth", "n/a"),
    }
    if !outcome.histogram.is_empty() {
        println!("  Evaluations by depth:");
        for (ply, count) in outcome.histogram.iter() {
            println!("    {ply:>3}: {count}");
        }
    }
}

/// Print a key-value pair
fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{key}:"), value);
}

/// Reads human moves from stdin, re-prompting until a parsable pair comes in.
///
/// Validity against the board is checked here too, so the user gets feedback
/// right away; the controller revalidates every proposal regardless.
pub struct TerminalSource {
    stdin: io::Stdin,
}

impl TerminalSource {
    pub fn new() -> Self {
        TerminalSource { stdin: io::stdin() }
    }

    fn read_coordinate(&mut self, prompt: &str) -> crate::Result<Option<usize>> {
        print!("{prompt}");
        io::stdout().flush().map_err(|source| crate::Error::Io {
            operation: "flush stdout".to_string(),
            source,
        })?;
        let mut line = String::new();
        self.stdin
            .lock()
            .read_line(&mut line)
            .map_err(|source| crate::Error::Io {
                operation: "read move from stdin".to_string(),
                source,
            })?;
        Ok(line.trim().parse().ok())
    }
}

impl Default for TerminalSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSource for TerminalSource {
    fn propose(&mut self, board: &Board) -> crate::Result<Move> {
        loop {
            println!("Player {}, enter your move:", board.to_move());
            let Some(row) = self.read_coordinate("enter the row number: ")? else {
                println!("That is not a number! Try again.");
                continue;
            };
            let Some(col) = self.read_coordinate("enter the column number: ")? else {
                println!("That is not a number! Try again.");
                continue;
            };
            let mv = Move::new(row, col);
            if board.is_valid(mv) {
                return Ok(mv);
            }
            println!("The move is not valid! Try again.");
        }
    }
}
