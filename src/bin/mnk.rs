use anyhow::Result;
use clap::{Parser, Subcommand};

use mnk::cli::{self, PlayArgs};

#[derive(Parser)]
#[command(
    name = "mnk",
    about = "Generalized tic-tac-toe with depth- and time-bounded adversarial search",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game between any mix of human and engine players
    Play(PlayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Play(args) => cli::execute(args),
    }
}
