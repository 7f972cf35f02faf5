//! FOURLINE CLI - command-line interface
//!
//! Commands:
//! - selfplay: generate training rows through engine-vs-engine games
//! - train: fit a classifier on a training-row stream
//! - predict: run a saved model on a board position
//! - play: play the engine in the terminal, or watch it play itself

mod play;
mod predict;
mod selfplay;
mod train;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fourline")]
#[command(about = "Connect-Four MCTS engine and decision-tree learner")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate training rows through self-play
    Selfplay(selfplay::SelfplayArgs),
    /// Train a classifier on recorded rows
    Train(train::TrainArgs),
    /// Predict a column for a board position
    Predict(predict::PredictArgs),
    /// Play in the terminal
    Play(play::PlayArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Selfplay(args) => selfplay::run(args, cli.seed),
        Commands::Train(args) => train::run(args, cli.seed),
        Commands::Predict(args) => predict::run(args),
        Commands::Play(args) => play::run(args, cli.seed),
    }
}
