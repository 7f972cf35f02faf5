//! Selfplay command - generate training rows
//!
//! Plays the configured number of engine-vs-engine games and appends one
//! record per move to the output stream.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use indicatif::ProgressBar;

use fourline_core::TrainingRecord;
use fourline_mcts::MctsConfig;
use fourline_selfplay::{append_records, SelfPlayConfig, SelfPlayRecorder};

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games to record
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// MCTS iterations per move
    #[arg(long, default_value = "2000")]
    pub iterations: u32,

    /// UCB1 exploration constant
    #[arg(long, default_value_t = std::f64::consts::SQRT_2)]
    pub exploration: f64,

    /// Output stream, appended to; defaults to a timestamped file
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Log per-search diagnostics
    #[arg(long)]
    pub debug: bool,
}

/// Run selfplay command
pub fn run(args: SelfplayArgs, seed: Option<u64>) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(default_output);

    let engine = MctsConfig::default()
        .with_iterations(args.iterations)
        .with_exploration(args.exploration)
        .with_debug(args.debug);
    let mut config = SelfPlayConfig::new(args.games, engine);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    tracing::info!(
        games = args.games,
        iterations = args.iterations,
        output = %output.display(),
        "starting self-play"
    );

    let bar = ProgressBar::new(args.games as u64);
    let mut recorder = SelfPlayRecorder::new(config);
    let outcomes = recorder.record_all(|_, _| bar.inc(1));
    bar.finish_and_clear();

    let mut first_player = 0usize;
    let mut second_player = 0usize;
    let mut draws = 0usize;
    let mut records: Vec<TrainingRecord> = Vec::new();
    for outcome in &outcomes {
        match outcome.winner {
            1 => first_player += 1,
            -1 => second_player += 1,
            _ => draws += 1,
        }
        records.extend(outcome.records.iter().cloned());
    }

    let rows = append_records(&output, &records)?;

    tracing::info!(
        rows,
        first_player,
        second_player,
        draws,
        "self-play finished, rows appended to {}",
        output.display()
    );
    Ok(())
}

/// Timestamped default output name
fn default_output() -> PathBuf {
    PathBuf::from(format!(
        "selfplay-{}.csv",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_is_a_csv() {
        let name = default_output();
        let name = name.to_string_lossy();
        assert!(name.starts_with("selfplay-"));
        assert!(name.ends_with(".csv"));
    }
}
