//! Play command - terminal games against the engine
//!
//! The human plays first as `X`; with `--watch` the engine takes both
//! sides instead.

use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use fourline_core::GameState;
use fourline_mcts::{
    MctsConfig, MctsEngine, EASY_ITERATIONS, HARD_ITERATIONS, MEDIUM_ITERATIONS,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    fn iterations(self) -> u32 {
        match self {
            Level::Easy => EASY_ITERATIONS,
            Level::Medium => MEDIUM_ITERATIONS,
            Level::Hard => HARD_ITERATIONS,
        }
    }
}

#[derive(Args)]
pub struct PlayArgs {
    /// Difficulty preset
    #[arg(long, value_enum, default_value_t = Level::Medium)]
    pub level: Level,

    /// Watch the engine play itself instead of taking a side
    #[arg(long)]
    pub watch: bool,

    /// Log per-search diagnostics
    #[arg(long)]
    pub debug: bool,
}

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let config = MctsConfig::default()
        .with_iterations(args.level.iterations())
        .with_debug(args.debug);
    let mut seed_counter = seed.unwrap_or_else(rand::random);

    let mut state = GameState::new();
    println!("{state}");

    while !state.is_over() {
        let column = if !args.watch && state.turn() == 1 {
            prompt_column(&state)?
        } else {
            let engine = MctsEngine::new(config.clone().with_seed(seed_counter));
            seed_counter = seed_counter.wrapping_add(1);
            let outcome = engine.search(&state).context("no move available")?;
            println!("engine plays column {}", outcome.column);
            outcome.column
        };

        state.play(column)?;
        println!("{state}");
    }

    match state.win() {
        1 if !args.watch => println!("You win!"),
        -1 if !args.watch => println!("The engine wins."),
        1 => println!("X wins."),
        -1 => println!("O wins."),
        _ => println!("Draw."),
    }
    Ok(())
}

/// Ask until the human names a playable column
fn prompt_column(state: &GameState) -> Result<usize> {
    let legal = state.legal_moves();
    loop {
        print!("your column {legal:?}: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            bail!("input closed");
        }
        match line.trim().parse::<usize>() {
            Ok(col) if legal.contains(&col) => return Ok(col),
            _ => println!("not a playable column"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_map_to_presets() {
        assert_eq!(Level::Easy.iterations(), EASY_ITERATIONS);
        assert_eq!(Level::Medium.iterations(), MEDIUM_ITERATIONS);
        assert_eq!(Level::Hard.iterations(), HARD_ITERATIONS);
        assert!(Level::Easy.iterations() < Level::Hard.iterations());
    }
}
