//! Predict command - run a saved model on a board position
//!
//! The board file holds six lines of seven characters, top row first:
//! `X` for the first player, `O` for the second, `.` for empty.
//! Whitespace inside a line is ignored, so padded layouts also parse.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use fourline_core::{state_features, GameState, COLS, ROWS};
use fourline_learn::{Model, Value};

#[derive(Args)]
pub struct PredictArgs {
    /// Saved model JSON
    #[arg(long, value_name = "FILE")]
    pub model: PathBuf,

    /// Board file, six lines of seven cells
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,
}

/// Run predict command
pub fn run(args: PredictArgs) -> Result<()> {
    let model = Model::load(&args.model)?;
    let text = std::fs::read_to_string(&args.board)
        .with_context(|| format!("failed to read board {}", args.board.display()))?;
    let state = parse_board(&text)?;

    let values: Vec<Value> = state_features(&state)
        .into_iter()
        .map(Value::Discrete)
        .collect();
    let (label, confidence) = model.predict(&values)?;

    print!("{state}");
    if confidence > 0.0 {
        println!(
            "{}: column {} (confidence {:.3})",
            model.kind(),
            label,
            confidence
        );
    } else {
        println!("{}: column {} (no rule matched, default)", model.kind(), label);
    }
    Ok(())
}

/// Parse a drawn board; game invariants are checked by `from_grid`
fn parse_board(text: &str) -> Result<GameState> {
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    if lines.len() != ROWS {
        bail!("expected {ROWS} board lines, got {}", lines.len());
    }

    let mut grid = [[0i8; COLS]; ROWS];
    for (row, line) in lines.iter().enumerate() {
        let cells: Vec<char> = line.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != COLS {
            bail!("line {}: expected {COLS} cells, got {}", row + 1, cells.len());
        }
        for (col, &cell) in cells.iter().enumerate() {
            grid[row][col] = match cell {
                'X' | 'x' => 1,
                'O' | 'o' => -1,
                '.' => 0,
                other => bail!("line {}: unexpected cell '{other}'", row + 1),
            };
        }
    }
    Ok(GameState::from_grid(grid)?)
}
