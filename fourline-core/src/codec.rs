//! Training-record stream format and the board -> feature-row codec
//!
//! A training record is one move decision: the raw board before the move,
//! the piece count, the side to move and the column the engine chose. On
//! disk the record is a semicolon-separated line of
//! `42 cells ; pieces ; turn ; column`.
//!
//! For the classifiers the record expands to 86 features: two 42-entry
//! occupancy planes (mover first, opponent second) followed by the piece
//! count and a trailing pad column. Training and inference both go through
//! this codec, so the two sides can never drift apart.

use thiserror::Error;

use crate::board::{GameState, COLS, ROWS};

/// Cells per occupancy plane
pub const PLANE: usize = ROWS * COLS;
/// Width of a classifier feature row
pub const FEATURES: usize = 2 * PLANE + 2;
/// Fields per on-disk record line
pub const RECORD_FIELDS: usize = PLANE + 3;

/// Errors from parsing a stream line
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("expected {RECORD_FIELDS} fields, got {0}")]
    FieldCount(usize),
    #[error("field {0} is not an integer")]
    Malformed(usize),
    #[error("field {0} is out of range")]
    Range(usize),
}

/// One labeled move decision
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainingRecord {
    /// Row-major board flattening, values in `{-1, 0, +1}`
    pub cells: [i8; PLANE],
    /// Pieces on the board at the point of decision
    pub pieces: u8,
    /// Side that chose the move
    pub turn: i8,
    /// Chosen column, the training label
    pub column: u8,
}

impl TrainingRecord {
    /// Capture the decision `column` made in `state`
    pub fn from_state(state: &GameState, column: usize) -> Self {
        let mut cells = [0i8; PLANE];
        for (row, grid_row) in state.grid().iter().enumerate() {
            for (col, &cell) in grid_row.iter().enumerate() {
                cells[row * COLS + col] = cell;
            }
        }
        Self {
            cells,
            pieces: state.pieces(),
            turn: state.turn(),
            column: column as u8,
        }
    }

    /// Expand to the 86-wide feature row
    pub fn features(&self) -> Vec<i64> {
        encode(&self.cells, self.turn, self.pieces)
    }

    /// Serialize as a semicolon-separated stream line
    pub fn to_line(&self) -> String {
        let mut fields: Vec<String> = self.cells.iter().map(|c| c.to_string()).collect();
        fields.push(self.pieces.to_string());
        fields.push(self.turn.to_string());
        fields.push(self.column.to_string());
        fields.join(";")
    }

    /// Parse a stream line produced by [`TrainingRecord::to_line`]
    pub fn parse_line(line: &str) -> Result<Self, CodecError> {
        let fields: Vec<&str> = line.trim().split(';').collect();
        if fields.len() != RECORD_FIELDS {
            return Err(CodecError::FieldCount(fields.len()));
        }

        let int_at = |idx: usize| -> Result<i64, CodecError> {
            fields[idx].trim().parse().map_err(|_| CodecError::Malformed(idx))
        };

        let mut cells = [0i8; PLANE];
        for (idx, cell) in cells.iter_mut().enumerate() {
            let value = int_at(idx)?;
            if !matches!(value, -1 | 0 | 1) {
                return Err(CodecError::Range(idx));
            }
            *cell = value as i8;
        }

        let pieces = int_at(PLANE)?;
        if !(0..=PLANE as i64).contains(&pieces) {
            return Err(CodecError::Range(PLANE));
        }
        let turn = int_at(PLANE + 1)?;
        if !matches!(turn, -1 | 1) {
            return Err(CodecError::Range(PLANE + 1));
        }
        let column = int_at(PLANE + 2)?;
        if !(0..COLS as i64).contains(&column) {
            return Err(CodecError::Range(PLANE + 2));
        }

        Ok(Self {
            cells,
            pieces: pieces as u8,
            turn: turn as i8,
            column: column as u8,
        })
    }
}

/// Encode a position for inference, from the mover's perspective
pub fn state_features(state: &GameState) -> Vec<i64> {
    TrainingRecord::from_state(state, 0).features()
}

/// Positional attribute names for the 86 features
pub fn attribute_names() -> Vec<String> {
    let mut names = Vec::with_capacity(FEATURES);
    for row in 0..ROWS {
        for col in 0..COLS {
            names.push(format!("own_r{row}c{col}"));
        }
    }
    for row in 0..ROWS {
        for col in 0..COLS {
            names.push(format!("opp_r{row}c{col}"));
        }
    }
    names.push("pieces".to_string());
    names.push("pad".to_string());
    names
}

/// Two occupancy planes (mover first), piece count, pad column
fn encode(cells: &[i8; PLANE], turn: i8, pieces: u8) -> Vec<i64> {
    let mut features = Vec::with_capacity(FEATURES);
    features.extend(cells.iter().map(|&c| i64::from(c == turn)));
    features.extend(cells.iter().map(|&c| i64::from(c == -turn)));
    features.push(i64::from(pieces));
    features.push(0);
    features
}
