//! Dataset model: attribute schema, labeled rows and resampling

use rand::Rng;
use serde::{Deserialize, Serialize};

use fourline_core::{attribute_names, TrainingRecord};

use crate::value::{AttrKind, Value};

/// Class label; for board data this is the chosen column
pub type Label = i64;

/// One labeled example
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
    pub label: Label,
}

impl Row {
    pub fn new(values: Vec<Value>, label: Label) -> Self {
        Self { values, label }
    }
}

/// Named, typed attribute schema shared by every classifier over a dataset
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    names: Vec<String>,
    kinds: Vec<AttrKind>,
}

impl Attributes {
    /// Pair names with kinds; the two lists must have equal length
    pub fn new(names: Vec<String>, kinds: Vec<AttrKind>) -> Self {
        assert_eq!(names.len(), kinds.len(), "schema lists must match");
        Self { names, kinds }
    }

    /// Schema where every attribute shares one kind
    pub fn uniform(names: Vec<String>, kind: AttrKind) -> Self {
        let kinds = vec![kind; names.len()];
        Self { names, kinds }
    }

    /// The 86-wide board schema: positional names, all discrete
    pub fn board() -> Self {
        Self::uniform(attribute_names(), AttrKind::Discrete)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    pub fn kind(&self, index: usize) -> AttrKind {
        self.kinds[index]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// Reject feature rows that do not match the schema width
pub(crate) fn ensure_width(
    attributes: &Attributes,
    values: &[Value],
) -> Result<(), crate::LearnError> {
    if values.len() != attributes.len() {
        return Err(crate::LearnError::RowWidth {
            expected: attributes.len(),
            got: values.len(),
        });
    }
    Ok(())
}

/// Expand stream records into labeled feature rows
pub fn rows_from_records(records: &[TrainingRecord]) -> Vec<Row> {
    records
        .iter()
        .map(|record| {
            let values = record
                .features()
                .into_iter()
                .map(Value::Discrete)
                .collect();
            Row::new(values, Label::from(record.column))
        })
        .collect()
}

/// Same-size resample with replacement
pub fn bootstrap_sample<R: Rng>(rows: &[Row], rng: &mut R) -> Vec<Row> {
    if rows.is_empty() {
        return Vec::new();
    }
    (0..rows.len())
        .map(|_| rows[rng.gen_range(0..rows.len())].clone())
        .collect()
}
