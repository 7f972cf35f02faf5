//! Ordered conjunction rules with Laplace-smoothed accuracy

use serde::{Deserialize, Serialize};

use crate::dataset::{Label, Row};
use crate::value::{Op, Value};

/// One conjunct of a rule: `attribute op value`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Premise {
    pub attribute: usize,
    pub op: Op,
    pub value: Value,
}

impl Premise {
    pub fn new(attribute: usize, op: Op, value: Value) -> Self {
        Self { attribute, op, value }
    }

    fn holds(&self, values: &[Value]) -> bool {
        values
            .get(self.attribute)
            .is_some_and(|&v| self.op.holds(v, self.value))
    }
}

/// An ordered conjunction of premises implying a class label.
///
/// Premise order matters: pruning removes conjuncts last-in-first-out,
/// so later premises are the most specific ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub premises: Vec<Premise>,
    pub conclusion: Label,
    cached_accuracy: Option<f64>,
}

impl Rule {
    pub fn new(premises: Vec<Premise>, conclusion: Label) -> Self {
        Self {
            premises,
            conclusion,
            cached_accuracy: None,
        }
    }

    /// A rule with no premises matches every row
    pub fn matches(&self, values: &[Value]) -> bool {
        self.premises.iter().all(|p| p.holds(values))
    }

    /// The conclusion when every premise holds, None as the no-match marker
    pub fn predict(&self, values: &[Value]) -> Option<Label> {
        self.matches(values).then_some(self.conclusion)
    }

    /// Laplace-smoothed accuracy on `rows`: `(correct + 1) / (matched + 2)`.
    ///
    /// The smoothing keeps the estimate inside (0, 1) even when the rule
    /// fires on nothing, and pulls low-coverage rules toward 1/2.
    pub fn accuracy_on(&self, rows: &[Row]) -> f64 {
        let mut matched = 0usize;
        let mut correct = 0usize;
        for row in rows {
            if self.matches(&row.values) {
                matched += 1;
                if row.label == self.conclusion {
                    correct += 1;
                }
            }
        }
        (correct + 1) as f64 / (matched + 2) as f64
    }

    /// Recompute the accuracy on `rows` and cache it
    pub fn cache_accuracy(&mut self, rows: &[Row]) -> f64 {
        let accuracy = self.accuracy_on(rows);
        self.cached_accuracy = Some(accuracy);
        accuracy
    }

    /// The most recently cached accuracy
    pub fn cached_accuracy(&self) -> Option<f64> {
        self.cached_accuracy
    }
}
