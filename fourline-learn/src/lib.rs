//! FOURLINE Learn - symbolic column-selection classifiers
//!
//! This crate provides the decision-tree pipeline trained on self-play
//! data:
//! - ID3 information-gain tree induction over mixed attribute types
//! - Tree-to-decision-list conversion with reduced-error rule pruning
//! - Bootstrap-aggregated rule-set ensembles with confidence voting
//! - Dataset model, evaluation metrics and versioned model persistence

pub mod bagging;
pub mod dataset;
pub mod id3;
pub mod metrics;
pub mod model;
pub mod rule;
pub mod ruleset;
pub mod value;

// Re-exports
pub use bagging::{Bagging, ENSEMBLE_SIZE};
pub use dataset::{bootstrap_sample, rows_from_records, Attributes, Label, Row};
pub use id3::{Id3Tree, TreeNode};
pub use metrics::{evaluate, EvalMetrics};
pub use model::Model;
pub use rule::{Premise, Rule};
pub use ruleset::{RuleSet, TRAIN_FRACTION};
pub use value::{AttrKind, Op, Value};

use thiserror::Error;

/// Errors surfaced by classifier training and inference
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LearnError {
    /// Predict or importance export called before `train` completed
    #[error("model has not been trained")]
    UntrainedModel,
    /// A feature row whose width does not match the attribute schema
    #[error("expected a row of {expected} values, got {got}")]
    RowWidth { expected: usize, got: usize },
}
