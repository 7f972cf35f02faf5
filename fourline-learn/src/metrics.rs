//! Evaluation metrics for multi-class predictions
//!
//! Accuracy plus support-weighted precision, recall and F1. Classes the
//! predictor never emits contribute zero precision rather than an error,
//! matching the usual zero-division convention.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::dataset::Label;

/// Aggregate scores over one labeled evaluation set
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EvalMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl EvalMetrics {
    fn zero() -> Self {
        Self {
            accuracy: 0.0,
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
        }
    }
}

/// Score `predicted` against `truth`, weighting per-class scores by the
/// true class supports
pub fn evaluate(truth: &[Label], predicted: &[Label]) -> EvalMetrics {
    assert_eq!(truth.len(), predicted.len(), "prediction count mismatch");
    if truth.is_empty() {
        return EvalMetrics::zero();
    }
    let total = truth.len() as f64;

    let mut true_positives: FxHashMap<Label, usize> = FxHashMap::default();
    let mut predicted_counts: FxHashMap<Label, usize> = FxHashMap::default();
    let mut support: FxHashMap<Label, usize> = FxHashMap::default();

    let mut correct = 0usize;
    for (&actual, &guess) in truth.iter().zip(predicted) {
        *support.entry(actual).or_insert(0) += 1;
        *predicted_counts.entry(guess).or_insert(0) += 1;
        if actual == guess {
            *true_positives.entry(actual).or_insert(0) += 1;
            correct += 1;
        }
    }

    let mut precision = 0.0;
    let mut recall = 0.0;
    let mut f1 = 0.0;
    for (&class, &class_support) in &support {
        let weight = class_support as f64 / total;
        let tp = *true_positives.get(&class).unwrap_or(&0) as f64;
        let emitted = *predicted_counts.get(&class).unwrap_or(&0) as f64;

        let class_precision = if emitted > 0.0 { tp / emitted } else { 0.0 };
        let class_recall = tp / class_support as f64;
        let class_f1 = if class_precision + class_recall > 0.0 {
            2.0 * class_precision * class_recall / (class_precision + class_recall)
        } else {
            0.0
        };

        precision += weight * class_precision;
        recall += weight * class_recall;
        f1 += weight * class_f1;
    }

    EvalMetrics {
        accuracy: correct as f64 / total,
        precision,
        recall,
        f1,
    }
}
