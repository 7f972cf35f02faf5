//! Ordered decision lists with reduced-error pruning
//!
//! Training shuffles a private copy of the data, splits it 67/33, induces
//! an ID3 tree on the first block and prunes the extracted rules against
//! the held-out block. The surviving rules form a first-match-wins list
//! ordered by held-out accuracy.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::dataset::{ensure_width, Attributes, Label, Row};
use crate::id3::Id3Tree;
use crate::rule::Rule;
use crate::value::Value;
use crate::LearnError;

/// Fraction of the shuffled data used for tree induction; the rest prunes
pub const TRAIN_FRACTION: f64 = 0.67;

/// Decision-list classifier built from a pruned ID3 tree
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleSet {
    attributes: Attributes,
    default: Label,
    rules: Vec<Rule>,
    importance: Vec<f64>,
    n_train: usize,
    n_prune: usize,
    trained: bool,
}

impl RuleSet {
    pub fn new(attributes: Attributes, default: Label) -> Self {
        let width = attributes.len();
        Self {
            attributes,
            default,
            rules: Vec::new(),
            importance: vec![0.0; width],
            n_train: 0,
            n_prune: 0,
            trained: false,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// `(induction, pruning)` split sizes from the last training run
    pub fn split_sizes(&self) -> (usize, usize) {
        (self.n_train, self.n_prune)
    }

    /// Shuffle, split, induce, extract, prune, sort.
    ///
    /// The caller's data is copied before the shuffle and never mutated.
    pub fn train<R: Rng>(&mut self, rows: &[Row], rng: &mut R) {
        let mut shuffled = rows.to_vec();
        shuffled.shuffle(rng);
        let split = (shuffled.len() as f64 * TRAIN_FRACTION) as usize;
        let (train_rows, prune_rows) = shuffled.split_at(split);

        let mut tree = Id3Tree::new(self.attributes.clone(), self.default);
        tree.train(train_rows);

        // The tree is trained, so extraction and attribution cannot fail
        self.importance = tree.importance(false).unwrap_or_default();
        let mut rules = tree.build_rules().unwrap_or_default();
        for rule in &mut rules {
            rule.cache_accuracy(train_rows);
        }

        prune_rules(&mut rules, prune_rows);

        self.rules = rules;
        self.n_train = train_rows.len();
        self.n_prune = prune_rows.len();
        self.trained = true;
    }

    /// First matching rule wins and answers with its held-out accuracy;
    /// no match yields the default class with zero confidence
    pub fn predict(&self, values: &[Value]) -> Result<(Label, f64), LearnError> {
        if !self.trained {
            return Err(LearnError::UntrainedModel);
        }
        ensure_width(&self.attributes, values)?;

        for rule in &self.rules {
            if let Some(label) = rule.predict(values) {
                return Ok((label, rule.cached_accuracy().unwrap_or(0.0)));
            }
        }
        Ok((self.default, 0.0))
    }

    /// Gain-weighted importance inherited from the induced tree
    pub fn importance(&self, normalize: bool) -> Result<Vec<f64>, LearnError> {
        if !self.trained {
            return Err(LearnError::UntrainedModel);
        }
        let mut scores = self.importance.clone();
        if normalize {
            let total: f64 = scores.iter().sum();
            if total > 0.0 {
                for score in &mut scores {
                    *score /= total;
                }
            }
        }
        Ok(scores)
    }

    #[cfg(test)]
    pub(crate) fn from_parts(attributes: Attributes, default: Label, rules: Vec<Rule>) -> Self {
        let width = attributes.len();
        Self {
            attributes,
            default,
            rules,
            importance: vec![0.0; width],
            n_train: 0,
            n_prune: 0,
            trained: true,
        }
    }
}

/// Reduced-error pruning, rule by rule.
///
/// Premises come off the back of each rule while the held-out accuracy
/// does not strictly decrease; the first harmful drop is restored and the
/// rule is left alone. Rules end up sorted by descending held-out
/// accuracy, with that accuracy cached as the rule's confidence.
pub(crate) fn prune_rules(rules: &mut [Rule], prune_rows: &[Row]) {
    for rule in rules.iter_mut() {
        for _ in 0..rule.premises.len() {
            let before = rule.cache_accuracy(prune_rows);
            let Some(removed) = rule.premises.pop() else {
                break;
            };
            if before > rule.accuracy_on(prune_rows) {
                rule.premises.push(removed);
                break;
            }
        }
        rule.cache_accuracy(prune_rows);
    }

    rules.sort_by(|a, b| {
        let a_acc = a.cached_accuracy().unwrap_or(0.0);
        let b_acc = b.cached_accuracy().unwrap_or(0.0);
        b_acc.partial_cmp(&a_acc).unwrap_or(std::cmp::Ordering::Equal)
    });
}
