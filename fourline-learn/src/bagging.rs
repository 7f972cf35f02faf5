//! Bootstrap-aggregated rule-set ensembles
//!
//! Ten decision lists, each trained on a same-size resample drawn with
//! replacement. Inference sums the confidence of every member whose
//! answer actually matched a rule; the heaviest class wins.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dataset::{bootstrap_sample, ensure_width, Attributes, Label, Row};
use crate::ruleset::RuleSet;
use crate::value::Value;
use crate::LearnError;

/// Number of ensemble members
pub const ENSEMBLE_SIZE: usize = 10;

/// Confidence-voting ensemble of [`RuleSet`]s
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bagging {
    attributes: Attributes,
    default: Label,
    members: Vec<RuleSet>,
}

impl Bagging {
    pub fn new(attributes: Attributes, default: Label) -> Self {
        Self {
            attributes,
            default,
            members: Vec::new(),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Trained ensemble members
    pub fn members(&self) -> &[RuleSet] {
        &self.members
    }

    /// Train [`ENSEMBLE_SIZE`] members, each on its own bootstrap
    /// resample; every member also shuffles and splits internally
    pub fn train<R: Rng>(&mut self, rows: &[Row], rng: &mut R) {
        self.members = (0..ENSEMBLE_SIZE)
            .map(|index| {
                tracing::debug!(member = index + 1, total = ENSEMBLE_SIZE, "training member");
                let sample = bootstrap_sample(rows, rng);
                let mut member = RuleSet::new(self.attributes.clone(), self.default);
                member.train(&sample, rng);
                member
            })
            .collect();
    }

    /// Confidence-weighted plurality vote.
    ///
    /// Members that fell through to their default (zero confidence) do
    /// not vote. With no votes at all the ensemble answers the default
    /// class with zero confidence.
    pub fn predict(&self, values: &[Value]) -> Result<(Label, f64), LearnError> {
        if self.members.is_empty() {
            return Err(LearnError::UntrainedModel);
        }
        ensure_width(&self.attributes, values)?;

        let mut votes: FxHashMap<Label, f64> = FxHashMap::default();
        for member in &self.members {
            let (label, confidence) = member.predict(values)?;
            if confidence > 0.0 {
                *votes.entry(label).or_insert(0.0) += confidence;
            }
        }
        if votes.is_empty() {
            return Ok((self.default, 0.0));
        }

        // Heaviest class wins; exact ties go to the smaller label
        let mut tally: Vec<(Label, f64)> = votes.into_iter().collect();
        tally.sort_unstable_by_key(|&(label, _)| label);
        let mut winner = tally[0];
        for &(label, weight) in &tally[1..] {
            if weight > winner.1 {
                winner = (label, weight);
            }
        }

        Ok((winner.0, winner.1 / ENSEMBLE_SIZE as f64))
    }

    /// Mean member importance, optionally normalized to sum to 1
    pub fn importance(&self, normalize: bool) -> Result<Vec<f64>, LearnError> {
        if self.members.is_empty() {
            return Err(LearnError::UntrainedModel);
        }

        let mut scores = vec![0.0; self.attributes.len()];
        for member in &self.members {
            for (total, score) in scores.iter_mut().zip(member.importance(false)?) {
                *total += score;
            }
        }
        for score in &mut scores {
            *score /= self.members.len() as f64;
        }

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
}
