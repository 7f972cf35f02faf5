//! Unified classifier surface and versioned persistence
//!
//! The three classifier families share one capability set: train,
//! predict, feature importance. Inference sites hold a [`Model`] and do
//! not care which family is behind it.

use std::path::Path;

use anyhow::{bail, Context};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bagging::Bagging;
use crate::dataset::{Attributes, Label, Row};
use crate::id3::Id3Tree;
use crate::metrics::{evaluate, EvalMetrics};
use crate::ruleset::RuleSet;
use crate::value::Value;
use crate::LearnError;

/// On-disk schema version; older or newer files are rejected on load
const MODEL_FORMAT: u32 = 1;

/// Envelope for persisted models
#[derive(Serialize, Deserialize)]
struct SavedModel {
    format: u32,
    model: Model,
}

/// One of the three classifier families
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Model {
    Id3(Id3Tree),
    RuleSet(RuleSet),
    Bagging(Bagging),
}

impl Model {
    pub fn id3(attributes: Attributes, default: Label) -> Self {
        Model::Id3(Id3Tree::new(attributes, default))
    }

    pub fn ruleset(attributes: Attributes, default: Label) -> Self {
        Model::RuleSet(RuleSet::new(attributes, default))
    }

    pub fn bagging(attributes: Attributes, default: Label) -> Self {
        Model::Bagging(Bagging::new(attributes, default))
    }

    /// Stable lowercase family name, for logs and file naming
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Id3(_) => "id3",
            Model::RuleSet(_) => "ruleset",
            Model::Bagging(_) => "bagging",
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            Model::Id3(tree) => tree.attributes(),
            Model::RuleSet(ruleset) => ruleset.attributes(),
            Model::Bagging(bagging) => bagging.attributes(),
        }
    }

    /// Train in place; the RNG drives shuffles and bootstrap resampling
    pub fn train<R: Rng>(&mut self, rows: &[Row], rng: &mut R) {
        match self {
            Model::Id3(tree) => tree.train(rows),
            Model::RuleSet(ruleset) => ruleset.train(rows, rng),
            Model::Bagging(bagging) => bagging.train(rows, rng),
        }
    }

    /// `(label, confidence)` for one feature row
    pub fn predict(&self, values: &[Value]) -> Result<(Label, f64), LearnError> {
        match self {
            Model::Id3(tree) => tree.predict(values),
            Model::RuleSet(ruleset) => ruleset.predict(values),
            Model::Bagging(bagging) => bagging.predict(values),
        }
    }

    /// Per-attribute importance scores, index-aligned with the schema
    pub fn importance(&self, normalize: bool) -> Result<Vec<f64>, LearnError> {
        match self {
            Model::Id3(tree) => tree.importance(normalize),
            Model::RuleSet(ruleset) => ruleset.importance(normalize),
            Model::Bagging(bagging) => bagging.importance(normalize),
        }
    }

    /// Importance scores paired with attribute names, heaviest first
    pub fn ranked_importance(&self, normalize: bool) -> Result<Vec<(String, f64)>, LearnError> {
        let scores = self.importance(normalize)?;
        let mut ranked: Vec<(String, f64)> = self
            .attributes()
            .names()
            .iter()
            .cloned()
            .zip(scores)
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        Ok(ranked)
    }

    /// Score the model's predictions over a labeled set
    pub fn evaluate(&self, rows: &[Row]) -> Result<EvalMetrics, LearnError> {
        let mut truth = Vec::with_capacity(rows.len());
        let mut predicted = Vec::with_capacity(rows.len());
        for row in rows {
            truth.push(row.label);
            predicted.push(self.predict(&row.values)?.0);
        }
        Ok(evaluate(&truth, &predicted))
    }

    /// Save as pretty JSON under the current schema version
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let envelope = SavedModel {
            format: MODEL_FORMAT,
            model: self.clone(),
        };
        let content = serde_json::to_string_pretty(&envelope)?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write model to {}", path.display()))?;
        Ok(())
    }

    /// Load a model saved by [`Model::save`], rejecting other versions
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model from {}", path.display()))?;
        let envelope: SavedModel =
            serde_json::from_str(&content).context("failed to parse model file")?;
        if envelope.format != MODEL_FORMAT {
            bail!(
                "unsupported model format {} (expected {})",
                envelope.format,
                MODEL_FORMAT
            );
        }
        Ok(envelope.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::AttrKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn schema() -> Attributes {
        Attributes::uniform(vec!["a".to_string(), "b".to_string()], AttrKind::Discrete)
    }

    fn separable_rows() -> Vec<Row> {
        let mut data = Vec::new();
        for i in 0..20 {
            data.push(Row::new(
                vec![Value::Discrete(0), Value::Discrete(i % 2)],
                0,
            ));
            data.push(Row::new(
                vec![Value::Discrete(1), Value::Discrete(i % 2)],
                1,
            ));
        }
        data
    }

    #[test]
    fn test_every_family_trains_and_predicts() {
        let rows = separable_rows();
        for mut model in [
            Model::id3(schema(), 0),
            Model::ruleset(schema(), 0),
            Model::bagging(schema(), 0),
        ] {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            model.train(&rows, &mut rng);

            let (label, confidence) = model
                .predict(&[Value::Discrete(1), Value::Discrete(0)])
                .unwrap();
            assert_eq!(label, 1, "{} misclassified", model.kind());
            assert!((0.0..=1.0).contains(&confidence));

            let metrics = model.evaluate(&rows).unwrap();
            assert!(metrics.accuracy > 0.9, "{} accuracy too low", model.kind());
        }
    }

    #[test]
    fn test_ranked_importance_is_descending() {
        let mut model = Model::id3(schema(), 0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        model.train(&separable_rows(), &mut rng);

        let ranked = model.ranked_importance(true).unwrap();
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].1 >= ranked[1].1);
        assert_eq!(ranked[0].0, "a");
    }

    #[test]
    fn test_untrained_model_surfaces_error() {
        let model = Model::ruleset(schema(), 0);
        assert_eq!(
            model.predict(&[Value::Discrete(0), Value::Discrete(0)]),
            Err(LearnError::UntrainedModel)
        );
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut model = Model::ruleset(schema(), 0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        model.train(&separable_rows(), &mut rng);

        let path = std::env::temp_dir().join("fourline-model-roundtrip.json");
        model.save(&path).unwrap();
        let loaded = Model::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.kind(), "ruleset");
        let row = [Value::Discrete(0), Value::Discrete(1)];
        assert_eq!(model.predict(&row).unwrap(), loaded.predict(&row).unwrap());
    }

    #[test]
    fn test_load_rejects_foreign_format() {
        let path = std::env::temp_dir().join("fourline-model-badformat.json");
        Model::id3(schema(), 0).save(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, content.replace("\"format\": 1", "\"format\": 99")).unwrap();

        let result = Model::load(&path);
        std::fs::remove_file(&path).ok();
        let message = result.unwrap_err().to_string();
        assert!(message.contains("unsupported model format"));
    }
}
