//! Train command - fit a classifier on a training-row stream
//!
//! Loads recorded rows, trains the chosen family, reports training
//! metrics and the heaviest attributes, and saves the model as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use fourline_learn::{rows_from_records, Attributes, Model};
use fourline_selfplay::read_records;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Plain information-gain tree
    Id3,
    /// Pruned ordered decision list
    Ruleset,
    /// Bootstrap ensemble of decision lists
    Bagging,
}

#[derive(Args)]
pub struct TrainArgs {
    /// Training-row stream produced by `selfplay`
    #[arg(long, value_name = "FILE")]
    pub data: PathBuf,

    /// Classifier family
    #[arg(long, value_enum, default_value_t = ModelKind::Ruleset)]
    pub model: ModelKind,

    /// Where to save the trained model
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,

    /// Default class when no rule matches (the center column)
    #[arg(long, default_value = "3")]
    pub default_column: i64,

    /// How many of the heaviest attributes to print
    #[arg(long, default_value = "10")]
    pub top_attributes: usize,

    /// Output metrics as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run train command
pub fn run(args: TrainArgs, seed: Option<u64>) -> Result<()> {
    let records = read_records(&args.data)?;
    let rows = rows_from_records(&records);
    tracing::info!(rows = rows.len(), family = ?args.model, "training");

    let attributes = Attributes::board();
    let mut model = match args.model {
        ModelKind::Id3 => Model::id3(attributes, args.default_column),
        ModelKind::Ruleset => Model::ruleset(attributes, args.default_column),
        ModelKind::Bagging => Model::bagging(attributes, args.default_column),
    };

    let mut rng = create_rng(seed);
    model.train(&rows, &mut rng);

    let metrics = model.evaluate(&rows).context("model evaluation failed")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        println!("=== Training metrics ({}) ===", model.kind());
        println!("rows:      {}", rows.len());
        println!("accuracy:  {:.3}", metrics.accuracy);
        println!("precision: {:.3} (weighted)", metrics.precision);
        println!("recall:    {:.3} (weighted)", metrics.recall);
        println!("f1:        {:.3} (weighted)", metrics.f1);
    }

    if args.top_attributes > 0 && !args.json {
        let ranked = model
            .ranked_importance(true)
            .context("feature importance failed")?;
        println!("\nTop attributes:");
        for (name, score) in ranked
            .iter()
            .take(args.top_attributes)
            .filter(|(_, score)| *score > 0.0)
        {
            println!("  {name:<12} {score:.4}");
        }
    }

    model.save(&args.output)?;
    tracing::info!("model saved to {}", args.output.display());
    Ok(())
}

/// Create RNG from seed or entropy
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
