//! # Relmark Prep
//!
//! Batch preprocessing of a relation-extraction corpus: load raw examples,
//! encode them with an entity marking scheme and write the features as
//! JSON Lines. The tokenizer, extended with every marker registered along
//! the way, can be saved next to the features so the model's embedding
//! table can be resized to match.

use std::path::PathBuf;

use anyhow::{Context, Result};
use relmark_core::corpus::{load_examples, write_features_file};
use relmark_core::{BuilderConfig, FeatureBuilder, HfSubwordTokenizer, LabelVocabulary};
use serde::Serialize;
use tracing::info;

/// Inputs and outputs of one preprocessing run.
#[derive(Debug, Clone)]
pub struct PrepConfig {
    /// `tokenizer.json` of the target model.
    pub tokenizer: PathBuf,
    /// Corpus file (JSON array or JSON Lines).
    pub input: PathBuf,
    /// Destination for the JSON Lines features.
    pub output: PathBuf,
    /// Optional `{label: id}` JSON; TACRED labels otherwise.
    pub labels: Option<PathBuf>,
    pub builder: BuilderConfig,
    /// Encode on all cores.
    pub parallel: bool,
    /// Where to save the tokenizer with its registered markers.
    pub save_tokenizer: Option<PathBuf>,
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PrepSummary {
    pub scheme: String,
    pub examples: usize,
    pub features: usize,
    pub skipped: usize,
    /// Marker tokens registered during the run, oldest first.
    pub markers: Vec<String>,
    /// Vocabulary size including the registered markers.
    pub vocab_size: usize,
}

/// Run the full pipeline described by `config`.
pub fn run_prep(config: &PrepConfig) -> Result<PrepSummary> {
    let tokenizer = HfSubwordTokenizer::from_file(&config.tokenizer)
        .with_context(|| format!("loading tokenizer {}", config.tokenizer.display()))?;

    let labels = match &config.labels {
        Some(path) => LabelVocabulary::from_json_file(path)
            .with_context(|| format!("loading labels {}", path.display()))?,
        None => LabelVocabulary::tacred(),
    };

    let examples = load_examples(&config.input)
        .with_context(|| format!("reading corpus {}", config.input.display()))?;
    info!(
        examples = examples.len(),
        input = %config.input.display(),
        "loaded corpus"
    );

    let mut builder = FeatureBuilder::new(tokenizer, labels, &config.builder)
        .context("configuring feature builder")?;
    let report = if config.parallel {
        builder.build_parallel(&examples)?
    } else {
        builder.build(&examples)?
    };

    write_features_file(&config.output, &report.features)
        .with_context(|| format!("writing features {}", config.output.display()))?;
    info!(
        features = report.features.len(),
        output = %config.output.display(),
        "wrote features"
    );

    if let Some(path) = &config.save_tokenizer {
        builder
            .tokenizer()
            .save(path, false)
            .with_context(|| format!("saving tokenizer {}", path.display()))?;
        info!(path = %path.display(), "saved extended tokenizer");
    }

    Ok(PrepSummary {
        scheme: config.builder.scheme.to_string(),
        examples: examples.len(),
        features: report.features.len(),
        skipped: report.skipped.len(),
        markers: builder.registry().iter().map(String::from).collect(),
        vocab_size: builder.tokenizer().vocab_size(),
    })
}
