//! # Feature Builder
//!
//! Turns raw examples into features: normalize tokens, encode with the
//! configured scheme, resolve the relation label. A bad example is logged
//! and skipped; configuration problems abort the build.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::encoder::{
    EncodedExample, EntityEncoder, EntityInput, MarkerRegistry, MarkingScheme, TruncationPolicy,
};
use crate::error::{RelmarkError, Result};
use crate::labels::LabelVocabulary;
use crate::normalize::normalize_tokens;
use crate::subword::SubwordTokenizer;
use crate::types::{Feature, RawExample};

/// Configuration for the feature builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderConfig {
    /// How entity mentions are marked.
    pub scheme: MarkingScheme,
    /// Maximum length of `input_ids`, boundary ids included.
    pub max_length: usize,
    /// What to do with entities that start past the truncation cut.
    pub truncation: TruncationPolicy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            scheme: MarkingScheme::TypedEntityMarkerPunct,
            max_length: 512,
            truncation: TruncationPolicy::Reject,
        }
    }
}

impl BuilderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scheme(mut self, scheme: MarkingScheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    /// Build the encoder this configuration describes.
    pub fn encoder(&self) -> Result<EntityEncoder> {
        Ok(EntityEncoder::new(self.scheme, self.max_length)?.with_truncation(self.truncation))
    }
}

/// An example that was left out of the output.
#[derive(Debug)]
pub struct SkippedExample {
    /// Position in the input sequence.
    pub index: usize,
    pub id: Option<String>,
    pub error: RelmarkError,
}

/// Result of a corpus build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Features in input order.
    pub features: Vec<Feature>,
    /// Examples that failed, in input order.
    pub skipped: Vec<SkippedExample>,
}

impl BuildReport {
    fn push(&mut self, index: usize, example: &RawExample, outcome: Result<Feature>) -> Result<()> {
        match outcome {
            Ok(feature) => self.features.push(feature),
            Err(error) if error.is_per_example() => {
                warn!(example = %example.identity(index), %error, "skipping example");
                self.skipped.push(SkippedExample {
                    index,
                    id: example.id.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
        Ok(())
    }
}

/// Owns the tokenizer, the marker registry and the label vocabulary for a
/// corpus build. The registry persists across calls, so markers registered
/// while building one split stay registered for the next.
pub struct FeatureBuilder<T: SubwordTokenizer> {
    tokenizer: T,
    registry: MarkerRegistry,
    encoder: EntityEncoder,
    labels: LabelVocabulary,
}

impl<T: SubwordTokenizer> FeatureBuilder<T> {
    /// Validate the configuration and register the scheme's fixed markers.
    pub fn new(mut tokenizer: T, labels: LabelVocabulary, config: &BuilderConfig) -> Result<Self> {
        let encoder = config.encoder()?;
        let mut registry = MarkerRegistry::new();
        let added = encoder.register_fixed_markers(&mut tokenizer, &mut registry)?;
        debug!(scheme = %encoder.scheme(), added, "registered fixed markers");

        Ok(Self {
            tokenizer,
            registry,
            encoder,
            labels,
        })
    }

    /// Encode one example, registering any new type markers it needs.
    pub fn build_one(&mut self, example: &RawExample) -> Result<Feature> {
        let tokens = normalize_tokens(&example.tokens);
        let input = entity_input(example, &tokens);
        let encoded = self
            .encoder
            .encode(&mut self.tokenizer, &mut self.registry, &input)?;
        let label = self.labels.label_to_id(&example.relation)?;
        Ok(into_feature(encoded, label))
    }

    /// Build features for every example, in order, skipping bad ones.
    pub fn build(&mut self, examples: &[RawExample]) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        for (index, example) in examples.iter().enumerate() {
            let outcome = self.build_one(example);
            report.push(index, example, outcome)?;
        }
        self.log_summary(&report);
        Ok(report)
    }

    /// Register every type-derived marker the corpus needs, in one pass.
    pub fn prepare_markers(&mut self, examples: &[RawExample]) -> Result<usize> {
        if !self.encoder.scheme().is_type_dependent() {
            return Ok(0);
        }
        let mut added = 0;
        for example in examples {
            added += self.encoder.register_type_markers(
                &mut self.tokenizer,
                &mut self.registry,
                &example.subject_type,
                &example.object_type,
            )?;
        }
        Ok(added)
    }

    /// Like [`build`](Self::build), but encodes on the rayon thread pool.
    ///
    /// Markers are registered up front, so the parallel phase only reads the
    /// tokenizer and registry and the output matches a sequential build.
    pub fn build_parallel(&mut self, examples: &[RawExample]) -> Result<BuildReport>
    where
        T: Sync,
    {
        let added = self.prepare_markers(examples)?;
        debug!(added, "registered corpus markers before parallel build");

        let tokenizer = &self.tokenizer;
        let registry = &self.registry;
        let encoder = &self.encoder;
        let labels = &self.labels;

        let outcomes: Vec<Result<Feature>> = examples
            .par_iter()
            .map(|example| {
                let tokens = normalize_tokens(&example.tokens);
                let input = entity_input(example, &tokens);
                let encoded = encoder.encode_registered(tokenizer, registry, &input)?;
                let label = labels.label_to_id(&example.relation)?;
                Ok(into_feature(encoded, label))
            })
            .collect();

        let mut report = BuildReport::default();
        for (index, (example, outcome)) in examples.iter().zip(outcomes).enumerate() {
            report.push(index, example, outcome)?;
        }
        self.log_summary(&report);
        Ok(report)
    }

    fn log_summary(&self, report: &BuildReport) {
        info!(
            scheme = %self.encoder.scheme(),
            features = report.features.len(),
            skipped = report.skipped.len(),
            markers = self.registry.len(),
            "built features"
        );
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn registry(&self) -> &MarkerRegistry {
        &self.registry
    }

    pub fn encoder(&self) -> &EntityEncoder {
        &self.encoder
    }

    pub fn labels(&self) -> &LabelVocabulary {
        &self.labels
    }

    /// Take back the tokenizer, now holding every registered marker.
    pub fn into_tokenizer(self) -> T {
        self.tokenizer
    }
}

fn entity_input<'a>(example: &'a RawExample, tokens: &'a [String]) -> EntityInput<'a> {
    EntityInput {
        tokens,
        subject: example.subject_span(),
        object: example.object_span(),
        subject_type: &example.subject_type,
        object_type: &example.object_type,
    }
}

fn into_feature(encoded: EncodedExample, label: usize) -> Feature {
    Feature {
        input_ids: encoded.input_ids,
        label,
        subject_position: encoded.subject_position,
        object_position: encoded.object_position,
        entity_mask: encoded.entity_mask,
    }
}
