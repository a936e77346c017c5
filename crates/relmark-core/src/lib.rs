//! # Relmark Core
//!
//! Prepares relation-extraction training examples. A sentence with two
//! marked entity mentions is expanded into subwords, the mentions are
//! surrounded (or replaced) by scheme-specific marker tokens, and the
//! result records where each mention starts and which subwords belong to
//! a mention.
//!
//! ## Quick Start
//!
//! ```no_run
//! use relmark_core::{
//!     BuilderConfig, FeatureBuilder, HfSubwordTokenizer, LabelVocabulary, MarkingScheme,
//! };
//!
//! let tokenizer = HfSubwordTokenizer::from_file("roberta-large/tokenizer.json").unwrap();
//! let config = BuilderConfig::new()
//!     .with_scheme(MarkingScheme::TypedEntityMarkerPunct)
//!     .with_max_length(512);
//! let mut builder = FeatureBuilder::new(tokenizer, LabelVocabulary::tacred(), &config).unwrap();
//!
//! let examples = relmark_core::corpus::load_examples("data/train.json").unwrap();
//! let report = builder.build(&examples).unwrap();
//! println!("{} features, {} skipped", report.features.len(), report.skipped.len());
//! ```
pub mod builder;
pub mod corpus;
pub mod encoder;
pub mod error;
pub mod labels;
pub mod normalize;
pub mod subword;
pub mod types;

// Re-export primary API
pub use builder::{BuildReport, BuilderConfig, FeatureBuilder, SkippedExample};
pub use encoder::{
    EncodedExample, EntityEncoder, EntityInput, MarkerRegistry, MarkingScheme, TruncationPolicy,
};
pub use error::{RelmarkError, Result};
pub use labels::LabelVocabulary;
pub use normalize::{normalize_token, normalize_tokens};
pub use subword::{BoundaryTokens, HfSubwordTokenizer, SubwordTokenizer};
pub use types::{EntityRole, Feature, RawExample, Span};
