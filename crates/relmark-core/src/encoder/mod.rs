//! # Entity-Aware Encoder
//!
//! Expands raw tokens into subwords, inserts scheme markers around both
//! entity mentions, records where each mention starts in the expanded
//! sequence and flags mention-interior subwords in a mask. The subword and
//! mask sequences grow in lockstep so they can never drift apart.

pub mod registry;
pub mod scheme;

pub use registry::MarkerRegistry;
pub use scheme::{EntityMarkers, MarkingScheme, SchemeMarkers};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RelmarkError, Result};
use crate::subword::SubwordTokenizer;
use crate::types::{EntityRole, Span};

/// Room kept for the leading and trailing boundary ids.
pub const BOUNDARY_RESERVE: usize = 2;

/// What to do when an entity starts past the truncation cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Fail the example with [`RelmarkError::EntityTruncated`].
    #[default]
    Reject,
    /// Return the position unchecked, even if it lies past the end of
    /// `input_ids`.
    Keep,
}

impl fmt::Display for TruncationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Keep => write!(f, "keep"),
        }
    }
}

impl FromStr for TruncationPolicy {
    type Err = RelmarkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "reject" => Ok(Self::Reject),
            "keep" => Ok(Self::Keep),
            other => Err(RelmarkError::InvalidConfig(format!(
                "unknown truncation policy {other:?} (expected \"reject\" or \"keep\")"
            ))),
        }
    }
}

/// One sentence with its two entity mentions, ready for encoding.
#[derive(Debug, Clone, Copy)]
pub struct EntityInput<'a> {
    pub tokens: &'a [String],
    pub subject: Span,
    pub object: Span,
    pub subject_type: &'a str,
    pub object_type: &'a str,
}

/// Output of [`EntityEncoder::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedExample {
    pub input_ids: Vec<u32>,
    /// Index into `input_ids` of the subject's first subword.
    pub subject_position: usize,
    /// Index into `input_ids` of the object's first subword.
    pub object_position: usize,
    /// Same length as `input_ids`.
    pub entity_mask: Vec<u8>,
}

/// Encodes sentences under a fixed marking scheme and length limit.
#[derive(Debug, Clone)]
pub struct EntityEncoder {
    scheme: MarkingScheme,
    max_length: usize,
    truncation: TruncationPolicy,
}

impl EntityEncoder {
    /// Create an encoder. `max_length` counts the boundary ids and must be
    /// at least [`BOUNDARY_RESERVE`].
    pub fn new(scheme: MarkingScheme, max_length: usize) -> Result<Self> {
        if max_length < BOUNDARY_RESERVE {
            return Err(RelmarkError::InvalidConfig(format!(
                "max_length must be at least {BOUNDARY_RESERVE}, got {max_length}"
            )));
        }
        Ok(Self {
            scheme,
            max_length,
            truncation: TruncationPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.truncation = truncation;
        self
    }

    pub fn scheme(&self) -> MarkingScheme {
        self.scheme
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn truncation(&self) -> TruncationPolicy {
        self.truncation
    }

    /// Register the scheme's type-independent markers.
    pub fn register_fixed_markers<T>(
        &self,
        tokenizer: &mut T,
        registry: &mut MarkerRegistry,
    ) -> Result<usize>
    where
        T: SubwordTokenizer + ?Sized,
    {
        registry.ensure_registered(tokenizer, self.scheme.fixed_markers())
    }

    /// Register the markers derived from a pair of entity types.
    pub fn register_type_markers<T>(
        &self,
        tokenizer: &mut T,
        registry: &mut MarkerRegistry,
        subject_type: &str,
        object_type: &str,
    ) -> Result<usize>
    where
        T: SubwordTokenizer + ?Sized,
    {
        let markers = self.scheme.type_markers(subject_type, object_type);
        registry.ensure_registered(tokenizer, markers.as_slice())
    }

    /// Register any missing scheme markers, then encode.
    ///
    /// Type markers are registered before the spans are checked, so an
    /// example that fails later can still grow the vocabulary.
    pub fn encode<T>(
        &self,
        tokenizer: &mut T,
        registry: &mut MarkerRegistry,
        input: &EntityInput<'_>,
    ) -> Result<EncodedExample>
    where
        T: SubwordTokenizer + ?Sized,
    {
        self.register_fixed_markers(tokenizer, registry)?;
        self.register_type_markers(tokenizer, registry, input.subject_type, input.object_type)?;
        self.encode_registered(tokenizer, registry, input)
    }

    /// Encode without touching the registry or the tokenizer.
    ///
    /// Every marker the example needs, fixed or type-derived, must already
    /// be registered,
    /// which makes this safe to call from many threads at once.
    pub fn encode_registered<T>(
        &self,
        tokenizer: &T,
        registry: &MarkerRegistry,
        input: &EntityInput<'_>,
    ) -> Result<EncodedExample>
    where
        T: SubwordTokenizer + ?Sized,
    {
        let EntityInput {
            tokens,
            subject,
            object,
            subject_type,
            object_type,
        } = *input;

        subject.validate(EntityRole::Subject, tokens.len())?;
        object.validate(EntityRole::Object, tokens.len())?;
        registry.require(self.scheme.fixed_markers())?;
        registry.require(self.scheme.type_markers(subject_type, object_type).as_slice())?;

        let markers = self.scheme.markers(tokenizer, subject_type, object_type)?;

        let mut subwords: Vec<String> = Vec::with_capacity(tokens.len() + 8);
        let mut mask: Vec<u8> = Vec::with_capacity(tokens.len() + 8);
        let mut subject_start = None;
        let mut object_start = None;

        for (i, token) in tokens.iter().enumerate() {
            let pieces = tokenizer.split(token)?;
            let pieces = self.scheme.rewrite_token(&markers, i, subject, object, pieces);

            if i == subject.start {
                subject_start = Some(subwords.len());
            }
            if i == object.start {
                object_start = Some(subwords.len());
            }

            mask.extend(token_mask(i, subject, object, pieces.len()));
            subwords.extend(pieces);
        }
        debug_assert_eq!(subwords.len(), mask.len());

        // Spans were validated against the token count, so both starts were visited.
        let subject_start = subject_start.ok_or(RelmarkError::MalformedSpan {
            role: EntityRole::Subject,
            start: subject.start,
            end: subject.end,
            len: tokens.len(),
        })?;
        let object_start = object_start.ok_or(RelmarkError::MalformedSpan {
            role: EntityRole::Object,
            start: object.start,
            end: object.end,
            len: tokens.len(),
        })?;

        let limit = self.max_length - BOUNDARY_RESERVE;
        subwords.truncate(limit);
        mask.truncate(limit);

        if self.truncation == TruncationPolicy::Reject {
            for (role, position) in [
                (EntityRole::Subject, subject_start),
                (EntityRole::Object, object_start),
            ] {
                if position >= subwords.len() {
                    return Err(RelmarkError::EntityTruncated {
                        role,
                        position,
                        limit: subwords.len(),
                    });
                }
            }
        }

        let input_ids = tokenizer.wrap_with_boundaries(tokenizer.to_ids(&subwords)?);

        let mut entity_mask = Vec::with_capacity(input_ids.len());
        entity_mask.push(0);
        entity_mask.extend(mask);
        entity_mask.resize(input_ids.len(), 0);

        Ok(EncodedExample {
            input_ids,
            subject_position: subject_start + 1,
            object_position: object_start + 1,
            entity_mask,
        })
    }
}

/// Mask values for the `n` subwords produced by raw token `i`.
///
/// Mention tokens are 1, except that the first subword of a mention's start
/// token and the last subword of its end token are markers and get 0.
fn token_mask(i: usize, subject: Span, object: Span, n: usize) -> Vec<u8> {
    if !subject.contains(i) && !object.contains(i) {
        return vec![0; n];
    }

    let mut mask = vec![1; n];
    if i == subject.start || i == object.start {
        if let Some(first) = mask.first_mut() {
            *first = 0;
        }
    }
    if i == subject.end || i == object.end {
        if let Some(last) = mask.last_mut() {
            *last = 0;
        }
    }
    mask
}
