use thiserror::Error;

use crate::types::EntityRole;

/// Errors that can occur while encoding relation-extraction examples.
#[derive(Debug, Error)]
pub enum RelmarkError {
    /// The marking scheme name is not one of the six supported variants.
    #[error("invalid marking scheme: {0:?}")]
    InvalidScheme(String),

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The relation label is absent from the label vocabulary.
    #[error("unknown relation label: {label:?}")]
    UnknownLabel {
        /// The label that could not be resolved.
        label: String,
    },

    /// An entity span is inverted or points outside the token sequence.
    #[error("malformed {role} span [{start}, {end}] for a sequence of {len} tokens")]
    MalformedSpan {
        role: EntityRole,
        start: usize,
        end: usize,
        len: usize,
    },

    /// An entity start position does not survive truncation.
    #[error("{role} starts at subword {position}, beyond the truncated length {limit}")]
    EntityTruncated {
        role: EntityRole,
        position: usize,
        limit: usize,
    },

    /// A type-dependent marker was needed on the read-only encoding path
    /// but has not been registered yet.
    #[error("marker {0:?} is not registered")]
    UnregisteredMarker(String),

    /// A subword string has no id and the vocabulary has no unknown token.
    #[error("subword {0:?} has no id in the vocabulary")]
    UnknownSubword(String),

    /// The underlying subword tokenizer failed.
    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelmarkError {
    /// Whether the error only affects the example being processed.
    ///
    /// Per-example errors are logged and the example skipped; all other
    /// errors abort the whole build.
    #[must_use]
    pub fn is_per_example(&self) -> bool {
        matches!(
            self,
            Self::UnknownLabel { .. }
                | Self::MalformedSpan { .. }
                | Self::EntityTruncated { .. }
                | Self::UnknownSubword(_)
                | Self::Tokenizer(_)
        )
    }
}

/// Result type alias for relmark operations.
pub type Result<T> = std::result::Result<T, RelmarkError>;
