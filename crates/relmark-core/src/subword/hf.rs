//! Hugging Face `tokenizers` implementation of [`SubwordTokenizer`].

use std::path::Path;
use std::str::FromStr;

use tokenizers::{AddedToken, Tokenizer};
use tracing::debug;

use super::SubwordTokenizer;
use crate::error::{RelmarkError, Result};

/// Boundary token pairs probed in order: RoBERTa-style, then BERT-style.
const BOUNDARY_CANDIDATES: &[(&str, &str)] = &[("<s>", "</s>"), ("[CLS]", "[SEP]")];

const UNKNOWN_CANDIDATES: &[&str] = &["<unk>", "[UNK]"];

/// Ids placed before and after every encoded sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryTokens {
    pub leading: u32,
    pub trailing: u32,
}

/// A `tokenizer.json`-backed subword tokenizer.
pub struct HfSubwordTokenizer {
    inner: Tokenizer,
    boundaries: BoundaryTokens,
    unknown: Option<u32>,
}

impl HfSubwordTokenizer {
    /// Wrap a loaded tokenizer, detecting its boundary and unknown tokens.
    ///
    /// Padding and truncation configured in `tokenizer.json` are cleared:
    /// every split is a single raw token and must come back unpadded.
    pub fn new(mut inner: Tokenizer) -> Result<Self> {
        inner.with_padding(None);
        inner
            .with_truncation(None)
            .map_err(|e| RelmarkError::Tokenizer(e.to_string()))?;

        let boundaries = BOUNDARY_CANDIDATES
            .iter()
            .find_map(|(leading, trailing)| {
                Some(BoundaryTokens {
                    leading: inner.token_to_id(leading)?,
                    trailing: inner.token_to_id(trailing)?,
                })
            })
            .ok_or_else(|| {
                RelmarkError::InvalidConfig(
                    "tokenizer has neither <s>/</s> nor [CLS]/[SEP] boundary tokens".into(),
                )
            })?;
        let unknown = UNKNOWN_CANDIDATES
            .iter()
            .find_map(|token| inner.token_to_id(token));

        debug!(
            leading = boundaries.leading,
            trailing = boundaries.trailing,
            ?unknown,
            "loaded subword tokenizer"
        );

        Ok(Self {
            inner,
            boundaries,
            unknown,
        })
    }

    /// Load from a `tokenizer.json` file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let inner = Tokenizer::from_file(path).map_err(|e| {
            RelmarkError::Tokenizer(format!("failed to load {}: {}", path.display(), e))
        })?;
        Self::new(inner)
    }

    /// Load from the JSON text of a `tokenizer.json` file.
    pub fn from_json(json: &str) -> Result<Self> {
        let inner = Tokenizer::from_str(json).map_err(|e| RelmarkError::Tokenizer(e.to_string()))?;
        Self::new(inner)
    }

    pub fn boundaries(&self) -> BoundaryTokens {
        self.boundaries
    }

    /// Vocabulary size including runtime-registered tokens.
    pub fn vocab_size(&self) -> usize {
        self.inner.get_vocab_size(true)
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.inner.token_to_id(token)
    }

    /// Persist the tokenizer, including every registered marker.
    pub fn save<P: AsRef<Path>>(&self, path: P, pretty: bool) -> Result<()> {
        self.inner
            .save(path, pretty)
            .map_err(|e| RelmarkError::Tokenizer(e.to_string()))
    }
}

impl SubwordTokenizer for HfSubwordTokenizer {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| RelmarkError::Tokenizer(format!("failed to split {text:?}: {e}")))?;
        Ok(encoding.get_tokens().to_vec())
    }

    fn register_atomic(&mut self, tokens: &[String]) -> Result<usize> {
        let added: Vec<AddedToken> = tokens
            .iter()
            .map(|t| AddedToken::from(t.clone(), false))
            .collect();
        Ok(self.inner.add_tokens(&added))
    }

    fn to_ids(&self, subwords: &[String]) -> Result<Vec<u32>> {
        subwords
            .iter()
            .map(|subword| {
                self.inner
                    .token_to_id(subword)
                    .or(self.unknown)
                    .ok_or_else(|| RelmarkError::UnknownSubword(subword.clone()))
            })
            .collect()
    }

    fn wrap_with_boundaries(&self, ids: Vec<u32>) -> Vec<u32> {
        let mut wrapped = Vec::with_capacity(ids.len() + 2);
        wrapped.push(self.boundaries.leading);
        wrapped.extend(ids);
        wrapped.push(self.boundaries.trailing);
        wrapped
    }
}

/// Small BERT-style WordPiece tokenizer shared by the unit tests.
#[cfg(test)]
pub(crate) fn fixture() -> HfSubwordTokenizer {
    HfSubwordTokenizer::from_json(include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/tokenizer.json"
    )))
    .unwrap()
}
