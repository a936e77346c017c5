//! # Subword Tokenization Capability
//!
//! The encoder never splits text itself. It orchestrates a tokenizer that
//! can split strings into subwords, learn new atomic tokens at runtime,
//! map subwords to ids and wrap an id sequence with boundary ids.

pub mod hf;

pub use hf::{BoundaryTokens, HfSubwordTokenizer};

use crate::error::Result;

/// Operations the entity-aware encoder needs from a subword tokenizer.
pub trait SubwordTokenizer {
    /// Split `text` into subword strings, without boundary tokens.
    fn split(&self, text: &str) -> Result<Vec<String>>;

    /// Register `tokens` as atomic units that are never split further.
    ///
    /// Returns how many tokens were new to the vocabulary.
    fn register_atomic(&mut self, tokens: &[String]) -> Result<usize>;

    /// Convert subword strings to vocabulary ids.
    fn to_ids(&self, subwords: &[String]) -> Result<Vec<u32>>;

    /// Wrap `ids` with the tokenizer's sequence-boundary ids.
    ///
    /// Implementations must add exactly one leading id; entity positions
    /// are shifted by one to account for it.
    fn wrap_with_boundaries(&self, ids: Vec<u32>) -> Vec<u32>;
}

impl<T: SubwordTokenizer + ?Sized> SubwordTokenizer for Box<T> {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        (**self).split(text)
    }

    fn register_atomic(&mut self, tokens: &[String]) -> Result<usize> {
        (**self).register_atomic(tokens)
    }

    fn to_ids(&self, subwords: &[String]) -> Result<Vec<u32>> {
        (**self).to_ids(subwords)
    }

    fn wrap_with_boundaries(&self, ids: Vec<u32>) -> Vec<u32> {
        (**self).wrap_with_boundaries(ids)
    }
}
