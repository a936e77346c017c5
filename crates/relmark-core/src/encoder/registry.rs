//! # Marker Vocabulary Registry
//!
//! Tracks which marker strings have already been registered with the
//! subword tokenizer so each one is added exactly once. The set only grows.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{RelmarkError, Result};
use crate::subword::SubwordTokenizer;

/// Marker tokens registered as atomic units, in registration order.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    known: HashSet<String>,
    order: Vec<String>,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every token not yet known, with the registry and with the
    /// tokenizer. Returns how many tokens were newly registered.
    pub fn ensure_registered<T, S>(&mut self, tokenizer: &mut T, tokens: &[S]) -> Result<usize>
    where
        T: SubwordTokenizer + ?Sized,
        S: AsRef<str>,
    {
        let mut fresh: Vec<String> = Vec::new();
        for token in tokens {
            let token = token.as_ref();
            if !self.known.contains(token) && !fresh.iter().any(|t| t == token) {
                fresh.push(token.to_string());
            }
        }
        if fresh.is_empty() {
            return Ok(0);
        }

        tokenizer.register_atomic(&fresh)?;
        for token in fresh.iter() {
            debug!(marker = %token, "registered marker token");
            self.known.insert(token.clone());
        }
        self.order.extend(fresh.iter().cloned());
        Ok(fresh.len())
    }

    /// Fail with [`RelmarkError::UnregisteredMarker`] for the first token
    /// that is not registered.
    pub fn require<S: AsRef<str>>(&self, tokens: &[S]) -> Result<()> {
        match tokens.iter().find(|t| !self.contains(t.as_ref())) {
            Some(missing) => Err(RelmarkError::UnregisteredMarker(missing.as_ref().to_string())),
            None => Ok(()),
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.known.contains(token)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered markers, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
