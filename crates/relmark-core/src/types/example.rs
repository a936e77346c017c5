use serde::{Deserialize, Serialize};

use super::span::Span;

/// A labeled sentence with two marked entity mentions, as found in
/// TACRED-style corpora.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExample {
    /// Corpus identifier, when the source provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Whitespace/PTB tokens of the sentence.
    #[serde(rename = "token")]
    pub tokens: Vec<String>,

    #[serde(rename = "subj_start")]
    pub subject_start: usize,
    #[serde(rename = "subj_end")]
    pub subject_end: usize,
    #[serde(rename = "obj_start")]
    pub object_start: usize,
    #[serde(rename = "obj_end")]
    pub object_end: usize,

    #[serde(rename = "subj_type")]
    pub subject_type: String,
    #[serde(rename = "obj_type")]
    pub object_type: String,

    /// Relation label string, resolved against a label vocabulary.
    pub relation: String,
}

impl RawExample {
    #[must_use]
    pub fn subject_span(&self) -> Span {
        Span::new(self.subject_start, self.subject_end)
    }

    #[must_use]
    pub fn object_span(&self) -> Span {
        Span::new(self.object_start, self.object_end)
    }

    /// Human-readable identity for log lines: the corpus id if present,
    /// otherwise the position in the input.
    #[must_use]
    pub fn identity(&self, index: usize) -> String {
        match &self.id {
            Some(id) => format!("#{index} ({id})"),
            None => format!("#{index}"),
        }
    }
}
