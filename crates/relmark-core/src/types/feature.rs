use serde::{Deserialize, Serialize};

/// A fully encoded training example.
///
/// Serialized with the keys downstream collators expect: `input_ids`,
/// `labels`, `ss`, `os`, `entity_mask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Subword ids wrapped with the tokenizer's sequence-boundary ids.
    pub input_ids: Vec<u32>,

    /// Relation class id.
    #[serde(rename = "labels")]
    pub label: usize,

    /// Index into `input_ids` of the subject's first marked subword.
    #[serde(rename = "ss")]
    pub subject_position: usize,

    /// Index into `input_ids` of the object's first marked subword.
    #[serde(rename = "os")]
    pub object_position: usize,

    /// 1 where the subword is interior to an entity mention, 0 elsewhere.
    pub entity_mask: Vec<u8>,
}

impl Feature {
    #[must_use]
    pub fn len(&self) -> usize {
        self.input_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.input_ids.is_empty()
    }
}
