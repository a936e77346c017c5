//! # Relation Label Vocabulary
//!
//! Closed mapping from relation label strings to class ids.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::{RelmarkError, Result};

/// The 42 TACRED relations in class-id order.
pub const TACRED_LABELS: [&str; 42] = [
    "no_relation",
    "per:title",
    "org:top_members/employees",
    "per:employee_of",
    "org:alternate_names",
    "org:country_of_headquarters",
    "per:countries_of_residence",
    "org:city_of_headquarters",
    "per:cities_of_residence",
    "per:age",
    "per:stateorprovinces_of_residence",
    "per:origin",
    "org:subsidiaries",
    "org:parents",
    "per:spouse",
    "org:stateorprovince_of_headquarters",
    "per:children",
    "per:other_family",
    "per:alternate_names",
    "org:members",
    "per:siblings",
    "per:schools_attended",
    "per:parents",
    "per:date_of_death",
    "org:member_of",
    "org:founded_by",
    "org:website",
    "per:cause_of_death",
    "org:political/religious_affiliation",
    "org:founded",
    "per:city_of_death",
    "org:shareholders",
    "org:number_of_employees/members",
    "per:date_of_birth",
    "per:city_of_birth",
    "per:charges",
    "per:stateorprovince_of_death",
    "per:religion",
    "per:stateorprovince_of_birth",
    "per:country_of_birth",
    "org:dissolved",
    "per:country_of_death",
];

/// Fixed label-to-id mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocabulary {
    ids: HashMap<String, usize>,
}

impl LabelVocabulary {
    /// The TACRED label set.
    pub fn tacred() -> Self {
        Self::from_labels(TACRED_LABELS)
    }

    /// Assign ids `0..n` in iteration order. Later duplicates are ignored.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: HashMap<String, usize> = HashMap::new();
        for label in labels {
            let next = ids.len();
            ids.entry(label.into()).or_insert(next);
        }
        Self { ids }
    }

    /// Build from an explicit mapping. Two labels sharing an id is an error.
    pub fn from_map(ids: HashMap<String, usize>) -> Result<Self> {
        let mut seen = HashSet::new();
        for (label, id) in &ids {
            if !seen.insert(*id) {
                return Err(RelmarkError::InvalidConfig(format!(
                    "label {label:?} reuses class id {id}"
                )));
            }
        }
        Ok(Self { ids })
    }

    /// Load a JSON object `{"label": id, ...}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let ids: HashMap<String, usize> = serde_json::from_str(&text)?;
        Self::from_map(ids)
    }

    /// Resolve a label string to its class id.
    pub fn label_to_id(&self, label: &str) -> Result<usize> {
        self.ids
            .get(label)
            .copied()
            .ok_or_else(|| RelmarkError::UnknownLabel {
                label: label.to_string(),
            })
    }

    /// Reverse lookup, mainly for diagnostics.
    pub fn id_to_label(&self, id: usize) -> Option<&str> {
        self.ids
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self::tacred()
    }
}
