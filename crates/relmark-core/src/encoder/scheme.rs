//! # Entity Marking Schemes
//!
//! A marking scheme decides how the two entity mentions are surfaced to
//! the model: replaced by a typed placeholder, wrapped in marker tokens,
//! or delimited with punctuation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RelmarkError, Result};
use crate::subword::SubwordTokenizer;
use crate::types::{EntityRole, Span};

/// The six supported ways of marking entity mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingScheme {
    /// `[SUBJ-TYPE]` / `[OBJ-TYPE]` replace the whole mention.
    EntityMask,
    /// `@ first-subword @` / `# first-subword #`; single-token mentions only.
    EntitySingleToken,
    /// `[E1] subject [/E1]`, `[E2] object [/E2]`.
    EntityMarker,
    /// `@ subject @`, `# object #`.
    EntityMarkerPunct,
    /// `[SUBJ-TYPE] subject [/SUBJ-TYPE]`, `[OBJ-TYPE] object [/OBJ-TYPE]`.
    TypedEntityMarker,
    /// `@ * type * subject @`, `# ^ type ^ object #`.
    TypedEntityMarkerPunct,
}

/// How a scheme rewrites the subwords of tokens inside a mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rewrite {
    /// The start token becomes the opening marker; the rest is dropped.
    Replace,
    /// The start token keeps its first subword between the markers; the
    /// rest is dropped.
    SingleToken,
    /// Markers are added before the start token and after the end token.
    Wrap,
}

/// Marker subwords placed around one entity mention.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntityMarkers {
    pub open: Vec<String>,
    pub close: Vec<String>,
}

impl EntityMarkers {
    fn new<S: Into<String>>(open: S, close: S) -> Self {
        Self {
            open: vec![open.into()],
            close: vec![close.into()],
        }
    }
}

/// Markers for both entities of one example.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemeMarkers {
    pub subject: EntityMarkers,
    pub object: EntityMarkers,
}

impl SchemeMarkers {
    pub fn for_role(&self, role: EntityRole) -> &EntityMarkers {
        match role {
            EntityRole::Subject => &self.subject,
            EntityRole::Object => &self.object,
        }
    }
}

impl MarkingScheme {
    pub const ALL: [MarkingScheme; 6] = [
        Self::EntityMask,
        Self::EntitySingleToken,
        Self::EntityMarker,
        Self::EntityMarkerPunct,
        Self::TypedEntityMarker,
        Self::TypedEntityMarkerPunct,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EntityMask => "entity_mask",
            Self::EntitySingleToken => "entity_single_token",
            Self::EntityMarker => "entity_marker",
            Self::EntityMarkerPunct => "entity_marker_punct",
            Self::TypedEntityMarker => "typed_entity_marker",
            Self::TypedEntityMarkerPunct => "typed_entity_marker_punct",
        }
    }

    /// Markers that do not depend on entity types. They are registered once
    /// when a builder is constructed.
    #[must_use]
    pub fn fixed_markers(self) -> &'static [&'static str] {
        match self {
            Self::EntityMarker => &["[E1]", "[/E1]", "[E2]", "[/E2]"],
            Self::EntityMarkerPunct | Self::EntitySingleToken => &["@", "#"],
            Self::EntityMask | Self::TypedEntityMarker | Self::TypedEntityMarkerPunct => &[],
        }
    }

    /// Whether new atomic markers are derived from each example's entity types.
    #[must_use]
    pub fn is_type_dependent(self) -> bool {
        matches!(self, Self::EntityMask | Self::TypedEntityMarker)
    }

    /// Atomic markers this scheme derives from a pair of entity types.
    /// Empty for schemes whose markers are fixed.
    pub fn type_markers(self, subject_type: &str, object_type: &str) -> Vec<String> {
        match self {
            Self::EntityMask => vec![
                format!("[SUBJ-{subject_type}]"),
                format!("[OBJ-{object_type}]"),
            ],
            Self::TypedEntityMarker => vec![
                format!("[SUBJ-{subject_type}]"),
                format!("[/SUBJ-{subject_type}]"),
                format!("[OBJ-{object_type}]"),
                format!("[/OBJ-{object_type}]"),
            ],
            _ => Vec::new(),
        }
    }

    /// Compute the marker subwords for one example.
    ///
    /// Only `typed_entity_marker_punct` consults the tokenizer: its type
    /// strings are split into ordinary subwords rather than registered.
    pub fn markers<T>(
        self,
        tokenizer: &T,
        subject_type: &str,
        object_type: &str,
    ) -> Result<SchemeMarkers>
    where
        T: SubwordTokenizer + ?Sized,
    {
        let markers = match self {
            Self::EntityMask => SchemeMarkers {
                subject: EntityMarkers {
                    open: vec![format!("[SUBJ-{subject_type}]")],
                    close: Vec::new(),
                },
                object: EntityMarkers {
                    open: vec![format!("[OBJ-{object_type}]")],
                    close: Vec::new(),
                },
            },
            Self::EntityMarker => SchemeMarkers {
                subject: EntityMarkers::new("[E1]", "[/E1]"),
                object: EntityMarkers::new("[E2]", "[/E2]"),
            },
            Self::EntitySingleToken | Self::EntityMarkerPunct => SchemeMarkers {
                subject: EntityMarkers::new("@", "@"),
                object: EntityMarkers::new("#", "#"),
            },
            Self::TypedEntityMarker => SchemeMarkers {
                subject: EntityMarkers::new(
                    format!("[SUBJ-{subject_type}]"),
                    format!("[/SUBJ-{subject_type}]"),
                ),
                object: EntityMarkers::new(
                    format!("[OBJ-{object_type}]"),
                    format!("[/OBJ-{object_type}]"),
                ),
            },
            Self::TypedEntityMarkerPunct => SchemeMarkers {
                subject: punct_markers(tokenizer, "@", "*", subject_type)?,
                object: punct_markers(tokenizer, "#", "^", object_type)?,
            },
        };
        Ok(markers)
    }

    fn rewrite_style(self) -> Rewrite {
        match self {
            Self::EntityMask => Rewrite::Replace,
            Self::EntitySingleToken => Rewrite::SingleToken,
            Self::EntityMarker
            | Self::EntityMarkerPunct
            | Self::TypedEntityMarker
            | Self::TypedEntityMarkerPunct => Rewrite::Wrap,
        }
    }

    /// Rewrite the subwords of raw token `i` given both entity spans.
    ///
    /// When the spans overlap, object markers are applied after subject
    /// markers.
    pub fn rewrite_token(
        self,
        markers: &SchemeMarkers,
        i: usize,
        subject: Span,
        object: Span,
        subwords: Vec<String>,
    ) -> Vec<String> {
        let in_entity = subject.contains(i) || object.contains(i);

        match self.rewrite_style() {
            Rewrite::Replace if in_entity => {
                let mut out = Vec::new();
                if i == subject.start {
                    out = markers.subject.open.clone();
                }
                if i == object.start {
                    out = markers.object.open.clone();
                }
                out
            }
            Rewrite::SingleToken if in_entity => {
                let entity = if i == subject.start {
                    &markers.subject
                } else if i == object.start {
                    &markers.object
                } else {
                    return Vec::new();
                };
                let mut out = entity.open.clone();
                out.extend(subwords.into_iter().take(1));
                out.extend(entity.close.iter().cloned());
                out
            }
            Rewrite::Wrap => {
                let mut out = subwords;
                for (span, entity) in [(subject, &markers.subject), (object, &markers.object)] {
                    if i == span.start {
                        let mut prefixed = entity.open.clone();
                        prefixed.append(&mut out);
                        out = prefixed;
                    }
                    if i == span.end {
                        out.extend(entity.close.iter().cloned());
                    }
                }
                out
            }
            _ => subwords,
        }
    }
}

/// `[punct, delim, type subwords.., delim]` opening and `[punct]` closing.
fn punct_markers<T>(tokenizer: &T, punct: &str, delim: &str, entity_type: &str) -> Result<EntityMarkers>
where
    T: SubwordTokenizer + ?Sized,
{
    let readable = entity_type.replace('_', " ").to_lowercase();
    let mut open = vec![punct.to_string(), delim.to_string()];
    open.extend(tokenizer.split(&readable)?);
    open.push(delim.to_string());

    Ok(EntityMarkers {
        open,
        close: vec![punct.to_string()],
    })
}

impl fmt::Display for MarkingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkingScheme {
    type Err = RelmarkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == s)
            .ok_or_else(|| RelmarkError::InvalidScheme(s.to_string()))
    }
}
