use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RelmarkError, Result};

/// Which argument of the relation an entity plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRole {
    Subject,
    Object,
}

impl fmt::Display for EntityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Subject => write!(f, "subject"),
            Self::Object => write!(f, "object"),
        }
    }
}

/// Inclusive raw-token index range `[start, end]` of an entity mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Whether token index `i` lies inside the span, bounds included.
    #[must_use]
    pub fn contains(&self, i: usize) -> bool {
        self.start <= i && i <= self.end
    }

    /// Check `start <= end < len`.
    pub fn validate(&self, role: EntityRole, len: usize) -> Result<()> {
        if self.start > self.end || self.end >= len {
            return Err(RelmarkError::MalformedSpan {
                role,
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let span = Span::new(2, 4);
        assert!(!span.contains(1));
        assert!(span.contains(2));
        assert!(span.contains(3));
        assert!(span.contains(4));
        assert!(!span.contains(5));
    }

    #[test]
    fn test_validate() {
        assert!(Span::new(0, 0).validate(EntityRole::Subject, 1).is_ok());
        assert!(Span::new(3, 3).validate(EntityRole::Subject, 4).is_ok());

        let err = Span::new(3, 1).validate(EntityRole::Object, 4).unwrap_err();
        assert!(matches!(
            err,
            RelmarkError::MalformedSpan {
                role: EntityRole::Object,
                start: 3,
                end: 1,
                len: 4
            }
        ));

        assert!(Span::new(2, 4).validate(EntityRole::Subject, 4).is_err());
        assert!(Span::new(0, 0).validate(EntityRole::Subject, 0).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(1, 5).to_string(), "[1, 5]");
        assert_eq!(EntityRole::Subject.to_string(), "subject");
    }
}
