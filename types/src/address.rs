//! Participant identifiers.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An identity that can stake, raise or defend a dispute, and serve as a juror.
///
/// Identities arrive already authenticated from the signing boundary; the engine
/// only compares them. Ordering is lexicographic and is used for deterministic
/// iteration and tie-breaking during juror selection.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a participant identifier from a raw string without validation.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate a participant identifier.
    ///
    /// Rejects empty identifiers and identifiers containing whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidParticipant(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Return the raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
