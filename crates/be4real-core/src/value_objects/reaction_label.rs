//! Validated reaction label (an emoji or short free-form string)

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Non-empty reaction label of at most `MAX_CHARS` characters
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReactionLabel(String);

impl ReactionLabel {
    pub const MAX_CHARS: usize = 50;

    /// Validate and wrap a label; length is counted in characters so a
    /// multi-byte emoji counts once
    pub fn parse(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        let chars = raw.chars().count();
        if chars == 0 {
            return Err(DomainError::InvalidReaction(
                "Reaction must not be empty".to_string(),
            ));
        }
        if chars > Self::MAX_CHARS {
            return Err(DomainError::InvalidReaction(format!(
                "Reaction must be at most {} characters",
                Self::MAX_CHARS
            )));
        }
        Ok(Self(raw))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReactionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReactionLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReactionLabel {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ReactionLabel> for String {
    fn from(label: ReactionLabel) -> Self {
        label.0
    }
}
