use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SessionIdError;

/// Route segments a broken link can carry instead of a real id.
const PLACEHOLDER_IDS: [&str; 2] = ["undefined", "null"];

/// Ids are interpolated into request paths, so nothing that ends or escapes a segment.
fn is_path_safe(raw: &str) -> bool {
    !raw
        .chars()
        .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control())
}

fn parse_raw(raw: &str) -> Result<String, SessionIdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SessionIdError::Missing);
    }
    if PLACEHOLDER_IDS.contains(&trimmed) {
        return Err(SessionIdError::Placeholder {
            raw: trimmed.to_owned(),
        });
    }
    if !is_path_safe(trimmed) {
        return Err(SessionIdError::NotPathSafe {
            raw: trimmed.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

/// Server-issued identifier of an interview or assessment session.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Parses an identifier taken from a route or a server response.
    ///
    /// # Errors
    ///
    /// Returns `SessionIdError::Missing` for blank input,
    /// `SessionIdError::Placeholder` for `"undefined"`/`"null"` and
    /// `SessionIdError::NotPathSafe` for ids carrying `/`, `?`, `#`, `%` or whitespace.
    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        parse_raw(raw).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a learning roadmap, used to generate flashcard decks.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoadmapId(String);

impl RoadmapId {
    /// # Errors
    ///
    /// Returns `SessionIdError` when the raw value is blank or a placeholder.
    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        parse_raw(raw).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a code challenge.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChallengeId(String);

impl ChallengeId {
    /// # Errors
    ///
    /// Returns `SessionIdError` when the raw value is blank or a placeholder.
    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        parse_raw(raw).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ─── Conversions ───────────────────────────────────────────────────────────────

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl TryFrom<String> for RoadmapId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RoadmapId> for String {
    fn from(id: RoadmapId) -> Self {
        id.0
    }
}

impl TryFrom<String> for ChallengeId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ChallengeId> for String {
    fn from(id: ChallengeId) -> Self {
        id.0
    }
}

impl FromStr for SessionId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for RoadmapId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for ChallengeId {
    type Err = SessionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Debug for RoadmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoadmapId({})", self.0)
    }
}

impl fmt::Debug for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChallengeId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for RoadmapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
