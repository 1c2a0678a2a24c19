use crate::DeckError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters left as-is inside one URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Upstream folder identifier. Only `[A-Za-z0-9_-]` is accepted so the value
/// can be spliced into an upstream URL as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderId(String);

impl FolderId {
    pub fn parse(raw: &str) -> Result<Self, DeckError> {
        let trimmed = raw.trim();
        if is_safe_segment(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(DeckError::InvalidId {
                id: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FolderId {
    type Error = DeckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<FolderId> for String {
    fn from(value: FolderId) -> Self {
        value.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deck identifier as upstream sends it: usually a number, sometimes a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeckId {
    Number(u64),
    Text(String),
}

impl DeckId {
    /// Reads an id from upstream JSON. Any scalar is kept; numbers that are not
    /// plain `u64` are stringified. `None` only for null, arrays and objects.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => Some(
                n.as_u64()
                    .map_or_else(|| Self::Text(n.to_string()), Self::Number),
            ),
            serde_json::Value::String(s) => Some(Self::Text(s.trim().to_string())),
            serde_json::Value::Bool(b) => Some(Self::Text(b.to_string())),
            _ => None,
        }
    }

    /// The id percent-encoded for use as a single URL path segment.
    pub fn path_segment(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => utf8_percent_encode(s, PATH_SEGMENT).to_string(),
        }
    }

    /// Validates a deck id taken from a request path.
    pub fn parse(raw: &str) -> Result<Self, DeckError> {
        let trimmed = raw.trim();
        if !is_safe_segment(trimmed) {
            return Err(DeckError::InvalidId {
                id: raw.to_string(),
            });
        }
        Ok(match trimmed.parse::<u64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(trimmed.to_string()),
        })
    }
}

impl fmt::Display for DeckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn is_safe_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
