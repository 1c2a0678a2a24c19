use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

/// Wire spelling of a missing bracket.
pub const BRACKET_NOT_FOUND: &str = "Not Found";

/// Raw record keys that may hold the bracket, most recent upstream name first.
pub const BRACKET_KEYS: &[&str] = &["edhBracket", "bracket", "deckBracket"];

/// Difficulty tag of a deck. `NotFound` means the extractor looked and found
/// nothing usable; it is never defaulted into a real bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bracket {
    Rated(String),
    #[default]
    NotFound,
}

impl Bracket {
    pub fn rated(label: impl Into<String>) -> Self {
        Self::Rated(label.into())
    }

    /// First usable value under [`BRACKET_KEYS`] on a raw record.
    pub fn from_raw(record: &Value) -> Self {
        BRACKET_KEYS
            .iter()
            .filter_map(|key| record.get(*key))
            .find_map(label_of)
            .map(Self::Rated)
            .unwrap_or(Self::NotFound)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Rated(label) => Some(label),
            Self::NotFound => None,
        }
    }

    pub fn is_rated(&self) -> bool {
        matches!(self, Self::Rated(_))
    }
}

// Strings and numbers count; null, empty strings and the sentinel do not.
fn label_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty() && s != BRACKET_NOT_FOUND).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or(BRACKET_NOT_FOUND))
    }
}

impl Serialize for Bracket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label().unwrap_or(BRACKET_NOT_FOUND))
    }
}

impl<'de> Deserialize<'de> for Bracket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(label_of)
            .map(Self::Rated)
            .unwrap_or(Self::NotFound))
    }
}
