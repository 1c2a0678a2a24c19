use crate::{Bracket, ColorIdentity, DeckId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DECK_URL_BASE: &str = "https://archidekt.com/decks/";

/// Normalized deck record. Everything downstream of the extractor works on
/// this shape, never on upstream JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: DeckId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "edhBracket", alias = "bracket", default)]
    pub bracket: Bracket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorIdentity>,
}

impl Deck {
    pub fn new(id: DeckId, name: impl Into<String>, bracket: Bracket) -> Self {
        Self {
            id,
            name: name.into(),
            bracket,
            colors: None,
        }
    }

    pub fn url(&self) -> String {
        format!("{DECK_URL_BASE}{}", self.id.path_segment())
    }

    pub fn has_bracket(&self) -> bool {
        self.bracket.is_rated()
    }
}

/// Projects one raw upstream record onto [`Deck`].
///
/// Returns `None` only when the record has no id at all (the key is missing,
/// null, or the record is not an object), since the deck URL cannot be built
/// without one. Other ids are kept whatever their shape. A missing name becomes
/// an empty string and a missing bracket becomes [`Bracket::NotFound`].
pub fn normalize_deck(raw: &Value) -> Option<Deck> {
    let id = raw.get("id").and_then(DeckId::from_value)?;
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    Some(Deck {
        id,
        name: name.to_string(),
        bracket: Bracket::from_raw(raw),
        colors: raw.get("colors").and_then(ColorIdentity::from_raw),
    })
}

/// Normalizes every record, keeping upstream order. The second value counts
/// records that had to be skipped.
pub fn normalize_decks(raw: &[Value]) -> (Vec<Deck>, usize) {
    let decks: Vec<Deck> = raw.iter().filter_map(normalize_deck).collect();
    let skipped = raw.len() - decks.len();
    (decks, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_full_record() {
        let raw = json!({
            "id": 9001,
            "name": " Atraxa Superfriends ",
            "edhBracket": 4,
            "colors": {"W": 10, "U": 8, "B": 7, "R": 0, "G": 9},
            "owner": {"username": "ignored"}
        });
        let deck = normalize_deck(&raw).expect("deck");
        assert_eq!(deck.id, DeckId::Number(9001));
        assert_eq!(deck.name, "Atraxa Superfriends");
        assert_eq!(deck.bracket, Bracket::rated("4"));
        assert_eq!(deck.url(), "https://archidekt.com/decks/9001");
        assert_eq!(deck.colors.map(|c| c.symbols()), Some("WUBG".to_string()));
    }

    #[test]
    fn sparse_record_still_normalizes() {
        let deck = normalize_deck(&json!({"id": "abc"})).expect("deck");
        assert_eq!(deck.name, "");
        assert_eq!(deck.bracket, Bracket::NotFound);
        assert!(deck.colors.is_none());
        assert!(!deck.has_bracket());
    }

    #[test]
    fn only_records_without_id_are_skipped() {
        let raw = vec![
            json!({"name": "orphan", "edhBracket": "3"}),
            json!(17),
            json!({"id": 1.5, "name": "float id", "edhBracket": "2"}),
            json!({"id": "a b", "name": "spaced id"}),
            json!({"id": 1, "name": "ok"}),
        ];
        let (decks, skipped) = normalize_decks(&raw);
        assert_eq!(skipped, 2);
        let names: Vec<&str> = decks.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["float id", "spaced id", "ok"]);
        assert_eq!(decks[0].bracket, Bracket::rated("2"));
        assert_eq!(decks[0].url(), "https://archidekt.com/decks/1.5");
        assert_eq!(decks[1].url(), "https://archidekt.com/decks/a%20b");
    }

    #[test]
    fn wire_shape_uses_edh_bracket_key() {
        let deck = Deck::new(DeckId::Number(5), "Krenko", Bracket::NotFound);
        let json = serde_json::to_value(&deck).expect("ser");
        assert_eq!(json, json!({"id": 5, "name": "Krenko", "edhBracket": "Not Found"}));
        let back: Deck = serde_json::from_value(json).expect("de");
        assert_eq!(back, deck);
    }
}
