use serde::{Deserialize, Serialize};
use serde_json::Value;

/// WUBRG colour identity, each entry 0 or 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorIdentity {
    #[serde(rename = "W", default)]
    pub white: u8,
    #[serde(rename = "U", default)]
    pub blue: u8,
    #[serde(rename = "B", default)]
    pub black: u8,
    #[serde(rename = "R", default)]
    pub red: u8,
    #[serde(rename = "G", default)]
    pub green: u8,
}

impl ColorIdentity {
    pub const LETTERS: [char; 5] = ['W', 'U', 'B', 'R', 'G'];

    /// Reads a raw `colors` field: either an object of per-colour counts or an
    /// array of letters / colour names. Anything else yields `None`.
    pub fn from_raw(value: &Value) -> Option<Self> {
        let mut colors = Self::default();
        match value {
            Value::Object(map) => {
                for (key, count) in map {
                    let present = match count {
                        Value::Number(n) => n.as_f64().is_some_and(|n| n > 0.0),
                        Value::Bool(flag) => *flag,
                        _ => false,
                    };
                    if present {
                        colors.mark(key);
                    }
                }
            }
            Value::Array(items) => {
                for item in items.iter().filter_map(Value::as_str) {
                    colors.mark(item);
                }
            }
            _ => return None,
        }
        Some(colors)
    }

    /// Accepts `"W"`, `"w"`, `"White"`; unknown names are ignored.
    pub fn mark(&mut self, name: &str) {
        let slot = match name.trim().to_ascii_lowercase().as_str() {
            "w" | "white" => &mut self.white,
            "u" | "blue" => &mut self.blue,
            "b" | "black" => &mut self.black,
            "r" | "red" => &mut self.red,
            "g" | "green" => &mut self.green,
            _ => return,
        };
        *slot = 1;
    }

    pub fn is_colorless(&self) -> bool {
        *self == Self::default()
    }

    /// Compact `"WUG"` form; `"C"` for colourless.
    pub fn symbols(&self) -> String {
        let flags = [self.white, self.blue, self.black, self.red, self.green];
        let out: String = Self::LETTERS
            .iter()
            .zip(flags)
            .filter(|(_, flag)| *flag == 1)
            .map(|(letter, _)| *letter)
            .collect();
        if out.is_empty() {
            "C".to_string()
        } else {
            out
        }
    }
}

/// Colour identity of a deck detail document, taken from the cards filed
/// under the `Commander` category.
pub fn commander_colors(detail: &Value) -> ColorIdentity {
    let mut colors = ColorIdentity::default();
    let Some(cards) = detail.get("cards").and_then(Value::as_array) else {
        return colors;
    };
    let commanders = cards.iter().filter(|card| {
        card.get("categories")
            .and_then(Value::as_array)
            .is_some_and(|cats| cats.iter().any(|c| c.as_str() == Some("Commander")))
    });
    for card in commanders {
        let identity = card
            .pointer("/card/oracleCard/colorIdentity")
            .and_then(Value::as_array);
        for name in identity.into_iter().flatten().filter_map(Value::as_str) {
            colors.mark(name);
        }
    }
    colors
}
