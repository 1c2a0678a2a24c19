use crate::DeckError;
use serde_json::Value;

/// One known location of the deck array inside the embedded page data,
/// written as the sequence of object keys leading to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckPath {
    pub keys: &'static [&'static str],
}

impl DeckPath {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    pub fn resolve<'a>(&self, root: &'a Value) -> Option<&'a Vec<Value>> {
        self.keys
            .iter()
            .try_fold(root, |node, key| node.get(*key))?
            .as_array()
    }

    pub fn dotted(&self) -> String {
        self.keys.join(".")
    }
}

/// Known deck array locations, tried in order. When upstream moves the list
/// again, append a new entry instead of editing an old one.
pub const DECK_PATHS: &[DeckPath] = &[
    DeckPath::new(&["props", "pageProps", "folder", "decks"]),
    DeckPath::new(&["props", "pageProps", "user", "decks"]),
    DeckPath::new(&["props", "pageProps", "redux", "folders", "rootFolder", "decks"]),
];

/// First path in `paths` that leads to an array.
pub fn resolve_deck_array<'a>(
    root: &'a Value,
    paths: &[DeckPath],
) -> Result<(DeckPath, &'a [Value]), DeckError> {
    paths
        .iter()
        .find_map(|path| path.resolve(root).map(|decks| (*path, decks.as_slice())))
        .ok_or_else(|| DeckError::SchemaMismatch {
            tried: paths.iter().map(DeckPath::dotted).collect(),
        })
}
