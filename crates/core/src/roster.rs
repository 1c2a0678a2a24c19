use crate::{DeckError, FolderId};
use std::collections::BTreeMap;

/// Static mapping from player name to the folder that holds their decks.
/// Names are stored and looked up trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    players: BTreeMap<String, FolderId>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, player: &str, folder: FolderId) -> Option<FolderId> {
        self.players.insert(player_key(player), folder)
    }

    pub fn with(mut self, player: &str, folder: FolderId) -> Self {
        self.insert(player, folder);
        self
    }

    pub fn resolve(&self, player: &str) -> Result<&FolderId, DeckError> {
        self.players
            .get(&player_key(player))
            .ok_or_else(|| DeckError::UnknownPlayer {
                player: player.to_string(),
            })
    }

    pub fn players(&self) -> impl Iterator<Item = (&str, &FolderId)> {
        self.players.iter().map(|(name, folder)| (name.as_str(), folder))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

fn player_key(player: &str) -> String {
    player.trim().to_lowercase()
}
