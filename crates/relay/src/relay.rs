use crate::extract::{extract_folder, parse_payload};
use crate::{RelayConfig, Upstream};
use deckpick_core::{Deck, DeckError, DeckId, DeckSource, FolderId};
use serde_json::Value;
use tracing::{info, warn};

/// Stateless shape adapter between clients and the upstream site.
pub struct Relay<U> {
    upstream: U,
    config: RelayConfig,
}

impl<U: Upstream> Relay<U> {
    pub fn new(upstream: U, config: RelayConfig) -> Self {
        Self { upstream, config }
    }

    pub(crate) fn workers(&self) -> usize {
        self.config.workers.max(1)
    }

    /// Fetches the folder page and returns every deck on it, normalized but
    /// not filtered.
    pub fn fetch_folder(&self, folder: &FolderId) -> Result<Vec<Deck>, DeckError> {
        let url = self.config.folder_url(folder.as_str());
        let response = self.upstream.get(&url)?;
        if !response.is_success() {
            return Err(DeckError::upstream(
                Some(response.status),
                format!("folder {folder} returned HTTP {}", response.status),
            ));
        }
        let decks = extract_folder(&response.body).inspect_err(|err| {
            warn!(folder = %folder, kind = err.kind().id(), "folder extraction failed");
        })?;
        info!(folder = %folder, decks = decks.len(), "folder extracted");
        Ok(decks)
    }

    /// Upstream deck detail document, passed through once it parses as JSON.
    pub fn fetch_deck(&self, deck: &DeckId) -> Result<Value, DeckError> {
        let url = self.config.deck_api_url(&deck.path_segment());
        let response = self.upstream.get(&url)?;
        if !response.is_success() {
            return Err(DeckError::upstream(
                Some(response.status),
                format!("failed to fetch deck {deck}: HTTP {}", response.status),
            ));
        }
        parse_payload(&response.body)
    }
}

impl<U: Upstream> DeckSource for Relay<U> {
    fn fetch_folder(&self, folder: &FolderId) -> Result<Vec<Deck>, DeckError> {
        Relay::fetch_folder(self, folder)
    }
}
