use deckpick_core::{Deck, DeckError, DeckId, DeckSource, ErrorBody, FolderId};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_RELAY_URL: &str = "http://localhost:3000";

/// Longer than the relay's own upstream timeout so its answer gets through.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct FolderEnvelope {
    decks: Vec<Deck>,
}

/// Talks to a running relay over HTTP. Relay errors are read back into the
/// same [`DeckError`] variant the relay reported.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    base: String,
    client: Client,
}

impl HttpRelayClient {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(CLIENT_TIMEOUT).build()?;
        Ok(Self::with_client(base, client))
    }

    pub fn with_client(base: &str, client: Client) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Raw upstream detail document for one deck.
    pub fn fetch_deck_detail(&self, deck: &DeckId) -> Result<Value, DeckError> {
        self.get_json(&format!("/api/decks/{}", deck.path_segment()))
    }

    fn get_json(&self, path: &str) -> Result<Value, DeckError> {
        let url = format!("{}{path}", self.base);
        debug!(url = %url, "relay request");
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| DeckError::upstream(None, format!("relay unreachable: {err}")))?;
        let status = response.status();
        let body = response
            .text()
            .map_err(|err| DeckError::upstream(None, format!("relay response cut off: {err}")))?;
        if status.is_success() {
            return serde_json::from_str(&body).map_err(|err| DeckError::MalformedPayload {
                message: err.to_string(),
                preview: body.chars().take(120).collect(),
            });
        }
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error) => Err(error.detail),
            Err(_) => Err(DeckError::upstream(
                Some(status.as_u16()),
                format!("relay returned HTTP {}", status.as_u16()),
            )),
        }
    }
}

impl DeckSource for HttpRelayClient {
    fn fetch_folder(&self, folder: &FolderId) -> Result<Vec<Deck>, DeckError> {
        let body = self.get_json(&format!("/api/folders/{folder}"))?;
        let envelope: FolderEnvelope =
            serde_json::from_value(body).map_err(|err| DeckError::MalformedPayload {
                message: format!("folder response: {err}"),
                preview: String::new(),
            })?;
        Ok(envelope.decks)
    }
}
