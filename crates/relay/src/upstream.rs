use crate::RelayConfig;
use deckpick_core::DeckError;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use std::time::Duration;

/// A fully read upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound GET. Transport failures (connect errors, timeouts) come back as
/// `UpstreamUnavailable` without a status.
pub trait Upstream: Send + Sync {
    fn get(&self, url: &str) -> Result<UpstreamResponse, DeckError>;
}

pub struct HttpUpstream {
    client: Client,
    timeout: Duration,
}

impl HttpUpstream {
    pub fn new(config: &RelayConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> DeckError {
        if err.is_timeout() {
            DeckError::upstream(None, format!("timed out after {}s", self.timeout.as_secs()))
        } else {
            DeckError::upstream(None, err.to_string())
        }
    }
}

impl Upstream for HttpUpstream {
    fn get(&self, url: &str) -> Result<UpstreamResponse, DeckError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html,application/json;q=0.9,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .map_err(|err| self.transport_error(err))?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|err| self.transport_error(err))?;
        Ok(UpstreamResponse { status, body })
    }
}
