use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure the relay or the selector can report.
///
/// The enum is internally tagged so the relay can put it on the wire and the
/// client can read the same variant back; callers match on variants and never
/// on the display text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeckError {
    #[error("unknown player: {player}")]
    UnknownPlayer { player: String },
    #[error("invalid identifier: {id:?}")]
    InvalidId { id: String },
    #[error("upstream unavailable: {reason}")]
    UpstreamUnavailable {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
        reason: String,
    },
    #[error("embedded data block {marker} not found in upstream page")]
    ExtractionFailed { marker: String },
    #[error("malformed payload: {message} (near {preview:?})")]
    MalformedPayload { message: String, preview: String },
    #[error("no deck list at any known path (tried {})", .tried.join(", "))]
    SchemaMismatch { tried: Vec<String> },
    #[error("no decks with a bracket for player {player}")]
    NoUsableDecks { player: String },
}

/// Discriminant of [`DeckError`], for logging and exit-code decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownPlayer,
    InvalidId,
    UpstreamUnavailable,
    ExtractionFailed,
    MalformedPayload,
    SchemaMismatch,
    NoUsableDecks,
}

impl ErrorKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::UnknownPlayer => "unknown_player",
            Self::InvalidId => "invalid_id",
            Self::UpstreamUnavailable => "upstream_unavailable",
            Self::ExtractionFailed => "extraction_failed",
            Self::MalformedPayload => "malformed_payload",
            Self::SchemaMismatch => "schema_mismatch",
            Self::NoUsableDecks => "no_usable_decks",
        }
    }
}

impl DeckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownPlayer { .. } => ErrorKind::UnknownPlayer,
            Self::InvalidId { .. } => ErrorKind::InvalidId,
            Self::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            Self::ExtractionFailed { .. } => ErrorKind::ExtractionFailed,
            Self::MalformedPayload { .. } => ErrorKind::MalformedPayload,
            Self::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            Self::NoUsableDecks { .. } => ErrorKind::NoUsableDecks,
        }
    }

    pub fn upstream(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::UpstreamUnavailable {
            status,
            reason: reason.into(),
        }
    }

    /// HTTP status the relay answers with for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::UnknownPlayer { .. } | Self::NoUsableDecks { .. } => 404,
            Self::InvalidId { .. } => 400,
            Self::UpstreamUnavailable {
                status: Some(code), ..
            } if (400..600).contains(code) => *code,
            Self::UpstreamUnavailable { status: Some(_), .. } => 502,
            Self::UpstreamUnavailable { status: None, .. } => 504,
            Self::ExtractionFailed { .. }
            | Self::MalformedPayload { .. }
            | Self::SchemaMismatch { .. } => 502,
        }
    }
}

/// Error body the relay sends: a readable line plus the tagged error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(flatten)]
    pub detail: DeckError,
}

impl From<DeckError> for ErrorBody {
    fn from(detail: DeckError) -> Self {
        Self {
            error: detail.to_string(),
            detail,
        }
    }
}
