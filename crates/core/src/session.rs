//! Per-player selection session: `Idle -> Loading -> Ready | Failed`.
//!
//! A session is replaced wholesale on every player switch. Each load gets a
//! [`LoadTicket`]; results that arrive for an older ticket are dropped so a
//! slow response can never overwrite a newer player's decks.

use crate::{organize_by_bracket, pick_random, BracketBuckets, Deck, DeckError, RngState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Decks of the active player plus their buckets, derived together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSnapshot {
    pub player: String,
    pub decks: Vec<Deck>,
    pub buckets: BracketBuckets,
}

impl DeckSnapshot {
    pub fn new(player: impl Into<String>, decks: Vec<Deck>) -> Self {
        let buckets = organize_by_bracket(&decks);
        Self {
            player: player.into(),
            decks,
            buckets,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Loading {
        player: String,
    },
    Ready(DeckSnapshot),
    Failed {
        player: String,
        error: DeckError,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading { .. } => "loading",
            Self::Ready(_) => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    generation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Drops whatever the previous player had and starts a new load.
    pub fn begin_load(&mut self, player: &str) -> LoadTicket {
        self.generation += 1;
        self.state = SessionState::Loading {
            player: player.to_string(),
        };
        LoadTicket {
            generation: self.generation,
        }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.generation == self.generation && matches!(self.state, SessionState::Loading { .. })
    }

    /// Applies a load result. Returns `false` and leaves the session alone
    /// when the ticket was superseded or already completed.
    pub fn complete(&mut self, ticket: LoadTicket, result: Result<Vec<Deck>, DeckError>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        let SessionState::Loading { player } = std::mem::take(&mut self.state) else {
            return false;
        };
        self.state = match result {
            Ok(decks) => SessionState::Ready(DeckSnapshot::new(player, decks)),
            Err(error) => SessionState::Failed { player, error },
        };
        true
    }

    pub fn snapshot(&self) -> Option<&DeckSnapshot> {
        match &self.state {
            SessionState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn buckets(&self) -> Option<&BracketBuckets> {
        self.snapshot().map(|snapshot| &snapshot.buckets)
    }

    /// Random deck from the ready snapshot; `None` outside `Ready` or for an
    /// absent bracket.
    pub fn pick(&self, bracket: &str, rng: &mut RngState) -> Option<&Deck> {
        pick_random(bracket, self.buckets()?, rng)
    }
}
