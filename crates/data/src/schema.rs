use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// On-disk roster: player name to upstream folder id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterFile {
    pub players: BTreeMap<String, String>,
}
