use crate::schema::RosterFile;
use anyhow::{bail, Context};
use deckpick_core::{FolderId, Roster};
use std::fs;
use std::path::Path;

const DEFAULT_ROSTER_JSON: &str = include_str!("../assets/players.json");

/// Roster compiled into the binary.
pub fn default_roster() -> anyhow::Result<Roster> {
    parse_roster(DEFAULT_ROSTER_JSON).context("parse built-in roster")
}

pub fn load_roster(path: &Path) -> anyhow::Result<Roster> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_roster(&raw).with_context(|| format!("parse {}", path.display()))
}

/// Loads `path` when given, otherwise falls back to the built-in roster.
pub fn load_roster_or_default(path: Option<&Path>) -> anyhow::Result<Roster> {
    match path {
        Some(path) => load_roster(path),
        None => default_roster(),
    }
}

pub fn parse_roster(raw: &str) -> anyhow::Result<Roster> {
    let file: RosterFile = serde_json::from_str(raw)?;
    let mut roster = Roster::new();
    for (player, folder) in &file.players {
        if player.trim().is_empty() {
            bail!("empty player name for folder {folder}");
        }
        let folder =
            FolderId::parse(folder).with_context(|| format!("folder id of player {player}"))?;
        if roster.insert(player, folder).is_some() {
            bail!("player {player} listed twice (names are case-insensitive)");
        }
    }
    if roster.is_empty() {
        bail!("roster has no players");
    }
    Ok(roster)
}
