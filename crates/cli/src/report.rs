use deckpick_core::{BracketBuckets, ColorIdentity, Deck, DeckError, Roster};

pub fn deck_line(deck: &Deck) -> String {
    let mut line = format!("{} (bracket {}) {}", deck.name, deck.bracket, deck.url());
    if let Some(colors) = deck.colors {
        line.push_str(&format!(" [{}]", colors.symbols()));
    }
    line
}

/// One line per bracket, in display order.
pub fn bracket_lines(buckets: &BracketBuckets) -> Vec<String> {
    buckets
        .sorted_labels()
        .into_iter()
        .map(|label| {
            let count = buckets.get(label).map_or(0, <[Deck]>::len);
            let noun = if count == 1 { "deck" } else { "decks" };
            format!("bracket {label}: {count} {noun}")
        })
        .collect()
}

pub fn roster_lines(roster: &Roster) -> Vec<String> {
    roster
        .players()
        .map(|(player, folder)| format!("{player} -> folder {folder}"))
        .collect()
}

pub fn colors_line(colors: &ColorIdentity) -> String {
    format!(
        "{} (W={} U={} B={} R={} G={})",
        colors.symbols(),
        colors.white,
        colors.blue,
        colors.black,
        colors.red,
        colors.green
    )
}

pub fn error_line(err: &DeckError) -> String {
    format!("{err} [{}]", err.kind().id())
}
