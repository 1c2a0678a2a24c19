use anyhow::Context;
use clap::{Parser, Subcommand};
use deckpick_core::{
    commander_colors, organize_by_bracket, pick_random, DeckError, DeckId, DeckSelector, RngState,
};
use deckpick_cli::{
    bracket_lines, colors_line, deck_line, error_line, roster_lines, HttpRelayClient, Shell,
    DEFAULT_RELAY_URL,
};
use deckpick_data::load_roster_or_default;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "deckpick", about = "Reveal a random deck from a player's bracket")]
struct Cli {
    /// Base URL of the relay service.
    #[arg(long, env = "DECKPICK_RELAY", default_value = DEFAULT_RELAY_URL)]
    relay: String,
    /// Roster file mapping players to folder ids; the built-in roster is used
    /// when omitted.
    #[arg(long, env = "DECKPICK_ROSTER")]
    roster: Option<PathBuf>,
    /// Seed for reproducible picks.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List known players.
    Players,
    /// Show how many decks a player has per bracket.
    Brackets { player: String },
    /// Reveal a random deck from one bracket.
    Pick { player: String, bracket: String },
    /// Colour identity of a deck, from its commanders.
    Colors { deck: String },
    /// Interactive session.
    Shell,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        match err.downcast_ref::<DeckError>() {
            Some(deck_err) => eprintln!("error: {}", error_line(deck_err)),
            None => eprintln!("error: {err:#}"),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let roster = load_roster_or_default(cli.roster.as_deref())?;
    let client = HttpRelayClient::new(&cli.relay).context("build relay client")?;
    let mut rng = cli.seed.map_or_else(RngState::from_entropy, RngState::from_seed);
    info!(relay = client.base(), seed = rng.seed(), "starting");
    let selector = DeckSelector::new(roster, client);

    match cli.command {
        Command::Players => {
            for line in roster_lines(selector.roster()) {
                println!("{line}");
            }
        }
        Command::Brackets { player } => {
            let decks = selector.load_decks(&player)?;
            for line in bracket_lines(&organize_by_bracket(&decks)) {
                println!("{line}");
            }
        }
        Command::Pick { player, bracket } => {
            let decks = selector.load_decks(&player)?;
            let buckets = organize_by_bracket(&decks);
            match pick_random(&bracket, &buckets, &mut rng) {
                Some(deck) => println!("{}", deck_line(deck)),
                None => {
                    let available = buckets.sorted_labels().join(", ");
                    anyhow::bail!("{player} has no decks in bracket {bracket} (has: {available})");
                }
            }
        }
        Command::Colors { deck } => {
            let deck = DeckId::parse(&deck)?;
            let detail = selector.source().fetch_deck_detail(&deck)?;
            println!("{}", colors_line(&commander_colors(&detail)));
        }
        Command::Shell => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            Shell::new(selector, rng).run(stdin.lock(), &mut stdout)?;
        }
    }
    Ok(())
}
