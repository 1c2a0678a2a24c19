use crate::report::{bracket_lines, deck_line, error_line, roster_lines};
use deckpick_core::{
    Deck, DeckError, DeckSelector, DeckSource, LoadTicket, RngState, Session, SessionState,
};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::debug;

type LoadResult = (LoadTicket, Result<Vec<Deck>, DeckError>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Player(String),
    Brackets,
    Pick(String),
    Players,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> ShellCommand {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return ShellCommand::Empty;
    };
    let rest = parts.collect::<Vec<_>>().join(" ");
    match (head.to_ascii_lowercase().as_str(), rest.is_empty()) {
        ("player" | "p", false) => ShellCommand::Player(rest),
        ("pick" | "r", false) => ShellCommand::Pick(rest),
        ("brackets" | "b", true) => ShellCommand::Brackets,
        ("players" | "ls", true) => ShellCommand::Players,
        ("help" | "?", _) => ShellCommand::Help,
        ("quit" | "exit" | "q", _) => ShellCommand::Quit,
        _ => ShellCommand::Unknown(line.trim().to_string()),
    }
}

const HELP: &str = "commands:
  player <name>    load a player's decks (replaces the current player)
  brackets         list brackets of the current player
  pick <bracket>   reveal a random deck from a bracket
  players          list known players
  quit             leave";

/// Interactive selector. Loads run on worker threads; only the result of the
/// most recent `player` command is ever applied to the session.
pub struct Shell<S> {
    selector: Arc<DeckSelector<S>>,
    session: Session,
    rng: RngState,
    results_tx: Sender<LoadResult>,
    results_rx: Receiver<LoadResult>,
}

impl<S: DeckSource + Send + Sync + 'static> Shell<S> {
    pub fn new(selector: DeckSelector<S>, rng: RngState) -> Self {
        let (results_tx, results_rx) = mpsc::channel();
        Self {
            selector: Arc::new(selector),
            session: Session::new(),
            rng,
            results_tx,
            results_rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn run(&mut self, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{HELP}")?;
        for line in input.lines() {
            let line = line?;
            if !self.handle(parse_command(&line), out)? {
                break;
            }
        }
        Ok(())
    }

    /// Runs one command; `Ok(false)` means the shell should exit.
    pub fn handle(&mut self, command: ShellCommand, out: &mut impl Write) -> io::Result<bool> {
        self.drain_results(out)?;
        match command {
            ShellCommand::Player(player) => self.start_load(&player, out)?,
            ShellCommand::Brackets => {
                self.wait_for_load(out)?;
                match self.session.buckets() {
                    Some(buckets) => {
                        for line in bracket_lines(buckets) {
                            writeln!(out, "{line}")?;
                        }
                    }
                    None => writeln!(out, "no decks loaded")?,
                }
            }
            ShellCommand::Pick(bracket) => {
                self.wait_for_load(out)?;
                if self.session.snapshot().is_none() {
                    writeln!(out, "no decks loaded")?;
                } else {
                    match self.session.pick(&bracket, &mut self.rng) {
                        Some(deck) => writeln!(out, "{}", deck_line(deck))?,
                        None => writeln!(out, "no decks in bracket {bracket}")?,
                    }
                }
            }
            ShellCommand::Players => {
                for line in roster_lines(self.selector.roster()) {
                    writeln!(out, "{line}")?;
                }
            }
            ShellCommand::Help => writeln!(out, "{HELP}")?,
            ShellCommand::Quit => return Ok(false),
            ShellCommand::Empty => {}
            ShellCommand::Unknown(line) => writeln!(out, "unknown command: {line} (try help)")?,
        }
        Ok(true)
    }

    fn start_load(&mut self, player: &str, out: &mut impl Write) -> io::Result<()> {
        let ticket = self.session.begin_load(player);
        debug!(player, generation = ticket.generation(), "load started");
        let selector = Arc::clone(&self.selector);
        let tx = self.results_tx.clone();
        let player = player.to_string();
        thread::spawn(move || {
            let result = selector.load_decks(&player);
            let _ = tx.send((ticket, result));
        });
        writeln!(out, "loading decks...")
    }

    fn drain_results(&mut self, out: &mut impl Write) -> io::Result<()> {
        while let Ok((ticket, result)) = self.results_rx.try_recv() {
            self.apply(ticket, result, out)?;
        }
        Ok(())
    }

    /// Blocks while the current load is in flight.
    fn wait_for_load(&mut self, out: &mut impl Write) -> io::Result<()> {
        while matches!(self.session.state(), SessionState::Loading { .. }) {
            match self.results_rx.recv() {
                Ok((ticket, result)) => self.apply(ticket, result, out)?,
                Err(_) => break,
            }
        }
        Ok(())
    }

    fn apply(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Deck>, DeckError>,
        out: &mut impl Write,
    ) -> io::Result<()> {
        if !self.session.complete(ticket, result) {
            debug!(generation = ticket.generation(), "dropped superseded load");
            return Ok(());
        }
        match self.session.state() {
            SessionState::Ready(snapshot) => {
                let decks = snapshot.decks.len();
                let brackets = snapshot.buckets.len();
                writeln!(
                    out,
                    "{}: {decks} deck{} in {brackets} bracket{}",
                    snapshot.player,
                    if decks == 1 { "" } else { "s" },
                    if brackets == 1 { "" } else { "s" }
                )
            }
            SessionState::Failed { player, error } => {
                writeln!(out, "{player}: {}", error_line(error))
            }
            _ => Ok(()),
        }
    }
}
