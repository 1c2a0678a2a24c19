//! Deck selector front end: relay client, output formatting and the
//! interactive shell.

pub mod client;
pub mod report;
pub mod shell;

pub use client::*;
pub use report::*;
pub use shell::*;
