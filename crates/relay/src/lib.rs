//! Relay between deck clients and the upstream deck-building site: fetches
//! folder pages, pulls the embedded page data out of them and answers with
//! normalized decks.

pub mod config;
pub mod extract;
pub mod relay;
pub mod server;
pub mod upstream;

pub use config::*;
pub use extract::*;
pub use relay::*;
pub use server::*;
pub use upstream::*;
