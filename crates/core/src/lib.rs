//! Deck model, upstream normalization and random selection. Keep this crate
//! free of IO and platform concerns.

pub mod bracket;
pub mod colors;
pub mod deck;
pub mod error;
pub mod ids;
pub mod rng;
pub mod roster;
pub mod schema;
pub mod selector;
pub mod session;

pub use bracket::*;
pub use colors::*;
pub use deck::*;
pub use error::*;
pub use ids::*;
pub use rng::*;
pub use roster::*;
pub use schema::*;
pub use selector::*;
pub use session::*;
