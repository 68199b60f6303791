//! Anti-bot session state.
//!
//! The exchange's protection layer hands out clearance cookies once a
//! challenge is solved. They are replayed on every request and persisted per
//! credential identity so a restart does not force a new solve.

mod cookie;
mod store;

pub use cookie::{Cookie, Session};
pub(crate) use cookie::parse_http_date;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
