//! YoBit REST API clients.
//!
//! [`PublicApiClient`] covers the unsigned market-data API and
//! [`TradeApiClient`] the signed trade API. Both run every call through a
//! [`RequestExecutor`], which recovers from anti-bot challenges, blocks and
//! rejected nonces before giving up.

mod classify;
mod client;
mod endpoints;
mod executor;
pub mod public;
pub mod trade;
mod traits;

pub use classify::{Classification, Endpoint, classify};
pub use client::{ClientBuilder, Public, PublicApiClient, Trade, TradeApiClient};
pub use endpoints::*;
pub use executor::{CallState, RecoveryBudget, RequestExecutor, Step};
pub use traits::{PublicApi, TradeApi};
