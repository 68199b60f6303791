//! # YoBit Client
//!
//! An async Rust client for the YoBit exchange public and trade APIs.
//!
//! ## Features
//!
//! - Public market data: exchange info, order books, trades, tickers
//! - Signed trade API: balances, open orders, placing and cancelling orders
//! - Nonce counters persisted per key pair, safe across processes and restarts
//! - Recovery from anti-bot challenges through a pluggable challenge solver
//! - Session cookies persisted per key pair
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use yobit_api_client::rest::PublicApiClient;
//! use yobit_api_client::types::CurrencyPair;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PublicApiClient::new();
//!     let info = client.get_info().await?;
//!     println!("Server time: {}", info.server_time);
//!
//!     let pair = CurrencyPair::new("ltc", "btc");
//!     let book = client.get_depth(&pair).await?;
//!     println!("{pair}: {} asks, {} bids", book.asks.len(), book.bids.len());
//!     Ok(())
//! }
//! ```
//!
//! ## State
//!
//! Nonce counters and cookie jars live under `$YOBIT_STATE_DIR`, or `./.yobit`
//! when unset. Deleting a nonce file makes the exchange reject the key pair's
//! requests until the counter catches up again.

pub mod auth;
pub mod challenge;
pub mod error;
pub mod rest;
pub mod session;
pub mod state;
pub mod transport;
pub mod types;

// Re-export commonly used types at crate root
pub use error::YobitError;
pub use rest::{PublicApiClient, TradeApiClient};
pub use types::common::{CurrencyPair, OrderStatus, TradeType};

/// Result type alias using YobitError
pub type Result<T> = std::result::Result<T, YobitError>;
