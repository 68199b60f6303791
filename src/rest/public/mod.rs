//! Public REST API endpoints (no authentication required).

mod types;

pub use types::*;

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::YobitError;
use crate::rest::PublicApiClient;
use crate::rest::endpoints::public;
use crate::types::CurrencyPair;

impl PublicApiClient {
    /// Get server time and the limits of every pair.
    pub async fn get_info(&self) -> Result<ExchangeInfo, YobitError> {
        self.get(public::INFO).await
    }

    /// Get order books for several pairs, keyed by pair name.
    pub async fn get_depths(
        &self,
        pairs: &[CurrencyPair],
    ) -> Result<HashMap<String, OrderBook>, YobitError> {
        self.get(&pairs_path(public::DEPTH, pairs)?).await
    }

    /// Get the order book of one pair.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use yobit_api_client::rest::PublicApiClient;
    /// use yobit_api_client::types::CurrencyPair;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = PublicApiClient::new();
    ///     let book = client.get_depth(&"ltc_btc".parse::<CurrencyPair>()?).await?;
    ///     if let Some(best) = book.asks.first() {
    ///         println!("Best ask: {} x {}", best.price, best.amount);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_depth(&self, pair: &CurrencyPair) -> Result<OrderBook, YobitError> {
        let books = self.get_depths(std::slice::from_ref(pair)).await?;
        single(books, pair)
    }

    /// Get recent trades for several pairs, keyed by pair name.
    pub async fn get_trades(
        &self,
        pairs: &[CurrencyPair],
    ) -> Result<HashMap<String, Vec<PublicTrade>>, YobitError> {
        self.get(&pairs_path(public::TRADES, pairs)?).await
    }

    /// Get recent trades of one pair.
    pub async fn get_trade(&self, pair: &CurrencyPair) -> Result<Vec<PublicTrade>, YobitError> {
        let trades = self.get_trades(std::slice::from_ref(pair)).await?;
        single(trades, pair)
    }

    /// Get tickers for several pairs, keyed by pair name.
    pub async fn get_tickers(
        &self,
        pairs: &[CurrencyPair],
    ) -> Result<HashMap<String, Ticker>, YobitError> {
        self.get(&pairs_path(public::TICKER, pairs)?).await
    }

    /// Get the ticker of one pair.
    pub async fn get_ticker(&self, pair: &CurrencyPair) -> Result<Ticker, YobitError> {
        let tickers = self.get_tickers(std::slice::from_ref(pair)).await?;
        single(tickers, pair)
    }

    /// Fetch any public path and decode it as `T`.
    pub async fn get_raw<T: DeserializeOwned>(&self, path: &str) -> Result<T, YobitError> {
        self.get(path).await
    }
}

/// `depth/ltc_btc-eth_btc`
fn pairs_path(endpoint: &str, pairs: &[CurrencyPair]) -> Result<String, YobitError> {
    if pairs.is_empty() {
        return Err(YobitError::InvalidRequest(format!(
            "{endpoint} needs at least one pair"
        )));
    }
    Ok(format!("{endpoint}/{}", CurrencyPair::join(pairs)))
}

fn single<T>(mut by_pair: HashMap<String, T>, pair: &CurrencyPair) -> Result<T, YobitError> {
    let name = pair.to_string();
    by_pair.remove(&name).ok_or_else(|| YobitError::BadResponse {
        body: format!("response has no entry for {name}"),
    })
}
