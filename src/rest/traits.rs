//! Traits abstracting the YoBit REST clients.
//!
//! Code written against [`PublicApi`] or [`TradeApi`] can be driven by a mock
//! in tests or by a decorator wrapping the real client.
//!
//! ```rust,ignore
//! use yobit_api_client::rest::PublicApi;
//! use yobit_api_client::types::CurrencyPair;
//!
//! async fn spread<C: PublicApi>(client: &C) -> Result<(), yobit_api_client::YobitError> {
//!     let ticker = client.get_ticker(&CurrencyPair::new("ltc", "btc")).await?;
//!     println!("spread: {}", ticker.sell - ticker.buy);
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::future::Future;

use rust_decimal::Decimal;

use crate::error::YobitError;
use crate::rest::public::{ExchangeInfo, OrderBook, PublicTrade, Ticker};
use crate::rest::trade::{AccountInfo, ActiveOrder, CancelResult, OrderInfo, TradeResult};
use crate::rest::{PublicApiClient, TradeApiClient};
use crate::types::{CurrencyPair, TradeType};

/// Market-data operations.
pub trait PublicApi: Send + Sync {
    /// Get server time and pair limits.
    fn get_info(&self) -> impl Future<Output = Result<ExchangeInfo, YobitError>> + Send;

    /// Get order books keyed by pair name.
    fn get_depths(
        &self,
        pairs: &[CurrencyPair],
    ) -> impl Future<Output = Result<HashMap<String, OrderBook>, YobitError>> + Send;

    /// Get the order book of one pair.
    fn get_depth(
        &self,
        pair: &CurrencyPair,
    ) -> impl Future<Output = Result<OrderBook, YobitError>> + Send;

    /// Get recent trades keyed by pair name.
    fn get_trades(
        &self,
        pairs: &[CurrencyPair],
    ) -> impl Future<Output = Result<HashMap<String, Vec<PublicTrade>>, YobitError>> + Send;

    /// Get recent trades of one pair.
    fn get_trade(
        &self,
        pair: &CurrencyPair,
    ) -> impl Future<Output = Result<Vec<PublicTrade>, YobitError>> + Send;

    /// Get tickers keyed by pair name.
    fn get_tickers(
        &self,
        pairs: &[CurrencyPair],
    ) -> impl Future<Output = Result<HashMap<String, Ticker>, YobitError>> + Send;

    /// Get the ticker of one pair.
    fn get_ticker(
        &self,
        pair: &CurrencyPair,
    ) -> impl Future<Output = Result<Ticker, YobitError>> + Send;
}

/// Signed account and order operations.
pub trait TradeApi: Send + Sync {
    /// Get balances and key permissions.
    fn get_info(&self) -> impl Future<Output = Result<AccountInfo, YobitError>> + Send;

    /// Get open orders for a pair.
    fn get_active_orders(
        &self,
        pair: &CurrencyPair,
    ) -> impl Future<Output = Result<HashMap<u64, ActiveOrder>, YobitError>> + Send;

    /// Place a limit order.
    fn trade(
        &self,
        pair: &CurrencyPair,
        trade_type: TradeType,
        rate: Decimal,
        amount: Decimal,
    ) -> impl Future<Output = Result<TradeResult, YobitError>> + Send;

    /// Cancel an order.
    fn cancel_order(
        &self,
        order_id: u64,
    ) -> impl Future<Output = Result<CancelResult, YobitError>> + Send;

    /// Get the details of one order.
    fn get_order_info(
        &self,
        order_id: u64,
    ) -> impl Future<Output = Result<OrderInfo, YobitError>> + Send;
}

impl PublicApi for PublicApiClient {
    async fn get_info(&self) -> Result<ExchangeInfo, YobitError> {
        PublicApiClient::get_info(self).await
    }

    async fn get_depths(
        &self,
        pairs: &[CurrencyPair],
    ) -> Result<HashMap<String, OrderBook>, YobitError> {
        PublicApiClient::get_depths(self, pairs).await
    }

    async fn get_depth(&self, pair: &CurrencyPair) -> Result<OrderBook, YobitError> {
        PublicApiClient::get_depth(self, pair).await
    }

    async fn get_trades(
        &self,
        pairs: &[CurrencyPair],
    ) -> Result<HashMap<String, Vec<PublicTrade>>, YobitError> {
        PublicApiClient::get_trades(self, pairs).await
    }

    async fn get_trade(&self, pair: &CurrencyPair) -> Result<Vec<PublicTrade>, YobitError> {
        PublicApiClient::get_trade(self, pair).await
    }

    async fn get_tickers(
        &self,
        pairs: &[CurrencyPair],
    ) -> Result<HashMap<String, Ticker>, YobitError> {
        PublicApiClient::get_tickers(self, pairs).await
    }

    async fn get_ticker(&self, pair: &CurrencyPair) -> Result<Ticker, YobitError> {
        PublicApiClient::get_ticker(self, pair).await
    }
}

impl TradeApi for TradeApiClient {
    async fn get_info(&self) -> Result<AccountInfo, YobitError> {
        TradeApiClient::get_info(self).await
    }

    async fn get_active_orders(
        &self,
        pair: &CurrencyPair,
    ) -> Result<HashMap<u64, ActiveOrder>, YobitError> {
        TradeApiClient::get_active_orders(self, pair).await
    }

    async fn trade(
        &self,
        pair: &CurrencyPair,
        trade_type: TradeType,
        rate: Decimal,
        amount: Decimal,
    ) -> Result<TradeResult, YobitError> {
        TradeApiClient::trade(self, pair, trade_type, rate, amount).await
    }

    async fn cancel_order(&self, order_id: u64) -> Result<CancelResult, YobitError> {
        TradeApiClient::cancel_order(self, order_id).await
    }

    async fn get_order_info(&self, order_id: u64) -> Result<OrderInfo, YobitError> {
        TradeApiClient::get_order_info(self, order_id).await
    }
}
