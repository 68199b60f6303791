//! Signed trade API methods.
//!
//! Every call is signed and consumes a nonce, including retries.

mod types;

pub use types::*;

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::YobitError;
use crate::rest::TradeApiClient;
use crate::rest::endpoints::trade;
use crate::types::{CurrencyPair, RequestParams, TradeType};

impl TradeApiClient {
    /// Get balances and key permissions.
    pub async fn get_info(&self) -> Result<AccountInfo, YobitError> {
        self.post(trade::GET_INFO, RequestParams::new()).await
    }

    /// Get open orders for `pair`, keyed by order id.
    ///
    /// An account without open orders gets an empty map.
    pub async fn get_active_orders(
        &self,
        pair: &CurrencyPair,
    ) -> Result<HashMap<u64, ActiveOrder>, YobitError> {
        let params = RequestParams::new().with("pair", pair);
        self.post(trade::ACTIVE_ORDERS, params).await
    }

    /// Place a limit order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use yobit_api_client::auth::EnvCredentials;
    /// use yobit_api_client::rest::TradeApiClient;
    /// use yobit_api_client::types::{CurrencyPair, TradeType};
    /// use rust_decimal::Decimal;
    /// use std::str::FromStr;
    /// use std::sync::Arc;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let credentials = EnvCredentials::try_from_env().ok_or("missing keys")?;
    ///     let client = TradeApiClient::builder(Arc::new(credentials)).build();
    ///
    ///     let result = client
    ///         .trade(
    ///             &CurrencyPair::new("ltc", "btc"),
    ///             TradeType::Buy,
    ///             Decimal::from_str("0.0025")?,
    ///             Decimal::from_str("1.5")?,
    ///         )
    ///         .await?;
    ///     println!("Order {} received {}", result.order_id, result.received);
    ///     Ok(())
    /// }
    /// ```
    pub async fn trade(
        &self,
        pair: &CurrencyPair,
        trade_type: TradeType,
        rate: Decimal,
        amount: Decimal,
    ) -> Result<TradeResult, YobitError> {
        let params = RequestParams::new()
            .with("pair", pair)
            .with("type", trade_type)
            .with("rate", rate.normalize())
            .with("amount", amount.normalize());
        self.post(trade::TRADE, params).await
    }

    /// Cancel an open order.
    pub async fn cancel_order(&self, order_id: u64) -> Result<CancelResult, YobitError> {
        let params = RequestParams::new().with("order_id", order_id);
        self.post(trade::CANCEL_ORDER, params).await
    }

    /// Get the details of one order.
    pub async fn get_order_info(&self, order_id: u64) -> Result<OrderInfo, YobitError> {
        let params = RequestParams::new().with("order_id", order_id);
        let mut orders: HashMap<u64, OrderInfo> = self.post(trade::ORDER_INFO, params).await?;
        orders.remove(&order_id).ok_or_else(|| YobitError::BadResponse {
            body: format!("response has no entry for order {order_id}"),
        })
    }
}
