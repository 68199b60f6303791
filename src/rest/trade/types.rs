//! Types for signed trade API methods.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{BoolFromInt, TimestampSeconds, serde_as};
use time::OffsetDateTime;

use crate::types::{OrderStatus, TradeType};

/// Balances keyed by lowercase currency code.
pub type Funds = HashMap<String, Decimal>;

/// Account balances and key permissions (`getInfo`).
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    /// Available balances.
    #[serde(default)]
    pub funds: Funds,
    /// Balances including amounts held by open orders.
    #[serde(default)]
    pub funds_incl_orders: Funds,
    /// Permissions of the API key.
    pub rights: Rights,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub open_orders: u64,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub server_time: OffsetDateTime,
}

/// Permissions granted to an API key.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rights {
    #[serde_as(as = "BoolFromInt")]
    pub info: bool,
    #[serde_as(as = "BoolFromInt")]
    pub trade: bool,
    #[serde_as(as = "BoolFromInt")]
    #[serde(default)]
    pub deposit: bool,
    #[serde_as(as = "BoolFromInt")]
    #[serde(default)]
    pub withdraw: bool,
}

/// An open order (`ActiveOrders`).
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct ActiveOrder {
    pub pair: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Remaining amount.
    pub amount: Decimal,
    pub rate: Decimal,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub timestamp_created: OffsetDateTime,
    pub status: OrderStatus,
}

/// Outcome of placing an order (`Trade`).
#[derive(Debug, Clone, Deserialize)]
pub struct TradeResult {
    /// Amount filled immediately.
    pub received: Decimal,
    /// Amount left on the book.
    pub remains: Decimal,
    /// Id of the resting order, 0 when it filled completely.
    pub order_id: u64,
    /// Balances after the trade.
    #[serde(default)]
    pub funds: Funds,
}

/// Outcome of cancelling an order (`CancelOrder`).
#[derive(Debug, Clone, Deserialize)]
pub struct CancelResult {
    pub order_id: u64,
    /// Balances after the cancellation.
    #[serde(default)]
    pub funds: Funds,
}

/// Details of one order (`OrderInfo`).
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct OrderInfo {
    pub pair: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    /// Amount when the order was placed.
    pub start_amount: Decimal,
    /// Remaining amount.
    pub amount: Decimal,
    pub rate: Decimal,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub timestamp_created: OffsetDateTime,
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_account_info_deserialization() {
        let json = r#"{
            "funds": {"ltc": 22, "btc": 0.0012},
            "funds_incl_orders": {"ltc": 32, "btc": 0.0012},
            "rights": {"info": 1, "trade": 0, "deposit": 1, "withdraw": 0},
            "transaction_count": 0,
            "open_orders": 1,
            "server_time": 1418654530
        }"#;
        let info: AccountInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.funds["btc"], dec!(0.0012));
        assert_eq!(info.funds_incl_orders["ltc"], dec!(32));
        assert!(info.rights.info);
        assert!(!info.rights.trade);
        assert_eq!(info.open_orders, 1);
    }

    #[test]
    fn test_active_orders_keyed_by_id() {
        let json = r#"{
            "100025362": {
                "pair": "ltc_btc",
                "type": "sell",
                "amount": 21.615,
                "rate": 0.258,
                "timestamp_created": 1418654530,
                "status": 0
            }
        }"#;
        let orders: HashMap<u64, ActiveOrder> = serde_json::from_str(json).unwrap();
        let order = &orders[&100_025_362];
        assert_eq!(order.trade_type, TradeType::Sell);
        assert_eq!(order.rate, dec!(0.258));
        assert_eq!(order.status, OrderStatus::Active);
    }

    #[test]
    fn test_trade_and_cancel_results() {
        let trade: TradeResult = serde_json::from_str(
            r#"{"received":0.1,"remains":0,"order_id":0,"funds":{"btc":15,"ltc":51.82}}"#,
        )
        .unwrap();
        assert_eq!(trade.received, dec!(0.1));
        assert_eq!(trade.order_id, 0);

        let cancel: CancelResult =
            serde_json::from_str(r#"{"order_id":100025362,"funds":{"btc":15}}"#).unwrap();
        assert_eq!(cancel.order_id, 100_025_362);
    }

    #[test]
    fn test_order_info() {
        let json = r#"{"pair":"ltc_btc","type":"buy","start_amount":13.345,"amount":12.345,
            "rate":485,"timestamp_created":1418654530,"status":3}"#;
        let info: OrderInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.start_amount, dec!(13.345));
        assert_eq!(info.status, OrderStatus::PartiallyFilledCanceled);
    }
}
