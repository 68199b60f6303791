//! Types for public REST API endpoints.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_with::{BoolFromInt, TimestampSeconds, serde_as};
use time::OffsetDateTime;

use crate::types::BookSide;

/// Exchange info: server time and per-pair limits.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    /// Server time.
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub server_time: OffsetDateTime,
    /// Limits keyed by pair name (`ltc_btc`).
    #[serde(default)]
    pub pairs: HashMap<String, PairInfo>,
}

/// Trading limits of one pair.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct PairInfo {
    /// Decimal places allowed for prices.
    pub decimal_places: u32,
    /// Minimum allowed price.
    pub min_price: Decimal,
    /// Maximum allowed price.
    pub max_price: Decimal,
    /// Minimum order amount.
    pub min_amount: Decimal,
    /// Minimum order total.
    #[serde(default)]
    pub min_total: Option<Decimal>,
    /// Whether the pair is hidden.
    #[serde_as(as = "BoolFromInt")]
    #[serde(default)]
    pub hidden: bool,
    /// Fee in percent.
    pub fee: Decimal,
    /// Buyer fee in percent.
    #[serde(default)]
    pub fee_buyer: Option<Decimal>,
    /// Seller fee in percent.
    #[serde(default)]
    pub fee_seller: Option<Decimal>,
}

/// One order book level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "(Decimal, Decimal)")]
pub struct PriceLevel {
    /// Price.
    pub price: Decimal,
    /// Amount at this price.
    pub amount: Decimal,
}

impl From<(Decimal, Decimal)> for PriceLevel {
    fn from((price, amount): (Decimal, Decimal)) -> Self {
        Self { price, amount }
    }
}

/// Order book of one pair.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderBook {
    /// Sell orders, cheapest first.
    #[serde(default)]
    pub asks: Vec<PriceLevel>,
    /// Buy orders, most expensive first.
    #[serde(default)]
    pub bids: Vec<PriceLevel>,
}

/// One public trade.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct PublicTrade {
    /// Book side the trade executed against.
    #[serde(rename = "type")]
    pub side: BookSide,
    pub price: Decimal,
    pub amount: Decimal,
    /// Trade id.
    pub tid: u64,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub timestamp: OffsetDateTime,
}

/// 24h ticker of one pair.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    pub high: Decimal,
    pub low: Decimal,
    pub avg: Decimal,
    /// Volume in the quote currency.
    pub vol: Decimal,
    /// Volume in the base currency.
    pub vol_cur: Decimal,
    /// Last trade price.
    pub last: Decimal,
    /// Best bid.
    pub buy: Decimal,
    /// Best ask.
    pub sell: Decimal,
    /// Time of the last update.
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub updated: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_info_deserialization() {
        let json = r#"{
            "server_time": 1418654531,
            "pairs": {
                "ltc_btc": {
                    "decimal_places": 8,
                    "min_price": 0.00000001,
                    "max_price": 10000,
                    "min_amount": 0.0001,
                    "hidden": 0,
                    "fee": 0.2
                }
            }
        }"#;
        let info: ExchangeInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.server_time.unix_timestamp(), 1_418_654_531);
        let pair = &info.pairs["ltc_btc"];
        assert_eq!(pair.min_price, dec!(0.00000001));
        assert_eq!(pair.fee, dec!(0.2));
        assert!(!pair.hidden);
        assert_eq!(pair.min_total, None);
    }

    #[test]
    fn test_order_book_levels() {
        let json = r#"{"asks":[[0.0234,12.5],[0.0235,1]],"bids":[[0.0233,4.1]]}"#;
        let book: OrderBook = serde_json::from_str(json).unwrap();
        assert_eq!(
            book.asks[0],
            PriceLevel {
                price: dec!(0.0234),
                amount: dec!(12.5)
            }
        );
        assert_eq!(book.bids.len(), 1);
    }

    #[test]
    fn test_trade_and_ticker() {
        let trade: PublicTrade = serde_json::from_str(
            r#"{"type":"bid","price":0.0231,"amount":0.7,"tid":41234567,"timestamp":1418654531}"#,
        )
        .unwrap();
        assert_eq!(trade.side, BookSide::Bid);
        assert_eq!(trade.tid, 41_234_567);

        let ticker: Ticker = serde_json::from_str(
            r#"{"high":0.024,"low":0.022,"avg":0.023,"vol":151.2,"vol_cur":6543.1,
                "last":0.0231,"buy":0.0230,"sell":0.0232,"updated":1418654531}"#,
        )
        .unwrap();
        assert_eq!(ticker.last, dec!(0.0231));
        assert_eq!(ticker.updated.unix_timestamp(), 1_418_654_531);
    }
}
