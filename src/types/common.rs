//! Common domain types for the YoBit API.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::YobitError;

/// A currency pair such as `ltc_btc`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    /// Base currency
    pub from: String,
    /// Quote currency
    pub to: String,
}

impl CurrencyPair {
    /// Create a pair from its two currencies.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Join pairs for multi-pair endpoints: `ltc_btc-eth_btc`.
    pub fn join(pairs: &[CurrencyPair]) -> String {
        pairs
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.from, self.to)
    }
}

impl FromStr for CurrencyPair {
    type Err = YobitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('_') {
            Some((from, to)) if !from.is_empty() && !to.is_empty() => Ok(Self::new(from, to)),
            _ => Err(YobitError::InvalidRequest(format!(
                "currency pair must look like `from_to`, got `{s}`"
            ))),
        }
    }
}

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::Buy => write!(f, "buy"),
            TradeType::Sell => write!(f, "sell"),
        }
    }
}

/// Side of the book a public trade executed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Trade hit the ask
    Ask,
    /// Trade hit the bid
    Bid,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum OrderStatus {
    /// Order is open
    Active,
    /// Order was filled completely
    Filled,
    /// Order was canceled without fills
    Canceled,
    /// Order was canceled after a partial fill
    PartiallyFilledCanceled,
}

impl TryFrom<u8> for OrderStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Active),
            1 => Ok(Self::Filled),
            2 => Ok(Self::Canceled),
            3 => Ok(Self::PartiallyFilledCanceled),
            other => Err(format!("unknown order status {other}")),
        }
    }
}
