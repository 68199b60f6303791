//! YoBit REST API endpoint constants.

use std::time::Duration;

/// Base URL for the public market-data API.
pub const PUBLIC_BASE_URL: &str = "https://yobit.net/api/3/";

/// URL of the signed trade API.
pub const TRADE_BASE_URL: &str = "https://yobit.net/tapi/";

/// Browser user agent; the anti-bot layer ties clearance cookies to it.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.3; rv:36.0) Gecko/20100101 Firefox/36.0";

/// Per-request transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect-level retries performed by the transport.
pub const DEFAULT_TRANSPORT_RETRIES: u32 = 2;

/// Consecutive invalid-nonce responses recovered within one call.
pub const MAX_INVALID_NONCES: u32 = 10;

/// Public endpoints (path segments below [`PUBLIC_BASE_URL`]).
pub mod public {
    /// Exchange info: server time and pair limits.
    pub const INFO: &str = "info";
    /// Order book depth.
    pub const DEPTH: &str = "depth";
    /// Recent trades.
    pub const TRADES: &str = "trades";
    /// 24h ticker.
    pub const TICKER: &str = "ticker";
}

/// Trade API `method` names.
pub mod trade {
    /// Balances and key permissions.
    pub const GET_INFO: &str = "getInfo";
    /// Open orders for a pair.
    pub const ACTIVE_ORDERS: &str = "ActiveOrders";
    /// Place an order.
    pub const TRADE: &str = "Trade";
    /// Cancel an order.
    pub const CANCEL_ORDER: &str = "CancelOrder";
    /// Order details.
    pub const ORDER_INFO: &str = "OrderInfo";
}
