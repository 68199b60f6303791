//! Example: Fetching public market data from YoBit.
//!
//! Run with: RUST_LOG=yobit_api_client=debug cargo run --example public_data

use tracing_subscriber::EnvFilter;
use yobit_api_client::rest::PublicApiClient;
use yobit_api_client::types::CurrencyPair;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Cookies for the public client are kept in yobit_cookie_public.json
    let client = PublicApiClient::new();

    println!("=== Exchange Info ===");
    let info = client.get_info().await?;
    println!("Server time: {}", info.server_time);
    println!("Pairs listed: {}", info.pairs.len());
    if let Some(pair) = info.pairs.get("ltc_btc") {
        println!(
            "ltc_btc: min_amount={}, fee={}%, decimals={}",
            pair.min_amount, pair.fee, pair.decimal_places
        );
    }

    let pairs = [CurrencyPair::new("ltc", "btc"), CurrencyPair::new("eth", "btc")];

    println!("\n=== Tickers ===");
    let tickers = client.get_tickers(&pairs).await?;
    for (name, ticker) in &tickers {
        println!(
            "{name}: last={}, bid={}, ask={}, vol={}",
            ticker.last, ticker.buy, ticker.sell, ticker.vol
        );
    }

    println!("\n=== Order Book (ltc_btc) ===");
    let book = client.get_depth(&pairs[0]).await?;
    for level in book.asks.iter().take(3) {
        println!("ask {} x {}", level.price, level.amount);
    }
    for level in book.bids.iter().take(3) {
        println!("bid {} x {}", level.price, level.amount);
    }

    println!("\n=== Recent Trades (ltc_btc) ===");
    let trades = client.get_trade(&pairs[0]).await?;
    for trade in trades.iter().take(5) {
        println!(
            "#{} {:?} {} @ {} ({})",
            trade.tid, trade.side, trade.amount, trade.price, trade.timestamp
        );
    }

    Ok(())
}
