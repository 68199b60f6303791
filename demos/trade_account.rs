//! Example: Reading account state through the signed trade API.
//!
//! Requires YOBIT_PUBLIC_KEY and YOBIT_PRIVATE_KEY (a `.env` file works).
//! Set YOBIT_CHALLENGE_SOLVER to a command such as
//! `phantomjs cloudflare-challenge.js` to clear anti-bot challenges.
//!
//! Run with: RUST_LOG=yobit_api_client=debug cargo run --example trade_account

use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use yobit_api_client::auth::{CredentialsProvider, EnvCredentials};
use yobit_api_client::rest::TradeApiClient;
use yobit_api_client::types::CurrencyPair;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(credentials) = EnvCredentials::try_from_env() else {
        println!("Set YOBIT_PUBLIC_KEY and YOBIT_PRIVATE_KEY to run this example.");
        return Ok(());
    };
    println!("Identity: {}", credentials.get_credentials().identity());

    let client = TradeApiClient::builder(Arc::new(credentials)).build();

    println!("=== Account ===");
    let account = client.get_info().await?;
    println!(
        "Rights: info={}, trade={}, withdraw={}",
        account.rights.info, account.rights.trade, account.rights.withdraw
    );
    println!("Open orders: {}", account.open_orders);
    for (currency, amount) in account.funds.iter().filter(|(_, amount)| !amount.is_zero()) {
        println!("{currency}: {amount}");
    }

    println!("\n=== Active Orders (ltc_btc) ===");
    let orders = client
        .get_active_orders(&CurrencyPair::new("ltc", "btc"))
        .await?;
    if orders.is_empty() {
        println!("none");
    }
    for (id, order) in &orders {
        println!(
            "#{id} {} {} @ {} ({:?})",
            order.trade_type, order.amount, order.rate, order.status
        );
    }

    Ok(())
}
