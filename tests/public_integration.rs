use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use yobit_api_client::YobitError;
use yobit_api_client::auth::CredentialIdentity;
use yobit_api_client::challenge::{ChallengeRequest, ChallengeSolver, UnavailableSolver};
use yobit_api_client::rest::PublicApiClient;
use yobit_api_client::session::{Cookie, FileSessionStore, SessionStore};
use yobit_api_client::state::StateDir;
use yobit_api_client::types::{BookSide, CurrencyPair};

const BLOCK_PAGE: &str = "<title>Attention Required! | Cloudflare</title><h1>Sorry, you have been blocked</h1>";

/// Solver that hands out a fixed clearance cookie and records its calls.
#[derive(Default)]
struct RecordingSolver {
    calls: Mutex<Vec<ChallengeRequest>>,
}

#[async_trait]
impl ChallengeSolver for RecordingSolver {
    async fn solve(&self, request: &ChallengeRequest) -> Result<Vec<Cookie>, YobitError> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(vec![Cookie::new("cf_clearance", "solved")])
    }
}

fn info_body(server_time: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "server_time": server_time,
        "pairs": {}
    }))
}

fn store_stale_session(state: &tempfile::TempDir) {
    FileSessionStore::new(StateDir::new(state.path()))
        .replace(
            &CredentialIdentity::public(),
            &vec![Cookie::new("cf_clearance", "stale")].into(),
        )
        .unwrap();
}

fn build_client(server: &MockServer, state: &tempfile::TempDir) -> PublicApiClient {
    PublicApiClient::builder()
        .base_url(format!("{}/api/3/", server.uri()))
        .state_dir(StateDir::new(state.path()))
        .challenge_solver(Arc::new(UnavailableSolver))
        .build()
}

#[tokio::test]
async fn test_get_info() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();
    let response = serde_json::json!({
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
    });

    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let info = client.get_info().await.unwrap();

    assert_eq!(info.server_time.unix_timestamp(), 1_418_654_531);
    assert_eq!(info.pairs["ltc_btc"].decimal_places, 8);
}

#[tokio::test]
async fn test_get_depths_joins_pairs() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();
    let response = serde_json::json!({
        "ltc_btc": {"asks": [[0.0234, 12.5]], "bids": [[0.0233, 4.1]]},
        "eth_btc": {"asks": [], "bids": []}
    });

    Mock::given(method("GET"))
        .and(path("/api/3/depth/ltc_btc-eth_btc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let pairs = [CurrencyPair::new("ltc", "btc"), CurrencyPair::new("eth", "btc")];
    let books = client.get_depths(&pairs).await.unwrap();

    assert_eq!(books.len(), 2);
    assert_eq!(books["ltc_btc"].asks[0].price, "0.0234".parse::<Decimal>().unwrap());
    assert!(books["eth_btc"].bids.is_empty());
}

#[tokio::test]
async fn test_single_pair_conveniences() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/3/trades/ltc_btc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ltc_btc": [
                {"type": "ask", "price": 0.0231, "amount": 0.7, "tid": 1, "timestamp": 1418654531},
                {"type": "bid", "price": 0.0230, "amount": 2, "tid": 2, "timestamp": 1418654532}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/ticker/ltc_btc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ltc_btc": {
                "high": 0.024, "low": 0.022, "avg": 0.023, "vol": 151.2, "vol_cur": 6543.1,
                "last": 0.0231, "buy": 0.0230, "sell": 0.0232, "updated": 1418654531
            }
        })))
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let pair = CurrencyPair::new("ltc", "btc");

    let trades = client.get_trade(&pair).await.unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].side, BookSide::Ask);

    let ticker = client.get_ticker(&pair).await.unwrap();
    assert_eq!(ticker.sell, "0.0232".parse::<Decimal>().unwrap());
}

#[tokio::test]
async fn test_invalid_pair_is_bad_response() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/3/ticker/foo_bar"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": 0,
            "error": "Invalid pair name: foo_bar"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let error = client
        .get_ticker(&CurrencyPair::new("foo", "bar"))
        .await
        .unwrap_err();

    assert!(error.is_bad_response());
    assert!(error.body().unwrap().contains("Invalid pair name"));
}

#[tokio::test]
async fn test_server_cookies_are_replayed() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .and(header("cookie", "__cfduid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "server_time": 2, "pairs": {}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "__cfduid=abc123; path=/; HttpOnly")
                .set_body_json(serde_json::json!({"server_time": 1, "pairs": {}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let first = client.get_info().await.unwrap();
    let second = client.get_info().await.unwrap();

    assert_eq!(first.server_time.unix_timestamp(), 1);
    assert_eq!(second.server_time.unix_timestamp(), 2);
    assert!(state.path().join("yobit_cookie_public.json").exists());

    let stored = FileSessionStore::new(StateDir::new(state.path()))
        .load(&CredentialIdentity::public());
    assert_eq!(stored.get("__cfduid").unwrap().value, "abc123");
}

#[tokio::test]
async fn test_challenge_without_solver_fails() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>DDoS protection</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let error = client.get_info().await.unwrap_err();

    assert!(error.is_ddos_challenge());
}

#[tokio::test]
async fn test_challenge_is_solved_and_replayed() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();
    let solver = Arc::new(RecordingSolver::default());

    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .and(header("cookie", "cf_clearance=solved"))
        .respond_with(info_body(7))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>DDoS protection</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PublicApiClient::builder()
        .base_url(format!("{}/api/3/", server.uri()))
        .state_dir(StateDir::new(state.path()))
        .challenge_solver(solver.clone())
        .build();
    let info = client.get_info().await.unwrap();
    assert_eq!(info.server_time.unix_timestamp(), 7);

    let calls = solver.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, format!("{}/api/3/info", server.uri()));
    assert_eq!(calls[0].method, Method::GET);
    assert!(calls[0].body.is_none());
    assert!(calls[0].headers.is_empty());

    let stored = FileSessionStore::new(StateDir::new(state.path()))
        .load(&CredentialIdentity::public());
    assert_eq!(stored.get("cf_clearance").unwrap().value, "solved");
}

#[tokio::test]
async fn test_block_clears_session_and_resends_once() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();
    store_stale_session(&state);

    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(ResponseTemplate::new(403).set_body_string(BLOCK_PAGE))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(info_body(9))
        .expect(1)
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let info = client.get_info().await.unwrap();
    assert_eq!(info.server_time.unix_timestamp(), 9);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].headers.get("cookie").is_some());
    assert!(requests[1].headers.get("cookie").is_none());

    let stored = FileSessionStore::new(StateDir::new(state.path()))
        .load(&CredentialIdentity::public());
    assert!(stored.is_empty());
}

#[tokio::test]
async fn test_second_block_is_terminal() {
    let server = MockServer::start().await;
    let state = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/api/3/info"))
        .respond_with(ResponseTemplate::new(403).set_body_string(BLOCK_PAGE))
        .expect(2)
        .mount(&server)
        .await;

    let client = build_client(&server, &state);
    let error = client.get_info().await.unwrap_err();

    assert!(error.is_blocked());
    assert_eq!(error.body(), Some(BLOCK_PAGE));
}
