//! YoBit REST API clients and their builder.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::{CredentialsProvider, FileNonceStore, NonceStore};
use crate::challenge::{ChallengeSolver, CommandSolver, UnavailableSolver};
use crate::error::YobitError;
use crate::rest::classify::Endpoint;
use crate::rest::endpoints::{
    DEFAULT_TIMEOUT, DEFAULT_TRANSPORT_RETRIES, DEFAULT_USER_AGENT, MAX_INVALID_NONCES,
    PUBLIC_BASE_URL, TRADE_BASE_URL,
};
use crate::rest::executor::{ExecutorParts, RequestExecutor};
use crate::session::{FileSessionStore, SessionStore};
use crate::state::StateDir;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::RequestParams;

/// Client for the unsigned market-data API.
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
///     let ticker = client.get_ticker(&CurrencyPair::new("ltc", "btc")).await?;
///     println!("Last price: {}", ticker.last);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct PublicApiClient {
    executor: RequestExecutor,
}

impl PublicApiClient {
    /// Create a client with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder<Public> {
        ClientBuilder::new(PUBLIC_BASE_URL, Public)
    }

    /// The executor driving this client's calls.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, YobitError> {
        let payload = self.executor.public_get(path).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

impl Default for PublicApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the signed trade API.
///
/// ```rust,no_run
/// use yobit_api_client::auth::Credentials;
/// use yobit_api_client::rest::TradeApiClient;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let credentials = Arc::new(Credentials::new("public_key", "private_key"));
///     let client = TradeApiClient::builder(credentials).build();
///
///     let account = client.get_info().await?;
///     println!("Funds: {:?}", account.funds);
///     Ok(())
/// }
/// ```
#[derive(Clone, Debug)]
pub struct TradeApiClient {
    executor: RequestExecutor,
}

impl TradeApiClient {
    /// Create a new client builder for `credentials`.
    pub fn builder(credentials: Arc<dyn CredentialsProvider>) -> ClientBuilder<Trade> {
        ClientBuilder::new(TRADE_BASE_URL, Trade { credentials })
    }

    /// The executor driving this client's calls.
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Call any trade API `method` and return the raw `return` payload.
    pub async fn call(&self, method: &str, params: RequestParams) -> Result<Value, YobitError> {
        self.executor.signed_post(method, params).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        method: &str,
        params: RequestParams,
    ) -> Result<T, YobitError> {
        let payload = self.call(method, params).await?;
        Ok(serde_json::from_value(payload)?)
    }
}

/// Builder marker for [`PublicApiClient`].
#[derive(Debug, Clone, Copy)]
pub struct Public;

/// Builder marker for [`TradeApiClient`], holding its credentials.
#[derive(Clone)]
pub struct Trade {
    credentials: Arc<dyn CredentialsProvider>,
}

/// Builder for [`PublicApiClient`] and [`TradeApiClient`].
///
/// Stores left unset are file-backed under the state directory. The challenge
/// solver defaults to the command named by `YOBIT_CHALLENGE_SOLVER`, if any.
pub struct ClientBuilder<K> {
    kind: K,
    base_url: String,
    user_agent: String,
    timeout: Duration,
    max_transport_retries: u32,
    max_invalid_nonce_retries: u32,
    state_dir: Option<StateDir>,
    nonce_store: Option<Arc<dyn NonceStore>>,
    session_store: Option<Arc<dyn SessionStore>>,
    challenge_solver: Option<Arc<dyn ChallengeSolver>>,
    transport: Option<Arc<dyn Transport>>,
}

impl<K> ClientBuilder<K> {
    fn new(base_url: &str, kind: K) -> Self {
        Self {
            kind,
            base_url: base_url.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_transport_retries: DEFAULT_TRANSPORT_RETRIES,
            max_invalid_nonce_retries: MAX_INVALID_NONCES,
            state_dir: None,
            nonce_store: None,
            session_store: None,
            challenge_solver: None,
            transport: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the user agent sent with every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of retries for connection failures.
    pub fn max_transport_retries(mut self, retries: u32) -> Self {
        self.max_transport_retries = retries;
        self
    }

    /// Set how many invalid-nonce responses one call recovers from.
    pub fn max_invalid_nonce_retries(mut self, retries: u32) -> Self {
        self.max_invalid_nonce_retries = retries;
        self
    }

    /// Set the directory for nonce and cookie files.
    pub fn state_dir(mut self, dir: StateDir) -> Self {
        self.state_dir = Some(dir);
        self
    }

    /// Set a custom nonce store.
    pub fn nonce_store(mut self, store: Arc<dyn NonceStore>) -> Self {
        self.nonce_store = Some(store);
        self
    }

    /// Set a custom session store.
    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session_store = Some(store);
        self
    }

    /// Set the challenge solver.
    pub fn challenge_solver(mut self, solver: Arc<dyn ChallengeSolver>) -> Self {
        self.challenge_solver = Some(solver);
        self
    }

    /// Set a custom transport, replacing the reqwest one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn executor(
        self,
        endpoint: Endpoint,
        credentials: Option<Arc<dyn CredentialsProvider>>,
    ) -> RequestExecutor {
        let state_dir = self.state_dir.unwrap_or_default();

        let transport = self.transport.unwrap_or_else(|| {
            Arc::new(ReqwestTransport::new(
                &self.user_agent,
                self.timeout,
                self.max_transport_retries,
            ))
        });
        let solver = self.challenge_solver.unwrap_or_else(|| match CommandSolver::from_env() {
            Some(solver) => Arc::new(solver),
            None => Arc::new(UnavailableSolver),
        });
        let sessions = self
            .session_store
            .unwrap_or_else(|| Arc::new(FileSessionStore::new(state_dir.clone())));
        let nonces = self
            .nonce_store
            .unwrap_or_else(|| Arc::new(FileNonceStore::new(state_dir)));

        RequestExecutor::new(ExecutorParts {
            endpoint,
            base_url: self.base_url,
            credentials,
            transport,
            solver,
            sessions,
            nonces,
            max_invalid_nonces: self.max_invalid_nonce_retries,
        })
    }
}

impl ClientBuilder<Public> {
    /// Build the client.
    pub fn build(self) -> PublicApiClient {
        PublicApiClient {
            executor: self.executor(Endpoint::Public, None),
        }
    }
}

impl ClientBuilder<Trade> {
    /// Build the client.
    pub fn build(self) -> TradeApiClient {
        let credentials = Arc::clone(&self.kind.credentials);
        TradeApiClient {
            executor: self.executor(Endpoint::Trade, Some(credentials)),
        }
    }
}
