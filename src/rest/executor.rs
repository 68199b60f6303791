//! Execution of one logical API call, including recovery.
//!
//! A call moves through an explicit state machine. Each recovery path has its
//! own budget for the call:
//!
//! | Classification  | Budget                 | Recovery                              |
//! |-----------------|------------------------|---------------------------------------|
//! | `DdosChallenge` | once per call          | solve, store cookies, resend as-is    |
//! | `Blocked`       | once per call          | clear cookies, resend with new nonce  |
//! | `InvalidNonce`  | `max_invalid_nonces`   | resend with new nonce                 |
//! | `Disabled`      | none                   |                                       |
//! | `BadResponse`   | none                   |                                       |
//!
//! A challenge retry reuses the exact parameters, nonce included: the
//! challenged request never reached the exchange.

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use time::OffsetDateTime;
use url::Url;

use crate::auth::{CredentialIdentity, CredentialsProvider, NonceStore, sign_params};
use crate::challenge::{ChallengeRequest, ChallengeSolver};
use crate::error::YobitError;
use crate::rest::classify::{Classification, Endpoint, classify};
use crate::session::{Cookie, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use crate::types::RequestParams;

/// Where the call is in its recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    /// First attempt.
    Initial,
    /// Resending after a solved challenge.
    AwaitingChallenge,
    /// Resending after the session was discarded.
    AwaitingSessionReset,
    /// Resending with a fresh nonce after a rejection.
    AwaitingNonceRetry,
    /// The call returned its payload.
    Succeeded,
    /// The call surfaced an error.
    Failed,
}

impl CallState {
    /// Whether the call has finished.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// What to do after an attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Return the payload.
    Complete(Value),
    /// Surface the classification as an error.
    Fail(Classification),
    /// Solve the challenge and resend the same request.
    SolveChallenge(String),
    /// Clear the session and restart the call.
    ResetSession,
    /// Resend with a fresh nonce.
    BumpNonce,
}

/// Recovery state and budget of one logical call.
///
/// [`RecoveryBudget::next_step`] is the transition function: it moves the
/// call to its next [`CallState`] and tells the executor what to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryBudget {
    state: CallState,
    max_invalid_nonces: u32,
    challenge_used: bool,
    session_reset_used: bool,
    invalid_nonces: u32,
}

impl RecoveryBudget {
    /// A fresh budget allowing `max_invalid_nonces` nonce retries.
    pub fn new(max_invalid_nonces: u32) -> Self {
        Self {
            state: CallState::Initial,
            max_invalid_nonces,
            challenge_used: false,
            session_reset_used: false,
            invalid_nonces: 0,
        }
    }

    /// Consecutive invalid-nonce retries spent so far.
    pub fn invalid_nonces(&self) -> u32 {
        self.invalid_nonces
    }

    /// Current state of the call.
    pub fn state(&self) -> CallState {
        self.state
    }

    /// Decide the next step for `classification`, spending budget.
    pub fn next_step(&mut self, classification: Classification) -> Step {
        let step = self.decide(classification);
        self.state = match &step {
            Step::Complete(_) => CallState::Succeeded,
            Step::Fail(_) => CallState::Failed,
            Step::SolveChallenge(_) => CallState::AwaitingChallenge,
            Step::ResetSession => CallState::AwaitingSessionReset,
            Step::BumpNonce => CallState::AwaitingNonceRetry,
        };
        step
    }

    fn decide(&mut self, classification: Classification) -> Step {
        match classification {
            Classification::Success(payload) => {
                self.invalid_nonces = 0;
                Step::Complete(payload)
            }
            Classification::DdosChallenge(body) if !self.challenge_used => {
                self.challenge_used = true;
                Step::SolveChallenge(body)
            }
            Classification::Blocked(_) if !self.session_reset_used => {
                self.session_reset_used = true;
                Step::ResetSession
            }
            Classification::InvalidNonce(_) if self.invalid_nonces < self.max_invalid_nonces => {
                self.invalid_nonces += 1;
                Step::BumpNonce
            }
            Classification::InvalidNonce(body) => {
                self.invalid_nonces = 0;
                Step::Fail(Classification::InvalidNonce(body))
            }
            other => Step::Fail(other),
        }
    }
}

/// Drives API calls through transport, classification and recovery.
///
/// One executor serves one endpoint and one credential identity.
#[derive(Clone)]
pub struct RequestExecutor {
    endpoint: Endpoint,
    base_url: String,
    identity: CredentialIdentity,
    credentials: Option<Arc<dyn CredentialsProvider>>,
    transport: Arc<dyn Transport>,
    solver: Arc<dyn ChallengeSolver>,
    sessions: Arc<dyn SessionStore>,
    nonces: Arc<dyn NonceStore>,
    max_invalid_nonces: u32,
}

/// The parts an executor is assembled from.
pub(crate) struct ExecutorParts {
    pub endpoint: Endpoint,
    pub base_url: String,
    pub credentials: Option<Arc<dyn CredentialsProvider>>,
    pub transport: Arc<dyn Transport>,
    pub solver: Arc<dyn ChallengeSolver>,
    pub sessions: Arc<dyn SessionStore>,
    pub nonces: Arc<dyn NonceStore>,
    pub max_invalid_nonces: u32,
}

/// Payload of a call, shaped per endpoint.
enum CallTarget<'a> {
    Public { path: &'a str },
    Signed { params: RequestParams },
}

impl RequestExecutor {
    pub(crate) fn new(parts: ExecutorParts) -> Self {
        let identity = match &parts.credentials {
            Some(provider) => provider.get_credentials().identity(),
            None => CredentialIdentity::public(),
        };
        Self {
            endpoint: parts.endpoint,
            base_url: parts.base_url,
            identity,
            credentials: parts.credentials,
            transport: parts.transport,
            solver: parts.solver,
            sessions: parts.sessions,
            nonces: parts.nonces,
            max_invalid_nonces: parts.max_invalid_nonces,
        }
    }

    /// The identity this executor stores its state under.
    pub fn identity(&self) -> &CredentialIdentity {
        &self.identity
    }

    /// The base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform an unsigned GET of `path` below the base URL.
    pub async fn public_get(&self, path: &str) -> Result<Value, YobitError> {
        self.execute(CallTarget::Public { path }).await
    }

    /// Perform a signed trade call of `method` with `params`.
    ///
    /// `method` and a fresh `nonce` are appended after the caller's
    /// parameters.
    pub async fn signed_post(
        &self,
        method: &str,
        mut params: RequestParams,
    ) -> Result<Value, YobitError> {
        params.set("method", method);
        params.set("nonce", self.nonces.next_nonce(&self.identity)?);
        self.execute(CallTarget::Signed { params }).await
    }

    async fn execute(&self, mut target: CallTarget<'_>) -> Result<Value, YobitError> {
        let mut budget = RecoveryBudget::new(self.max_invalid_nonces);

        loop {
            let request = self.build_request(&target)?;
            tracing::debug!(
                endpoint = ?self.endpoint,
                state = ?budget.state(),
                url = %request.url,
                method = target.method_name(),
                nonce = target.nonce(),
                "Sending request"
            );

            let outcome = self.transport.send(&request).await;
            if let Ok(response) = &outcome {
                self.absorb_cookies(response);
            }
            let classification = classify(self.endpoint, &outcome);

            match budget.next_step(classification) {
                Step::Complete(payload) => return Ok(payload),
                Step::Fail(classification) => {
                    tracing::debug!(
                        kind = classification.kind(),
                        "Call failed"
                    );
                    return classification.into_result();
                }
                Step::SolveChallenge(body) => {
                    tracing::warn!(identity = %self.identity, url = %request.url, "DDoS challenge received, solving");
                    self.solve_challenge(&request, body).await?;
                }
                Step::ResetSession => {
                    tracing::warn!(identity = %self.identity, "Blocked by anti-bot layer, resetting session");
                    self.sessions.clear(&self.identity)?;
                    self.refresh_nonce(&mut target)?;
                }
                Step::BumpNonce => {
                    tracing::warn!(
                        identity = %self.identity,
                        nonce = target.nonce(),
                        retry = budget.invalid_nonces(),
                        "Invalid nonce, retrying with a fresh one"
                    );
                    self.refresh_nonce(&mut target)?;
                }
            }
        }
    }

    fn build_request(&self, target: &CallTarget<'_>) -> Result<HttpRequest, YobitError> {
        let mut headers = Vec::new();
        let now = OffsetDateTime::now_utc().unix_timestamp();
        if let Some(cookies) = self.sessions.load(&self.identity).cookie_header(now) {
            headers.push(("Cookie".to_string(), cookies));
        }

        match target {
            CallTarget::Public { path } => {
                let url = Url::parse(&self.base_url)?.join(path)?;
                Ok(HttpRequest {
                    method: Method::GET,
                    url: url.to_string(),
                    headers,
                    body: None,
                })
            }
            CallTarget::Signed { params } => {
                let credentials = self
                    .credentials
                    .as_ref()
                    .ok_or_else(|| YobitError::Auth("signed call without credentials".to_string()))?
                    .get_credentials();
                // Sign the exact bytes that go on the wire.
                let (body, signature) = sign_params(params, credentials.expose_secret())?;
                headers.push((
                    CONTENT_TYPE.as_str().to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ));
                headers.push(("Key".to_string(), credentials.public_key.clone()));
                headers.push(("Sign".to_string(), signature));
                Ok(HttpRequest {
                    method: Method::POST,
                    url: Url::parse(&self.base_url)?.to_string(),
                    headers,
                    body: Some(body),
                })
            }
        }
    }

    fn refresh_nonce(&self, target: &mut CallTarget<'_>) -> Result<(), YobitError> {
        if let CallTarget::Signed { params } = target {
            params.set("nonce", self.nonces.next_nonce(&self.identity)?);
        }
        Ok(())
    }

    async fn solve_challenge(&self, request: &HttpRequest, body: String) -> Result<(), YobitError> {
        let challenge = ChallengeRequest {
            url: request.url.clone(),
            method: request.method.clone(),
            body: request.body.clone(),
            headers: request
                .headers
                .iter()
                .filter(|(name, _)| name == "Key" || name == "Sign")
                .cloned()
                .collect(),
        };

        let cookies = match self.solver.solve(&challenge).await {
            Ok(cookies) => cookies,
            Err(e) => {
                tracing::warn!(identity = %self.identity, error = %e, "Challenge solver failed");
                return Err(YobitError::DdosChallenge { body });
            }
        };

        tracing::info!(identity = %self.identity, cookies = cookies.len(), "Challenge solved");
        self.sessions
            .replace(&self.identity, &cookies.into_iter().collect())
    }

    /// Merge `Set-Cookie` headers into the stored session.
    fn absorb_cookies(&self, response: &HttpResponse) {
        if response.set_cookies.is_empty() {
            return;
        }
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let cookies = response
            .set_cookies
            .iter()
            .filter_map(|header| Cookie::parse_set_cookie(header, now));

        let mut session = self.sessions.load(&self.identity);
        if session.merge(cookies) {
            if let Err(e) = self.sessions.replace(&self.identity, &session) {
                tracing::warn!(identity = %self.identity, error = %e, "Failed to store server cookies");
            }
        }
    }
}

impl CallTarget<'_> {
    fn method_name(&self) -> Option<&str> {
        match self {
            Self::Public { path } => Some(path),
            Self::Signed { params } => params.get("method"),
        }
    }

    fn nonce(&self) -> Option<&str> {
        match self {
            Self::Public { .. } => None,
            Self::Signed { params } => params.get("nonce"),
        }
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("endpoint", &self.endpoint)
            .field("base_url", &self.base_url)
            .field("identity", &self.identity)
            .field("max_invalid_nonces", &self.max_invalid_nonces)
            .finish()
    }
}
