//! HTTP transport boundary.
//!
//! The request engine only needs "send this request, give me the status and
//! body, or tell me no response came back". [`Transport`] is that seam;
//! [`ReqwestTransport`] is the production implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue, SET_COOKIE, USER_AGENT};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{RetryTransientMiddleware, Retryable, RetryableStrategy};
use reqwest_tracing::TracingMiddleware;

use crate::error::YobitError;

/// A fully built request, ready to send.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: String,
    /// Extra headers, in order
    pub headers: Vec<(String, String)>,
    /// Request body, sent verbatim
    pub body: Option<String>,
}

/// What came back from the server, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: String,
    /// Raw `Set-Cookie` header values
    pub set_cookies: Vec<String>,
}

impl HttpResponse {
    /// A response with no cookies.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            set_cookies: Vec::new(),
        }
    }
}

/// Sends requests to the exchange.
///
/// Any status code is a response. `Err` means no response was obtained at all
/// (connection failure, timeout, cancellation).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and collect the full response body.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, YobitError>;
}

/// Retries requests whose connection could not be established, and nothing
/// else.
///
/// Status codes, 503 included, carry meaning for the classifier and must not
/// be swallowed by the middleware. A timeout or a dropped connection may come
/// after the exchange accepted a signed call, so resending it could execute
/// the call twice.
struct ConnectFailuresOnly;

impl RetryableStrategy for ConnectFailuresOnly {
    fn handle(
        &self,
        res: &Result<reqwest::Response, reqwest_middleware::Error>,
    ) -> Option<Retryable> {
        match res {
            Err(reqwest_middleware::Error::Reqwest(error)) if error.is_connect() => {
                Some(Retryable::Transient)
            }
            _ => None,
        }
    }
}

/// [`Transport`] over `reqwest` with tracing and connect-level retries.
#[derive(Clone)]
pub struct ReqwestTransport {
    http_client: ClientWithMiddleware,
}

impl ReqwestTransport {
    /// Build a transport.
    pub fn new(user_agent: &str, timeout: Duration, max_retries: u32) -> Self {
        let mut headers = HeaderMap::new();
        let header_value = HeaderValue::from_str(user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("yobit-api-client"));
        headers.insert(USER_AGENT, header_value);

        let reqwest_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(
                retry_policy,
                ConnectFailuresOnly,
            ))
            .build();

        Self { http_client }
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, YobitError> {
        let mut builder = self
            .http_client
            .request(request.method.clone(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .map(str::to_string)
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            body,
            set_cookies,
        })
    }
}
