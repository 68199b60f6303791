//! Classification of raw exchange responses.
//!
//! The anti-bot layer answers with HTML instead of JSON, sometimes with a 200
//! status. Status and body patterns are therefore checked before any attempt
//! to parse JSON, in a fixed order where the first match wins.
//!
//! The body patterns track the wording of the protection vendor's pages and
//! will need revisiting if that wording changes.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::YobitError;
use crate::transport::HttpResponse;

static DDOS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)ddos").expect("Invalid ddos regex pattern"));
static ENABLE_COOKIES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)enable cookies").expect("Invalid enable cookies regex pattern")
});
static CLOUDFLARE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)cloudflare").expect("Invalid cloudflare regex pattern"));
static BLOCKED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)block|access denied").expect("Invalid block regex pattern")
});
static INVALID_NONCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)invalid nonce").expect("Invalid nonce regex pattern")
});

/// Which API a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Unsigned market-data API
    Public,
    /// Signed trade API
    Trade,
}

/// Outcome of one attempt, as seen by the retry state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The call succeeded with this payload.
    Success(Value),
    /// No response was obtained.
    Disabled(String),
    /// The challenge page was served.
    DdosChallenge(String),
    /// The anti-bot layer blocked the request.
    Blocked(String),
    /// The nonce was rejected.
    InvalidNonce(String),
    /// Malformed or rejected response.
    BadResponse(String),
}

impl Classification {
    /// Convert a failure classification into the error surfaced to callers.
    pub fn into_result(self) -> Result<Value, YobitError> {
        match self {
            Self::Success(payload) => Ok(payload),
            Self::Disabled(reason) => Err(YobitError::Disabled { reason }),
            Self::DdosChallenge(body) => Err(YobitError::DdosChallenge { body }),
            Self::Blocked(body) => Err(YobitError::Blocked { body }),
            Self::InvalidNonce(body) => Err(YobitError::InvalidNonce { body }),
            Self::BadResponse(body) => Err(YobitError::BadResponse { body }),
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::Disabled(_) => "disabled",
            Self::DdosChallenge(_) => "ddos_challenge",
            Self::Blocked(_) => "blocked",
            Self::InvalidNonce(_) => "invalid_nonce",
            Self::BadResponse(_) => "bad_response",
        }
    }
}

/// Loose truthiness of the `success` flag: `1`, `"1"` and `true` pass.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}

/// Classify a transport outcome for `endpoint`.
pub fn classify(
    endpoint: Endpoint,
    outcome: &Result<HttpResponse, YobitError>,
) -> Classification {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => return Classification::Disabled(e.to_string()),
    };
    let body = &response.body;

    if response.status == 503 {
        return Classification::DdosChallenge(body.clone());
    }
    if DDOS.is_match(body) || (endpoint == Endpoint::Trade && ENABLE_COOKIES.is_match(body)) {
        return Classification::DdosChallenge(body.clone());
    }
    if CLOUDFLARE.is_match(body) && BLOCKED.is_match(body) {
        return Classification::Blocked(body.clone());
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => return Classification::BadResponse(body.clone()),
    };

    match endpoint {
        Endpoint::Trade => classify_trade(parsed, body),
        Endpoint::Public => classify_public(parsed, body),
    }
}

fn classify_trade(parsed: Value, body: &str) -> Classification {
    let Value::Object(mut object) = parsed else {
        return Classification::BadResponse(body.to_string());
    };

    if !object.get("success").is_some_and(is_truthy) {
        let nonce_error = object.get("error").is_some_and(|error| match error {
            Value::String(message) => INVALID_NONCE.is_match(message),
            other => INVALID_NONCE.is_match(&other.to_string()),
        });
        return if nonce_error {
            Classification::InvalidNonce(body.to_string())
        } else {
            Classification::BadResponse(body.to_string())
        };
    }

    match object.remove("return") {
        Some(Value::Null) | None => Classification::Success(Value::Object(Map::new())),
        Some(payload) => Classification::Success(payload),
    }
}

/// Public responses are bare objects; only an explicit falsy `success` is an
/// error.
fn classify_public(parsed: Value, body: &str) -> Classification {
    if parsed
        .get("success")
        .is_some_and(|success| !is_truthy(success))
    {
        return Classification::BadResponse(body.to_string());
    }
    Classification::Success(parsed)
}
