//! Error types for the YoBit client library.

use thiserror::Error;

/// The main error type for all YoBit client operations.
///
/// The first five variants are the terminal outcomes of a logical API call
/// once local recovery has been exhausted. Each carries the raw response body
/// (when one was received) so callers can log or inspect it.
#[derive(Error, Debug)]
pub enum YobitError {
    /// No response was obtained from the exchange endpoint.
    #[error("Exchange endpoint unreachable: {reason}")]
    Disabled {
        /// Transport-level description of the failure
        reason: String,
    },

    /// The anti-bot challenge page was returned and could not be cleared.
    #[error("DDoS protection challenge could not be cleared")]
    DdosChallenge {
        /// Raw body of the challenge page
        body: String,
    },

    /// The anti-bot layer blocked the client outright.
    #[error("Access blocked by the anti-bot layer")]
    Blocked {
        /// Raw body of the block page
        body: String,
    },

    /// The exchange kept rejecting the request nonce.
    #[error("Invalid nonce: {body}")]
    InvalidNonce {
        /// Raw response body
        body: String,
    },

    /// The response was malformed or the exchange rejected the call.
    #[error("Bad response: {body}")]
    BadResponse {
        /// Raw response body
        body: String,
    },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local state (nonce or session files) could not be accessed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The challenge solver failed to produce cookies
    #[error("Challenge solver failed: {0}")]
    Challenge(String),

    /// The request could not be built from the given arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl YobitError {
    /// The raw response body attached to this error, if any.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::DdosChallenge { body }
            | Self::Blocked { body }
            | Self::InvalidNonce { body }
            | Self::BadResponse { body } => Some(body),
            _ => None,
        }
    }

    /// Check if the exchange endpoint was unreachable.
    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled { .. })
    }

    /// Check if this is an uncleared anti-bot challenge.
    pub fn is_ddos_challenge(&self) -> bool {
        matches!(self, Self::DdosChallenge { .. })
    }

    /// Check if the anti-bot layer blocked the client.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    /// Check if this is an invalid nonce error.
    pub fn is_invalid_nonce(&self) -> bool {
        matches!(self, Self::InvalidNonce { .. })
    }

    /// Check if the response was malformed or rejected.
    pub fn is_bad_response(&self) -> bool {
        matches!(self, Self::BadResponse { .. })
    }
}
