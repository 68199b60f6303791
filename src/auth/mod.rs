//! Authentication module for the YoBit trade API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Persisted, strictly increasing nonce counters
//! - HMAC-SHA512 signature generation for trade requests

mod credentials;
mod nonce;
mod signature;

pub use credentials::{
    CredentialIdentity, Credentials, CredentialsProvider, EnvCredentials, PRIVATE_KEY_VAR,
    PUBLIC_KEY_VAR,
};
pub use nonce::{FileNonceStore, MemoryNonceStore, NonceStore};
pub use signature::{sign_params, sign_payload};
