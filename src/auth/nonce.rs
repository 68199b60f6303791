//! Persisted nonce counters for YoBit trade API authentication.
//!
//! YoBit requires the `nonce` of every signed request to be strictly greater
//! than the previous one for the same key pair, and remembers the last value
//! indefinitely. The counter therefore has to survive process restarts.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::CredentialIdentity;
use crate::error::YobitError;
use crate::state::{StateDir, read_optional, write_atomic};

/// Source of nonces for signed requests.
///
/// Implementations must persist the new value before returning it, so a nonce
/// is never handed out twice for the same identity, even across restarts.
pub trait NonceStore: Send + Sync {
    /// Increment and return the counter for `identity`.
    fn next_nonce(&self, identity: &CredentialIdentity) -> Result<u64, YobitError>;
}

fn increment(last: u64) -> Result<u64, YobitError> {
    last.checked_add(1)
        .ok_or_else(|| YobitError::Auth("nonce counter exhausted".to_string()))
}

/// Nonce store backed by one decimal file per identity.
///
/// The read-increment-write runs under an exclusive file lock, so processes
/// sharing the directory never observe the same value.
#[derive(Debug, Clone)]
pub struct FileNonceStore {
    dir: StateDir,
}

impl FileNonceStore {
    /// Create a store persisting into `dir`.
    pub fn new(dir: StateDir) -> Self {
        Self { dir }
    }

    fn file_name(identity: &CredentialIdentity) -> String {
        format!("yobit_nonce_{}.txt", identity.as_str())
    }
}

impl NonceStore for FileNonceStore {
    fn next_nonce(&self, identity: &CredentialIdentity) -> Result<u64, YobitError> {
        let name = Self::file_name(identity);
        let next = self.dir.with_lock(&name, |path| {
            let last = match read_optional(path) {
                Ok(Some(contents)) => contents.trim().parse::<u64>().unwrap_or_else(|_| {
                    tracing::warn!(%identity, "Corrupt nonce file, restarting counter from 0");
                    0
                }),
                Ok(None) => 0,
                Err(e) => {
                    tracing::warn!(%identity, error = %e, "Unreadable nonce file, restarting counter from 0");
                    0
                }
            };
            let next = increment(last).map_err(std::io::Error::other)?;
            write_atomic(path, next.to_string().as_bytes())?;
            Ok(next)
        })?;
        Ok(next)
    }
}

/// In-process nonce store, for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemoryNonceStore {
    counters: Mutex<HashMap<CredentialIdentity, u64>>,
}

impl MemoryNonceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `identity` at `last`; the next nonce will be `last + 1`.
    pub fn with_last(self, identity: CredentialIdentity, last: u64) -> Self {
        if let Ok(mut counters) = self.counters.lock() {
            counters.insert(identity, last);
        }
        self
    }

    /// The last nonce handed out for `identity`.
    pub fn last(&self, identity: &CredentialIdentity) -> Option<u64> {
        self.counters.lock().ok()?.get(identity).copied()
    }
}

impl NonceStore for MemoryNonceStore {
    fn next_nonce(&self, identity: &CredentialIdentity) -> Result<u64, YobitError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| YobitError::Auth("nonce store lock poisoned".to_string()))?;
        let slot = counters.entry(identity.clone()).or_insert(0);
        *slot = increment(*slot)?;
        Ok(*slot)
    }
}
