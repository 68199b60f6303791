//! Persistence of session cookies per credential identity.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::auth::CredentialIdentity;
use crate::error::YobitError;
use crate::session::Session;
use crate::state::{StateDir, read_optional, remove_optional, write_atomic};

/// Keyed storage for session cookie jars.
///
/// `load` never fails: missing or unreadable state is an empty session, and
/// the next successful challenge writes a fresh one.
pub trait SessionStore: Send + Sync {
    /// Load the session for `identity`.
    fn load(&self, identity: &CredentialIdentity) -> Session;

    /// Replace the stored session wholesale.
    fn replace(&self, identity: &CredentialIdentity, session: &Session) -> Result<(), YobitError>;

    /// Discard the stored session; the next `load` returns an empty one.
    fn clear(&self, identity: &CredentialIdentity) -> Result<(), YobitError>;
}

/// Session store backed by one JSON cookie-jar file per identity.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: StateDir,
}

impl FileSessionStore {
    /// Create a store persisting into `dir`.
    pub fn new(dir: StateDir) -> Self {
        Self { dir }
    }

    fn file_name(identity: &CredentialIdentity) -> String {
        format!("yobit_cookie_{}.json", identity.as_str())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self, identity: &CredentialIdentity) -> Session {
        let path = self.dir.file(&Self::file_name(identity));
        let contents = match read_optional(&path) {
            Ok(Some(contents)) => contents,
            Ok(None) => return Session::new(),
            Err(e) => {
                tracing::warn!(%identity, error = %e, "Unreadable session file, starting fresh");
                return Session::new();
            }
        };
        serde_json::from_str(&contents).unwrap_or_else(|e| {
            tracing::warn!(%identity, error = %e, "Corrupt session file, starting fresh");
            Session::new()
        })
    }

    fn replace(&self, identity: &CredentialIdentity, session: &Session) -> Result<(), YobitError> {
        let json = serde_json::to_vec_pretty(session)?;
        self.dir
            .with_lock(&Self::file_name(identity), |path| write_atomic(path, &json))?;
        Ok(())
    }

    fn clear(&self, identity: &CredentialIdentity) -> Result<(), YobitError> {
        self.dir
            .with_lock(&Self::file_name(identity), remove_optional)?;
        Ok(())
    }
}

/// In-process session store, for tests and short-lived tools.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<CredentialIdentity, Session>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, identity: &CredentialIdentity) -> Session {
        self.sessions
            .lock()
            .ok()
            .and_then(|sessions| sessions.get(identity).cloned())
            .unwrap_or_default()
    }

    fn replace(&self, identity: &CredentialIdentity, session: &Session) -> Result<(), YobitError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| std::io::Error::other("session store lock poisoned"))?;
        sessions.insert(identity.clone(), session.clone());
        Ok(())
    }

    fn clear(&self, identity: &CredentialIdentity) -> Result<(), YobitError> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| std::io::Error::other("session store lock poisoned"))?;
        sessions.remove(identity);
        Ok(())
    }
}
