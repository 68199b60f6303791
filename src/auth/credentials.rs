//! Credential management for YoBit trade API authentication.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha512};
use std::sync::Arc;

/// Default environment variable holding the public API key.
pub const PUBLIC_KEY_VAR: &str = "YOBIT_PUBLIC_KEY";
/// Default environment variable holding the private API key.
pub const PRIVATE_KEY_VAR: &str = "YOBIT_PRIVATE_KEY";

/// Key under which persisted nonce and session state is stored.
///
/// Trade clients derive it from their key pair so that two credentials never
/// share a nonce sequence or a cookie jar. The public client uses a fixed
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialIdentity(String);

impl CredentialIdentity {
    /// The identity shared by all public (unsigned) clients.
    pub fn public() -> Self {
        Self("public".to_string())
    }

    /// Derive the identity of a key pair as `hex(SHA512(public ++ private))`.
    pub fn from_keys(public_key: &str, private_key: &str) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(public_key.as_bytes());
        hasher.update(private_key.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Borrow the identity as a string usable in file names.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CredentialIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Full digests are noisy in logs.
        if self.0.len() > 16 {
            write!(f, "{}…", &self.0[..16])
        } else {
            f.write_str(&self.0)
        }
    }
}

/// API credentials containing the public key and the private signing key.
#[derive(Clone)]
pub struct Credentials {
    /// The public key, sent in the `Key` header
    pub public_key: String,
    /// The private key, used for signing
    private_key: SecretString,
}

impl Credentials {
    /// Create new credentials from a public and private key.
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: SecretString::from(private_key.into()),
        }
    }

    /// Get the private key for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.private_key.expose_secret()
    }

    /// The storage identity of this key pair.
    pub fn identity(&self) -> CredentialIdentity {
        CredentialIdentity::from_keys(&self.public_key, self.expose_secret())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how credentials are retrieved,
/// for example from a secrets manager.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

impl CredentialsProvider for Credentials {
    fn get_credentials(&self) -> &Credentials {
        self
    }
}

impl<T: CredentialsProvider + ?Sized> CredentialsProvider for Arc<T> {
    fn get_credentials(&self) -> &Credentials {
        (**self).get_credentials()
    }
}

/// Credentials provider that reads from environment variables.
///
/// By default, reads from `YOBIT_PUBLIC_KEY` and `YOBIT_PRIVATE_KEY`.
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Try to create credentials from the default environment variables.
    ///
    /// Returns `None` if either variable is not set.
    pub fn try_from_env() -> Option<Self> {
        Self::try_from_env_vars(PUBLIC_KEY_VAR, PRIVATE_KEY_VAR)
    }

    /// Try to create credentials from custom environment variable names.
    pub fn try_from_env_vars(public_var: &str, private_var: &str) -> Option<Self> {
        let public_key = std::env::var(public_var).ok()?;
        let private_key = std::env::var(private_var).ok()?;

        Some(Self {
            credentials: Credentials::new(public_key, private_key),
        })
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("my_key", "super_secret");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("my_key"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_identity_is_stable_per_key_pair() {
        let a = Credentials::new("key", "secret");
        let b = Credentials::new("key", "secret");
        let c = Credentials::new("key", "other");

        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), c.identity());
        // SHA-512 digest, hex encoded.
        assert_eq!(a.identity().as_str().len(), 128);
    }

    #[test]
    fn test_public_identity_differs_from_keyed() {
        let keyed = Credentials::new("public", "").identity();
        assert_ne!(keyed, CredentialIdentity::public());
        assert_eq!(CredentialIdentity::public().as_str(), "public");
    }

    #[test]
    fn test_identity_display_is_truncated() {
        let identity = Credentials::new("key", "secret").identity();
        let shown = identity.to_string();
        assert!(shown.len() < identity.as_str().len());
        assert!(identity.as_str().starts_with(shown.trim_end_matches('…')));
    }
}
