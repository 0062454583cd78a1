//! Admin authentication.
//!
//! Only destructive order operations are guarded; everything else is open to
//! any caller that reaches the server.

mod extractor;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

pub use extractor::{AdminAuth, AuthError};

/// The configured admin key.
///
/// Wrapped in `SecretString` so `Debug` never prints it and memory is zeroed
/// on drop.
#[derive(Clone)]
pub struct AdminKey(Option<SecretString>);

impl AdminKey {
    pub fn new(key: Option<String>) -> Self {
        Self(key.filter(|k| !k.is_empty()).map(SecretString::from))
    }

    /// Whether an admin key is configured at all.
    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Compare `provided` with the stored key in constant time.
    /// Always false when no key is configured.
    pub fn verify(&self, provided: &str) -> bool {
        match &self.0 {
            Some(secret) => secret
                .expose_secret()
                .as_bytes()
                .ct_eq(provided.as_bytes())
                .into(),
            None => false,
        }
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(_) => write!(f, "AdminKey([REDACTED])"),
            None => write!(f, "AdminKey(None)"),
        }
    }
}
