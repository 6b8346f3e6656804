//! Per-document script nonce.

use std::fmt;

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of a generated nonce.
pub const NONCE_LEN: usize = 32;

/// Token that scopes inline script execution to one bootstrap document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    /// Fresh random token. Never reuse one across document builds.
    pub fn generate() -> Self {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(NONCE_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// A caller-chosen token, for reproducible documents.
    pub fn fixed(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
