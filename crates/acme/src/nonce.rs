//! Anti-replay nonces
//!
//! ACME servers require a fresh nonce on every signed request. The first
//! nonce is obtained from the directory's `newNonce` endpoint; later
//! responses carry the next one in their `Replay-Nonce` header.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AcmeError;

/// Header carrying a fresh nonce on ACME responses
pub const REPLAY_NONCE_HEADER: &str = "Replay-Nonce";

/// Opaque anti-replay token issued by an ACME server
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nonce(String);

impl Nonce {
    /// Create from an existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String
    pub fn into_string(self) -> String {
        self.0
    }
}

// Keep nonce values out of logs.
impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({} chars)", self.0.len())
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Nonce {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Nonce {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Current nonce together with the endpoint used to refresh it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonceState {
    /// Next nonce to put in a signed request
    pub nonce: Nonce,
    /// `newNonce` URL of the directory the nonce belongs to
    pub nonce_url: String,
}

/// Source of initial nonces
///
/// Implemented by [`HttpClient`](crate::HttpClient) for real servers and by
/// fakes in tests.
pub trait NonceSource {
    /// Obtain a fresh nonce from the given `newNonce` URL
    fn bootstrap(&self, nonce_url: &str) -> Result<Nonce, AcmeError>;
}

impl<T: NonceSource + ?Sized> NonceSource for &T {
    fn bootstrap(&self, nonce_url: &str) -> Result<Nonce, AcmeError> {
        (**self).bootstrap(nonce_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonce_conversions() {
        let nonce = Nonce::from("oFvnlFP1wIhRlYS2jTaXbA");
        assert_eq!(nonce.as_str(), "oFvnlFP1wIhRlYS2jTaXbA");
        assert_eq!(nonce.to_string(), "oFvnlFP1wIhRlYS2jTaXbA");
        assert_eq!(
            Nonce::from("abc".to_string()),
            Nonce::from_string("abc")
        );
        assert_eq!(nonce.into_string(), "oFvnlFP1wIhRlYS2jTaXbA");
    }

    #[test]
    fn test_nonce_debug_hides_value() {
        let nonce = Nonce::from("secret-token");
        let debug = format!("{:?}", nonce);
        assert!(!debug.contains("secret-token"));
        assert_eq!(debug, "Nonce(12 chars)");
    }
}
