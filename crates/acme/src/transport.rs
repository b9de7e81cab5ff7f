//! Transport seam for remote directory retrieval

use crate::error::AcmeError;

/// Raw HTTP response as seen by the directory loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking transport used to fetch directory documents
///
/// Implementations perform exactly one request per call and never retry.
/// Network failures and timeouts are reported as
/// [`AcmeError::DirectoryUnreachable`].
pub trait DirectoryTransport {
    /// Issue a `GET` request to `url`
    fn get(&self, url: &str) -> Result<HttpResponse, AcmeError>;
}

impl<T: DirectoryTransport + ?Sized> DirectoryTransport for &T {
    fn get(&self, url: &str) -> Result<HttpResponse, AcmeError> {
        (**self).get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_success() {
        let response = |status| HttpResponse {
            status,
            body: Vec::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
        assert!(!response(503).is_success());
    }
}
