//! Blocking HTTP client for directory retrieval and nonce bootstrap

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, trace};

use crate::error::AcmeError;
use crate::nonce::{Nonce, NonceSource, REPLAY_NONCE_HEADER};
use crate::transport::{DirectoryTransport, HttpResponse};

/// User agent sent with every request
const USER_AGENT: &str = concat!("sentinel-acme/", env!("CARGO_PKG_VERSION"));

/// HTTP collaborator backed by `reqwest::blocking`
///
/// Performs exactly one request per call. Timeouts are whatever the
/// underlying client uses unless set with [`HttpClient::with_timeout`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the transport's default timeout
    pub fn new() -> Result<Self, AcmeError> {
        Self::build(None)
    }

    /// Create a client with an overall request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, AcmeError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, AcmeError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AcmeError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

impl DirectoryTransport for HttpClient {
    fn get(&self, url: &str) -> Result<HttpResponse, AcmeError> {
        let unreachable = |reason: String| AcmeError::DirectoryUnreachable {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| unreachable(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(|e| unreachable(e.to_string()))?;

        trace!(url = %url, status, bytes = body.len(), "Directory response received");
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

impl NonceSource for HttpClient {
    fn bootstrap(&self, nonce_url: &str) -> Result<Nonce, AcmeError> {
        let failed = |reason: String| AcmeError::NonceBootstrap {
            url: nonce_url.to_string(),
            reason,
        };

        let response = self
            .client
            .head(nonce_url)
            .send()
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("HTTP status {}", status.as_u16())));
        }

        let nonce = response
            .headers()
            .get(REPLAY_NONCE_HEADER)
            .ok_or_else(|| failed(format!("response has no {} header", REPLAY_NONCE_HEADER)))?
            .to_str()
            .map_err(|e| failed(e.to_string()))?;

        debug!(nonce_url = %nonce_url, "Obtained initial ACME nonce");
        Ok(Nonce::from(nonce))
    }
}
