//! Well-known ACME endpoint registry
//!
//! Maps human-readable service names to the base URL of the ACME server.
//! The directory document lives at `<base>/directory`.

use tracing::trace;

use crate::error::AcmeError;

/// Service used when the caller does not select a source
pub const DEFAULT_SERVICE: &str = "LetsEncrypt-Staging";

/// Path appended to a registry base URL to form the directory URL
pub const DIRECTORY_PATH: &str = "/directory";

/// Known ACME services, in display order
const KNOWN_ENDPOINTS: &[(&str, &str)] = &[
    ("LetsEncrypt-Staging", "https://acme-staging-v02.api.letsencrypt.org"),
    ("LetsEncrypt", "https://acme-v02.api.letsencrypt.org"),
];

/// Look up the base URL of a known service
///
/// Matching is exact and case-sensitive.
///
/// # Errors
///
/// Returns [`AcmeError::UnknownEndpoint`] listing every registered name
/// when `name` is not registered.
pub fn lookup(name: &str) -> Result<&'static str, AcmeError> {
    match KNOWN_ENDPOINTS.iter().find(|(key, _)| *key == name) {
        Some((_, base_url)) => {
            trace!(service = %name, base_url = %base_url, "Resolved ACME service name");
            Ok(*base_url)
        }
        None => Err(AcmeError::unknown_endpoint(name, &known_names())),
    }
}

/// Names of all registered services
pub fn known_names() -> Vec<&'static str> {
    KNOWN_ENDPOINTS.iter().map(|(name, _)| *name).collect()
}

/// All registry entries as `(name, base_url)` pairs
pub fn entries() -> &'static [(&'static str, &'static str)] {
    KNOWN_ENDPOINTS
}

/// Form the directory URL for a registry base URL
pub fn directory_url(base_url: &str) -> String {
    format!("{}{}", base_url, DIRECTORY_PATH)
}
