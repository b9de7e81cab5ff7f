//! ACME directory error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::format::SnapshotFormat;

/// Errors that can occur while resolving, loading or activating an ACME directory
#[derive(Debug, Error)]
pub enum AcmeError {
    /// Service name is not in the endpoint registry
    #[error("Unknown ACME service '{name}'. Known services: {}", .known.join(", "))]
    UnknownEndpoint { name: String, known: Vec<String> },

    /// Directory source selection was empty or conflicting
    #[error("Ambiguous directory source: {0}")]
    AmbiguousSource(String),

    /// Remote directory could not be retrieved
    #[error("ACME directory at '{url}' is unreachable: {reason}")]
    DirectoryUnreachable { url: String, reason: String },

    /// Remote directory body was not a directory document
    #[error("Invalid ACME directory document from '{url}': {reason}")]
    InvalidDirectoryDocument { url: String, reason: String },

    /// Local snapshot could not be read
    #[error("Failed to read directory snapshot {}: {source}", .path.display())]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Local snapshot could not be parsed under its selected format
    #[error("Malformed {format} directory snapshot {}: {reason}", .path.display())]
    MalformedSnapshot {
        path: PathBuf,
        format: SnapshotFormat,
        reason: String,
    },

    /// Directory snapshot could not be written
    #[error("Failed to write {format} directory snapshot {}: {reason}", .path.display())]
    SnapshotWrite {
        path: PathBuf,
        format: SnapshotFormat,
        reason: String,
    },

    /// Nonce activation requested but the directory has no newNonce URL
    #[error("ACME directory does not provide a newNonce endpoint")]
    MissingNonceEndpoint,

    /// Initial nonce could not be obtained
    #[error("Failed to obtain initial nonce from '{url}': {reason}")]
    NonceBootstrap { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl AcmeError {
    /// Build an `UnknownEndpoint` error for the given name
    pub(crate) fn unknown_endpoint(name: &str, known: &[&str]) -> Self {
        AcmeError::UnknownEndpoint {
            name: name.to_string(),
            known: known.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_endpoint_lists_known_names() {
        let err = AcmeError::unknown_endpoint("Bogus", &["LetsEncrypt-Staging", "LetsEncrypt"]);
        let msg = err.to_string();
        assert!(msg.contains("'Bogus'"));
        assert!(msg.contains("LetsEncrypt-Staging, LetsEncrypt"));
    }

    #[test]
    fn test_malformed_snapshot_names_format() {
        let err = AcmeError::MalformedSnapshot {
            path: PathBuf::from("/tmp/dir.bin"),
            format: SnapshotFormat::MessagePack,
            reason: "invalid type".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed MessagePack directory snapshot /tmp/dir.bin: invalid type"
        );
    }
}
