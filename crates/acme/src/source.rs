//! Directory source selection
//!
//! A caller picks exactly one of: a registered service name, an explicit
//! directory URL, or a local snapshot path. The choice is captured once as a
//! [`DirectorySource`] and resolved into a [`ResolvedSource`] that tells the
//! loader which branch to take.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::error::AcmeError;
use crate::registry;

/// Where the directory should come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySource {
    /// Registered service name, e.g. `LetsEncrypt`
    Named(String),
    /// Directory URL, used verbatim
    ByUrl(String),
    /// Local JSON or MessagePack snapshot
    ByPath(PathBuf),
}

/// Source after resolution, tagged with the branch that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSource {
    /// Fetch the directory document from this URL
    Remote { url: String },
    /// Load the directory from this file
    Local { path: PathBuf },
}

impl DirectorySource {
    /// Build a source from optional, mutually exclusive inputs
    ///
    /// With nothing supplied the default staging service is selected.
    ///
    /// # Errors
    ///
    /// Returns [`AcmeError::AmbiguousSource`] when more than one input is
    /// supplied, or when a supplied input is blank. No I/O happens here.
    pub fn from_parts(
        service: Option<&str>,
        url: Option<&str>,
        path: Option<&str>,
    ) -> Result<Self, AcmeError> {
        let supplied: Vec<&str> = [
            service.map(|_| "service name"),
            url.map(|_| "directory URL"),
            path.map(|_| "path"),
        ]
        .into_iter()
        .flatten()
        .collect();

        if supplied.len() > 1 {
            return Err(AcmeError::AmbiguousSource(format!(
                "only one of service name, directory URL or path may be given (got {})",
                supplied.join(", ")
            )));
        }

        let source = match (service, url, path) {
            (Some(name), None, None) => DirectorySource::Named(non_blank(name, "service name")?),
            (None, Some(url), None) => DirectorySource::ByUrl(non_blank(url, "directory URL")?),
            (None, None, Some(path)) => {
                DirectorySource::ByPath(PathBuf::from(non_blank(path, "path")?))
            }
            _ => DirectorySource::default(),
        };

        Ok(source)
    }

    /// Resolve into a directory URL or a local path
    ///
    /// # Errors
    ///
    /// Returns [`AcmeError::UnknownEndpoint`] when a named service is not
    /// registered.
    pub fn resolve(&self) -> Result<ResolvedSource, AcmeError> {
        let resolved = match self {
            DirectorySource::Named(name) => {
                let base_url = registry::lookup(name)?;
                ResolvedSource::Remote {
                    url: registry::directory_url(base_url),
                }
            }
            DirectorySource::ByUrl(url) => ResolvedSource::Remote { url: url.clone() },
            DirectorySource::ByPath(path) => ResolvedSource::Local { path: path.clone() },
        };

        debug!(source = %self, resolved = ?resolved, "Resolved ACME directory source");
        Ok(resolved)
    }
}

impl Default for DirectorySource {
    fn default() -> Self {
        DirectorySource::Named(registry::DEFAULT_SERVICE.to_string())
    }
}

impl fmt::Display for DirectorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectorySource::Named(name) => write!(f, "service '{}'", name),
            DirectorySource::ByUrl(url) => write!(f, "url '{}'", url),
            DirectorySource::ByPath(path) => write!(f, "path '{}'", path.display()),
        }
    }
}

fn non_blank(value: &str, what: &str) -> Result<String, AcmeError> {
    if value.trim().is_empty() {
        return Err(AcmeError::AmbiguousSource(format!("{} must not be empty", what)));
    }
    Ok(value.to_string())
}
