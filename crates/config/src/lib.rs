//! Configuration for the Sentinel ACME directory bootstrap
//!
//! Configuration is read from KDL (preferred) or JSON, selected by file
//! extension:
//!
//! ```kdl
//! acme-directory {
//!     service "LetsEncrypt"
//!     activate-directory #true
//!     activate-nonce #true
//!     timeout-secs 30
//!     export "/var/lib/sentinel/acme/directory.msgpack"
//! }
//!
//! logging {
//!     level "info"
//!     format "json"
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod kdl;

// ============================================================================
// Configuration Types
// ============================================================================

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory source and activation settings
    #[serde(rename = "acme-directory")]
    pub directory: DirectoryConfig,
    /// Log output settings
    pub logging: LoggingConfig,
}

/// Directory source and activation settings
///
/// At most one of `service`, `url` and `path` should be set; the resolver
/// rejects conflicting selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DirectoryConfig {
    /// Registered service name, e.g. `LetsEncrypt`
    pub service: Option<String>,
    /// Explicit directory URL
    pub url: Option<String>,
    /// Local JSON or MessagePack snapshot
    pub path: Option<PathBuf>,
    /// Publish the directory as ambient state
    pub activate_directory: bool,
    /// Bootstrap and publish an initial nonce
    pub activate_nonce: bool,
    /// Overall HTTP request timeout
    pub timeout_secs: Option<u64>,
    /// Write a snapshot of the resolved directory here
    pub export: Option<PathBuf>,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

pub fn default_log_level() -> String {
    "info".to_string()
}

impl LogFormat {
    /// Parse a format name, case-insensitively
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Config Implementation
// ============================================================================

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("kdl");

        debug!(path = %path.display(), format = %extension, "Loading configuration");

        let config = match extension {
            "kdl" => Self::from_kdl(&content),
            "json" => Self::from_json(&content),
            _ => Err(anyhow::anyhow!("Unsupported config format: {}", extension)),
        }?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from KDL format
    pub fn from_kdl(content: &str) -> Result<Self> {
        let doc: ::kdl::KdlDocument = content
            .parse()
            .map_err(|e: ::kdl::KdlError| anyhow::anyhow!("{}", kdl::render_parse_error(content, &e)))?;

        kdl::parse_kdl_document(doc)
    }

    /// Parse configuration from JSON format
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse JSON configuration")
    }

    /// Check values that cannot be expressed in the types
    pub fn validate(&self) -> Result<()> {
        if self.directory.timeout_secs == Some(0) {
            return Err(anyhow::anyhow!(
                "directory timeout-secs must be greater than 0"
            ));
        }

        if self.logging.level.trim().is_empty() {
            return Err(anyhow::anyhow!("logging level must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.directory.service, None);
        assert!(!config.directory.activate_directory);
        assert!(!config.directory.activate_nonce);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json(
            r#"{
                "acme-directory": {
                    "url": "https://ca.internal/directory",
                    "activate-nonce": true,
                    "timeout-secs": 10
                },
                "logging": { "format": "json" }
            }"#,
        )
        .unwrap();

        assert_eq!(
            config.directory.url.as_deref(),
            Some("https://ca.internal/directory")
        );
        assert!(config.directory.activate_nonce);
        assert!(!config.directory.activate_directory);
        assert_eq!(config.directory.timeout_secs, Some(10));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file_kdl() {
        let mut file = tempfile::Builder::new().suffix(".kdl").tempfile().unwrap();
        writeln!(
            file,
            r#"acme-directory {{
    path "/var/lib/sentinel/acme/directory.json"
    activate-directory #true
}}"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(
            config.directory.path,
            Some(PathBuf::from("/var/lib/sentinel/acme/directory.json"))
        );
        assert!(config.directory.activate_directory);
    }

    #[test]
    fn test_from_file_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported config format"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.directory.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_format_loose() {
        assert_eq!(LogFormat::from_str_loose("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::from_str_loose("pretty"), Some(LogFormat::Text));
        assert_eq!(LogFormat::from_str_loose("xml"), None);
    }
}
