//! Directory and logging KDL parsing.

use anyhow::Result;
use std::path::PathBuf;
use tracing::trace;

use crate::{default_log_level, DirectoryConfig, LogFormat, LoggingConfig};

use super::{get_bool_entry, get_int_entry, get_string_entry};

/// Parse the `acme-directory` block
pub fn parse_directory_config(node: &kdl::KdlNode) -> Result<DirectoryConfig> {
    trace!("Parsing directory configuration block");

    let timeout_secs = match get_int_entry(node, "timeout-secs") {
        Some(v) if v <= 0 => {
            return Err(anyhow::anyhow!(
                "directory 'timeout-secs' must be a positive integer, got {}",
                v
            ));
        }
        Some(v) => Some(u64::try_from(v)?),
        None => None,
    };

    let config = DirectoryConfig {
        service: get_string_entry(node, "service"),
        url: get_string_entry(node, "url"),
        path: get_string_entry(node, "path").map(PathBuf::from),
        activate_directory: get_bool_entry(node, "activate-directory").unwrap_or(false),
        activate_nonce: get_bool_entry(node, "activate-nonce").unwrap_or(false),
        timeout_secs,
        export: get_string_entry(node, "export").map(PathBuf::from),
    };

    trace!(
        service = ?config.service,
        url = ?config.url,
        path = ?config.path,
        activate_directory = config.activate_directory,
        activate_nonce = config.activate_nonce,
        "Parsed directory configuration"
    );

    Ok(config)
}

/// Parse the `logging` block
pub fn parse_logging_config(node: &kdl::KdlNode) -> Result<LoggingConfig> {
    let format = match get_string_entry(node, "format") {
        Some(s) => LogFormat::from_str_loose(&s).ok_or_else(|| {
            anyhow::anyhow!("Invalid log format '{}'. Valid formats: text, json", s)
        })?,
        None => LogFormat::default(),
    };

    Ok(LoggingConfig {
        level: get_string_entry(node, "level").unwrap_or_else(default_log_level),
        format,
    })
}
