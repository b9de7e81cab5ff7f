//! Directory loading and snapshot export
//!
//! Turns a [`ResolvedSource`] into a [`Directory`]:
//!
//! - remote sources are fetched with a single `GET` through a
//!   [`DirectoryTransport`] and parsed as JSON
//! - local sources are read from disk and parsed as JSON or MessagePack,
//!   depending on [`SnapshotFormat::for_path`]
//!
//! [`export_directory`] writes the complementary snapshot files.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::directory::Directory;
use crate::error::AcmeError;
use crate::format::SnapshotFormat;
use crate::source::ResolvedSource;
use crate::transport::DirectoryTransport;

/// Load a directory from a resolved source
pub fn load<T: DirectoryTransport + ?Sized>(
    source: &ResolvedSource,
    transport: &T,
) -> Result<Directory, AcmeError> {
    match source {
        ResolvedSource::Remote { url } => load_remote(transport, url),
        ResolvedSource::Local { path } => load_local(path),
    }
}

/// Fetch and parse the directory document at `url`
///
/// Any transport failure or non-2xx status is reported as
/// [`AcmeError::DirectoryUnreachable`]. The request is never retried.
pub fn load_remote<T: DirectoryTransport + ?Sized>(
    transport: &T,
    url: &str,
) -> Result<Directory, AcmeError> {
    debug!(url = %url, "Fetching ACME directory");

    let response = transport.get(url)?;
    if !response.is_success() {
        warn!(url = %url, status = response.status, "ACME directory request failed");
        return Err(AcmeError::DirectoryUnreachable {
            url: url.to_string(),
            reason: format!("HTTP status {}", response.status),
        });
    }

    let directory = directory_from_json(&response.body)
        .map_err(|reason| AcmeError::InvalidDirectoryDocument {
            url: url.to_string(),
            reason,
        })?
        .with_resource_url(url);

    info!(
        url = %url,
        new_nonce = ?directory.new_nonce(),
        new_order = ?directory.new_order(),
        "Loaded ACME directory"
    );
    Ok(directory)
}

/// Read and parse a local directory snapshot
///
/// # Errors
///
/// Returns [`AcmeError::SnapshotRead`] if the file cannot be read and
/// [`AcmeError::MalformedSnapshot`] if it does not parse under the format
/// selected by its name.
pub fn load_local(path: &Path) -> Result<Directory, AcmeError> {
    let format = SnapshotFormat::for_path(path);
    debug!(path = %path.display(), format = %format, "Loading ACME directory snapshot");

    let bytes = fs::read(path).map_err(|source| AcmeError::SnapshotRead {
        path: path.to_path_buf(),
        source,
    })?;

    let malformed = |reason: String| AcmeError::MalformedSnapshot {
        path: path.to_path_buf(),
        format,
        reason,
    };

    let directory: Directory = match format {
        SnapshotFormat::Json => directory_from_json(&bytes).map_err(malformed)?,
        SnapshotFormat::MessagePack => directory_from_msgpack(&bytes).map_err(malformed)?,
    };

    info!(
        path = %path.display(),
        format = %format,
        resource_url = ?directory.resource_url(),
        "Loaded ACME directory snapshot"
    );
    Ok(directory)
}

/// Parse a JSON directory document, which must be a JSON object
fn directory_from_json(bytes: &[u8]) -> Result<Directory, String> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err(format!("expected a JSON object, found {}", json_kind(&value)));
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Decode a MessagePack snapshot, rejecting trailing bytes
fn directory_from_msgpack(bytes: &[u8]) -> Result<Directory, String> {
    let mut remaining = bytes;
    let mut deserializer = rmp_serde::Deserializer::new(&mut remaining);
    let directory = Directory::deserialize(&mut deserializer).map_err(|e| e.to_string())?;
    drop(deserializer);

    if !remaining.is_empty() {
        return Err(format!(
            "{} trailing bytes after directory snapshot",
            remaining.len()
        ));
    }
    Ok(directory)
}

/// Write a directory snapshot to `path`
///
/// A `.json` name produces pretty-printed JSON in the ACME directory shape;
/// any other name produces a MessagePack snapshot readable by
/// [`load_local`].
pub fn export_directory(directory: &Directory, path: &Path) -> Result<(), AcmeError> {
    let format = SnapshotFormat::for_path(path);
    let write_error = |reason: String| AcmeError::SnapshotWrite {
        path: path.to_path_buf(),
        format,
        reason,
    };

    let bytes = match format {
        SnapshotFormat::Json => {
            serde_json::to_vec_pretty(directory).map_err(|e| write_error(e.to_string()))?
        }
        SnapshotFormat::MessagePack => {
            rmp_serde::to_vec_named(directory).map_err(|e| write_error(e.to_string()))?
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
    }
    fs::write(path, bytes).map_err(|e| write_error(e.to_string()))?;

    info!(path = %path.display(), format = %format, "Exported ACME directory snapshot");
    Ok(())
}
