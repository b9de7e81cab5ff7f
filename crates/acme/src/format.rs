//! Snapshot format negotiation
//!
//! Local directory snapshots are either plain JSON in the ACME directory
//! shape, or a MessagePack export of a previously resolved [`Directory`].
//! The format is chosen purely from the file name.
//!
//! [`Directory`]: crate::Directory

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// On-disk format of a directory snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Plain JSON matching the ACME directory document
    Json,
    /// MessagePack export with named fields
    MessagePack,
}

impl SnapshotFormat {
    /// Select the format for a snapshot path
    ///
    /// A `.json` suffix (ASCII case-insensitive) selects [`SnapshotFormat::Json`];
    /// every other name, including names without an extension, selects
    /// [`SnapshotFormat::MessagePack`].
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::MessagePack,
        }
    }
}

impl fmt::Display for SnapshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotFormat::Json => write!(f, "JSON"),
            SnapshotFormat::MessagePack => write!(f, "MessagePack"),
        }
    }
}
