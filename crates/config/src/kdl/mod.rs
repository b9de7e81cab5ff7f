//! KDL configuration parsing
//!
//! Converts a parsed KDL document into [`Config`].

use anyhow::Result;
use tracing::trace;

use crate::Config;

mod directory;

pub use directory::{parse_directory_config, parse_logging_config};

// ============================================================================
// KDL Parsing Helpers
// ============================================================================

/// Convert a byte offset to line and column numbers (1-indexed)
pub fn offset_to_line_col(content: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in content.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// Helper to get a string entry from a KDL node
pub fn get_string_entry(node: &kdl::KdlNode, name: &str) -> Option<String> {
    node.children()
        .and_then(|children| children.get(name))
        .and_then(|n| n.entries().first())
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

/// Helper to get an integer entry from a KDL node
pub fn get_int_entry(node: &kdl::KdlNode, name: &str) -> Option<i128> {
    node.children()
        .and_then(|children| children.get(name))
        .and_then(|n| n.entries().first())
        .and_then(|e| e.value().as_integer())
}

/// Helper to get a boolean entry from a KDL node
pub fn get_bool_entry(node: &kdl::KdlNode, name: &str) -> Option<bool> {
    node.children()
        .and_then(|children| children.get(name))
        .and_then(|n| n.entries().first())
        .and_then(|e| e.value().as_bool())
}

/// Render a KDL parse error with a source excerpt
pub fn render_parse_error(content: &str, e: &kdl::KdlError) -> String {
    use miette::Diagnostic;

    let mut error_msg = String::new();
    error_msg.push_str("KDL configuration parse error:\n\n");

    let mut found_details = false;
    if let Some(related) = e.related() {
        for diagnostic in related {
            error_msg.push_str(&format!("  {}\n", diagnostic));
            found_details = true;

            if let Some(labels) = diagnostic.labels() {
                for label in labels {
                    let (line, col) = offset_to_line_col(content, label.offset());
                    error_msg.push_str(&format!("\n  --> at line {}, column {}\n", line, col));

                    if let Some(line_content) = content.lines().nth(line.saturating_sub(1)) {
                        error_msg.push_str(&format!("{:>4} | {}\n", line, line_content));
                        error_msg.push_str(&format!(
                            "     | {}^",
                            " ".repeat(col.saturating_sub(1))
                        ));
                        if let Some(label_msg) = label.label() {
                            error_msg.push_str(&format!(" {}", label_msg));
                        }
                        error_msg.push('\n');
                    }
                }
            }

            if let Some(help) = diagnostic.help() {
                error_msg.push_str(&format!("\n  Help: {}\n", help));
            }
        }
    }

    if !found_details {
        error_msg.push_str(&format!("  {}\n", e));
        error_msg.push_str("\n  Note: Check your KDL syntax. Common issues:\n");
        error_msg.push_str("    - Unclosed strings (missing closing quote)\n");
        error_msg.push_str("    - Unclosed blocks (missing closing brace)\n");
        error_msg.push_str("    - Booleans are written #true / #false\n");
    }

    error_msg
}

// ============================================================================
// Top-Level Document Parser
// ============================================================================

/// Convert a parsed KDL document to Config
pub fn parse_kdl_document(doc: kdl::KdlDocument) -> Result<Config> {
    let mut config = Config::default();

    for node in doc.nodes() {
        match node.name().value() {
            "acme-directory" => {
                config.directory = parse_directory_config(node)?;
            }
            "logging" => {
                config.logging = parse_logging_config(node)?;
            }
            other => {
                return Err(anyhow::anyhow!(
                    "Unknown top-level configuration block: '{}'\n\
                     Valid blocks are: acme-directory, logging",
                    other
                ));
            }
        }
    }

    trace!(
        service = ?config.directory.service,
        url = ?config.directory.url,
        path = ?config.directory.path,
        "Parsed KDL configuration"
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_line_col() {
        let content = "line one\nline two\n";
        assert_eq!(offset_to_line_col(content, 0), (1, 1));
        assert_eq!(offset_to_line_col(content, 5), (1, 6));
        assert_eq!(offset_to_line_col(content, 9), (2, 1));
    }

    #[test]
    fn test_unknown_top_level_block() {
        let err = Config::from_kdl("listeners {\n}\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'listeners'"));
        assert!(msg.contains("acme-directory, logging"));
    }

    #[test]
    fn test_bare_directory_block_is_rejected() {
        let err = Config::from_kdl("directory {\n    service \"LetsEncrypt\"\n}\n").unwrap_err();
        assert!(err.to_string().contains("'directory'"));
    }

    #[test]
    fn test_parse_error_is_rendered() {
        let err = Config::from_kdl("acme-directory {\n    service \"LetsEncrypt\n}\n").unwrap_err();
        assert!(err.to_string().contains("KDL configuration parse error"));
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::from_kdl("").unwrap(), Config::default());
    }
}
