//! Ambient ACME protocol state
//!
//! Later protocol operations (account registration, order creation,
//! challenge submission) need the active directory and the current nonce.
//! [`AcmeContext`] holds both so callers can either pass a context
//! explicitly or rely on the process-wide instance from
//! [`AcmeContext::global`].
//!
//! Each slot holds at most one value. Publishing replaces the previous
//! value wholesale; there is no merging or history.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::directory::Directory;
use crate::nonce::{Nonce, NonceState};

static GLOBAL_CONTEXT: Lazy<AcmeContext> = Lazy::new(AcmeContext::new);

/// Directory and nonce state shared by ACME protocol operations
#[derive(Debug, Default)]
pub struct AcmeContext {
    directory: ArcSwapOption<Directory>,
    nonce: ArcSwapOption<NonceState>,
}

impl AcmeContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide shared context
    pub fn global() -> &'static AcmeContext {
        &GLOBAL_CONTEXT
    }

    /// Publish a directory, replacing any previous one
    pub fn set_directory(&self, directory: Arc<Directory>) {
        debug!(
            resource_url = ?directory.resource_url(),
            "Publishing ambient ACME directory"
        );
        self.directory.store(Some(directory));
    }

    /// Currently published directory
    pub fn directory(&self) -> Option<Arc<Directory>> {
        self.directory.load_full()
    }

    /// Publish a nonce and the endpoint used to refresh it
    pub fn set_nonce(&self, nonce: Nonce, nonce_url: impl Into<String>) {
        let state = NonceState {
            nonce,
            nonce_url: nonce_url.into(),
        };
        debug!(nonce_url = %state.nonce_url, "Publishing ambient ACME nonce");
        self.nonce.store(Some(Arc::new(state)));
    }

    /// Current nonce state
    pub fn nonce(&self) -> Option<Arc<NonceState>> {
        self.nonce.load_full()
    }

    /// Drop all ambient state
    pub fn clear(&self) {
        self.directory.store(None);
        self.nonce.store(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory(order_url: &str) -> Arc<Directory> {
        Arc::new(Directory::builder().new_order(order_url).build())
    }

    #[test]
    fn test_empty_by_default() {
        let ctx = AcmeContext::new();
        assert!(ctx.directory().is_none());
        assert!(ctx.nonce().is_none());
    }

    #[test]
    fn test_set_directory_overwrites() {
        let ctx = AcmeContext::new();

        ctx.set_directory(directory("https://first.example/order"));
        ctx.set_directory(directory("https://second.example/order"));

        let current = ctx.directory().unwrap();
        assert_eq!(current.new_order(), Some("https://second.example/order"));
    }

    #[test]
    fn test_set_directory_same_value_is_idempotent() {
        let ctx = AcmeContext::new();
        let dir = directory("https://ca.example/order");

        ctx.set_directory(Arc::clone(&dir));
        ctx.set_directory(Arc::clone(&dir));

        assert_eq!(ctx.directory().unwrap(), dir);
    }

    #[test]
    fn test_set_nonce_overwrites() {
        let ctx = AcmeContext::new();
        ctx.set_nonce(Nonce::from("n1"), "https://ca.example/new-nonce");
        ctx.set_nonce(Nonce::from("n2"), "https://ca.example/new-nonce");

        let state = ctx.nonce().unwrap();
        assert_eq!(state.nonce.as_str(), "n2");
        assert_eq!(state.nonce_url, "https://ca.example/new-nonce");
    }

    #[test]
    fn test_clear() {
        let ctx = AcmeContext::new();
        ctx.set_directory(directory("https://ca.example/order"));
        ctx.set_nonce(Nonce::from("n1"), "https://ca.example/new-nonce");

        ctx.clear();

        assert!(ctx.directory().is_none());
        assert!(ctx.nonce().is_none());
    }
}
