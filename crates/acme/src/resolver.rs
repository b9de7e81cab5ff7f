//! Service directory resolution
//!
//! Ties the pipeline together:
//!
//! ```text
//! DirectorySource ──resolve──▶ ResolvedSource ──load──▶ Directory ──activate──▶ AcmeContext
//! ```
//!
//! Resolution and loading failures abort before any activation step runs.
//! The directory is returned to the caller whatever the activation flags.

use std::sync::Arc;

use tracing::{debug, info};

use crate::activator::{self, Activation};
use crate::context::AcmeContext;
use crate::directory::Directory;
use crate::error::AcmeError;
use crate::http::HttpClient;
use crate::loader;
use crate::nonce::NonceSource;
use crate::source::DirectorySource;
use crate::transport::DirectoryTransport;

/// A single directory resolution request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveRequest {
    /// Where the directory comes from
    pub source: DirectorySource,
    /// Which ambient state to publish afterwards
    pub activation: Activation,
}

impl ResolveRequest {
    /// Request for `source` without activation
    pub fn new(source: DirectorySource) -> Self {
        Self {
            source,
            activation: Activation::NONE,
        }
    }

    /// Set the activation steps
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }
}

/// Resolves service directories through explicit collaborators
#[derive(Debug, Clone)]
pub struct DirectoryResolver<T, N> {
    transport: T,
    nonce_source: N,
}

impl<T: DirectoryTransport, N: NonceSource> DirectoryResolver<T, N> {
    /// Create a resolver from a transport and a nonce source
    pub fn new(transport: T, nonce_source: N) -> Self {
        Self {
            transport,
            nonce_source,
        }
    }

    /// Resolve, load and optionally activate a directory
    ///
    /// # Errors
    ///
    /// Any resolution, load or activation error. On an activation error the
    /// steps that already ran stay in effect.
    pub fn resolve(
        &self,
        request: &ResolveRequest,
        ctx: &AcmeContext,
    ) -> Result<Directory, AcmeError> {
        debug!(
            source = %request.source,
            activate_directory = request.activation.directory,
            activate_nonce = request.activation.nonce,
            "Resolving ACME service directory"
        );

        let resolved = request.source.resolve()?;
        let directory = Arc::new(loader::load(&resolved, &self.transport)?);

        activator::activate(ctx, &directory, request.activation, &self.nonce_source)?;

        info!(source = %request.source, "Resolved ACME service directory");
        Ok(Arc::unwrap_or_clone(directory))
    }
}

impl DirectoryResolver<HttpClient, HttpClient> {
    /// Resolver using one HTTP client for both directory and nonce requests
    pub fn with_http_client(client: HttpClient) -> Self {
        Self::new(client.clone(), client)
    }
}

/// Resolve a directory with the default HTTP client and the global context
///
/// Convenience wrapper for callers relying on ambient state; see
/// [`AcmeContext::global`].
pub fn get_service_directory(request: &ResolveRequest) -> Result<Directory, AcmeError> {
    let resolver = DirectoryResolver::with_http_client(HttpClient::new()?);
    resolver.resolve(request, AcmeContext::global())
}
