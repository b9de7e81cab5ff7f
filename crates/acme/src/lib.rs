//! Sentinel ACME directory bootstrap
//!
//! Resolves the service directory of an ACME server and optionally publishes
//! it, together with an initial anti-replay nonce, as ambient state for later
//! protocol operations.
//!
//! # Architecture
//!
//! - [`registry`] - well-known service names and their base URLs
//! - [`DirectorySource`] - the caller's choice of service name, URL or path
//! - [`loader`] - remote retrieval, local snapshots and snapshot export
//! - [`activator`] - publishing into an [`AcmeContext`]
//! - [`DirectoryResolver`] - the full pipeline over pluggable collaborators
//!
//! # Example
//!
//! ```no_run
//! use sentinel_acme::{
//!     Activation, AcmeContext, DirectoryResolver, DirectorySource, HttpClient, ResolveRequest,
//! };
//!
//! # fn main() -> Result<(), sentinel_acme::AcmeError> {
//! let resolver = DirectoryResolver::with_http_client(HttpClient::new()?);
//! let ctx = AcmeContext::new();
//!
//! let request = ResolveRequest::new(DirectorySource::Named("LetsEncrypt".into()))
//!     .with_activation(Activation::ALL);
//! let directory = resolver.resolve(&request, &ctx)?;
//!
//! assert_eq!(ctx.directory().as_deref(), Some(&directory));
//! # Ok(())
//! # }
//! ```

pub mod activator;
pub mod context;
pub mod directory;
pub mod error;
pub mod format;
pub mod http;
pub mod loader;
pub mod nonce;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod transport;

pub use activator::Activation;
pub use context::AcmeContext;
pub use directory::{Directory, DirectoryBuilder, DirectoryMeta};
pub use error::AcmeError;
pub use format::SnapshotFormat;
pub use http::HttpClient;
pub use loader::{export_directory, load_local, load_remote};
pub use nonce::{Nonce, NonceSource, NonceState};
pub use resolver::{get_service_directory, DirectoryResolver, ResolveRequest};
pub use source::{DirectorySource, ResolvedSource};
pub use transport::{DirectoryTransport, HttpResponse};
