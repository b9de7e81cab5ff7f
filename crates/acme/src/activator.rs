//! Publishing a resolved directory into ambient state
//!
//! Two independent steps, each gated by its own flag:
//!
//! 1. directory: publish the directory into the [`AcmeContext`]
//! 2. nonce: bootstrap a nonce from the directory's `newNonce` endpoint and
//!    publish it together with that endpoint
//!
//! Steps run in that order and are not atomic. When the nonce step fails
//! the directory published by step 1 stays in place.

use std::sync::Arc;

use tracing::{info, warn};

use crate::context::AcmeContext;
use crate::directory::Directory;
use crate::error::AcmeError;
use crate::nonce::NonceSource;

/// Which activation steps to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Activation {
    /// Publish the directory as ambient state
    pub directory: bool,
    /// Bootstrap and publish an initial nonce
    pub nonce: bool,
}

impl Activation {
    /// Run no activation steps
    pub const NONE: Activation = Activation {
        directory: false,
        nonce: false,
    };

    /// Run both activation steps
    pub const ALL: Activation = Activation {
        directory: true,
        nonce: true,
    };
}

/// Run the requested activation steps for `directory`
///
/// # Errors
///
/// Returns [`AcmeError::MissingNonceEndpoint`] when nonce activation is
/// requested and the directory has no `newNonce` URL. No request is made in
/// that case. Errors from the nonce source are passed through.
pub fn activate<N: NonceSource + ?Sized>(
    ctx: &AcmeContext,
    directory: &Arc<Directory>,
    activation: Activation,
    nonce_source: &N,
) -> Result<(), AcmeError> {
    if activation.directory {
        ctx.set_directory(Arc::clone(directory));
        info!(
            resource_url = ?directory.resource_url(),
            "Activated ACME directory"
        );
    }

    if activation.nonce {
        let Some(nonce_url) = directory.new_nonce() else {
            warn!(
                resource_url = ?directory.resource_url(),
                "Cannot bootstrap nonce, directory has no newNonce endpoint"
            );
            return Err(AcmeError::MissingNonceEndpoint);
        };

        let nonce = nonce_source.bootstrap(nonce_url)?;
        ctx.set_nonce(nonce, nonce_url);
        info!(nonce_url = %nonce_url, "Activated ACME nonce");
    }

    Ok(())
}
