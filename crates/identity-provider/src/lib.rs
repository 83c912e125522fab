//! Identity provider and push-token seams.
//!
//! The actual Sign in with Apple sheet and the messaging SDK live in the
//! native host. This crate defines the data they hand back and the async
//! traits the orchestrator calls them through.

mod credential;
mod profile;
mod provider;

pub use credential::{CredentialState, IdentityCredential, PersonName, Scope, DEFAULT_SCOPES};
pub use profile::{resolve_profile, CachedProfile, ResolvedProfile};
pub use provider::{IdentityProvider, PushTokenSource};

use thiserror::Error;

/// Errors surfaced by the identity provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityProviderError {
    /// The user dismissed the sign-in sheet
    #[error("Sign-in was cancelled")]
    Cancelled,

    /// The provider reported a failure
    #[error("Identity provider failed: {0}")]
    Failed(String),

    /// The provider returned a credential we cannot use
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The provider could not be reached at all
    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the push-token source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PushTokenError {
    #[error("Push token fetch failed: {0}")]
    Failed(String),

    /// The messaging SDK has no token yet
    #[error("Push token not available")]
    NotAvailable,
}

/// Result type for identity provider calls.
pub type IdentityResult<T> = Result<T, IdentityProviderError>;
