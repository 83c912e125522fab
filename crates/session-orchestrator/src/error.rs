//! Orchestrator error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// Session store error
    #[error("Storage error: {0}")]
    Storage(#[from] session_storage::StorageError),

    /// Sign in with Apple error
    #[error("Identity provider error: {0}")]
    Identity(#[from] identity_provider::IdentityProviderError),

    /// Backend session API error
    #[error("Backend error: {0}")]
    Backend(#[from] backend_session_client::BackendError),

    /// Web view bridge error
    #[error("Bridge error: {0}")]
    Bridge(#[from] web_bridge::BridgeError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] shell_config_and_utils::CoreError),

    /// Invalid state transition in the shell FSM
    #[error("Invalid shell state transition: {0}")]
    InvalidStateTransition(String),

    /// A logout or deletion landed while this sign-in was in flight
    #[error("Sign-in superseded by a session change")]
    Superseded,
}

impl AuthError {
    /// The user backed out of the sign-in sheet.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            AuthError::Identity(identity_provider::IdentityProviderError::Cancelled)
        )
    }
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
