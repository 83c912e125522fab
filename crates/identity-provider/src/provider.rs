//! Collaborator traits implemented by the native host.

use crate::{CredentialState, IdentityCredential, IdentityResult, PushTokenError, Scope};
use async_trait::async_trait;

/// The OAuth identity provider (Sign in with Apple).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Present the interactive sign-in sheet. Never retried by callers.
    async fn request_interactive_sign_in(
        &self,
        scopes: &[Scope],
    ) -> IdentityResult<IdentityCredential>;

    /// Ask whether a previously seen user is still authorized.
    async fn query_credential_state(&self, user_id: &str) -> IdentityResult<CredentialState>;
}

/// The external messaging SDK that issues push tokens.
#[async_trait]
pub trait PushTokenSource: Send + Sync {
    async fn fetch_push_token(&self) -> Result<String, PushTokenError>;
}
