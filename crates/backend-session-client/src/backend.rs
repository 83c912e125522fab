//! Trait seam over the backend so the orchestrator can run against fakes.

use crate::{BackendResult, TokenPair};
use async_trait::async_trait;

#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Trade a single-use provider code for session tokens.
    async fn exchange_code(&self, authorization_code: &str, user_name: &str)
        -> BackendResult<TokenPair>;

    /// Attach a push token to the session.
    async fn register_push_token(
        &self,
        fcm_token: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> BackendResult<()>;

    /// End the session server-side. Only HTTP 200 counts as success.
    async fn logout(&self, access_token: &str, refresh_token: &str) -> BackendResult<()>;

    /// Delete the account server-side. Only HTTP 200 counts as success.
    async fn revoke_account(&self, access_token: &str, refresh_token: &str) -> BackendResult<()>;
}
