//! Merging fresh credentials with cached profile fields.

use crate::IdentityCredential;
use tracing::debug;

/// Profile fields for the signed-in user after cache fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl ResolvedProfile {
    /// Name sent to the backend on code exchange. Empty when unknown.
    pub fn user_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or_default()
    }
}

/// Profile fields cached from an earlier sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedProfile {
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Prefer what the provider just delivered, fall back to the cache.
///
/// The cache is only consulted when it belongs to the same identifier.
pub fn resolve_profile(credential: &IdentityCredential, cached: CachedProfile) -> ResolvedProfile {
    let fresh_name = credential.full_name.as_ref().and_then(|name| name.formatted());
    let fresh_email = credential
        .email
        .as_ref()
        .map(|email| email.trim().to_string())
        .filter(|email| !email.is_empty());

    let same_user = cached.user_id.as_deref() == Some(credential.user_identifier.as_str());
    let (cached_full_name, cached_email) = if same_user {
        (cached.full_name, cached.email)
    } else {
        if cached.full_name.is_some() || cached.email.is_some() {
            debug!(
                user_id = %credential.user_identifier,
                "Cached profile belongs to another user; ignoring it"
            );
        }
        (None, None)
    };

    ResolvedProfile {
        user_id: credential.user_identifier.clone(),
        full_name: fresh_name.or(cached_full_name),
        email: fresh_email.or(cached_email),
    }
}
