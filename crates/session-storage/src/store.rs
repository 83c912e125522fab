//! Typed session store on top of a [`KeyValueStorage`] backend.

use crate::{KeyValueStorage, StorageError, StorageKeys, StorageOp, StorageResult};
use std::fmt;
use tracing::{info, warn};

/// Backend session tokens. Always stored and cleared as a pair.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// Identity fields committed alongside the tokens of a successful exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub user_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub authorization_code: String,
}

/// Everything the store currently holds, read in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub tokens: Option<SessionTokens>,
    pub has_authorization_code: bool,
    pub is_logged_out: bool,
}

/// High-level API for the persisted session record.
pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
}

impl SessionStore {
    /// Create a new session store with the given storage backend
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    fn get_non_empty(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.storage.get(key)?.filter(|value| !value.is_empty()))
    }

    pub fn user_id(&self) -> StorageResult<Option<String>> {
        self.get_non_empty(StorageKeys::USER_ID)
    }

    pub fn full_name(&self) -> StorageResult<Option<String>> {
        self.get_non_empty(StorageKeys::FULL_NAME)
    }

    pub fn email(&self) -> StorageResult<Option<String>> {
        self.get_non_empty(StorageKeys::EMAIL)
    }

    pub fn authorization_code(&self) -> StorageResult<Option<String>> {
        self.get_non_empty(StorageKeys::AUTHORIZATION_CODE)
    }

    /// Whether the user explicitly ended their session. Defaults to false.
    pub fn is_logged_out(&self) -> StorageResult<bool> {
        match self.storage.get(StorageKeys::IS_LOGGED_OUT)?.as_deref() {
            None | Some("false") => Ok(false),
            Some("true") => Ok(true),
            Some(other) => Err(StorageError::Corrupt {
                key: StorageKeys::IS_LOGGED_OUT.to_string(),
                value: other.to_string(),
            }),
        }
    }

    /// The stored token pair, only when both halves are present.
    pub fn session_tokens(&self) -> StorageResult<Option<SessionTokens>> {
        let access = self.get_non_empty(StorageKeys::ACCESS_TOKEN)?;
        let refresh = self.get_non_empty(StorageKeys::REFRESH_TOKEN)?;

        match (access, refresh) {
            (Some(access), Some(refresh)) => Ok(Some(SessionTokens::new(access, refresh))),
            (None, None) => Ok(None),
            _ => {
                warn!("Session store holds only one token; treating as no session");
                Ok(None)
            }
        }
    }

    /// Commit a completed sign-in in one batch: identity, both tokens and
    /// the cleared logged-out flag.
    ///
    /// Absent name/email are removed, so nothing cached for a previous
    /// user survives. Same-user cached values must be merged by the caller.
    pub fn commit_sign_in(
        &self,
        identity: &IdentityRecord,
        tokens: &SessionTokens,
    ) -> StorageResult<()> {
        let ops = [
            StorageOp::set(StorageKeys::USER_ID, identity.user_id.as_str()),
            StorageOp::set(
                StorageKeys::AUTHORIZATION_CODE,
                identity.authorization_code.as_str(),
            ),
            optional_field(StorageKeys::FULL_NAME, identity.full_name.as_deref()),
            optional_field(StorageKeys::EMAIL, identity.email.as_deref()),
            StorageOp::set(StorageKeys::ACCESS_TOKEN, tokens.access_token.as_str()),
            StorageOp::set(StorageKeys::REFRESH_TOKEN, tokens.refresh_token.as_str()),
            StorageOp::set(StorageKeys::IS_LOGGED_OUT, "false"),
        ];

        self.storage.apply(&ops)?;
        info!(user_id = %identity.user_id, "Committed signed-in session");
        Ok(())
    }

    /// Remove every identity and token field and mark the user logged out.
    ///
    /// Idempotent: clearing an already-cleared store succeeds.
    pub fn clear_session(&self) -> StorageResult<()> {
        let mut ops: Vec<StorageOp> = StorageKeys::SESSION_KEYS
            .iter()
            .map(|key| StorageOp::delete(key))
            .collect();
        ops.push(StorageOp::set(StorageKeys::IS_LOGGED_OUT, "true"));

        self.storage.apply(&ops)?;
        info!("Cleared session store");
        Ok(())
    }

    /// Read the whole record.
    pub fn snapshot(&self) -> StorageResult<StoredSession> {
        Ok(StoredSession {
            user_id: self.user_id()?,
            full_name: self.full_name()?,
            email: self.email()?,
            tokens: self.session_tokens()?,
            has_authorization_code: self.authorization_code()?.is_some(),
            is_logged_out: self.is_logged_out()?,
        })
    }
}

fn optional_field(key: &str, value: Option<&str>) -> StorageOp {
    match value {
        Some(value) => StorageOp::set(key, value),
        None => StorageOp::delete(key),
    }
}
