//! Wire types for the backend session API.

use crate::{BackendError, BackendResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Endpoint paths, relative to the configured base URL.
pub mod endpoints {
    pub const APPLE_LOGIN: &str = "/oauth/apple/login";
    pub const FCM_TOKENS: &str = "/users/fcmTokens";
    pub const LOGOUT: &str = "/users/logout";
    pub const APPLE_REVOKE: &str = "/oauth/apple/revoke";
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExchangeRequest<'a> {
    pub authorization_code: &'a str,
    pub user_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PushTokenRequest<'a> {
    pub fcm_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExchangeResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Tokens issued by a successful code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    /// Parse an exchange response body. Both tokens must be present and non-empty.
    pub fn from_exchange_body(body: &str) -> BackendResult<Self> {
        let parsed: ExchangeResponse = serde_json::from_str(body)
            .map_err(|e| BackendError::Protocol(format!("invalid exchange response: {}", e)))?;

        let access_token = parsed.access_token.filter(|t| !t.is_empty());
        let refresh_token = parsed.refresh_token.filter(|t| !t.is_empty());

        match (access_token, refresh_token) {
            (Some(access_token), Some(refresh_token)) => Ok(Self {
                access_token,
                refresh_token,
            }),
            (None, _) => Err(BackendError::Protocol(
                "exchange response missing accessToken".to_string(),
            )),
            (_, None) => Err(BackendError::Protocol(
                "exchange response missing refreshToken".to_string(),
            )),
        }
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenPair { .. }")
    }
}
