//! Outbound user info payload.

use crate::BridgeResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Global function the web app exposes to receive session data.
pub const RECEIVE_USER_INFO_FN: &str = "window.receiveUserInfo";

/// Key/value pairs handed to the web app. Absent fields are omitted.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, rename = "userID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fcm_token: Option<String>,
}

impl UserInfo {
    pub fn push_token(token: impl Into<String>) -> Self {
        Self {
            fcm_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Both tokens are known; only then is the payload worth sending.
    pub fn has_tokens(&self) -> bool {
        self.access_token.is_some() && self.refresh_token.is_some()
    }

    /// Overlay every field present in `update`.
    pub fn merge(&mut self, update: UserInfo) {
        fn overlay(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }

        overlay(&mut self.access_token, update.access_token);
        overlay(&mut self.refresh_token, update.refresh_token);
        overlay(&mut self.full_name, update.full_name);
        overlay(&mut self.email, update.email);
        overlay(&mut self.user_id, update.user_id);
        overlay(&mut self.fcm_token, update.fcm_token);
    }
}

impl fmt::Debug for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("UserInfo")
            .field("access_token", &redacted(&self.access_token))
            .field("refresh_token", &redacted(&self.refresh_token))
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("user_id", &self.user_id)
            .field("fcm_token", &redacted(&self.fcm_token))
            .finish()
    }
}

/// Build the script that hands `info` to the page.
///
/// The payload is a JSON object literal, so every value arrives as a string
/// property regardless of quotes or newlines inside it.
pub fn render_script(info: &UserInfo) -> BridgeResult<String> {
    let json = serde_json::to_string(info)?
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029");
    Ok(format!("{}({});", RECEIVE_USER_INFO_FN, json))
}
