//! Inbound script messages.

use crate::{BridgeError, BridgeResult};
use tracing::debug;

pub const LOGOUT_HANDLER: &str = "logoutHandler";
pub const DELETE_ACCOUNT_HANDLER: &str = "deleteAccountHandler";
pub const READY_HANDLER: &str = "webViewReady";

/// Body the page posts on [`LOGOUT_HANDLER`].
pub const LOGOUT_MESSAGE: &str = "logout";
/// Body the page posts on [`DELETE_ACCOUNT_HANDLER`].
pub const DELETE_ACCOUNT_MESSAGE: &str = "deleteAccount";

/// A message posted by the web app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeMessage {
    Ready,
    Logout,
    DeleteAccount,
}

impl BridgeMessage {
    /// Every handler name the host must register.
    pub const HANDLERS: [&'static str; 3] = [LOGOUT_HANDLER, DELETE_ACCOUNT_HANDLER, READY_HANDLER];

    /// Route on the handler name. The body is informational only.
    pub fn from_script_message(name: &str, body: &serde_json::Value) -> BridgeResult<Self> {
        let (message, expected_body) = match name {
            LOGOUT_HANDLER => (BridgeMessage::Logout, Some(LOGOUT_MESSAGE)),
            DELETE_ACCOUNT_HANDLER => (BridgeMessage::DeleteAccount, Some(DELETE_ACCOUNT_MESSAGE)),
            READY_HANDLER => (BridgeMessage::Ready, None),
            other => return Err(BridgeError::UnknownHandler(other.to_string())),
        };

        if let Some(expected) = expected_body {
            if body.as_str() != Some(expected) {
                debug!(handler = name, body = %body, "Unexpected script message body");
            }
        }

        Ok(message)
    }

    pub fn handler_name(self) -> &'static str {
        match self {
            BridgeMessage::Ready => READY_HANDLER,
            BridgeMessage::Logout => LOGOUT_HANDLER,
            BridgeMessage::DeleteAccount => DELETE_ACCOUNT_HANDLER,
        }
    }
}
