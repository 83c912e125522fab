//! NDJSON protocol spoken with the native host over stdin/stdout.
//!
//! One JSON object per line. The host sends [`HostEvent`]s; the core sends
//! [`CoreMessage`]s, either requests the host must answer with a matching
//! `response` event, or one-way notifications.

use serde::{Deserialize, Serialize};
use session_orchestrator::ShellStateChangedPayload;

/// Methods the core asks the host to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostMethod {
    /// Present the interactive sign-in sheet.
    #[serde(rename = "identity.sign_in")]
    IdentitySignIn,
    /// Look up whether a cached user's credential is still valid.
    #[serde(rename = "identity.credential_state")]
    IdentityCredentialState,
    /// Fetch the current push token from the messaging SDK.
    #[serde(rename = "push.fetch_token")]
    PushFetchToken,
    /// Run a script in the web view.
    #[serde(rename = "webview.evaluate_script")]
    WebviewEvaluateScript,
}

/// Error payload in a host response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: i32,
    pub message: String,
}

/// Messages read from the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The user tapped the sign-in button.
    SignInRequested,
    /// The web app posted on a script message handler.
    ScriptMessage {
        name: String,
        #[serde(default)]
        body: serde_json::Value,
    },
    /// The messaging SDK rotated the push token.
    PushTokenRefreshed { token: String },
    /// Answer to a [`CoreMessage::Request`].
    Response {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<ErrorInfo>,
    },
    /// The host is going away.
    Shutdown,
}

impl HostEvent {
    pub fn from_json(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Messages written to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoreMessage {
    Request {
        id: String,
        method: HostMethod,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<serde_json::Value>,
    },
    StateChanged {
        state: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl CoreMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<ShellStateChangedPayload> for CoreMessage {
    fn from(payload: ShellStateChangedPayload) -> Self {
        CoreMessage::StateChanged {
            state: payload.state.as_str().to_string(),
            url: payload.url,
        }
    }
}

/// Error codes the host uses in responses.
pub mod error_codes {
    /// The user dismissed the sign-in sheet.
    pub const CANCELLED: i32 = 1001;
    /// The provider returned a credential the host could not use.
    pub const INVALID_CREDENTIAL: i32 = 1002;
    /// The capability is missing on this device.
    pub const NOT_AVAILABLE: i32 = 1003;
}
