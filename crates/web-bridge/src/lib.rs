//! Bridge between the native shell and the embedded web app.
//!
//! Outbound, the shell injects `window.receiveUserInfo({...})` once the page
//! reports it is ready and session tokens exist. Inbound, the page posts
//! script messages on three named handlers.

mod bridge;
mod message;
mod user_info;

pub use bridge::{Delivery, ScriptEvaluator, WebBridge};
pub use message::{
    BridgeMessage, DELETE_ACCOUNT_HANDLER, DELETE_ACCOUNT_MESSAGE, LOGOUT_HANDLER, LOGOUT_MESSAGE,
    READY_HANDLER,
};
pub use user_info::{render_script, UserInfo, RECEIVE_USER_INFO_FN};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    /// The page posted on a handler we never registered
    #[error("Unknown script message handler: {0}")]
    UnknownHandler(String),

    /// The host failed to run the injected script
    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type BridgeResult<T> = Result<T, BridgeError>;
