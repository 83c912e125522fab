//! Client for the Sohwagi backend session API.
//!
//! Four one-shot JSON calls, no retries:
//! - exchange a provider authorization code for session tokens
//! - register a push token for the session
//! - log the session out
//! - revoke (delete) the account

mod backend;
mod client;
mod error;
mod types;

pub use backend::SessionBackend;
pub use client::{summarize_response_body, BackendClient, ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER};
pub use error::{BackendError, BackendResult};
pub use types::{endpoints, TokenPair};
