//! Delivery of user info into the embedded page.

use crate::{render_script, BridgeError, BridgeResult, UserInfo};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Runs JavaScript in the embedded web view. Implemented by the host.
#[async_trait]
pub trait ScriptEvaluator: Send + Sync {
    async fn evaluate_script(&self, script: &str) -> BridgeResult<()>;
}

/// Outcome of a readiness signal or payload update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The script was evaluated.
    Sent,
    /// Nothing sent yet; the page is not ready or tokens are unknown.
    Deferred,
}

#[derive(Default)]
struct BridgeState {
    ready: bool,
    payload: UserInfo,
}

/// Holds the latest payload and pushes it whenever the page can take it.
///
/// The lock is held across evaluation so two deliveries never interleave.
pub struct WebBridge {
    evaluator: Arc<dyn ScriptEvaluator>,
    state: Mutex<BridgeState>,
}

impl WebBridge {
    pub fn new(evaluator: Arc<dyn ScriptEvaluator>) -> Self {
        Self {
            evaluator,
            state: Mutex::new(BridgeState::default()),
        }
    }

    /// The page finished loading. Resends the latest payload, if any.
    pub async fn handle_ready(&self) -> BridgeResult<Delivery> {
        let mut state = self.state.lock().await;
        state.ready = true;

        if !state.payload.has_tokens() {
            debug!("Web view ready before session tokens; deferring user info");
            return Ok(Delivery::Deferred);
        }

        self.deliver(&state.payload).await
    }

    /// Merge `update` into the payload and send it if the page is ready.
    pub async fn publish(&self, update: UserInfo) -> BridgeResult<Delivery> {
        let mut state = self.state.lock().await;
        state.payload.merge(update);

        if !state.ready {
            debug!("Web view not ready; user info queued");
            return Ok(Delivery::Deferred);
        }
        if !state.payload.has_tokens() {
            debug!("No session tokens yet; user info queued");
            return Ok(Delivery::Deferred);
        }

        self.deliver(&state.payload).await
    }

    /// Forget the payload and readiness. Called when the session ends.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *state = BridgeState::default();
        debug!("Bridge state reset");
    }

    pub async fn is_ready(&self) -> bool {
        self.state.lock().await.ready
    }

    /// Current payload.
    pub async fn payload(&self) -> UserInfo {
        self.state.lock().await.payload.clone()
    }

    async fn deliver(&self, payload: &UserInfo) -> BridgeResult<Delivery> {
        let script = render_script(payload)?;
        match self.evaluator.evaluate_script(&script).await {
            Ok(()) => {
                info!(
                    has_fcm_token = payload.fcm_token.is_some(),
                    "Delivered user info to web view"
                );
                Ok(Delivery::Sent)
            }
            Err(e) => {
                warn!(error = %e, "Failed to deliver user info to web view");
                Err(match e {
                    BridgeError::Evaluation(_) => e,
                    other => BridgeError::Evaluation(other.to_string()),
                })
            }
        }
    }
}
