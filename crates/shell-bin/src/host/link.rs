//! Request/response correlation over the host channel.

use super::protocol::{CoreMessage, ErrorInfo, HostMethod};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostCallError {
    /// The host answered with an error.
    #[error("Host error {}: {}", .0.code, .0.message)]
    Rejected(ErrorInfo),

    /// The host closed the channel before answering.
    #[error("Host disconnected")]
    Disconnected,
}

type Reply = Result<serde_json::Value, HostCallError>;

/// Shared handle for talking to the host.
///
/// Outbound messages go through an unbounded channel drained by the stdout
/// writer. Pending requests are resolved when the matching `response` event
/// is read from stdin.
pub struct HostLink {
    outbound: mpsc::UnboundedSender<CoreMessage>,
    pending: Mutex<HashMap<String, oneshot::Sender<Reply>>>,
    closed: AtomicBool,
}

impl HostLink {
    pub fn new(outbound: mpsc::UnboundedSender<CoreMessage>) -> Self {
        Self {
            outbound,
            pending: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Send a one-way message.
    pub fn notify(&self, message: CoreMessage) {
        if self.outbound.send(message).is_err() {
            debug!("Host writer closed; dropping notification");
        }
    }

    /// Send a request and wait for the host to answer it.
    pub async fn call(
        &self,
        method: HostMethod,
        params: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, HostCallError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(HostCallError::Disconnected);
        }
        let id = uuid::Uuid::new_v4().to_string();
        let message = CoreMessage::Request {
            id: id.clone(),
            method,
            params,
        };

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id.clone(), tx);

        if self.outbound.send(message).is_err() {
            self.pending.lock().remove(&id);
            return Err(HostCallError::Disconnected);
        }
        debug!(request_id = %id, method = ?method, "Sent host request");

        rx.await.unwrap_or(Err(HostCallError::Disconnected))
    }

    /// Deliver a host response. Returns false for an unknown id.
    pub fn resolve(
        &self,
        id: &str,
        result: Option<serde_json::Value>,
        error: Option<ErrorInfo>,
    ) -> bool {
        let Some(tx) = self.pending.lock().remove(id) else {
            warn!(request_id = %id, "Response for unknown host request");
            return false;
        };

        // A missing or null result is a successful empty reply.
        let reply = match error {
            Some(error) => Err(HostCallError::Rejected(error)),
            None => Ok(result.unwrap_or(serde_json::Value::Null)),
        };
        // The caller may have been dropped; nothing to do then.
        let _ = tx.send(reply);
        true
    }

    /// Fail every outstanding and future request with `Disconnected`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let drained: Vec<_> = self.pending.lock().drain().collect();
        if !drained.is_empty() {
            debug!(count = drained.len(), "Abandoning pending host requests");
        }
        for (_, tx) in drained {
            let _ = tx.send(Err(HostCallError::Disconnected));
        }
    }

    #[cfg(test)]
    fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}
