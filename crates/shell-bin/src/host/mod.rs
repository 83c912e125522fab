//! Native host connection.
//!
//! The iOS shell process owns the UI, the identity provider sheet and the
//! web view. It talks to this core over NDJSON on stdio: events in, requests
//! and state notifications out.

mod adapters;
mod link;
mod protocol;

pub use adapters::{Detached, HostIdentityProvider, HostPushTokenSource, HostScriptEvaluator};
pub use link::HostLink;
pub use protocol::CoreMessage;

use protocol::HostEvent;

use session_orchestrator::{AuthError, SessionOrchestrator};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Drain outbound messages to the host, one JSON object per line.
pub async fn write_messages<W>(
    mut rx: mpsc::UnboundedReceiver<CoreMessage>,
    mut writer: W,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = match message.to_json() {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "Failed to encode host message");
                continue;
            }
        };
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// Launch the shell and route host events until shutdown or end of input.
pub async fn serve<R>(
    reader: R,
    orchestrator: Arc<SessionOrchestrator>,
    link: Arc<HostLink>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            match orchestrator.launch().await {
                Ok(state) => info!(state = %state, "Launch finished"),
                Err(e) => warn!(error = %e, "Launch failed"),
            }
        });
    }

    let (script_tx, script_rx) = mpsc::unbounded_channel();
    let scripts = tokio::spawn(handle_script_messages(script_rx, orchestrator.clone()));

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match HostEvent::from_json(line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Ignoring malformed host event");
                continue;
            }
        };

        match event {
            HostEvent::Response { id, result, error } => {
                link.resolve(&id, result, error);
            }
            HostEvent::SignInRequested => {
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    match orchestrator.sign_in().await {
                        Ok(()) => {}
                        Err(e @ AuthError::InvalidStateTransition(_)) => {
                            warn!(error = %e, "Sign-in request ignored")
                        }
                        Err(e) => debug!(error = %e, "Sign-in ended with error"),
                    }
                });
            }
            HostEvent::ScriptMessage { name, body } => {
                if script_tx.send((name, body)).is_err() {
                    warn!("Script message worker gone; dropping message");
                }
            }
            HostEvent::PushTokenRefreshed { token } => {
                match orchestrator.on_push_token_refreshed(&token) {
                    Ok(forwarded) => debug!(forwarded, "Push token refresh handled"),
                    Err(e) => warn!(error = %e, "Push token refresh failed"),
                }
            }
            HostEvent::Shutdown => {
                info!("Host requested shutdown");
                break;
            }
        }
    }

    drop(script_tx);
    link.close();
    if let Err(e) = scripts.await {
        warn!(error = %e, "Script message worker failed");
    }
    orchestrator.wait_for_push_registration().await;
    Ok(())
}

/// Handle the page's script messages one at a time, in the order posted.
async fn handle_script_messages(
    mut rx: mpsc::UnboundedReceiver<(String, serde_json::Value)>,
    orchestrator: Arc<SessionOrchestrator>,
) {
    while let Some((name, body)) = rx.recv().await {
        if let Err(e) = orchestrator.handle_script_message(&name, &body).await {
            warn!(handler = %name, error = %e, "Script message failed");
        }
    }
}
