//! Foreground run loop for a host-attached shell.

use super::open_store;
use crate::host::{
    serve, write_messages, CoreMessage, HostIdentityProvider, HostLink, HostPushTokenSource,
    HostScriptEvaluator,
};
use backend_session_client::BackendClient;
use session_orchestrator::{Collaborators, OrchestratorSettings, SessionOrchestrator};
use shell_config_and_utils::{Config, Paths};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Serve the host on stdin/stdout until it shuts down.
pub async fn run_shell(
    config: Config,
    paths: Paths,
    ephemeral: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        api_url = %config.api_base_url(),
        web_app_url = %config.web_app_url,
        ephemeral,
        "Starting shell core"
    );

    let store = open_store(&paths, ephemeral)?;
    let backend = Arc::new(BackendClient::from_config(&config)?);

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<CoreMessage>();
    let link = Arc::new(HostLink::new(outbound_tx));
    let writer = tokio::spawn(write_messages(outbound_rx, tokio::io::stdout()));

    let orchestrator = Arc::new(SessionOrchestrator::new(
        store,
        Collaborators {
            identity: Arc::new(HostIdentityProvider::new(link.clone())),
            push_source: Arc::new(HostPushTokenSource::new(link.clone())),
            backend,
            evaluator: Arc::new(HostScriptEvaluator::new(link.clone())),
        },
        OrchestratorSettings::from_config(&config),
    ));
    {
        let link = link.clone();
        orchestrator.set_state_callback(Box::new(move |payload| {
            link.notify(CoreMessage::from(payload));
        }));
    }

    let result = serve(BufReader::new(tokio::io::stdin()), orchestrator, link).await;

    // Every line is flushed as it is written, so nothing is lost here.
    writer.abort();
    match &result {
        Ok(()) => info!("Shell core stopped"),
        Err(e) => warn!(error = %e, "Host connection failed"),
    }
    result.map_err(Into::into)
}
