//! One-shot session commands that run without a host.

use super::open_store;
use crate::host::Detached;
use backend_session_client::BackendClient;
use session_orchestrator::{Collaborators, OrchestratorSettings, SessionOrchestrator};
use shell_config_and_utils::{Config, Paths};
use std::sync::Arc;

/// Which server-side call ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndSession {
    Logout,
    DeleteAccount,
}

/// Print what the session store holds.
pub fn show_status(paths: &Paths, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = paths.session_store_file();
    if !path.exists() {
        println!("No session store at {}", path.display());
        return Ok(());
    }

    let session = open_store(paths, false)?.snapshot()?;

    if json {
        let summary = serde_json::json!({
            "user_id": session.user_id,
            "full_name": session.full_name,
            "email": session.email,
            "has_session": session.tokens.is_some(),
            "has_authorization_code": session.has_authorization_code,
            "is_logged_out": session.is_logged_out,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    match &session.user_id {
        Some(user_id) if session.tokens.is_some() => println!("Signed in as {}", user_id),
        Some(user_id) => println!("Known user {} (no backend session)", user_id),
        None => println!("Not signed in"),
    }
    if let Some(name) = &session.full_name {
        println!("  Name:       {}", name);
    }
    if let Some(email) = &session.email {
        println!("  Email:      {}", email);
    }
    println!("  Logged out: {}", session.is_logged_out);
    println!("  Store:      {}", path.display());
    Ok(())
}

/// Log out or delete the account from the command line.
pub async fn end_session(
    config: &Config,
    paths: &Paths,
    kind: EndSession,
) -> Result<(), Box<dyn std::error::Error>> {
    let detached = Arc::new(Detached);
    let orchestrator = SessionOrchestrator::new(
        open_store(paths, false)?,
        Collaborators {
            identity: detached.clone(),
            push_source: detached.clone(),
            backend: Arc::new(BackendClient::from_config(config)?),
            evaluator: detached,
        },
        OrchestratorSettings::from_config(config),
    );

    match kind {
        EndSession::Logout => {
            orchestrator.logout().await?;
            println!("Logged out");
        }
        EndSession::DeleteAccount => {
            orchestrator.delete_account().await?;
            println!("Account deleted");
        }
    }
    Ok(())
}
