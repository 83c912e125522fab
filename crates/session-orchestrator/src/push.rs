//! Best-effort push token hand-off.
//!
//! Runs detached from the FSM: nothing here can fail a sign-in.

use backend_session_client::SessionBackend;
use identity_provider::PushTokenSource;
use session_storage::SessionTokens;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use web_bridge::{UserInfo, WebBridge};

/// Where the push token comes from.
#[derive(Debug, Clone)]
pub(crate) enum PushJob {
    /// Ask the messaging SDK.
    Fetch,
    /// The SDK already told us.
    Known(String),
}

pub(crate) async fn run_push_registration(
    job: PushJob,
    tokens: SessionTokens,
    epoch: u64,
    current_epoch: Arc<AtomicU64>,
    push_source: Arc<dyn PushTokenSource>,
    backend: Arc<dyn SessionBackend>,
    bridge: Arc<WebBridge>,
) {
    let still_current = || current_epoch.load(Ordering::SeqCst) == epoch;

    let fcm_token = match job {
        PushJob::Known(token) => token,
        PushJob::Fetch => match push_source.fetch_push_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not fetch push token");
                return;
            }
        },
    };

    if !still_current() {
        debug!("Session ended before push token arrived; dropping it");
        return;
    }

    if let Err(e) = bridge.publish(UserInfo::push_token(fcm_token.as_str())).await {
        warn!(error = %e, "Failed to hand push token to web view");
    }

    if !still_current() {
        debug!("Session ended before push registration; skipping");
        return;
    }

    match backend
        .register_push_token(&fcm_token, &tokens.access_token, &tokens.refresh_token)
        .await
    {
        Ok(()) => info!("Registered push token with backend"),
        Err(e) => warn!(error = %e, status = ?e.status(), "Push token registration failed"),
    }
}
