//! Session orchestration driven by the shell FSM.
//!
//! The FSM tracks what the host should show. Session data lives in the
//! [`SessionStore`]; the orchestrator is the only writer.

use crate::push::{run_push_registration, PushJob};
use crate::shell_fsm::{ShellMachine, ShellMachineInput, ShellState, ShellStateChangedPayload};
use crate::{AuthError, AuthResult};
use backend_session_client::SessionBackend;
use identity_provider::{
    resolve_profile, CachedProfile, IdentityProvider, PushTokenSource, ResolvedProfile,
    DEFAULT_SCOPES,
};
use parking_lot::Mutex;
use serde::Serialize;
use session_storage::{IdentityRecord, SessionStore, SessionTokens, StoredSession};
use shell_config_and_utils::Config;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use web_bridge::{BridgeMessage, Delivery, ScriptEvaluator, UserInfo, WebBridge};

/// Callback type for shell state change notifications.
pub type ShellStateCallback = Box<dyn Fn(ShellStateChangedPayload) + Send + Sync>;

/// Knobs taken from the shell configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub splash_duration: Duration,
    pub web_app_url: String,
}

impl OrchestratorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            splash_duration: config.splash_duration(),
            web_app_url: config.web_app_url.clone(),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// External collaborators the orchestrator drives.
#[derive(Clone)]
pub struct Collaborators {
    pub identity: Arc<dyn IdentityProvider>,
    pub push_source: Arc<dyn PushTokenSource>,
    pub backend: Arc<dyn SessionBackend>,
    pub evaluator: Arc<dyn ScriptEvaluator>,
}

/// Point-in-time view of the shell for the host and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellSnapshot {
    pub state: ShellState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub has_session: bool,
    pub is_logged_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndSessionKind {
    Logout,
    DeleteAccount,
}

impl EndSessionKind {
    fn as_str(self) -> &'static str {
        match self {
            EndSessionKind::Logout => "logout",
            EndSessionKind::DeleteAccount => "delete_account",
        }
    }
}

/// Coordinates the store, the identity provider, the backend and the bridge.
///
/// Constructed once by the host and shared behind an `Arc`.
pub struct SessionOrchestrator {
    store: Arc<SessionStore>,
    identity: Arc<dyn IdentityProvider>,
    push_source: Arc<dyn PushTokenSource>,
    backend: Arc<dyn SessionBackend>,
    bridge: Arc<WebBridge>,
    settings: OrchestratorSettings,
    fsm: Mutex<ShellMachine>,
    /// Bumped whenever a session ends. In-flight work compares against it.
    epoch: Arc<AtomicU64>,
    /// Serializes token commits against session clears.
    commit_lock: Mutex<()>,
    push_task: Mutex<Option<JoinHandle<()>>>,
    state_callback: Mutex<Option<ShellStateCallback>>,
}

impl SessionOrchestrator {
    pub fn new(
        store: Arc<SessionStore>,
        collaborators: Collaborators,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            identity: collaborators.identity,
            push_source: collaborators.push_source,
            backend: collaborators.backend,
            bridge: Arc::new(WebBridge::new(collaborators.evaluator)),
            settings,
            fsm: Mutex::new(ShellMachine::new()),
            epoch: Arc::new(AtomicU64::new(0)),
            commit_lock: Mutex::new(()),
            push_task: Mutex::new(None),
            state_callback: Mutex::new(None),
        }
    }

    /// Set a callback to be notified of shell state changes.
    pub fn set_state_callback(&self, callback: ShellStateCallback) {
        *self.state_callback.lock() = Some(callback);
    }

    pub fn bridge(&self) -> &WebBridge {
        &self.bridge
    }

    /// Current FSM state.
    pub fn state(&self) -> ShellState {
        ShellState::from(self.fsm.lock().state())
    }

    /// Current state plus the persisted session summary.
    pub fn snapshot(&self) -> AuthResult<ShellSnapshot> {
        let stored = self.store.snapshot()?;
        Ok(ShellSnapshot {
            state: self.state(),
            user_id: stored.user_id,
            full_name: stored.full_name,
            email: stored.email,
            has_session: stored.tokens.is_some(),
            is_logged_out: stored.is_logged_out,
        })
    }

    /// Transition the FSM and notify the callback if the state changed.
    fn transition(&self, input: &ShellMachineInput) -> AuthResult<ShellState> {
        let mut fsm = self.fsm.lock();
        let old_state = ShellState::from(fsm.state());

        fsm.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                fsm.state()
            ))
        })?;

        let new_state = ShellState::from(fsm.state());
        drop(fsm);

        if old_state != new_state {
            debug!(old_state = %old_state, new_state = %new_state, "Shell state transition");
            self.notify_state_change(new_state);
        }

        Ok(new_state)
    }

    fn notify_state_change(&self, state: ShellState) {
        let callback = self.state_callback.lock();
        if let Some(callback) = callback.as_ref() {
            callback(ShellStateChangedPayload {
                state,
                url: state
                    .shows_content()
                    .then(|| self.settings.web_app_url.clone()),
            });
        }
    }

    // ==========================================
    // Launch and auto-login
    // ==========================================

    /// Hold the splash for the configured interval, then run the auto-login check.
    pub async fn launch(&self) -> AuthResult<ShellState> {
        if self.state() != ShellState::Splashing {
            return Err(AuthError::InvalidStateTransition(format!(
                "launch requested in state {}",
                self.state()
            )));
        }

        tokio::time::sleep(self.settings.splash_duration).await;
        self.transition(&ShellMachineInput::SplashElapsed)?;
        self.check_auto_login().await
    }

    async fn check_auto_login(&self) -> AuthResult<ShellState> {
        match self.restore_session().await {
            Ok(Some(info)) => {
                if let Err(e) = self.bridge.publish(info).await {
                    warn!(error = %e, "Failed to queue restored session for web view");
                }
                info!("Restored session from cached credential");
                self.transition(&ShellMachineInput::CredentialAuthorized)
            }
            Ok(None) => self.transition(&ShellMachineInput::ManualLoginRequired),
            Err(e) => {
                warn!(error = %e, "Auto-login check failed; falling back to manual login");
                self.transition(&ShellMachineInput::ManualLoginRequired)
            }
        }
    }

    /// Cached session payload when auto-login may proceed.
    async fn restore_session(&self) -> AuthResult<Option<UserInfo>> {
        if self.store.is_logged_out()? {
            info!("User logged out previously; skipping auto-login");
            return Ok(None);
        }

        let Some(user_id) = self.store.user_id()? else {
            debug!("No cached user; manual login required");
            return Ok(None);
        };

        let credential_state = self.identity.query_credential_state(&user_id).await?;
        if !credential_state.is_authorized() {
            info!(user_id = %user_id, credential_state = ?credential_state, "Cached credential no longer authorized");
            return Ok(None);
        }

        let stored = self.store.snapshot()?;
        if stored.tokens.is_none() {
            info!(user_id = %user_id, "Credential authorized but no backend session cached");
            return Ok(None);
        }

        Ok(Some(user_info(&stored)))
    }

    // ==========================================
    // Sign-in
    // ==========================================

    /// Run interactive sign-in and the backend code exchange.
    ///
    /// Only valid on the login screen. On any failure the shell returns to
    /// the login screen and the store is left untouched.
    pub async fn sign_in(&self) -> AuthResult<()> {
        self.transition(&ShellMachineInput::SignInRequested)?;
        let epoch = self.epoch.load(Ordering::SeqCst);

        match self.perform_sign_in(epoch).await {
            Ok(tokens) => {
                self.transition(&ShellMachineInput::SignInSucceeded)?;
                self.spawn_push_registration(PushJob::Fetch, tokens, epoch);
                Ok(())
            }
            Err(e) => {
                if e.is_cancellation() {
                    info!("Sign-in cancelled by user");
                } else {
                    warn!(error = %e, "Sign-in failed");
                }
                self.transition(&ShellMachineInput::SignInFailed)?;
                Err(e)
            }
        }
    }

    async fn perform_sign_in(&self, epoch: u64) -> AuthResult<SessionTokens> {
        let credential = self
            .identity
            .request_interactive_sign_in(&DEFAULT_SCOPES)
            .await?;
        credential.validate()?;

        let cached = CachedProfile {
            user_id: self.store.user_id()?,
            full_name: self.store.full_name()?,
            email: self.store.email()?,
        };
        let profile = resolve_profile(&credential, cached);
        info!(user_id = %profile.user_id, "Provider sign-in succeeded");

        let pair = self
            .backend
            .exchange_code(&credential.authorization_code, profile.user_name())
            .await?;
        let tokens = SessionTokens::new(pair.access_token, pair.refresh_token);

        // Identity is only persisted together with tokens from its own exchange.
        {
            let _guard = self.commit_lock.lock();
            if self.epoch.load(Ordering::SeqCst) != epoch {
                warn!(user_id = %profile.user_id, "Session changed during code exchange; discarding tokens");
                return Err(AuthError::Superseded);
            }
            self.store.commit_sign_in(
                &IdentityRecord {
                    user_id: profile.user_id.clone(),
                    full_name: profile.full_name.clone(),
                    email: profile.email.clone(),
                    authorization_code: credential.authorization_code.clone(),
                },
                &tokens,
            )?;
        }

        if let Err(e) = self.bridge.publish(signed_in_info(&profile, &tokens)).await {
            warn!(error = %e, "Failed to hand new session to web view");
        }

        Ok(tokens)
    }

    // ==========================================
    // Push tokens
    // ==========================================

    fn spawn_push_registration(&self, job: PushJob, tokens: SessionTokens, epoch: u64) {
        let handle = tokio::spawn(run_push_registration(
            job,
            tokens,
            epoch,
            self.epoch.clone(),
            self.push_source.clone(),
            self.backend.clone(),
            self.bridge.clone(),
        ));

        if let Some(previous) = self.push_task.lock().replace(handle) {
            if !previous.is_finished() {
                debug!("Previous push registration still running; leaving it to finish");
            }
        }
    }

    /// The messaging SDK rotated the push token.
    ///
    /// Returns whether the token was forwarded. Ignored without a live session.
    pub fn on_push_token_refreshed(&self, token: &str) -> AuthResult<bool> {
        if token.is_empty() {
            debug!("Ignoring empty push token refresh");
            return Ok(false);
        }
        if self.store.is_logged_out()? {
            debug!("Push token refreshed while logged out; ignoring");
            return Ok(false);
        }
        let Some(tokens) = self.store.session_tokens()? else {
            debug!("Push token refreshed before a session exists; ignoring");
            return Ok(false);
        };

        let epoch = self.epoch.load(Ordering::SeqCst);
        self.spawn_push_registration(PushJob::Known(token.to_string()), tokens, epoch);
        Ok(true)
    }

    /// Wait for the most recent push registration task, if any.
    pub async fn wait_for_push_registration(&self) {
        let handle = self.push_task.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Push registration task ended abnormally");
            }
        }
    }

    // ==========================================
    // Logout and account deletion
    // ==========================================

    /// End the session server-side, then clear local state.
    pub async fn logout(&self) -> AuthResult<()> {
        self.end_session(EndSessionKind::Logout).await
    }

    /// Delete the account server-side, then clear local state.
    pub async fn delete_account(&self) -> AuthResult<()> {
        self.end_session(EndSessionKind::DeleteAccount).await
    }

    async fn end_session(&self, kind: EndSessionKind) -> AuthResult<()> {
        let operation = kind.as_str();
        let showing_content = match self.state() {
            ShellState::LoadingContent => {
                self.transition(&ShellMachineInput::EndSessionRequested)?;
                true
            }
            ShellState::EndingSession => {
                return Err(AuthError::InvalidStateTransition(format!(
                    "{} requested while another session change is in flight",
                    operation
                )));
            }
            _ => false,
        };

        let result = self.end_session_inner(kind).await;

        if showing_content {
            let input = if result.is_ok() {
                ShellMachineInput::SessionEnded
            } else {
                ShellMachineInput::EndSessionFailed
            };
            self.transition(&input)?;
        }

        match &result {
            Ok(()) => info!(operation, "Session ended"),
            Err(e) => warn!(operation, error = %e, "Failed to end session; keeping it"),
        }
        result
    }

    async fn end_session_inner(&self, kind: EndSessionKind) -> AuthResult<()> {
        match self.store.session_tokens()? {
            Some(tokens) => {
                match kind {
                    EndSessionKind::Logout => {
                        self.backend
                            .logout(&tokens.access_token, &tokens.refresh_token)
                            .await?
                    }
                    EndSessionKind::DeleteAccount => {
                        self.backend
                            .revoke_account(&tokens.access_token, &tokens.refresh_token)
                            .await?
                    }
                }
            }
            None => {
                info!(operation = kind.as_str(), "No backend session; clearing local state only");
            }
        }

        {
            let _guard = self.commit_lock.lock();
            self.epoch.fetch_add(1, Ordering::SeqCst);
            self.store.clear_session()?;
        }
        self.bridge.reset().await;
        Ok(())
    }

    // ==========================================
    // Bridge
    // ==========================================

    /// Route a message posted by the web app.
    pub async fn handle_bridge_message(&self, message: BridgeMessage) -> AuthResult<()> {
        debug!(handler = message.handler_name(), "Bridge message received");
        match message {
            BridgeMessage::Ready => {
                if self.bridge.handle_ready().await? == Delivery::Deferred {
                    debug!("Web view ready; user info deferred");
                }
                Ok(())
            }
            BridgeMessage::Logout => self.logout().await,
            BridgeMessage::DeleteAccount => self.delete_account().await,
        }
    }

    /// Parse and route a raw script message.
    pub async fn handle_script_message(
        &self,
        name: &str,
        body: &serde_json::Value,
    ) -> AuthResult<()> {
        let message = BridgeMessage::from_script_message(name, body)?;
        self.handle_bridge_message(message).await
    }
}

fn user_info(stored: &StoredSession) -> UserInfo {
    UserInfo {
        access_token: stored.tokens.as_ref().map(|t| t.access_token.clone()),
        refresh_token: stored.tokens.as_ref().map(|t| t.refresh_token.clone()),
        full_name: stored.full_name.clone(),
        email: stored.email.clone(),
        user_id: stored.user_id.clone(),
        fcm_token: None,
    }
}

fn signed_in_info(profile: &ResolvedProfile, tokens: &SessionTokens) -> UserInfo {
    UserInfo {
        access_token: Some(tokens.access_token.clone()),
        refresh_token: Some(tokens.refresh_token.clone()),
        full_name: profile.full_name.clone(),
        email: profile.email.clone(),
        user_id: Some(profile.user_id.clone()),
        fcm_token: None,
    }
}
