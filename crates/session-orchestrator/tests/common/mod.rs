#![allow(dead_code)]

use async_trait::async_trait;
use backend_session_client::{BackendError, BackendResult, SessionBackend, TokenPair};
use identity_provider::{
    CredentialState, IdentityCredential, IdentityProvider, IdentityProviderError, IdentityResult,
    PersonName, PushTokenError, PushTokenSource, Scope,
};
use session_orchestrator::{
    Collaborators, OrchestratorSettings, SessionOrchestrator, ShellState,
};
use session_storage::{
    IdentityRecord, KeyValueStorage, MemoryStorage, SessionStore, SessionTokens,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use web_bridge::{BridgeError, BridgeResult, ScriptEvaluator, UserInfo};

pub const WEB_APP_URL: &str = "https://app.sohwagi.test";
pub const USER_ID: &str = "001234.abcdef";
pub const OTHER_USER_ID: &str = "005678.fedcba";

pub fn credential(code: &str) -> IdentityCredential {
    IdentityCredential {
        user_identifier: USER_ID.to_string(),
        full_name: Some(PersonName::new("Nayeon", "Koo")),
        email: Some("nayeon@example.com".to_string()),
        authorization_code: code.to_string(),
    }
}

pub fn status_error(status: u16) -> BackendError {
    BackendError::Status {
        status,
        body_summary: "len=0,digest=0".to_string(),
    }
}

// ==========================================
// Identity provider
// ==========================================

pub struct FakeIdentity {
    pub sign_in: Mutex<IdentityResult<IdentityCredential>>,
    pub credential_state: Mutex<IdentityResult<CredentialState>>,
    pub sign_in_calls: AtomicUsize,
    pub state_queries: Mutex<Vec<String>>,
}

impl Default for FakeIdentity {
    fn default() -> Self {
        Self {
            sign_in: Mutex::new(Ok(credential("code-1"))),
            credential_state: Mutex::new(Ok(CredentialState::Authorized)),
            sign_in_calls: AtomicUsize::new(0),
            state_queries: Mutex::new(Vec::new()),
        }
    }
}

impl FakeIdentity {
    pub fn set_sign_in(&self, outcome: IdentityResult<IdentityCredential>) {
        *self.sign_in.lock().unwrap() = outcome;
    }

    pub fn set_credential_state(&self, outcome: IdentityResult<CredentialState>) {
        *self.credential_state.lock().unwrap() = outcome;
    }

    pub fn state_query_count(&self) -> usize {
        self.state_queries.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn request_interactive_sign_in(
        &self,
        scopes: &[Scope],
    ) -> IdentityResult<IdentityCredential> {
        assert_eq!(scopes, [Scope::FullName, Scope::Email]);
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);
        self.sign_in.lock().unwrap().clone()
    }

    async fn query_credential_state(&self, user_id: &str) -> IdentityResult<CredentialState> {
        self.state_queries.lock().unwrap().push(user_id.to_string());
        self.credential_state.lock().unwrap().clone()
    }
}

// ==========================================
// Push token source
// ==========================================

pub struct FakePush {
    pub token: Mutex<Result<String, PushTokenError>>,
}

impl Default for FakePush {
    fn default() -> Self {
        Self {
            token: Mutex::new(Ok("fcm-1".to_string())),
        }
    }
}

#[async_trait]
impl PushTokenSource for FakePush {
    async fn fetch_push_token(&self) -> Result<String, PushTokenError> {
        self.token.lock().unwrap().clone()
    }
}

// ==========================================
// Backend
// ==========================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Exchange { code: String, user_name: String },
    RegisterPush { fcm: String, access: String, refresh: String },
    Logout { access: String, refresh: String },
    Revoke { access: String, refresh: String },
}

pub struct FakeBackend {
    pub exchange: Mutex<Result<(String, String), u16>>,
    pub register_status: Mutex<u16>,
    pub logout_status: Mutex<u16>,
    pub revoke_status: Mutex<u16>,
    pub calls: Mutex<Vec<BackendCall>>,
    /// When set, the next exchange waits for this before answering.
    pub exchange_gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// Signalled once an exchange call has been received.
    pub exchange_started: Mutex<Option<oneshot::Sender<()>>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            exchange: Mutex::new(Ok(("acc-1".to_string(), "ref-1".to_string()))),
            register_status: Mutex::new(200),
            logout_status: Mutex::new(200),
            revoke_status: Mutex::new(200),
            calls: Mutex::new(Vec::new()),
            exchange_gate: Mutex::new(None),
            exchange_started: Mutex::new(None),
        }
    }
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Hold the next exchange until the returned sender fires. The receiver
    /// resolves once the exchange is in flight.
    pub fn gate_exchange(&self) -> (oneshot::Sender<()>, oneshot::Receiver<()>) {
        let (release_tx, release_rx) = oneshot::channel();
        let (started_tx, started_rx) = oneshot::channel();
        *self.exchange_gate.lock().unwrap() = Some(release_rx);
        *self.exchange_started.lock().unwrap() = Some(started_tx);
        (release_tx, started_rx)
    }

    fn status_result(status: u16) -> BackendResult<()> {
        if status == 200 {
            Ok(())
        } else {
            Err(status_error(status))
        }
    }
}

#[async_trait]
impl SessionBackend for FakeBackend {
    async fn exchange_code(
        &self,
        authorization_code: &str,
        user_name: &str,
    ) -> BackendResult<TokenPair> {
        self.calls.lock().unwrap().push(BackendCall::Exchange {
            code: authorization_code.to_string(),
            user_name: user_name.to_string(),
        });

        if let Some(started) = self.exchange_started.lock().unwrap().take() {
            let _ = started.send(());
        }
        let gate = self.exchange_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let outcome = self.exchange.lock().unwrap().clone();
        match outcome {
            Ok((access_token, refresh_token)) => Ok(TokenPair {
                access_token,
                refresh_token,
            }),
            Err(status) => Err(status_error(status)),
        }
    }

    async fn register_push_token(
        &self,
        fcm_token: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> BackendResult<()> {
        self.calls.lock().unwrap().push(BackendCall::RegisterPush {
            fcm: fcm_token.to_string(),
            access: access_token.to_string(),
            refresh: refresh_token.to_string(),
        });
        Self::status_result(*self.register_status.lock().unwrap())
    }

    async fn logout(&self, access_token: &str, refresh_token: &str) -> BackendResult<()> {
        self.calls.lock().unwrap().push(BackendCall::Logout {
            access: access_token.to_string(),
            refresh: refresh_token.to_string(),
        });
        Self::status_result(*self.logout_status.lock().unwrap())
    }

    async fn revoke_account(&self, access_token: &str, refresh_token: &str) -> BackendResult<()> {
        self.calls.lock().unwrap().push(BackendCall::Revoke {
            access: access_token.to_string(),
            refresh: refresh_token.to_string(),
        });
        Self::status_result(*self.revoke_status.lock().unwrap())
    }
}

// ==========================================
// Web view
// ==========================================

#[derive(Default)]
pub struct RecordingEvaluator {
    pub scripts: Mutex<Vec<String>>,
    pub fail: Mutex<bool>,
}

impl RecordingEvaluator {
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    /// Payload of the most recent `window.receiveUserInfo(...)` call.
    pub fn last_payload(&self) -> Option<UserInfo> {
        let scripts = self.scripts();
        let script = scripts.last()?;
        let json = script
            .strip_prefix("window.receiveUserInfo(")?
            .strip_suffix(");")?;
        serde_json::from_str(json).ok()
    }
}

#[async_trait]
impl ScriptEvaluator for RecordingEvaluator {
    async fn evaluate_script(&self, script: &str) -> BridgeResult<()> {
        if *self.fail.lock().unwrap() {
            return Err(BridgeError::Evaluation("web view detached".to_string()));
        }
        self.scripts.lock().unwrap().push(script.to_string());
        Ok(())
    }
}

// ==========================================
// Harness
// ==========================================

pub struct Harness {
    pub orchestrator: Arc<SessionOrchestrator>,
    pub store: Arc<SessionStore>,
    pub identity: Arc<FakeIdentity>,
    pub push: Arc<FakePush>,
    pub backend: Arc<FakeBackend>,
    pub evaluator: Arc<RecordingEvaluator>,
    pub notifications: Arc<Mutex<Vec<(ShellState, Option<String>)>>>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(Arc::new(SessionStore::new(Box::new(MemoryStorage::new()))))
    }

    pub fn with_store(store: Arc<SessionStore>) -> Self {
        let identity = Arc::new(FakeIdentity::default());
        let push = Arc::new(FakePush::default());
        let backend = Arc::new(FakeBackend::default());
        let evaluator = Arc::new(RecordingEvaluator::default());

        let orchestrator = Arc::new(SessionOrchestrator::new(
            store.clone(),
            Collaborators {
                identity: identity.clone(),
                push_source: push.clone(),
                backend: backend.clone(),
                evaluator: evaluator.clone(),
            },
            OrchestratorSettings {
                splash_duration: Duration::ZERO,
                web_app_url: WEB_APP_URL.to_string(),
            },
        ));

        let notifications = Arc::new(Mutex::new(Vec::new()));
        let sink = notifications.clone();
        orchestrator.set_state_callback(Box::new(move |payload| {
            sink.lock().unwrap().push((payload.state, payload.url));
        }));

        Self {
            orchestrator,
            store,
            identity,
            push,
            backend,
            evaluator,
            notifications,
        }
    }

    /// Store contents of a user who signed in during an earlier run.
    pub fn seed_previous_session(&self) {
        self.store
            .commit_sign_in(
                &IdentityRecord {
                    user_id: USER_ID.to_string(),
                    full_name: Some("Nayeon Koo".to_string()),
                    email: Some("nayeon@example.com".to_string()),
                    authorization_code: "old-code".to_string(),
                },
                &SessionTokens::new("acc-0", "ref-0"),
            )
            .unwrap();
    }

    /// Launch with an empty store, landing on the login screen.
    pub async fn on_login_screen(&self) {
        let state = self.orchestrator.launch().await.unwrap();
        assert_eq!(state, ShellState::AwaitingManualLogin);
    }

    /// Launch, sign in and wait for push registration to settle.
    pub async fn signed_in(&self) {
        self.on_login_screen().await;
        self.orchestrator.sign_in().await.unwrap();
        self.orchestrator.wait_for_push_registration().await;
        assert_eq!(self.orchestrator.state(), ShellState::LoadingContent);
    }

    pub fn states(&self) -> Vec<ShellState> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|(state, _)| *state)
            .collect()
    }
}

/// Memory store holding raw key/value pairs, bypassing the typed API.
pub fn raw_store(entries: &[(&str, &str)]) -> Arc<SessionStore> {
    let storage = MemoryStorage::new();
    for (key, value) in entries {
        storage.set(key, value).unwrap();
    }
    Arc::new(SessionStore::new(Box::new(storage)))
}

pub fn provider_failure() -> IdentityProviderError {
    IdentityProviderError::Failed("authorization error 1000".to_string())
}
