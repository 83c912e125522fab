//! Collaborator implementations backed by the native host.

use super::link::{HostCallError, HostLink};
use super::protocol::{error_codes, HostMethod};
use async_trait::async_trait;
use identity_provider::{
    CredentialState, IdentityCredential, IdentityProvider, IdentityProviderError, IdentityResult,
    PushTokenError, PushTokenSource, Scope,
};
use serde::Deserialize;
use std::sync::Arc;
use web_bridge::{BridgeError, BridgeResult, ScriptEvaluator};

#[derive(Deserialize)]
struct CredentialStateReply {
    state: CredentialState,
}

#[derive(Deserialize)]
struct PushTokenReply {
    token: String,
}

fn identity_error(error: HostCallError) -> IdentityProviderError {
    match error {
        HostCallError::Rejected(info) => match info.code {
            error_codes::CANCELLED => IdentityProviderError::Cancelled,
            error_codes::INVALID_CREDENTIAL => {
                IdentityProviderError::InvalidCredential(info.message)
            }
            error_codes::NOT_AVAILABLE => IdentityProviderError::Unavailable(info.message),
            _ => IdentityProviderError::Failed(info.message),
        },
        other => IdentityProviderError::Unavailable(other.to_string()),
    }
}

fn malformed(method: HostMethod, error: serde_json::Error) -> IdentityProviderError {
    IdentityProviderError::Failed(format!("Malformed {:?} reply: {}", method, error))
}

/// Sign in with the platform identity provider via the host.
pub struct HostIdentityProvider {
    link: Arc<HostLink>,
}

impl HostIdentityProvider {
    pub fn new(link: Arc<HostLink>) -> Self {
        Self { link }
    }
}

#[async_trait]
impl IdentityProvider for HostIdentityProvider {
    async fn request_interactive_sign_in(
        &self,
        scopes: &[Scope],
    ) -> IdentityResult<IdentityCredential> {
        let method = HostMethod::IdentitySignIn;
        let reply = self
            .link
            .call(method, Some(serde_json::json!({ "scopes": scopes })))
            .await
            .map_err(identity_error)?;
        serde_json::from_value(reply).map_err(|e| malformed(method, e))
    }

    async fn query_credential_state(&self, user_id: &str) -> IdentityResult<CredentialState> {
        let method = HostMethod::IdentityCredentialState;
        let reply = self
            .link
            .call(method, Some(serde_json::json!({ "userId": user_id })))
            .await
            .map_err(identity_error)?;
        let reply: CredentialStateReply =
            serde_json::from_value(reply).map_err(|e| malformed(method, e))?;
        Ok(reply.state)
    }
}

/// Push tokens from the host's messaging SDK.
pub struct HostPushTokenSource {
    link: Arc<HostLink>,
}

impl HostPushTokenSource {
    pub fn new(link: Arc<HostLink>) -> Self {
        Self { link }
    }
}

#[async_trait]
impl PushTokenSource for HostPushTokenSource {
    async fn fetch_push_token(&self) -> Result<String, PushTokenError> {
        let reply = self
            .link
            .call(HostMethod::PushFetchToken, None)
            .await
            .map_err(|e| match e {
                HostCallError::Rejected(info) if info.code == error_codes::NOT_AVAILABLE => {
                    PushTokenError::NotAvailable
                }
                other => PushTokenError::Failed(other.to_string()),
            })?;

        let reply: PushTokenReply = serde_json::from_value(reply)
            .map_err(|e| PushTokenError::Failed(format!("Malformed push token reply: {}", e)))?;
        if reply.token.is_empty() {
            return Err(PushTokenError::NotAvailable);
        }
        Ok(reply.token)
    }
}

/// Runs scripts in the host's web view.
pub struct HostScriptEvaluator {
    link: Arc<HostLink>,
}

impl HostScriptEvaluator {
    pub fn new(link: Arc<HostLink>) -> Self {
        Self { link }
    }
}

#[async_trait]
impl ScriptEvaluator for HostScriptEvaluator {
    async fn evaluate_script(&self, script: &str) -> BridgeResult<()> {
        self.link
            .call(
                HostMethod::WebviewEvaluateScript,
                Some(serde_json::json!({ "script": script })),
            )
            .await
            .map(|_| ())
            .map_err(|e| BridgeError::Evaluation(e.to_string()))
    }
}

/// Stand-in for CLI commands that run without a host attached.
///
/// Only backend and store work is possible; anything needing the device
/// reports itself unavailable.
pub struct Detached;

#[async_trait]
impl IdentityProvider for Detached {
    async fn request_interactive_sign_in(
        &self,
        _scopes: &[Scope],
    ) -> IdentityResult<IdentityCredential> {
        Err(IdentityProviderError::Unavailable(
            "no host attached".to_string(),
        ))
    }

    async fn query_credential_state(&self, _user_id: &str) -> IdentityResult<CredentialState> {
        Err(IdentityProviderError::Unavailable(
            "no host attached".to_string(),
        ))
    }
}

#[async_trait]
impl PushTokenSource for Detached {
    async fn fetch_push_token(&self) -> Result<String, PushTokenError> {
        Err(PushTokenError::NotAvailable)
    }
}

#[async_trait]
impl ScriptEvaluator for Detached {
    async fn evaluate_script(&self, _script: &str) -> BridgeResult<()> {
        Err(BridgeError::Evaluation("no web view attached".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::protocol::{CoreMessage, ErrorInfo};
    use identity_provider::DEFAULT_SCOPES;
    use tokio::sync::mpsc;

    /// Answer the next request with `reply` and hand back its method and params.
    async fn answer_next(
        link: &HostLink,
        rx: &mut mpsc::UnboundedReceiver<CoreMessage>,
        reply: Result<serde_json::Value, ErrorInfo>,
    ) -> (HostMethod, Option<serde_json::Value>) {
        let CoreMessage::Request { id, method, params } = rx.recv().await.unwrap() else {
            panic!("expected a request");
        };
        match reply {
            Ok(result) => link.resolve(&id, Some(result), None),
            Err(error) => link.resolve(&id, None, Some(error)),
        };
        (method, params)
    }

    fn setup() -> (Arc<HostLink>, mpsc::UnboundedReceiver<CoreMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(HostLink::new(tx)), rx)
    }

    #[tokio::test]
    async fn test_sign_in_parses_credential() {
        let (link, mut rx) = setup();
        let provider = HostIdentityProvider::new(link.clone());

        let call = tokio::spawn(async move {
            provider.request_interactive_sign_in(&DEFAULT_SCOPES).await
        });

        let (method, params) = answer_next(
            &link,
            &mut rx,
            Ok(serde_json::json!({
                "userIdentifier": "001234.abcdef",
                "fullName": { "givenName": "Nayeon", "familyName": "Koo" },
                "email": "nayeon@example.com",
                "authorizationCode": "c-1"
            })),
        )
        .await;

        assert_eq!(method, HostMethod::IdentitySignIn);
        assert_eq!(
            params.unwrap()["scopes"],
            serde_json::json!(["fullName", "email"])
        );

        let credential = call.await.unwrap().unwrap();
        assert_eq!(credential.user_identifier, "001234.abcdef");
        assert_eq!(credential.authorization_code, "c-1");
        assert_eq!(
            credential.full_name.and_then(|n| n.formatted()).as_deref(),
            Some("Nayeon Koo")
        );
    }

    #[tokio::test]
    async fn test_sign_in_cancel_maps_to_cancelled() {
        let (link, mut rx) = setup();
        let provider = HostIdentityProvider::new(link.clone());

        let call = tokio::spawn(async move {
            provider.request_interactive_sign_in(&DEFAULT_SCOPES).await
        });
        answer_next(
            &link,
            &mut rx,
            Err(ErrorInfo {
                code: error_codes::CANCELLED,
                message: "The user canceled the authorization attempt.".to_string(),
            }),
        )
        .await;

        assert_eq!(
            call.await.unwrap().unwrap_err(),
            IdentityProviderError::Cancelled
        );
    }

    #[tokio::test]
    async fn test_credential_state_round_trip() {
        let (link, mut rx) = setup();
        let provider = HostIdentityProvider::new(link.clone());

        let call = tokio::spawn(async move { provider.query_credential_state("u-1").await });
        let (method, params) = answer_next(
            &link,
            &mut rx,
            Ok(serde_json::json!({ "state": "revoked" })),
        )
        .await;

        assert_eq!(method, HostMethod::IdentityCredentialState);
        assert_eq!(params.unwrap()["userId"], "u-1");
        assert_eq!(call.await.unwrap().unwrap(), CredentialState::Revoked);
    }

    #[tokio::test]
    async fn test_disconnected_host_is_unavailable() {
        let (link, rx) = setup();
        drop(rx);
        let provider = HostIdentityProvider::new(link);

        let err = provider.query_credential_state("u-1").await.unwrap_err();
        assert!(matches!(err, IdentityProviderError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_push_token_fetch() {
        let (link, mut rx) = setup();
        let source = HostPushTokenSource::new(link.clone());

        let call = tokio::spawn(async move { source.fetch_push_token().await });
        answer_next(&link, &mut rx, Ok(serde_json::json!({ "token": "fcm-1" }))).await;
        assert_eq!(call.await.unwrap().unwrap(), "fcm-1");
    }

    #[tokio::test]
    async fn test_empty_push_token_is_not_available() {
        let (link, mut rx) = setup();
        let source = HostPushTokenSource::new(link.clone());

        let call = tokio::spawn(async move { source.fetch_push_token().await });
        answer_next(&link, &mut rx, Ok(serde_json::json!({ "token": "" }))).await;
        assert_eq!(call.await.unwrap(), Err(PushTokenError::NotAvailable));
    }

    #[tokio::test]
    async fn test_evaluate_script_forwards_source() {
        let (link, mut rx) = setup();
        let evaluator = HostScriptEvaluator::new(link.clone());

        let call =
            tokio::spawn(async move { evaluator.evaluate_script("window.x = 1;").await });
        let (method, params) =
            answer_next(&link, &mut rx, Ok(serde_json::Value::Null)).await;

        assert_eq!(method, HostMethod::WebviewEvaluateScript);
        assert_eq!(params.unwrap()["script"], "window.x = 1;");
        assert!(call.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_detached_reports_unavailable() {
        assert!(matches!(
            Detached.query_credential_state("u-1").await,
            Err(IdentityProviderError::Unavailable(_))
        ));
        assert_eq!(
            Detached.fetch_push_token().await,
            Err(PushTokenError::NotAvailable)
        );
        assert!(Detached.evaluate_script("1").await.is_err());
    }
}
