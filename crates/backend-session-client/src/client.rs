//! reqwest implementation of [`SessionBackend`].

use crate::types::{endpoints, ExchangeRequest, PushTokenRequest};
use crate::{BackendError, BackendResult, SessionBackend, TokenPair};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use shell_config_and_utils::Config;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Header carrying the backend access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-ACCESS-TOKEN";
/// Header carrying the backend refresh token.
pub const REFRESH_TOKEN_HEADER: &str = "X-REFRESH-TOKEN";

/// Length and digest of a response body. Bodies may echo tokens, so they are
/// never logged verbatim.
pub fn summarize_response_body(body: &str) -> String {
    let mut hasher = DefaultHasher::new();
    body.hash(&mut hasher);
    format!("len={},digest={:016x}", body.len(), hasher.finish())
}

/// Backend session API client.
#[derive(Clone)]
pub struct BackendClient {
    http_client: reqwest::Client,
    api_url: String,
}

impl BackendClient {
    /// Create a client for `api_url` (e.g. `https://api.sohwagi.app`).
    pub fn new(api_url: &str) -> BackendResult<Self> {
        Self::with_timeout(api_url, None)
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_timeout(api_url: &str, timeout: Option<Duration>) -> BackendResult<Self> {
        let parsed = Url::parse(api_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the shell configuration.
    pub fn from_config(config: &Config) -> BackendResult<Self> {
        Self::with_timeout(config.api_base_url(), config.request_timeout())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn session_request(
        &self,
        method: Method,
        path: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> RequestBuilder {
        self.http_client
            .request(method, self.endpoint_url(path))
            .header(ACCESS_TOKEN_HEADER, access_token)
            .header(REFRESH_TOKEN_HEADER, refresh_token)
            .header("Accept", "application/json")
    }

    /// Send a session-authenticated call where only 200 is success.
    async fn send_expect_ok(&self, request: RequestBuilder, operation: &str) -> BackendResult<()> {
        let response = request.send().await.map_err(|e| {
            error!(operation, error = %e, "Backend request failed");
            BackendError::from(e)
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let body_summary = summarize_response_body(&body);
            error!(operation, status = %status, body_summary = %body_summary, "Backend rejected request");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body_summary,
            });
        }

        info!(operation, "Backend request succeeded");
        Ok(())
    }
}

#[async_trait]
impl SessionBackend for BackendClient {
    async fn exchange_code(
        &self,
        authorization_code: &str,
        user_name: &str,
    ) -> BackendResult<TokenPair> {
        let url = self.endpoint_url(endpoints::APPLE_LOGIN);
        debug!(url = %url, has_user_name = !user_name.is_empty(), "Exchanging authorization code");

        let response = self
            .http_client
            .post(&url)
            .header("Accept", "application/json")
            .json(&ExchangeRequest {
                authorization_code,
                user_name,
            })
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Code exchange request failed");
                BackendError::from(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        let body_summary = summarize_response_body(&body);

        if !status.is_success() {
            error!(status = %status, body_summary = %body_summary, "Code exchange rejected");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body_summary,
            });
        }

        match TokenPair::from_exchange_body(&body) {
            Ok(tokens) => {
                info!(status = %status, "Code exchange succeeded");
                Ok(tokens)
            }
            Err(e) => {
                error!(body_summary = %body_summary, error = %e, "Malformed code exchange response");
                Err(e)
            }
        }
    }

    async fn register_push_token(
        &self,
        fcm_token: &str,
        access_token: &str,
        refresh_token: &str,
    ) -> BackendResult<()> {
        let request = self
            .session_request(Method::POST, endpoints::FCM_TOKENS, access_token, refresh_token)
            .json(&PushTokenRequest { fcm_token });
        self.send_expect_ok(request, "register_push_token").await
    }

    async fn logout(&self, access_token: &str, refresh_token: &str) -> BackendResult<()> {
        let request =
            self.session_request(Method::PATCH, endpoints::LOGOUT, access_token, refresh_token);
        self.send_expect_ok(request, "logout").await
    }

    async fn revoke_account(&self, access_token: &str, refresh_token: &str) -> BackendResult<()> {
        let request = self.session_request(
            Method::DELETE,
            endpoints::APPLE_REVOKE,
            access_token,
            refresh_token,
        );
        self.send_expect_ok(request, "revoke_account").await
    }
}
