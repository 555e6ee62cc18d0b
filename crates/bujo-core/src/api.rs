//! Authenticated HTTP client with single-flight token refresh.
//!
//! Every outbound call goes through [`ApiClient::send`], which attaches the
//! current bearer token and, on a 401 with a refresh token available, runs
//! the refresh protocol: the first request to observe the 401 performs the
//! refresh while later 401s queue behind it and retry with the token it
//! produced. At most one refresh is in flight at a time.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::session::{SessionManager, SessionStore};

/// Serializes refresh attempts and tracks the token generation.
///
/// Callers capture the generation before dispatching a request; when the
/// 401 handler finds the generation already advanced, another request has
/// refreshed in the meantime and a plain retry suffices.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    gate: tokio::sync::Mutex<()>,
    generation: AtomicU64,
}

impl RefreshCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Run `refresh` unless another caller already advanced the generation
    /// past `observed`. Bumps the generation on success.
    pub async fn run_once<F, Fut>(&self, observed: u64, refresh: F) -> Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let _guard = self.gate.lock().await;
        if self.generation.load(Ordering::SeqCst) != observed {
            return Ok(());
        }
        refresh().await?;
        self.generation.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// HTTP client for the journal backend.
#[derive(Clone)]
pub struct ApiClient<S: SessionStore> {
    config: ApiConfig,
    http: reqwest::Client,
    session: SessionManager<S>,
    refresh: Arc<RefreshCoordinator>,
}

impl<S: SessionStore> ApiClient<S> {
    pub fn new(config: ApiConfig, session: SessionManager<S>) -> Result<Self> {
        Ok(Self {
            config,
            http: reqwest::Client::builder().build()?,
            session,
            refresh: Arc::new(RefreshCoordinator::new()),
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Dispatch a request built by `build`, attaching the bearer token when
    /// present. On 401 with a refresh token, refresh (single-flight) and
    /// retry the rebuilt request once.
    pub async fn send<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client, &ApiConfig) -> reqwest::RequestBuilder,
    {
        let observed = self.refresh.generation();
        let response = self.dispatch(&build).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.session.refresh_token().is_some() {
            self.refresh
                .run_once(observed, || async {
                    self.session.refresh().await.map(|_session| ())
                })
                .await?;
            let retried = self.dispatch(&build).await?;
            return Self::into_checked(retried).await;
        }

        Self::into_checked(response).await
    }

    async fn dispatch<F>(&self, build: &F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client, &ApiConfig) -> reqwest::RequestBuilder,
    {
        let mut request = build(&self.http, &self.config);
        if let Some(token) = self.session.access_token() {
            request = request.bearer_auth(token);
        }
        request.send().await.map_err(Error::from_transport)
    }

    async fn into_checked(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Extract a human-readable message from an error response body.
pub(crate) fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", crate::util::compact_text(trimmed), status.as_u16())
    }
}

/// Map a non-success status to the error taxonomy.
pub(crate) fn status_error(status: StatusCode, body: &str) -> Error {
    let message = parse_api_error(status, body);
    match status {
        StatusCode::BAD_REQUEST => Error::Validation(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        other => Error::Server {
            status: other.as_u16(),
            message,
        },
    }
}
