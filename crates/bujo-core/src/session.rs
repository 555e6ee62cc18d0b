//! Session manager: authentication, token persistence, and refresh.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use crate::api::{parse_api_error, status_error};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::models::{LoginCredentials, Session, SignupData, User};
use crate::util::unix_timestamp_now;

/// Refresh ahead of actual expiry by this window.
const TOKEN_REFRESH_WINDOW_SECS: i64 = 5 * 60;

const MIN_PASSWORD_LENGTH: usize = 6;

/// Persistence for the session namespace (profile plus both tokens).
pub trait SessionStore: Clone + Send + Sync + 'static {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory session store; used in tests and in contexts without
/// persistent storage, which behave as always logged-out across restarts.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    session: std::sync::Arc<std::sync::Mutex<Option<Session>>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let guard = self
            .session
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .session
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Owns the authenticated identity and the token lifecycle.
#[derive(Clone)]
pub struct SessionManager<S: SessionStore> {
    config: ApiConfig,
    http: reqwest::Client,
    store: S,
}

impl<S: SessionStore> SessionManager<S> {
    pub fn new(config: ApiConfig, store: S) -> Result<Self> {
        Ok(Self {
            config,
            http: reqwest::Client::builder().build()?,
            store,
        })
    }

    /// The persisted current user, if any. Storage failures read as
    /// logged-out rather than surfacing.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.store.load().ok().flatten().map(|session| session.user)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.store
            .load()
            .ok()
            .flatten()
            .map(|session| session.access_token)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.store
            .load()
            .ok()
            .flatten()
            .and_then(|session| session.refresh_token)
    }

    /// True iff a current user and an access token both exist. Token
    /// validity is not rechecked here.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store
            .load()
            .ok()
            .flatten()
            .is_some_and(|session| !session.access_token.is_empty())
    }

    /// Whether the access token expires within the refresh window. A
    /// malformed or absent token reads as expired (fail-safe).
    #[must_use]
    pub fn is_token_expired(&self) -> bool {
        match self.access_token() {
            Some(token) => token_expires_within(&token, TOKEN_REFRESH_WINDOW_SECS),
            None => true,
        }
    }

    /// Display name for the current user, with the UI fallback chain.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.current_user()
            .map_or_else(|| "User".to_string(), |user| user.display_name())
    }

    /// Authenticate with email/password; on success the session is
    /// persisted and becomes the current identity. Failed attempts leave
    /// stored state untouched.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session> {
        let response = self
            .http
            .post(self.config.endpoint("users/auth/login"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Error::Unauthorized("Invalid email or password".to_string())
                }
                other => status_error(other, &body),
            });
        }

        let payload = response
            .json::<AuthResponsePayload>()
            .await
            .map_err(Error::from_transport)?;
        let session = payload.into_session(None)?;
        self.store.save(&session)?;
        Ok(session)
    }

    /// Create an account. Password confirmation and minimum length are
    /// validated locally before any remote call.
    pub async fn signup(&self, data: &SignupData) -> Result<Session> {
        if data.password != data.confirm_password {
            return Err(Error::Validation("Passwords do not match".to_string()));
        }
        if data.password.len() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }

        let response = self
            .http
            .post(self.config.endpoint("users/auth/create"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({
                "email": data.email,
                "password": data.password,
                "firstName": data.first_name,
                "lastName": data.last_name,
                "phoneNumber": data.phone_number,
            }))
            .send()
            .await
            .map_err(Error::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::CONFLICT => Error::Validation(
                    "Email already registered. Please use a different email.".to_string(),
                ),
                other => status_error(other, &body),
            });
        }

        let payload = response
            .json::<AuthResponsePayload>()
            .await
            .map_err(Error::from_transport)?;
        // Backends without a profile timestamp get the signup time.
        let session = payload.into_session(Some(chrono::Utc::now().to_rfc3339()))?;
        self.store.save(&session)?;
        Ok(session)
    }

    /// Clear all persisted session data unconditionally. No failure mode.
    pub fn logout(&self) {
        if let Err(error) = self.store.clear() {
            tracing::warn!("failed to clear session store on logout: {error}");
        }
    }

    /// Exchange the refresh token for a new access token. Any failure
    /// forces logout and surfaces a re-authentication error.
    pub async fn refresh(&self) -> Result<Session> {
        let Some(current) = self.store.load()? else {
            return Err(Error::Unauthorized(
                "No refresh token available".to_string(),
            ));
        };
        let Some(refresh_token) = current.refresh_token.clone() else {
            return Err(Error::Unauthorized(
                "No refresh token available".to_string(),
            ));
        };

        match self.request_refresh(&refresh_token).await {
            Ok(payload) => {
                let access_token = payload.access_token().ok_or_else(|| {
                    Error::Decode("refresh response did not include an access token".to_string())
                })?;
                // Keep the old refresh token unless the server rotated it.
                let refresh_token = payload.rotated_refresh_token().unwrap_or(refresh_token);
                let session = Session {
                    user: payload.resolve_user(None).unwrap_or(current.user),
                    access_token,
                    refresh_token: Some(refresh_token),
                };
                self.store.save(&session)?;
                Ok(session)
            }
            Err(error) => {
                tracing::warn!("token refresh failed: {error}");
                self.logout();
                Err(Error::Unauthorized(
                    "Token refresh failed. Please login again.".to_string(),
                ))
            }
        }
    }

    /// POST the refresh exchange, falling back to the alternate endpoint
    /// when the primary one is not routed (404).
    async fn request_refresh(&self, refresh_token: &str) -> Result<AuthResponsePayload> {
        let primary = self
            .post_refresh(self.config.endpoint("users/auth/refresh"), refresh_token)
            .await?;
        let response = if primary.status() == StatusCode::NOT_FOUND {
            self.post_refresh(self.config.endpoint("auth/refresh"), refresh_token)
                .await?
        } else {
            primary
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Unauthorized(parse_api_error(status, &body)));
        }
        response
            .json::<AuthResponsePayload>()
            .await
            .map_err(Error::from_transport)
    }

    async fn post_refresh(&self, url: String, refresh_token: &str) -> Result<reqwest::Response> {
        self.http
            .post(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await
            .map_err(Error::from_transport)
    }
}

/// Permissive auth response: token under `accessToken` or legacy `token`,
/// profile nested under `user` or flattened into the top level.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponsePayload {
    access_token: Option<String>,
    token: Option<String>,
    refresh_token: Option<String>,
    user: Option<UserPayload>,
    #[serde(flatten)]
    profile: UserPayload,
}

impl AuthResponsePayload {
    fn access_token(&self) -> Option<String> {
        self.access_token
            .clone()
            .or_else(|| self.token.clone())
            .filter(|token| !token.trim().is_empty())
    }

    fn rotated_refresh_token(&self) -> Option<String> {
        self.refresh_token
            .clone()
            .filter(|token| !token.trim().is_empty())
    }

    fn resolve_user(&self, default_created_at: Option<String>) -> Option<User> {
        let payload = match &self.user {
            Some(nested) if !nested.is_empty() => nested,
            _ if !self.profile.is_empty() => &self.profile,
            _ => return None,
        };
        Some(payload.to_user(default_created_at))
    }

    fn into_session(self, default_created_at: Option<String>) -> Result<Session> {
        let access_token = self.access_token().ok_or_else(|| {
            Error::Decode("auth response did not include an access token".to_string())
        })?;
        let user = self.resolve_user(default_created_at).ok_or_else(|| {
            Error::Decode("auth response did not include a user profile".to_string())
        })?;
        Ok(Session {
            user,
            access_token,
            refresh_token: self.rotated_refresh_token(),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPayload {
    id: Option<Value>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone_number: Option<String>,
    created_at: Option<String>,
}

impl UserPayload {
    fn is_empty(&self) -> bool {
        self.email.is_none() && self.first_name.is_none() && self.last_name.is_none()
    }

    fn to_user(&self, default_created_at: Option<String>) -> User {
        let first_name = self.first_name.clone().unwrap_or_default();
        let last_name = self.last_name.clone().unwrap_or_default();
        let name = format!("{first_name} {last_name}").trim().to_string();
        User {
            id: self.id.as_ref().and_then(stringify_id),
            email: self.email.clone().unwrap_or_default(),
            first_name,
            last_name,
            phone_number: self.phone_number.clone(),
            name: (!name.is_empty()).then_some(name),
            created_at: self.created_at.clone().or(default_created_at),
        }
    }
}

fn stringify_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn token_expires_within(token: &str, window_secs: i64) -> bool {
    let Some(expiry) = decode_token_expiry(token) else {
        return true;
    };
    unix_timestamp_now() >= expiry - window_secs
}

/// Read the `exp` claim from a JWT without verifying the signature.
fn decode_token_expiry(token: &str) -> Option<i64> {
    #[derive(Deserialize)]
    struct TokenClaims {
        exp: i64,
    }

    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn manager() -> SessionManager<MemorySessionStore> {
        SessionManager::new(
            ApiConfig::new("http://127.0.0.1:9").unwrap(),
            MemorySessionStore::new(),
        )
        .unwrap()
    }

    fn fake_jwt(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        format!("{header}.{payload}.sig")
    }

    fn session_with_token(token: &str) -> Session {
        Session {
            user: User {
                id: Some("7".to_string()),
                email: "ada@example.com".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone_number: None,
                name: None,
                created_at: None,
            },
            access_token: token.to_string(),
            refresh_token: Some("refresh".to_string()),
        }
    }

    #[tokio::test]
    async fn signup_validates_locally_before_any_remote_call() {
        let manager = manager();

        let mismatch = manager
            .signup(&SignupData {
                email: "ada@example.com".to_string(),
                password: "secret1".to_string(),
                confirm_password: "secret2".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone_number: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(mismatch, Error::Validation(_)));
        assert_eq!(mismatch.to_string(), "Passwords do not match");

        let short = manager
            .signup(&SignupData {
                email: "ada@example.com".to_string(),
                password: "abc".to_string(),
                confirm_password: "abc".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                phone_number: None,
            })
            .await
            .unwrap_err();
        assert_eq!(short.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn token_expiry_is_fail_safe() {
        let manager = manager();
        // No session at all.
        assert!(manager.is_token_expired());

        let store = MemorySessionStore::new();
        let manager =
            SessionManager::new(ApiConfig::new("http://127.0.0.1:9").unwrap(), store.clone())
                .unwrap();

        store
            .save(&session_with_token(&fake_jwt(unix_timestamp_now() + 3600)))
            .unwrap();
        assert!(!manager.is_token_expired());

        // Expiring within the 5 minute window counts as expired.
        store
            .save(&session_with_token(&fake_jwt(unix_timestamp_now() + 60)))
            .unwrap();
        assert!(manager.is_token_expired());

        store
            .save(&session_with_token("not-a-jwt"))
            .unwrap();
        assert!(manager.is_token_expired());
    }

    #[test]
    fn logout_clears_store_unconditionally() {
        let store = MemorySessionStore::new();
        let manager =
            SessionManager::new(ApiConfig::new("http://127.0.0.1:9").unwrap(), store.clone())
                .unwrap();

        store.save(&session_with_token("token")).unwrap();
        assert!(manager.is_authenticated());

        manager.logout();
        assert!(!manager.is_authenticated());
        assert!(manager.current_user().is_none());

        // Logging out while logged out is fine too.
        manager.logout();
    }

    #[test]
    fn auth_payload_accepts_token_alias_and_nested_user() {
        let payload: AuthResponsePayload = serde_json::from_value(json!({
            "token": "legacy-token",
            "refreshToken": "r1",
            "user": {"id": 12, "email": "ada@example.com", "firstName": "Ada", "lastName": "Lovelace"}
        }))
        .unwrap();
        let session = payload.into_session(None).unwrap();
        assert_eq!(session.access_token, "legacy-token");
        assert_eq!(session.user.id.as_deref(), Some("12"));
        assert_eq!(session.user.name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn auth_payload_accepts_flattened_profile() {
        let payload: AuthResponsePayload = serde_json::from_value(json!({
            "accessToken": "a1",
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace"
        }))
        .unwrap();
        let session = payload.into_session(None).unwrap();
        assert_eq!(session.user.email, "ada@example.com");
        assert!(session.refresh_token.is_none());
    }

    #[test]
    fn auth_payload_without_token_is_a_decode_error() {
        let payload: AuthResponsePayload = serde_json::from_value(json!({
            "user": {"email": "ada@example.com", "firstName": "Ada", "lastName": "L"}
        }))
        .unwrap();
        assert!(matches!(
            payload.into_session(None),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn display_name_defaults_when_logged_out() {
        assert_eq!(manager().display_name(), "User");
    }
}
