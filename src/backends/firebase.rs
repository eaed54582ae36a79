//! Firebase Auth identity provider
//!
//! Talks to the Identity Toolkit REST API. Sign-out is local: the session
//! tokens are dropped and subscribers are told the user is gone.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use super::{AuthState, AuthSubscription, BackendError, BackendResult, IdentityProvider, User};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";
/// ID tokens are refreshed this long before they expire
const EXPIRY_MARGIN_SECS: i64 = 60;
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// ID token plus what is needed to renew it
#[derive(Debug, Clone, PartialEq)]
pub struct SessionToken {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// `expires_in` is the seconds string the token endpoints return
    pub fn new(id_token: String, refresh_token: String, expires_in: &str, issued_at: DateTime<Utc>) -> Self {
        let lifetime = expires_in.trim().parse().unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        Self {
            id_token,
            refresh_token,
            expires_at: issued_at + chrono::Duration::seconds(lifetime),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}

#[derive(Debug)]
struct TokenSlot {
    token: RwLock<Option<SessionToken>>,
    client: Client,
    refresh_url: String,
}

/// Shared view of the session token for authorising store requests.
/// Expired tokens are renewed through the secure token endpoint.
#[derive(Debug, Clone)]
pub struct TokenHandle(Arc<TokenSlot>);

impl TokenHandle {
    fn new(client: Client, api_key: &str) -> Self {
        Self(Arc::new(TokenSlot {
            token: RwLock::new(None),
            client,
            refresh_url: format!("{}?key={}", SECURE_TOKEN_URL, api_key),
        }))
    }

    fn current(&self) -> Option<SessionToken> {
        self.0.token.read().ok().and_then(|token| token.clone())
    }

    /// The current ID token, expired or not
    pub fn get(&self) -> Option<String> {
        self.current().map(|token| token.id_token)
    }

    fn set(&self, token: Option<SessionToken>) {
        if let Ok(mut slot) = self.0.token.write() {
            *slot = token;
        }
    }

    /// ID token to send, refreshed first when it is about to expire.
    /// `None` when nobody is signed in.
    pub async fn bearer(&self) -> BackendResult<Option<String>> {
        match self.current() {
            None => Ok(None),
            Some(token) if token.is_expired_at(Utc::now()) => self.refresh().await.map(Some),
            Some(token) => Ok(Some(token.id_token)),
        }
    }

    /// Exchange the refresh token for a new ID token
    pub async fn refresh(&self) -> BackendResult<String> {
        let current = self.current().ok_or(BackendError::NotAuthenticated)?;
        let resp = self
            .0
            .client
            .post(&self.0.refresh_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", current.refresh_token.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            log::warn!("Token refresh failed: {}", message);
            return Err(map_refresh_error(&message));
        }

        let refreshed: RefreshResponse = resp.json().await?;
        let token = SessionToken::new(
            refreshed.id_token,
            refreshed.refresh_token,
            &refreshed.expires_in,
            Utc::now(),
        );
        let id_token = token.id_token.clone();
        if let Ok(mut slot) = self.0.token.write() {
            // A sign-out during the exchange wins
            let same_session = slot
                .as_ref()
                .is_some_and(|existing| existing.refresh_token == current.refresh_token);
            if !same_session {
                return Err(BackendError::NotAuthenticated);
            }
            *slot = Some(token);
        }
        log::debug!("ID token refreshed");
        Ok(id_token)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
    email: String,
}

impl SignInResponse {
    fn session_token(&self) -> SessionToken {
        SessionToken::new(
            self.id_token.clone(),
            self.refresh_token.clone(),
            &self.expires_in,
            Utc::now(),
        )
    }
}

/// The secure token endpoint answers in snake_case
#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    last_login_at: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Identity provider backed by Firebase Auth
pub struct FirebaseAuth {
    client: Client,
    api_key: String,
    base_url: String,
    state: AuthState,
    token: TokenHandle,
}

impl FirebaseAuth {
    pub fn new(api_key: String) -> BackendResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let token = TokenHandle::new(client.clone(), &api_key);
        Ok(Self {
            client,
            api_key,
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
            state: AuthState::new(),
            token,
        })
    }

    /// Handle the document store uses to authorise its requests
    pub fn token_handle(&self) -> TokenHandle {
        self.token.clone()
    }

    fn url(&self, method: &str) -> String {
        format!("{}/accounts:{}?key={}", self.base_url, method, self.api_key)
    }

    async fn password_sign_in(&self, email: &str, password: &str) -> BackendResult<SignInResponse> {
        let resp = self
            .client
            .post(self.url("signInWithPassword"))
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp
                .json::<ErrorEnvelope>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(map_auth_error(&message));
        }

        Ok(resp.json().await?)
    }

    async fn last_login(&self, id_token: &str) -> Option<DateTime<Utc>> {
        let resp = self
            .client
            .post(self.url("lookup"))
            .json(&LookupRequest { id_token })
            .send()
            .await
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let lookup: LookupResponse = resp.json().await.ok()?;
        let millis: i64 = lookup.users.first()?.last_login_at.as_deref()?.parse().ok()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// An unusable refresh token means the session is over
fn map_refresh_error(message: &str) -> BackendError {
    let code = message.split(':').next().unwrap_or(message).trim();
    match code {
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_DISABLED" | "USER_NOT_FOUND" => {
            BackendError::NotAuthenticated
        }
        _ => map_auth_error(message),
    }
}

/// Map Identity Toolkit error codes onto the service error taxonomy.
fn map_auth_error(message: &str) -> BackendError {
    // Codes may carry a suffix, e.g. "TOO_MANY_ATTEMPTS_TRY_LATER : ..."
    let code = message.split(':').next().unwrap_or(message).trim();
    match code {
        "INVALID_PASSWORD" | "EMAIL_NOT_FOUND" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL"
        | "MISSING_PASSWORD" | "USER_DISABLED" => BackendError::InvalidCredential,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => BackendError::Unavailable(code.to_string()),
        _ => BackendError::Request(message.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseAuth {
    fn current_user(&self) -> Option<User> {
        self.state.current()
    }

    fn subscribe(&self) -> AuthSubscription {
        self.state.subscribe()
    }

    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<User> {
        let session = self.password_sign_in(email, password).await?;
        let last_sign_in = self.last_login(&session.id_token).await;
        self.token.set(Some(session.session_token()));
        let user = User {
            uid: session.local_id,
            email: session.email,
            last_sign_in,
        };
        self.state.set(Some(user.clone()));
        log::info!("Signed in as {}", user.email);
        Ok(user)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        self.token.set(None);
        self.state.set(None);
        log::info!("Signed out");
        Ok(())
    }

    async fn re_authenticate(&self, password: &str) -> BackendResult<()> {
        let user = self.current_user().ok_or(BackendError::NotAuthenticated)?;
        let session = self.password_sign_in(&user.email, password).await?;
        if session.local_id != user.uid {
            return Err(BackendError::InvalidCredential);
        }
        self.token.set(Some(session.session_token()));
        log::info!("Re-authenticated {}", user.email);
        Ok(())
    }
}
