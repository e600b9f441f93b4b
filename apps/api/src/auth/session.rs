//! Session tokens, the session cookie, and the `AuthSession` extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE, USER_AGENT};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{NewSession, Session, User};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "rezumerai.session_token";

/// 32 random bytes, URL-safe base64 without padding.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Bearer token wins over the cookie when both are present.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
}

/// Creates and stores a new session for `user_id`.
pub async fn issue_session(
    state: &AppState,
    user_id: Uuid,
    headers: &HeaderMap,
) -> Result<Session, AppError> {
    let session = state
        .store
        .create_session(NewSession {
            token: generate_token(),
            user_id,
            expires_at: Utc::now() + Duration::hours(state.config.session_ttl_hours),
            ip_address: client_ip(headers),
            user_agent: headers
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        })
        .await?;
    Ok(session)
}

/// The signed-in user for this request. Rejects with 401 when there is no valid session.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub session: Session,
}

impl AuthSession {
    pub async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<Self, AppError> {
        let token = token_from_headers(headers)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let session = state
            .store
            .find_session(&token)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;

        if session.is_expired(Utc::now()) {
            debug!(user_id = %session.user_id, "Discarding expired session");
            state.store.delete_session(&token).await?;
            return Err(AppError::Unauthorized("Session expired".to_string()));
        }

        let user = state
            .store
            .find_user_by_id(session.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid session".to_string()))?;

        Ok(AuthSession { user, session })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        AuthSession::resolve(state, &parts.headers).await
    }
}
