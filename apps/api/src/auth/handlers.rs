//! Axum route handlers for `/api/auth/*`.

use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::{ApiJson, ApiResponse};
use crate::auth::oauth::{self, OAuthProfile, OAuthProvider};
use crate::auth::password::{hash_password, verify_dummy_password, verify_password};
use crate::auth::session::{
    clear_session_cookie, generate_token, issue_session, session_cookie, AuthSession,
};
use crate::auth::validation::{
    validate_email, validate_password, ChangePasswordRequest, SignInRequest, SignupRequest,
};
use crate::errors::AppError;
use crate::models::user::{
    Account, NewAccount, NewUser, Session, User, CREDENTIAL_PROVIDER,
};
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: User,
    pub session: Session,
}

#[derive(Debug, Serialize)]
pub struct VerificationIssued {
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailRequest {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct SocialSignInRequest {
    pub provider: String,
}

#[derive(Debug, Serialize)]
pub struct SocialSignInResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn credential_account() -> NewAccount {
    NewAccount {
        provider_id: CREDENTIAL_PROVIDER.to_string(),
        account_id: None,
        scope: None,
    }
}

fn verification_identifier(token: &str) -> String {
    format!("email-verification:{token}")
}

fn with_cookie<T: IntoResponse>(cookie: String, body: T) -> Response {
    ([(SET_COOKIE, cookie)], body).into_response()
}

// ────────────────────────────────────────────────────────────────────────────
// Email / password
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/signup
///
/// 201 with the new user's id, 409 if the email is taken, 400 on invalid input.
pub async fn handle_signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<Response, AppError> {
    let signup = request.validate()?;

    // Skips hashing for known emails. Concurrent signups are still caught by the store.
    if state.store.find_user_by_email(&signup.email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let password_hash = hash_password(signup.password, state.config.bcrypt_cost).await?;
    let (user, _) = state
        .store
        .create_user_with_account(
            NewUser {
                name: signup.name,
                email: signup.email,
                email_verified: false,
                password_hash: Some(password_hash),
                image: None,
            },
            credential_account(),
        )
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Email is already registered".to_string()),
            other => other,
        })?;

    info!(user_id = %user.id, "User signed up");
    Ok(ApiResponse::created(SignupResponse {
        id: user.id,
        email: user.email,
    }))
}

/// POST /api/auth/sign-in/email
pub async fn handle_sign_in_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(request): ApiJson<SignInRequest>,
) -> Result<Response, AppError> {
    let invalid = || AppError::Unauthorized(INVALID_CREDENTIALS.to_string());

    let email = validate_email(&request.email).map_err(|_| invalid())?;
    let user = state.store.find_user_by_email(&email).await?;
    let Some((user, hash)) = user.and_then(|u| u.password_hash.clone().map(|h| (u, h))) else {
        verify_dummy_password(request.password, state.config.bcrypt_cost).await?;
        return Err(invalid());
    };
    if !verify_password(request.password, hash).await? {
        return Err(invalid());
    }

    let session = issue_session(&state, user.id, &headers).await?;
    info!(user_id = %user.id, "User signed in");

    let cookie = session_cookie(
        &session.token,
        state.config.session_ttl_hours * 3600,
        state.config.secure_cookies,
    );
    Ok(with_cookie(
        cookie,
        ApiResponse::ok(SignInResponse {
            token: session.token,
            expires_at: session.expires_at,
            user,
        }),
    ))
}

/// POST /api/auth/sign-out
pub async fn handle_sign_out(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Response, AppError> {
    state.store.delete_session(&auth.session.token).await?;
    info!(user_id = %auth.user.id, "User signed out");
    Ok(with_cookie(
        clear_session_cookie(state.config.secure_cookies),
        StatusCode::NO_CONTENT,
    ))
}

/// GET /api/auth/get-session
pub async fn handle_get_session(auth: AuthSession) -> Json<ApiResponse<SessionResponse>> {
    ApiResponse::ok(SessionResponse {
        user: auth.user,
        session: auth.session,
    })
}

/// POST /api/auth/change-password
pub async fn handle_change_password(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(request): ApiJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    validate_password(&request.new_password)?;
    let current = auth.user.password_hash.clone().ok_or_else(|| {
        AppError::Validation("This account has no password; sign in with your provider".to_string())
    })?;
    if !verify_password(request.current_password, current).await? {
        return Err(AppError::Validation(
            "Current password is incorrect".to_string(),
        ));
    }

    let hash = hash_password(request.new_password, state.config.bcrypt_cost).await?;
    state.store.update_password_hash(auth.user.id, &hash).await?;
    info!(user_id = %auth.user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/list-accounts
pub async fn handle_list_accounts(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<ApiResponse<Vec<Account>>>, AppError> {
    let accounts = state.store.list_accounts(auth.user.id).await?;
    Ok(ApiResponse::ok(accounts))
}

// ────────────────────────────────────────────────────────────────────────────
// Email verification
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/verify-email/request
///
/// There is no mail transport; the token is written to the log for delivery.
pub async fn handle_request_verification(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Response, AppError> {
    if auth.user.email_verified {
        return Err(AppError::Conflict("Email is already verified".to_string()));
    }

    let token = generate_token();
    let expires_at = Utc::now() + Duration::minutes(state.config.verification_ttl_minutes);
    state
        .store
        .create_verification(
            &verification_identifier(&token),
            &auth.user.id.to_string(),
            expires_at,
        )
        .await?;

    info!(
        user_id = %auth.user.id,
        verify_url = %format!("{}/api/auth/verify-email?token={token}", state.config.public_url),
        "Email verification issued"
    );
    Ok((
        StatusCode::ACCEPTED,
        ApiResponse::ok(VerificationIssued { expires_at }),
    )
        .into_response())
}

/// Consumes a verification token and marks its user verified. Tokens are single-use.
async fn consume_email_verification(state: &AppState, token: &str) -> Result<Uuid, AppError> {
    let invalid = || AppError::Validation("Invalid or expired verification token".to_string());

    let token = token.trim();
    if token.is_empty() {
        return Err(invalid());
    }
    let record = state
        .store
        .take_verification(&verification_identifier(token))
        .await?
        .ok_or_else(invalid)?;
    if record.expires_at <= Utc::now() {
        return Err(invalid());
    }
    let user_id: Uuid = record.value.parse().map_err(|_| invalid())?;

    state.store.mark_email_verified(user_id).await?;
    info!(user_id = %user_id, "Email verified");
    Ok(user_id)
}

/// POST /api/auth/verify-email
pub async fn handle_verify_email(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyEmailRequest>,
) -> Result<StatusCode, AppError> {
    consume_email_verification(&state, &request.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/verify-email?token=...
///
/// The link form of verification, as written to the log. Redirects into the workspace.
pub async fn handle_verify_email_link(
    State(state): State<AppState>,
    Query(request): Query<VerifyEmailRequest>,
) -> Result<Redirect, AppError> {
    consume_email_verification(&state, &request.token).await?;
    Ok(Redirect::to("/workspace"))
}

// ────────────────────────────────────────────────────────────────────────────
// Social sign-in
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/auth/sign-in/social
pub async fn handle_sign_in_social(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SocialSignInRequest>,
) -> Result<Json<ApiResponse<SocialSignInResponse>>, AppError> {
    let provider: OAuthProvider = request.provider.parse()?;
    let creds = provider.credentials(&state.config)?;

    let oauth_state = generate_token();
    let expires_at = Utc::now() + Duration::minutes(state.config.verification_ttl_minutes);
    state
        .store
        .create_verification(
            &oauth::state_identifier(&oauth_state),
            provider.id(),
            expires_at,
        )
        .await?;

    let url = oauth::authorization_url(
        provider,
        creds,
        &provider.redirect_uri(&state.config),
        &oauth_state,
    )?;
    Ok(ApiResponse::ok(SocialSignInResponse {
        url: url.to_string(),
    }))
}

/// GET /api/auth/callback/:provider
///
/// Completes the authorization-code flow and redirects into the workspace.
pub async fn handle_oauth_callback(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthCallbackQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let provider: OAuthProvider = provider.parse()?;
    if let Some(error) = query.error {
        return Err(AppError::Unauthorized(format!(
            "{provider} sign-in was cancelled: {error}"
        )));
    }
    let (code, oauth_state) = match (query.code, query.state) {
        (Some(code), Some(s)) => (code, s),
        _ => {
            return Err(AppError::Validation(
                "Missing code or state parameter".to_string(),
            ))
        }
    };

    let record = state
        .store
        .take_verification(&oauth::state_identifier(&oauth_state))
        .await?;
    let valid = matches!(&record, Some(r) if r.value == provider.id() && r.expires_at > Utc::now());
    if !valid {
        return Err(AppError::Validation(
            "Invalid or expired sign-in state".to_string(),
        ));
    }

    let creds = provider.credentials(&state.config)?;
    let redirect_uri = provider.redirect_uri(&state.config);
    let tokens = oauth::exchange_code(&state.http, provider, creds, &code, &redirect_uri).await?;
    let profile = oauth::fetch_profile(&state.http, provider, &tokens.access_token).await?;

    let account = NewAccount {
        provider_id: provider.id().to_string(),
        account_id: Some(profile.account_id.clone()),
        scope: tokens.scope,
    };
    let user_id = resolve_social_user(&state, provider, profile, account).await?;

    let session = issue_session(&state, user_id, &headers).await?;
    info!(user_id = %user_id, provider = %provider, "User signed in with provider");

    let cookie = session_cookie(
        &session.token,
        state.config.session_ttl_hours * 3600,
        state.config.secure_cookies,
    );
    Ok(with_cookie(cookie, Redirect::to("/workspace")))
}

/// Finds the user behind a provider identity, linking or creating as needed.
///
/// An existing user is linked only when the provider vouches for the email.
async fn resolve_social_user(
    state: &AppState,
    provider: OAuthProvider,
    profile: OAuthProfile,
    account: NewAccount,
) -> Result<Uuid, AppError> {
    if let Some(existing) = state
        .store
        .find_account(provider.id(), &profile.account_id)
        .await?
    {
        return Ok(existing.user_id);
    }

    let email = profile
        .email
        .as_deref()
        .ok_or_else(|| {
            AppError::Unauthorized(format!("{provider} did not share an email address"))
        })
        .and_then(validate_email)?;

    if let Some(user) = state.store.find_user_by_email(&email).await? {
        if !profile.email_verified {
            warn!(user_id = %user.id, provider = %provider, "Refusing to link unverified email");
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
        state.store.link_account(user.id, account).await?;
        if !user.email_verified {
            state.store.mark_email_verified(user.id).await?;
        }
        return Ok(user.id);
    }

    let name = profile
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());
    let (user, _) = state
        .store
        .create_user_with_account(
            NewUser {
                name,
                email,
                email_verified: profile.email_verified,
                password_hash: None,
                image: profile.image,
            },
            account,
        )
        .await?;
    info!(user_id = %user.id, provider = %provider, "User signed up with provider");
    Ok(user.id)
}

/// Fallback for unknown `/api/auth/*` paths.
pub async fn handle_auth_not_found() -> AppError {
    AppError::NotFound("Unknown authentication endpoint".to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, Utc};
    use serde_json::json;

    use crate::models::user::NewSession;
    use crate::test_support::{request_json, request_response, sign_up_and_sign_in, TestApp};

    #[tokio::test]
    async fn test_signup_returns_201_with_id() {
        let app = TestApp::new();
        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "email": "ada@example.com", "password": "analytical" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "ada@example.com");
        assert!(body["data"]["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_signup_duplicate_email_returns_409_without_new_row() {
        let app = TestApp::new();
        let payload = json!({ "email": "ada@example.com", "password": "analytical" });
        let (first, _) = request_json(
            &app.router,
            "POST",
            "/api/auth/signup",
            None,
            Some(payload.clone()),
        )
        .await;
        assert_eq!(first, StatusCode::CREATED);

        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "email": "ADA@example.com", "password": "different1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let user = app
            .state
            .store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(app.state.store.list_accounts(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signup_short_password_returns_400() {
        let app = TestApp::new();
        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "email": "ada@example.com", "password": "short" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("8 characters"), "message was {message}");
        assert!(app
            .state
            .store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_signup_malformed_json_returns_400() {
        let app = TestApp::new();
        let (status, body) = crate::test_support::request_raw(
            &app.router,
            "POST",
            "/api/auth/signup",
            None,
            "{not json",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_sign_in_and_get_session() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;

        let (status, body) =
            request_json(&app.router, "GET", "/api/auth/get-session", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user"]["email"], "ada@example.com");
        assert!(body["data"]["user"].get("password_hash").is_none());
        assert!(body["data"]["session"].get("token").is_none());
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_is_401() {
        let app = TestApp::new();
        sign_up_and_sign_in(&app.router, "ada@example.com").await;
        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/sign-in/email",
            None,
            Some(json!({ "email": "ada@example.com", "password": "not the password" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["message"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_sign_out_invalidates_session() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;

        let (status, _) =
            request_json(&app.router, "POST", "/api/auth/sign-out", Some(&token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) =
            request_json(&app.router, "GET", "/api/auth/get-session", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_email_verification_flow() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;

        let (status, _) = request_json(
            &app.router,
            "POST",
            "/api/auth/verify-email/request",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        // The token is only logged, so issue a known one through the store directly.
        let user = app
            .state
            .store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        app.state
            .store
            .create_verification(
                "email-verification:known",
                &user.id.to_string(),
                chrono::Utc::now() + chrono::Duration::minutes(5),
            )
            .await
            .unwrap();

        let (status, _) = request_json(
            &app.router,
            "POST",
            "/api/auth/verify-email",
            None,
            Some(json!({ "token": "known" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) =
            request_json(&app.router, "GET", "/api/auth/get-session", Some(&token), None).await;
        assert_eq!(body["data"]["user"]["email_verified"], true);

        let (status, _) = request_json(
            &app.router,
            "POST",
            "/api/auth/verify-email",
            None,
            Some(json!({ "token": "known" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verification_link_verifies_and_redirects() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;
        let user = app
            .state
            .store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        app.state
            .store
            .create_verification(
                "email-verification:known",
                &user.id.to_string(),
                Utc::now() + Duration::minutes(5),
            )
            .await
            .unwrap();

        let response =
            request_response(&app.router, "GET", "/api/auth/verify-email?token=known", None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(response.header("location").as_deref(), Some("/workspace"));

        let (_, body) =
            request_json(&app.router, "GET", "/api/auth/get-session", Some(&token), None).await;
        assert_eq!(body["data"]["user"]["email_verified"], true);

        let (status, body) =
            request_json(&app.router, "GET", "/api/auth/verify-email?token=known", None, None)
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_verification_link_without_token_is_400() {
        let app = TestApp::new();
        let (status, _) =
            request_json(&app.router, "GET", "/api/auth/verify-email", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_expired_verification_token_is_400() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;
        let user = app
            .state
            .store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        app.state
            .store
            .create_verification(
                "email-verification:stale",
                &user.id.to_string(),
                Utc::now() - Duration::minutes(1),
            )
            .await
            .unwrap();

        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/verify-email",
            None,
            Some(json!({ "token": "stale" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Invalid or expired verification token"
        );

        let (_, body) =
            request_json(&app.router, "GET", "/api/auth/get-session", Some(&token), None).await;
        assert_eq!(body["data"]["user"]["email_verified"], false);
    }

    #[tokio::test]
    async fn test_expired_session_is_401_and_deleted() {
        let app = TestApp::new();
        sign_up_and_sign_in(&app.router, "ada@example.com").await;
        let user = app
            .state
            .store
            .find_user_by_email("ada@example.com")
            .await
            .unwrap()
            .unwrap();
        app.state
            .store
            .create_session(NewSession {
                token: "expired-session-token".to_string(),
                user_id: user.id,
                expires_at: Utc::now() - Duration::hours(1),
                ip_address: None,
                user_agent: None,
            })
            .await
            .unwrap();

        let (status, body) = request_json(
            &app.router,
            "GET",
            "/api/auth/get-session",
            Some("expired-session-token"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        assert!(app
            .state
            .store
            .find_session("expired-session-token")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_email_fails_like_wrong_password() {
        let app = TestApp::new();
        sign_up_and_sign_in(&app.router, "ada@example.com").await;

        let (wrong_status, wrong_body) = request_json(
            &app.router,
            "POST",
            "/api/auth/sign-in/email",
            None,
            Some(json!({ "email": "ada@example.com", "password": "not the password" })),
        )
        .await;
        let (unknown_status, unknown_body) = request_json(
            &app.router,
            "POST",
            "/api/auth/sign-in/email",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "not the password" })),
        )
        .await;

        assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_status, wrong_status);
        assert_eq!(unknown_body, wrong_body);
    }

    #[tokio::test]
    async fn test_change_password() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;

        let (status, _) = request_json(
            &app.router,
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({ "current_password": "wrong-password", "new_password": "new password 1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = request_json(
            &app.router,
            "POST",
            "/api/auth/change-password",
            Some(&token),
            Some(json!({
                "current_password": crate::test_support::TEST_PASSWORD,
                "new_password": "new password 1"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = request_json(
            &app.router,
            "POST",
            "/api/auth/sign-in/email",
            None,
            Some(json!({ "email": "ada@example.com", "password": "new password 1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_accounts_hides_tokens() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;
        let (status, body) =
            request_json(&app.router, "GET", "/api/auth/list-accounts", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let accounts = body["data"].as_array().unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0]["provider_id"], "credential");
        assert!(accounts[0].get("access_token").is_none());
    }

    #[tokio::test]
    async fn test_social_sign_in_unconfigured_provider_is_400() {
        let app = TestApp::new();
        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/sign-in/social",
            None,
            Some(json!({ "provider": "google" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("not enabled"));
    }

    #[tokio::test]
    async fn test_social_sign_in_returns_authorization_url() {
        let app = TestApp::with_github();
        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/sign-in/social",
            None,
            Some(json!({ "provider": "github" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let url = body["data"]["url"].as_str().unwrap();
        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("state="));
    }

    #[tokio::test]
    async fn test_oauth_callback_rejects_unknown_state() {
        let app = TestApp::with_github();
        let (status, _) = request_json(
            &app.router,
            "GET",
            "/api/auth/callback/github?code=abc&state=forged",
            None,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_auth_route_is_404() {
        let app = TestApp::new();
        let (status, body) =
            request_json(&app.router, "GET", "/api/auth/some/other/thing", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
