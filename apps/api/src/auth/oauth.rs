//! Social sign-in via the OAuth 2.0 authorization-code flow (Google, GitHub).

use std::fmt;
use std::str::FromStr;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::config::{Config, OAuthCredentials};
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Github,
}

struct Endpoints {
    authorize: &'static str,
    token: &'static str,
    userinfo: &'static str,
    scope: &'static str,
}

impl OAuthProvider {
    pub fn id(&self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Github => "github",
        }
    }

    fn endpoints(&self) -> Endpoints {
        match self {
            OAuthProvider::Google => Endpoints {
                authorize: "https://accounts.google.com/o/oauth2/v2/auth",
                token: "https://oauth2.googleapis.com/token",
                userinfo: "https://openidconnect.googleapis.com/v1/userinfo",
                scope: "openid email profile",
            },
            OAuthProvider::Github => Endpoints {
                authorize: "https://github.com/login/oauth/authorize",
                token: "https://github.com/login/oauth/access_token",
                userinfo: "https://api.github.com/user",
                scope: "read:user user:email",
            },
        }
    }

    /// Configured credentials, or a 400 naming the provider.
    pub fn credentials<'a>(&self, config: &'a Config) -> Result<&'a OAuthCredentials, AppError> {
        let creds = match self {
            OAuthProvider::Google => config.google.as_ref(),
            OAuthProvider::Github => config.github.as_ref(),
        };
        creds.ok_or_else(|| {
            AppError::Validation(format!("Sign-in with {} is not enabled", self.id()))
        })
    }

    pub fn redirect_uri(&self, config: &Config) -> String {
        format!("{}/api/auth/callback/{}", config.public_url, self.id())
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for OAuthProvider {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(OAuthProvider::Google),
            "github" => Ok(OAuthProvider::Github),
            other => Err(AppError::Validation(format!(
                "Unsupported sign-in provider '{other}'"
            ))),
        }
    }
}

pub fn state_identifier(state: &str) -> String {
    format!("oauth-state:{state}")
}

pub fn authorization_url(
    provider: OAuthProvider,
    creds: &OAuthCredentials,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, AppError> {
    let endpoints = provider.endpoints();
    Url::parse_with_params(
        endpoints.authorize,
        &[
            ("client_id", creds.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", endpoints.scope),
            ("state", state),
        ],
    )
    .map_err(|e| AppError::Internal(e.into()))
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub scope: Option<String>,
}

/// Normalized provider profile.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthProfile {
    pub account_id: String,
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    sub: String,
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    name: Option<String>,
    picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubEmail {
    email: String,
    primary: bool,
    verified: bool,
}

impl From<GoogleUserInfo> for OAuthProfile {
    fn from(info: GoogleUserInfo) -> Self {
        OAuthProfile {
            account_id: info.sub,
            email: info.email,
            email_verified: info.email_verified,
            name: info.name,
            image: info.picture,
        }
    }
}

fn github_profile(user: GithubUser, emails: &[GithubEmail]) -> OAuthProfile {
    let primary = emails.iter().find(|e| e.primary && e.verified);
    let (email, email_verified) = match primary {
        Some(e) => (Some(e.email.clone()), true),
        None => (user.email, false),
    };
    OAuthProfile {
        account_id: user.id.to_string(),
        email,
        email_verified,
        name: user.name.or(Some(user.login)),
        image: user.avatar_url,
    }
}

fn upstream(provider: OAuthProvider, e: reqwest::Error) -> AppError {
    AppError::Unauthorized(format!("{provider} sign-in failed: {e}"))
}

/// Exchanges an authorization code for tokens.
pub async fn exchange_code(
    http: &Client,
    provider: OAuthProvider,
    creds: &OAuthCredentials,
    code: &str,
    redirect_uri: &str,
) -> Result<TokenResponse, AppError> {
    http.post(provider.endpoints().token)
        .header("accept", "application/json")
        .form(&[
            ("client_id", creds.client_id.as_str()),
            ("client_secret", creds.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| upstream(provider, e))?
        .json::<TokenResponse>()
        .await
        .map_err(|e| upstream(provider, e))
}

pub async fn fetch_profile(
    http: &Client,
    provider: OAuthProvider,
    access_token: &str,
) -> Result<OAuthProfile, AppError> {
    let get = |url: &str| {
        http.get(url)
            .bearer_auth(access_token)
            .header("user-agent", "rezumerai")
            .header("accept", "application/json")
    };

    match provider {
        OAuthProvider::Google => {
            let info: GoogleUserInfo = get(provider.endpoints().userinfo)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| upstream(provider, e))?
                .json()
                .await
                .map_err(|e| upstream(provider, e))?;
            Ok(info.into())
        }
        OAuthProvider::Github => {
            let user: GithubUser = get(provider.endpoints().userinfo)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| upstream(provider, e))?
                .json()
                .await
                .map_err(|e| upstream(provider, e))?;
            let emails: Vec<GithubEmail> = get("https://api.github.com/user/emails")
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| upstream(provider, e))?
                .json()
                .await
                .map_err(|e| upstream(provider, e))?;
            Ok(github_profile(user, &emails))
        }
    }
}
