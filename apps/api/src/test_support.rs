//! Router-level test harness over the in-memory store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use crate::config::{Config, OAuthCredentials};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::MemoryStore;
use crate::workspace::UiStateRegistry;

pub const TEST_PASSWORD: &str = "correct horse battery";
const MULTIPART_BOUNDARY: &str = "rezumerai-test-boundary";

pub struct TestApp {
    pub state: AppState,
    pub router: axum::Router,
}

fn test_config() -> Config {
    Config {
        database_url: None,
        public_url: "http://localhost:8080".to_string(),
        port: 8080,
        rust_log: "debug".to_string(),
        session_ttl_hours: 1,
        verification_ttl_minutes: 10,
        bcrypt_cost: 4,
        secure_cookies: false,
        anthropic_api_key: None,
        google: None,
        github: None,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// GitHub sign-in enabled with dummy credentials.
    pub fn with_github() -> Self {
        let mut config = test_config();
        config.github = Some(OAuthCredentials {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
        });
        Self::with_config(config)
    }

    fn with_config(config: Config) -> Self {
        let state = AppState {
            store: Arc::new(MemoryStore::new()),
            llm: None,
            http: reqwest::Client::new(),
            config,
            ui: Arc::new(UiStateRegistry::new()),
        };
        let router = build_router(state.clone());
        Self { state, router }
    }
}

/// A response with its body decoded as text.
pub struct TextResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: String,
}

impl TextResponse {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

async fn send(router: &axum::Router, request: Request<Body>) -> TextResponse {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("request should be handled");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should read");
    TextResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&bytes).to_string(),
    }
}

fn builder(method: &str, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    builder
}

fn parse_body(body: &str) -> Value {
    if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    }
}

pub async fn request_json(
    router: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(body) => builder(method, uri, token)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder(method, uri, token).body(Body::empty()),
    }
    .expect("request should build");
    let response = send(router, request).await;
    (response.status, parse_body(&response.body))
}

/// Sends `body` verbatim as `application/json`.
pub async fn request_raw(
    router: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &str,
) -> (StatusCode, Value) {
    let request = builder(method, uri, token)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    let response = send(router, request).await;
    (response.status, parse_body(&response.body))
}

/// Bodiless request returning status, headers and text body.
pub async fn request_response(
    router: &axum::Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
) -> TextResponse {
    let request = builder(method, uri, token)
        .body(Body::empty())
        .expect("request should build");
    send(router, request).await
}

/// POSTs `multipart/form-data`; each part is `(name, filename, content)`.
pub async fn request_multipart(
    router: &axum::Router,
    uri: &str,
    token: &str,
    parts: &[(&str, Option<&str>, &[u8])],
) -> (StatusCode, Value) {
    let mut body: Vec<u8> = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                     Content-Type: application/pdf\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    let request = builder("POST", uri, Some(token))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request should build");
    let response = send(router, request).await;
    (response.status, parse_body(&response.body))
}

/// Registers `email` with [`TEST_PASSWORD`] and returns a session token.
pub async fn sign_up_and_sign_in(router: &axum::Router, email: &str) -> String {
    let (status, _) = request_json(
        router,
        "POST",
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD, "name": "Test User" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup should succeed");

    let (status, body) = request_json(
        router,
        "POST",
        "/api/auth/sign-in/email",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "sign-in should succeed");
    body["data"]["token"]
        .as_str()
        .expect("sign-in returns a token")
        .to_string()
}
