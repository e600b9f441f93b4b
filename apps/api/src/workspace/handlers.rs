//! Axum route handlers for the workspace UI state API.

use axum::{extract::State, Json};

use crate::api::{ApiJson, ApiResponse};
use crate::auth::AuthSession;
use crate::workspace::state::{BuilderAction, BuilderState, DashboardAction, DashboardState};
use crate::state::AppState;

/// GET /api/workspace/builder
pub async fn handle_get_builder(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Json<ApiResponse<BuilderState>> {
    ApiResponse::ok(state.ui.builder(auth.user.id).await)
}

/// PATCH /api/workspace/builder
pub async fn handle_patch_builder(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(action): ApiJson<BuilderAction>,
) -> Json<ApiResponse<BuilderState>> {
    let updated = state
        .ui
        .update_builder(auth.user.id, |b| action.apply(b))
        .await;
    ApiResponse::ok(updated)
}

/// GET /api/workspace/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Json<ApiResponse<DashboardState>> {
    ApiResponse::ok(state.ui.dashboard(auth.user.id).await)
}

/// PATCH /api/workspace/dashboard
pub async fn handle_patch_dashboard(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(action): ApiJson<DashboardAction>,
) -> Json<ApiResponse<DashboardState>> {
    let updated = state
        .ui
        .update_dashboard(auth.user.id, |d| action.apply(d))
        .await;
    ApiResponse::ok(updated)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{request_json, sign_up_and_sign_in, TestApp, TEST_PASSWORD};

    #[tokio::test]
    async fn test_builder_state_requires_session() {
        let app = TestApp::new();
        let (status, _) =
            request_json(&app.router, "GET", "/api/workspace/builder", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_patch_builder_sets_only_target_field() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;

        request_json(
            &app.router,
            "PATCH",
            "/api/workspace/builder",
            Some(&token),
            Some(json!({ "action": "set_preview_mode", "preview": true })),
        )
        .await;
        let (status, body) = request_json(
            &app.router,
            "PATCH",
            "/api/workspace/builder",
            Some(&token),
            Some(json!({ "action": "set_active_section_index", "index": 2 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body_after) =
            request_json(&app.router, "GET", "/api/workspace/builder", Some(&token), None).await;
        assert_eq!(body, body_after);
        assert_eq!(body_after["data"]["active_section_index"], 2);
        assert_eq!(body_after["data"]["preview_mode"], true);
        assert_eq!(body_after["data"]["is_saving"], false);
    }

    #[tokio::test]
    async fn test_dashboard_modal_last_write_wins() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;

        request_json(
            &app.router,
            "PATCH",
            "/api/workspace/dashboard",
            Some(&token),
            Some(json!({
                "action": "set_modal_state",
                "modal": { "type": "edit", "resume_id": "abc" }
            })),
        )
        .await;
        let (status, body) = request_json(
            &app.router,
            "PATCH",
            "/api/workspace/dashboard",
            Some(&token),
            Some(json!({ "action": "set_modal_state", "modal": { "type": null } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["modal"]["type"].is_null());
        assert!(body["data"]["modal"]["resume_id"].is_null());
    }

    #[tokio::test]
    async fn test_sign_out_keeps_state_for_other_sessions() {
        let app = TestApp::new();
        let laptop = sign_up_and_sign_in(&app.router, "ada@example.com").await;
        let (status, body) = request_json(
            &app.router,
            "POST",
            "/api/auth/sign-in/email",
            None,
            Some(json!({ "email": "ada@example.com", "password": TEST_PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let phone = body["data"]["token"].as_str().unwrap().to_string();
        assert_ne!(laptop, phone);

        request_json(
            &app.router,
            "PATCH",
            "/api/workspace/builder",
            Some(&laptop),
            Some(json!({ "action": "set_active_section_index", "index": 3 })),
        )
        .await;
        let (status, _) =
            request_json(&app.router, "POST", "/api/auth/sign-out", Some(&phone), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) =
            request_json(&app.router, "GET", "/api/workspace/builder", Some(&laptop), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["active_section_index"], 3);
    }

    #[tokio::test]
    async fn test_unknown_action_is_400() {
        let app = TestApp::new();
        let token = sign_up_and_sign_in(&app.router, "ada@example.com").await;
        let (status, _) = request_json(
            &app.router,
            "PATCH",
            "/api/workspace/dashboard",
            Some(&token),
            Some(json!({ "action": "launch_rockets" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
