pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::pages::{errors::handle_page_not_found, handlers as pages};
use crate::resumes::{handlers as resumes, upload::MAX_UPLOAD_BYTES};
use crate::state::AppState;
use crate::workspace::handlers as workspace;

/// Headroom over the file limit for the other multipart fields and boundaries.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::handle_signup))
        .route("/sign-in/email", post(auth::handle_sign_in_email))
        .route("/sign-in/social", post(auth::handle_sign_in_social))
        .route("/callback/:provider", get(auth::handle_oauth_callback))
        .route("/sign-out", post(auth::handle_sign_out))
        .route("/get-session", get(auth::handle_get_session))
        .route("/change-password", post(auth::handle_change_password))
        .route("/list-accounts", get(auth::handle_list_accounts))
        .route(
            "/verify-email/request",
            post(auth::handle_request_verification),
        )
        .route(
            "/verify-email",
            get(auth::handle_verify_email_link).post(auth::handle_verify_email),
        )
        .fallback(auth::handle_auth_not_found)
}

fn resume_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/upload",
            post(resumes::handle_upload_resume)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route(
            "/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route("/:id/duplicate", post(resumes::handle_duplicate_resume))
        .route("/:id/suggestions", post(resumes::handle_suggestions))
        .route("/:id/export", get(resumes::handle_export_resume))
}

fn workspace_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/builder",
            get(workspace::handle_get_builder).patch(workspace::handle_patch_builder),
        )
        .route(
            "/dashboard",
            get(workspace::handle_get_dashboard).patch(workspace::handle_patch_dashboard),
        )
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // JSON API
        .nest("/api/auth", auth_routes())
        .nest("/api/resumes", resume_routes())
        .nest("/api/workspace", workspace_routes())
        .route("/api/templates", get(resumes::handle_list_templates))
        // HTML pages
        .route("/", get(pages::handle_landing))
        .route("/sign-in", get(pages::handle_sign_in_page))
        .route("/sign-up", get(pages::handle_sign_up_page))
        .route("/workspace", get(pages::handle_workspace))
        .route("/preview/:id", get(pages::handle_preview))
        .fallback(handle_page_not_found)
        .with_state(state)
}
