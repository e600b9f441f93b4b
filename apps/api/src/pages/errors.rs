//! Error-boundary pages, one per route group.

use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::warn;

use crate::errors::AppError;
use crate::util::format::escape_html;

use super::page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteGroup {
    Global,
    Workspace,
    SignIn,
    SignUp,
    Preview,
}

impl RouteGroup {
    pub fn id(&self) -> &'static str {
        match self {
            RouteGroup::Global => "global",
            RouteGroup::Workspace => "workspace",
            RouteGroup::SignIn => "sign-in",
            RouteGroup::SignUp => "sign-up",
            RouteGroup::Preview => "preview",
        }
    }

    fn heading(&self) -> &'static str {
        match self {
            RouteGroup::Global => "Something went wrong",
            RouteGroup::Workspace => "Your workspace could not be loaded",
            RouteGroup::SignIn => "Sign-in is unavailable right now",
            RouteGroup::SignUp => "Sign-up is unavailable right now",
            RouteGroup::Preview => "This resume could not be shown",
        }
    }

    /// Where the navigate-away link leads, and its label.
    fn escape_route(&self) -> (&'static str, &'static str) {
        match self {
            RouteGroup::Global | RouteGroup::SignIn | RouteGroup::SignUp => ("/", "Go home"),
            RouteGroup::Workspace => ("/", "Back to home"),
            RouteGroup::Preview => ("/workspace", "Back to workspace"),
        }
    }
}

/// An error raised while rendering an HTML route, shown as that group's boundary page.
#[derive(Debug)]
pub struct PageError {
    pub group: RouteGroup,
    pub retry_path: String,
    pub error: AppError,
}

impl PageError {
    pub fn new(group: RouteGroup, retry_path: impl Into<String>, error: impl Into<AppError>) -> Self {
        Self {
            group,
            retry_path: retry_path.into(),
            error: error.into(),
        }
    }

    pub fn render(&self) -> (StatusCode, String) {
        let status = self.error.status();
        let (_, message) = self.error.public_parts();
        let (away_href, away_label) = self.group.escape_route();
        let body = format!(
            "<section class=\"error-boundary\" data-group=\"{group}\">\n\
             <h1>{heading}</h1>\n<p class=\"error\">{message}</p>\n\
             <p><a class=\"button\" href=\"{retry}\">Try again</a> \
             <a class=\"button secondary\" href=\"{away_href}\">{away_label}</a></p>\n\
             </section>",
            group = self.group.id(),
            heading = self.group.heading(),
            message = escape_html(&message),
            retry = escape_html(&self.retry_path),
        );
        (status, page(self.group.heading(), &body).0)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        if !self.error.status().is_server_error() {
            warn!(group = self.group.id(), path = %self.retry_path, "Page error: {}", self.error);
        }
        let (status, html) = self.render();
        (status, axum::response::Html(html)).into_response()
    }
}

/// Fallback for unknown non-API paths.
pub async fn handle_page_not_found(uri: Uri) -> PageError {
    PageError::new(
        RouteGroup::Global,
        uri.path(),
        AppError::NotFound("The page you are looking for does not exist".to_string()),
    )
}
