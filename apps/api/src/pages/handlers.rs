use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::errors::AppError;
use crate::models::resume::ResumeSummary;
use crate::resumes::render::render_document;
use crate::resumes::templates::template_info;
use crate::state::AppState;
use crate::util::format::escape_html;
use crate::workspace::state::{DashboardState, ViewMode};

use super::{page, PageError, RouteGroup};

#[derive(Debug, Deserialize)]
pub struct WorkspaceQuery {
    pub search: Option<String>,
}

/// The current session for a page request; storage failures become the group's error page.
async fn page_session(
    state: &AppState,
    headers: &HeaderMap,
    group: RouteGroup,
    path: &str,
) -> Result<Option<AuthSession>, PageError> {
    match AuthSession::resolve(state, headers).await {
        Ok(auth) => Ok(Some(auth)),
        Err(AppError::Unauthorized(_)) => Ok(None),
        Err(e) => Err(PageError::new(group, path, e)),
    }
}

/// GET /
pub async fn handle_landing() -> Html<String> {
    page(
        "Build your resume",
        "<section class=\"hero\">\n\
         <h1>Welcome to rezumerai</h1>\n\
         <p>Create polished, ATS-friendly resumes with live templates and AI-assisted writing.</p>\n\
         <p><a class=\"button\" href=\"/sign-up\">Get Started</a> \
         <a class=\"button secondary\" href=\"/sign-in\">Sign in</a></p>\n\
         </section>",
    )
}

const SIGN_IN_SCRIPT: &str = r#"<script>
document.getElementById('auth-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const form = new FormData(event.target);
  const res = await fetch('/api/auth/sign-in/email', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ email: form.get('email'), password: form.get('password') }),
  });
  const body = await res.json();
  if (body.success) { window.location.href = '/workspace'; }
  else { document.getElementById('auth-error').textContent = body.error.message; }
});
</script>"#;

const SIGN_UP_SCRIPT: &str = r#"<script>
document.getElementById('auth-form').addEventListener('submit', async (event) => {
  event.preventDefault();
  const form = new FormData(event.target);
  const credentials = { email: form.get('email'), password: form.get('password') };
  const post = (url, payload) => fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(payload),
  }).then((res) => res.json());
  let body = await post('/api/auth/signup', { ...credentials, name: form.get('name') || null });
  if (body.success) { body = await post('/api/auth/sign-in/email', credentials); }
  if (body.success) { window.location.href = '/workspace'; }
  else { document.getElementById('auth-error').textContent = body.error.message; }
});
</script>"#;

/// Shared by both auth pages: starts the provider flow and follows its authorization URL.
const SOCIAL_SIGN_IN_SCRIPT: &str = r#"<script>
document.querySelectorAll('a[data-provider]').forEach((link) => {
  link.addEventListener('click', async (event) => {
    event.preventDefault();
    const res = await fetch('/api/auth/sign-in/social', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ provider: link.dataset.provider }),
    });
    const body = await res.json();
    if (body.success) { window.location.href = body.data.url; }
    else { document.getElementById('auth-error').textContent = body.error.message; }
  });
});
</script>"#;

fn auth_form(heading: &str, with_name: bool, submit: &str, alternate: &str, script: &str) -> String {
    let name_field = if with_name {
        "<input name=\"name\" type=\"text\" placeholder=\"Full name\" autocomplete=\"name\">\n"
    } else {
        ""
    };
    format!(
        "<h1>{heading}</h1>\n<form id=\"auth-form\" class=\"auth\">\n{name_field}\
         <input name=\"email\" type=\"email\" placeholder=\"Email\" required autocomplete=\"email\">\n\
         <input name=\"password\" type=\"password\" placeholder=\"Password\" required minlength=\"8\">\n\
         <button class=\"button\" type=\"submit\">{submit}</button>\n\
         <p id=\"auth-error\" class=\"error\"></p>\n</form>\n\
         <p>{alternate}</p>\n\
         <p>Or continue with <a href=\"#\" data-provider=\"google\">Google</a> \
         or <a href=\"#\" data-provider=\"github\">GitHub</a>.</p>\n{script}\n{SOCIAL_SIGN_IN_SCRIPT}"
    )
}

/// GET /sign-in
pub async fn handle_sign_in_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if page_session(&state, &headers, RouteGroup::SignIn, "/sign-in")
        .await?
        .is_some()
    {
        return Ok(Redirect::to("/workspace").into_response());
    }
    let body = auth_form(
        "Sign in",
        false,
        "Sign in",
        "New here? <a href=\"/sign-up\">Create an account</a>",
        SIGN_IN_SCRIPT,
    );
    Ok(page("Sign in", &body).into_response())
}

/// GET /sign-up
pub async fn handle_sign_up_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if page_session(&state, &headers, RouteGroup::SignUp, "/sign-up")
        .await?
        .is_some()
    {
        return Ok(Redirect::to("/workspace").into_response());
    }
    let body = auth_form(
        "Create your account",
        true,
        "Sign up",
        "Already have an account? <a href=\"/sign-in\">Sign in</a>",
        SIGN_UP_SCRIPT,
    );
    Ok(page("Sign up", &body).into_response())
}

fn resume_card(resume: &ResumeSummary) -> String {
    format!(
        "<article class=\"card\">\n<h3><a href=\"/preview/{id}\">{title}</a></h3>\n\
         <small>{template} · updated {updated}</small>\n\
         <p><a href=\"/api/resumes/{id}/export\">Download</a></p>\n</article>",
        id = resume.id,
        title = escape_html(&resume.title),
        template = template_info(resume.template).name,
        updated = resume.updated_at.format("%b %-d, %Y"),
    )
}

fn render_dashboard(name: &str, resumes: &[ResumeSummary], dashboard: &DashboardState) -> String {
    let view_class = match dashboard.view_mode {
        ViewMode::Grid => "grid",
        ViewMode::List => "list",
    };
    let cards = if resumes.is_empty() {
        "<p>No resumes yet. Create one to get started.</p>".to_string()
    } else {
        resumes.iter().map(resume_card).collect::<Vec<_>>().join("\n")
    };
    format!(
        "<h1>Welcome back, {name}</h1>\n\
         <form method=\"get\" action=\"/workspace\"><input name=\"search\" value=\"{search}\" \
         placeholder=\"Search resumes\"></form>\n\
         <section class=\"resumes {view_class}\">\n{cards}\n</section>",
        name = escape_html(name),
        search = escape_html(&dashboard.search_query),
    )
}

/// GET /workspace
///
/// Lists the user's resumes, filtered and laid out by their dashboard state.
/// A `search` query parameter replaces the stored search query.
pub async fn handle_workspace(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<WorkspaceQuery>,
) -> Result<Response, PageError> {
    const PATH: &str = "/workspace";
    let Some(auth) = page_session(&state, &headers, RouteGroup::Workspace, PATH).await? else {
        return Ok(Redirect::to("/sign-in").into_response());
    };

    let dashboard = match query.search {
        Some(search) => {
            state
                .ui
                .update_dashboard(auth.user.id, |d| d.set_search_query(search))
                .await
        }
        None => state.ui.dashboard(auth.user.id).await,
    };
    let search = Some(dashboard.search_query.trim()).filter(|q| !q.is_empty());
    let resumes = state
        .store
        .list_resumes(auth.user.id, search)
        .await
        .map_err(|e| PageError::new(RouteGroup::Workspace, PATH, e))?;

    let name = if auth.user.name.trim().is_empty() {
        auth.user.email.as_str()
    } else {
        auth.user.name.as_str()
    };
    Ok(page("Workspace", &render_dashboard(name, &resumes, &dashboard)).into_response())
}

/// GET /preview/:id
///
/// Owners always see their resume; anyone else only when it is public.
pub async fn handle_preview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let path = format!("/preview/{raw_id}");
    let not_found = || AppError::NotFound("Resume not found".to_string());

    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| PageError::new(RouteGroup::Preview, path.as_str(), not_found()))?;
    let resume = state
        .store
        .get_resume_unscoped(id)
        .await
        .map_err(|e| PageError::new(RouteGroup::Preview, path.as_str(), e))?
        .ok_or_else(|| PageError::new(RouteGroup::Preview, path.as_str(), not_found()))?;

    if !resume.public {
        let viewer = page_session(&state, &headers, RouteGroup::Preview, &path).await?;
        match viewer {
            Some(auth) if auth.user.id == resume.user_id => {}
            Some(_) => return Err(PageError::new(RouteGroup::Preview, path, AppError::Forbidden)),
            None => return Err(PageError::new(RouteGroup::Preview, path, not_found())),
        }
    }

    Ok(Html(render_document(&resume, None)))
}
