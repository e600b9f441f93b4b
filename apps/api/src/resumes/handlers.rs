//! Axum route handlers for the Resume API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::{ApiJson, ApiResponse};
use crate::auth::AuthSession;
use crate::errors::AppError;
use crate::layout::PaperSize;
use crate::models::resume::{
    NewResume, Resume, ResumeChanges, ResumeSections, ResumeSummary, TemplateId,
    DEFAULT_ACCENT_COLOR,
};
use crate::resumes::export::export_resume;
use crate::resumes::suggestions::{suggest, SuggestionRequest, SuggestionResponse};
use crate::resumes::templates::{
    parse_template, validate_accent_color, validate_title, AccentColor, TemplateInfo,
    ACCENT_PALETTE, TEMPLATES,
};
use crate::resumes::upload::{extract_pdf_text, sections_from_text, MAX_UPLOAD_BYTES};
use crate::state::AppState;
use crate::workspace::state::BUILDER_SECTIONS;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    #[serde(default)]
    pub title: String,
    pub template: Option<String>,
    pub accent_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateResumeRequest {
    pub title: Option<String>,
    pub template: Option<String>,
    pub accent_color: Option<String>,
    pub public: Option<bool>,
    pub sections: Option<ResumeSections>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub paper: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateCatalogue {
    pub templates: &'static [TemplateInfo],
    pub accent_colors: &'static [AccentColor],
    pub builder_sections: &'static [&'static str],
}

impl UpdateResumeRequest {
    fn into_changes(self) -> Result<ResumeChanges, AppError> {
        Ok(ResumeChanges {
            title: self.title.as_deref().map(validate_title).transpose()?,
            template: self.template.as_deref().map(parse_template).transpose()?,
            accent_color: self
                .accent_color
                .as_deref()
                .map(validate_accent_color)
                .transpose()?,
            public: self.public,
            sections: self.sections,
        })
    }
}

async fn load_owned(state: &AppState, user_id: Uuid, id: Uuid) -> Result<Resume, AppError> {
    state
        .store
        .get_resume(user_id, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/templates
pub async fn handle_list_templates() -> Json<ApiResponse<TemplateCatalogue>> {
    ApiResponse::ok(TemplateCatalogue {
        templates: &TEMPLATES,
        accent_colors: &ACCENT_PALETTE,
        builder_sections: &BUILDER_SECTIONS,
    })
}

/// GET /api/resumes?search=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthSession,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<ResumeSummary>>>, AppError> {
    let resumes = state
        .store
        .list_resumes(auth.user.id, query.search.as_deref())
        .await?;
    Ok(ApiResponse::ok(resumes))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthSession,
    ApiJson(request): ApiJson<CreateResumeRequest>,
) -> Result<Response, AppError> {
    let title = validate_title(&request.title)?;
    let template = request
        .template
        .as_deref()
        .map(parse_template)
        .transpose()?
        .unwrap_or_default();
    let accent_color = request
        .accent_color
        .as_deref()
        .map(validate_accent_color)
        .transpose()?
        .unwrap_or_else(|| DEFAULT_ACCENT_COLOR.to_string());

    let resume = state
        .store
        .create_resume(NewResume {
            user_id: auth.user.id,
            title,
            template,
            accent_color,
            sections: ResumeSections::default(),
        })
        .await?;
    info!(user_id = %auth.user.id, resume_id = %resume.id, "Resume created");
    Ok(ApiResponse::created(resume))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    Ok(ApiResponse::ok(load_owned(&state, auth.user.id, id).await?))
}

/// PUT /api/resumes/:id
///
/// Partial update; also records the save in the user's builder state.
pub async fn handle_update_resume(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateResumeRequest>,
) -> Result<Json<ApiResponse<Resume>>, AppError> {
    let changes = request.into_changes()?;
    let resume = state
        .store
        .update_resume(auth.user.id, id, changes)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::NotFound(_) => AppError::NotFound(format!("Resume {id} not found")),
            other => other,
        })?;
    state.ui.mark_saved(auth.user.id, resume.updated_at).await;
    Ok(ApiResponse::ok(resume))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_resume(auth.user.id, id).await? {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    info!(user_id = %auth.user.id, resume_id = %id, "Resume deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/resumes/:id/duplicate
pub async fn handle_duplicate_resume(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let source = load_owned(&state, auth.user.id, id).await?;
    let title = crate::util::format::truncate_chars(
        &format!("{} (copy)", source.title),
        crate::resumes::templates::MAX_TITLE_CHARS,
    );
    let copy = state
        .store
        .create_resume(NewResume {
            user_id: auth.user.id,
            title,
            template: source.template,
            accent_color: source.accent_color,
            sections: source.sections,
        })
        .await?;
    Ok(ApiResponse::created(copy))
}

/// POST /api/resumes/upload (multipart: `title`, `file`)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    auth: AuthSession,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut title: Option<String> = None;
    let mut file: Option<bytes::Bytes> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("title") => title = Some(field.text().await.map_err(multipart_error)?),
            Some("file") => {
                let data = field.bytes().await.map_err(multipart_error)?;
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::PayloadTooLarge(format!(
                        "PDF must be at most {} MiB",
                        MAX_UPLOAD_BYTES / (1024 * 1024)
                    )));
                }
                file = Some(data);
            }
            _ => {}
        }
    }

    let title = validate_title(title.as_deref().unwrap_or_default())?;
    let file = file.ok_or_else(|| AppError::Validation("A PDF file is required".to_string()))?;

    let text = extract_pdf_text(file).await?;
    let sections = sections_from_text(state.llm.as_ref(), &text).await;

    let resume = state
        .store
        .create_resume(NewResume {
            user_id: auth.user.id,
            title,
            template: TemplateId::default(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            sections,
        })
        .await?;
    info!(user_id = %auth.user.id, resume_id = %resume.id, "Resume imported from PDF");
    Ok(ApiResponse::created(resume))
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// POST /api/resumes/:id/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<SuggestionRequest>,
) -> Result<Json<ApiResponse<SuggestionResponse>>, AppError> {
    let resume = load_owned(&state, auth.user.id, id).await?;
    let llm = state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("AI suggestions are not configured".to_string()))?;
    let response = suggest(llm, &resume, request).await?;
    Ok(ApiResponse::ok(response))
}

/// GET /api/resumes/:id/export?paper=a4|letter
pub async fn handle_export_resume(
    State(state): State<AppState>,
    auth: AuthSession,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let paper = match query.paper.as_deref() {
        Some(raw) => raw.parse::<PaperSize>().map_err(AppError::Validation)?,
        None => PaperSize::default(),
    };
    let resume = load_owned(&state, auth.user.id, id).await?;
    let doc = export_resume(&resume, paper);
    debug!(resume_id = %id, %paper, pages = doc.estimated_pages, "Resume exported");

    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{}\"", doc.filename))
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
            (
                header::HeaderName::from_static("x-estimated-pages"),
                HeaderValue::from(doc.estimated_pages),
            ),
        ],
        doc.html,
    )
        .into_response())
}
