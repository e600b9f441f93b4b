//! AI-assisted rewrite suggestions for resume sections.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::NO_FABRICATION_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::resume::Resume;
use crate::resumes::prompts::{
    EXPERIENCE_SUGGESTION_PROMPT, SUGGESTION_SYSTEM, SUMMARY_SUGGESTION_PROMPT,
};

pub const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Summary,
    Experience,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    pub kind: SuggestionKind,
    /// Experience entry index; required for `experience`.
    pub index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub kind: SuggestionKind,
    pub original: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionReply {
    #[serde(default)]
    suggestions: Vec<String>,
}

/// Builds the prompt for a request. Returns `(prompt, original_text)`.
pub fn build_prompt(
    resume: &Resume,
    request: &SuggestionRequest,
) -> Result<(String, String), AppError> {
    let s = &resume.sections;
    match request.kind {
        SuggestionKind::Summary => {
            let text = s.professional_summary.trim();
            if text.is_empty() {
                return Err(AppError::Validation(
                    "Write a professional summary first".to_string(),
                ));
            }
            let profession = non_empty_or(&s.personal_info.profession, "not specified");
            let prompt = SUMMARY_SUGGESTION_PROMPT
                .replace("{profession}", profession)
                .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
                .replace("{text}", text);
            Ok((prompt, text.to_string()))
        }
        SuggestionKind::Experience => {
            let index = request.index.ok_or_else(|| {
                AppError::Validation("index is required for experience suggestions".to_string())
            })?;
            let item = s.experience.get(index).ok_or_else(|| {
                AppError::Validation(format!("No experience entry at index {index}"))
            })?;
            let text = item.description.trim();
            if text.is_empty() {
                return Err(AppError::Validation(
                    "Write a job description first".to_string(),
                ));
            }
            let prompt = EXPERIENCE_SUGGESTION_PROMPT
                .replace("{position}", non_empty_or(&item.position, "not specified"))
                .replace("{company}", non_empty_or(&item.company, "not specified"))
                .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
                .replace("{text}", text);
            Ok((prompt, text.to_string()))
        }
    }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Trims, drops blanks and exact duplicates of the original, caps the count.
fn clean_suggestions(raw: Vec<String>, original: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for s in raw.into_iter().map(|s| s.trim().to_string()) {
        if s.is_empty() || s == original || out.contains(&s) {
            continue;
        }
        out.push(s);
        if out.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    out
}

pub async fn suggest(
    llm: &LlmClient,
    resume: &Resume,
    request: SuggestionRequest,
) -> Result<SuggestionResponse, AppError> {
    let (prompt, original) = build_prompt(resume, &request)?;
    let reply: SuggestionReply = llm.call_json(&prompt, SUGGESTION_SYSTEM).await?;
    let suggestions = clean_suggestions(reply.suggestions, &original);
    if suggestions.is_empty() {
        return Err(AppError::Llm("model returned no usable suggestions".to_string()));
    }
    Ok(SuggestionResponse {
        kind: request.kind,
        original,
        suggestions,
    })
}
