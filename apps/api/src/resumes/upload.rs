//! Importing an existing resume from an uploaded PDF.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::NO_FABRICATION_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::resume::ResumeSections;
use crate::resumes::prompts::{SUGGESTION_SYSTEM, UPLOAD_PARSE_PROMPT};
use crate::util::format::{normalize_whitespace, truncate_chars};

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
/// Longest extracted text sent to the model or kept as a summary.
const MAX_TEXT_CHARS: usize = 20_000;
const FALLBACK_SUMMARY_CHARS: usize = 2_000;

/// Extracts plain text from PDF bytes. Parsing runs on the blocking pool.
pub async fn extract_pdf_text(bytes: Bytes) -> Result<String, AppError> {
    if !bytes.starts_with(b"%PDF-") {
        return Err(AppError::Validation(
            "Uploaded file is not a PDF".to_string(),
        ));
    }

    // pdf-extract can panic on malformed documents; a panicked task is a bad upload.
    let text = match tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&bytes)
    })
    .await
    {
        Ok(result) => result.map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?,
        Err(e) if e.is_panic() => {
            return Err(AppError::Validation("Could not read PDF".to_string()))
        }
        Err(e) => return Err(anyhow::Error::new(e).context("PDF extraction task failed").into()),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::Validation(
            "The PDF contains no extractable text".to_string(),
        ));
    }
    debug!(chars = text.chars().count(), "Extracted text from uploaded PDF");
    Ok(text)
}

/// Without a model, the whole text becomes the professional summary.
pub fn sections_from_plain_text(text: &str) -> ResumeSections {
    ResumeSections {
        professional_summary: truncate_chars(&normalize_whitespace(text), FALLBACK_SUMMARY_CHARS),
        ..Default::default()
    }
}

pub async fn parse_with_llm(llm: &LlmClient, text: &str) -> Result<ResumeSections, AppError> {
    let prompt = UPLOAD_PARSE_PROMPT
        .replace("{no_fabrication}", NO_FABRICATION_INSTRUCTION)
        .replace("{text}", &truncate_chars(text, MAX_TEXT_CHARS));
    let sections: ResumeSections = llm.call_json(&prompt, SUGGESTION_SYSTEM).await?;
    Ok(sections)
}

/// Structured sections from extracted text: model-parsed when available,
/// falling back to plain text if the model call fails.
pub async fn sections_from_text(llm: Option<&LlmClient>, text: &str) -> ResumeSections {
    match llm {
        Some(llm) => match parse_with_llm(llm, text).await {
            Ok(sections) => sections,
            Err(e) => {
                warn!("AI parsing of uploaded resume failed, keeping plain text: {e}");
                sections_from_plain_text(text)
            }
        },
        None => sections_from_plain_text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_non_pdf_is_rejected() {
        let result = extract_pdf_text(Bytes::from_static(b"hello world")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_validation_error() {
        let result = extract_pdf_text(Bytes::from_static(b"%PDF-1.7 garbage")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_plain_text_fallback_normalizes_whitespace() {
        let sections = sections_from_plain_text("Ada   Lovelace\n\nEngineer\n");
        assert_eq!(sections.professional_summary, "Ada Lovelace Engineer");
        assert!(sections.experience.is_empty());
    }

    #[tokio::test]
    async fn test_sections_from_text_without_llm() {
        let sections = sections_from_text(None, "Summary text").await;
        assert_eq!(sections.professional_summary, "Summary text");
    }
}
