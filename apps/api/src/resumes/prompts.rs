// Prompts for AI-assisted resume content.
// All LLM calls go through llm_client; these are just the texts.

pub const SUGGESTION_SYSTEM: &str = "You are an expert resume writer. \
    You MUST respond with valid JSON only, with no text outside the JSON object.";

/// Placeholders: {profession}, {no_fabrication}, {text}
pub const SUMMARY_SUGGESTION_PROMPT: &str = r#"Rewrite the professional summary below for a resume.
Target role: {profession}

Produce exactly 3 alternative versions. Each version is 2-4 sentences, written in first person
without pronouns ("Backend engineer with..."), ATS-friendly, and specific.

{no_fabrication}

Summary:
"""
{text}
"""

Respond with JSON: {"suggestions": ["...", "...", "..."]}"#;

/// Placeholders: {position}, {company}, {no_fabrication}, {text}
pub const EXPERIENCE_SUGGESTION_PROMPT: &str = r#"Improve the job description below for a resume.
Position: {position}
Company: {company}

Produce exactly 3 alternative versions. Each version is a set of 3-5 bullet lines, each line
starting with "- " and a strong action verb, separated by newlines within the string.

{no_fabrication}

Description:
"""
{text}
"""

Respond with JSON: {"suggestions": ["...", "...", "..."]}"#;

/// Placeholders: {no_fabrication}, {text}
pub const UPLOAD_PARSE_PROMPT: &str = r#"Extract structured resume data from the text below, which was
extracted from a PDF and may have broken line wrapping.

{no_fabrication}

Resume text:
"""
{text}
"""

Respond with JSON matching exactly this shape (use empty strings/arrays for missing data,
dates as "YYYY-MM"):
{
  "personal_info": {"full_name": "", "email": "", "phone": "", "location": "",
                    "profession": "", "linkedin": "", "website": ""},
  "professional_summary": "",
  "experience": [{"company": "", "position": "", "start_date": "", "end_date": null,
                  "is_current": false, "description": ""}],
  "education": [{"institution": "", "degree": "", "field": "", "graduation_date": null,
                 "gpa": null}],
  "projects": [{"name": "", "type": "", "description": ""}],
  "skills": [""]
}"#;
