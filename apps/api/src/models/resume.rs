use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

pub const DEFAULT_ACCENT_COLOR: &str = "#3B82F6";

/// Named visual layout applied to resume content at render/export time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateId {
    #[default]
    Classic,
    Modern,
    Minimal,
    MinimalImage,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Classic,
        TemplateId::Modern,
        TemplateId::Minimal,
        TemplateId::MinimalImage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Modern => "modern",
            TemplateId::Minimal => "minimal",
            TemplateId::MinimalImage => "minimal-image",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTemplate(pub String);

impl fmt::Display for UnknownTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown template '{}'", self.0)
    }
}

impl std::error::Error for UnknownTemplate {}

impl FromStr for TemplateId {
    type Err = UnknownTemplate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTemplate(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Section content
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub profession: String,
    pub linkedin: String,
    pub website: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceItem {
    pub company: String,
    pub position: String,
    /// `YYYY-MM` or `YYYY-MM-DD`.
    pub start_date: String,
    pub end_date: Option<String>,
    pub is_current: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectItem {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// All user-authored content of a resume, stored as one JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeSections {
    pub personal_info: PersonalInfo,
    pub professional_summary: String,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub projects: Vec<ProjectItem>,
    pub skills: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Resume records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: TemplateId,
    pub accent_color: String,
    pub public: bool,
    pub sections: ResumeSections,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dashboard listing entry; omits section content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: Uuid,
    pub title: String,
    pub template: TemplateId,
    pub accent_color: String,
    pub public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Resume> for ResumeSummary {
    fn from(r: &Resume) -> Self {
        ResumeSummary {
            id: r.id,
            title: r.title.clone(),
            template: r.template,
            accent_color: r.accent_color.clone(),
            public: r.public,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Row shape of the `resumes` table.
#[derive(Debug, Clone, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub accent_color: String,
    pub public: bool,
    pub sections: Json<ResumeSections>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ResumeRow> for Resume {
    type Error = UnknownTemplate;

    fn try_from(row: ResumeRow) -> Result<Self, Self::Error> {
        Ok(Resume {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            template: row.template.parse()?,
            accent_color: row.accent_color,
            public: row.public,
            sections: row.sections.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewResume {
    pub user_id: Uuid,
    pub title: String,
    pub template: TemplateId,
    pub accent_color: String,
    pub sections: ResumeSections,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ResumeChanges {
    pub title: Option<String>,
    pub template: Option<TemplateId>,
    pub accent_color: Option<String>,
    pub public: Option<bool>,
    pub sections: Option<ResumeSections>,
}

impl ResumeChanges {
    pub fn apply(self, resume: &mut Resume) {
        if let Some(title) = self.title {
            resume.title = title;
        }
        if let Some(template) = self.template {
            resume.template = template;
        }
        if let Some(color) = self.accent_color {
            resume.accent_color = color;
        }
        if let Some(public) = self.public {
            resume.public = public;
        }
        if let Some(sections) = self.sections {
            resume.sections = sections;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_round_trips_through_str() {
        for template in TemplateId::ALL {
            assert_eq!(template.as_str().parse::<TemplateId>(), Ok(template));
        }
    }

    #[test]
    fn test_unknown_template_rejected() {
        let err = "fancy".parse::<TemplateId>().unwrap_err();
        assert_eq!(err.to_string(), "unknown template 'fancy'");
    }

    #[test]
    fn test_template_serializes_kebab_case() {
        let json = serde_json::to_string(&TemplateId::MinimalImage).unwrap();
        assert_eq!(json, "\"minimal-image\"");
    }

    #[test]
    fn test_sections_deserialize_with_missing_fields() {
        let sections: ResumeSections =
            serde_json::from_str(r#"{"professional_summary":"Rust engineer"}"#).unwrap();
        assert_eq!(sections.professional_summary, "Rust engineer");
        assert!(sections.experience.is_empty());
        assert_eq!(sections.personal_info, PersonalInfo::default());
    }

    #[test]
    fn test_changes_leave_unset_fields_alone() {
        let now = Utc::now();
        let mut resume = Resume {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Backend".to_string(),
            template: TemplateId::Classic,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            public: false,
            sections: ResumeSections::default(),
            created_at: now,
            updated_at: now,
        };
        ResumeChanges {
            template: Some(TemplateId::Modern),
            ..Default::default()
        }
        .apply(&mut resume);
        assert_eq!(resume.template, TemplateId::Modern);
        assert_eq!(resume.title, "Backend");
        assert_eq!(resume.accent_color, DEFAULT_ACCENT_COLOR);
    }
}
