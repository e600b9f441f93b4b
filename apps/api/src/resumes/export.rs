//! Print-ready export of a resume and its page-count estimate.

use crate::layout::{estimate_pages, wrapped_lines, PageGeometry, PaperSize};
use crate::models::resume::{Resume, ResumeSections};
use crate::resumes::render::render_document;
use crate::util::format::slugify;

/// Lines charged for the name/contact header.
const HEADER_LINES: u32 = 4;
/// Heading plus spacing above it.
const SECTION_HEADING_LINES: u32 = 2;
/// Title line and sub-line of an experience/education/project entry.
const ENTRY_HEAD_LINES: u32 = 2;
const SKILLS_PER_LINE: usize = 6;

pub struct ExportedDocument {
    pub filename: String,
    pub html: String,
    pub estimated_pages: u32,
}

/// Approximate printed body lines for a resume on the given page.
pub fn estimate_lines(sections: &ResumeSections, geometry: &PageGeometry) -> u32 {
    let cpl = geometry.chars_per_line();
    let text_lines = |text: &str| -> u32 { text.lines().map(|l| wrapped_lines(l, cpl)).sum() };

    let mut lines = HEADER_LINES;

    if !sections.professional_summary.trim().is_empty() {
        lines += SECTION_HEADING_LINES + text_lines(&sections.professional_summary);
    }
    if !sections.experience.is_empty() {
        lines += SECTION_HEADING_LINES;
        for item in &sections.experience {
            lines += ENTRY_HEAD_LINES + text_lines(&item.description);
        }
    }
    if !sections.education.is_empty() {
        lines += SECTION_HEADING_LINES;
        for item in &sections.education {
            lines += ENTRY_HEAD_LINES + u32::from(item.gpa.is_some());
        }
    }
    if !sections.projects.is_empty() {
        lines += SECTION_HEADING_LINES;
        for item in &sections.projects {
            lines += 1 + text_lines(&item.description);
        }
    }
    let skills = sections.skills.iter().filter(|s| !s.trim().is_empty()).count();
    if skills > 0 {
        lines += SECTION_HEADING_LINES + skills.div_ceil(SKILLS_PER_LINE) as u32;
    }

    lines
}

pub fn export_resume(resume: &Resume, paper: PaperSize) -> ExportedDocument {
    let geometry = PageGeometry::new(paper);
    let estimated_pages = estimate_pages(estimate_lines(&resume.sections, &geometry), &geometry);
    ExportedDocument {
        filename: format!("{}.html", slugify(&resume.title)),
        html: render_document(resume, Some(&geometry)),
        estimated_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{ExperienceItem, TemplateId, DEFAULT_ACCENT_COLOR};
    use chrono::Utc;
    use uuid::Uuid;

    fn resume(sections: ResumeSections) -> Resume {
        let now = Utc::now();
        Resume {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Senior Rust Engineer".to_string(),
            template: TemplateId::Classic,
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            public: false,
            sections,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_empty_resume_is_header_only() {
        let geometry = PageGeometry::new(PaperSize::A4);
        assert_eq!(estimate_lines(&ResumeSections::default(), &geometry), HEADER_LINES);
    }

    #[test]
    fn test_skills_pack_several_per_line() {
        let geometry = PageGeometry::new(PaperSize::A4);
        let sections = ResumeSections {
            skills: (0..7).map(|i| format!("skill{i}")).collect(),
            ..Default::default()
        };
        assert_eq!(
            estimate_lines(&sections, &geometry),
            HEADER_LINES + SECTION_HEADING_LINES + 2
        );
    }

    #[test]
    fn test_export_single_page_resume() {
        let doc = export_resume(&resume(ResumeSections::default()), PaperSize::A4);
        assert_eq!(doc.filename, "senior-rust-engineer.html");
        assert_eq!(doc.estimated_pages, 1);
        assert!(doc.html.contains("size: A4"));
    }

    #[test]
    fn test_long_resume_spills_to_second_page() {
        let long_description = (0..80)
            .map(|i| format!("- Delivered milestone number {i} for the platform team"))
            .collect::<Vec<_>>()
            .join("\n");
        let sections = ResumeSections {
            experience: vec![ExperienceItem {
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                start_date: "2019-01".to_string(),
                description: long_description,
                ..Default::default()
            }],
            ..Default::default()
        };
        let doc = export_resume(&resume(sections), PaperSize::Letter);
        assert!(doc.estimated_pages >= 2);
    }
}
