//! Server-side HTML rendering of resumes, one layout per template.
//!
//! All user content goes through `escape_html`. The accent color is validated on write
//! but is escaped here as well since it lands inside a `<style>` block.

use std::fmt::Write as _;

use crate::layout::PageGeometry;
use crate::models::resume::{Resume, ResumeSections, TemplateId};
use crate::util::format::{escape_html, format_date_range, format_month, initials};

/// Full standalone HTML document. With `page` set, adds `@page` rules for printing.
pub fn render_document(resume: &Resume, page: Option<&PageGeometry>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>\n{base}{template}{print}</style>\n</head>\n<body>\n",
        title = escape_html(&resume.title),
        base = base_styles(&resume.accent_color),
        template = template_styles(resume.template),
        print = page.map(print_styles).unwrap_or_default(),
    );
    html.push_str(&render_body(resume));
    html.push_str("</body>\n</html>\n");
    html
}

/// The resume itself, without document chrome.
pub fn render_body(resume: &Resume) -> String {
    let s = &resume.sections;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "<article class=\"resume template-{}\">",
        resume.template.as_str()
    );

    match resume.template {
        TemplateId::MinimalImage => {
            out.push_str("<aside class=\"sidebar\">\n");
            out.push_str(&photo_block(s));
            out.push_str(&contact_list(s));
            out.push_str(&skills_section(s));
            out.push_str("</aside>\n<main>\n");
            out.push_str(&header_block(s, false));
            out.push_str(&summary_section(s));
            out.push_str(&experience_section(s));
            out.push_str(&projects_section(s));
            out.push_str(&education_section(s));
            out.push_str("</main>\n");
        }
        TemplateId::Modern => {
            out.push_str(&header_block(s, true));
            out.push_str(&summary_section(s));
            out.push_str(&experience_section(s));
            out.push_str(&projects_section(s));
            out.push_str(&education_section(s));
            out.push_str(&skills_section(s));
        }
        TemplateId::Classic | TemplateId::Minimal => {
            out.push_str(&header_block(s, true));
            out.push_str(&summary_section(s));
            out.push_str(&experience_section(s));
            out.push_str(&education_section(s));
            out.push_str(&projects_section(s));
            out.push_str(&skills_section(s));
        }
    }

    out.push_str("</article>\n");
    out
}

fn header_block(s: &ResumeSections, with_contacts: bool) -> String {
    let info = &s.personal_info;
    let name = if info.full_name.trim().is_empty() {
        "Your Name"
    } else {
        info.full_name.as_str()
    };
    let mut out = String::from("<header>\n");
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(name));
    if !info.profession.trim().is_empty() {
        let _ = writeln!(
            out,
            "<p class=\"profession\">{}</p>",
            escape_html(&info.profession)
        );
    }
    if with_contacts {
        let items: Vec<String> = contact_items(s)
            .into_iter()
            .map(|c| format!("<span>{}</span>", escape_html(c)))
            .collect();
        if !items.is_empty() {
            let _ = writeln!(out, "<p class=\"contacts\">{}</p>", items.join(" · "));
        }
    }
    out.push_str("</header>\n");
    out
}

fn contact_items(s: &ResumeSections) -> Vec<&str> {
    let info = &s.personal_info;
    [
        &info.email,
        &info.phone,
        &info.location,
        &info.linkedin,
        &info.website,
    ]
    .into_iter()
    .map(|v| v.trim())
    .filter(|v| !v.is_empty())
    .collect()
}

fn contact_list(s: &ResumeSections) -> String {
    let items = contact_items(s);
    if items.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"contacts\">\n");
    for item in items {
        let _ = writeln!(out, "<li>{}</li>", escape_html(item));
    }
    out.push_str("</ul>\n");
    out
}

fn photo_block(s: &ResumeSections) -> String {
    let info = &s.personal_info;
    match info.image.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
        Some(src) => format!(
            "<img class=\"photo\" src=\"{}\" alt=\"{}\">\n",
            escape_html(src),
            escape_html(&info.full_name)
        ),
        None => format!(
            "<div class=\"photo initials\">{}</div>\n",
            escape_html(&initials(&info.full_name))
        ),
    }
}

fn section(title: &str, inner: &str) -> String {
    format!("<section>\n<h2>{title}</h2>\n{inner}</section>\n")
}

fn summary_section(s: &ResumeSections) -> String {
    let summary = s.professional_summary.trim();
    if summary.is_empty() {
        return String::new();
    }
    section(
        "Professional Summary",
        &format!("<p>{}</p>\n", escape_html(summary)),
    )
}

/// Description lines starting with `-` or `•` render as bullets, others as paragraphs.
fn description_html(description: &str) -> String {
    let mut out = String::new();
    let mut in_list = false;
    for line in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let bullet = line
            .strip_prefix('-')
            .or_else(|| line.strip_prefix('•'))
            .map(str::trim);
        match bullet {
            Some(text) => {
                if !in_list {
                    out.push_str("<ul>\n");
                    in_list = true;
                }
                let _ = writeln!(out, "<li>{}</li>", escape_html(text));
            }
            None => {
                if in_list {
                    out.push_str("</ul>\n");
                    in_list = false;
                }
                let _ = writeln!(out, "<p>{}</p>", escape_html(line));
            }
        }
    }
    if in_list {
        out.push_str("</ul>\n");
    }
    out
}

fn experience_section(s: &ResumeSections) -> String {
    if s.experience.is_empty() {
        return String::new();
    }
    let mut inner = String::new();
    for item in &s.experience {
        let dates = format_date_range(&item.start_date, item.end_date.as_deref(), item.is_current);
        let _ = write!(
            inner,
            "<div class=\"entry\">\n<div class=\"entry-head\"><strong>{}</strong><span>{}</span></div>\n\
             <div class=\"entry-sub\">{}</div>\n{}</div>\n",
            escape_html(&item.position),
            escape_html(&dates),
            escape_html(&item.company),
            description_html(&item.description),
        );
    }
    section("Experience", &inner)
}

fn education_section(s: &ResumeSections) -> String {
    if s.education.is_empty() {
        return String::new();
    }
    let mut inner = String::new();
    for item in &s.education {
        let degree = match (item.degree.trim(), item.field.trim()) {
            (d, "") => d.to_string(),
            ("", f) => f.to_string(),
            (d, f) => format!("{d} in {f}"),
        };
        let date = item
            .graduation_date
            .as_deref()
            .map(format_month)
            .unwrap_or_default();
        let _ = write!(
            inner,
            "<div class=\"entry\">\n<div class=\"entry-head\"><strong>{}</strong><span>{}</span></div>\n\
             <div class=\"entry-sub\">{}</div>\n",
            escape_html(&degree),
            escape_html(&date),
            escape_html(&item.institution),
        );
        if let Some(gpa) = item.gpa.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            let _ = writeln!(inner, "<p>GPA: {}</p>", escape_html(gpa));
        }
        inner.push_str("</div>\n");
    }
    section("Education", &inner)
}

fn projects_section(s: &ResumeSections) -> String {
    if s.projects.is_empty() {
        return String::new();
    }
    let mut inner = String::new();
    for item in &s.projects {
        let _ = write!(
            inner,
            "<div class=\"entry\">\n<div class=\"entry-head\"><strong>{}</strong><span>{}</span></div>\n{}</div>\n",
            escape_html(&item.name),
            escape_html(&item.kind),
            description_html(&item.description),
        );
    }
    section("Projects", &inner)
}

fn skills_section(s: &ResumeSections) -> String {
    let skills: Vec<String> = s
        .skills
        .iter()
        .map(|sk| sk.trim())
        .filter(|sk| !sk.is_empty())
        .map(|sk| format!("<li>{}</li>", escape_html(sk)))
        .collect();
    if skills.is_empty() {
        return String::new();
    }
    section(
        "Skills",
        &format!("<ul class=\"skills\">{}</ul>\n", skills.join("")),
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Styles
// ────────────────────────────────────────────────────────────────────────────

fn base_styles(accent: &str) -> String {
    format!(
        ":root {{ --accent: {}; }}\n\
         body {{ margin: 0; font-family: 'Inter', 'Helvetica Neue', Arial, sans-serif; \
         font-size: 10.5pt; line-height: 1.4; color: #1f2937; }}\n\
         .resume {{ max-width: 794px; margin: 0 auto; padding: 36pt; box-sizing: border-box; }}\n\
         h1 {{ margin: 0; font-size: 22pt; }}\n\
         h2 {{ font-size: 12pt; color: var(--accent); margin: 14pt 0 6pt; }}\n\
         .entry {{ margin-bottom: 8pt; }}\n\
         .entry-head {{ display: flex; justify-content: space-between; }}\n\
         .entry-sub {{ color: #4b5563; }}\n\
         ul {{ margin: 4pt 0; padding-left: 14pt; }}\n\
         ul.skills {{ display: flex; flex-wrap: wrap; gap: 4pt 12pt; list-style: none; padding: 0; }}\n\
         p {{ margin: 2pt 0; }}\n",
        escape_html(accent)
    )
}

fn template_styles(template: TemplateId) -> &'static str {
    match template {
        TemplateId::Classic => {
            ".template-classic header { text-align: center; border-bottom: 2px solid var(--accent); padding-bottom: 8pt; }\n\
             .template-classic h2 { text-transform: uppercase; border-bottom: 1px solid #d1d5db; padding-bottom: 2pt; }\n"
        }
        TemplateId::Modern => {
            ".template-modern header { background: var(--accent); color: #fff; margin: -36pt -36pt 12pt; padding: 24pt 36pt; }\n\
             .template-modern .contacts { color: #f3f4f6; }\n\
             .template-modern h2 { border-left: 4px solid var(--accent); padding-left: 6pt; color: #111827; }\n"
        }
        TemplateId::Minimal => {
            ".template-minimal h1 { font-weight: 300; }\n\
             .template-minimal h2 { font-weight: 500; letter-spacing: 0.05em; }\n"
        }
        TemplateId::MinimalImage => {
            ".template-minimal-image { display: grid; grid-template-columns: 30% 1fr; gap: 18pt; }\n\
             .template-minimal-image .sidebar { border-right: 1px solid #e5e7eb; padding-right: 12pt; }\n\
             .template-minimal-image .photo { width: 96px; height: 96px; border-radius: 50%; object-fit: cover; }\n\
             .template-minimal-image .initials { display: flex; align-items: center; justify-content: center; \
             background: var(--accent); color: #fff; font-size: 28pt; }\n\
             .template-minimal-image ul.contacts { list-style: none; padding: 0; }\n"
        }
    }
}

fn print_styles(page: &PageGeometry) -> String {
    let (width_px, height_px) = page.size_px();
    format!(
        "@page {{ size: {}; margin: {}pt; }}\n\
         @media screen {{ .resume {{ width: {width_px}px; min-height: {height_px}px; \
         box-sizing: border-box; }} }}\n\
         @media print {{ .resume {{ max-width: none; padding: 0; }} \
         .template-modern header {{ margin: 0 0 12pt; }} }}\n",
        page.paper.css_name(),
        page.margin_pt
    )
}
