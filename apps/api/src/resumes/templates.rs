//! Template catalogue, accent palette, and validation of resume metadata.

use serde::Serialize;

use crate::errors::AppError;
use crate::models::resume::TemplateId;

pub const MAX_TITLE_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub supports_photo: bool,
}

pub const TEMPLATES: [TemplateInfo; 4] = [
    TemplateInfo {
        id: TemplateId::Classic,
        name: "Classic",
        description: "Centered header with ruled section headings",
        supports_photo: false,
    },
    TemplateInfo {
        id: TemplateId::Modern,
        name: "Modern",
        description: "Bold accent-colored header band",
        supports_photo: false,
    },
    TemplateInfo {
        id: TemplateId::Minimal,
        name: "Minimal",
        description: "Understated single column, accent on headings only",
        supports_photo: false,
    },
    TemplateInfo {
        id: TemplateId::MinimalImage,
        name: "Minimal with photo",
        description: "Sidebar with photo or initials and contact details",
        supports_photo: true,
    },
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AccentColor {
    pub name: &'static str,
    pub hex: &'static str,
}

/// Colors offered by the builder's picker. Any `#RRGGBB` value is accepted.
pub const ACCENT_PALETTE: [AccentColor; 10] = [
    AccentColor { name: "Blue", hex: "#3B82F6" },
    AccentColor { name: "Indigo", hex: "#6366F1" },
    AccentColor { name: "Purple", hex: "#8B5CF6" },
    AccentColor { name: "Green", hex: "#10B981" },
    AccentColor { name: "Red", hex: "#EF4444" },
    AccentColor { name: "Orange", hex: "#F97316" },
    AccentColor { name: "Teal", hex: "#14B8A6" },
    AccentColor { name: "Pink", hex: "#EC4899" },
    AccentColor { name: "Gray", hex: "#6B7280" },
    AccentColor { name: "Black", hex: "#1F2937" },
];

pub fn template_info(id: TemplateId) -> &'static TemplateInfo {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .unwrap_or(&TEMPLATES[0])
}

pub fn parse_template(raw: &str) -> Result<TemplateId, AppError> {
    raw.trim()
        .parse()
        .map_err(|e: crate::models::resume::UnknownTemplate| AppError::Validation(e.to_string()))
}

/// Accepts `#RRGGBB` in either case; returns it upper-cased.
pub fn validate_accent_color(raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    let valid = raw.len() == 7
        && raw.starts_with('#')
        && raw[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(AppError::Validation(format!(
            "Accent color must be a hex value like #3B82F6, got '{raw}'"
        )));
    }
    Ok(raw.to_ascii_uppercase())
}

pub fn validate_title(raw: &str) -> Result<String, AppError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(AppError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "Title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_has_catalogue_entry() {
        for id in TemplateId::ALL {
            assert_eq!(template_info(id).id, id);
        }
    }

    #[test]
    fn test_palette_entries_are_valid_colors() {
        for color in ACCENT_PALETTE {
            assert_eq!(validate_accent_color(color.hex).unwrap(), color.hex);
        }
    }

    #[test]
    fn test_accent_color_validation() {
        assert_eq!(validate_accent_color("#ff00aa").unwrap(), "#FF00AA");
        assert!(validate_accent_color("ff00aa").is_err());
        assert!(validate_accent_color("#ff00a").is_err());
        assert!(validate_accent_color("#gg00aa").is_err());
        assert!(validate_accent_color("red").is_err());
    }

    #[test]
    fn test_title_validation() {
        assert_eq!(validate_title("  My Resume ").unwrap(), "My Resume");
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"t".repeat(101)).is_err());
    }

    #[test]
    fn test_parse_template_error_is_validation() {
        assert!(matches!(
            parse_template("fancy"),
            Err(AppError::Validation(_))
        ));
        assert_eq!(parse_template(" modern ").unwrap(), TemplateId::Modern);
    }
}
