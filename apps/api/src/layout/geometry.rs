//! Printed-page geometry for resume export.
//!
//! All lengths are PostScript points (1/72 in). Browsers lay out print documents in CSS
//! pixels at 96 per inch, so conversions go through inches.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const POINTS_PER_INCH: f32 = 72.0;
pub const CSS_PX_PER_INCH: f32 = 96.0;

/// Default margin on every side, in points (0.5 in).
pub const DEFAULT_MARGIN_PT: f32 = 36.0;
/// Body text size used by all templates.
pub const BODY_FONT_SIZE_PT: f32 = 10.5;
pub const LINE_HEIGHT_FACTOR: f32 = 1.4;
/// Average glyph advance as a fraction of the font size, across the template fonts.
pub const AVERAGE_GLYPH_EM: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    Letter,
}

impl PaperSize {
    /// (width, height) in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (595.28, 841.89),
            PaperSize::Letter => (612.0, 792.0),
        }
    }

    /// Value for the CSS `@page { size: ... }` descriptor.
    pub fn css_name(&self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::Letter => "letter",
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaperSize::A4 => "a4",
            PaperSize::Letter => "letter",
        })
    }
}

impl FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PaperSize::A4),
            "letter" | "us-letter" => Ok(PaperSize::Letter),
            other => Err(format!("unknown paper size '{other}' (expected a4 or letter)")),
        }
    }
}

pub fn pt_to_px(pt: f32) -> f32 {
    pt / POINTS_PER_INCH * CSS_PX_PER_INCH
}

/// Page box plus uniform margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub paper: PaperSize,
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl PageGeometry {
    pub fn new(paper: PaperSize) -> Self {
        let (width_pt, height_pt) = paper.dimensions_pt();
        PageGeometry {
            paper,
            width_pt,
            height_pt,
            margin_pt: DEFAULT_MARGIN_PT,
        }
    }

    pub fn content_width_pt(&self) -> f32 {
        (self.width_pt - 2.0 * self.margin_pt).max(0.0)
    }

    pub fn content_height_pt(&self) -> f32 {
        (self.height_pt - 2.0 * self.margin_pt).max(0.0)
    }

    /// (width, height) of the page in CSS pixels, rounded to whole pixels.
    pub fn size_px(&self) -> (u32, u32) {
        (
            pt_to_px(self.width_pt).round() as u32,
            pt_to_px(self.height_pt).round() as u32,
        )
    }

    pub fn line_height_pt(&self) -> f32 {
        BODY_FONT_SIZE_PT * LINE_HEIGHT_FACTOR
    }

    /// Body-text lines that fit on one page.
    pub fn lines_per_page(&self) -> u32 {
        ((self.content_height_pt() / self.line_height_pt()).floor() as u32).max(1)
    }

    /// Average number of body-text characters per line.
    pub fn chars_per_line(&self) -> usize {
        ((self.content_width_pt() / (BODY_FONT_SIZE_PT * AVERAGE_GLYPH_EM)).floor() as usize)
            .max(1)
    }
}

/// Lines a paragraph occupies under greedy word wrap at `chars_per_line`.
/// Words longer than a line are split across as many lines as they need.
pub fn wrapped_lines(text: &str, chars_per_line: usize) -> u32 {
    let chars_per_line = chars_per_line.max(1);
    let mut lines = 0u32;
    let mut current = 0usize;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if current == 0 {
            lines += 1;
        } else if current + 1 + len <= chars_per_line {
            current += 1 + len;
            continue;
        } else {
            lines += 1;
        }

        if len > chars_per_line {
            let extra = (len - 1) / chars_per_line;
            lines += extra as u32;
            current = len - extra * chars_per_line;
        } else {
            current = len;
        }
    }

    lines
}

/// Pages needed for `total_lines` body lines; never less than one.
pub fn estimate_pages(total_lines: u32, geometry: &PageGeometry) -> u32 {
    let per_page = geometry.lines_per_page();
    total_lines.div_ceil(per_page).max(1)
}
