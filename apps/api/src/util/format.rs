//! String and date formatting helpers shared by templates, exports and pages.

use chrono::NaiveDate;

/// Escapes text for inclusion in HTML element content or quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Lower-case ASCII slug: alphanumerics kept, every other run collapsed to a single `-`.
/// Returns `"resume"` when nothing usable remains.
pub fn slugify(s: &str) -> String {
    let mut slug = String::with_capacity(s.len());
    let mut pending_dash = false;
    for c in s.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "resume".to_string()
    } else {
        slug
    }
}

/// Truncates to at most `max_chars` characters, appending `…` when shortened.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Up to two upper-case initials from a full name.
pub fn initials(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

/// Collapses runs of whitespace (including newlines) into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses `YYYY-MM` or `YYYY-MM-DD`.
pub fn parse_month(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d"))
        .ok()
}

/// `2023-04` → `Apr 2023`. Unparseable input is returned unchanged.
pub fn format_month(s: &str) -> String {
    match parse_month(s) {
        Some(date) => date.format("%b %Y").to_string(),
        None => s.trim().to_string(),
    }
}

/// `Jan 2020 - Mar 2022`, `Jan 2020 - Present`, or just the start when there is no end.
pub fn format_date_range(start: &str, end: Option<&str>, is_current: bool) -> String {
    let start = format_month(start);
    let end = if is_current {
        Some("Present".to_string())
    } else {
        end.map(str::trim)
            .filter(|e| !e.is_empty())
            .map(format_month)
    };
    match (start.is_empty(), end) {
        (true, Some(end)) => end,
        (false, Some(end)) => format!("{start} - {end}"),
        (_, None) => start,
    }
}
