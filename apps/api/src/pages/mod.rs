//! Server-rendered HTML pages: landing, auth forms, workspace, preview.

pub mod errors;
pub mod handlers;

use axum::response::Html;

use crate::util::format::escape_html;

pub use errors::{PageError, RouteGroup};

const SITE_STYLES: &str = "\
body { margin: 0; font-family: system-ui, sans-serif; color: #1f2937; background: #f9fafb; }
header { display: flex; justify-content: space-between; align-items: center;
         padding: 16px 32px; background: #fff; border-bottom: 1px solid #e5e7eb; }
header a.brand { font-weight: 700; font-size: 20px; color: #3B82F6; text-decoration: none; }
main { max-width: 960px; margin: 0 auto; padding: 32px; }
.button { display: inline-block; padding: 10px 20px; border-radius: 8px; border: 0;
          background: #3B82F6; color: #fff; text-decoration: none; cursor: pointer; }
.button.secondary { background: #e5e7eb; color: #1f2937; }
form.auth { display: flex; flex-direction: column; gap: 12px; max-width: 360px; }
form.auth input { padding: 8px 10px; border: 1px solid #d1d5db; border-radius: 6px; }
.error { color: #b91c1c; }
.resumes.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(200px, 1fr)); gap: 16px; }
.resumes.list { display: flex; flex-direction: column; gap: 8px; }
.card { background: #fff; border: 1px solid #e5e7eb; border-radius: 8px; padding: 16px; }
.card small { color: #6b7280; }
";

/// Wraps page content in the shared site chrome.
pub fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} | rezumerai</title>\n<style>\n{SITE_STYLES}</style>\n</head>\n<body>\n\
         <header><a class=\"brand\" href=\"/\">rezumerai</a>\
         <nav><a href=\"/workspace\">Workspace</a></nav></header>\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
    ))
}
