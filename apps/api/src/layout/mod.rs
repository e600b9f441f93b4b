// Print layout: paper sizes, margins, and page-count estimation for resume export.

pub mod geometry;

pub use geometry::{estimate_pages, wrapped_lines, PageGeometry, PaperSize};
