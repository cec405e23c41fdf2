// Document export: the completed interview rendered as a downloadable PDF.

pub mod font_metrics;
pub mod pdf;

pub use pdf::{build_summary_pdf, ExportError, SummaryDocument};
