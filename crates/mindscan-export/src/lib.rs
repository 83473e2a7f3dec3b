//! mindscan-export
//!
//! Screening reports: assembly from a scored result, Markdown rendering
//! through Tera, and DOCX generation.

pub mod docx;
pub mod error;
pub mod render;
pub mod report;
pub mod styles;

pub use error::ExportError;
pub use report::ScreeningReport;
