//! Assessment report export.

pub mod export;
pub mod report;

pub use export::{
    JsonExporter, MarkdownExporter, ReportExporter, ReportFormat, default_file_name,
    exporter_for, write_report,
};
pub use report::AssessmentReport;
