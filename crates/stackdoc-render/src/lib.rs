//! Report rendering for collected host bundles.
//!
//! Markdown for people, JSON for tooling. `FileReportRenderer` owns output
//! naming, backup rotation of the previous report, and atomic writes.

pub mod json_report;
pub mod labels;
pub mod markdown;
pub mod output;
pub mod renderer;

pub use json_report::render_json;
pub use markdown::render_markdown;
pub use output::{output_file_name, sanitize_host_name, OutputFormat};
pub use renderer::{FileRendererConfig, FileReportRenderer, ReportRenderer};

/// Report header fields shared by the renderers.
#[derive(Debug, Clone, Copy)]
pub struct ReportHeader<'a> {
    pub host_name: &'a str,
    pub portainer_url: &'a str,
    pub generated_at_display: &'a str,
}
