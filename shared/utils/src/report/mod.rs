//! Report Layer
//!
//! Presentation of analysis results: console tables, bar visualization,
//! batch summaries and CSV/JSON export. Renderers return strings and never
//! touch stdout or process-wide state; callers decide where output goes.

pub mod batch;
pub mod console;
pub mod csv_export;
pub mod visualize;

pub use batch::render_batch_summary;
pub use console::{render_report, RenderOptions};
pub use csv_export::{read_results, to_csv_string, write_csv, ExportedRow};
pub use visualize::{marker_position, render_bar};

use coacheck_models::Report;

use crate::error::CoaResult;

/// Pretty-printed JSON form of a report.
pub fn to_json(report: &Report) -> CoaResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
