//! Batch summary table for a directory run.

use coacheck_models::{Report, ReportSummary};
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

/// One line per `(file name, report)` plus a totals line.
pub fn render_batch_summary(reports: &[(String, Report)]) -> String {
    let mut out = String::new();
    let rule = "-".repeat(100);

    let _ = writeln!(out, "\nBatch Processing Summary:");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<30} {:<20} {:<15} {:>6} {:>6} {:>6}",
        "File Name", "Material", "Batch", "Tests", "Pass", "Fail"
    );
    let _ = writeln!(out, "{rule}");

    let mut totals = ReportSummary::default();
    for (file_name, report) in reports {
        let summary = report.summary();
        totals.merge(&summary);

        let _ = writeln!(
            out,
            "{:<30} {:<20} {:<15} {:>6} {:>6} {:>6}",
            clip(file_name, 30),
            clip(report.metadata.material_id().unwrap_or(NOT_AVAILABLE), 20),
            clip(report.metadata.batch().unwrap_or(NOT_AVAILABLE), 15),
            summary.total,
            summary.pass_count,
            summary.fail_count
        );
    }

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<30} {:<20} {:<15} {:>6} {:>6} {:>6}",
        format!("TOTAL ({} files)", reports.len()),
        "",
        "",
        totals.total,
        totals.pass_count,
        totals.fail_count
    );

    out
}
