//! Console Renderer

use coacheck_models::{Outcome, Report};
use colored::Colorize;
use std::fmt::Write;

use super::visualize::render_bar;
use crate::config::OutputConfig;

const RULE_WIDTH: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
    pub visualize: bool,
    pub bar_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&OutputConfig::default())
    }
}

impl From<&OutputConfig> for RenderOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            color: config.color,
            visualize: config.visualize,
            bar_width: config.bar_width,
        }
    }
}

fn outcome_label(outcome: Outcome, color: bool) -> String {
    let padded = format!("{:<10}", outcome.label());
    if !color {
        return padded;
    }

    match outcome {
        Outcome::Pass => padded.green().to_string(),
        Outcome::Fail => padded.red().to_string(),
        Outcome::Undetermined => padded.yellow().to_string(),
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}:");
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
}

/// Full text report for one analysis.
pub fn render_report(report: &Report, options: &RenderOptions) -> String {
    let mut out = String::new();

    heading(&mut out, "COA Metadata");
    for entry in report.metadata.ordered() {
        let _ = writeln!(out, "{}: {}", entry.key, entry.value);
    }

    heading(&mut out, "COA Analysis Results");
    let _ = writeln!(
        out,
        "{:<20} {:<10} {:<20} {:<10}",
        "Test Name", "Value", "Specification", "Result"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    for verdict in &report.verdicts {
        let record = &verdict.record;
        let _ = writeln!(
            out,
            "{:<20} {:<10} {:<20} {}",
            record.name,
            record.raw_value,
            record.spec_raw,
            outcome_label(verdict.outcome, options.color).trim_end()
        );
    }

    if options.visualize {
        heading(&mut out, "Result Visualization");
        for verdict in &report.verdicts {
            let _ = writeln!(out, "{}", render_bar(verdict, options.bar_width));
        }
    }

    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "Total Tests: {}", report.verdicts.len());
    let _ = writeln!(out, "PASS: {}", report.pass_count);
    let _ = writeln!(out, "FAIL: {}", report.fail_count);
    let _ = writeln!(out, "N/A: {}", report.undetermined_count);

    if report.has_failures() {
        let _ = writeln!(out, "\nFailed Tests:");
        for verdict in report.failed() {
            let _ = writeln!(
                out,
                "- {}: {} (Spec: {})",
                verdict.record.name, verdict.record.raw_value, verdict.record.spec_raw
            );
        }
    }

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for warning in &report.warnings {
            let _ = writeln!(out, "- {warning}");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coacheck_models::{Metadata, Predicate, TestRecord, Verdict};

    fn plain() -> RenderOptions {
        RenderOptions {
            color: false,
            visualize: false,
            bar_width: 20,
        }
    }

    fn report() -> Report {
        let mut metadata = Metadata::new();
        metadata.insert("Batch", "241226D257");
        metadata.insert("Material", "D14924998 NEOPRENE");

        let mut report = Report::new("sample", "", metadata);
        report.push(Verdict {
            record: TestRecord::new("ML100", "53").with_spec("47 - 59"),
            predicate: Predicate::Range { low: 47.0, high: 59.0 },
            numeric_value: Some(53.0),
            outcome: Outcome::Pass,
        });
        report.push(Verdict {
            record: TestRecord::new("VOLATILE", "1.45").with_spec("= < 1.30"),
            predicate: Predicate::Maximum { limit: 1.3 },
            numeric_value: Some(1.45),
            outcome: Outcome::Fail,
        });
        report
    }

    #[test]
    fn test_plain_report_sections() {
        let text = render_report(&report(), &plain());

        assert!(text.contains("COA Metadata:"));
        assert!(text.contains("COA Analysis Results:"));
        assert!(text.contains("ML100                53         47 - 59              PASS\n"));
        assert!(text.contains("Total Tests: 2"));
        assert!(text.contains("N/A: 0"));
        assert!(text.contains("- VOLATILE: 1.45 (Spec: = < 1.30)"));
        assert!(!text.contains("Result Visualization"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_metadata_in_display_order() {
        let text = render_report(&report(), &plain());
        let material = text.find("Material:").unwrap();
        let batch = text.find("Batch:").unwrap();
        assert!(material < batch);
    }

    #[test]
    fn test_visualization_section() {
        let options = RenderOptions {
            visualize: true,
            ..plain()
        };
        let text = render_report(&report(), &options);
        assert!(text.contains("Result Visualization:"));
        assert!(text.contains("] ✓"));
        assert!(text.contains("] ✗"));
    }

    #[test]
    fn test_warnings_listed() {
        let mut report = report();
        report.add_warning("Input truncated to the first 10 lines");
        let text = render_report(&report, &plain());
        assert!(text.contains("Warnings:\n- Input truncated"));
    }
}
