//! COA Analyzer
//!
//! Drives one document through the whole pipeline and assembles the
//! [`Report`].

use coacheck_models::{ClassifiedLine, Document, LineKind, Metadata, Report, TestRecord};
use std::collections::HashSet;
use tracing::{debug, instrument, warn};

use super::classifier::LineClassifier;
use super::columns::ColumnBlockParser;
use super::evaluator::Evaluator;
use super::metadata::MetadataExtractor;
use super::row::{RowParse, RowParser, DEFAULT_COLUMN_COUNT};
use super::specification::SpecificationParser;
use crate::config::AnalyzerConfig;

/// Stateless between calls; safe to share across threads.
#[derive(Debug, Clone)]
pub struct CoaAnalyzer {
    config: AnalyzerConfig,
    classifier: LineClassifier,
    metadata: MetadataExtractor,
    rows: RowParser,
    blocks: ColumnBlockParser,
    specs: SpecificationParser,
    evaluator: Evaluator,
}

impl Default for CoaAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl CoaAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            classifier: LineClassifier::new().with_min_header_matches(config.min_header_matches),
            metadata: MetadataExtractor::new(),
            rows: RowParser::new(),
            blocks: ColumnBlockParser::new(),
            specs: SpecificationParser::new(),
            evaluator: Evaluator::new().with_inverted_range(config.inverted_range),
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze raw COA text. `source` names the input in the report.
    pub fn analyze(&self, text: &str, source: &str) -> Report {
        self.analyze_document(Document::from_text(text), source)
    }

    #[instrument(skip(self, document), fields(lines = document.len()))]
    pub fn analyze_document(&self, document: Document, source: &str) -> Report {
        let (document, truncated) = document.truncate(self.config.max_lines);

        let mut report = Report::new(source, document.digest(), Metadata::new());
        if truncated {
            warn!(max_lines = self.config.max_lines, "input truncated");
            report.add_warning(format!(
                "Input truncated to the first {} lines",
                self.config.max_lines
            ));
        }

        let mut seen: HashSet<TestRecord> = HashSet::new();

        for section in document.sections() {
            let lines: Vec<ClassifiedLine<'_>> = self
                .classifier
                .classify(section.lines, section.start + 1)
                .collect();

            self.metadata.extract_into(&mut report.metadata, &lines);

            if lines.iter().any(|line| line.kind == LineKind::Header) {
                self.evaluate_rows(&mut report, &lines, &mut seen);
            } else {
                self.evaluate_blocks(&mut report, &lines, &mut seen);
            }
        }

        self.metadata
            .absorb_informational(&mut report.metadata, report.verdicts.iter().map(|v| &v.record));

        debug!(
            verdicts = report.verdicts.len(),
            passed = report.pass_count,
            failed = report.fail_count,
            "analysis complete"
        );
        report
    }

    fn evaluate_rows(
        &self,
        report: &mut Report,
        lines: &[ClassifiedLine<'_>],
        seen: &mut HashSet<TestRecord>,
    ) {
        let mut columns = DEFAULT_COLUMN_COUNT;

        for line in lines {
            match line.kind {
                LineKind::Header => {
                    columns = self.classifier.header_columns(line.text).max(2);
                }
                LineKind::Row => {
                    let parsed = self.rows.parse(line.text, columns);
                    self.record_row(report, line.number, parsed, seen);
                }
                _ => {}
            }
        }
    }

    /// Sections without a header row may print the table column by column.
    fn evaluate_blocks(
        &self,
        report: &mut Report,
        lines: &[ClassifiedLine<'_>],
        seen: &mut HashSet<TestRecord>,
    ) {
        let rows = self.blocks.parse(lines);
        if !rows.is_empty() {
            debug!(rows = rows.len(), "table read from column blocks");
        }

        for (number, parsed) in rows {
            self.record_row(report, number, parsed, seen);
        }
    }

    fn record_row(
        &self,
        report: &mut Report,
        number: usize,
        parsed: RowParse,
        seen: &mut HashSet<TestRecord>,
    ) {
        match parsed {
            RowParse::Success(record) => {
                if self.config.dedupe_rows && !seen.insert(record.clone()) {
                    debug!(line = number, test = %record.name, "duplicate row skipped");
                    return;
                }
                let predicate = self.specs.parse(&record.spec_raw);
                self.evaluator.evaluate_into(report, record, predicate);
            }
            RowParse::Partial(partial) => {
                warn!(line = number, row = %partial.describe(), "incomplete row");
                report.add_warning(format!("Line {number}: incomplete row {}", partial.describe()));
            }
            RowParse::Unrecognized => {
                debug!(line = number, "row not recognized");
            }
        }
    }
}
