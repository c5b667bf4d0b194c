use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metadata::Metadata;
use crate::verdict::{Outcome, Verdict};

/// Analysis result for one COA.
///
/// `verdicts` keeps table order. The three counters always add up to
/// `verdicts.len()` as long as verdicts are added through [`Report::push`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    /// File name the text came from, or `sample`.
    pub source: String,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the analyzed text.
    pub source_digest: String,
    pub metadata: Metadata,
    pub verdicts: Vec<Verdict>,
    pub pass_count: usize,
    pub fail_count: usize,
    pub undetermined_count: usize,
    pub warnings: Vec<String>,
}

/// Totals for one report or a batch of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub undetermined_count: usize,
}

impl Report {
    pub fn new(source: impl Into<String>, source_digest: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            source: source.into(),
            generated_at: Utc::now(),
            source_digest: source_digest.into(),
            metadata,
            verdicts: Vec::new(),
            pass_count: 0,
            fail_count: 0,
            undetermined_count: 0,
            warnings: Vec::new(),
        }
    }

    /// Append a verdict and update the tallies.
    pub fn push(&mut self, verdict: Verdict) {
        match verdict.outcome {
            Outcome::Pass => self.pass_count += 1,
            Outcome::Fail => self.fail_count += 1,
            Outcome::Undetermined => self.undetermined_count += 1,
        }
        self.verdicts.push(verdict);
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        self.fail_count > 0
    }

    pub fn failed(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|v| v.outcome == Outcome::Fail)
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            total: self.verdicts.len(),
            pass_count: self.pass_count,
            fail_count: self.fail_count,
            undetermined_count: self.undetermined_count,
        }
    }
}

impl ReportSummary {
    pub fn merge(&mut self, other: &ReportSummary) {
        self.total += other.total;
        self.pass_count += other.pass_count;
        self.fail_count += other.fail_count;
        self.undetermined_count += other.undetermined_count;
    }
}
