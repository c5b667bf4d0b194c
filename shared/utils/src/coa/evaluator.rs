//! Evaluator
//!
//! Applies a [`Predicate`] to a measured value. Pure transform; the only
//! accumulation happens in the `Report` handed to [`Evaluator::evaluate_into`].

use coacheck_models::{Outcome, Predicate, Report, TestRecord, Verdict};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::specification::parse_decimal;

/// What to do with a range whose lower bound exceeds its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvertedRangePolicy {
    /// No value can satisfy `low <= v <= high`, so every value fails.
    #[default]
    Fail,
    Undetermined,
    /// Evaluate against `[high, low]`.
    Swap,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    inverted_range: InvertedRangePolicy,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inverted_range(mut self, policy: InvertedRangePolicy) -> Self {
        self.inverted_range = policy;
        self
    }

    pub fn evaluate(&self, record: TestRecord, predicate: Predicate) -> Verdict {
        let numeric_value = parse_value(&record.raw_value);

        let outcome = match &predicate {
            Predicate::Exact { expected } if expected.trim().is_empty() => Outcome::Undetermined,
            Predicate::Exact { expected } => {
                Outcome::from_passed(Some(record.raw_value.trim() == expected.trim()))
            }
            Predicate::Range { low, high } => match numeric_value {
                Some(value) => self.range_outcome(value, *low, *high),
                None => Outcome::Undetermined,
            },
            Predicate::Maximum { limit } => match numeric_value {
                Some(value) => Outcome::from_passed(Some(value <= *limit)),
                None => Outcome::Undetermined,
            },
            Predicate::Minimum { limit } => match numeric_value {
                Some(value) => Outcome::from_passed(Some(value >= *limit)),
                None => Outcome::Undetermined,
            },
        };

        if predicate.is_numeric() && numeric_value.is_none() {
            debug!(test = %record.name, value = %record.raw_value, "value is not numeric");
        }

        Verdict {
            record,
            predicate,
            numeric_value,
            outcome,
        }
    }

    /// Evaluate and append to `report`, updating its tallies.
    pub fn evaluate_into(&self, report: &mut Report, record: TestRecord, predicate: Predicate) {
        report.push(self.evaluate(record, predicate));
    }

    fn range_outcome(&self, value: f64, low: f64, high: f64) -> Outcome {
        if low <= high {
            return Outcome::from_passed(Some(low <= value && value <= high));
        }

        match self.inverted_range {
            InvertedRangePolicy::Fail => Outcome::Fail,
            InvertedRangePolicy::Undetermined => Outcome::Undetermined,
            InvertedRangePolicy::Swap => Outcome::from_passed(Some(high <= value && value <= low)),
        }
    }
}

/// Measured value as a number, ignoring thousands separators.
pub fn parse_value(raw_value: &str) -> Option<f64> {
    parse_decimal(raw_value)
}
