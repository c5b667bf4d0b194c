use serde::{Deserialize, Serialize};
use std::fmt;

use crate::test_record::{Predicate, TestRecord};

/// Pass/fail state of a single test. `Undetermined` is reported as `N/A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "N/A")]
    Undetermined,
}

impl Outcome {
    pub fn from_passed(passed: Option<bool>) -> Self {
        match passed {
            Some(true) => Self::Pass,
            Some(false) => Self::Fail,
            None => Self::Undetermined,
        }
    }

    pub fn passed(self) -> Option<bool> {
        match self {
            Self::Pass => Some(true),
            Self::Fail => Some(false),
            Self::Undetermined => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Undetermined => "N/A",
        }
    }

    /// Inverse of [`Outcome::label`]. Also accepts the older `UNKNOWN` spelling.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "PASS" => Some(Self::Pass),
            "FAIL" => Some(Self::Fail),
            "N/A" | "UNKNOWN" | "UNDETERMINED" => Some(Self::Undetermined),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of evaluating one [`TestRecord`] against its [`Predicate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub record: TestRecord,
    pub predicate: Predicate,
    /// Parsed measured value, when `raw_value` is numeric.
    pub numeric_value: Option<f64>,
    pub outcome: Outcome,
}

impl Verdict {
    pub fn passed(&self) -> Option<bool> {
        self.outcome.passed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Pass.to_string(), "PASS");
        assert_eq!(Outcome::Undetermined.label(), "N/A");
        assert_eq!(Outcome::from_label(" unknown "), Some(Outcome::Undetermined));
        assert_eq!(Outcome::from_label("maybe"), None);
    }

    #[test]
    fn test_outcome_serializes_as_label() {
        let json = serde_json::to_string(&Outcome::Undetermined).unwrap();
        assert_eq!(json, "\"N/A\"");
    }
}
