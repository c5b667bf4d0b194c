use serde::{Deserialize, Serialize};

/// One test row recognized in a COA results table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TestRecord {
    pub name: String,
    pub method: Option<String>,
    pub unit: Option<String>,
    /// Measured value exactly as printed; may be non-numeric.
    pub raw_value: String,
    /// Specification as printed; empty for informational rows.
    pub spec_raw: String,
}

impl TestRecord {
    pub fn new(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: None,
            unit: None,
            raw_value: raw_value.into(),
            spec_raw: String::new(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_spec(mut self, spec_raw: impl Into<String>) -> Self {
        self.spec_raw = spec_raw.into();
        self
    }

    /// Rows like `DATE OF PRODUCTION  20241229` carry no specification.
    pub fn is_informational(&self) -> bool {
        self.spec_raw.trim().is_empty()
    }
}

/// Executable form of a specification string.
///
/// Numeric bounds are inclusive. `Exact("")` stands for "no specification".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    Range { low: f64, high: f64 },
    Maximum { limit: f64 },
    Minimum { limit: f64 },
    Exact { expected: String },
}

impl Predicate {
    pub fn exact(expected: impl Into<String>) -> Self {
        Self::Exact {
            expected: expected.into(),
        }
    }

    /// True for the variants that compare against a parsed number.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Exact { .. })
    }

    /// `Exact("")`: nothing to compare against.
    pub fn is_unspecified(&self) -> bool {
        matches!(self, Self::Exact { expected } if expected.trim().is_empty())
    }

    /// A range whose lower bound exceeds its upper bound.
    pub fn is_inverted(&self) -> bool {
        matches!(self, Self::Range { low, high } if low > high)
    }

    /// Lower and upper bound, where the variant has them.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Self::Range { low, high } => (Some(*low), Some(*high)),
            Self::Maximum { limit } => (None, Some(*limit)),
            Self::Minimum { limit } => (Some(*limit), None),
            Self::Exact { .. } => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = TestRecord::new("s'TPOINT90", "11.73")
            .with_method("N200.7405")
            .with_unit("dNm")
            .with_spec("7.50 - 12.50");

        assert_eq!(record.method.as_deref(), Some("N200.7405"));
        assert_eq!(record.unit.as_deref(), Some("dNm"));
        assert!(!record.is_informational());
        assert!(TestRecord::new("DATE OF PRODUCTION", "20241229").is_informational());
    }

    #[test]
    fn test_predicate_shape_queries() {
        assert!(Predicate::exact("").is_unspecified());
        assert!(!Predicate::exact("US").is_unspecified());
        assert!(!Predicate::exact("US").is_numeric());
        assert!(Predicate::Range { low: 5.0, high: 1.0 }.is_inverted());
        assert!(!Predicate::Range { low: 1.0, high: 1.0 }.is_inverted());
        assert_eq!(Predicate::Minimum { limit: 11.0 }.bounds(), (Some(11.0), None));
    }

    #[test]
    fn test_predicate_serializes_tagged() {
        let json = serde_json::to_value(Predicate::Maximum { limit: 1.3 }).unwrap();
        assert_eq!(json["kind"], "maximum");
        assert_eq!(json["limit"], 1.3);
    }
}
