//! Specification Parser
//!
//! Converts free-form threshold strings into [`Predicate`]s.
//!
//! Forms tried in order, first match wins:
//!
//! | Text                          | Predicate            |
//! |-------------------------------|----------------------|
//! | empty / whitespace            | `Exact("")`          |
//! | `7.50 - 12.50`                | `Range(7.5, 12.5)`   |
//! | `= < 1.30`, `<= 1.30`, `< 1.30` | `Maximum(1.3)`     |
//! | `= > 11.00`, `>= 11`, `> 11`  | `Minimum(11.0)`      |
//! | `- 59`                        | `Maximum(59.0)`      |
//! | anything else                 | `Exact(text)`        |

use coacheck_models::Predicate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Decimal literal with optional sign and thousands separators.
const NUMBER: &str = r"[-+]?(?:\d[\d,]*(?:\.\d*)?|\.\d+)";

static RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^({NUMBER})\s*[-–—]\s*({NUMBER})$")).expect("range pattern is valid")
});

static MAXIMUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:=\s*<|<\s*=?|≤)\s*({NUMBER})$")).expect("maximum pattern is valid")
});

static MINIMUM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^(?:=\s*>|>\s*=?|≥)\s*({NUMBER})$")).expect("minimum pattern is valid")
});

static OPEN_LOWER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[-–—]\s+({NUMBER})$")).expect("open range pattern is valid")
});

static DECIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?$").expect("decimal pattern is valid")
});

/// Stateless parser from specification text to [`Predicate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecificationParser;

impl SpecificationParser {
    pub fn new() -> Self {
        Self
    }

    /// Never fails: unrecognized text becomes `Exact(text)`.
    pub fn parse(&self, spec_raw: &str) -> Predicate {
        let spec = spec_raw.trim();
        if spec.is_empty() {
            return Predicate::exact("");
        }

        if let Some(predicate) = self.parse_numeric(spec) {
            return predicate;
        }

        debug!(spec = %spec, "specification is not numeric, comparing literally");
        Predicate::exact(spec)
    }

    /// True when `text` is a complete range, maximum or minimum form.
    ///
    /// The row parser uses this to decide how many trailing tokens belong to
    /// the specification column.
    pub fn is_numeric_spec(&self, text: &str) -> bool {
        self.parse_numeric(text.trim()).is_some()
    }

    fn parse_numeric(&self, spec: &str) -> Option<Predicate> {
        if let Some(caps) = RANGE.captures(spec) {
            if let (Some(low), Some(high)) = (parse_decimal(&caps[1]), parse_decimal(&caps[2])) {
                return Some(Predicate::Range { low, high });
            }
        }

        if let Some(limit) = capture_decimal(&MAXIMUM, spec) {
            return Some(Predicate::Maximum { limit });
        }

        if let Some(limit) = capture_decimal(&MINIMUM, spec) {
            return Some(Predicate::Minimum { limit });
        }

        // Range printed without its lower bound. The gap after the dash
        // separates it from a negative number.
        if let Some(limit) = capture_decimal(&OPEN_LOWER, spec) {
            return Some(Predicate::Maximum { limit });
        }

        None
    }
}

fn capture_decimal(pattern: &Regex, spec: &str) -> Option<f64> {
    pattern.captures(spec).and_then(|caps| parse_decimal(&caps[1]))
}

/// Parse with [`SpecificationParser::default`].
pub fn parse_specification(spec_raw: &str) -> Predicate {
    SpecificationParser::new().parse(spec_raw)
}

/// Parse a decimal token after stripping thousands separators.
///
/// Rejects `NaN`/`inf` spellings and anything that is not a plain literal.
pub fn parse_decimal(token: &str) -> Option<f64> {
    let cleaned = token.trim().replace(',', "");
    if !DECIMAL.is_match(&cleaned) {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}
