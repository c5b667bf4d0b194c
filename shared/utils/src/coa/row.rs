//! Row Parser
//!
//! Splits a Row-classified line into name, method, unit, value and
//! specification. Assignment runs right to left: specification first, then
//! the value, then whatever leads the line fills name, method and unit.
//!
//! Two tokenizations are supported. Cell mode splits on runs of two or more
//! spaces and is used whenever that yields at least two cells. Token mode
//! splits on single spaces for text where the layout spacing was lost.
//!
//! In cell mode the cell boundaries are trusted: a last cell that is already
//! a complete specification is taken alone, and a specification spread over
//! several cells is only assembled from fragments (operators, dashes,
//! numbers).

use coacheck_models::TestRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::split_cells;
use super::specification::{parse_decimal, SpecificationParser};

/// Column count assumed before any header has been seen.
pub const DEFAULT_COLUMN_COUNT: usize = 5;

const MAX_SPEC_CELLS: usize = 3;
const MAX_SPEC_TOKENS: usize = 4;

const KNOWN_UNITS: &[&str] = &[
    "%", "min", "min.", "s", "sec", "dnm", "mu", "mpa", "kgf", "n", "mm", "cm", "g", "kg", "mg",
    "ppm", "ppb", "phr", "g/cm3", "g/ml", "cp", "cps", "mpa.s", "°c", "c", "lb", "lbs",
];

static SPEC_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-–—=<>≤≥]|=\s*[<>]|[<>]\s*=|[-+]?(?:\d[\d,]*(?:\.\d*)?|\.\d+)(?:\s*[-–—])?)$")
        .expect("specification fragment pattern is valid")
});

static METHOD_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z]{1,6}\d+(?:[./-]\d+)+[A-Za-z]?|(?i:astm|iso|din|jis)-?[A-Za-z]?\d[\w./-]*)$")
        .expect("method code pattern is valid")
});

/// Fields recovered from a row that could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialRow {
    pub name: Option<String>,
    pub raw_value: Option<String>,
    pub spec_raw: String,
}

impl PartialRow {
    /// Human-readable label for warnings.
    pub fn describe(&self) -> String {
        match (&self.name, &self.raw_value) {
            (Some(name), _) => format!("{name} (spec {}, no value)", self.spec_raw),
            (None, Some(value)) => format!("value {value} (spec {}, no test name)", self.spec_raw),
            (None, None) => format!("spec {}", self.spec_raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowParse {
    Success(TestRecord),
    Partial(PartialRow),
    Unrecognized,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RowParser {
    spec_parser: SpecificationParser,
}

impl RowParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one row. `columns` is the column count of the governing header.
    pub fn parse(&self, line: &str, columns: usize) -> RowParse {
        let cells = split_cells(line);

        match cells.len() {
            0 => RowParse::Unrecognized,
            1 => self.parse_tokens(line),
            _ => self.parse_cells(&cells, columns),
        }
    }

    fn parse_cells(&self, cells: &[&str], columns: usize) -> RowParse {
        let (leading, spec_raw) = match self.split_cell_spec(cells) {
            Some((leading, spec)) => (leading, spec),
            None if self.has_literal_spec(cells, columns) => match cells.split_last() {
                Some((last, leading)) => (leading, last.to_string()),
                None => return RowParse::Unrecognized,
            },
            None => (cells, String::new()),
        };

        let Some((raw_value, leading)) = leading.split_last() else {
            return RowParse::Unrecognized;
        };

        if leading.is_empty() {
            return partial(raw_value, spec_raw);
        }

        let record = match leading {
            [name] => TestRecord::new(*name, *raw_value),
            [name, method] => TestRecord::new(*name, *raw_value).with_method(*method),
            [names @ .., method, unit] => TestRecord::new(names.join(" "), *raw_value)
                .with_method(*method)
                .with_unit(*unit),
            [] => return RowParse::Unrecognized,
        };

        RowParse::Success(record.with_spec(spec_raw))
    }

    fn parse_tokens(&self, line: &str) -> RowParse {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return RowParse::Unrecognized;
        }

        let (leading, spec_raw) = self
            .split_spec(&tokens, MAX_SPEC_TOKENS)
            .unwrap_or((&tokens[..], String::new()));

        let Some((raw_value, mut leading)) = leading.split_last() else {
            return RowParse::Unrecognized;
        };

        if leading.is_empty() {
            return partial(raw_value, spec_raw);
        }

        let mut unit = None;
        if let [rest @ .., last] = leading {
            if !rest.is_empty() && looks_like_unit(last) {
                unit = Some(*last);
                leading = rest;
            }
        }

        let mut method = None;
        if let [rest @ .., last] = leading {
            if !rest.is_empty() && METHOD_CODE.is_match(last) {
                method = Some(*last);
                leading = rest;
            }
        }

        let mut record = TestRecord::new(leading.join(" "), *raw_value).with_spec(spec_raw);
        if let Some(method) = method {
            record = record.with_method(method);
        }
        if let Some(unit) = unit {
            record = record.with_unit(unit);
        }

        RowParse::Success(record)
    }

    /// Numeric specification at the end of a cell row.
    fn split_cell_spec<'a, 'b>(&self, cells: &'b [&'a str]) -> Option<(&'b [&'a str], String)> {
        if let [leading @ .., last] = cells {
            if !leading.is_empty() && self.spec_parser.is_numeric_spec(last) {
                return Some((leading, last.to_string()));
            }
        }

        let (leading, spec) = self.split_spec(cells, MAX_SPEC_CELLS)?;
        let fragments = &cells[leading.len()..];
        if fragments.len() > 1 && !fragments.iter().all(|cell| SPEC_FRAGMENT.is_match(cell)) {
            debug!(spec = %spec, "specification would cross a cell boundary");
            return None;
        }

        Some((leading, spec))
    }

    /// A non-numeric last cell is a literal specification when the row is as
    /// wide as the header, or when a three-cell row reads name, value,
    /// specification (no method code in the middle).
    fn has_literal_spec(&self, cells: &[&str], columns: usize) -> bool {
        if cells.len() >= columns.max(2) {
            return true;
        }

        match cells {
            [_, middle, last] => parse_decimal(last).is_none() && !METHOD_CODE.is_match(middle),
            _ => false,
        }
    }

    /// Longest numeric specification suffix of at most `max` parts.
    ///
    /// Prefers a suffix that leaves a name and a value in front of it; falls
    /// back to one that leaves a single part.
    fn split_spec<'a, 'b>(&self, parts: &'b [&'a str], max: usize) -> Option<(&'b [&'a str], String)> {
        for keep in [2, 1] {
            let longest = parts.len().saturating_sub(keep).min(max);
            for take in (1..=longest).rev() {
                let split = parts.len() - take;
                let candidate = parts[split..].join(" ");
                if self.spec_parser.is_numeric_spec(&candidate) {
                    return Some((&parts[..split], candidate));
                }
            }
        }

        debug!(parts = parts.len(), "row has no numeric specification");
        None
    }
}

/// Laboratory method code such as `N200.7405` or `ASTM-D2084`.
pub(super) fn is_method_code(token: &str) -> bool {
    METHOD_CODE.is_match(token)
}

/// A single part in front of the specification: either a bare value or a
/// bare name.
fn partial(part: &str, spec_raw: String) -> RowParse {
    let (name, raw_value) = match parse_decimal(part) {
        Some(_) => (None, Some(part.to_string())),
        None => (Some(part.to_string()), None),
    };

    RowParse::Partial(PartialRow {
        name,
        raw_value,
        spec_raw,
    })
}

pub(super) fn looks_like_unit(token: &str) -> bool {
    let lowered = token.to_lowercase();
    if KNOWN_UNITS.contains(&lowered.as_str()) {
        return true;
    }

    if token.contains(['%', '/', '°', 'µ']) && !token.chars().any(|c| c.is_ascii_digit()) {
        return true;
    }

    token.chars().count() <= 4
        && token.chars().next().is_some_and(char::is_lowercase)
        && !token.chars().any(|c| c.is_ascii_digit())
}
