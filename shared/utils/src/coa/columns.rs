//! Column Blocks
//!
//! Some PDF and OCR extractions print the results table one column at a
//! time: a heading alone on its line (`Test Name`, `Unit`, ...) followed by
//! that column's entries, then the next heading. Rows are rebuilt by pairing
//! the n-th entry of every column with the n-th test name.
//!
//! Entries are only kept when they fit their column, so stray lines such as
//! page footers do not shift the pairing.

use coacheck_models::{collapse_whitespace, ClassifiedLine, LineKind, TestRecord};
use tracing::{debug, warn};

use super::metadata::is_informational_name;
use super::row::{is_method_code, looks_like_unit, PartialRow, RowParse};
use super::specification::{parse_decimal, SpecificationParser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Method,
    Unit,
    Value,
    Specification,
}

impl Column {
    /// The column a line introduces, when the whole line is a heading.
    pub fn from_heading(line: &str) -> Option<Self> {
        match collapse_whitespace(&line.to_lowercase()).trim_end_matches(':') {
            "test name" | "name" => Some(Self::Name),
            "test method" | "method" => Some(Self::Method),
            "unit" | "units" => Some(Self::Unit),
            "value" | "result" | "results" => Some(Self::Value),
            "specification" | "spec" | "limits" => Some(Self::Specification),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Blocks<'a> {
    names: Vec<(usize, &'a str)>,
    methods: Vec<&'a str>,
    units: Vec<&'a str>,
    values: Vec<&'a str>,
    specs: Vec<&'a str>,
    saw_value_heading: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnBlockParser {
    spec_parser: SpecificationParser,
}

impl ColumnBlockParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows rebuilt from column blocks, each paired with the line number of
    /// its test name. Empty unless the lines hold both a name and a value
    /// block.
    pub fn parse(&self, lines: &[ClassifiedLine<'_>]) -> Vec<(usize, RowParse)> {
        let blocks = self.collect(lines);
        if blocks.names.is_empty() || !blocks.saw_value_heading {
            return Vec::new();
        }

        if blocks.values.len() != blocks.names.len() {
            warn!(
                names = blocks.names.len(),
                values = blocks.values.len(),
                "column blocks have different lengths"
            );
        }

        blocks
            .names
            .iter()
            .enumerate()
            .map(|(i, &(number, name))| {
                let spec_raw = blocks.specs.get(i).copied().unwrap_or_default();

                let Some(raw_value) = blocks.values.get(i) else {
                    return (
                        number,
                        RowParse::Partial(PartialRow {
                            name: Some(name.to_string()),
                            raw_value: None,
                            spec_raw: spec_raw.to_string(),
                        }),
                    );
                };

                let mut record = TestRecord::new(name, *raw_value).with_spec(spec_raw);
                if let Some(method) = blocks.methods.get(i) {
                    record = record.with_method(*method);
                }
                if let Some(unit) = blocks.units.get(i) {
                    record = record.with_unit(*unit);
                }
                (number, RowParse::Success(record))
            })
            .collect()
    }

    fn collect<'a>(&self, lines: &[ClassifiedLine<'a>]) -> Blocks<'a> {
        let mut blocks = Blocks::default();
        let mut current = None;

        for line in lines {
            if matches!(line.kind, LineKind::Blank | LineKind::Metadata | LineKind::Header) {
                continue;
            }

            let entry = line.text.trim();
            if let Some(column) = Column::from_heading(entry) {
                blocks.saw_value_heading |= column == Column::Value;
                current = Some(column);
                continue;
            }

            let Some(column) = current else {
                continue;
            };

            let kept = match column {
                Column::Name => {
                    let fits = entry.starts_with(|c: char| c.is_alphanumeric() || c == '\'')
                        && !is_informational_name(entry);
                    if fits {
                        blocks.names.push((line.number, entry));
                    }
                    fits
                }
                Column::Method => push_if(&mut blocks.methods, entry, is_method_code(entry)),
                Column::Unit => push_if(&mut blocks.units, entry, looks_like_unit(entry)),
                Column::Value => push_if(&mut blocks.values, entry, parse_decimal(entry).is_some()),
                Column::Specification => {
                    push_if(&mut blocks.specs, entry, self.spec_parser.is_numeric_spec(entry))
                }
            };

            if !kept {
                debug!(line = line.number, ?column, "entry does not fit its column");
            }
        }

        blocks
    }
}

fn push_if<'a>(column: &mut Vec<&'a str>, entry: &'a str, fits: bool) -> bool {
    if fits {
        column.push(entry);
    }
    fits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coa::LineClassifier;
    use coacheck_models::Document;

    const BLOCK_LAYOUT: &str = "Batch
241226D257
Test Name
s'TPOINT90
VOLATILE
ML120
DATE OF PRODUCTION
Test Method
N200.7405
N200.9500
N200.7460
Unit
dNm
%
min.
Value
11.73
1.45
38.04
Specification
7.50 - 12.50
= < 1.30
= > 11.00
Page 1";

    fn parse(text: &str) -> Vec<(usize, RowParse)> {
        let document = Document::from_text(text);
        let lines: Vec<_> = LineClassifier::new().classify_document(&document).collect();
        ColumnBlockParser::new().parse(&lines)
    }

    fn records(text: &str) -> Vec<TestRecord> {
        parse(text)
            .into_iter()
            .map(|(_, row)| match row {
                RowParse::Success(record) => record,
                other => panic!("expected a record, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_headings() {
        assert_eq!(Column::from_heading("Test  Name"), Some(Column::Name));
        assert_eq!(Column::from_heading("TEST METHOD"), Some(Column::Method));
        assert_eq!(Column::from_heading("Value:"), Some(Column::Value));
        assert_eq!(Column::from_heading("Specification"), Some(Column::Specification));
        assert_eq!(Column::from_heading("Unit price"), None);
    }

    #[test]
    fn test_block_layout_is_zipped_into_rows() {
        let rows = records(BLOCK_LAYOUT);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "s'TPOINT90");
        assert_eq!(rows[0].method.as_deref(), Some("N200.7405"));
        assert_eq!(rows[0].unit.as_deref(), Some("dNm"));
        assert_eq!(rows[0].raw_value, "11.73");
        assert_eq!(rows[0].spec_raw, "7.50 - 12.50");
        assert_eq!(rows[1].raw_value, "1.45");
        assert_eq!(rows[1].spec_raw, "= < 1.30");
        assert_eq!(rows[2].name, "ML120");
        assert_eq!(rows[2].spec_raw, "= > 11.00");
    }

    #[test]
    fn test_row_numbers_point_at_names() {
        let numbers: Vec<usize> = parse(BLOCK_LAYOUT).iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![4, 5, 6]);
    }

    #[test]
    fn test_missing_value_is_partial() {
        let text = "Test Name\nVOLATILE\nML120\nValue\n0.99\nSpecification\n= < 1.30\n= > 11.00";
        let rows = parse(text);

        assert_eq!(rows.len(), 2);
        assert!(matches!(rows[0].1, RowParse::Success(_)));
        assert_eq!(
            rows[1].1,
            RowParse::Partial(PartialRow {
                name: Some("ML120".to_string()),
                raw_value: None,
                spec_raw: "= > 11.00".to_string(),
            })
        );
    }

    #[test]
    fn test_needs_names_and_values() {
        assert!(parse("Test Name\nVOLATILE\nSpecification\n= < 1.30").is_empty());
        assert!(parse("Value\n0.99").is_empty());
        assert!(parse("").is_empty());
    }
}
