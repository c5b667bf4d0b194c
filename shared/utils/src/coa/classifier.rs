//! Line Classifier
//!
//! Tags every input line as Metadata, Header, Row, Blank or Unknown.
//! Classification is line-local apart from two bits of carried state: whether
//! a table header has been seen, and whether the previous line was a
//! split-field metadata key waiting for its value.

use coacheck_models::{ClassifiedLine, Document, LineKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::slice;
use tracing::trace;

use super::metadata::{is_split_key, key_value};

/// Header terms, longest first so `test method` is consumed before `method`.
pub const HEADER_VOCABULARY: &[&str] = &[
    "specification",
    "test method",
    "test name",
    "method",
    "result",
    "limits",
    "value",
    "unit",
    "spec",
];

static CELL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}|\t").expect("cell separator pattern is valid"));

/// Split a line into cells on runs of two or more spaces, or tabs.
pub fn split_cells(line: &str) -> Vec<&str> {
    CELL_SEPARATOR
        .split(line.trim())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Digits, comparison operators or a range dash.
pub fn resembles_specification(token: &str) -> bool {
    let mut chars = token.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if token.chars().any(|c| matches!(c, '<' | '>' | '=' | '≤' | '≥')) {
        return true;
    }

    match first {
        '-' | '–' | '+' => token.chars().count() == 1 || chars.any(|c| c.is_ascii_digit()),
        '.' => chars.any(|c| c.is_ascii_digit()),
        c => c.is_ascii_digit(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LineClassifier {
    min_header_matches: usize,
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self {
            min_header_matches: 2,
        }
    }
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_header_matches(mut self, min_header_matches: usize) -> Self {
        self.min_header_matches = min_header_matches.max(1);
        self
    }

    /// Lazily classify `lines`; the first one is numbered `first_number`.
    ///
    /// The iterator owns a copy of the classifier, so its items borrow only
    /// from `lines`.
    pub fn classify<'l>(&self, lines: &'l [String], first_number: usize) -> Classify<'l> {
        Classify {
            classifier: *self,
            lines: lines.iter(),
            next_number: first_number,
            in_table: false,
            awaiting_value: false,
        }
    }

    pub fn classify_document<'l>(&self, document: &'l Document) -> Classify<'l> {
        self.classify(document.lines(), 1)
    }

    /// Number of distinct header terms in `line`.
    pub fn header_columns(&self, line: &str) -> usize {
        let mut haystack = format!(" {} ", line.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" "));

        HEADER_VOCABULARY
            .iter()
            .filter(|term| take_term(&mut haystack, term))
            .count()
    }

    pub fn is_header(&self, line: &str) -> bool {
        self.header_columns(line) >= self.min_header_matches
    }

    /// Tabular (two or more cells) or ends in a specification-like token.
    pub fn is_row_shaped(&self, line: &str) -> bool {
        if split_cells(line).len() >= 2 {
            return true;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        tokens.len() >= 3 && tokens.last().is_some_and(|t| resembles_specification(t))
    }
}

/// Blank out the first whole-word occurrence of `term`. Returns whether found.
fn take_term(haystack: &mut String, term: &str) -> bool {
    let mut from = 0;

    while let Some(offset) = haystack[from..].find(term) {
        let start = from + offset;
        let end = start + term.len();

        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        let bounded = before.map_or(true, |c| !c.is_alphanumeric())
            && after.map_or(true, |c| !c.is_alphanumeric());

        if bounded {
            haystack.replace_range(start..end, &" ".repeat(term.len()));
            return true;
        }
        from = end;
    }

    false
}

/// Iterator returned by [`LineClassifier::classify`].
pub struct Classify<'l> {
    classifier: LineClassifier,
    lines: slice::Iter<'l, String>,
    next_number: usize,
    in_table: bool,
    awaiting_value: bool,
}

impl Classify<'_> {
    fn kind_of(&mut self, text: &str) -> LineKind {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }

        if self.classifier.is_header(trimmed) {
            self.in_table = true;
            self.awaiting_value = false;
            return LineKind::Header;
        }

        if key_value(trimmed).is_some() {
            self.awaiting_value = false;
            return LineKind::Metadata;
        }

        if is_split_key(trimmed) {
            self.awaiting_value = true;
            return LineKind::Metadata;
        }

        if self.awaiting_value {
            self.awaiting_value = false;
            return LineKind::Metadata;
        }

        if self.in_table && self.classifier.is_row_shaped(trimmed) {
            return LineKind::Row;
        }

        LineKind::Unknown
    }
}

impl<'l> Iterator for Classify<'l> {
    type Item = ClassifiedLine<'l>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        let number = self.next_number;
        self.next_number += 1;

        let kind = self.kind_of(text);
        trace!(line = number, ?kind, "classified");

        Some(ClassifiedLine {
            number,
            text: text.as_str(),
            kind,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<LineKind> {
        let document = Document::from_text(text);
        LineClassifier::new()
            .classify_document(&document)
            .map(|line| line.kind)
            .collect()
    }

    #[test]
    fn test_sample_layout() {
        let text = "Material: D14924998 NEOPRENE\n\
                    \n\
                    Batch\n\
                    241226D257\n\
                    Test Name           Test Method    Unit     Value         Specification\n\
                    s'TPOINT90          N200.7405      dNm      11.73         7.50 - 12.50\n\
                    DATE OF PRODUCTION                           20241229\n\
                    Page 1";

        assert_eq!(
            kinds(text),
            vec![
                LineKind::Metadata,
                LineKind::Blank,
                LineKind::Metadata,
                LineKind::Metadata,
                LineKind::Header,
                LineKind::Row,
                LineKind::Row,
                LineKind::Unknown,
            ]
        );
    }

    #[test]
    fn test_rows_need_a_preceding_header() {
        let text = "VOLATILE   N200.9500   %   0.99   = < 1.30";
        assert_eq!(kinds(text), vec![LineKind::Unknown]);
    }

    #[test]
    fn test_single_spaced_rows_need_spec_like_tail() {
        let text = "Test Name Test Method Unit Value Specification\n\
                    VOLATILE N200.9500 % 0.99 = < 1.30\n\
                    THE PRODUCT CONFORMS";
        assert_eq!(kinds(text), vec![LineKind::Header, LineKind::Row, LineKind::Unknown]);
    }

    #[test]
    fn test_header_columns() {
        let classifier = LineClassifier::new();
        assert_eq!(
            classifier.header_columns("Test Name           Test Method    Unit     Value         Specification"),
            5
        );
        assert_eq!(classifier.header_columns("TEST NAME  VALUE  SPEC"), 3);
        assert_eq!(classifier.header_columns("Unit price"), 1);
        assert_eq!(classifier.header_columns("Community values"), 0);
    }

    #[test]
    fn test_classified_lines_outlive_the_classifier() {
        let document = Document::from_text("Batch: A1\n\nPage 1");
        let lines: Vec<ClassifiedLine<'_>> = LineClassifier::new().classify_document(&document).collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, LineKind::Metadata);
        assert_eq!(lines[0].text, "Batch: A1");
    }

    #[test]
    fn test_line_numbers_are_offset() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let classifier = LineClassifier::new();
        let numbers: Vec<usize> = classifier.classify(&lines, 10).map(|l| l.number).collect();
        assert_eq!(numbers, vec![10, 11]);
    }

    #[test]
    fn test_resembles_specification() {
        assert!(resembles_specification("12.50"));
        assert!(resembles_specification("<"));
        assert!(resembles_specification("-"));
        assert!(resembles_specification("-59"));
        assert!(!resembles_specification("US"));
        assert!(!resembles_specification("CONFORMS"));
        assert!(!resembles_specification(""));
    }
}
