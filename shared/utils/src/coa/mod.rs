//! COA Extraction and Evaluation Engine
//!
//! Turns the text of a Certificate of Analysis into typed metadata and test
//! records, parses each specification string into a predicate and evaluates
//! the measured values into a report.
//!
//! Pipeline: raw text → [`LineClassifier`] → {[`MetadataExtractor`],
//! [`RowParser`] or [`ColumnBlockParser`]} → [`SpecificationParser`] → [`Evaluator`] → `Report`.
//!
//! Everything here is synchronous, allocation-only work over an in-memory
//! buffer. Nothing reads or writes process-wide state.

pub mod classifier;
pub mod metadata;
pub mod row;
pub mod columns;
pub mod specification;
pub mod evaluator;
pub mod analyzer;
pub mod sample;


pub use classifier::{LineClassifier, Classify, HEADER_VOCABULARY};
pub use metadata::MetadataExtractor;
pub use row::{RowParser, RowParse, PartialRow, DEFAULT_COLUMN_COUNT};
pub use columns::{ColumnBlockParser, Column};
pub use specification::{SpecificationParser, parse_specification, parse_decimal};
pub use evaluator::{Evaluator, InvertedRangePolicy, parse_value};
pub use analyzer::CoaAnalyzer;
pub use sample::SAMPLE_COA;
