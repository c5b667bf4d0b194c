//! # Coacheck Core Domain Models
//!
//! Data model for Certificate-of-Analysis (COA) extraction and evaluation.
//! Every type is plain data with serde support so that reports can be
//! rendered, exported or returned over HTTP without conversion layers.
//!
//! ## Key Models
//!
//! - **Document**: the raw COA text as an immutable sequence of lines
//! - **Metadata**: material, batch, reference and quantity fields keyed by a canonical form
//! - **TestRecord**: one parsed table row (name, method, unit, value, specification)
//! - **Predicate**: the executable form of a specification string
//! - **Verdict**: the outcome of applying a predicate to a measured value
//! - **Report**: metadata plus the ordered verdicts and their tallies

pub mod document;
pub mod metadata;
pub mod test_record;
pub mod verdict;
pub mod report;


pub use document::*;
pub use metadata::*;
pub use test_record::*;
pub use verdict::*;
pub use report::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tallies_follow_pushed_verdicts() {
        let mut report = Report::new("sample", Document::from_text("").digest(), Metadata::new());

        report.push(Verdict {
            record: TestRecord::new("VOLATILE", "0.99").with_spec("= < 1.30"),
            predicate: Predicate::Maximum { limit: 1.30 },
            numeric_value: Some(0.99),
            outcome: Outcome::Pass,
        });
        report.push(Verdict {
            record: TestRecord::new("COUNTRY OF ORIGIN", "US"),
            predicate: Predicate::exact(""),
            numeric_value: None,
            outcome: Outcome::Undetermined,
        });

        assert_eq!(report.verdicts.len(), 2);
        assert_eq!(report.pass_count, 1);
        assert_eq!(report.fail_count, 0);
        assert_eq!(report.undetermined_count, 1);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_metadata_lookup_is_key_form_insensitive() {
        let mut metadata = Metadata::new();
        metadata.insert("Qty / Uom", "2,205.000 /LB");

        assert_eq!(metadata.get("Qty/Uom"), Some("2,205.000 /LB"));
        assert_eq!(metadata.get("qty  /  uom"), Some("2,205.000 /LB"));
        assert_eq!(metadata.entry("QTY/UOM").map(|e| e.key.as_str()), Some("Qty / Uom"));
    }
}
