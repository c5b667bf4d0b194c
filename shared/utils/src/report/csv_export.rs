//! CSV export and import
//!
//! Layout, one section after another separated by a blank record:
//!
//! ```text
//! Metadata
//! Material,D14924998 NEOPRENE ...
//!
//! Results
//! Test Name,Test Method,Unit,Value,Specification,Result
//! s'TPOINT90,N200.7405,dNm,11.73,7.50 - 12.50,PASS
//!
//! Summary
//! Total Tests,8
//! ...
//! ```
//!
//! Records have different widths, so both writer and reader are flexible.

use coacheck_models::{Outcome, Report};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::error::{CoaError, CoaResult};

pub const RESULTS_HEADER: [&str; 6] = [
    "Test Name",
    "Test Method",
    "Unit",
    "Value",
    "Specification",
    "Result",
];

/// One row of the Results section as read back from CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedRow {
    pub name: String,
    pub method: String,
    pub unit: String,
    pub value: String,
    pub specification: String,
    pub result: Outcome,
}

/// Write `report` to `writer` in the sectioned layout.
pub fn write_csv<W: Write>(report: &Report, writer: W) -> CoaResult<()> {
    let mut csv = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    csv.write_record(["Metadata"])?;
    for entry in report.metadata.ordered() {
        csv.write_record([entry.key.as_str(), entry.value.as_str()])?;
    }
    csv.write_record([""])?;

    csv.write_record(["Results"])?;
    csv.write_record(RESULTS_HEADER)?;
    for verdict in &report.verdicts {
        let record = &verdict.record;
        csv.write_record([
            record.name.as_str(),
            record.method.as_deref().unwrap_or_default(),
            record.unit.as_deref().unwrap_or_default(),
            record.raw_value.as_str(),
            record.spec_raw.as_str(),
            verdict.outcome.label(),
        ])?;
    }
    csv.write_record([""])?;

    let summary = report.summary();
    csv.write_record(["Summary"])?;
    csv.write_record(["Total Tests".to_string(), summary.total.to_string()])?;
    csv.write_record(["PASS".to_string(), summary.pass_count.to_string()])?;
    csv.write_record(["FAIL".to_string(), summary.fail_count.to_string()])?;
    csv.write_record(["N/A".to_string(), summary.undetermined_count.to_string()])?;

    if report.has_failures() {
        csv.write_record([""])?;
        csv.write_record(["Failed Tests"])?;
        for verdict in report.failed() {
            let record = &verdict.record;
            csv.write_record([
                record.name.as_str(),
                record.raw_value.as_str(),
                record.spec_raw.as_str(),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}

pub fn to_csv_string(report: &Report) -> CoaResult<String> {
    let mut buffer = Vec::new();
    write_csv(report, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| CoaError::export(e.to_string()))
}

/// Read the Results section back.
pub fn read_results<R: Read>(reader: R) -> CoaResult<Vec<ExportedRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut in_results = false;

    for (idx, record) in csv.records().enumerate() {
        let record = record?;

        if !in_results {
            in_results = record.iter().eq(RESULTS_HEADER.iter().copied());
            continue;
        }

        if record.len() != RESULTS_HEADER.len() {
            break;
        }

        let result = Outcome::from_label(&record[5]).ok_or_else(|| {
            CoaError::export(format!("Row {}: unknown result '{}'", idx + 1, &record[5]))
        })?;

        rows.push(ExportedRow {
            name: record[0].to_string(),
            method: record[1].to_string(),
            unit: record[2].to_string(),
            value: record[3].to_string(),
            specification: record[4].to_string(),
            result,
        });
    }

    if !in_results {
        return Err(CoaError::export("CSV has no Results section"));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coacheck_models::{Metadata, Predicate, TestRecord, Verdict};

    fn report() -> Report {
        let mut metadata = Metadata::new();
        metadata.insert("Qty / Uom", "2,205.000 /LB");
        metadata.insert("Material", "D14924998 NEOPRENE, GNA");

        let mut report = Report::new("sample", "", metadata);
        report.push(Verdict {
            record: TestRecord::new("ML100", "53")
                .with_method("N200.5700")
                .with_spec("47 - 59"),
            predicate: Predicate::Range { low: 47.0, high: 59.0 },
            numeric_value: Some(53.0),
            outcome: Outcome::Pass,
        });
        report.push(Verdict {
            record: TestRecord::new("VOLATILE", "1.45")
                .with_method("N200.9500")
                .with_unit("%")
                .with_spec("= < 1.30"),
            predicate: Predicate::Maximum { limit: 1.3 },
            numeric_value: Some(1.45),
            outcome: Outcome::Fail,
        });
        report.push(Verdict {
            record: TestRecord::new("COUNTRY OF ORIGIN", "US"),
            predicate: Predicate::exact(""),
            numeric_value: None,
            outcome: Outcome::Undetermined,
        });
        report
    }

    #[test]
    fn test_sections_in_order() {
        let text = to_csv_string(&report()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Metadata");
        assert_eq!(lines[1], "Material,\"D14924998 NEOPRENE, GNA\"");
        assert_eq!(lines[2], "Qty / Uom,\"2,205.000 /LB\"");
        assert_eq!(lines[4], "Results");
        assert_eq!(lines[5], "Test Name,Test Method,Unit,Value,Specification,Result");
        assert_eq!(lines[6], "ML100,N200.5700,,53,47 - 59,PASS");
        assert!(text.contains("Summary\nTotal Tests,3\nPASS,1\nFAIL,1\nN/A,1\n"));
        assert!(text.contains("Failed Tests\nVOLATILE,1.45,= < 1.30\n"));
    }

    #[test]
    fn test_no_failed_section_without_failures() {
        let mut report = Report::new("sample", "", Metadata::new());
        report.push(Verdict {
            record: TestRecord::new("ML100", "53").with_spec("47 - 59"),
            predicate: Predicate::Range { low: 47.0, high: 59.0 },
            numeric_value: Some(53.0),
            outcome: Outcome::Pass,
        });

        let text = to_csv_string(&report).unwrap();
        assert!(!text.contains("Failed Tests"));
    }

    #[test]
    fn test_read_results_back() {
        let report = report();
        let text = to_csv_string(&report).unwrap();
        let rows = read_results(text.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].unit, "%");
        for (row, verdict) in rows.iter().zip(&report.verdicts) {
            assert_eq!(row.name, verdict.record.name);
            assert_eq!(row.result.passed(), verdict.passed());
        }
    }

    #[test]
    fn test_read_rejects_missing_section() {
        let err = read_results("a,b\nc,d\n".as_bytes()).unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_ERROR");
    }

    mod round_trip {
        use super::*;
        use proptest::prelude::*;

        prop_compose! {
            fn arb_verdict()(
                name in "[A-Za-z][A-Za-z0-9 ,'\"]{0,20}",
                value in "[0-9]{1,3}(\\.[0-9]{1,2})?|[A-Z]{2,6}",
                spec in "[0-9]{1,2} - [0-9]{2,3}|= < [0-9]\\.[0-9]{2}|",
                outcome in prop_oneof![Just(Outcome::Pass), Just(Outcome::Fail), Just(Outcome::Undetermined)]
            ) -> Verdict {
                Verdict {
                    record: TestRecord::new(name, value).with_spec(spec),
                    predicate: Predicate::exact(""),
                    numeric_value: None,
                    outcome,
                }
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(100))]

            /// Result column read back matches every verdict
            #[test]
            fn prop_results_survive_csv(verdicts in prop::collection::vec(arb_verdict(), 0..25)) {
                let mut report = Report::new("prop", "", Metadata::new());
                for verdict in verdicts {
                    report.push(verdict);
                }

                let text = to_csv_string(&report).unwrap();
                let rows = read_results(text.as_bytes()).unwrap();

                prop_assert_eq!(rows.len(), report.verdicts.len());
                for (row, verdict) in rows.iter().zip(&report.verdicts) {
                    prop_assert_eq!(row.result.passed(), verdict.passed());
                    prop_assert_eq!(&row.name, &verdict.record.name);
                    prop_assert_eq!(&row.specification, &verdict.record.spec_raw);
                }
            }
        }
    }
}
