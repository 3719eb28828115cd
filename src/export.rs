//! Flat CSV export of a CLV breakdown
//!
//! The layout is consumed by existing spreadsheets, so column names, row
//! labels and decimal precision are fixed:
//!
//! ```text
//! Year,Margin ($),Repeat Prob (%),Adjusted Margin ($),Discount Factor,Present Value ($),Calculation
//! Acquisition,60.00,100,60.00,1.0000,60.00,60.00 / 1.0000
//! Year 1,60.00,90,54.00,1.1000,49.09,54.00 / 1.1000
//! ...
//! Total PV,,,,,225.32,
//! Acquisition Cost,,,,,-6.00,
//! Final CLV,,,,,219.32,
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::error::{ClvError, Result};
use crate::projection::{ClvBreakdown, YearlyBreakdownRow};

pub const EXPORT_HEADER: [&str; 7] = [
    "Year",
    "Margin ($)",
    "Repeat Prob (%)",
    "Adjusted Margin ($)",
    "Discount Factor",
    "Present Value ($)",
    "Calculation",
];

pub const TOTAL_PV_LABEL: &str = "Total PV";
pub const ACQUISITION_COST_LABEL: &str = "Acquisition Cost";
pub const FINAL_CLV_LABEL: &str = "Final CLV";

/// Column index of the value in the summary rows
const VALUE_COLUMN: usize = 5;

fn data_record(row: &YearlyBreakdownRow) -> [String; 7] {
    let adjusted = format!("{:.2}", row.adjusted_margin);
    let factor = format!("{:.4}", row.discount_factor);
    let calculation = format!("{} / {}", adjusted, factor);
    [
        row.label(),
        format!("{:.2}", row.margin),
        format!("{:.0}", row.repeat_prob),
        adjusted,
        factor,
        format!("{:.2}", row.present_value),
        calculation,
    ]
}

fn summary_record(label: &str, value: f64) -> [String; 7] {
    let mut record: [String; 7] = Default::default();
    record[0] = label.to_string();
    record[VALUE_COLUMN] = format!("{:.2}", value);
    record
}

/// Write the export table to any writer
pub fn write_export<W: Write>(writer: W, breakdown: &ClvBreakdown) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(EXPORT_HEADER)?;
    for row in &breakdown.rows {
        csv_writer.write_record(data_record(row))?;
    }

    csv_writer.write_record(summary_record(TOTAL_PV_LABEL, breakdown.total_pv))?;
    // 0.0 - cost keeps a zero cost from printing as "-0.00"
    csv_writer.write_record(summary_record(
        ACQUISITION_COST_LABEL,
        0.0 - breakdown.acquisition_cost,
    ))?;
    csv_writer.write_record(summary_record(FINAL_CLV_LABEL, breakdown.clv))?;

    csv_writer.flush()?;
    Ok(())
}

/// Render the export table as a string
pub fn export_to_string(breakdown: &ClvBreakdown) -> Result<String> {
    let mut buffer = Vec::new();
    write_export(&mut buffer, breakdown)?;
    String::from_utf8(buffer).map_err(|e| ClvError::MalformedExport {
        line: 0,
        reason: e.to_string(),
    })
}

/// Write the export table to a file
pub fn write_export_file<P: AsRef<Path>>(path: P, breakdown: &ClvBreakdown) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_export(file, breakdown)?;
    debug!("Wrote {} period rows to {}", breakdown.rows.len(), path.display());
    Ok(())
}

/// Export table read back into numbers, at the export's precision
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTable {
    pub rows: Vec<YearlyBreakdownRow>,
    pub total_pv: f64,
    /// Positive acquisition cost (the file stores it negated)
    pub acquisition_cost: f64,
    pub clv: f64,
}

fn parse_period(label: &str) -> Option<u32> {
    if label == "Acquisition" {
        return Some(0);
    }
    label.strip_prefix("Year ")?.trim().parse().ok()
}

fn parse_cell(record: &csv::StringRecord, column: usize, line: usize) -> Result<f64> {
    let raw = record.get(column).unwrap_or("").trim();
    raw.parse().map_err(|_| ClvError::MalformedExport {
        line,
        reason: format!("column {:?} holds {:?}", EXPORT_HEADER[column], raw),
    })
}

/// Read an export table produced by `write_export`
pub fn read_export<R: Read>(reader: R) -> Result<ExportedTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?;
    if headers.iter().ne(EXPORT_HEADER.iter().copied()) {
        return Err(ClvError::MalformedExport {
            line: 1,
            reason: format!("unexpected header {:?}", headers),
        });
    }

    let mut rows = Vec::new();
    let mut total_pv = None;
    let mut acquisition_cost = None;
    let mut clv = None;

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
        let label = record.get(0).unwrap_or("");

        match label {
            TOTAL_PV_LABEL => total_pv = Some(parse_cell(&record, VALUE_COLUMN, line)?),
            ACQUISITION_COST_LABEL => {
                acquisition_cost = Some(-parse_cell(&record, VALUE_COLUMN, line)?)
            }
            FINAL_CLV_LABEL => clv = Some(parse_cell(&record, VALUE_COLUMN, line)?),
            _ => {
                let period = parse_period(label).ok_or_else(|| ClvError::MalformedExport {
                    line,
                    reason: format!("unknown row label {:?}", label),
                })?;
                rows.push(YearlyBreakdownRow {
                    period,
                    margin: parse_cell(&record, 1, line)?,
                    repeat_prob: parse_cell(&record, 2, line)?,
                    adjusted_margin: parse_cell(&record, 3, line)?,
                    discount_factor: parse_cell(&record, 4, line)?,
                    present_value: parse_cell(&record, 5, line)?,
                });
            }
        }
    }

    let missing = |what: &str| ClvError::MalformedExport {
        line: 0,
        reason: format!("missing {} row", what),
    };

    Ok(ExportedTable {
        rows,
        total_pv: total_pv.ok_or_else(|| missing(TOTAL_PV_LABEL))?,
        acquisition_cost: acquisition_cost.ok_or_else(|| missing(ACQUISITION_COST_LABEL))?,
        clv: clv.ok_or_else(|| missing(FINAL_CLV_LABEL))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ClvParameters;
    use crate::projection::compute;

    #[test]
    fn test_default_export_text() {
        let text = export_to_string(&compute(&ClvParameters::default())).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Year,Margin ($),Repeat Prob (%),Adjusted Margin ($),Discount Factor,Present Value ($),Calculation"
        );
        assert_eq!(lines[1], "Acquisition,60.00,100,60.00,1.0000,60.00,60.00 / 1.0000");
        assert_eq!(lines[2], "Year 1,60.00,90,54.00,1.1000,49.09,54.00 / 1.1000");
        assert_eq!(lines[6], "Year 5,60.00,30,18.00,1.6105,11.18,18.00 / 1.6105");
        assert_eq!(lines[7], "Total PV,,,,,225.32,");
        assert_eq!(lines[8], "Acquisition Cost,,,,,-6.00,");
        assert_eq!(lines[9], "Final CLV,,,,,219.32,");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_zero_cost_is_not_negative_zero() {
        let mut params = ClvParameters::default();
        params.acquisition_cost = 0.0;
        let text = export_to_string(&compute(&params)).unwrap();
        assert!(text.contains("Acquisition Cost,,,,,0.00,"));
    }

    #[test]
    fn test_export_reads_back_within_precision() {
        let mut params = ClvParameters::default();
        params.margin = 47.319;
        params.discount_rate = 7.25;
        params.grow_horizon();
        let breakdown = compute(&params);

        let text = export_to_string(&breakdown).unwrap();
        let table = read_export(text.as_bytes()).unwrap();

        assert_eq!(table.rows.len(), breakdown.rows.len());
        for (read, original) in table.rows.iter().zip(&breakdown.rows) {
            assert_eq!(read.period, original.period);
            assert!((read.margin - original.margin).abs() <= 0.0051);
            assert!((read.repeat_prob - original.repeat_prob).abs() <= 0.51);
            assert!((read.adjusted_margin - original.adjusted_margin).abs() <= 0.0051);
            assert!((read.discount_factor - original.discount_factor).abs() <= 0.000051);
            assert!((read.present_value - original.present_value).abs() <= 0.0051);
        }
        assert!((table.total_pv - breakdown.total_pv).abs() <= 0.0051);
        assert!((table.acquisition_cost - breakdown.acquisition_cost).abs() <= 0.0051);
        assert!((table.clv - breakdown.clv).abs() <= 0.0051);
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let result = read_export("a,b,c\n1,2,3\n".as_bytes());
        assert!(matches!(result, Err(ClvError::MalformedExport { line: 1, .. })));
    }

    #[test]
    fn test_read_rejects_unknown_label() {
        let mut text = export_to_string(&compute(&ClvParameters::default())).unwrap();
        text = text.replace("Year 3,", "Month 3,");
        let result = read_export(text.as_bytes());
        assert!(matches!(result, Err(ClvError::MalformedExport { .. })));
    }

    #[test]
    fn test_read_requires_summary_rows() {
        let text = export_to_string(&compute(&ClvParameters::default())).unwrap();
        let truncated: String = text
            .lines()
            .filter(|l| !l.starts_with(FINAL_CLV_LABEL))
            .map(|l| format!("{}\n", l))
            .collect();
        assert!(read_export(truncated.as_bytes()).is_err());
    }
}
