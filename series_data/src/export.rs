//! CSV export of the displayed series
//!
//! Header: `Date,Value[,<secondary names>...][,Change]`. The Change column is
//! only written for change-based calculation types. Missing values are empty.

use crate::error::Result;
use crate::merge::merge_for_chart;
use crate::model::Series;
use crate::transform::CalculationType;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the primary series, its overlays and the change column as CSV.
pub fn write_csv<W: Write>(
    writer: W,
    primary: &Series,
    secondaries: &[&Series],
    calc: CalculationType,
) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["Date".to_string(), "Value".to_string()];
    header.extend(secondaries.iter().map(|s| s.name.clone()));
    if calc.is_change() {
        header.push("Change".to_string());
    }
    csv_writer.write_record(&header)?;

    let rows = merge_for_chart(primary, secondaries, calc, false);
    for row in &rows {
        let mut record = vec![row.date.format("%Y-%m-%d").to_string(), cell(row.value)];
        record.extend(
            secondaries
                .iter()
                .map(|s| cell(row.get(s.id().as_str()))),
        );
        if calc.is_change() {
            record.push(cell(row.change));
        }
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    log::debug!("Exported {} rows for '{}'", rows.len(), primary.id());
    Ok(())
}

/// Write the CSV export to a file at `path`.
pub fn write_csv_file<P: AsRef<Path>>(
    path: P,
    primary: &Series,
    secondaries: &[&Series],
    calc: CalculationType,
) -> Result<()> {
    let file = File::create(path)?;
    write_csv(file, primary, secondaries, calc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn export(primary: &Series, secondaries: &[&Series], calc: CalculationType) -> String {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, primary, secondaries, calc).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_value_export_has_no_change_column() {
        let primary = Series::from_pairs("a", "Rates", vec![(day(1), Some(5.25)), (day(2), None)]).unwrap();
        let csv = export(&primary, &[], CalculationType::Value);
        assert_eq!(csv, "Date,Value\n2024-03-01,5.25\n2024-03-02,\n");
    }

    #[test]
    fn test_secondary_and_change_columns() {
        let primary =
            Series::from_pairs("a", "Rates", vec![(day(1), Some(2.0)), (day(2), Some(3.0))]).unwrap();
        let overlay = Series::from_pairs("b", "Jobs", vec![(day(2), Some(150.0))]).unwrap();

        let csv = export(&primary, &[&overlay], CalculationType::PeriodToPeriod);
        assert_eq!(
            csv,
            "Date,Value,Jobs,Change\n2024-03-01,2,,0\n2024-03-02,3,150,1\n"
        );
    }
}
