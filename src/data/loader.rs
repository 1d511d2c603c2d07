use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;

use super::model::JobRecord;
use crate::error::ReportError;

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["target_name", "begin_date", "duration"];

/// Row shape as read from the file; `duration` stays text until validated.
#[derive(Debug, Deserialize)]
struct RawRow {
    target_name: String,
    begin_date: String,
    duration: String,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load job records from a tab-separated file with a header row.
///
/// The file is named `.csv` by convention but is always tab-delimited.
/// Columns beyond [`REQUIRED_COLUMNS`] are ignored.
pub fn load_records(path: &Path) -> Result<Vec<JobRecord>> {
    let file = File::open(path)
        .with_context(|| format!("opening input file {}", path.display()))?;
    let records = read_records(BufReader::new(file))
        .with_context(|| format!("reading {}", path.display()))?;
    debug!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse tab-separated job records from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<JobRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers().context("reading header row")?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(ReportError::MissingColumn { column }.into());
        }
    }

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.context("reading record")?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("line {line}: malformed record"))?;

        let duration = parse_duration(&raw.duration, line)?;
        records.push(JobRecord {
            target_name: raw.target_name,
            begin_date: raw.begin_date,
            duration,
        });
    }

    Ok(records)
}

/// Seconds from a duration cell. A blank cell is a missing value (`NaN`),
/// which later stages skip.
fn parse_duration(value: &str, line: u64) -> Result<f64, ReportError> {
    let value_trimmed = value.trim();
    if value_trimmed.is_empty() {
        return Ok(f64::NAN);
    }
    value_trimmed
        .parse::<f64>()
        .map_err(|_| ReportError::InvalidDuration {
            line,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_tab_separated_rows_ignoring_extra_columns() {
        let input = "job_id\ttarget_name\tbegin_date\tduration\n\
                     7\tX_CHIPSEQ\t2020-01-01 10:00:00\t3600\n\
                     8\tEXOME\t2020-01-02 00:00:00\t 90.5 \n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].target_name, "X_CHIPSEQ");
        assert_eq!(records[0].begin_date, "2020-01-01 10:00:00");
        assert_eq!(records[0].duration, 3600.0);
        assert_eq!(records[1].duration, 90.5);
    }

    #[test]
    fn header_only_file_is_empty() {
        let records = read_records("target_name\tbegin_date\tduration\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_records("target_name\tbegin_date\n".as_bytes()).unwrap_err();
        match err.downcast_ref::<ReportError>() {
            Some(ReportError::MissingColumn { column }) => assert_eq!(*column, "duration"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn comma_separated_header_is_rejected() {
        let err = read_records("target_name,begin_date,duration\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReportError>(),
            Some(ReportError::MissingColumn { .. })
        ));
    }

    #[test]
    fn non_numeric_duration_is_fatal() {
        let input = "target_name\tbegin_date\tduration\n\
                     CHIPSEQ\t2020-01-01 00:00:00\t100\n\
                     CHIPSEQ\t2020-01-02 00:00:00\tabc\n";
        let err = read_records(input.as_bytes()).unwrap_err();
        match err.downcast_ref::<ReportError>() {
            Some(ReportError::InvalidDuration { line, value }) => {
                assert_eq!(*line, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_duration_is_missing_not_fatal() {
        let input = "target_name\tbegin_date\tduration\n\
                     CHIPSEQ\t2020-01-01 00:00:00\t\n\
                     CHIPSEQ\t2020-01-02 00:00:00\tnan\n";
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].duration.is_nan());
        assert!(records[1].duration.is_nan());
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_records(Path::new("/nonexistent/dir/anls.csv")).unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().expect("io error in chain");
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }
}
