//! JSON report output writer.
//!
//! Writes a page of call records as a versioned JSON document.

use super::validate_path;
use crate::parser::schema::{CallRecord, TraceReport};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Assemble a report for one page of records
pub fn to_report(
    trace_file: &Path,
    current_route: &str,
    page: i64,
    page_size: i64,
    total_records: usize,
    records: Vec<CallRecord>,
) -> TraceReport {
    use chrono::Utc;

    TraceReport {
        version: SCHEMA_VERSION.to_string(),
        trace_file: trace_file.display().to_string(),
        current_route: current_route.to_string(),
        page: page.unsigned_abs(),
        page_size: page_size.unsigned_abs(),
        total_records,
        records,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_report(report: &TraceReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(OutputError::SerializationFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        std::fs::metadata(output_path).map(|m| m.len()).unwrap_or(0)
    );

    Ok(())
}

/// Read a report from a JSON file
///
/// # Errors
/// * `OutputError::ReadFailed` - File read error
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<TraceReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let report: TraceReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} records",
        report.version,
        report.records.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::record;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_and_read_report() {
        let report = to_report(
            Path::new("/tmp/function-trace.xt"),
            "/home",
            1,
            10,
            1,
            vec![record(1, "main()")],
        );
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded.version, SCHEMA_VERSION);
        assert_eq!(loaded.current_route, "/home");
        assert_eq!(loaded.records, report.records);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        let report = to_report(Path::new("t.xt"), "", 1, 10, 0, Vec::new());
        write_report(&report, &nested_path).unwrap();

        assert!(nested_path.exists());
    }
}
