//! Loading trace logs from disk.
//!
//! Handles plain and gzip-compressed logs, drops blank or markup-only
//! lines and the producer's header line, and reports missing or empty
//! logs as diagnostics.

use super::event::{decode_line, RawEvent};
use crate::utils::config::strip_markup;
use crate::utils::error::TraceError;
use flate2::read::GzDecoder;
use log::{debug, trace};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decoded contents of one trace log
#[derive(Debug, Clone, Default)]
pub struct DecodedTrace {
    pub events: Vec<RawEvent>,

    /// Lines that were not events (malformed, footer, ...)
    pub skipped_lines: usize,
}

/// Read the usable lines of a trace log
///
/// **Public** - main entry point for trace loading
///
/// # Errors
/// * `TraceError::SourceUnavailable` - no file at `path`
/// * `TraceError::SourceEmpty` - nothing left after stripping blank lines and the header
/// * `TraceError::Io` - the file exists but cannot be read
pub fn read_trace_lines(path: impl AsRef<Path>) -> Result<Vec<String>, TraceError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(TraceError::SourceUnavailable(path.to_path_buf()));
    }

    debug!("Reading trace log: {}", path.display());
    let content = read_to_string_lossy(path)?;

    let mut lines: Vec<String> = content
        .lines()
        .filter(|line| !strip_markup(line).trim().is_empty())
        .map(str::to_string)
        .collect();

    // Producer header ("Version: ...") precedes the first event
    if lines.first().is_some_and(|first| decode_line(first).is_none()) {
        let header = lines.remove(0);
        trace!("Dropping trace header: {}", header);
    }

    if lines.is_empty() {
        return Err(TraceError::SourceEmpty(path.to_path_buf()));
    }

    debug!("Trace log has {} content lines", lines.len());
    Ok(lines)
}

/// Decode every line, skipping the ones that are not events
pub fn decode_lines<S: AsRef<str>>(lines: &[S]) -> DecodedTrace {
    let mut decoded = DecodedTrace::default();

    for (index, line) in lines.iter().enumerate() {
        match decode_line(line.as_ref()) {
            Some(event) => decoded.events.push(event),
            None => {
                trace!("Skipping malformed trace line {}", index + 1);
                decoded.skipped_lines += 1;
            }
        }
    }

    debug!(
        "Decoded {} events ({} lines skipped)",
        decoded.events.len(),
        decoded.skipped_lines
    );
    decoded
}

/// Read a whole file, decompressing `.gz` files
///
/// **Private** - internal helper for read_trace_lines
fn read_to_string_lossy(path: &Path) -> Result<String, TraceError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let is_gzip = path
        .file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|name| name.ends_with(".gz"));

    let mut bytes = Vec::new();
    if is_gzip {
        GzDecoder::new(reader).read_to_end(&mut bytes)?;
    } else {
        let mut reader = reader;
        reader.read_to_end(&mut bytes)?;
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_trace_lines(dir.path().join("nope.xt")).unwrap_err();
        assert!(matches!(err, TraceError::SourceUnavailable(_)));
        assert!(err.is_diagnostic());
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Version: 3.1.0").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "   ").unwrap();

        let err = read_trace_lines(file.path()).unwrap_err();
        assert!(matches!(err, TraceError::SourceEmpty(_)));
    }

    #[test]
    fn test_header_is_dropped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Version: 3.1.0").unwrap();
        writeln!(file, "0\t1\t0\t0.0\t1000\tmain\t1\t\t/app/index.php\t1\t0").unwrap();
        writeln!(file, "0\t1\t1\t0.5\t1200").unwrap();

        let lines = read_trace_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 2);

        let decoded = decode_lines(&lines);
        assert_eq!(decoded.events.len(), 2);
        assert_eq!(decoded.skipped_lines, 0);
    }

    #[test]
    fn test_leading_event_is_kept() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0\t1\t0\t0.0\t1000\tmain\t1\t\t/app/index.php\t1\t0").unwrap();
        writeln!(file, "0\t1\t1\t0.5\t1200").unwrap();

        let lines = read_trace_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("main"));
    }

    #[test]
    fn test_decode_lines_counts_skipped() {
        let lines = vec!["TRACE START", "0\t1\t1\t0.5\t1200", "short\tline"];
        let decoded = decode_lines(&lines);
        assert_eq!(decoded.events.len(), 1);
        assert_eq!(decoded.skipped_lines, 2);
    }
}
