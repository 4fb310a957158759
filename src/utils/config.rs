//! Configuration and constants for the CLI.

use std::path::PathBuf;

/// Current JSON report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// A trace line needs at least depth, id, kind, time and memory
pub const MIN_EVENT_FIELDS: usize = 5;

/// Default file stem of the trace log and its CSV table
pub const TRACE_FILE_STEM: &str = "function-trace";

/// File stem of the summarized CSV table
pub const SUMMARY_FILE_STEM: &str = "function-trace-summarize";

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Environment flag consulted when env-gated tracing is requested
pub const ENABLE_TRACE_ENV: &str = "ENABLE_FUNCTION_TRACE";

/// Separator every path-bearing label is normalized to
pub const CANONICAL_SEPARATOR: char = '/';

/// Functions whose informative target is their first argument (the loaded file)
pub const INCLUDE_FUNCTIONS: &[&str] = &["include", "include_once", "require", "require_once"];

/// Kinds of files living in the trace directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFileType {
    /// Machine-readable trace log
    Trace,
    /// HTML trace log
    Html,
    /// Tabular store
    Csv,
}

impl TraceFileType {
    pub fn extension(self) -> &'static str {
        match self {
            TraceFileType::Trace => "xt",
            TraceFileType::Html => "html",
            TraceFileType::Csv => "csv",
        }
    }

    /// Parse a file type name, falling back to the trace log type
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "html" => TraceFileType::Html,
            "csv" => TraceFileType::Csv,
            _ => TraceFileType::Trace,
        }
    }
}

/// Resolves the files a run reads from and writes to
#[derive(Debug, Clone)]
pub struct TracePaths {
    pub trace_dir: PathBuf,
}

impl TracePaths {
    pub fn new(trace_dir: impl Into<PathBuf>) -> Self {
        Self {
            trace_dir: trace_dir.into(),
        }
    }

    /// Build `<dir>/<stem>.<ext>` with an optional `.gz` suffix
    ///
    /// An empty stem (after trimming and stripping markup) falls back to
    /// the default trace stem.
    pub fn file(&self, stem: &str, file_type: TraceFileType, gzipped: bool) -> PathBuf {
        let stem = strip_markup(stem);
        let stem = stem.trim();
        let stem = if stem.is_empty() { TRACE_FILE_STEM } else { stem };

        let mut name = format!("{}.{}", stem, file_type.extension());
        if gzipped {
            name.push_str(".gz");
        }
        self.trace_dir.join(name)
    }

    /// Trace log, preferring the compressed file when it exists
    pub fn trace_log(&self) -> PathBuf {
        let gz = self.file(TRACE_FILE_STEM, TraceFileType::Trace, true);
        if gz.exists() {
            gz
        } else {
            self.file(TRACE_FILE_STEM, TraceFileType::Trace, false)
        }
    }

    pub fn records_table(&self) -> PathBuf {
        self.file(TRACE_FILE_STEM, TraceFileType::Csv, false)
    }

    pub fn summary_table(&self) -> PathBuf {
        self.file(SUMMARY_FILE_STEM, TraceFileType::Csv, false)
    }
}

/// Check whether tracing output is enabled
///
/// Without `check_env` tracing is always on. With it, the
/// `ENABLE_FUNCTION_TRACE` variable must be set to something other than
/// an empty string or `0`.
pub fn tracing_enabled(check_env: bool) -> bool {
    if !check_env {
        return true;
    }
    flag_is_set(std::env::var(ENABLE_TRACE_ENV).ok().as_deref())
}

fn flag_is_set(value: Option<&str>) -> bool {
    match value {
        Some(v) => {
            let v = v.trim();
            !v.is_empty() && v != "0"
        }
        None => false,
    }
}

/// Path component of a request URI, used as the current route label
///
/// `https://host/a/b?x=1#top` and `/a/b?x=1` both give `/a/b`.
pub fn request_path(uri: &str) -> String {
    let uri = uri.trim();
    let without_fragment = uri.split('#').next().unwrap_or("");
    let without_query = without_fragment.split('?').next().unwrap_or("");

    match without_query.split_once("://") {
        Some((_, rest)) => match rest.find('/') {
            Some(idx) => rest[idx..].to_string(),
            None => String::new(),
        },
        None => without_query.to_string(),
    }
}

/// Remove `<...>` markup from a string
pub fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_paths_resolution() {
        let paths = TracePaths::new("/tmp/traces");
        assert_eq!(
            paths.records_table(),
            PathBuf::from("/tmp/traces/function-trace.csv")
        );
        assert_eq!(
            paths.summary_table(),
            PathBuf::from("/tmp/traces/function-trace-summarize.csv")
        );
        assert_eq!(
            paths.file("", TraceFileType::Trace, true),
            PathBuf::from("/tmp/traces/function-trace.xt.gz")
        );
        assert_eq!(
            paths.file("<b>custom</b>", TraceFileType::from_name("bogus"), false),
            PathBuf::from("/tmp/traces/custom.xt")
        );
    }

    #[test]
    fn test_flag_is_set() {
        assert!(!flag_is_set(None));
        assert!(!flag_is_set(Some("")));
        assert!(!flag_is_set(Some("0")));
        assert!(flag_is_set(Some("1")));
        assert!(flag_is_set(Some("true")));
    }

    #[test]
    fn test_tracing_enabled_without_check() {
        assert!(tracing_enabled(false));
    }

    #[test]
    fn test_request_path() {
        assert_eq!(request_path("/users/42?tab=1"), "/users/42");
        assert_eq!(request_path("https://example.com/a/b#frag"), "/a/b");
        assert_eq!(request_path("https://example.com"), "");
        assert_eq!(request_path(""), "");
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("<tr><td>x</td></tr>"), "x");
        assert_eq!(strip_markup("plain"), "plain");
    }
}
