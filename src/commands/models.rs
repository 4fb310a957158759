use crate::parser::schema::{CallRecord, SummaryRecord};
use crate::utils::config::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use std::path::PathBuf;

/// Which rows of an accumulated table feed the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryScope {
    /// Rows after the last blank separator
    #[default]
    LatestRun,
    /// Every run in the table
    AllRuns,
}

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Directory holding the trace log and the CSV tables
    pub trace_dir: PathBuf,

    /// Explicit trace log, overriding the one resolved in `trace_dir`
    pub trace_file: Option<PathBuf>,

    /// Project root stripped from labels
    pub root_path: String,

    /// Substring a call target must contain; empty keeps everything
    pub filter_term: String,

    pub page: i64,

    pub page_size: i64,

    /// Keep one record per function label
    pub unique: bool,

    /// Most called functions first
    pub sort_by_count: bool,

    /// Also write the summary table
    pub summarize: bool,

    pub summary_scope: SummaryScope,

    /// Request path stamped onto every record
    pub current_route: String,

    /// Only run when the enable flag is set in the environment
    pub check_env: bool,

    /// Output path for a JSON report of the returned page (optional)
    pub output_json: Option<PathBuf>,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            trace_dir: PathBuf::from("."),
            trace_file: None,
            root_path: String::new(),
            filter_term: String::new(),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            unique: true,
            sort_by_count: false,
            summarize: false,
            summary_scope: SummaryScope::default(),
            current_route: String::new(),
            check_env: false,
            output_json: None,
        }
    }
}

/// Arguments for the summarize command
#[derive(Debug, Clone)]
pub struct SummarizeArgs {
    /// Call record table to read
    pub table: PathBuf,

    /// Summary table to (re)write
    pub output: PathBuf,

    pub page: i64,

    pub page_size: i64,

    pub sort_by_count: bool,

    pub scope: SummaryScope,
}

impl Default for SummarizeArgs {
    fn default() -> Self {
        Self {
            table: PathBuf::from("function-trace.csv"),
            output: PathBuf::from("function-trace-summarize.csv"),
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            sort_by_count: false,
            scope: SummaryScope::default(),
        }
    }
}

/// Page of results from one report run
#[derive(Debug, Clone, Default)]
pub struct ReportPage {
    pub records: Vec<CallRecord>,

    /// Size of the aggregated set before pagination
    pub total_records: usize,

    /// First page of the summary, when summarizing was requested
    pub summary: Option<Vec<SummaryRecord>>,
}

/// Result of the report command
///
/// Missing or empty logs are not errors: they come back as a diagnostic
/// message so a host embedding the report never fails because of them.
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// The enable flag was required and not set
    Disabled,
    Diagnostic(String),
    Records(ReportPage),
}
