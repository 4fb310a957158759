//! Record definitions for reconstructed calls and their summaries.
//!
//! These are the rows we persist to the tabular store and the
//! structure of the JSON report written to disk.

use serde::{Deserialize, Serialize};

/// One reconstructed function invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Unique per invocation within one log
    pub invocation_id: u64,

    /// Nesting level at entry
    pub depth: u32,

    /// Timestamp of the enter event
    pub time_enter: f64,

    /// Memory in bytes at entry
    pub memory_enter: i64,

    pub is_user_defined: bool,

    pub source_line: u32,

    pub arguments: Vec<String>,

    /// Root-stripped `name(args)`, the identity used for counting
    pub function_label: String,

    /// Root-stripped `file:line`
    pub location_label: String,

    pub time_exit: Option<f64>,

    pub memory_exit: Option<i64>,

    /// `time_exit - time_enter` with six decimals, empty until exit
    pub time_usage: String,

    pub memory_delta: Option<i64>,

    pub return_value: String,

    /// Invocations sharing this label across the whole log
    pub function_count: u64,

    /// Request path this run was recorded under
    pub current_route: String,
}

impl CallRecord {
    /// True once the matching exit event has been applied
    pub fn has_exited(&self) -> bool {
        self.time_exit.is_some()
    }

    /// Time usage in seconds, if the call has exited
    pub fn time_usage_secs(&self) -> Option<f64> {
        parse_time_usage(&self.time_usage)
    }
}

/// One row per distinct function label after merging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub invocation_id: u64,
    pub depth: u32,
    pub time_enter: f64,
    pub memory_enter: i64,
    pub is_user_defined: bool,
    pub source_line: u32,
    pub arguments: Vec<String>,
    pub function_label: String,

    /// Comma-joined unique locations of all merged rows
    pub location_label: String,

    pub time_exit: Option<f64>,
    pub memory_exit: Option<i64>,

    /// Sum of the merged time usages
    pub time_usage: String,

    pub memory_delta: Option<i64>,
    pub return_value: String,

    /// Sum of the merged counts
    pub function_count: u64,
}

impl SummaryRecord {
    /// Start a summary from its base record, dropping the route
    pub fn from_base(base: CallRecord) -> Self {
        Self {
            invocation_id: base.invocation_id,
            depth: base.depth,
            time_enter: base.time_enter,
            memory_enter: base.memory_enter,
            is_user_defined: base.is_user_defined,
            source_line: base.source_line,
            arguments: base.arguments,
            function_label: base.function_label,
            location_label: base.location_label,
            time_exit: base.time_exit,
            memory_exit: base.memory_exit,
            time_usage: base.time_usage,
            memory_delta: base.memory_delta,
            return_value: base.return_value,
            function_count: base.function_count,
        }
    }
}

/// Top-level JSON report for one page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace log the records were reconstructed from
    pub trace_file: String,

    pub current_route: String,

    pub page: u64,

    pub page_size: u64,

    /// Records in the full aggregated set, before pagination
    pub total_records: usize,

    pub records: Vec<CallRecord>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Format seconds the way time usage is stored: fixed point, six decimals
pub fn format_time_usage(secs: f64) -> String {
    format!("{:.6}", secs)
}

/// Parse a stored time usage, treating an empty string as absent
pub fn parse_time_usage(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        value.parse().ok()
    }
}
