//! Aggregation of trace events into call records and summaries.
//!
//! This module transforms decoded trace events into:
//! - One call record per invocation (reconstructor)
//! - Per-function counts and optional collapse (dedup)
//! - Sorted, paginated views (ordering)
//! - One summary row per function (summarize)

pub mod dedup;
pub mod normalize;
pub mod ordering;
pub mod reconstructor;
pub mod summarize;

// Re-export main types and functions
pub use dedup::{count_functions, deduplicate};
pub use normalize::{matches_filter, normalize_separators, strip_root, PathNormalizer};
pub use ordering::{paginate, sort_by_column, NumericColumns, SortColumn, SortDirection};
pub use reconstructor::{reconstruct, reconstruct_and_filter, CallReconstructor, ReconstructStats};
pub use summarize::{summarize, summarize_records};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::parser::schema::CallRecord;

    /// Minimal exited record with the given id and label
    pub fn record(invocation_id: u64, function_label: &str) -> CallRecord {
        CallRecord {
            invocation_id,
            depth: 0,
            time_enter: 0.0,
            memory_enter: 0,
            is_user_defined: true,
            source_line: 1,
            arguments: Vec::new(),
            function_label: function_label.to_string(),
            location_label: "/index.php:1".to_string(),
            time_exit: Some(0.0),
            memory_exit: Some(0),
            time_usage: "0.000000".to_string(),
            memory_delta: Some(0),
            return_value: String::new(),
            function_count: 0,
            current_route: String::new(),
        }
    }
}
