//! Merge persisted call records into one summary row per function.
//!
//! Rows sharing a function label are folded together: the row with the
//! highest count is the base, locations are unioned, counts and time
//! usages are summed, and the route is dropped.

use super::ordering::{paginate, sort_by_column, SortColumn, SortDirection};
use crate::output::table::{persist_table, PersistMode};
use crate::parser::schema::{format_time_usage, parse_time_usage, CallRecord, SummaryRecord};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::collections::HashMap;
use std::path::Path;

/// Fold records into summary rows, in order of first appearance
pub fn summarize_records(records: Vec<CallRecord>) -> Vec<SummaryRecord> {
    let input_len = records.len();
    let mut groups: Vec<Vec<CallRecord>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        match index.get(&record.function_label) {
            Some(&slot) => groups[slot].push(record),
            None => {
                index.insert(record.function_label.clone(), groups.len());
                groups.push(vec![record]);
            }
        }
    }

    let summaries: Vec<SummaryRecord> = groups.into_iter().filter_map(fold_group).collect();

    debug!("Summarized {} records into {} functions", input_len, summaries.len());
    summaries
}

/// Merge one group of same-label records
///
/// **Private** - internal helper for summarize_records
fn fold_group(group: Vec<CallRecord>) -> Option<SummaryRecord> {
    let group = sort_by_column(group, SortColumn::FunctionCount, SortDirection::Descending);

    let mut locations: Vec<&str> = Vec::new();
    for record in &group {
        if !locations.contains(&record.location_label.as_str()) {
            locations.push(&record.location_label);
        }
    }
    let location_label = locations.join(",");

    let function_count = group.iter().map(|r| r.function_count).sum();

    let timed: Vec<f64> = group.iter().filter_map(CallRecord::time_usage_secs).collect();
    let time_usage = if timed.is_empty() {
        None
    } else {
        Some(format_time_usage(timed.iter().sum()))
    };

    let base = group.into_iter().next()?;
    let mut summary = SummaryRecord::from_base(base);
    summary.location_label = location_label;
    summary.function_count = function_count;
    if let Some(time_usage) = time_usage {
        summary.time_usage = time_usage;
    }

    Some(summary)
}

/// Summarize, persist and paginate
///
/// **Public** - main entry point for the summary pass
///
/// # Arguments
/// * `records` - Call records as loaded back from the tabular store
/// * `page` / `page_size` - Page to return, same contract as [`paginate`]
/// * `sort_by_count` - Order summary rows by combined count, most called first
/// * `summary_path` - Table the full summary is written to (replaced)
///
/// # Errors
/// * `OutputError` - the summary table cannot be written
pub fn summarize(
    records: Vec<CallRecord>,
    page: i64,
    page_size: i64,
    sort_by_count: bool,
    summary_path: &Path,
) -> Result<Vec<SummaryRecord>, OutputError> {
    let mut summaries = summarize_records(records);

    if sort_by_count {
        summaries = sort_by_column(summaries, SortColumn::FunctionCount, SortDirection::Descending);
    }

    persist_table(&summaries, summary_path, PersistMode::Replace)?;
    info!(
        "Summary of {} functions written to: {}",
        summaries.len(),
        summary_path.display()
    );

    Ok(paginate(summaries, page, page_size))
}
