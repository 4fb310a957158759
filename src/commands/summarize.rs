//! Summarize command implementation.
//!
//! Re-reads a persisted call record table and writes one summary row
//! per function label.

use super::models::{SummarizeArgs, SummaryScope};
use crate::aggregator::summarize;
use crate::output::table::{latest_run, load_table, TableRecord};
use crate::parser::schema::{CallRecord, SummaryRecord};
use crate::utils::error::OutputError;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

/// Load the call records a summary is built from
///
/// **Public** - shared by the report and summarize commands
pub fn load_summary_input(table: &Path, scope: SummaryScope) -> Result<Vec<CallRecord>, OutputError> {
    let rows = load_table(table, false)?;
    let rows = match scope {
        SummaryScope::LatestRun => latest_run(rows),
        SummaryScope::AllRuns => rows,
    };

    let records = rows
        .iter()
        .filter(|row| !row.is_blank())
        .map(CallRecord::from_row)
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Loaded {} records for summary ({:?})", records.len(), scope);
    Ok(records)
}

/// Execute the summarize command
///
/// **Public** - main entry point called from main.rs
pub fn execute_summarize(args: &SummarizeArgs) -> Result<Vec<SummaryRecord>> {
    info!("Summarizing {}", args.table.display());

    let records = load_summary_input(&args.table, args.scope)
        .with_context(|| format!("Failed to load table {}", args.table.display()))?;

    let page = summarize(records, args.page, args.page_size, args.sort_by_count, &args.output)
        .context("Failed to write summary table")?;

    info!("✓ Summary written to: {}", args.output.display());
    Ok(page)
}
