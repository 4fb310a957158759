//! Report command implementation.
//!
//! The report command:
//! 1. Loads the trace log
//! 2. Reconstructs and filters call records
//! 3. Counts and optionally collapses functions
//! 4. Sorts by count (if requested)
//! 5. Appends the records to the CSV table
//! 6. Summarizes the table (if requested)
//! 7. Returns the requested page

use super::models::{ReportArgs, ReportOutcome, ReportPage};
use super::summarize::load_summary_input;
use crate::aggregator::{
    deduplicate, paginate, sort_by_column, summarize, CallReconstructor, SortColumn,
    SortDirection,
};
use crate::output::{persist_table, to_report, write_report, PersistMode};
use crate::parser::{decode_lines, read_trace_lines};
use crate::utils::config::{tracing_enabled, TracePaths, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The requested page, a diagnostic for a missing/empty log, or
/// `Disabled` when env gating is on and the flag is unset
///
/// # Errors
/// * Unreadable trace log
/// * Table or JSON write errors
pub fn execute_report(args: &ReportArgs) -> Result<ReportOutcome> {
    if !tracing_enabled(args.check_env) {
        debug!("Function tracing disabled by environment");
        return Ok(ReportOutcome::Disabled);
    }

    let start_time = Instant::now();
    let paths = TracePaths::new(&args.trace_dir);
    let trace_file = args.trace_file.clone().unwrap_or_else(|| paths.trace_log());

    // Step 1: Load trace log
    info!("Step 1/6: Loading trace log {}...", trace_file.display());
    let lines = match read_trace_lines(&trace_file) {
        Ok(lines) => lines,
        Err(e) if e.is_diagnostic() => {
            warn!("{}", e);
            return Ok(ReportOutcome::Diagnostic(e.to_string()));
        }
        Err(e) => return Err(anyhow::Error::from(e).context("Failed to load trace log")),
    };

    // Step 2: Decode and reconstruct
    info!("Step 2/6: Reconstructing calls from {} lines...", lines.len());
    let decoded = decode_lines(&lines);
    let root_path = resolve_root_path(&args.root_path);
    let mut reconstructor = CallReconstructor::new(&args.filter_term, &root_path);
    for event in &decoded.events {
        reconstructor.apply(event);
    }
    let (records, stats) = reconstructor.finish();

    debug!(
        "{} records, {} filtered out, {} unmatched events",
        records.len(),
        stats.filtered_out,
        stats.unmatched
    );

    // Step 3: Count and collapse
    info!("Step 3/6: Counting function invocations...");
    let mut records = deduplicate(records, args.unique, &args.current_route);

    // Step 4: Sort
    if args.sort_by_count {
        info!("Step 4/6: Sorting by function count...");
        records = sort_by_column(records, SortColumn::FunctionCount, SortDirection::Descending);
    } else {
        info!("Step 4/6: Skipping sort (not requested)");
    }

    // Step 5: Persist
    let table = paths.records_table();
    info!("Step 5/6: Appending {} records to {}...", records.len(), table.display());
    persist_table(&records, &table, PersistMode::Append { separator_row: true })
        .context("Failed to write call record table")?;

    // Step 6: Summarize
    let summary = if args.summarize {
        info!("Step 6/6: Summarizing {}...", table.display());
        let input = load_summary_input(&table, args.summary_scope)
            .context("Failed to load call record table")?;
        let page = summarize(
            input,
            DEFAULT_PAGE,
            DEFAULT_PAGE_SIZE,
            args.sort_by_count,
            &paths.summary_table(),
        )
        .context("Failed to write summary table")?;
        Some(page)
    } else {
        info!("Step 6/6: Skipping summary (not requested)");
        None
    };

    let total_records = records.len();
    let page = paginate(records, args.page, args.page_size);

    if let Some(json_path) = &args.output_json {
        let report = to_report(
            &trace_file,
            &args.current_route,
            args.page,
            args.page_size,
            total_records,
            page.clone(),
        );
        write_report(&report, json_path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    let elapsed = start_time.elapsed();
    info!(
        "Report completed in {:.2}s ({} of {} records on page {})",
        elapsed.as_secs_f64(),
        page.len(),
        total_records,
        args.page.unsigned_abs()
    );

    Ok(ReportOutcome::Records(ReportPage {
        records: page,
        total_records,
        summary,
    }))
}

/// Canonical form of the configured root, when it exists on disk
///
/// **Private** - internal helper for execute_report
fn resolve_root_path(root_path: &str) -> String {
    if root_path.trim().is_empty() {
        return String::new();
    }
    std::fs::canonicalize(root_path)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| root_path.to_string())
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.trace_dir.as_os_str().is_empty() {
        anyhow::bail!("Trace directory cannot be empty");
    }

    if let Some(file) = &args.trace_file {
        if file.as_os_str().is_empty() {
            anyhow::bail!("Trace file path cannot be empty");
        }
    }

    if args.page == 0 {
        anyhow::bail!("page must not be 0 (pages start at 1)");
    }

    if args.page_size == 0 {
        anyhow::bail!("page_size must not be 0");
    }

    Ok(())
}
