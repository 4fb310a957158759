//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod models;
pub mod report;
pub mod summarize;
pub mod utils;

// Re-export main command functions
pub use models::{ReportArgs, ReportOutcome, ReportPage, SummarizeArgs, SummaryScope};
pub use report::{execute_report, validate_args};
pub use summarize::{execute_summarize, load_summary_input};
