//! Calltrace Studio
//!
//! Reconstructs a table of function calls from a trace event log:
//! which functions ran, how long they took, how much memory they used,
//! how often they were called and from where.
//!
//! The pipeline decodes enter/exit/return events, matches them by
//! invocation id, filters and counts the resulting call records, persists
//! them to a CSV table, and can fold that table into one summary row per
//! function.
//!
//! ```bash
//! calltrace report --dir /tmp/traces --root /var/www/app --filter 'App\\'
//! calltrace summarize --table /tmp/traces/function-trace.csv --sort-by-count
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
