//! Trace log parsing and record schema definitions.
//!
//! This module handles:
//! - Loading raw trace logs (plain or gzip)
//! - Decoding lines into enter/exit/return events
//! - Defining the call and summary record schema

pub mod event;
pub mod schema;
pub mod trace_file;

// Re-export main types
pub use event::{decode_line, EnterEvent, ExitEvent, RawEvent, ReturnEvent};
pub use schema::{format_time_usage, parse_time_usage, CallRecord, SummaryRecord, TraceReport};
pub use trace_file::{decode_lines, read_trace_lines, DecodedTrace};
