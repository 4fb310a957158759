//! Decoding of single trace log lines into typed events.
//!
//! Line layout (tab separated):
//!
//! ```text
//! depth  id  0  time  mem  name  user(1)/internal(0)  include_file  file  line  n_args  args...
//! depth  id  1  time  mem
//! depth  id  R  time? mem?  return_value
//! ```
//!
//! Anything with fewer than five fields, an unknown kind, or unparsable
//! numbers is not an event and is skipped by the caller.

use crate::utils::config::{INCLUDE_FUNCTIONS, MIN_EVENT_FIELDS};

/// Function entry
#[derive(Debug, Clone, PartialEq)]
pub struct EnterEvent {
    pub depth: u32,
    pub invocation_id: u64,
    pub timestamp: f64,
    pub memory: i64,
    pub function_name: String,
    pub is_user_defined: bool,
    pub source_location: String,
    pub source_line: u32,
    pub arguments: Vec<String>,
}

impl EnterEvent {
    /// True for dynamic include/require operations
    pub fn is_include(&self) -> bool {
        INCLUDE_FUNCTIONS.contains(&self.function_name.trim())
    }

    /// String the filter term is matched against
    ///
    /// For includes the function name says nothing, so the loaded file
    /// (first argument) is used instead.
    pub fn target(&self) -> &str {
        match self.include_argument() {
            Some(arg) => arg,
            None => &self.function_name,
        }
    }

    /// First argument of an include/require, if this is one
    pub fn include_argument(&self) -> Option<&str> {
        if self.is_include() {
            self.arguments.first().map(String::as_str)
        } else {
            None
        }
    }
}

/// Function exit
#[derive(Debug, Clone, PartialEq)]
pub struct ExitEvent {
    pub depth: u32,
    pub invocation_id: u64,
    pub timestamp: f64,
    pub memory: i64,
}

/// Function return value
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnEvent {
    pub depth: u32,
    pub invocation_id: u64,
    pub timestamp: f64,
    pub memory: i64,
    pub return_value: String,
}

/// One decoded log line
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    Enter(EnterEvent),
    Exit(ExitEvent),
    Return(ReturnEvent),
}

impl RawEvent {
    pub fn invocation_id(&self) -> u64 {
        match self {
            RawEvent::Enter(e) => e.invocation_id,
            RawEvent::Exit(e) => e.invocation_id,
            RawEvent::Return(e) => e.invocation_id,
        }
    }

    pub fn depth(&self) -> u32 {
        match self {
            RawEvent::Enter(e) => e.depth,
            RawEvent::Exit(e) => e.depth,
            RawEvent::Return(e) => e.depth,
        }
    }
}

/// Decode one log line
///
/// **Public** - main entry point for event decoding
///
/// # Returns
/// The decoded event, or `None` when the line is malformed and must be skipped
pub fn decode_line(line: &str) -> Option<RawEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    let parts: Vec<&str> = line.split('\t').collect();

    if parts.len() < MIN_EVENT_FIELDS {
        return None;
    }

    let depth = parts[0].trim().parse::<u32>().ok()?;
    let invocation_id = parts[1].trim().parse::<u64>().ok()?;

    match parts[2].trim() {
        "0" => decode_enter(depth, invocation_id, &parts),
        "1" => Some(RawEvent::Exit(ExitEvent {
            depth,
            invocation_id,
            timestamp: parts[3].trim().parse().ok()?,
            memory: parts[4].trim().parse().ok()?,
        })),
        "R" => Some(RawEvent::Return(ReturnEvent {
            depth,
            invocation_id,
            // Return lines usually leave time and memory blank
            timestamp: parts[3].trim().parse().unwrap_or(0.0),
            memory: parts[4].trim().parse().unwrap_or(0),
            return_value: field(&parts, 5).to_string(),
        })),
        _ => None,
    }
}

/// Decode the enter-specific fields
///
/// **Private** - internal helper for decode_line
fn decode_enter(depth: u32, invocation_id: u64, parts: &[&str]) -> Option<RawEvent> {
    let include_file = field(parts, 7);
    let arguments = if include_file.is_empty() {
        parts
            .get(11..)
            .map(|args| args.iter().map(|a| a.to_string()).collect())
            .unwrap_or_default()
    } else {
        vec![include_file.to_string()]
    };

    Some(RawEvent::Enter(EnterEvent {
        depth,
        invocation_id,
        timestamp: parts[3].trim().parse().ok()?,
        memory: parts[4].trim().parse().ok()?,
        function_name: field(parts, 5).trim().to_string(),
        is_user_defined: field(parts, 6).trim() == "1",
        source_location: field(parts, 8).trim().to_string(),
        source_line: field(parts, 9).trim().parse().unwrap_or(0),
        arguments,
    }))
}

fn field<'a>(parts: &[&'a str], index: usize) -> &'a str {
    parts.get(index).copied().unwrap_or("")
}
