//! Rebuild one call record per invocation from enter/exit/return events.
//!
//! Events are matched by invocation id. A record is opened by its enter
//! event and closed by its exit event: timing fields are filled once and
//! later exits are ignored. A return event only sets the return value, in
//! whichever order it arrives. Exit or return events for ids that were
//! never entered, or whose enter was filtered out, contribute nothing.

use super::normalize::{matches_filter, PathNormalizer};
use crate::parser::event::{EnterEvent, ExitEvent, RawEvent, ReturnEvent};
use crate::parser::schema::{format_time_usage, CallRecord};
use crate::parser::trace_file::decode_lines;
use log::{debug, trace};
use std::collections::HashMap;

/// Counters collected while reconstructing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconstructStats {
    /// Enter events rejected by the filter term
    pub filtered_out: usize,

    /// Exit/return events with no entered invocation
    pub unmatched: usize,

    /// Invocations that never saw an exit event
    pub unterminated: usize,
}

/// Owns the table of in-progress invocations
#[derive(Debug)]
pub struct CallReconstructor {
    filter_term: String,
    normalizer: PathNormalizer,

    /// Records in order of first entry
    records: Vec<CallRecord>,

    /// Invocation id -> slot in `records`, for every id that passed the filter
    slots: HashMap<u64, usize>,

    stats: ReconstructStats,
}

impl CallReconstructor {
    pub fn new(filter_term: &str, root_path: &str) -> Self {
        Self {
            filter_term: filter_term.to_string(),
            normalizer: PathNormalizer::new(root_path),
            records: Vec::new(),
            slots: HashMap::new(),
            stats: ReconstructStats::default(),
        }
    }

    /// Feed one event
    pub fn apply(&mut self, event: &RawEvent) {
        match event {
            RawEvent::Enter(enter) => self.on_enter(enter),
            RawEvent::Exit(exit) => self.on_exit(exit),
            RawEvent::Return(ret) => self.on_return(ret),
        }
    }

    pub fn stats(&self) -> &ReconstructStats {
        &self.stats
    }

    /// Hand over the working set, in invocation order
    pub fn finish(mut self) -> (Vec<CallRecord>, ReconstructStats) {
        self.stats.unterminated = self.records.iter().filter(|r| !r.has_exited()).count();

        debug!(
            "Reconstructed {} calls ({} filtered out, {} unmatched events, {} unterminated)",
            self.records.len(),
            self.stats.filtered_out,
            self.stats.unmatched,
            self.stats.unterminated
        );

        (self.records, self.stats)
    }

    fn on_enter(&mut self, enter: &EnterEvent) {
        if !matches_filter(enter.target(), &self.filter_term) {
            self.stats.filtered_out += 1;
            return;
        }

        let record = self.build_record(enter);

        // A repeated id replaces the earlier record in place
        match self.slots.get(&enter.invocation_id) {
            Some(&slot) => {
                trace!("Invocation {} entered twice, replacing", enter.invocation_id);
                self.records[slot] = record;
            }
            None => {
                let slot = self.records.len();
                self.records.push(record);
                self.slots.insert(enter.invocation_id, slot);
            }
        }
    }

    fn on_exit(&mut self, exit: &ExitEvent) {
        let Some(&slot) = self.slots.get(&exit.invocation_id) else {
            trace!("Ignoring exit for unknown invocation {}", exit.invocation_id);
            self.stats.unmatched += 1;
            return;
        };

        let record = &mut self.records[slot];
        if record.has_exited() {
            trace!("Ignoring repeated exit for invocation {}", exit.invocation_id);
            return;
        }

        record.time_exit = Some(exit.timestamp);
        record.memory_exit = Some(exit.memory);
        record.time_usage = format_time_usage(exit.timestamp - record.time_enter);
        record.memory_delta = Some(exit.memory - record.memory_enter);
    }

    fn on_return(&mut self, ret: &ReturnEvent) {
        let Some(&slot) = self.slots.get(&ret.invocation_id) else {
            trace!("Ignoring return for unknown invocation {}", ret.invocation_id);
            self.stats.unmatched += 1;
            return;
        };

        self.records[slot].return_value = ret.return_value.clone();
    }

    /// Populate the enter-time fields and labels of a new record
    ///
    /// **Private** - internal helper for on_enter
    fn build_record(&self, enter: &EnterEvent) -> CallRecord {
        let function_label = self.normalizer.strip(&format!(
            "{}({})",
            enter.function_name.trim(),
            enter.include_argument().unwrap_or("")
        ));
        let location_label = self.normalizer.strip(&format!(
            "{}:{}",
            enter.source_location.trim(),
            enter.source_line
        ));

        CallRecord {
            invocation_id: enter.invocation_id,
            depth: enter.depth,
            time_enter: enter.timestamp,
            memory_enter: enter.memory,
            is_user_defined: enter.is_user_defined,
            source_line: enter.source_line,
            arguments: enter.arguments.clone(),
            function_label,
            location_label,
            time_exit: None,
            memory_exit: None,
            time_usage: String::new(),
            memory_delta: None,
            return_value: String::new(),
            function_count: 0,
            current_route: String::new(),
        }
    }
}

/// Reconstruct call records from already decoded events
pub fn reconstruct(events: &[RawEvent], filter_term: &str, root_path: &str) -> Vec<CallRecord> {
    let mut reconstructor = CallReconstructor::new(filter_term, root_path);
    for event in events {
        reconstructor.apply(event);
    }
    reconstructor.finish().0
}

/// Decode log lines and reconstruct the filtered working set
///
/// **Public** - main entry point for reconstruction
///
/// # Arguments
/// * `lines` - Raw trace log lines (malformed ones are skipped)
/// * `filter_term` - Substring the call target must contain; empty keeps everything
/// * `root_path` - Directory stripped out of function and location labels
pub fn reconstruct_and_filter<S: AsRef<str>>(
    lines: &[S],
    filter_term: &str,
    root_path: &str,
) -> Vec<CallRecord> {
    let decoded = decode_lines(lines);
    reconstruct(&decoded.events, filter_term, root_path)
}
