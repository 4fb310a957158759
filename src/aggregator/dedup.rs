//! Per-function invocation counts and optional one-row-per-function collapse.

use crate::parser::schema::CallRecord;
use log::debug;
use std::collections::{HashMap, HashSet};

/// Count invocations per function label over the full working set
pub fn count_functions(records: &[CallRecord]) -> HashMap<String, u64> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for record in records {
        *counts.entry(record.function_label.clone()).or_insert(0) += 1;
    }
    counts
}

/// Fill counts and routes, optionally keeping only the first record per function
///
/// **Public** - main entry point for aggregation
///
/// Counts are taken before collapsing, so a collapsed row still reports
/// every invocation of its function. Records without a function label
/// are dropped.
///
/// # Arguments
/// * `records` - Reconstructed working set, in invocation order
/// * `unique` - Keep only the first record seen for each function label
/// * `current_route` - Request path stamped onto every surviving record
pub fn deduplicate(records: Vec<CallRecord>, unique: bool, current_route: &str) -> Vec<CallRecord> {
    let counts = count_functions(&records);
    let total = records.len();

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(if unique { counts.len() } else { total });

    for mut record in records {
        if record.function_label.is_empty() {
            continue;
        }
        if unique && !seen.insert(record.function_label.clone()) {
            continue;
        }

        record.function_count = counts.get(&record.function_label).copied().unwrap_or(0);
        record.current_route = current_route.to_string();
        kept.push(record);
    }

    debug!(
        "Aggregated {} records into {} ({} distinct functions, unique={})",
        total,
        kept.len(),
        counts.len(),
        unique
    );

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::record;

    #[test]
    fn test_counts_survive_collapse() {
        let records = vec![
            record(1, "foo()"),
            record(2, "bar()"),
            record(3, "foo()"),
            record(4, "foo()"),
        ];

        let all = deduplicate(records.clone(), false, "/home");
        assert_eq!(all.len(), 4);
        assert!(all
            .iter()
            .filter(|r| r.function_label == "foo()")
            .all(|r| r.function_count == 3));

        let unique = deduplicate(records, true, "/home");
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].invocation_id, 1);
        assert_eq!(unique[0].function_count, 3);
        assert_eq!(unique[1].function_label, "bar()");
        assert_eq!(unique[1].function_count, 1);
        assert!(unique.iter().all(|r| r.current_route == "/home"));
    }

    #[test]
    fn test_empty_labels_are_dropped() {
        let records = vec![record(1, ""), record(2, "foo()")];
        let kept = deduplicate(records, false, "");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].invocation_id, 2);
    }
}
