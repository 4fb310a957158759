mod common;

use calltrace_studio::aggregator::reconstructor::{reconstruct_and_filter, CallReconstructor};
use calltrace_studio::parser::{decode_lines, read_trace_lines};
use common::{enter, exit, labels, main_helper_log, ret, write_log};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

#[test]
fn test_main_helper_example() {
    let records = reconstruct_and_filter(&main_helper_log(), "", "");

    assert_eq!(labels(&records), vec!["main()", "helper()"]);
    assert_eq!(records[0].time_usage, "0.500000");
    assert_eq!(records[0].memory_delta, Some(200));
    assert_eq!(records[1].time_usage, "0.200000");
    assert_eq!(records[1].memory_delta, Some(50));
    assert_eq!(records[1].depth, 1);
}

#[test]
fn test_invocation_ids_are_unique() {
    let mut lines = main_helper_log();
    // Same id entered again replaces, never duplicates
    lines.push(enter(2, 1, "helper", 0.6, 1000));
    lines.push(exit(2, 1, 0.7, 1000));
    lines.push(enter(3, 1, "helper", 0.8, 1000));

    let records = reconstruct_and_filter(&lines, "", "");
    let ids: HashSet<u64> = records.iter().map(|r| r.invocation_id).collect();

    assert_eq!(ids.len(), records.len());
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].time_enter, 0.6);
}

#[test]
fn test_unmatched_events_contribute_nothing() {
    let mut lines = main_helper_log();
    let baseline = reconstruct_and_filter(&lines, "", "");

    lines.insert(0, exit(99, 0, 0.1, 1));
    lines.push(ret(77, 0, "'orphan'"));
    let with_orphans = reconstruct_and_filter(&lines, "", "");

    assert_eq!(with_orphans, baseline);
}

#[test]
fn test_filter_matching_nothing_is_empty() {
    let records = reconstruct_and_filter(&main_helper_log(), "NoSuchFunction", "");
    assert!(records.is_empty());
}

#[test]
fn test_filter_keeps_matching_targets() {
    let records = reconstruct_and_filter(&main_helper_log(), "help", "");
    assert_eq!(labels(&records), vec!["helper()"]);
}

#[test]
fn test_unterminated_calls_are_retained() {
    let lines = vec![enter(1, 0, "main", 0.0, 1000), enter(2, 1, "boom", 0.1, 1000)];
    let decoded = decode_lines(&lines);

    let mut reconstructor = CallReconstructor::new("", "/srv/app");
    for event in &decoded.events {
        reconstructor.apply(event);
    }
    let (records, stats) = reconstructor.finish();

    assert_eq!(records.len(), 2);
    assert_eq!(stats.unterminated, 2);
    assert!(records.iter().all(|r| r.time_usage.is_empty() && r.time_exit.is_none()));
    assert_eq!(records[1].location_label, "/src/boom.php:12");
}

#[test]
fn test_log_file_with_header_and_footer() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines = main_helper_log();
    lines.push(ret(1, 0, "0"));
    let path = write_log(dir.path(), "function-trace.xt", &lines);

    let lines = read_trace_lines(&path).unwrap();
    let records = reconstruct_and_filter(&lines, "", "/srv/app");

    assert_eq!(labels(&records), vec!["main()", "helper()"]);
    assert_eq!(records[0].return_value, "0");
    assert_eq!(records[0].location_label, "/src/main.php:11");
}
