mod common;

use calltrace_studio::aggregator::{
    deduplicate, paginate, reconstruct_and_filter, sort_by_column, summarize_records, SortColumn,
    SortDirection,
};
use calltrace_studio::parser::schema::CallRecord;
use common::{enter, exit, labels};
use pretty_assertions::assert_eq;

/// foo x3, bar x2, baz x1, interleaved
fn repeated_calls() -> Vec<CallRecord> {
    let names = ["foo", "bar", "foo", "baz", "bar", "foo"];
    let mut lines = Vec::new();
    for (i, name) in names.iter().enumerate() {
        let id = i as u64 + 1;
        let start = i as f64;
        lines.push(enter(id, 0, name, start, 1000));
        lines.push(exit(id, 0, start + 0.25, 1010));
    }
    reconstruct_and_filter(&lines, "", "/srv/app")
}

fn count_of(records: &[CallRecord], label: &str) -> Vec<u64> {
    records
        .iter()
        .filter(|r| r.function_label == label)
        .map(|r| r.function_count)
        .collect()
}

#[test]
fn test_counts_identical_with_and_without_collapse() {
    let all = deduplicate(repeated_calls(), false, "/cart");
    let unique = deduplicate(repeated_calls(), true, "/cart");

    assert_eq!(all.len(), 6);
    assert_eq!(count_of(&all, "foo()"), vec![3, 3, 3]);
    assert_eq!(count_of(&all, "bar()"), vec![2, 2]);

    assert_eq!(labels(&unique), vec!["foo()", "bar()", "baz()"]);
    assert_eq!(count_of(&unique, "foo()"), vec![3]);
    assert_eq!(count_of(&unique, "bar()"), vec![2]);
    assert_eq!(count_of(&unique, "baz()"), vec![1]);
    assert!(unique.iter().all(|r| r.current_route == "/cart"));
}

#[test]
fn test_unique_keeps_first_appearance() {
    let unique = deduplicate(repeated_calls(), true, "");
    let ids: Vec<u64> = unique.iter().map(|r| r.invocation_id).collect();
    assert_eq!(ids, vec![1, 2, 4]);
}

#[test]
fn test_sort_by_count_then_paginate() {
    let unique = deduplicate(repeated_calls(), true, "");
    let sorted = sort_by_column(unique, SortColumn::FunctionCount, SortDirection::Descending);
    assert_eq!(labels(&sorted), vec!["foo()", "bar()", "baz()"]);

    let ascending = sort_by_column(sorted.clone(), SortColumn::FunctionCount, SortDirection::Ascending);
    assert_eq!(labels(&ascending), vec!["baz()", "bar()", "foo()"]);

    let second_page = paginate(sorted, 2, 2);
    assert_eq!(labels(&second_page), vec!["baz()"]);
}

#[test]
fn test_paginate_first_page_of_eight() {
    let records: Vec<CallRecord> = deduplicate(repeated_calls(), false, "")
        .into_iter()
        .chain(deduplicate(repeated_calls(), false, "").into_iter().take(2))
        .collect();
    assert_eq!(records.len(), 8);

    let page = paginate(records.clone(), 1, 10);
    assert_eq!(page, records);
    assert!(paginate(records, 2, 10).is_empty());
}

#[test]
fn test_summary_of_two_foo_rows() {
    let mut rows = deduplicate(repeated_calls(), true, "/cart");
    rows.truncate(1);
    let mut first = rows.remove(0);
    first.function_count = 3;
    first.time_usage = "0.010000".to_string();

    let mut second = first.clone();
    second.invocation_id = 42;
    second.function_count = 5;
    second.time_usage = "0.020000".to_string();
    second.location_label = "/src/other.php:7".to_string();

    let summaries = summarize_records(vec![first, second]);

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].function_label, "foo()");
    assert_eq!(summaries[0].function_count, 8);
    assert_eq!(summaries[0].time_usage, "0.030000");
    assert_eq!(summaries[0].invocation_id, 42);
    assert_eq!(summaries[0].location_label, "/src/other.php:7,/src/foo.php:11");
}
