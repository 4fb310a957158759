//! Stable sorting by numeric columns and page slicing.

use crate::parser::schema::{parse_time_usage, CallRecord, SummaryRecord};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Numeric columns records can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    InvocationId,
    Depth,
    TimeEnter,
    MemoryEnter,
    SourceLine,
    TimeExit,
    MemoryExit,
    TimeUsage,
    MemoryDelta,
    FunctionCount,
}

impl SortColumn {
    pub const ALL: [SortColumn; 10] = [
        SortColumn::InvocationId,
        SortColumn::Depth,
        SortColumn::TimeEnter,
        SortColumn::MemoryEnter,
        SortColumn::SourceLine,
        SortColumn::TimeExit,
        SortColumn::MemoryExit,
        SortColumn::TimeUsage,
        SortColumn::MemoryDelta,
        SortColumn::FunctionCount,
    ];

    /// Column name as written in table headers
    pub fn name(self) -> &'static str {
        match self {
            SortColumn::InvocationId => "invocationId",
            SortColumn::Depth => "depth",
            SortColumn::TimeEnter => "timeEnter",
            SortColumn::MemoryEnter => "memoryEnter",
            SortColumn::SourceLine => "sourceLine",
            SortColumn::TimeExit => "timeExit",
            SortColumn::MemoryExit => "memoryExit",
            SortColumn::TimeUsage => "timeUsage",
            SortColumn::MemoryDelta => "memoryDelta",
            SortColumn::FunctionCount => "functionCount",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    /// Accepts header names (`functionCount`) and snake case (`function_count`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.trim().chars().filter(|c| *c != '_').collect();
        SortColumn::ALL
            .into_iter()
            .find(|col| col.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("'{}' is not a numeric column", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

/// Records exposing numeric columns for ordering
pub trait NumericColumns {
    /// Value of `column`, or `None` when the field is empty
    fn numeric(&self, column: SortColumn) -> Option<f64>;
}

impl NumericColumns for CallRecord {
    fn numeric(&self, column: SortColumn) -> Option<f64> {
        match column {
            SortColumn::InvocationId => Some(self.invocation_id as f64),
            SortColumn::Depth => Some(f64::from(self.depth)),
            SortColumn::TimeEnter => Some(self.time_enter),
            SortColumn::MemoryEnter => Some(self.memory_enter as f64),
            SortColumn::SourceLine => Some(f64::from(self.source_line)),
            SortColumn::TimeExit => self.time_exit,
            SortColumn::MemoryExit => self.memory_exit.map(|m| m as f64),
            SortColumn::TimeUsage => parse_time_usage(&self.time_usage),
            SortColumn::MemoryDelta => self.memory_delta.map(|m| m as f64),
            SortColumn::FunctionCount => Some(self.function_count as f64),
        }
    }
}

impl NumericColumns for SummaryRecord {
    fn numeric(&self, column: SortColumn) -> Option<f64> {
        match column {
            SortColumn::InvocationId => Some(self.invocation_id as f64),
            SortColumn::Depth => Some(f64::from(self.depth)),
            SortColumn::TimeEnter => Some(self.time_enter),
            SortColumn::MemoryEnter => Some(self.memory_enter as f64),
            SortColumn::SourceLine => Some(f64::from(self.source_line)),
            SortColumn::TimeExit => self.time_exit,
            SortColumn::MemoryExit => self.memory_exit.map(|m| m as f64),
            SortColumn::TimeUsage => parse_time_usage(&self.time_usage),
            SortColumn::MemoryDelta => self.memory_delta.map(|m| m as f64),
            SortColumn::FunctionCount => Some(self.function_count as f64),
        }
    }
}

/// Stable sort by a numeric column; empty fields sort as zero
pub fn sort_by_column<T: NumericColumns>(
    mut records: Vec<T>,
    column: SortColumn,
    direction: SortDirection,
) -> Vec<T> {
    records.sort_by(|a, b| {
        let a = a.numeric(column).unwrap_or(0.0);
        let b = b.numeric(column).unwrap_or(0.0);
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Descending => ord.reverse(),
            SortDirection::Ascending => ord,
        }
    });
    records
}

/// Slice out 1-based page `page` of `page_size` records
///
/// Both numbers are taken by absolute value. Page 0, a zero page size,
/// or a page past the end gives an empty result.
pub fn paginate<T>(records: Vec<T>, page: i64, page_size: i64) -> Vec<T> {
    let page = page.unsigned_abs();
    let page_size = page_size.unsigned_abs();

    if page == 0 || page_size == 0 {
        return Vec::new();
    }

    let start = match (page - 1).checked_mul(page_size) {
        Some(start) => start,
        None => return Vec::new(),
    };
    let (Ok(start), Ok(len)) = (usize::try_from(start), usize::try_from(page_size)) else {
        return Vec::new();
    };

    records.into_iter().skip(start).take(len).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::record;

    fn counted(id: u64, count: u64) -> CallRecord {
        let mut r = record(id, "f()");
        r.function_count = count;
        r
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let records = vec![counted(1, 2), counted(2, 5), counted(3, 2), counted(4, 7)];
        let sorted = sort_by_column(records, SortColumn::FunctionCount, SortDirection::Descending);
        let ids: Vec<u64> = sorted.iter().map(|r| r.invocation_id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
    }

    #[test]
    fn test_sort_ascending_with_empty_values() {
        let mut a = record(1, "a()");
        a.time_usage = "0.300000".to_string();
        let mut b = record(2, "b()");
        b.time_usage = String::new();
        let mut c = record(3, "c()");
        c.time_usage = "0.100000".to_string();

        let sorted = sort_by_column(vec![a, b, c], SortColumn::TimeUsage, SortDirection::Ascending);
        let ids: Vec<u64> = sorted.iter().map(|r| r.invocation_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_column_names() {
        assert_eq!("functionCount".parse::<SortColumn>(), Ok(SortColumn::FunctionCount));
        assert_eq!("memory_delta".parse::<SortColumn>(), Ok(SortColumn::MemoryDelta));
        assert!("functionLabel".parse::<SortColumn>().is_err());
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=8).collect();
        assert_eq!(paginate(items.clone(), 1, 10), items);
        assert_eq!(paginate(items.clone(), 2, 3), vec![4, 5, 6]);
        assert_eq!(paginate(items.clone(), -3, -3), vec![7, 8]);
        assert!(paginate(items.clone(), 4, 3).is_empty());
        assert!(paginate(items.clone(), 0, 3).is_empty());
        assert!(paginate(items, 1, 0).is_empty());
    }
}
