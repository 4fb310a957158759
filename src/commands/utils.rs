use crate::output::TableRecord;
use crate::parser::schema::{CallRecord, SummaryRecord};
use crate::utils::config::{ENABLE_TRACE_ENV, SCHEMA_VERSION};

/// Render call records as a fixed-width text table
pub fn render_records(records: &[CallRecord]) -> String {
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.function_count.to_string(),
                r.time_usage.clone(),
                r.memory_delta.map(|m| m.to_string()).unwrap_or_default(),
                r.function_label.clone(),
                r.location_label.clone(),
            ]
        })
        .collect();
    render_table(&["count", "time", "memory", "function", "location"], &rows)
}

/// Render summary records as a fixed-width text table
pub fn render_summaries(summaries: &[SummaryRecord]) -> String {
    let rows: Vec<[String; 5]> = summaries
        .iter()
        .map(|s| {
            [
                s.function_count.to_string(),
                s.time_usage.clone(),
                s.memory_delta.map(|m| m.to_string()).unwrap_or_default(),
                s.function_label.clone(),
                s.location_label.clone(),
            ]
        })
        .collect();
    render_table(&["count", "time", "memory", "function", "locations"], &rows)
}

fn render_table(headers: &[&str; 5], rows: &[[String; 5]]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_line(&mut out, &header, &widths);
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    out.push('\n');
    for row in rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Display table schema information
pub fn display_schema(show_details: bool) {
    println!("Calltrace Studio Table Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Call record columns:");
        for header in CallRecord::headers() {
            println!("  {}", header);
        }
        println!();
        println!("Summary columns: same as call records, without currentRoute.");
        println!("  locationLabel  - comma-joined unique locations");
        println!("  functionCount  - sum of merged counts");
        println!("  timeUsage      - sum of merged time usages");
        println!();
        println!("A blank row separates runs appended to the same table.");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Calltrace Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Table Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Reconstructs per-call timing and memory tables from function trace logs.");
    println!("Set {}=1 to enable env-gated reports.", ENABLE_TRACE_ENV);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::test_support::record;

    #[test]
    fn test_render_records() {
        let mut r = record(1, "main()");
        r.function_count = 3;
        let text = render_records(&[r]);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("count"));
        assert!(lines[2].contains("main()"));
        assert!(lines[2].starts_with("3 "));
    }

    #[test]
    fn test_render_empty() {
        let text = render_summaries(&[]);
        assert_eq!(text.lines().count(), 2);
    }
}
