#![allow(dead_code)]

use calltrace_studio::parser::schema::CallRecord;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Enter line for a user-defined function in /srv/app/src/<file>
pub fn enter(id: u64, depth: u32, name: &str, time: f64, mem: i64) -> String {
    format!(
        "{}\t{}\t0\t{:.6}\t{}\t{}\t1\t\t/srv/app/src/{}.php\t{}\t0",
        depth, id, time, mem, name, name, 10 + id
    )
}

pub fn exit(id: u64, depth: u32, time: f64, mem: i64) -> String {
    format!("{}\t{}\t1\t{:.6}\t{}", depth, id, time, mem)
}

pub fn ret(id: u64, depth: u32, value: &str) -> String {
    format!("{}\t{}\tR\t\t\t{}", depth, id, value)
}

/// Write a trace log with the usual producer header and footer
pub fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Version: 3.3.1").unwrap();
    writeln!(file, "File format: 4").unwrap();
    writeln!(file, "TRACE START [2026-10-17 10:00:00.000000]").unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    writeln!(file, "\t\t\t0.900000\t4096").unwrap();
    writeln!(file, "TRACE END   [2026-10-17 10:00:01.000000]").unwrap();
    path
}

/// The nested main/helper example log
pub fn main_helper_log() -> Vec<String> {
    vec![
        enter(1, 0, "main", 0.0, 1000),
        enter(2, 1, "helper", 0.1, 1100),
        exit(2, 1, 0.3, 1150),
        exit(1, 0, 0.5, 1200),
    ]
}

pub fn labels(records: &[CallRecord]) -> Vec<&str> {
    records.iter().map(|r| r.function_label.as_str()).collect()
}
