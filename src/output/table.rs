//! Tabular store: records persisted as CSV with a header row.
//!
//! A table file holds a header row followed by data rows. Runs appended
//! to a shared file can be marked off with a blank separator row. There
//! is no locking: concurrent writers must be serialized by the caller.

use super::csv::{format_row, parse_rows};
use super::validate_path;
use crate::parser::schema::{CallRecord, SummaryRecord};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;
use std::str::FromStr;

/// Records that can be written to and read back from a table
pub trait TableRecord: Sized {
    /// Header row, one name per field
    fn headers() -> &'static [&'static str];

    /// Field values in header order
    fn to_fields(&self) -> Vec<String>;

    /// Rebuild a record from a loaded row
    fn from_row(row: &TableRow) -> Result<Self, OutputError>;
}

/// One loaded row: header names mapped to values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    /// Data line number, 1 = first row after the header
    pub row: usize,
    fields: Vec<(String, String)>,
}

impl TableRow {
    pub fn new(row: usize, fields: Vec<(String, String)>) -> Self {
        Self { row, fields }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// True for separator rows (no field has any content)
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|(_, value)| value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn text(&self, column: &str) -> Result<&str, OutputError> {
        self.get(column).ok_or_else(|| OutputError::MissingColumn {
            column: column.to_string(),
            row: self.row,
        })
    }

    fn parse<T: FromStr>(&self, column: &str) -> Result<T, OutputError> {
        let value = self.text(column)?;
        value.trim().parse().map_err(|_| invalid(column, value))
    }

    fn parse_optional<T: FromStr>(&self, column: &str) -> Result<Option<T>, OutputError> {
        let value = self.text(column)?;
        if value.trim().is_empty() {
            return Ok(None);
        }
        value.trim().parse().map(Some).map_err(|_| invalid(column, value))
    }

    fn parse_flag(&self, column: &str) -> Result<bool, OutputError> {
        let value = self.text(column)?;
        match value.trim() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            _ => Err(invalid(column, value)),
        }
    }

    fn parse_list(&self, column: &str) -> Result<Vec<String>, OutputError> {
        let value = self.text(column)?;
        if value.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(value).map_err(|_| invalid(column, value))
    }
}

fn invalid(column: &str, value: &str) -> OutputError {
    OutputError::InvalidValue {
        column: column.to_string(),
        value: value.to_string(),
    }
}

/// How a batch is written to an existing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Truncate, then write header and rows
    Replace,
    /// Add rows after the existing content
    Append {
        /// Precede the batch with a blank row marking a new run
        separator_row: bool,
    },
}

/// Write records to a table file
///
/// **Public** - main entry point for table output
///
/// Append mode degrades to replace when the file is missing or holds
/// only whitespace, so a fresh table always starts with its header.
/// Writing an empty batch in replace mode leaves an empty file. An empty
/// batch appended with a separator row writes just the separator.
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::ReadFailed` - Existing content cannot be inspected
pub fn persist_table<R: TableRecord>(
    records: &[R],
    path: impl AsRef<Path>,
    mode: PersistMode,
) -> Result<(), OutputError> {
    let path = path.as_ref();
    validate_path(path)?;
    ensure_parent_dir(path)?;

    let mode = match mode {
        PersistMode::Append { .. } if !has_content(path)? => {
            debug!("Table {} is empty, writing it fresh", path.display());
            PersistMode::Replace
        }
        other => other,
    };

    let file = match mode {
        PersistMode::Replace => File::create(path),
        PersistMode::Append { .. } => OpenOptions::new().append(true).open(path),
    }
    .map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    match mode {
        PersistMode::Replace if !records.is_empty() => {
            writeln!(writer, "{}", format_row(R::headers())).map_err(OutputError::WriteFailed)?;
        }
        // An empty run still gets its separator so it reads back as empty
        PersistMode::Append { separator_row: true } => {
            writeln!(writer).map_err(OutputError::WriteFailed)?;
        }
        _ => {}
    }

    for record in records {
        writeln!(writer, "{}", format_row(&record.to_fields())).map_err(OutputError::WriteFailed)?;
    }

    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Wrote {} rows to: {} ({:?})", records.len(), path.display(), mode);
    Ok(())
}

/// Read a table back as header-keyed rows
///
/// **Public** - main entry point for table input
///
/// # Arguments
/// * `path` - Table file
/// * `skip_blank_rows` - Drop separator rows instead of returning them as blank rows
///
/// # Errors
/// * `OutputError::ReadFailed` - File read error
pub fn load_table(path: impl AsRef<Path>, skip_blank_rows: bool) -> Result<Vec<TableRow>, OutputError> {
    let path = path.as_ref();
    debug!("Reading table from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(OutputError::ReadFailed)?;
    let mut rows = parse_rows(&content).into_iter();

    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let mut loaded = Vec::new();
    for (index, values) in rows.enumerate() {
        let row = TableRow::new(
            index + 1,
            header.iter().cloned().zip(values).collect(),
        );
        if skip_blank_rows && row.is_blank() {
            continue;
        }
        loaded.push(row);
    }

    debug!("Loaded {} rows", loaded.len());
    Ok(loaded)
}

/// Load and decode every non-blank row of a table
pub fn load_records<R: TableRecord>(path: impl AsRef<Path>) -> Result<Vec<R>, OutputError> {
    load_table(path, true)?.iter().map(R::from_row).collect()
}

/// Rows after the last blank separator, i.e. the most recent run
pub fn latest_run(rows: Vec<TableRow>) -> Vec<TableRow> {
    match rows.iter().rposition(TableRow::is_blank) {
        Some(last_separator) => rows.into_iter().skip(last_separator + 1).collect(),
        None => rows,
    }
}

/// True when the file exists and holds more than whitespace
///
/// **Private** - internal helper for persist_table
fn has_content(path: &Path) -> Result<bool, OutputError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(!content.trim().is_empty()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(OutputError::ReadFailed(e)),
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}

const CALL_HEADERS: &[&str] = &[
    "invocationId",
    "depth",
    "timeEnter",
    "memoryEnter",
    "isUserDefined",
    "sourceLine",
    "arguments",
    "functionLabel",
    "locationLabel",
    "timeExit",
    "memoryExit",
    "timeUsage",
    "memoryDelta",
    "returnValue",
    "functionCount",
    "currentRoute",
];

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

fn list(values: &[String]) -> String {
    if values.is_empty() {
        String::new()
    } else {
        serde_json::to_string(values).unwrap_or_default()
    }
}

impl TableRecord for CallRecord {
    fn headers() -> &'static [&'static str] {
        CALL_HEADERS
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.invocation_id.to_string(),
            self.depth.to_string(),
            self.time_enter.to_string(),
            self.memory_enter.to_string(),
            flag(self.is_user_defined),
            self.source_line.to_string(),
            list(&self.arguments),
            self.function_label.clone(),
            self.location_label.clone(),
            optional(self.time_exit),
            optional(self.memory_exit),
            self.time_usage.clone(),
            optional(self.memory_delta),
            self.return_value.clone(),
            self.function_count.to_string(),
            self.current_route.clone(),
        ]
    }

    fn from_row(row: &TableRow) -> Result<Self, OutputError> {
        Ok(Self {
            invocation_id: row.parse("invocationId")?,
            depth: row.parse("depth")?,
            time_enter: row.parse("timeEnter")?,
            memory_enter: row.parse("memoryEnter")?,
            is_user_defined: row.parse_flag("isUserDefined")?,
            source_line: row.parse("sourceLine")?,
            arguments: row.parse_list("arguments")?,
            function_label: row.text("functionLabel")?.to_string(),
            location_label: row.text("locationLabel")?.to_string(),
            time_exit: row.parse_optional("timeExit")?,
            memory_exit: row.parse_optional("memoryExit")?,
            time_usage: row.text("timeUsage")?.to_string(),
            memory_delta: row.parse_optional("memoryDelta")?,
            return_value: row.text("returnValue")?.to_string(),
            function_count: row.parse("functionCount")?,
            // Older tables may predate route stamping
            current_route: row.get("currentRoute").unwrap_or_default().to_string(),
        })
    }
}

impl TableRecord for SummaryRecord {
    fn headers() -> &'static [&'static str] {
        &CALL_HEADERS[..CALL_HEADERS.len() - 1]
    }

    fn to_fields(&self) -> Vec<String> {
        vec![
            self.invocation_id.to_string(),
            self.depth.to_string(),
            self.time_enter.to_string(),
            self.memory_enter.to_string(),
            flag(self.is_user_defined),
            self.source_line.to_string(),
            list(&self.arguments),
            self.function_label.clone(),
            self.location_label.clone(),
            optional(self.time_exit),
            optional(self.memory_exit),
            self.time_usage.clone(),
            optional(self.memory_delta),
            self.return_value.clone(),
            self.function_count.to_string(),
        ]
    }

    fn from_row(row: &TableRow) -> Result<Self, OutputError> {
        Ok(Self {
            invocation_id: row.parse("invocationId")?,
            depth: row.parse("depth")?,
            time_enter: row.parse("timeEnter")?,
            memory_enter: row.parse("memoryEnter")?,
            is_user_defined: row.parse_flag("isUserDefined")?,
            source_line: row.parse("sourceLine")?,
            arguments: row.parse_list("arguments")?,
            function_label: row.text("functionLabel")?.to_string(),
            location_label: row.text("locationLabel")?.to_string(),
            time_exit: row.parse_optional("timeExit")?,
            memory_exit: row.parse_optional("memoryExit")?,
            time_usage: row.text("timeUsage")?.to_string(),
            memory_delta: row.parse_optional("memoryDelta")?,
            return_value: row.text("returnValue")?.to_string(),
            function_count: row.parse("functionCount")?,
        })
    }
}
