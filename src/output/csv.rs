//! Comma-separated value encoding.
//!
//! Fields containing commas, quotes or line breaks are quoted with
//! doubled inner quotes. A line with no content at all is a blank
//! separator row and parses to an empty field list.

/// Escape CSV field (handle commas, quotes, newlines)
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format one row, without the line terminator
pub fn format_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Split CSV content into rows of fields
///
/// Quoted fields may span lines. Blank lines come back as empty rows so
/// callers can tell run separators apart from data.
pub fn parse_rows(content: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut has_content = false;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                has_content = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                has_content = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\r' | '\n' => {
                if has_content {
                    row.push(std::mem::take(&mut field));
                }
                rows.push(std::mem::take(&mut row));
                has_content = false;
            }
            _ => {
                field.push(c);
                has_content = true;
            }
        }
    }

    if has_content {
        row.push(field);
        rows.push(row);
    }

    rows
}
