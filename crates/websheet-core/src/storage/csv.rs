//! CSV import/export functionality

use crate::error::Result;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};

/// Render rows as CSV: every field double-quoted (embedded quotes doubled),
/// fields comma-joined, rows newline-joined with no trailing newline.
pub fn write_csv(rows: &[Vec<String>]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut content = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

/// Parse CSV text into rows of fields. Rows may have differing lengths.
pub fn parse_csv(content: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
