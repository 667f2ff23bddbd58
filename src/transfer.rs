//! Bulk-load and export file formats
//!
//! The console accepts CSV (optional header row) or JSON array-of-objects
//! uploads as bulk-insert sources, and writes CSV (relational/wide-column)
//! or JSON (document store) downloads. This is the collaborator boundary:
//! nothing in here touches a backend.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::{Result, StoreError};

/// Read a CSV file into `(headers, rows)`
///
/// `include_header` is the form's "on"/"off" flag. When "on", the first line
/// becomes the header list; otherwise headers come back empty and every line
/// is data.
pub fn read_csv(path: impl AsRef<Path>, include_header: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading CSV file");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let header_expected = include_header.trim().eq_ignore_ascii_case("on");
    let mut headers = Vec::new();
    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let values: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();

        if header_expected && index == 0 {
            headers = values;
            continue;
        }
        rows.push(values);
    }

    Ok((headers, rows))
}

/// Read a JSON file containing an array of objects
pub fn read_json_records(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading JSON file");

    let file = File::open(path)?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| StoreError::malformed(format!("invalid JSON file: {e}")))?;

    match value {
        serde_json::Value::Array(records) => Ok(records),
        serde_json::Value::Object(_) => Ok(vec![value]),
        _ => Err(StoreError::malformed(
            "JSON file must contain an array of objects",
        )),
    }
}

/// Read a CSV file with a header row into JSON objects, one per data row
///
/// Every cell becomes a string value keyed by its header, preserving column
/// order within each record.
pub fn csv_to_json(path: impl AsRef<Path>) -> Result<Vec<serde_json::Value>> {
    let path = path.as_ref();
    info!(path = %path.display(), "converting CSV file to JSON records");

    let mut reader = csv::ReaderBuilder::new().from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut object = serde_json::Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            object.insert(
                header.clone(),
                serde_json::Value::String(cell.to_string()),
            );
        }
        records.push(serde_json::Value::Object(object));
    }

    Ok(records)
}

/// Write an export CSV: header row always written, then the data rows
///
/// Zero data rows is a caller-visible error — the download use case treats
/// an empty result as "no records found", not as an empty file.
pub fn write_csv(path: impl AsRef<Path>, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    let path = path.as_ref();

    if rows.is_empty() {
        return Err(StoreError::not_found("no records found"));
    }

    info!(path = %path.display(), rows = rows.len(), "writing CSV export");

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Write a JSON export blob
pub fn write_json(path: impl AsRef<Path>, value: &serde_json::Value) -> Result<()> {
    let path = path.as_ref();
    info!(path = %path.display(), "writing JSON export");

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    Ok(())
}
