//! Reshape result record lists into CSV text for client-side download.
//!
//! Pure data reshaping: the records are JSON objects exactly as they were
//! returned in the import response (`successful_transactions` /
//! `failed_transactions` entries).

use serde_json::Value;

use crate::error::{ExportError, ExportResult};

/// Render a list of flat JSON objects as CSV text.
///
/// Headers are the union of keys across all records, in order of first
/// appearance (serde_json objects iterate keys alphabetically).
/// Missing values become empty cells; null renders empty, scalars render
/// with their JSON display form.
pub fn records_to_csv(records: &[Value]) -> ExportResult<String> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut headers: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    if headers.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| cell_text(record.get(h)))
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Write(e.to_string()))
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
