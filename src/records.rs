use crate::filter::FieldList;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use thiserror::Error;

/// A record loaded from a JSON source
pub type JsonRecord = Map<String, Value>;

/// Name used for standard input in paths and error messages
pub const STDIN_NAME: &str = "-";

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid JSON in '{path}' at line {line}: {source}")]
    Json {
        path: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid JSON5 array in '{path}': {message}")]
    Json5 { path: String, message: String },
    #[error("Record #{index} in '{path}' is not an object")]
    NotAnObject { path: String, index: usize },
}

/// Load records from a file, or from stdin when `path` is `-`
pub fn load_records(path: &Path) -> Result<Vec<JsonRecord>, RecordsError> {
    let name = path.display().to_string();
    let text = if name == STDIN_NAME {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| RecordsError::Io {
                path: name.clone(),
                source,
            })?;
        text
    } else {
        fs::read_to_string(path).map_err(|source| RecordsError::Io {
            path: name.clone(),
            source,
        })?
    };

    let records = parse_records(&text, &name)?;
    debug!("loaded {} record(s) from {}", records.len(), name);
    Ok(records)
}

/// Parse records from text.
///
/// Text starting with `[` is a JSON5 array of objects; anything else is
/// newline-delimited JSON with one object per non-blank line.
pub fn parse_records(text: &str, source: &str) -> Result<Vec<JsonRecord>, RecordsError> {
    if text.trim_start().starts_with('[') {
        let values = json5::from_str::<Vec<Value>>(text).map_err(|e| RecordsError::Json5 {
            path: source.to_string(),
            message: e.to_string(),
        })?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| into_record(value, source, index))
            .collect();
    }

    let mut records = Vec::new();
    for (line_idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value = serde_json::from_str::<Value>(line).map_err(|source_err| RecordsError::Json {
            path: source.to_string(),
            line: line_idx + 1,
            source: source_err,
        })?;
        let index = records.len();
        records.push(into_record(value, source, index)?);
    }

    Ok(records)
}

fn into_record(value: Value, source: &str, index: usize) -> Result<JsonRecord, RecordsError> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(RecordsError::NotAnObject {
            path: source.to_string(),
            index,
        }),
    }
}

/// Every key used by the records, in first-seen order
pub fn collect_field_names(records: &[JsonRecord]) -> FieldList {
    let mut seen = HashSet::new();
    let mut fields = Vec::new();
    for record in records {
        for key in record.keys() {
            if seen.insert(key.as_str()) {
                fields.push(key.clone());
            }
        }
    }
    FieldList::from(fields)
}
