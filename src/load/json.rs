//! JSON decoding.
//!
//! Documents are parsed with `serde_json` into row objects, nested values
//! are turned into their JSON text, and the rows are handed to the
//! `arrow::json` decoder with an inferred schema.

use std::collections::HashSet;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use arrow::json::reader::infer_json_schema_from_iterator;
use arrow::json::ReaderBuilder;
use serde_json::{Map, Value};

use super::{LoadedTable, BATCH_SIZE};
use crate::error::LoadError;
use crate::io::{Compression, FileDecoder};

type Row = Map<String, Value>;

/// Column name used for JSON values that are not objects.
const SCALAR_COLUMN: &str = "0";

/// Decode a JSON file as a whole document, falling back to one value per line.
pub(super) fn load_json(path: &Path, compression: Compression) -> Result<LoadedTable, LoadError> {
    let data = FileDecoder::open(path, compression)?.into_bytes()?;

    let rows = match serde_json::from_slice::<Value>(&data) {
        Ok(document) => rows_from_document(document),
        Err(e) => {
            tracing::debug!("Not a single JSON document ({}), trying JSON lines", e);
            rows_from_lines(&data)?
        }
    };

    rows_to_table(rows)
}

/// Decode a JSON lines file, flattening nested objects into dotted columns.
///
/// If the very first line fails to decode the file is re-read as a whole
/// document instead. Only gzip is accepted as a compressor.
pub(super) fn load_json_normalized(
    path: &Path,
    compression: Compression,
) -> Result<LoadedTable, LoadError> {
    if !matches!(compression, Compression::None | Compression::Gzip) {
        return Err(LoadError::UnsupportedCompression {
            compressor: compression.to_string(),
        });
    }

    let reader = BufReader::new(FileDecoder::open(path, compression)?);
    let mut rows: Vec<Row> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let parsed = line
            .map_err(LoadError::from)
            .and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    serde_json::from_str::<Value>(&line).map(Some).map_err(LoadError::from)
                }
            });

        match parsed {
            Ok(Some(value)) => rows.extend(flatten_value(value)),
            Ok(None) => continue,
            Err(e) if rows.is_empty() => {
                tracing::debug!("Line {} is not JSON ({}), reading as a document", idx + 1, e);
                return load_json_document(path, compression);
            }
            Err(e) => return Err(LoadError::Json(format!("line {}: {}", idx + 1, e))),
        }
    }

    rows_to_table(rows)
}

/// Re-open the file and decode it as a single document.
fn load_json_document(path: &Path, compression: Compression) -> Result<LoadedTable, LoadError> {
    let decoder = FileDecoder::open(path, compression)?;
    let document: Value = serde_json::from_reader(BufReader::new(decoder))?;
    rows_to_table(rows_from_document(document))
}

/// Split a parsed document into rows.
///
/// Arrays give one row per element. An object whose values are all objects
/// is read column-wise (`{"col": {"row": value}}`); any other object is a
/// single row.
fn rows_from_document(document: Value) -> Vec<Row> {
    match document {
        Value::Array(items) => items.into_iter().map(into_row).collect(),
        Value::Object(map) if !map.is_empty() && map.values().all(Value::is_object) => {
            rows_from_columns(map)
        }
        other => vec![into_row(other)],
    }
}

/// Row keys keep first-seen order across columns.
fn rows_from_columns(columns: Row) -> Vec<Row> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut row_keys: Vec<String> = Vec::new();
    for column in columns.values() {
        if let Value::Object(cells) = column {
            for key in cells.keys() {
                if seen.insert(key.as_str()) {
                    row_keys.push(key.clone());
                }
            }
        }
    }

    row_keys
        .iter()
        .map(|key| {
            columns
                .iter()
                .map(|(name, column)| {
                    let cell = column.get(key).cloned().unwrap_or(Value::Null);
                    (name.clone(), cell)
                })
                .collect()
        })
        .collect()
}

fn rows_from_lines(data: &[u8]) -> Result<Vec<Row>, LoadError> {
    let mut rows = Vec::new();
    for (idx, line) in data.split(|b| *b == b'\n').enumerate() {
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let value: Value = serde_json::from_slice(line)
            .map_err(|e| LoadError::Json(format!("line {}: {}", idx + 1, e)))?;
        rows.push(into_row(value));
    }
    Ok(rows)
}

fn into_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        other => {
            let mut row = Map::new();
            row.insert(SCALAR_COLUMN.to_string(), other);
            row
        }
    }
}

/// Flatten one parsed line into rows with dotted column names.
fn flatten_value(value: Value) -> Vec<Row> {
    match value {
        Value::Array(items) => items.into_iter().flat_map(flatten_value).collect(),
        Value::Object(map) => {
            let mut row = Map::new();
            flatten_into("", map, &mut row);
            vec![row]
        }
        other => vec![into_row(other)],
    }
}

fn flatten_into(prefix: &str, map: Row, out: &mut Row) {
    for (key, value) in map {
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) if !inner.is_empty() => flatten_into(&name, inner, out),
            other => {
                out.insert(name, other);
            }
        }
    }
}

/// Replace arrays and objects with their JSON text.
fn stringify_nested(row: Row) -> Row {
    row.into_iter()
        .map(|(key, value)| match value {
            Value::Array(_) | Value::Object(_) => (key, Value::String(value.to_string())),
            scalar => (key, scalar),
        })
        .collect()
}

fn rows_to_table(rows: Vec<Row>) -> Result<LoadedTable, LoadError> {
    let values: Vec<Value> = rows
        .into_iter()
        .map(|row| Value::Object(stringify_nested(row)))
        .collect();

    let schema = infer_json_schema_from_iterator(values.iter().map(Ok))
        .map_err(|e| LoadError::Json(e.to_string()))?;
    let schema = Arc::new(schema);

    let mut decoder = ReaderBuilder::new(schema.clone())
        .with_batch_size(BATCH_SIZE)
        .with_coerce_primitive(true)
        .build_decoder()
        .map_err(|e| LoadError::Json(e.to_string()))?;

    let mut batches = Vec::new();
    for chunk in values.chunks(BATCH_SIZE) {
        decoder
            .serialize(chunk)
            .map_err(|e| LoadError::Json(e.to_string()))?;
        if let Some(batch) = decoder.flush().map_err(|e| LoadError::Json(e.to_string()))? {
            batches.push(batch);
        }
    }

    Ok(LoadedTable { schema, batches })
}
