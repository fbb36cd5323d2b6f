//! Cell formatting and type detection.

use arrow::array::Array;
use arrow::datatypes::{DataType, Field};

/// How a column's values should be represented outside Arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Signed integers
    Integer,
    /// Unsigned integers
    Unsigned,
    /// Floating point and decimals
    Float,
    /// Booleans
    Boolean,
    /// Everything else, rendered as text
    Text,
}

impl ValueKind {
    /// Whether spreadsheet writers should store the value as a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Integer | ValueKind::Unsigned | ValueKind::Float)
    }
}

/// Detect the value kind of a column from its Arrow type.
pub fn detect_value_kind(field: &Field) -> ValueKind {
    match field.data_type() {
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => ValueKind::Integer,
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            ValueKind::Unsigned
        }
        DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => ValueKind::Float,
        DataType::Boolean => ValueKind::Boolean,
        _ => ValueKind::Text,
    }
}

/// Format a single cell as text. Nulls become an empty string.
pub fn cell_to_string(col: &dyn Array, row_idx: usize) -> String {
    if col.is_null(row_idx) {
        return String::new();
    }
    arrow::util::display::array_value_to_string(col, row_idx).unwrap_or_else(|_| "?".to_string())
}

/// Convert a single cell into a JSON value, keeping numbers and booleans typed.
pub fn cell_to_json(col: &dyn Array, row_idx: usize, kind: ValueKind) -> serde_json::Value {
    use serde_json::Value;

    if col.is_null(row_idx) {
        return Value::Null;
    }

    let text = cell_to_string(col, row_idx);
    match kind {
        ValueKind::Integer => text
            .parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::String(text)),
        ValueKind::Unsigned => text
            .parse::<u64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or(Value::String(text)),
        ValueKind::Float => match text.parse::<f64>() {
            Ok(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Err(_) => Value::String(text),
        },
        ValueKind::Boolean => match text.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::String(text),
        },
        ValueKind::Text => Value::String(text),
    }
}

/// Format a byte count with a binary unit suffix.
///
/// # Example
///
/// ```
/// use localsql::format::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(2048), "2.0 KB");
/// assert_eq!(format_bytes(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
/// ```
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}
