//! Value formatting utilities.
//!
//! Shared by the output formatter and the exporters so a cell renders the
//! same way on screen, in CSV and in JSON:
//! - cell text (nulls become empty strings)
//! - JSON values that keep numbers and booleans typed
//! - human-readable byte sizes
//! - CSV serialization

mod csv;
mod value;

pub use csv::write_csv;
pub use value::{cell_to_json, cell_to_string, detect_value_kind, format_bytes, ValueKind};
