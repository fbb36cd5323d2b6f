//! XLSX decoding via `calamine`.
//!
//! Only the first worksheet is read. Its first row provides column names;
//! every other row is data.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use calamine::{Data, DataType as _, Reader, Xlsx};

use super::{dedup_column_names, LoadedTable};
use crate::error::LoadError;
use crate::io::{Compression, FileDecoder};

/// Column type inferred from the non-empty cells of a sheet column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Empty,
    Bool,
    Int,
    Float,
    Text,
}

impl ColumnKind {
    fn of(cell: &Data) -> Self {
        match cell {
            Data::Empty => ColumnKind::Empty,
            Data::Bool(_) => ColumnKind::Bool,
            Data::Int(_) => ColumnKind::Int,
            Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => ColumnKind::Int,
            Data::Float(_) => ColumnKind::Float,
            _ => ColumnKind::Text,
        }
    }

    fn merge(self, other: Self) -> Self {
        use ColumnKind::*;
        match (self, other) {
            (Empty, k) | (k, Empty) => k,
            (a, b) if a == b => a,
            (Int, Float) | (Float, Int) => Float,
            _ => Text,
        }
    }

    fn data_type(self) -> DataType {
        match self {
            ColumnKind::Bool => DataType::Boolean,
            ColumnKind::Int => DataType::Int64,
            ColumnKind::Float => DataType::Float64,
            ColumnKind::Empty | ColumnKind::Text => DataType::Utf8,
        }
    }
}

/// Decode the first worksheet of an XLSX workbook.
pub(super) fn load_xlsx(path: &Path, compression: Compression) -> Result<LoadedTable, LoadError> {
    let data = FileDecoder::open(path, compression)?.into_bytes()?;
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::Xlsx("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(LoadError::EmptyInput);
    };
    let body: Vec<&[Data]> = rows.collect();

    let names = dedup_column_names(
        header
            .iter()
            .enumerate()
            .map(|(idx, cell)| match cell {
                Data::Empty => format!("column_{idx}"),
                other => cell_text(other),
            })
            .collect(),
    );

    let mut fields = Vec::with_capacity(names.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(names.len());

    for (col_idx, name) in names.into_iter().enumerate() {
        let cells: Vec<&Data> = body
            .iter()
            .map(|row| row.get(col_idx).unwrap_or(&Data::Empty))
            .collect();
        let kind = cells
            .iter()
            .fold(ColumnKind::Empty, |acc, cell| acc.merge(ColumnKind::of(cell)));

        fields.push(Field::new(name, kind.data_type(), true));
        columns.push(build_column(kind, &cells));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns)
        .map_err(|e| LoadError::Xlsx(e.to_string()))?;

    Ok(LoadedTable {
        schema,
        batches: vec![batch],
    })
}

fn build_column(kind: ColumnKind, cells: &[&Data]) -> ArrayRef {
    match kind {
        ColumnKind::Bool => Arc::new(
            cells
                .iter()
                .map(|c| match c {
                    Data::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<BooleanArray>(),
        ),
        ColumnKind::Int => Arc::new(
            cells
                .iter()
                .map(|c| match c {
                    Data::Int(i) => Some(*i),
                    Data::Float(f) => Some(*f as i64),
                    _ => None,
                })
                .collect::<Int64Array>(),
        ),
        ColumnKind::Float => Arc::new(
            cells
                .iter()
                .map(|c| match c {
                    Data::Int(i) => Some(*i as f64),
                    Data::Float(f) => Some(*f),
                    _ => None,
                })
                .collect::<Float64Array>(),
        ),
        ColumnKind::Empty | ColumnKind::Text => Arc::new(
            cells
                .iter()
                .map(|c| match c {
                    Data::Empty => None,
                    other => Some(cell_text(other)),
                })
                .collect::<StringArray>(),
        ),
    }
}

/// Text form of a cell; dates are rendered as ISO-8601.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| cell.to_string()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Array;
    use tempfile::tempdir;

    fn write_workbook(path: &Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "id").unwrap();
        sheet.write_string(0, 1, "price").unwrap();
        sheet.write_string(0, 2, "label").unwrap();
        sheet.write_string(0, 3, "active").unwrap();

        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_number(1, 1, 9.99).unwrap();
        sheet.write_string(1, 2, "first").unwrap();
        sheet.write_boolean(1, 3, true).unwrap();

        sheet.write_number(2, 0, 2.0).unwrap();
        sheet.write_number(2, 1, 5.0).unwrap();
        sheet.write_number(2, 2, 42.0).unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_load_xlsx_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        write_workbook(&path);

        let table = load_xlsx(&path, Compression::None).unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), 4);
        assert_eq!(table.schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(table.schema.field(1).data_type(), &DataType::Float64);
        assert_eq!(table.schema.field(2).data_type(), &DataType::Utf8);
        assert_eq!(table.schema.field(3).data_type(), &DataType::Boolean);

        let active = table.batches[0].column(3);
        assert!(active.is_null(1));
    }

    #[test]
    fn test_kind_merge() {
        assert_eq!(ColumnKind::Empty.merge(ColumnKind::Int), ColumnKind::Int);
        assert_eq!(ColumnKind::Int.merge(ColumnKind::Float), ColumnKind::Float);
        assert_eq!(ColumnKind::Bool.merge(ColumnKind::Int), ColumnKind::Text);
        assert_eq!(ColumnKind::Text.merge(ColumnKind::Empty), ColumnKind::Text);
    }

    #[test]
    fn test_kind_of_integral_float() {
        assert_eq!(ColumnKind::of(&Data::Float(3.0)), ColumnKind::Int);
        assert_eq!(ColumnKind::of(&Data::Float(3.5)), ColumnKind::Float);
        assert_eq!(ColumnKind::of(&Data::String("x".into())), ColumnKind::Text);
    }
}
