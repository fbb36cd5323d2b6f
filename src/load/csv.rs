//! CSV decoding via `arrow::csv`.

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{Field, Schema};

use super::{dedup_column_names, LoadedTable, BATCH_SIZE};
use crate::error::LoadError;
use crate::io::{Compression, FileDecoder};

/// Decode a CSV file with a header row, inferring column types from all rows.
pub(super) fn load_csv(path: &Path, compression: Compression) -> Result<LoadedTable, LoadError> {
    let data = FileDecoder::open(path, compression)?.into_bytes()?;

    let format = Format::default().with_header(true);
    let (inferred, _) = format.infer_schema(Cursor::new(&data), None)?;

    // Repeated header names would make every query on the table ambiguous.
    let names = dedup_column_names(inferred.fields().iter().map(|f| f.name().clone()).collect());
    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .zip(names)
        .map(|(field, name)| Field::new(name, field.data_type().clone(), true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .with_batch_size(BATCH_SIZE)
        .build(Cursor::new(data))?;

    let batches = reader.collect::<Result<Vec<_>, _>>()?;

    Ok(LoadedTable { schema, batches })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::DataType;
    use tempfile::tempdir;

    #[test]
    fn test_load_csv_infers_types() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        let content = "id,name,score\n1,Alice,9.5\n2,Bob,7.25\n3,\"Smith, J\",8\n";
        std::fs::write(&path, content).unwrap();

        let table = load_csv(&path, Compression::None).unwrap();

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.num_columns(), 3);
        assert_eq!(table.schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(table.schema.field(1).data_type(), &DataType::Utf8);
        assert_eq!(table.schema.field(2).data_type(), &DataType::Float64);
    }

    #[test]
    fn test_load_csv_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "a,b\n").unwrap();

        let table = load_csv(&path, Compression::None).unwrap();

        assert_eq!(table.num_columns(), 2);
        assert_eq!(table.num_rows(), 0);
    }

    #[test]
    fn test_load_csv_duplicate_headers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dup.csv");
        std::fs::write(&path, "x,x\n1,2\n").unwrap();

        let table = load_csv(&path, Compression::None).unwrap();

        assert_eq!(table.schema.field(0).name(), "x");
        assert_eq!(table.schema.field(1).name(), "x.1");
    }

    #[test]
    fn test_load_csv_ragged_rows_fail() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2\n3\n").unwrap();

        assert!(load_csv(&path, Compression::None).is_err());
    }
}
