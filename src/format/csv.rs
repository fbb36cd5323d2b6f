//! CSV serialization shared by the `--format csv` renderer and `\s` export.

use std::io::Write;

use arrow::array::RecordBatch;
use arrow::csv::WriterBuilder;
use arrow::error::ArrowError;

/// Write batches as RFC 4180 CSV with a header row.
///
/// Nulls are empty fields. A record whose only field is empty is written as
/// `""` so it does not collapse into a blank line.
pub fn write_csv<W: Write>(writer: W, batches: &[RecordBatch]) -> Result<(), ArrowError> {
    let mut csv = WriterBuilder::new().with_header(true).build(writer);
    for batch in batches {
        csv.write(batch)?;
    }
    Ok(())
}
