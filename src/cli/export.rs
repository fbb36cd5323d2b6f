//! Export functionality for query results.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use arrow::array::RecordBatch;
use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExportError;
use crate::format::{cell_to_json, cell_to_string, detect_value_kind, write_csv, ValueKind};

/// Export file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// JSON Lines (one JSON object per row)
    Json,
    /// Excel workbook
    Xlsx,
}

impl ExportFormat {
    /// Infer export format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "csv" => Some(ExportFormat::Csv),
                "json" | "jsonl" | "ndjson" => Some(ExportFormat::Json),
                "xlsx" => Some(ExportFormat::Xlsx),
                _ => None,
            })
    }
}

/// Exports query results to various file formats.
pub struct Exporter;

impl Exporter {
    /// Export RecordBatches to a file, choosing the writer by extension.
    ///
    /// Returns the number of rows written. Nothing is created when the
    /// extension is not supported.
    pub fn export<P: AsRef<Path>>(
        path: P,
        batches: &[RecordBatch],
    ) -> Result<usize, ExportError> {
        let path = path.as_ref();
        let format =
            ExportFormat::from_path(path).ok_or_else(|| ExportError::UnsupportedFormat {
                filename: path.display().to_string(),
            })?;

        let total_rows: usize = batches.iter().map(|b| b.num_rows()).sum();

        match format {
            ExportFormat::Csv => Self::export_csv(path, batches)?,
            ExportFormat::Json => Self::export_json(path, batches)?,
            ExportFormat::Xlsx => Self::export_xlsx(path, batches)?,
        }

        tracing::info!("Exported {} rows to {}", total_rows, path.display());
        Ok(total_rows)
    }

    /// Export to CSV format.
    fn export_csv(path: &Path, batches: &[RecordBatch]) -> Result<(), ExportError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_csv(&mut writer, batches)?;
        writer.flush()?;
        Ok(())
    }

    /// Export to JSON Lines format.
    fn export_json(path: &Path, batches: &[RecordBatch]) -> Result<(), ExportError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for batch in batches {
            let schema = batch.schema();
            let kinds: Vec<ValueKind> = schema
                .fields()
                .iter()
                .map(|f| detect_value_kind(f))
                .collect();

            for row_idx in 0..batch.num_rows() {
                let mut obj = serde_json::Map::new();
                for (col_idx, field) in schema.fields().iter().enumerate() {
                    let column = batch.column(col_idx).as_ref();
                    let value = cell_to_json(column, row_idx, kinds[col_idx]);
                    obj.insert(field.name().clone(), value);
                }
                writeln!(writer, "{}", serde_json::Value::Object(obj))?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    /// Export to the first sheet of an Excel workbook.
    fn export_xlsx(path: &Path, batches: &[RecordBatch]) -> Result<(), ExportError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        let header_format = Format::new().set_bold();

        if let Some(first) = batches.first() {
            for (col_idx, field) in first.schema().fields().iter().enumerate() {
                let col_num = col_index(col_idx)?;
                worksheet.write_string_with_format(0, col_num, field.name(), &header_format)?;
            }
        }

        let mut row: u32 = 1;
        for batch in batches {
            let schema = batch.schema();
            let kinds: Vec<ValueKind> = schema
                .fields()
                .iter()
                .map(|f| detect_value_kind(f))
                .collect();

            for row_idx in 0..batch.num_rows() {
                for (col_idx, col) in batch.columns().iter().enumerate() {
                    if col.is_null(row_idx) {
                        continue;
                    }
                    let col_num = col_index(col_idx)?;
                    let text = cell_to_string(col.as_ref(), row_idx);

                    match kinds[col_idx] {
                        kind if kind.is_numeric() => match text.parse::<f64>() {
                            Ok(n) => worksheet.write_number(row, col_num, n)?,
                            Err(_) => worksheet.write_string(row, col_num, &text)?,
                        },
                        ValueKind::Boolean => {
                            worksheet.write_boolean(row, col_num, text == "true")?
                        }
                        _ => worksheet.write_string(row, col_num, &text)?,
                    };
                }
                row += 1;
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

fn col_index(idx: usize) -> Result<u16, ExportError> {
    u16::try_from(idx).map_err(|_| ExportError::Xlsx(format!("Too many columns: {}", idx + 1)))
}
