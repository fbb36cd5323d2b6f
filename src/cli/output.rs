//! Output formatting for query results.
//!
//! Results render as a table (borderless by default, boxed in pretty mode),
//! CSV or JSON Lines. Table info and listings always render as tables.

use std::io::Write;

use arrow::array::RecordBatch;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::{modifiers, Cell, CellAlignment, Table};

use super::OutputFormat;
use crate::catalog::{TableInfo, TableSummary};
use crate::format::{
    cell_to_json, cell_to_string, detect_value_kind, format_bytes, write_csv, ValueKind,
};

/// Formats query results for output.
pub struct OutputFormatter {
    format: OutputFormat,
    pretty: bool,
}

impl OutputFormatter {
    /// Create a new formatter with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Draw table borders.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        if self.pretty {
            table.load_preset(UTF8_FULL).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
        } else {
            table.load_preset(NOTHING);
        }
        table
    }

    /// Format query results and write them to the given writer.
    pub fn write_batches<W: Write>(
        &self,
        batches: &[RecordBatch],
        writer: &mut W,
    ) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(batches, writer),
            OutputFormat::Csv => self.write_csv(batches, writer),
            OutputFormat::Json => self.write_json(batches, writer),
        }
    }

    fn write_table<W: Write>(
        &self,
        batches: &[RecordBatch],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let Some(first) = batches.first() else {
            return Ok(());
        };

        let schema = first.schema();
        let kinds: Vec<ValueKind> =
            schema.fields().iter().map(|f| detect_value_kind(f)).collect();

        let mut table = self.new_table();
        table.set_header(schema.fields().iter().map(|f| Cell::new(f.name())));

        for batch in batches {
            for row_idx in 0..batch.num_rows() {
                let row = batch.columns().iter().zip(&kinds).map(|(col, kind)| {
                    let cell = Cell::new(cell_to_string(col.as_ref(), row_idx));
                    if kind.is_numeric() {
                        cell.set_alignment(CellAlignment::Right)
                    } else {
                        cell
                    }
                });
                table.add_row(row);
            }
        }

        writeln!(writer, "{table}")
    }

    fn write_csv<W: Write>(&self, batches: &[RecordBatch], writer: &mut W) -> std::io::Result<()> {
        write_csv(&mut *writer, batches).map_err(std::io::Error::other)
    }

    fn write_json<W: Write>(
        &self,
        batches: &[RecordBatch],
        writer: &mut W,
    ) -> std::io::Result<()> {
        for batch in batches {
            let schema = batch.schema();
            let kinds: Vec<ValueKind> =
                schema.fields().iter().map(|f| detect_value_kind(f)).collect();

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

        Ok(())
    }

    /// Write every row as `column  value` lines, rows separated by a blank line.
    pub fn write_transposed<W: Write>(
        &self,
        batches: &[RecordBatch],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let mut first_row = true;

        for batch in batches {
            let schema = batch.schema();
            let width = schema
                .fields()
                .iter()
                .map(|f| f.name().chars().count())
                .max()
                .unwrap_or(0);

            for row_idx in 0..batch.num_rows() {
                if !first_row {
                    writeln!(writer)?;
                }
                first_row = false;

                for (field, col) in schema.fields().iter().zip(batch.columns()) {
                    let value = cell_to_string(col.as_ref(), row_idx);
                    writeln!(writer, "{:<width$}  {}", field.name(), value)?;
                }
            }
        }

        Ok(())
    }

    /// Describe a single table: per-column non-null counts and types.
    pub fn write_table_info<W: Write>(
        &self,
        info: &TableInfo,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(writer, "Table: {} ({})", info.name, info.source.display())?;
        writeln!(
            writer,
            "Rows: {}, Columns: {}",
            info.rows,
            info.columns.len()
        )?;

        let mut table = self.new_table();
        table.set_header(vec!["#", "Column", "Non-Null Count", "Dtype"]);
        for (idx, column) in info.columns.iter().enumerate() {
            table.add_row(vec![
                Cell::new(idx).set_alignment(CellAlignment::Right),
                Cell::new(&column.name),
                Cell::new(format!("{} non-null", column.non_null)),
                Cell::new(&column.data_type),
            ]);
        }
        writeln!(writer, "{table}")?;
        writeln!(writer, "Memory usage: {}", format_bytes(info.bytes))
    }

    /// List tables with their sizes.
    pub fn write_summaries<W: Write>(
        &self,
        summaries: &[TableSummary],
        writer: &mut W,
    ) -> std::io::Result<()> {
        let mut table = self.new_table();
        table.set_header(vec!["Table", "Rows", "Columns", "Bytes"]);
        for summary in summaries {
            table.add_row(vec![
                Cell::new(&summary.name),
                Cell::new(summary.rows).set_alignment(CellAlignment::Right),
                Cell::new(summary.columns).set_alignment(CellAlignment::Right),
                Cell::new(summary.bytes).set_alignment(CellAlignment::Right),
            ]);
        }
        writeln!(writer, "{table}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;

    use arrow::array::{Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    use crate::catalog::ColumnInfo;

    fn create_test_batch() -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("city", DataType::Utf8, true),
            Field::new("population", DataType::Int64, true),
        ]);

        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(vec![Some("Oslo, NO"), None])),
                Arc::new(Int64Array::from(vec![Some(709037), Some(42)])),
            ],
        )
        .unwrap()
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>,
    {
        let mut output = Vec::new();
        f(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_table_output() {
        let batch = create_test_batch();
        let formatter = OutputFormatter::new(OutputFormat::Table);
        let output = render(|w| formatter.write_batches(&[batch], w));

        assert!(output.contains("city"));
        assert!(output.contains("Oslo, NO"));
        assert!(output.contains("709037"));
        assert!(!output.contains('│'));
    }

    #[test]
    fn test_pretty_table_has_borders() {
        let batch = create_test_batch();
        let formatter = OutputFormatter::new(OutputFormat::Table).with_pretty(true);
        let output = render(|w| formatter.write_batches(&[batch], w));

        assert!(output.contains('│'));
    }

    #[test]
    fn test_csv_output() {
        let batch = create_test_batch();
        let formatter = OutputFormatter::new(OutputFormat::Csv);
        let output = render(|w| formatter.write_batches(&[batch], w));

        assert_eq!(output, "city,population\n\"Oslo, NO\",709037\n,42\n");
    }

    #[test]
    fn test_csv_output_single_null_column() {
        let schema = Schema::new(vec![Field::new("city", DataType::Utf8, true)]);
        let batch = RecordBatch::try_new(
            Arc::new(schema),
            vec![Arc::new(StringArray::from(vec![Some("Oslo"), None]))],
        )
        .unwrap();
        let formatter = OutputFormatter::new(OutputFormat::Csv);
        let output = render(|w| formatter.write_batches(&[batch], w));

        assert_eq!(output, "city\nOslo\n\"\"\n");
    }

    #[test]
    fn test_json_output() {
        let batch = create_test_batch();
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let output = render(|w| formatter.write_batches(&[batch], w));

        assert!(output.contains("\"city\":\"Oslo, NO\""));
        assert!(output.contains("\"population\":42"));
        assert!(output.contains("\"city\":null"));
    }

    #[test]
    fn test_transposed_output() {
        let batch = create_test_batch();
        let formatter = OutputFormatter::new(OutputFormat::Table);
        let output = render(|w| formatter.write_transposed(&[batch], w));

        assert_eq!(
            output,
            "city        Oslo, NO\npopulation  709037\n\ncity        \npopulation  42\n"
        );
    }

    #[test]
    fn test_table_info_output() {
        let info = TableInfo {
            name: "cities_csv".to_string(),
            source: PathBuf::from("cities.csv"),
            rows: 2,
            columns: vec![ColumnInfo {
                name: "city".to_string(),
                non_null: 1,
                data_type: "Utf8".to_string(),
            }],
            bytes: 2048,
        };
        let formatter = OutputFormatter::new(OutputFormat::Table);
        let output = render(|w| formatter.write_table_info(&info, w));

        assert!(output.contains("Table: cities_csv (cities.csv)"));
        assert!(output.contains("Non-Null Count"));
        assert!(output.contains("1 non-null"));
        assert!(output.contains("Memory usage: 2.0 KB"));
    }

    #[test]
    fn test_summaries_output() {
        let summaries = vec![TableSummary {
            name: "cities_csv".to_string(),
            rows: 2,
            columns: 3,
            bytes: 512,
        }];
        let formatter = OutputFormatter::new(OutputFormat::Table);
        let output = render(|w| formatter.write_summaries(&summaries, w));

        assert!(output.contains("Table"));
        assert!(output.contains("cities_csv"));
        assert!(output.contains("512"));
    }
}
