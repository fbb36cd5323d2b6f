//! In-memory table registry.
//!
//! Keeps loaded tables in load order, keyed by their derived name. The SQL
//! engine holds its own reference to the same batches; this registry is what
//! the session consults for listings, table info and completions.

use std::path::{Path, PathBuf};

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;

use crate::load::LoadedTable;

/// A loaded table.
#[derive(Debug, Clone)]
pub struct Table {
    name: String,
    source: PathBuf,
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Table {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>, loaded: LoadedTable) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            schema: loaded.schema,
            batches: loaded.batches,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the table was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    /// Memory held by the table's arrays, in bytes.
    pub fn memory_size(&self) -> usize {
        self.batches.iter().map(|b| b.get_array_memory_size()).sum()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.schema.fields().iter().map(|f| f.name().as_str())
    }

    /// Row count, column count and size.
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            name: self.name.clone(),
            rows: self.num_rows(),
            columns: self.num_columns(),
            bytes: self.memory_size(),
        }
    }

    /// Per-column details: non-null counts and types.
    pub fn info(&self) -> TableInfo {
        let columns = self
            .schema
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let nulls: usize = self.batches.iter().map(|b| b.column(idx).null_count()).sum();
                ColumnInfo {
                    name: field.name().clone(),
                    non_null: self.num_rows() - nulls,
                    data_type: field.data_type().to_string(),
                }
            })
            .collect();

        TableInfo {
            name: self.name.clone(),
            source: self.source.clone(),
            rows: self.num_rows(),
            columns,
            bytes: self.memory_size(),
        }
    }
}

/// One line of the table description listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
    pub bytes: usize,
}

/// Column details for a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub data_type: String,
}

/// Detailed description of a single table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub name: String,
    pub source: PathBuf,
    pub rows: usize,
    pub columns: Vec<ColumnInfo>,
    pub bytes: usize,
}

/// Tables by name, in registration order.
#[derive(Debug, Default)]
pub struct TableRegistry {
    tables: Vec<Table>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table with the same name in place.
    ///
    /// Returns the replaced table, if any.
    pub fn insert(&mut self, table: Table) -> Option<Table> {
        match self.tables.iter().position(|t| t.name == table.name) {
            Some(idx) => Some(std::mem::replace(&mut self.tables[idx], table)),
            None => {
                self.tables.push(table);
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tables.iter().map(|t| t.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    /// Summaries of all tables in registration order.
    pub fn describe(&self) -> Vec<TableSummary> {
        self.tables.iter().map(Table::summary).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::{Int32Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn loaded(rows: i32) -> LoadedTable {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int32, false),
            Field::new("name", DataType::Utf8, true),
        ]));
        let ids = Int32Array::from((0..rows).collect::<Vec<_>>());
        let names = StringArray::from(
            (0..rows)
                .map(|i| if i % 2 == 0 { Some("x") } else { None })
                .collect::<Vec<_>>(),
        );
        let batch =
            RecordBatch::try_new(schema.clone(), vec![Arc::new(ids), Arc::new(names)]).unwrap();
        LoadedTable {
            schema,
            batches: vec![batch],
        }
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut registry = TableRegistry::new();
        registry.insert(Table::new("b_csv", "b.csv", loaded(1)));
        registry.insert(Table::new("a_csv", "a.csv", loaded(2)));

        assert_eq!(registry.names(), vec!["b_csv", "a_csv"]);
        assert_eq!(registry.names().len(), 2);
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut registry = TableRegistry::new();
        registry.insert(Table::new("t_csv", "one/t.csv", loaded(1)));
        registry.insert(Table::new("other", "o.csv", loaded(1)));
        let replaced = registry.insert(Table::new("t_csv", "two/t.csv", loaded(5)));

        assert_eq!(replaced.unwrap().source(), Path::new("one/t.csv"));
        assert_eq!(registry.names(), vec!["t_csv", "other"]);
        assert_eq!(registry.get("t_csv").unwrap().num_rows(), 5);
    }

    #[test]
    fn test_describe() {
        let mut registry = TableRegistry::new();
        registry.insert(Table::new("t", "t.csv", loaded(4)));

        let summaries = registry.describe();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "t");
        assert_eq!(summaries[0].rows, 4);
        assert_eq!(summaries[0].columns, 2);
        assert!(summaries[0].bytes > 0);
    }

    #[test]
    fn test_info_counts_nulls() {
        let table = Table::new("t", "t.csv", loaded(4));
        let info = table.info();

        assert_eq!(info.rows, 4);
        assert_eq!(info.columns[0].non_null, 4);
        assert_eq!(info.columns[1].non_null, 2);
        assert_eq!(info.columns[1].data_type, "Utf8");
    }

    #[test]
    fn test_lookup() {
        let mut registry = TableRegistry::new();
        assert!(registry.is_empty());
        registry.insert(Table::new("t", "t.csv", loaded(1)));

        assert!(registry.get("t").is_some());
        assert!(registry.get("T").is_none());
        assert_eq!(
            registry.get("t").unwrap().column_names().collect::<Vec<_>>(),
            vec!["id", "name"]
        );
    }
}
