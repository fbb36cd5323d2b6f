//! SQL query engine module.
//!
//! This module provides the DataFusion integration: loaded tables are
//! registered as in-memory `MemTable`s and queries run against them.

mod errors;

pub use errors::{classify_error, clean_message, SQL_REFERENCE_URL};

use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;
use datafusion::datasource::MemTable;
use datafusion::prelude::*;
use datafusion::sql::TableReference;

use crate::error::QueryError;

/// Configure DataFusion for file-derived table names.
///
/// Identifier normalisation is disabled so mixed-case names such as
/// `Sales_csv` resolve exactly as they were registered.
fn create_session_context() -> SessionContext {
    let mut config = SessionConfig::new().with_information_schema(true);
    config.options_mut().sql_parser.enable_ident_normalization = false;

    SessionContext::new_with_config(config)
}

/// Query engine over in-memory tables.
pub struct QueryEngine {
    ctx: SessionContext,
}

impl QueryEngine {
    pub fn new() -> Self {
        Self {
            ctx: create_session_context(),
        }
    }

    /// Register (or replace) an in-memory table.
    pub fn register_table(
        &self,
        name: &str,
        schema: SchemaRef,
        batches: Vec<RecordBatch>,
    ) -> Result<(), QueryError> {
        let register_error = |e: datafusion::error::DataFusionError| QueryError::Register {
            table: name.to_string(),
            reason: e.strip_backtrace(),
        };

        let provider = MemTable::try_new(schema, vec![batches]).map_err(register_error)?;

        // Bare references keep the name from being parsed or case-folded.
        let reference = TableReference::bare(name.to_string());
        self.ctx
            .deregister_table(reference.clone())
            .map_err(register_error)?;
        self.ctx
            .register_table(reference, Arc::new(provider))
            .map_err(register_error)?;

        tracing::debug!("Registered table {}", name);
        Ok(())
    }

    /// Execute a SQL query and return results.
    pub async fn query(&self, sql: &str) -> Result<Vec<RecordBatch>, QueryError> {
        let df = self.ctx.sql(sql).await.map_err(classify_error)?;
        let batches = df.collect().await.map_err(classify_error)?;
        Ok(batches)
    }
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new()
    }
}
