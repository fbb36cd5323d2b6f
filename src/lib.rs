//! localsql - Query CSV, JSON and Excel files using SQL.
//!
//! This library loads tabular files (optionally compressed) into in-memory
//! Arrow tables and runs SQL against them via Apache DataFusion.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use localsql::load::LoadOptions;
//! use localsql::session::{Outcome, Session};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut session = Session::new();
//!     session.load_path(Path::new("sales.csv.gz"), &LoadOptions::default())?;
//!     let outcome = session.execute("SELECT COUNT(*) FROM sales_csv_gz").await;
//!     if let Outcome::Rows { batches, .. } = outcome {
//!         println!("{} batches", batches.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod completion;
pub mod error;
pub mod format;
pub mod io;
pub mod load;
pub mod naming;
pub mod query;
pub mod script;
pub mod session;

pub use error::{Error, Result};
