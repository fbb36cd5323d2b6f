//! Error types for localsql.

use thiserror::Error;

/// Main error type for localsql operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error decoding a tabular file
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Error during SQL query execution
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Error writing a result to disk
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Error evaluating a script line
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to reading tabular files.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Compressor not usable for the requested decoding mode
    #[error("Compressor {compressor} is not supported for json normalize mode")]
    UnsupportedCompression { compressor: String },

    /// Invalid or truncated archive
    #[error("Invalid archive: {reason}")]
    Archive { reason: String },

    /// CSV decoding failure
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON decoding failure
    #[error("JSON error: {0}")]
    Json(String),

    /// Spreadsheet decoding failure
    #[error("XLSX error: {0}")]
    Xlsx(String),

    /// File decoded to zero columns
    #[error("No columns found")]
    EmptyInput,

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<arrow::error::ArrowError> for LoadError {
    fn from(err: arrow::error::ArrowError) -> Self {
        LoadError::Csv(err.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Json(err.to_string())
    }
}

impl From<calamine::XlsxError> for LoadError {
    fn from(err: calamine::XlsxError) -> Self {
        LoadError::Xlsx(err.to_string())
    }
}

impl From<zip::result::ZipError> for LoadError {
    fn from(err: zip::result::ZipError) -> Self {
        LoadError::Archive {
            reason: err.to_string(),
        }
    }
}

/// Errors related to SQL query execution.
#[derive(Error, Debug)]
pub enum QueryError {
    /// SQL syntax error
    #[error("{0}")]
    Syntax(String),

    /// DataFusion error
    #[error("{0}")]
    Execution(String),

    /// Table could not be registered with the engine
    #[error("Cannot register table {table}: {reason}")]
    Register { table: String, reason: String },
}

impl QueryError {
    /// Whether the failure came from the SQL parser.
    pub fn is_syntax(&self) -> bool {
        matches!(self, QueryError::Syntax(_))
    }
}

/// Errors related to writing results to files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// File suffix does not map to a known writer
    #[error("Unsupported saving format: {filename}")]
    UnsupportedFormat { filename: String },

    /// CSV writer failure
    #[error("CSV error: {0}")]
    Csv(String),

    /// Spreadsheet writer failure
    #[error("XLSX error: {0}")]
    Xlsx(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<arrow::error::ArrowError> for ExportError {
    fn from(err: arrow::error::ArrowError) -> Self {
        ExportError::Csv(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Xlsx(err.to_string())
    }
}

/// Error raised by the script engine.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ScriptError(pub String);

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
