//! Tabular file loading.
//!
//! A file's format is taken from its name: one of `csv`, `json`, `xlsx`,
//! optionally followed by a compression suffix (`gz`, `bz2`, `xz`, `zip`).
//! Each format is decoded into Arrow record batches ready to be registered
//! as an in-memory table.
//!
//! ```text
//!   sales.csv.gz ──> (Csv, Gzip) ──> FileDecoder ──> arrow::csv ──> LoadedTable
//!   events.json  ──> (Json, None) ──> serde_json ──> arrow::json ──> LoadedTable
//!   book.xlsx    ──> (Xlsx, None) ──> calamine ───> arrays ───────> LoadedTable
//! ```

mod csv;
mod json;
mod xlsx;

use std::collections::HashSet;
use std::path::Path;

use arrow::array::RecordBatch;
use arrow::datatypes::SchemaRef;

use crate::error::LoadError;
use crate::io::Compression;

/// Rows per record batch produced by the decoders.
pub const BATCH_SIZE: usize = 8192;

/// Supported tabular formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
    Xlsx,
}

impl FileFormat {
    /// Match an extension (case-insensitive) against supported formats.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            "xlsx" => Some(FileFormat::Xlsx),
            _ => None,
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileFormat::Csv => write!(f, "csv"),
            FileFormat::Json => write!(f, "json"),
            FileFormat::Xlsx => write!(f, "xlsx"),
        }
    }
}

/// Infer format and compression from a file name.
///
/// Returns `None` for names that do not end in a supported extension,
/// optionally followed by one compression suffix.
pub fn detect_format(path: &Path) -> Option<(FileFormat, Compression)> {
    let name = path.file_name()?.to_str()?;
    let mut parts = name.rsplit('.');
    let last = parts.next()?;
    let second = parts.next()?;

    if let Some(format) = FileFormat::from_extension(last) {
        return Some((format, Compression::None));
    }

    let compression = Compression::from_suffix(&last.to_ascii_lowercase())?;
    let format = FileFormat::from_extension(second)?;
    Some((format, compression))
}

/// Options controlling how files are decoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Stream JSON line by line, flattening nested objects into columns.
    pub json_normalize: bool,
}

/// Decoded contents of a file.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub schema: SchemaRef,
    pub batches: Vec<RecordBatch>,
}

impl LoadedTable {
    /// Total number of rows across all batches.
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(|b| b.num_rows()).sum()
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }
}

/// Load a tabular file.
///
/// `Ok(None)` means the file name does not denote a supported format and the
/// file should be skipped silently.
pub fn load_file<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<Option<LoadedTable>, LoadError> {
    let path = path.as_ref();
    let Some((format, compression)) = detect_format(path) else {
        return Ok(None);
    };

    tracing::debug!(
        "Loading {} as {} (compression: {})",
        path.display(),
        format,
        compression
    );

    let table = match format {
        FileFormat::Csv => csv::load_csv(path, compression)?,
        FileFormat::Json if options.json_normalize => {
            json::load_json_normalized(path, compression)?
        }
        FileFormat::Json => json::load_json(path, compression)?,
        FileFormat::Xlsx => xlsx::load_xlsx(path, compression)?,
    };

    if table.num_columns() == 0 {
        return Err(LoadError::EmptyInput);
    }

    Ok(Some(table))
}

/// Make column names unique by appending `.1`, `.2`, ... to repeats.
pub(crate) fn dedup_column_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{n}");
            n += 1;
        }
        seen.insert(candidate.clone());
        result.push(candidate);
    }

    result
}
