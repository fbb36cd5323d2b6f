//! History file location.
//!
//! History lives in `<data_local_dir>/localsql/lsql_history` unless the
//! `LOCALSQL_HISTORY` environment variable names another file. Setting the
//! variable to an empty string disables history.

use std::env;
use std::path::PathBuf;

const HISTORY_ENV_VAR: &str = "LOCALSQL_HISTORY";
const HISTORY_FILE: &str = "lsql_history";

/// Resolve the history file path, `None` when history is disabled.
pub fn history_path() -> Option<PathBuf> {
    resolve(env::var(HISTORY_ENV_VAR).ok(), dirs::data_local_dir())
}

fn resolve(custom: Option<String>, data_dir: Option<PathBuf>) -> Option<PathBuf> {
    match custom {
        Some(path) if path.is_empty() => None,
        Some(path) => Some(PathBuf::from(path)),
        None => data_dir.map(|dir| dir.join("localsql").join(HISTORY_FILE)),
    }
}
