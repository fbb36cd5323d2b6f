//! Command-line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output formats for batch query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table (default)
    #[default]
    Table,
    /// Comma-separated values
    Csv,
    /// JSON Lines (one JSON object per row)
    Json,
}

/// Short flags kept for compatibility, mapped to their long form.
const LEGACY_FLAGS: &[(&str, &str)] = &[("-jn", "--json-normalize")];

/// Rewrite legacy multi-letter short flags before clap sees them.
///
/// Arguments after `--` are left untouched.
pub fn rewrite_legacy_flags<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| *legacy == arg)
                .map(|(_, long)| long.to_string())
                .unwrap_or(arg)
        })
        .collect()
}

/// Query CSV, JSON and Excel files using SQL.
#[derive(Parser, Debug)]
#[command(name = "localsql")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Files to load (.csv, .json, .xlsx, optionally .gz, .bz2, .xz or .zip)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Load every supported file in this directory
    #[arg(short = 'd', long = "directory", value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Scan the directory recursively (the current directory if -d is not given)
    #[arg(short = 'r', long = "recursive")]
    pub recursive: bool,

    /// Execute a single query and exit
    #[arg(short = 'q', long = "query", value_name = "SQL")]
    pub query: Option<String>,

    /// Output format for --query results
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress load reports and warnings
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Read JSON line by line, flattening nested objects into columns (also -jn)
    #[arg(long = "json-normalize")]
    pub json_normalize: bool,

    /// Show a spinner while loading files
    #[arg(long = "progress")]
    pub progress: bool,
}

impl Args {
    /// Parse arguments from an iterator, applying legacy flag rewrites.
    pub fn parse_from_legacy<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self::parse_from(rewrite_legacy_flags(args))
    }

    /// Directory to scan when no explicit files were given.
    pub fn scan_directory(&self) -> Option<PathBuf> {
        if !self.files.is_empty() {
            return None;
        }
        match (&self.directory, self.recursive) {
            (Some(dir), _) => Some(dir.clone()),
            (None, true) => Some(PathBuf::from(".")),
            (None, false) => None,
        }
    }

    /// Check if we should enter interactive mode.
    pub fn is_interactive(&self) -> bool {
        self.query.is_none()
    }

    /// Default log filter for the verbosity count.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let args = rewrite_legacy_flags(args.iter().map(|s| s.to_string()));
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_default_args() {
        let args = parse(&["localsql"]);
        assert!(args.files.is_empty());
        assert!(args.is_interactive());
        assert!(!args.json_normalize);
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.log_level(), "warn");
        assert_eq!(args.scan_directory(), None);
    }

    #[test]
    fn test_files_and_query() {
        let args = parse(&["localsql", "a.csv", "b.json.gz", "-q", "SELECT 1", "-s"]);
        assert_eq!(args.files, vec![PathBuf::from("a.csv"), PathBuf::from("b.json.gz")]);
        assert_eq!(args.query.as_deref(), Some("SELECT 1"));
        assert!(args.silent);
        assert!(!args.is_interactive());
    }

    #[test]
    fn test_legacy_json_normalize_flag() {
        let args = parse(&["localsql", "-jn", "data.json"]);
        assert!(args.json_normalize);
        assert_eq!(args.files, vec![PathBuf::from("data.json")]);
    }

    #[test]
    fn test_rewrite_stops_at_double_dash() {
        let rewritten = rewrite_legacy_flags(
            ["localsql", "-jn", "--", "-jn"].iter().map(|s| s.to_string()),
        );
        assert_eq!(rewritten, vec!["localsql", "--json-normalize", "--", "-jn"]);
    }

    #[test]
    fn test_scan_directory() {
        assert_eq!(parse(&["localsql", "-r"]).scan_directory(), Some(PathBuf::from(".")));
        assert_eq!(
            parse(&["localsql", "-d", "data", "-r"]).scan_directory(),
            Some(PathBuf::from("data"))
        );
        assert_eq!(parse(&["localsql", "x.csv", "-d", "data"]).scan_directory(), None);
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["localsql", "-v"]).log_level(), "info");
        assert_eq!(parse(&["localsql", "-vv"]).log_level(), "debug");
        assert_eq!(parse(&["localsql", "-vvvv"]).log_level(), "trace");
    }

    #[test]
    fn test_format_option() {
        assert_eq!(parse(&["localsql", "--format", "json"]).format, OutputFormat::Json);
        assert!(Args::try_parse_from(["localsql", "--format", "xml"]).is_err());
    }
}
