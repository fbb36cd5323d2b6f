//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing via clap
//! - Interactive REPL via rustyline
//! - Output formatting (table, CSV, JSON)
//! - Export functionality (CSV, JSON Lines, XLSX files)

mod args;
mod export;
mod history;
mod output;
mod repl;

pub use args::{rewrite_legacy_flags, Args, OutputFormat};
pub use export::{ExportFormat, Exporter};
pub use history::history_path;
pub use output::OutputFormatter;
pub use repl::{Repl, ReplInput, SqlHelper};

use std::io::Write;

use crate::session::{help_text, Outcome};

/// Render a session outcome.
///
/// Results and listings go to `out`; warnings and errors go to `err`.
pub fn render_outcome<O: Write, E: Write>(
    outcome: &Outcome,
    formatter: &OutputFormatter,
    out: &mut O,
    err: &mut E,
) -> std::io::Result<()> {
    match outcome {
        Outcome::None | Outcome::Quit => Ok(()),
        Outcome::Rows {
            batches,
            transposed: true,
        } => formatter.write_transposed(batches, out),
        Outcome::Rows { batches, .. } => formatter.write_batches(batches, out),
        Outcome::Empty => writeln!(out, "Empty result"),
        Outcome::TableInfo(info) => formatter.write_table_info(info, out),
        Outcome::TableList(names) => {
            for name in names {
                writeln!(out, "{name}")?;
            }
            Ok(())
        }
        Outcome::TableSummaries(summaries) => formatter.write_summaries(summaries, out),
        Outcome::Value(value) | Outcome::Message(value) => writeln!(out, "{value}"),
        Outcome::Saved { filename, .. } => writeln!(out, "Result saved to {filename}"),
        Outcome::Warning(message) => writeln!(err, "Warning: {message}"),
        Outcome::Error { message, hint } => {
            writeln!(err, "Error: {message}")?;
            if let Some(hint) = hint {
                writeln!(err, "{hint}")?;
            }
            Ok(())
        }
        Outcome::UnknownCommand(name) => {
            writeln!(err, "Unrecognized special command: {name}")?;
            writeln!(err, "{}", help_text())
        }
        Outcome::Help => writeln!(out, "{}", help_text()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(outcome: Outcome) -> (String, String) {
        let formatter = OutputFormatter::new(OutputFormat::Table);
        let mut out = Vec::new();
        let mut err = Vec::new();
        render_outcome(&outcome, &formatter, &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_render_saved() {
        let (out, err) = render(Outcome::Saved {
            filename: "out.csv".to_string(),
            rows: 2,
        });
        assert_eq!(out, "Result saved to out.csv\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_render_unknown_command() {
        let (out, err) = render(Outcome::UnknownCommand("foo".to_string()));
        assert!(out.is_empty());
        assert!(err.starts_with("Unrecognized special command: foo\n"));
        assert!(err.contains("\\td"));
    }

    #[test]
    fn test_render_error_with_hint() {
        let (_, err) = render(Outcome::Error {
            message: "Expected: an SQL statement, found: SELEC".to_string(),
            hint: Some("See the SQL reference".to_string()),
        });
        assert_eq!(
            err,
            "Error: Expected: an SQL statement, found: SELEC\nSee the SQL reference\n"
        );
    }

    #[test]
    fn test_render_table_list() {
        let (out, _) = render(Outcome::TableList(vec!["a_csv".into(), "b_json".into()]));
        assert_eq!(out, "a_csv\nb_json\n");
    }
}
