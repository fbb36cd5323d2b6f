//! Line dispatch for the interactive and batch front ends.
//!
//! A [`Session`] owns everything a user interacts with: the loaded tables,
//! the SQL engine, the script interpreter, the current input mode and the
//! most recent non-empty query result. Every input line produces an
//! [`Outcome`]; errors are reported through it and never escape.

use std::path::Path;

use arrow::array::RecordBatch;

use crate::catalog::{Table, TableInfo, TableRegistry, TableSummary};
use crate::cli::Exporter;
use crate::error::QueryError;
use crate::load::{self, LoadOptions, LoadedTable};
use crate::naming::table_name_for_path;
use crate::query::{QueryEngine, SQL_REFERENCE_URL};
use crate::script::ScriptEngine;

/// Suffix that requests a transposed display of a SQL result.
const TRANSPOSE_SUFFIX: &str = "/t";

/// How non-command lines are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Sql,
    Script,
}

impl InputMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            InputMode::Sql => "lsql",
            InputMode::Script => "lpy",
        }
    }
}

/// Result of executing one input line.
#[derive(Debug)]
pub enum Outcome {
    /// Nothing to show
    None,
    /// Query result with at least one row
    Rows {
        batches: Vec<RecordBatch>,
        transposed: bool,
    },
    /// Query succeeded without returning rows
    Empty,
    /// Details of a single table
    TableInfo(TableInfo),
    /// Table names in load order
    TableList(Vec<String>),
    /// Row, column and size summary of every table
    TableSummaries(Vec<TableSummary>),
    /// Value produced by a script line
    Value(String),
    /// Informational message
    Message(String),
    /// Something the user asked for could not be done
    Warning(String),
    /// Latest result written to disk
    Saved { filename: String, rows: usize },
    /// Query, script or export failure
    Error {
        message: String,
        hint: Option<String>,
    },
    /// Special command name not found
    UnknownCommand(String),
    /// Help listing requested
    Help,
    /// Leave the interactive session
    Quit,
}

/// Handler invoked for a special command with its arguments.
pub type CommandHandler = fn(&mut Session, &[&str]) -> Outcome;

/// A backslash command available in every input mode.
pub struct SpecialCommand {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: CommandHandler,
}

/// All special commands, in help order.
pub const SPECIAL_COMMANDS: &[SpecialCommand] = &[
    SpecialCommand {
        name: "t",
        usage: "t",
        description: "List tables",
        handler: Session::cmd_tables,
    },
    SpecialCommand {
        name: "td",
        usage: "td",
        description: "Describe tables: rows, columns and memory",
        handler: Session::cmd_describe,
    },
    SpecialCommand {
        name: "pp",
        usage: "pp",
        description: "Toggle pretty print",
        handler: Session::cmd_pretty_print,
    },
    SpecialCommand {
        name: "s",
        usage: "s <filename>",
        description: "Save the latest result (.csv, .json, .jsonl, .ndjson, .xlsx)",
        handler: Session::cmd_save,
    },
    SpecialCommand {
        name: "lpy",
        usage: "lpy",
        description: "Switch to script mode",
        handler: Session::cmd_script_mode,
    },
    SpecialCommand {
        name: "lsql",
        usage: "lsql",
        description: "Switch to SQL mode",
        handler: Session::cmd_sql_mode,
    },
    SpecialCommand {
        name: "h",
        usage: "h",
        description: "Show this help",
        handler: Session::cmd_help,
    },
    SpecialCommand {
        name: "q",
        usage: "q",
        description: "Quit",
        handler: Session::cmd_quit,
    },
];

/// Help listing for the special commands.
pub fn help_text() -> String {
    let mut text = String::from("Special commands:\n");
    for command in SPECIAL_COMMANDS {
        text.push_str(&format!("  \\{:<14} {}\n", command.usage, command.description));
    }
    text.push_str(&format!(
        "Append {TRANSPOSE_SUFFIX} to a query to show rows transposed."
    ));
    text
}

/// Summary of a successfully loaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub table: String,
    pub rows: usize,
    pub columns: usize,
}

/// Interactive session state.
pub struct Session {
    engine: QueryEngine,
    registry: TableRegistry,
    script: ScriptEngine,
    mode: InputMode,
    latest_result: Option<Vec<RecordBatch>>,
    pretty_print: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            engine: QueryEngine::new(),
            registry: TableRegistry::new(),
            script: ScriptEngine::new(),
            mode: InputMode::default(),
            latest_result: None,
            pretty_print: false,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn pretty_print(&self) -> bool {
        self.pretty_print
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// The most recent query result with at least one row.
    pub fn latest_result(&self) -> Option<&[RecordBatch]> {
        self.latest_result.as_deref()
    }

    /// Load a file and register it under its derived table name.
    ///
    /// Returns `Ok(None)` for files whose name does not denote a supported
    /// format.
    pub fn load_path(
        &mut self,
        path: &Path,
        options: &LoadOptions,
    ) -> crate::Result<Option<LoadReport>> {
        let Some(loaded) = load::load_file(path, options)? else {
            tracing::debug!("Skipping unsupported file {}", path.display());
            return Ok(None);
        };

        let name = table_name_for_path(path);
        let report = LoadReport {
            table: name.clone(),
            rows: loaded.num_rows(),
            columns: loaded.num_columns(),
        };
        self.register_table(&name, path, loaded)?;

        Ok(Some(report))
    }

    /// Register decoded data under `name`, replacing any table with that name.
    pub fn register_table(
        &mut self,
        name: &str,
        source: &Path,
        loaded: LoadedTable,
    ) -> Result<(), QueryError> {
        self.engine
            .register_table(name, loaded.schema.clone(), loaded.batches.clone())?;

        let table = Table::new(name, source, loaded);
        if let Some(previous) = self.registry.insert(table) {
            tracing::debug!(
                "Table {} from {} replaced by {}",
                name,
                previous.source().display(),
                source.display()
            );
        }
        Ok(())
    }

    /// Execute one input line.
    pub async fn execute(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::None;
        }

        if let Some(command) = line.strip_prefix('\\') {
            return self.run_special(command);
        }

        match self.mode {
            InputMode::Sql => self.run_sql(line).await,
            InputMode::Script => self.run_script(line),
        }
    }

    fn run_special(&mut self, command: &str) -> Outcome {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match SPECIAL_COMMANDS.iter().find(|c| c.name == name) {
            Some(command) => (command.handler)(self, &args),
            None => Outcome::UnknownCommand(name.to_string()),
        }
    }

    async fn run_sql(&mut self, line: &str) -> Outcome {
        let (sql, transposed) = match line.strip_suffix(TRANSPOSE_SUFFIX) {
            Some(rest) => (rest.trim(), true),
            None => (line, false),
        };
        if sql.is_empty() {
            return Outcome::None;
        }

        if let Some(table) = self.registry.get(sql) {
            return Outcome::TableInfo(table.info());
        }

        match self.engine.query(sql).await {
            Ok(batches) => {
                let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
                tracing::debug!("Query returned {} rows", rows);
                if rows == 0 {
                    return Outcome::Empty;
                }
                self.latest_result = Some(batches.clone());
                Outcome::Rows {
                    batches,
                    transposed,
                }
            }
            Err(err) => {
                let hint = err
                    .is_syntax()
                    .then(|| format!("See the SQL reference: {SQL_REFERENCE_URL}"));
                Outcome::Error {
                    message: err.to_string(),
                    hint,
                }
            }
        }
    }

    fn run_script(&mut self, line: &str) -> Outcome {
        let latest_rows = self
            .latest_result
            .as_ref()
            .map(|batches| batches.iter().map(|b| b.num_rows()).sum());
        self.script.update_state(&self.registry, latest_rows);

        match self.script.eval(line) {
            Ok(Some(value)) => Outcome::Value(value),
            Ok(None) => Outcome::None,
            Err(err) => Outcome::Error {
                message: err.to_string(),
                hint: None,
            },
        }
    }

    fn cmd_tables(&mut self, _args: &[&str]) -> Outcome {
        Outcome::TableList(self.registry.names())
    }

    fn cmd_describe(&mut self, _args: &[&str]) -> Outcome {
        Outcome::TableSummaries(self.registry.describe())
    }

    fn cmd_pretty_print(&mut self, _args: &[&str]) -> Outcome {
        self.pretty_print = !self.pretty_print;
        let state = if self.pretty_print { "ON" } else { "OFF" };
        Outcome::Message(format!("Pretty print {state}"))
    }

    fn cmd_save(&mut self, args: &[&str]) -> Outcome {
        let [filename] = args else {
            return Outcome::Warning("Usage: \\s <filename>".to_string());
        };
        let Some(batches) = &self.latest_result else {
            return Outcome::Warning("Result not found. Run the query before save".to_string());
        };

        match Exporter::export(filename, batches) {
            Ok(rows) => Outcome::Saved {
                filename: filename.to_string(),
                rows,
            },
            Err(err) => Outcome::Error {
                message: err.to_string(),
                hint: None,
            },
        }
    }

    fn cmd_script_mode(&mut self, _args: &[&str]) -> Outcome {
        self.mode = InputMode::Script;
        Outcome::Message("Script mode".to_string())
    }

    fn cmd_sql_mode(&mut self, _args: &[&str]) -> Outcome {
        self.mode = InputMode::Sql;
        Outcome::Message("SQL mode".to_string())
    }

    fn cmd_help(&mut self, _args: &[&str]) -> Outcome {
        Outcome::Help
    }

    fn cmd_quit(&mut self, _args: &[&str]) -> Outcome {
        Outcome::Quit
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
