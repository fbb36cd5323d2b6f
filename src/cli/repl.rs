//! Interactive REPL (Read-Eval-Print Loop).

use std::path::{Path, PathBuf};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper, Result as RlResult};

use crate::completion::complete_word;

/// Tab completion over table and column names.
pub struct SqlHelper {
    words: Vec<String>,
}

impl SqlHelper {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }
}

impl Completer for SqlHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> RlResult<(usize, Vec<Pair>)> {
        let (start, candidates) = complete_word(&self.words, line, pos);
        let pairs = candidates
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for SqlHelper {
    type Hint = String;
}

impl Highlighter for SqlHelper {}

impl Validator for SqlHelper {}

impl Helper for SqlHelper {}

/// Input from the REPL.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplInput {
    /// A line entered by the user
    Line(String),
    /// User pressed Ctrl-C; discard and prompt again
    Interrupted,
    /// User pressed Ctrl-D
    Exit,
}

/// Line editor with history and completion.
pub struct Repl {
    editor: Editor<SqlHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL completing the given words.
    pub fn new(words: Vec<String>) -> RlResult<Self> {
        let mut editor = Editor::new()?;
        editor.set_helper(Some(SqlHelper::new(words)));
        Ok(Self {
            editor,
            history_file: None,
        })
    }

    /// Set the history file path and load existing entries.
    pub fn with_history(mut self, path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::debug!("Could not create history directory: {}", e);
            }
        }
        if let Err(e) = self.editor.load_history(path) {
            tracing::debug!("Could not load history: {}", e);
        }
        self.history_file = Some(path.to_path_buf());
        self
    }

    /// Read one line using `prompt` as the mode label.
    pub fn read_input(&mut self, prompt: &str) -> RlResult<ReplInput> {
        match self.editor.readline(&format!("{prompt}> ")) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(ReplInput::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(ReplInput::Interrupted),
            Err(ReadlineError::Eof) => Ok(ReplInput::Exit),
            Err(e) => Err(e),
        }
    }

    /// Save history to file.
    pub fn save_history(&mut self) {
        if let Some(ref path) = self.history_file {
            if let Err(e) = self.editor.save_history(path) {
                tracing::debug!("Could not save history: {}", e);
            }
        }
    }
}

impl Drop for Repl {
    fn drop(&mut self) {
        self.save_history();
    }
}
