//! Script evaluation mode.
//!
//! Lines are evaluated by an embedded [`rhai`] engine with a scope that
//! survives between lines. A handful of functions expose a read-only view
//! of the session: loaded tables, their columns and row counts.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use rhai::{Array, Dynamic, Engine, EvalAltResult, Scope, INT};

use crate::catalog::TableRegistry;
use crate::error::ScriptError;

/// Snapshot of session state visible to scripts.
#[derive(Debug, Default)]
struct ScriptState {
    tables: Vec<String>,
    columns: HashMap<String, Vec<String>>,
    rows: HashMap<String, usize>,
    latest_rows: Option<usize>,
}

/// Persistent script interpreter.
pub struct ScriptEngine {
    engine: Engine,
    scope: Scope<'static>,
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptEngine {
    pub fn new() -> Self {
        let state = Rc::new(RefCell::new(ScriptState::default()));
        let mut engine = Engine::new();

        let s = state.clone();
        engine.register_fn("tables", move || -> Array {
            s.borrow().tables.iter().cloned().map(Dynamic::from).collect()
        });

        let s = state.clone();
        engine.register_fn(
            "columns",
            move |name: &str| -> Result<Array, Box<EvalAltResult>> {
                match s.borrow().columns.get(name) {
                    Some(cols) => Ok(cols.iter().cloned().map(Dynamic::from).collect()),
                    None => Err(format!("Table not found: {name}").into()),
                }
            },
        );

        let s = state.clone();
        engine.register_fn(
            "row_count",
            move |name: &str| -> Result<INT, Box<EvalAltResult>> {
                match s.borrow().rows.get(name) {
                    Some(rows) => Ok(*rows as INT),
                    None => Err(format!("Table not found: {name}").into()),
                }
            },
        );

        let s = state.clone();
        engine.register_fn("latest_row_count", move || -> Dynamic {
            match s.borrow().latest_rows {
                Some(rows) => Dynamic::from(rows as INT),
                None => Dynamic::UNIT,
            }
        });

        Self {
            engine,
            scope: Scope::new(),
            state,
        }
    }

    /// Refresh the session snapshot seen by script functions.
    pub fn update_state(&mut self, registry: &TableRegistry, latest_rows: Option<usize>) {
        let mut state = self.state.borrow_mut();
        state.tables = registry.names();
        state.columns = registry
            .iter()
            .map(|t| {
                let cols = t.column_names().map(str::to_string).collect();
                (t.name().to_string(), cols)
            })
            .collect();
        state.rows = registry
            .iter()
            .map(|t| (t.name().to_string(), t.num_rows()))
            .collect();
        state.latest_rows = latest_rows;
    }

    /// Evaluate one line.
    ///
    /// The line is first tried as an expression; if that fails it is run
    /// as a statement block. Returns the rendered value, or `None` when the
    /// line produced no value.
    pub fn eval(&mut self, line: &str) -> Result<Option<String>, ScriptError> {
        let value = match self
            .engine
            .eval_expression_with_scope::<Dynamic>(&mut self.scope, line)
        {
            Ok(value) => value,
            Err(expr_err) => {
                tracing::trace!("Not an expression ({}), running as statement", expr_err);
                self.engine
                    .eval_with_scope::<Dynamic>(&mut self.scope, line)
                    .map_err(|e| ScriptError(e.to_string()))?
            }
        };

        if value.is_unit() {
            Ok(None)
        } else {
            Ok(Some(value.to_string()))
        }
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        Self::new()
    }
}
