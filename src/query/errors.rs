//! Turning DataFusion failures into user-facing messages.

use datafusion::error::DataFusionError;

use crate::error::QueryError;

/// Grammar reference shown after syntax errors.
pub const SQL_REFERENCE_URL: &str = "https://datafusion.apache.org/user-guide/sql/index.html";

/// Footer DataFusion appends to internal errors.
const BUG_REPORT_FOOTER: &str = "This issue was likely caused by a bug in DataFusion's code";

/// Prefix of parser error text.
const PARSER_PREFIX: &str = "sql parser error: ";

/// Classify a DataFusion error and strip its noise.
///
/// Parser failures become [`QueryError::Syntax`]; everything else is an
/// execution error. Context wrappers are unwound to the root cause.
pub fn classify_error(err: DataFusionError) -> QueryError {
    let root = err.find_root();

    match root {
        DataFusionError::SQL(parser_error, _) => {
            let text = parser_error.to_string();
            let text = text.strip_prefix(PARSER_PREFIX).unwrap_or(&text);
            QueryError::Syntax(clean_message(text))
        }
        other => QueryError::Execution(clean_message(&other.strip_backtrace())),
    }
}

/// Remove backtraces and bug-report footers from an engine message.
pub fn clean_message(message: &str) -> String {
    let mut text = message;

    if let Some(idx) = text.find("\n\nbacktrace:") {
        text = &text[..idx];
    }
    if let Some(idx) = text.find(BUG_REPORT_FOOTER) {
        text = &text[..idx];
    }

    let text = text.trim();
    text.strip_suffix('.').unwrap_or(text).to_string()
}
