//! Completion words for the interactive prompt.
//!
//! The word list is built once from the registry after the initial load:
//! table names first, then column names. Column names that would not parse
//! as bare identifiers are offered wrapped in double quotes.

use std::collections::HashSet;

use crate::catalog::TableRegistry;

/// Characters that force a column name to be quoted.
const QUOTE_TRIGGERS: &str = " !\"#$%&'()*+,-./{}[]<>?\\@^:;`~";

/// Characters that end the word being completed.
const WORD_BREAKS: &str = " \t\n(),;=<>+*/";

/// Whether a column name must be quoted to be used in SQL.
pub fn needs_quoting(name: &str) -> bool {
    name.chars().any(|c| QUOTE_TRIGGERS.contains(c))
}

/// Build the de-duplicated completion list for the loaded tables.
pub fn completion_words(registry: &TableRegistry) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut words = Vec::new();

    for name in registry.names() {
        if seen.insert(name.clone()) {
            words.push(name);
        }
    }

    for table in registry.iter() {
        for column in table.column_names() {
            let word = if needs_quoting(column) {
                format!("\"{column}\"")
            } else {
                column.to_string()
            };
            if seen.insert(word.clone()) {
                words.push(word);
            }
        }
    }

    words
}

/// Find completions for the word ending at `pos`.
///
/// Returns the byte offset where the word starts and the matching
/// candidates. An empty word yields no candidates.
pub fn complete_word(words: &[String], line: &str, pos: usize) -> (usize, Vec<String>) {
    let head = &line[..pos];
    let start = head
        .char_indices()
        .rev()
        .find(|(_, c)| WORD_BREAKS.contains(*c))
        .map(|(idx, c)| idx + c.len_utf8())
        .unwrap_or(0);

    let prefix = &head[start..];
    if prefix.is_empty() {
        return (start, Vec::new());
    }

    let unquoted = prefix.trim_start_matches('"');
    let candidates = words
        .iter()
        .filter(|w| w.starts_with(prefix) || w.trim_start_matches('"').starts_with(unquoted))
        .cloned()
        .collect();

    (start, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use arrow::array::RecordBatch;
    use arrow::datatypes::{DataType, Field, Schema};

    use crate::catalog::Table;
    use crate::load::LoadedTable;

    fn table(name: &str, columns: &[&str]) -> Table {
        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|c| Field::new(*c, DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ));
        let batch = RecordBatch::new_empty(schema.clone());
        Table::new(
            name,
            format!("{name}.csv"),
            LoadedTable {
                schema,
                batches: vec![batch],
            },
        )
    }

    #[test]
    fn test_needs_quoting() {
        assert!(needs_quoting("first name"));
        assert!(needs_quoting("a.b"));
        assert!(needs_quoting("price-usd"));
        assert!(!needs_quoting("price_usd"));
        assert!(!needs_quoting("Name"));
    }

    #[test]
    fn test_completion_words_order_and_dedup() {
        let mut registry = TableRegistry::new();
        registry.insert(table("users_csv", &["id", "first name"]));
        registry.insert(table("orders_csv", &["id", "user.id"]));

        assert_eq!(
            completion_words(&registry),
            vec!["users_csv", "orders_csv", "id", "\"first name\"", "\"user.id\""]
        );
    }

    #[test]
    fn test_complete_word() {
        let words: Vec<String> = vec!["users_csv".into(), "user_id".into(), "\"user.id\"".into()];

        let (start, candidates) = complete_word(&words, "SELECT * FROM us", 16);
        assert_eq!(start, 14);
        assert_eq!(candidates, vec!["users_csv", "user_id", "\"user.id\""]);

        let (_, candidates) = complete_word(&words, "SELECT \"user.", 13);
        assert_eq!(candidates, vec!["\"user.id\""]);

        let (start, candidates) = complete_word(&words, "SELECT count(user_", 18);
        assert_eq!(start, 13);
        assert_eq!(candidates, vec!["user_id"]);
    }

    #[test]
    fn test_empty_word_has_no_candidates() {
        let words: Vec<String> = vec!["users_csv".into()];
        let (start, candidates) = complete_word(&words, "SELECT ", 7);
        assert_eq!(start, 7);
        assert!(candidates.is_empty());
    }
}
