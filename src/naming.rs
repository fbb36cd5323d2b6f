//! Table name derivation.
//!
//! Turns a file name such as `2024 sales-Q1.csv.gz` into an identifier
//! that can be used unquoted in SQL (`t2024_sales_Q1_csv_gz`).

use std::path::Path;

/// Characters replaced by `_` when deriving a table name.
const DISALLOWED: &[char] = &[
    ':', '*', '?', '-', '<', '=', '>', '|', '"', '\'', '.', '{', '}', '[', ']', '(', ')', ' ',
];

/// Derive a SQL-safe table identifier from a file name.
///
/// Disallowed characters become `_`, runs of `_` collapse into one, and a
/// leading digit gets a `t` prefix. Distinct file names may map to the same
/// identifier; the registry keeps the most recent one.
pub fn sanitize(file_name: &str) -> String {
    let mut name = String::with_capacity(file_name.len() + 1);

    for c in file_name.chars() {
        let c = if DISALLOWED.contains(&c) { '_' } else { c };
        if c == '_' && name.ends_with('_') {
            continue;
        }
        name.push(c);
    }

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, 't');
    }

    name
}

/// Derive the table name for a file path from its final component.
pub fn table_name_for_path(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    sanitize(&file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_digit_prefix_after_substitution() {
        assert_eq!(sanitize("1 a.csv"), "t1_a_csv");
    }

    #[test]
    fn test_collapse_runs() {
        assert_eq!(sanitize("a--b.csv"), "a_b_csv");
        assert_eq!(sanitize("a__b.csv"), "a_b_csv");
        assert_eq!(sanitize("a - (copy).json.gz"), "a_copy_json_gz");
    }

    #[test]
    fn test_plain_name() {
        assert_eq!(sanitize("orders.csv"), "orders_csv");
        assert_eq!(sanitize("Orders.XLSX"), "Orders_XLSX");
    }

    #[test]
    fn test_all_disallowed_characters() {
        assert_eq!(sanitize("a:b*c?d<e=f>g|h\"i'j{k}l[m]n"), "a_b_c_d_e_f_g_h_i_j_k_l_m_n");
    }

    #[test]
    fn test_leading_underscore_kept() {
        assert_eq!(sanitize(".hidden.csv"), "_hidden_csv");
    }

    #[test]
    fn test_non_ascii_preserved() {
        assert_eq!(sanitize("données.csv"), "données_csv");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_table_name_for_path_uses_file_name() {
        let path = PathBuf::from("/data/2023/3rd-quarter.csv");
        assert_eq!(table_name_for_path(&path), "t3rd_quarter_csv");
    }
}
