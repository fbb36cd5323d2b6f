//! Input file discovery.

use std::path::{Path, PathBuf};

/// Collect candidate files under `dir`.
///
/// Only regular files whose name contains a `.` are returned; recursion into
/// subdirectories happens when `recursive` is set. Results are sorted by path
/// so tables register in a stable order.
pub fn discover_files<P: AsRef<Path>>(dir: P, recursive: bool) -> Vec<PathBuf> {
    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir.as_ref())
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_str().is_some_and(|name| name.contains('.')))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_flat_discovery_skips_subdirectories() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.csv"), "x\n1\n").unwrap();
        std::fs::write(dir.path().join("a.json"), "[]").unwrap();
        std::fs::write(dir.path().join("README"), "no dot").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.csv"), "x\n1\n").unwrap();

        let files = discover_files(dir.path(), false);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();

        assert_eq!(names, vec!["a.json", "b.csv"]);
    }

    #[test]
    fn test_recursive_discovery() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("top.csv"), "x\n1\n").unwrap();
        std::fs::create_dir_all(dir.path().join("one").join("two")).unwrap();
        std::fs::write(dir.path().join("one").join("two").join("deep.xlsx"), "").unwrap();

        let files = discover_files(dir.path(), true);

        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|p| p.ends_with("one/two/deep.xlsx")));
        assert!(files.iter().any(|p| p.ends_with("top.csv")));
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let dir = tempdir().unwrap();
        let files = discover_files(dir.path().join("absent"), true);
        assert!(files.is_empty());
    }
}
