use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use glob::Pattern;

use crate::models::Notebook;

/// Find notebook files under `root` matching a glob `pattern`
/// such as `*.ipynb` or `**/*.ipynb`
pub fn discover_notebooks(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Notebook directory not found: {:?}", root);
    }

    let root_pattern = Pattern::escape(&root.to_string_lossy());
    let full_pattern = format!("{}/{}", root_pattern.trim_end_matches('/'), pattern);

    let mut paths = Vec::new();
    for entry in glob::glob(&full_pattern)
        .with_context(|| format!("Invalid glob pattern: {}", full_pattern))?
    {
        let path = entry.context("Failed to read glob entry")?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

/// Read and parse a notebook file
pub fn read_notebook(path: &Path) -> Result<Notebook> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_notebook(&content)
}

/// Parse a notebook from its JSON text
pub fn parse_notebook(json: &str) -> Result<Notebook> {
    Notebook::from_json(json).context("Failed to parse notebook JSON")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const MINIMAL: &str = r#"{"cells": [], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#;

    #[test]
    fn test_discover_flat() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.ipynb"), MINIMAL).unwrap();
        fs::write(dir.path().join("a.ipynb"), MINIMAL).unwrap();
        fs::write(dir.path().join("notes.md"), "# not a notebook").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.ipynb"), MINIMAL).unwrap();

        let found = discover_notebooks(dir.path(), "*.ipynb").unwrap();

        assert_eq!(
            found,
            vec![dir.path().join("a.ipynb"), dir.path().join("b.ipynb")]
        );
    }

    #[test]
    fn test_discover_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("guides/advanced")).unwrap();
        fs::write(dir.path().join("top.ipynb"), MINIMAL).unwrap();
        fs::write(dir.path().join("guides/advanced/deep.ipynb"), MINIMAL).unwrap();

        let found = discover_notebooks(dir.path(), "**/*.ipynb").unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.contains(&dir.path().join("guides/advanced/deep.ipynb")));
        assert!(found.contains(&dir.path().join("top.ipynb")));
    }

    #[test]
    fn test_discover_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_notebooks(&dir.path().join("missing"), "*.ipynb").is_err());
    }

    #[test]
    fn test_read_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("n.ipynb");
        fs::write(&path, MINIMAL).unwrap();

        let notebook = read_notebook(&path).unwrap();
        assert!(notebook.cells().unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_notebook("{not json").is_err());
    }
}
