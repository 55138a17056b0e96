use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};

use crate::models::Notebook;

/// Render a notebook the way it is stored on disk: two-space indent,
/// keys in their original order, numbers as written in the source, non-ASCII
/// characters as `\uXXXX` escapes and no trailing newline.
///
/// This matches Python's `json.dumps(indent=2)`, so a notebook last written
/// by that renders byte for byte the same.
pub fn render_notebook(notebook: &Notebook) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, AsciiFormatter::new());
    notebook
        .serialize(&mut serializer)
        .context("Failed to serialize notebook")?;
    String::from_utf8(buffer).context("Rendered notebook is not UTF-8")
}

/// Write a notebook to a file
pub fn write_notebook(path: &Path, notebook: &Notebook) -> Result<()> {
    let rendered = render_notebook(notebook)?;
    std::fs::write(path, rendered).with_context(|| format!("Failed to write file: {:?}", path))?;
    Ok(())
}

/// Pretty printer that escapes every non-ASCII character in strings
struct AsciiFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl AsciiFormatter<'_> {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::new(),
        }
    }
}

impl Formatter for AsciiFormatter<'_> {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        let mut start = 0;
        for (offset, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..offset].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{:04x}", *unit)?;
            }
            start = offset + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn begin_array<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.begin_array(writer)
    }

    fn end_array<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.begin_object(writer)
    }

    fn end_object<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + Write,
    {
        self.pretty.end_object_value(writer)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_render_uses_two_space_indent() {
        let notebook = Notebook::from_value(json!({
            "cells": [],
            "nbformat": 4
        }))
        .unwrap();

        assert_eq!(
            render_notebook(&notebook).unwrap(),
            "{\n  \"cells\": [],\n  \"nbformat\": 4\n}"
        );
    }

    #[test]
    fn test_render_nested_layout() {
        let notebook = Notebook::from_value(json!({
            "cells": [{"cell_type": "markdown", "metadata": {}, "source": ["a", "b"]}]
        }))
        .unwrap();

        assert_eq!(
            render_notebook(&notebook).unwrap(),
            "{\n  \"cells\": [\n    {\n      \"cell_type\": \"markdown\",\n      \"metadata\": {},\n      \"source\": [\n        \"a\",\n        \"b\"\n      ]\n    }\n  ]\n}"
        );
    }

    #[test]
    fn test_render_escapes_non_ascii_like_python() {
        let notebook = Notebook::from_json(
            r#"{"cells": [], "metadata": {"title": "café ☕ 🚀", "tol": 1e-05}}"#,
        )
        .unwrap();

        let rendered = render_notebook(&notebook).unwrap();

        assert!(rendered.is_ascii());
        assert!(rendered.contains(r#""title": "caf\u00e9 \u2615 \ud83d\ude80""#));
        assert!(rendered.contains(r#""tol": 1e-05"#));
        // Escapes still read back as the same text
        let reparsed = Notebook::from_json(&rendered).unwrap();
        assert_eq!(reparsed, notebook);
    }

    #[test]
    fn test_render_keeps_json_escapes() {
        let notebook = Notebook::from_value(json!({"cells": [], "s": "a\"b\\c\n"})).unwrap();
        let rendered = render_notebook(&notebook).unwrap();
        assert!(rendered.contains(r#""s": "a\"b\\c\n""#));
    }

    #[test]
    fn test_write_notebook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ipynb");
        let notebook = Notebook::from_value(json!({"cells": []})).unwrap();

        write_notebook(&path, &notebook).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "{\n  \"cells\": []\n}");
    }
}
