use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::cell::{Cell, CellMut, CellType};
use super::text::is_fragmented;
use crate::error::{NotebookError, Result};

/// A parsed notebook document.
///
/// The document is kept as an order-preserving JSON map, with numbers held
/// as their source text, so that every field the sanitizers do not touch is
/// written back with the same keys and values as it was read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Notebook {
    document: Map<String, Value>,
}

/// Summary of a notebook's cells, used by `inspect`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotebookStats {
    pub total_cells: usize,
    pub cells_by_type: BTreeMap<String, usize>,
    pub executed_code_cells: usize,
    pub outputs: usize,
    /// Outputs holding at least one text field in fragment form
    pub fragmented_outputs: usize,
}

impl Notebook {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize with a two-space indent and no trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.document)
    }

    pub fn cells(&self) -> Result<&Vec<Value>> {
        match self.document.get("cells") {
            Some(Value::Array(cells)) => Ok(cells),
            Some(_) => Err(NotebookError::wrong_type("notebook", "cells", "an array")),
            None => Err(NotebookError::missing("notebook", "cells")),
        }
    }

    pub fn cells_mut(&mut self) -> Result<&mut Vec<Value>> {
        match self.document.get_mut("cells") {
            Some(Value::Array(cells)) => Ok(cells),
            Some(_) => Err(NotebookError::wrong_type("notebook", "cells", "an array")),
            None => Err(NotebookError::missing("notebook", "cells")),
        }
    }

    /// Views over every cell in document order
    pub fn cell_views(&self) -> Result<Vec<Cell<'_>>> {
        self.cells()?
            .iter()
            .enumerate()
            .map(|(index, value)| Cell::new(index, value))
            .collect()
    }

    /// Mutable views over the code cells only, in document order
    pub fn code_cells_mut(&mut self) -> Result<Vec<CellMut<'_>>> {
        let mut code_cells = Vec::new();
        for (index, value) in self.cells_mut()?.iter_mut().enumerate() {
            let cell = CellMut::new(index, value)?;
            if cell.cell_type()? == CellType::Code {
                code_cells.push(cell);
            }
        }
        Ok(code_cells)
    }

    pub fn stats(&self) -> Result<NotebookStats> {
        let mut stats = NotebookStats::default();

        for cell in self.cell_views()? {
            let cell_type = cell.cell_type()?;
            stats.total_cells += 1;
            *stats
                .cells_by_type
                .entry(cell_type.to_string())
                .or_insert(0) += 1;

            if cell_type != CellType::Code {
                continue;
            }
            if cell.execution_count().is_some() {
                stats.executed_code_cells += 1;
            }
            for output in cell.outputs()? {
                stats.outputs += 1;
                if has_fragmented_text(output) {
                    stats.fragmented_outputs += 1;
                }
            }
        }

        Ok(stats)
    }
}

fn has_fragmented_text(output: &Value) -> bool {
    let text = output.get("text").is_some_and(is_fragmented);
    let data = output
        .get("data")
        .and_then(Value::as_object)
        .is_some_and(|data| data.values().any(is_fragmented));
    text || data
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SAMPLE: &str = r##"{
  "cells": [
    {
      "cell_type": "markdown",
      "id": "intro",
      "metadata": {},
      "source": [
        "# Title"
      ]
    },
    {
      "cell_type": "code",
      "execution_count": 3,
      "id": "compute",
      "metadata": {
        "tags": []
      },
      "outputs": [
        {
          "name": "stdout",
          "output_type": "stream",
          "text": [
            "1\n",
            "2\n"
          ]
        }
      ],
      "source": "print(1)\nprint(2)"
    }
  ],
  "metadata": {
    "kernelspec": {
      "name": "python3"
    }
  },
  "nbformat": 4,
  "nbformat_minor": 5
}"##;

    #[test]
    fn test_render_preserves_key_order() {
        let notebook = Notebook::from_json(SAMPLE).unwrap();
        assert_eq!(notebook.to_json_pretty().unwrap(), SAMPLE);
    }

    #[test]
    fn test_untouched_numbers_keep_their_text() {
        let json = r#"{"cells": [], "metadata": {"x": 123456789.12345679, "big": 18446744073709551616, "tiny": 1e-05}}"#;
        let mut notebook = Notebook::from_json(json).unwrap();
        crate::pipeline::sanitize(&mut notebook, &crate::pipeline::SanitizeConfig::Publish)
            .unwrap();

        let rendered = notebook.to_json_pretty().unwrap();
        assert!(rendered.contains(r#""x": 123456789.12345679"#));
        assert!(rendered.contains(r#""big": 18446744073709551616"#));
        assert!(rendered.contains(r#""tiny": 1e-05"#));
    }

    #[test]
    fn test_missing_cells_is_structural() {
        let notebook = Notebook::from_value(json!({"metadata": {}})).unwrap();
        let err = notebook.cells().unwrap_err();
        assert_eq!(err.to_string(), "notebook: missing field `cells`");
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(matches!(
            Notebook::from_json("[1, 2, 3]"),
            Err(NotebookError::Json(_))
        ));
    }

    #[test]
    fn test_code_cells_mut_skips_other_types() {
        let mut notebook = Notebook::from_json(SAMPLE).unwrap();
        let code_cells = notebook.code_cells_mut().unwrap();
        assert_eq!(code_cells.len(), 1);
        assert_eq!(code_cells[0].index(), 1);
    }

    #[test]
    fn test_stats() {
        let notebook = Notebook::from_json(SAMPLE).unwrap();
        let stats = notebook.stats().unwrap();

        assert_eq!(stats.total_cells, 2);
        assert_eq!(stats.cells_by_type.get("markdown"), Some(&1));
        assert_eq!(stats.cells_by_type.get("code"), Some(&1));
        assert_eq!(stats.executed_code_cells, 1);
        assert_eq!(stats.outputs, 1);
        assert_eq!(stats.fragmented_outputs, 1);
    }
}
