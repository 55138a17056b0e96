use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{NotebookError, Result};
use crate::models::{Notebook, collapse_in_place, is_blank};

/// Result of flattening output text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenReport {
    /// Outputs inspected across all code cells
    pub outputs_visited: usize,
    /// Fields rewritten from fragments to a single string
    pub fields_collapsed: usize,
}

/// Collapse multi-part text in every code cell output.
///
/// Touches each value under `data` and a non-empty `text` field. Outputs
/// with neither field are left alone, as are code cells without outputs.
pub fn flatten_outputs(notebook: &mut Notebook) -> Result<FlattenReport> {
    let mut report = FlattenReport::default();

    for mut cell in notebook.code_cells_mut()? {
        let index = cell.index();
        let Some(outputs) = cell.outputs_mut()? else {
            continue;
        };

        for (position, output) in outputs.iter_mut().enumerate() {
            let location = format!("cell {} output {}", index, position);
            let output = output.as_object_mut().ok_or_else(|| {
                NotebookError::wrong_type(location.as_str(), "output", "an object")
            })?;
            report.outputs_visited += 1;
            report.fields_collapsed += flatten_output(output, &location)?;
        }
    }

    debug!(
        "Flattened {} fields across {} outputs",
        report.fields_collapsed, report.outputs_visited
    );
    Ok(report)
}

fn flatten_output(output: &mut Map<String, Value>, location: &str) -> Result<usize> {
    let mut collapsed = 0;

    if let Some(data) = output.get_mut("data") {
        let data = data
            .as_object_mut()
            .ok_or_else(|| NotebookError::wrong_type(location, "data", "an object"))?;
        for (mime, value) in data.iter_mut() {
            if collapse_in_place(value, location, &format!("data.{}", mime))? {
                collapsed += 1;
            }
        }
    }

    if let Some(text) = output.get_mut("text") {
        if !is_blank(text) && collapse_in_place(text, location, "text")? {
            collapsed += 1;
        }
    }

    Ok(collapsed)
}
