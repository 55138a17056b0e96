use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::models::{Cell, Notebook};

/// Line magic marking a package installation cell
pub const INSTALL_MARKER: &str = "%pip";

/// Result of clearing installation output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Code cells recognized as installation cells
    pub install_cells: usize,
    /// Outputs dropped from those cells
    pub outputs_removed: usize,
}

/// Whether a cell runs a package installation
pub fn is_install_cell(cell: &Cell<'_>) -> Result<bool> {
    Ok(cell.source_text()?.contains(INSTALL_MARKER))
}

/// Drop the captured output of every installation cell
pub fn clear_install_output(notebook: &mut Notebook) -> Result<ClearReport> {
    let mut report = ClearReport::default();

    for mut cell in notebook.code_cells_mut()? {
        if !is_install_cell(&cell.as_cell())? {
            continue;
        }
        let previous = cell.set_outputs(Vec::new());
        report.install_cells += 1;
        report.outputs_removed += previous
            .as_ref()
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
    }

    debug!(
        "Cleared {} outputs from {} install cells",
        report.outputs_removed, report.install_cells
    );
    Ok(report)
}
