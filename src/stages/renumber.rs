use tracing::debug;

use crate::error::Result;
use crate::models::Notebook;

/// Result of renumbering execution counts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenumberReport {
    pub code_cells: usize,
}

/// Number code cells 1, 2, ... in document order, as if the notebook had
/// been run once from top to bottom. Other cells keep their fields.
pub fn renumber_execution_counts(notebook: &mut Notebook) -> Result<RenumberReport> {
    let mut report = RenumberReport::default();

    for (count, mut cell) in (1u64..).zip(notebook.code_cells_mut()?) {
        cell.set_execution_count(count);
        report.code_cells += 1;
    }

    debug!("Renumbered {} code cells", report.code_cells);
    Ok(report)
}
