use serde_json::{Value, json};
use tracing::debug;

use crate::error::Result;
use crate::models::{Cell, Notebook};

/// Substring identifying a cell as the Pyodide setup preamble
pub const PREAMBLE_MARKER: &str = "pyodide";

const PREAMBLE_TEMPLATE: &str = r#"import sys
if "pyodide" in sys.modules:
    import piplite
    await piplite.install('{requirement}')"#;

/// Configuration for the preamble cell
#[derive(Debug, Clone)]
pub struct PreambleConfig {
    /// Package installed through piplite
    pub package: String,
    /// Version constraint appended to the package name
    pub bound: String,
}

impl Default for PreambleConfig {
    fn default() -> Self {
        Self {
            package: "opvious".to_string(),
            bound: ">=0.14.0".to_string(),
        }
    }
}

impl PreambleConfig {
    pub fn new(package: impl Into<String>, bound: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            bound: bound.into(),
        }
    }

    /// Python source of the preamble cell
    pub fn source(&self) -> String {
        let requirement = format!("{}{}", self.package, self.bound);
        PREAMBLE_TEMPLATE.replace("{requirement}", &requirement)
    }

    /// Build a fresh preamble cell
    pub fn build_cell(&self) -> Value {
        json!({
            "cell_type": "code",
            "metadata": {},
            "source": self.source(),
            "outputs": [],
            "execution_count": 0,
        })
    }
}

/// What `ensure_preamble` did to the notebook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreambleAction {
    Inserted,
    Replaced,
}

/// Whether a cell is a previously injected preamble
pub fn is_preamble_cell(cell: &Cell<'_>) -> Result<bool> {
    Ok(cell.source_text()?.contains(PREAMBLE_MARKER))
}

/// Make the first cell of the notebook the preamble.
///
/// An existing preamble in first position is replaced so its bound is
/// refreshed; otherwise the preamble is inserted ahead of every other cell.
pub fn ensure_preamble(notebook: &mut Notebook, config: &PreambleConfig) -> Result<PreambleAction> {
    let replace = match notebook.cells()?.first() {
        Some(first) => is_preamble_cell(&Cell::new(0, first)?)?,
        None => false,
    };

    let preamble = config.build_cell();
    let cells = notebook.cells_mut()?;
    let action = if replace {
        cells[0] = preamble;
        PreambleAction::Replaced
    } else {
        cells.insert(0, preamble);
        PreambleAction::Inserted
    };

    debug!("Preamble {:?} (requirement {}{})", action, config.package, config.bound);
    Ok(action)
}
