use crate::error::Result;
use crate::models::Notebook;
use crate::stages::{
    ClearReport, FlattenReport, PreambleAction, PreambleConfig, RenumberReport,
    clear_install_output, ensure_preamble, flatten_outputs, renumber_execution_counts,
};

/// Which sanitizer to run over a notebook
#[derive(Debug, Clone)]
pub enum SanitizeConfig {
    /// Prepare notebooks for a JupyterLite (Pyodide) kernel
    Lite { preamble: PreambleConfig },
    /// Clean notebooks before publishing them
    Publish,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self::Lite {
            preamble: PreambleConfig::default(),
        }
    }
}

impl SanitizeConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lite { .. } => "lite",
            Self::Publish => "publish",
        }
    }
}

/// Result of sanitizing one notebook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub preamble: Option<PreambleAction>,
    pub cleared: Option<ClearReport>,
    pub flattened: FlattenReport,
    pub renumbered: Option<RenumberReport>,
}

/// Sanitize a notebook in place
///
/// Lite runs:
/// 1. Ensure the Pyodide preamble is the first cell
/// 2. Flatten multi-part output text
///
/// Publish runs:
/// 1. Clear the output of `%pip` cells
/// 2. Flatten multi-part output text
/// 3. Renumber execution counts
///
/// Stops at the first structural error. The notebook may be partly rewritten
/// at that point, so callers should discard it.
pub fn sanitize(notebook: &mut Notebook, config: &SanitizeConfig) -> Result<SanitizeReport> {
    let mut report = SanitizeReport::default();

    match config {
        SanitizeConfig::Lite { preamble } => {
            report.preamble = Some(ensure_preamble(notebook, preamble)?);
            report.flattened = flatten_outputs(notebook)?;
        }
        SanitizeConfig::Publish => {
            report.cleared = Some(clear_install_output(notebook)?);
            report.flattened = flatten_outputs(notebook)?;
            report.renumbered = Some(renumber_execution_counts(notebook)?);
        }
    }

    Ok(report)
}

/// Sanitize a copy of the notebook, leaving the input untouched
pub fn sanitized(notebook: &Notebook, config: &SanitizeConfig) -> Result<(Notebook, SanitizeReport)> {
    let mut copy = notebook.clone();
    let report = sanitize(&mut copy, config)?;
    Ok((copy, report))
}
