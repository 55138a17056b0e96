use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::{parse_notebook, render_notebook, write_notebook};
use crate::pipeline::{SanitizeConfig, sanitize};

/// How `process_files` treats its results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessMode {
    /// Rewrite files that changed
    #[default]
    Write,
    /// Only report which files would change
    Check,
}

/// Outcome of processing a batch of notebooks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub files: usize,
    /// Files whose sanitized form differs from what is on disk
    pub changed: Vec<PathBuf>,
}

/// Sanitize each notebook file in turn.
///
/// A file is only written once its notebook has been sanitized
/// successfully. The first failure aborts the batch.
pub fn process_files(
    paths: &[PathBuf],
    config: &SanitizeConfig,
    mode: ProcessMode,
) -> Result<ProcessSummary> {
    let mut summary = ProcessSummary::default();

    for path in paths {
        info!("Sanitizing {}...", path.display());
        let changed = process_file(path, config, mode)?;
        summary.files += 1;
        if changed {
            summary.changed.push(path.clone());
        }
    }

    Ok(summary)
}

fn process_file(path: &Path, config: &SanitizeConfig, mode: ProcessMode) -> Result<bool> {
    let original =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let mut notebook =
        parse_notebook(&original).with_context(|| format!("Failed to load {:?}", path))?;

    let report = sanitize(&mut notebook, config)
        .with_context(|| format!("Failed to sanitize {:?} ({})", path, config.name()))?;
    debug!("{:?}: {:?}", path, report);

    let rendered = render_notebook(&notebook)?;
    if rendered == original {
        debug!("{:?} already sanitized", path);
        return Ok(false);
    }

    if mode == ProcessMode::Write {
        write_notebook(path, &notebook)?;
    }
    Ok(true)
}
