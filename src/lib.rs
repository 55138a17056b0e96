pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use error::{NotebookError, Result};
pub use io::{
    ProcessMode, ProcessSummary, discover_notebooks, parse_notebook, process_files,
    read_notebook, render_notebook, write_notebook,
};
pub use models::{Cell, CellMut, CellType, Notebook, NotebookStats};
pub use pipeline::{SanitizeConfig, SanitizeReport, sanitize, sanitized};
pub use stages::{
    PreambleAction, PreambleConfig, clear_install_output, ensure_preamble, flatten_outputs,
    is_install_cell, is_preamble_cell, renumber_execution_counts,
};
