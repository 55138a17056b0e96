use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nbsanitize::{
    PreambleConfig, ProcessMode, SanitizeConfig, discover_notebooks, is_install_cell,
    is_preamble_cell, process_files, read_notebook,
};

#[derive(Parser)]
#[command(name = "nbsanitize")]
#[command(author, version, about = "Jupyter notebook sanitizers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make notebooks JupyterLite-friendly (preamble cell, flat output text)
    Lite {
        /// Directory holding the notebooks
        #[arg(long, default_value = "notebooks")]
        root: PathBuf,

        /// Glob pattern, relative to the root
        #[arg(long, default_value = "*.ipynb")]
        pattern: String,

        /// Package installed by the preamble cell
        #[arg(long, default_value = "opvious")]
        package: String,

        /// Version constraint for the package
        #[arg(long, default_value = ">=0.14.0")]
        bound: String,

        /// Report notebooks that would change without writing them
        #[arg(long)]
        check: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Clean notebooks for publishing (install output, flat output text, execution counts)
    Publish {
        /// Directory holding the notebooks
        #[arg(long, default_value = "resources")]
        root: PathBuf,

        /// Glob pattern, relative to the root
        #[arg(long, default_value = "**/*.ipynb")]
        pattern: String,

        /// Report notebooks that would change without writing them
        #[arg(long)]
        check: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Summarize a notebook without changing it
    Inspect {
        /// Notebook file
        #[arg(short, long)]
        input: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lite {
            root,
            pattern,
            package,
            bound,
            check,
            verbose,
        } => {
            setup_logging(verbose);
            let config = SanitizeConfig::Lite {
                preamble: PreambleConfig::new(package, bound),
            };
            run_sanitizer(root, &pattern, &config, check)
        }
        Commands::Publish {
            root,
            pattern,
            check,
            verbose,
        } => {
            setup_logging(verbose);
            run_sanitizer(root, &pattern, &SanitizeConfig::Publish, check)
        }
        Commands::Inspect { input, verbose } => {
            setup_logging(verbose);
            inspect_notebook(input)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn run_sanitizer(root: PathBuf, pattern: &str, config: &SanitizeConfig, check: bool) -> Result<()> {
    let paths = discover_notebooks(&root, pattern)
        .with_context(|| format!("Failed to discover notebooks under {:?}", root))?;
    info!(
        "Found {} notebooks under {:?} ({} sanitizer)",
        paths.len(),
        root,
        config.name()
    );

    let mode = if check {
        ProcessMode::Check
    } else {
        ProcessMode::Write
    };
    let summary = process_files(&paths, config, mode)?;

    if check && !summary.changed.is_empty() {
        let listing: Vec<String> = summary
            .changed
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        bail!(
            "{} of {} notebooks need sanitizing:\n  {}",
            summary.changed.len(),
            summary.files,
            listing.join("\n  ")
        );
    }

    info!(
        "Complete: {} notebooks, {} {}",
        summary.files,
        summary.changed.len(),
        if check { "would change" } else { "rewritten" }
    );
    Ok(())
}

fn inspect_notebook(input: PathBuf) -> Result<()> {
    info!("Inspecting notebook {:?}", input);
    let notebook = read_notebook(&input).context("Failed to load notebook")?;
    let stats = notebook.stats()?;

    let cells = notebook.cell_views()?;
    let has_preamble = match cells.first() {
        Some(first) => is_preamble_cell(first)?,
        None => false,
    };
    let mut install_cells = 0;
    for cell in &cells {
        if cell.is_code()? && is_install_cell(cell)? {
            install_cells += 1;
        }
    }

    println!("Notebook Summary");
    println!("================");
    println!("Total cells: {}", stats.total_cells);
    for (cell_type, count) in &stats.cells_by_type {
        println!("  {}: {}", cell_type, count);
    }
    println!();

    println!("Code Cells");
    println!("----------");
    println!("Executed: {}", stats.executed_code_cells);
    println!("Install cells: {}", install_cells);
    println!("Pyodide preamble: {}", if has_preamble { "yes" } else { "no" });
    println!();

    println!("Outputs");
    println!("-------");
    println!("Total outputs: {}", stats.outputs);
    println!("With multi-part text: {}", stats.fragmented_outputs);

    Ok(())
}
