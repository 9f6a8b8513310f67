//! Command implementations for quarterdiff CLI

use crate::cli::{Commands, OutputFormat};
use crate::column::ColumnRef;
use crate::comparator::{CompareProgress, RowComparator};
use crate::config::CompareConfig;
use crate::data::LoadedTable;
use crate::error::{QuarterdiffError, Result};
use crate::output::{ComparisonReport, JsonFormatter, OutputManager, PrettyPrinter, SourceInfo};
use crate::progress::ProgressReporter;
use std::path::{Path, PathBuf};

/// Everything `compare` needs, after config and flags are merged
#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub baseline: PathBuf,
    pub current: PathBuf,
    pub config: CompareConfig,
    pub show_progress: bool,
}

/// Execute a command
pub fn execute_command(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Compare {
            baseline,
            current,
            columns,
            key,
            word_diff,
            format,
            output,
            limit,
            quiet,
            no_progress,
        } => {
            let format = OutputFormat::parse(&format).map_err(QuarterdiffError::invalid_input)?;
            let config = load_config(config_path)?.with_overrides(
                key,
                columns.map(|c| c.0),
                word_diff.map(|c| c.0),
            );
            let request = CompareRequest {
                baseline,
                current,
                config,
                show_progress: !no_progress && !quiet && format == OutputFormat::Pretty,
            };
            compare_command(&request, format, output.as_deref(), limit, quiet)
        }
        Commands::Headers { input, format } => headers_command(&input, &format),
        Commands::Init { dir, force } => init_command(dir.as_deref(), force),
    }
}

fn load_config(config_path: Option<&Path>) -> Result<CompareConfig> {
    let current_dir = std::env::current_dir()?;
    CompareConfig::discover(config_path, &current_dir)
}

/// Load both tables and run the comparator
pub fn run_compare(request: &CompareRequest) -> Result<ComparisonReport> {
    let mut progress = if request.show_progress {
        ProgressReporter::new_for_compare()
    } else {
        ProgressReporter::new_minimal()
    };

    progress.update_loading("Loading baseline table...");
    let baseline = LoadedTable::load(&request.baseline)?;
    progress.update_loading("Loading current table...");
    let current = LoadedTable::load(&request.current)?;
    progress.finish_loading(
        &format!(
            "✅ Loaded {} baseline and {} current rows",
            baseline.table.row_count(),
            current.table.row_count()
        ),
        current.table.row_count() as u64,
    );

    let options = request.config.to_options();
    log::debug!(
        "Comparing columns [{}] keyed on {}",
        join_refs(&options.compare_columns),
        options.key_column
    );

    let observer = |event: CompareProgress| progress.observe(event);
    let result = RowComparator::compare_with_progress(
        &baseline.table,
        &current.table,
        &options,
        Some(&observer),
    )?;
    progress.finish_rows("✅ Comparison complete");

    Ok(ComparisonReport::new(
        SourceInfo::describe(&baseline.source, &baseline.table),
        SourceInfo::describe(&current.source, &current.table),
        result,
    ))
}

fn compare_command(
    request: &CompareRequest,
    format: OutputFormat,
    output: Option<&Path>,
    limit: usize,
    quiet: bool,
) -> Result<()> {
    let report = run_compare(request)?;

    if let Some(path) = output {
        OutputManager::write_report(&report, path)?;
    }

    if quiet {
        PrettyPrinter::print_quiet(&report);
        return Ok(());
    }

    match format {
        OutputFormat::Pretty => {
            PrettyPrinter::print_report(&report, limit);
            if let Some(path) = output {
                println!();
                println!("💾 Saved: {}", path.display());
            }
        }
        OutputFormat::Json => println!("{}", JsonFormatter::format(&report)?),
    }

    Ok(())
}

fn headers_command(input: &Path, format: &str) -> Result<()> {
    let format = OutputFormat::parse(format).map_err(QuarterdiffError::invalid_input)?;
    let loaded = LoadedTable::load(input)?;

    match format {
        OutputFormat::Pretty => PrettyPrinter::print_headers(&loaded.source, &loaded.table),
        OutputFormat::Json => println!("{}", JsonFormatter::format_headers(&loaded.table)?),
    }

    Ok(())
}

fn init_command(dir: Option<&Path>, force: bool) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let root = dir.unwrap_or(&current_dir);
    let path = CompareConfig::write_default(root, force)?;

    println!("✅ Wrote default configuration: {}", path.display());
    Ok(())
}

fn join_refs(refs: &[ColumnRef]) -> String {
    refs.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}
