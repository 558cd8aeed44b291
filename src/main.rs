//! parquet-pager - Lazy row-group and page readers for Parquet files
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use humansize::{format_size, BINARY};
use parquet_pager::config::{
    Backend, BatchesConfig, CliArgs, GenerateCommandConfig, MetadataConfig, PageConfig, RunConfig,
};
use parquet_pager::error::PageError;
use parquet_pager::generate::write_sample_parquet;
use parquet_pager::metadata::{describe_schema, FileSummary};
use parquet_pager::paginate::{paginate_with, StepMode};
use parquet_pager::pager::PageCursor;
use parquet_pager::progress::{
    format_number, print_header, print_section, print_summary, BatchRunStats, ProgressReporter,
};
use parquet_pager::render::{batches_to_json, pretty_table};
use parquet_pager::source::{PageSource, ParquetFile, RowGroupSource};
use std::fs;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose, args.quiet)?;

    // Validate and create config
    let config = RunConfig::from_args(args).context("Invalid configuration")?;

    match config {
        RunConfig::Batches(config) => run_batches(config),
        RunConfig::Page(config) => run_page(config),
        RunConfig::Metadata(config) => run_metadata(config),
        #[cfg(feature = "duckdb")]
        RunConfig::Query(config) => run_query(config),
        #[cfg(feature = "duckdb")]
        RunConfig::Export(config) => run_export(config),
        RunConfig::Generate(config) => run_generate(config),
    }
}

/// Drain the batch paginator, printing progress and a summary
fn run_batches(config: BatchesConfig) -> Result<()> {
    let file = ParquetFile::open(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;

    if config.show_progress {
        let file_size = fs::metadata(&config.input).ok().map(|m| m.len());
        let step = match config.options.mode {
            StepMode::RowOffset => format!("row offsets, batch size {}", config.options.batch_size),
            StepMode::RowGroup => "row groups".to_string(),
        };
        print_header(&config.input, file.num_row_groups(), file.num_rows(), file_size, &step);
    }

    let batches = paginate_with(file, config.options).context("Failed to start pagination")?;

    let limit = config.max_batches.unwrap_or(usize::MAX);
    let steps = batches.remaining_steps().min(limit as u64);
    let progress = if config.show_progress {
        ProgressReporter::new(Some(steps))
    } else {
        ProgressReporter::hidden()
    };

    let start = Instant::now();
    let mut stats = BatchRunStats::default();

    for result in batches.take(limit) {
        match result {
            Ok(batch) => {
                stats.batches += 1;
                stats.rows += batch.num_rows() as u64;
                progress.record_batch(&stats);

                if config.show_batches {
                    let table = pretty_table(&[batch]).context("Failed to render batch")?;
                    progress.println(&table);
                }
            }
            Err(e) if e.is_out_of_range() => {
                warn!("{}", e);
                if config.options.mode == StepMode::RowOffset {
                    info!("Use --by-row-group to step through row groups by index");
                }
                stats.stopped_by = Some(e.to_string());
            }
            Err(e) => {
                progress.finish_and_clear();
                return Err(e).context("Failed to read batch");
            }
        }
    }
    stats.duration = start.elapsed();

    if config.show_progress {
        progress.finish("Done");
        print_summary(&stats);
    } else {
        progress.finish_and_clear();
    }

    info!(
        batches = stats.batches,
        rows = stats.rows,
        "Batch pagination finished"
    );

    Ok(())
}

/// Print one numbered page
fn run_page(config: PageConfig) -> Result<()> {
    let source: Box<dyn PageSource> = match config.backend {
        Backend::Parquet => Box::new(
            ParquetFile::open(&config.input)
                .with_context(|| format!("Failed to open {}", config.input.display()))?,
        ),
        #[cfg(feature = "duckdb")]
        Backend::Duckdb => Box::new(
            parquet_pager::source::DuckDbSource::open(&config.input)
                .with_context(|| format!("Failed to query {}", config.input.display()))?,
        ),
        #[cfg(not(feature = "duckdb"))]
        Backend::Duckdb => anyhow::bail!("DuckDB backend is not available"),
    };

    print_page(source, config.page, config.page_size, config.json)
}

/// Seek `source` to `page` and print it as a table or JSON rows
fn print_page(source: Box<dyn PageSource>, page: usize, page_size: usize, json: bool) -> Result<()> {
    let mut cursor = PageCursor::new(source, page_size)?;
    let total = cursor.total_pages(page_size);
    if page > total {
        return Err(PageError::InvalidPageNumber { page, total }).context("Failed to read page");
    }

    let batch = cursor
        .goto_page(Some(page), page_size)
        .context("Failed to read page")?;

    if json {
        let rows = batches_to_json(&[batch]).context("Failed to render page")?;
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let rows = batch.num_rows();
    println!("{}", pretty_table(&[batch]).context("Failed to render page")?);
    println!(
        "{}",
        style(format!(
            "Page {} of {} ({} rows, {} total)",
            cursor.page_number(),
            total,
            rows,
            format_number(cursor.total_items())
        ))
        .dim()
    );

    Ok(())
}

/// Run a query over the file, print one page of its result and optionally save it as CSV
#[cfg(feature = "duckdb")]
fn run_query(config: parquet_pager::config::QueryConfig) -> Result<()> {
    use parquet_pager::source::DuckDbSource;

    let source = DuckDbSource::query(&config.input, &config.sql)
        .with_context(|| format!("Query over {} failed", config.input.display()))?;

    if let Some(target) = &config.csv {
        let stats = source
            .export_csv(target.as_deref())
            .context("CSV export failed")?;
        eprintln!(
            "{} {} ({})",
            style("Exported").green().bold(),
            stats.output_path.display(),
            format_size(stats.bytes_written, BINARY)
        );
    }

    if source.total_rows() == 0 {
        println!("{}", style("Query returned no rows").dim());
        return Ok(());
    }

    print_page(Box::new(source), config.page, config.page_size, config.json)
}

/// Print the footer summary and optionally the schema
fn run_metadata(config: MetadataConfig) -> Result<()> {
    let file = ParquetFile::open(&config.input)
        .with_context(|| format!("Failed to open {}", config.input.display()))?;
    let summary = FileSummary::from_file(&file);
    let columns = if config.schema {
        Some(describe_schema(&file.schema()))
    } else {
        None
    };

    if config.json {
        let value = serde_json::json!({
            "metadata": summary,
            "schema": columns,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_section("File Metadata", &summary.entries());

    let row_groups: Vec<(String, String)> = summary
        .row_groups
        .iter()
        .map(|rg| {
            (
                format!("#{}", rg.index),
                format!(
                    "{} rows, {} ({} compressed)",
                    format_number(rg.num_rows.max(0) as u64),
                    format_size(rg.total_byte_size.max(0) as u64, BINARY),
                    format_size(rg.compressed_size.max(0) as u64, BINARY)
                ),
            )
        })
        .collect();
    let row_group_entries: Vec<(&str, String)> = row_groups
        .iter()
        .map(|(k, v)| (k.as_str(), v.clone()))
        .collect();
    print_section("Row Groups", &row_group_entries);

    if let Some(columns) = columns {
        let entries: Vec<(&str, String)> = columns
            .iter()
            .map(|c| {
                let nullable = if c.nullable { ", nullable" } else { "" };
                (c.name.as_str(), format!("{}{}", c.type_label(), nullable))
            })
            .collect();
        print_section("Schema", &entries);
    }
    println!();

    Ok(())
}

/// Export a query result through DuckDB's GDAL writer
#[cfg(feature = "duckdb")]
fn run_export(config: parquet_pager::config::ExportConfig) -> Result<()> {
    use parquet_pager::export::{CopyStatement, ExcelExporter, SPATIAL_EXTENSION};

    let exporter = ExcelExporter::open_in_memory().context("Failed to open DuckDB")?;
    exporter
        .install_extension(SPATIAL_EXTENSION)
        .context("Failed to install the spatial extension")?;
    exporter
        .load_extension(SPATIAL_EXTENSION)
        .context("Failed to load the spatial extension")?;

    let statement = CopyStatement::from_query(&config.query)
        .to_file(&config.output)
        .driver(&config.driver);
    let stats = exporter.execute(&statement).context("Export failed")?;

    println!(
        "{} {} ({})",
        style("Exported").green().bold(),
        stats.output_path.display(),
        format_size(stats.bytes_written, BINARY)
    );
    Ok(())
}

/// Write the sample file
fn run_generate(config: GenerateCommandConfig) -> Result<()> {
    let stats = write_sample_parquet(&config.output, &config.generate)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;

    println!(
        "{} {} rows in {} row groups to {} ({})",
        style("Wrote").green().bold(),
        format_number(stats.rows_written),
        stats.row_groups,
        config.output.display(),
        format_size(stats.bytes_written, BINARY)
    );
    Ok(())
}

fn setup_logging(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("parquet_pager=debug,warn")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::new("parquet_pager=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
