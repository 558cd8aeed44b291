//! Configuration types for parquet-pager
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Per-command runtime configuration with validation

use crate::error::ConfigError;
use crate::generate::GenerateConfig;
use crate::paginate::{PaginateOptions, StepMode};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

/// Input read when no file is given
pub const DEFAULT_INPUT: &str = "data/large.parquet";

/// Default step of the batch paginator
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Largest page the `page` command will print
pub const MAX_PAGE_SIZE: usize = 10_000;

/// Lazy row-group and page readers for Parquet files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "parquet-pager",
    version,
    about = "Lazy row-group and page readers for Parquet files",
    long_about = "Reads Parquet files one row group or one page at a time.\n\n\
                  'batches' pulls row-group batches through the step-counter paginator,\n\
                  'page' serves numbered pages from the file reader or from DuckDB,\n\
                  'query' pages through a SQL query over the file (and can save it as CSV),\n\
                  and 'export-excel' writes a query result to a spreadsheet via DuckDB.",
    after_help = "EXAMPLES:\n    \
        parquet-pager generate data/large.parquet --rows 100000 --row-group-size 10000\n    \
        parquet-pager batches data/large.parquet -b 20 --max-batches 1 --show\n    \
        parquet-pager batches data/large.parquet --by-row-group\n    \
        parquet-pager page data/large.parquet --page 3 --page-size 25 --backend duckdb\n    \
        parquet-pager metadata data/large.parquet --schema --json\n    \
        parquet-pager query data/large.parquet --sql \"SELECT * FROM data WHERE id > 10\" --export-csv\n    \
        parquet-pager export-excel -o output.xlsx"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Quiet mode - suppress progress output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Iterate row-group batches with the step-counter paginator
    Batches {
        /// Parquet file to read
        #[arg(value_name = "FILE", default_value = DEFAULT_INPUT)]
        file: PathBuf,

        /// Step size of the counter
        #[arg(short = 'b', long, default_value_t = DEFAULT_BATCH_SIZE, value_name = "NUM")]
        batch_size: usize,

        /// Step through row-group indices instead of row offsets
        #[arg(long)]
        by_row_group: bool,

        /// Stop after this many batches
        #[arg(long, value_name = "NUM")]
        max_batches: Option<usize>,

        /// Print each batch as a table
        #[arg(long)]
        show: bool,
    },

    /// Print one page of rows
    Page {
        /// Parquet file to read
        #[arg(value_name = "FILE", default_value = DEFAULT_INPUT)]
        file: PathBuf,

        /// 1-based page number
        #[arg(short = 'p', long, default_value_t = 1, value_name = "NUM")]
        page: usize,

        /// Rows per page
        #[arg(short = 'n', long, default_value_t = crate::pager::DEFAULT_PAGE_SIZE, value_name = "NUM")]
        page_size: usize,

        /// Where pages come from
        #[arg(long, value_enum, default_value_t = Backend::Parquet)]
        backend: Backend,

        /// Emit JSON rows instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show file metadata and schema
    Metadata {
        /// Parquet file to read
        #[arg(value_name = "FILE", default_value = DEFAULT_INPUT)]
        file: PathBuf,

        /// Include the column listing
        #[arg(long)]
        schema: bool,

        /// Emit JSON
        #[arg(long)]
        json: bool,
    },

    /// Run SQL over the file (read it as `data`) and print one page of the result
    #[cfg(feature = "duckdb")]
    Query {
        /// Parquet file to read
        #[arg(value_name = "FILE", default_value = DEFAULT_INPUT)]
        file: PathBuf,

        /// Query text; must contain `FROM data`
        #[arg(short, long, value_name = "SQL")]
        sql: String,

        /// 1-based page number
        #[arg(short = 'p', long, default_value_t = 1, value_name = "NUM")]
        page: usize,

        /// Rows per page
        #[arg(short = 'n', long, default_value_t = crate::pager::DEFAULT_PAGE_SIZE, value_name = "NUM")]
        page_size: usize,

        /// Emit JSON rows instead of a table
        #[arg(long)]
        json: bool,

        /// Also save the whole result as `<stem>-<uuid>.csv` next to the file
        #[arg(long)]
        export_csv: bool,

        /// Save the whole result to this CSV file instead
        #[arg(long, value_name = "FILE")]
        csv_output: Option<PathBuf>,
    },

    /// Export a query result to a spreadsheet through DuckDB
    #[cfg(feature = "duckdb")]
    ExportExcel {
        /// Query whose results are exported
        #[arg(long, default_value = crate::export::DEFAULT_QUERY, value_name = "SQL")]
        query: String,

        /// Output workbook
        #[arg(short, long, default_value = crate::export::DEFAULT_OUTPUT, value_name = "FILE")]
        output: PathBuf,

        /// GDAL driver name
        #[arg(long, default_value = crate::export::DEFAULT_DRIVER)]
        driver: String,
    },

    /// Write a deterministic sample file with several row groups
    Generate {
        /// Output Parquet file
        #[arg(value_name = "FILE", default_value = DEFAULT_INPUT)]
        file: PathBuf,

        /// Total rows
        #[arg(long, default_value_t = 100_000, value_name = "NUM")]
        rows: usize,

        /// Rows per row group
        #[arg(long, default_value_t = 10_000, value_name = "NUM")]
        row_group_size: usize,

        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

/// Page backend
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Offset/limit reads through the Parquet reader
    Parquet,
    /// `LIMIT/OFFSET` queries on DuckDB's read_parquet
    Duckdb,
}

/// Validated `batches` configuration
#[derive(Debug, Clone)]
pub struct BatchesConfig {
    pub input: PathBuf,
    pub options: PaginateOptions,
    pub max_batches: Option<usize>,
    pub show_batches: bool,
    pub show_progress: bool,
}

/// Validated `page` configuration
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub input: PathBuf,
    pub page: usize,
    pub page_size: usize,
    pub backend: Backend,
    pub json: bool,
}

/// Validated `metadata` configuration
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    pub input: PathBuf,
    pub schema: bool,
    pub json: bool,
}

/// Validated `query` configuration
#[cfg(feature = "duckdb")]
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub input: PathBuf,
    pub sql: String,
    pub page: usize,
    pub page_size: usize,
    pub json: bool,
    /// `Some(None)` exports next to the input, `Some(Some(path))` to `path`
    pub csv: Option<Option<PathBuf>>,
}

/// Validated `export-excel` configuration
#[cfg(feature = "duckdb")]
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub query: String,
    pub output: PathBuf,
    pub driver: String,
}

/// Validated `generate` configuration
#[derive(Debug, Clone)]
pub struct GenerateCommandConfig {
    pub output: PathBuf,
    pub generate: GenerateConfig,
}

/// Validated runtime configuration, one variant per command
#[derive(Debug, Clone)]
pub enum RunConfig {
    Batches(BatchesConfig),
    Page(PageConfig),
    Metadata(MetadataConfig),
    #[cfg(feature = "duckdb")]
    Query(QueryConfig),
    #[cfg(feature = "duckdb")]
    Export(ExportConfig),
    Generate(GenerateCommandConfig),
}

impl RunConfig {
    /// Create and validate configuration from CLI arguments
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        let show_progress = !args.quiet;

        match args.command {
            Command::Batches {
                file,
                batch_size,
                by_row_group,
                max_batches,
                show,
            } => {
                if batch_size == 0 {
                    return Err(ConfigError::InvalidBatchSize { size: batch_size });
                }
                check_input(&file)?;

                let mode = if by_row_group {
                    StepMode::RowGroup
                } else {
                    StepMode::RowOffset
                };

                Ok(RunConfig::Batches(BatchesConfig {
                    input: file,
                    options: PaginateOptions::new(batch_size).with_mode(mode),
                    max_batches,
                    show_batches: show,
                    show_progress,
                }))
            }

            Command::Page {
                file,
                page,
                page_size,
                backend,
                json,
            } => {
                check_page(page, page_size)?;
                check_backend(backend)?;
                check_input(&file)?;

                Ok(RunConfig::Page(PageConfig {
                    input: file,
                    page,
                    page_size,
                    backend,
                    json,
                }))
            }

            Command::Metadata { file, schema, json } => {
                check_input(&file)?;
                Ok(RunConfig::Metadata(MetadataConfig {
                    input: file,
                    schema,
                    json,
                }))
            }

            #[cfg(feature = "duckdb")]
            Command::Query {
                file,
                sql,
                page,
                page_size,
                json,
                export_csv,
                csv_output,
            } => {
                if sql.trim().is_empty() {
                    return Err(ConfigError::EmptyQuery);
                }
                check_page(page, page_size)?;
                check_input(&file)?;
                if let Some(output) = &csv_output {
                    check_output_parent(output)?;
                }

                let csv = match csv_output {
                    Some(path) => Some(Some(path)),
                    None if export_csv => Some(None),
                    None => None,
                };

                Ok(RunConfig::Query(QueryConfig {
                    input: file,
                    sql,
                    page,
                    page_size,
                    json,
                    csv,
                }))
            }

            #[cfg(feature = "duckdb")]
            Command::ExportExcel {
                query,
                output,
                driver,
            } => {
                if query.trim().is_empty() {
                    return Err(ConfigError::EmptyQuery);
                }
                check_output_parent(&output)?;
                Ok(RunConfig::Export(ExportConfig {
                    query,
                    output,
                    driver,
                }))
            }

            Command::Generate {
                file,
                rows,
                row_group_size,
                seed,
            } => {
                if rows == 0 {
                    return Err(ConfigError::InvalidRowCount { rows });
                }
                if row_group_size == 0 {
                    return Err(ConfigError::InvalidRowGroupSize {
                        size: row_group_size,
                    });
                }
                Ok(RunConfig::Generate(GenerateCommandConfig {
                    output: file,
                    generate: GenerateConfig {
                        rows,
                        row_group_size,
                        seed,
                        ..GenerateConfig::default()
                    },
                }))
            }
        }
    }
}

fn check_input(path: &Path) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn check_page(page: usize, page_size: usize) -> Result<(), ConfigError> {
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidPageSize {
            size: page_size,
            max: MAX_PAGE_SIZE,
        });
    }
    if page == 0 {
        return Err(ConfigError::InvalidPageNumber { page });
    }
    Ok(())
}

#[cfg(feature = "duckdb")]
fn check_output_parent(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ConfigError::InvalidOutputPath {
                path: path.to_path_buf(),
                reason: format!("Parent directory '{}' does not exist", parent.display()),
            });
        }
    }
    Ok(())
}

fn check_backend(backend: Backend) -> Result<(), ConfigError> {
    if backend == Backend::Duckdb && !cfg!(feature = "duckdb") {
        return Err(ConfigError::BackendUnavailable {
            backend: "duckdb",
            feature: "duckdb",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> CliArgs {
        let mut argv = vec!["parquet-pager"];
        argv.extend_from_slice(args);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_batches_defaults() {
        let args = parse(&["batches"]);
        match args.command {
            Command::Batches {
                file,
                batch_size,
                by_row_group,
                max_batches,
                ..
            } => {
                assert_eq!(file, PathBuf::from(DEFAULT_INPUT));
                assert_eq!(batch_size, 20);
                assert!(!by_row_group);
                assert_eq!(max_batches, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_batches_config() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.parquet");
        fs::write(&input, b"x").unwrap();

        let args = parse(&[
            "-q",
            "batches",
            input.to_str().unwrap(),
            "-b",
            "5",
            "--by-row-group",
        ]);
        let RunConfig::Batches(config) = RunConfig::from_args(args).unwrap() else {
            panic!("expected batches config");
        };
        assert_eq!(config.options.batch_size, 5);
        assert_eq!(config.options.mode, StepMode::RowGroup);
        assert!(!config.show_progress);
    }

    #[test]
    fn test_zero_batch_size() {
        let args = parse(&["batches", "-b", "0"]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidBatchSize { size: 0 })
        ));
    }

    #[test]
    fn test_missing_input() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.parquet");
        let args = parse(&["metadata", missing.to_str().unwrap()]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InputNotFound { .. })
        ));
    }

    #[test]
    fn test_page_validation() {
        let args = parse(&["page", "--page-size", "0"]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidPageSize { size: 0, .. })
        ));

        let args = parse(&["page", "--page", "0"]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidPageNumber { page: 0 })
        ));
    }

    #[test]
    fn test_backend_value_enum() {
        let args = parse(&["page", "--backend", "duckdb"]);
        match args.command {
            Command::Page { backend, .. } => assert_eq!(backend, Backend::Duckdb),
            other => panic!("unexpected command {:?}", other),
        }
        assert!(CliArgs::try_parse_from(["parquet-pager", "page", "--backend", "sqlite"]).is_err());
    }

    #[test]
    fn test_generate_validation() {
        let args = parse(&["generate", "--rows", "0"]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidRowCount { rows: 0 })
        ));

        let args = parse(&["generate", "out.parquet", "--rows", "50", "--row-group-size", "7"]);
        let RunConfig::Generate(config) = RunConfig::from_args(args).unwrap() else {
            panic!("expected generate config");
        };
        assert_eq!(config.output, PathBuf::from("out.parquet"));
        assert_eq!(config.generate.rows, 50);
        assert_eq!(config.generate.row_group_size, 7);
    }

    #[cfg(feature = "duckdb")]
    #[test]
    fn test_query_config() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.parquet");
        fs::write(&input, b"x").unwrap();
        let file = input.to_str().unwrap();

        let args = parse(&["query", file, "--sql", "SELECT * FROM data", "-p", "2"]);
        let RunConfig::Query(config) = RunConfig::from_args(args).unwrap() else {
            panic!("expected query config");
        };
        assert_eq!(config.page, 2);
        assert_eq!(config.page_size, crate::pager::DEFAULT_PAGE_SIZE);
        assert_eq!(config.csv, None);

        let args = parse(&["query", file, "--sql", "SELECT * FROM data", "--export-csv"]);
        let RunConfig::Query(config) = RunConfig::from_args(args).unwrap() else {
            panic!("expected query config");
        };
        assert_eq!(config.csv, Some(None));

        let target = dir.path().join("out.csv");
        let args = parse(&[
            "query",
            file,
            "--sql",
            "SELECT * FROM data",
            "--csv-output",
            target.to_str().unwrap(),
        ]);
        let RunConfig::Query(config) = RunConfig::from_args(args).unwrap() else {
            panic!("expected query config");
        };
        assert_eq!(config.csv, Some(Some(target)));
    }

    #[cfg(feature = "duckdb")]
    #[test]
    fn test_query_validation() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.parquet");
        fs::write(&input, b"x").unwrap();
        let file = input.to_str().unwrap();

        let args = parse(&["query", file, "--sql", " "]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::EmptyQuery)
        ));

        let args = parse(&["query", file, "--sql", "SELECT * FROM data", "-n", "0"]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidPageSize { size: 0, .. })
        ));

        let args = parse(&[
            "query",
            file,
            "--sql",
            "SELECT * FROM data",
            "--csv-output",
            "/definitely/missing/dir/out.csv",
        ]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidOutputPath { .. })
        ));

        assert!(CliArgs::try_parse_from(["parquet-pager", "query", file]).is_err());
    }

    #[cfg(feature = "duckdb")]
    #[test]
    fn test_export_defaults_and_validation() {
        let args = parse(&["export-excel"]);
        let RunConfig::Export(config) = RunConfig::from_args(args).unwrap() else {
            panic!("expected export config");
        };
        assert_eq!(config.query, "SELECT 1 as a, 2 as b");
        assert_eq!(config.output, PathBuf::from("output.xlsx"));
        assert_eq!(config.driver, "xlsx");

        let args = parse(&["export-excel", "--query", "  "]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::EmptyQuery)
        ));

        let args = parse(&["export-excel", "-o", "/definitely/missing/dir/out.xlsx"]);
        assert!(matches!(
            RunConfig::from_args(args),
            Err(ConfigError::InvalidOutputPath { .. })
        ));
    }
}
