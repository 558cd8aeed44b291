//! Error types for parquet-pager
//!
//! This module defines the error hierarchy for:
//! - Reading Parquet files and DuckDB page queries (`SourceError`)
//! - Batch pagination and page navigation (`PageError`)
//! - The DuckDB spreadsheet and CSV exports (`ExportError`)
//! - CLI configuration (`ConfigError`)
//!
//! Library code returns the specific error; `PagerError` wraps all of them
//! for callers that drive several components at once.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for parquet-pager
#[derive(Error, Debug)]
pub enum PagerError {
    /// Reading row groups or pages failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Pagination or page navigation failed
    #[error("Page error: {0}")]
    Page(#[from] PageError),

    /// Spreadsheet or CSV export errors
    #[cfg(feature = "duckdb")]
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors outside of a specific source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while opening a file or reading its rows
#[derive(Error, Debug)]
pub enum SourceError {
    /// File could not be opened or cloned
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parquet footer or page decoding error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Arrow decoding or batch assembly error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Requested row group does not exist in the file
    #[error("Row group {index} is out of range: file has {count} row groups")]
    RowGroupOutOfRange { index: usize, count: usize },

    /// User query does not read from the `data` placeholder
    #[error("Query string must contain 'FROM data'")]
    MissingDataTable,

    /// DuckDB query error
    #[cfg(feature = "duckdb")]
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),
}

/// Batch pagination and page navigation errors
#[derive(Error, Debug)]
pub enum PageError {
    /// A batch size of zero never advances the step counter
    #[error("Batch size must be greater than zero")]
    ZeroBatchSize,

    /// A page size of zero has no pages
    #[error("Page size must be greater than zero")]
    ZeroPageSize,

    /// `next_page` on the last page
    #[error("No more pages available")]
    NoMorePages,

    /// `previous_page` on the first page
    #[error("Already on the first page")]
    AlreadyFirstPage,

    /// Page number outside 1..=total
    #[error("Page number {page} is out of range: total number of pages is {total}")]
    InvalidPageNumber { page: usize, total: usize },

    /// The page source failed while reading a page
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Spreadsheet export errors
#[cfg(feature = "duckdb")]
#[derive(Error, Debug)]
pub enum ExportError {
    /// DuckDB rejected the statement or failed to load an extension
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error inspecting the written file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output path cannot be written
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    /// Extension name is not a plain identifier
    #[error("Invalid extension name '{name}'")]
    InvalidExtension { name: String },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid batch size
    #[error("Invalid batch size {size}: must be at least 1")]
    InvalidBatchSize { size: usize },

    /// Invalid page size
    #[error("Invalid page size {size}: must be between 1 and {max}")]
    InvalidPageSize { size: usize, max: usize },

    /// Invalid page number
    #[error("Invalid page number {page}: pages start at 1")]
    InvalidPageNumber { page: usize },

    /// Invalid row count for the sample generator
    #[error("Invalid row count {rows}: must be at least 1")]
    InvalidRowCount { rows: usize },

    /// Invalid row-group size for the sample generator
    #[error("Invalid row group size {size}: must be at least 1")]
    InvalidRowGroupSize { size: usize },

    /// Input file missing
    #[error("Input file '{path}' does not exist")]
    InputNotFound { path: PathBuf },

    /// Output path error
    #[error("Invalid output path '{path}': {reason}")]
    InvalidOutputPath { path: PathBuf, reason: String },

    /// Query text is empty
    #[error("Query must not be empty")]
    EmptyQuery,

    /// Backend was compiled out
    #[error("Backend '{backend}' is not available: rebuild with the '{feature}' feature")]
    BackendUnavailable {
        backend: &'static str,
        feature: &'static str,
    },
}

/// Result type alias for PagerError
pub type Result<T> = std::result::Result<T, PagerError>;

/// Result type alias for SourceError
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Result type alias for PageError
pub type PageResult<T> = std::result::Result<T, PageError>;

/// Result type alias for ExportError
#[cfg(feature = "duckdb")]
pub type ExportResult<T> = std::result::Result<T, ExportError>;

impl SourceError {
    /// True when the error comes from asking for a row group the file does not have
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, SourceError::RowGroupOutOfRange { .. })
    }
}
