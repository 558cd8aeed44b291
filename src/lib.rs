//! parquet-pager - Lazy row-group and page readers for Parquet files
//!
//! Reads columnar files a slice at a time instead of loading them whole,
//! runs SQL over them through DuckDB, and exports query results to CSV or
//! spreadsheets.
//!
//! # Features
//!
//! - **Batch Paginator**: a lazy iterator that pulls one row-group batch per
//!   step. The default step mode advances a counter over
//!   `num_row_groups * num_rows` by `batch_size` and uses the counter as the
//!   row-group index; [`paginate::StepMode::RowGroup`] walks the row groups
//!   one by one instead.
//!
//! - **Page Cursor**: numbered pages (`next`, `previous`, `first`, `last`,
//!   `goto`) over any [`source::PageSource`], served either by the Parquet
//!   reader or by DuckDB `LIMIT/OFFSET` queries.
//!
//! - **Metadata**: footer summary and schema listing, serializable to JSON.
//!
//! - **SQL Query** (`duckdb` feature): a query that reads `FROM data` runs
//!   against the file, its result is stored in the `query_result` table and
//!   paged like the file itself. The result can be written to
//!   `<stem>-<uuid>.csv` with a header row.
//!
//! - **Spreadsheet Export** (`duckdb` feature): `COPY (query) TO 'file.xlsx'
//!   WITH (FORMAT GDAL, DRIVER 'xlsx')` after loading the `spatial` extension.
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────┐     ┌──────────────────┐     ┌────────────────┐
//!  │ Parquet file │────▶│   ParquetFile    │────▶│ RowGroupBatches│──▶ batches
//!  └──────────────┘     │ (RowGroupSource, │     └────────────────┘
//!          │            │   PageSource)    │     ┌────────────────┐
//!          │            └──────────────────┘────▶│   PageCursor   │──▶ pages
//!          │            ┌──────────────────┐     └────────────────┘
//!          └───────────▶│   DuckDbSource   │────────────▲
//!                       │   (PageSource)   │
//!                       └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```bash
//! # Write a sample file, then read its first batch
//! parquet-pager generate data/large.parquet
//! parquet-pager batches data/large.parquet -b 20 --max-batches 1 --show
//!
//! # Page through it with DuckDB
//! parquet-pager page data/large.parquet --page 2 --backend duckdb
//!
//! # Filter it and keep the result as CSV
//! parquet-pager query data/large.parquet --sql "SELECT * FROM data WHERE value > 0.5" --export-csv
//! ```

pub mod config;
pub mod error;
#[cfg(feature = "duckdb")]
pub mod export;
pub mod generate;
pub mod metadata;
pub mod paginate;
pub mod pager;
pub mod progress;
pub mod render;
pub mod source;

pub use config::{CliArgs, RunConfig};
pub use error::{PageError, PagerError, Result, SourceError};
pub use paginate::{paginate, paginate_parquet, paginate_with, PaginateOptions, RowGroupBatches, StepMode};
pub use pager::PageCursor;
pub use source::{PageSource, ParquetFile, RowGroupSource};
