//! Row sources consumed by the paginators
//!
//! # Module Structure
//!
//! - `parquet_file`: `ParquetFile`, the file reader over the `parquet` crate
//! - `duckdb_source`: `DuckDbSource`, pages served by DuckDB's `read_parquet`
//!
//! The batch paginator only needs [`RowGroupSource`]; the page cursor only
//! needs [`PageSource`]. Both traits take `&self` so a source can be shared
//! by several readers of the same file.

pub mod parquet_file;

#[cfg(feature = "duckdb")]
pub mod duckdb_source;

pub use parquet_file::ParquetFile;

#[cfg(feature = "duckdb")]
pub use duckdb_source::DuckDbSource;

use crate::error::SourceResult;
use arrow::record_batch::RecordBatch;

/// A file organized in row groups.
pub trait RowGroupSource {
    /// Number of row groups stored in the file
    fn num_row_groups(&self) -> usize;

    /// Total row count recorded in the file metadata
    fn num_rows(&self) -> u64;

    /// Read every row of one row group into a single batch.
    ///
    /// Fails with `SourceError::RowGroupOutOfRange` when `index` is not in
    /// `0..num_row_groups()`.
    fn read_row_group(&self, index: usize) -> SourceResult<RecordBatch>;
}

/// Random access to a window of rows.
pub trait PageSource {
    /// Total number of rows available
    fn total_rows(&self) -> u64;

    /// Read at most `limit` rows starting at row `offset`.
    ///
    /// Reading past the end yields an empty batch, not an error.
    fn read_rows(&self, offset: u64, limit: usize) -> SourceResult<RecordBatch>;
}

impl<S: RowGroupSource + ?Sized> RowGroupSource for &S {
    fn num_row_groups(&self) -> usize {
        (**self).num_row_groups()
    }

    fn num_rows(&self) -> u64 {
        (**self).num_rows()
    }

    fn read_row_group(&self, index: usize) -> SourceResult<RecordBatch> {
        (**self).read_row_group(index)
    }
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn total_rows(&self) -> u64 {
        (**self).total_rows()
    }

    fn read_rows(&self, offset: u64, limit: usize) -> SourceResult<RecordBatch> {
        (**self).read_rows(offset, limit)
    }
}

impl<S: PageSource + ?Sized> PageSource for Box<S> {
    fn total_rows(&self) -> u64 {
        (**self).total_rows()
    }

    fn read_rows(&self, offset: u64, limit: usize) -> SourceResult<RecordBatch> {
        (**self).read_rows(offset, limit)
    }
}
