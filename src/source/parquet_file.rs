//! Parquet file reader
//!
//! Parses the footer once on open and reuses it for every read: each row
//! group or page read builds a fresh record batch reader over a cloned file
//! handle with the cached metadata.

use crate::error::{SourceError, SourceResult};
use crate::source::{PageSource, RowGroupSource};
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReader,
    ParquetRecordBatchReaderBuilder,
};
use parquet::file::metadata::ParquetMetaData;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Largest batch the reader decodes at once when reading a page
const MAX_DECODE_BATCH: usize = 65_536;

/// An opened Parquet file.
pub struct ParquetFile {
    path: PathBuf,
    file: File,
    metadata: ArrowReaderMetadata,
}

impl ParquetFile {
    /// Open a Parquet file and parse its footer
    pub fn open<P: AsRef<Path>>(path: P) -> SourceResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let metadata = ArrowReaderMetadata::load(&file, ArrowReaderOptions::new())?;

        debug!(
            path = %path.display(),
            row_groups = metadata.metadata().num_row_groups(),
            rows = metadata.metadata().file_metadata().num_rows(),
            "Opened Parquet file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            metadata,
        })
    }

    /// Path the file was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arrow schema derived from the Parquet schema
    pub fn schema(&self) -> SchemaRef {
        self.metadata.schema().clone()
    }

    /// Raw footer metadata
    pub fn parquet_metadata(&self) -> &ParquetMetaData {
        self.metadata.metadata()
    }

    /// Row count of one row group, if it exists
    pub fn row_group_num_rows(&self, index: usize) -> Option<u64> {
        self.parquet_metadata()
            .row_groups()
            .get(index)
            .map(|rg| rg.num_rows().max(0) as u64)
    }

    fn builder(&self) -> SourceResult<ParquetRecordBatchReaderBuilder<File>> {
        let file = self.file.try_clone()?;
        Ok(ParquetRecordBatchReaderBuilder::new_with_metadata(
            file,
            self.metadata.clone(),
        ))
    }

    /// Drain a reader into one batch carrying the file schema.
    fn drain(&self, reader: ParquetRecordBatchReader) -> SourceResult<RecordBatch> {
        let mut batches = reader.collect::<Result<Vec<_>, ArrowError>>()?;
        if batches.len() == 1 {
            return Ok(batches.remove(0));
        }
        Ok(concat_batches(&self.schema(), &batches)?)
    }
}

impl RowGroupSource for ParquetFile {
    fn num_row_groups(&self) -> usize {
        self.parquet_metadata().num_row_groups()
    }

    fn num_rows(&self) -> u64 {
        self.parquet_metadata().file_metadata().num_rows().max(0) as u64
    }

    fn read_row_group(&self, index: usize) -> SourceResult<RecordBatch> {
        let count = self.num_row_groups();
        let rows = self
            .row_group_num_rows(index)
            .ok_or(SourceError::RowGroupOutOfRange { index, count })?;

        debug!(row_group = index, rows, "Reading row group");

        let reader = self
            .builder()?
            .with_row_groups(vec![index])
            .with_batch_size((rows as usize).clamp(1, MAX_DECODE_BATCH))
            .build()?;
        self.drain(reader)
    }
}

impl PageSource for ParquetFile {
    fn total_rows(&self) -> u64 {
        self.num_rows()
    }

    fn read_rows(&self, offset: u64, limit: usize) -> SourceResult<RecordBatch> {
        let total = self.num_rows();
        if offset >= total || limit == 0 {
            return Ok(RecordBatch::new_empty(self.schema()));
        }

        // offset < total, and total came from an i64
        let offset = offset as usize;
        let reader = self
            .builder()?
            .with_offset(offset)
            .with_limit(limit)
            .with_batch_size(limit.clamp(1, MAX_DECODE_BATCH))
            .build()?;
        self.drain(reader)
    }
}

impl std::fmt::Debug for ParquetFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetFile")
            .field("path", &self.path)
            .field("row_groups", &self.num_row_groups())
            .field("rows", &self.num_rows())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{write_sample_parquet, GenerateConfig};
    use arrow::array::{Array, Int64Array};
    use tempfile::{tempdir, TempDir};

    fn sample_file(rows: usize, row_group_size: usize) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.parquet");
        let config = GenerateConfig {
            rows,
            row_group_size,
            ..GenerateConfig::default()
        };
        write_sample_parquet(&path, &config).unwrap();
        (dir, path)
    }

    fn ids(batch: &RecordBatch) -> Vec<i64> {
        let column = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        (0..column.len()).map(|i| column.value(i)).collect()
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let err = ParquetFile::open(dir.path().join("missing.parquet")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
    }

    #[test]
    fn test_open_not_parquet() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not.parquet");
        std::fs::write(&path, b"definitely not a parquet file").unwrap();

        let err = ParquetFile::open(&path).unwrap_err();
        assert!(matches!(err, SourceError::Parquet(_)));
    }

    #[test]
    fn test_metadata_counts() {
        let (_dir, path) = sample_file(30, 10);
        let file = ParquetFile::open(&path).unwrap();

        assert_eq!(file.num_row_groups(), 3);
        assert_eq!(file.num_rows(), 30);
        assert_eq!(file.row_group_num_rows(2), Some(10));
        assert_eq!(file.row_group_num_rows(3), None);
        assert_eq!(file.schema().fields().len(), 4);
        assert_eq!(file.path(), path.as_path());
    }

    #[test]
    fn test_read_row_group() {
        let (_dir, path) = sample_file(25, 10);
        let file = ParquetFile::open(&path).unwrap();

        let second = file.read_row_group(1).unwrap();
        assert_eq!(second.num_rows(), 10);
        assert_eq!(ids(&second), (10..20).collect::<Vec<_>>());

        let last = file.read_row_group(2).unwrap();
        assert_eq!(last.num_rows(), 5);
        assert_eq!(ids(&last), (20..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_read_row_group_out_of_range() {
        let (_dir, path) = sample_file(30, 10);
        let file = ParquetFile::open(&path).unwrap();

        let err = file.read_row_group(10).unwrap_err();
        assert!(matches!(
            err,
            SourceError::RowGroupOutOfRange { index: 10, count: 3 }
        ));
    }

    #[test]
    fn test_read_rows_across_row_groups() {
        let (_dir, path) = sample_file(30, 10);
        let file = ParquetFile::open(&path).unwrap();

        let page = file.read_rows(8, 5).unwrap();
        assert_eq!(ids(&page), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_read_rows_clipped_at_end() {
        let (_dir, path) = sample_file(30, 10);
        let file = ParquetFile::open(&path).unwrap();

        let page = file.read_rows(27, 10).unwrap();
        assert_eq!(ids(&page), vec![27, 28, 29]);

        let past_end = file.read_rows(30, 10).unwrap();
        assert_eq!(past_end.num_rows(), 0);
        assert_eq!(past_end.schema(), file.schema());
    }

    #[test]
    fn test_reads_are_repeatable() {
        let (_dir, path) = sample_file(20, 10);
        let file = ParquetFile::open(&path).unwrap();

        let first = file.read_row_group(0).unwrap();
        let again = file.read_row_group(0).unwrap();
        assert_eq!(first, again);
    }
}
