//! Sample Parquet generator
//!
//! Writes a deterministic multi-row-group Parquet file so the paginators have
//! something to page through (the default input is `data/large.parquet`).

use crate::error::{Result, SourceError};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

const CATEGORIES: [&str; 5] = ["alpha", "beta", "gamma", "delta", "epsilon"];

/// Configuration for sample generation
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Total rows to write
    pub rows: usize,
    /// Rows per row group (the last group may be shorter)
    pub row_group_size: usize,
    /// Column chunk compression
    pub compression: Compression,
    /// Seed for the `value` and `category` columns
    pub seed: u64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            rows: 100_000,
            row_group_size: 10_000,
            compression: Compression::SNAPPY,
            seed: 42,
        }
    }
}

/// Statistics from a generate run
#[derive(Debug, Clone)]
pub struct GenerateStats {
    pub rows_written: u64,
    pub row_groups: usize,
    pub bytes_written: u64,
}

/// Schema of generated files: `id`, `name`, `value`, `category`.
pub fn sample_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("value", DataType::Float64, false),
        Field::new("category", DataType::Utf8, true),
    ]))
}

/// Write `config.rows` rows to `path`, one row group per `config.row_group_size` rows.
///
/// Parent directories are created as needed. Identical configs produce
/// identical files.
pub fn write_sample_parquet<P: AsRef<Path>>(
    path: P,
    config: &GenerateConfig,
) -> Result<GenerateStats> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let schema = sample_schema();
    let props = WriterProperties::builder()
        .set_compression(config.compression)
        .set_statistics_enabled(EnabledStatistics::Chunk)
        .set_max_row_group_size(config.row_group_size.max(1))
        .build();

    let file = File::create(path)?;
    let mut writer =
        ArrowWriter::try_new(file, schema.clone(), Some(props)).map_err(SourceError::from)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let chunk = config.row_group_size.max(1);
    let mut start = 0usize;

    while start < config.rows {
        let count = chunk.min(config.rows - start);
        let batch = sample_batch(&schema, &mut rng, start as i64, count)?;
        writer.write(&batch).map_err(SourceError::from)?;
        // One write per row group; flush so groups never straddle chunks
        writer.flush().map_err(SourceError::from)?;
        start += count;
    }

    let file_metadata = writer.close().map_err(SourceError::from)?;
    let bytes_written = fs::metadata(path)?.len();

    info!(
        "Wrote {} rows in {} row groups to {} ({} bytes)",
        config.rows,
        file_metadata.row_groups.len(),
        path.display(),
        bytes_written
    );

    Ok(GenerateStats {
        rows_written: config.rows as u64,
        row_groups: file_metadata.row_groups.len(),
        bytes_written,
    })
}

fn sample_batch(
    schema: &SchemaRef,
    rng: &mut StdRng,
    start_id: i64,
    count: usize,
) -> Result<RecordBatch> {
    let ids: Vec<i64> = (start_id..start_id + count as i64).collect();
    let names: Vec<String> = ids.iter().map(|id| format!("row_{:08}", id)).collect();
    let values: Vec<f64> = (0..count).map(|_| rng.gen_range(0.0..1000.0)).collect();
    let categories: Vec<Option<&str>> = (0..count)
        .map(|_| {
            // Roughly one in ten rows has no category
            if rng.gen_bool(0.1) {
                None
            } else {
                Some(CATEGORIES[rng.gen_range(0..CATEGORIES.len())])
            }
        })
        .collect();

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(ids)),
        Arc::new(StringArray::from(names)),
        Arc::new(Float64Array::from(values)),
        Arc::new(StringArray::from(categories)),
    ];

    RecordBatch::try_new(schema.clone(), columns).map_err(|e| SourceError::Arrow(e).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use tempfile::tempdir;

    #[test]
    fn test_row_group_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.parquet");
        let config = GenerateConfig {
            rows: 25,
            row_group_size: 10,
            ..GenerateConfig::default()
        };

        let stats = write_sample_parquet(&path, &config).unwrap();
        assert_eq!(stats.rows_written, 25);
        assert_eq!(stats.row_groups, 3);
        assert!(stats.bytes_written > 0);

        let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
        let metadata = reader.metadata();
        assert_eq!(metadata.num_row_groups(), 3);
        assert_eq!(metadata.file_metadata().num_rows(), 25);
        let sizes: Vec<i64> = metadata.row_groups().iter().map(|rg| rg.num_rows()).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data").join("nested").join("large.parquet");

        let config = GenerateConfig {
            rows: 5,
            row_group_size: 5,
            ..Default::default()
        };
        write_sample_parquet(&path, &config).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_same_seed_same_bytes() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.parquet");
        let b = dir.path().join("b.parquet");
        let config = GenerateConfig {
            rows: 50,
            row_group_size: 20,
            compression: Compression::UNCOMPRESSED,
            seed: 7,
        };

        write_sample_parquet(&a, &config).unwrap();
        write_sample_parquet(&b, &config).unwrap();
        assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
    }

    #[test]
    fn test_zero_rows_writes_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.parquet");
        let config = GenerateConfig {
            rows: 0,
            ..Default::default()
        };
        let stats = write_sample_parquet(&path, &config).unwrap();

        assert_eq!(stats.rows_written, 0);
        assert_eq!(stats.row_groups, 0);
    }
}
