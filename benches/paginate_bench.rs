//! Benchmarks for parquet-pager
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parquet_pager::generate::{write_sample_parquet, GenerateConfig};
use parquet_pager::paginate::{paginate_with, PaginateOptions, StepMode};
use parquet_pager::pager::PageCursor;
use parquet_pager::source::ParquetFile;
use tempfile::tempdir;

fn benchmark_row_group_pagination(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.parquet");
    let config = GenerateConfig {
        rows: 200_000,
        row_group_size: 20_000,
        ..GenerateConfig::default()
    };
    write_sample_parquet(&path, &config).unwrap();
    let file = ParquetFile::open(&path).unwrap();

    c.bench_function("paginate_all_row_groups", |b| {
        b.iter(|| {
            let options = PaginateOptions::new(20).with_mode(StepMode::RowGroup);
            let rows: usize = paginate_with(&file, options)
                .unwrap()
                .map(|batch| batch.unwrap().num_rows())
                .sum();
            black_box(rows);
        })
    });
}

fn benchmark_page_reads(c: &mut Criterion) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bench.parquet");
    let config = GenerateConfig {
        rows: 200_000,
        row_group_size: 20_000,
        ..GenerateConfig::default()
    };
    write_sample_parquet(&path, &config).unwrap();
    let file = ParquetFile::open(&path).unwrap();

    c.bench_function("page_goto_middle", |b| {
        let mut cursor = PageCursor::new(&file, 50).unwrap();
        b.iter(|| {
            let page = cursor.goto_page(Some(black_box(2_001)), 50).unwrap();
            black_box(page);
        })
    });
}

criterion_group!(benches, benchmark_row_group_pagination, benchmark_page_reads);
criterion_main!(benches);
