//! Row-group batch paginator
//!
//! A lazy, pull-based sequence of record batches over a row-group source.
//! At most one batch is materialized per step, and the source (and its open
//! file) lives exactly as long as the sequence.
//!
//! # Step modes
//!
//! - [`StepMode::RowOffset`] (default): the step counter runs from 0 up to
//!   `num_row_groups * num_rows` in increments of `batch_size`, and each
//!   counter value is used directly as the row-group index. With more than a
//!   handful of rows this requests row groups that do not exist, and the
//!   sequence ends with `SourceError::RowGroupOutOfRange`.
//! - [`StepMode::RowGroup`]: one batch per row group, indices
//!   `0..num_row_groups`.

use crate::error::{PageError, PageResult, Result, SourceError, SourceResult};
use crate::source::{ParquetFile, RowGroupSource};
use arrow::record_batch::RecordBatch;
use std::path::Path;
use tracing::{debug, info};

/// How the step counter maps to row-group indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    /// Counter advances by `batch_size` over `num_row_groups * num_rows`
    /// and is passed straight through as the row-group index
    #[default]
    RowOffset,
    /// Counter walks row-group indices one at a time
    RowGroup,
}

/// Options for [`paginate_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginateOptions {
    /// Step size of the counter; must be positive
    pub batch_size: usize,
    /// Counter to index mapping
    pub mode: StepMode,
}

impl PaginateOptions {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            mode: StepMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: StepMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Lazy sequence of row-group batches.
///
/// Yields `Ok(batch)` per step until the counter reaches its end. The first
/// `Err` ends the sequence.
#[derive(Debug)]
pub struct RowGroupBatches<S> {
    source: S,
    mode: StepMode,
    counter: u64,
    end: u64,
    step: u64,
    finished: bool,
}

impl<S: RowGroupSource> RowGroupBatches<S> {
    fn new(source: S, options: PaginateOptions) -> PageResult<Self> {
        if options.batch_size == 0 {
            return Err(PageError::ZeroBatchSize);
        }

        let row_groups = source.num_row_groups();
        info!(row_groups, "Paginating row groups");

        let (end, step) = match options.mode {
            StepMode::RowOffset => (
                (row_groups as u64).saturating_mul(source.num_rows()),
                options.batch_size as u64,
            ),
            StepMode::RowGroup => (row_groups as u64, 1),
        };

        debug!(end, step, mode = ?options.mode, "Step counter bounds");

        Ok(Self {
            source,
            mode: options.mode,
            counter: 0,
            end,
            step,
            finished: false,
        })
    }

    /// Exclusive upper bound of the step counter
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Step mode in use
    pub fn mode(&self) -> StepMode {
        self.mode
    }

    /// Steps left before the counter reaches its end (ignores errors)
    pub fn remaining_steps(&self) -> u64 {
        if self.finished || self.counter >= self.end {
            return 0;
        }
        (self.end - self.counter).div_ceil(self.step)
    }
}

impl<S: RowGroupSource> Iterator for RowGroupBatches<S> {
    type Item = SourceResult<RecordBatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished || self.counter >= self.end {
            self.finished = true;
            return None;
        }

        // Indices past usize::MAX cannot exist in any file
        let index = usize::try_from(self.counter).unwrap_or(usize::MAX);
        self.counter = self.counter.saturating_add(self.step);

        let result = self.source.read_row_group(index);
        if result.is_err() {
            self.finished = true;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_steps();
        let upper = usize::try_from(remaining).ok();
        (0, upper)
    }
}

impl<S: RowGroupSource> std::iter::FusedIterator for RowGroupBatches<S> {}

/// Paginate `source` with the default [`StepMode::RowOffset`].
pub fn paginate<S: RowGroupSource>(source: S, batch_size: usize) -> PageResult<RowGroupBatches<S>> {
    paginate_with(source, PaginateOptions::new(batch_size))
}

/// Paginate `source` with explicit options.
pub fn paginate_with<S: RowGroupSource>(
    source: S,
    options: PaginateOptions,
) -> PageResult<RowGroupBatches<S>> {
    RowGroupBatches::new(source, options)
}

/// Open `path` and paginate it; the returned sequence owns the open file.
pub fn paginate_parquet<P: AsRef<Path>>(
    path: P,
    options: PaginateOptions,
) -> Result<RowGroupBatches<ParquetFile>> {
    if options.batch_size == 0 {
        return Err(PageError::ZeroBatchSize.into());
    }
    let file = ParquetFile::open(path)?;
    Ok(paginate_with(file, options)?)
}

/// Drain a sequence, stopping at the first error.
pub fn collect_batches<I>(batches: I) -> std::result::Result<Vec<RecordBatch>, SourceError>
where
    I: IntoIterator<Item = SourceResult<RecordBatch>>,
{
    batches.into_iter().collect()
}
