//! Page-number navigation over a [`PageSource`]
//!
//! Pages are 1-based. Every navigation call takes the page size so a viewer
//! can change it between calls; [`PageCursor::current_page`] keeps the first
//! row of the current page visible when the size changes.

use crate::error::{PageError, PageResult};
use crate::source::PageSource;
use arrow::record_batch::RecordBatch;
use tracing::debug;

/// Default rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Cursor over the pages of a source
#[derive(Debug)]
pub struct PageCursor<S> {
    source: S,
    current_page: usize,
    page_size: usize,
    total_items: u64,
}

impl<S: PageSource> PageCursor<S> {
    /// Start on page 1 with the given page size
    pub fn new(source: S, page_size: usize) -> PageResult<Self> {
        check_page_size(page_size)?;
        let total_items = source.total_rows();
        Ok(Self {
            source,
            current_page: 1,
            page_size,
            total_items,
        })
    }

    /// Number of pages for `page_size`; an empty source still has one (empty) page
    pub fn total_pages(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        let pages = self.total_items.div_ceil(page_size as u64);
        usize::try_from(pages).unwrap_or(usize::MAX).max(1)
    }

    /// Current 1-based page number
    pub fn page_number(&self) -> usize {
        self.current_page
    }

    /// Rows in the source
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages(self.page_size)
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    /// Advance one page
    pub fn next_page(&mut self, page_size: usize) -> PageResult<RecordBatch> {
        check_page_size(page_size)?;
        let total = self.total_pages(page_size);
        self.page_size = page_size;

        if self.current_page >= total {
            return Err(PageError::NoMorePages);
        }
        self.current_page += 1;
        self.read_current()
    }

    /// Go back one page
    pub fn previous_page(&mut self, page_size: usize) -> PageResult<RecordBatch> {
        check_page_size(page_size)?;
        self.page_size = page_size;

        if self.current_page <= 1 {
            return Err(PageError::AlreadyFirstPage);
        }
        self.current_page -= 1;
        self.read_current()
    }

    pub fn first_page(&mut self, page_size: usize) -> PageResult<RecordBatch> {
        check_page_size(page_size)?;
        self.page_size = page_size;
        self.current_page = 1;
        self.read_current()
    }

    pub fn last_page(&mut self, page_size: usize) -> PageResult<RecordBatch> {
        check_page_size(page_size)?;
        self.current_page = self.total_pages(page_size);
        self.page_size = page_size;
        self.read_current()
    }

    /// Jump to `page_number` (the current page when `None`).
    ///
    /// A page past the end re-anchors the current page for the new size and
    /// shows that page instead.
    pub fn goto_page(
        &mut self,
        page_number: Option<usize>,
        page_size: usize,
    ) -> PageResult<RecordBatch> {
        check_page_size(page_size)?;
        let total = self.total_pages(page_size);

        let mut page = page_number.unwrap_or(self.current_page);
        if page > total {
            self.reanchor(page_size);
            page = self.current_page;
        }
        self.page_size = page_size;

        if page < 1 || page > total {
            return Err(PageError::InvalidPageNumber { page, total });
        }
        self.current_page = page;
        self.read_current()
    }

    /// Re-read the current page, re-anchored for `page_size`
    pub fn current_page(&mut self, page_size: usize) -> PageResult<RecordBatch> {
        check_page_size(page_size)?;
        self.reanchor(page_size);
        self.read_current()
    }

    /// Move to the page that contains the first row of the current page
    /// under the new page size.
    fn reanchor(&mut self, new_page_size: usize) {
        let first_item = (self.current_page.saturating_sub(1)) as u64 * self.page_size as u64;
        let page = first_item / new_page_size as u64 + 1;
        self.current_page = usize::try_from(page).unwrap_or(usize::MAX);
        self.page_size = new_page_size;
    }

    fn read_current(&self) -> PageResult<RecordBatch> {
        let offset = (self.current_page.saturating_sub(1)) as u64 * self.page_size as u64;
        debug!(
            page = self.current_page,
            page_size = self.page_size,
            offset,
            "Reading page"
        );
        Ok(self.source.read_rows(offset, self.page_size)?)
    }
}

fn check_page_size(page_size: usize) -> PageResult<()> {
    if page_size == 0 {
        return Err(PageError::ZeroPageSize);
    }
    Ok(())
}
