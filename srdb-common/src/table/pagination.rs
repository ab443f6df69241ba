//! Pagination math for the catalog table

use crate::config::DesktopPagination;
use crate::{Error, Result};

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page index (0-based)
    pub page: usize,
    /// Total number of pages, 0 for an empty result
    pub page_count: usize,
    pub page_size: usize,
    /// Index of the first row on the page
    pub offset: usize,
}

/// Calculate pagination metadata from total results and requested page
///
/// The page index is clamped to `[0, page_count - 1]`, so out-of-range
/// requests land on the last page.
///
/// # Examples
/// ```
/// use srdb_common::table::calculate_pagination;
///
/// // 35 rows at 15 per page = 3 pages (15 + 15 + 5)
/// let p = calculate_pagination(35, 15, 1);
/// assert_eq!(p.page_count, 3);
/// assert_eq!(p.offset, 15);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(35, 15, 99);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.offset, 30);
/// ```
pub fn calculate_pagination(total: usize, page_size: usize, requested_page: usize) -> Pagination {
    let page_size = page_size.max(1);
    let page_count = total.div_ceil(page_size);
    let page = requested_page.min(page_count.saturating_sub(1));

    Pagination {
        page,
        page_count,
        page_size,
        offset: page * page_size,
    }
}

impl Pagination {
    /// Row range of the current page within `total` rows
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(total);
        let end = (self.offset + self.page_size).min(total);
        start..end
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.page_count
    }

    pub fn last_page(&self) -> usize {
        self.page_count.saturating_sub(1)
    }
}

/// The ordered set of page sizes a user may pick from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeOptions {
    options: Vec<usize>,
    default: usize,
}

impl PageSizeOptions {
    pub fn new(mut options: Vec<usize>, default: usize) -> Result<Self> {
        options.sort_unstable();
        options.dedup();
        if options.is_empty() || options.contains(&0) {
            return Err(Error::Config("page size options must be non-zero".to_string()));
        }
        if !options.contains(&default) {
            return Err(Error::Config(format!(
                "default page size {} is not one of {:?}",
                default, options
            )));
        }
        Ok(Self { options, default })
    }

    pub fn from_config(desktop: &DesktopPagination) -> Result<Self> {
        Self::new(
            desktop.rows_per_page_options.clone(),
            desktop.default_rows_per_page,
        )
    }

    pub fn options(&self) -> &[usize] {
        &self.options
    }

    pub fn default_size(&self) -> usize {
        self.default
    }

    /// Validate a requested size; `None` selects the default
    pub fn resolve(&self, requested: Option<usize>) -> Result<usize> {
        match requested {
            None => Ok(self.default),
            Some(size) if self.options.contains(&size) => Ok(size),
            Some(size) => Err(Error::InvalidInput(format!(
                "page size {} is not one of {:?}",
                size, self.options
            ))),
        }
    }
}

impl Default for PageSizeOptions {
    fn default() -> Self {
        let desktop = DesktopPagination::default();
        Self {
            options: desktop.rows_per_page_options,
            default: desktop.default_rows_per_page,
        }
    }
}
