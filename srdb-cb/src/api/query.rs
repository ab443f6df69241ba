//! Query string handling for the catalog views
//!
//! Each request carries the full table state in its query string, so a view
//! is rebuilt from canonical rows on every request and links simply encode
//! the next state.

use serde::Deserialize;
use url::form_urlencoded;

use srdb_common::config::CatalogConfig;
use srdb_common::table::{Layout, PageSizeOptions, SortColumn, SortDirection, SortState, TableView};
use srdb_common::view_model::DisplayRow;
use srdb_common::{Error, Result};

/// Query parameters shared by `/`, `/featured` and `/api/catalog`
#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    /// Search text
    pub q: Option<String>,
    /// Column to sort by (optional)
    pub sort: Option<String>,
    /// Sort order: "asc" or "desc"
    pub order: Option<String>,
    /// Page number (1-indexed)
    ///
    /// Numbers are taken as text and parsed in [`CatalogQuery::resolve`], so
    /// a malformed value is reported like every other bad parameter.
    pub page: Option<String>,
    pub page_size: Option<String>,
    /// "desktop" or "mobile"
    pub layout: Option<String>,
}

/// Validated table state for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRequest {
    pub search: String,
    pub sort: Option<SortState>,
    /// Page index (0-based)
    pub page: usize,
    pub page_size: usize,
    pub layout: Layout,
}

impl CatalogQuery {
    /// Validate parameters against the configured page sizes
    ///
    /// An order without a sort column is ignored; unknown columns, orders,
    /// layouts and page sizes are rejected.
    pub fn resolve(&self, config: &CatalogConfig) -> Result<TableRequest> {
        let layout = match non_blank(&self.layout) {
            Some(layout) => layout.parse()?,
            None => Layout::default(),
        };

        let sort = match non_blank(&self.sort) {
            Some(column) => {
                let column: SortColumn = column.parse()?;
                let direction = match non_blank(&self.order) {
                    Some(order) => order.parse()?,
                    None => SortDirection::Asc,
                };
                Some(SortState { column, direction })
            }
            None => None,
        };

        let page_size = match layout {
            Layout::Desktop => PageSizeOptions::from_config(&config.pagination.desktop)?
                .resolve(parse_number("page_size", &self.page_size)?)?,
            Layout::Mobile => layout.default_page_size(&config.pagination),
        };

        Ok(TableRequest {
            search: self.q.clone().unwrap_or_default(),
            sort,
            page: parse_number("page", &self.page)?.unwrap_or(1).saturating_sub(1),
            page_size,
            layout,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: &Option<String>) -> Result<Option<usize>> {
    non_blank(value)
        .map(|v| {
            v.parse()
                .map_err(|_| Error::InvalidInput(format!("Invalid {}: {}", name, v)))
        })
        .transpose()
}

impl TableRequest {
    /// Build the table view this request describes
    pub fn view<'a>(&self, rows: &'a [DisplayRow]) -> TableView<'a> {
        let mut view = TableView::new(rows, self.page_size);
        view.set_search(&self.search);
        view.set_sort(self.sort);
        view.go_to(self.page);
        view
    }

    /// Query string for this state, omitting defaults
    pub fn query_string(&self, default_page_size: usize) -> String {
        let mut qs = form_urlencoded::Serializer::new(String::new());
        if !self.search.trim().is_empty() {
            qs.append_pair("q", &self.search);
        }
        if let Some(sort) = self.sort {
            qs.append_pair("sort", sort.column.as_str());
            qs.append_pair("order", sort.direction.as_str());
        }
        if self.page > 0 {
            qs.append_pair("page", &(self.page + 1).to_string());
        }
        if self.layout == Layout::Desktop && self.page_size != default_page_size {
            qs.append_pair("page_size", &self.page_size.to_string());
        }
        if self.layout != Layout::default() {
            qs.append_pair("layout", self.layout.as_str());
        }
        qs.finish()
    }

    /// Link to `path` with this state
    pub fn href(&self, path: &str, default_page_size: usize) -> String {
        let qs = self.query_string(default_page_size);
        if qs.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, qs)
        }
    }

    pub fn with_page(&self, page: usize) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// State after clicking a column header; back on the first page
    pub fn with_header_click(&self, column: SortColumn) -> Self {
        Self {
            sort: Some(SortState::toggled(self.sort, column)),
            page: 0,
            ..self.clone()
        }
    }

    pub fn with_page_size(&self, page_size: usize) -> Self {
        Self {
            page_size,
            page: 0,
            ..self.clone()
        }
    }

    /// Same view with the search cleared
    pub fn without_search(&self) -> Self {
        Self {
            search: String::new(),
            page: 0,
            ..self.clone()
        }
    }

    pub fn with_layout(&self, layout: Layout, config: &CatalogConfig) -> Self {
        Self {
            layout,
            page: 0,
            page_size: layout.default_page_size(&config.pagination),
            ..self.clone()
        }
    }
}
