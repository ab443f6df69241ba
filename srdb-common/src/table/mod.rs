//! Sort, search and pagination over display rows
//!
//! Everything here is a synchronous in-memory transform. The filtered and
//! sorted order is always recomputed from the canonical (song plays) order,
//! which makes sorting idempotent and lets a second header click reverse the
//! previous order exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::view_model::DisplayRow;
use crate::{Error, Result};

mod layout;
mod pagination;

pub use layout::{truncate_text, CompactRow, Layout};
pub use pagination::{calculate_pagination, PageSizeOptions, Pagination};

/// Sortable catalog columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Title,
    Performers,
    Administrator,
}

impl SortColumn {
    pub const ALL: [SortColumn; 3] = [
        SortColumn::Title,
        SortColumn::Performers,
        SortColumn::Administrator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Title => "title",
            SortColumn::Performers => "performers",
            SortColumn::Administrator => "administrator",
        }
    }

    pub fn value(self, row: &DisplayRow) -> &str {
        match self {
            SortColumn::Title => &row.title,
            SortColumn::Performers => &row.performers,
            SortColumn::Administrator => &row.administrator,
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortColumn::Title),
            "performers" => Ok(SortColumn::Performers),
            "administrator" => Ok(SortColumn::Administrator),
            other => Err(Error::InvalidInput(format!("Invalid sort column: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(Error::InvalidInput(format!("Invalid sort order: {}", other))),
        }
    }
}

/// The single active sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortState {
    pub fn asc(column: SortColumn) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    /// State after clicking `column`'s header: same column flips, a new one starts ascending
    pub fn toggled(current: Option<SortState>, column: SortColumn) -> SortState {
        match current {
            Some(state) if state.column == column => SortState {
                column,
                direction: state.direction.reversed(),
            },
            _ => SortState::asc(column),
        }
    }
}

/// Normalized search term, `None` when the query does not filter
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Case-insensitive substring match on title, performers or administrator
///
/// `needle` must already be normalized with [`normalize_query`].
pub fn row_matches(row: &DisplayRow, needle: &str) -> bool {
    SortColumn::ALL
        .iter()
        .any(|column| column.value(row).to_lowercase().contains(needle))
}

/// Indices of rows matching `query`, in canonical order
pub fn filter_indices(rows: &[DisplayRow], query: &str) -> Vec<usize> {
    match normalize_query(query) {
        None => (0..rows.len()).collect(),
        Some(needle) => rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row_matches(row, &needle))
            .map(|(i, _)| i)
            .collect(),
    }
}

/// Reorder `indices` (given in canonical order) by `sort`
///
/// Ascending is a stable sort on the lowercased column value; descending is
/// the exact reverse of ascending.
///
/// Rows with equal keys keep canonical order when ascending and come out in
/// reverse canonical order when descending, so a second header click always
/// mirrors the first.
pub fn sort_indices(rows: &[DisplayRow], indices: &mut [usize], sort: SortState) {
    indices.sort_by_cached_key(|&i| sort.column.value(&rows[i]).to_lowercase());
    if sort.direction == SortDirection::Desc {
        indices.reverse();
    }
}

/// Where the user is in the table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Page index (0-based)
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    /// Rows after filtering
    pub total: usize,
    /// Rows before filtering
    pub unfiltered_total: usize,
    /// 1-based number of the first row shown, 0 when nothing is shown
    pub first_row: usize,
    pub last_row: usize,
    pub can_previous: bool,
    pub can_next: bool,
    /// Everything fits on one page; navigation is inert
    pub showing_all: bool,
}

impl PageInfo {
    /// Human-facing summary line
    pub fn summary(&self) -> String {
        if self.showing_all {
            format!("Showing all {}", self.total)
        } else {
            format!(
                "Showing {}-{} of {}",
                self.first_row, self.last_row, self.total
            )
        }
    }
}

/// One rendered page of the table
#[derive(Debug, Clone)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a DisplayRow>,
    pub info: PageInfo,
    pub search: String,
    pub sort: Option<SortState>,
    /// Set when a search matched nothing: the term to show in the message
    pub no_results_for: Option<String>,
}

/// Interactive table state over a borrowed row set
#[derive(Debug, Clone)]
pub struct TableView<'a> {
    rows: &'a [DisplayRow],
    search: String,
    sort: Option<SortState>,
    page_size: usize,
    page: usize,
    visible: Vec<usize>,
}

impl<'a> TableView<'a> {
    pub fn new(rows: &'a [DisplayRow], page_size: usize) -> Self {
        let mut view = Self {
            rows,
            search: String::new(),
            sort: None,
            page_size: page_size.max(1),
            page: 0,
            visible: Vec::new(),
        };
        view.recompute();
        view
    }

    fn recompute(&mut self) {
        let mut visible = filter_indices(self.rows, &self.search);
        if let Some(sort) = self.sort {
            sort_indices(self.rows, &mut visible, sort);
        }
        self.visible = visible;
        self.page = 0;
    }

    /// Replace the underlying rows, keeping search and sort
    pub fn reload(&mut self, rows: &'a [DisplayRow]) {
        self.rows = rows;
        self.recompute();
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
        self.recompute();
    }

    pub fn clear_search(&mut self) {
        self.set_search("");
    }

    pub fn set_sort(&mut self, sort: Option<SortState>) {
        self.sort = sort;
        self.recompute();
    }

    /// Header click: toggles direction on the active column, else sorts ascending
    pub fn click_header(&mut self, column: SortColumn) {
        self.set_sort(Some(SortState::toggled(self.sort, column)));
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn pagination(&self) -> Pagination {
        calculate_pagination(self.visible.len(), self.page_size, self.page)
    }

    pub fn go_to(&mut self, page: usize) {
        self.page = self.pagination_for(page).page;
    }

    fn pagination_for(&self, page: usize) -> Pagination {
        calculate_pagination(self.visible.len(), self.page_size, page)
    }

    pub fn first(&mut self) {
        self.page = 0;
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn next(&mut self) {
        self.go_to(self.page + 1);
    }

    pub fn last(&mut self) {
        self.page = self.pagination().last_page();
    }

    /// All filtered and sorted rows, across pages
    pub fn visible_rows(&self) -> impl Iterator<Item = &'a DisplayRow> + '_ {
        self.visible.iter().map(|&i| &self.rows[i])
    }

    pub fn page(&self) -> TablePage<'a> {
        let total = self.visible.len();
        let pagination = self.pagination();
        let range = pagination.range(total);
        let rows = self.visible[range.clone()]
            .iter()
            .map(|&i| &self.rows[i])
            .collect();

        let showing_all = total <= self.page_size;
        let info = PageInfo {
            page: pagination.page,
            page_count: pagination.page_count,
            page_size: self.page_size,
            total,
            unfiltered_total: self.rows.len(),
            first_row: if range.is_empty() { 0 } else { range.start + 1 },
            last_row: range.end,
            can_previous: !showing_all && !pagination.is_first(),
            can_next: !showing_all && !pagination.is_last(),
            showing_all,
        };

        let no_results_for = match normalize_query(&self.search) {
            Some(_) if total == 0 => Some(self.search.trim().to_string()),
            _ => None,
        };

        TablePage {
            rows,
            info,
            search: self.search.clone(),
            sort: self.sort,
            no_results_for,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, performers: &str, administrator: &str) -> DisplayRow {
        DisplayRow {
            title: title.to_string(),
            performers: performers.to_string(),
            administrator: administrator.to_string(),
            youtube_url: "#".to_string(),
        }
    }

    fn sample() -> Vec<DisplayRow> {
        vec![
            row("Red Roses for a Blue Lady", "Vaughn Monroe", "Universal Music Publishing Group"),
            row("The Naughty Lady of Shady Lane", "The Ames Brothers", "Warner Chappell Music"),
            row("Kiss of Fire", "Georgia Gibbs", "Warner Chappell Music"),
            row("The Young Ones", "Cliff Richard", "Sony Music Publishing"),
            row("G.I. Blues", "Elvis Presley", "Universal Music Publishing Group"),
            row("angel", "Elvis Presley", "Warner Chappell Music"),
            row("Angel", "Cliff Richard", "Unknown"),
        ]
    }

    fn titles(view: &TableView) -> Vec<String> {
        view.visible_rows().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn test_toggle_semantics() {
        let s = SortState::toggled(None, SortColumn::Title);
        assert_eq!(s, SortState::asc(SortColumn::Title));

        let s = SortState::toggled(Some(s), SortColumn::Title);
        assert_eq!(s.direction, SortDirection::Desc);

        let s = SortState::toggled(Some(s), SortColumn::Administrator);
        assert_eq!(s, SortState::asc(SortColumn::Administrator));
    }

    #[test]
    fn test_sort_is_case_insensitive_and_stable() {
        let rows = sample();
        let mut view = TableView::new(&rows, 15);
        view.click_header(SortColumn::Title);

        // "angel" precedes "Angel" because it comes first in canonical order
        let sorted = titles(&view);
        assert_eq!(sorted[0], "angel");
        assert_eq!(sorted[1], "Angel");
        assert_eq!(sorted[2], "G.I. Blues");
    }

    #[test]
    fn test_sorting_twice_is_idempotent() {
        let rows = sample();
        let mut once = TableView::new(&rows, 15);
        once.set_sort(Some(SortState::asc(SortColumn::Administrator)));

        let mut twice = once.clone();
        twice.set_sort(Some(SortState::asc(SortColumn::Administrator)));

        assert_eq!(titles(&once), titles(&twice));
    }

    #[test]
    fn test_second_click_reverses_exactly() {
        let rows = sample();
        let mut view = TableView::new(&rows, 15);
        view.click_header(SortColumn::Administrator);
        let ascending = titles(&view);

        view.click_header(SortColumn::Administrator);
        let mut descending = titles(&view);
        descending.reverse();

        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_descending_ties_are_reversed() {
        let rows = sample();
        let mut view = TableView::new(&rows, 15);
        view.set_sort(Some(SortState::asc(SortColumn::Performers)));
        let ascending = titles(&view);
        // Cliff Richard rows in canonical order
        assert_eq!(ascending[0..2], ["The Young Ones", "Angel"]);

        view.set_sort(Some(SortState {
            column: SortColumn::Performers,
            direction: SortDirection::Desc,
        }));
        let descending = titles(&view);
        let last_two = &descending[descending.len() - 2..];
        assert_eq!(last_two, ["Angel", "The Young Ones"]);
    }

    #[test]
    fn test_search_matches_any_column() {
        let rows = sample();
        let mut view = TableView::new(&rows, 15);

        view.set_search("  ELVIS ");
        assert_eq!(titles(&view), vec!["G.I. Blues", "angel"]);

        view.set_search("sony");
        assert_eq!(titles(&view), vec!["The Young Ones"]);

        view.set_search("lady");
        assert_eq!(titles(&view).len(), 2);
    }

    #[test]
    fn test_blank_search_shows_everything() {
        let rows = sample();
        let mut view = TableView::new(&rows, 15);
        view.set_search("   ");
        assert_eq!(view.page().info.total, rows.len());
        assert!(view.page().no_results_for.is_none());
    }

    #[test]
    fn test_search_results_are_subset_of_all_rows() {
        let rows = sample();
        let all: Vec<usize> = filter_indices(&rows, "");
        for query in ["an", "music", "xyz", "E", "the "] {
            let matched = filter_indices(&rows, query);
            assert!(matched.iter().all(|i| all.contains(i)));
            let needle = normalize_query(query).unwrap();
            for i in matched {
                assert!(row_matches(&rows[i], &needle));
            }
        }
    }

    #[test]
    fn test_zero_results_state_and_reset() {
        let rows = sample();
        let mut view = TableView::new(&rows, 15);
        view.set_search(" zzz ");

        let page = view.page();
        assert!(page.rows.is_empty());
        assert_eq!(page.no_results_for.as_deref(), Some("zzz"));

        view.clear_search();
        assert_eq!(view.page().info.total, rows.len());
    }

    #[test]
    fn test_navigation_bounds() {
        let rows: Vec<DisplayRow> = (0..23).map(|i| row(&format!("T{:02}", i), "", "")).collect();
        let mut view = TableView::new(&rows, 10);

        let info = view.page().info;
        assert_eq!(info.page_count, 3);
        assert!(!info.can_previous);
        assert!(info.can_next);
        assert_eq!((info.first_row, info.last_row), (1, 10));

        view.last();
        let info = view.page().info;
        assert_eq!(info.page, 2);
        assert!(info.can_previous);
        assert!(!info.can_next);
        assert_eq!((info.first_row, info.last_row), (21, 23));

        view.next();
        assert_eq!(view.page().info.page, 2);

        view.previous();
        assert_eq!(view.page().info.page, 1);
        view.first();
        view.previous();
        assert_eq!(view.page().info.page, 0);
    }

    #[test]
    fn test_page_resets_on_search_sort_and_size_change() {
        let rows: Vec<DisplayRow> = (0..40).map(|i| row(&format!("T{:02}", i), "", "")).collect();
        let mut view = TableView::new(&rows, 10);

        view.go_to(3);
        view.set_search("T");
        assert_eq!(view.page().info.page, 0);

        view.go_to(2);
        view.click_header(SortColumn::Title);
        assert_eq!(view.page().info.page, 0);

        view.go_to(2);
        view.set_page_size(20);
        assert_eq!(view.page().info.page, 0);

        view.go_to(1);
        view.reload(&rows[..5]);
        assert_eq!(view.page().info.page, 0);
        assert_eq!(view.page().info.total, 5);
    }

    #[test]
    fn test_showing_all_makes_controls_inert() {
        let rows = sample();
        let view = TableView::new(&rows, 15);
        let info = view.page().info;
        assert!(info.showing_all);
        assert!(!info.can_previous && !info.can_next);
        assert_eq!(info.summary(), "Showing all 7");
    }

    #[test]
    fn test_pages_cover_the_result_exactly() {
        let rows: Vec<DisplayRow> = (0..47)
            .map(|i| row(&format!("Song {}", i % 9), &format!("P{}", i), ""))
            .collect();
        let mut view = TableView::new(&rows, 10);
        view.set_search("song");
        view.set_sort(Some(SortState {
            column: SortColumn::Title,
            direction: SortDirection::Desc,
        }));

        let expected: Vec<*const DisplayRow> = view.visible_rows().map(|r| r as *const _).collect();
        let page_count = view.page().info.page_count;
        assert_eq!(page_count, 5);

        let mut collected = Vec::new();
        for page in 0..page_count {
            view.go_to(page);
            collected.extend(view.page().rows.iter().map(|r| *r as *const DisplayRow));
        }
        assert_eq!(collected, expected);
    }

    #[test]
    fn test_parse_sort_params() {
        assert_eq!("Title".parse::<SortColumn>().unwrap(), SortColumn::Title);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("youtube".parse::<SortColumn>().is_err());
        assert!("up".parse::<SortDirection>().is_err());
    }
}
