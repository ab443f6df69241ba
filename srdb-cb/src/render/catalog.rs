//! Catalog table, compact list and their controls

use std::fmt::Write;

use srdb_common::config::CatalogConfig;
use srdb_common::table::{CompactRow, Layout, PageSizeOptions, SortColumn, SortDirection, TablePage};

use super::escape;
use crate::api::query::TableRequest;

/// One column of a catalog table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// Play button linking to the YouTube video
    Video,
    Data(SortColumn),
}

pub const CATALOG_COLUMNS: &[Column] = &[
    Column::Video,
    Column::Data(SortColumn::Title),
    Column::Data(SortColumn::Performers),
    Column::Data(SortColumn::Administrator),
];

pub const FEATURED_COLUMNS: &[Column] = &[
    Column::Data(SortColumn::Title),
    Column::Data(SortColumn::Administrator),
];

pub fn column_label(column: SortColumn) -> &'static str {
    match column {
        SortColumn::Title => "Title",
        SortColumn::Performers => "Performer(s)",
        SortColumn::Administrator => "Rights Administrator",
    }
}

/// Everything needed to draw one table view
pub struct TableContext<'a> {
    /// Route the links point back to
    pub path: &'a str,
    pub heading: &'a str,
    pub columns: &'a [Column],
    pub request: &'a TableRequest,
    pub config: &'a CatalogConfig,
}

impl TableContext<'_> {
    fn default_page_size(&self) -> usize {
        self.config.pagination.desktop.default_rows_per_page
    }

    fn href(&self, request: &TableRequest) -> String {
        escape(&request.href(self.path, self.default_page_size()))
    }
}

/// Full catalog section: search, table or list, pager
pub fn table_section(ctx: &TableContext<'_>, page: &TablePage<'_>) -> String {
    let mut html = format!(
        r#"<section class="catalog" id="catalog-{}"><h2>{}{}</h2>"#,
        ctx.request.layout,
        escape(ctx.heading),
        result_count(page)
    );
    html.push_str(&search_form(ctx));
    html.push_str(&layout_switch(ctx));

    if let Some(term) = &page.no_results_for {
        let _ = write!(
            html,
            r#"<div class="panel no-results"><p>No results for '{}'</p><a href="{}">Reset search</a></div>"#,
            escape(term),
            ctx.href(&ctx.request.without_search())
        );
        html.push_str("</section>");
        return html;
    }

    match ctx.request.layout {
        Layout::Desktop => html.push_str(&desktop_table(ctx, page)),
        Layout::Mobile => html.push_str(&compact_list(ctx, page)),
    }
    html.push_str(&pager(ctx, page));
    if ctx.request.layout.has_page_size_selector() {
        html.push_str(&page_size_selector(ctx));
    }
    html.push_str("</section>");
    html
}

/// `(Showing N results for "term")` while a search is active
fn result_count(page: &TablePage<'_>) -> String {
    let term = page.search.trim();
    if term.is_empty() {
        return String::new();
    }
    let noun = if page.info.total == 1 { "result" } else { "results" };
    format!(
        r#" <span class="result-count">(Showing {} {} for "{}")</span>"#,
        page.info.total,
        noun,
        escape(term)
    )
}

fn search_form(ctx: &TableContext<'_>) -> String {
    let request = ctx.request;
    let mut hidden = String::new();
    if let Some(sort) = request.sort {
        let _ = write!(
            hidden,
            r#"<input type="hidden" name="sort" value="{}"><input type="hidden" name="order" value="{}">"#,
            sort.column.as_str(),
            sort.direction.as_str()
        );
    }
    if request.layout == Layout::Mobile {
        hidden.push_str(r#"<input type="hidden" name="layout" value="mobile">"#);
    } else if request.page_size != ctx.default_page_size() {
        let _ = write!(
            hidden,
            r#"<input type="hidden" name="page_size" value="{}">"#,
            request.page_size
        );
    }

    format!(
        r#"<form class="search" method="get" action="{path}"><input type="search" name="q" value="{q}" placeholder="Search title, performer or administrator">{hidden}<button type="submit">Search</button> <a href="{reset}">Clear</a></form>"#,
        path = escape(ctx.path),
        q = escape(&request.search),
        hidden = hidden,
        reset = ctx.href(&request.without_search()),
    )
}

fn layout_switch(ctx: &TableContext<'_>) -> String {
    let (target, label) = match ctx.request.layout {
        Layout::Desktop => (Layout::Mobile, "Compact view"),
        Layout::Mobile => (Layout::Desktop, "Table view"),
    };
    format!(
        r#"<p class="layout-switch"><a href="{}">{}</a></p>"#,
        ctx.href(&ctx.request.with_layout(target, ctx.config)),
        label
    )
}

fn sort_indicator(ctx: &TableContext<'_>, column: SortColumn) -> &'static str {
    match ctx.request.sort {
        Some(sort) if sort.column == column => match sort.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    }
}

fn header_link(ctx: &TableContext<'_>, column: SortColumn) -> String {
    format!(
        r#"<a href="{}">{}{}</a>"#,
        ctx.href(&ctx.request.with_header_click(column)),
        column_label(column),
        sort_indicator(ctx, column)
    )
}

fn video_link(url: &str) -> String {
    format!(
        r#"<a class="play" href="{}" target="_blank" rel="noopener" title="Watch on YouTube">▶</a>"#,
        escape(url)
    )
}

fn desktop_table(ctx: &TableContext<'_>, page: &TablePage<'_>) -> String {
    let mut html = String::from(r#"<table class="catalog-table"><thead><tr>"#);
    for column in ctx.columns {
        match column {
            Column::Video => html.push_str(r#"<th class="video">▶</th>"#),
            Column::Data(column) => {
                let _ = write!(html, r#"<th class="{}">{}</th>"#, column.as_str(), header_link(ctx, *column));
            }
        }
    }
    html.push_str("</tr></thead><tbody>");

    for row in &page.rows {
        html.push_str("<tr>");
        for column in ctx.columns {
            match column {
                Column::Video if row.has_video() => {
                    let _ = write!(html, r#"<td class="video">{}</td>"#, video_link(&row.youtube_url));
                }
                Column::Video => html.push_str(r#"<td class="video"></td>"#),
                Column::Data(column) => {
                    let _ = write!(html, r#"<td class="{}">{}</td>"#, column.as_str(), escape(column.value(row)));
                }
            }
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

fn compact_list(ctx: &TableContext<'_>, page: &TablePage<'_>) -> String {
    let mut html = String::from(r#"<p class="sort-by">Sort by: "#);
    let links: Vec<String> = ctx
        .columns
        .iter()
        .filter_map(|column| match column {
            Column::Data(column) => Some(header_link(ctx, *column)),
            Column::Video => None,
        })
        .collect();
    html.push_str(&links.join(" | "));
    html.push_str(r#"</p><ul class="compact-list">"#);

    let show_performers = ctx.columns.contains(&Column::Data(SortColumn::Performers));
    for row in &page.rows {
        let compact = CompactRow::from(*row);
        html.push_str("<li>");
        if row.has_video() {
            html.push_str(&video_link(&compact.youtube_url));
            html.push(' ');
        }
        let _ = write!(html, r#"<span class="title">{}</span>"#, escape(&compact.title));
        if show_performers {
            let _ = write!(html, r#"<span class="performers">{}</span>"#, escape(&compact.performers));
        }
        let _ = write!(html, r#"<span class="administrator">{}</span>"#, escape(&compact.administrator));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html
}

fn pager_link(ctx: &TableContext<'_>, label: &str, target: usize, enabled: bool) -> String {
    if enabled {
        format!(r#"<a href="{}">{}</a>"#, ctx.href(&ctx.request.with_page(target)), label)
    } else {
        format!(r#"<span class="disabled">{}</span>"#, label)
    }
}

fn pager(ctx: &TableContext<'_>, page: &TablePage<'_>) -> String {
    let info = &page.info;
    let last = info.page_count.saturating_sub(1);
    let position = if info.page_count > 0 {
        format!("Page {} of {}", info.page + 1, info.page_count)
    } else {
        "Page 0 of 0".to_string()
    };
    format!(
        r#"<nav class="pager"><span class="summary">{}</span> {} {} <span class="position">{}</span> {} {}</nav>"#,
        info.summary(),
        pager_link(ctx, "First", 0, info.can_previous),
        pager_link(ctx, "Previous", info.page.saturating_sub(1), info.can_previous),
        position,
        pager_link(ctx, "Next", info.page + 1, info.can_next),
        pager_link(ctx, "Last", last, info.can_next),
    )
}

fn page_size_selector(ctx: &TableContext<'_>) -> String {
    let options = PageSizeOptions::from_config(&ctx.config.pagination.desktop).unwrap_or_default();
    let mut html = String::from(r#"<p class="page-size">Rows per page: "#);
    let links: Vec<String> = options
        .options()
        .iter()
        .map(|&size| {
            if size == ctx.request.page_size {
                format!("<strong>{}</strong>", size)
            } else {
                format!(r#"<a href="{}">{}</a>"#, ctx.href(&ctx.request.with_page_size(size)), size)
            }
        })
        .collect();
    html.push_str(&links.join(" "));
    html.push_str("</p>");
    html
}
