//! Desktop table vs. compact mobile list

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;
use crate::view_model::DisplayRow;
use crate::{Error, Result};

pub const MOBILE_PERFORMERS_MAX: usize = 25;
pub const MOBILE_ADMINISTRATOR_MAX: usize = 20;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Desktop,
    Mobile,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Desktop => "desktop",
            Layout::Mobile => "mobile",
        }
    }

    /// Rows per page when the user has not picked a size
    pub fn default_page_size(self, pagination: &PaginationConfig) -> usize {
        match self {
            Layout::Desktop => pagination.desktop.default_rows_per_page,
            Layout::Mobile => pagination.mobile.default_rows_per_page,
        }
    }

    /// Only the desktop table offers a page size selector
    pub fn has_page_size_selector(self) -> bool {
        matches!(self, Layout::Desktop)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(Layout::Desktop),
            "mobile" => Ok(Layout::Mobile),
            other => Err(Error::InvalidInput(format!("Invalid layout: {}", other))),
        }
    }
}

/// Cut `text` to at most `max` characters, ending in `...` when cut
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// A display row shortened for the mobile list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactRow {
    pub title: String,
    pub performers: String,
    pub administrator: String,
    #[serde(rename = "youtubeUrl")]
    pub youtube_url: String,
}

impl From<&DisplayRow> for CompactRow {
    fn from(row: &DisplayRow) -> Self {
        Self {
            title: row.title.clone(),
            performers: truncate_text(&row.performers, MOBILE_PERFORMERS_MAX),
            administrator: truncate_text(&row.administrator, MOBILE_ADMINISTRATOR_MAX),
            youtube_url: row.youtube_url.clone(),
        }
    }
}
