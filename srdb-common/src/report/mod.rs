//! Catalog reports in HTML, plain text, JSON and YAML
//!
//! A report loads its own files, independent of the catalog table, and keeps
//! the populated records so that switching the output format is a pure
//! re-render.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::fetch_files;
use crate::config::DataFiles;
use crate::source::DataSource;
use crate::{Error, Result};

mod cache;
mod records;
mod render;

pub use cache::ReportCache;
pub use records::{
    AllRecords, PerformerRef, ReportRecords, SongGenreRecord, SongPerformerRecord, SongPlayRecord,
    UNKNOWN_SONG,
};
pub use render::escape_html;

/// Every report the site offers, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    All,
    Songs,
    Performers,
    Genres,
    Movies,
    Organizations,
    Writers,
    SongPlays,
    SongPerformers,
    SongGenres,
}

impl ReportKind {
    pub const ALL: [ReportKind; 10] = [
        ReportKind::All,
        ReportKind::Songs,
        ReportKind::Performers,
        ReportKind::Genres,
        ReportKind::Movies,
        ReportKind::Organizations,
        ReportKind::Writers,
        ReportKind::SongPlays,
        ReportKind::SongPerformers,
        ReportKind::SongGenres,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::All => "all",
            ReportKind::Songs => "songs",
            ReportKind::Performers => "performers",
            ReportKind::Genres => "genres",
            ReportKind::Movies => "movies",
            ReportKind::Organizations => "organizations",
            ReportKind::Writers => "writers",
            ReportKind::SongPlays => "song-plays",
            ReportKind::SongPerformers => "song-performers",
            ReportKind::SongGenres => "song-genres",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::All => "All Data",
            ReportKind::Songs => "Songs",
            ReportKind::Performers => "Performers",
            ReportKind::Genres => "Genres",
            ReportKind::Movies => "Movies",
            ReportKind::Organizations => "Organizations",
            ReportKind::Writers => "Writers",
            ReportKind::SongPlays => "Song Plays",
            ReportKind::SongPerformers => "Song Performers",
            ReportKind::SongGenres => "Song Genres",
        }
    }

    /// Files this report reads, in the order [`ReportRecords::build`] expects
    pub fn files(self, files: &DataFiles) -> Vec<String> {
        let songs = files.songs.iter().cloned();
        match self {
            ReportKind::All => songs
                .chain([
                    files.performers.clone(),
                    files.genres.clone(),
                    files.movies.clone(),
                    files.organizations.clone(),
                    files.writers.clone(),
                ])
                .collect(),
            ReportKind::Songs | ReportKind::SongGenres => songs.collect(),
            ReportKind::Performers => vec![files.performers.clone()],
            ReportKind::Genres => vec![files.genres.clone()],
            ReportKind::Movies => vec![files.movies.clone()],
            ReportKind::Organizations => vec![files.organizations.clone()],
            ReportKind::Writers => vec![files.writers.clone()],
            ReportKind::SongPlays | ReportKind::SongPerformers => std::iter::once(files.song_plays.clone())
                .chain(songs)
                .chain(std::iter::once(files.performers.clone()))
                .collect(),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for ReportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| Error::NotFound(format!("Unknown report: {}", s)))
    }
}

/// Output format of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Text,
    Json,
    Yaml,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [
        ReportFormat::Html,
        ReportFormat::Text,
        ReportFormat::Json,
        ReportFormat::Yaml,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ReportFormat::Html => "text/html; charset=utf-8",
            ReportFormat::Text => "text/plain; charset=utf-8",
            ReportFormat::Json => "application/json",
            ReportFormat::Yaml => "application/yaml",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ReportFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported format: {}", s)))
    }
}

/// A populated report
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    kind: ReportKind,
    records: ReportRecords,
}

impl Report {
    pub fn new(kind: ReportKind, records: ReportRecords) -> Self {
        Self { kind, records }
    }

    /// Load and join the report's data
    ///
    /// Never fails: on any fetch or parse error the report is logged and left
    /// with an empty record set.
    pub async fn populate(kind: ReportKind, source: &dyn DataSource, files: &DataFiles) -> Self {
        match Self::try_populate(kind, source, files).await {
            Ok(report) => {
                info!(report = %kind, records = report.records.len(), "Report populated");
                report
            }
            Err(e) => {
                warn!(report = %kind, "Error populating report: {}", e);
                Self::new(kind, ReportRecords::empty(kind))
            }
        }
    }

    async fn try_populate(kind: ReportKind, source: &dyn DataSource, files: &DataFiles) -> Result<Self> {
        let names = kind.files(files);
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let texts = fetch_files(source, &name_refs).await?;
        let records = ReportRecords::build(kind, files, &names, &texts)?;
        Ok(Self::new(kind, records))
    }

    pub fn kind(&self) -> ReportKind {
        self.kind
    }

    pub fn records(&self) -> &ReportRecords {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Html => render::to_html(self),
            ReportFormat::Text => render::to_text(self),
            ReportFormat::Json => render::to_json(self),
            ReportFormat::Yaml => render::to_yaml(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    #[test]
    fn test_slugs_round_trip() {
        for kind in ReportKind::ALL {
            assert_eq!(kind.slug().parse::<ReportKind>().unwrap(), kind);
        }
        assert!(matches!("charts".parse::<ReportKind>(), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("YAML".parse::<ReportFormat>().unwrap(), ReportFormat::Yaml);
        assert!(matches!("pdf".parse::<ReportFormat>(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_report_files() {
        let files = DataFiles::default();
        assert_eq!(ReportKind::Writers.files(&files), vec!["writers.yml"]);
        assert_eq!(
            ReportKind::SongPlays.files(&files),
            vec!["song-plays.yml", "elvis-songs.yml", "non-elvis-songs.yml", "performers.yml"]
        );
        assert_eq!(ReportKind::All.files(&files).len(), 7);
    }

    #[tokio::test]
    async fn test_populate_code_name_report() {
        let source = StaticSource::new().with_file(
            "genres.yml",
            "- code: G1\n  name: Rock\n- code: G2\n  name: Ballad\n",
        );
        let report = Report::populate(ReportKind::Genres, &source, &DataFiles::default()).await;
        assert_eq!(report.records().len(), 2);
    }

    #[tokio::test]
    async fn test_populate_degrades_to_empty_on_missing_file() {
        let source = StaticSource::new();
        let report = Report::populate(ReportKind::SongPlays, &source, &DataFiles::default()).await;
        assert!(report.is_empty());
        assert_eq!(report.records(), &ReportRecords::SongPlays(Vec::new()));
    }

    #[tokio::test]
    async fn test_populate_degrades_to_empty_on_bad_yaml() {
        let source = StaticSource::new().with_file("movies.yml", "- code: [unclosed\n");
        let report = Report::populate(ReportKind::Movies, &source, &DataFiles::default()).await;
        assert!(report.is_empty());
    }
}
