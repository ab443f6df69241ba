//! Concurrent fetch and parse of the catalog collections

use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::Catalog;
use crate::config::DataFiles;
use crate::models::{Organization, Performer, RightsAdminIndex, Song, SongPlay};
use crate::source::DataSource;
use crate::{Error, Result};

/// Fetch several files at once, failing on the first error
///
/// Texts are returned in the order of `names`.
pub async fn fetch_files(source: &dyn DataSource, names: &[&str]) -> Result<Vec<String>> {
    let fetches = names.iter().map(|name| async move {
        let text = source.fetch_text(name).await?;
        debug!(file = %name, bytes = text.len(), "Fetched data file");
        Ok::<_, Error>(text)
    });
    try_join_all(fetches).await
}

/// Parse a record collection; an empty or null document is an empty list
pub fn parse_records<T: DeserializeOwned>(file: &str, text: &str) -> Result<Vec<T>> {
    if is_blank_document(text) {
        return Ok(Vec::new());
    }
    serde_yaml::from_str::<Option<Vec<T>>>(text)
        .map(Option::unwrap_or_default)
        .map_err(|e| parse_error(file, e))
}

/// Parse the organization → song codes mapping
pub fn parse_rights_admin(file: &str, text: &str) -> Result<RightsAdminIndex> {
    if is_blank_document(text) {
        return Ok(RightsAdminIndex::default());
    }
    serde_yaml::from_str(text).map_err(|e| parse_error(file, e))
}

/// Loads a complete [`Catalog`] from a data source
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn DataSource>,
    files: DataFiles,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn DataSource>, files: DataFiles) -> Self {
        Self { source, files }
    }

    pub fn files(&self) -> &DataFiles {
        &self.files
    }

    /// Fetch every collection concurrently and assemble the catalog
    ///
    /// All-or-nothing: any fetch or parse failure aborts the whole load, and an
    /// empty song plays collection is rejected with
    /// [`Error::EmptyCriticalData`].
    pub async fn load(&self) -> Result<Catalog> {
        let files = &self.files;
        info!(source = %self.source.describe(), "Loading catalog");

        let mut names: Vec<&str> = vec![
            files.song_plays.as_str(),
            files.performers.as_str(),
            files.organizations.as_str(),
            files.rights_admin_songs.as_str(),
        ];
        names.extend(files.songs.iter().map(String::as_str));

        let texts = fetch_files(self.source.as_ref(), &names)
            .await
            .inspect_err(|e| error!("Catalog load failed: {}", e))?;

        let song_plays: Vec<SongPlay> = parse_records(&files.song_plays, &texts[0])?;
        if song_plays.is_empty() {
            let err = Error::EmptyCriticalData {
                file: files.song_plays.clone(),
            };
            error!("Catalog load failed: {}", err);
            return Err(err);
        }
        let performers: Vec<Performer> = parse_records(&files.performers, &texts[1])?;
        let organizations: Vec<Organization> = parse_records(&files.organizations, &texts[2])?;
        let rights_admin = parse_rights_admin(&files.rights_admin_songs, &texts[3])?;

        let mut songs: Vec<Song> = Vec::new();
        for (name, text) in files.songs.iter().zip(&texts[4..]) {
            let batch: Vec<Song> = parse_records(name, text)?;
            debug!(file = %name, entries = batch.len(), "Parsed song collection");
            songs.extend(batch);
        }

        info!(
            song_plays = song_plays.len(),
            songs = songs.len(),
            performers = performers.len(),
            organizations = organizations.len(),
            rights_admin_orgs = rights_admin.organizations(),
            "All data files loaded"
        );

        Ok(Catalog::from_parts(
            song_plays,
            songs,
            performers,
            organizations,
            &rights_admin,
        ))
    }
}

fn is_blank_document(text: &str) -> bool {
    text.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

fn parse_error(file: &str, e: serde_yaml::Error) -> Error {
    Error::Parse {
        file: file.to_string(),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_documents_parse_as_empty() {
        let records: Vec<Performer> = parse_records("performers.yml", "").unwrap();
        assert!(records.is_empty());

        let records: Vec<Performer> =
            parse_records("performers.yml", "# nothing yet\n---\n").unwrap();
        assert!(records.is_empty());

        let records: Vec<Performer> = parse_records("performers.yml", "~\n").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = parse_records::<Performer>("performers.yml", "code: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Parse { ref file, .. } if file == "performers.yml"));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        // A mapping where a record list is expected
        let err = parse_records::<Performer>("performers.yml", "P1: Elvis\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
