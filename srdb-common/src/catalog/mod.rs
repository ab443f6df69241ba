//! In-memory catalog built from the YAML collections
//!
//! The loader fetches and parses every file, then [`Catalog::from_parts`]
//! builds the lookup maps and materializes the display rows once, so request
//! handlers only ever read.

use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{Coded, Organization, Performer, RightsAdminIndex, Song, SongPlay};
use crate::view_model::{build_display_rows, DisplayRow};

mod loader;
mod store;

pub use loader::{fetch_files, parse_records, parse_rights_admin, CatalogLoader};
pub use store::{CatalogSnapshot, CatalogStore, InstallOutcome, LoadTicket};

/// Lookup table from catalog code to record
pub type CodeMap<T> = HashMap<String, T>;

/// Song code to administering organization code
pub type SongOrgMap = HashMap<String, String>;

/// A fully loaded, joined catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    pub song_plays: Vec<SongPlay>,
    pub songs: CodeMap<Song>,
    pub performers: CodeMap<Performer>,
    pub organizations: CodeMap<Organization>,
    pub song_orgs: SongOrgMap,
    rows: Vec<DisplayRow>,
}

impl Catalog {
    /// Index the parsed collections and build the display rows
    pub fn from_parts(
        song_plays: Vec<SongPlay>,
        songs: Vec<Song>,
        performers: Vec<Performer>,
        organizations: Vec<Organization>,
        rights_admin: &RightsAdminIndex,
    ) -> Self {
        let songs = index_by_code("songs", songs);
        let performers = index_by_code("performers", performers);
        let organizations = index_by_code("organizations", organizations);
        let song_orgs = invert_rights_admin(rights_admin);

        let rows = build_display_rows(
            &song_plays,
            &songs,
            &performers,
            &organizations,
            &song_orgs,
        );

        debug!(
            song_plays = song_plays.len(),
            songs = songs.len(),
            performers = performers.len(),
            organizations = organizations.len(),
            song_orgs = song_orgs.len(),
            "Catalog assembled"
        );

        Self {
            song_plays,
            songs,
            performers,
            organizations,
            song_orgs,
            rows,
        }
    }

    /// Display rows in song-plays order
    pub fn display_rows(&self) -> &[DisplayRow] {
        &self.rows
    }
}

/// Build a code lookup table. On duplicate codes the later record wins.
pub fn index_by_code<T: Coded>(collection: &str, items: Vec<T>) -> CodeMap<T> {
    let mut map = CodeMap::with_capacity(items.len());
    for item in items {
        let code = item.code().to_string();
        if map.insert(code.clone(), item).is_some() {
            warn!(collection, code = %code, "Duplicate code, keeping the last record");
        }
    }
    map
}

/// Invert the organization → songs index into song → organization
///
/// A song listed under more than one organization ends up with the one that
/// appears last in the file.
pub fn invert_rights_admin(index: &RightsAdminIndex) -> SongOrgMap {
    let mut song_orgs = SongOrgMap::new();
    for (org_code, song_codes) in index.iter() {
        for song_code in song_codes {
            if let Some(previous) = song_orgs.insert(song_code.clone(), org_code.to_string()) {
                if previous != org_code {
                    warn!(
                        song = %song_code,
                        previous = %previous,
                        current = %org_code,
                        "Song listed under several organizations, keeping the last"
                    );
                }
            }
        }
    }
    song_orgs
}
