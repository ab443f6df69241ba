//! Denormalized display rows for the catalog table
//!
//! Every song play becomes exactly one row. Lookups that miss fall back to
//! the raw code (or a fixed placeholder), so building rows cannot fail.

use serde::{Deserialize, Serialize};

use crate::catalog::{CodeMap, SongOrgMap};
use crate::models::{Organization, Performer, Song, SongPlay};

pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";
/// Link target when a play has no YouTube key
pub const NO_LINK: &str = "#";

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_PERFORMER: &str = "Unknown Performer";
pub const UNKNOWN_ADMINISTRATOR: &str = "Unknown";

/// One row of the catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayRow {
    pub title: String,
    pub performers: String,
    pub administrator: String,
    #[serde(rename = "youtubeUrl")]
    pub youtube_url: String,
}

impl DisplayRow {
    pub fn has_video(&self) -> bool {
        self.youtube_url != NO_LINK
    }
}

/// Watch URL for a YouTube key, or `#` when there is none
pub fn youtube_url(key: Option<&str>) -> String {
    match key.map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => format!("{}{}", YOUTUBE_WATCH_URL, key),
        None => NO_LINK.to_string(),
    }
}

/// Join song plays against the lookup tables
///
/// Output order is the song plays order, which is the canonical order the
/// table view falls back to for sort ties.
pub fn build_display_rows(
    song_plays: &[SongPlay],
    songs_by_code: &CodeMap<Song>,
    performers_by_code: &CodeMap<Performer>,
    orgs_by_code: &CodeMap<Organization>,
    song_org_map: &SongOrgMap,
) -> Vec<DisplayRow> {
    song_plays
        .iter()
        .map(|play| display_row(play, songs_by_code, performers_by_code, orgs_by_code, song_org_map))
        .collect()
}

fn display_row(
    play: &SongPlay,
    songs_by_code: &CodeMap<Song>,
    performers_by_code: &CodeMap<Performer>,
    orgs_by_code: &CodeMap<Organization>,
    song_org_map: &SongOrgMap,
) -> DisplayRow {
    let title = match songs_by_code.get(&play.song_code) {
        Some(song) => song.name.clone(),
        None => or_placeholder(&play.song_code, UNKNOWN_TITLE),
    };

    let performers = match performers_by_code.get(&play.performer_codes) {
        Some(performer) => performer.name.clone(),
        None => or_placeholder(&play.performer_codes, UNKNOWN_PERFORMER),
    };

    let administrator = song_org_map
        .get(&play.song_code)
        .and_then(|org_code| orgs_by_code.get(org_code))
        .map(|org| org.name.clone())
        .unwrap_or_else(|| UNKNOWN_ADMINISTRATOR.to_string());

    DisplayRow {
        title,
        performers,
        administrator,
        youtube_url: youtube_url(play.youtube_key()),
    }
}

fn or_placeholder(raw: &str, placeholder: &str) -> String {
    if raw.trim().is_empty() {
        placeholder.to_string()
    } else {
        raw.to_string()
    }
}

/// Rows whose performers contain `needle`, ignoring case, in input order
pub fn featured_rows(rows: &[DisplayRow], needle: &str) -> Vec<DisplayRow> {
    let needle = needle.trim().to_lowercase();
    rows.iter()
        .filter(|row| row.performers.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
