//! Report record sets and the joins that build them

use std::collections::HashMap;

use serde::Serialize;

use super::ReportKind;
use crate::catalog::parse_records;
use crate::config::DataFiles;
use crate::models::{CodeName, Song, SongPlay};
use crate::Result;

/// Song name used when a play references a song that does not exist
pub const UNKNOWN_SONG: &str = "Unknown Song";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformerRef {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongPlayRecord {
    pub song_code: String,
    pub song_name: String,
    pub performers: Vec<PerformerRef>,
    pub youtube_key: Option<String>,
    pub movie: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongPerformerRecord {
    pub song_code: String,
    pub song_name: String,
    pub performer_code: String,
    pub performer_name: String,
    pub movie: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongGenreRecord {
    pub song_code: String,
    pub song_name: String,
    pub genre: String,
    pub movie: Option<String>,
}

/// Every collection side by side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllRecords {
    pub songs: Vec<Song>,
    pub performers: Vec<CodeName>,
    pub genres: Vec<CodeName>,
    pub movies: Vec<CodeName>,
    pub organizations: Vec<CodeName>,
    pub writers: Vec<CodeName>,
}

impl AllRecords {
    /// Collection names with the code/name records, songs excluded
    pub fn code_name_sections(&self) -> [(&'static str, &[CodeName]); 5] {
        [
            ("Performers", self.performers.as_slice()),
            ("Genres", self.genres.as_slice()),
            ("Movies", self.movies.as_slice()),
            ("Organizations", self.organizations.as_slice()),
            ("Writers", self.writers.as_slice()),
        ]
    }

    pub fn counts(&self) -> AllCounts {
        AllCounts {
            songs: self.songs.len(),
            performers: self.performers.len(),
            genres: self.genres.len(),
            movies: self.movies.len(),
            organizations: self.organizations.len(),
            writers: self.writers.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.code_name_sections().iter().all(|(_, r)| r.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllCounts {
    pub songs: usize,
    pub performers: usize,
    pub genres: usize,
    pub movies: usize,
    pub organizations: usize,
    pub writers: usize,
}

/// The populated data of one report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReportRecords {
    All(AllRecords),
    Songs(Vec<Song>),
    /// Performers, genres, movies, organizations or writers
    CodeNames(Vec<CodeName>),
    SongPlays(Vec<SongPlayRecord>),
    SongPerformers(Vec<SongPerformerRecord>),
    SongGenres(Vec<SongGenreRecord>),
}

impl ReportRecords {
    pub fn empty(kind: ReportKind) -> Self {
        match kind {
            ReportKind::All => ReportRecords::All(AllRecords::default()),
            ReportKind::Songs => ReportRecords::Songs(Vec::new()),
            ReportKind::Performers
            | ReportKind::Genres
            | ReportKind::Movies
            | ReportKind::Organizations
            | ReportKind::Writers => ReportRecords::CodeNames(Vec::new()),
            ReportKind::SongPlays => ReportRecords::SongPlays(Vec::new()),
            ReportKind::SongPerformers => ReportRecords::SongPerformers(Vec::new()),
            ReportKind::SongGenres => ReportRecords::SongGenres(Vec::new()),
        }
    }

    /// Number of top-level records; for `All`, the sum over collections
    pub fn len(&self) -> usize {
        match self {
            ReportRecords::All(all) => {
                let c = all.counts();
                c.songs + c.performers + c.genres + c.movies + c.organizations + c.writers
            }
            ReportRecords::Songs(r) => r.len(),
            ReportRecords::CodeNames(r) => r.len(),
            ReportRecords::SongPlays(r) => r.len(),
            ReportRecords::SongPerformers(r) => r.len(),
            ReportRecords::SongGenres(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse fetched texts and join them for `kind`
    ///
    /// `names` and `texts` are aligned and laid out as given by
    /// [`ReportKind::files`].
    pub fn build(kind: ReportKind, files: &DataFiles, names: &[String], texts: &[String]) -> Result<Self> {
        let song_files = files.songs.len();
        let parsed = |i: usize| parse_records::<CodeName>(&names[i], &texts[i]);

        let records = match kind {
            ReportKind::All => {
                let songs = parse_songs(&names[..song_files], &texts[..song_files])?;
                let base = song_files;
                ReportRecords::All(AllRecords {
                    songs,
                    performers: parsed(base)?,
                    genres: parsed(base + 1)?,
                    movies: parsed(base + 2)?,
                    organizations: parsed(base + 3)?,
                    writers: parsed(base + 4)?,
                })
            }
            ReportKind::Songs => ReportRecords::Songs(parse_songs(names, texts)?),
            ReportKind::Performers
            | ReportKind::Genres
            | ReportKind::Movies
            | ReportKind::Organizations
            | ReportKind::Writers => ReportRecords::CodeNames(parsed(0)?),
            ReportKind::SongPlays | ReportKind::SongPerformers => {
                let plays: Vec<SongPlay> = parse_records(&names[0], &texts[0])?;
                let songs = parse_songs(&names[1..=song_files], &texts[1..=song_files])?;
                let performers = parsed(song_files + 1)?;
                if kind == ReportKind::SongPlays {
                    ReportRecords::SongPlays(join_song_plays(&plays, &songs, &performers))
                } else {
                    ReportRecords::SongPerformers(join_song_performers(&plays, &songs, &performers))
                }
            }
            ReportKind::SongGenres => ReportRecords::SongGenres(join_song_genres(&parse_songs(names, texts)?)),
        };
        Ok(records)
    }
}

fn parse_songs(names: &[String], texts: &[String]) -> Result<Vec<Song>> {
    let mut songs = Vec::new();
    for (name, text) in names.iter().zip(texts) {
        songs.extend(parse_records::<Song>(name, text)?);
    }
    Ok(songs)
}

/// Lookup by code where the first record with a code wins
fn first_by_code<'a, T, F>(items: &'a [T], code: F) -> HashMap<&'a str, &'a T>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut map = HashMap::with_capacity(items.len());
    for item in items {
        map.entry(code(item)).or_insert(item);
    }
    map
}

fn resolve_performers<'a>(
    play: &SongPlay,
    performers: &HashMap<&str, &'a CodeName>,
) -> Vec<&'a CodeName> {
    play.performer_code_list()
        .filter_map(|code| performers.get(code).copied())
        .collect()
}

/// One record per play; unknown performer codes are skipped
pub fn join_song_plays(plays: &[SongPlay], songs: &[Song], performers: &[CodeName]) -> Vec<SongPlayRecord> {
    let songs = first_by_code(songs, |s| s.code.as_str());
    let performers = first_by_code(performers, |p| p.code.as_str());

    plays
        .iter()
        .map(|play| {
            let song = songs.get(play.song_code.as_str());
            SongPlayRecord {
                song_code: play.song_code.clone(),
                song_name: song.map_or_else(|| UNKNOWN_SONG.to_string(), |s| s.name.clone()),
                performers: resolve_performers(play, &performers)
                    .into_iter()
                    .map(|p| PerformerRef {
                        code: p.code.clone(),
                        name: p.name.clone(),
                    })
                    .collect(),
                youtube_key: play.youtube_key().map(str::to_string),
                movie: song.and_then(|s| s.movie.clone()),
            }
        })
        .collect()
}

/// One record per (known song, known performer) pair, in play order
pub fn join_song_performers(
    plays: &[SongPlay],
    songs: &[Song],
    performers: &[CodeName],
) -> Vec<SongPerformerRecord> {
    let songs = first_by_code(songs, |s| s.code.as_str());
    let performers = first_by_code(performers, |p| p.code.as_str());

    let mut records = Vec::new();
    for play in plays {
        let Some(song) = songs.get(play.song_code.as_str()) else {
            continue;
        };
        for performer in resolve_performers(play, &performers) {
            records.push(SongPerformerRecord {
                song_code: song.code.clone(),
                song_name: song.name.clone(),
                performer_code: performer.code.clone(),
                performer_name: performer.name.clone(),
                movie: song.movie.clone(),
            });
        }
    }
    records
}

/// One record per (song, genre) for songs that list genres
pub fn join_song_genres(songs: &[Song]) -> Vec<SongGenreRecord> {
    songs
        .iter()
        .flat_map(|song| {
            song.genres.iter().flatten().map(move |genre| SongGenreRecord {
                song_code: song.code.clone(),
                song_name: song.name.clone(),
                genre: genre.clone(),
                movie: song.movie.clone(),
            })
        })
        .collect()
}
