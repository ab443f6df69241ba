//! Catalog entities as stored in the YAML data files
//!
//! All entities are plain immutable data holders. A catalog is built once per
//! load and replaced wholesale on reload, never patched in place.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Anything identified by a catalog code
pub trait Coded {
    fn code(&self) -> &str;
}

/// A song in one of the song collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(deserialize_with = "scalar::string")]
    pub code: String,
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar::opt_string", skip_serializing_if = "Option::is_none")]
    pub movie: Option<String>,
    #[serde(default, deserialize_with = "scalar::opt_list", skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
}

/// A performing artist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    #[serde(deserialize_with = "scalar::string")]
    pub code: String,
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,
}

/// A rights-administering organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(deserialize_with = "scalar::string")]
    pub code: String,
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,
}

/// Code/name pair used by the writers, genres and movies collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    #[serde(deserialize_with = "scalar::string")]
    pub code: String,
    #[serde(deserialize_with = "scalar::string")]
    pub name: String,
}

/// Song writers are only shown in reports
pub type Writer = CodeName;
pub type Genre = CodeName;
pub type Movie = CodeName;

/// One performance or recording of a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPlay {
    #[serde(default, deserialize_with = "scalar::string")]
    pub song_code: String,
    #[serde(default, deserialize_with = "scalar::string")]
    pub performer_codes: String,
    #[serde(default, deserialize_with = "scalar::opt_string", skip_serializing_if = "Option::is_none")]
    pub youtube_key: Option<String>,
}

impl SongPlay {
    /// Individual performer codes, split on commas
    pub fn performer_code_list(&self) -> impl Iterator<Item = &str> {
        self.performer_codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    /// YouTube key if present and non-blank
    pub fn youtube_key(&self) -> Option<&str> {
        self.youtube_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

macro_rules! impl_coded {
    ($($ty:ty),*) => {
        $(impl Coded for $ty {
            fn code(&self) -> &str {
                &self.code
            }
        })*
    };
}

impl_coded!(Song, Performer, Organization, CodeName);

/// Organization code to song codes, in document order
///
/// Unlike the other files this one is a mapping rather than a record list:
///
/// ```yaml
/// WCM:
///   - S1
///   - S7
/// UMPG:
///   - S2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RightsAdminIndex(pub Vec<(String, Vec<String>)>);

impl RightsAdminIndex {
    pub fn organizations(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(org, songs)| (org.as_str(), songs.as_slice()))
    }
}

impl<'de> Deserialize<'de> for RightsAdminIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct IndexVisitor;

        impl<'de> Visitor<'de> for IndexVisitor {
            type Value = RightsAdminIndex;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping from organization code to a list of song codes")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(RightsAdminIndex::default())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((org, songs)) =
                    map.next_entry::<scalar::Scalar, Option<Vec<scalar::Scalar>>>()?
                {
                    let songs = songs
                        .unwrap_or_default()
                        .into_iter()
                        .map(String::from)
                        .collect();
                    entries.push((String::from(org), songs));
                }
                Ok(RightsAdminIndex(entries))
            }
        }

        deserializer.deserialize_any(IndexVisitor)
    }
}

/// Lenient scalar handling: YAML happily types `code: 42` as an integer
pub(crate) mod scalar {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(crate) enum Scalar {
        Str(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    impl From<Scalar> for String {
        fn from(value: Scalar) -> Self {
            match value {
                Scalar::Str(s) => s,
                Scalar::Int(i) => i.to_string(),
                Scalar::Float(f) => f.to_string(),
                Scalar::Bool(b) => b.to_string(),
            }
        }
    }

    pub(crate) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(Option::<Scalar>::deserialize(d)?
            .map(String::from)
            .unwrap_or_default())
    }

    pub(crate) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(d)?.map(String::from))
    }

    pub(crate) fn opt_list<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(Option::<Vec<Scalar>>::deserialize(d)?
            .map(|items| items.into_iter().map(String::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_with_optional_fields() {
        let songs: Vec<Song> = serde_yaml::from_str(
            "- code: S1\n  name: Angel\n  movie: Follow That Dream\n  genres:\n    - Ballad\n    - Pop\n- code: 42\n  name: Kiss of Fire\n",
        )
        .unwrap();

        assert_eq!(songs.len(), 2);
        assert_eq!(songs[0].movie.as_deref(), Some("Follow That Dream"));
        assert_eq!(songs[0].genres.as_deref(), Some(&["Ballad".to_string(), "Pop".to_string()][..]));
        assert_eq!(songs[1].code, "42");
        assert_eq!(songs[1].movie, None);
        assert_eq!(songs[1].genres, None);
    }

    #[test]
    fn test_song_play_defaults() {
        let plays: Vec<SongPlay> = serde_yaml::from_str("- song_code: SX\n").unwrap();
        assert_eq!(plays[0].song_code, "SX");
        assert_eq!(plays[0].performer_codes, "");
        assert_eq!(plays[0].youtube_key(), None);
    }

    #[test]
    fn test_blank_youtube_key_is_absent() {
        let play = SongPlay {
            song_code: "S1".to_string(),
            performer_codes: "P1".to_string(),
            youtube_key: Some("  ".to_string()),
        };
        assert_eq!(play.youtube_key(), None);
    }

    #[test]
    fn test_performer_code_list_splits_on_commas() {
        let play = SongPlay {
            song_code: "S1".to_string(),
            performer_codes: "P1, P2,,P3 ".to_string(),
            youtube_key: None,
        };
        let codes: Vec<&str> = play.performer_code_list().collect();
        assert_eq!(codes, vec!["P1", "P2", "P3"]);
    }

    #[test]
    fn test_rights_admin_index_preserves_document_order() {
        let index: RightsAdminIndex =
            serde_yaml::from_str("WCM:\n  - S1\n  - S7\nUMPG:\n  - S2\nEMPTY:\n").unwrap();

        let orgs: Vec<&str> = index.iter().map(|(org, _)| org).collect();
        assert_eq!(orgs, vec!["WCM", "UMPG", "EMPTY"]);
        assert_eq!(index.0[0].1, vec!["S1".to_string(), "S7".to_string()]);
        assert!(index.0[2].1.is_empty());
    }

    #[test]
    fn test_rights_admin_index_rejects_sequence() {
        let result: Result<RightsAdminIndex, _> = serde_yaml::from_str("- S1\n- S2\n");
        assert!(result.is_err());
    }
}
