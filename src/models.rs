#![allow(clippy::doc_markdown)]

use serde::{Deserialize, Serialize};

/// Number of recommendations returned when the caller does not ask otherwise.
pub const DEFAULT_RECOMMENDATIONS: usize = 9;

/// Selecting more songs than this still works, but blurs the vibe.
pub const SELECTION_ADVISORY_LIMIT: usize = 10;

/// Declared audio feature schema, in matrix column order.
pub const FEATURE_COLUMNS: &[&str] = &[
    "danceability",
    "energy",
    "key",
    "loudness",
    "mode",
    "speechiness",
    "acousticness",
    "instrumentalness",
    "liveness",
    "valence",
    "tempo",
];

/// A cleaned row from the dataset, before feature processing.
///
/// `features` is parallel to [`FEATURE_COLUMNS`]; `None` marks a cell that was
/// empty, unparseable, or whose column is absent from the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SongRecord {
    pub title: String,
    pub artist: String,
    pub album: Option<String>,
    pub features: Vec<Option<f64>>,
}

/// A processed catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
}

impl Song {
    #[must_use]
    pub fn from_record(record: SongRecord) -> Self {
        Self {
            song_id: song_id(&record.title, &record.artist),
            title: record.title,
            artist: record.artist,
            album: record.album,
        }
    }
}

/// Identifier shown in the song picker: `"{title} - {artist}"`.
#[must_use]
pub fn song_id(title: &str, artist: &str) -> String {
    format!("{title} - {artist}")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub score: f32,
    #[serde(flatten)]
    pub song: Song,
}

impl Recommendation {
    /// Format as TSV line: score, title, artist, album.
    #[must_use]
    pub fn to_tsv(&self) -> String {
        format!(
            "{:.4}\t{}\t{}\t{}",
            self.score,
            self.song.title,
            self.song.artist,
            self.song.album.as_deref().unwrap_or(""),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_id_joins_title_and_artist() {
        assert_eq!(song_id("Kesariya", "Arijit Singh"), "Kesariya - Arijit Singh");
    }

    #[test]
    fn tsv_leaves_missing_album_blank() {
        let rec = Recommendation {
            score: 0.5,
            song: Song {
                song_id: song_id("Tum Hi Ho", "Arijit Singh"),
                title: "Tum Hi Ho".to_string(),
                artist: "Arijit Singh".to_string(),
                album: None,
            },
        };
        assert_eq!(rec.to_tsv(), "0.5000\tTum Hi Ho\tArijit Singh\t");
    }
}
