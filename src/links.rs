//! Outbound URLs for a recommended playlist.

use crate::models::Recommendation;

const YOUTUBE_MUSIC_SEARCH: &str = "https://music.youtube.com/search?q=";
const SPOTIFY_SEARCH: &str = "https://open.spotify.com/search/";
const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/seed";

/// `"{title} {artist}"` for every result, joined by single spaces.
#[must_use]
pub fn search_query(results: &[Recommendation]) -> String {
    results
        .iter()
        .map(|r| format!("{} {}", r.song.title, r.song.artist))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Percent-encode for a search query, with spaces as `+`.
/// A literal `+` is still encoded as `%2B`.
fn encode_query(query: &str) -> String {
    urlencoding::encode(query).replace("%20", "+")
}

#[must_use]
pub fn youtube_music_url(results: &[Recommendation]) -> String {
    format!("{YOUTUBE_MUSIC_SEARCH}{}", encode_query(&search_query(results)))
}

#[must_use]
pub fn spotify_url(results: &[Recommendation]) -> String {
    format!("{SPOTIFY_SEARCH}{}", encode_query(&search_query(results)))
}

/// Stable placeholder cover art seeded by the song title.
#[must_use]
pub fn placeholder_image_url(title: &str) -> String {
    format!("{PLACEHOLDER_IMAGE}/{}/400", urlencoding::encode(title))
}
