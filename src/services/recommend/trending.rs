//! Trending source with layered fallbacks.
//!
//! Strategy order: home-page shelves whose titles look like charts, then a
//! handful of generic popularity searches, then a fixed list of well-known
//! tracks. By contract this never errors; the UI must never see an empty
//! trending feed.

use crate::models::{ArtistRef, Thumbnail, Track};
use crate::services::providers::Catalog;

/// Shelf-title keywords that mark trending content
const TRENDING_KEYWORDS: [&str; 5] = ["trending", "popular", "hot", "top", "chart"];

/// Generic searches tried when no shelf matches
const FALLBACK_SEARCHES: [&str; 3] = ["top songs 2024", "popular music", "trending songs"];

/// Trending tracks, up to `limit`. Never fails; the worst case is the
/// hardcoded fallback list.
pub async fn trending(catalog: &dyn Catalog, limit: usize) -> Vec<Track> {
    match from_home_shelves(catalog, limit).await {
        Ok(tracks) if !tracks.is_empty() => return tracks,
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Home page unavailable for trending, trying searches");
        }
    }

    for search in FALLBACK_SEARCHES {
        match catalog.search_songs(search, limit as u32).await {
            Ok(tracks) if !tracks.is_empty() => {
                let mut tracks = tracks;
                tracks.truncate(limit);
                return tracks;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(search = %search, error = %e, "Trending fallback search failed");
            }
        }
    }

    tracing::warn!("All trending strategies exhausted, serving curated fallback");
    let mut tracks = fallback_tracks();
    tracks.truncate(limit);
    tracks
}

async fn from_home_shelves(
    catalog: &dyn Catalog,
    limit: usize,
) -> crate::error::AppResult<Vec<Track>> {
    let shelves = catalog.get_home().await?;

    let mut tracks = Vec::new();
    'shelves: for shelf in shelves {
        let title = shelf.title.to_lowercase();
        if !TRENDING_KEYWORDS.iter().any(|kw| title.contains(kw)) {
            continue;
        }
        for track in shelf.contents {
            tracks.push(track);
            if tracks.len() >= limit {
                break 'shelves;
            }
        }
    }

    Ok(tracks)
}

fn fallback_track(id: &str, title: &str, artists: &[&str], duration: &str) -> Track {
    Track {
        id: id.to_string(),
        title: title.to_string(),
        artists: artists.iter().map(|a| ArtistRef::named(a)).collect(),
        album: None,
        duration: Some(duration.to_string()),
        duration_seconds: 0,
        thumbnails: vec![Thumbnail {
            url: format!("https://i.ytimg.com/vi/{id}/maxresdefault.jpg"),
            width: None,
            height: None,
        }],
        explicit: false,
        year: None,
        views: None,
    }
}

/// Last-resort curated list of well-known tracks
pub fn fallback_tracks() -> Vec<Track> {
    vec![
        fallback_track("dQw4w9WgXcQ", "Never Gonna Give You Up", &["Rick Astley"], "3:33"),
        fallback_track("L_jWHffIx5E", "Smells Like Teen Spirit", &["Nirvana"], "5:01"),
        fallback_track("fJ9rUzIMcZQ", "Bohemian Rhapsody", &["Queen"], "5:55"),
        fallback_track("kJQP7kiw5Fk", "Despacito", &["Luis Fonsi", "Daddy Yankee"], "4:42"),
        fallback_track("9bZkp7q19f0", "Gangnam Style", &["PSY"], "4:12"),
    ]
}
