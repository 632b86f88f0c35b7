//! Content-based recommendations: candidate tracks from the artists the
//! user has played most recently.

use std::collections::HashSet;

use crate::models::{PlayEvent, SourceOutcome};
use crate::services::providers::Catalog;

/// How many of the newest history entries seed the artist scan
const RECENT_WINDOW: usize = 10;
/// Distinct artists queried per request
const ARTIST_LIMIT: usize = 3;
/// Songs requested from the catalog per artist
const PER_ARTIST_LIMIT: u32 = 5;

/// Recommends songs by the user's most recent distinct artists.
///
/// Fails open: no history means an `Empty` outcome, and a search failure for
/// one artist skips that artist rather than sinking the whole source.
pub async fn recommend(
    catalog: &dyn Catalog,
    history: &[PlayEvent],
    limit: usize,
) -> SourceOutcome {
    if history.is_empty() {
        return SourceOutcome::Empty;
    }

    let recent = &history[history.len().saturating_sub(RECENT_WINDOW)..];
    let recent_ids: HashSet<&str> = recent.iter().map(|e| e.track_id.as_str()).collect();

    // Up to three distinct artists, newest plays first.
    let mut artists: Vec<&str> = Vec::new();
    for event in recent.iter().rev() {
        if event.artist.is_empty() || artists.contains(&event.artist.as_str()) {
            continue;
        }
        artists.push(&event.artist);
        if artists.len() == ARTIST_LIMIT {
            break;
        }
    }

    if artists.is_empty() {
        return SourceOutcome::Empty;
    }

    let mut recommendations = Vec::new();
    for artist in artists {
        match catalog
            .search_songs(&format!("artist:{artist}"), PER_ARTIST_LIMIT)
            .await
        {
            Ok(tracks) => {
                for track in tracks {
                    if !recent_ids.contains(track.id.as_str()) {
                        recommendations.push(track);
                    }
                }
            }
            Err(e) => {
                tracing::debug!(artist = %artist, error = %e, "Artist search failed, skipping artist");
            }
        }
    }

    recommendations.truncate(limit);
    SourceOutcome::from_tracks(recommendations)
}
