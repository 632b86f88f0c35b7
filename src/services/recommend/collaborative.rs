//! Collaborative filtering over play histories.
//!
//! Similar users are found by Jaccard similarity between played-track-id
//! sets. This scans every known user per call, which is O(users) and only
//! acceptable for a small in-memory user base; a larger deployment would
//! need an index, not this scan.

use std::collections::{HashMap, HashSet};

use crate::models::{PlayEvent, SourceOutcome, Track};

/// Minimum similarity for another user to qualify as similar
const SIMILARITY_THRESHOLD: f64 = 0.10;
/// How many similar users contribute candidates
const TOP_SIMILAR_USERS: usize = 5;
/// How many of each similar user's newest plays are considered
const NEIGHBOR_WINDOW: usize = 10;

/// Jaccard similarity of two track-id sets: |A ∩ B| / |A ∪ B|
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

fn played_set(history: &[PlayEvent]) -> HashSet<&str> {
    history.iter().map(|e| e.track_id.as_str()).collect()
}

/// Recommends tracks played by users with similar histories.
///
/// Candidates come from the top similar users in rank order, each user's
/// newest plays first, excluding anything the target user has already
/// played. Duplicates across different similar users are allowed here; the
/// merger deduplicates.
pub fn recommend(
    user_id: &str,
    histories: &HashMap<String, Vec<PlayEvent>>,
    limit: usize,
) -> SourceOutcome {
    let Some(user_history) = histories.get(user_id).filter(|h| !h.is_empty()) else {
        return SourceOutcome::Empty;
    };
    let user_tracks = played_set(user_history);

    let mut similar: Vec<(&str, f64)> = Vec::new();
    for (other_id, other_history) in histories {
        if other_id == user_id || other_history.is_empty() {
            continue;
        }
        let similarity = jaccard(&user_tracks, &played_set(other_history));
        if similarity > SIMILARITY_THRESHOLD {
            similar.push((other_id, similarity));
        }
    }

    // Rank by similarity; ties broken by user id so the ordering is stable
    // across the hash map's iteration order.
    similar.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let mut recommendations = Vec::new();
    for (similar_id, _) in similar.iter().take(TOP_SIMILAR_USERS) {
        let history = &histories[*similar_id];
        let recent = &history[history.len().saturating_sub(NEIGHBOR_WINDOW)..];
        for event in recent {
            if !user_tracks.contains(event.track_id.as_str()) {
                recommendations.push(Track {
                    id: event.track_id.clone(),
                    title: event.title.clone(),
                    artists: if event.artist.is_empty() {
                        vec![]
                    } else {
                        vec![crate::models::ArtistRef::named(&event.artist)]
                    },
                    album: None,
                    duration: None,
                    duration_seconds: 0,
                    thumbnails: vec![],
                    explicit: false,
                    year: None,
                    views: None,
                });
            }
        }
    }

    recommendations.truncate(limit);
    SourceOutcome::from_tracks(recommendations)
}
