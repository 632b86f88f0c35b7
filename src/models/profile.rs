use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Track;

/// One played track in a user's listening history.
///
/// The artist field is synthesized from the track's first listed artist at
/// record time (empty when the track carried none), so history scans never
/// have to re-derive it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayEvent {
    pub track_id: String,
    pub title: String,
    pub artist: String,
    pub played_at: DateTime<Utc>,
}

impl PlayEvent {
    pub fn from_track(track: &Track, played_at: DateTime<Utc>) -> Self {
        Self {
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist: track.primary_artist().unwrap_or_default().to_string(),
            played_at,
        }
    }
}

/// Entry in the global recently-played list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentEntry {
    #[serde(flatten)]
    pub track: Track,
    pub timestamp: DateTime<Utc>,
}

/// A track inside a user playlist, with the time it was added
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaylistEntry {
    #[serde(flatten)]
    pub track: Track,
    pub added_at: DateTime<Utc>,
}

/// User-created playlist
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Playlist {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub songs: Vec<PlaylistEntry>,
}

impl Playlist {
    pub fn new(name: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            created_at,
            songs: Vec::new(),
        }
    }
}
