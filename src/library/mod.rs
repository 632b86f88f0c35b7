//! In-memory library state: listening histories, preference counters, the
//! global recently-played list, user playlists and search history.
//!
//! One `Library` instance lives in the application state behind a lock; it is
//! constructed at startup (loaded from persistence) and handed to every
//! component that needs it. Mutations happen under the state's write lock,
//! so correctness assumes one writer at a time.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{PlayEvent, Playlist, PlaylistEntry, RecentEntry, Track};

pub mod persist;

/// Per-user history cap; FIFO eviction beyond this
pub const HISTORY_CAP: usize = 100;
/// Global recently-played list cap
pub const RECENT_CAP: usize = 20;
/// Search history cap
pub const SEARCH_HISTORY_CAP: usize = 50;

/// Whole library state. Each field is one independently persisted table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    pub playlists: Vec<Playlist>,
    pub recently_played: Vec<RecentEntry>,
    pub listening_history: HashMap<String, Vec<PlayEvent>>,
    pub artist_preferences: HashMap<String, HashMap<String, u32>>,
    /// Reserved for future use: persisted but never populated by any code
    /// path. Do not write to this without product sign-off.
    pub genre_preferences: HashMap<String, HashMap<String, u32>>,
    pub search_history: Vec<String>,
}

impl Library {
    /// Records a play for a user: appends a history event, bumps the artist
    /// preference counter, and refreshes the global recently-played list.
    ///
    /// The history is truncated to the most recent [`HISTORY_CAP`] events,
    /// oldest first out. Preference counts only move when the track carries
    /// an artist; the play itself is recorded either way.
    pub fn record_play(&mut self, user_id: &str, track: &Track) {
        let now = Utc::now();

        if let Some(artist) = track.primary_artist() {
            *self
                .artist_preferences
                .entry(user_id.to_string())
                .or_default()
                .entry(artist.to_string())
                .or_insert(0) += 1;
        }

        let history = self.listening_history.entry(user_id.to_string()).or_default();
        history.push(PlayEvent::from_track(track, now));
        if history.len() > HISTORY_CAP {
            let excess = history.len() - HISTORY_CAP;
            history.drain(..excess);
        }

        // Recently played is global, deduplicated by track id, newest first.
        self.recently_played.retain(|e| e.track.id != track.id);
        self.recently_played.insert(
            0,
            RecentEntry {
                track: track.clone(),
                timestamp: now,
            },
        );
        self.recently_played.truncate(RECENT_CAP);
    }

    /// Per-user history, empty slice for unknown users
    pub fn history(&self, user_id: &str) -> &[PlayEvent] {
        self.listening_history
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Recently played tracks, newest first
    pub fn recent_sorted(&self) -> Vec<RecentEntry> {
        let mut entries = self.recently_played.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// The most recently played track, if any
    pub fn last_played(&self) -> Option<&RecentEntry> {
        self.recently_played.first()
    }

    /// Remembers a search query: front-inserted, deduplicated, capped
    pub fn note_search(&mut self, query: &str) {
        if query.is_empty() || self.search_history.iter().any(|q| q == query) {
            return;
        }
        self.search_history.insert(0, query.to_string());
        self.search_history.truncate(SEARCH_HISTORY_CAP);
    }

    /// Search-history entries containing the query, case-insensitively
    pub fn matching_searches(&self, query: &str, limit: usize) -> Vec<String> {
        let needle = query.to_lowercase();
        self.search_history
            .iter()
            .filter(|q| q.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn create_playlist(&mut self, name: String) -> Uuid {
        let playlist = Playlist::new(name, Utc::now());
        let id = playlist.id;
        self.playlists.push(playlist);
        id
    }

    /// Playlists, newest first
    pub fn playlists_sorted(&self) -> Vec<Playlist> {
        let mut playlists = self.playlists.clone();
        playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        playlists
    }

    fn playlist_mut(&mut self, id: Uuid) -> AppResult<&mut Playlist> {
        self.playlists
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))
    }

    pub fn add_playlist_song(&mut self, id: Uuid, track: Track) -> AppResult<()> {
        let playlist = self.playlist_mut(id)?;
        playlist.songs.push(PlaylistEntry {
            track,
            added_at: Utc::now(),
        });
        Ok(())
    }

    pub fn remove_playlist_song(&mut self, id: Uuid, track_id: &str) -> AppResult<()> {
        let playlist = self.playlist_mut(id)?;
        playlist.songs.retain(|entry| entry.track.id != track_id);
        Ok(())
    }

    /// Songs in a playlist, most recently added first
    pub fn playlist_songs(&self, id: Uuid) -> AppResult<Vec<PlaylistEntry>> {
        let playlist = self
            .playlists
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
        let mut songs = playlist.songs.clone();
        songs.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        Ok(songs)
    }
}
