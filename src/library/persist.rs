//! JSON persistence for the library: one blob per logical table.
//!
//! Saves are whole-table overwrites, written to a temp file and renamed into
//! place so a crashed save never leaves a half-written table. A missing file
//! on load is not an error; the table starts from its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use super::Library;
use crate::error::AppResult;

const PLAYLISTS_FILE: &str = "playlists.json";
const RECENTLY_PLAYED_FILE: &str = "recently_played.json";
const LISTENING_HISTORY_FILE: &str = "listening_history.json";
const ARTIST_PREFERENCES_FILE: &str = "artist_preferences.json";
const GENRE_PREFERENCES_FILE: &str = "genre_preferences.json";
const SEARCH_HISTORY_FILE: &str = "search_history.json";

/// Handle to the on-disk library state
pub struct Storage {
    dir: PathBuf,
    /// Concurrent saves would race on the table files; serialize them.
    save_lock: Mutex<()>,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            save_lock: Mutex::new(()),
        }
    }

    /// Loads the library from disk, defaulting each missing table
    pub fn load(&self) -> Library {
        Library {
            playlists: self.load_table(PLAYLISTS_FILE),
            recently_played: self.load_table(RECENTLY_PLAYED_FILE),
            listening_history: self.load_table(LISTENING_HISTORY_FILE),
            artist_preferences: self.load_table(ARTIST_PREFERENCES_FILE),
            genre_preferences: self.load_table(GENRE_PREFERENCES_FILE),
            search_history: self.load_table(SEARCH_HISTORY_FILE),
        }
    }

    /// Writes every table from the given snapshot.
    ///
    /// Holds the save lock for the whole pass so overlapping saves cannot
    /// interleave table writes.
    pub async fn save(&self, snapshot: &Library) -> AppResult<()> {
        let _guard = self.save_lock.lock().await;

        fs::create_dir_all(&self.dir)?;
        self.save_table(PLAYLISTS_FILE, &snapshot.playlists)?;
        self.save_table(RECENTLY_PLAYED_FILE, &snapshot.recently_played)?;
        self.save_table(LISTENING_HISTORY_FILE, &snapshot.listening_history)?;
        self.save_table(ARTIST_PREFERENCES_FILE, &snapshot.artist_preferences)?;
        self.save_table(GENRE_PREFERENCES_FILE, &snapshot.genre_preferences)?;
        self.save_table(SEARCH_HISTORY_FILE, &snapshot.search_history)?;
        Ok(())
    }

    fn load_table<T: DeserializeOwned + Default>(&self, file: &str) -> T {
        let path = self.dir.join(file);
        if !path.exists() {
            return T::default();
        }
        match read_json(&path) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Failed to load table, using default");
                T::default()
            }
        }
    }

    fn save_table<T: Serialize>(&self, file: &str, value: &T) -> AppResult<()> {
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));
        let json = serde_json::to_vec(value)
            .map_err(|e| crate::error::AppError::Internal(e.to_string()))?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArtistRef, Track};

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("title-{id}"),
            artists: vec![ArtistRef::named("Queen")],
            album: None,
            duration: None,
            duration_seconds: 0,
            thumbnails: vec![],
            explicit: false,
            year: None,
            views: None,
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let mut library = Library::default();
        library.record_play("u1", &track("t1"));
        library.record_play("u1", &track("t2"));
        library.note_search("bohemian rhapsody");
        library.create_playlist("Favorites".to_string());

        storage.save(&library).await.unwrap();

        let restored = storage.load();
        assert_eq!(restored.history("u1").len(), 2);
        assert_eq!(restored.artist_preferences["u1"]["Queen"], 2);
        assert_eq!(restored.recently_played.len(), 2);
        assert_eq!(restored.search_history, vec!["bohemian rhapsody"]);
        assert_eq!(restored.playlists.len(), 1);
        assert_eq!(restored.playlists[0].name, "Favorites");
    }

    #[test]
    fn test_load_from_empty_dir_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());

        let library = storage.load();
        assert!(library.playlists.is_empty());
        assert!(library.listening_history.is_empty());
        assert!(library.search_history.is_empty());
    }

    #[test]
    fn test_corrupt_table_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SEARCH_HISTORY_FILE), b"not json").unwrap();

        let storage = Storage::new(dir.path());
        let library = storage.load();
        assert!(library.search_history.is_empty());
    }
}
