use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod profile;
pub mod recommend;
pub mod stream;

pub use catalog::{
    AlbumDetails, AlbumResult, ArtistDetails, ArtistResult, PlaylistDetails, PlaylistResult,
    SearchFilter, Shelf, VideoResult,
};
pub use profile::{PlayEvent, Playlist, PlaylistEntry, RecentEntry};
pub use recommend::{RecommendationSource, RecommendedTrack, SourceOutcome};
pub use stream::{FormatInventory, MediaFormat, MediaInfo, StreamInfo};

/// Reference to an artist as it appears on a track or search result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtistRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub id: Option<String>,
}

impl ArtistRef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: None,
        }
    }
}

/// Artwork thumbnail at a particular resolution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// Canonical track shape used throughout the core.
///
/// Every external catalog payload is converted into this shape at the
/// provider boundary, with absent fields defaulted. Treated as immutable
/// once parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub duration_seconds: u32,
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub views: Option<String>,
}

impl Track {
    /// First listed artist's name, if any. Play events and artist
    /// preference counters are keyed off this.
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(|a| a.name.as_str())
    }
}
