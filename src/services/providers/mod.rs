//! External collaborator abstractions.
//!
//! The core never talks to the music catalog or the media extractor
//! directly; it goes through these traits so the HTTP gateways can be
//! swapped for mocks in tests. Both are blocking-I/O-per-request from the
//! caller's perspective: no timeouts or cancellation beyond what the HTTP
//! client applies, and a slow upstream call stalls only the request that
//! made it.

use crate::error::AppResult;
use crate::models::{
    AlbumDetails, AlbumResult, ArtistDetails, ArtistResult, FormatInventory, PlaylistDetails,
    PlaylistResult, Shelf, StreamInfo, Track, VideoResult,
};

pub mod catalog_http;
pub mod extractor;

pub use catalog_http::HttpCatalog;
pub use extractor::ExtractorResolver;

/// Music catalog operations the core depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    async fn search_songs(&self, query: &str, limit: u32) -> AppResult<Vec<Track>>;
    async fn search_albums(&self, query: &str, limit: u32) -> AppResult<Vec<AlbumResult>>;
    async fn search_artists(&self, query: &str, limit: u32) -> AppResult<Vec<ArtistResult>>;
    async fn search_playlists(&self, query: &str, limit: u32) -> AppResult<Vec<PlaylistResult>>;
    async fn search_videos(&self, query: &str, limit: u32) -> AppResult<Vec<VideoResult>>;

    /// Home page shelves, in page order
    async fn get_home(&self) -> AppResult<Vec<Shelf>>;

    /// Autoplay queue seeded from a track
    async fn get_watch_playlist(&self, track_id: &str) -> AppResult<Vec<Track>>;

    async fn get_search_suggestions(&self, query: &str) -> AppResult<Vec<String>>;

    async fn get_album(&self, browse_id: &str) -> AppResult<AlbumDetails>;
    async fn get_artist(&self, browse_id: &str) -> AppResult<ArtistDetails>;
    async fn get_playlist(&self, playlist_id: &str) -> AppResult<PlaylistDetails>;
}

/// Resolves track identifiers to playable media URLs
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StreamResolver: Send + Sync {
    /// Best stream for a track, audio-only or not
    async fn resolve(&self, track_id: &str, audio_only: bool) -> AppResult<StreamInfo>;

    /// Full format table for a track
    async fn formats(&self, track_id: &str) -> AppResult<FormatInventory>;

    /// Stream for one specific format id
    async fn resolve_format(&self, track_id: &str, format_id: &str) -> AppResult<StreamInfo>;
}
