//! Canonical shapes for catalog responses, plus the parsing layer that
//! converts raw catalog payloads into them.
//!
//! The upstream catalog is loosely typed: items routinely miss fields, nest
//! the album name inside an object, or mix songs and videos in one shelf.
//! Nothing downstream of this module ever sees a raw payload; every field is
//! validated or defaulted here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ArtistRef, Thumbnail, Track};

/// Search result categories supported by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilter {
    Songs,
    Albums,
    Artists,
    Playlists,
    Videos,
    All,
}

impl SearchFilter {
    pub fn parse(s: &str) -> Self {
        match s {
            "songs" => SearchFilter::Songs,
            "albums" => SearchFilter::Albums,
            "artists" => SearchFilter::Artists,
            "playlists" => SearchFilter::Playlists,
            "videos" => SearchFilter::Videos,
            _ => SearchFilter::All,
        }
    }

    /// Filter name as sent to the catalog search endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::Songs => "songs",
            SearchFilter::Albums => "albums",
            SearchFilter::Artists => "artists",
            SearchFilter::Playlists => "playlists",
            SearchFilter::Videos => "videos",
            SearchFilter::All => "all",
        }
    }
}

/// A titled, ordered group of content items from the catalog home page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shelf {
    pub title: String,
    pub contents: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlbumResult {
    pub browse_id: String,
    pub title: String,
    pub artists: Vec<ArtistRef>,
    pub year: Option<i32>,
    pub thumbnails: Vec<Thumbnail>,
    pub explicit: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtistResult {
    pub browse_id: String,
    pub artist: String,
    pub thumbnails: Vec<Thumbnail>,
    pub subscribers: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlaylistResult {
    pub browse_id: String,
    pub title: String,
    pub author: Option<String>,
    pub item_count: Option<u32>,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoResult {
    pub video_id: String,
    pub title: String,
    pub artists: Vec<ArtistRef>,
    pub duration: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub views: Option<String>,
}

/// Album detail page with its playable tracks
#[derive(Debug, Clone, Serialize)]
pub struct AlbumDetails {
    pub title: String,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub thumbnails: Vec<Thumbnail>,
    pub description: Option<String>,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArtistDetails {
    pub name: String,
    pub description: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub subscribers: Option<String>,
}

/// Catalog playlist detail page with its playable tracks
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistDetails {
    pub title: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub views: Option<String>,
    pub duration: Option<String>,
    pub tracks: Vec<Track>,
}

// ============================================================================
// Raw payload parsing
// ============================================================================

#[derive(Debug, Deserialize, Default)]
struct RawArtist {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawAlbumRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawItem {
    #[serde(default, alias = "videoId")]
    video_id: Option<String>,
    #[serde(default, alias = "browseId")]
    browse_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    artists: Vec<RawArtist>,
    #[serde(default)]
    album: Option<RawAlbumRef>,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default, alias = "durationSeconds")]
    duration_seconds: Option<u32>,
    #[serde(default)]
    thumbnails: Vec<Thumbnail>,
    #[serde(default, alias = "isExplicit")]
    is_explicit: Option<bool>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    views: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default, alias = "itemCount")]
    item_count: Option<u32>,
    #[serde(default)]
    subscribers: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tracks: Vec<Value>,
}

impl RawItem {
    fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    fn artist_refs(&self) -> Vec<ArtistRef> {
        self.artists
            .iter()
            .filter_map(|a| {
                a.name.as_ref().map(|name| ArtistRef {
                    name: name.clone(),
                    id: a.id.clone(),
                })
            })
            .collect()
    }
}

/// Parse one raw catalog item into a canonical track.
///
/// Returns `None` for items without a playable track identifier; those are
/// shelf fillers (albums, artist cards) the feed cannot use.
pub fn parse_track(value: &Value) -> Option<Track> {
    let raw = RawItem::from_value(value)?;
    let artists = raw.artist_refs();
    let id = raw.video_id.filter(|id| !id.is_empty())?;
    Some(Track {
        id,
        title: raw.title.unwrap_or_default(),
        artists,
        album: raw.album.and_then(|a| a.name),
        duration: raw.duration,
        duration_seconds: raw.duration_seconds.unwrap_or(0),
        thumbnails: raw.thumbnails,
        explicit: raw.is_explicit.unwrap_or(false),
        year: raw.year,
        views: raw.views,
    })
}

/// Parse a list of raw items, silently dropping unplayable entries
pub fn parse_tracks(values: &[Value]) -> Vec<Track> {
    values.iter().filter_map(parse_track).collect()
}

pub fn parse_album_result(value: &Value) -> Option<AlbumResult> {
    let raw = RawItem::from_value(value)?;
    Some(AlbumResult {
        browse_id: raw.browse_id.clone().filter(|id| !id.is_empty())?,
        title: raw.title.clone().unwrap_or_default(),
        artists: raw.artist_refs(),
        year: raw.year,
        thumbnails: raw.thumbnails,
        explicit: raw.is_explicit.unwrap_or(false),
    })
}

pub fn parse_artist_result(value: &Value) -> Option<ArtistResult> {
    let raw = RawItem::from_value(value)?;
    Some(ArtistResult {
        browse_id: raw.browse_id.clone().filter(|id| !id.is_empty())?,
        artist: raw.artist.clone().or(raw.title.clone()).unwrap_or_default(),
        thumbnails: raw.thumbnails,
        subscribers: raw.subscribers,
    })
}

pub fn parse_playlist_result(value: &Value) -> Option<PlaylistResult> {
    let raw = RawItem::from_value(value)?;
    Some(PlaylistResult {
        browse_id: raw.browse_id.clone().filter(|id| !id.is_empty())?,
        title: raw.title.clone().unwrap_or_default(),
        author: raw.author,
        item_count: raw.item_count,
        thumbnails: raw.thumbnails,
    })
}

pub fn parse_video_result(value: &Value) -> Option<VideoResult> {
    let raw = RawItem::from_value(value)?;
    Some(VideoResult {
        video_id: raw.video_id.clone().filter(|id| !id.is_empty())?,
        title: raw.title.clone().unwrap_or_default(),
        artists: raw.artist_refs(),
        duration: raw.duration,
        thumbnails: raw.thumbnails,
        views: raw.views,
    })
}

pub fn parse_album_details(value: &Value) -> Option<AlbumDetails> {
    let raw = RawItem::from_value(value)?;
    Some(AlbumDetails {
        title: raw.title.clone().unwrap_or_default(),
        artist: raw.artist.clone().or_else(|| {
            raw.artists
                .first()
                .and_then(|a| a.name.clone())
        }),
        year: raw.year,
        thumbnails: raw.thumbnails.clone(),
        description: raw.description.clone(),
        tracks: parse_tracks(&raw.tracks),
    })
}

pub fn parse_artist_details(value: &Value) -> Option<ArtistDetails> {
    let raw = RawItem::from_value(value)?;
    Some(ArtistDetails {
        name: raw.artist.clone().or(raw.title.clone()).unwrap_or_default(),
        description: raw.description,
        thumbnails: raw.thumbnails,
        subscribers: raw.subscribers,
    })
}

pub fn parse_playlist_details(value: &Value) -> Option<PlaylistDetails> {
    let raw = RawItem::from_value(value)?;
    Some(PlaylistDetails {
        title: raw.title.clone().unwrap_or_default(),
        author: raw.author.clone(),
        description: raw.description.clone(),
        thumbnails: raw.thumbnails.clone(),
        views: raw.views.clone(),
        duration: raw.duration.clone(),
        tracks: parse_tracks(&raw.tracks),
    })
}
