use std::collections::HashSet;
use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::json;

use tunefeed::api::{create_router, AppState};
use tunefeed::error::{AppError, AppResult};
use tunefeed::library::persist::Storage;
use tunefeed::models::{
    AlbumDetails, AlbumResult, ArtistDetails, ArtistRef, ArtistResult, FormatInventory,
    MediaInfo, PlaylistDetails, PlaylistResult, Shelf, StreamInfo, Track, VideoResult,
};
use tunefeed::services::providers::{Catalog, StreamResolver};

fn make_track(id: &str, artist: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("title-{id}"),
        artists: vec![ArtistRef::named(artist)],
        album: None,
        duration: None,
        duration_seconds: 0,
        thumbnails: vec![],
        explicit: false,
        year: None,
        views: None,
    }
}

/// Catalog stub: deterministic search results, configurable home shelves
#[derive(Clone, Default)]
struct FakeCatalog {
    shelves: Vec<Shelf>,
    fail_all: bool,
}

impl FakeCatalog {
    fn check(&self) -> AppResult<()> {
        if self.fail_all {
            Err(AppError::ExternalApi("catalog down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait::async_trait]
impl Catalog for FakeCatalog {
    async fn search_songs(&self, query: &str, limit: u32) -> AppResult<Vec<Track>> {
        self.check()?;
        let slug: String = query
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        Ok((0..3u32.min(limit))
            .map(|i| make_track(&format!("{slug}-{i}"), "Some Artist"))
            .collect())
    }

    async fn search_albums(&self, _query: &str, _limit: u32) -> AppResult<Vec<AlbumResult>> {
        self.check()?;
        Ok(vec![])
    }

    async fn search_artists(&self, _query: &str, _limit: u32) -> AppResult<Vec<ArtistResult>> {
        self.check()?;
        Ok(vec![])
    }

    async fn search_playlists(&self, _query: &str, _limit: u32) -> AppResult<Vec<PlaylistResult>> {
        self.check()?;
        Ok(vec![])
    }

    async fn search_videos(&self, _query: &str, _limit: u32) -> AppResult<Vec<VideoResult>> {
        self.check()?;
        Ok(vec![])
    }

    async fn get_home(&self) -> AppResult<Vec<Shelf>> {
        self.check()?;
        Ok(self.shelves.clone())
    }

    async fn get_watch_playlist(&self, _track_id: &str) -> AppResult<Vec<Track>> {
        self.check()?;
        Ok(vec![])
    }

    async fn get_search_suggestions(&self, query: &str) -> AppResult<Vec<String>> {
        self.check()?;
        Ok(vec![format!("{query} live"), format!("{query} remix")])
    }

    async fn get_album(&self, _browse_id: &str) -> AppResult<AlbumDetails> {
        Err(AppError::NotFound("Album not found".to_string()))
    }

    async fn get_artist(&self, _browse_id: &str) -> AppResult<ArtistDetails> {
        Err(AppError::NotFound("Artist not found".to_string()))
    }

    async fn get_playlist(&self, _playlist_id: &str) -> AppResult<PlaylistDetails> {
        Err(AppError::NotFound("Playlist not found".to_string()))
    }
}

/// Resolver stub: fixed stream URL, or hard failure
#[derive(Clone, Default)]
struct FakeResolver {
    fail: bool,
}

#[async_trait::async_trait]
impl StreamResolver for FakeResolver {
    async fn resolve(&self, track_id: &str, _audio_only: bool) -> AppResult<StreamInfo> {
        if self.fail {
            return Err(AppError::ExternalApi("extractor down".to_string()));
        }
        Ok(StreamInfo {
            stream_url: format!("https://cdn.test/{track_id}.m4a"),
            format_info: None,
            media_info: MediaInfo::default(),
            note: None,
        })
    }

    async fn formats(&self, _track_id: &str) -> AppResult<FormatInventory> {
        Ok(FormatInventory::default())
    }

    async fn resolve_format(&self, track_id: &str, _format_id: &str) -> AppResult<StreamInfo> {
        self.resolve(track_id, true).await
    }
}

fn home_shelves() -> Vec<Shelf> {
    vec![
        Shelf {
            title: "Quick picks".to_string(),
            contents: (0..6).map(|i| make_track(&format!("qp{i}"), "QP Artist")).collect(),
        },
        Shelf {
            title: "Trending now".to_string(),
            contents: (0..30).map(|i| make_track(&format!("tr{i}"), "Chart Artist")).collect(),
        },
    ]
}

fn create_test_server_with(
    catalog: FakeCatalog,
    resolver: FakeResolver,
    dir: &std::path::Path,
) -> TestServer {
    let state = AppState::new(
        Arc::new(catalog),
        Arc::new(resolver),
        Storage::new(dir),
    );
    TestServer::new(create_router(state)).unwrap()
}

fn create_test_server(dir: &std::path::Path) -> TestServer {
    create_test_server_with(
        FakeCatalog {
            shelves: home_shelves(),
            fail_all: false,
        },
        FakeResolver::default(),
        dir,
    )
}

fn session_header() -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-session-id"),
        HeaderValue::from_static("cafe1234"),
    )
}

#[tokio::test]
async fn test_health_check() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_search_requires_query() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server.get("/search").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_search_songs_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server.get("/search?q=bohemian&type=songs").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["search_type"], "songs");
    assert_eq!(body["results"].as_array().unwrap().len(), 3);

    // The query landed in search history.
    let response = server.get("/search/history").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["history"][0], "bohemian");
}

#[tokio::test]
async fn test_search_all_returns_category_map() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server
        .post("/search")
        .json(&json!({ "query": "queen" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["results"]["songs"].is_array());
    assert!(body["results"]["albums"].is_array());
    assert!(body["results"]["videos"].is_array());
}

#[tokio::test]
async fn test_suggestions_short_query_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server.get("/search/suggestions?q=q").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_suggestions_fall_back_to_history_when_catalog_fails() {
    let dir = tempfile::tempdir().unwrap();

    // Seed the history with a working server over the same data dir.
    let seeded = create_test_server(dir.path());
    seeded.get("/search?q=bohemian&type=songs").await;

    let server = create_test_server_with(
        FakeCatalog {
            shelves: vec![],
            fail_all: true,
        },
        FakeResolver::default(),
        dir.path(),
    );
    let response = server.get("/search/suggestions?q=bohem").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["suggestions"][0], "bohemian");
}

#[tokio::test]
async fn test_play_event_and_recently_played() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());
    let (name, value) = session_header();

    for id in ["t1", "t2", "t1"] {
        let response = server
            .post("/play_event")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "id": id,
                "title": format!("title-{id}"),
                "artists": [{ "name": "Queen" }]
            }))
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["user_id"], "cafe1234");
    }

    let response = server.get("/recently_played").await;
    let body: serde_json::Value = response.json();
    let recents = body["recently_played"].as_array().unwrap();
    // t1 was replayed: deduplicated and moved to the front.
    assert_eq!(recents.len(), 2);
    assert_eq!(recents[0]["id"], "t1");
    assert_eq!(recents[1]["id"], "t2");
}

#[tokio::test]
async fn test_recommendations_for_new_session_are_low_personalization() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server.get("/recommendations").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["status"], "success");
    assert_eq!(body["personalization_level"], "low");
    assert_eq!(body["recommendation_breakdown"]["content_based"], 0);
    assert_eq!(body["recommendation_breakdown"]["collaborative"], 0);
    // A generated 8-hex session id is echoed back.
    assert_eq!(body["user_id"].as_str().unwrap().len(), 8);
}

#[tokio::test]
async fn test_recommendations_after_plays_are_personalized_and_deduplicated() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());
    let (name, value) = session_header();

    server
        .post("/play_event")
        .add_header(name.clone(), value.clone())
        .json(&json!({
            "id": "played1",
            "title": "Bohemian Rhapsody",
            "artists": [{ "name": "Queen" }]
        }))
        .await;

    let response = server
        .get("/recommendations")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["user_id"], "cafe1234");
    assert_eq!(body["personalization_level"], "high");

    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(recommendations.len() <= 20);

    let mut seen = HashSet::new();
    for rec in recommendations {
        assert!(seen.insert(rec["id"].as_str().unwrap().to_string()));
        assert!(rec["recommendation_source"].is_string());
    }

    // Breakdown covers the accepted pool, which may exceed the returned 20.
    let breakdown = body["recommendation_breakdown"].as_object().unwrap();
    let total: u64 = breakdown.values().map(|v| v.as_u64().unwrap()).sum();
    assert!(total >= recommendations.len() as u64);
    assert!(total <= 40);
}

#[tokio::test]
async fn test_quick_picks_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server.get("/quick_picks").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["quick_picks"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_top_charts_with_failing_catalog_serves_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server_with(
        FakeCatalog {
            shelves: vec![],
            fail_all: true,
        },
        FakeResolver::default(),
        dir.path(),
    );

    let response = server.get("/top_charts").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let charts = body["top_charts"].as_array().unwrap();
    // The fixed curated list: never an empty trending feed.
    assert_eq!(charts.len(), 5);
    assert_eq!(charts[0]["title"], "Never Gonna Give You Up");
}

#[tokio::test]
async fn test_playlist_crud_flow() {
    let dir = tempfile::tempdir().unwrap();
    let server = create_test_server(dir.path());

    let response = server
        .post("/playlists")
        .json(&json!({ "name": "Road trip" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let playlist_id = body["playlist_id"].as_str().unwrap().to_string();

    let response = server
        .post(&format!("/playlists/{playlist_id}/songs"))
        .json(&json!({ "id": "t1", "title": "first", "artists": [] }))
        .await;
    response.assert_status_ok();

    let response = server
        .get(&format!("/playlists/{playlist_id}/songs"))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["songs"].as_array().unwrap().len(), 1);

    let response = server
        .delete(&format!("/playlists/{playlist_id}/songs"))
        .json(&json!({ "track_id": "t1" }))
        .await;
    response.assert_status_ok();

    let response = server
        .get(&format!("/playlists/{playlist_id}/songs"))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["songs"].as_array().unwrap().len(), 0);

    // Unknown playlist is a 404 with the error envelope.
    let response = server
        .get(&format!("/playlists/{}/songs", uuid::Uuid::new_v4()))
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stream_resolution_falls_back_to_watch_url() {
    let dir = tempfile::tempdir().unwrap();

    let server = create_test_server_with(
        FakeCatalog::default(),
        FakeResolver { fail: false },
        dir.path(),
    );
    let response = server.get("/streams/abc123").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["stream_url"], "https://cdn.test/abc123.m4a");

    let server = create_test_server_with(
        FakeCatalog::default(),
        FakeResolver { fail: true },
        dir.path(),
    );
    let response = server.get("/streams/abc123").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    // Still success: playback falls back to the public watch page.
    assert_eq!(body["status"], "success");
    assert_eq!(body["stream_url"], "https://www.youtube.com/watch?v=abc123");
    assert_eq!(body["note"], "Fallback to direct watch URL");
}

#[tokio::test]
async fn test_library_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let (name, value) = session_header();

    {
        let server = create_test_server(dir.path());
        server
            .post("/play_event")
            .add_header(name.clone(), value.clone())
            .json(&json!({
                "id": "persisted1",
                "title": "kept",
                "artists": [{ "name": "Queen" }]
            }))
            .await;
    }

    // Fresh state over the same data dir: the play is restored from disk.
    let server = create_test_server(dir.path());
    let response = server.get("/recently_played").await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["recently_played"][0]["id"], "persisted1");
}
