use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::catalog::SearchFilter;
use crate::models::Track;
use crate::services::providers::extractor::watch_url;
use crate::services::recommend::FeedSnapshot;
use crate::services::session::{self, SESSION_HEADER};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct SearchQueryParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, rename = "type")]
    pub search_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default, rename = "type")]
    pub search_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveSongRequest {
    pub track_id: String,
}

#[derive(Debug, Deserialize)]
pub struct StreamParams {
    #[serde(default = "default_audio_only")]
    pub audio_only: bool,
}

fn default_audio_only() -> bool {
    true
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn search_get(
    State(state): State<AppState>,
    Query(params): Query<SearchQueryParams>,
) -> AppResult<Json<Value>> {
    run_search(
        state,
        params.q.unwrap_or_default(),
        params.search_type.unwrap_or_default(),
    )
    .await
}

pub async fn search_post(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> AppResult<Json<Value>> {
    run_search(
        state,
        body.query.unwrap_or_default(),
        body.search_type.unwrap_or_default(),
    )
    .await
}

/// Degrades one search category to an empty list on provider failure
fn or_empty<T>(category: &'static str, result: AppResult<Vec<T>>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(category, error = %e, "Search category degraded to empty");
            Vec::new()
        }
    }
}

async fn run_search(state: AppState, query: String, search_type: String) -> AppResult<Json<Value>> {
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Query parameter is required".to_string(),
        ));
    }

    {
        let mut library = state.library.write().await;
        library.note_search(&query);
    }
    state.save_library().await;

    let filter = SearchFilter::parse(&search_type);
    let catalog = state.catalog.as_ref();

    let results = match filter {
        SearchFilter::Songs => json!(catalog.search_songs(&query, 20).await?),
        SearchFilter::Albums => json!(catalog.search_albums(&query, 20).await?),
        SearchFilter::Artists => json!(catalog.search_artists(&query, 20).await?),
        SearchFilter::Playlists => json!(catalog.search_playlists(&query, 20).await?),
        SearchFilter::Videos => json!(catalog.search_videos(&query, 20).await?),
        SearchFilter::All => json!({
            "songs": or_empty("songs", catalog.search_songs(&query, 10).await),
            "albums": or_empty("albums", catalog.search_albums(&query, 10).await),
            "artists": or_empty("artists", catalog.search_artists(&query, 10).await),
            "playlists": or_empty("playlists", catalog.search_playlists(&query, 10).await),
            "videos": or_empty("videos", catalog.search_videos(&query, 10).await),
        }),
    };

    Ok(Json(json!({
        "status": "success",
        "results": results,
        "query": query,
        "search_type": filter.as_str(),
    })))
}

pub async fn search_history(State(state): State<AppState>) -> Json<Value> {
    let library = state.library.read().await;
    Json(json!({
        "status": "success",
        "history": library.search_history,
    }))
}

pub async fn search_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> Json<Value> {
    if params.q.len() < 2 {
        return Json(json!({ "status": "success", "suggestions": [] }));
    }

    let suggestions = match state.catalog.get_search_suggestions(&params.q).await {
        Ok(mut suggestions) => {
            suggestions.truncate(10);
            suggestions
        }
        Err(e) => {
            // Catalog suggestions are best-effort; fall back to the user's
            // own search history.
            tracing::debug!(error = %e, "Suggestion lookup failed, using search history");
            let library = state.library.read().await;
            library.matching_searches(&params.q, 5)
        }
    };

    Json(json!({ "status": "success", "suggestions": suggestions }))
}

/// Records a play: history, preference counters and the recently-played
/// list all move in the same call
pub async fn play_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(track): Json<Track>,
) -> impl IntoResponse {
    let user_id = session::user_id(&headers);

    {
        let mut library = state.library.write().await;
        library.record_play(&user_id, &track);
    }
    state.save_library().await;

    (
        AppendHeaders([(SESSION_HEADER, user_id.clone())]),
        Json(json!({ "status": "success", "user_id": user_id })),
    )
}

pub async fn recently_played(State(state): State<AppState>) -> Json<Value> {
    let library = state.library.read().await;
    Json(json!({
        "status": "success",
        "recently_played": library.recent_sorted(),
    }))
}

/// The merged personalized feed
pub async fn recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let user_id = session::user_id(&headers);

    // Snapshot before any catalog call; the lock must not span awaits on
    // external I/O.
    let snapshot = {
        let library = state.library.read().await;
        FeedSnapshot {
            user_id: user_id.clone(),
            histories: library.listening_history.clone(),
            last_played: library.last_played().map(|e| e.track.clone()),
        }
    };

    let feed = state.engine.build_feed(&snapshot).await;

    (
        AppendHeaders([(SESSION_HEADER, user_id.clone())]),
        Json(json!({
            "status": "success",
            "recommendations": feed.recommendations,
            "user_id": user_id,
            "personalization_level": feed.personalization_level,
            "recommendation_breakdown": feed.breakdown,
        })),
    )
}

pub async fn quick_picks(State(state): State<AppState>) -> Json<Value> {
    use crate::models::SourceOutcome;

    match state.engine.quick_picks().await {
        SourceOutcome::Filled(tracks) => Json(json!({
            "status": "success",
            "quick_picks": tracks,
        })),
        SourceOutcome::Empty => Json(json!({
            "status": "success",
            "quick_picks": [],
            "message": "No Quick Picks found on home page",
        })),
        SourceOutcome::Failed(e) => {
            tracing::warn!(error = %e, "Quick picks lookup failed");
            Json(json!({
                "status": "success",
                "quick_picks": [],
                "message": "No Quick Picks found on home page",
            }))
        }
    }
}

pub async fn top_charts(State(state): State<AppState>) -> Json<Value> {
    let charts = state.engine.trending(20).await;
    Json(json!({ "status": "success", "top_charts": charts }))
}

pub async fn get_playlists(State(state): State<AppState>) -> Json<Value> {
    let library = state.library.read().await;
    Json(json!({
        "status": "success",
        "playlists": library.playlists_sorted(),
    }))
}

pub async fn create_playlist(
    State(state): State<AppState>,
    Json(request): Json<CreatePlaylistRequest>,
) -> AppResult<Json<Value>> {
    if request.name.is_empty() {
        return Err(AppError::InvalidInput(
            "Playlist name is required".to_string(),
        ));
    }

    let id = {
        let mut library = state.library.write().await;
        library.create_playlist(request.name)
    };
    state.save_library().await;

    Ok(Json(json!({ "status": "success", "playlist_id": id })))
}

pub async fn get_playlist_songs(
    State(state): State<AppState>,
    Path(playlist_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let library = state.library.read().await;
    let songs = library.playlist_songs(playlist_id)?;
    Ok(Json(json!({ "status": "success", "songs": songs })))
}

pub async fn add_playlist_song(
    State(state): State<AppState>,
    Path(playlist_id): Path<Uuid>,
    Json(track): Json<Track>,
) -> AppResult<Json<Value>> {
    {
        let mut library = state.library.write().await;
        library.add_playlist_song(playlist_id, track)?;
    }
    state.save_library().await;

    Ok(Json(json!({
        "status": "success",
        "message": "Song added to playlist",
    })))
}

pub async fn remove_playlist_song(
    State(state): State<AppState>,
    Path(playlist_id): Path<Uuid>,
    Json(request): Json<RemoveSongRequest>,
) -> AppResult<Json<Value>> {
    {
        let mut library = state.library.write().await;
        library.remove_playlist_song(playlist_id, &request.track_id)?;
    }
    state.save_library().await;

    Ok(Json(json!({
        "status": "success",
        "message": "Song removed from playlist",
    })))
}

pub async fn album_details(
    State(state): State<AppState>,
    Path(browse_id): Path<String>,
) -> AppResult<Json<Value>> {
    let album = state.catalog.get_album(&browse_id).await?;
    Ok(Json(json!({
        "status": "success",
        "album": album,
        "total_songs": album.tracks.len(),
    })))
}

pub async fn artist_details(
    State(state): State<AppState>,
    Path(browse_id): Path<String>,
) -> AppResult<Json<Value>> {
    let artist = state.catalog.get_artist(&browse_id).await?;
    Ok(Json(json!({ "status": "success", "artist": artist })))
}

pub async fn catalog_playlist_details(
    State(state): State<AppState>,
    Path(playlist_id): Path<String>,
) -> AppResult<Json<Value>> {
    let playlist = state.catalog.get_playlist(&playlist_id).await?;
    Ok(Json(json!({
        "status": "success",
        "playlist": playlist,
        "total_songs": playlist.tracks.len(),
    })))
}

/// Resolves a stream URL, falling back to the public watch URL so playback
/// always has somewhere to go
pub async fn stream_url(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
    Query(params): Query<StreamParams>,
) -> Json<Value> {
    match state.resolver.resolve(&track_id, params.audio_only).await {
        Ok(info) => Json(json!({
            "status": "success",
            "stream_url": info.stream_url,
            "format_info": info.format_info,
            "media_info": info.media_info,
        })),
        Err(e) => {
            tracing::warn!(track_id = %track_id, error = %e, "Stream resolution failed, using watch URL");
            Json(json!({
                "status": "success",
                "stream_url": watch_url(&track_id),
                "media_info": crate::models::MediaInfo::default(),
                "note": "Fallback to direct watch URL",
                "original_error": e.to_string(),
            }))
        }
    }
}

pub async fn stream_formats(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> AppResult<Json<Value>> {
    let inventory = state.resolver.formats(&track_id).await?;
    Ok(Json(json!({ "status": "success", "formats": inventory })))
}

pub async fn stream_format(
    State(state): State<AppState>,
    Path((track_id, format_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let info = state.resolver.resolve_format(&track_id, &format_id).await?;
    Ok(Json(json!({
        "status": "success",
        "stream_url": info.stream_url,
        "format_info": info.format_info,
    })))
}
