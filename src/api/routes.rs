use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::request_id_middleware;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Search
        .route("/search", get(handlers::search_get).post(handlers::search_post))
        .route("/search/history", get(handlers::search_history))
        .route("/search/suggestions", get(handlers::search_suggestions))
        // Listening
        .route("/play_event", post(handlers::play_event))
        .route("/recently_played", get(handlers::recently_played))
        // Recommendations
        .route("/recommendations", get(handlers::recommendations))
        .route("/quick_picks", get(handlers::quick_picks))
        .route("/top_charts", get(handlers::top_charts))
        // Playlists
        .route(
            "/playlists",
            get(handlers::get_playlists).post(handlers::create_playlist),
        )
        .route(
            "/playlists/:playlist_id/songs",
            get(handlers::get_playlist_songs)
                .post(handlers::add_playlist_song)
                .delete(handlers::remove_playlist_song),
        )
        // Catalog detail passthrough
        .route("/albums/:browse_id", get(handlers::album_details))
        .route("/artists/:browse_id", get(handlers::artist_details))
        .route(
            "/catalog/playlists/:playlist_id",
            get(handlers::catalog_playlist_details),
        )
        // Stream resolution
        .route("/streams/:track_id", get(handlers::stream_url))
        .route("/streams/:track_id/formats", get(handlers::stream_formats))
        .route(
            "/streams/:track_id/formats/:format_id",
            get(handlers::stream_format),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
