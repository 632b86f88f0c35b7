//! HTTP gateway to the music catalog service.
//!
//! All responses are loosely typed JSON; they pass through the parsing
//! functions in `models::catalog` so the rest of the crate only ever sees
//! canonical shapes with every field validated or defaulted.

use reqwest::Client as HttpClient;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::models::catalog::{
    self, AlbumDetails, AlbumResult, ArtistDetails, ArtistResult, PlaylistDetails, PlaylistResult,
    SearchFilter, Shelf, VideoResult,
};
use crate::models::Track;
use crate::services::providers::Catalog;

#[derive(Clone)]
pub struct HttpCatalog {
    http_client: HttpClient,
    api_url: String,
}

impl HttpCatalog {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        let url = format!("{}{}", self.api_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Catalog API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn search_raw(&self, query: &str, filter: SearchFilter, limit: u32) -> AppResult<Vec<Value>> {
        let limit = limit.to_string();
        let body = self
            .get_json(
                "/search",
                &[("q", query), ("filter", filter.as_str()), ("limit", &limit)],
            )
            .await?;

        let results = body["results"]
            .as_array()
            .cloned()
            .unwrap_or_default();

        tracing::info!(
            query = %query,
            filter = filter.as_str(),
            results = results.len(),
            "Catalog search completed"
        );

        Ok(results)
    }
}

#[async_trait::async_trait]
impl Catalog for HttpCatalog {
    async fn search_songs(&self, query: &str, limit: u32) -> AppResult<Vec<Track>> {
        let raw = self.search_raw(query, SearchFilter::Songs, limit).await?;
        Ok(catalog::parse_tracks(&raw))
    }

    async fn search_albums(&self, query: &str, limit: u32) -> AppResult<Vec<AlbumResult>> {
        let raw = self.search_raw(query, SearchFilter::Albums, limit).await?;
        Ok(raw.iter().filter_map(catalog::parse_album_result).collect())
    }

    async fn search_artists(&self, query: &str, limit: u32) -> AppResult<Vec<ArtistResult>> {
        let raw = self.search_raw(query, SearchFilter::Artists, limit).await?;
        Ok(raw.iter().filter_map(catalog::parse_artist_result).collect())
    }

    async fn search_playlists(&self, query: &str, limit: u32) -> AppResult<Vec<PlaylistResult>> {
        let raw = self.search_raw(query, SearchFilter::Playlists, limit).await?;
        Ok(raw
            .iter()
            .filter_map(catalog::parse_playlist_result)
            .collect())
    }

    async fn search_videos(&self, query: &str, limit: u32) -> AppResult<Vec<VideoResult>> {
        let raw = self.search_raw(query, SearchFilter::Videos, limit).await?;
        Ok(raw.iter().filter_map(catalog::parse_video_result).collect())
    }

    async fn get_home(&self) -> AppResult<Vec<Shelf>> {
        let body = self.get_json("/home", &[]).await?;

        let shelves = body["shelves"]
            .as_array()
            .map(|shelves| {
                shelves
                    .iter()
                    .map(|shelf| Shelf {
                        title: shelf["title"].as_str().unwrap_or_default().to_string(),
                        contents: shelf["contents"]
                            .as_array()
                            .map(|items| catalog::parse_tracks(items))
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(shelves)
    }

    async fn get_watch_playlist(&self, track_id: &str) -> AppResult<Vec<Track>> {
        let body = self
            .get_json(&format!("/watch_playlist/{track_id}"), &[])
            .await?;
        let tracks = body["tracks"].as_array().cloned().unwrap_or_default();
        Ok(catalog::parse_tracks(&tracks))
    }

    async fn get_search_suggestions(&self, query: &str) -> AppResult<Vec<String>> {
        let body = self.get_json("/suggestions", &[("q", query)]).await?;
        Ok(body["suggestions"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_album(&self, browse_id: &str) -> AppResult<AlbumDetails> {
        let body = self.get_json(&format!("/albums/{browse_id}"), &[]).await?;
        catalog::parse_album_details(&body)
            .ok_or_else(|| AppError::ExternalApi("Invalid album response".to_string()))
    }

    async fn get_artist(&self, browse_id: &str) -> AppResult<ArtistDetails> {
        let body = self.get_json(&format!("/artists/{browse_id}"), &[]).await?;
        catalog::parse_artist_details(&body)
            .ok_or_else(|| AppError::ExternalApi("Invalid artist response".to_string()))
    }

    async fn get_playlist(&self, playlist_id: &str) -> AppResult<PlaylistDetails> {
        let body = self
            .get_json(&format!("/playlists/{playlist_id}"), &[])
            .await?;
        catalog::parse_playlist_details(&body)
            .ok_or_else(|| AppError::ExternalApi("Invalid playlist response".to_string()))
    }
}
