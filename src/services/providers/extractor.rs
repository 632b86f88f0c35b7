//! HTTP gateway to the media extraction service.
//!
//! The extractor exposes yt-dlp-style metadata: a best-match stream plus a
//! full format table. Metadata is frequently partial, so everything funnels
//! through `MediaFormat`/`MediaInfo`, where absent fields default.

use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{FormatInventory, MediaFormat, MediaInfo, StreamInfo};
use crate::services::providers::StreamResolver;

/// Public watch page for a track; used as a last-resort playable URL
pub fn watch_url(track_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={track_id}")
}

#[derive(Clone)]
pub struct ExtractorResolver {
    http_client: HttpClient,
    api_url: String,
}

#[derive(Debug, Deserialize, Default)]
struct RawExtraction {
    #[serde(flatten)]
    format: MediaFormat,
    #[serde(flatten)]
    media: MediaInfo,
    #[serde(default)]
    formats: Vec<MediaFormat>,
}

impl ExtractorResolver {
    pub fn new(api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
        }
    }

    async fn extract(&self, track_id: &str, query: &[(&str, &str)]) -> AppResult<RawExtraction> {
        let url = format!("{}/extract/{}", self.api_url, track_id);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Extractor returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn into_stream_info(raw: RawExtraction) -> AppResult<StreamInfo> {
        // Prefer the extractor's best-match URL, then fall back to the first
        // format that carries one.
        if let Some(url) = raw.format.url.clone() {
            return Ok(StreamInfo {
                stream_url: url,
                format_info: Some(raw.format),
                media_info: raw.media,
                note: None,
            });
        }

        for format in raw.formats {
            if let Some(url) = format.url.clone() {
                return Ok(StreamInfo {
                    stream_url: url,
                    format_info: Some(format),
                    media_info: raw.media,
                    note: None,
                });
            }
        }

        Err(AppError::ExternalApi("No stream URL found".to_string()))
    }
}

#[async_trait::async_trait]
impl StreamResolver for ExtractorResolver {
    async fn resolve(&self, track_id: &str, audio_only: bool) -> AppResult<StreamInfo> {
        let selector = if audio_only { "bestaudio" } else { "best" };
        let raw = self.extract(track_id, &[("format", selector)]).await?;

        let info = Self::into_stream_info(raw)?;
        tracing::info!(
            track_id = %track_id,
            audio_only,
            "Stream URL resolved"
        );
        Ok(info)
    }

    async fn formats(&self, track_id: &str) -> AppResult<FormatInventory> {
        let raw = self.extract(track_id, &[("list_formats", "true")]).await?;
        let count = raw.formats.len();
        let inventory = FormatInventory::categorize(raw.formats);

        tracing::info!(track_id = %track_id, formats = count, "Format table fetched");
        Ok(inventory)
    }

    async fn resolve_format(&self, track_id: &str, format_id: &str) -> AppResult<StreamInfo> {
        let raw = self.extract(track_id, &[("format", format_id)]).await?;
        Self::into_stream_info(raw)
    }
}
