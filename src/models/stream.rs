//! Shapes returned by the media extraction service.
//!
//! Extractor metadata is best-effort: codecs, bitrates and sizes may all be
//! absent depending on the upstream format table, so every field is optional
//! and quality ordering works off whatever is present.

use serde::{Deserialize, Serialize};

/// Basic metadata about the media behind a stream URL
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MediaInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub view_count: Option<u64>,
}

/// One playable format candidate reported by the extractor
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MediaFormat {
    #[serde(default)]
    pub format_id: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub quality: Option<f64>,
    #[serde(default)]
    pub tbr: Option<f64>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub acodec: Option<String>,
    #[serde(default)]
    pub abr: Option<f64>,
    #[serde(default)]
    pub asr: Option<u32>,
    #[serde(default)]
    pub vcodec: Option<String>,
    #[serde(default)]
    pub vbr: Option<f64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
}

impl MediaFormat {
    fn has_audio(&self) -> bool {
        self.acodec.as_deref().is_some_and(|c| c != "none")
    }

    fn has_video(&self) -> bool {
        self.vcodec.as_deref().is_some_and(|c| c != "none")
    }

    fn audio_rate(&self) -> f64 {
        self.abr.or(self.tbr).unwrap_or(0.0)
    }

    fn video_rate(&self) -> f64 {
        self.vbr.or(self.tbr).unwrap_or(0.0)
    }
}

/// Recommended picks per category (best available first entry of each)
#[derive(Debug, Clone, Serialize, Default)]
pub struct RecommendedFormats {
    pub best_audio: Option<MediaFormat>,
    pub best_video: Option<MediaFormat>,
    pub best_combined: Option<MediaFormat>,
}

/// Extractor format table, categorized and sorted by quality
#[derive(Debug, Clone, Serialize, Default)]
pub struct FormatInventory {
    pub audio_only: Vec<MediaFormat>,
    pub video_only: Vec<MediaFormat>,
    pub combined: Vec<MediaFormat>,
    pub recommended: RecommendedFormats,
}

impl FormatInventory {
    /// Splits a raw format table into audio-only / video-only / combined
    /// groups, each sorted best-first.
    pub fn categorize(formats: Vec<MediaFormat>) -> Self {
        let mut audio_only = Vec::new();
        let mut video_only = Vec::new();
        let mut combined = Vec::new();

        for fmt in formats {
            match (fmt.has_audio(), fmt.has_video()) {
                (true, false) => audio_only.push(fmt),
                (false, true) => video_only.push(fmt),
                (true, true) => combined.push(fmt),
                (false, false) => {}
            }
        }

        audio_only.sort_by(|a, b| {
            b.audio_rate()
                .partial_cmp(&a.audio_rate())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        video_only.sort_by(|a, b| {
            (b.height.unwrap_or(0), b.video_rate())
                .partial_cmp(&(a.height.unwrap_or(0), a.video_rate()))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        combined.sort_by(|a, b| {
            (b.height.unwrap_or(0), b.tbr.unwrap_or(0.0))
                .partial_cmp(&(a.height.unwrap_or(0), a.tbr.unwrap_or(0.0)))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let recommended = RecommendedFormats {
            best_audio: audio_only.first().cloned(),
            best_video: video_only.first().cloned(),
            best_combined: combined.first().cloned(),
        };

        Self {
            audio_only,
            video_only,
            combined,
            recommended,
        }
    }
}

/// Resolved stream for a track
#[derive(Debug, Clone, Serialize)]
pub struct StreamInfo {
    pub stream_url: String,
    pub format_info: Option<MediaFormat>,
    pub media_info: MediaInfo,
    /// Set when the resolver fell back to the public watch URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(acodec: Option<&str>, vcodec: Option<&str>) -> MediaFormat {
        MediaFormat {
            acodec: acodec.map(String::from),
            vcodec: vcodec.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_categorize_splits_by_codec_presence() {
        let formats = vec![
            fmt(Some("opus"), Some("none")),
            fmt(Some("none"), Some("vp9")),
            fmt(Some("aac"), Some("h264")),
            fmt(Some("none"), Some("none")),
        ];
        let inventory = FormatInventory::categorize(formats);
        assert_eq!(inventory.audio_only.len(), 1);
        assert_eq!(inventory.video_only.len(), 1);
        assert_eq!(inventory.combined.len(), 1);
    }

    #[test]
    fn test_audio_sorted_by_bitrate_descending() {
        let mut low = fmt(Some("opus"), None);
        low.abr = Some(64.0);
        let mut high = fmt(Some("opus"), None);
        high.abr = Some(160.0);
        // Bitrate missing entirely: falls back to tbr, then zero.
        let mut tbr_only = fmt(Some("aac"), None);
        tbr_only.tbr = Some(128.0);

        let inventory = FormatInventory::categorize(vec![low, tbr_only, high]);
        let rates: Vec<f64> = inventory.audio_only.iter().map(|f| f.audio_rate()).collect();
        assert_eq!(rates, vec![160.0, 128.0, 64.0]);
        assert_eq!(inventory.recommended.best_audio.unwrap().abr, Some(160.0));
    }

    #[test]
    fn test_video_sorted_by_height_then_rate() {
        let mut hd = fmt(None, Some("vp9"));
        hd.height = Some(1080);
        let mut sd_fast = fmt(None, Some("vp9"));
        sd_fast.height = Some(480);
        sd_fast.vbr = Some(900.0);
        let mut sd_slow = fmt(None, Some("vp9"));
        sd_slow.height = Some(480);
        sd_slow.vbr = Some(400.0);

        let inventory = FormatInventory::categorize(vec![sd_slow, hd, sd_fast]);
        let heights: Vec<u32> = inventory
            .video_only
            .iter()
            .map(|f| f.height.unwrap())
            .collect();
        assert_eq!(heights, vec![1080, 480, 480]);
        assert_eq!(inventory.video_only[1].vbr, Some(900.0));
    }
}
