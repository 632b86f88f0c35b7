use serde::{Deserialize, Serialize};

use super::Track;
use crate::error::AppError;

/// Where a merged recommendation came from.
///
/// Assigned only at merge time; a track accepted under one source is never
/// re-tagged when a lower-priority source offers it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSource {
    QuickPicks,
    ContentBased,
    Recent,
    Collaborative,
    Home,
    Trending,
    TrendingFallback,
}

impl RecommendationSource {
    /// All source tags, in merge priority order (fallback last)
    pub const ALL: [RecommendationSource; 7] = [
        RecommendationSource::QuickPicks,
        RecommendationSource::ContentBased,
        RecommendationSource::Recent,
        RecommendationSource::Collaborative,
        RecommendationSource::Home,
        RecommendationSource::Trending,
        RecommendationSource::TrendingFallback,
    ];
}

/// A track tagged with the source that contributed it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendedTrack {
    #[serde(flatten)]
    pub track: Track,
    pub recommendation_source: RecommendationSource,
}

/// Outcome of a single recommendation source.
///
/// Distinguishes "source had nothing" from "source failed" so the merger can
/// log failures, while still degrading both to an empty contribution.
#[derive(Debug)]
pub enum SourceOutcome {
    Filled(Vec<Track>),
    Empty,
    Failed(AppError),
}

impl SourceOutcome {
    /// Wraps a candidate list, normalizing an empty one to `Empty`
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        if tracks.is_empty() {
            SourceOutcome::Empty
        } else {
            SourceOutcome::Filled(tracks)
        }
    }

    /// Candidate tracks, treating both `Empty` and `Failed` as none
    pub fn into_tracks(self, source: RecommendationSource) -> Vec<Track> {
        match self {
            SourceOutcome::Filled(tracks) => tracks,
            SourceOutcome::Empty => Vec::new(),
            SourceOutcome::Failed(err) => {
                tracing::warn!(source = ?source, error = %err, "Recommendation source failed, degrading to empty");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_snake_case() {
        let json = serde_json::to_string(&RecommendationSource::QuickPicks).unwrap();
        assert_eq!(json, "\"quick_picks\"");
        let json = serde_json::to_string(&RecommendationSource::TrendingFallback).unwrap();
        assert_eq!(json, "\"trending_fallback\"");
    }

    #[test]
    fn test_outcome_normalizes_empty_list() {
        assert!(matches!(
            SourceOutcome::from_tracks(vec![]),
            SourceOutcome::Empty
        ));
    }

    #[test]
    fn test_failed_outcome_degrades_to_no_tracks() {
        let outcome = SourceOutcome::Failed(AppError::ExternalApi("catalog down".into()));
        assert!(outcome
            .into_tracks(RecommendationSource::ContentBased)
            .is_empty());
    }
}
