//! Recommendation engine: gathers candidates from every live source and
//! merges them into one deduplicated, prioritized feed.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::models::{PlayEvent, RecommendationSource, RecommendedTrack, SourceOutcome, Track};
use crate::services::providers::Catalog;

pub mod collaborative;
pub mod content;
pub mod trending;

const QUICK_PICKS_LIMIT: usize = 10;
const CONTENT_LIMIT: usize = 15;
const RECENT_RELATED_LIMIT: usize = 5;
const COLLABORATIVE_LIMIT: usize = 10;
const HOME_LIMIT: usize = 5;
const TRENDING_LIMIT: usize = 15;

/// Global cap on accepted recommendations across all sources
const ACCEPT_CAP: usize = 40;
/// Below this many accepted items, extra trending is pulled in
const TOPUP_TARGET: usize = 30;
/// Size of the extra trending pool used for the top-up
const TOPUP_POOL_LIMIT: usize = 40;
/// How many accepted recommendations are actually returned
const RETURN_CAP: usize = 20;

/// Home shelf holding quick picks
const QUICK_PICKS_SHELF: &str = "quick picks";
/// Home shelves that feed the `home` source
const HOME_SHELVES: [&str; 3] = ["Your favorites", "Recommended for you", "New releases"];

/// Everything the engine needs from the library, snapshotted before any
/// catalog call so no lock is held across awaits.
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub user_id: String,
    pub histories: HashMap<String, Vec<PlayEvent>>,
    /// Most recently played track, globally
    pub last_played: Option<Track>,
}

impl FeedSnapshot {
    fn user_history(&self) -> &[PlayEvent] {
        self.histories
            .get(&self.user_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// A merged feed plus its per-source accounting.
///
/// The breakdown covers the whole accepted pool (up to 40 items) while
/// `recommendations` carries only the first 20; the counts intentionally do
/// not sum to the returned list's length. Flagged for product sign-off, kept
/// as-is until then.
#[derive(Debug)]
pub struct Feed {
    pub recommendations: Vec<RecommendedTrack>,
    pub personalization_level: &'static str,
    pub breakdown: BTreeMap<RecommendationSource, usize>,
}

pub struct RecommendationEngine {
    catalog: Arc<dyn Catalog>,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// The full "Quick picks" home shelf (matched case-insensitively)
    pub async fn quick_picks(&self) -> SourceOutcome {
        match self.catalog.get_home().await {
            Ok(shelves) => {
                for shelf in shelves {
                    if shelf.title.to_lowercase() == QUICK_PICKS_SHELF {
                        return SourceOutcome::from_tracks(shelf.contents);
                    }
                }
                SourceOutcome::Empty
            }
            Err(e) => SourceOutcome::Failed(e),
        }
    }

    /// Curated home shelves (favorites, recommended, new releases)
    async fn home_source(&self) -> SourceOutcome {
        match self.catalog.get_home().await {
            Ok(shelves) => {
                let mut tracks = Vec::new();
                for shelf in shelves {
                    if HOME_SHELVES.contains(&shelf.title.as_str()) {
                        tracks.extend(shelf.contents);
                    }
                }
                SourceOutcome::from_tracks(tracks)
            }
            Err(e) => SourceOutcome::Failed(e),
        }
    }

    /// Autoplay continuations of the most recently played track
    async fn recent_related(&self, last_played: Option<&Track>) -> SourceOutcome {
        let Some(track) = last_played else {
            return SourceOutcome::Empty;
        };
        match self.catalog.get_watch_playlist(&track.id).await {
            Ok(mut tracks) => {
                tracks.truncate(RECENT_RELATED_LIMIT);
                SourceOutcome::from_tracks(tracks)
            }
            Err(e) => SourceOutcome::Failed(e),
        }
    }

    pub async fn trending(&self, limit: usize) -> Vec<Track> {
        trending::trending(self.catalog.as_ref(), limit).await
    }

    /// Builds the merged feed for one user.
    ///
    /// Sources are gathered, then merged in fixed priority order with
    /// first-source-wins dedup by track id. If the accepted pool is thin,
    /// extra trending tracks top it up under the `trending_fallback` tag.
    pub async fn build_feed(&self, snapshot: &FeedSnapshot) -> Feed {
        let catalog = self.catalog.as_ref();

        let quick_picks = self.quick_picks().await;
        let content =
            content::recommend(catalog, snapshot.user_history(), CONTENT_LIMIT).await;
        let recent = self.recent_related(snapshot.last_played.as_ref()).await;
        let collaborative =
            collaborative::recommend(&snapshot.user_id, &snapshot.histories, COLLABORATIVE_LIMIT);
        let home = self.home_source().await;
        let trending = self.trending(TRENDING_LIMIT).await;

        let mut quick_picks = quick_picks.into_tracks(RecommendationSource::QuickPicks);
        quick_picks.truncate(QUICK_PICKS_LIMIT);
        let mut home = home.into_tracks(RecommendationSource::Home);
        home.truncate(HOME_LIMIT);

        let sources = vec![
            (RecommendationSource::QuickPicks, quick_picks),
            (
                RecommendationSource::ContentBased,
                content.into_tracks(RecommendationSource::ContentBased),
            ),
            (
                RecommendationSource::Recent,
                recent.into_tracks(RecommendationSource::Recent),
            ),
            (
                RecommendationSource::Collaborative,
                collaborative.into_tracks(RecommendationSource::Collaborative),
            ),
            (RecommendationSource::Home, home),
            (RecommendationSource::Trending, trending),
        ];

        let (mut pool, mut seen) = merge_prioritized(sources);

        if pool.len() < TOPUP_TARGET {
            let extra = self.trending(TOPUP_POOL_LIMIT).await;
            top_up(&mut pool, &mut seen, extra);
        }

        let mut breakdown: BTreeMap<RecommendationSource, usize> =
            RecommendationSource::ALL.iter().map(|s| (*s, 0)).collect();
        for rec in &pool {
            *breakdown.entry(rec.recommendation_source).or_insert(0) += 1;
        }

        let personalization_level = if breakdown[&RecommendationSource::ContentBased] > 0
            || breakdown[&RecommendationSource::Collaborative] > 0
        {
            "high"
        } else {
            "low"
        };

        tracing::info!(
            user_id = %snapshot.user_id,
            accepted = pool.len(),
            personalization = personalization_level,
            "Recommendation feed built"
        );

        let mut recommendations = pool;
        recommendations.truncate(RETURN_CAP);

        Feed {
            recommendations,
            personalization_level,
            breakdown,
        }
    }
}

/// Merges source candidate lists in priority order.
///
/// A track id already accepted under a higher-priority source is silently
/// dropped, not re-tagged. Accumulation stops at [`ACCEPT_CAP`].
fn merge_prioritized(
    sources: Vec<(RecommendationSource, Vec<Track>)>,
) -> (Vec<RecommendedTrack>, HashSet<String>) {
    let mut pool = Vec::new();
    let mut seen = HashSet::new();

    'sources: for (source, tracks) in sources {
        for track in tracks {
            if seen.contains(&track.id) {
                continue;
            }
            seen.insert(track.id.clone());
            pool.push(RecommendedTrack {
                track,
                recommendation_source: source,
            });
            if pool.len() >= ACCEPT_CAP {
                break 'sources;
            }
        }
    }

    (pool, seen)
}

/// Adds extra trending tracks under the `trending_fallback` tag until the
/// pool reaches [`TOPUP_TARGET`] or the extras run out
fn top_up(pool: &mut Vec<RecommendedTrack>, seen: &mut HashSet<String>, extra: Vec<Track>) {
    for track in extra {
        if pool.len() >= TOPUP_TARGET {
            break;
        }
        if seen.contains(&track.id) {
            continue;
        }
        seen.insert(track.id.clone());
        pool.push(RecommendedTrack {
            track,
            recommendation_source: RecommendationSource::TrendingFallback,
        });
    }
}
