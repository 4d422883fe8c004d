//! Content-based recommendation engine.
//!
//! A user's score for every article is the mean similarity between that
//! article and each article in the user's history. Without history, the
//! corpus-wide mean similarity acts as a baseline, but only when a search
//! query gives a reason to recommend at all. Articles whose title or body
//! contains the query get a fixed additive boost.

pub mod metrics;


use std::collections::HashSet;
use std::sync::Arc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::index::ContentIndex;
use crate::interactions::InteractionLog;

pub use metrics::{CallCounters, CallCounts, MetricsSink, NoopMetrics, Outcome};

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_QUERY_BOOST: f32 = 0.1;

/// Tunables for the recommendation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendConfig {
    /// Number of results when the caller does not ask for a specific count
    pub default_limit: usize,
    /// Added once to the score of every article matching the search query
    pub query_boost: f32,
    /// Leave articles the user has already read out of the results
    pub exclude_history: bool,
}

impl Default for RecommendConfig {
    #[inline]
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            query_boost: DEFAULT_QUERY_BOOST,
            exclude_history: false,
        }
    }
}

/// A recommended article with the score it was ranked by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub id: String,
    pub score: f32,
}

/// Ranks articles for users against a shared [`ContentIndex`].
///
/// Calls take `&self` and never mutate the index, so one recommender can
/// serve many threads at once.
#[derive(Clone)]
pub struct Recommender {
    index: Arc<ContentIndex>,
    config: RecommendConfig,
    metrics: Arc<dyn MetricsSink>,
}

impl std::fmt::Debug for Recommender {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("articles", &self.index.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Recommender {
    #[inline]
    pub fn new(index: Arc<ContentIndex>, config: RecommendConfig) -> Self {
        Self {
            index,
            config,
            metrics: Arc::new(NoopMetrics),
        }
    }

    /// Report every call outcome to `metrics`
    #[must_use]
    #[inline]
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    #[inline]
    pub fn index(&self) -> &ContentIndex {
        &self.index
    }

    #[inline]
    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Recommend up to `limit` article ids for `user_id`, best first.
    ///
    /// Uses the configured default limit when `limit` is `None`. An empty
    /// result is a normal outcome, never an error.
    #[inline]
    pub fn recommend(
        &self,
        user_id: &str,
        log: &InteractionLog,
        limit: Option<usize>,
        search_query: Option<&str>,
    ) -> Vec<String> {
        self.recommend_scored(user_id, log, limit, search_query)
            .into_iter()
            .map(|scored| scored.id)
            .collect()
    }

    /// Same as [`Recommender::recommend`] but keeps the final scores
    #[inline]
    pub fn recommend_scored(
        &self,
        user_id: &str,
        log: &InteractionLog,
        limit: Option<usize>,
        search_query: Option<&str>,
    ) -> Vec<ScoredArticle> {
        let limit = limit.unwrap_or(self.config.default_limit);
        let query = search_query
            .filter(|query| !query.is_empty())
            .map(str::to_lowercase);

        if limit == 0 || self.index.is_empty() {
            self.metrics.record(Outcome::Unavailable);
            return Vec::new();
        }

        let identifiers = self.index.identifiers();
        let similarity = self.index.similarity();

        // Interactions with articles outside the corpus are dropped here
        let history: Vec<usize> = log
            .history_of(user_id)
            .filter_map(|news_id| identifiers.position_of(news_id))
            .collect();

        let mut scores = if !history.is_empty() {
            similarity.mean_of_rows(&history)
        } else if query.is_some() {
            similarity.column_means()
        } else {
            debug!("No history or query for user {}, nothing to recommend", user_id);
            self.metrics.record(Outcome::NoSignal);
            return Vec::new();
        };

        let mut query_matches = 0;
        if let Some(query) = &query {
            for position in self.index.corpus().positions_mentioning(query) {
                scores[position] += self.config.query_boost;
                query_matches += 1;
            }
        }

        let excluded: HashSet<usize> = if self.config.exclude_history {
            history.iter().copied().collect()
        } else {
            HashSet::new()
        };

        let rank_key = |position: usize| {
            let score = scores[position];
            if score.is_nan() { f32::NEG_INFINITY } else { score }
        };

        // Stable sort: equal scores keep corpus order
        let results: Vec<ScoredArticle> = (0..scores.len())
            .filter(|position| !excluded.contains(position))
            .sorted_by(|&a, &b| rank_key(b).total_cmp(&rank_key(a)))
            .take(limit)
            .filter_map(|position| {
                identifiers.identifier_at(position).map(|id| ScoredArticle {
                    id: id.to_string(),
                    score: scores[position],
                })
            })
            .collect();

        debug!(
            "Recommended {} articles for user {} ({} history entries, {} query matches)",
            results.len(),
            user_id,
            history.len(),
            query_matches
        );

        self.metrics.record(Outcome::Recommended {
            count: results.len(),
            query_matches,
        });

        results
    }
}
