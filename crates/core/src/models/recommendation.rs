//! Output records produced by the engines
//!
//! All of these are created fresh per request and never persisted.

use super::item::ItemMetadata;
use super::rating::ItemId;
use serde::{Deserialize, Serialize};

/// An item with the score assigned by a single engine.
///
/// Score semantics depend on the producer: predicted rating for the
/// neighborhood engine, reconstructed rating for factorization, cosine
/// similarity for the content engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item_id: ItemId,
    pub score: f64,
}

impl ScoredItem {
    pub fn new(item_id: ItemId, score: f64) -> Self {
        Self { item_id, score }
    }
}

/// Which candidate list contributed to a hybrid score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Collaborative,
    ContentBased,
    /// Uniform-score fallback used when the user has no rating history
    ContentFallback,
}

/// Hybrid recommendation enriched with catalog metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub score: f64,
    pub sources: Vec<CandidateSource>,
}

impl Recommendation {
    pub fn from_metadata(item: &ItemMetadata, score: f64, sources: Vec<CandidateSource>) -> Self {
        Self {
            item_id: item.item_id,
            title: item.title.clone(),
            author: item.author.clone(),
            genre: item.genre.clone(),
            score,
            sources,
        }
    }
}

/// Cold-start recommendation ranked by aggregate popularity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularItem {
    pub item_id: ItemId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub mean_rating: f64,
    pub rating_count: usize,
    /// `mean_rating * ln(1 + rating_count)`
    pub popularity_score: f64,
}
