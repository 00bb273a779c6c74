//! Cold Start Handling
//!
//! Popularity ranking for users without usable history. Items are ranked by
//! `mean_rating * ln(1 + rating_count)` over the raw rating log, keeping
//! only items with at least `min_ratings` ratings.

use crate::catalog::ItemCatalog;
use bookrec_core::{ItemId, PopularItem, RatingTriple};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Minimum number of ratings an item needs to be recommended
pub const DEFAULT_MIN_RATINGS: usize = 5;

/// Per-item aggregate of the rating log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemPopularity {
    pub item_id: ItemId,
    pub mean_rating: f64,
    pub rating_count: usize,
}

impl ItemPopularity {
    pub fn score(&self) -> f64 {
        popularity_score(self.mean_rating, self.rating_count)
    }
}

pub fn popularity_score(mean_rating: f64, rating_count: usize) -> f64 {
    mean_rating * (rating_count as f64).ln_1p()
}

/// Popularity ranker over the raw rating log
#[derive(Debug, Clone, Copy)]
pub struct ColdStartRanker {
    min_ratings: usize,
}

impl Default for ColdStartRanker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_RATINGS)
    }
}

impl ColdStartRanker {
    pub fn new(min_ratings: usize) -> Self {
        Self { min_ratings }
    }

    pub fn min_ratings(&self) -> usize {
        self.min_ratings
    }

    /// Eligible items, best first; ties broken by ascending item id
    pub fn rank(&self, ratings: &[RatingTriple]) -> Vec<ItemPopularity> {
        let mut totals: HashMap<ItemId, (f64, usize)> = HashMap::new();
        for triple in ratings {
            let entry = totals.entry(triple.item_id).or_insert((0.0, 0));
            entry.0 += f64::from(triple.rating);
            entry.1 += 1;
        }

        let mut eligible: Vec<ItemPopularity> = totals
            .into_iter()
            .filter(|(_, (_, count))| *count >= self.min_ratings)
            .map(|(item_id, (sum, count))| ItemPopularity {
                item_id,
                mean_rating: sum / count as f64,
                rating_count: count,
            })
            .collect();

        eligible.sort_by(|a, b| {
            b.score()
                .partial_cmp(&a.score())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        eligible
    }

    /// Top-N popular items enriched with catalog metadata.
    ///
    /// Items missing from the catalog are dropped after ranking.
    pub fn recommend(
        &self,
        ratings: &[RatingTriple],
        catalog: &ItemCatalog,
        top_n: usize,
    ) -> Vec<PopularItem> {
        let ranked = self.rank(ratings);
        let eligible = ranked.len();

        let popular: Vec<PopularItem> = ranked
            .into_iter()
            .take(top_n)
            .filter_map(|entry| match catalog.get(entry.item_id) {
                Some(item) => Some(PopularItem {
                    item_id: item.item_id,
                    title: item.title.clone(),
                    author: item.author.clone(),
                    genre: item.genre.clone(),
                    mean_rating: entry.mean_rating,
                    rating_count: entry.rating_count,
                    popularity_score: entry.score(),
                }),
                None => {
                    debug!(item_id = entry.item_id, "Skipping popular item without metadata");
                    None
                }
            })
            .collect();

        debug!(
            eligible,
            returned = popular.len(),
            min_ratings = self.min_ratings,
            "Cold start ranking"
        );
        popular
    }
}
