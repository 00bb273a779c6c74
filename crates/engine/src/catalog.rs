//! Item metadata catalog and summary statistics

use crate::rating_matrix::RatingMatrix;
use bookrec_core::validation::validate_catalog;
use bookrec_core::{ItemId, ItemMetadata, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// How many items [`CatalogStats::top_rated`] lists
pub const TOP_RATED_COUNT: usize = 3;

/// Item metadata in input order with id lookup
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: Vec<ItemMetadata>,
    positions: HashMap<ItemId, usize>,
}

impl ItemCatalog {
    /// Validate and index the items.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on a zero id, a non-finite average rating or a
    /// duplicate id.
    pub fn new(items: Vec<ItemMetadata>) -> Result<Self> {
        validate_catalog(&items)?;
        let positions = items
            .iter()
            .enumerate()
            .map(|(pos, item)| (item.item_id, pos))
            .collect();
        Ok(Self { items, positions })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, item_id: ItemId) -> Option<&ItemMetadata> {
        self.positions.get(&item_id).map(|&pos| &self.items[pos])
    }

    /// Position of an item in catalog order
    pub fn position(&self, item_id: ItemId) -> Option<usize> {
        self.positions.get(&item_id).copied()
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.positions.contains_key(&item_id)
    }

    /// Items in catalog order
    pub fn items(&self) -> &[ItemMetadata] {
        &self.items
    }

    /// Largest item id, `0` for an empty catalog
    pub fn max_item_id(&self) -> ItemId {
        self.items.iter().map(|item| item.item_id).max().unwrap_or(0)
    }
}

/// Item count for one genre
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Item ranked by the mean of its user ratings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedItem {
    pub item_id: ItemId,
    pub title: String,
    pub author: String,
    pub mean_rating: f64,
    pub rating_count: usize,
}

/// Catalog and rating-log summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total_items: usize,
    pub total_ratings: usize,
    pub total_users: usize,
    /// Mean over every rating in the log, `0` when empty
    pub average_rating: f64,
    /// Descending count, ties by genre name
    pub genre_counts: Vec<GenreCount>,
    pub top_rated: Vec<RatedItem>,
}

impl CatalogStats {
    pub fn compute(catalog: &ItemCatalog, ratings: &RatingMatrix) -> Self {
        let triples = ratings.triples();
        let total_ratings = triples.len();
        let average_rating = if total_ratings == 0 {
            0.0
        } else {
            triples.iter().map(|t| f64::from(t.rating)).sum::<f64>() / total_ratings as f64
        };

        let mut users: Vec<_> = triples.iter().map(|t| t.user_id).collect();
        users.sort_unstable();
        users.dedup();

        Self {
            total_items: catalog.len(),
            total_ratings,
            total_users: users.len(),
            average_rating,
            genre_counts: genre_counts(catalog),
            top_rated: top_rated(catalog, ratings, TOP_RATED_COUNT),
        }
    }
}

fn genre_counts(catalog: &ItemCatalog) -> Vec<GenreCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in catalog.items() {
        *counts.entry(item.genre.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<GenreCount> = counts
        .into_iter()
        .map(|(genre, count)| GenreCount {
            genre: genre.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genre.cmp(&b.genre)));
    counts
}

fn top_rated(catalog: &ItemCatalog, ratings: &RatingMatrix, limit: usize) -> Vec<RatedItem> {
    let mut totals: HashMap<ItemId, (f64, usize)> = HashMap::new();
    for triple in ratings.triples() {
        let entry = totals.entry(triple.item_id).or_insert((0.0, 0));
        entry.0 += f64::from(triple.rating);
        entry.1 += 1;
    }

    let mut means: Vec<(ItemId, f64, usize)> = totals
        .into_iter()
        .map(|(item_id, (sum, count))| (item_id, sum / count as f64, count))
        .collect();
    means.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    // Cut first, then skip entries without metadata
    means
        .into_iter()
        .take(limit)
        .filter_map(|(item_id, mean_rating, rating_count)| {
            catalog.get(item_id).map(|item| RatedItem {
                item_id,
                title: item.title.clone(),
                author: item.author.clone(),
                mean_rating,
                rating_count,
            })
        })
        .collect()
}
