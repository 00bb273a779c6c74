//! Content-based filtering implementation
//!
//! Each item is described by a TF-IDF vector over its title, author and
//! genre, followed by its min-max scaled publication year and average
//! rating. Items are compared by cosine similarity of these vectors.

use crate::cache::ArtifactCache;
use crate::catalog::ItemCatalog;
use crate::ranking::top_n_indices;
use crate::similarity::{cosine_against_rows, SimilarityMatrix};
use crate::text::TfidfVectorizer;
use bookrec_core::{min_max_normalize, ItemId, RecommenderError, Result, ScoredItem};
use ndarray::{Array1, Array2, ArrayView1};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Score forced onto already-rated items so they sort last
const RATED_ITEM_SCORE: f64 = -1.0;

/// Item feature matrix and the content similarity derived from it
#[derive(Debug, Clone)]
pub struct ContentFeatures {
    /// [num_items x (vocabulary + 2)], rows in catalog order
    features: Array2<f64>,
    vocabulary_size: usize,
    similarity: SimilarityMatrix,
}

impl ContentFeatures {
    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    /// Feature vector of the item at a catalog position
    pub fn item_vector(&self, position: usize) -> ArrayView1<'_, f64> {
        self.features.row(position)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Total feature dimensionality, text terms plus the two numeric columns
    pub fn dimension(&self) -> usize {
        self.features.ncols()
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }
}

/// Content similarity engine over the item catalog
pub struct ContentEngine {
    catalog: Arc<ItemCatalog>,
    features: ArtifactCache<ContentFeatures>,
}

impl ContentEngine {
    pub fn new(catalog: Arc<ItemCatalog>) -> Self {
        Self {
            catalog,
            features: ArtifactCache::new(),
        }
    }

    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Build the feature matrix and content similarity, replacing the cache
    pub fn build_features(&self) -> Arc<ContentFeatures> {
        self.features.recompute(|| self.compute())
    }

    /// Cached features, built on first use
    pub fn features(&self) -> Arc<ContentFeatures> {
        self.features.get_or_compute(|| self.compute())
    }

    pub fn invalidate(&self) {
        self.features.invalidate();
    }

    /// Most similar items to `item_id`, the item itself excluded
    pub fn similar_items(&self, item_id: ItemId, top_n: usize) -> Result<Vec<ScoredItem>> {
        let position = self
            .catalog
            .position(item_id)
            .ok_or_else(|| RecommenderError::not_found("item", item_id))?;
        let features = self.features();

        let scores: Vec<f64> = features.similarity().row(position).to_vec();
        let ranked = top_n_indices(&scores, self.catalog.len())
            .into_iter()
            .filter(|&idx| idx != position)
            .take(top_n)
            .map(|idx| self.scored(idx, scores[idx]))
            .collect();

        debug!(item_id, top_n, "Content similar items");
        Ok(ranked)
    }

    /// Rank items against a profile built from a rating history.
    ///
    /// The profile is the mean of `feature_vector * rating` over the
    /// history. Rated items score `-1`. Entries for items outside the
    /// catalog are ignored; an empty history yields a zero profile and
    /// every unrated item scores `0`.
    pub fn recommend_from_history(
        &self,
        history: &[(ItemId, f64)],
        top_n: usize,
    ) -> Result<Vec<ScoredItem>> {
        let features = self.features();
        let mut profile = Array1::<f64>::zeros(features.dimension());
        let mut rated = vec![false; self.catalog.len()];
        let mut used = 0usize;

        for &(item_id, rating) in history {
            let Some(position) = self.catalog.position(item_id) else {
                debug!(item_id, "Ignoring history entry for item outside the catalog");
                continue;
            };
            profile.scaled_add(rating, &features.item_vector(position));
            rated[position] = true;
            used += 1;
        }
        if used > 0 {
            profile /= used as f64;
        }

        let mut scores = cosine_against_rows(profile.view(), features.features().view()).to_vec();
        for (score, &is_rated) in scores.iter_mut().zip(&rated) {
            if is_rated {
                *score = RATED_ITEM_SCORE;
            }
        }

        debug!(history = history.len(), used, top_n, "Content recommendation from history");
        Ok(top_n_indices(&scores, top_n)
            .into_iter()
            .map(|idx| self.scored(idx, scores[idx]))
            .collect())
    }

    fn scored(&self, position: usize, score: f64) -> ScoredItem {
        ScoredItem::new(self.catalog.items()[position].item_id, score)
    }

    fn compute(&self) -> ContentFeatures {
        let start = Instant::now();
        let items = self.catalog.items();

        let documents: Vec<String> = items.iter().map(|item| item.text_document()).collect();
        let (vectorizer, text_rows) = TfidfVectorizer::fit_transform(&documents);
        let vocabulary_size = vectorizer.vocabulary_size();

        let years: Vec<f64> = items.iter().map(|item| f64::from(item.year)).collect();
        let ratings: Vec<f64> = items.iter().map(|item| item.rating).collect();
        let years = min_max_normalize(&years);
        let ratings = min_max_normalize(&ratings);

        let dimension = vocabulary_size + 2;
        let mut features = Array2::<f64>::zeros((items.len(), dimension));
        for (row_idx, text_row) in text_rows.iter().enumerate() {
            let mut row = features.row_mut(row_idx);
            for (col, &value) in text_row.iter().enumerate() {
                row[col] = value;
            }
            row[vocabulary_size] = years[row_idx];
            row[vocabulary_size + 1] = ratings[row_idx];
        }

        let similarity = SimilarityMatrix::from_rows(features.view());
        info!(
            items = items.len(),
            vocabulary_size,
            "Built content features in {:?}",
            start.elapsed()
        );

        ContentFeatures {
            features,
            vocabulary_size,
            similarity,
        }
    }
}
