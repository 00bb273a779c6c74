//! Neighborhood-based collaborative filtering
//!
//! Predicts a user's rating of an unseen item from the ratings of similar
//! users (user-based) or from the user's own ratings of similar items
//! (item-based). Similarity is cosine over rating-matrix rows/columns and
//! is cached per engine until explicitly recomputed.

use crate::cache::ArtifactCache;
use crate::rating_matrix::RatingMatrix;
use crate::ranking::rank_columns;
use crate::similarity::SimilarityMatrix;
use bookrec_core::{CosineVariant, Result, ScoredItem, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Which neighborhood a prediction is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborhoodMode {
    UserBased,
    ItemBased,
}

/// User-user and item-item cosine neighborhood engine
pub struct NeighborhoodEngine {
    matrix: Arc<RatingMatrix>,
    variant: CosineVariant,
    user_similarity: ArtifactCache<SimilarityMatrix>,
    item_similarity: ArtifactCache<SimilarityMatrix>,
}

impl NeighborhoodEngine {
    pub fn new(matrix: Arc<RatingMatrix>) -> Self {
        Self {
            matrix,
            variant: CosineVariant::default(),
            user_similarity: ArtifactCache::new(),
            item_similarity: ArtifactCache::new(),
        }
    }

    /// Select the cosine variant. Cached similarities are dropped.
    pub fn with_variant(mut self, variant: CosineVariant) -> Self {
        self.variant = variant;
        self.invalidate();
        self
    }

    pub fn variant(&self) -> CosineVariant {
        self.variant
    }

    pub fn matrix(&self) -> &Arc<RatingMatrix> {
        &self.matrix
    }

    /// Recompute user-user similarity and replace the cached matrix
    pub fn compute_user_similarity(&self) -> Arc<SimilarityMatrix> {
        self.user_similarity
            .recompute(|| self.build_similarity(NeighborhoodMode::UserBased))
    }

    /// Recompute item-item similarity and replace the cached matrix
    pub fn compute_item_similarity(&self) -> Arc<SimilarityMatrix> {
        self.item_similarity
            .recompute(|| self.build_similarity(NeighborhoodMode::ItemBased))
    }

    /// Cached user-user similarity, computed on first use
    pub fn user_similarity(&self) -> Arc<SimilarityMatrix> {
        self.user_similarity
            .get_or_compute(|| self.build_similarity(NeighborhoodMode::UserBased))
    }

    /// Cached item-item similarity, computed on first use
    pub fn item_similarity(&self) -> Arc<SimilarityMatrix> {
        self.item_similarity
            .get_or_compute(|| self.build_similarity(NeighborhoodMode::ItemBased))
    }

    /// Drop both cached similarity matrices
    pub fn invalidate(&self) {
        self.user_similarity.invalidate();
        self.item_similarity.invalidate();
    }

    pub fn predict(
        &self,
        mode: NeighborhoodMode,
        user_id: UserId,
        top_n: usize,
    ) -> Result<Vec<ScoredItem>> {
        match mode {
            NeighborhoodMode::UserBased => self.predict_user_based(user_id, top_n),
            NeighborhoodMode::ItemBased => self.predict_item_based(user_id, top_n),
        }
    }

    /// Predict unseen items from the ratings of similar users.
    ///
    /// For each item the user has not rated:
    /// `Σ sim(user, u) · r(u, item) / Σ |sim(user, u)|` over the other users
    /// that rated the item, `0` when no neighbor carries weight. Items the
    /// user already rated score `0`.
    pub fn predict_user_based(&self, user_id: UserId, top_n: usize) -> Result<Vec<ScoredItem>> {
        let user_idx = self.matrix.user_index(user_id)?;
        let similarity = self.user_similarity();
        let mask = self.matrix.observed_mask();
        let ratings = self.matrix.values();
        let neighbors = similarity.row(user_idx);

        let mut predicted = vec![0.0; self.matrix.n_items()];
        for (item_idx, score) in predicted.iter_mut().enumerate() {
            if mask.is_observed(user_idx, item_idx) {
                continue;
            }

            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for other_idx in mask.observed_users(item_idx) {
                if other_idx == user_idx {
                    continue;
                }
                let sim = neighbors[other_idx];
                numerator += sim * ratings[[other_idx, item_idx]];
                denominator += sim.abs();
            }

            if denominator > 0.0 {
                *score = numerator / denominator;
            }
        }

        debug!(user_id, top_n, "User-based neighborhood prediction");
        Ok(rank_columns(&predicted, top_n))
    }

    /// Predict unseen items from the user's own ratings of similar items.
    ///
    /// For each item the user has not rated:
    /// `Σ sim(item, r) · r(user, r) / Σ |sim(item, r)|` over the items `r`
    /// the user rated.
    pub fn predict_item_based(&self, user_id: UserId, top_n: usize) -> Result<Vec<ScoredItem>> {
        let user_idx = self.matrix.user_index(user_id)?;
        let similarity = self.item_similarity();
        let mask = self.matrix.observed_mask();
        let user_ratings = self.matrix.row_view(user_idx);
        let rated_items = mask.observed_items(user_idx);

        let mut predicted = vec![0.0; self.matrix.n_items()];
        for (item_idx, score) in predicted.iter_mut().enumerate() {
            if mask.is_observed(user_idx, item_idx) {
                continue;
            }

            let mut numerator = 0.0;
            let mut denominator = 0.0;
            for &rated_idx in &rated_items {
                let sim = similarity.get(item_idx, rated_idx);
                numerator += sim * user_ratings[rated_idx];
                denominator += sim.abs();
            }

            if denominator > 0.0 {
                *score = numerator / denominator;
            }
        }

        debug!(user_id, top_n, rated = rated_items.len(), "Item-based neighborhood prediction");
        Ok(rank_columns(&predicted, top_n))
    }

    fn build_similarity(&self, mode: NeighborhoodMode) -> SimilarityMatrix {
        let start = Instant::now();
        let values = self.matrix.values();

        let similarity = match (mode, self.variant) {
            (NeighborhoodMode::UserBased, CosineVariant::Dense) => {
                SimilarityMatrix::from_rows(values.view())
            }
            (NeighborhoodMode::ItemBased, CosineVariant::Dense) => {
                SimilarityMatrix::from_rows(values.t())
            }
            (NeighborhoodMode::UserBased, CosineVariant::CoRated) => {
                let observed = self.matrix.observed_mask().to_array();
                SimilarityMatrix::from_co_rated_rows(values.view(), observed.view())
            }
            (NeighborhoodMode::ItemBased, CosineVariant::CoRated) => {
                let observed = self.matrix.observed_mask().to_array();
                SimilarityMatrix::from_co_rated_rows(values.t(), observed.t())
            }
        };

        debug!(
            mode = ?mode,
            variant = ?self.variant,
            size = similarity.size(),
            "Computed neighborhood similarity in {:?}",
            start.elapsed()
        );

        similarity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrec_core::RatingTriple;

    fn example_engine() -> NeighborhoodEngine {
        let matrix = RatingMatrix::from_triples(
            [(1, 1, 5), (1, 2, 3), (2, 1, 4), (2, 3, 5), (3, 2, 2), (3, 4, 4)]
                .into_iter()
                .map(RatingTriple::from),
        )
        .unwrap();
        NeighborhoodEngine::new(Arc::new(matrix))
    }

    #[test]
    fn test_user_based_example_scenario() {
        let engine = example_engine();
        let result = engine.predict_user_based(3, 1).unwrap();

        // Only user 1 has any similarity to user 3 and rated item 1 with a 5,
        // so the weighted average collapses to 5.
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item_id, 1);

        let sim_31 = 6.0 / (20.0f64.sqrt() * 34.0f64.sqrt());
        let sim_32 = 0.0;
        let expected = (sim_31 * 5.0 + sim_32 * 4.0) / (sim_31 + sim_32);
        assert!((result[0].score - expected).abs() < 1e-9);
    }

    #[test]
    fn test_user_based_rated_items_score_zero() {
        let engine = example_engine();
        let result = engine.predict_user_based(3, 4).unwrap();

        assert_eq!(result.len(), 4);
        let rated: Vec<_> = result
            .iter()
            .filter(|s| s.item_id == 2 || s.item_id == 4)
            .collect();
        assert!(rated.iter().all(|s| s.score == 0.0));
    }

    #[test]
    fn test_item_based_prediction() {
        let engine = example_engine();
        let result = engine.predict_item_based(1, 2).unwrap();

        // user 1 rated items 1 and 2; item 3 is similar to item 1 only,
        // item 4 is similar to item 2 only.
        assert_eq!(result.len(), 2);
        let by_id = |id| result.iter().find(|s| s.item_id == id).unwrap().score;
        assert!((by_id(3) - 5.0).abs() < 1e-9);
        assert!((by_id(4) - 3.0).abs() < 1e-9);
        assert_eq!(result[0].item_id, 3);
    }

    #[test]
    fn test_unknown_user_is_not_found() {
        let engine = example_engine();
        assert!(engine.predict_user_based(4, 3).unwrap_err().is_not_found());
        assert!(engine.predict_item_based(0, 3).unwrap_err().is_not_found());
    }

    #[test]
    fn test_similarity_cached_until_invalidated() {
        let engine = example_engine();
        let first = engine.user_similarity();
        let second = engine.user_similarity();
        assert!(Arc::ptr_eq(&first, &second));

        let recomputed = engine.compute_user_similarity();
        assert!(!Arc::ptr_eq(&first, &recomputed));
        assert_eq!(*first, *recomputed);

        engine.invalidate();
        assert!(!Arc::ptr_eq(&recomputed, &engine.user_similarity()));
    }

    #[test]
    fn test_similarity_matrices_symmetric() {
        let engine = example_engine();
        for sim in [engine.user_similarity(), engine.item_similarity()] {
            for i in 0..sim.size() {
                assert_eq!(sim.get(i, i), 1.0);
                for j in 0..sim.size() {
                    assert!((sim.get(i, j) - sim.get(j, i)).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_co_rated_variant_changes_similarity() {
        let dense = example_engine();
        let co_rated = example_engine().with_variant(CosineVariant::CoRated);

        // users 1 and 2 share only item 1, so co-rated cosine is exactly 1
        assert!(dense.user_similarity().get(0, 1) < 1.0);
        assert!((co_rated.user_similarity().get(0, 1) - 1.0).abs() < 1e-12);
        assert_eq!(co_rated.variant(), CosineVariant::CoRated);
    }
}
