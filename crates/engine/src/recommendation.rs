//! Hybrid Recommendation Engine
//!
//! Blends factorization (collaborative) and content-based candidates with a
//! weight `alpha`, then enriches the best ones with catalog metadata. Also
//! hosts the popularity fallback for cold-start users.

use crate::catalog::ItemCatalog;
use crate::cold_start::ColdStartRanker;
use crate::content_based::ContentEngine;
use crate::matrix_factorization::FactorizationEngine;
use crate::ranking::column_to_item_id;
use crate::rating_matrix::RatingMatrix;
use bookrec_core::validation::validate_alpha;
use bookrec_core::{
    CandidateSource, ItemId, PopularItem, Recommendation, Result, ScoredItem, UserId,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Blend weight used when the caller does not choose one
pub const DEFAULT_ALPHA: f64 = 0.5;

/// Each engine contributes this many candidates per requested result
const CANDIDATE_MULTIPLIER: usize = 2;

/// Score given to every no-history fallback candidate
const FALLBACK_SCORE: f64 = 1.0;

/// A candidate after merging both lists
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub item_id: ItemId,
    pub score: f64,
    pub sources: Vec<CandidateSource>,
}

/// Weighted fusion of collaborative and content-based candidates
pub struct HybridCombiner {
    matrix: Arc<RatingMatrix>,
    catalog: Arc<ItemCatalog>,
    factorization: Arc<FactorizationEngine>,
    content: Arc<ContentEngine>,
    cold_start: ColdStartRanker,
}

impl HybridCombiner {
    pub fn new(
        matrix: Arc<RatingMatrix>,
        catalog: Arc<ItemCatalog>,
        factorization: Arc<FactorizationEngine>,
        content: Arc<ContentEngine>,
    ) -> Self {
        Self {
            matrix,
            catalog,
            factorization,
            content,
            cold_start: ColdStartRanker::default(),
        }
    }

    pub fn with_cold_start(mut self, cold_start: ColdStartRanker) -> Self {
        self.cold_start = cold_start;
        self
    }

    /// Hybrid top-N for a user.
    ///
    /// Collaborative candidates come from the factorization engine. Content
    /// candidates come from the user's rating history, or from the lowest
    /// item ids (matrix columns) with a uniform score when there is none.
    /// An item in both lists scores `alpha * cf + (1 - alpha) * cbf`; an
    /// item in one list gets only that weighted term. Candidates without
    /// catalog metadata are dropped after the top-N cut, so fewer than
    /// `top_n` results may come back.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `alpha` is outside `[0, 1]`, `NotFound` if the user
    /// has no row in the rating matrix.
    pub fn recommend(
        &self,
        user_id: UserId,
        top_n: usize,
        alpha: f64,
    ) -> Result<Vec<Recommendation>> {
        validate_alpha(alpha)?;
        let pool = top_n.saturating_mul(CANDIDATE_MULTIPLIER);

        let cf_candidates = self.factorization.predict(user_id, pool)?;

        let history = self.matrix.user_history(user_id);
        let (cbf_candidates, cbf_source) = if history.is_empty() {
            let fallback = (0..pool.min(self.matrix.n_items()))
                .map(|column| ScoredItem::new(column_to_item_id(column), FALLBACK_SCORE))
                .collect();
            (fallback, CandidateSource::ContentFallback)
        } else {
            (
                self.content.recommend_from_history(&history, pool)?,
                CandidateSource::ContentBased,
            )
        };

        let mut merged = merge_candidates(&cf_candidates, &cbf_candidates, cbf_source, alpha);
        merged.truncate(top_n);

        let recommendations: Vec<Recommendation> = merged
            .into_iter()
            .filter_map(|candidate| match self.catalog.get(candidate.item_id) {
                Some(item) => Some(Recommendation::from_metadata(
                    item,
                    candidate.score,
                    candidate.sources,
                )),
                None => {
                    debug!(item_id = candidate.item_id, "Skipping candidate without metadata");
                    None
                }
            })
            .collect();

        debug!(
            user_id,
            top_n,
            alpha,
            history = history.len(),
            cf_candidates = cf_candidates.len(),
            cbf_candidates = cbf_candidates.len(),
            returned = recommendations.len(),
            "Hybrid recommendation"
        );

        Ok(recommendations)
    }

    /// Popular items for users without usable history
    pub fn cold_start(&self, top_n: usize) -> Vec<PopularItem> {
        self.cold_start
            .recommend(self.matrix.triples(), &self.catalog, top_n)
    }
}

/// Merge both candidate lists into descending combined score.
///
/// Ties keep first-seen order: collaborative candidates first, then
/// content candidates.
pub fn merge_candidates(
    cf: &[ScoredItem],
    cbf: &[ScoredItem],
    cbf_source: CandidateSource,
    alpha: f64,
) -> Vec<ScoredCandidate> {
    let mut merged: Vec<ScoredCandidate> = Vec::with_capacity(cf.len() + cbf.len());
    let mut positions: HashMap<ItemId, usize> = HashMap::new();

    let weighted = cf
        .iter()
        .map(|c| (c, alpha, CandidateSource::Collaborative))
        .chain(cbf.iter().map(|c| (c, 1.0 - alpha, cbf_source)));

    for (candidate, weight, source) in weighted {
        let contribution = weight * candidate.score;
        match positions.get(&candidate.item_id) {
            Some(&pos) => {
                let existing = &mut merged[pos];
                existing.score += contribution;
                if !existing.sources.contains(&source) {
                    existing.sources.push(source);
                }
            }
            None => {
                positions.insert(candidate.item_id, merged.len());
                merged.push(ScoredCandidate {
                    item_id: candidate.item_id,
                    score: contribution,
                    sources: vec![source],
                });
            }
        }
    }

    merged.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_candidates_decomposes_scores() {
        let cf = [ScoredItem::new(1, 4.0), ScoredItem::new(2, 2.0)];
        let cbf = [ScoredItem::new(2, 0.8), ScoredItem::new(3, 0.6)];

        let merged = merge_candidates(&cf, &cbf, CandidateSource::ContentBased, 0.25);
        let by_id = |id| merged.iter().find(|c| c.item_id == id).unwrap();

        assert!((by_id(1).score - 0.25 * 4.0).abs() < 1e-12);
        assert!((by_id(2).score - (0.25 * 2.0 + 0.75 * 0.8)).abs() < 1e-12);
        assert!((by_id(3).score - 0.75 * 0.6).abs() < 1e-12);
        assert_eq!(
            by_id(2).sources,
            vec![CandidateSource::Collaborative, CandidateSource::ContentBased]
        );
        assert_eq!(merged.len(), 3);
        assert!(merged.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_merge_candidates_ties_keep_first_seen_order() {
        let cf = [ScoredItem::new(5, 1.0)];
        let cbf = [ScoredItem::new(2, 1.0), ScoredItem::new(9, 1.0)];

        let merged = merge_candidates(&cf, &cbf, CandidateSource::ContentFallback, 0.5);
        let ids: Vec<ItemId> = merged.iter().map(|c| c.item_id).collect();
        assert_eq!(ids, vec![5, 2, 9]);
    }

    #[test]
    fn test_merge_candidates_alpha_extremes() {
        let cf = [ScoredItem::new(1, 3.0)];
        let cbf = [ScoredItem::new(2, 0.9)];

        let cf_only = merge_candidates(&cf, &cbf, CandidateSource::ContentBased, 1.0);
        assert_eq!(cf_only[0].item_id, 1);
        assert_eq!(cf_only[1].score, 0.0);

        let cbf_only = merge_candidates(&cf, &cbf, CandidateSource::ContentBased, 0.0);
        assert_eq!(cbf_only[0].item_id, 2);
        assert_eq!(cbf_only[1].score, 0.0);
    }
}
