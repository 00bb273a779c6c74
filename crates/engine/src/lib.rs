//! Book recommendation engines
//!
//! This crate implements the recommendation layer: neighborhood-based
//! collaborative filtering, truncated-SVD factorization, TF-IDF content
//! similarity, and a hybrid combiner with a popularity-based cold start.
//! [`Recommender`] owns one instance of every engine over a fixed snapshot
//! of the catalog and rating log.

pub mod cache;
pub mod catalog;
pub mod cold_start;
pub mod collaborative;
pub mod content_based;
pub mod matrix_factorization;
pub mod ranking;
pub mod rating_matrix;
pub mod recommendation;
pub mod similarity;
pub mod text;

// Re-export key types
pub use cache::{ArtifactCache, ArtifactState};
pub use catalog::{CatalogStats, GenreCount, ItemCatalog, RatedItem};
pub use cold_start::{ColdStartRanker, ItemPopularity};
pub use collaborative::{NeighborhoodEngine, NeighborhoodMode};
pub use content_based::{ContentEngine, ContentFeatures};
pub use matrix_factorization::{
    DegradationReason, FactorizationEngine, LatentFactorization, SvdFactors,
};
pub use rating_matrix::{ObservedMask, RatingMatrix, UNOBSERVED};
pub use recommendation::{HybridCombiner, ScoredCandidate};
pub use similarity::SimilarityMatrix;

use bookrec_core::{
    ConfigLoader, ItemId, ItemMetadata, PopularItem, RatingTriple, Recommendation,
    RecommenderConfig, Result, ScoredItem, UserId,
};
use std::sync::Arc;
use tracing::info;

/// Engines that depend on the rating log
struct RatingEngines {
    matrix: Arc<RatingMatrix>,
    neighborhood: NeighborhoodEngine,
    factorization: Arc<FactorizationEngine>,
    hybrid: HybridCombiner,
}

/// Recommendation facade over a catalog and rating log snapshot
pub struct Recommender {
    config: RecommenderConfig,
    catalog: Arc<ItemCatalog>,
    content: Arc<ContentEngine>,
    engines: RatingEngines,
}

impl Recommender {
    /// Validate the configuration and inputs and set up every engine.
    ///
    /// Nothing is computed yet; each artifact is built on first use. The
    /// rating matrix is at least as wide as the largest catalog item id.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` for an invalid configuration, `InvalidInput`
    /// for malformed ratings or catalog entries.
    pub fn new<I>(config: RecommenderConfig, items: Vec<ItemMetadata>, ratings: I) -> Result<Self>
    where
        I: IntoIterator<Item = RatingTriple>,
    {
        config.validate()?;
        let catalog = Arc::new(ItemCatalog::new(items)?);
        let content = Arc::new(ContentEngine::new(Arc::clone(&catalog)));
        let engines = Self::build_engines(&config, &catalog, &content, ratings)?;

        Ok(Self {
            config,
            catalog,
            content,
            engines,
        })
    }

    /// Set up with the default configuration
    pub fn with_defaults<I>(items: Vec<ItemMetadata>, ratings: I) -> Result<Self>
    where
        I: IntoIterator<Item = RatingTriple>,
    {
        Self::new(RecommenderConfig::default(), items, ratings)
    }

    fn build_engines<I>(
        config: &RecommenderConfig,
        catalog: &Arc<ItemCatalog>,
        content: &Arc<ContentEngine>,
        ratings: I,
    ) -> Result<RatingEngines>
    where
        I: IntoIterator<Item = RatingTriple>,
    {
        let matrix = Arc::new(RatingMatrix::with_min_items(
            ratings,
            catalog.max_item_id() as usize,
        )?);

        let neighborhood = NeighborhoodEngine::new(Arc::clone(&matrix))
            .with_variant(config.neighborhood.cosine_variant);

        let factorization = FactorizationEngine::new(Arc::clone(&matrix))
            .with_default_rank(config.factorization.rank);
        let factorization = Arc::new(match config.factorization.fallback_seed {
            Some(seed) => factorization.with_seed(seed),
            None => factorization,
        });

        let hybrid = HybridCombiner::new(
            Arc::clone(&matrix),
            Arc::clone(catalog),
            Arc::clone(&factorization),
            Arc::clone(content),
        )
        .with_cold_start(ColdStartRanker::new(config.cold_start.min_ratings));

        let (n_users, n_items) = matrix.shape();
        info!(
            n_users,
            n_items,
            n_ratings = matrix.triples().len(),
            n_catalog_items = catalog.len(),
            "Recommendation engines ready"
        );

        Ok(RatingEngines {
            matrix,
            neighborhood,
            factorization,
            hybrid,
        })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn rating_matrix(&self) -> &RatingMatrix {
        &self.engines.matrix
    }

    pub fn neighborhood(&self) -> &NeighborhoodEngine {
        &self.engines.neighborhood
    }

    pub fn factorization(&self) -> &FactorizationEngine {
        &self.engines.factorization
    }

    pub fn content(&self) -> &ContentEngine {
        &self.content
    }

    pub fn hybrid(&self) -> &HybridCombiner {
        &self.engines.hybrid
    }

    /// Neighborhood-weighted predicted ratings of unseen items
    pub fn neighborhood_predict(
        &self,
        mode: NeighborhoodMode,
        user_id: UserId,
        top_n: usize,
    ) -> Result<Vec<ScoredItem>> {
        self.engines.neighborhood.predict(mode, user_id, top_n)
    }

    /// Low-rank reconstructed scores of unseen items
    pub fn factorization_predict(&self, user_id: UserId, top_n: usize) -> Result<Vec<ScoredItem>> {
        self.engines.factorization.predict(user_id, top_n)
    }

    /// Items with the most similar content
    pub fn content_similar(&self, item_id: ItemId, top_n: usize) -> Result<Vec<ScoredItem>> {
        self.content.similar_items(item_id, top_n)
    }

    pub fn hybrid_recommend(
        &self,
        user_id: UserId,
        top_n: usize,
        alpha: f64,
    ) -> Result<Vec<Recommendation>> {
        self.engines.hybrid.recommend(user_id, top_n, alpha)
    }

    /// Hybrid recommendation with the configured result count and alpha
    pub fn recommend(&self, user_id: UserId) -> Result<Vec<Recommendation>> {
        self.hybrid_recommend(user_id, self.config.default_top_n, self.config.hybrid.alpha)
    }

    pub fn cold_start(&self, top_n: usize) -> Vec<PopularItem> {
        self.engines.hybrid.cold_start(top_n)
    }

    pub fn item_info(&self, item_id: ItemId) -> Option<&ItemMetadata> {
        self.catalog.get(item_id)
    }

    /// A user's ratings of catalog items, in rating-log order
    pub fn user_ratings(&self, user_id: UserId) -> Vec<(ItemMetadata, u8)> {
        self.engines
            .matrix
            .triples()
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter_map(|t| self.catalog.get(t.item_id).map(|item| (item.clone(), t.rating)))
            .collect()
    }

    pub fn catalog_stats(&self) -> CatalogStats {
        CatalogStats::compute(&self.catalog, &self.engines.matrix)
    }

    /// Drop every cached artifact; each is recomputed on next use
    pub fn invalidate_caches(&self) {
        self.engines.neighborhood.invalidate();
        self.engines.factorization.invalidate();
        self.content.invalidate();
        info!("Invalidated all cached artifacts");
    }

    /// Replace the rating log and rebuild every rating-dependent engine.
    ///
    /// Content features depend on the catalog only and stay cached. On
    /// error the previous engines are kept.
    pub fn rebuild<I>(&mut self, ratings: I) -> Result<()>
    where
        I: IntoIterator<Item = RatingTriple>,
    {
        self.engines = Self::build_engines(&self.config, &self.catalog, &self.content, ratings)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
