//! Example: Book recommendations over an in-memory catalog
//!
//! Builds a small catalog and rating log, then runs every recommendation
//! path and prints the results as JSON.
//!
//! Run with:
//! ```bash
//! export BOOKREC_HYBRID__ALPHA=0.6
//! cargo run --example book_recommendations
//! ```

use anyhow::Result;
use bookrec_core::{
    init_logging, load_dotenv, ConfigLoader, ItemMetadata, RatingTriple, RecommenderConfig,
};
use bookrec_engine::{NeighborhoodMode, Recommender};
use tracing::info;

fn catalog() -> Vec<ItemMetadata> {
    vec![
        ItemMetadata::new(1, "The Hound of the Baskervilles", "Arthur Conan Doyle", "Mystery", 1902, 4.1),
        ItemMetadata::new(2, "The Sign of Four", "Arthur Conan Doyle", "Mystery", 1890, 3.9),
        ItemMetadata::new(3, "Foundation", "Isaac Asimov", "Sci-Fi", 1951, 4.2),
        ItemMetadata::new(4, "I, Robot", "Isaac Asimov", "Sci-Fi", 1950, 4.0),
        ItemMetadata::new(5, "Pride and Prejudice", "Jane Austen", "Romance", 1813, 4.3),
        ItemMetadata::new(6, "Emma", "Jane Austen", "Romance", 1815, 3.9),
        ItemMetadata::new(7, "The Diary of a Young Girl", "Anne Frank", "Biography", 1947, 4.2),
        ItemMetadata::new(8, "Atomic Habits", "James Clear", "Self-Help", 2018, 4.4),
    ]
}

fn ratings() -> Vec<RatingTriple> {
    [
        (1, 1, 5), (1, 2, 4), (1, 3, 2), (1, 8, 4),
        (2, 3, 5), (2, 4, 4), (2, 1, 3), (2, 8, 5),
        (3, 5, 5), (3, 6, 4), (3, 7, 4), (3, 8, 3),
        (4, 1, 4), (4, 5, 3), (4, 7, 5), (4, 8, 4),
        (5, 2, 5), (5, 4, 3), (5, 6, 4), (5, 8, 5),
        (6, 3, 4), (6, 7, 4), (6, 8, 4), (6, 1, 5),
    ]
    .into_iter()
    .map(RatingTriple::from)
    .collect()
}

fn main() -> Result<()> {
    load_dotenv();
    let config = RecommenderConfig::load()?;
    config.validate()?;
    init_logging(&config.logging)?;

    let recommender = Recommender::new(config, catalog(), ratings())?;
    let user_id = 1;
    let top_n = recommender.config().default_top_n;

    info!(user_id, top_n, "Running every recommendation path");

    let user_based = recommender.neighborhood_predict(NeighborhoodMode::UserBased, user_id, top_n)?;
    let item_based = recommender.neighborhood_predict(NeighborhoodMode::ItemBased, user_id, top_n)?;
    let factorized = recommender.factorization_predict(user_id, top_n)?;
    let similar = recommender.content_similar(3, top_n)?;
    let hybrid = recommender.recommend(user_id)?;
    let popular = recommender.cold_start(top_n);

    let report = serde_json::json!({
        "user_id": user_id,
        "user_based": user_based,
        "item_based": item_based,
        "factorization": factorized,
        "similar_to_item_3": similar,
        "hybrid": hybrid,
        "cold_start": popular,
        "stats": recommender.catalog_stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
