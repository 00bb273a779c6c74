//! Integration tests for the Recommender facade
//!
//! Exercises every boundary operation through the public API only.

use anyhow::Result;
use bookrec_core::{
    CandidateSource, ItemMetadata, RatingTriple, RecommenderConfig, RecommenderError,
};
use bookrec_engine::{NeighborhoodMode, Recommender};

fn books() -> Vec<ItemMetadata> {
    let genres = ["Mystery", "Sci-Fi", "Romance", "Biography", "Fantasy"];
    (1..=20u32)
        .map(|id| {
            let genre = genres[(id as usize - 1) % genres.len()];
            ItemMetadata::new(
                id,
                format!("{} Story Volume {}", genre, id),
                format!("Author {}", (id - 1) / 4 + 1),
                genre,
                1980 + id as i32,
                3.0 + f64::from(id % 5) * 0.4,
            )
        })
        .collect()
}

/// Deterministic pseudo-random rating log over 30 users
fn ratings() -> Vec<RatingTriple> {
    let mut triples = Vec::new();
    for user in 1..=30u32 {
        for item in 1..=20u32 {
            if (user * 7 + item * 3) % 4 == 0 {
                let rating = ((user + item * 2) % 5 + 1) as u8;
                triples.push(RatingTriple::new(user, item, rating));
            }
        }
    }
    triples
}

#[test]
fn test_all_boundary_operations() -> Result<()> {
    let rec = Recommender::with_defaults(books(), ratings())?;

    let user_based = rec.neighborhood_predict(NeighborhoodMode::UserBased, 1, 5)?;
    let item_based = rec.neighborhood_predict(NeighborhoodMode::ItemBased, 1, 5)?;
    assert_eq!(user_based.len(), 5);
    assert_eq!(item_based.len(), 5);

    let factorized = rec.factorization_predict(1, 5)?;
    assert_eq!(factorized.len(), 5);
    assert!(!rec.factorization().factorization().is_degraded());

    let similar = rec.content_similar(1, 5)?;
    assert!(similar.iter().all(|s| (0.0..=1.0 + 1e-9).contains(&s.score)));

    let hybrid = rec.hybrid_recommend(1, 5, 0.5)?;
    assert_eq!(hybrid.len(), 5);
    assert!(hybrid
        .iter()
        .all(|r| r.sources.contains(&CandidateSource::Collaborative)
            || r.sources.contains(&CandidateSource::ContentBased)));

    let popular = rec.cold_start(5);
    assert!(popular.iter().all(|p| p.rating_count >= 5));
    assert!(popular
        .windows(2)
        .all(|w| w[0].popularity_score >= w[1].popularity_score));

    Ok(())
}

#[test]
fn test_repeated_calls_are_identical() -> Result<()> {
    let rec = Recommender::with_defaults(books(), ratings())?;
    let other = Recommender::with_defaults(books(), ratings())?;

    assert_eq!(rec.hybrid_recommend(3, 5, 0.4)?, other.hybrid_recommend(3, 5, 0.4)?);
    assert_eq!(
        rec.neighborhood_predict(NeighborhoodMode::ItemBased, 3, 5)?,
        rec.neighborhood_predict(NeighborhoodMode::ItemBased, 3, 5)?
    );
    assert_eq!(rec.cold_start(5), other.cold_start(5));
    Ok(())
}

#[test]
fn test_degraded_factorization_is_seeded() -> Result<()> {
    // two users cannot support a rank-2 truncation
    let tiny = vec![
        RatingTriple::new(1, 1, 5),
        RatingTriple::new(1, 2, 3),
        RatingTriple::new(2, 3, 4),
    ];
    let mut config = RecommenderConfig::default();
    config.factorization.fallback_seed = Some(7);

    let first = Recommender::new(config.clone(), books(), tiny.clone())?;
    let second = Recommender::new(config, books(), tiny)?;

    assert!(first.factorization().factorization().is_degraded());
    assert_eq!(first.factorization_predict(1, 5)?, second.factorization_predict(1, 5)?);
    for scored in first.factorization_predict(2, 20)? {
        assert!((0.0..5.0).contains(&scored.score));
    }
    Ok(())
}

#[test]
fn test_invalid_inputs() {
    let bad_rating = Recommender::with_defaults(books(), vec![RatingTriple::new(1, 1, 6)]);
    assert!(matches!(bad_rating, Err(RecommenderError::InvalidInput { .. })));

    let mut duplicated = books();
    duplicated.push(duplicated[0].clone());
    let bad_catalog = Recommender::with_defaults(duplicated, ratings());
    assert!(matches!(bad_catalog, Err(RecommenderError::InvalidInput { .. })));
}

#[test]
fn test_records_serialize() -> Result<()> {
    let rec = Recommender::with_defaults(books(), ratings())?;

    let hybrid = serde_json::to_value(rec.hybrid_recommend(2, 2, 0.5)?)?;
    assert!(hybrid[0]["title"].is_string());
    assert!(hybrid[0]["sources"].is_array());

    let stats = serde_json::to_value(rec.catalog_stats())?;
    assert_eq!(stats["total_items"], 20);
    assert_eq!(stats["top_rated"].as_array().map(Vec::len), Some(3));
    Ok(())
}
