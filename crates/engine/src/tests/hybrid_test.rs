//! Hybrid combiner tests against the live engines

use super::{sample_books, sample_ratings};
use crate::Recommender;
use bookrec_core::{CandidateSource, ItemMetadata, RatingTriple};

fn recommender() -> Recommender {
    Recommender::with_defaults(sample_books(), sample_ratings()).unwrap()
}

#[test]
fn test_scores_decompose_into_weighted_terms() {
    let rec = recommender();
    let top_n = 3;
    let alpha = 0.7;

    let cf = rec.factorization_predict(1, top_n * 2).unwrap();
    let history = rec.rating_matrix().user_history(1);
    let cbf = rec.content().recommend_from_history(&history, top_n * 2).unwrap();
    let hybrid = rec.hybrid_recommend(1, top_n, alpha).unwrap();

    assert_eq!(hybrid.len(), top_n);
    for item in &hybrid {
        let cf_term = cf
            .iter()
            .find(|s| s.item_id == item.item_id)
            .map_or(0.0, |s| alpha * s.score);
        let cbf_term = cbf
            .iter()
            .find(|s| s.item_id == item.item_id)
            .map_or(0.0, |s| (1.0 - alpha) * s.score);
        assert!((item.score - (cf_term + cbf_term)).abs() < 1e-9);

        let in_cf = item.sources.contains(&CandidateSource::Collaborative);
        let in_cbf = item.sources.contains(&CandidateSource::ContentBased);
        assert_eq!(in_cf, cf.iter().any(|s| s.item_id == item.item_id));
        assert_eq!(in_cbf, cbf.iter().any(|s| s.item_id == item.item_id));
    }
    assert!(hybrid.windows(2).all(|w| w[0].score >= w[1].score));
}

#[test]
fn test_metadata_enrichment() {
    let rec = recommender();
    for item in rec.hybrid_recommend(2, 4, 0.5).unwrap() {
        let meta = rec.item_info(item.item_id).unwrap();
        assert_eq!(item.title, meta.title);
        assert_eq!(item.author, meta.author);
        assert_eq!(item.genre, meta.genre);
    }
}

#[test]
fn test_no_history_uses_catalog_fallback() {
    let rec = recommender();
    // user 8 has a row in the rating matrix but never rated anything
    let result = rec.hybrid_recommend(8, 3, 0.5).unwrap();

    assert_eq!(result.len(), 3);
    for item in &result {
        assert!(item.sources.contains(&CandidateSource::ContentFallback));
        assert!(!item.sources.contains(&CandidateSource::ContentBased));
        // an all-zero row reconstructs to (numerically) zero
        assert!((item.score - 0.5).abs() < 1e-9);
        assert!(item.item_id <= 6);
    }
}

#[test]
fn test_alpha_out_of_range_rejected() {
    let rec = recommender();
    for alpha in [-0.1, 1.1, f64::NAN] {
        let err = rec.hybrid_recommend(1, 3, alpha).unwrap_err();
        assert!(err.is_invalid_input());
    }
    assert!(rec.hybrid_recommend(1, 3, 0.0).is_ok());
    assert!(rec.hybrid_recommend(1, 3, 1.0).is_ok());
}

#[test]
fn test_zero_top_n_is_empty() {
    let rec = recommender();
    assert!(rec.hybrid_recommend(1, 0, 0.5).unwrap().is_empty());
    assert!(rec.cold_start(0).is_empty());
}

#[test]
fn test_default_recommend_uses_config() {
    let rec = recommender();
    let result = rec.recommend(1).unwrap();
    assert_eq!(result, rec.hybrid_recommend(1, 5, 0.5).unwrap());
}

#[test]
fn test_no_history_fallback_follows_item_ids_not_catalog_order() {
    let books = [5, 4, 3, 2, 1, 6]
        .into_iter()
        .map(|id| ItemMetadata::new(id, format!("Book {}", id), "Author", "Fiction", 2000, 4.0))
        .collect();
    let ratings = vec![
        RatingTriple::new(1, 5, 5),
        RatingTriple::new(1, 6, 3),
        RatingTriple::new(3, 4, 4),
        RatingTriple::new(3, 5, 2),
    ];
    let rec = Recommender::with_defaults(books, ratings).unwrap();

    // user 2 sits between two raters but has no history of its own
    let result = rec.hybrid_recommend(2, 1, 0.0).unwrap();
    assert_eq!(result.len(), 1);
    assert!(result[0].item_id <= 2, "got item {}", result[0].item_id);
    assert!((result[0].score - 1.0).abs() < 1e-9);
    assert!(result[0].sources.contains(&CandidateSource::ContentFallback));
}

#[test]
fn test_candidates_outside_catalog_are_dropped() {
    let books = (1..=3)
        .map(|id| ItemMetadata::new(id, format!("Book {}", id), "Author", "Fiction", 2000, 4.0))
        .collect();
    let mut ratings = vec![
        RatingTriple::new(1, 1, 4),
        RatingTriple::new(1, 4, 5),
        RatingTriple::new(1, 5, 5),
        RatingTriple::new(1, 6, 5),
    ];
    for user in 2..=4 {
        for item in 4..=8 {
            ratings.push(RatingTriple::new(user, item, 5));
        }
    }
    ratings.push(RatingTriple::new(4, 9, 2));
    let rec = Recommender::with_defaults(books, ratings).unwrap();
    assert_eq!(rec.rating_matrix().n_items(), 9);

    // items 7 and 8 lead the collaborative list but have no metadata
    let result = rec.hybrid_recommend(1, 3, 1.0).unwrap();
    assert!(result.len() < 3);
    assert!(result.iter().all(|r| (1..=3).contains(&r.item_id)));
}
