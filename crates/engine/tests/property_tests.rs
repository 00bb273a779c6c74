//! Property tests for the recommendation engines

use bookrec_core::{ItemMetadata, RatingTriple};
use bookrec_engine::{
    ColdStartRanker, ItemCatalog, NeighborhoodEngine, RatingMatrix, Recommender,
};
use proptest::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

fn arb_triples() -> impl Strategy<Value = Vec<RatingTriple>> {
    prop::collection::vec((1u32..=12, 1u32..=10, 1u8..=5), 1..80)
        .prop_map(|raw| raw.into_iter().map(RatingTriple::from).collect())
}

fn catalog_of(n: u32) -> Vec<ItemMetadata> {
    let genres = ["Mystery", "Romance", "Sci-Fi"];
    (1..=n)
        .map(|id| {
            ItemMetadata::new(
                id,
                format!("Title {}", id),
                format!("Writer {}", id % 4),
                genres[id as usize % genres.len()],
                1990 + id as i32,
                3.0 + f64::from(id % 3) * 0.5,
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_last_write_wins(triples in arb_triples()) {
        let matrix = RatingMatrix::from_triples(triples.clone()).unwrap();

        let mut expected = HashMap::new();
        for t in &triples {
            expected.insert((t.user_id, t.item_id), f64::from(t.rating));
        }
        for ((user, item), rating) in expected {
            prop_assert_eq!(matrix.rating(user, item).unwrap(), rating);
        }
    }

    #[test]
    fn prop_similarity_symmetric(triples in arb_triples()) {
        let matrix = Arc::new(RatingMatrix::from_triples(triples).unwrap());
        let engine = NeighborhoodEngine::new(matrix);

        for sim in [engine.user_similarity(), engine.item_similarity()] {
            for i in 0..sim.size() {
                let self_sim = sim.get(i, i);
                prop_assert!(self_sim == 1.0 || self_sim == 0.0);
                for j in 0..sim.size() {
                    prop_assert!((sim.get(i, j) - sim.get(j, i)).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn prop_cold_start_threshold(triples in arb_triples(), min_ratings in 1usize..6) {
        let catalog = ItemCatalog::new(catalog_of(10)).unwrap();
        let popular = ColdStartRanker::new(min_ratings).recommend(&triples, &catalog, 10);

        for item in &popular {
            let count = triples.iter().filter(|t| t.item_id == item.item_id).count();
            prop_assert!(count >= min_ratings);
            prop_assert_eq!(count, item.rating_count);
        }
    }

    #[test]
    fn prop_factorization_excludes_rated(triples in arb_triples(), user in 1u32..=12) {
        let rec = Recommender::with_defaults(catalog_of(10), triples).unwrap();
        prop_assume!(user as usize <= rec.rating_matrix().n_users());

        let rated: Vec<u32> = rec.rating_matrix().user_history(user).iter().map(|(i, _)| *i).collect();
        for scored in rec.factorization_predict(user, 10).unwrap() {
            if rated.contains(&scored.item_id) {
                prop_assert_eq!(scored.score, 0.0);
            }
        }
    }

    #[test]
    fn prop_hybrid_deterministic(triples in arb_triples(), alpha in 0.0f64..=1.0) {
        let mut config = bookrec_core::RecommenderConfig::default();
        config.factorization.fallback_seed = Some(11);
        let first = Recommender::new(config.clone(), catalog_of(10), triples.clone()).unwrap();
        let second = Recommender::new(config, catalog_of(10), triples).unwrap();

        prop_assert_eq!(
            first.hybrid_recommend(1, 4, alpha).unwrap(),
            second.hybrid_recommend(1, 4, alpha).unwrap()
        );
    }
}
