//! Top-N selection shared by every engine
//!
//! Ranking is a stable descending sort: items with equal scores keep their
//! original index order.

use bookrec_core::{ItemId, ScoredItem};
use std::cmp::Ordering;

/// Indices of the `top_n` highest scores, best first
pub fn top_n_indices(scores: &[f64], top_n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(Ordering::Equal)
    });
    indices.truncate(top_n);
    indices
}

/// Rank per-column scores and map column indices back to one-based item ids
pub fn rank_columns(scores: &[f64], top_n: usize) -> Vec<ScoredItem> {
    top_n_indices(scores, top_n)
        .into_iter()
        .map(|idx| ScoredItem::new(column_to_item_id(idx), scores[idx]))
        .collect()
}

/// One-based item id of a zero-based matrix column
pub fn column_to_item_id(column: usize) -> ItemId {
    (column + 1) as ItemId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descending_order() {
        let scores = [0.1, 0.9, 0.5];
        assert_eq!(top_n_indices(&scores, 3), vec![1, 2, 0]);
        assert_eq!(top_n_indices(&scores, 1), vec![1]);
    }

    #[test]
    fn test_ties_keep_index_order() {
        let scores = [0.0, 2.0, 0.0, 2.0, 0.0];
        assert_eq!(top_n_indices(&scores, 5), vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_top_n_larger_than_input_and_zero() {
        let scores = [1.0, 2.0];
        assert_eq!(top_n_indices(&scores, 10), vec![1, 0]);
        assert!(top_n_indices(&scores, 0).is_empty());
    }

    #[test]
    fn test_rank_columns_maps_to_item_ids() {
        let ranked = rank_columns(&[3.0, 4.5, 1.0], 2);
        assert_eq!(ranked, vec![ScoredItem::new(2, 4.5), ScoredItem::new(1, 3.0)]);
    }
}
