//! Input validation for records crossing the engine boundary
//!
//! Validation runs before any computation; a failure rejects the whole call.

use crate::error::RecommenderError;
use crate::models::{ItemMetadata, RatingTriple, MAX_RATING, MIN_RATING};
use std::collections::HashSet;

/// Validate a single rating triple
///
/// # Examples
///
/// ```
/// use bookrec_core::models::RatingTriple;
/// use bookrec_core::validation::validate_rating_triple;
///
/// assert!(validate_rating_triple(&RatingTriple::new(1, 1, 5)).is_ok());
/// assert!(validate_rating_triple(&RatingTriple::new(0, 1, 5)).is_err());
/// assert!(validate_rating_triple(&RatingTriple::new(1, 1, 6)).is_err());
/// ```
pub fn validate_rating_triple(triple: &RatingTriple) -> Result<(), RecommenderError> {
    if triple.user_id == 0 {
        return Err(RecommenderError::invalid_field(
            "user_id must be a positive integer",
            "user_id",
        ));
    }

    if triple.item_id == 0 {
        return Err(RecommenderError::invalid_field(
            "item_id must be a positive integer",
            "item_id",
        ));
    }

    if !(MIN_RATING..=MAX_RATING).contains(&triple.rating) {
        return Err(RecommenderError::invalid_field(
            format!(
                "rating {} for user {} item {} is outside {}..={}",
                triple.rating, triple.user_id, triple.item_id, MIN_RATING, MAX_RATING
            ),
            "rating",
        ));
    }

    Ok(())
}

/// Validate a single catalog entry
pub fn validate_item_metadata(item: &ItemMetadata) -> Result<(), RecommenderError> {
    if item.item_id == 0 {
        return Err(RecommenderError::invalid_field(
            "item_id must be a positive integer",
            "item_id",
        ));
    }

    if !item.rating.is_finite() {
        return Err(RecommenderError::invalid_field(
            format!("average rating of item {} is not a finite number", item.item_id),
            "rating",
        ));
    }

    Ok(())
}

/// Validate a whole catalog: every entry individually, plus unique ids
pub fn validate_catalog(items: &[ItemMetadata]) -> Result<(), RecommenderError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        validate_item_metadata(item)?;
        if !seen.insert(item.item_id) {
            return Err(RecommenderError::invalid_field(
                format!("duplicate catalog entry for item {}", item.item_id),
                "item_id",
            ));
        }
    }
    Ok(())
}

/// Validate the hybrid blend weight
pub fn validate_alpha(alpha: f64) -> Result<(), RecommenderError> {
    if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
        return Err(RecommenderError::invalid_field(
            format!("alpha must be within [0, 1], got {}", alpha),
            "alpha",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rating_triple_bounds() {
        assert!(validate_rating_triple(&RatingTriple::new(1, 1, 1)).is_ok());
        assert!(validate_rating_triple(&RatingTriple::new(1, 1, 5)).is_ok());
        assert!(validate_rating_triple(&RatingTriple::new(1, 1, 0)).is_err());
        assert!(validate_rating_triple(&RatingTriple::new(1, 0, 3)).is_err());
    }

    #[test]
    fn test_validate_catalog_rejects_duplicates() {
        let items = vec![
            ItemMetadata::new(1, "A", "X", "Drama", 2000, 4.0),
            ItemMetadata::new(1, "B", "Y", "Drama", 2001, 3.0),
        ];
        let err = validate_catalog(&items).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_validate_item_metadata_rejects_nan_rating() {
        let item = ItemMetadata::new(2, "A", "X", "Drama", 2000, f64::NAN);
        assert!(validate_item_metadata(&item).is_err());
    }

    #[test]
    fn test_validate_alpha() {
        assert!(validate_alpha(0.0).is_ok());
        assert!(validate_alpha(0.5).is_ok());
        assert!(validate_alpha(1.0).is_ok());
        assert!(validate_alpha(-0.1).is_err());
        assert!(validate_alpha(1.1).is_err());
        assert!(validate_alpha(f64::NAN).is_err());
    }
}
