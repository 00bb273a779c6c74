//! Rating records supplied by the data-access collaborator

use serde::{Deserialize, Serialize};

/// One-based user identifier
pub type UserId = u32;

/// One-based item identifier
pub type ItemId = u32;

/// Lowest rating a user can give
pub const MIN_RATING: u8 = 1;

/// Highest rating a user can give
pub const MAX_RATING: u8 = 5;

/// A single explicit rating of an item by a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RatingTriple {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Star rating in `1..=5`
    pub rating: u8,
}

impl RatingTriple {
    pub fn new(user_id: UserId, item_id: ItemId, rating: u8) -> Self {
        Self {
            user_id,
            item_id,
            rating,
        }
    }

    /// Zero-based row of this rating in the user-item matrix
    pub fn user_index(&self) -> usize {
        self.user_id as usize - 1
    }

    /// Zero-based column of this rating in the user-item matrix
    pub fn item_index(&self) -> usize {
        self.item_id as usize - 1
    }
}

impl From<(UserId, ItemId, u8)> for RatingTriple {
    fn from((user_id, item_id, rating): (UserId, ItemId, u8)) -> Self {
        Self::new(user_id, item_id, rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_are_zero_based() {
        let triple = RatingTriple::new(3, 7, 4);
        assert_eq!(triple.user_index(), 2);
        assert_eq!(triple.item_index(), 6);
    }

    #[test]
    fn test_deserialize_from_json() {
        let triple: RatingTriple =
            serde_json::from_str(r#"{"user_id": 1, "item_id": 2, "rating": 5}"#).unwrap();
        assert_eq!(triple, RatingTriple::from((1, 2, 5)));
    }
}
