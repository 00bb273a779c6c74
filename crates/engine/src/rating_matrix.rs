//! User-item rating matrix
//!
//! Dense `U x I` matrix where row `user_id - 1`, column `item_id - 1` holds
//! the rating, and `0.0` is the sentinel for "unobserved" (not "rated zero").
//! The matrix is built once from the full rating log and never mutated.

use bookrec_core::validation::validate_rating_triple;
use bookrec_core::{ItemId, RatingTriple, RecommenderError, Result, UserId};
use ndarray::{Array1, Array2, ArrayView1};
use tracing::debug;

/// Value stored in cells without a rating
pub const UNOBSERVED: f64 = 0.0;

/// Dense user-item rating matrix plus the raw rating log it was built from
#[derive(Debug, Clone)]
pub struct RatingMatrix {
    /// [num_users x num_items], `UNOBSERVED` where no rating exists
    values: Array2<f64>,
    /// Validated triples in input order, duplicates included
    triples: Vec<RatingTriple>,
}

impl RatingMatrix {
    /// Build from rating triples.
    ///
    /// Shape is `(max user_id, max item_id)`. Duplicate `(user, item)`
    /// pairs are resolved by last write.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if any id is zero or any rating is outside `1..=5`.
    pub fn from_triples<I>(triples: I) -> Result<Self>
    where
        I: IntoIterator<Item = RatingTriple>,
    {
        Self::with_min_items(triples, 0)
    }

    /// Build from rating triples with at least `min_items` columns.
    ///
    /// Used to size the matrix to the item catalog so that items nobody has
    /// rated yet still get a column.
    pub fn with_min_items<I>(triples: I, min_items: usize) -> Result<Self>
    where
        I: IntoIterator<Item = RatingTriple>,
    {
        let triples: Vec<RatingTriple> = triples.into_iter().collect();
        for triple in &triples {
            validate_rating_triple(triple)?;
        }

        let num_users = triples
            .iter()
            .map(|t| t.user_id as usize)
            .max()
            .unwrap_or(0);
        let num_items = triples
            .iter()
            .map(|t| t.item_id as usize)
            .max()
            .unwrap_or(0)
            .max(min_items);

        let mut values = Array2::<f64>::from_elem((num_users, num_items), UNOBSERVED);
        for triple in &triples {
            values[[triple.user_index(), triple.item_index()]] = f64::from(triple.rating);
        }

        debug!(
            num_users,
            num_items,
            num_ratings = triples.len(),
            "Built rating matrix"
        );

        Ok(Self { values, triples })
    }

    pub fn n_users(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_items(&self) -> usize {
        self.values.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Raw dense values, sentinels included
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Validated triples in input order
    pub fn triples(&self) -> &[RatingTriple] {
        &self.triples
    }

    /// Zero-based row of a user, or `NotFound`
    pub fn user_index(&self, user_id: UserId) -> Result<usize> {
        if user_id == 0 || user_id as usize > self.n_users() {
            return Err(RecommenderError::not_found("user", user_id));
        }
        Ok(user_id as usize - 1)
    }

    /// Zero-based column of an item, or `NotFound`
    pub fn item_index(&self, item_id: ItemId) -> Result<usize> {
        if item_id == 0 || item_id as usize > self.n_items() {
            return Err(RecommenderError::not_found("item", item_id));
        }
        Ok(item_id as usize - 1)
    }

    /// Stored value for a cell; `UNOBSERVED` when the user never rated the item
    pub fn rating(&self, user_id: UserId, item_id: ItemId) -> Result<f64> {
        let u = self.user_index(user_id)?;
        let i = self.item_index(item_id)?;
        Ok(self.values[[u, i]])
    }

    /// Flat vector of a user's ratings over all items
    pub fn user_row(&self, user_id: UserId) -> Result<Array1<f64>> {
        let u = self.user_index(user_id)?;
        Ok(self.values.row(u).to_owned())
    }

    /// Flat vector of an item's ratings over all users
    pub fn item_column(&self, item_id: ItemId) -> Result<Array1<f64>> {
        let i = self.item_index(item_id)?;
        Ok(self.values.column(i).to_owned())
    }

    pub(crate) fn row_view(&self, user_idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(user_idx)
    }

    pub fn observed_mask(&self) -> ObservedMask<'_> {
        ObservedMask { matrix: self }
    }

    /// Raw rating log entries of a user as `(item_id, rating)` in input order.
    ///
    /// Unknown users simply have no history.
    pub fn user_history(&self, user_id: UserId) -> Vec<(ItemId, f64)> {
        self.triples
            .iter()
            .filter(|t| t.user_id == user_id)
            .map(|t| (t.item_id, f64::from(t.rating)))
            .collect()
    }

    pub fn observed_count(&self) -> usize {
        self.values.iter().filter(|&&v| v != UNOBSERVED).count()
    }

    /// Fraction of cells holding a rating
    pub fn density(&self) -> f64 {
        let cells = self.values.len();
        if cells == 0 {
            0.0
        } else {
            self.observed_count() as f64 / cells as f64
        }
    }
}

/// Which cells of a [`RatingMatrix`] carry a real rating.
///
/// Every "observed" filter goes through this view instead of comparing raw
/// values against the sentinel.
#[derive(Debug, Clone, Copy)]
pub struct ObservedMask<'a> {
    matrix: &'a RatingMatrix,
}

impl<'a> ObservedMask<'a> {
    pub fn is_observed(&self, user_idx: usize, item_idx: usize) -> bool {
        self.matrix.values[[user_idx, item_idx]] != UNOBSERVED
    }

    /// Zero-based item indices observed for a user
    pub fn observed_items(&self, user_idx: usize) -> Vec<usize> {
        self.matrix
            .values
            .row(user_idx)
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != UNOBSERVED)
            .map(|(i, _)| i)
            .collect()
    }

    /// Zero-based user indices that observed an item
    pub fn observed_users(&self, item_idx: usize) -> Vec<usize> {
        self.matrix
            .values
            .column(item_idx)
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != UNOBSERVED)
            .map(|(u, _)| u)
            .collect()
    }

    /// Boolean matrix of the same shape as the ratings
    pub fn to_array(&self) -> Array2<bool> {
        self.matrix.values.mapv(|v| v != UNOBSERVED)
    }
}
