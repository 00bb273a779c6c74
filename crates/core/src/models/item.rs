//! Item (book) metadata records

use super::rating::ItemId;
use serde::{Deserialize, Serialize};

/// Catalog entry for a single book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub item_id: ItemId,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Publication year
    pub year: i32,
    /// The item's own average rating, independent of any user's rating of it
    pub rating: f64,
}

impl ItemMetadata {
    pub fn new(
        item_id: ItemId,
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        year: i32,
        rating: f64,
    ) -> Self {
        Self {
            item_id,
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            year,
            rating,
        }
    }

    /// Text fed to the content vectorizer: title, author and genre joined by spaces
    pub fn text_document(&self) -> String {
        format!("{} {} {}", self.title, self.author, self.genre)
    }
}
