//! Cross-engine tests over a small shared catalog

mod hybrid_test;

use bookrec_core::{ItemMetadata, RatingTriple};

pub(crate) fn sample_books() -> Vec<ItemMetadata> {
    vec![
        ItemMetadata::new(1, "The Silent Harbor", "Maria Lopez", "Mystery", 2001, 4.1),
        ItemMetadata::new(2, "Harbor Lights", "Maria Lopez", "Mystery", 2005, 3.8),
        ItemMetadata::new(3, "Stars Beyond Reach", "Ken Adams", "Sci-Fi", 1998, 4.5),
        ItemMetadata::new(4, "Reach for Tomorrow", "Ken Adams", "Sci-Fi", 2012, 4.0),
        ItemMetadata::new(5, "Garden of Roses", "Ella Hart", "Romance", 2015, 3.6),
        ItemMetadata::new(6, "Roses in Winter", "Ella Hart", "Romance", 2018, 3.9),
        ItemMetadata::new(7, "Life of Lincoln", "Paul Grant", "Biography", 1990, 4.7),
        ItemMetadata::new(8, "Habits That Stick", "Nora Fields", "Self-Help", 2020, 3.5),
    ]
}

/// Nine users; user 8 has no ratings, item 7 has six ratings averaging 4.5
pub(crate) fn sample_ratings() -> Vec<RatingTriple> {
    [
        (1, 1, 5),
        (1, 2, 4),
        (1, 7, 5),
        (2, 1, 4),
        (2, 3, 5),
        (2, 7, 4),
        (3, 3, 5),
        (3, 4, 4),
        (3, 7, 5),
        (4, 5, 4),
        (4, 6, 5),
        (4, 7, 4),
        (5, 2, 3),
        (5, 3, 4),
        (5, 7, 5),
        (6, 3, 4),
        (6, 5, 3),
        (6, 7, 4),
        (7, 3, 5),
        (7, 8, 2),
        (9, 4, 3),
        (9, 6, 4),
    ]
    .into_iter()
    .map(RatingTriple::from)
    .collect()
}
