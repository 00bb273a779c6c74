//! Fixed-shape records exchanged with the recommendation engines

pub mod item;
pub mod rating;
pub mod recommendation;

pub use item::ItemMetadata;
pub use rating::{ItemId, RatingTriple, UserId, MAX_RATING, MIN_RATING};
pub use recommendation::{CandidateSource, PopularItem, Recommendation, ScoredItem};
