//! # Bookrec Core
//!
//! Shared building blocks for the book recommendation engines.
//!
//! ## Modules
//!
//! - `error`: Error taxonomy shared by every engine
//! - `models`: Fixed-shape rating, item and recommendation records
//! - `validation`: Input validation for records crossing the engine boundary
//! - `math`: Vector math for similarity computation
//! - `config`: Layered configuration loading and validation
//! - `observability`: Structured logging initialization

pub mod config;
pub mod error;
pub mod math;
pub mod models;
pub mod observability;
pub mod validation;

// Re-export commonly used types
pub use config::{
    load_dotenv, ColdStartConfig, ConfigLoader, CosineVariant, FactorizationConfig, HybridConfig,
    NeighborhoodConfig, RecommenderConfig,
};
pub use error::RecommenderError;
pub use math::{l2_norm, min_max_normalize, normalize_vector};
pub use models::{
    CandidateSource, ItemId, ItemMetadata, PopularItem, RatingTriple, Recommendation, ScoredItem,
    UserId,
};
pub use observability::{init_logging, LogConfig, LogFormat};

/// Result type alias for recommender operations
pub type Result<T> = std::result::Result<T, RecommenderError>;
