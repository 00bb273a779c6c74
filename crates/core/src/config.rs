//! Configuration loading for the recommendation engines
//!
//! Settings are layered: built-in defaults < optional `config/recommender`
//! file (TOML, YAML or JSON) < environment variables prefixed with
//! `BOOKREC_`. Nested keys use a double underscore, e.g.
//! `BOOKREC_HYBRID__ALPHA=0.7`.
//!
//! # Example
//!
//! ```no_run
//! use bookrec_core::config::{load_dotenv, ConfigLoader, RecommenderConfig};
//!
//! # fn example() -> Result<(), bookrec_core::RecommenderError> {
//! load_dotenv();
//! let config = RecommenderConfig::load()?;
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::RecommenderError;
use crate::observability::LogConfig;
use serde::{Deserialize, Serialize};

/// Environment variable prefix for every setting
pub const ENV_PREFIX: &str = "BOOKREC";

/// Default location of the optional configuration file (extension resolved by `config`)
pub const DEFAULT_CONFIG_FILE: &str = "config/recommender";

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration.
pub trait ConfigLoader: Sized {
    /// Load configuration from `BOOKREC_*` environment variables over defaults
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a variable cannot be parsed.
    fn from_env() -> Result<Self, RecommenderError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` naming the offending key.
    fn validate(&self) -> Result<(), RecommenderError>;
}

/// How cosine similarity treats unobserved cells of the rating matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CosineVariant {
    /// Full rows/columns, unobserved cells count as zero components
    #[default]
    Dense,
    /// Only positions observed in both vectors contribute
    CoRated,
}

/// Neighborhood engine settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborhoodConfig {
    pub cosine_variant: CosineVariant,
}

/// Factorization engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorizationConfig {
    /// Requested rank before clamping (default: 15)
    pub rank: usize,
    /// Seed for the degraded-mode score generator; `None` seeds from entropy
    pub fallback_seed: Option<u64>,
}

impl Default for FactorizationConfig {
    fn default() -> Self {
        Self {
            rank: 15,
            fallback_seed: None,
        }
    }
}

/// Hybrid combiner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    /// Weight of the collaborative score, content gets `1 - alpha` (default: 0.5)
    pub alpha: f64,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self { alpha: 0.5 }
    }
}

/// Cold-start popularity ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColdStartConfig {
    /// Minimum number of ratings before an item is eligible (default: 5)
    pub min_ratings: usize,
}

impl Default for ColdStartConfig {
    fn default() -> Self {
        Self { min_ratings: 5 }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Number of results when the caller does not ask for a specific count (default: 5)
    pub default_top_n: usize,
    pub neighborhood: NeighborhoodConfig,
    pub factorization: FactorizationConfig,
    pub hybrid: HybridConfig,
    pub cold_start: ColdStartConfig,
    pub logging: LogConfig,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_top_n: 5,
            neighborhood: NeighborhoodConfig::default(),
            factorization: FactorizationConfig::default(),
            hybrid: HybridConfig::default(),
            cold_start: ColdStartConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl RecommenderConfig {
    /// Load from the default config file (if present) and the environment
    pub fn load() -> Result<Self, RecommenderError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from a specific config file (if present) and the environment
    pub fn load_from(path: &str) -> Result<Self, RecommenderError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env_source())
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse configuration from an inline TOML document, without consulting the environment
    pub fn from_toml_str(toml: &str) -> Result<Self, RecommenderError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

impl ConfigLoader for RecommenderConfig {
    fn from_env() -> Result<Self, RecommenderError> {
        let settings = config::Config::builder().add_source(env_source()).build()?;
        Ok(settings.try_deserialize()?)
    }

    fn validate(&self) -> Result<(), RecommenderError> {
        if self.default_top_n == 0 {
            return Err(RecommenderError::configuration(
                "default_top_n must be greater than 0",
                "BOOKREC_DEFAULT_TOP_N",
            ));
        }

        if self.factorization.rank == 0 {
            return Err(RecommenderError::configuration(
                "factorization rank must be greater than 0",
                "BOOKREC_FACTORIZATION__RANK",
            ));
        }

        let alpha = self.hybrid.alpha;
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(RecommenderError::configuration(
                format!("hybrid alpha ({}) must be within [0, 1]", alpha),
                "BOOKREC_HYBRID__ALPHA",
            ));
        }

        if self.cold_start.min_ratings == 0 {
            return Err(RecommenderError::configuration(
                "cold start min_ratings must be greater than 0",
                "BOOKREC_COLD_START__MIN_RATINGS",
            ));
        }

        self.logging.validate()
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

/// Load .env file if present
///
/// Does not return an error if the .env file is not found.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        // Only report if it's not a "file not found" error
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
