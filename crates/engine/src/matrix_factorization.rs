//! Matrix factorization using truncated SVD
//!
//! Decomposes the user-item rating matrix into its top-k singular triplets
//! and predicts from the low-rank reconstruction `U · diag(σ) · Vᵗ`.
//!
//! When the decomposition cannot be computed for the requested rank the
//! engine degrades instead of failing: it substitutes uniformly random
//! scores in `[0, 5)` of the full shape and logs a warning. The random
//! source is injectable so the degraded path is reproducible.

use crate::cache::ArtifactCache;
use crate::rating_matrix::RatingMatrix;
use crate::ranking::rank_columns;
use bookrec_core::{Result, ScoredItem, UserId};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rank requested when the caller does not choose one
pub const DEFAULT_RANK: usize = 15;

/// Smallest rank the clamp allows
const MIN_RANK: usize = 2;

/// Upper bound (exclusive) of the degraded-mode placeholder scores
const FALLBACK_SCORE_CEILING: f64 = 5.0;

const SVD_MAX_ITERATIONS: usize = 1000;

/// Clamp a requested rank to `max(2, min(requested, min(U, I) - 1))`
pub fn clamp_rank(requested: usize, n_users: usize, n_items: usize) -> usize {
    let upper = n_users.min(n_items).saturating_sub(1);
    MIN_RANK.max(requested.min(upper))
}

/// Why the decomposition could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradationReason {
    /// Clamped rank is not strictly below `min(U, I)`
    RankTooLarge { rank: usize, max_rank: usize },
    /// SVD did not converge within the iteration budget
    NoConvergence,
    /// Decomposition produced NaN or infinite values
    NonFiniteResult,
}

impl std::fmt::Display for DegradationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RankTooLarge { rank, max_rank } => {
                write!(f, "rank {} exceeds the largest usable rank {}", rank, max_rank)
            }
            Self::NoConvergence => write!(f, "SVD did not converge"),
            Self::NonFiniteResult => write!(f, "SVD produced non-finite values"),
        }
    }
}

/// Truncated SVD factors
#[derive(Debug, Clone)]
pub struct SvdFactors {
    /// [num_users x k]
    pub user_factors: Array2<f64>,
    /// k singular values, descending
    pub singular_values: Array1<f64>,
    /// [k x num_items]
    pub item_factors: Array2<f64>,
}

/// Result of a factorization run; read-only once computed
#[derive(Debug, Clone)]
pub struct LatentFactorization {
    rank: usize,
    factors: Option<SvdFactors>,
    reconstruction: Array2<f64>,
    degradation: Option<DegradationReason>,
}

impl LatentFactorization {
    /// Clamped rank the factorization was computed with
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// SVD factors; `None` in degraded mode
    pub fn factors(&self) -> Option<&SvdFactors> {
        self.factors.as_ref()
    }

    /// Predicted scores, same shape as the rating matrix
    pub fn reconstruction(&self) -> &Array2<f64> {
        &self.reconstruction
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }

    pub fn degradation(&self) -> Option<&DegradationReason> {
        self.degradation.as_ref()
    }

    pub(crate) fn user_scores(&self, user_idx: usize) -> ArrayView1<'_, f64> {
        self.reconstruction.row(user_idx)
    }
}

/// Random source for the degraded-mode fallback
pub type FallbackRng = Box<dyn RngCore + Send>;

/// Truncated-SVD factorization engine
pub struct FactorizationEngine {
    matrix: Arc<RatingMatrix>,
    default_rank: usize,
    rng: Mutex<FallbackRng>,
    factorization: ArtifactCache<LatentFactorization>,
}

impl FactorizationEngine {
    pub fn new(matrix: Arc<RatingMatrix>) -> Self {
        Self {
            matrix,
            default_rank: DEFAULT_RANK,
            rng: Mutex::new(Box::new(StdRng::from_entropy())),
            factorization: ArtifactCache::new(),
        }
    }

    /// Rank used when the factorization is computed on demand
    pub fn with_default_rank(mut self, rank: usize) -> Self {
        self.default_rank = rank;
        self
    }

    /// Replace the random source used by the degraded-mode fallback
    pub fn with_rng<R>(mut self, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        self.rng = Mutex::new(Box::new(rng));
        self
    }

    /// Seed the fallback random source for reproducible degraded output
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn default_rank(&self) -> usize {
        self.default_rank
    }

    /// Compute the factorization for `rank` and replace the cached one
    pub fn factorize(&self, rank: usize) -> Arc<LatentFactorization> {
        self.factorization.recompute(|| self.compute(rank))
    }

    /// Cached factorization, computed with the default rank on first use
    pub fn factorization(&self) -> Arc<LatentFactorization> {
        self.factorization
            .get_or_compute(|| self.compute(self.default_rank))
    }

    pub fn invalidate(&self) {
        self.factorization.invalidate();
    }

    /// Top-N reconstructed scores for a user.
    ///
    /// Items the user already rated are forced to `0` before ranking. The
    /// cached reconstruction itself is never modified.
    pub fn predict(&self, user_id: UserId, top_n: usize) -> Result<Vec<ScoredItem>> {
        let user_idx = self.matrix.user_index(user_id)?;
        let factorization = self.factorization();
        let mask = self.matrix.observed_mask();

        let scores: Vec<f64> = factorization
            .user_scores(user_idx)
            .iter()
            .enumerate()
            .map(|(item_idx, &score)| {
                if mask.is_observed(user_idx, item_idx) {
                    0.0
                } else {
                    score
                }
            })
            .collect();

        debug!(
            user_id,
            top_n,
            degraded = factorization.is_degraded(),
            "Factorization prediction"
        );
        Ok(rank_columns(&scores, top_n))
    }

    fn compute(&self, requested_rank: usize) -> LatentFactorization {
        let start = Instant::now();
        let (n_users, n_items) = self.matrix.shape();
        let rank = clamp_rank(requested_rank, n_users, n_items);

        match truncated_svd(self.matrix.values(), rank) {
            Ok(factors) => {
                let reconstruction = reconstruct(&factors);
                info!(
                    requested_rank,
                    rank,
                    n_users,
                    n_items,
                    "Computed truncated SVD in {:?}",
                    start.elapsed()
                );
                LatentFactorization {
                    rank,
                    factors: Some(factors),
                    reconstruction,
                    degradation: None,
                }
            }
            Err(reason) => {
                warn!(
                    requested_rank,
                    rank,
                    n_users,
                    n_items,
                    reason = %reason,
                    "Factorization failed, falling back to random scores"
                );
                let reconstruction = self.random_scores(n_users, n_items);
                LatentFactorization {
                    rank,
                    factors: None,
                    reconstruction,
                    degradation: Some(reason),
                }
            }
        }
    }

    fn random_scores(&self, n_users: usize, n_items: usize) -> Array2<f64> {
        let mut rng = self.rng.lock();
        Array2::from_shape_fn((n_users, n_items), |_| {
            rng.gen_range(0.0..FALLBACK_SCORE_CEILING)
        })
    }
}

/// Top-`rank` singular triplets of `values`
fn truncated_svd(
    values: &Array2<f64>,
    rank: usize,
) -> std::result::Result<SvdFactors, DegradationReason> {
    let (n_users, n_items) = values.dim();
    let max_rank = n_users.min(n_items);

    // Truncation must leave at least one singular value out.
    if rank >= max_rank {
        return Err(DegradationReason::RankTooLarge {
            rank,
            max_rank: max_rank.saturating_sub(1),
        });
    }

    let dense = DMatrix::from_fn(n_users, n_items, |i, j| values[[i, j]]);
    let svd = dense
        .try_svd(true, true, f64::EPSILON, SVD_MAX_ITERATIONS)
        .ok_or(DegradationReason::NoConvergence)?;
    let (u, v_t) = match (svd.u.as_ref(), svd.v_t.as_ref()) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => return Err(DegradationReason::NoConvergence),
    };

    let sigma = &svd.singular_values;
    let mut order: Vec<usize> = (0..sigma.len()).collect();
    order.sort_by(|&a, &b| sigma[b].partial_cmp(&sigma[a]).unwrap_or(Ordering::Equal));
    order.truncate(rank);

    let user_factors = Array2::from_shape_fn((n_users, rank), |(i, c)| u[(i, order[c])]);
    let singular_values: Array1<f64> = order.iter().map(|&c| sigma[c]).collect();
    let item_factors = Array2::from_shape_fn((rank, n_items), |(c, j)| v_t[(order[c], j)]);

    let finite = user_factors.iter().all(|v| v.is_finite())
        && singular_values.iter().all(|v| v.is_finite())
        && item_factors.iter().all(|v| v.is_finite());
    if !finite {
        return Err(DegradationReason::NonFiniteResult);
    }

    Ok(SvdFactors {
        user_factors,
        singular_values,
        item_factors,
    })
}

/// `U · diag(σ) · Vᵗ`
fn reconstruct(factors: &SvdFactors) -> Array2<f64> {
    let scaled = &factors.user_factors * &factors.singular_values;
    scaled.dot(&factors.item_factors)
}
