//! Pairwise cosine similarity matrices
//!
//! All matrices are built from the upper triangle and mirrored, so they are
//! exactly symmetric. A non-zero vector has self-similarity exactly `1.0`;
//! a zero vector is similar to nothing, itself included.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Dense, symmetric, square similarity matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    values: Array2<f64>,
}

impl SimilarityMatrix {
    /// Cosine similarity between every pair of rows.
    ///
    /// Every component takes part, so unobserved sentinels count as zeros.
    pub fn from_rows(rows: ArrayView2<'_, f64>) -> Self {
        let n = rows.nrows();
        let norms: Vec<f64> = rows
            .outer_iter()
            .map(|row| row.dot(&row).sqrt())
            .collect();

        let mut values = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            if norms[i] == 0.0 {
                continue;
            }
            values[[i, i]] = 1.0;
            for j in (i + 1)..n {
                if norms[j] == 0.0 {
                    continue;
                }
                let sim = rows.row(i).dot(&rows.row(j)) / (norms[i] * norms[j]);
                values[[i, j]] = sim;
                values[[j, i]] = sim;
            }
        }

        Self { values }
    }

    /// Cosine similarity between every pair of rows, restricted to the
    /// positions observed in both rows.
    pub fn from_co_rated_rows(rows: ArrayView2<'_, f64>, observed: ArrayView2<'_, bool>) -> Self {
        let n = rows.nrows();
        let mut values = Array2::<f64>::zeros((n, n));

        for i in 0..n {
            let has_signal = rows
                .row(i)
                .iter()
                .zip(observed.row(i).iter())
                .any(|(&v, &seen)| seen && v != 0.0);
            if !has_signal {
                continue;
            }
            values[[i, i]] = 1.0;

            for j in (i + 1)..n {
                let sim = co_rated_cosine(
                    rows.row(i),
                    rows.row(j),
                    observed.row(i),
                    observed.row(j),
                );
                values[[i, j]] = sim;
                values[[j, i]] = sim;
            }
        }

        Self { values }
    }

    pub fn size(&self) -> usize {
        self.values.nrows()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[[i, j]]
    }

    pub fn row(&self, i: usize) -> ArrayView1<'_, f64> {
        self.values.row(i)
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }
}

fn co_rated_cosine(
    a: ArrayView1<'_, f64>,
    b: ArrayView1<'_, f64>,
    seen_a: ArrayView1<'_, bool>,
    seen_b: ArrayView1<'_, bool>,
) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for k in 0..a.len() {
        if seen_a[k] && seen_b[k] {
            dot += a[k] * b[k];
            norm_a += a[k] * a[k];
            norm_b += b[k] * b[k];
        }
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

/// Cosine similarity of one vector against every row of a matrix
pub fn cosine_against_rows(query: ArrayView1<'_, f64>, rows: ArrayView2<'_, f64>) -> Array1<f64> {
    let query_norm = query.dot(&query).sqrt();
    rows.outer_iter()
        .map(|row| {
            let row_norm = row.dot(&row).sqrt();
            if query_norm == 0.0 || row_norm == 0.0 {
                0.0
            } else {
                query.dot(&row) / (query_norm * row_norm)
            }
        })
        .collect()
}
