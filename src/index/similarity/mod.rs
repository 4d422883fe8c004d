//! Pairwise cosine similarity between article feature vectors.


use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::tfidf::FeatureVector;

/// Cosine of the angle between `a` and `b`; zero when either has zero norm
#[inline]
pub fn cosine_similarity(a: &FeatureVector, b: &FeatureVector) -> f32 {
    let norm_a = a.norm();
    let norm_b = b.norm();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    a.dot(b) / (norm_a * norm_b)
}

/// Dense, symmetric item-item similarity matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    scores: Array2<f32>,
}

impl Default for SimilarityMatrix {
    #[inline]
    fn default() -> Self {
        Self {
            scores: Array2::zeros((0, 0)),
        }
    }
}

impl SimilarityMatrix {
    /// Compute the similarity of every pair of `vectors`.
    ///
    /// Only the upper triangle is computed; it is mirrored into the lower
    /// one so the result is exactly symmetric.
    #[inline]
    pub fn from_vectors(vectors: &[FeatureVector]) -> Self {
        let n = vectors.len();

        let bar = if console::user_attended_stderr() && n > 0 {
            ProgressBar::new(n as u64).with_style(
                ProgressStyle::with_template("{bar:40} [{pos}/{len}] Computing similarities")
                    .expect("style template is valid"),
            )
        } else {
            ProgressBar::hidden()
        };

        let upper: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let row = (i..n)
                    .map(|j| {
                        if i == j {
                            self_similarity(&vectors[i])
                        } else {
                            cosine_similarity(&vectors[i], &vectors[j])
                        }
                    })
                    .collect();
                bar.inc(1);
                row
            })
            .collect();
        bar.finish_and_clear();

        let mut scores = Array2::zeros((n, n));
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + offset;
                scores[[i, j]] = score;
                scores[[j, i]] = score;
            }
        }

        debug!("Computed {}x{} similarity matrix", n, n);

        Self { scores }
    }

    /// Wrap an existing square matrix; `None` if it is not square
    #[inline]
    pub fn from_dense(scores: Array2<f32>) -> Option<Self> {
        (scores.nrows() == scores.ncols()).then_some(Self { scores })
    }

    /// Number of articles (rows and columns)
    #[inline]
    pub fn len(&self) -> usize {
        self.scores.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Rows and columns; a matrix read back from disk may not be square
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.scores.dim()
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Option<f32> {
        self.scores.get([row, column]).copied()
    }

    #[inline]
    pub fn row(&self, row: usize) -> Option<ArrayView1<'_, f32>> {
        (row < self.len()).then(|| self.scores.row(row))
    }

    /// Column-wise arithmetic mean of the given rows.
    ///
    /// Rows may repeat and each occurrence is weighted. Out-of-range rows are
    /// ignored; with no usable rows the result is all zeros.
    #[inline]
    pub fn mean_of_rows(&self, rows: &[usize]) -> Array1<f32> {
        let mut sum = Array1::zeros(self.len());
        let mut count = 0_usize;

        for row in rows.iter().filter_map(|&row| self.row(row)) {
            sum += &row;
            count += 1;
        }

        if count > 0 {
            sum /= count as f32;
        }
        sum
    }

    /// Column-wise mean over the whole matrix: each article's average
    /// similarity to every article in the corpus
    #[inline]
    pub fn column_means(&self) -> Array1<f32> {
        self.scores
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.len()))
    }

    #[inline]
    pub fn is_symmetric(&self) -> bool {
        self.scores == self.scores.t()
    }
}

fn self_similarity(vector: &FeatureVector) -> f32 {
    if vector.norm() > 0.0 { 1.0 } else { 0.0 }
}
