//! Confusion matrices and accuracy assessment
//!
//! Cross-tabulates reference vs. predicted class counts from stratified
//! point samples, and derives overall and per-class accuracy.

use geo::Geometry;
use ndarray::Array2;
use serde::Serialize;
use terracover_core::raster::LabelImage;
use terracover_core::{Error, Result};

use crate::accuracy::sampling::{stratified_sample, SamplePoint, SampleParams};

/// Square cross-tabulation of `(reference class, predicted class)` counts.
///
/// Rows index reference classes, columns predicted classes, both in fixed
/// legend order `0..N-1`. Created fresh per assessment, never mutated after.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfusionMatrix {
    counts: Array2<u64>,
}

impl ConfusionMatrix {
    /// Create an empty matrix over `num_classes` classes
    pub fn new(num_classes: usize) -> Self {
        Self {
            counts: Array2::zeros((num_classes, num_classes)),
        }
    }

    /// Build from sampled (reference, prediction) pairs.
    ///
    /// With `num_classes = None` the matrix order is the highest observed
    /// class ID plus one; with an explicit order, out-of-range class IDs
    /// are a `LabelMismatch`. Negative class labels are rejected: sampling
    /// never emits them, but hand-built samples can carry them.
    pub fn from_samples(samples: &[SamplePoint], num_classes: Option<usize>) -> Result<Self> {
        if let Some(s) = samples
            .iter()
            .find(|s| s.reference < 0 || s.prediction < 0)
        {
            return Err(Error::Other(format!(
                "negative class label in sample pair ({}, {})",
                s.reference, s.prediction
            )));
        }
        let observed_max = samples
            .iter()
            .map(|s| s.reference.max(s.prediction))
            .max()
            .unwrap_or(-1);
        let n = match num_classes {
            Some(n) => {
                if observed_max >= n as i32 {
                    return Err(Error::LabelMismatch {
                        expected: n,
                        actual: observed_max as usize + 1,
                    });
                }
                n
            }
            None => (observed_max + 1).max(0) as usize,
        };

        let mut counts = Array2::zeros((n, n));
        for s in samples {
            counts[(s.reference as usize, s.prediction as usize)] += 1;
        }
        Ok(Self { counts })
    }

    /// Matrix order (number of classes)
    pub fn num_classes(&self) -> usize {
        self.counts.nrows()
    }

    /// Raw counts
    pub fn counts(&self) -> &Array2<u64> {
        &self.counts
    }

    /// Count for one (reference, predicted) cell
    pub fn get(&self, reference: usize, predicted: usize) -> Option<u64> {
        self.counts.get((reference, predicted)).copied()
    }

    /// Total sample count
    pub fn total(&self) -> u64 {
        self.counts.sum()
    }

    /// Sum of the diagonal (correctly classified samples)
    pub fn trace(&self) -> u64 {
        self.counts.diag().sum()
    }

    /// Overall accuracy: trace / total. NaN for an empty matrix.
    pub fn overall_accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return f64::NAN;
        }
        self.trace() as f64 / total as f64
    }

    /// Row-normalized matrix: each row divided by its row sum, giving
    /// per-reference-class accuracy on the diagonal.
    ///
    /// A row with zero raw sum normalizes to NaN, not zero; callers must
    /// check before rendering.
    pub fn normalized(&self) -> Array2<f64> {
        let n = self.num_classes();
        let mut out = Array2::from_elem((n, n), f64::NAN);
        for (r, row) in self.counts.rows().into_iter().enumerate() {
            let total: u64 = row.sum();
            if total == 0 {
                continue;
            }
            for (c, &count) in row.iter().enumerate() {
                out[(r, c)] = count as f64 / total as f64;
            }
        }
        out
    }

    /// Raw counts as a serializable table with class-name axis labels
    pub fn to_table(&self, labels: &[&str]) -> Result<LabeledMatrix<u64>> {
        self.check_labels(labels)?;
        Ok(LabeledMatrix {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            rows: self
                .counts
                .rows()
                .into_iter()
                .map(|r| r.to_vec())
                .collect(),
        })
    }

    /// Row-normalized form as a serializable table with class-name axis
    /// labels. Zero-sum rows carry NaN entries.
    pub fn normalized_table(&self, labels: &[&str]) -> Result<LabeledMatrix<f64>> {
        self.check_labels(labels)?;
        Ok(LabeledMatrix {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            rows: self
                .normalized()
                .rows()
                .into_iter()
                .map(|r| r.to_vec())
                .collect(),
        })
    }

    fn check_labels(&self, labels: &[&str]) -> Result<()> {
        if labels.len() != self.num_classes() {
            return Err(Error::LabelMismatch {
                expected: self.num_classes(),
                actual: labels.len(),
            });
        }
        Ok(())
    }
}

/// A 2D numeric table with class-name row/column labels, the serializable
/// form of a (normalized) confusion matrix
#[derive(Debug, Clone, Serialize)]
pub struct LabeledMatrix<T> {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<T>>,
}

/// Parameters for [`assess`]
#[derive(Debug, Clone, Default)]
pub struct AssessParams {
    /// Stratified sampling configuration (points per class, scale, seed,
    /// optional timeout)
    pub sample: SampleParams,
    /// Fixed matrix order; inferred from the samples when `None`
    pub num_classes: Option<usize>,
}

/// Assess a predicted label raster against a reference one.
///
/// Draws a stratified sample within `region`, cross-tabulates the
/// (reference, prediction) pairs and returns the confusion matrix together
/// with the overall accuracy (trace / total).
///
/// # Errors
/// - `Error::EmptyRegion` when the region yields no valid sample points
/// - `Error::BackendTimeout` when a configured timeout is exceeded
pub fn assess(
    reference: &LabelImage,
    prediction: &LabelImage,
    region: &Geometry<f64>,
    params: &AssessParams,
) -> Result<(ConfusionMatrix, f64)> {
    let samples = stratified_sample(reference, prediction, region, &params.sample)?;
    let matrix = ConfusionMatrix::from_samples(&samples, params.num_classes)?;
    let accuracy = matrix.overall_accuracy();
    Ok((matrix, accuracy))
}
