//! Stratified point sampling of label rasters
//!
//! Draws reproducible, class-stratified point samples comparing a reference
//! label raster against a predicted one, so rare classes are not starved by
//! uniform sampling.

use geo::{Contains, Geometry, Point};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use terracover_core::raster::LabelImage;
use terracover_core::{Error, Result};
use tracing::debug;

/// One sampled location with the class values read from both rasters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub row: usize,
    pub col: usize,
    pub x: f64,
    pub y: f64,
    pub reference: i32,
    pub prediction: i32,
}

/// Parameters for [`stratified_sample`]
#[derive(Debug, Clone)]
pub struct SampleParams {
    /// Points to draw per reference class
    pub num_points: usize,
    /// Sampling resolution in geographic units; candidate pixels are
    /// visited on a stride of `scale / cell_size`
    pub scale: f64,
    /// RNG seed for reproducibility
    pub seed: u64,
    /// Abort with `Error::BackendTimeout` when sampling exceeds this
    pub timeout: Option<Duration>,
}

impl Default for SampleParams {
    fn default() -> Self {
        Self {
            num_points: 2000,
            scale: 10.0,
            seed: 42,
            timeout: None,
        }
    }
}

/// Draw a stratified random sample of pixel locations within `region`.
///
/// Candidates are pixels valid in both rasters whose centers fall inside
/// the region, grouped by reference class; up to `num_points` are drawn
/// per class with a seeded ChaCha8 generator, so equal inputs give equal
/// samples.
///
/// # Errors
/// - `Error::EmptyRegion` when no candidate pixel lies in the region
/// - `Error::BackendTimeout` when a configured timeout is exceeded
pub fn stratified_sample(
    reference: &LabelImage,
    prediction: &LabelImage,
    region: &Geometry<f64>,
    params: &SampleParams,
) -> Result<Vec<SamplePoint>> {
    let (rows, cols) = reference.shape();
    if prediction.shape() != (rows, cols) {
        return Err(Error::SizeMismatch {
            er: rows,
            ec: cols,
            ar: prediction.rows(),
            ac: prediction.cols(),
        });
    }

    let cell_size = reference.cell_size();
    let step = if cell_size > 0.0 {
        ((params.scale / cell_size).round() as usize).max(1)
    } else {
        1
    };

    let started = Instant::now();
    let deadline_exceeded = |t: Option<Duration>| t.is_some_and(|t| started.elapsed() > t);

    // BTreeMap keeps class iteration order deterministic for a given seed
    let mut strata: BTreeMap<i32, Vec<SamplePoint>> = BTreeMap::new();

    let mut row = 0;
    while row < rows {
        if deadline_exceeded(params.timeout) {
            return Err(Error::BackendTimeout(started.elapsed().as_millis()));
        }
        let mut col = 0;
        while col < cols {
            let ref_val = unsafe { reference.get_unchecked(row, col) };
            let pred_val = unsafe { prediction.get_unchecked(row, col) };
            if !reference.is_nodata(ref_val) && !prediction.is_nodata(pred_val) {
                let (x, y) = reference.pixel_to_geo(col, row);
                if region.contains(&Point::new(x, y)) {
                    strata.entry(ref_val).or_default().push(SamplePoint {
                        row,
                        col,
                        x,
                        y,
                        reference: ref_val,
                        prediction: pred_val,
                    });
                }
            }
            col += step;
        }
        row += step;
    }

    if strata.values().all(|v| v.is_empty()) {
        return Err(Error::EmptyRegion);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
    let mut samples = Vec::new();
    for (class, candidates) in &strata {
        if deadline_exceeded(params.timeout) {
            return Err(Error::BackendTimeout(started.elapsed().as_millis()));
        }
        let drawn: Vec<SamplePoint> = candidates
            .choose_multiple(&mut rng, params.num_points)
            .copied()
            .collect();
        debug!(
            class = *class,
            candidates = candidates.len(),
            drawn = drawn.len(),
            "sampled stratum"
        );
        samples.extend(drawn);
    }

    Ok(samples)
}
