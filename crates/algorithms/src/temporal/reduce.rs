//! Per-interval temporal reduction of image series
//!
//! Reduces the sub-series falling within each interval to a single
//! aggregate image using a selectable per-pixel statistic, respecting each
//! pixel's validity mask. Intervals with no observations are skipped with
//! a warning rather than failing the whole reduction.

use ndarray::Array2;
use rayon::prelude::*;
use terracover_core::image::TimeStamp;
use terracover_core::raster::Raster;
use terracover_core::{Error, Image, ImageSeries, Interval, ReducerKind, Result};
use tracing::warn;

/// How reduced images are tagged with temporal metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataMode {
    /// Tag with the interval's start and end dates
    #[default]
    AggregationPeriod,
    /// Tag with the interval's temporal midpoint
    Midpoint,
}

/// Parameters for [`reduce_to_intervals`]
#[derive(Debug, Clone)]
pub struct ReduceParams {
    /// Per-pixel statistic applied across each interval's sub-series
    pub method: ReducerKind,
    /// Optional output band names; count must match the band count
    pub rename: Option<Vec<String>>,
    /// Temporal metadata attached to each reduced image
    pub metadata: MetadataMode,
}

impl Default for ReduceParams {
    fn default() -> Self {
        Self {
            method: ReducerKind::Median,
            rename: None,
            metadata: MetadataMode::AggregationPeriod,
        }
    }
}

/// Outcome of reducing one interval, kept for diagnostics
#[derive(Debug)]
pub struct IntervalReduction {
    pub interval: Interval,
    pub result: Result<Image>,
}

/// Apply a per-pixel statistic to the valid observations of one pixel.
///
/// `values` holds only valid observations; an empty slice yields NaN.
/// Mode ties break to the lowest value.
fn apply_statistic(kind: ReducerKind, values: &mut Vec<f64>) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    match kind {
        ReducerKind::Mean => values.iter().sum::<f64>() / values.len() as f64,
        ReducerKind::Median => {
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let n = values.len();
            if n % 2 == 0 {
                (values[n / 2 - 1] + values[n / 2]) / 2.0
            } else {
                values[n / 2]
            }
        }
        ReducerKind::Mode => {
            // Ascending sort + run-length scan; a strictly greater count is
            // required to displace the current mode, so ties keep the
            // lowest value.
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            let mut mode = values[0];
            let mut mode_count = 0usize;
            let mut run_value = values[0];
            let mut run_count = 0usize;
            for &v in values.iter() {
                if v == run_value {
                    run_count += 1;
                } else {
                    if run_count > mode_count {
                        mode = run_value;
                        mode_count = run_count;
                    }
                    run_value = v;
                    run_count = 1;
                }
            }
            if run_count > mode_count {
                mode = run_value;
            }
            mode
        }
        ReducerKind::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        ReducerKind::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
    }
}

/// Reduce a whole series to a single image with the given statistic,
/// band-wise, respecting validity masks.
///
/// Pixels with no valid observation in any image stay masked (NaN) in the
/// output. The result carries the first image's timestamp; per-interval
/// callers retag it. A single-image series reduces to that image's values.
pub fn reduce_series(series: &ImageSeries, kind: ReducerKind) -> Result<Image> {
    let first = series
        .first()
        .ok_or_else(|| Error::Other("cannot reduce an empty series".into()))?;
    let band_names = first.band_names();
    let (rows, cols) = first.shape();

    let mut out_bands = Vec::with_capacity(band_names.len());
    for &name in &band_names {
        let mut grids = Vec::with_capacity(series.len());
        for image in series {
            let grid = image.band(name)?;
            if grid.shape() != (rows, cols) {
                return Err(Error::SizeMismatch {
                    er: rows,
                    ec: cols,
                    ar: grid.rows(),
                    ac: grid.cols(),
                });
            }
            grids.push(grid);
        }

        let data: Vec<f64> = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut row_data = vec![f64::NAN; cols];
                let mut values = Vec::with_capacity(grids.len());
                for (col, out) in row_data.iter_mut().enumerate() {
                    values.clear();
                    for grid in &grids {
                        let v = unsafe { grid.get_unchecked(row, col) };
                        if !grid.is_nodata(v) {
                            values.push(v);
                        }
                    }
                    *out = apply_statistic(kind, &mut values);
                }
                row_data
            })
            .collect();

        let mut raster = Raster::from_array(
            Array2::from_shape_vec((rows, cols), data)
                .map_err(|e| Error::Other(e.to_string()))?,
        );
        raster.set_transform(*grids[0].transform());
        raster.set_nodata(Some(f64::NAN));
        out_bands.push((name.to_string(), raster));
    }

    Image::from_bands(first.timestamp(), out_bands)
}

/// Reduce a series into per-interval aggregates, keeping the per-interval
/// outcome (success or failure) for diagnostics.
///
/// An interval whose sub-series is empty records `Error::EmptyInterval`;
/// other intervals are still processed.
pub fn reduce_to_intervals_detailed(
    series: &ImageSeries,
    intervals: &[Interval],
    params: &ReduceParams,
) -> Result<Vec<IntervalReduction>> {
    // Rename mismatches are a caller bug and fail the whole operation
    if let (Some(names), Some(first)) = (&params.rename, series.first()) {
        if names.len() != first.num_bands() {
            return Err(Error::BandMismatch {
                expected: first.num_bands(),
                actual: names.len(),
            });
        }
    }

    let mut outcomes = Vec::with_capacity(intervals.len());
    for interval in intervals {
        let subset = series.filter_interval(interval);
        let result = if subset.is_empty() {
            Err(Error::EmptyInterval {
                start: interval.start.to_string(),
                end: interval.end.to_string(),
            })
        } else {
            reduce_one_interval(&subset, interval, params)
        };
        outcomes.push(IntervalReduction {
            interval: *interval,
            result,
        });
    }
    Ok(outcomes)
}

fn reduce_one_interval(
    subset: &ImageSeries,
    interval: &Interval,
    params: &ReduceParams,
) -> Result<Image> {
    let mut image = reduce_series(subset, params.method)?;

    if let Some(names) = &params.rename {
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        image = image.rename(&refs)?;
    }

    Ok(match params.metadata {
        MetadataMode::AggregationPeriod => image.with_period(interval),
        MetadataMode::Midpoint => image.with_timestamp(TimeStamp::Date(interval.midpoint())),
    })
}

/// Reduce a series into one aggregate image per non-empty interval.
///
/// Empty intervals are logged and skipped; the returned series holds one
/// image per non-empty interval, in interval order. A shorter-than-expected
/// result is a normal outcome, not an error.
pub fn reduce_to_intervals(
    series: &ImageSeries,
    intervals: &[Interval],
    params: &ReduceParams,
) -> Result<ImageSeries> {
    let outcomes = reduce_to_intervals_detailed(series, intervals, params)?;

    let mut images = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome.result {
            Ok(image) => images.push(image),
            Err(err) => warn!(interval = %outcome.interval, error = %err, "skipping interval"),
        }
    }
    Ok(ImageSeries::from_images(images))
}
