//! Temporal mode label aggregation
//!
//! Votes on the discrete label band across a series: each pixel takes the
//! most frequent label among its valid observations, with the fraction of
//! matching observations as the confidence score.

use ndarray::Array2;
use rayon::prelude::*;
use terracover_core::raster::{ConfidenceImage, LabelImage, Raster, LABEL_NODATA};
use terracover_core::{Error, ImageSeries, Result};

/// Compute the per-pixel temporal mode of a discrete label band, with a
/// match-fraction confidence.
///
/// Per pixel, over the images where the band is valid: the most frequent
/// label wins; ties break to the lowest class ID (with short series two
/// labels are often tied, so this is load-bearing). Confidence is
/// `round(100 * match_count / valid_count)` in `[0, 100]`. Pixels with zero
/// valid observations are masked in both outputs.
pub fn mode_label(series: &ImageSeries, band: &str) -> Result<(LabelImage, ConfidenceImage)> {
    let first = series
        .first()
        .ok_or_else(|| Error::Other("cannot aggregate an empty series".into()))?;
    let (rows, cols) = first.shape();

    let mut grids = Vec::with_capacity(series.len());
    for image in series {
        let grid = image.band(band)?;
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

    let (label_data, conf_data): (Vec<i32>, Vec<i32>) = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = Vec::with_capacity(cols);
            let mut observed = Vec::with_capacity(grids.len());
            for col in 0..cols {
                observed.clear();
                for grid in &grids {
                    let v = unsafe { grid.get_unchecked(row, col) };
                    if !grid.is_nodata(v) {
                        observed.push(v.round() as i32);
                    }
                }

                if observed.is_empty() {
                    out.push((LABEL_NODATA, LABEL_NODATA));
                    continue;
                }

                // Ascending sort; a strictly greater run is needed to win,
                // so ties keep the lowest class ID
                observed.sort_unstable();
                let mut mode = observed[0];
                let mut mode_count = 0usize;
                let mut run_value = observed[0];
                let mut run_count = 0usize;
                for &v in observed.iter() {
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
                    mode_count = run_count;
                }

                let confidence =
                    (100.0 * mode_count as f64 / observed.len() as f64).round() as i32;
                out.push((mode, confidence));
            }
            out
        })
        .unzip();

    let mut labels: Raster<i32> = grids[0].with_same_meta();
    labels.set_nodata(Some(LABEL_NODATA));
    *labels.data_mut() = Array2::from_shape_vec((rows, cols), label_data)
        .map_err(|e| Error::Other(e.to_string()))?;

    let mut confidence: Raster<i32> = grids[0].with_same_meta();
    confidence.set_nodata(Some(LABEL_NODATA));
    *confidence.data_mut() = Array2::from_shape_vec((rows, cols), conf_data)
        .map_err(|e| Error::Other(e.to_string()))?;

    Ok((labels, confidence))
}
