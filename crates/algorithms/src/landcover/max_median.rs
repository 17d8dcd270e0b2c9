//! Max-median-probability label aggregation
//!
//! Aggregates continuous per-class probabilities first (temporal median per
//! class band), then argmaxes over the median vector. This can legitimately
//! disagree with voting on discrete labels; both are kept as independent
//! products for downstream comparison.

use ndarray::Array2;
use rayon::prelude::*;
use terracover_core::raster::{ConfidenceImage, LabelImage, Raster, LABEL_NODATA};
use terracover_core::{Error, ImageSeries, Result};

/// Compute the per-pixel class with the highest median probability.
///
/// `probability_bands` fixes the class order: class `i` is the `i`-th band.
/// Per pixel and per class, the median is taken over the images where that
/// band is valid; the label is the index of the maximum median (ties break
/// to the lowest index) and the confidence is `round(100 * max_median)`,
/// clamped to `[0, 100]`, assuming probabilities in `[0, 1]`. A pixel with
/// no valid observation for any class is masked in both outputs.
pub fn max_median_label(
    series: &ImageSeries,
    probability_bands: &[&str],
) -> Result<(LabelImage, ConfidenceImage)> {
    let first = series
        .first()
        .ok_or_else(|| Error::Other("cannot aggregate an empty series".into()))?;
    if probability_bands.is_empty() {
        return Err(Error::Other("no probability bands given".into()));
    }
    let (rows, cols) = first.shape();

    // grids[class][image]
    let mut grids = Vec::with_capacity(probability_bands.len());
    for &name in probability_bands {
        let mut class_grids = Vec::with_capacity(series.len());
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
            class_grids.push(grid);
        }
        grids.push(class_grids);
    }

    let (label_data, conf_data): (Vec<i32>, Vec<i32>) = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut out = Vec::with_capacity(cols);
            let mut values = Vec::with_capacity(series.len());
            for col in 0..cols {
                let mut best: Option<(usize, f64)> = None;

                for (class_id, class_grids) in grids.iter().enumerate() {
                    values.clear();
                    for grid in class_grids {
                        let v = unsafe { grid.get_unchecked(row, col) };
                        if !grid.is_nodata(v) {
                            values.push(v);
                        }
                    }
                    if values.is_empty() {
                        continue;
                    }

                    values.sort_by(|a, b| {
                        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
                    });
                    let n = values.len();
                    let median = if n % 2 == 0 {
                        (values[n / 2 - 1] + values[n / 2]) / 2.0
                    } else {
                        values[n / 2]
                    };

                    // Strictly greater keeps the lowest index on ties
                    match best {
                        Some((_, current)) if median <= current => {}
                        _ => best = Some((class_id, median)),
                    }
                }

                match best {
                    Some((class_id, median)) => {
                        let confidence =
                            ((100.0 * median).round() as i32).clamp(0, 100);
                        out.push((class_id as i32, confidence));
                    }
                    None => out.push((LABEL_NODATA, LABEL_NODATA)),
                }
            }
            out
        })
        .unzip();

    let reference = grids[0][0];
    let mut labels: Raster<i32> = reference.with_same_meta();
    labels.set_nodata(Some(LABEL_NODATA));
    *labels.data_mut() = Array2::from_shape_vec((rows, cols), label_data)
        .map_err(|e| Error::Other(e.to_string()))?;

    let mut confidence: Raster<i32> = reference.with_same_meta();
    confidence.set_nodata(Some(LABEL_NODATA));
    *confidence.data_mut() = Array2::from_shape_vec((rows, cols), conf_data)
        .map_err(|e| Error::Other(e.to_string()))?;

    Ok((labels, confidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use terracover_core::image::{Image, TimeStamp};

    const BANDS: [&str; 3] = ["water", "trees", "grass"];

    /// One image per entry; each entry gives one uniform value per band
    fn series_of(per_image: &[[f64; 3]]) -> ImageSeries {
        let images = per_image
            .iter()
            .enumerate()
            .map(|(i, probs)| {
                let bands = BANDS
                    .iter()
                    .zip(probs)
                    .map(|(name, &p)| {
                        let mut grid = Raster::filled(2, 2, p);
                        grid.set_nodata(Some(f64::NAN));
                        (name.to_string(), grid)
                    })
                    .collect();
                Image::from_bands(
                    TimeStamp::Date(
                        NaiveDate::from_ymd_opt(2022, 1, 1 + i as u32).unwrap(),
                    ),
                    bands,
                )
                .unwrap()
            })
            .collect();
        ImageSeries::from_images(images)
    }

    #[test]
    fn test_argmax_of_medians() {
        // Per-class medians: [0.1, 0.7, 0.2]
        let series = series_of(&[
            [0.1, 0.6, 0.2],
            [0.1, 0.7, 0.2],
            [0.1, 0.8, 0.2],
        ]);
        let (labels, confidence) = max_median_label(&series, &BANDS).unwrap();
        assert_eq!(labels.get(0, 0).unwrap(), 1);
        assert_eq!(confidence.get(0, 0).unwrap(), 70);
    }

    #[test]
    fn test_median_resists_outlier() {
        // Class 0 has one spike but a low median; class 2 wins
        let series = series_of(&[
            [0.9, 0.1, 0.5],
            [0.1, 0.1, 0.5],
            [0.1, 0.1, 0.5],
        ]);
        let (labels, confidence) = max_median_label(&series, &BANDS).unwrap();
        assert_eq!(labels.get(1, 1).unwrap(), 2);
        assert_eq!(confidence.get(1, 1).unwrap(), 50);
    }

    #[test]
    fn test_tie_takes_lowest_index() {
        let series = series_of(&[[0.4, 0.4, 0.2]]);
        let (labels, _) = max_median_label(&series, &BANDS).unwrap();
        assert_eq!(labels.get(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_fully_masked_pixel() {
        let mut images = Vec::new();
        for i in 0..2u32 {
            let bands = BANDS
                .iter()
                .map(|name| {
                    let mut grid = Raster::filled(2, 2, 0.5);
                    grid.set_nodata(Some(f64::NAN));
                    grid.set(0, 0, f64::NAN).unwrap();
                    (name.to_string(), grid)
                })
                .collect();
            images.push(
                Image::from_bands(
                    TimeStamp::Date(NaiveDate::from_ymd_opt(2022, 1, 1 + i).unwrap()),
                    bands,
                )
                .unwrap(),
            );
        }
        let series = ImageSeries::from_images(images);

        let (labels, confidence) = max_median_label(&series, &BANDS).unwrap();
        assert!(labels.is_nodata_at(0, 0).unwrap());
        assert!(confidence.is_nodata_at(0, 0).unwrap());
        assert_eq!(labels.get(1, 1).unwrap(), 0);
    }

    #[test]
    fn test_confidence_clamped() {
        let series = series_of(&[[1.2, 0.1, 0.1]]);
        let (_, confidence) = max_median_label(&series, &BANDS).unwrap();
        assert_eq!(confidence.get(0, 0).unwrap(), 100);
    }

    #[test]
    fn test_empty_band_list() {
        let series = series_of(&[[0.1, 0.2, 0.3]]);
        assert!(max_median_label(&series, &[]).is_err());
    }
}
