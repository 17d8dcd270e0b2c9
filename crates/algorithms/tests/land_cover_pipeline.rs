//! End-to-end land-cover aggregation pipeline
//!
//! Runs the full flow against the in-memory backend: interval generation,
//! per-interval reduction, both label aggregators and accuracy assessment.

use chrono::NaiveDate;
use geo::{Geometry, Rect};
use terracover_algorithms::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn label_image(d: NaiveDate, label: f64) -> Image {
    let mut grid = Raster::filled(4, 4, label);
    grid.set_nodata(Some(f64::NAN));
    Image::from_bands(TimeStamp::Date(d), vec![("label".to_string(), grid)]).unwrap()
}

fn whole_region() -> Geometry<f64> {
    Geometry::Rect(Rect::new((-1.0, -5.0), (5.0, 1.0)))
}

/// Three monthly intervals with label pairs [0,0], [1,1], [0,1]:
/// mode labels [0, 1, 0] (tie-break to the lower class) with
/// confidences [100, 100, 50].
#[test]
fn test_monthly_mode_label_scenario() {
    let series = ImageSeries::from_images(vec![
        label_image(date(2022, 1, 5), 0.0),
        label_image(date(2022, 1, 20), 0.0),
        label_image(date(2022, 2, 5), 1.0),
        label_image(date(2022, 2, 20), 1.0),
        label_image(date(2022, 3, 5), 0.0),
        label_image(date(2022, 3, 20), 1.0),
    ]);
    let backend = MemoryBackend::new(series);

    let intervals =
        generate_intervals(date(2022, 1, 1), date(2022, 3, 31), PeriodFrequency::Monthly)
            .unwrap();
    assert_eq!(intervals.len(), 3);

    let expected = [(0, 100), (1, 100), (0, 50)];
    for (interval, (label, confidence)) in intervals.iter().zip(expected) {
        let subset = backend.collect(interval, &whole_region()).unwrap();
        assert_eq!(subset.len(), 2);

        let (labels, conf) = mode_label(&subset, "label").unwrap();
        assert_eq!(labels.get(2, 2).unwrap(), label);
        assert_eq!(conf.get(2, 2).unwrap(), confidence);
    }
}

#[test]
fn test_interval_reduction_skips_empty_month() {
    let series = ImageSeries::from_images(vec![
        label_image(date(2022, 1, 5), 2.0),
        label_image(date(2022, 1, 20), 4.0),
        // February left empty on purpose
        label_image(date(2022, 3, 10), 8.0),
    ]);

    let intervals =
        generate_intervals(date(2022, 1, 1), date(2022, 3, 31), PeriodFrequency::Monthly)
            .unwrap();
    let params = ReduceParams {
        method: ReducerKind::Mean,
        rename: Some(vec!["label_mean".to_string()]),
        metadata: MetadataMode::AggregationPeriod,
    };
    let reduced = reduce_to_intervals(&series, &intervals, &params).unwrap();

    // February is skipped, not an error
    assert_eq!(reduced.len(), 2);

    let january = reduced.first().unwrap();
    assert_eq!(january.band_names(), vec!["label_mean"]);
    assert!((january.band("label_mean").unwrap().get(0, 0).unwrap() - 3.0).abs() < 1e-10);
    assert_eq!(
        january.timestamp(),
        TimeStamp::Period {
            start: date(2022, 1, 1),
            end: date(2022, 1, 31)
        }
    );
}

/// Probability flow with the default nine-class legend: band order fixes
/// class IDs, argmax of medians picks the label.
#[test]
fn test_max_median_with_legend_band_order() {
    let legend = Legend::land_cover();
    let band_names = legend.class_names();

    let mut images = Vec::new();
    for (i, trees_prob) in [0.6, 0.7, 0.8].iter().enumerate() {
        let bands = band_names
            .iter()
            .map(|name| {
                let p = if *name == "trees" {
                    *trees_prob
                } else {
                    (1.0 - trees_prob) / 8.0
                };
                let mut grid = Raster::filled(4, 4, p);
                grid.set_nodata(Some(f64::NAN));
                (name.to_string(), grid)
            })
            .collect();
        images.push(
            Image::from_bands(TimeStamp::Date(date(2022, 6, 1 + i as u32)), bands).unwrap(),
        );
    }
    let series = ImageSeries::from_images(images);

    let (labels, confidence) = max_median_label(&series, &band_names).unwrap();
    assert_eq!(labels.get(1, 1).unwrap() as usize, legend.index_of("trees").unwrap());
    assert_eq!(confidence.get(1, 1).unwrap(), 70);
}

#[test]
fn test_assessment_of_aggregated_labels() {
    // Two interleaved classes, prediction degraded in one quadrant
    let mut reference: Raster<i32> = Raster::new(8, 8);
    reference.set_nodata(Some(LABEL_NODATA));
    let mut prediction: Raster<i32> = Raster::new(8, 8);
    prediction.set_nodata(Some(LABEL_NODATA));
    for row in 0..8 {
        for col in 0..8 {
            let class = if row < 4 { 0 } else { 1 };
            reference.set(row, col, class).unwrap();
            let predicted = if row < 4 && col >= 4 { 1 } else { class };
            prediction.set(row, col, predicted).unwrap();
        }
    }

    let region = Geometry::Rect(Rect::new((-1.0, -9.0), (9.0, 1.0)));
    let params = AssessParams {
        sample: SampleParams {
            num_points: 100, // exhaustive for this raster
            scale: 1.0,
            seed: 42,
            timeout: None,
        },
        num_classes: Some(2),
    };

    let (matrix, accuracy) = assess(&reference, &prediction, &region, &params).unwrap();
    assert_eq!(matrix.total(), 64);
    assert_eq!(matrix.get(0, 0), Some(16));
    assert_eq!(matrix.get(0, 1), Some(16));
    assert_eq!(matrix.get(1, 1), Some(32));
    assert!((accuracy - 0.75).abs() < 1e-10);

    let table = matrix.normalized_table(&["water", "trees"]).unwrap();
    assert!((table.rows[0][0] - 0.5).abs() < 1e-10);
    assert!((table.rows[1][1] - 1.0).abs() < 1e-10);
}

#[test]
fn test_identical_prediction_is_diagonal() {
    let mut labels: Raster<i32> = Raster::new(6, 6);
    labels.set_nodata(Some(LABEL_NODATA));
    for row in 0..6 {
        for col in 0..6 {
            labels.set(row, col, ((row + col) % 3) as i32).unwrap();
        }
    }

    let region = Geometry::Rect(Rect::new((-1.0, -7.0), (7.0, 1.0)));
    let params = AssessParams {
        sample: SampleParams {
            num_points: 50,
            scale: 1.0,
            seed: 7,
            timeout: None,
        },
        num_classes: Some(3),
    };

    let (matrix, accuracy) = assess(&labels, &labels.clone(), &region, &params).unwrap();
    assert!((accuracy - 1.0).abs() < 1e-10);
    for r in 0..3 {
        for c in 0..3 {
            if r != c {
                assert_eq!(matrix.get(r, c), Some(0));
            }
        }
    }
}
