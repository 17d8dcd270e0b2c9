//! In-memory implementation of the collection backend contract

use geo::{BoundingRect, Geometry};
use terracover_core::backend::{CollectionBackend, ReducerKind};
use terracover_core::{Image, ImageSeries, Interval, Result};

use crate::temporal::reduce_series;

/// Backend serving a fully materialized in-memory series.
///
/// Filtering is by timestamp interval and bounding-box intersection with
/// the region; reduction delegates to [`reduce_series`]. Useful for tests
/// and for small local workloads that fit in memory.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    series: ImageSeries,
}

impl MemoryBackend {
    pub fn new(series: ImageSeries) -> Self {
        Self { series }
    }
}

impl CollectionBackend for MemoryBackend {
    fn collect(&self, interval: &Interval, region: &Geometry<f64>) -> Result<ImageSeries> {
        let time_filtered = self.series.filter_interval(interval);
        let region_bbox = match region.bounding_rect() {
            Some(rect) => rect,
            // A degenerate region constrains nothing spatially
            None => return Ok(time_filtered),
        };

        let images = time_filtered
            .iter()
            .filter(|image| match image.bands().first() {
                Some(band) => {
                    let (min_x, min_y, max_x, max_y) = band.grid.bounds();
                    min_x <= region_bbox.max().x
                        && max_x >= region_bbox.min().x
                        && min_y <= region_bbox.max().y
                        && max_y >= region_bbox.min().y
                }
                None => false,
            })
            .cloned()
            .collect();
        Ok(ImageSeries::from_images(images))
    }

    fn reduce(&self, series: &ImageSeries, kind: ReducerKind) -> Result<Image> {
        reduce_series(series, kind)
    }
}
