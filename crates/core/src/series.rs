//! Time-ordered image series

use crate::error::Result;
use crate::image::Image;
use crate::raster::Raster;
use crate::time::Interval;
use chrono::NaiveDate;

/// Unit for time-delta bands relative to a baseline date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeDeltaUnit {
    Days,
    Months,
    Years,
}

impl TimeDeltaUnit {
    /// Convert a day span to this unit (mean month/year lengths)
    fn from_days(&self, days: i64) -> f64 {
        match self {
            Self::Days => days as f64,
            Self::Months => days as f64 / 30.4375,
            Self::Years => days as f64 / 365.25,
        }
    }
}

/// An ordered sequence of images sharing a band schema.
///
/// Ordering is chronological by timestamp; acquisitions are not required
/// to be contiguous. The series itself is read-only input to the
/// aggregation algorithms; all transformations return a new series.
#[derive(Debug, Clone, Default)]
pub struct ImageSeries {
    images: Vec<Image>,
}

impl ImageSeries {
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Build a series from images, sorting chronologically
    pub fn from_images(mut images: Vec<Image>) -> Self {
        images.sort_by_key(|i| i.timestamp().date());
        Self { images }
    }

    /// Append an image, keeping chronological order
    pub fn push(&mut self, image: Image) {
        let date = image.timestamp().date();
        let pos = self
            .images
            .partition_point(|i| i.timestamp().date() <= date);
        self.images.insert(pos, image);
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Image> {
        self.images.iter()
    }

    pub fn first(&self) -> Option<&Image> {
        self.images.first()
    }

    /// Band names of the first image, the series' band schema
    pub fn band_names(&self) -> Vec<&str> {
        self.first().map(|i| i.band_names()).unwrap_or_default()
    }

    /// Sub-series of images whose timestamps fall within the interval
    /// (inclusive; exact-date match when `start == end`)
    pub fn filter_interval(&self, interval: &Interval) -> Self {
        let images = self
            .images
            .iter()
            .filter(|i| interval.contains(i.timestamp().date()))
            .cloned()
            .collect();
        Self { images }
    }

    /// New series restricted to the named bands, in the given order
    pub fn select_bands(&self, names: &[&str]) -> Result<Self> {
        let images = self
            .images
            .iter()
            .map(|i| i.select(names))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { images })
    }

    /// New series with the named bands removed from every image
    pub fn drop_bands(&self, names: &[&str]) -> Self {
        let images = self.images.iter().map(|i| i.drop_bands(names)).collect();
        Self { images }
    }

    /// New series with every image's bands renamed, in order
    pub fn rename_bands(&self, names: &[&str]) -> Result<Self> {
        let images = self
            .images
            .iter()
            .map(|i| i.rename(names))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { images })
    }

    /// New series where each image gains a constant `time_delta` band
    /// holding its offset from `baseline` in the given unit.
    pub fn with_time_delta_band(&self, baseline: NaiveDate, unit: TimeDeltaUnit) -> Result<Self> {
        let images = self
            .images
            .iter()
            .map(|image| {
                let days = (image.timestamp().date() - baseline).num_days();
                let delta = unit.from_days(days);
                let grid = match image.bands().first() {
                    Some(band) => band.grid.like(delta),
                    None => {
                        let (rows, cols) = image.shape();
                        Raster::filled(rows, cols, delta)
                    }
                };
                image.add_band("time_delta", grid)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { images })
    }
}

impl<'a> IntoIterator for &'a ImageSeries {
    type Item = &'a Image;
    type IntoIter = std::slice::Iter<'a, Image>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
