//! Backend contract for image-collection storage and compute
//!
//! The aggregation algorithms are expressed against this contract rather
//! than a concrete store, so they compose as side-effect-free steps and a
//! backend is free to evaluate them lazily or in a distributed fashion.
//! Backend failures (`Error::BackendTimeout`, `Error::BackendUnavailable`)
//! propagate to the caller untouched; no retries happen at this layer.

use crate::error::{Error, Result};
use crate::image::Image;
use crate::series::ImageSeries;
use crate::time::Interval;
use geo_types::Geometry;
use std::str::FromStr;

/// Per-pixel statistic applied across the images of a series.
///
/// Replaces a name-to-reducer lookup table with an enumerated kind and a
/// pure dispatch at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducerKind {
    Mean,
    Median,
    Mode,
    Max,
    Min,
}

impl FromStr for ReducerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            other => Err(Error::UnknownReducer(other.to_string())),
        }
    }
}

/// Contract consumed from the raster storage/compute collaborator.
///
/// Given a time range and spatial region it returns a filtered series;
/// given a series and a reducer kind it returns a single reduced image.
pub trait CollectionBackend {
    /// Series of images acquired within `interval` whose extent intersects
    /// `region`, in chronological order.
    fn collect(&self, interval: &Interval, region: &Geometry<f64>) -> Result<ImageSeries>;

    /// Reduce a series to a single image with the given per-pixel statistic,
    /// band-wise, respecting validity masks.
    fn reduce(&self, series: &ImageSeries, kind: ReducerKind) -> Result<Image>;
}
