//! # TerraCover Core
//!
//! Core types for temporal land-cover aggregation.
//!
//! This crate provides:
//! - `Raster<T>`: generic raster grid with validity (no-data) handling
//! - `Image` / `ImageSeries`: multi-band images with temporal metadata
//! - `Interval` / `PeriodFrequency`: calendar partitioning of date ranges
//! - `Legend`: ordered class-name to color mappings
//! - `CollectionBackend`: contract for the storage/compute collaborator

pub mod backend;
pub mod error;
pub mod image;
pub mod legend;
pub mod raster;
pub mod series;
pub mod time;

pub use backend::{CollectionBackend, ReducerKind};
pub use error::{Error, Result};
pub use image::{Band, Image, TimeStamp};
pub use legend::{Legend, LegendEntry, Rgb};
pub use raster::{ConfidenceImage, GeoTransform, LabelImage, Raster, RasterElement, LABEL_NODATA};
pub use series::{ImageSeries, TimeDeltaUnit};
pub use time::{generate_intervals, Interval, PeriodFrequency};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backend::{CollectionBackend, ReducerKind};
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, TimeStamp};
    pub use crate::legend::Legend;
    pub use crate::raster::{
        ConfidenceImage, GeoTransform, LabelImage, Raster, RasterElement, LABEL_NODATA,
    };
    pub use crate::series::ImageSeries;
    pub use crate::time::{generate_intervals, Interval, PeriodFrequency};
}
