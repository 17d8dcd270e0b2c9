//! Raster data structures and operations

mod element;
mod geotransform;
mod grid;

pub use element::RasterElement;
pub use geotransform::GeoTransform;
pub use grid::Raster;

/// Single-band integer raster of class assignments, nodata `-1`.
pub type LabelImage = Raster<i32>;

/// Single-band integer raster of confidence scores in `[0, 100]`,
/// masked identically to its [`LabelImage`], nodata `-1`.
pub type ConfidenceImage = Raster<i32>;

/// Sentinel no-data value for label and confidence rasters.
pub const LABEL_NODATA: i32 = -1;
