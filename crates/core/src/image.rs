//! Multi-band images with temporal metadata

use crate::error::{Error, Result};
use crate::raster::Raster;
use crate::time::Interval;
use chrono::NaiveDate;

/// Temporal metadata attached to an image: either a single acquisition
/// date or the aggregation period it was reduced over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStamp {
    /// Single acquisition (or midpoint) date
    Date(NaiveDate),
    /// Aggregation period with start and end dates
    Period { start: NaiveDate, end: NaiveDate },
}

impl TimeStamp {
    /// Representative date used for chronological ordering and interval
    /// membership: the date itself, or the period start.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(d) => *d,
            Self::Period { start, .. } => *start,
        }
    }
}

/// A named band within an image
#[derive(Debug, Clone)]
pub struct Band {
    pub name: String,
    pub grid: Raster<f64>,
}

/// A multi-band image: an ordered list of named bands sharing one grid
/// shape, plus a timestamp. Immutable once produced; all transformations
/// return new images.
#[derive(Debug, Clone)]
pub struct Image {
    bands: Vec<Band>,
    timestamp: TimeStamp,
}

impl Image {
    /// Create an image from named bands. All bands must share the same shape.
    pub fn from_bands(timestamp: TimeStamp, bands: Vec<(String, Raster<f64>)>) -> Result<Self> {
        let mut out = Vec::with_capacity(bands.len());
        let mut shape: Option<(usize, usize)> = None;

        for (name, grid) in bands {
            match shape {
                None => shape = Some(grid.shape()),
                Some((er, ec)) => {
                    let (ar, ac) = grid.shape();
                    if (ar, ac) != (er, ec) {
                        return Err(Error::SizeMismatch { er, ec, ar, ac });
                    }
                }
            }
            out.push(Band { name, grid });
        }

        Ok(Self {
            bands: out,
            timestamp,
        })
    }

    /// Timestamp metadata
    pub fn timestamp(&self) -> TimeStamp {
        self.timestamp
    }

    /// Copy of this image tagged with a different timestamp
    pub fn with_timestamp(&self, timestamp: TimeStamp) -> Self {
        Self {
            bands: self.bands.clone(),
            timestamp,
        }
    }

    /// Tag with an aggregation period
    pub fn with_period(&self, interval: &Interval) -> Self {
        self.with_timestamp(TimeStamp::Period {
            start: interval.start,
            end: interval.end,
        })
    }

    /// Ordered band list
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Ordered band names
    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    /// Number of bands
    pub fn num_bands(&self) -> usize {
        self.bands.len()
    }

    /// Look up a band by name
    pub fn band(&self, name: &str) -> Result<&Raster<f64>> {
        self.bands
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.grid)
            .ok_or_else(|| Error::UnknownBand(name.to_string()))
    }

    /// Grid shape shared by all bands, (0, 0) for a band-less image
    pub fn shape(&self) -> (usize, usize) {
        self.bands.first().map(|b| b.grid.shape()).unwrap_or((0, 0))
    }

    /// New image restricted to the named bands, in the given order
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let mut bands = Vec::with_capacity(names.len());
        for name in names {
            let grid = self.band(name)?.clone();
            bands.push(Band {
                name: name.to_string(),
                grid,
            });
        }
        Ok(Self {
            bands,
            timestamp: self.timestamp,
        })
    }

    /// New image with the named bands removed; unknown names are ignored
    pub fn drop_bands(&self, names: &[&str]) -> Self {
        let bands = self
            .bands
            .iter()
            .filter(|b| !names.contains(&b.name.as_str()))
            .cloned()
            .collect();
        Self {
            bands,
            timestamp: self.timestamp,
        }
    }

    /// New image with all bands renamed, in order.
    ///
    /// # Errors
    /// `Error::BandMismatch` when the name count differs from the band count.
    pub fn rename(&self, names: &[&str]) -> Result<Self> {
        if names.len() != self.bands.len() {
            return Err(Error::BandMismatch {
                expected: self.bands.len(),
                actual: names.len(),
            });
        }
        let bands = self
            .bands
            .iter()
            .zip(names)
            .map(|(b, name)| Band {
                name: name.to_string(),
                grid: b.grid.clone(),
            })
            .collect();
        Ok(Self {
            bands,
            timestamp: self.timestamp,
        })
    }

    /// New image with an extra band appended
    pub fn add_band(&self, name: impl Into<String>, grid: Raster<f64>) -> Result<Self> {
        let mut bands: Vec<(String, Raster<f64>)> = self
            .bands
            .iter()
            .map(|b| (b.name.clone(), b.grid.clone()))
            .collect();
        bands.push((name.into(), grid));
        Self::from_bands(self.timestamp, bands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn two_band_image() -> Image {
        Image::from_bands(
            TimeStamp::Date(date(2022, 6, 1)),
            vec![
                ("water".to_string(), Raster::filled(3, 3, 0.2)),
                ("trees".to_string(), Raster::filled(3, 3, 0.8)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_band_lookup() {
        let image = two_band_image();
        assert_eq!(image.band_names(), vec!["water", "trees"]);
        assert!((image.band("trees").unwrap().get(0, 0).unwrap() - 0.8).abs() < 1e-10);
        assert!(matches!(image.band("grass"), Err(Error::UnknownBand(_))));
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let result = Image::from_bands(
            TimeStamp::Date(date(2022, 6, 1)),
            vec![
                ("a".to_string(), Raster::filled(3, 3, 0.0)),
                ("b".to_string(), Raster::filled(4, 3, 0.0)),
            ],
        );
        assert!(matches!(result, Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_select_preserves_order() {
        let image = two_band_image();
        let selected = image.select(&["trees", "water"]).unwrap();
        assert_eq!(selected.band_names(), vec!["trees", "water"]);
    }

    #[test]
    fn test_rename_count_check() {
        let image = two_band_image();
        let renamed = image.rename(&["label", "confidence"]).unwrap();
        assert_eq!(renamed.band_names(), vec!["label", "confidence"]);
        assert!(matches!(
            image.rename(&["only_one"]),
            Err(Error::BandMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_drop_bands() {
        let image = two_band_image();
        let dropped = image.drop_bands(&["water", "missing"]);
        assert_eq!(dropped.band_names(), vec!["trees"]);
    }

    #[test]
    fn test_period_tagging() {
        let image = two_band_image();
        let interval = Interval::new(date(2022, 6, 1), date(2022, 6, 30)).unwrap();
        let tagged = image.with_period(&interval);
        assert_eq!(
            tagged.timestamp(),
            TimeStamp::Period {
                start: date(2022, 6, 1),
                end: date(2022, 6, 30)
            }
        );
        assert_eq!(tagged.timestamp().date(), date(2022, 6, 1));
    }
}
