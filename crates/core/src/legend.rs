//! Class legends: ordered class-name to color mappings
//!
//! The legend fixes the class-index order used by probability bands and by
//! confusion-matrix axes. The nine-class land-cover legend is the default;
//! any ordered name/color list works.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// RGB color as (r, g, b) with values in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` hex string
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(Error::Other(format!("invalid hex color: {hex}")));
        }
        let parse = |s: &str| {
            u8::from_str_radix(s, 16).map_err(|_| Error::Other(format!("invalid hex color: {hex}")))
        };
        Ok(Self {
            r: parse(&digits[0..2])?,
            g: parse(&digits[2..4])?,
            b: parse(&digits[4..6])?,
        })
    }
}

/// One legend entry: class name and display color
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegendEntry {
    pub name: String,
    pub color: Rgb,
}

/// Ordered mapping from class name to display color.
///
/// Entry order defines class IDs: class `i` is the `i`-th entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Legend {
    entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build a legend from ordered (name, color) pairs
    pub fn new(entries: Vec<(impl Into<String>, Rgb)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, color)| LegendEntry {
                    name: name.into(),
                    color,
                })
                .collect(),
        }
    }

    /// The default nine-class land-cover legend for per-class
    /// probability collections.
    pub fn land_cover() -> Self {
        Self::new(vec![
            ("water", Rgb::new(0x41, 0x9B, 0xDF)),
            ("trees", Rgb::new(0x39, 0x7D, 0x49)),
            ("grass", Rgb::new(0x88, 0xB0, 0x53)),
            ("flooded_vegetation", Rgb::new(0x7A, 0x87, 0xC6)),
            ("crops", Rgb::new(0xE4, 0x96, 0x35)),
            ("shrub_and_scrub", Rgb::new(0xDF, 0xC3, 0x5A)),
            ("built", Rgb::new(0xC4, 0x28, 0x1B)),
            ("bare", Rgb::new(0xA5, 0x9B, 0x8F)),
            ("snow_and_ice", Rgb::new(0xB3, 0x9F, 0xE1)),
        ])
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }

    /// Ordered class names; also the probability band order
    pub fn class_names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// Class ID for a name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Display color for a class ID
    pub fn color(&self, class_id: usize) -> Option<Rgb> {
        self.entries.get(class_id).map(|e| e.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_land_cover_legend_order() {
        let legend = Legend::land_cover();
        assert_eq!(legend.len(), 9);
        assert_eq!(legend.index_of("water"), Some(0));
        assert_eq!(legend.index_of("built"), Some(6));
        assert_eq!(legend.index_of("urban"), None);
        assert_eq!(legend.class_names()[8], "snow_and_ice");
    }

    #[test]
    fn test_colors() {
        let legend = Legend::land_cover();
        assert_eq!(legend.color(0), Some(Rgb::new(0x41, 0x9B, 0xDF)));
        assert_eq!(legend.color(9), None);
    }

    #[test]
    fn test_serde_roundtrip() {
        let legend = Legend::land_cover();
        let json = serde_json::to_string(&legend).unwrap();
        let back: Legend = serde_json::from_str(&json).unwrap();
        assert_eq!(back.class_names(), legend.class_names());
        assert_eq!(back.color(0), legend.color(0));
    }

    #[test]
    fn test_hex_parse() {
        assert_eq!(Rgb::from_hex("#419BDF").unwrap(), Rgb::new(0x41, 0x9B, 0xDF));
        assert_eq!(Rgb::from_hex("c4281b").unwrap(), Rgb::new(0xC4, 0x28, 0x1B));
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_custom_legend() {
        let legend = Legend::new(vec![
            ("forest", Rgb::new(0, 128, 0)),
            ("water", Rgb::new(0, 0, 255)),
        ]);
        assert_eq!(legend.len(), 2);
        assert_eq!(legend.index_of("water"), Some(1));
    }
}
