/// SRTM tile naming and geographic extent
use crate::constants::KM_PER_DEGREE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One-degree tile bounds in decimal degrees (north and east positive).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrtmTile {
    pub name: String,
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl SrtmTile {
    /// Parse a tile name such as `S27E152` (the file stem of `S27E152.hgt`).
    /// The name gives the tile's south-west corner.
    pub fn from_name(name: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let invalid = || format!("Not an SRTM tile name (expected e.g. N46E007): {}", name);
        let upper = name.to_ascii_uppercase();
        if upper.len() != 7 || !upper.is_ascii() {
            return Err(invalid().into());
        }

        let lat_sign = match &upper[0..1] {
            "N" => 1.0,
            "S" => -1.0,
            _ => return Err(invalid().into()),
        };
        let lon_sign = match &upper[3..4] {
            "E" => 1.0,
            "W" => -1.0,
            _ => return Err(invalid().into()),
        };
        let lat: f64 = upper[1..3].parse::<u8>().map_err(|_| invalid())?.into();
        let lon: f64 = upper[4..7].parse::<u16>().map_err(|_| invalid())?.into();

        let south = lat_sign * lat;
        let west = lon_sign * lon;
        // South-west corners run from S90 to N89 and from W180 to E179.
        if !(-90.0..=89.0).contains(&south) || !(-180.0..=179.0).contains(&west) {
            return Err(invalid().into());
        }
        Ok(Self {
            name: upper,
            south,
            north: south + 1.0,
            west,
            east: west + 1.0,
        })
    }

    /// Parse the tile name from a `.hgt` file path.
    pub fn from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let stem = path
            .file_stem()
            .ok_or_else(|| format!("No file name in path: {}", path.display()))?
            .to_string_lossy()
            .to_string();
        Self::from_name(&stem)
    }

    /// Ground distance covered by the tile: (east-west km, north-south km).
    /// Longitude shrinks with the cosine of the tile's mid latitude.
    pub fn extent_km(&self) -> (f64, f64) {
        let mid_lat = ((self.south + self.north) * 0.5).to_radians();
        let x = (self.east - self.west) * KM_PER_DEGREE * mid_lat.cos();
        let y = (self.north - self.south) * KM_PER_DEGREE;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_southern_eastern_tile() {
        let tile = SrtmTile::from_name("S27E152").unwrap();
        assert_eq!(tile.south, -27.0);
        assert_eq!(tile.north, -26.0);
        assert_eq!(tile.west, 152.0);
        assert_eq!(tile.east, 153.0);
    }

    #[test]
    fn parses_northern_western_tile_from_path() {
        let tile = SrtmTile::from_path(Path::new("/data/n46w122.hgt")).unwrap();
        assert_eq!(tile.name, "N46W122");
        assert_eq!(tile.south, 46.0);
        assert_eq!(tile.west, -122.0);
        assert_eq!(tile.east, -121.0);
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["X27E152", "S27Q152", "S2E152", "S27E15x", "hello"] {
            assert!(SrtmTile::from_name(name).is_err(), "{name} should fail");
        }
    }

    #[test]
    fn rejects_corners_off_the_globe() {
        for name in ["N90E000", "S91E000", "N00E180", "N00W181", "N99E999"] {
            assert!(SrtmTile::from_name(name).is_err(), "{name} should fail");
        }
    }

    #[test]
    fn accepts_extreme_valid_tiles() {
        for name in ["N89E179", "S90W180"] {
            let tile = SrtmTile::from_name(name).unwrap();
            let (x, y) = tile.extent_km();
            assert!(x > 0.0 && y > 0.0, "{name} extent {x} x {y}");
        }
    }

    #[test]
    fn equator_tile_is_square() {
        let tile = SrtmTile::from_name("N00E010").unwrap();
        let (x, y) = tile.extent_km();
        assert!((y - KM_PER_DEGREE).abs() < 1e-9);
        assert!((x - KM_PER_DEGREE * 0.5f64.to_radians().cos()).abs() < 1e-9);
        assert!(x < y);
    }
}
