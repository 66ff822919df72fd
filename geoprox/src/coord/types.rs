//! Coordinate type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Valid latitude range
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Kilometres per degree of latitude used for bounding box approximation.
pub const KM_PER_DEGREE: f64 = 111.0;

/// A WGS84 position in degrees.
///
/// Longitude comes first everywhere inside the crate. Servers that emit
/// latitude-first tuples are swapped by the decoder before a `Coordinate`
/// is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "Vec<f64>")]
pub struct Coordinate {
    /// Longitude in degrees (east positive)
    pub lon: f64,
    /// Latitude in degrees (north positive)
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate from longitude and latitude.
    #[inline]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Builds a coordinate from a raw `(a, b)` pair, reading it as
    /// `(lat, lon)` when `lat_first` is set.
    #[inline]
    pub fn from_axis_pair(a: f64, b: f64, lat_first: bool) -> Self {
        if lat_first {
            Self::new(b, a)
        } else {
            Self::new(a, b)
        }
    }

    /// Checks that both components are finite and inside WGS84 bounds.
    pub fn validate(&self) -> Result<(), CoordError> {
        if !self.lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.lat) {
            return Err(CoordError::InvalidLatitude(self.lat));
        }
        if !self.lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.lon) {
            return Err(CoordError::InvalidLongitude(self.lon));
        }
        Ok(())
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(pair: [f64; 2]) -> Self {
        Coordinate::new(pair[0], pair[1])
    }
}

impl TryFrom<Vec<f64>> for Coordinate {
    type Error = String;

    /// Accepts GeoJSON positions; anything past the second value
    /// (elevation, measure) is ignored.
    fn try_from(position: Vec<f64>) -> Result<Self, Self::Error> {
        match position.as_slice() {
            [lon, lat, ..] => Ok(Coordinate::new(*lon, *lat)),
            _ => Err(format!(
                "position needs at least two values, got {}",
                position.len()
            )),
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let north_south = if self.lat < 0.0 { 'S' } else { 'N' };
        let east_west = if self.lon < 0.0 { 'W' } else { 'E' };
        write!(
            f,
            "{:.6}°{}, {:.6}°{}",
            self.lat.abs(),
            north_south,
            self.lon.abs(),
            east_west
        )
    }
}

/// Axis-aligned search window in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Formats the box as a WFS `bbox` parameter with an explicit CRS suffix.
    pub fn to_wfs_param(&self, crs: &str) -> String {
        format!(
            "{},{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat, crs
        )
    }

    /// Returns true if the coordinate lies inside the box (edges included).
    pub fn contains(&self, c: &Coordinate) -> bool {
        (self.min_lon..=self.max_lon).contains(&c.lon)
            && (self.min_lat..=self.max_lat).contains(&c.lat)
    }
}

/// Errors that can occur when validating coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude is outside -90..=90 or not finite
    InvalidLatitude(f64),
    /// Longitude is outside -180..=180 or not finite
    InvalidLongitude(f64),
    /// Search radius is zero, negative or not finite
    InvalidRadius(f64),
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be between {} and {})",
                    lat, MIN_LAT, MAX_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidRadius(radius) => {
                write!(f, "Invalid search radius: {} (must be positive)", radius)
            }
        }
    }
}

impl std::error::Error for CoordError {}
