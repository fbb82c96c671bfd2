//! This module converts coordinates between geographic degrees and the internal units used by the clustering math.
//!  - latitude is stored as colatitude, so internal latitude grows southward
//!  - longitude is stored as the offset east of the antimeridian

use serde::{Deserialize, Serialize};

/// Converts a latitude in degrees to internal units.
pub fn lat_to_internal(degrees: f64) -> f64 {
    90. - degrees
}

/// Converts an internal latitude back to degrees.
pub fn lat_to_degrees(unit: f64) -> f64 {
    90. - unit
}

/// Converts a longitude in degrees to internal units.
pub fn lng_to_internal(degrees: f64) -> f64 {
    degrees + 180.
}

/// Converts an internal longitude back to degrees.
pub fn lng_to_degrees(unit: f64) -> f64 {
    unit - 180.
}

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

/// A position in internal units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn to_position(self) -> Position {
        Position::new(lat_to_internal(self.lat), lng_to_internal(self.lng))
    }
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn to_coordinate(self) -> Coordinate {
        Coordinate::new(lat_to_degrees(self.lat), lng_to_degrees(self.lng))
    }
}

#[cfg(test)]
mod tests {
    use crate::convert::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_round_trip() {
        for x in [0., 90., -90., 45.5, -12.25, 48.856614] {
            assert!((lat_to_degrees(lat_to_internal(x)) - x).abs() < EPSILON);
        }
        for x in [0., 180., -180., 2.352222, -73.9857] {
            assert!((lng_to_degrees(lng_to_internal(x)) - x).abs() < EPSILON);
        }
    }

    #[test]
    fn test_latitude_grows_southward() {
        assert!(lat_to_internal(48.9) < lat_to_internal(48.8));
        assert_eq!(0., lat_to_internal(90.));
        assert_eq!(180., lat_to_internal(-90.));
    }

    #[test]
    fn test_longitude_grows_eastward() {
        assert!(lng_to_internal(2.2) < lng_to_internal(2.4));
        assert_eq!(0., lng_to_internal(-180.));
        assert_eq!(360., lng_to_internal(180.));
    }

    #[test]
    fn test_coordinate_position() {
        let position = Coordinate::new(10., 20.).to_position();
        assert_eq!(Position::new(80., 200.), position);
        assert_eq!(Coordinate::new(10., 20.), position.to_coordinate());
    }
}
