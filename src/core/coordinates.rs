//! Core coordinate utilities
//!
//! Point and grid types shared by the forward models:
//! - Spherical geocentric points (longitude, spherical latitude, radius)
//! - Geodetic points (longitude, geodetic latitude, height above the ellipsoid)
//! - Regions and regular grids of observation points
//!
//! Angles are stored in decimal degrees, distances in meters.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ========================= Points =========================

/// Point in geocentric spherical coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphericalPoint {
    pub longitude: f64,
    /// Spherical (geocentric) latitude
    pub latitude: f64,
    pub radius: f64,
}

impl SphericalPoint {
    pub fn new(longitude: f64, latitude: f64, radius: f64) -> Self {
        Self {
            longitude,
            latitude,
            radius,
        }
    }

    /// Build a point after checking latitude and radius ranges
    pub fn checked(longitude: f64, latitude: f64, radius: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidCoordinate(format!(
                "Invalid latitude: {:?}",
                latitude
            )));
        }
        if !longitude.is_finite() {
            return Err(Error::InvalidCoordinate(format!(
                "Invalid longitude: {:?}",
                longitude
            )));
        }
        if !(radius.is_finite() && radius >= 0.0) {
            return Err(Error::InvalidCoordinate(format!(
                "Invalid radius: {:?}",
                radius
            )));
        }
        Ok(Self::new(longitude, latitude, radius))
    }

    /// Longitude and latitude in radians
    pub fn as_radians(&self) -> (f64, f64) {
        (self.longitude.to_radians(), self.latitude.to_radians())
    }

    /// Geocentric Cartesian coordinates (x towards lon 0, z towards the north pole)
    pub fn to_cartesian(&self) -> [f64; 3] {
        let (lon, lat) = self.as_radians();
        let r = lat.cos() * self.radius;
        [r * lon.cos(), r * lon.sin(), lat.sin() * self.radius]
    }

    /// Euclidean distance between two points
    pub fn distance(&self, other: &SphericalPoint) -> f64 {
        let (lon1, lat1) = self.as_radians();
        let (lon2, lat2) = other.as_radians();
        let cospsi = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
        let squared =
            self.radius.powi(2) + other.radius.powi(2) - 2.0 * self.radius * other.radius * cospsi;
        // Rounding can push coincident points slightly negative
        squared.max(0.0).sqrt()
    }
}

/// Point in geodetic coordinates relative to a reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPoint {
    pub longitude: f64,
    pub latitude: f64,
    /// Height above the ellipsoid
    pub height: f64,
}

impl GeodeticPoint {
    pub fn new(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }
}

// ========================= Regions and grids =========================

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Region {
    pub fn new(west: f64, east: f64, south: f64, north: f64) -> Result<Self> {
        let boundaries = [west, east, south, north];
        let invalid = |reason: &str| Error::InvalidRegion {
            boundaries,
            reason: reason.to_string(),
        };
        if boundaries.iter().any(|v| !v.is_finite()) {
            return Err(invalid("boundaries must be finite"));
        }
        if west >= east {
            return Err(invalid("west must be lower than east"));
        }
        if south >= north {
            return Err(invalid("south must be lower than north"));
        }
        if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
            return Err(invalid("latitudes must be within [-90, 90]"));
        }
        Ok(Self {
            west,
            east,
            south,
            north,
        })
    }

    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        (self.west..=self.east).contains(&longitude)
            && (self.south..=self.north).contains(&latitude)
    }
}

/// Regular grid of observation points at constant radius
///
/// Values are stored row-major: latitude varies along rows, longitude along columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub longitude: Vec<f64>,
    pub latitude: Vec<f64>,
    pub radius: f64,
}

impl Grid {
    /// (rows, columns) = (latitude count, longitude count)
    pub fn shape(&self) -> (usize, usize) {
        (self.latitude.len(), self.longitude.len())
    }

    pub fn len(&self) -> usize {
        self.latitude.len() * self.longitude.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattened observation points in row-major order
    pub fn points(&self) -> Vec<SphericalPoint> {
        self.latitude
            .iter()
            .flat_map(|&lat| {
                self.longitude
                    .iter()
                    .map(move |&lon| SphericalPoint::new(lon, lat, self.radius))
            })
            .collect()
    }
}

/// Generate a regular grid covering `region` (edges included) at a fixed radius
///
/// `shape` is (latitude count, longitude count).
pub fn grid_coordinates(region: Region, shape: (usize, usize), radius: f64) -> Result<Grid> {
    let (n_lat, n_lon) = shape;
    if n_lat == 0 || n_lon == 0 {
        return Err(Error::InvalidShape { shape });
    }
    if !(radius.is_finite() && radius >= 0.0) {
        return Err(Error::InvalidCoordinate(format!(
            "Invalid radius: {:?}",
            radius
        )));
    }
    Ok(Grid {
        longitude: linspace(region.west, region.east, n_lon),
        latitude: linspace(region.south, region.north, n_lat),
        radius,
    })
}

// Evenly spaced values including both ends; a single value yields `start`
fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 1 {
        return vec![start];
    }
    let step = (stop - start) / (count - 1) as f64;
    (0..count)
        .map(|i| {
            if i == count - 1 {
                stop
            } else {
                start + step * i as f64
            }
        })
        .collect()
}

// =================================== Tests ===================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_spherical_point_checked_valid() {
        assert!(SphericalPoint::checked(-60.0, 45.0, 6_371_000.0).is_ok());
        assert!(SphericalPoint::checked(350.0, -90.0, 0.0).is_ok());
    }

    #[test]
    fn test_spherical_point_checked_invalid() {
        assert!(SphericalPoint::checked(0.0, 91.0, 1.0).is_err());
        assert!(SphericalPoint::checked(0.0, -91.0, 1.0).is_err());
        assert!(SphericalPoint::checked(f64::NAN, 0.0, 1.0).is_err());
        assert!(SphericalPoint::checked(0.0, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_to_cartesian_axes() {
        let p = SphericalPoint::new(0.0, 0.0, 10.0).to_cartesian();
        assert!((p[0] - 10.0).abs() < EPSILON);
        assert!(p[1].abs() < EPSILON);
        assert!(p[2].abs() < EPSILON);

        let p = SphericalPoint::new(90.0, 0.0, 10.0).to_cartesian();
        assert!(p[0].abs() < EPSILON);
        assert!((p[1] - 10.0).abs() < EPSILON);

        let p = SphericalPoint::new(123.0, 90.0, 10.0).to_cartesian();
        assert!((p[2] - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_distance_matches_cartesian() {
        let a = SphericalPoint::new(-70.0, -40.0, 6_361_000.0);
        let b = SphericalPoint::new(-45.0, -12.5, 6_471_000.0);
        let (ca, cb) = (a.to_cartesian(), b.to_cartesian());
        let expected = ((ca[0] - cb[0]).powi(2) + (ca[1] - cb[1]).powi(2) + (ca[2] - cb[2]).powi(2))
            .sqrt();
        assert!((a.distance(&b) - expected).abs() < 1e-6);
        assert!(a.distance(&a) < 1.0);
    }

    #[test]
    fn test_region_validation() {
        assert!(Region::new(-80.0, -40.0, -50.0, -10.0).is_ok());
        assert!(Region::new(-40.0, -80.0, -50.0, -10.0).is_err());
        assert!(Region::new(-80.0, -40.0, -10.0, -50.0).is_err());
        assert!(Region::new(-80.0, -40.0, -95.0, -10.0).is_err());
        assert!(Region::new(f64::NAN, -40.0, -50.0, -10.0).is_err());
    }

    #[test]
    fn test_grid_coordinates_includes_edges() {
        let region = Region::new(-80.0, -40.0, -50.0, -10.0).unwrap();
        let grid = grid_coordinates(region, (80, 80), 6_471_000.0).unwrap();

        assert_eq!(grid.shape(), (80, 80));
        assert_eq!(grid.len(), 6400);
        assert!((grid.longitude[0] + 80.0).abs() < EPSILON);
        assert!((grid.longitude[79] + 40.0).abs() < EPSILON);
        assert!((grid.latitude[0] + 50.0).abs() < EPSILON);
        assert!((grid.latitude[79] + 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_grid_points_row_major() {
        let region = Region::new(0.0, 2.0, 10.0, 11.0).unwrap();
        let grid = grid_coordinates(region, (2, 3), 100.0).unwrap();
        let points = grid.points();

        assert_eq!(points.len(), 6);
        assert_eq!(points[0], SphericalPoint::new(0.0, 10.0, 100.0));
        assert_eq!(points[2], SphericalPoint::new(2.0, 10.0, 100.0));
        assert_eq!(points[3], SphericalPoint::new(0.0, 11.0, 100.0));
        assert!(points.iter().all(|p| p.radius == 100.0));
    }

    #[test]
    fn test_grid_single_row() {
        let region = Region::new(0.0, 2.0, 10.0, 11.0).unwrap();
        let grid = grid_coordinates(region, (1, 3), 1.0).unwrap();
        assert_eq!(grid.latitude, vec![10.0]);
        assert_eq!(grid.longitude, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_grid_zero_shape_is_error() {
        let region = Region::new(0.0, 2.0, 10.0, 11.0).unwrap();
        assert!(matches!(
            grid_coordinates(region, (0, 3), 1.0),
            Err(Error::InvalidShape { shape: (0, 3) })
        ));
    }

    #[test]
    fn test_region_contains() {
        let region = Region::new(-80.0, -40.0, -50.0, -10.0).unwrap();
        assert!(region.contains(-60.0, -30.0));
        assert!(region.contains(-80.0, -50.0));
        assert!(!region.contains(-30.0, -30.0));
    }
}
