//! Tesseroid (spherical prism) geometry and quadrature

use serde::{Deserialize, Serialize};

use crate::core::coordinates::SphericalPoint;
use crate::error::{Error, Result};
use crate::forward::Field;
use crate::forward::glq::GaussLegendre;
use crate::forward::point_mass::{Observer, kernel};

/// Volume bounded by two meridians, two parallels and two concentric spheres
///
/// Longitudes and latitudes in degrees, radii in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tesseroid {
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Tesseroid {
    pub fn new(
        west: f64,
        east: f64,
        south: f64,
        north: f64,
        bottom: f64,
        top: f64,
    ) -> Result<Self> {
        let boundaries = [west, east, south, north, bottom, top];
        let invalid = |reason: &str| Error::InvalidTesseroid {
            boundaries,
            reason: reason.to_string(),
        };
        if boundaries.iter().any(|v| !v.is_finite()) {
            return Err(invalid("boundaries must be finite"));
        }
        if west >= east {
            return Err(invalid("west must be lower than east"));
        }
        if east - west > 360.0 {
            return Err(invalid("longitudinal extent cannot exceed 360 degrees"));
        }
        if south >= north {
            return Err(invalid("south must be lower than north"));
        }
        if south < -90.0 || north > 90.0 {
            return Err(invalid("latitudes must be within [-90, 90]"));
        }
        if bottom < 0.0 {
            return Err(invalid("bottom radius cannot be negative"));
        }
        if bottom >= top {
            return Err(invalid("bottom must be lower than top"));
        }
        Ok(Self {
            west,
            east,
            south,
            north,
            bottom,
            top,
        })
    }

    /// [west, east, south, north, bottom, top]
    pub fn boundaries(&self) -> [f64; 6] {
        [
            self.west,
            self.east,
            self.south,
            self.north,
            self.bottom,
            self.top,
        ]
    }

    /// Geometric center
    pub fn center(&self) -> SphericalPoint {
        SphericalPoint::new(
            0.5 * (self.west + self.east),
            0.5 * (self.south + self.north),
            0.5 * (self.bottom + self.top),
        )
    }

    pub fn volume(&self) -> f64 {
        let d_lon = (self.east - self.west).to_radians();
        (d_lon / 3.0)
            * (self.top.powi(3) - self.bottom.powi(3))
            * (self.north.to_radians().sin() - self.south.to_radians().sin())
    }

    pub fn mass(&self, density: f64) -> f64 {
        density * self.volume()
    }

    /// Arc lengths along longitude and latitude (at the top radius) and thickness
    pub fn dimensions(&self) -> (f64, f64, f64) {
        let d_lon = (self.east - self.west).to_radians();
        let d_lat = (self.north - self.south).to_radians();
        let (sin_center, cos_center) = (0.5 * (self.south + self.north)).to_radians().sin_cos();
        let cos_arc = (sin_center.powi(2) + cos_center.powi(2) * d_lon.cos()).clamp(-1.0, 1.0);
        (
            self.top * cos_arc.acos(),
            self.top * d_lat,
            self.top - self.bottom,
        )
    }

    /// Halve the tesseroid along the selected dimensions
    pub fn split(&self, lon: bool, lat: bool, radial: bool) -> Vec<Tesseroid> {
        let halves = |lower: f64, upper: f64, split: bool| {
            if split {
                let mid = 0.5 * (lower + upper);
                vec![(lower, mid), (mid, upper)]
            } else {
                vec![(lower, upper)]
            }
        };
        let lons = halves(self.west, self.east, lon);
        let lats = halves(self.south, self.north, lat);
        let radii = halves(self.bottom, self.top, radial);

        let mut pieces = Vec::with_capacity(lons.len() * lats.len() * radii.len());
        for &(bottom, top) in &radii {
            for &(south, north) in &lats {
                for &(west, east) in &lons {
                    pieces.push(Tesseroid {
                        west,
                        east,
                        south,
                        north,
                        bottom,
                        top,
                    });
                }
            }
        }
        pieces
    }

    /// True if the point is inside the tesseroid or on its boundary
    pub fn contains(&self, point: &SphericalPoint) -> bool {
        if !(self.bottom..=self.top).contains(&point.radius) {
            return false;
        }
        if !(self.south..=self.north).contains(&point.latitude) {
            return false;
        }
        let offset = (point.longitude - self.west).rem_euclid(360.0);
        offset <= self.east - self.west || (self.east - self.west) >= 360.0
    }

    /// Volume integral of the unit-density `field` kernel, by tensor-product GLQ
    ///
    /// `rules` are the quadrature rules along longitude, latitude and radius.
    /// Returns `None` if a node coincides with the observation point.
    pub(crate) fn integrate(
        &self,
        observer: &Observer,
        field: Field,
        rules: &[GaussLegendre; 3],
    ) -> Option<f64> {
        let (w, e) = (self.west.to_radians(), self.east.to_radians());
        let (s, n) = (self.south.to_radians(), self.north.to_radians());
        let scale = (e - w) * (n - s) * (self.top - self.bottom) / 8.0;

        let lon_nodes = rules[0].scaled_nodes(w, e);
        let lat_nodes: Vec<(f64, f64)> = rules[1]
            .scaled_nodes(s, n)
            .into_iter()
            .map(f64::sin_cos)
            .collect();
        let radial_nodes = rules[2].scaled_nodes(self.bottom, self.top);

        let mut sum = 0.0;
        for (&radius, &w_r) in radial_nodes.iter().zip(rules[2].weights()) {
            for (&(sinlat, coslat), &w_lat) in lat_nodes.iter().zip(rules[1].weights()) {
                let jacobian = radius.powi(2) * coslat;
                for (&lon, &w_lon) in lon_nodes.iter().zip(rules[0].weights()) {
                    let value = kernel(field, observer, lon, sinlat, coslat, radius)?;
                    sum += w_r * w_lat * w_lon * jacobian * value;
                }
            }
        }
        Some(scale * sum)
    }
}

impl TryFrom<[f64; 6]> for Tesseroid {
    type Error = Error;

    fn try_from(b: [f64; 6]) -> Result<Self> {
        Tesseroid::new(b[0], b[1], b[2], b[3], b[4], b[5])
    }
}
