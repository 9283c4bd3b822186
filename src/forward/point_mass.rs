//! Point-mass kernels and forward modelling in spherical coordinates
//!
//! The tesseroid quadrature evaluates these same kernels at every GLQ node,
//! so they are written against precomputed trigonometric terms.

use crate::constants::GRAVITATIONAL_CONST;
use crate::core::coordinates::SphericalPoint;
use crate::error::{Error, Result};
use crate::forward::Field;

/// Observation point with its trigonometric terms already evaluated
#[derive(Debug, Clone, Copy)]
pub(crate) struct Observer {
    pub longitude: f64,
    pub sinlat: f64,
    pub coslat: f64,
    pub radius: f64,
}

impl From<&SphericalPoint> for Observer {
    fn from(point: &SphericalPoint) -> Self {
        let (sinlat, coslat) = point.latitude.to_radians().sin_cos();
        Self {
            longitude: point.longitude.to_radians(),
            sinlat,
            coslat,
            radius: point.radius,
        }
    }
}

/// Kernel of `field` for a unit mass at (longitude, sinlat, coslat, radius)
///
/// Longitude in radians. Returns `None` if the source coincides with the observer.
#[inline]
pub(crate) fn kernel(
    field: Field,
    observer: &Observer,
    longitude: f64,
    sinlat: f64,
    coslat: f64,
    radius: f64,
) -> Option<f64> {
    let cospsi = observer.sinlat * sinlat
        + observer.coslat * coslat * (longitude - observer.longitude).cos();
    let distance_sq =
        observer.radius.powi(2) + radius.powi(2) - 2.0 * observer.radius * radius * cospsi;
    // Below this the distance is dominated by rounding in cos(psi)
    let resolution = 4.0 * f64::EPSILON * (observer.radius.powi(2) + radius.powi(2));
    if distance_sq <= resolution {
        return None;
    }
    let distance = distance_sq.sqrt();
    Some(match field {
        Field::Potential => 1.0 / distance,
        Field::GZ => (observer.radius - radius * cospsi) / (distance_sq * distance),
    })
}

/// Field generated by point masses at each observation point
///
/// Potential is returned in J/kg, g_z (downward) in mGal.
pub fn point_mass_gravity(
    points: &[SphericalPoint],
    masses_at: &[SphericalPoint],
    masses: &[f64],
    field: Field,
) -> Result<Vec<f64>> {
    if masses_at.len() != masses.len() {
        return Err(Error::SourceCountMismatch {
            sources: masses_at.len(),
            values: masses.len(),
        });
    }
    let sources: Vec<(f64, f64, f64, f64)> = masses_at
        .iter()
        .map(|p| {
            let (sinlat, coslat) = p.latitude.to_radians().sin_cos();
            (p.longitude.to_radians(), sinlat, coslat, p.radius)
        })
        .collect();

    points
        .iter()
        .enumerate()
        .map(|(point_index, point)| {
            let observer = Observer::from(point);
            let mut total = 0.0;
            for (mass_index, (&(lon, sinlat, coslat, radius), &mass)) in
                sources.iter().zip(masses).enumerate()
            {
                let value = kernel(field, &observer, lon, sinlat, coslat, radius).ok_or(
                    Error::CoincidentPointMass {
                        point_index,
                        mass_index,
                    },
                )?;
                total += mass * value;
            }
            Ok(GRAVITATIONAL_CONST * total * field.unit_factor())
        })
        .collect()
}
