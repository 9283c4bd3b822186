//! Reference ellipsoids
//!
//! Oblate ellipsoids of revolution used to place observation points and to
//! compute normal gravity. Conversions follow the usual geodesy conventions:
//! geodetic latitude is measured against the ellipsoid normal, spherical
//! latitude against the equatorial plane from the geocenter.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::SI2MGAL;
use crate::core::coordinates::{GeodeticPoint, SphericalPoint};
use crate::error::{Error, Result};

/// Oblate ellipsoid of revolution with its gravity-defining constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    pub name: String,
    /// Equatorial radius (m)
    pub semimajor_axis: f64,
    pub flattening: f64,
    /// GM (m³/s²)
    pub geocentric_grav_const: f64,
    /// Rotation rate (rad/s)
    pub angular_velocity: f64,
}

/// Default reference ellipsoid (WGS84)
pub fn get_ellipsoid() -> Ellipsoid {
    Ellipsoid::wgs84()
}

impl Ellipsoid {
    pub fn new(
        name: impl Into<String>,
        semimajor_axis: f64,
        flattening: f64,
        geocentric_grav_const: f64,
        angular_velocity: f64,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: &str| Error::InvalidEllipsoid {
            name: name.clone(),
            reason: reason.to_string(),
        };
        if !(semimajor_axis.is_finite() && semimajor_axis > 0.0) {
            return Err(invalid("semimajor axis must be positive"));
        }
        if !(0.0..1.0).contains(&flattening) {
            return Err(invalid("flattening must be within [0, 1)"));
        }
        if !(geocentric_grav_const.is_finite() && geocentric_grav_const > 0.0) {
            return Err(invalid("geocentric gravitational constant must be positive"));
        }
        if !angular_velocity.is_finite() {
            return Err(invalid("angular velocity must be finite"));
        }
        Ok(Self {
            name,
            semimajor_axis,
            flattening,
            geocentric_grav_const,
            angular_velocity,
        })
    }

    /// World Geodetic System 1984
    pub fn wgs84() -> Self {
        Self {
            name: "WGS84".to_string(),
            semimajor_axis: 6_378_137.0,
            flattening: 1.0 / 298.257_223_563,
            geocentric_grav_const: 3.986_004_418e14,
            angular_velocity: 7.292_115e-5,
        }
    }

    /// Geodetic Reference System 1980
    pub fn grs80() -> Self {
        Self {
            name: "GRS80".to_string(),
            semimajor_axis: 6_378_137.0,
            flattening: 1.0 / 298.257_222_101,
            geocentric_grav_const: 3.986_005e14,
            angular_velocity: 7.292_115e-5,
        }
    }

    pub fn semiminor_axis(&self) -> f64 {
        self.semimajor_axis * (1.0 - self.flattening)
    }

    pub fn first_eccentricity_squared(&self) -> f64 {
        2.0 * self.flattening - self.flattening.powi(2)
    }

    pub fn first_eccentricity(&self) -> f64 {
        self.first_eccentricity_squared().sqrt()
    }

    /// Distance from the center to either focus
    pub fn linear_eccentricity(&self) -> f64 {
        (self.semimajor_axis.powi(2) - self.semiminor_axis().powi(2)).sqrt()
    }

    /// Arithmetic mean radius R1 = (2a + b) / 3
    pub fn mean_radius(&self) -> f64 {
        (2.0 * self.semimajor_axis + self.semiminor_axis()) / 3.0
    }

    /// Radius of curvature in the prime vertical, from the sine of the geodetic latitude
    pub fn prime_vertical_radius(&self, sinlat: f64) -> f64 {
        self.semimajor_axis / (1.0 - self.first_eccentricity_squared() * sinlat.powi(2)).sqrt()
    }

    /// Distance from the center to the ellipsoid surface at a given latitude
    ///
    /// `geodetic` selects whether `latitude` is geodetic or spherical.
    pub fn geocentric_radius(&self, latitude: f64, geodetic: bool) -> f64 {
        let a = self.semimajor_axis;
        let b = self.semiminor_axis();
        let (sinlat, coslat) = latitude.to_radians().sin_cos();
        if geodetic {
            (((a.powi(2) * coslat).powi(2) + (b.powi(2) * sinlat).powi(2))
                / ((a * coslat).powi(2) + (b * sinlat).powi(2)))
            .sqrt()
        } else {
            a * b / ((b * coslat).powi(2) + (a * sinlat).powi(2)).sqrt()
        }
    }

    pub fn geodetic_to_spherical(&self, point: GeodeticPoint) -> SphericalPoint {
        let (sinlat, coslat) = point.latitude.to_radians().sin_cos();
        let prime_vertical = self.prime_vertical_radius(sinlat);
        let xy = (prime_vertical + point.height) * coslat;
        let z =
            (prime_vertical * (1.0 - self.first_eccentricity_squared()) + point.height) * sinlat;
        SphericalPoint {
            longitude: point.longitude,
            latitude: z.atan2(xy).to_degrees(),
            radius: xy.hypot(z),
        }
    }

    /// Inverse of [`Ellipsoid::geodetic_to_spherical`] using Vermeille's (2002) closed form
    ///
    /// The geocenter has no defined geodetic latitude. It maps to the pole on
    /// the side of `point.latitude` (north for zero), at height -b.
    pub fn spherical_to_geodetic(&self, point: SphericalPoint) -> GeodeticPoint {
        if point.radius == 0.0 {
            return GeodeticPoint {
                longitude: point.longitude,
                latitude: if point.latitude < 0.0 { -90.0 } else { 90.0 },
                height: -self.semiminor_axis(),
            };
        }
        let e2 = self.first_eccentricity_squared();
        let e4 = e2.powi(2);
        let (sinlat, coslat) = point.latitude.to_radians().sin_cos();
        let big_z = point.radius * sinlat;
        let p_0 = (point.radius * coslat).powi(2) / self.semimajor_axis.powi(2);
        let q_0 = (1.0 - e2) / self.semimajor_axis.powi(2) * big_z.powi(2);
        let r_0 = (p_0 + q_0 - e4) / 6.0;
        let s_0 = e4 * p_0 * q_0 / 4.0 / r_0.powi(3);
        let t_0 = (1.0 + s_0 + (2.0 * s_0 + s_0.powi(2)).sqrt()).cbrt();
        let u_0 = r_0 * (1.0 + t_0 + 1.0 / t_0);
        let v_0 = (u_0.powi(2) + q_0 * e4).sqrt();
        let w_0 = e2 * (u_0 + v_0 - q_0) / 2.0 / v_0;
        let k = (u_0 + v_0 + w_0.powi(2)).sqrt() - w_0;
        let big_d = k * point.radius * coslat / (k + e2);
        let hypot_dz = big_d.hypot(big_z);
        GeodeticPoint {
            longitude: point.longitude,
            latitude: (2.0 * big_z.atan2(big_d + hypot_dz)).to_degrees(),
            height: (k + e2 - 1.0) / k * hypot_dz,
        }
    }

    /// Normal gravity (mGal) at a geodetic latitude and height
    ///
    /// Closed form of Li & Götze (2001), valid above and below the surface as
    /// long as the point is outside the focal disk. A sphere (zero flattening)
    /// has no ellipsoidal-harmonic coordinates, so there the attraction of GM
    /// and the centrifugal acceleration are added as vectors.
    pub fn normal_gravity(&self, latitude: f64, height: f64) -> f64 {
        if height < 0.0 {
            warn!(
                "Formulas used for normal gravity are only valid for points outside the ellipsoid. \
                 Height {} m is below the ellipsoid surface.",
                height
            );
        }
        let a = self.semimajor_axis;
        let b = self.semiminor_axis();
        let big_e = self.linear_eccentricity();
        let omega2 = self.angular_velocity.powi(2);
        if big_e == 0.0 {
            return self.rotating_sphere_gravity(latitude, a + height);
        }

        let (sinlat, coslat) = latitude.to_radians().sin_cos();
        let prime_vertical = self.prime_vertical_radius(sinlat);
        let x = (prime_vertical + height) * coslat;
        let z = (prime_vertical * (1.0 - self.first_eccentricity_squared()) + height) * sinlat;

        // Ellipsoidal-harmonic coordinates (u, beta) of the point
        let big_d = x.powi(2) + z.powi(2) - big_e.powi(2);
        let u2 =
            0.5 * big_d * (1.0 + (1.0 + 4.0 * big_e.powi(2) * z.powi(2) / big_d.powi(2)).sqrt());
        let u = u2.sqrt();
        let beta = (z * (u2 + big_e.powi(2)).sqrt()).atan2(u * x);
        let (sinbeta, cosbeta) = beta.sin_cos();
        let (sinbeta2, cosbeta2) = (sinbeta.powi(2), cosbeta.powi(2));

        let q_0 = 0.5
            * ((1.0 + 3.0 * b.powi(2) / big_e.powi(2)) * (big_e / b).atan() - 3.0 * b / big_e);
        let q_l_prime =
            3.0 * (1.0 + u2 / big_e.powi(2)) * (1.0 - u / big_e * (big_e / u).atan()) - 1.0;
        let big_w = ((u2 + big_e.powi(2) * sinbeta2) / (u2 + big_e.powi(2))).sqrt();

        let term1 = self.geocentric_grav_const / (u2 + big_e.powi(2));
        let term2 = (0.5 * sinbeta2 - 1.0 / 6.0)
            * (a.powi(2) * big_e * q_l_prime * omega2 / ((u2 + big_e.powi(2)) * q_0));
        let term3 = -cosbeta2 * u * omega2;

        (term1 + term2 + term3) / big_w * SI2MGAL
    }

    fn rotating_sphere_gravity(&self, latitude: f64, radius: f64) -> f64 {
        let (sinlat, coslat) = latitude.to_radians().sin_cos();
        let omega2 = self.angular_velocity.powi(2);
        let radial = self.geocentric_grav_const / radius.powi(2) - omega2 * radius * coslat.powi(2);
        let tangential = omega2 * radius * coslat * sinlat;
        radial.hypot(tangential) * SI2MGAL
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Self::wgs84()
    }
}
