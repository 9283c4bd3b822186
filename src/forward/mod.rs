//! Gravitational forward modelling
//!
//! Computes the potential or the downward acceleration generated by
//! tesseroids (or point masses) at a set of observation points given in
//! geocentric spherical coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod config;
pub mod discretize;
pub mod glq;
pub mod point_mass;
pub mod tesseroid;

use crate::constants::{GRAVITATIONAL_CONST, SI2MGAL};
use crate::core::coordinates::SphericalPoint;
use crate::error::{Error, Result};
use config::ForwardConfig;
use discretize::{DiscretizationLimits, adaptive_discretization};
use glq::GaussLegendre;
use point_mass::Observer;
use tesseroid::Tesseroid;

/// Gravitational field to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Gravitational potential (J/kg)
    #[serde(rename = "potential")]
    Potential,
    /// Downward component of the acceleration (mGal)
    #[serde(rename = "g_z", alias = "g_r")]
    GZ,
}

impl Field {
    /// Conversion applied to the SI result
    pub fn unit_factor(self) -> f64 {
        match self {
            Field::Potential => 1.0,
            Field::GZ => SI2MGAL,
        }
    }

    /// Minimum distance / size ratio before a tesseroid must be split
    pub fn default_distance_size_ratio(self) -> f64 {
        match self {
            Field::Potential => 1.0,
            Field::GZ => 2.5,
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "potential" => Ok(Field::Potential),
            // "g_r" is the radial-component name used by older scripts
            "g_z" | "g_r" => Ok(Field::GZ),
            other => Err(Error::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Potential => write!(f, "potential"),
            Field::GZ => write!(f, "g_z"),
        }
    }
}

/// Field generated by tesseroids at each observation point
///
/// `densities[i]` (kg/m³) belongs to `tesseroids[i]`. Results follow the order
/// of `points`: potential in J/kg, g_z in mGal.
pub fn tesseroid_gravity(
    points: &[SphericalPoint],
    tesseroids: &[Tesseroid],
    densities: &[f64],
    field: Field,
    config: &ForwardConfig,
) -> Result<Vec<f64>> {
    config.validate()?;
    if tesseroids.len() != densities.len() {
        return Err(Error::SourceCountMismatch {
            sources: tesseroids.len(),
            values: densities.len(),
        });
    }
    check_points_outside_tesseroids(points, tesseroids)?;

    let rules = [
        GaussLegendre::new(config.glq_orders[0])?,
        GaussLegendre::new(config.glq_orders[1])?,
        GaussLegendre::new(config.glq_orders[2])?,
    ];
    let limits = DiscretizationLimits {
        distance_size_ratio: config
            .distance_size_ratio
            .unwrap_or_else(|| field.default_distance_size_ratio()),
        stack_size: config.stack_size,
        max_discretizations: config.max_discretizations,
    };
    info!(
        "Computing {} of {} tesseroids on {} points (GLQ orders {:?}, D = {})",
        field,
        tesseroids.len(),
        points.len(),
        config.glq_orders,
        limits.distance_size_ratio
    );

    let evaluate = |(point_index, point): (usize, &SphericalPoint)| -> Result<f64> {
        let observer = Observer::from(point);
        let mut total = 0.0;
        let mut pieces_used = 0;
        for (tesseroid_index, (tesseroid, &density)) in tesseroids.iter().zip(densities).enumerate()
        {
            if density == 0.0 {
                continue;
            }
            let pieces = adaptive_discretization(point, tesseroid, &limits)?;
            pieces_used += pieces.len();
            for piece in &pieces {
                let value =
                    piece
                        .integrate(&observer, field, &rules)
                        .ok_or(Error::PointInsideTesseroid {
                            point_index,
                            tesseroid_index,
                        })?;
                total += density * value;
            }
        }
        debug!(
            "Point {} integrated over {} tesseroids after discretization",
            point_index, pieces_used
        );
        Ok(GRAVITATIONAL_CONST * total * field.unit_factor())
    };

    #[cfg(feature = "parallel")]
    let result: Result<Vec<f64>> = if config.parallel {
        points.par_iter().enumerate().map(evaluate).collect()
    } else {
        points.iter().enumerate().map(evaluate).collect()
    };
    #[cfg(not(feature = "parallel"))]
    let result: Result<Vec<f64>> = points.iter().enumerate().map(evaluate).collect();

    if result.is_ok() {
        info!("Finished {} forward modelling", field);
    }
    result
}

fn check_points_outside_tesseroids(
    points: &[SphericalPoint],
    tesseroids: &[Tesseroid],
) -> Result<()> {
    for (point_index, point) in points.iter().enumerate() {
        if let Some(tesseroid_index) = tesseroids.iter().position(|t| t.contains(point)) {
            return Err(Error::PointInsideTesseroid {
                point_index,
                tesseroid_index,
            });
        }
    }
    Ok(())
}
