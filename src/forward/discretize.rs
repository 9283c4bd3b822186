//! Adaptive discretization of tesseroids close to the observation point
//!
//! GLQ loses accuracy when the observation point is near the source, so each
//! tesseroid is split until every dimension L satisfies distance / L >= D,
//! where D is the distance-size ratio (Uieda et al., 2016).

use crate::core::coordinates::SphericalPoint;
use crate::error::{Error, Result};
use crate::forward::tesseroid::Tesseroid;

#[derive(Debug, Clone, Copy)]
pub struct DiscretizationLimits {
    pub distance_size_ratio: f64,
    pub stack_size: usize,
    pub max_discretizations: usize,
}

/// Split `tesseroid` into pieces small enough to integrate from `point`
pub fn adaptive_discretization(
    point: &SphericalPoint,
    tesseroid: &Tesseroid,
    limits: &DiscretizationLimits,
) -> Result<Vec<Tesseroid>> {
    let mut stack = Vec::with_capacity(limits.stack_size);
    let mut accepted = Vec::new();
    stack.push(*tesseroid);

    while let Some(current) = stack.pop() {
        let distance = point.distance(&current.center());
        let (l_lon, l_lat, l_radial) = current.dimensions();
        let ratio = limits.distance_size_ratio;
        let split_lon = l_lon * ratio > distance;
        let split_lat = l_lat * ratio > distance;
        let split_radial = l_radial * ratio > distance;

        if split_lon || split_lat || split_radial {
            let pieces = current.split(split_lon, split_lat, split_radial);
            if stack.len() + pieces.len() > limits.stack_size {
                return Err(Error::StackOverflow {
                    limit: limits.stack_size,
                });
            }
            stack.extend(pieces);
        } else {
            accepted.push(current);
            if accepted.len() > limits.max_discretizations {
                return Err(Error::TooManyDiscretizations {
                    limit: limits.max_discretizations,
                });
            }
        }
    }
    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS: f64 = 6_371_000.0;

    fn limits(ratio: f64) -> DiscretizationLimits {
        DiscretizationLimits {
            distance_size_ratio: ratio,
            stack_size: 100,
            max_discretizations: 100_000,
        }
    }

    fn sample() -> Tesseroid {
        Tesseroid::new(-70.0, -50.0, -40.0, -20.0, RADIUS - 10e3, RADIUS).unwrap()
    }

    #[test]
    fn test_far_point_keeps_tesseroid_whole() {
        let point = SphericalPoint::new(120.0, 30.0, RADIUS + 100e3);
        let pieces = adaptive_discretization(&point, &sample(), &limits(2.5)).unwrap();
        assert_eq!(pieces, vec![sample()]);
    }

    #[test]
    fn test_close_point_splits_and_preserves_volume() {
        let point = SphericalPoint::new(-60.0, -30.0, RADIUS + 100e3);
        let tess = sample();
        let pieces = adaptive_discretization(&point, &tess, &limits(2.5)).unwrap();
        assert!(pieces.len() > 1);

        let total: f64 = pieces.iter().map(Tesseroid::volume).sum();
        assert!((total - tess.volume()).abs() / tess.volume() < 1e-10);

        // Every accepted piece satisfies the ratio
        for piece in &pieces {
            let distance = point.distance(&piece.center());
            let (l_lon, l_lat, l_radial) = piece.dimensions();
            assert!(distance >= 2.5 * l_lon.max(l_lat).max(l_radial));
        }
    }

    #[test]
    fn test_larger_ratio_gives_finer_discretization() {
        let point = SphericalPoint::new(-60.0, -30.0, RADIUS + 100e3);
        let coarse = adaptive_discretization(&point, &sample(), &limits(1.0)).unwrap();
        let fine = adaptive_discretization(&point, &sample(), &limits(2.5)).unwrap();
        assert!(fine.len() > coarse.len());
    }

    #[test]
    fn test_point_on_surface_overflows_stack() {
        let point = SphericalPoint::new(-60.0, -30.0, RADIUS + 1e-3);
        let err = adaptive_discretization(&point, &sample(), &limits(2.5)).unwrap_err();
        assert!(matches!(err, Error::StackOverflow { limit: 100 }));
    }

    #[test]
    fn test_discretization_cap() {
        let point = SphericalPoint::new(-60.0, -30.0, RADIUS + 100e3);
        let tight = DiscretizationLimits {
            max_discretizations: 3,
            ..limits(2.5)
        };
        let err = adaptive_discretization(&point, &sample(), &tight).unwrap_err();
        assert!(matches!(err, Error::TooManyDiscretizations { limit: 3 }));
    }
}
