//! Typed errors for the forward models and geometry types.

use crate::forward::glq::MAX_ORDER;

/// Errors raised while building models or running forward computations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tesseroid boundaries violate w < e, s < n or bottom < top
    #[error("Invalid tesseroid {boundaries:?}: {reason}")]
    InvalidTesseroid {
        boundaries: [f64; 6],
        reason: String,
    },

    #[error("Invalid region {boundaries:?}: {reason}")]
    InvalidRegion {
        boundaries: [f64; 4],
        reason: String,
    },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid ellipsoid '{name}': {reason}")]
    InvalidEllipsoid { name: String, reason: String },

    #[error("Invalid grid shape {shape:?}: both dimensions must be at least 1")]
    InvalidShape { shape: (usize, usize) },

    #[error("Invalid Gauss-Legendre order {0}: must be between 1 and {max}", max = MAX_ORDER)]
    InvalidGlqOrder(usize),

    #[error("Unknown gravitational field '{0}' (expected 'potential', 'g_z' or 'g_r')")]
    UnknownField(String),

    /// Number of densities (or masses) differs from the number of sources
    #[error("Got {sources} sources but {values} density/mass values")]
    SourceCountMismatch { sources: usize, values: usize },

    #[error("Observation point {point_index} lies inside tesseroid {tesseroid_index}")]
    PointInsideTesseroid {
        point_index: usize,
        tesseroid_index: usize,
    },

    #[error("Observation point {point_index} coincides with point mass {mass_index}")]
    CoincidentPointMass {
        point_index: usize,
        mass_index: usize,
    },

    /// Adaptive discretization needed more room than the configured stack.
    /// Usually means the observation point sits on the tesseroid surface.
    #[error("Tesseroid stack overflow (limit {limit}): point is too close to the tesseroid")]
    StackOverflow { limit: usize },

    #[error("Adaptive discretization produced more than {limit} tesseroids")]
    TooManyDiscretizations { limit: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
