//! Forward modelling of gravitational fields with tesseroids and point masses,
//! reference ellipsoids, and cached sample datasets.

pub mod constants;
pub mod core;
pub mod datasets;
pub mod error;
pub mod forward;

pub use crate::core::coordinates::{GeodeticPoint, Grid, Region, SphericalPoint, grid_coordinates};
pub use crate::core::ellipsoid::{Ellipsoid, get_ellipsoid};
pub use error::{Error, Result};
pub use forward::config::ForwardConfig;
pub use forward::point_mass::point_mass_gravity;
pub use forward::tesseroid::Tesseroid;
pub use forward::{Field, tesseroid_gravity};
