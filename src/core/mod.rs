//! Geometry shared by every model: points, grids and reference ellipsoids

pub mod coordinates;
pub mod ellipsoid;
