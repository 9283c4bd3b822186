//! Physical constants used by the forward models

/// Gravitational constant in SI units (m³ kg⁻¹ s⁻²)
pub const GRAVITATIONAL_CONST: f64 = 0.00000000006674;

/// Converts accelerations from m/s² to mGal
pub const SI2MGAL: f64 = 1e5;
