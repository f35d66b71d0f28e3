pub mod angle;
pub mod geodesy;

/// 3D point type.
///
/// Route positions use `x` = longitude (degrees), `y` = latitude (degrees)
/// and `z` = elevation (meters).
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;
