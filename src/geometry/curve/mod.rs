mod catmull_rom;
mod timed;

pub use catmull_rom::{CatmullRom, DEFAULT_TENSION};
pub use timed::TimedCurve;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    /// The normalized domain `[0, 1]`.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// A point and unit tangent evaluated on a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    /// Curve parameter the sample was taken at.
    pub parameter: f64,
    /// Position on the curve.
    pub point: Point3,
    /// Unit forward direction.
    pub tangent: Vector3,
}

/// Trait for parametric curves in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or evaluation fails.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the unit tangent vector at parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter is out of range or the tangent is degenerate.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain;

    /// Returns whether the curve is closed.
    fn is_closed(&self) -> bool;

    /// Evaluates position and tangent together.
    ///
    /// # Errors
    ///
    /// Propagates failures of [`Curve::evaluate`] and [`Curve::tangent`].
    fn sample(&self, t: f64) -> Result<CurveSample> {
        Ok(CurveSample {
            parameter: t,
            point: self.evaluate(t)?,
            tangent: self.tangent(t)?,
        })
    }
}
