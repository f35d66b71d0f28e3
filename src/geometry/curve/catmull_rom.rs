use crate::error::{GeometryError, PathError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Tension of the classic Catmull-Rom spline.
pub const DEFAULT_TENSION: f64 = 0.5;

/// A cardinal (Catmull-Rom) spline through ordered control points.
///
/// Each control point carries a parameter in `[0, 1]`. Segment `i` runs from
/// `points[i]` to `points[i + 1]` and is a cubic Hermite blend whose end
/// tangents are `tension * (p[i+1] - p[i-1])`. Boundary points are repeated so
/// the curve starts and ends exactly on the first and last control points.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Point3>,
    params: Vec<f64>,
    tension: f64,
}

impl CatmullRom {
    /// Creates a spline with uniform parameters `i / (n - 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 points are given or the tension is
    /// outside `[0, 1]`.
    pub fn new(points: Vec<Point3>, tension: f64) -> Result<Self> {
        let n = points.len();
        if n < 2 {
            return Err(PathError::InsufficientData {
                available: n,
                required: 2,
            }
            .into());
        }
        #[allow(clippy::cast_precision_loss)]
        let last = (n - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let params = (0..n).map(|i| i as f64 / last).collect();
        Self::with_parameters(points, params, tension)
    }

    /// Creates a spline with externally supplied per-point parameters.
    ///
    /// Parameters must lie in `[0, 1]` and be non-decreasing. Repeated values
    /// are allowed and produce zero-length segments.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 points are given, the parameter count
    /// does not match, a parameter is out of range or decreasing, or the
    /// tension is outside `[0, 1]`.
    pub fn with_parameters(points: Vec<Point3>, params: Vec<f64>, tension: f64) -> Result<Self> {
        if points.len() < 2 {
            return Err(PathError::InsufficientData {
                available: points.len(),
                required: 2,
            }
            .into());
        }
        if params.len() != points.len() {
            return Err(GeometryError::Degenerate(format!(
                "{} parameters supplied for {} control points",
                params.len(),
                points.len()
            ))
            .into());
        }
        if !(0.0..=1.0).contains(&tension) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "tension",
                value: tension,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        for &u in &params {
            if !(0.0..=1.0).contains(&u) {
                return Err(GeometryError::ParameterOutOfRange {
                    parameter: "control parameter",
                    value: u,
                    min: 0.0,
                    max: 1.0,
                }
                .into());
            }
        }
        if params.windows(2).any(|w| w[1] < w[0]) {
            return Err(
                GeometryError::Degenerate("control parameters must be non-decreasing".into())
                    .into(),
            );
        }

        Ok(Self {
            points,
            params,
            tension,
        })
    }

    /// Returns the control points.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the per-point parameters.
    #[must_use]
    pub fn parameters(&self) -> &[f64] {
        &self.params
    }

    /// Evaluates the spline at `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point3 {
        let (i, u) = self.locate(t);
        let Some(u) = u else {
            return self.points[i];
        };
        if self.points.len() == 2 {
            return self.points[0] + (self.points[1] - self.points[0]) * u;
        }

        let (p1, p2, m1, m2) = self.segment(i);
        let u2 = u * u;
        let u3 = u2 * u;
        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;
        Point3::from(p1.coords * h00 + m1 * h10 + p2.coords * h01 + m2 * h11)
    }

    /// Unit forward direction at `t`, clamped to `[0, 1]`.
    ///
    /// Uses the analytic derivative; where it vanishes (zero tension at a
    /// knot, or a zero-length segment) the nearest non-degenerate chord is
    /// used instead.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if every control point coincides.
    pub fn tangent_at(&self, t: f64) -> Result<Vector3> {
        let (i, u) = self.locate(t);
        if let Some(u) = u {
            let d = if self.points.len() == 2 {
                self.points[1] - self.points[0]
            } else {
                let (p1, p2, m1, m2) = self.segment(i);
                let u2 = u * u;
                let d00 = 6.0 * u2 - 6.0 * u;
                let d10 = 3.0 * u2 - 4.0 * u + 1.0;
                let d01 = -6.0 * u2 + 6.0 * u;
                let d11 = 3.0 * u2 - 2.0 * u;
                p1.coords * d00 + m1 * d10 + p2.coords * d01 + m2 * d11
            };
            let len = d.norm();
            if len > TOLERANCE {
                return Ok(d / len);
            }
        }
        self.nearest_chord(i)
    }

    /// Finds the segment containing `t` and the local parameter within it.
    ///
    /// The local parameter is `None` for a zero-length segment, in which case
    /// the returned index is the endpoint to use.
    fn locate(&self, t: f64) -> (usize, Option<f64>) {
        let n = self.points.len();
        let t = t.clamp(0.0, 1.0);
        let upper = self.params.partition_point(|&u| u <= t);
        let i = upper.saturating_sub(1).min(n - 2);
        let span = self.params[i + 1] - self.params[i];
        if span <= TOLERANCE {
            return (i, None);
        }
        let u = ((t - self.params[i]) / span).clamp(0.0, 1.0);
        (i, Some(u))
    }

    /// Returns `(p1, p2, m1, m2)` for segment `i` with boundary repetition.
    fn segment(&self, i: usize) -> (Point3, Point3, Vector3, Vector3) {
        let n = self.points.len();
        let p0 = self.points[i.saturating_sub(1)];
        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        let p3 = self.points[(i + 2).min(n - 1)];
        let m1 = (p2 - p0) * self.tension;
        let m2 = (p3 - p1) * self.tension;
        (p1, p2, m1, m2)
    }

    /// Direction of the closest chord to segment `i` with non-zero length.
    fn nearest_chord(&self, i: usize) -> Result<Vector3> {
        let n_seg = self.points.len() - 1;
        for offset in 0..n_seg {
            for seg in [i + offset, i.wrapping_sub(offset)] {
                if seg >= n_seg {
                    continue;
                }
                let chord = self.points[seg + 1] - self.points[seg];
                let len = chord.norm();
                if len > TOLERANCE {
                    return Ok(chord / len);
                }
            }
        }
        Err(GeometryError::ZeroVector.into())
    }
}

impl Curve for CatmullRom {
    /// Parameters outside the domain are clamped rather than rejected.
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.tangent_at(t)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::unit()
    }

    fn is_closed(&self) -> bool {
        false
    }
}
