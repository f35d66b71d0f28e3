use crate::error::{PathError, Result};
use crate::geometry::track::{cumulative_distances, TrackPoint};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{CatmullRom, Curve, CurveDomain};

/// A [`CatmullRom`] spline addressed by time instead of curve parameter.
///
/// Control parameters come from cumulative 3D distance along the *original*
/// route, so uneven recording speed does not bend the curve's shape. The
/// `(time, parameter)` table keeps one entry per original point.
#[derive(Debug, Clone)]
pub struct TimedCurve {
    curve: CatmullRom,
    times: Vec<f64>,
    params: Vec<f64>,
}

impl TimedCurve {
    /// Builds the curve from the original points and the indices kept as
    /// control points (for example the output of
    /// [`Resample::execute_indices`](crate::operations::Resample::execute_indices)).
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 control indices are given, an index is
    /// out of bounds or not strictly increasing, or the spline cannot be built.
    pub fn new(original: &[TrackPoint], control: &[usize], tension: f64) -> Result<Self> {
        if control.len() < 2 {
            return Err(PathError::InsufficientData {
                available: control.len(),
                required: 2,
            }
            .into());
        }
        if control.iter().any(|&i| i >= original.len())
            || control.windows(2).any(|w| w[1] <= w[0])
        {
            return Err(crate::error::GeometryError::Degenerate(
                "control indices must be increasing and within the route".into(),
            )
            .into());
        }

        let params = distance_parameters(original);
        let points = control.iter().map(|&i| original[i].position).collect();
        let control_params = control.iter().map(|&i| params[i]).collect();
        let curve = CatmullRom::with_parameters(points, control_params, tension)?;

        Ok(Self {
            curve,
            times: original.iter().map(|p| p.time).collect(),
            params,
        })
    }

    /// Convenience constructor using every original point as a control point.
    ///
    /// # Errors
    ///
    /// See [`TimedCurve::new`].
    pub fn through_all(original: &[TrackPoint], tension: f64) -> Result<Self> {
        let control: Vec<usize> = (0..original.len()).collect();
        Self::new(original, &control, tension)
    }

    /// Returns the wrapped spline.
    #[must_use]
    pub fn curve(&self) -> &CatmullRom {
        &self.curve
    }

    /// Maps a time to a curve parameter.
    ///
    /// Linear between bracketing table entries; `0` before the first
    /// timestamp (and for NaN) and `1` after the last. A zero-duration entry pair yields
    /// the earlier parameter.
    #[must_use]
    pub fn parameter_at_time(&self, time: f64) -> f64 {
        let n = self.times.len();
        if time.is_nan() || time <= self.times[0] {
            return 0.0;
        }
        if time >= self.times[n - 1] {
            return 1.0;
        }
        let hi = self.times.partition_point(|&t| t <= time);
        let lo = hi - 1;
        let span = self.times[hi] - self.times[lo];
        if span <= TOLERANCE {
            return self.params[lo];
        }
        let f = (time - self.times[lo]) / span;
        self.params[lo] + (self.params[hi] - self.params[lo]) * f
    }

    /// Position on the curve at `time`.
    #[must_use]
    pub fn point_at_time(&self, time: f64) -> Point3 {
        self.curve.point_at(self.parameter_at_time(time))
    }

    /// Unit forward direction at `time`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve has no direction (all points coincide).
    pub fn tangent_at_time(&self, time: f64) -> Result<Vector3> {
        self.curve.tangent_at(self.parameter_at_time(time))
    }

    /// First and last timestamps of the table.
    #[must_use]
    pub fn time_range(&self) -> (f64, f64) {
        (self.times[0], self.times[self.times.len() - 1])
    }
}

impl Curve for TimedCurve {
    /// Evaluates by time; `t` is a timestamp, not a normalized parameter.
    fn evaluate(&self, t: f64) -> Result<Point3> {
        Ok(self.point_at_time(t))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.tangent_at_time(t)
    }

    fn domain(&self) -> CurveDomain {
        let (start, stop) = self.time_range();
        CurveDomain::new(start, stop)
    }

    fn is_closed(&self) -> bool {
        false
    }
}

/// Normalized cumulative distance of every point, in `[0, 1]`.
///
/// A route with zero total length maps every point to `0`.
fn distance_parameters(points: &[TrackPoint]) -> Vec<f64> {
    let cumulative = cumulative_distances(points);
    let total = cumulative.last().copied().unwrap_or(0.0);
    if total <= TOLERANCE {
        return vec![0.0; points.len()];
    }
    cumulative
        .into_iter()
        .map(|d| (d / total).clamp(0.0, 1.0))
        .collect()
}
