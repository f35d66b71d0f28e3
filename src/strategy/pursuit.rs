//! Cinematic pursuit camera.
//!
//! The route is thinned, fitted with a time-parameterized Catmull-Rom spline
//! and sampled at a fixed density. Every sample looks towards a decay-weighted
//! average of the curve points ahead of it, so the heading follows the general
//! direction of travel instead of every wiggle in the recording.

use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::StrategyParameters;
use crate::error::{PathError, Result};
use crate::geometry::{TimedCurve, TrackData};
use crate::math::geodesy::initial_bearing;
use crate::math::{Point3, Vector3};
use crate::operations::Resample;

use super::cache::{CameraPathCache, PathSample};
use super::command::CameraCommand;

/// Upper bound on sample intervals per tour.
const MAX_SAMPLE_INTERVALS: usize = 1 << 20;

/// Spline-based pursuit camera with smoothed look-ahead heading.
#[derive(Debug, Clone, Default)]
pub struct Pursuit {
    cache: CameraPathCache,
}

impl Pursuit {
    /// Creates a pursuit strategy with an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the cache from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InsufficientData`] for an empty route and
    /// propagates curve construction failures; in both cases the path is left
    /// empty. A single-point route yields one static sample.
    pub fn build_path(&mut self, track: &TrackData, params: &StrategyParameters) -> Result<()> {
        self.cache = CameraPathCache::default();

        match track.points.as_slice() {
            [] => {
                warn!("pursuit path not built: route has no points");
                return Err(PathError::InsufficientData {
                    available: 0,
                    required: 2,
                }
                .into());
            }
            [only] => {
                debug!("pursuit path built from a single point");
                let sample = PathSample {
                    time: only.time,
                    target: only.position,
                    heading: 0.0,
                };
                self.cache = CameraPathCache::new(vec![sample], params.pitch, params.distance);
                return Ok(());
            }
            _ => {}
        }

        let positions = track.positions();
        let control = Resample::new(&positions, params.min_separation)
            .with_policy(params.resample_policy)
            .execute_indices();
        let curve = TimedCurve::new(&track.points, &control, params.tension)?;

        let times = sample_times(track.start_time, track.stop_time, params.samples_per_minute);
        let points: Vec<Point3> = times.iter().map(|&t| curve.point_at_time(t)).collect();
        let targets = look_ahead_targets(&times, &points, params.look_ahead, params.look_ahead_half_life);
        let headings = headings_towards(&points, &targets);

        let samples: Vec<PathSample> = times
            .iter()
            .zip(&points)
            .zip(&headings)
            .map(|((&time, &target), &heading)| PathSample {
                time,
                target,
                heading,
            })
            .collect();
        debug!(
            control_points = control.len(),
            samples = samples.len(),
            "pursuit path built"
        );
        self.cache = CameraPathCache::new(samples, params.pitch, params.distance);
        Ok(())
    }

    /// Camera command at `time`, or `None` when no path is built.
    #[must_use]
    pub fn state_at_time(&self, time: f64) -> Option<CameraCommand> {
        self.cache.look_at(time)
    }

    /// Returns the pre-computed samples.
    #[must_use]
    pub fn cache(&self) -> &CameraPathCache {
        &self.cache
    }
}

/// Evenly spaced sample times covering `[start, stop]`, both ends included.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn sample_times(start: f64, stop: f64, samples_per_minute: f64) -> Vec<f64> {
    let duration = (stop - start).max(0.0);
    if duration <= 0.0 {
        return vec![start];
    }
    let density = if samples_per_minute > 0.0 {
        samples_per_minute
    } else {
        1.0
    };
    let wanted = ((duration / 60.0) * density).ceil().max(1.0);
    let cap = MAX_SAMPLE_INTERVALS as f64;
    let intervals = if wanted > cap {
        warn!(
            requested = wanted,
            cap = MAX_SAMPLE_INTERVALS,
            "sample density capped"
        );
        MAX_SAMPLE_INTERVALS
    } else {
        wanted as usize
    };
    let step = duration / intervals as f64;
    let mut times: Vec<f64> = (0..intervals).map(|k| start + step * k as f64).collect();
    times.push(stop);
    times
}

/// Decay weight of a point `age` seconds ahead.
fn weight(age: f64, half_life: f64) -> f64 {
    if half_life > 0.0 {
        (-age / half_life).exp()
    } else {
        0.0
    }
}

/// Look-ahead target of every sample, computed back to front.
///
/// Target `i` averages the points `j > i` with `times[j] - times[i] <=
/// look_ahead` (at least `i + 1`), weighted by `exp(-age / half_life)`.
/// A running decayed sum is carried from `i + 1` to `i`: stepping back by
/// `dt` scales every weight by `exp(-dt / half_life)`, so only the entering
/// point is added and points leaving the window are subtracted.
fn look_ahead_targets(times: &[f64], points: &[Point3], look_ahead: f64, half_life: f64) -> Vec<Point3> {
    let n = points.len();
    let mut targets = points.to_vec();
    if n < 2 || half_life.is_nan() || half_life <= 0.0 {
        return targets;
    }
    // The window holds indices j > i; sums are weighted relative to `times[i]`.
    let mut window: VecDeque<usize> = VecDeque::new();
    let mut sum = Vector3::zeros();
    let mut total = 0.0;

    for i in (0..n - 1).rev() {
        let decay = weight(times[i + 1] - times[i], half_life);
        sum *= decay;
        total *= decay;

        window.push_front(i + 1);
        sum += points[i + 1].coords * decay;
        total += decay;

        while window.len() > 1 {
            let Some(&back) = window.back() else { break };
            let age = times[back] - times[i];
            if age <= look_ahead {
                break;
            }
            let w = weight(age, half_life);
            sum -= points[back].coords * w;
            total -= w;
            window.pop_back();
        }

        // Long gaps underflow the running sum and removals down to a single
        // point leave cancellation residue; recompute those exactly.
        if total <= f64::EPSILON || window.len() < 2 {
            sum = Vector3::zeros();
            total = 0.0;
            for &j in &window {
                let w = weight(times[j] - times[i], half_life);
                sum += points[j].coords * w;
                total += w;
            }
        }

        if total > 0.0 {
            targets[i] = Point3::from(sum / total);
        }
    }
    targets
}

/// Reference O(n²) evaluation of [`look_ahead_targets`].
#[cfg(test)]
fn look_ahead_targets_naive(times: &[f64], points: &[Point3], look_ahead: f64, half_life: f64) -> Vec<Point3> {
    let n = points.len();
    let mut targets = points.to_vec();
    for i in (0..n.saturating_sub(1)).rev() {
        let mut sum = Vector3::zeros();
        let mut total = 0.0;
        for j in i + 1..n {
            let age = times[j] - times[i];
            if j > i + 1 && age > look_ahead {
                break;
            }
            let w = weight(age, half_life);
            sum += points[j].coords * w;
            total += w;
        }
        if total > 0.0 {
            targets[i] = Point3::from(sum / total);
        }
    }
    targets
}

/// Bearing from each point to its target.
///
/// The last sample reuses the previous heading. Samples whose target
/// coincides with the point take the nearest later defined heading, then the
/// nearest earlier one, then north.
fn headings_towards(points: &[Point3], targets: &[Point3]) -> Vec<f64> {
    let n = points.len();
    let mut raw: Vec<Option<f64>> = points
        .iter()
        .zip(targets)
        .map(|(p, t)| initial_bearing(p, t))
        .collect();
    if n >= 2 {
        raw[n - 1] = raw[n - 2];
    }

    let mut headings = vec![None; n];
    let mut next = None;
    for i in (0..n).rev() {
        if raw[i].is_some() {
            next = raw[i];
        }
        headings[i] = raw[i].or(next);
    }
    let mut prev = None;
    headings
        .into_iter()
        .map(|h| {
            if h.is_some() {
                prev = h;
            }
            h.or(prev).unwrap_or(0.0)
        })
        .collect()
}
