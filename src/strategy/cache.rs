use crate::math::angle::lerp_heading;
use crate::math::geodesy::lerp_position;
use crate::math::Point3;

use super::command::{CameraCommand, LookAt};

/// One pre-computed camera sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Timestamp in seconds.
    pub time: f64,
    /// Geodetic look-at target.
    pub target: Point3,
    /// Compass heading, degrees.
    pub heading: f64,
}

/// Time-ordered look-at samples with constant pitch and distance.
///
/// Queries outside the sampled range clamp to the boundary sample.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraPathCache {
    samples: Vec<PathSample>,
    pitch: f64,
    distance: f64,
}

impl CameraPathCache {
    /// Wraps samples already ordered by time.
    #[must_use]
    pub fn new(samples: Vec<PathSample>, pitch: f64, distance: f64) -> Self {
        debug_assert!(samples.windows(2).all(|w| w[0].time <= w[1].time));
        Self {
            samples,
            pitch,
            distance,
        }
    }

    /// Returns the cached samples.
    #[must_use]
    pub fn samples(&self) -> &[PathSample] {
        &self.samples
    }

    /// Returns whether the cache holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interpolated look-at at `time`, or `None` when the cache is empty or
    /// `time` is NaN.
    #[must_use]
    pub fn look_at(&self, time: f64) -> Option<CameraCommand> {
        if time.is_nan() {
            return None;
        }
        let first = self.samples.first()?;
        let last = self.samples[self.samples.len() - 1];
        let (target, heading) = if time <= first.time {
            (first.target, first.heading)
        } else if time >= last.time {
            (last.target, last.heading)
        } else {
            let hi = self.samples.partition_point(|s| s.time <= time);
            let a = &self.samples[hi - 1];
            let b = &self.samples[hi];
            let span = b.time - a.time;
            if span <= 0.0 {
                (a.target, a.heading)
            } else {
                let f = (time - a.time) / span;
                (
                    lerp_position(&a.target, &b.target, f),
                    lerp_heading(a.heading, b.heading, f),
                )
            }
        };
        Some(CameraCommand::LookAt(LookAt {
            target,
            heading,
            pitch: self.pitch,
            distance: self.distance,
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn sample(time: f64, x: f64, heading: f64) -> PathSample {
        PathSample {
            time,
            target: Point3::new(x, 0.0, 0.0),
            heading,
        }
    }

    fn look(cache: &CameraPathCache, time: f64) -> LookAt {
        match cache.look_at(time).unwrap() {
            CameraCommand::LookAt(l) => l,
            CameraCommand::AbsolutePose(_) => panic!("expected look-at"),
        }
    }

    #[test]
    fn empty_cache_has_no_command() {
        assert!(CameraPathCache::default().look_at(1.0).is_none());
    }

    #[test]
    fn interpolates_target_and_heading() {
        let cache = CameraPathCache::new(
            vec![sample(0.0, 0.0, 350.0), sample(10.0, 1.0, 10.0)],
            -30.0,
            500.0,
        );
        let l = look(&cache, 5.0);
        assert_abs_diff_eq!(l.target.x, 0.5);
        assert!(l.heading < 1e-9 || l.heading > 360.0 - 1e-9);
        assert_abs_diff_eq!(l.pitch, -30.0);
        assert_abs_diff_eq!(l.distance, 500.0);
    }

    #[test]
    fn clamps_outside_range() {
        let cache = CameraPathCache::new(
            vec![sample(0.0, 0.0, 0.0), sample(10.0, 1.0, 90.0)],
            -30.0,
            500.0,
        );
        assert_abs_diff_eq!(look(&cache, -5.0).target.x, 0.0);
        assert_abs_diff_eq!(look(&cache, 50.0).heading, 90.0);
    }

    #[test]
    fn single_sample_is_static() {
        let cache = CameraPathCache::new(vec![sample(3.0, 2.0, 45.0)], -30.0, 500.0);
        for t in [-1.0, 3.0, 100.0] {
            assert_abs_diff_eq!(look(&cache, t).target.x, 2.0);
        }
    }

    #[test]
    fn nan_time_has_no_command() {
        let cache = CameraPathCache::new(
            vec![sample(0.0, 0.0, 0.0), sample(10.0, 1.0, 90.0)],
            -30.0,
            500.0,
        );
        assert!(cache.look_at(f64::NAN).is_none());
        assert_abs_diff_eq!(look(&cache, f64::INFINITY).heading, 90.0);
        assert_abs_diff_eq!(look(&cache, f64::NEG_INFINITY).target.x, 0.0);
    }

    #[test]
    fn target_crosses_antimeridian_the_short_way() {
        let cache = CameraPathCache::new(
            vec![sample(0.0, 179.8, 90.0), sample(10.0, -179.8, 90.0)],
            -30.0,
            500.0,
        );
        let quarter = look(&cache, 2.5).target.x;
        assert_abs_diff_eq!(quarter, 179.9, epsilon = 1e-9);
        let three_quarters = look(&cache, 7.5).target.x;
        assert_abs_diff_eq!(three_quarters, -179.9, epsilon = 1e-9);
    }
}
