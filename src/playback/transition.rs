use crate::math::angle::smoothstep;
use crate::strategy::CameraPose;

/// A timed, eased camera flight between two poses.
///
/// Advanced only by frame deltas; there is no independent timer.
#[derive(Debug, Clone)]
pub struct Flight {
    from: CameraPose,
    to: CameraPose,
    duration: f64,
    elapsed: f64,
}

impl Flight {
    /// Creates a flight. A non-positive duration is finished immediately.
    #[must_use]
    pub fn new(from: CameraPose, to: CameraPose, duration: f64) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advances by `delta` seconds and returns the pose to show.
    pub fn advance(&mut self, delta: f64) -> CameraPose {
        self.elapsed = (self.elapsed + delta.max(0.0)).min(self.duration);
        self.pose()
    }

    /// Pose at the current progress.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        if self.is_finished() {
            return self.to;
        }
        self.from.lerp(&self.to, smoothstep(self.elapsed / self.duration))
    }

    /// Whether the flight has reached its destination.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::Point3;

    fn pose(x: f64, heading: f64) -> CameraPose {
        CameraPose {
            position: Point3::new(x, 0.0, 1000.0),
            heading,
            pitch: -30.0,
            roll: 0.0,
        }
    }

    #[test]
    fn zero_duration_is_already_finished() {
        let f = Flight::new(pose(0.0, 0.0), pose(1.0, 90.0), 0.0);
        assert!(f.is_finished());
        assert_abs_diff_eq!(f.pose().position.x, 1.0);
    }

    #[test]
    fn eases_towards_destination() {
        let mut f = Flight::new(pose(0.0, 0.0), pose(1.0, 90.0), 4.0);
        let quarter = f.advance(1.0);
        assert!(quarter.position.x > 0.0 && quarter.position.x < 0.25);
        let half = f.advance(1.0);
        assert_abs_diff_eq!(half.position.x, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(half.heading, 45.0, epsilon = 1e-9);
        assert!(!f.is_finished());
        let end = f.advance(10.0);
        assert!(f.is_finished());
        assert_abs_diff_eq!(end.position.x, 1.0);
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut f = Flight::new(pose(0.0, 0.0), pose(1.0, 0.0), 2.0);
        f.advance(1.0);
        let p = f.advance(-5.0);
        assert_abs_diff_eq!(p.position.x, 0.5, epsilon = 1e-12);
    }
}
