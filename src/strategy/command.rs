use crate::math::angle::{lerp_heading, normalize_degrees};
use crate::math::geodesy::{direction_enu, from_cartesian, heading_pitch_enu, lerp_position, EnuFrame};
use crate::math::Point3;

/// An absolute camera pose.
///
/// `position` is geodetic; angles are degrees. Heading is a compass bearing,
/// negative pitch looks down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Point3,
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl CameraPose {
    /// Interpolates towards `other`; heading takes the shorter arc.
    #[must_use]
    pub fn lerp(&self, other: &Self, fraction: f64) -> Self {
        let f = fraction.clamp(0.0, 1.0);
        Self {
            position: lerp_position(&self.position, &other.position, f),
            heading: lerp_heading(self.heading, other.heading, f),
            pitch: self.pitch + (other.pitch - self.pitch) * f,
            roll: self.roll + (other.roll - self.roll) * f,
        }
    }
}

/// A camera directive expressed relative to a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAt {
    /// Geodetic point the camera looks at.
    pub target: Point3,
    /// Compass heading of the view direction, degrees.
    pub heading: f64,
    /// Pitch of the view direction, degrees.
    pub pitch: f64,
    /// Distance from camera to target, meters.
    pub distance: f64,
}

/// What a strategy asks the viewport to do for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    AbsolutePose(CameraPose),
    LookAt(LookAt),
}

impl CameraCommand {
    /// Converts the command into an absolute pose.
    ///
    /// A look-at is resolved in the target's east-north-up frame: the camera
    /// sits `distance` meters behind the target along the view direction. The
    /// heading and pitch are then re-derived in the camera's own frame, which
    /// differs from the target's over long distances, and roll is zero.
    #[must_use]
    pub fn to_pose(&self) -> CameraPose {
        match self {
            Self::AbsolutePose(pose) => *pose,
            Self::LookAt(look) => {
                let target_frame = EnuFrame::at(&look.target);
                let view = target_frame.to_world(&direction_enu(look.heading, look.pitch));
                let camera = target_frame.origin - view * look.distance;
                let position = from_cartesian(&camera);

                let camera_frame = EnuFrame::at(&position);
                let to_target = target_frame.origin - camera;
                let (heading, pitch) = if to_target.norm() > crate::math::TOLERANCE {
                    heading_pitch_enu(&camera_frame.to_local(&to_target))
                } else {
                    (normalize_degrees(look.heading), look.pitch)
                };
                CameraPose {
                    position,
                    heading,
                    pitch,
                    roll: 0.0,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::angle::shortest_delta;
    use crate::math::geodesy::distance_3d;

    #[test]
    fn absolute_pose_is_unchanged() {
        let pose = CameraPose {
            position: Point3::new(1.0, 2.0, 3.0),
            heading: 10.0,
            pitch: -5.0,
            roll: 2.0,
        };
        assert_eq!(CameraCommand::AbsolutePose(pose).to_pose(), pose);
    }

    #[test]
    fn look_at_places_camera_behind_and_above() {
        let look = LookAt {
            target: Point3::new(10.0, 45.0, 200.0),
            heading: 0.0,
            pitch: -30.0,
            distance: 1000.0,
        };
        let pose = CameraCommand::LookAt(look).to_pose();
        // Looking north means standing south of the target.
        assert!(pose.position.y < look.target.y);
        assert_abs_diff_eq!(pose.position.x, 10.0, epsilon = 1e-9);
        // 1000 m at -30° pitch puts the camera ~500 m higher.
        assert_abs_diff_eq!(pose.position.z - look.target.z, 500.0, epsilon = 1.0);
        assert_abs_diff_eq!(distance_3d(&pose.position, &look.target), 1000.0, epsilon = 1.0);
        assert!(shortest_delta(pose.heading, 0.0).abs() < 1e-6, "heading {}", pose.heading);
        assert_abs_diff_eq!(pose.pitch, -30.0, epsilon = 0.05);
        assert_abs_diff_eq!(pose.roll, 0.0);
    }

    #[test]
    fn look_at_keeps_heading_for_other_directions() {
        let look = LookAt {
            target: Point3::new(-3.0, 51.0, 0.0),
            heading: 250.0,
            pitch: -45.0,
            distance: 2000.0,
        };
        let pose = CameraCommand::LookAt(look).to_pose();
        assert_abs_diff_eq!(pose.heading, 250.0, epsilon = 0.05);
        assert_abs_diff_eq!(pose.pitch, -45.0, epsilon = 0.05);
    }

    #[test]
    fn zero_distance_look_at_sits_on_target() {
        let look = LookAt {
            target: Point3::new(0.0, 0.0, 0.0),
            heading: -90.0,
            pitch: -10.0,
            distance: 0.0,
        };
        let pose = CameraCommand::LookAt(look).to_pose();
        assert_abs_diff_eq!(pose.heading, 270.0);
        assert_abs_diff_eq!(pose.position.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn pose_lerp_wraps_heading() {
        let a = CameraPose {
            position: Point3::new(0.0, 0.0, 0.0),
            heading: 350.0,
            pitch: 0.0,
            roll: 0.0,
        };
        let b = CameraPose {
            position: Point3::new(2.0, 0.0, 100.0),
            heading: 10.0,
            pitch: -20.0,
            roll: 0.0,
        };
        let mid = a.lerp(&b, 0.5);
        assert_abs_diff_eq!(mid.position.x, 1.0);
        assert_abs_diff_eq!(mid.position.z, 50.0);
        assert!(mid.heading < 1e-9 || mid.heading > 360.0 - 1e-9);
        assert_abs_diff_eq!(mid.pitch, -10.0);
    }
}
