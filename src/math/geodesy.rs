//! Spherical-earth geodesy on `(longitude°, latitude°, elevation m)` points.

use super::{Point3, Vector3, TOLERANCE};

/// Mean earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between the ground projections of two points (haversine).
#[must_use]
pub fn surface_distance(a: &Point3, b: &Point3) -> f64 {
    let phi1 = a.y.to_radians();
    let phi2 = b.y.to_radians();
    let d_phi = (b.y - a.y).to_radians();
    let d_lambda = (b.x - a.x).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Distance combining the great-circle ground distance with the elevation change.
#[must_use]
pub fn distance_3d(a: &Point3, b: &Point3) -> f64 {
    surface_distance(a, b).hypot(b.z - a.z)
}

/// Interpolates between two geodetic points.
///
/// Longitude moves along the shorter way round, so a segment crossing the
/// antimeridian stays short; the result is wrapped back into `[-180, 180]`.
#[must_use]
pub fn lerp_position(a: &Point3, b: &Point3, fraction: f64) -> Point3 {
    let lon = a.x + super::angle::shortest_delta(a.x, b.x) * fraction;
    let lon = if lon > 180.0 {
        lon - 360.0
    } else if lon < -180.0 {
        lon + 360.0
    } else {
        lon
    };
    Point3::new(lon, a.y + (b.y - a.y) * fraction, a.z + (b.z - a.z) * fraction)
}

/// Initial great-circle bearing from `from` towards `to`, in degrees `[0, 360)`.
///
/// Returns `None` when the two points share a ground position.
#[must_use]
pub fn initial_bearing(from: &Point3, to: &Point3) -> Option<f64> {
    let phi1 = from.y.to_radians();
    let phi2 = to.y.to_radians();
    let d_lambda = (to.x - from.x).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    if y.abs() < TOLERANCE && x.abs() < TOLERANCE {
        return None;
    }
    Some(super::angle::normalize_degrees(y.atan2(x).to_degrees()))
}

/// Converts a geodetic point into earth-centred Cartesian coordinates (meters).
#[must_use]
pub fn to_cartesian(p: &Point3) -> Vector3 {
    let lon = p.x.to_radians();
    let lat = p.y.to_radians();
    let r = EARTH_RADIUS_M + p.z;
    Vector3::new(r * lat.cos() * lon.cos(), r * lat.cos() * lon.sin(), r * lat.sin())
}

/// Converts earth-centred Cartesian coordinates back into a geodetic point.
#[must_use]
pub fn from_cartesian(v: &Vector3) -> Point3 {
    let r = v.norm();
    if r < TOLERANCE {
        return Point3::new(0.0, 0.0, -EARTH_RADIUS_M);
    }
    let lat = (v.z / r).clamp(-1.0, 1.0).asin();
    let lon = v.y.atan2(v.x);
    Point3::new(lon.to_degrees(), lat.to_degrees(), r - EARTH_RADIUS_M)
}

/// Local east-north-up frame at a geodetic point.
#[derive(Debug, Clone, Copy)]
pub struct EnuFrame {
    /// Cartesian origin of the frame.
    pub origin: Vector3,
    /// Unit east axis.
    pub east: Vector3,
    /// Unit north axis.
    pub north: Vector3,
    /// Unit up axis.
    pub up: Vector3,
}

impl EnuFrame {
    /// Builds the frame anchored at `p`.
    #[must_use]
    pub fn at(p: &Point3) -> Self {
        let lon = p.x.to_radians();
        let lat = p.y.to_radians();
        let (sin_lon, cos_lon) = lon.sin_cos();
        let (sin_lat, cos_lat) = lat.sin_cos();
        Self {
            origin: to_cartesian(p),
            east: Vector3::new(-sin_lon, cos_lon, 0.0),
            north: Vector3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat),
            up: Vector3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        }
    }

    /// Expresses local `(east, north, up)` components as a Cartesian direction.
    #[must_use]
    pub fn to_world(&self, local: &Vector3) -> Vector3 {
        self.east * local.x + self.north * local.y + self.up * local.z
    }

    /// Projects a Cartesian direction onto the local axes.
    #[must_use]
    pub fn to_local(&self, world: &Vector3) -> Vector3 {
        Vector3::new(world.dot(&self.east), world.dot(&self.north), world.dot(&self.up))
    }
}

/// Unit view direction for a compass heading and pitch (degrees) in ENU components.
///
/// Negative pitch looks below the horizon.
#[must_use]
pub fn direction_enu(heading: f64, pitch: f64) -> Vector3 {
    let (sin_h, cos_h) = heading.to_radians().sin_cos();
    let (sin_p, cos_p) = pitch.to_radians().sin_cos();
    Vector3::new(sin_h * cos_p, cos_h * cos_p, sin_p)
}

/// Heading and pitch (degrees) of an ENU direction vector.
///
/// Straight up or down directions report a heading of 0°.
#[must_use]
pub fn heading_pitch_enu(dir: &Vector3) -> (f64, f64) {
    let horizontal = dir.x.hypot(dir.y);
    let heading = if horizontal < TOLERANCE {
        0.0
    } else {
        super::angle::normalize_degrees(dir.x.atan2(dir.y).to_degrees())
    };
    let pitch = dir.z.atan2(horizontal).to_degrees();
    (heading, pitch)
}
