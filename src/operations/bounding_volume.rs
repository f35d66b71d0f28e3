use crate::math::geodesy::{from_cartesian, to_cartesian};
use crate::math::{Point3, Vector3};

/// An axis-aligned bounding box in earth-centred Cartesian coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Vector3,
    /// Maximum corner of the bounding box.
    pub max: Vector3,
}

impl Aabb {
    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }
}

/// A bounding sphere around a route.
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// Geodetic centre of the sphere.
    pub center: Point3,
    /// Radius in meters.
    pub radius: f64,
}

/// Computes the bounding volume of a set of geodetic points.
#[derive(Debug)]
pub struct BoundingVolume<'a> {
    points: &'a [Point3],
}

impl<'a> BoundingVolume<'a> {
    /// Creates a new `BoundingVolume` query.
    #[must_use]
    pub fn new(points: &'a [Point3]) -> Self {
        Self { points }
    }

    /// Returns the Cartesian AABB, or `None` for an empty point set.
    #[must_use]
    pub fn aabb(&self) -> Option<Aabb> {
        let mut iter = self.points.iter().map(to_cartesian);
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), v| (lo.inf(&v), hi.sup(&v)));
        Some(Aabb { min, max })
    }

    /// Executes the query, returning a sphere centred on the AABB centre that
    /// contains every point. `None` for an empty point set.
    #[must_use]
    pub fn execute(&self) -> Option<BoundingSphere> {
        let centre = self.aabb()?.center();
        let radius = self
            .points
            .iter()
            .map(|p| (to_cartesian(p) - centre).norm())
            .fold(0.0, f64::max);
        Some(BoundingSphere {
            center: from_cartesian(&centre),
            radius,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::geodesy::surface_distance;

    #[test]
    fn empty_has_no_volume() {
        assert!(BoundingVolume::new(&[]).execute().is_none());
    }

    #[test]
    fn single_point_has_zero_radius() {
        let p = Point3::new(8.5, 47.3, 400.0);
        let s = BoundingVolume::new(&[p]).execute().unwrap();
        assert_abs_diff_eq!(s.radius, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(s.center.x, 8.5, epsilon = 1e-9);
        assert_abs_diff_eq!(s.center.z, 400.0, epsilon = 1e-6);
    }

    #[test]
    fn sphere_contains_all_points() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.01, 0.0, 0.0),
            Point3::new(0.01, 0.01, 100.0),
        ];
        let s = BoundingVolume::new(&pts).execute().unwrap();
        let c = to_cartesian(&s.center);
        for p in &pts {
            assert!((to_cartesian(p) - c).norm() <= s.radius + 1e-6);
        }
        let diagonal = surface_distance(&pts[0], &pts[2]);
        assert!(s.radius < diagonal);
        assert!(s.radius > diagonal / 2.0 - 1.0);
    }
}
