use crate::math::geodesy::distance_3d;
use crate::math::Point3;

/// How [`Resample`] decides whether to keep a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResamplePolicy {
    /// Keep a point once it is at least the separation away from the last kept point.
    #[default]
    FromLastAccepted,
    /// Keep a point when it is at least the separation away from its original predecessor.
    ConsecutiveNeighbors,
}

/// Thins a dense point sequence down to points honoring a minimum spacing.
///
/// The first and last input points are always kept and order is preserved.
/// Distances are measured with [`distance_3d`], so inputs are
/// `(longitude°, latitude°, elevation m)` points and the separation is in meters.
#[derive(Debug)]
pub struct Resample<'a> {
    points: &'a [Point3],
    min_separation: f64,
    policy: ResamplePolicy,
}

impl<'a> Resample<'a> {
    /// Creates a new resample operation using [`ResamplePolicy::FromLastAccepted`].
    #[must_use]
    pub fn new(points: &'a [Point3], min_separation: f64) -> Self {
        Self {
            points,
            min_separation,
            policy: ResamplePolicy::default(),
        }
    }

    /// Selects the acceptance policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ResamplePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Executes the operation, returning the indices of the kept points.
    ///
    /// With a non-positive separation, or fewer than 2 points, every index is
    /// returned unchanged.
    #[must_use]
    pub fn execute_indices(&self) -> Vec<usize> {
        let n = self.points.len();
        if n < 2 || self.min_separation.is_nan() || self.min_separation <= 0.0 {
            return (0..n).collect();
        }

        let mut kept = vec![0];
        for i in 1..n - 1 {
            let anchor = match self.policy {
                ResamplePolicy::FromLastAccepted => kept[kept.len() - 1],
                ResamplePolicy::ConsecutiveNeighbors => i - 1,
            };
            if distance_3d(&self.points[anchor], &self.points[i]) >= self.min_separation {
                kept.push(i);
            }
        }

        // The last point always survives; drop interior points crowding it.
        while kept.len() > 1 {
            let tail = kept[kept.len() - 1];
            if distance_3d(&self.points[tail], &self.points[n - 1]) >= self.min_separation {
                break;
            }
            kept.pop();
        }
        kept.push(n - 1);
        kept
    }

    /// Executes the operation, returning the kept points.
    #[must_use]
    pub fn execute(&self) -> Vec<Point3> {
        self.execute_indices()
            .into_iter()
            .map(|i| self.points[i])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    /// Points along the equator, `step_deg` degrees of longitude apart.
    #[allow(clippy::cast_precision_loss)]
    fn equator(n: usize, step_deg: f64) -> Vec<Point3> {
        (0..n).map(|i| Point3::new(i as f64 * step_deg, 0.0, 0.0)).collect()
    }

    #[test]
    fn non_positive_separation_is_identity() {
        let pts = equator(5, 0.0001);
        assert_eq!(Resample::new(&pts, 0.0).execute_indices(), vec![0, 1, 2, 3, 4]);
        assert_eq!(Resample::new(&pts, -3.0).execute(), pts);
        assert_eq!(Resample::new(&pts, f64::NAN).execute_indices().len(), 5);
    }

    #[test]
    fn short_input_is_identity() {
        let one = equator(1, 0.001);
        assert_eq!(Resample::new(&one, 100.0).execute(), one);
        assert!(Resample::new(&[], 100.0).execute().is_empty());
    }

    #[test]
    fn thins_dense_sequence() {
        // ~11.1 m spacing; keep roughly every third point at 30 m.
        let pts = equator(10, 0.0001);
        let kept = Resample::new(&pts, 30.0).execute_indices();
        assert_eq!(kept, vec![0, 3, 6, 9]);
    }

    #[test]
    fn crowded_tail_point_is_replaced_by_last() {
        let pts = equator(8, 0.0001);
        // Kept before the tail fix: 0, 3, 6; index 6 is ~11 m from index 7.
        let kept = Resample::new(&pts, 30.0).execute_indices();
        assert_eq!(kept, vec![0, 3, 7]);
    }

    #[test]
    fn everything_closer_than_separation_keeps_endpoints() {
        let pts = equator(6, 0.00001);
        let kept = Resample::new(&pts, 1000.0).execute_indices();
        assert_eq!(kept, vec![0, 5]);
    }

    #[test]
    fn consecutive_neighbor_policy_keeps_long_hops_only() {
        let pts = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.00001, 0.0, 0.0),
            Point3::new(0.001, 0.0, 0.0),
            Point3::new(0.00101, 0.0, 0.0),
            Point3::new(0.01, 0.0, 0.0),
        ];
        let kept = Resample::new(&pts, 50.0)
            .with_policy(ResamplePolicy::ConsecutiveNeighbors)
            .execute_indices();
        assert_eq!(kept, vec![0, 2, 4]);
    }

    proptest! {
        #[test]
        fn keeps_endpoints_and_order(
            coords in proptest::collection::vec((-0.01..0.01f64, -0.01..0.01f64, 0.0..50.0f64), 0..40),
            min_separation in 0.0..2000.0f64,
            neighbors in any::<bool>(),
        ) {
            let pts: Vec<Point3> = coords.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect();
            let policy = if neighbors {
                ResamplePolicy::ConsecutiveNeighbors
            } else {
                ResamplePolicy::FromLastAccepted
            };
            let kept = Resample::new(&pts, min_separation).with_policy(policy).execute_indices();
            if pts.is_empty() {
                prop_assert!(kept.is_empty());
            } else {
                prop_assert_eq!(kept[0], 0);
                prop_assert_eq!(kept[kept.len() - 1], pts.len() - 1);
                prop_assert!(kept.windows(2).all(|w| w[0] < w[1]));
            }
            if pts.len() >= 2 && min_separation > 0.0 && !neighbors {
                for w in kept.windows(2) {
                    prop_assert!(distance_3d(&pts[w[0]], &pts[w[1]]) >= min_separation || w[0] == 0);
                }
            }
        }
    }
}
