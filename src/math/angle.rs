//! Heading arithmetic in degrees.
//!
//! Headings are compass bearings: 0° is north, 90° is east, increasing
//! clockwise. All results are normalized into `[0, 360)`.

/// Normalizes an angle in degrees into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed difference `to - from` along the shorter arc, in `(-180, 180]`.
#[must_use]
pub fn shortest_delta(from: f64, to: f64) -> f64 {
    let d = normalize_degrees(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Interpolates between two headings along the shorter arc.
///
/// `fraction` is clamped to `[0, 1]`.
#[must_use]
pub fn lerp_heading(from: f64, to: f64, fraction: f64) -> f64 {
    let f = fraction.clamp(0.0, 1.0);
    normalize_degrees(from + shortest_delta(from, to) * f)
}

/// Hermite smoothstep on `[0, 1]`, used to ease camera flights.
#[must_use]
pub fn smoothstep(x: f64) -> f64 {
    let t = x.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn normalize_wraps_negative_and_large() {
        assert_abs_diff_eq!(normalize_degrees(-90.0), 270.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_degrees(720.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_degrees(365.0), 5.0, epsilon = 1e-12);
        assert!(normalize_degrees(-1e-20) < 360.0);
    }

    #[test]
    fn shortest_delta_crosses_north() {
        assert_abs_diff_eq!(shortest_delta(350.0, 10.0), 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_delta(10.0, 350.0), -20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shortest_delta(0.0, 180.0), 180.0, epsilon = 1e-12);
    }

    #[test]
    fn lerp_takes_short_way_through_north() {
        let mid = lerp_heading(350.0, 10.0, 0.5);
        assert!(mid < 1e-9 || (360.0 - mid) < 1e-9, "got {mid}");
        assert_abs_diff_eq!(lerp_heading(350.0, 10.0, 0.25), 355.0, epsilon = 1e-9);
        assert_abs_diff_eq!(lerp_heading(350.0, 10.0, 0.75), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn smoothstep_endpoints() {
        assert_abs_diff_eq!(smoothstep(-1.0), 0.0);
        assert_abs_diff_eq!(smoothstep(0.5), 0.5);
        assert_abs_diff_eq!(smoothstep(2.0), 1.0);
    }

    proptest! {
        #[test]
        fn lerp_never_sweeps_more_than_half_turn(a in 0.0..360.0f64, b in 0.0..360.0f64, f in 0.0..1.0f64) {
            let h = lerp_heading(a, b, f);
            let travelled = shortest_delta(a, h).abs();
            prop_assert!(travelled <= shortest_delta(a, b).abs() + 1e-9);
            prop_assert!((0.0..360.0).contains(&h));
        }
    }
}
