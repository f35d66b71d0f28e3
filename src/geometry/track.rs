use crate::math::geodesy::{distance_3d, lerp_position};
use crate::math::Point3;

/// A single recorded route position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    /// Longitude (°), latitude (°), elevation (m).
    pub position: Point3,
    /// Timestamp in seconds.
    pub time: f64,
}

impl TrackPoint {
    /// Creates a track point from longitude, latitude, elevation and time.
    #[must_use]
    pub fn new(lon: f64, lat: f64, elevation: f64, time: f64) -> Self {
        Self {
            position: Point3::new(lon, lat, elevation),
            time,
        }
    }
}

/// How the timestamps of a route should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampKind {
    /// Seconds since the Unix epoch, as recorded by the device.
    Absolute,
    /// Synthetic seconds; only the elapsed duration is meaningful.
    #[default]
    Relative,
}

/// One row of the analytics array produced upstream for the route.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricSample {
    /// Timestamp in seconds, on the same clock as [`TrackPoint::time`].
    pub time: f64,
    /// Cumulative distance in meters.
    pub distance: f64,
    /// Cumulative ascent in meters.
    pub ascent: f64,
    /// Cumulative energy (kcal).
    pub energy: f64,
    /// Measured rate (e.g. pace or speed) at this sample.
    pub actual_rate: f64,
    /// Planned rate at this sample.
    pub planned_rate: f64,
}

/// A loaded route, immutable for the duration of a tour.
#[derive(Debug, Clone, Default)]
pub struct TrackData {
    /// Ordered route positions.
    pub points: Vec<TrackPoint>,
    /// Tour start time (seconds).
    pub start_time: f64,
    /// Tour stop time (seconds).
    pub stop_time: f64,
    /// Interpretation of the timestamps.
    pub timestamps: TimestampKind,
    /// Analytics samples, ordered by time. May be empty.
    pub metrics: Vec<MetricSample>,
}

impl TrackData {
    /// Creates route data spanning the first to the last point's timestamp.
    #[must_use]
    pub fn new(points: Vec<TrackPoint>) -> Self {
        let start_time = points.first().map_or(0.0, |p| p.time);
        let stop_time = points.last().map_or(0.0, |p| p.time);
        Self {
            points,
            start_time,
            stop_time,
            timestamps: TimestampKind::Relative,
            metrics: Vec::new(),
        }
    }

    /// Marks the timestamps as absolute epoch seconds.
    #[must_use]
    pub fn with_absolute_timestamps(mut self) -> Self {
        self.timestamps = TimestampKind::Absolute;
        self
    }

    /// Attaches the analytics array.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Vec<MetricSample>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Tour duration in seconds, never negative.
    #[must_use]
    pub fn duration(&self) -> f64 {
        (self.stop_time - self.start_time).max(0.0)
    }

    /// Elapsed-time fraction of `time` within the tour, clamped to `[0, 1]`.
    ///
    /// A zero-length tour reports `1.0` once `time` reaches its start.
    #[must_use]
    pub fn progress(&self, time: f64) -> f64 {
        let duration = self.duration();
        if duration <= 0.0 {
            return if time >= self.start_time { 1.0 } else { 0.0 };
        }
        ((time - self.start_time) / duration).clamp(0.0, 1.0)
    }

    /// Returns the point positions in order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Position of the route at `time`, linearly interpolated and clamped to the ends.
    ///
    /// Returns `None` for an empty route or a NaN `time`.
    #[must_use]
    pub fn position_at(&self, time: f64) -> Option<Point3> {
        if time.is_nan() {
            return None;
        }
        let first = self.points.first()?;
        let last = self.points.last()?;
        if time <= first.time {
            return Some(first.position);
        }
        if time >= last.time {
            return Some(last.position);
        }
        // First index whose time is strictly after `time`; always in 1..len here.
        let hi = self.points.partition_point(|p| p.time <= time);
        let a = &self.points[hi - 1];
        let b = &self.points[hi];
        let span = b.time - a.time;
        if span <= 0.0 {
            return Some(a.position);
        }
        let f = (time - a.time) / span;
        Some(lerp_position(&a.position, &b.position, f))
    }
}

/// Cumulative 3D distance at every point, starting at zero.
#[must_use]
pub fn cumulative_distances(points: &[TrackPoint]) -> Vec<f64> {
    let mut total = 0.0;
    std::iter::once(0.0)
        .chain(points.windows(2).map(|w| {
            total += distance_3d(&w[0].position, &w[1].position);
            total
        }))
        .take(points.len())
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn straight() -> TrackData {
        TrackData::new(vec![
            TrackPoint::new(0.0, 0.0, 0.0, 0.0),
            TrackPoint::new(0.0, 0.001, 10.0, 10.0),
            TrackPoint::new(0.0, 0.002, 20.0, 20.0),
        ])
    }

    #[test]
    fn times_come_from_endpoints() {
        let t = straight();
        assert_abs_diff_eq!(t.start_time, 0.0);
        assert_abs_diff_eq!(t.stop_time, 20.0);
        assert_abs_diff_eq!(t.duration(), 20.0);
    }

    #[test]
    fn progress_is_clamped() {
        let t = straight();
        assert_abs_diff_eq!(t.progress(-5.0), 0.0);
        assert_abs_diff_eq!(t.progress(5.0), 0.25);
        assert_abs_diff_eq!(t.progress(50.0), 1.0);
    }

    #[test]
    fn position_interpolates_between_points() {
        let p = straight().position_at(5.0).unwrap();
        assert_abs_diff_eq!(p.y, 0.0005, epsilon = 1e-12);
        assert_abs_diff_eq!(p.z, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn position_clamps_outside_range() {
        let t = straight();
        assert_abs_diff_eq!(t.position_at(-1.0).unwrap().y, 0.0);
        assert_abs_diff_eq!(t.position_at(99.0).unwrap().y, 0.002);
    }

    #[test]
    fn position_of_empty_route_is_none() {
        assert!(TrackData::default().position_at(0.0).is_none());
    }

    #[test]
    fn duplicate_timestamps_return_earlier_point() {
        let t = TrackData::new(vec![
            TrackPoint::new(0.0, 0.0, 0.0, 0.0),
            TrackPoint::new(1.0, 0.0, 0.0, 5.0),
            TrackPoint::new(2.0, 0.0, 0.0, 5.0),
            TrackPoint::new(3.0, 0.0, 0.0, 10.0),
        ]);
        let p = t.position_at(5.0).unwrap();
        assert_abs_diff_eq!(p.x, 2.0);
    }

    #[test]
    fn cumulative_distance_is_monotonic() {
        let d = cumulative_distances(&straight().points);
        assert_eq!(d.len(), 3);
        assert_abs_diff_eq!(d[0], 0.0);
        assert!(d[1] > 0.0 && d[2] > d[1]);
    }

    #[test]
    fn nan_time_has_no_position() {
        assert!(straight().position_at(f64::NAN).is_none());
    }

    #[test]
    fn position_crosses_antimeridian_the_short_way() {
        let t = TrackData::new(vec![
            TrackPoint::new(179.9, 0.0, 0.0, 0.0),
            TrackPoint::new(-179.9, 0.0, 0.0, 10.0),
        ]);
        assert_abs_diff_eq!(t.position_at(2.5).unwrap().x, 179.95, epsilon = 1e-9);
        assert_abs_diff_eq!(t.position_at(7.5).unwrap().x, -179.95, epsilon = 1e-9);
    }
}
