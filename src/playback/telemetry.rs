use chrono::DateTime;

use crate::geometry::{MetricSample, TimestampKind, TrackData};

/// Analytics at the current tour time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LiveMetrics {
    /// Seconds since the start of the tour.
    pub elapsed_time: f64,
    /// Cumulative distance covered, meters.
    pub distance: f64,
    /// Cumulative elevation gain, meters.
    pub ascent: f64,
    /// Cumulative energy spent.
    pub energy: f64,
    /// Actual rate averaged over the smoothing window.
    pub actual_rate: f64,
    /// Planned rate averaged over the smoothing window.
    pub planned_rate: f64,
}

/// Per-frame playback readout.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    /// Elapsed-time fraction, `[0, 1]`.
    pub progress: f64,
    /// Wall-clock or elapsed time, see [`time_label`].
    pub time_label: String,
    /// `None` when the route carries no metric samples.
    pub live_metrics: Option<LiveMetrics>,
}

impl Telemetry {
    /// Builds the readout for `time`; NaN reads as the tour start.
    #[must_use]
    pub fn at(track: &TrackData, time: f64, rate_window: f64) -> Self {
        let time = if time.is_nan() { track.start_time } else { time };
        Self {
            progress: track.progress(time),
            time_label: time_label(track, time),
            live_metrics: live_metrics(track, time, rate_window),
        }
    }
}

/// Wall-clock `HH:MM:SS` (UTC) for absolute timestamps, elapsed `H:MM:SS`
/// otherwise.
#[must_use]
pub fn time_label(track: &TrackData, time: f64) -> String {
    let time = time.clamp(track.start_time, track.start_time.max(track.stop_time));
    if track.timestamps == TimestampKind::Absolute {
        #[allow(clippy::cast_possible_truncation)]
        let seconds = time.floor() as i64;
        if let Some(stamp) = DateTime::from_timestamp(seconds, 0) {
            return stamp.format("%H:%M:%S").to_string();
        }
    }
    elapsed_label(time - track.start_time)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn elapsed_label(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{}:{:02}:{:02}", total / 3600, total / 60 % 60, total % 60)
}

/// Metrics of the last sample at or before `time`; before the first sample
/// the first one is used.
#[must_use]
pub fn live_metrics(track: &TrackData, time: f64, rate_window: f64) -> Option<LiveMetrics> {
    let metrics = &track.metrics;
    let index = metrics
        .iter()
        .take_while(|m| m.time <= time)
        .count()
        .saturating_sub(1);
    let sample = metrics.get(index)?;
    let (actual_rate, planned_rate) = smoothed_rates(&metrics[..=index], rate_window);
    Some(LiveMetrics {
        elapsed_time: (time - track.start_time).clamp(0.0, track.duration()),
        distance: sample.distance,
        ascent: sample.ascent,
        energy: sample.energy,
        actual_rate,
        planned_rate,
    })
}

/// Mean rates over the samples within `window` seconds of the last one.
#[allow(clippy::cast_precision_loss)]
fn smoothed_rates(history: &[MetricSample], window: f64) -> (f64, f64) {
    let Some(last) = history.last() else {
        return (0.0, 0.0);
    };
    let from = last.time - window.max(0.0);
    let (count, actual, planned) = history
        .iter()
        .rev()
        .take_while(|m| m.time >= from)
        .fold((0usize, 0.0, 0.0), |(n, a, p), m| {
            (n + 1, a + m.actual_rate, p + m.planned_rate)
        });
    if count == 0 {
        return (last.actual_rate, last.planned_rate);
    }
    (actual / count as f64, planned / count as f64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::TrackPoint;

    fn track(start: f64, stop: f64) -> TrackData {
        TrackData::new(vec![
            TrackPoint::new(0.0, 0.0, 0.0, start),
            TrackPoint::new(0.01, 0.0, 0.0, stop),
        ])
    }

    fn sample(time: f64, distance: f64, rate: f64) -> MetricSample {
        MetricSample {
            time,
            distance,
            ascent: distance / 10.0,
            energy: time * 2.0,
            actual_rate: rate,
            planned_rate: rate + 1.0,
        }
    }

    #[test]
    fn relative_label_counts_elapsed_time() {
        let t = track(100.0, 100.0 + 4000.0);
        assert_eq!(time_label(&t, 100.0), "0:00:00");
        assert_eq!(time_label(&t, 100.0 + 3725.9), "1:02:05");
        assert_eq!(time_label(&t, 50.0), "0:00:00");
    }

    #[test]
    fn absolute_label_is_utc_wall_clock() {
        // 2021-01-01T12:34:56Z
        let start = 1_609_504_496.0;
        let t = track(start, start + 600.0).with_absolute_timestamps();
        assert_eq!(time_label(&t, start), "12:34:56");
        assert_eq!(time_label(&t, start + 65.0), "12:36:01");
    }

    #[test]
    fn progress_is_clamped() {
        let t = track(0.0, 200.0);
        assert_abs_diff_eq!(Telemetry::at(&t, 50.0, 60.0).progress, 0.25);
        assert_abs_diff_eq!(Telemetry::at(&t, 500.0, 60.0).progress, 1.0);
        assert_abs_diff_eq!(Telemetry::at(&t, -5.0, 60.0).progress, 0.0);
    }

    #[test]
    fn nan_time_reads_as_start() {
        let t = track(0.0, 200.0).with_metrics(vec![sample(0.0, 0.0, 1.0)]);
        let at = Telemetry::at(&t, f64::NAN, 60.0);
        assert_abs_diff_eq!(at.progress, 0.0);
        assert_eq!(at.time_label, "0:00:00");
        assert_abs_diff_eq!(at.live_metrics.unwrap().elapsed_time, 0.0);
    }

    #[test]
    fn no_metrics_no_live_metrics() {
        assert!(Telemetry::at(&track(0.0, 10.0), 5.0, 60.0).live_metrics.is_none());
    }

    #[test]
    fn picks_last_sample_at_or_before_time() {
        let t = track(0.0, 100.0).with_metrics(vec![
            sample(0.0, 0.0, 1.0),
            sample(10.0, 50.0, 3.0),
            sample(20.0, 120.0, 5.0),
        ]);
        let m = live_metrics(&t, 15.0, 0.0).unwrap();
        assert_abs_diff_eq!(m.distance, 50.0);
        assert_abs_diff_eq!(m.elapsed_time, 15.0);
        assert_abs_diff_eq!(m.actual_rate, 3.0);
        let exact = live_metrics(&t, 20.0, 0.0).unwrap();
        assert_abs_diff_eq!(exact.distance, 120.0);
        let before = live_metrics(&t, -1.0, 0.0).unwrap();
        assert_abs_diff_eq!(before.distance, 0.0);
    }

    #[test]
    fn rates_average_over_window() {
        let t = track(0.0, 100.0).with_metrics(vec![
            sample(0.0, 0.0, 1.0),
            sample(10.0, 50.0, 3.0),
            sample(20.0, 120.0, 5.0),
        ]);
        let m = live_metrics(&t, 25.0, 10.0).unwrap();
        assert_abs_diff_eq!(m.actual_rate, 4.0);
        assert_abs_diff_eq!(m.planned_rate, 5.0);
        let all = live_metrics(&t, 25.0, 60.0).unwrap();
        assert_abs_diff_eq!(all.actual_rate, 3.0);
    }
}
