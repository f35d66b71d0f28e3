pub mod curve;
pub mod track;

pub use curve::{CatmullRom, Curve, CurveDomain, CurveSample, TimedCurve};
pub use track::{MetricSample, TimestampKind, TrackData, TrackPoint};
