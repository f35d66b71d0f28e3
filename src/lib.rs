pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod playback;
pub mod strategy;

pub use config::{ParameterKey, ParameterSource, ParameterStore, ParameterValue, StrategyParameters};
pub use error::{Result, TourError};
pub use geometry::{TrackData, TrackPoint};
pub use playback::{Director, FrameTime, PlaybackState, Telemetry, Viewport};
pub use strategy::{CameraCommand, CameraPose, LookAt, StrategyKind, ViewStrategy};
