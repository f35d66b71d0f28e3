//! Strategy configuration read from an external store.
//!
//! The store is reached through [`ParameterSource`], a synchronous key lookup.
//! [`StrategyParameters`] is the typed snapshot strategies build from; it is
//! itself a `ParameterSource`, so tests can pass a plain struct.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::warn;

use crate::error::ConfigurationError;
use crate::operations::ResamplePolicy;

/// Keys understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    /// Name of the view strategy (`"orbit"`, `"pursuit"`, `"interactive"`).
    Strategy,
    /// Camera pitch in degrees; negative looks down.
    Pitch,
    /// Camera distance from the target in meters.
    Distance,
    /// Minimum spacing of curve control points in meters.
    MinSeparation,
    /// Resampling policy (`"last-accepted"` or `"neighbors"`).
    ResamplePolicy,
    /// Catmull-Rom tension.
    Tension,
    /// Look-ahead window in seconds.
    LookAhead,
    /// Look-ahead decay half-life in seconds.
    LookAheadHalfLife,
    /// Curve samples per minute of tour.
    SamplesPerMinute,
    /// Orbit sweep in degrees per cycle.
    AzimuthSweep,
    /// Orbit cycles over the whole tour.
    AzimuthFrequency,
    /// Duration of the entry flight in seconds.
    EntryDuration,
    /// Duration of the exit flight in seconds.
    ExitDuration,
    /// Averaging window for telemetry rates in seconds.
    RateSmoothingWindow,
}

impl ParameterKey {
    /// Stable name of the key, as used by the host's store.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Strategy => "strategy",
            Self::Pitch => "pitch",
            Self::Distance => "distance",
            Self::MinSeparation => "min_separation",
            Self::ResamplePolicy => "resample_policy",
            Self::Tension => "tension",
            Self::LookAhead => "look_ahead",
            Self::LookAheadHalfLife => "look_ahead_half_life",
            Self::SamplesPerMinute => "samples_per_minute",
            Self::AzimuthSweep => "azimuth_sweep",
            Self::AzimuthFrequency => "azimuth_frequency",
            Self::EntryDuration => "entry_duration",
            Self::ExitDuration => "exit_duration",
            Self::RateSmoothingWindow => "rate_smoothing_window",
        }
    }
}

/// A value held by the configuration store.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}

impl ParameterValue {
    /// Returns the number, if this is a finite numeric value.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    /// Returns the text, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Synchronous read access to the host's configuration store.
pub trait ParameterSource {
    /// Returns the current value for `key`, or `None` if unset.
    fn get(&self, key: ParameterKey) -> Option<ParameterValue>;
}

/// In-memory store with interior mutability, shared by handle.
#[derive(Debug, Default)]
pub struct ParameterStore {
    values: RefCell<HashMap<ParameterKey, ParameterValue>>,
}

impl ParameterStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, replacing any previous one.
    pub fn set(&self, key: ParameterKey, value: impl Into<ParameterValue>) {
        self.values.borrow_mut().insert(key, value.into());
    }

    /// Removes a value so the default applies again.
    pub fn unset(&self, key: ParameterKey) {
        self.values.borrow_mut().remove(&key);
    }
}

impl ParameterSource for ParameterStore {
    fn get(&self, key: ParameterKey) -> Option<ParameterValue> {
        self.values.borrow().get(&key).cloned()
    }
}

/// Typed snapshot of every parameter a strategy or the director reads.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyParameters {
    pub strategy: String,
    pub pitch: f64,
    pub distance: f64,
    pub min_separation: f64,
    pub resample_policy: ResamplePolicy,
    pub tension: f64,
    pub look_ahead: f64,
    pub look_ahead_half_life: f64,
    pub samples_per_minute: f64,
    pub azimuth_sweep: f64,
    pub azimuth_frequency: f64,
    pub entry_duration: f64,
    pub exit_duration: f64,
    pub rate_smoothing_window: f64,
}

/// Seconds of metric history averaged into the live rates.
pub const DEFAULT_RATE_SMOOTHING_WINDOW: f64 = 60.0;

impl Default for StrategyParameters {
    fn default() -> Self {
        Self {
            strategy: "pursuit".to_owned(),
            pitch: -30.0,
            distance: 1500.0,
            min_separation: 30.0,
            resample_policy: ResamplePolicy::FromLastAccepted,
            tension: crate::geometry::curve::DEFAULT_TENSION,
            look_ahead: 30.0,
            look_ahead_half_life: 10.0,
            samples_per_minute: 60.0,
            azimuth_sweep: 360.0,
            azimuth_frequency: 1.0,
            entry_duration: 2.0,
            exit_duration: 2.0,
            rate_smoothing_window: DEFAULT_RATE_SMOOTHING_WINDOW,
        }
    }
}

impl StrategyParameters {
    /// Reads every key from `source`, keeping the default for missing or
    /// mistyped entries.
    #[must_use]
    pub fn from_source(source: &dyn ParameterSource) -> Self {
        let defaults = Self::default();
        let number = |key: ParameterKey, fallback: f64| match source.get(key) {
            None => fallback,
            Some(value) => value.as_number().unwrap_or_else(|| {
                rejected(key, &value, "expected a finite number");
                fallback
            }),
        };
        let strategy = match source.get(ParameterKey::Strategy) {
            None => defaults.strategy,
            Some(ParameterValue::Text(name)) => name,
            Some(value) => {
                rejected(ParameterKey::Strategy, &value, "expected a strategy name");
                defaults.strategy
            }
        };
        let resample_policy = match source.get(ParameterKey::ResamplePolicy) {
            None => defaults.resample_policy,
            Some(value) => match value.as_text() {
                Some("neighbors") => ResamplePolicy::ConsecutiveNeighbors,
                Some("last-accepted") => ResamplePolicy::FromLastAccepted,
                _ => {
                    rejected(
                        ParameterKey::ResamplePolicy,
                        &value,
                        "expected \"neighbors\" or \"last-accepted\"",
                    );
                    defaults.resample_policy
                }
            },
        };

        Self {
            strategy,
            pitch: number(ParameterKey::Pitch, defaults.pitch),
            distance: number(ParameterKey::Distance, defaults.distance),
            min_separation: number(ParameterKey::MinSeparation, defaults.min_separation),
            resample_policy,
            tension: number(ParameterKey::Tension, defaults.tension),
            look_ahead: number(ParameterKey::LookAhead, defaults.look_ahead),
            look_ahead_half_life: number(
                ParameterKey::LookAheadHalfLife,
                defaults.look_ahead_half_life,
            ),
            samples_per_minute: number(ParameterKey::SamplesPerMinute, defaults.samples_per_minute),
            azimuth_sweep: number(ParameterKey::AzimuthSweep, defaults.azimuth_sweep),
            azimuth_frequency: number(ParameterKey::AzimuthFrequency, defaults.azimuth_frequency),
            entry_duration: number(ParameterKey::EntryDuration, defaults.entry_duration),
            exit_duration: number(ParameterKey::ExitDuration, defaults.exit_duration),
            rate_smoothing_window: number(
                ParameterKey::RateSmoothingWindow,
                defaults.rate_smoothing_window,
            ),
        }
    }
}

fn rejected(key: ParameterKey, value: &ParameterValue, reason: &str) {
    let err = ConfigurationError::InvalidParameter {
        key: key.name(),
        reason: format!("{reason}, got {value:?}"),
    };
    warn!(%err, "falling back to default");
}

impl ParameterSource for StrategyParameters {
    fn get(&self, key: ParameterKey) -> Option<ParameterValue> {
        let value = match key {
            ParameterKey::Strategy => return Some(ParameterValue::Text(self.strategy.clone())),
            ParameterKey::ResamplePolicy => {
                let name = match self.resample_policy {
                    ResamplePolicy::FromLastAccepted => "last-accepted",
                    ResamplePolicy::ConsecutiveNeighbors => "neighbors",
                };
                return Some(name.into());
            }
            ParameterKey::Pitch => self.pitch,
            ParameterKey::Distance => self.distance,
            ParameterKey::MinSeparation => self.min_separation,
            ParameterKey::Tension => self.tension,
            ParameterKey::LookAhead => self.look_ahead,
            ParameterKey::LookAheadHalfLife => self.look_ahead_half_life,
            ParameterKey::SamplesPerMinute => self.samples_per_minute,
            ParameterKey::AzimuthSweep => self.azimuth_sweep,
            ParameterKey::AzimuthFrequency => self.azimuth_frequency,
            ParameterKey::EntryDuration => self.entry_duration,
            ParameterKey::ExitDuration => self.exit_duration,
            ParameterKey::RateSmoothingWindow => self.rate_smoothing_window,
        };
        Some(ParameterValue::Number(value))
    }
}
