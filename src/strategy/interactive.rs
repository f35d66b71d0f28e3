use std::cell::Cell;
use std::rc::Rc;

use tracing::warn;

use crate::config::StrategyParameters;
use crate::error::{PathError, Result};
use crate::geometry::TrackData;
use crate::math::angle::normalize_degrees;

use super::command::{CameraCommand, LookAt};

/// Shared, live camera heading in degrees.
///
/// The host writes it while the user drags the view; the interactive
/// strategy reads it on every query.
#[derive(Debug, Clone, Default)]
pub struct LiveHeading(Rc<Cell<f64>>);

impl LiveHeading {
    /// Creates a handle starting at `heading`.
    #[must_use]
    pub fn new(heading: f64) -> Self {
        Self(Rc::new(Cell::new(normalize_degrees(heading))))
    }

    /// Current heading, degrees in `[0, 360)`.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    /// Replaces the heading.
    pub fn set(&self, heading: f64) {
        self.0.set(normalize_degrees(heading));
    }

    /// Rotates the heading by `delta` degrees.
    pub fn rotate(&self, delta: f64) {
        self.set(self.get() + delta);
    }
}

/// Chase camera that follows the subject with a user-controlled heading.
///
/// Nothing is pre-computed: every query interpolates the raw route.
#[derive(Debug, Clone)]
pub struct Interactive {
    track: Option<Rc<TrackData>>,
    heading: LiveHeading,
    pitch: f64,
    distance: f64,
}

impl Interactive {
    /// Creates the strategy reading its heading from `heading`.
    #[must_use]
    pub fn new(heading: LiveHeading) -> Self {
        let defaults = StrategyParameters::default();
        Self {
            track: None,
            heading,
            pitch: defaults.pitch,
            distance: defaults.distance,
        }
    }

    /// Binds the route and reads pitch and distance.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InsufficientData`] for an empty route; queries
    /// then return `None`.
    pub fn build_path(&mut self, track: &Rc<TrackData>, params: &StrategyParameters) -> Result<()> {
        self.pitch = params.pitch;
        self.distance = params.distance;
        if track.points.is_empty() {
            self.track = None;
            warn!("interactive camera not bound: route has no points");
            return Err(PathError::InsufficientData {
                available: 0,
                required: 1,
            }
            .into());
        }
        self.track = Some(Rc::clone(track));
        Ok(())
    }

    /// Look-at on the subject's interpolated position at `time`.
    #[must_use]
    pub fn state_at_time(&self, time: f64) -> Option<CameraCommand> {
        let target = self.track.as_ref()?.position_at(time)?;
        Some(CameraCommand::LookAt(LookAt {
            target,
            heading: self.heading.get(),
            pitch: self.pitch,
            distance: self.distance,
        }))
    }

    /// Returns the live heading handle.
    #[must_use]
    pub fn heading(&self) -> &LiveHeading {
        &self.heading
    }
}
