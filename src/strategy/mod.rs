//! Interchangeable camera strategies.
//!
//! The set is closed: [`ViewStrategy`] is a tagged union over the three
//! implementations, chosen by name through [`StrategyKind::from_name`].

mod cache;
mod command;
mod interactive;
mod orbit;
mod pursuit;

use std::rc::Rc;

pub use cache::{CameraPathCache, PathSample};
pub use command::{CameraCommand, CameraPose, LookAt};
pub use interactive::{Interactive, LiveHeading};
pub use orbit::Orbit;
pub use pursuit::Pursuit;

use crate::config::StrategyParameters;
use crate::error::{ConfigurationError, Result};
use crate::geometry::TrackData;

/// Names of the available strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Orbit,
    Pursuit,
    Interactive,
}

impl StrategyKind {
    /// Name lookup table; `"cinematic"` is an alias of `"pursuit"`.
    const NAMES: [(&'static str, Self); 4] = [
        ("orbit", Self::Orbit),
        ("pursuit", Self::Pursuit),
        ("cinematic", Self::Pursuit),
        ("interactive", Self::Interactive),
    ];

    /// Resolves a configured strategy name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownStrategy`] for any other name.
    pub fn from_name(name: &str) -> std::result::Result<Self, ConfigurationError> {
        Self::NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
            .map(|&(_, kind)| kind)
            .ok_or_else(|| ConfigurationError::UnknownStrategy(name.to_owned()))
    }

    /// Canonical name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Orbit => "orbit",
            Self::Pursuit => "pursuit",
            Self::Interactive => "interactive",
        }
    }
}

/// A bound camera strategy.
#[derive(Debug, Clone)]
pub enum ViewStrategy {
    Orbit(Orbit),
    Pursuit(Pursuit),
    Interactive(Interactive),
}

impl ViewStrategy {
    /// Instantiates an unbuilt strategy of the given kind.
    ///
    /// `heading` is only read by [`Interactive`].
    #[must_use]
    pub fn new(kind: StrategyKind, heading: &LiveHeading) -> Self {
        match kind {
            StrategyKind::Orbit => Self::Orbit(Orbit::new()),
            StrategyKind::Pursuit => Self::Pursuit(Pursuit::new()),
            StrategyKind::Interactive => Self::Interactive(Interactive::new(heading.clone())),
        }
    }

    /// Which strategy this is.
    #[must_use]
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::Orbit(_) => StrategyKind::Orbit,
            Self::Pursuit(_) => StrategyKind::Pursuit,
            Self::Interactive(_) => StrategyKind::Interactive,
        }
    }

    /// (Re)computes internal state for `track`. Identical inputs always
    /// reproduce identical output.
    ///
    /// # Errors
    ///
    /// Returns the strategy's build error; the path is then empty and
    /// [`ViewStrategy::state_at_time`] returns `None`.
    pub fn build_path(&mut self, track: &Rc<TrackData>, params: &StrategyParameters) -> Result<()> {
        match self {
            Self::Orbit(s) => s.build_path(track, params),
            Self::Pursuit(s) => s.build_path(track, params),
            Self::Interactive(s) => s.build_path(track, params),
        }
    }

    /// Camera command at `time`, or `None` when nothing is built.
    #[must_use]
    pub fn state_at_time(&self, time: f64) -> Option<CameraCommand> {
        match self {
            Self::Orbit(s) => s.state_at_time(time),
            Self::Pursuit(s) => s.state_at_time(time),
            Self::Interactive(s) => s.state_at_time(time),
        }
    }

    /// Whether stopping a tour flies out to the route overview.
    #[must_use]
    pub fn has_fly_out(&self) -> bool {
        !matches!(self, Self::Interactive(_))
    }
}
