//! Tour lifecycle: entry flight, strategy playback, exit flight.

mod telemetry;
mod transition;
mod viewport;

use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

pub use telemetry::{live_metrics, time_label, LiveMetrics, Telemetry};
pub use transition::Flight;
pub use viewport::{TickKey, TickPhase, TickRegistry, TickSource, Viewport};

use crate::config::{
    ParameterKey, ParameterSource, StrategyParameters, DEFAULT_RATE_SMOOTHING_WINDOW,
};
use crate::geometry::TrackData;
use crate::operations::BoundingVolume;
use crate::strategy::{CameraCommand, CameraPose, LiveHeading, LookAt, StrategyKind, ViewStrategy};

/// Pitch of the route overview framing, degrees.
const OVERVIEW_PITCH: f64 = -60.0;
/// Overview camera distance as a multiple of the bounding-sphere radius.
const OVERVIEW_RADIUS_FACTOR: f64 = 3.0;
const MIN_OVERVIEW_DISTANCE: f64 = 1000.0;

/// Lifecycle callback, fired at most once.
pub type Callback = Box<dyn FnOnce()>;

/// Director state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    EnteringView,
    Active,
    ExitingView,
}

/// Timing of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Wall seconds since the previous frame; drives flights.
    pub delta: f64,
    /// Host clock position on the tour's timeline; drives playback.
    pub tour_time: f64,
}

/// Drives a [`Viewport`] through a tour of a route.
///
/// Failures never propagate out of the director: they are logged and the
/// affected step becomes a no-op.
pub struct Director<V: Viewport> {
    viewport: V,
    config: Rc<dyn ParameterSource>,
    heading: LiveHeading,
    strategy: Option<ViewStrategy>,
    track: Option<Rc<TrackData>>,
    state: PlaybackState,
    flight: Option<Flight>,
    tick: Option<TickKey>,
    on_ready: Option<Callback>,
    on_stopped: Option<Callback>,
}

impl<V: Viewport + fmt::Debug> fmt::Debug for Director<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Director")
            .field("viewport", &self.viewport)
            .field("state", &self.state)
            .field("strategy", &self.strategy_kind())
            .field("flight", &self.flight)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

impl<V: Viewport> Director<V> {
    /// Creates an idle director reading parameters from `config`.
    #[must_use]
    pub fn new(viewport: V, config: Rc<dyn ParameterSource>) -> Self {
        Self {
            viewport,
            config,
            heading: LiveHeading::default(),
            strategy: None,
            track: None,
            state: PlaybackState::Idle,
            flight: None,
            tick: None,
            on_ready: None,
            on_stopped: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The driven viewport.
    #[must_use]
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Heading handle the interactive strategy reads from.
    #[must_use]
    pub fn live_heading(&self) -> &LiveHeading {
        &self.heading
    }

    /// Kind of the bound strategy, if any.
    #[must_use]
    pub fn strategy_kind(&self) -> Option<StrategyKind> {
        self.strategy.as_ref().map(ViewStrategy::kind)
    }

    /// Queries the bound strategy without touching the viewport.
    #[must_use]
    pub fn state_at_time(&self, time: f64) -> Option<CameraCommand> {
        self.strategy.as_ref()?.state_at_time(time)
    }

    /// Key of the director's live registration with the viewport's tick
    /// source.
    #[must_use]
    pub fn tick_key(&self) -> Option<TickKey> {
        self.tick
    }

    fn params(&self) -> StrategyParameters {
        StrategyParameters::from_source(self.config.as_ref())
    }

    /// Starts a tour of `track`, flying in from `prior` over the configured
    /// entry duration.
    ///
    /// A tour already in progress is torn down first and its `on_stopped`
    /// fires. An unknown strategy name aborts the start without firing
    /// either callback.
    pub fn start_tour(
        &mut self,
        track: Rc<TrackData>,
        prior: CameraPose,
        on_ready: impl FnOnce() + 'static,
        on_stopped: impl FnOnce() + 'static,
    ) {
        if self.state != PlaybackState::Idle {
            debug!(state = ?self.state, "restarting: tearing down current tour");
            self.finish_stop();
        }

        let params = self.params();
        let kind = match StrategyKind::from_name(&params.strategy) {
            Ok(kind) => kind,
            Err(err) => {
                error!(%err, "tour not started");
                return;
            }
        };
        let mut strategy = ViewStrategy::new(kind, &self.heading);
        if let Err(err) = strategy.build_path(&track, &params) {
            warn!(%err, strategy = kind.name(), "camera path unavailable");
        }
        info!(
            strategy = kind.name(),
            points = track.points.len(),
            "starting tour"
        );

        let entry = strategy
            .state_at_time(track.start_time)
            .filter(|_| params.entry_duration > 0.0)
            .map(|command| Flight::new(prior, command.to_pose(), params.entry_duration));

        self.strategy = Some(strategy);
        self.track = Some(track);
        self.on_ready = Some(Box::new(on_ready));
        self.on_stopped = Some(Box::new(on_stopped));

        match entry {
            Some(flight) => {
                self.flight = Some(flight);
                self.enter(PlaybackState::EnteringView, TickPhase::Transition);
            }
            None => self.become_active(),
        }
    }

    /// Advances one frame; the host calls it on every event of the
    /// viewport's tick source. Does nothing unless the director's
    /// registration is live. Returns telemetry while a tour is playing.
    pub fn tick(&mut self, frame: FrameTime) -> Option<Telemetry> {
        let phase = self.viewport.tick_phase(self.tick?)?;
        match (self.state, phase) {
            (PlaybackState::EnteringView, TickPhase::Transition) => {
                if self.advance_flight(frame.delta) {
                    self.become_active();
                }
                None
            }
            (PlaybackState::ExitingView, TickPhase::Transition) => {
                if self.advance_flight(frame.delta) {
                    self.finish_stop();
                }
                None
            }
            (PlaybackState::Active, TickPhase::Playback) => {
                if let Some(command) = self.state_at_time(frame.tour_time) {
                    self.viewport.apply(&command);
                }
                let track = self.track.as_ref()?;
                let window = self
                    .config
                    .get(ParameterKey::RateSmoothingWindow)
                    .and_then(|v| v.as_number())
                    .unwrap_or(DEFAULT_RATE_SMOOTHING_WINDOW);
                Some(Telemetry::at(track, frame.tour_time, window))
            }
            _ => None,
        }
    }

    /// Stops the tour. No-op when idle or already flying out.
    pub fn stop_tour(&mut self) {
        match self.state {
            PlaybackState::Idle | PlaybackState::ExitingView => return,
            PlaybackState::EnteringView | PlaybackState::Active => {}
        }
        self.on_ready = None;

        let params = self.params();
        let fly_out = self.strategy.as_ref().is_some_and(ViewStrategy::has_fly_out);
        let overview = self.track.as_deref().and_then(overview_pose);
        match overview {
            Some(target) if fly_out && params.exit_duration > 0.0 => {
                debug!(duration = params.exit_duration, "flying out to overview");
                self.flight = Some(Flight::new(
                    self.viewport.pose(),
                    target,
                    params.exit_duration,
                ));
                self.enter(PlaybackState::ExitingView, TickPhase::Transition);
            }
            _ => self.finish_stop(),
        }
    }

    /// Switches strategy by name in any state. When a route is given, or one
    /// is already bound, the new path is built immediately.
    pub fn set_strategy(&mut self, name: &str, track: Option<Rc<TrackData>>) {
        let kind = match StrategyKind::from_name(name) {
            Ok(kind) => kind,
            Err(err) => {
                error!(%err, "strategy unbound");
                self.strategy = None;
                return;
            }
        };
        if let Some(track) = track {
            self.track = Some(track);
        }
        let mut strategy = ViewStrategy::new(kind, &self.heading);
        if let Some(track) = &self.track {
            if let Err(err) = strategy.build_path(track, &self.params()) {
                warn!(%err, strategy = kind.name(), "camera path unavailable");
            }
        }
        debug!(strategy = kind.name(), state = ?self.state, "strategy switched");
        self.strategy = Some(strategy);
        if self.state == PlaybackState::Active {
            self.install_tick(TickPhase::Playback);
        }
    }

    /// Rebuilds the bound strategy from the current parameters. No-op when
    /// no strategy or route is bound.
    pub fn on_parameter_change(&mut self) {
        let (Some(strategy), Some(track)) = (self.strategy.as_mut(), self.track.as_ref()) else {
            return;
        };
        let params = StrategyParameters::from_source(self.config.as_ref());
        if let Err(err) = strategy.build_path(track, &params) {
            warn!(%err, "camera path rebuild failed");
        }
    }

    /// Advances the current flight and shows its pose. Returns `true` once
    /// the flight has landed (or when there is none).
    fn advance_flight(&mut self, delta: f64) -> bool {
        let Some(flight) = self.flight.as_mut() else {
            return true;
        };
        let pose = flight.advance(delta);
        self.viewport.set_pose(&pose);
        flight.is_finished()
    }

    fn become_active(&mut self) {
        self.flight = None;
        self.enter(PlaybackState::Active, TickPhase::Playback);
        if let Some(on_ready) = self.on_ready.take() {
            on_ready();
        }
    }

    fn finish_stop(&mut self) {
        self.dispose_tick();
        self.flight = None;
        self.strategy = None;
        self.track = None;
        self.on_ready = None;
        self.state = PlaybackState::Idle;
        debug!("tour stopped");
        if let Some(on_stopped) = self.on_stopped.take() {
            on_stopped();
        }
    }

    fn enter(&mut self, state: PlaybackState, phase: TickPhase) {
        debug!(from = ?self.state, to = ?state, "playback state");
        self.state = state;
        self.install_tick(phase);
    }

    fn install_tick(&mut self, phase: TickPhase) {
        self.dispose_tick();
        self.tick = Some(self.viewport.register_tick(phase));
    }

    fn dispose_tick(&mut self) {
        if let Some(key) = self.tick.take() {
            self.viewport.dispose_tick(key);
        }
    }
}

/// Camera framing the whole route from above.
fn overview_pose(track: &TrackData) -> Option<CameraPose> {
    let positions = track.positions();
    let sphere = BoundingVolume::new(&positions).execute()?;
    let look = LookAt {
        target: sphere.center,
        heading: 0.0,
        pitch: OVERVIEW_PITCH,
        distance: (sphere.radius * OVERVIEW_RADIUS_FACTOR).max(MIN_OVERVIEW_DISTANCE),
    };
    Some(CameraCommand::LookAt(look).to_pose())
}
