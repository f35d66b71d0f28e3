use slotmap::{new_key_type, SlotMap};

use crate::strategy::{CameraCommand, CameraPose, LookAt};

/// Per-frame event source of the render surface.
///
/// The host calls [`Director::tick`](super::Director::tick) once per frame
/// while a registration is live; the returned key is the disposer.
pub trait TickSource {
    /// Registers a per-frame listener.
    fn register_tick(&mut self, phase: TickPhase) -> TickKey;

    /// Disposes a registration. Returns `false` if it was already gone.
    fn dispose_tick(&mut self, key: TickKey) -> bool;

    /// Phase of a live registration, `None` once disposed.
    fn tick_phase(&self, key: TickKey) -> Option<TickPhase>;
}

/// The render surface the director drives.
pub trait Viewport: TickSource {
    /// Current camera pose.
    fn pose(&self) -> CameraPose;

    /// Places the camera at an absolute pose.
    fn set_pose(&mut self, pose: &CameraPose);

    /// Points the camera at a target from a heading, pitch and distance.
    fn set_look_at(&mut self, look: &LookAt);

    /// Applies either command shape.
    fn apply(&mut self, command: &CameraCommand) {
        match command {
            CameraCommand::AbsolutePose(pose) => self.set_pose(pose),
            CameraCommand::LookAt(look) => self.set_look_at(look),
        }
    }
}

new_key_type! {
    /// Generational handle of a per-tick registration.
    pub struct TickKey;
}

/// What a per-tick registration is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    /// A timed camera flight.
    Transition,
    /// Strategy playback.
    Playback,
}

/// Slot-map backed [`TickSource`] a host can embed in its viewport.
///
/// Keys are generational: disposing a key and registering again never lets
/// the stale key address the new registration.
#[derive(Debug, Default)]
pub struct TickRegistry {
    listeners: SlotMap<TickKey, TickPhase>,
}

impl TickRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns whether no registration is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl TickSource for TickRegistry {
    fn register_tick(&mut self, phase: TickPhase) -> TickKey {
        self.listeners.insert(phase)
    }

    fn dispose_tick(&mut self, key: TickKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    fn tick_phase(&self, key: TickKey) -> Option<TickPhase> {
        self.listeners.get(key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_key_cannot_dispose_new_registration() {
        let mut ticks = TickRegistry::new();
        let old = ticks.register_tick(TickPhase::Transition);
        assert!(ticks.dispose_tick(old));
        let new = ticks.register_tick(TickPhase::Playback);
        assert!(!ticks.dispose_tick(old));
        assert_eq!(ticks.tick_phase(new), Some(TickPhase::Playback));
        assert_eq!(ticks.len(), 1);
    }

    #[test]
    fn dispose_empties_registry() {
        let mut ticks = TickRegistry::new();
        let key = ticks.register_tick(TickPhase::Playback);
        ticks.dispose_tick(key);
        assert!(ticks.is_empty());
        assert_eq!(ticks.tick_phase(key), None);
    }
}
