use tracing::{debug, warn};

use crate::config::StrategyParameters;
use crate::error::{PathError, Result};
use crate::geometry::TrackData;
use crate::math::angle::normalize_degrees;

use super::cache::{CameraPathCache, PathSample};
use super::command::CameraCommand;

/// Circles the camera around the literal recorded points.
///
/// The heading advances with elapsed time so that, with the default sweep of
/// 360° and a frequency of 1, the camera makes exactly one turn over the tour.
#[derive(Debug, Clone, Default)]
pub struct Orbit {
    cache: CameraPathCache,
}

impl Orbit {
    /// Creates an orbit strategy with an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the cache: one sample per track point.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::InsufficientData`] for an empty route; the path is
    /// left empty.
    pub fn build_path(&mut self, track: &TrackData, params: &StrategyParameters) -> Result<()> {
        self.cache = CameraPathCache::default();
        if track.points.is_empty() {
            warn!("orbit path not built: route has no points");
            return Err(PathError::InsufficientData {
                available: 0,
                required: 1,
            }
            .into());
        }

        let turns = params.azimuth_frequency * params.azimuth_sweep;
        let samples = track
            .points
            .iter()
            .map(|p| PathSample {
                time: p.time,
                target: p.position,
                heading: normalize_degrees(track.progress(p.time) * turns),
            })
            .collect::<Vec<_>>();
        debug!(samples = samples.len(), "orbit path built");
        self.cache = CameraPathCache::new(samples, params.pitch, params.distance);
        Ok(())
    }

    /// Camera command at `time`, or `None` before a successful build.
    #[must_use]
    pub fn state_at_time(&self, time: f64) -> Option<CameraCommand> {
        self.cache.look_at(time)
    }

    /// Returns the pre-computed samples.
    #[must_use]
    pub fn cache(&self) -> &CameraPathCache {
        &self.cache
    }
}
