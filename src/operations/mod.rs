mod bounding_volume;
mod resample;

pub use bounding_volume::{Aabb, BoundingSphere, BoundingVolume};
pub use resample::{Resample, ResamplePolicy};
