//! Coordinate, color and bounds types shared by geometry and primitives.
//!
//! Canonical CPU space:
//! - world positions as `glam::Vec3`
//! - packed position buffers as flat `f32` slices, 3 components per point
//!
//! Renderers upload packed buffers as-is; the host camera maps them to clip space.

mod bounds;
mod color;
pub mod pack;

pub use bounds::BoundingSphere;
pub use color::ColorRgba;

/// A world-space position.
pub type Position = glam::Vec3;
