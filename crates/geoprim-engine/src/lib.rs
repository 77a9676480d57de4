//! Geoprim engine crate.
//!
//! Ellipse and polygon primitives for a host-owned 3D scene graph. The host
//! drives the frame loop and submits GPU work; primitives derive geometry,
//! own their GPU resources and append draw commands once per frame.

pub mod coords;
pub mod error;
pub mod geometry;
pub mod host;
pub mod logging;
pub mod primitive;
pub mod render;
pub mod scene;

#[cfg(test)]
mod testing;

pub use error::GeometryError;
pub use primitive::{
    EllipseLocation, EllipseOptions, EllipsePrimitive, PolygonOptions, PolygonPrimitive,
    PrimitiveBase, PrimitiveOptions, UpdateablePrimitive,
};
