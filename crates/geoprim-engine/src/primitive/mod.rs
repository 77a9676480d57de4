//! Shape primitives driven by the host frame loop.
//!
//! Extending:
//! - add a shape module holding a `PrimitiveBase` and one `DrawSlot` per draw
//! - derive packed positions + indices on the CPU
//! - implement `UpdateablePrimitive` so the host can tick and destroy it

mod base;
mod ellipse;
mod polygon;
mod slot;

pub use base::{PRIMITIVE_SHADER, PrimitiveBase, PrimitiveOptions, UpdateablePrimitive};
pub use ellipse::{EllipseLocation, EllipseOptions, EllipsePrimitive};
pub use polygon::{PolygonOptions, PolygonPrimitive};
