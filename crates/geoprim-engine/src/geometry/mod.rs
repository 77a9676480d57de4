//! Pure geometry helpers.
//!
//! Nothing here touches GPU resources; primitives feed the results into the
//! host resource factory.

mod centroid;
mod ellipse;
mod indices;
mod projection;

pub use centroid::{find_radius, polygon_centroid};
pub use ellipse::{EllipseShape, EllipseTessellator, MAX_BOUNDARY_SAMPLES, PlanarEllipse};
pub use indices::{build_fan_indices, build_loop_indices};
pub use projection::project_2d;

use crate::coords::ColorRgba;

/// Returns `true` when `color` needs blending (alpha below one).
#[inline]
pub fn is_translucent(color: ColorRgba) -> bool {
    color.is_translucent()
}
