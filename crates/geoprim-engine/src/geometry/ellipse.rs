use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::error::MAX_INDEXED_VERTICES;

/// Most boundary samples a fan can index next to its center vertex.
pub const MAX_BOUNDARY_SAMPLES: usize = MAX_INDEXED_VERTICES - 1;

/// Analytic ellipse parameters.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EllipseShape {
    pub center: Vec3,
    pub semi_major_axis: f32,
    pub semi_minor_axis: f32,
    /// Radians, counter-clockwise from +X.
    pub rotation: f32,
    /// Angular step between boundary samples, radians.
    pub granularity: f32,
}

/// Produces the ordered boundary of an ellipse.
///
/// Implementations return packed `xyz` positions in counter-clockwise order
/// without repeating the first point.
pub trait EllipseTessellator {
    fn compute_boundary(&self, shape: &EllipseShape) -> Vec<f32>;
}

/// Tessellates the ellipse in the plane `z = center.z`.
#[derive(Debug, Copy, Clone, Default)]
pub struct PlanarEllipse;

impl PlanarEllipse {
    /// Boundary sample count for `granularity`: one sample per step around a
    /// full turn, never fewer than a triangle.
    ///
    /// Saturates at `usize::MAX` for vanishing steps. Not capped; callers
    /// compare it against [`MAX_BOUNDARY_SAMPLES`].
    pub fn sample_count(granularity: f32) -> usize {
        // Float-to-int `as` saturates, and NaN maps to 0.
        ((TAU / granularity).ceil() as usize).max(3)
    }
}

impl EllipseTessellator for PlanarEllipse {
    fn compute_boundary(&self, shape: &EllipseShape) -> Vec<f32> {
        let count = Self::sample_count(shape.granularity).min(MAX_BOUNDARY_SAMPLES);
        let step = TAU / count as f32;
        let rotation = Vec2::from_angle(shape.rotation);

        let mut out = Vec::with_capacity(count * 3);
        for i in 0..count {
            let (sin, cos) = (i as f32 * step).sin_cos();
            let local = Vec2::new(shape.semi_major_axis * cos, shape.semi_minor_axis * sin);
            let p = rotation.rotate(local);
            out.extend_from_slice(&[
                shape.center.x + p.x,
                shape.center.y + p.y,
                shape.center.z,
            ]);
        }
        out
    }
}
