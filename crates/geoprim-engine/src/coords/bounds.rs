use glam::Vec3;

/// Conservative sphere enclosing a primitive's geometry.
///
/// Handed to the host with every draw command for culling.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance(point) <= self.radius
    }
}
