/// Straight-alpha RGBA color, `f32` per channel.
///
/// Primitives upload this as a constant vertex attribute; `a < 1.0` selects
/// the translucent pass and enables blending.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn from_array([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns `true` when alpha is below one.
    #[inline]
    pub fn is_translucent(self) -> bool {
        self.a < 1.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl Default for ColorRgba {
    /// Opaque black, the primitive default.
    fn default() -> Self {
        Self::black()
    }
}

impl From<[f32; 4]> for ColorRgba {
    #[inline]
    fn from(value: [f32; 4]) -> Self {
        Self::from_array(value)
    }
}
