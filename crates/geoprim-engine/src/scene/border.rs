use super::PrimitiveType;

/// Outline style.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
}

impl BorderStyle {
    /// Topology the border is drawn with.
    ///
    /// Dashed borders reuse the loop indices as a line list, so every other
    /// segment is skipped.
    #[inline]
    pub const fn topology(self) -> PrimitiveType {
        match self {
            BorderStyle::Solid => PrimitiveType::LineLoop,
            BorderStyle::Dashed => PrimitiveType::LineList,
        }
    }
}

/// Outline visibility and style.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Border {
    pub show: bool,
    pub style: BorderStyle,
}

impl Border {
    #[inline]
    pub const fn new(show: bool, style: BorderStyle) -> Self {
        Self { show, style }
    }

    #[inline]
    pub const fn hidden() -> Self {
        Self::new(false, BorderStyle::Solid)
    }
}

impl Default for Border {
    fn default() -> Self {
        Self::new(true, BorderStyle::Solid)
    }
}
