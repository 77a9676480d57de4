use thiserror::Error;

/// Rejected shape parameters.
///
/// Raised at construction and on `update_location_data`/`set_points`, before
/// any geometry is derived, so a primitive never holds NaN positions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid ellipse axes {semi_major}/{semi_minor} (need semi-major >= semi-minor > 0)")]
    InvalidAxes { semi_major: f32, semi_minor: f32 },

    #[error("invalid granularity {0} (need a finite angle > 0)")]
    InvalidGranularity(f32),

    #[error("polygon needs at least 3 points, got {count}")]
    TooFewPoints { count: usize },

    #[error("polygon has zero signed area; centroid is undefined")]
    DegeneratePolygon,

    #[error("{count} vertices cannot be addressed by 16-bit indices")]
    TooManyVertices { count: usize },

    #[error("ellipse tessellation produced no boundary positions")]
    EmptyBoundary,
}

/// Largest vertex count addressable by `u16` indices.
pub(crate) const MAX_INDEXED_VERTICES: usize = u16::MAX as usize + 1;

/// Validates that `count` vertices fit in a 16-bit index buffer.
pub(crate) fn check_vertex_count(count: usize) -> Result<(), GeometryError> {
    if count > MAX_INDEXED_VERTICES {
        return Err(GeometryError::TooManyVertices { count });
    }
    Ok(())
}
