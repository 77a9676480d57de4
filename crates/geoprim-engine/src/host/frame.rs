use glam::Vec3;

use crate::scene::{DrawCommand, SceneMode};

use super::RenderResources;

/// Maps a world position to its on-screen scene position for the current mode.
///
/// Used only when the scene is not in 3D mode (2D map, columbus view).
pub trait ScenePositionProjector {
    fn project(&self, point: Vec3) -> Vec3;
}

/// Projector for hosts that only ever render in 3D.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoProjection;

impl ScenePositionProjector for NoProjection {
    #[inline]
    fn project(&self, point: Vec3) -> Vec3 {
        point
    }
}

/// Per-frame context passed to `UpdateablePrimitive::update`.
///
/// Lifetimes:
/// - `'a` is the duration of the host's frame callback
pub struct FrameState<'a> {
    pub mode: SceneMode,
    pub resources: &'a mut dyn RenderResources,
    pub projector: &'a dyn ScenePositionProjector,
    /// Commands pushed here are submitted by the host this frame.
    pub command_list: &'a mut Vec<DrawCommand>,
}

impl<'a> FrameState<'a> {
    #[inline]
    pub fn new(
        mode: SceneMode,
        resources: &'a mut dyn RenderResources,
        projector: &'a dyn ScenePositionProjector,
        command_list: &'a mut Vec<DrawCommand>,
    ) -> Self {
        Self {
            mode,
            resources,
            projector,
            command_list,
        }
    }
}
