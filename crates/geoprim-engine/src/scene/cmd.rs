use glam::Mat4;

use crate::coords::BoundingSphere;
use crate::host::{RenderStateId, ShaderProgramId, VertexArrayId};

/// Render pass a command is scheduled in. Opaque commands run first.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pass {
    #[default]
    Opaque,
    Translucent,
}

impl Pass {
    #[inline]
    pub fn for_translucency(translucent: bool) -> Self {
        if translucent { Pass::Translucent } else { Pass::Opaque }
    }
}

/// Primitive assembly mode for a draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    /// Closed outline; the last index connects back to the first.
    LineLoop,
    /// Independent segments from consecutive index pairs.
    LineList,
    /// Independent triangles from consecutive index triples.
    TriangleList,
}

/// One GPU draw: resource bindings + state + topology.
///
/// Primitives keep one command per draw and reconfigure it every frame, then
/// push a copy into the frame's command list.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    pub model_matrix: Mat4,
    pub render_state: Option<RenderStateId>,
    pub shader_program: Option<ShaderProgramId>,
    pub bounding_volume: Option<BoundingSphere>,
    pub pass: Pass,
    pub debug_show_bounding_volume: bool,
    pub primitive_type: PrimitiveType,
    pub vertex_array: Option<VertexArrayId>,
}

impl Default for DrawCommand {
    fn default() -> Self {
        Self {
            model_matrix: Mat4::IDENTITY,
            render_state: None,
            shader_program: None,
            bounding_volume: None,
            pass: Pass::Opaque,
            debug_show_bounding_volume: false,
            primitive_type: PrimitiveType::TriangleList,
            vertex_array: None,
        }
    }
}

impl DrawCommand {
    /// Returns `true` once every binding the backend needs is set.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.render_state.is_some() && self.shader_program.is_some() && self.vertex_array.is_some()
    }
}
