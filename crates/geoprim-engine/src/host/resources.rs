use crate::coords::ColorRgba;

use super::{BufferHandle, RenderStateId, ShaderProgramHandle, VertexArrayHandle};

/// Which triangle faces the rasterizer discards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CullFace {
    Front,
    Back,
}

/// Rasterizer + blend configuration.
///
/// Plain value; factories cache it and hand back a `RenderStateId`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RenderState {
    pub cull: Option<CullFace>,
    pub depth_test: bool,
    pub depth_mask: bool,
    pub blending: bool,
}

impl RenderState {
    /// Back-face culling, no depth test, depth writes on; blending as requested.
    #[inline]
    pub const fn primitive(blending: bool) -> Self {
        Self {
            cull: Some(CullFace::Back),
            depth_test: false,
            depth_mask: true,
            blending,
        }
    }
}

/// Shader program source.
///
/// `source` holds both stages; `vertex_entry` / `fragment_entry` select them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderProgramDesc {
    pub label: &'static str,
    pub source: &'static str,
    pub vertex_entry: &'static str,
    pub fragment_entry: &'static str,
}

/// Inputs for `RenderResources::create_vertex_array`.
///
/// Attribute 0 is the packed `vec3<f32>` position stream; the color is a
/// constant attribute shared by every vertex.
#[derive(Debug)]
pub struct VertexArrayDesc {
    pub vertex_buffer: BufferHandle,
    pub index_buffer: BufferHandle,
    pub index_count: u32,
    pub color: ColorRgba,
}

/// Render-resource factory provided by the host engine.
///
/// Failures propagate to the caller of `update` unchanged; primitives do not
/// retry.
pub trait RenderResources {
    /// Uploads packed `xyz` positions.
    fn create_vertex_buffer(&mut self, positions: &[f32]) -> anyhow::Result<BufferHandle>;

    /// Uploads 16-bit indices.
    fn create_index_buffer(&mut self, indices: &[u16]) -> anyhow::Result<BufferHandle>;

    /// Binds buffers and a constant color. Takes ownership of both buffers,
    /// and releases them itself if binding fails.
    fn create_vertex_array(&mut self, desc: VertexArrayDesc) -> anyhow::Result<VertexArrayHandle>;

    /// Compiles `desc` for the caller's exclusive use.
    fn compile_or_reuse_shader_program(
        &mut self,
        desc: &ShaderProgramDesc,
    ) -> anyhow::Result<ShaderProgramHandle>;

    /// Returns the cached id for `state`, creating it on first use.
    fn build_render_state(&mut self, state: &RenderState) -> RenderStateId;

    /// Releases a buffer that never made it into a vertex array.
    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Releases a vertex array together with the buffers it owns.
    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle);

    fn destroy_shader_program(&mut self, program: ShaderProgramHandle);
}
