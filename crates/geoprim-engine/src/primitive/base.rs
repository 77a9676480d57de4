use std::borrow::Cow;

use glam::Mat4;

use crate::coords::{BoundingSphere, ColorRgba};
use crate::geometry;
use crate::host::{
    FrameState, RenderResources, RenderState, RenderStateId, ShaderProgramDesc,
    ShaderProgramHandle, ScenePositionProjector, VertexArrayId,
};
use crate::scene::{DrawCommand, Pass, PrimitiveType, SceneMode};

/// Shader shared by every primitive: packed positions, constant color.
pub const PRIMITIVE_SHADER: ShaderProgramDesc = ShaderProgramDesc {
    label: "geoprim primitive shader",
    source: include_str!("../render/shaders/primitive.wgsl"),
    vertex_entry: "vs_main",
    fragment_entry: "fs_main",
};

/// Frame-tick contract the host schedules.
///
/// The host calls `update` once per frame while the primitive is in the scene
/// and `destroy` exactly once when it leaves. `destroy` consumes the primitive,
/// so nothing can tick it afterwards.
pub trait UpdateablePrimitive {
    /// Rebuilds GPU resources if needed and appends this frame's draw commands.
    fn update(&mut self, frame: &mut FrameState<'_>) -> anyhow::Result<()>;

    /// Releases the shader program and every vertex array.
    fn destroy(self: Box<Self>, resources: &mut dyn RenderResources);

    fn bounding_volume(&self) -> Option<BoundingSphere>;
}

/// Construction options shared by all primitives.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PrimitiveOptions {
    pub show: bool,
    pub color: ColorRgba,
}

impl Default for PrimitiveOptions {
    fn default() -> Self {
        Self {
            show: true,
            color: ColorRgba::black(),
        }
    }
}

/// State every primitive carries.
///
/// Invariants:
/// - `dirty` is set whenever buffered geometry or color no longer matches the
///   uploaded vertex arrays, and cleared only at the end of a rendered frame
/// - at most one shader program handle is alive
#[derive(Debug)]
pub struct PrimitiveBase {
    show: bool,
    color: ColorRgba,
    model_matrix: Mat4,
    render_state: Option<RenderStateId>,
    shader_program: Option<ShaderProgramHandle>,
    bounding_volume: Option<BoundingSphere>,
    dirty: bool,
    last_mode: Option<SceneMode>,
}

impl PrimitiveBase {
    pub fn new(options: PrimitiveOptions) -> Self {
        Self {
            show: options.show,
            color: options.color,
            model_matrix: Mat4::IDENTITY,
            render_state: None,
            shader_program: None,
            bounding_volume: None,
            dirty: true,
            last_mode: None,
        }
    }

    #[inline]
    pub fn color(&self) -> ColorRgba {
        self.color
    }

    /// Color is baked into the vertex array, so this always marks dirty.
    pub fn set_color(&mut self, color: ColorRgba) {
        self.color = color;
        self.dirty = true;
    }

    #[inline]
    pub fn show(&self) -> bool {
        self.show
    }

    /// Visibility only gates rendering; buffers stay valid.
    #[inline]
    pub fn set_show(&mut self, show: bool) {
        self.show = show;
    }

    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    /// Applied per draw command; does not touch buffers.
    #[inline]
    pub fn set_model_matrix(&mut self, model_matrix: Mat4) {
        self.model_matrix = model_matrix;
    }

    #[inline]
    pub fn is_translucent(&self) -> bool {
        geometry::is_translucent(self.color)
    }

    #[inline]
    pub fn should_render(&self) -> bool {
        self.show
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn last_mode(&self) -> Option<SceneMode> {
        self.last_mode
    }

    #[inline]
    pub fn bounding_volume(&self) -> Option<BoundingSphere> {
        self.bounding_volume
    }

    #[inline]
    pub fn set_bounding_volume(&mut self, sphere: BoundingSphere) {
        self.bounding_volume = Some(sphere);
    }

    #[inline]
    pub fn render_state(&self) -> Option<RenderStateId> {
        self.render_state
    }

    #[inline]
    pub fn shader_program(&self) -> Option<&ShaderProgramHandle> {
        self.shader_program.as_ref()
    }

    /// Forces a rebuild when the projection mode differs from the last frame.
    pub fn observe_mode(&mut self, mode: SceneMode) {
        if self.last_mode != Some(mode) {
            if self.last_mode.is_some() {
                log::debug!("scene mode changed to {mode:?}; rebuilding primitive buffers");
            }
            self.dirty = true;
        }
    }

    /// Ends a rendered frame: buffers now match state and `mode` is remembered.
    pub fn finish_frame(&mut self, mode: SceneMode) {
        self.dirty = false;
        self.last_mode = Some(mode);
    }

    /// Rebuilt every frame; the factory caches identical states.
    pub fn setup_render_state(&mut self, resources: &mut dyn RenderResources, blending: bool) {
        self.render_state = Some(resources.build_render_state(&RenderState::primitive(blending)));
    }

    /// Compiles the shader on first use and keeps it for the primitive's lifetime.
    pub fn setup_shader_program(
        &mut self,
        resources: &mut dyn RenderResources,
    ) -> anyhow::Result<()> {
        if self.shader_program.is_none() {
            let program = resources.compile_or_reuse_shader_program(&PRIMITIVE_SHADER)?;
            log::debug!("compiled shader program {}", program.raw());
            self.shader_program = Some(program);
        }
        Ok(())
    }

    /// Writes this primitive's bindings onto `command`. No other effect.
    pub fn setup_draw_command(
        &self,
        command: &mut DrawCommand,
        vertex_array: VertexArrayId,
        primitive_type: PrimitiveType,
        translucent: bool,
        debug_show_bounding_volume: bool,
    ) {
        command.model_matrix = self.model_matrix;
        command.render_state = self.render_state;
        command.shader_program = self.shader_program.as_ref().map(ShaderProgramHandle::id);
        command.bounding_volume = self.bounding_volume;
        command.pass = Pass::for_translucency(translucent);
        command.debug_show_bounding_volume = debug_show_bounding_volume;
        command.primitive_type = primitive_type;
        command.vertex_array = Some(vertex_array);
    }

    /// Gives the shader program back to the factory.
    pub fn release(&mut self, resources: &mut dyn RenderResources) {
        if let Some(program) = self.shader_program.take() {
            resources.destroy_shader_program(program);
        }
    }
}

impl Default for PrimitiveBase {
    fn default() -> Self {
        Self::new(PrimitiveOptions::default())
    }
}

/// Positions as uploaded for `mode`: as-is in 3D, re-projected otherwise.
pub(crate) fn positions_for_mode<'p>(
    points: &'p [f32],
    mode: SceneMode,
    projector: &dyn ScenePositionProjector,
) -> Cow<'p, [f32]> {
    if mode.is_3d() {
        Cow::Borrowed(points)
    } else {
        Cow::Owned(geometry::project_2d(points, projector))
    }
}
