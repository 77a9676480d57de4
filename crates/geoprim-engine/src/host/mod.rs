//! Host engine contracts.
//!
//! The primitives never talk to a GPU API directly. Everything they need from
//! the host is expressed here:
//! - `RenderResources`: buffer / vertex-array / shader / render-state factory
//! - `ScenePositionProjector`: 3D → scene-mode position mapping for 2D views
//! - `FrameState`: the per-frame context handed to `update`
//!
//! GPU resources come back as single-owner handles. A primitive stores at most
//! one handle per resource kind and gives it back through the factory when it
//! is replaced or destroyed.

mod frame;
mod handles;
mod resources;

pub use frame::{FrameState, NoProjection, ScenePositionProjector};
pub use handles::{
    BufferHandle, RenderStateId, ShaderProgramHandle, ShaderProgramId, VertexArrayHandle,
    VertexArrayId,
};
pub use resources::{CullFace, RenderResources, RenderState, ShaderProgramDesc, VertexArrayDesc};
