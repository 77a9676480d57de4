//! Bundled wgpu backend.
//!
//! `WgpuResources` implements the host resource factory on a `wgpu::Device`
//! and turns a frame's `DrawCommand`s into one render pass.
//!
//! Convention:
//! - positions are world space; the host supplies `view_proj`
//! - opaque commands are encoded before translucent ones

mod common;
mod ctx;
mod resources;

pub use ctx::{RenderCtx, RenderTarget};
pub use resources::{WgpuResources, WgpuResourcesConfig};
