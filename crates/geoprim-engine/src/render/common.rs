//! GPU-side layouts and pure mapping helpers for the wgpu backend.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::host::CullFace;
use crate::scene::{DrawCommand, PrimitiveType};

// ── uniform ───────────────────────────────────────────────────────────────

/// Per-draw uniform (80 bytes), matches `DrawUniform` in `primitive.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct DrawUniform {
    pub mvp: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl DrawUniform {
    pub(super) fn new(view_proj: Mat4, model: Mat4, color: [f32; 4]) -> Self {
        Self {
            mvp: (view_proj * model).to_cols_array_2d(),
            color,
        }
    }
}

pub(super) fn draw_uniform_min_binding_size() -> wgpu::BufferSize {
    // 80 bytes; never zero.
    wgpu::BufferSize::new(std::mem::size_of::<DrawUniform>() as u64)
        .unwrap_or(wgpu::BufferSize::MIN)
}

/// Distance between per-draw uniforms in the dynamic-offset buffer.
pub(super) fn uniform_stride(min_offset_alignment: u32) -> u64 {
    let size = std::mem::size_of::<DrawUniform>() as u64;
    let align = u64::from(min_offset_alignment.max(1));
    size.div_ceil(align) * align
}

// ── vertex layout ─────────────────────────────────────────────────────────

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

pub(super) fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (3 * std::mem::size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &POSITION_ATTRS,
    }
}

// ── topology ──────────────────────────────────────────────────────────────

/// wgpu has no line loops; they are drawn as strips over a closed index list.
pub(super) fn wgpu_topology(primitive_type: PrimitiveType) -> wgpu::PrimitiveTopology {
    match primitive_type {
        PrimitiveType::LineLoop => wgpu::PrimitiveTopology::LineStrip,
        PrimitiveType::LineList => wgpu::PrimitiveTopology::LineList,
        PrimitiveType::TriangleList => wgpu::PrimitiveTopology::TriangleList,
    }
}

pub(super) fn strip_index_format(topology: wgpu::PrimitiveTopology) -> Option<wgpu::IndexFormat> {
    topology.is_strip().then_some(wgpu::IndexFormat::Uint16)
}

pub(super) fn wgpu_cull(cull: Option<CullFace>) -> Option<wgpu::Face> {
    cull.map(|face| match face {
        CullFace::Front => wgpu::Face::Front,
        CullFace::Back => wgpu::Face::Back,
    })
}

/// Index data as stored on the GPU: the caller's indices plus the first index
/// again, so a line loop can be drawn as a strip.
pub(super) fn closed_indices(indices: &[u16]) -> Vec<u16> {
    let mut closed = Vec::with_capacity(indices.len() + 1);
    closed.extend_from_slice(indices);
    if let Some(&first) = indices.first() {
        closed.push(first);
    }
    closed
}

/// Range of the stored (closed) index buffer a draw uses.
pub(super) fn index_range(primitive_type: PrimitiveType, index_count: u32) -> Range<u32> {
    match primitive_type {
        PrimitiveType::LineLoop if index_count > 0 => 0..index_count + 1,
        _ => 0..index_count,
    }
}

// ── ordering ──────────────────────────────────────────────────────────────

/// Command indices in encode order: opaque pass first, submission order within a pass.
pub(super) fn draw_order(commands: &[DrawCommand]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..commands.len()).collect();
    order.sort_by_key(|&i| commands[i].pass);
    order
}
