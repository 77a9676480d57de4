//! Test doubles for the host contracts.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec3;

use crate::coords::ColorRgba;
use crate::geometry::{EllipseShape, EllipseTessellator};
use crate::host::{
    BufferHandle, RenderResources, RenderState, RenderStateId, ScenePositionProjector,
    ShaderProgramDesc, ShaderProgramHandle, VertexArrayDesc, VertexArrayHandle, VertexArrayId,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RecordedBuffer {
    Vertex(Vec<f32>),
    Index(Vec<u16>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedVertexArray {
    pub positions: Vec<f32>,
    pub indices: Vec<u16>,
    pub color: ColorRgba,
    buffers: [u64; 2],
}

/// Headless resource factory that records what primitives ask for.
#[derive(Debug, Default)]
pub(crate) struct RecordingResources {
    next_id: u64,
    pub live_buffers: HashMap<u64, RecordedBuffer>,
    pub live_vertex_arrays: HashMap<u64, RecordedVertexArray>,
    pub live_programs: HashSet<u64>,
    pub render_states: Vec<RenderState>,
    pub vertex_arrays_created: usize,
    pub programs_compiled: usize,
    pub destroyed_vertex_arrays: Vec<u64>,
    pub vertex_buffers_requested: usize,
    /// Makes every `create_vertex_buffer` fail.
    pub fail_vertex_buffers: bool,
    /// Makes only the n-th `create_vertex_buffer` call fail, counting from 1.
    pub fail_vertex_buffer_at: Option<usize>,
}

impl RecordingResources {
    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn vertex_array(&self, id: VertexArrayId) -> Option<&RecordedVertexArray> {
        self.live_vertex_arrays.get(&id.0)
    }
}

impl RenderResources for RecordingResources {
    fn create_vertex_buffer(&mut self, positions: &[f32]) -> anyhow::Result<BufferHandle> {
        self.vertex_buffers_requested += 1;
        let failing = self.fail_vertex_buffers
            || self.fail_vertex_buffer_at == Some(self.vertex_buffers_requested);
        anyhow::ensure!(!failing, "out of device memory");
        let id = self.next();
        self.live_buffers.insert(id, RecordedBuffer::Vertex(positions.to_vec()));
        Ok(BufferHandle::from_raw(id))
    }

    fn create_index_buffer(&mut self, indices: &[u16]) -> anyhow::Result<BufferHandle> {
        let id = self.next();
        self.live_buffers.insert(id, RecordedBuffer::Index(indices.to_vec()));
        Ok(BufferHandle::from_raw(id))
    }

    fn create_vertex_array(&mut self, desc: VertexArrayDesc) -> anyhow::Result<VertexArrayHandle> {
        let vb = desc.vertex_buffer.raw();
        let ib = desc.index_buffer.raw();
        let (Some(RecordedBuffer::Vertex(positions)), Some(RecordedBuffer::Index(indices))) =
            (self.live_buffers.get(&vb), self.live_buffers.get(&ib))
        else {
            anyhow::bail!("vertex array bound to unknown buffers {vb}/{ib}");
        };
        anyhow::ensure!(indices.len() == desc.index_count as usize, "index count mismatch");

        let recorded = RecordedVertexArray {
            positions: positions.clone(),
            indices: indices.clone(),
            color: desc.color,
            buffers: [vb, ib],
        };
        let id = self.next();
        self.live_vertex_arrays.insert(id, recorded);
        self.vertex_arrays_created += 1;
        Ok(VertexArrayHandle::from_raw(id))
    }

    fn compile_or_reuse_shader_program(
        &mut self,
        desc: &ShaderProgramDesc,
    ) -> anyhow::Result<ShaderProgramHandle> {
        anyhow::ensure!(desc.source.contains(desc.vertex_entry), "missing vertex entry");
        let id = self.next();
        self.live_programs.insert(id);
        self.programs_compiled += 1;
        Ok(ShaderProgramHandle::from_raw(id))
    }

    fn build_render_state(&mut self, state: &RenderState) -> RenderStateId {
        let index = match self.render_states.iter().position(|s| s == state) {
            Some(index) => index,
            None => {
                self.render_states.push(*state);
                self.render_states.len() - 1
            }
        };
        RenderStateId(index as u32)
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        assert!(self.live_buffers.remove(&buffer.raw()).is_some(), "double free");
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        let recorded = self
            .live_vertex_arrays
            .remove(&vertex_array.raw())
            .expect("vertex array destroyed twice");
        for buffer in recorded.buffers {
            self.live_buffers.remove(&buffer);
        }
        self.destroyed_vertex_arrays.push(vertex_array.raw());
    }

    fn destroy_shader_program(&mut self, program: ShaderProgramHandle) {
        assert!(self.live_programs.remove(&program.raw()), "program destroyed twice");
    }
}

/// Tessellator with a fixed point count, placed on a circle of the
/// semi-major radius. Counts invocations.
pub(crate) struct FixedCountTessellator {
    count: usize,
    calls: Rc<Cell<usize>>,
}

impl FixedCountTessellator {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn calls(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl EllipseTessellator for FixedCountTessellator {
    fn compute_boundary(&self, shape: &EllipseShape) -> Vec<f32> {
        self.calls.set(self.calls.get() + 1);
        let mut out = Vec::with_capacity(self.count * 3);
        for i in 0..self.count {
            let (sin, cos) = (TAU * i as f32 / self.count as f32).sin_cos();
            let p = shape.center + Vec3::new(cos, sin, 0.0) * shape.semi_major_axis;
            out.extend_from_slice(&[p.x, p.y, p.z]);
        }
        out
    }
}

/// Projects by translating every point.
pub(crate) struct OffsetProjector(pub Vec3);

impl ScenePositionProjector for OffsetProjector {
    fn project(&self, point: Vec3) -> Vec3 {
        point + self.0
    }
}
