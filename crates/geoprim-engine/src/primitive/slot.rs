use crate::coords::{pack, ColorRgba};
use crate::host::{RenderResources, VertexArrayDesc, VertexArrayHandle, VertexArrayId};
use crate::scene::DrawCommand;

/// One draw of a primitive: its vertex array and its reusable command.
///
/// Holds at most one live vertex array. A rebuild creates the replacement
/// first and then releases the old one, so a failed rebuild keeps the
/// previous frame's geometry.
///
/// A slot that sits out a dirty frame is marked stale and rebuilds the next
/// time it is drawn, even when the primitive is clean by then.
#[derive(Debug)]
pub(crate) struct DrawSlot {
    label: &'static str,
    vertex_array: Option<VertexArrayHandle>,
    command: DrawCommand,
    stale: bool,
}

impl DrawSlot {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            vertex_array: None,
            command: DrawCommand::default(),
            stale: false,
        }
    }

    #[inline]
    pub fn needs_rebuild(&self, dirty: bool) -> bool {
        dirty || self.stale || self.vertex_array.is_none()
    }

    /// Records that this draw was off for a frame. If that frame was dirty,
    /// the uploaded buffers no longer match and must be rebuilt before reuse.
    #[inline]
    pub fn skip(&mut self, dirty: bool) {
        self.stale |= dirty;
    }

    #[inline]
    pub fn vertex_array(&self) -> Option<VertexArrayId> {
        self.vertex_array.as_ref().map(VertexArrayHandle::id)
    }

    #[inline]
    pub fn command(&self) -> &DrawCommand {
        &self.command
    }

    #[inline]
    pub fn command_mut(&mut self) -> &mut DrawCommand {
        &mut self.command
    }

    /// Uploads `positions` + `indices` with a constant `color`.
    pub fn rebuild(
        &mut self,
        resources: &mut dyn RenderResources,
        positions: &[f32],
        indices: &[u16],
        color: ColorRgba,
    ) -> anyhow::Result<VertexArrayId> {
        let vertex_buffer = resources.create_vertex_buffer(positions)?;
        let index_buffer = match resources.create_index_buffer(indices) {
            Ok(buffer) => buffer,
            Err(err) => {
                resources.destroy_buffer(vertex_buffer);
                return Err(err);
            }
        };

        let vertex_array = resources.create_vertex_array(VertexArrayDesc {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            color,
        })?;

        log::debug!(
            "{} vertex array rebuilt: {} vertices, {} indices",
            self.label,
            pack::point_count(positions),
            indices.len()
        );

        let id = vertex_array.id();
        if let Some(old) = self.vertex_array.replace(vertex_array) {
            resources.destroy_vertex_array(old);
        }
        self.stale = false;
        Ok(id)
    }

    /// Releases the vertex array, if any.
    pub fn release(&mut self, resources: &mut dyn RenderResources) {
        if let Some(vertex_array) = self.vertex_array.take() {
            log::debug!("{} vertex array released", self.label);
            resources.destroy_vertex_array(vertex_array);
        }
        self.command.vertex_array = None;
        self.stale = false;
    }
}

impl Drop for DrawSlot {
    fn drop(&mut self) {
        if self.vertex_array.is_some() {
            log::warn!("{} dropped without destroy(); its vertex array leaks", self.label);
        }
    }
}
