use std::collections::HashMap;

use anyhow::Context;
use glam::Mat4;
use slotmap::{new_key_type, Key, KeyData, SlotMap};
use wgpu::util::DeviceExt;

use crate::host::{
    BufferHandle, RenderResources, RenderState, RenderStateId, ShaderProgramDesc,
    ShaderProgramHandle, VertexArrayDesc, VertexArrayHandle,
};
use crate::scene::DrawCommand;

use super::common::{
    closed_indices, draw_order, draw_uniform_min_binding_size, index_range, position_layout,
    strip_index_format, uniform_stride, wgpu_cull, wgpu_topology, DrawUniform,
};
use super::{RenderCtx, RenderTarget};

new_key_type! {
    struct BufferKey;
    struct VertexArrayKey;
    struct ProgramKey;
}

/// Backend configuration.
#[derive(Debug, Clone)]
pub struct WgpuResourcesConfig {
    /// Prefix for wgpu debug labels.
    pub label: &'static str,
    /// MSAA sample count of the color target.
    pub sample_count: u32,
}

impl Default for WgpuResourcesConfig {
    fn default() -> Self {
        Self {
            label: "geoprim",
            sample_count: 1,
        }
    }
}

#[derive(Debug)]
enum GpuBuffer {
    Vertex(wgpu::Buffer),
    /// Stored with the first index appended; see `closed_indices`.
    Index(wgpu::Buffer),
}

#[derive(Debug)]
struct GpuVertexArray {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    color: [f32; 4],
}

#[derive(Debug)]
struct GpuProgram {
    module: wgpu::ShaderModule,
    vertex_entry: &'static str,
    fragment_entry: &'static str,
}

type PipelineKey = (ProgramKey, RenderStateId, wgpu::PrimitiveTopology);

/// Host resource factory backed by wgpu.
///
/// Resources live in slotmap arenas; handles carry the slotmap key as their
/// raw id, so a stale handle resolves to nothing instead of another resource.
pub struct WgpuResources {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,
    config: WgpuResourcesConfig,

    buffers: SlotMap<BufferKey, GpuBuffer>,
    vertex_arrays: SlotMap<VertexArrayKey, GpuVertexArray>,
    programs: SlotMap<ProgramKey, GpuProgram>,
    render_states: Vec<RenderState>,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    uniform_stride: u64,
    uniform_buffer: Option<wgpu::Buffer>,
    uniform_capacity: usize,
    bind_group: Option<wgpu::BindGroup>,
}

impl WgpuResources {
    pub fn new(ctx: &RenderCtx<'_>, config: WgpuResourcesConfig) -> Self {
        let bind_group_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("geoprim draw uniform bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(draw_uniform_min_binding_size()),
                    },
                    count: None,
                }],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("geoprim primitive pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let alignment = ctx.device.limits().min_uniform_buffer_offset_alignment;

        Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            surface_format: ctx.surface_format,
            config,
            buffers: SlotMap::with_key(),
            vertex_arrays: SlotMap::with_key(),
            programs: SlotMap::with_key(),
            render_states: Vec::new(),
            pipelines: HashMap::new(),
            bind_group_layout,
            pipeline_layout,
            uniform_stride: uniform_stride(alignment),
            uniform_buffer: None,
            uniform_capacity: 0,
            bind_group: None,
        }
    }

    /// Live vertex arrays; primitives hold exactly one handle for each.
    pub fn vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    /// Encodes `commands` into one render pass on `target`.
    ///
    /// Commands referencing released or unknown resources are skipped.
    pub fn encode(
        &mut self,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        commands: &[DrawCommand],
    ) -> anyhow::Result<()> {
        let mut draws = Vec::with_capacity(commands.len());
        for i in draw_order(commands) {
            let cmd = &commands[i];
            let Some(draw) = self.resolve(cmd) else {
                log::warn!("skipping draw command with missing resources: {cmd:?}");
                continue;
            };
            draws.push(draw);
        }

        if draws.is_empty() {
            return Ok(());
        }

        for draw in &draws {
            self.ensure_pipeline(draw.pipeline)?;
        }
        self.ensure_uniform_capacity(draws.len());
        self.write_uniforms(view_proj, &draws);

        let Some(bind_group) = self.bind_group.as_ref() else { return Ok(()) };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("geoprim primitive pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        for (slot, draw) in draws.iter().enumerate() {
            let Some(pipeline) = self.pipelines.get(&draw.pipeline) else { continue };
            let Some(va) = self.vertex_arrays.get(draw.vertex_array) else { continue };

            let offset = (slot as u64 * self.uniform_stride) as u32;
            rpass.set_pipeline(pipeline);
            rpass.set_bind_group(0, bind_group, &[offset]);
            rpass.set_vertex_buffer(0, va.vertex_buffer.slice(..));
            rpass.set_index_buffer(va.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(draw.indices.clone(), 0, 0..1);
        }

        Ok(())
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn resolve(&self, cmd: &DrawCommand) -> Option<ResolvedDraw> {
        let vertex_array: VertexArrayKey = key_from_raw(cmd.vertex_array?.0);
        let program: ProgramKey = key_from_raw(cmd.shader_program?.0);
        let render_state = cmd.render_state?;

        let va = self.vertex_arrays.get(vertex_array)?;
        self.programs.get(program)?;
        self.render_states.get(render_state.0 as usize)?;

        Some(ResolvedDraw {
            pipeline: (program, render_state, wgpu_topology(cmd.primitive_type)),
            vertex_array,
            indices: index_range(cmd.primitive_type, va.index_count),
            model: cmd.model_matrix,
            color: va.color,
        })
    }

    fn ensure_pipeline(&mut self, key: PipelineKey) -> anyhow::Result<()> {
        if self.pipelines.contains_key(&key) {
            return Ok(());
        }
        let (program_key, state_id, topology) = key;
        let program = self
            .programs
            .get(program_key)
            .context("pipeline requested for a released shader program")?;
        let state = self
            .render_states
            .get(state_id.0 as usize)
            .context("pipeline requested for an unknown render state")?;

        // No depth attachment in this pass; depth settings have nothing to act on.
        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("geoprim primitive pipeline"),
            layout: Some(&self.pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.module,
                entry_point: Some(program.vertex_entry),
                compilation_options: Default::default(),
                buffers: &[position_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.module,
                entry_point: Some(program.fragment_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: state.blending.then_some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: strip_index_format(topology),
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: wgpu_cull(state.cull),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: self.config.sample_count,
                ..Default::default()
            },
            multiview_mask: None,
            cache: None,
        });

        log::debug!("{} pipeline created for {topology:?}, {state:?}", self.config.label);
        self.pipelines.insert(key, pipeline);
        Ok(())
    }

    fn ensure_uniform_capacity(&mut self, required: usize) {
        if required <= self.uniform_capacity && self.uniform_buffer.is_some() {
            return;
        }
        let new_cap = required.next_power_of_two().max(64);
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("geoprim draw uniforms"),
            size: new_cap as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("geoprim draw uniform bind group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: Some(draw_uniform_min_binding_size()),
                }),
            }],
        });

        self.uniform_buffer = Some(buffer);
        self.bind_group = Some(bind_group);
        self.uniform_capacity = new_cap;
    }

    fn write_uniforms(&self, view_proj: Mat4, draws: &[ResolvedDraw]) {
        let Some(buffer) = self.uniform_buffer.as_ref() else { return };

        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; draws.len() * stride];
        for (slot, draw) in draws.iter().enumerate() {
            let uniform = DrawUniform::new(view_proj, draw.model, draw.color);
            let start = slot * stride;
            bytes[start..start + std::mem::size_of::<DrawUniform>()]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        }
        self.queue.write_buffer(buffer, 0, &bytes);
    }

    fn take_buffer(&mut self, handle: BufferHandle) -> Option<GpuBuffer> {
        self.buffers.remove(key_from_raw::<BufferKey>(handle.raw()))
    }
}

impl RenderResources for WgpuResources {
    fn create_vertex_buffer(&mut self, positions: &[f32]) -> anyhow::Result<BufferHandle> {
        anyhow::ensure!(!positions.is_empty(), "vertex buffer with no positions");
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("geoprim vertex buffer"),
            contents: bytemuck::cast_slice(positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let key = self.buffers.insert(GpuBuffer::Vertex(buffer));
        Ok(BufferHandle::from_raw(key.data().as_ffi()))
    }

    fn create_index_buffer(&mut self, indices: &[u16]) -> anyhow::Result<BufferHandle> {
        anyhow::ensure!(!indices.is_empty(), "index buffer with no indices");
        let closed = closed_indices(indices);
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("geoprim index buffer"),
            contents: bytemuck::cast_slice(&closed),
            usage: wgpu::BufferUsages::INDEX,
        });
        let key = self.buffers.insert(GpuBuffer::Index(buffer));
        Ok(BufferHandle::from_raw(key.data().as_ffi()))
    }

    fn create_vertex_array(&mut self, desc: VertexArrayDesc) -> anyhow::Result<VertexArrayHandle> {
        let vertex = self.take_buffer(desc.vertex_buffer);
        let index = self.take_buffer(desc.index_buffer);

        let (Some(GpuBuffer::Vertex(vertex_buffer)), Some(GpuBuffer::Index(index_buffer))) =
            (vertex, index)
        else {
            // Whatever was taken is dropped here, which frees it.
            anyhow::bail!("vertex array needs one vertex buffer and one index buffer");
        };

        let key = self.vertex_arrays.insert(GpuVertexArray {
            vertex_buffer,
            index_buffer,
            index_count: desc.index_count,
            color: desc.color.to_array(),
        });
        Ok(VertexArrayHandle::from_raw(key.data().as_ffi()))
    }

    fn compile_or_reuse_shader_program(
        &mut self,
        desc: &ShaderProgramDesc,
    ) -> anyhow::Result<ShaderProgramHandle> {
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(desc.label),
            source: wgpu::ShaderSource::Wgsl(desc.source.into()),
        });
        let key = self.programs.insert(GpuProgram {
            module,
            vertex_entry: desc.vertex_entry,
            fragment_entry: desc.fragment_entry,
        });
        Ok(ShaderProgramHandle::from_raw(key.data().as_ffi()))
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
        if let Some(GpuBuffer::Vertex(b) | GpuBuffer::Index(b)) = self.take_buffer(buffer) {
            b.destroy();
        }
    }

    fn destroy_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        let key: VertexArrayKey = key_from_raw(vertex_array.raw());
        if let Some(va) = self.vertex_arrays.remove(key) {
            va.vertex_buffer.destroy();
            va.index_buffer.destroy();
        }
    }

    fn destroy_shader_program(&mut self, program: ShaderProgramHandle) {
        let key: ProgramKey = key_from_raw(program.raw());
        if self.programs.remove(key).is_some() {
            self.pipelines.retain(|(p, _, _), _| *p != key);
        }
    }
}

impl std::fmt::Debug for WgpuResources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuResources")
            .field("label", &self.config.label)
            .field("buffers", &self.buffers.len())
            .field("vertex_arrays", &self.vertex_arrays.len())
            .field("programs", &self.programs.len())
            .field("render_states", &self.render_states.len())
            .field("pipelines", &self.pipelines.len())
            .finish_non_exhaustive()
    }
}

/// A command with its bindings looked up.
struct ResolvedDraw {
    pipeline: PipelineKey,
    vertex_array: VertexArrayKey,
    indices: std::ops::Range<u32>,
    model: Mat4,
    color: [f32; 4],
}

fn key_from_raw<K: Key>(raw: u64) -> K {
    KeyData::from_ffi(raw).into()
}
