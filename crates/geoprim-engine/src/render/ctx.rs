/// Device handles the wgpu backend is created from.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
        }
    }
}

/// Where a frame's primitives are drawn.
///
/// `WgpuResources::encode` records one render pass into `encoder` that loads
/// and stores `color_view`. Clearing the view and submitting the encoder stay
/// with the host, so primitives can be layered over other passes.
pub struct RenderTarget<'a> {
    /// Host-owned encoder for the current frame.
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Color attachment; its format must match `RenderCtx::surface_format`.
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    /// Borrows the host's encoder and target view for one `encode` call.
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }
}
