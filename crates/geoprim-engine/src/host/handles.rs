/// Owned GPU buffer (vertex or index data).
///
/// Move-only; ownership passes into a vertex array on creation.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a handle leaks the GPU resource it names"]
pub struct BufferHandle(u64);

impl BufferHandle {
    /// Wraps a factory-assigned raw id. Only resource factories should call this.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Owned vertex array: vertex buffer + index buffer + constant color.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a handle leaks the GPU resource it names"]
pub struct VertexArrayHandle(u64);

impl VertexArrayHandle {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Borrowed reference for draw commands.
    #[inline]
    pub const fn id(&self) -> VertexArrayId {
        VertexArrayId(self.0)
    }
}

/// Copyable reference to a vertex array, valid while its handle is alive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct VertexArrayId(pub u64);

/// Owned compiled shader program.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a handle leaks the GPU resource it names"]
pub struct ShaderProgramHandle(u64);

impl ShaderProgramHandle {
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn id(&self) -> ShaderProgramId {
        ShaderProgramId(self.0)
    }
}

/// Copyable reference to a shader program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ShaderProgramId(pub u64);

/// Cached render state. Owned by the factory's cache, not by primitives.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct RenderStateId(pub u32);
