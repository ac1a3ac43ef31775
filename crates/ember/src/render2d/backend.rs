//! Draw backend abstraction.
//!
//! The batching renderers produce [`DrawCall`]s against whatever target is
//! currently bound; a [`DrawBackend`] turns those into actual GPU work. The
//! engine ships two implementations:
//!
//! - `WgpuBackend` (feature `wgpu-backend`) renders with wgpu.
//! - [`RecordingBackend`] records every call for inspection, which is how the
//!   batching and pass-ordering behavior is tested without a GPU.

use crate::math::Mat4;
use crate::render2d::color::Color;

/// Handle to a texture owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub(crate) u32);

/// Handle to an offscreen render target owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub(crate) u32);

/// What a textured batch samples from. Solid shape batches have no binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchBinding {
    Texture(TextureId),
    Target(RenderTargetId),
}

/// One batch of geometry, ready for the backend.
///
/// `vertex_data` is the raw bytes of either `ImageVertex` or `ShapeVertex`
/// data. A `binding` of `None` means the batch is solid geometry.
pub struct DrawCall<'a> {
    pub binding: Option<BatchBinding>,
    pub projection: Mat4,
    pub vertex_data: &'a [u8],
    pub indices: &'a [u32],
    pub index_count: u32,
}

/// The rendering seam between [`Graphics`](crate::render2d::Graphics) and the GPU.
///
/// `Any` is a supertrait so tests and tools can downcast a boxed backend back
/// to its concrete type.
pub trait DrawBackend: std::any::Any {
    /// Upload RGBA8 pixel data as a new texture.
    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> TextureId;

    /// Create an offscreen render target that can later be drawn like a texture.
    fn create_target(&mut self, width: u32, height: u32) -> RenderTargetId;

    fn target_size(&self, target: RenderTargetId) -> (u32, u32);

    fn backbuffer_size(&self) -> (u32, u32);

    fn begin_frame(&mut self);

    /// Direct subsequent clears and submits at `target`, or at the backbuffer
    /// when `None`.
    fn bind_target(&mut self, target: Option<RenderTargetId>);

    fn clear(&mut self, color: Color);

    fn submit(&mut self, call: DrawCall<'_>);

    fn end_frame(&mut self);
}

/// A draw call captured by [`RecordingBackend`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Target the call was submitted against (`None` = backbuffer).
    pub target: Option<RenderTargetId>,
    pub binding: Option<BatchBinding>,
    pub projection: Mat4,
    pub vertex_data: Vec<u8>,
    pub index_count: u32,
}

impl RecordedCall {
    /// Reinterpret the vertex bytes as floats.
    pub fn vertex_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertex_data)
    }
}

/// Headless backend that records draw calls instead of executing them.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    backbuffer: (u32, u32),
    textures: Vec<(u32, u32)>,
    targets: Vec<(u32, u32)>,
    bound: Option<RenderTargetId>,
    pub calls: Vec<RecordedCall>,
    pub clears: Vec<(Option<RenderTargetId>, Color)>,
}

impl RecordingBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            backbuffer: (width, height),
            ..Self::default()
        }
    }

    /// Calls submitted against a specific target.
    pub fn calls_for(&self, target: Option<RenderTargetId>) -> impl Iterator<Item = &RecordedCall> {
        self.calls.iter().filter(move |call| call.target == target)
    }

    pub fn clear_recording(&mut self) {
        self.calls.clear();
        self.clears.clear();
    }
}

impl DrawBackend for RecordingBackend {
    fn create_texture(&mut self, width: u32, height: u32, _pixels: &[u8]) -> TextureId {
        self.textures.push((width, height));
        TextureId(self.textures.len() as u32 - 1)
    }

    fn create_target(&mut self, width: u32, height: u32) -> RenderTargetId {
        self.targets.push((width, height));
        RenderTargetId(self.targets.len() as u32 - 1)
    }

    fn target_size(&self, target: RenderTargetId) -> (u32, u32) {
        self.targets[target.0 as usize]
    }

    fn backbuffer_size(&self) -> (u32, u32) {
        self.backbuffer
    }

    fn begin_frame(&mut self) {
        self.bound = None;
    }

    fn bind_target(&mut self, target: Option<RenderTargetId>) {
        self.bound = target;
    }

    fn clear(&mut self, color: Color) {
        self.clears.push((self.bound, color));
    }

    fn submit(&mut self, call: DrawCall<'_>) {
        self.calls.push(RecordedCall {
            target: self.bound,
            binding: call.binding,
            projection: call.projection,
            vertex_data: call.vertex_data.to_vec(),
            index_count: call.index_count,
        });
    }

    fn end_frame(&mut self) {}
}
