//! Vertex formats for the batched renderers.
//!
//! Both formats are plain-old-data so whole batches can be uploaded with a
//! single `bytemuck` cast. Layouts here must stay in sync with the vertex
//! inputs in `shader.wgsl`.

use bytemuck::{Pod, Zeroable};

/// Vertex for textured quads: position, color, and UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ImageVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
    pub uv: [f32; 2],
}

impl ImageVertex {
    #[cfg(feature = "wgpu-backend")]
    pub(crate) const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ImageVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4, 2 => Float32x2],
    };
}

/// Vertex for solid geometry: position and color only.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl ShapeVertex {
    #[cfg(feature = "wgpu-backend")]
    pub(crate) const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4],
    };
}
