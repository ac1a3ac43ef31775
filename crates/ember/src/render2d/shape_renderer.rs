//! # Shape Renderer — Batched Solid Geometry
//!
//! Collects colored triangles into one preallocated vertex buffer and submits
//! them as a single draw call. Everything here is triangles: rectangles are
//! two, circles are fans, lines and outlines are thin quads. A batch is
//! flushed when it fills up or when [`Graphics`](super::Graphics) switches to
//! textured drawing or another render target.
//!
//! ## Design
//!
//! ```text
//! draw_solid_rect ──┐
//! draw_line ────────┼──► push_triangle ──► vertices[count * 3 ..]
//! draw_circle ──────┘         │
//!                             └─ buffer full? ──► present() ──► DrawCall
//! ```
//!
//! The index buffer is the identity sequence (vertices are never shared
//! between triangles), so it is built once at construction and sliced per
//! batch.

use crate::math::{Mat4, Vec3};
use crate::render2d::backend::{DrawBackend, DrawCall};
use crate::render2d::color::Color;
use crate::render2d::vertex::ShapeVertex;

/// Triangles per batch before a forced flush.
pub(crate) const MAX_TRIANGLES: usize = 4000;

/// How a line of nonzero width sits relative to the segment it traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAlign {
    Inside,
    Center,
    Outside,
}

pub(crate) struct ShapeRenderer {
    vertices: Vec<ShapeVertex>,
    indices: Vec<u32>,
    count: usize,
    projection: Mat4,
}

impl ShapeRenderer {
    pub fn new() -> Self {
        Self {
            vertices: vec![ShapeVertex::default(); MAX_TRIANGLES * 3],
            indices: (0..(MAX_TRIANGLES * 3) as u32).collect(),
            count: 0,
            projection: Mat4::IDENTITY,
        }
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Submit the queued triangles as one draw call. No-op when empty.
    pub fn present(&mut self, backend: &mut dyn DrawBackend) {
        if self.count == 0 {
            return;
        }
        let vertex_count = self.count * 3;
        backend.submit(DrawCall {
            binding: None,
            projection: self.projection,
            vertex_data: bytemuck::cast_slice(&self.vertices[..vertex_count]),
            indices: &self.indices[..vertex_count],
            index_count: vertex_count as u32,
        });
        self.count = 0;
    }

    pub fn draw_solid_triangle(
        &mut self,
        backend: &mut dyn DrawBackend,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        color: Color,
        transform: &Mat4,
    ) {
        let points = [
            transform.transform_point3(Vec3::new(x1, y1, 0.0)),
            transform.transform_point3(Vec3::new(x2, y2, 0.0)),
            transform.transform_point3(Vec3::new(x3, y3, 0.0)),
        ];
        self.push_triangle(backend, points, color);
    }

    pub fn draw_solid_rect(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        transform: &Mat4,
    ) {
        self.draw_solid_triangle(backend, x, y, x + width, y, x + width, y + height, color, transform);
        self.draw_solid_triangle(backend, x, y, x + width, y + height, x, y + height, color, transform);
    }

    /// Draw a rectangle outline with the stroke inset into the rectangle.
    pub fn draw_rect(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
        color: Color,
        transform: &Mat4,
    ) {
        let lw = line_width.min(width * 0.5).min(height * 0.5);
        self.draw_solid_rect(backend, x, y, width, lw, color, transform);
        self.draw_solid_rect(backend, x, y + height - lw, width, lw, color, transform);
        self.draw_solid_rect(backend, x, y + lw, lw, height - lw * 2.0, color, transform);
        self.draw_solid_rect(backend, x + width - lw, y + lw, lw, height - lw * 2.0, color, transform);
    }

    pub fn draw_line(
        &mut self,
        backend: &mut dyn DrawBackend,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        align: LineAlign,
        line_width: f32,
        color: Color,
        transform: &Mat4,
    ) {
        let length = ((x2 - x1) * (x2 - x1) + (y2 - y1) * (y2 - y1)).sqrt();
        if length <= f32::EPSILON {
            return;
        }
        // Unit normal to the segment. Y is down, so this points to the left
        // of the travel direction on screen.
        let nx = -(y2 - y1) / length;
        let ny = (x2 - x1) / length;
        let (near, far) = match align {
            LineAlign::Inside => (0.0, line_width),
            LineAlign::Center => (-line_width * 0.5, line_width * 0.5),
            LineAlign::Outside => (-line_width, 0.0),
        };

        let ax = x1 + nx * near;
        let ay = y1 + ny * near;
        let bx = x2 + nx * near;
        let by = y2 + ny * near;
        let cx = x2 + nx * far;
        let cy = y2 + ny * far;
        let dx = x1 + nx * far;
        let dy = y1 + ny * far;
        self.draw_solid_triangle(backend, ax, ay, bx, by, cx, cy, color, transform);
        self.draw_solid_triangle(backend, ax, ay, cx, cy, dx, dy, color, transform);
    }

    pub fn draw_solid_circle(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        radius: f32,
        segments: u32,
        color: Color,
        transform: &Mat4,
    ) {
        let segments = segments.max(3);
        let step = std::f32::consts::TAU / segments as f32;
        for i in 0..segments {
            let a0 = step * i as f32;
            let a1 = step * (i + 1) as f32;
            self.draw_solid_triangle(
                backend,
                x,
                y,
                x + a0.cos() * radius,
                y + a0.sin() * radius,
                x + a1.cos() * radius,
                y + a1.sin() * radius,
                color,
                transform,
            );
        }
    }

    /// Draw a circle outline with the stroke inset toward the center.
    pub fn draw_circle(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        radius: f32,
        segments: u32,
        line_width: f32,
        color: Color,
        transform: &Mat4,
    ) {
        let segments = segments.max(3);
        let inner = (radius - line_width).max(0.0);
        let step = std::f32::consts::TAU / segments as f32;
        for i in 0..segments {
            let a0 = step * i as f32;
            let a1 = step * (i + 1) as f32;
            let (ox0, oy0) = (x + a0.cos() * radius, y + a0.sin() * radius);
            let (ox1, oy1) = (x + a1.cos() * radius, y + a1.sin() * radius);
            let (ix0, iy0) = (x + a0.cos() * inner, y + a0.sin() * inner);
            let (ix1, iy1) = (x + a1.cos() * inner, y + a1.sin() * inner);
            self.draw_solid_triangle(backend, ox0, oy0, ox1, oy1, ix1, iy1, color, transform);
            self.draw_solid_triangle(backend, ox0, oy0, ix1, iy1, ix0, iy0, color, transform);
        }
    }

    fn push_triangle(&mut self, backend: &mut dyn DrawBackend, points: [Vec3; 3], color: Color) {
        if self.count >= MAX_TRIANGLES {
            self.present(backend);
        }
        let base = self.count * 3;
        for (offset, point) in points.iter().enumerate() {
            self.vertices[base + offset] = ShapeVertex {
                position: [point.x, point.y, 0.0],
                color: color.to_array(),
            };
        }
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render2d::backend::RecordingBackend;

    fn renderer_and_backend() -> (ShapeRenderer, RecordingBackend) {
        let mut backend = RecordingBackend::new(640, 480);
        backend.begin_frame();
        (ShapeRenderer::new(), backend)
    }

    #[test]
    fn present_without_geometry_submits_nothing() {
        let (mut shapes, mut backend) = renderer_and_backend();
        shapes.present(&mut backend);
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn rect_batches_into_one_call() {
        let (mut shapes, mut backend) = renderer_and_backend();
        shapes.draw_solid_rect(&mut backend, 10.0, 20.0, 30.0, 40.0, Color::RED, &Mat4::IDENTITY);
        shapes.present(&mut backend);

        assert_eq!(backend.calls.len(), 1);
        let call = &backend.calls[0];
        assert_eq!(call.binding, None);
        assert_eq!(call.index_count, 6);

        let floats = call.vertex_floats();
        // First vertex of the first triangle is the rect origin.
        assert_eq!(&floats[0..3], &[10.0, 20.0, 0.0]);
        assert_eq!(&floats[3..7], &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn full_buffer_flushes_before_accepting_more() {
        let (mut shapes, mut backend) = renderer_and_backend();
        for i in 0..MAX_TRIANGLES + 1 {
            let x = i as f32;
            shapes.draw_solid_triangle(&mut backend, x, 0.0, x + 1.0, 0.0, x, 1.0, Color::WHITE, &Mat4::IDENTITY);
        }
        // The 4001st triangle forced a flush of the first 4000.
        assert_eq!(backend.calls.len(), 1);
        assert_eq!(backend.calls[0].index_count, (MAX_TRIANGLES * 3) as u32);

        shapes.present(&mut backend);
        assert_eq!(backend.calls.len(), 2);
        assert_eq!(backend.calls[1].index_count, 3);
    }

    #[test]
    fn vertices_are_transformed_on_push() {
        let (mut shapes, mut backend) = renderer_and_backend();
        let transform = Mat4::from_translation(crate::math::Vec3::new(100.0, 50.0, 0.0));
        shapes.draw_solid_triangle(&mut backend, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, Color::WHITE, &transform);
        shapes.present(&mut backend);

        let floats = backend.calls[0].vertex_floats();
        assert_eq!(&floats[0..2], &[100.0, 50.0]);
    }
}
