//! # Image Renderer — Batched Textured Quads
//!
//! Collects textured quads (sprites, atlas frames, render targets, text
//! glyphs) into one preallocated vertex buffer. A batch only ever samples a
//! single texture or render target, so the queue is flushed whenever the
//! requested binding differs from the current one, in addition to the
//! buffer-full flush. Sorting draws by texture is the caller's lever for
//! keeping draw call counts low.
//!
//! Quads are four unique vertices with the fixed index pattern
//! `[0, 1, 2, 0, 2, 3]` per quad, built once at construction.

use crate::math::{Mat4, Vec2, Vec3};
use crate::render2d::backend::{BatchBinding, DrawBackend, DrawCall, RenderTargetId};
use crate::render2d::color::Color;
use crate::render2d::font::BitmapFont;
use crate::render2d::texture::Image;
use crate::render2d::vertex::ImageVertex;

/// Quads per batch before a forced flush.
pub(crate) const MAX_QUADS: usize = 4000;

pub(crate) struct ImageRenderer {
    vertices: Vec<ImageVertex>,
    indices: Vec<u32>,
    count: usize,
    binding: Option<BatchBinding>,
    projection: Mat4,
}

impl ImageRenderer {
    pub fn new() -> Self {
        let mut indices = Vec::with_capacity(MAX_QUADS * 6);
        for quad in 0..MAX_QUADS as u32 {
            let base = quad * 4;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self {
            vertices: vec![ImageVertex::default(); MAX_QUADS * 4],
            indices,
            count: 0,
            binding: None,
            projection: Mat4::IDENTITY,
        }
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Submit the queued quads as one draw call. No-op when empty.
    pub fn present(&mut self, backend: &mut dyn DrawBackend) {
        let Some(binding) = self.binding else { return };
        if self.count == 0 {
            return;
        }
        backend.submit(DrawCall {
            binding: Some(binding),
            projection: self.projection,
            vertex_data: bytemuck::cast_slice(&self.vertices[..self.count * 4]),
            indices: &self.indices[..self.count * 6],
            index_count: (self.count * 6) as u32,
        });
        self.count = 0;
        self.binding = None;
    }

    pub fn draw_image(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        flip_x: bool,
        flip_y: bool,
        image: &Image,
        color: Color,
        transform: &Mat4,
    ) {
        let (w, h) = (image.width as f32, image.height as f32);
        self.draw_scaled_image_section(
            backend, x, y, w, h, 0.0, 0.0, w, h, flip_x, flip_y, image, color, transform,
        );
    }

    pub fn draw_scaled_image(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        flip_x: bool,
        flip_y: bool,
        image: &Image,
        color: Color,
        transform: &Mat4,
    ) {
        let (w, h) = (image.width as f32, image.height as f32);
        self.draw_scaled_image_section(
            backend, x, y, width, height, 0.0, 0.0, w, h, flip_x, flip_y, image, color, transform,
        );
    }

    pub fn draw_image_section(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        flip_x: bool,
        flip_y: bool,
        image: &Image,
        color: Color,
        transform: &Mat4,
    ) {
        self.draw_scaled_image_section(
            backend, x, y, sw, sh, sx, sy, sw, sh, flip_x, flip_y, image, color, transform,
        );
    }

    /// Draw a section of `image` stretched to `width` x `height`. All other
    /// image draws funnel into this.
    pub fn draw_scaled_image_section(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        flip_x: bool,
        flip_y: bool,
        image: &Image,
        color: Color,
        transform: &Mat4,
    ) {
        self.switch_binding(backend, BatchBinding::Texture(image.texture));
        let positions = [
            Vec2::new(x, y),
            Vec2::new(x + width, y),
            Vec2::new(x + width, y + height),
            Vec2::new(x, y + height),
        ];
        let uv = section_uv(image, sx, sy, sw, sh, flip_x, flip_y);
        self.push_quad(positions, uv, color, transform);
    }

    /// Draw the full image with explicit corner positions, in the order
    /// top-left, top-right, bottom-right, bottom-left.
    pub fn draw_image_points(
        &mut self,
        backend: &mut dyn DrawBackend,
        points: [Vec2; 4],
        flip_x: bool,
        flip_y: bool,
        image: &Image,
        color: Color,
        transform: &Mat4,
    ) {
        self.switch_binding(backend, BatchBinding::Texture(image.texture));
        let (w, h) = (image.width as f32, image.height as f32);
        let uv = section_uv(image, 0.0, 0.0, w, h, flip_x, flip_y);
        self.push_quad(points, uv, color, transform);
    }

    pub fn draw_render_target(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        target: RenderTargetId,
        color: Color,
        transform: &Mat4,
    ) {
        let (width, height) = backend.target_size(target);
        self.switch_binding(backend, BatchBinding::Target(target));
        let positions = [
            Vec2::new(x, y),
            Vec2::new(x + width as f32, y),
            Vec2::new(x + width as f32, y + height as f32),
            Vec2::new(x, y + height as f32),
        ];
        let uv = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        self.push_quad(positions, uv, color, transform);
    }

    /// Draw a line of text as one quad per glyph, applying kerning before a
    /// glyph is placed and its advance after.
    pub fn draw_bitmap_text(
        &mut self,
        backend: &mut dyn DrawBackend,
        x: f32,
        y: f32,
        font: &BitmapFont,
        text: &str,
        color: Color,
        transform: &Mat4,
    ) {
        let image = font.image();
        let mut pen_x = x;
        let mut previous: Option<char> = None;
        for c in text.chars() {
            let Some(glyph) = font.char_data(c) else {
                previous = Some(c);
                continue;
            };
            if let Some(prev) = previous {
                pen_x += font.kerning(prev, c);
            }
            self.draw_scaled_image_section(
                backend,
                pen_x + glyph.x_offset,
                y + glyph.y_offset,
                glyph.width,
                glyph.height,
                glyph.x,
                glyph.y,
                glyph.width,
                glyph.height,
                false,
                false,
                &image,
                color,
                transform,
            );
            pen_x += glyph.x_advance;
            previous = Some(c);
        }
    }

    /// Flush if the buffer is full or the batch would sample something other
    /// than `binding`, then make `binding` current.
    fn switch_binding(&mut self, backend: &mut dyn DrawBackend, binding: BatchBinding) {
        if self.count >= MAX_QUADS || self.binding.is_some_and(|current| current != binding) {
            self.present(backend);
        }
        self.binding = Some(binding);
    }

    fn push_quad(&mut self, positions: [Vec2; 4], uv: [[f32; 2]; 4], color: Color, transform: &Mat4) {
        let base = self.count * 4;
        for i in 0..4 {
            let point = transform.transform_point3(Vec3::new(positions[i].x, positions[i].y, 0.0));
            self.vertices[base + i] = ImageVertex {
                position: [point.x, point.y, 0.0],
                color: color.to_array(),
                uv: uv[i],
            };
        }
        self.count += 1;
    }
}

fn section_uv(image: &Image, sx: f32, sy: f32, sw: f32, sh: f32, flip_x: bool, flip_y: bool) -> [[f32; 2]; 4] {
    let (tex_w, tex_h) = (image.width as f32, image.height as f32);
    let mut u0 = sx / tex_w;
    let mut u1 = (sx + sw) / tex_w;
    let mut v0 = sy / tex_h;
    let mut v1 = (sy + sh) / tex_h;
    if flip_x {
        std::mem::swap(&mut u0, &mut u1);
    }
    if flip_y {
        std::mem::swap(&mut v0, &mut v1);
    }
    [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render2d::backend::{RecordingBackend, TextureId};

    fn backend() -> RecordingBackend {
        let mut backend = RecordingBackend::new(640, 480);
        backend.begin_frame();
        backend
    }

    fn test_image(backend: &mut RecordingBackend, width: u32, height: u32) -> Image {
        let texture = backend.create_texture(width, height, &[]);
        Image { texture, width, height }
    }

    #[test]
    fn consecutive_draws_with_same_texture_share_one_call() {
        let mut backend = backend();
        let image = test_image(&mut backend, 16, 16);
        let mut images = ImageRenderer::new();

        for i in 0..3 {
            images.draw_image(&mut backend, i as f32 * 20.0, 0.0, false, false, &image, Color::WHITE, &Mat4::IDENTITY);
        }
        images.present(&mut backend);

        assert_eq!(backend.calls.len(), 1);
        let call = &backend.calls[0];
        assert_eq!(call.binding, Some(BatchBinding::Texture(image.texture)));
        assert_eq!(call.index_count, 18);
    }

    #[test]
    fn texture_switch_flushes_the_running_batch() {
        let mut backend = backend();
        let first = test_image(&mut backend, 16, 16);
        let second = test_image(&mut backend, 8, 8);
        let mut images = ImageRenderer::new();

        images.draw_image(&mut backend, 0.0, 0.0, false, false, &first, Color::WHITE, &Mat4::IDENTITY);
        images.draw_image(&mut backend, 20.0, 0.0, false, false, &second, Color::WHITE, &Mat4::IDENTITY);
        images.present(&mut backend);

        assert_eq!(backend.calls.len(), 2);
        assert_eq!(backend.calls[0].binding, Some(BatchBinding::Texture(first.texture)));
        assert_eq!(backend.calls[1].binding, Some(BatchBinding::Texture(second.texture)));
    }

    #[test]
    fn full_buffer_flushes_before_accepting_more() {
        let mut backend = backend();
        let image = test_image(&mut backend, 4, 4);
        let mut images = ImageRenderer::new();

        for _ in 0..MAX_QUADS + 1 {
            images.draw_image(&mut backend, 0.0, 0.0, false, false, &image, Color::WHITE, &Mat4::IDENTITY);
        }
        assert_eq!(backend.calls.len(), 1);
        assert_eq!(backend.calls[0].index_count, (MAX_QUADS * 6) as u32);
    }

    #[test]
    fn section_uvs_cover_the_requested_pixels() {
        let mut backend = backend();
        let image = test_image(&mut backend, 64, 32);
        let mut images = ImageRenderer::new();

        images.draw_image_section(&mut backend, 0.0, 0.0, 16.0, 8.0, 32.0, 16.0, false, false, &image, Color::WHITE, &Mat4::IDENTITY);
        images.present(&mut backend);

        let floats = backend.calls[0].vertex_floats();
        // Vertex stride is 9 floats; uv lives at offset 7.
        assert_eq!(&floats[7..9], &[0.25, 0.25]);
        assert_eq!(&floats[9 + 7..9 + 9], &[0.75, 0.25]);
        assert_eq!(&floats[18 + 7..18 + 9], &[0.75, 0.75]);
    }

    #[test]
    fn flip_x_swaps_horizontal_uvs() {
        let mut backend = backend();
        let image = test_image(&mut backend, 32, 32);
        let mut images = ImageRenderer::new();

        images.draw_image(&mut backend, 0.0, 0.0, true, false, &image, Color::WHITE, &Mat4::IDENTITY);
        images.present(&mut backend);

        let floats = backend.calls[0].vertex_floats();
        assert_eq!(&floats[7..9], &[1.0, 0.0]);
        assert_eq!(&floats[9 + 7..9 + 9], &[0.0, 0.0]);
    }

    #[test]
    fn render_target_draw_flushes_texture_batch() {
        let mut backend = backend();
        let image = test_image(&mut backend, 16, 16);
        let target = backend.create_target(100, 50);
        let mut images = ImageRenderer::new();

        images.draw_image(&mut backend, 0.0, 0.0, false, false, &image, Color::WHITE, &Mat4::IDENTITY);
        images.draw_render_target(&mut backend, 5.0, 5.0, target, Color::WHITE, &Mat4::IDENTITY);
        images.present(&mut backend);

        assert_eq!(backend.calls.len(), 2);
        assert_eq!(backend.calls[1].binding, Some(BatchBinding::Target(target)));
        // The quad spans the target's own size.
        let floats = backend.calls[1].vertex_floats();
        assert_eq!(&floats[9..11], &[105.0, 5.0]);
        assert_eq!(&floats[18..20], &[105.0, 55.0]);
    }

    #[test]
    fn bitmap_text_places_glyphs_with_kerning_and_advance() {
        let mut backend = backend();
        let texture = backend.create_texture(128, 128, &[]);
        let image = Image { texture, width: 128, height: 128 };
        let font = BitmapFont::new(image, crate::render2d::font::tests::TEST_FONT_DATA).unwrap();
        let mut images = ImageRenderer::new();

        images.draw_bitmap_text(&mut backend, 10.0, 0.0, &font, "AB", Color::WHITE, &Mat4::IDENTITY);
        images.present(&mut backend);

        assert_eq!(backend.calls.len(), 1);
        let floats = backend.calls[0].vertex_floats();
        // 'A': xoffset 1 from pen 10.
        assert_eq!(floats[0], 11.0);
        // 'B': pen 10 + advance 11 + kerning(A, B) -2, xoffset 0.
        assert_eq!(floats[36], 19.0);
    }
}
