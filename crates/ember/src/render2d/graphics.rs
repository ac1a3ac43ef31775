//! # Graphics — The Drawing Facade
//!
//! Everything a frame draws goes through [`Graphics`]: it owns the two
//! batching renderers, the transform and render target stacks, and the draw
//! backend. Its job is mostly routing, plus one batching rule of its own:
//! solid shapes and textured quads live in different vertex formats, so
//! switching between shape and image draws flushes the other renderer first.
//! This keeps submission order identical to call order.
//!
//! ## A render pass
//!
//! ```text
//! push_target(camera target)
//! start_clear(bg)            // projection from target size, clear
//! push_transform / apply_transform(camera)
//!     draw_* ...             // batched
//! pop_transform
//! present()                  // flush both renderers
//! pop_target()
//! ```
//!
//! The transform stack starts with one identity entry that can never be
//! popped; `draw_*` calls use whatever matrix is on top.

use std::any::Any;

use crate::math::{Mat4, Vec2};
use crate::render2d::backend::{DrawBackend, RenderTargetId};
use crate::render2d::color::Color;
use crate::render2d::font::BitmapFont;
use crate::render2d::image_renderer::ImageRenderer;
use crate::render2d::shape_renderer::{LineAlign, ShapeRenderer};
use crate::render2d::texture::Image;

const MAX_TRANSFORM_STACK: usize = 128;
const MAX_TARGET_STACK: usize = 64;

pub struct Graphics {
    /// Tint applied to subsequent draws.
    pub color: Color,
    transform_stack: Vec<Mat4>,
    target_stack: Vec<RenderTargetId>,
    shapes: ShapeRenderer,
    images: ImageRenderer,
    backend: Box<dyn DrawBackend>,
}

impl Graphics {
    pub fn new(backend: Box<dyn DrawBackend>) -> Self {
        Self {
            color: Color::WHITE,
            transform_stack: vec![Mat4::IDENTITY],
            target_stack: Vec::new(),
            shapes: ShapeRenderer::new(),
            images: ImageRenderer::new(),
            backend,
        }
    }

    pub fn backend(&self) -> &dyn DrawBackend {
        self.backend.as_ref()
    }

    pub fn backend_mut(&mut self) -> &mut dyn DrawBackend {
        self.backend.as_mut()
    }

    /// Downcast the backend to its concrete type.
    pub fn backend_as<B: DrawBackend>(&self) -> Option<&B> {
        (self.backend.as_ref() as &dyn Any).downcast_ref()
    }

    pub fn backend_as_mut<B: DrawBackend>(&mut self) -> Option<&mut B> {
        (self.backend.as_mut() as &mut dyn Any).downcast_mut()
    }

    /// Upload RGBA8 pixels as a texture the drawing functions can use.
    pub fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> Image {
        Image {
            texture: self.backend.create_texture(width, height, pixels),
            width,
            height,
        }
    }

    pub fn create_target(&mut self, width: u32, height: u32) -> RenderTargetId {
        self.backend.create_target(width, height)
    }

    pub fn backbuffer_size(&self) -> (u32, u32) {
        self.backend.backbuffer_size()
    }

    pub fn begin_frame(&mut self) {
        self.backend.begin_frame();
        self.color = Color::WHITE;
        self.transform_stack.clear();
        self.transform_stack.push(Mat4::IDENTITY);
        self.target_stack.clear();
        self.backend.bind_target(None);
    }

    pub fn end_frame(&mut self) {
        self.backend.end_frame();
    }

    // --- Transform stack ---

    /// The matrix applied to subsequent draws.
    pub fn transform(&self) -> Mat4 {
        *self.transform_stack.last().expect("transform stack is never empty")
    }

    /// Push a copy of the current transform.
    pub fn push_transform(&mut self) {
        assert!(
            self.transform_stack.len() < MAX_TRANSFORM_STACK,
            "transform stack overflow, more pushes than pops?"
        );
        self.transform_stack.push(self.transform());
    }

    /// Multiply `transform` onto the current matrix.
    pub fn apply_transform(&mut self, transform: &Mat4) {
        let top = self.transform_stack.last_mut().expect("transform stack is never empty");
        *top = *top * *transform;
    }

    pub fn pop_transform(&mut self) {
        assert!(
            self.transform_stack.len() > 1,
            "transform stack underflow, more pops than pushes?"
        );
        self.transform_stack.pop();
    }

    /// Drop back to a single identity transform.
    pub fn reset_transform(&mut self) {
        self.transform_stack.clear();
        self.transform_stack.push(Mat4::IDENTITY);
    }

    // --- Render target stack ---

    /// Redirect drawing into an offscreen target.
    pub fn push_target(&mut self, target: RenderTargetId) {
        assert!(
            self.target_stack.len() < MAX_TARGET_STACK,
            "render target stack overflow, more pushes than pops?"
        );
        self.target_stack.push(target);
        self.backend.bind_target(Some(target));
    }

    pub fn pop_target(&mut self) {
        self.target_stack.pop();
        self.backend.bind_target(self.target_stack.last().copied());
    }

    pub fn current_target(&self) -> Option<RenderTargetId> {
        self.target_stack.last().copied()
    }

    // --- Pass control ---

    /// Begin a pass against the current target: size the projection to it.
    pub fn start(&mut self) {
        let (width, height) = match self.target_stack.last() {
            Some(&target) => self.backend.target_size(target),
            None => self.backend.backbuffer_size(),
        };
        let projection =
            Mat4::orthographic_rh(0.0, width as f32, height as f32, 0.0, 0.0, 1000.0);
        self.shapes.set_projection(projection);
        self.images.set_projection(projection);
    }

    /// Begin a pass and clear the current target.
    pub fn start_clear(&mut self, color: Color) {
        self.start();
        self.backend.clear(color);
    }

    /// Flush everything queued so far.
    pub fn present(&mut self) {
        self.shapes.present(self.backend.as_mut());
        self.images.present(self.backend.as_mut());
    }

    // --- Solid shapes ---

    pub fn draw_solid_triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        let transform = self.transform();
        self.images.present(self.backend.as_mut());
        self.shapes
            .draw_solid_triangle(self.backend.as_mut(), x1, y1, x2, y2, x3, y3, self.color, &transform);
    }

    pub fn draw_solid_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let transform = self.transform();
        self.images.present(self.backend.as_mut());
        self.shapes
            .draw_solid_rect(self.backend.as_mut(), x, y, width, height, self.color, &transform);
    }

    pub fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32) {
        let transform = self.transform();
        self.images.present(self.backend.as_mut());
        self.shapes
            .draw_rect(self.backend.as_mut(), x, y, width, height, line_width, self.color, &transform);
    }

    pub fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, align: LineAlign, line_width: f32) {
        let transform = self.transform();
        self.images.present(self.backend.as_mut());
        self.shapes
            .draw_line(self.backend.as_mut(), x1, y1, x2, y2, align, line_width, self.color, &transform);
    }

    pub fn draw_solid_circle(&mut self, x: f32, y: f32, radius: f32, segments: u32) {
        let transform = self.transform();
        self.images.present(self.backend.as_mut());
        self.shapes
            .draw_solid_circle(self.backend.as_mut(), x, y, radius, segments, self.color, &transform);
    }

    pub fn draw_circle(&mut self, x: f32, y: f32, radius: f32, segments: u32, line_width: f32) {
        let transform = self.transform();
        self.images.present(self.backend.as_mut());
        self.shapes
            .draw_circle(self.backend.as_mut(), x, y, radius, segments, line_width, self.color, &transform);
    }

    // --- Images and text ---

    pub fn draw_image(&mut self, x: f32, y: f32, image: &Image, flip_x: bool, flip_y: bool) {
        let transform = self.transform();
        self.shapes.present(self.backend.as_mut());
        self.images
            .draw_image(self.backend.as_mut(), x, y, flip_x, flip_y, image, self.color, &transform);
    }

    pub fn draw_scaled_image(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        image: &Image,
        flip_x: bool,
        flip_y: bool,
    ) {
        let transform = self.transform();
        self.shapes.present(self.backend.as_mut());
        self.images.draw_scaled_image(
            self.backend.as_mut(),
            x,
            y,
            width,
            height,
            flip_x,
            flip_y,
            image,
            self.color,
            &transform,
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_image_section(
        &mut self,
        x: f32,
        y: f32,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        image: &Image,
        flip_x: bool,
        flip_y: bool,
    ) {
        let transform = self.transform();
        self.shapes.present(self.backend.as_mut());
        self.images.draw_image_section(
            self.backend.as_mut(),
            x,
            y,
            sx,
            sy,
            sw,
            sh,
            flip_x,
            flip_y,
            image,
            self.color,
            &transform,
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_scaled_image_section(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        sx: f32,
        sy: f32,
        sw: f32,
        sh: f32,
        image: &Image,
        flip_x: bool,
        flip_y: bool,
    ) {
        let transform = self.transform();
        self.shapes.present(self.backend.as_mut());
        self.images.draw_scaled_image_section(
            self.backend.as_mut(),
            x,
            y,
            width,
            height,
            sx,
            sy,
            sw,
            sh,
            flip_x,
            flip_y,
            image,
            self.color,
            &transform,
        );
    }

    /// Draw the full image with explicit corner positions (top-left,
    /// top-right, bottom-right, bottom-left).
    pub fn draw_image_points(&mut self, points: [Vec2; 4], image: &Image, flip_x: bool, flip_y: bool) {
        let transform = self.transform();
        self.shapes.present(self.backend.as_mut());
        self.images
            .draw_image_points(self.backend.as_mut(), points, flip_x, flip_y, image, self.color, &transform);
    }

    /// Draw an offscreen target like an image, at its own size.
    pub fn draw_render_target(&mut self, x: f32, y: f32, target: RenderTargetId) {
        let transform = self.transform();
        self.shapes.present(self.backend.as_mut());
        self.images
            .draw_render_target(self.backend.as_mut(), x, y, target, self.color, &transform);
    }

    pub fn draw_bitmap_text(&mut self, x: f32, y: f32, font: &BitmapFont, text: &str) {
        let transform = self.transform();
        self.shapes.present(self.backend.as_mut());
        self.images
            .draw_bitmap_text(self.backend.as_mut(), x, y, font, text, self.color, &transform);
    }
}
