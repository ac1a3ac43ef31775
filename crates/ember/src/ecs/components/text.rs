//! Bitmap text component.

use std::sync::Arc;

use crate::ecs::component::{Component, Renderable};
use crate::math::Vec2;
use crate::render2d::font::BitmapFont;
use crate::render2d::{Color, Graphics};

/// Draws a line of bitmap text at the entity's transform.
///
/// Anchoring uses the measured text width and the font's line height, so
/// (0.5, 0.5) centers the line on the entity position.
pub struct Text {
    pub font: Arc<BitmapFont>,
    pub text: String,
    pub anchor: Vec2,
    pub tint: Color,
    pub active: bool,
}

impl Text {
    pub fn new(font: Arc<BitmapFont>, text: impl Into<String>) -> Self {
        Self {
            font,
            text: text.into(),
            anchor: Vec2::new(0.5, 0.5),
            tint: Color::WHITE,
            active: true,
        }
    }

    pub fn with_anchor(mut self, x: f32, y: f32) -> Self {
        self.anchor = Vec2::new(x, y);
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub fn width(&self) -> f32 {
        self.font.width(&self.text)
    }

    pub fn height(&self) -> f32 {
        self.font.line_height()
    }
}

impl Component for Text {
    fn active(&self) -> bool {
        self.active
    }

    fn renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }
}

impl Renderable for Text {
    fn render(&self, graphics: &mut Graphics) {
        graphics.color = self.tint;
        graphics.draw_bitmap_text(
            -(self.width() * self.anchor.x),
            -(self.height() * self.anchor.y),
            &self.font,
            &self.text,
        );
    }
}
