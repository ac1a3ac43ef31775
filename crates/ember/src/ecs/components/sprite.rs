//! Atlas-frame sprite component.

use std::sync::Arc;

use crate::ecs::component::{Component, Renderable};
use crate::math::Vec2;
use crate::render2d::atlas::{Atlas, AtlasFrame};
use crate::render2d::{Color, Graphics};

/// Draws one frame of a sprite atlas at the entity's transform.
///
/// The anchor is in 0-1 frame space: (0.5, 0.5) centers the sprite on the
/// entity position. Trimmed frames are compensated automatically using the
/// frame's source rectangle.
pub struct Sprite {
    atlas: Arc<Atlas>,
    frame: Option<AtlasFrame>,
    pub anchor: Vec2,
    pub tint: Color,
    pub flip_x: bool,
    pub flip_y: bool,
    pub active: bool,
}

impl Sprite {
    pub fn new(atlas: Arc<Atlas>, frame_name: &str) -> Self {
        let frame = atlas.frame(frame_name).cloned();
        Self {
            atlas,
            frame,
            anchor: Vec2::new(0.5, 0.5),
            tint: Color::WHITE,
            flip_x: false,
            flip_y: false,
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

    /// Switch to another frame of the current atlas.
    pub fn set_frame(&mut self, frame_name: &str) {
        if let Some(frame) = self.atlas.frame(frame_name) {
            self.frame = Some(frame.clone());
        }
    }

    /// Switch atlas and frame together (used by animations).
    pub fn set_atlas_frame(&mut self, atlas: Arc<Atlas>, frame_name: &str) {
        self.atlas = atlas;
        if let Some(frame) = self.atlas.frame(frame_name) {
            self.frame = Some(frame.clone());
        }
    }

    pub fn frame_name(&self) -> Option<&str> {
        self.frame.as_ref().map(|f| f.name.as_str())
    }

    /// Untrimmed frame width.
    pub fn width(&self) -> f32 {
        self.frame.as_ref().map_or(0.0, |f| f.source_size.x)
    }

    pub fn height(&self) -> f32 {
        self.frame.as_ref().map_or(0.0, |f| f.source_size.y)
    }
}

impl Component for Sprite {
    fn active(&self) -> bool {
        self.active
    }

    fn renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }
}

impl Renderable for Sprite {
    fn render(&self, graphics: &mut Graphics) {
        let Some(frame) = &self.frame else { return };

        graphics.color = self.tint;
        graphics.draw_image_section(
            -(frame.source_size.x * self.anchor.x) + frame.source_rect.x,
            -(frame.source_size.y * self.anchor.y) + frame.source_rect.y,
            frame.frame.x,
            frame.frame.y,
            frame.frame.width,
            frame.frame.height,
            &self.atlas.image,
            self.flip_x,
            self.flip_y,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render2d::RecordingBackend;
    use crate::render2d::atlas::tests::test_atlas;

    #[test]
    fn sprite_picks_its_frame_from_the_atlas() {
        let sprite = Sprite::new(Arc::new(test_atlas()), "player");
        assert_eq!(sprite.frame_name(), Some("player"));
        assert_eq!(sprite.width(), 16.0);
    }

    #[test]
    fn missing_frame_renders_nothing() {
        let sprite = Sprite::new(Arc::new(test_atlas()), "nope");
        assert_eq!(sprite.frame_name(), None);

        let mut graphics = Graphics::new(Box::new(RecordingBackend::new(100, 100)));
        graphics.begin_frame();
        graphics.start();
        sprite.render(&mut graphics);
        graphics.present();
        let backend = graphics.backend_as::<RecordingBackend>().unwrap();
        assert!(backend.calls.is_empty());
    }

    #[test]
    fn anchor_and_trim_offset_the_quad() {
        // "coin" is trimmed: 10x12 pixels that sat at (3, 2) in a 16x16 image.
        let sprite = Sprite::new(Arc::new(test_atlas()), "coin").with_anchor(0.0, 0.0);

        let mut graphics = Graphics::new(Box::new(RecordingBackend::new(100, 100)));
        graphics.begin_frame();
        graphics.start();
        sprite.render(&mut graphics);
        graphics.present();

        let backend = graphics.backend_as::<RecordingBackend>().unwrap();
        let floats = backend.calls[0].vertex_floats();
        // Top-left vertex sits at the trim offset.
        assert_eq!(&floats[0..2], &[3.0, 2.0]);
    }
}
