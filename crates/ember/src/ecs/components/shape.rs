//! Primitive shape components.

use crate::ecs::component::{Component, Renderable};
use crate::math::Vec2;
use crate::render2d::{Color, Graphics};

/// A filled and/or stroked rectangle centered by its anchor.
pub struct BoxShape {
    pub width: f32,
    pub height: f32,
    pub anchor: Vec2,
    pub filled: bool,
    pub fill_color: Color,
    pub stroke: bool,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub active: bool,
}

impl BoxShape {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            anchor: Vec2::new(0.5, 0.5),
            filled: true,
            fill_color: Color::WHITE,
            stroke: false,
            stroke_color: Color::WHITE,
            stroke_width: 1.0,
            active: true,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.filled = true;
        self.fill_color = color;
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke = true;
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }
}

impl Component for BoxShape {
    fn active(&self) -> bool {
        self.active
    }

    fn renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }
}

impl Renderable for BoxShape {
    fn render(&self, graphics: &mut Graphics) {
        let x = -self.width * self.anchor.x;
        let y = -self.height * self.anchor.y;
        if self.filled {
            graphics.color = self.fill_color;
            graphics.draw_solid_rect(x, y, self.width, self.height);
        }
        if self.stroke {
            graphics.color = self.stroke_color;
            graphics.draw_rect(x, y, self.width, self.height, self.stroke_width);
        }
    }
}

/// A filled and/or stroked circle around the entity position.
pub struct CircleShape {
    pub radius: f32,
    pub segments: u32,
    pub filled: bool,
    pub fill_color: Color,
    pub stroke: bool,
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub active: bool,
}

impl CircleShape {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            segments: 32,
            filled: true,
            fill_color: Color::WHITE,
            stroke: false,
            stroke_color: Color::WHITE,
            stroke_width: 1.0,
            active: true,
        }
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.filled = true;
        self.fill_color = color;
        self
    }

    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke = true;
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }
}

impl Component for CircleShape {
    fn active(&self) -> bool {
        self.active
    }

    fn renderable(&self) -> Option<&dyn Renderable> {
        Some(self)
    }
}

impl Renderable for CircleShape {
    fn render(&self, graphics: &mut Graphics) {
        if self.filled {
            graphics.color = self.fill_color;
            graphics.draw_solid_circle(0.0, 0.0, self.radius, self.segments);
        }
        if self.stroke {
            graphics.color = self.stroke_color;
            graphics.draw_circle(0.0, 0.0, self.radius, self.segments, self.stroke_width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render2d::RecordingBackend;

    fn graphics() -> Graphics {
        let mut graphics = Graphics::new(Box::new(RecordingBackend::new(100, 100)));
        graphics.begin_frame();
        graphics.start();
        graphics
    }

    #[test]
    fn box_centers_on_its_anchor() {
        let shape = BoxShape::new(10.0, 20.0);
        let mut graphics = graphics();
        shape.render(&mut graphics);
        graphics.present();

        let backend = graphics.backend_as::<RecordingBackend>().unwrap();
        let floats = backend.calls[0].vertex_floats();
        assert_eq!(&floats[0..2], &[-5.0, -10.0]);
    }

    #[test]
    fn stroke_only_box_draws_four_strips() {
        let mut shape = BoxShape::new(10.0, 10.0).with_stroke(Color::RED, 1.0);
        shape.filled = false;
        let mut graphics = graphics();
        shape.render(&mut graphics);
        graphics.present();

        let backend = graphics.backend_as::<RecordingBackend>().unwrap();
        // 4 strips, 2 triangles each.
        assert_eq!(backend.calls[0].index_count, 24);
    }

    #[test]
    fn circle_triangle_count_follows_segments() {
        let mut shape = CircleShape::new(5.0);
        shape.segments = 12;
        let mut graphics = graphics();
        shape.render(&mut graphics);
        graphics.present();

        let backend = graphics.backend_as::<RecordingBackend>().unwrap();
        assert_eq!(backend.calls[0].index_count, 36);
    }
}
