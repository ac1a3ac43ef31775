//! # Cameras
//!
//! Every camera renders the scene into its own offscreen target, which the
//! system manager composites onto the backbuffer at the end of the frame.
//! The camera transform maps world space to the camera's view: translate the
//! camera position to the viewport center, then rotate and zoom around it.
//! Splitscreen is a second camera with a different view rectangle.

use crate::math::{Mat4, Rect, Vec2, Vec3, rotate_around, to_rad};
use crate::render2d::backend::RenderTargetId;
use crate::render2d::color::Color;
use crate::render2d::graphics::Graphics;

/// Initial settings for [`Camera::with_config`].
pub struct CameraConfig {
    /// World position the camera centers on. Defaults to the center of the
    /// camera's own viewport, which makes the default transform an identity.
    pub position: Option<Vec2>,
    /// Rotation in degrees.
    pub rotation: f32,
    pub zoom: f32,
    /// Viewport as fractions of the backbuffer (0-1).
    pub view_x: f32,
    pub view_y: f32,
    pub view_width: f32,
    pub view_height: f32,
    pub bg_color: Color,
    /// Render layers this camera skips.
    pub ignored_layers: Vec<u32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: None,
            rotation: 0.0,
            zoom: 1.0,
            view_x: 0.0,
            view_y: 0.0,
            view_width: 1.0,
            view_height: 1.0,
            bg_color: Color::BLACK,
            ignored_layers: Vec::new(),
        }
    }
}

pub struct Camera {
    /// Inactive cameras are skipped entirely, including compositing.
    pub active: bool,
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub zoom: f32,
    pub bg_color: Color,
    pub ignored_layers: Vec<u32>,
    /// World-space rectangle the camera can see. Updated by
    /// [`update_transform`](Self::update_transform).
    pub bounds: Rect,
    /// Viewport in backbuffer pixels.
    pub screen_bounds: Rect,
    pub transform: Mat4,
    target: RenderTargetId,
    view_rect: Rect,
}

impl Camera {
    /// A full-view camera with default settings.
    pub fn new(graphics: &mut Graphics) -> Self {
        Self::with_config(graphics, CameraConfig::default())
    }

    pub fn with_config(graphics: &mut Graphics, config: CameraConfig) -> Self {
        let view_rect = Rect::new(config.view_x, config.view_y, config.view_width, config.view_height);
        let screen_bounds = scale_to_screen(view_rect, graphics.backbuffer_size());
        let target =
            graphics.create_target(screen_bounds.width as u32, screen_bounds.height as u32);
        let position = config.position.unwrap_or(Vec2::new(
            screen_bounds.width * 0.5,
            screen_bounds.height * 0.5,
        ));

        let mut camera = Self {
            active: true,
            position,
            rotation: config.rotation,
            zoom: config.zoom,
            bg_color: config.bg_color,
            ignored_layers: config.ignored_layers,
            bounds: Rect::default(),
            screen_bounds,
            transform: Mat4::IDENTITY,
            target,
            view_rect,
        };
        camera.update_transform();
        camera
    }

    pub fn target(&self) -> RenderTargetId {
        self.target
    }

    /// Recompute the world-to-view matrix from position, rotation, and zoom.
    pub fn update_transform(&mut self) {
        self.transform = Mat4::from_translation(Vec3::new(
            self.screen_bounds.width * 0.5,
            self.screen_bounds.height * 0.5,
            0.0,
        )) * Mat4::from_rotation_z(to_rad(self.rotation))
            * Mat4::from_scale(Vec3::new(self.zoom, self.zoom, 1.0))
            * Mat4::from_translation(Vec3::new(-self.position.x, -self.position.y, 0.0));
        self.update_bounds();
    }

    /// Change the viewport fractions and recreate the render target to match.
    pub fn update_view(&mut self, graphics: &mut Graphics, x: f32, y: f32, width: f32, height: f32) {
        self.view_rect = Rect::new(x, y, width, height);
        self.resize(graphics);
    }

    /// Rebuild the screen bounds and target after the backbuffer changed size.
    ///
    /// Allocates a fresh render target; the old one stays in the backend's
    /// target table until the backend is dropped.
    pub fn resize(&mut self, graphics: &mut Graphics) {
        self.screen_bounds = scale_to_screen(self.view_rect, graphics.backbuffer_size());
        self.target =
            graphics.create_target(self.screen_bounds.width as u32, self.screen_bounds.height as u32);
        self.update_transform();
    }

    /// Convert a backbuffer pixel position to world space.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let unrotated = Vec2::new(
            self.bounds.x + (screen.x - self.screen_bounds.x) / self.zoom,
            self.bounds.y + (screen.y - self.screen_bounds.y) / self.zoom,
        );
        rotate_around(unrotated, self.position, -self.rotation)
    }

    fn update_bounds(&mut self) {
        let width = self.screen_bounds.width / self.zoom;
        let height = self.screen_bounds.height / self.zoom;
        self.bounds = Rect::new(
            self.position.x - width * 0.5,
            self.position.y - height * 0.5,
            width,
            height,
        );
    }
}

fn scale_to_screen(view: Rect, (width, height): (u32, u32)) -> Rect {
    Rect::new(
        view.x * width as f32,
        view.y * height as f32,
        view.width * width as f32,
        view.height * height as f32,
    )
}
