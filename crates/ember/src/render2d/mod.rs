//! # 2D Rendering
//!
//! A batched 2D renderer behind a swappable [`DrawBackend`]:
//!
//! - [`Graphics`] is the drawing facade with transform and target stacks.
//! - [`ShapeRenderer`](shape_renderer) batches solid triangles,
//!   [`ImageRenderer`](image_renderer) batches textured quads; both flush
//!   into as few backend draw calls as the call pattern allows.
//! - [`Camera`] renders into its own offscreen target for compositing.
//! - [`Atlas`] and [`BitmapFont`] describe packed textures and glyph pages.

pub mod atlas;
pub mod backend;
pub mod camera;
pub mod color;
pub mod font;
pub mod graphics;
pub mod image_renderer;
pub mod shape_renderer;
pub mod texture;
pub mod vertex;

#[cfg(feature = "wgpu-backend")]
pub mod gpu;

pub use atlas::{Atlas, AtlasError, AtlasFrame};
pub use backend::{BatchBinding, DrawBackend, DrawCall, RecordedCall, RecordingBackend, RenderTargetId, TextureId};
pub use camera::{Camera, CameraConfig};
pub use color::Color;
pub use font::{BitmapFont, FontChar, FontError};
#[cfg(feature = "wgpu-backend")]
pub use gpu::{GpuError, WgpuBackend};
pub use graphics::Graphics;
pub use shape_renderer::LineAlign;
pub use texture::{Image, TextureError, load_texture};
pub use vertex::{ImageVertex, ShapeVertex};
