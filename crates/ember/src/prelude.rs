//! One-stop import for the common engine types.
//!
//! ```
//! use ember::prelude::*;
//! ```

pub use crate::ecs::components::{
    Animation, AnimationClip, BoxShape, CircleShape, PlayMode, Sprite, Text, Transform,
};
pub use crate::ecs::components::transform::world_matrix;
pub use crate::ecs::{
    Component, Entity, EntityId, EntityManager, ListChange, ListEvent, ListHandle, ListSpec,
    MAX_LAYERS, Renderable, RenderSystem, System, SystemBase, SystemManager, Updatable,
    UpdateSystem,
};
pub use crate::events::{EventBus, ListenerId};
pub use crate::math::{Mat4, Rect, Vec2, Vec3, Vec4};
pub use crate::render2d::{
    Atlas, AtlasFrame, BatchBinding, BitmapFont, Camera, CameraConfig, Color, DrawBackend,
    Graphics, Image, LineAlign, RecordingBackend, RenderTargetId, TextureId, load_texture,
};
#[cfg(feature = "wgpu-backend")]
pub use crate::render2d::WgpuBackend;
pub use crate::scene::Scene;
pub use crate::time::Time;
