//! Built-in components: transforms, sprites, text, shapes, and animation.

pub mod animation;
pub mod shape;
pub mod sprite;
pub mod text;
pub mod transform;

pub use animation::{Animation, AnimationClip, PlayMode};
pub use shape::{BoxShape, CircleShape};
pub use sprite::Sprite;
pub use text::Text;
pub use transform::Transform;
