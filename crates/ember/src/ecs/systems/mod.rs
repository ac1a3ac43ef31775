//! Built-in systems: updating and layered rendering.

pub mod render;
pub mod update;

pub use render::RenderSystem;
pub use update::UpdateSystem;
