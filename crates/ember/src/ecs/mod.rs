//! # Entity Component System
//!
//! The runtime revolves around three managers:
//!
//! - [`EntityManager`] owns the entities. Entities own their components,
//!   keyed by type, with capability caches for updating and rendering.
//! - [`SystemManager`] owns the systems and cameras and runs the frame in
//!   priority order.
//! - Systems register [`ListSpec`] predicates and get their entity lists
//!   maintained for them; they never scan the world.
//!
//! ```text
//!           spawn / change / remove
//! EntityManager ────────────────────► SystemManager
//!      │         list refresh              │
//!      │                                   │ update(dt), render()
//!      ▼                                   ▼
//!   Entity ◄──────── lists ──────────── System
//! ```
//!
//! See [`Scene`](crate::scene::Scene) for the usual way to wire these up.

pub mod component;
pub mod components;
pub mod entity;
pub mod entity_manager;
pub mod system;
pub mod system_manager;
pub mod systems;

pub use component::{Component, Renderable, Updatable};
pub use entity::{Entity, EntityId, MAX_LAYERS};
pub use entity_manager::EntityManager;
pub use system::{ListChange, ListEvent, ListHandle, ListSpec, System, SystemBase};
pub use system_manager::SystemManager;
pub use systems::{RenderSystem, UpdateSystem};
