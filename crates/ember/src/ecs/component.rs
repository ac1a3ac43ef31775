//! # Components and Capabilities
//!
//! A component is any `'static` type implementing [`Component`]. Unlike
//! archetype ECS designs, components here live on the entity itself, keyed by
//! type, and a component declares what it can do by overriding the capability
//! accessors:
//!
//! - [`updatable`](Component::updatable) — the component wants a per-frame
//!   tick with delta time.
//! - [`renderable`](Component::renderable) — the component can draw itself
//!   through [`Graphics`].
//!
//! Returning `Some(self)` from an accessor is what opts a component into the
//! corresponding system; there is no structural detection. The entity caches
//! which component types answered at insertion time, so per-frame iteration
//! never probes every component.
//!
//! ## Comparison
//!
//! - **Bevy / hecs**: components are plain data in archetype tables, and
//!   behavior lives in free-function systems. Fast to iterate, but "this
//!   component draws itself" has no direct expression.
//! - **Unity `MonoBehaviour`**: closest in spirit — objects own components,
//!   components carry behavior, the engine calls into them.

use std::any::Any;

use crate::ecs::entity::Entity;
use crate::render2d::Graphics;

/// A typed piece of data and behavior attached to an entity.
///
/// All methods have defaults, so plain data components need an empty impl:
///
/// ```
/// use ember::ecs::Component;
///
/// struct Health(u32);
/// impl Component for Health {}
/// ```
pub trait Component: Any {
    /// Called when the component is removed or its entity is destroyed.
    fn destroy(&mut self) {}

    /// Inactive components are skipped by the update and render systems.
    fn active(&self) -> bool {
        true
    }

    /// Opt in to per-frame updates by returning `Some(self)`.
    fn updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// Opt in to being drawn by returning `Some(self)`.
    fn renderable(&self) -> Option<&dyn Renderable> {
        None
    }
}

/// Per-frame behavior for a component.
pub trait Updatable {
    /// Advance the component by `dt` seconds.
    ///
    /// The component is detached from `entity` while this runs, so it can
    /// freely inspect and mutate its entity's other components.
    fn update(&mut self, entity: &mut Entity, dt: f32);
}

/// Drawing behavior for a component.
///
/// The transform on `graphics` is already the entity's world transform when
/// these are called.
pub trait Renderable {
    fn render(&self, graphics: &mut Graphics);

    /// Extra debug geometry (colliders, bounds). Off by default.
    fn debug_render(&self, _graphics: &mut Graphics) {}
}

pub(crate) fn downcast_ref<C: Component>(component: &dyn Component) -> Option<&C> {
    (component as &dyn Any).downcast_ref()
}

pub(crate) fn downcast_mut<C: Component>(component: &mut dyn Component) -> Option<&mut C> {
    (component as &mut dyn Any).downcast_mut()
}
