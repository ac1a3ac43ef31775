//! # Systems and Entity Lists
//!
//! A system registers one or more *entity lists*, each with a predicate over
//! entities, and the entity manager keeps those lists up to date as entities
//! spawn, change components, or die. The system never scans the world; it
//! iterates its lists.
//!
//! Three predicate shapes cover the engine's needs:
//!
//! - a required component set (`ListSpec::new().require::<A>().require::<B>()`),
//! - "anything renderable" ([`ListSpec::renderables`]),
//! - "anything updatable" ([`ListSpec::updatables`]).
//!
//! Membership refresh is driven by dirty flags: an entity is only re-matched
//! against lists when its component set actually changed. When membership
//! flips, the system's [`entity_list_changed`](System::entity_list_changed)
//! hook fires so it can maintain derived state (the render system's layer
//! buckets, for example).

use std::any::{Any, TypeId};

use crate::ecs::component::Component;
use crate::ecs::entity::{Entity, EntityId};
use crate::ecs::entity_manager::EntityManager;
use crate::render2d::{Camera, Graphics};

/// Identifies one of a system's registered entity lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListHandle(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Added,
    Removed,
}

/// A membership change in one of a system's entity lists.
#[derive(Debug, Clone, Copy)]
pub struct ListEvent {
    pub list: ListHandle,
    pub change: ListChange,
    pub entity: EntityId,
}

/// Predicate for an entity list.
pub struct ListSpec {
    components: Vec<TypeId>,
    any_renderable: bool,
    any_updatable: bool,
}

impl ListSpec {
    /// Match entities that have every required component. Add requirements
    /// with [`require`](Self::require); with none, the list matches nothing.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            any_renderable: false,
            any_updatable: false,
        }
    }

    pub fn require<C: Component>(mut self) -> Self {
        self.components.push(TypeId::of::<C>());
        self
    }

    /// Match entities with at least one renderable component.
    pub fn renderables() -> Self {
        Self {
            components: Vec::new(),
            any_renderable: true,
            any_updatable: false,
        }
    }

    /// Match entities with at least one updatable component.
    pub fn updatables() -> Self {
        Self {
            components: Vec::new(),
            any_renderable: false,
            any_updatable: true,
        }
    }

    fn matches(&self, entity: &Entity) -> bool {
        if !self.components.is_empty() {
            entity.has_components(&self.components)
        } else if self.any_renderable {
            entity.renderable_count() > 0
        } else if self.any_updatable {
            entity.updatable_count() > 0
        } else {
            false
        }
    }
}

impl Default for ListSpec {
    fn default() -> Self {
        Self::new()
    }
}

struct EntityList {
    spec: ListSpec,
    entities: Vec<EntityId>,
}

/// State every system carries: active flags, run order, and entity lists.
///
/// Embed one and hand it out through [`System::base`]/[`System::base_mut`].
pub struct SystemBase {
    /// Inactive systems are skipped for update, render, and debug render.
    pub active: bool,
    /// Whether this system takes part in the debug render pass.
    pub debug: bool,
    order: i32,
    lists: Vec<EntityList>,
}

impl SystemBase {
    pub fn new() -> Self {
        Self {
            active: true,
            debug: true,
            order: 0,
            lists: Vec::new(),
        }
    }

    /// Run priority. Higher runs earlier; ties keep insertion order.
    pub fn order(&self) -> i32 {
        self.order
    }

    pub(crate) fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    pub fn register_list(&mut self, spec: ListSpec) -> ListHandle {
        self.lists.push(EntityList {
            spec,
            entities: Vec::new(),
        });
        ListHandle(self.lists.len() - 1)
    }

    /// The entities currently matching a list, in the order they joined.
    pub fn list(&self, handle: ListHandle) -> &[EntityId] {
        &self.lists[handle.0].entities
    }

    /// Re-match `entity` against every list, recording membership flips.
    pub(crate) fn refresh(&mut self, entity: &Entity, removed: bool, events: &mut Vec<ListEvent>) {
        for (index, list) in self.lists.iter_mut().enumerate() {
            let member = list.entities.contains(&entity.id());
            let matches = !removed && list.spec.matches(entity);
            if matches && !member {
                list.entities.push(entity.id());
                events.push(ListEvent {
                    list: ListHandle(index),
                    change: ListChange::Added,
                    entity: entity.id(),
                });
            } else if !matches && member {
                list.entities.retain(|id| *id != entity.id());
                events.push(ListEvent {
                    list: ListHandle(index),
                    change: ListChange::Removed,
                    entity: entity.id(),
                });
            }
        }
    }
}

impl Default for SystemBase {
    fn default() -> Self {
        Self::new()
    }
}

/// A unit of engine logic driven by the [`SystemManager`](crate::ecs::SystemManager).
///
/// All hooks are optional except the two base accessors.
pub trait System: Any {
    fn base(&self) -> &SystemBase;

    fn base_mut(&mut self) -> &mut SystemBase;

    fn update(&mut self, _entities: &mut EntityManager, _dt: f32) {}

    fn render(&mut self, _entities: &mut EntityManager, _graphics: &mut Graphics, _cameras: &mut [Camera]) {}

    fn debug_render(
        &mut self,
        _entities: &mut EntityManager,
        _graphics: &mut Graphics,
        _cameras: &mut [Camera],
    ) {
    }

    /// An entity entered or left one of this system's lists.
    fn entity_list_changed(&mut self, _event: ListEvent, _entity: &Entity) {}

    fn destroy(&mut self) {}
}

/// Refresh a system's lists for one entity and fire the change hook for
/// every membership flip.
pub(crate) fn update_entity_lists(system: &mut dyn System, entity: &Entity, removed: bool) {
    let mut events = Vec::new();
    system.base_mut().refresh(entity, removed, &mut events);
    for event in events {
        system.entity_list_changed(event, entity);
    }
}
