//! # Entities
//!
//! An entity is an id, an active flag, a render layer, and a bag of
//! components keyed by type. At most one component of each type can be
//! attached; adding a second replaces the first (destroying it). Alongside
//! the component map the entity keeps two capability caches listing which
//! component types opted into updating and rendering, so the systems iterate
//! only what matters.
//!
//! ```text
//! Entity #7
//! ┌────────────────────────────────────────────┐
//! │ components: TypeId → Box<dyn Component>    │
//! │   Transform   (plain data)                 │
//! │   Sprite      (renderable)                 │
//! │   Animation   (updatable)                  │
//! │                                            │
//! │ renderable cache: [Sprite]                 │
//! │ updatable cache:  [Animation]              │
//! └────────────────────────────────────────────┘
//! ```
//!
//! Ids are reused: when an entity is destroyed its id goes back to the free
//! pool and the next spawn picks it up before a fresh id is minted. Holding
//! an [`EntityId`] across a destroy is the caller's risk.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use crate::ecs::component::{Component, downcast_mut, downcast_ref};

/// Number of render layers. Entity layers must stay below this.
pub const MAX_LAYERS: u32 = 32;

/// Identifier for an entity. Ids are reused after destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity {}", self.0)
    }
}

/// Hands out entity ids, preferring freed ids over minting new ones.
#[derive(Debug, Default)]
pub(crate) struct IdAllocator {
    next: u32,
    free: Vec<u32>,
}

impl IdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        match self.free.pop() {
            Some(id) => EntityId(id),
            None => {
                let id = self.next;
                self.next += 1;
                EntityId(id)
            }
        }
    }

    pub fn free(&mut self, id: EntityId) {
        self.free.push(id.0);
    }
}

pub struct Entity {
    id: EntityId,
    /// Inactive entities are skipped by updating and rendering but keep
    /// their system list memberships.
    pub active: bool,
    layer: u32,
    pub(crate) layer_changed: bool,
    pub(crate) components_updated: bool,
    components: HashMap<TypeId, Box<dyn Component>>,
    updatable: Vec<TypeId>,
    renderable: Vec<TypeId>,
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Self {
        Self {
            id,
            active: true,
            layer: 0,
            layer_changed: false,
            components_updated: false,
            components: HashMap::new(),
            updatable: Vec::new(),
            renderable: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn layer(&self) -> u32 {
        self.layer
    }

    /// Move the entity to another render layer. Takes effect the next time
    /// the render system runs.
    pub fn set_layer(&mut self, layer: u32) {
        assert!(layer < MAX_LAYERS, "layer {layer} is out of range (max {MAX_LAYERS})");
        if layer != self.layer {
            self.layer = layer;
            self.layer_changed = true;
        }
    }

    /// Attach a component, replacing (and destroying) any existing component
    /// of the same type.
    pub fn add_component<C: Component>(&mut self, component: C) -> &mut C {
        let key = TypeId::of::<C>();
        if let Some(mut previous) = self.components.remove(&key) {
            previous.destroy();
            self.updatable.retain(|t| *t != key);
            self.renderable.retain(|t| *t != key);
        }

        let mut boxed: Box<dyn Component> = Box::new(component);
        if boxed.updatable().is_some() {
            self.updatable.push(key);
        }
        if boxed.renderable().is_some() {
            self.renderable.push(key);
        }
        self.components.insert(key, boxed);
        self.components_updated = true;

        downcast_mut(self.components.get_mut(&key).expect("component was just inserted").as_mut())
            .expect("component type mismatch")
    }

    /// Detach and destroy a component. Returns whether one was attached.
    pub fn remove_component<C: Component>(&mut self) -> bool {
        let key = TypeId::of::<C>();
        let Some(mut component) = self.components.remove(&key) else {
            return false;
        };
        component.destroy();
        self.updatable.retain(|t| *t != key);
        self.renderable.retain(|t| *t != key);
        self.components_updated = true;
        true
    }

    pub fn component<C: Component>(&self) -> Option<&C> {
        self.components
            .get(&TypeId::of::<C>())
            .and_then(|c| downcast_ref(c.as_ref()))
    }

    pub fn component_mut<C: Component>(&mut self) -> Option<&mut C> {
        self.components
            .get_mut(&TypeId::of::<C>())
            .and_then(|c| downcast_mut(c.as_mut()))
    }

    pub fn has_component<C: Component>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<C>())
    }

    pub fn has_components(&self, types: &[TypeId]) -> bool {
        types.iter().all(|t| self.components.contains_key(t))
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// How many attached components opted into rendering.
    pub fn renderable_count(&self) -> usize {
        self.renderable.len()
    }

    /// How many attached components opted into updating.
    pub fn updatable_count(&self) -> usize {
        self.updatable.len()
    }

    /// The components that opted into rendering, in insertion order.
    pub fn renderables(&self) -> impl Iterator<Item = &dyn Component> {
        self.renderable
            .iter()
            .filter_map(|t| self.components.get(t).map(|c| c.as_ref()))
    }

    /// Tick every active updatable component.
    ///
    /// Each component is detached while its update runs so it can mutate the
    /// rest of the entity. A component must not re-add its own type from
    /// inside its update.
    pub(crate) fn update_components(&mut self, dt: f32) {
        let keys = self.updatable.clone();
        for key in keys {
            let Some(mut component) = self.components.remove(&key) else {
                continue;
            };
            if component.active() {
                if let Some(updatable) = component.updatable() {
                    updatable.update(self, dt);
                }
            }
            self.components.entry(key).or_insert(component);
        }
    }

    /// Destroy and drop every component.
    pub(crate) fn destroy(&mut self) {
        for (_, mut component) in self.components.drain() {
            component.destroy();
        }
        self.updatable.clear();
        self.renderable.clear();
    }
}
