//! # Entity Manager
//!
//! Owns every live entity and keeps the systems' entity lists synchronized
//! with reality. Two rules drive it:
//!
//! - **Removal is deferred.** [`remove`](EntityManager::remove) only queues;
//!   the entity stays fully functional until the next
//!   [`update`](EntityManager::update), so nothing disappears mid-frame.
//! - **Refresh is dirty-driven.** Component changes set a flag on the entity;
//!   `update` re-matches only flagged entities against system lists instead
//!   of rescanning the world.

use crate::ecs::entity::{Entity, EntityId, IdAllocator};
use crate::ecs::system_manager::SystemManager;

#[derive(Default)]
pub struct EntityManager {
    entities: Vec<Entity>,
    to_remove: Vec<EntityId>,
    ids: IdAllocator,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an empty entity and notify the systems.
    pub fn add(&mut self, systems: &mut SystemManager) -> EntityId {
        self.add_with(systems, |_| {})
    }

    /// Spawn an entity, let `build` attach its components, then notify the
    /// systems once. The entity joins matching lists immediately, not on the
    /// next update.
    pub fn add_with(
        &mut self,
        systems: &mut SystemManager,
        build: impl FnOnce(&mut Entity),
    ) -> EntityId {
        let id = self.ids.allocate();
        let mut entity = Entity::new(id);
        build(&mut entity);
        entity.components_updated = false;
        self.entities.push(entity);

        let entity = self.entities.last().expect("entity was just pushed");
        systems.update_system_entities(entity, false);
        log::debug!("spawned {id}");
        id
    }

    /// Queue an entity for removal at the next [`update`](Self::update).
    /// Returns whether the entity exists. Queueing twice is a no-op.
    pub fn remove(&mut self, id: EntityId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        if !self.to_remove.contains(&id) {
            self.to_remove.push(id);
        }
        true
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Flush queued removals, then re-match entities whose component sets
    /// changed since the last update.
    ///
    /// For each removal: systems are notified first (so list hooks still see
    /// the entity), then the entity's components are destroyed, then it is
    /// dropped from the live set and its id returns to the pool.
    pub fn update(&mut self, systems: &mut SystemManager) {
        let pending = std::mem::take(&mut self.to_remove);
        for id in pending {
            let Some(index) = self.entities.iter().position(|e| e.id() == id) else {
                continue;
            };
            systems.update_system_entities(&self.entities[index], true);
            self.entities[index].destroy();
            self.entities.remove(index);
            self.ids.free(id);
            log::debug!("removed {id}");
        }

        for index in 0..self.entities.len() {
            if self.entities[index].components_updated {
                systems.update_system_entities(&self.entities[index], false);
                self.entities[index].components_updated = false;
            }
        }
    }

    /// Destroy every entity without individual system notifications.
    pub fn destroy(&mut self) {
        for mut entity in self.entities.drain(..) {
            entity.destroy();
        }
        self.to_remove.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;
    use crate::ecs::system::{ListHandle, ListSpec, System, SystemBase};

    struct Position;
    impl Component for Position {}

    struct Velocity;
    impl Component for Velocity {}

    struct TrackingSystem {
        base: SystemBase,
        list: ListHandle,
    }

    impl TrackingSystem {
        fn new() -> Self {
            let mut base = SystemBase::new();
            let list = base.register_list(ListSpec::new().require::<Position>());
            Self { base, list }
        }
    }

    impl System for TrackingSystem {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }
    }

    fn world() -> (EntityManager, SystemManager) {
        let mut systems = SystemManager::new();
        systems.add_system(TrackingSystem::new(), 0);
        (EntityManager::new(), systems)
    }

    fn tracked(systems: &SystemManager) -> Vec<EntityId> {
        let system = systems.get::<TrackingSystem>().unwrap();
        system.base.list(system.list).to_vec()
    }

    #[test]
    fn spawning_with_components_joins_lists_immediately() {
        let (mut entities, mut systems) = world();
        let id = entities.add_with(&mut systems, |e| {
            e.add_component(Position);
        });
        assert_eq!(tracked(&systems), vec![id]);
    }

    #[test]
    fn component_changes_take_effect_on_update() {
        let (mut entities, mut systems) = world();
        let id = entities.add(&mut systems);
        assert!(tracked(&systems).is_empty());

        entities.get_mut(id).unwrap().add_component(Position);
        // Not yet seen by the system.
        assert!(tracked(&systems).is_empty());

        entities.update(&mut systems);
        assert_eq!(tracked(&systems), vec![id]);

        entities.get_mut(id).unwrap().remove_component::<Position>();
        entities.update(&mut systems);
        assert!(tracked(&systems).is_empty());
    }

    #[test]
    fn unflagged_entities_are_not_rematched() {
        let (mut entities, mut systems) = world();
        let id = entities.add_with(&mut systems, |e| {
            e.add_component(Position);
        });

        // Adding an unrelated component elsewhere leaves membership alone.
        let other = entities.add(&mut systems);
        entities.get_mut(other).unwrap().add_component(Velocity);
        entities.update(&mut systems);
        assert_eq!(tracked(&systems), vec![id]);
    }

    #[test]
    fn removal_is_deferred_until_update() {
        let (mut entities, mut systems) = world();
        let id = entities.add_with(&mut systems, |e| {
            e.add_component(Position);
        });

        assert!(entities.remove(id));
        // Still alive and still tracked.
        assert!(entities.get(id).is_some());
        assert_eq!(tracked(&systems), vec![id]);

        entities.update(&mut systems);
        assert!(entities.get(id).is_none());
        assert!(tracked(&systems).is_empty());
    }

    #[test]
    fn removing_an_unknown_id_returns_false() {
        let (mut entities, mut systems) = world();
        let id = entities.add(&mut systems);
        entities.remove(id);
        entities.update(&mut systems);
        assert!(!entities.remove(id));
    }

    #[test]
    fn double_queueing_a_removal_is_harmless() {
        let (mut entities, mut systems) = world();
        let id = entities.add_with(&mut systems, |e| {
            e.add_component(Position);
        });
        assert!(entities.remove(id));
        assert!(entities.remove(id));
        entities.update(&mut systems);
        assert_eq!(entities.len(), 0);
    }

    #[test]
    fn destroyed_ids_are_reused() {
        let (mut entities, mut systems) = world();
        let first = entities.add(&mut systems);
        entities.remove(first);
        entities.update(&mut systems);

        let second = entities.add(&mut systems);
        assert_eq!(first, second);
    }
}
