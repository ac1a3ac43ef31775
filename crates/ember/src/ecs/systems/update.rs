//! Update system: ticks every active entity's updatable components.

use crate::ecs::entity_manager::EntityManager;
use crate::ecs::system::{ListHandle, ListSpec, System, SystemBase};

/// Drives the [`Updatable`](crate::ecs::Updatable) capability. Tracks every
/// entity with at least one updatable component and ticks them in the order
/// they joined.
pub struct UpdateSystem {
    base: SystemBase,
    tracked: ListHandle,
}

impl UpdateSystem {
    pub fn new() -> Self {
        let mut base = SystemBase::new();
        let tracked = base.register_list(ListSpec::updatables());
        Self { base, tracked }
    }
}

impl Default for UpdateSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for UpdateSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn update(&mut self, entities: &mut EntityManager, dt: f32) {
        for &id in self.base.list(self.tracked) {
            if let Some(entity) = entities.get_mut(id) {
                if entity.active {
                    entity.update_components(dt);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::{Component, Updatable};
    use crate::ecs::entity::Entity;
    use crate::ecs::system_manager::SystemManager;

    struct Clock {
        elapsed: f32,
        active: bool,
    }

    impl Component for Clock {
        fn active(&self) -> bool {
            self.active
        }

        fn updatable(&mut self) -> Option<&mut dyn Updatable> {
            Some(self)
        }
    }

    impl Updatable for Clock {
        fn update(&mut self, _entity: &mut Entity, dt: f32) {
            self.elapsed += dt;
        }
    }

    fn world() -> (EntityManager, SystemManager) {
        let mut systems = SystemManager::new();
        systems.add_system(UpdateSystem::new(), 0);
        (EntityManager::new(), systems)
    }

    #[test]
    fn active_updatables_receive_delta_time() {
        let (mut entities, mut systems) = world();
        let id = entities.add_with(&mut systems, |e| {
            e.add_component(Clock {
                elapsed: 0.0,
                active: true,
            });
        });

        systems.update(&mut entities, 0.5);
        systems.update(&mut entities, 0.25);
        let clock = entities.get(id).unwrap().component::<Clock>().unwrap();
        assert_eq!(clock.elapsed, 0.75);
    }

    #[test]
    fn inactive_entities_and_components_are_skipped() {
        let (mut entities, mut systems) = world();
        let sleeping = entities.add_with(&mut systems, |e| {
            e.add_component(Clock {
                elapsed: 0.0,
                active: false,
            });
        });
        let parked = entities.add_with(&mut systems, |e| {
            e.add_component(Clock {
                elapsed: 0.0,
                active: true,
            });
        });
        entities.get_mut(parked).unwrap().active = false;

        systems.update(&mut entities, 1.0);
        assert_eq!(entities.get(sleeping).unwrap().component::<Clock>().unwrap().elapsed, 0.0);
        assert_eq!(entities.get(parked).unwrap().component::<Clock>().unwrap().elapsed, 0.0);
    }

    #[test]
    fn updatables_can_mutate_sibling_components() {
        struct Counter(u32);
        impl Component for Counter {}

        struct Incrementer;
        impl Component for Incrementer {
            fn updatable(&mut self) -> Option<&mut dyn Updatable> {
                Some(self)
            }
        }
        impl Updatable for Incrementer {
            fn update(&mut self, entity: &mut Entity, _dt: f32) {
                entity.component_mut::<Counter>().unwrap().0 += 1;
            }
        }

        let (mut entities, mut systems) = world();
        let id = entities.add_with(&mut systems, |e| {
            e.add_component(Counter(0));
            e.add_component(Incrementer);
        });

        systems.update(&mut entities, 0.016);
        systems.update(&mut entities, 0.016);
        assert_eq!(entities.get(id).unwrap().component::<Counter>().unwrap().0, 2);
    }
}
