//! # System Manager
//!
//! Owns the systems and the cameras, and runs the frame:
//!
//! ```text
//! update(dt):   every active system, highest order first
//! render():     every active system renders into the camera targets,
//!               then an optional debug pass,
//!               then all camera targets composite onto the backbuffer
//! ```
//!
//! Systems are kept sorted by descending order with a stable sort, so equal
//! orders run in the order they were added. That tie-break is a contract,
//! not an accident; gameplay code may rely on it.

use std::any::{Any, TypeId};
use std::cmp::Reverse;

use crate::ecs::entity::Entity;
use crate::ecs::entity_manager::EntityManager;
use crate::ecs::system::{System, update_entity_lists};
use crate::render2d::{Camera, Color, Graphics};

struct SystemEntry {
    type_id: TypeId,
    system: Box<dyn System>,
}

#[derive(Default)]
pub struct SystemManager {
    entries: Vec<SystemEntry>,
    cameras: Vec<Camera>,
    /// Run the debug render pass after the normal one.
    pub debug_render: bool,
}

impl SystemManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system with a run priority. Higher priorities run earlier;
    /// systems sharing a priority run in insertion order. Adding a second
    /// system of the same type replaces the first.
    pub fn add_system<S: System>(&mut self, mut system: S, order: i32) {
        self.remove_system::<S>();
        system.base_mut().set_order(order);
        self.entries.push(SystemEntry {
            type_id: TypeId::of::<S>(),
            system: Box::new(system),
        });
        self.entries
            .sort_by_key(|entry| Reverse(entry.system.base().order()));
    }

    /// Destroy and drop a system. Returns whether it existed.
    pub fn remove_system<S: System>(&mut self) -> bool {
        let type_id = TypeId::of::<S>();
        let Some(index) = self.entries.iter().position(|e| e.type_id == type_id) else {
            return false;
        };
        let mut entry = self.entries.remove(index);
        entry.system.destroy();
        true
    }

    pub fn get<S: System>(&self) -> Option<&S> {
        let type_id = TypeId::of::<S>();
        self.entries
            .iter()
            .find(|e| e.type_id == type_id)
            .and_then(|e| (e.system.as_ref() as &dyn Any).downcast_ref())
    }

    pub fn get_mut<S: System>(&mut self) -> Option<&mut S> {
        let type_id = TypeId::of::<S>();
        self.entries
            .iter_mut()
            .find(|e| e.type_id == type_id)
            .and_then(|e| (e.system.as_mut() as &mut dyn Any).downcast_mut())
    }

    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn cameras_mut(&mut self) -> &mut [Camera] {
        &mut self.cameras
    }

    /// Re-match one entity against every system's lists.
    pub fn update_system_entities(&mut self, entity: &Entity, removed: bool) {
        for entry in &mut self.entries {
            update_entity_lists(entry.system.as_mut(), entity, removed);
        }
    }

    pub fn update(&mut self, entities: &mut EntityManager, dt: f32) {
        for entry in &mut self.entries {
            if entry.system.base().active {
                entry.system.update(entities, dt);
            }
        }
    }

    /// Render all systems into the camera targets, then composite every
    /// active camera's target onto the backbuffer at its viewport position.
    pub fn render(&mut self, entities: &mut EntityManager, graphics: &mut Graphics) {
        for entry in &mut self.entries {
            if entry.system.base().active {
                entry.system.render(entities, graphics, &mut self.cameras);
            }
        }

        if self.debug_render {
            for entry in &mut self.entries {
                let base = entry.system.base();
                if base.active && base.debug {
                    entry.system.debug_render(entities, graphics, &mut self.cameras);
                }
            }
        }

        graphics.reset_transform();
        graphics.color = Color::WHITE;
        graphics.start();
        for camera in self.cameras.iter().filter(|c| c.active) {
            graphics.draw_render_target(camera.screen_bounds.x, camera.screen_bounds.y, camera.target());
        }
        graphics.present();
    }

    /// Destroy every system, in run order.
    pub fn destroy(&mut self) {
        for mut entry in self.entries.drain(..) {
            entry.system.destroy();
        }
        self.cameras.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::ecs::system::SystemBase;

    type RunLog = Rc<RefCell<Vec<&'static str>>>;

    struct Named {
        base: SystemBase,
        name: &'static str,
        log: RunLog,
    }

    impl System for Named {
        fn base(&self) -> &SystemBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut SystemBase {
            &mut self.base
        }

        fn update(&mut self, _entities: &mut EntityManager, _dt: f32) {
            self.log.borrow_mut().push(self.name);
        }
    }

    // Priority tests need distinct system types, since the manager keys by type.
    macro_rules! named_system {
        ($ty:ident) => {
            struct $ty(Named);
            impl System for $ty {
                fn base(&self) -> &SystemBase {
                    &self.0.base
                }
                fn base_mut(&mut self) -> &mut SystemBase {
                    &mut self.0.base
                }
                fn update(&mut self, entities: &mut EntityManager, dt: f32) {
                    self.0.update(entities, dt);
                }
            }
        };
    }

    named_system!(Movement);
    named_system!(Collision);
    named_system!(Scoring);

    fn named(name: &'static str, log: &RunLog) -> Named {
        Named {
            base: SystemBase::new(),
            name,
            log: log.clone(),
        }
    }

    #[test]
    fn higher_order_runs_first_and_ties_keep_insertion_order() {
        let log: RunLog = Rc::new(RefCell::new(Vec::new()));
        let mut entities = EntityManager::new();
        let mut systems = SystemManager::new();

        systems.add_system(Movement(named("movement", &log)), 0);
        systems.add_system(Collision(named("collision", &log)), 10);
        systems.add_system(Scoring(named("scoring", &log)), 0);

        systems.update(&mut entities, 0.016);
        assert_eq!(*log.borrow(), vec!["collision", "movement", "scoring"]);
    }

    #[test]
    fn inactive_systems_are_skipped() {
        let log: RunLog = Rc::new(RefCell::new(Vec::new()));
        let mut entities = EntityManager::new();
        let mut systems = SystemManager::new();

        systems.add_system(Movement(named("movement", &log)), 0);
        systems.add_system(Collision(named("collision", &log)), 1);
        systems.get_mut::<Collision>().unwrap().0.base.active = false;

        systems.update(&mut entities, 0.016);
        assert_eq!(*log.borrow(), vec!["movement"]);
    }

    #[test]
    fn systems_are_fetched_by_type() {
        let log: RunLog = Rc::new(RefCell::new(Vec::new()));
        let mut systems = SystemManager::new();
        systems.add_system(Movement(named("movement", &log)), 3);

        assert_eq!(systems.get::<Movement>().unwrap().0.base.order(), 3);
        assert!(systems.get::<Collision>().is_none());

        assert!(systems.remove_system::<Movement>());
        assert!(systems.get::<Movement>().is_none());
        assert!(!systems.remove_system::<Movement>());
    }
}
