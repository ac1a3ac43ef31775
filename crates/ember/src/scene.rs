//! # Scene
//!
//! Bundles the entity manager, system manager, and event bus into one unit
//! with a frame loop:
//!
//! ```text
//! scene.update(dt):  flush queued entity changes, then run systems by priority
//! scene.render(g):   systems draw into camera targets, targets composite
//!                    onto the backbuffer
//! ```
//!
//! A host drives this from whatever windowing or timing loop it likes; the
//! engine does not own the loop.

use crate::ecs::{Entity, EntityId, EntityManager, RenderSystem, SystemManager, UpdateSystem};
use crate::events::EventBus;
use crate::render2d::{Camera, Graphics};
use crate::time::Time;

pub struct Scene {
    pub entities: EntityManager,
    pub systems: SystemManager,
    pub events: EventBus,
    pub time: Time,
}

impl Scene {
    /// An empty scene with no systems or cameras.
    pub fn new() -> Self {
        Self {
            entities: EntityManager::new(),
            systems: SystemManager::new(),
            events: EventBus::new(),
            time: Time::new(),
        }
    }

    /// A scene with the standard update and render systems and one
    /// full-view camera.
    pub fn with_default_systems(graphics: &mut Graphics) -> Self {
        let mut scene = Self::new();
        scene.systems.add_system(UpdateSystem::new(), 0);
        scene.systems.add_system(RenderSystem::new(), 0);
        scene.systems.add_camera(Camera::new(graphics));
        scene
    }

    /// Spawn an entity, attach components in `build`, and register it with
    /// the systems.
    pub fn add_entity(&mut self, build: impl FnOnce(&mut Entity)) -> EntityId {
        self.entities.add_with(&mut self.systems, build)
    }

    /// Queue an entity for removal at the next update.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(id)
    }

    /// Advance one frame: queued entity changes land first, then systems run
    /// in priority order.
    pub fn update(&mut self, dt: f32) {
        self.entities.update(&mut self.systems);
        self.systems.update(&mut self.entities, dt);
    }

    /// Render one frame into the graphics backend.
    pub fn render(&mut self, graphics: &mut Graphics) {
        graphics.begin_frame();
        self.systems.render(&mut self.entities, graphics);
        graphics.end_frame();
    }

    pub fn destroy(&mut self) {
        self.systems.destroy();
        self.entities.destroy();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::{BoxShape, Sprite, Transform};
    use crate::render2d::atlas::tests::test_atlas;
    use crate::render2d::{BatchBinding, CameraConfig, Color, RecordingBackend};
    use std::sync::Arc;

    fn graphics() -> Graphics {
        Graphics::new(Box::new(RecordingBackend::new(800, 600)))
    }

    fn recording(graphics: &Graphics) -> &RecordingBackend {
        graphics.backend_as::<RecordingBackend>().unwrap()
    }

    #[test]
    fn a_frame_clears_batches_and_composites() {
        let mut graphics = graphics();
        let mut scene = Scene::with_default_systems(&mut graphics);
        let atlas = Arc::new(test_atlas());

        // Two shapes on layer 0, one shape on layer 2, a sprite on layer 1.
        scene.add_entity(|e| {
            e.add_component(Transform::from_xy(10.0, 10.0));
            e.add_component(BoxShape::new(4.0, 4.0));
        });
        scene.add_entity(|e| {
            e.add_component(Transform::from_xy(30.0, 10.0));
            e.add_component(BoxShape::new(4.0, 4.0));
        });
        scene.add_entity(|e| {
            e.set_layer(2);
            e.add_component(Transform::from_xy(50.0, 10.0));
            e.add_component(BoxShape::new(4.0, 4.0));
        });
        let sprite_atlas = atlas.clone();
        scene.add_entity(move |e| {
            e.set_layer(1);
            e.add_component(Transform::from_xy(70.0, 10.0));
            e.add_component(Sprite::new(sprite_atlas, "player"));
        });

        scene.render(&mut graphics);

        let backend = recording(&graphics);
        let camera_target = scene.systems.cameras()[0].target();

        // The camera pass cleared its own target with the bg color.
        assert_eq!(backend.clears, vec![(Some(camera_target), Color::BLACK)]);

        // Camera pass: layer 0 shapes batch, flushed by the layer 1 sprite,
        // then the layer 2 shape in a fresh batch.
        let pass: Vec<_> = backend.calls_for(Some(camera_target)).collect();
        assert_eq!(pass.len(), 3);
        assert_eq!(pass[0].binding, None);
        assert_eq!(pass[0].index_count, 12); // two rects
        assert_eq!(pass[1].binding, Some(BatchBinding::Texture(atlas.image.texture)));
        assert_eq!(pass[2].binding, None);

        // Composite: the camera target drawn onto the backbuffer.
        let composite: Vec<_> = backend.calls_for(None).collect();
        assert_eq!(composite.len(), 1);
        assert_eq!(composite[0].binding, Some(BatchBinding::Target(camera_target)));
    }

    #[test]
    fn every_active_camera_gets_a_pass_before_compositing() {
        let mut graphics = graphics();
        let mut scene = Scene::with_default_systems(&mut graphics);
        let right = Camera::with_config(
            &mut graphics,
            CameraConfig {
                view_x: 0.5,
                view_width: 0.5,
                ..CameraConfig::default()
            },
        );
        scene.systems.add_camera(right);

        scene.add_entity(|e| {
            e.add_component(BoxShape::new(4.0, 4.0));
        });
        scene.render(&mut graphics);

        let backend = recording(&graphics);
        let first = scene.systems.cameras()[0].target();
        let second = scene.systems.cameras()[1].target();

        assert_eq!(backend.calls_for(Some(first)).count(), 1);
        assert_eq!(backend.calls_for(Some(second)).count(), 1);

        // Both targets composite in camera order, each its own batch.
        let composite: Vec<_> = backend.calls_for(None).collect();
        assert_eq!(composite.len(), 2);
        assert_eq!(composite[0].binding, Some(BatchBinding::Target(first)));
        assert_eq!(composite[1].binding, Some(BatchBinding::Target(second)));
        // The split camera composites at its viewport position.
        assert_eq!(composite[1].vertex_floats()[0], 400.0);
    }

    #[test]
    fn inactive_cameras_are_skipped_entirely() {
        let mut graphics = graphics();
        let mut scene = Scene::with_default_systems(&mut graphics);
        scene.systems.cameras_mut()[0].active = false;

        scene.add_entity(|e| {
            e.add_component(BoxShape::new(4.0, 4.0));
        });
        scene.render(&mut graphics);

        let backend = recording(&graphics);
        assert!(backend.calls.is_empty());
        assert!(backend.clears.is_empty());
    }

    #[test]
    fn update_lands_queued_changes_before_systems_run() {
        let mut graphics = graphics();
        let mut scene = Scene::with_default_systems(&mut graphics);
        let id = scene.add_entity(|e| {
            e.add_component(BoxShape::new(4.0, 4.0));
        });

        scene.remove_entity(id);
        scene.update(0.016);
        scene.render(&mut graphics);

        let backend = recording(&graphics);
        let camera_target = scene.systems.cameras()[0].target();
        assert_eq!(backend.calls_for(Some(camera_target)).count(), 0);
    }
}
