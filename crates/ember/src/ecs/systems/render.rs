//! # Render System
//!
//! Draws every renderable entity, bucketed into 32 layers, once per active
//! camera:
//!
//! ```text
//! for each active camera:
//!     update camera transform
//!     push camera target, clear with bg color
//!     apply camera transform
//!     for layer 0..32 (skipping the camera's ignored layers):
//!         for entity in bucket (join order):
//!             apply entity world transform
//!             render its renderable components
//!     present, pop target
//! ```
//!
//! Ascending layer order means higher layers draw later, on top. Within a
//! bucket entities keep the order they joined.
//!
//! Layer membership is maintained lazily: changing an entity's layer only
//! sets a flag, and the relocation pass at the start of `render` moves just
//! the flagged entities. A relocated entity joins the back of its new
//! bucket.

use std::collections::HashMap;

use crate::ecs::components::transform::world_matrix;
use crate::ecs::entity::{EntityId, MAX_LAYERS};
use crate::ecs::entity_manager::EntityManager;
use crate::ecs::system::{ListChange, ListEvent, ListHandle, ListSpec, System, SystemBase};
use crate::render2d::{Camera, Graphics};

pub struct RenderSystem {
    base: SystemBase,
    tracked: ListHandle,
    layers: Vec<Vec<EntityId>>,
    layer_of: HashMap<EntityId, u32>,
}

impl RenderSystem {
    pub fn new() -> Self {
        let mut base = SystemBase::new();
        let tracked = base.register_list(ListSpec::renderables());
        Self {
            base,
            tracked,
            layers: vec![Vec::new(); MAX_LAYERS as usize],
            layer_of: HashMap::new(),
        }
    }

    /// The entities in a layer bucket, in draw order.
    pub fn layer_entities(&self, layer: u32) -> &[EntityId] {
        &self.layers[layer as usize]
    }

    /// Move entities whose layer changed since the last frame. Touches only
    /// flagged entities.
    fn relocate_changed(&mut self, entities: &mut EntityManager) {
        for &id in self.base.list(self.tracked) {
            let Some(entity) = entities.get_mut(id) else {
                continue;
            };
            if !entity.layer_changed {
                continue;
            }
            entity.layer_changed = false;
            let layer = entity.layer();

            let Some(&current) = self.layer_of.get(&id) else {
                continue;
            };
            if current != layer {
                self.layers[current as usize].retain(|e| *e != id);
                self.layers[layer as usize].push(id);
                self.layer_of.insert(id, layer);
            }
        }
    }

    fn draw_layers(&self, entities: &EntityManager, graphics: &mut Graphics, camera: &Camera, debug: bool) {
        for (layer, bucket) in self.layers.iter().enumerate() {
            if camera.ignored_layers.contains(&(layer as u32)) {
                continue;
            }
            for &id in bucket {
                let Some(entity) = entities.get(id) else {
                    continue;
                };
                if !entity.active {
                    continue;
                }

                graphics.push_transform();
                graphics.apply_transform(&world_matrix(entities, id));
                for component in entity.renderables() {
                    if !component.active() {
                        continue;
                    }
                    if let Some(renderable) = component.renderable() {
                        if debug {
                            renderable.debug_render(graphics);
                        } else {
                            renderable.render(graphics);
                        }
                    }
                }
                graphics.pop_transform();
            }
        }
    }
}

impl Default for RenderSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RenderSystem {
    fn base(&self) -> &SystemBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut SystemBase {
        &mut self.base
    }

    fn entity_list_changed(&mut self, event: ListEvent, entity: &crate::ecs::Entity) {
        match event.change {
            ListChange::Added => {
                let layer = entity.layer();
                self.layer_of.insert(entity.id(), layer);
                self.layers[layer as usize].push(entity.id());
            }
            ListChange::Removed => {
                if let Some(layer) = self.layer_of.remove(&entity.id()) {
                    self.layers[layer as usize].retain(|id| *id != entity.id());
                }
            }
        }
    }

    fn render(&mut self, entities: &mut EntityManager, graphics: &mut Graphics, cameras: &mut [Camera]) {
        self.relocate_changed(entities);

        for camera in cameras.iter_mut().filter(|c| c.active) {
            camera.update_transform();
            graphics.push_target(camera.target());
            graphics.start_clear(camera.bg_color);
            graphics.push_transform();
            graphics.apply_transform(&camera.transform);
            self.draw_layers(entities, graphics, camera, false);
            graphics.pop_transform();
            graphics.present();
            graphics.pop_target();
        }
    }

    fn debug_render(&mut self, entities: &mut EntityManager, graphics: &mut Graphics, cameras: &mut [Camera]) {
        for camera in cameras.iter().filter(|c| c.active) {
            graphics.push_target(camera.target());
            graphics.start();
            graphics.push_transform();
            graphics.apply_transform(&camera.transform);
            self.draw_layers(entities, graphics, camera, true);
            graphics.pop_transform();
            graphics.present();
            graphics.pop_target();
        }
    }

    fn destroy(&mut self) {
        self.layers.clear();
        self.layer_of.clear();
    }
}
