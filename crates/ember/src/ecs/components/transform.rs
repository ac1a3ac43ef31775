//! Position, rotation, scale, and parenting.

use crate::ecs::component::Component;
use crate::ecs::entity::EntityId;
use crate::ecs::entity_manager::EntityManager;
use crate::math::{Mat4, Vec2, mat4_from_2d, to_rad};

/// Where an entity sits in the world.
///
/// `parent` links to another entity by id; the world matrix is the parent
/// chain's matrices applied root-first. A dangling parent id simply ends the
/// chain. Entities without a `Transform` render at the origin.
pub struct Transform {
    pub position: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub scale: Vec2,
    pub parent: Option<EntityId>,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
            scale: Vec2::ONE,
            parent: None,
        }
    }

    pub fn from_xy(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            ..Self::new()
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32) -> Self {
        self.scale = Vec2::new(x, y);
        self
    }

    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Local model matrix.
    pub fn matrix(&self) -> Mat4 {
        mat4_from_2d(
            to_rad(self.rotation),
            self.position.x,
            self.position.y,
            self.scale.x,
            self.scale.y,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Transform {}

/// World matrix for an entity: walk the parent chain up to the root, then
/// apply the matrices back down. Entities without a transform get identity.
///
/// The chain is not cycle-checked; keep parent links acyclic.
pub fn world_matrix(entities: &EntityManager, id: EntityId) -> Mat4 {
    let mut chain = Vec::new();
    let mut current = Some(id);
    while let Some(id) = current {
        match entities.get(id).and_then(|e| e.component::<Transform>()) {
            Some(transform) => {
                chain.push(transform.matrix());
                current = transform.parent;
            }
            None => break,
        }
    }

    let mut world = Mat4::IDENTITY;
    for matrix in chain.iter().rev() {
        world = world * *matrix;
    }
    world
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::system_manager::SystemManager;
    use crate::math::Vec3;

    #[test]
    fn matrix_places_rotates_and_scales() {
        let transform = Transform::from_xy(10.0, 20.0).with_rotation(90.0).with_scale(2.0, 2.0);
        let point = transform.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((point.x - 10.0).abs() < 1e-5);
        assert!((point.y - 22.0).abs() < 1e-5);
    }

    #[test]
    fn world_matrix_walks_the_parent_chain_root_first() {
        let mut systems = SystemManager::new();
        let mut entities = EntityManager::new();

        let root = entities.add_with(&mut systems, |e| {
            e.add_component(Transform::from_xy(100.0, 0.0));
        });
        let middle = entities.add_with(&mut systems, |e| {
            e.add_component(Transform::from_xy(10.0, 0.0).with_parent(root));
        });
        let leaf = entities.add_with(&mut systems, |e| {
            e.add_component(Transform::from_xy(1.0, 0.0).with_parent(middle));
        });

        let point = world_matrix(&entities, leaf).transform_point3(Vec3::ZERO);
        assert!((point.x - 111.0).abs() < 1e-5);
    }

    #[test]
    fn parent_scale_and_rotation_affect_children() {
        let mut systems = SystemManager::new();
        let mut entities = EntityManager::new();

        let root = entities.add_with(&mut systems, |e| {
            e.add_component(Transform::new().with_rotation(90.0).with_scale(2.0, 2.0));
        });
        let child = entities.add_with(&mut systems, |e| {
            e.add_component(Transform::from_xy(5.0, 0.0).with_parent(root));
        });

        // Child offset is scaled then rotated onto the Y axis.
        let point = world_matrix(&entities, child).transform_point3(Vec3::ZERO);
        assert!(point.x.abs() < 1e-4);
        assert!((point.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn missing_transform_or_dangling_parent_ends_the_chain() {
        let mut systems = SystemManager::new();
        let mut entities = EntityManager::new();

        let bare = entities.add(&mut systems);
        assert_eq!(world_matrix(&entities, bare), Mat4::IDENTITY);

        let orphan = entities.add_with(&mut systems, |e| {
            e.add_component(Transform::from_xy(5.0, 0.0).with_parent(EntityId(999)));
        });
        let point = world_matrix(&entities, orphan).transform_point3(Vec3::ZERO);
        assert!((point.x - 5.0).abs() < 1e-5);
    }
}
