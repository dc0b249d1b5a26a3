// scene/scene.rs - node registry shared by the map and obstacle layers
use super::builder::NodeBuilder;
use super::components::*;
use super::internal::{debug, hierarchy};
use crate::asset::{Assets, Mesh};
use crate::renderer::{Drawable, Material};
use crate::scene::Transform;
use hecs::World;

/// Opaque handle to a node registered with a [`Scene`].
pub type NodeId = hecs::Entity;

/// Running totals of node and resource lifecycle events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub nodes_added: u64,
    pub nodes_removed: u64,
    pub meshes_disposed: u64,
    pub materials_disposed: u64,
}

pub struct Scene {
    pub world: World,
    pub assets: Assets,
    stats: SceneStats,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            assets: Assets::default(),
            stats: SceneStats::default(),
        }
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// Number of live nodes, children included.
    pub fn node_count(&self) -> usize {
        self.world.len() as usize
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.world.contains(node)
    }

    /// Register `drawable` and its children. Returns the root node.
    pub fn add(&mut self, drawable: Drawable) -> NodeId {
        self.spawn_node(drawable, None)
    }

    fn spawn_node(&mut self, drawable: Drawable, parent: Option<NodeId>) -> NodeId {
        let Drawable {
            name,
            mesh,
            material,
            transform,
            visible,
            children,
        } = drawable;

        let mesh = self.assets.meshes.insert(mesh);
        let material = self.assets.materials.insert(material);

        let mut builder = NodeBuilder::new(&mut self.world)
            .with_name(name)
            .with_transform(transform)
            .with_mesh(mesh)
            .with_material(material)
            .visible(visible);
        if let Some(parent) = parent {
            builder = builder.with_parent(parent);
        }
        let entity = builder.spawn();
        self.stats.nodes_added += 1;

        if !children.is_empty() {
            let child_ids: Vec<NodeId> = children
                .into_iter()
                .map(|child| self.spawn_node(child, Some(entity)))
                .collect();
            if let Err(err) = self.world.insert_one(entity, Children(child_ids)) {
                log::error!("Failed to attach children to {:?}: {}", entity, err);
            }
        }

        entity
    }

    /// Detach `node` and its subtree from the scene without releasing their
    /// meshes or materials. Returns false if the node is not in the scene.
    pub fn remove(&mut self, node: NodeId) -> bool {
        self.despawn_subtree(node, false)
    }

    /// Detach `node` and its subtree and release their meshes and materials.
    /// Returns false, releasing nothing, if the node is already gone.
    pub fn dispose(&mut self, node: NodeId) -> bool {
        self.despawn_subtree(node, true)
    }

    fn despawn_subtree(&mut self, node: NodeId, release: bool) -> bool {
        if !self.world.contains(node) {
            log::warn!("Node {:?} is not in the scene; ignoring removal", node);
            return false;
        }

        if let Ok(parent) = self.world.get::<&Parent>(node).map(|p| p.0) {
            if let Ok(mut siblings) = self.world.get::<&mut Children>(parent) {
                siblings.0.retain(|&child| child != node);
            }
        }

        let mut stack = vec![node];
        while let Some(entity) = stack.pop() {
            if let Ok(children) = self.world.get::<&Children>(entity) {
                stack.extend(children.0.iter().copied());
            }

            if release {
                self.release_resources(entity);
            }

            if self.world.despawn(entity).is_ok() {
                self.stats.nodes_removed += 1;
            }
        }

        true
    }

    fn release_resources(&mut self, entity: NodeId) {
        if let Ok(mesh) = self.world.get::<&MeshComponent>(entity).map(|m| m.0) {
            if self.assets.meshes.remove(mesh).is_some() {
                self.stats.meshes_disposed += 1;
            }
        }
        if let Ok(material) = self.world.get::<&MaterialComponent>(entity).map(|m| m.0) {
            if self.assets.materials.remove(material).is_some() {
                self.stats.materials_disposed += 1;
            }
        }
    }

    pub fn is_visible(&self, node: NodeId) -> Option<bool> {
        self.world.get::<&Visible>(node).ok().map(|v| v.0)
    }

    pub fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Ok(mut v) = self.world.get::<&mut Visible>(node) {
            v.0 = visible;
        }
    }

    pub fn transform(&self, node: NodeId) -> Option<Transform> {
        self.world.get::<&TransformComponent>(node).ok().map(|t| t.0)
    }

    /// Mutate the local transform of `node` in place.
    pub fn update_transform(&mut self, node: NodeId, f: impl FnOnce(&mut Transform)) {
        if let Ok(mut t) = self.world.get::<&mut TransformComponent>(node) {
            f(&mut t.0);
        }
    }

    pub fn world_transform(&self, node: NodeId) -> Option<Transform> {
        self.world.get::<&WorldTransform>(node).ok().map(|t| t.0)
    }

    pub fn name(&self, node: NodeId) -> Option<String> {
        self.world.get::<&Name>(node).ok().map(|n| n.0.clone())
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.world
            .get::<&Children>(node)
            .map(|c| c.0.clone())
            .unwrap_or_default()
    }

    pub fn mesh(&self, node: NodeId) -> Option<&Mesh> {
        let handle = self.world.get::<&MeshComponent>(node).ok()?.0;
        self.assets.meshes.get(handle)
    }

    pub fn material(&self, node: NodeId) -> Option<&Material> {
        let handle = self.world.get::<&MaterialComponent>(node).ok()?.0;
        self.assets.materials.get(handle)
    }

    pub fn material_mut(&mut self, node: NodeId) -> Option<&mut Material> {
        let handle = self.world.get::<&MaterialComponent>(node).ok()?.0;
        self.assets.materials.get_mut(handle)
    }

    /// Nodes that would be drawn this frame, with inherited visibility.
    pub fn visible_nodes(&self) -> Vec<NodeId> {
        hierarchy::collect_visible(&self.world)
    }

    /// Recompute world transforms after local transforms changed.
    pub fn update(&mut self) {
        hierarchy::propagate_transforms(&mut self.world);
    }

    pub fn debug_print_nodes(&self) {
        debug::debug_print_nodes(&self.world);
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
    use crate::renderer::primitives::{box_outline, segments_from_points};
    use glam::Vec3;

    fn line() -> Drawable {
        segments_from_points(&[Vec3::ZERO, Vec3::X], 0xffffff, 1.0, 0.0)
    }

    #[test]
    fn add_registers_mesh_and_material() {
        let mut scene = Scene::new();
        let node = scene.add(line());
        assert!(scene.contains(node));
        assert_eq!(scene.assets.meshes.len(), 1);
        assert_eq!(scene.assets.materials.len(), 1);
        assert_eq!(scene.is_visible(node), Some(true));
    }

    #[test]
    fn remove_keeps_resources_dispose_releases_them() {
        let mut scene = Scene::new();
        let kept = scene.add(line());
        let disposed = scene.add(line());

        assert!(scene.remove(kept));
        assert_eq!(scene.assets.meshes.len(), 2);

        assert!(scene.dispose(disposed));
        assert_eq!(scene.assets.meshes.len(), 1);
        assert_eq!(scene.stats().meshes_disposed, 1);
        assert_eq!(scene.stats().materials_disposed, 1);
    }

    #[test]
    fn dispose_twice_is_a_no_op() {
        let mut scene = Scene::new();
        let node = scene.add(line());
        assert!(scene.dispose(node));
        assert!(!scene.dispose(node));
        assert_eq!(scene.stats().meshes_disposed, 1);
        assert_eq!(scene.stats().nodes_removed, 1);
    }

    #[test]
    fn dispose_releases_children() {
        let mut scene = Scene::new();
        let mut parent = line();
        parent.add(box_outline(Vec3::ONE, 0xff0000, 1.0));
        let root = scene.add(parent);
        let child = scene.children(root)[0];

        assert_eq!(scene.node_count(), 2);
        scene.dispose(root);
        assert!(!scene.contains(child));
        assert!(scene.assets.meshes.is_empty());
        assert!(scene.assets.materials.is_empty());
    }

    #[test]
    fn update_composes_child_world_transform() {
        let mut scene = Scene::new();
        let mut parent = line().with_transform(Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        parent.add(line().with_transform(Transform::from_translation(Vec3::new(0.0, 0.3, 0.0))));
        let root = scene.add(parent);
        let child = scene.children(root)[0];

        scene.update();
        let world = scene.world_transform(child).unwrap();
        assert!(world.translation.abs_diff_eq(Vec3::new(5.0, 0.3, 0.0), 1e-6));
    }

    #[test]
    fn hidden_parent_hides_children() {
        let mut scene = Scene::new();
        let mut parent = line();
        parent.add(line());
        let root = scene.add(parent);

        assert_eq!(scene.visible_nodes().len(), 2);
        scene.set_visible(root, false);
        assert!(scene.visible_nodes().is_empty());
    }

    #[test]
    fn material_is_mutable_in_place() {
        let mut scene = Scene::new();
        let node = scene.add(line());
        if let Some(material) = scene.material_mut(node) {
            material.set_color_hex(0x48dc6b);
        }
        assert_eq!(scene.material(node).map(|m| m.color_hex()), Some(0x48dc6b));
    }
}
