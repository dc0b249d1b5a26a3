// scene/builder.rs
// Fluent helper used by Scene::add - uses pure hecs

use hecs::World;

use crate::asset::{Handle, Mesh};
use crate::renderer::Material;
use crate::scene::Transform;
use super::components::*;

/// Helper for building node entities with a fluent API
pub struct NodeBuilder<'w> {
    world: &'w mut World,
    builder: hecs::EntityBuilder,
}

impl<'w> NodeBuilder<'w> {
    pub fn new(world: &'w mut World) -> Self {
        Self {
            world,
            builder: hecs::EntityBuilder::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.builder.add(Name::new(name));
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.builder.add(TransformComponent(transform));
        self
    }

    pub fn with_mesh(mut self, mesh: Handle<Mesh>) -> Self {
        self.builder.add(MeshComponent(mesh));
        self
    }

    pub fn with_material(mut self, material: Handle<Material>) -> Self {
        self.builder.add(MaterialComponent(material));
        self
    }

    pub fn with_parent(mut self, parent: hecs::Entity) -> Self {
        self.builder.add(Parent(parent));
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.builder.add(Visible(visible));
        self
    }

    /// Spawn the entity into the world
    pub fn spawn(&mut self) -> hecs::Entity {
        self.world.spawn(self.builder.build())
    }
}
