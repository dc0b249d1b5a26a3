// obstacles/pool.rs - grow-only pools of reusable scene nodes
use crate::renderer::Drawable;
use crate::scene::{NodeId, Scene};

/// A set of interchangeable nodes cloned from one prototype. Slots are
/// never removed while the pool lives; unused ones are hidden.
#[derive(Debug)]
pub struct PrimitivePool {
    prototype: Drawable,
    slots: Vec<NodeId>,
}

impl PrimitivePool {
    pub fn new(prototype: Drawable) -> Self {
        Self {
            prototype: prototype.hidden(),
            slots: Vec::new(),
        }
    }

    /// Node at `index`, creating hidden slots up to it when needed.
    pub fn get_or_create(&mut self, index: usize, scene: &mut Scene) -> NodeId {
        while self.slots.len() <= index {
            let node = scene.add(self.prototype.clone());
            log::trace!("{} pool grew to {}", self.prototype.name, self.slots.len() + 1);
            self.slots.push(node);
        }
        self.slots[index]
    }

    /// Hide every slot at or beyond `start`.
    pub fn hide_from(&self, start: usize, scene: &mut Scene) {
        for &node in self.slots.iter().skip(start) {
            scene.set_visible(node, false);
        }
    }

    pub fn hide_all(&self, scene: &mut Scene) {
        self.hide_from(0, scene);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[NodeId] {
        &self.slots
    }

    /// Number of slots currently shown.
    pub fn visible_count(&self, scene: &Scene) -> usize {
        self.slots
            .iter()
            .filter(|&&node| scene.is_visible(node).unwrap_or(false))
            .count()
    }

    /// Dispose every slot and empty the pool.
    pub fn dispose(&mut self, scene: &mut Scene) {
        for node in self.slots.drain(..) {
            scene.dispose(node);
        }
    }
}
