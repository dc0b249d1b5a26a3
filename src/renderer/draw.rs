use crate::asset::Mesh;
use crate::renderer::Material;
use crate::scene::Transform;

/// Description of a scene node before it is registered with the scene.
///
/// Builders return these; [`Scene::add`](crate::scene::Scene::add) turns
/// them into entities and moves the mesh and material into the asset store.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
    pub children: Vec<Drawable>,
}

impl Drawable {
    pub fn new(name: impl Into<String>, mesh: Mesh, material: Material) -> Self {
        Self {
            name: name.into(),
            mesh,
            material,
            transform: Transform::default(),
            visible: true,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Attach `child`; its transform becomes relative to this node.
    pub fn add(&mut self, child: Drawable) {
        self.children.push(child);
    }

    /// Number of nodes this drawable expands to, children included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Drawable::node_count).sum::<usize>()
    }
}
