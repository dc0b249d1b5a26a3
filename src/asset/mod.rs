pub mod cache;
pub mod handle;
pub mod mesh;

pub use cache::AssetCache;
pub use handle::Handle;
pub use mesh::{Mesh, Topology};

use crate::renderer::Material;

/// Geometry and materials referenced by scene nodes.
pub struct Assets {
    pub meshes: AssetCache<Mesh>,
    pub materials: AssetCache<Material>,
}

impl Assets {
    pub fn new() -> Self {
        Self {
            meshes: AssetCache::new(),
            materials: AssetCache::new(),
        }
    }
}

impl Assets {
    /// Vertex data held by all live meshes, in bytes.
    pub fn geometry_bytes(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.as_bytes().len()).sum()
    }

    /// Live materials that need the blended pass.
    pub fn translucent_materials(&self) -> usize {
        self.materials.iter().filter(|m| m.is_translucent()).count()
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::new()
    }
}
