// scene/mod.rs

pub mod builder;
pub mod components;
mod internal;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use builder::NodeBuilder;
pub use scene::{NodeId, Scene, SceneStats};
pub use transform::Transform;

// Re-export all components
pub use components::{
    Children, MaterialComponent, MeshComponent, Name, Parent, TransformComponent, Visible,
    WorldTransform,
};
