pub mod draw;
pub mod material;
pub mod primitives;
pub mod vertex;

pub use draw::Drawable;
pub use material::{Material, MaterialFlags};
pub use vertex::Vertex;
