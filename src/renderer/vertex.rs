use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable, Debug, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    /// Vertex on the ground plane, facing up (+Z in map space).
    pub fn at(pos: [f32; 3]) -> Self {
        Vertex {
            pos,
            normal: [0.0, 0.0, 1.0],
        }
    }
}
