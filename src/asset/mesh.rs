use crate::renderer::Vertex;

/// How the index list of a [`Mesh`] is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every pair of indices is one segment.
    LineList,
    /// Every triple of indices is one triangle.
    TriangleList,
}

/// CPU-side geometry, uploaded by the renderer on first draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    topology: Topology,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, topology: Topology) -> Self {
        Self {
            vertices,
            indices,
            topology,
        }
    }

    /// Polyline through `positions`, expanded into a segment list.
    pub fn line_strip(positions: &[[f32; 3]]) -> Self {
        let vertices = positions.iter().map(|&p| Vertex::at(p)).collect();
        let indices = (1..positions.len() as u32)
            .flat_map(|i| [i - 1, i])
            .collect();
        Self::new(vertices, indices, Topology::LineList)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Start/end positions of every segment in a line mesh.
    pub fn segments(&self) -> Vec<([f32; 3], [f32; 3])> {
        if self.topology != Topology::LineList {
            return Vec::new();
        }
        self.indices
            .chunks_exact(2)
            .map(|pair| {
                (
                    self.vertices[pair[0] as usize].pos,
                    self.vertices[pair[1] as usize].pos,
                )
            })
            .collect()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_strip_connects_consecutive_points() {
        let mesh = Mesh::line_strip(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]);
        assert_eq!(mesh.indices(), &[0, 1, 1, 2]);
        assert_eq!(mesh.segments().len(), 2);
    }

    #[test]
    fn single_point_strip_has_no_segments() {
        let mesh = Mesh::line_strip(&[[3.0, 3.0, 0.0]]);
        assert_eq!(mesh.index_count(), 0);
    }
}
