use crate::color::Color;

/// Vertex format with position (physical pixels) and color
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(pos: [f32; 2], color: Color) -> Self {
        Self {
            pos,
            color: [color.r, color.g, color.b, color.a],
        }
    }
}

/// A mesh consisting of vertices and indices for triangle rendering
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_capacity: usize, index_capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(index_capacity),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a triangle fan around `center` over the closed `ring`
    pub(crate) fn push_fan(&mut self, center: [f32; 2], ring: &[[f32; 2]], color: Color) {
        if ring.len() < 2 {
            return;
        }

        let base = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(center, color));
        self.vertices
            .extend(ring.iter().map(|&pos| Vertex::new(pos, color)));

        let n = ring.len() as u32;
        for i in 0..n {
            self.indices.push(base);
            self.indices.push(base + 1 + i);
            self.indices.push(base + 1 + (i + 1) % n);
        }
    }
}
