//! Vertex types for the 2D shape batch.

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex with straight-alpha colour. Uploaded as a plain triangle list.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ShapeVertex {
    pub fn new(position: [f32; 2], color: [f32; 4]) -> Self {
        Self { position, color }
    }

    /// Byte stride of one vertex in a vertex buffer.
    pub const STRIDE: usize = std::mem::size_of::<ShapeVertex>();

    /// Byte offset of the colour attribute.
    pub const COLOR_OFFSET: usize = std::mem::size_of::<[f32; 2]>();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(ShapeVertex::STRIDE, 24);
        assert_eq!(ShapeVertex::COLOR_OFFSET, 8);
    }

    #[test]
    fn vertices_cast_to_bytes() {
        let verts = [ShapeVertex::new([1.0, 2.0], [0.0, 0.0, 0.0, 1.0]); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 72);
    }
}
