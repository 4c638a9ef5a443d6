//! Dynamic text-mesh output.
//!
//! Glyph positions arrive pre-computed from the shaping stage as quantized
//! quads; the engine appends screen-space vertices to per-atlas dynamic
//! meshes which an external renderer drains every frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Fixed-point scale for quantized vertex positions.
pub const POSITION_SCALE: f32 = 4.0;
/// Inverse of [`POSITION_SCALE`].
pub const INV_POSITION_SCALE: f32 = 0.25;
/// Scale mapping alpha in `[0, 1]` to `u16`.
pub const ALPHA_SCALE: f32 = 65535.0;

/// One glyph corner as produced by shaping: label-local fixed-point position
/// and atlas texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadVertex {
    /// Label-local position, `POSITION_SCALE` fixed point.
    pub pos: [i16; 2],
    /// Atlas texture coordinates.
    pub uv: [u16; 2],
}

/// A pre-shaped glyph quad. Corners are ordered top-left, top-right,
/// bottom-left, bottom-right.
#[derive(Debug, Clone, Copy)]
pub struct GlyphQuad {
    /// Which font atlas page the glyph lives on.
    pub atlas: u16,
    pub corners: [QuadVertex; 4],
}

impl GlyphQuad {
    /// Build an axis-aligned quad from a label-local pixel rectangle.
    pub fn from_rect(atlas: u16, min: Vec2, max: Vec2, uv_min: [u16; 2], uv_max: [u16; 2]) -> Self {
        let q = |p: Vec2| (p * POSITION_SCALE).round();
        let (a, b) = (q(min), q(max));
        Self {
            atlas,
            corners: [
                QuadVertex { pos: [a.x as i16, a.y as i16], uv: [uv_min[0], uv_min[1]] },
                QuadVertex { pos: [b.x as i16, a.y as i16], uv: [uv_max[0], uv_min[1]] },
                QuadVertex { pos: [a.x as i16, b.y as i16], uv: [uv_min[0], uv_max[1]] },
                QuadVertex { pos: [b.x as i16, b.y as i16], uv: [uv_max[0], uv_max[1]] },
            ],
        }
    }
}

/// GPU-ready text vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct TextVertex {
    /// Screen position, `POSITION_SCALE` fixed point.
    pub pos: [i16; 2],
    pub uv: [u16; 2],
    /// Fill color, packed RGBA.
    pub fill: u32,
    /// Stroke color, packed RGBA.
    pub stroke: u32,
    /// Label alpha, `ALPHA_SCALE` fixed point.
    pub alpha: u16,
    /// Font scale, 1/64 units.
    pub font_scale: u16,
    /// Pick color, zero when the label is not interactive.
    pub selection_color: u32,
}

/// Append-only vertex stream for one font atlas page.
#[derive(Debug, Default)]
pub struct DynamicQuadMesh {
    vertices: Vec<TextVertex>,
}

impl DynamicQuadMesh {
    pub fn push_quad(&mut self, quad: [TextVertex; 4]) {
        self.vertices.extend_from_slice(&quad);
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[TextVertex] {
        &self.vertices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Per-atlas mesh collection, grown on demand.
#[derive(Debug, Default)]
pub struct MeshSet {
    meshes: Vec<DynamicQuadMesh>,
}

impl MeshSet {
    pub fn mesh_mut(&mut self, atlas: u16) -> &mut DynamicQuadMesh {
        let atlas = atlas as usize;
        if atlas >= self.meshes.len() {
            self.meshes.resize_with(atlas + 1, DynamicQuadMesh::default);
        }
        &mut self.meshes[atlas]
    }

    pub fn meshes(&self) -> &[DynamicQuadMesh] {
        &self.meshes
    }

    pub fn clear(&mut self) {
        for mesh in &mut self.meshes {
            mesh.clear();
        }
    }

    /// Total quads across all atlas pages.
    pub fn quad_count(&self) -> usize {
        self.meshes.iter().map(|m| m.quad_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_is_pod() {
        assert_eq!(std::mem::size_of::<TextVertex>(), 24);
        let v = TextVertex::zeroed();
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(bytes.len(), 24);
    }

    #[test]
    fn test_quad_from_rect() {
        let q = GlyphQuad::from_rect(0, Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0), [0, 0], [64, 32]);
        assert_eq!(q.corners[0].pos, [-40, -20]);
        assert_eq!(q.corners[3].pos, [40, 20]);
        assert_eq!(q.corners[1].uv, [64, 0]);
    }

    #[test]
    fn test_mesh_set_grows() {
        let mut set = MeshSet::default();
        set.mesh_mut(2).push_quad([TextVertex::zeroed(); 4]);
        assert_eq!(set.meshes().len(), 3);
        assert_eq!(set.quad_count(), 1);

        set.clear();
        assert_eq!(set.quad_count(), 0);
        assert_eq!(set.meshes().len(), 3);
    }
}
