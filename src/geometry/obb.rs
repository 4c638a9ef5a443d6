//! Oriented bounding boxes for rotated label quads.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::Aabb;

/// Oriented bounding box: a rectangle rotated by a unit axis, y-down screen
/// coordinates. The corner quad is precomputed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obb {
    centroid: Vec2,
    axis: Vec2,
    half: Vec2,
    quad: [Vec2; 4],
}

impl Obb {
    /// Build an OBB from its center, a unit axis along the width direction,
    /// and half extents. The axis must be unit length.
    pub fn new(centroid: Vec2, axis: Vec2, half: Vec2) -> Self {
        debug_assert!((axis.length_squared() - 1.0).abs() < 1e-3);

        let perp = Vec2::new(-axis.y, axis.x);
        let x = axis * half.x;
        let y = perp * half.y;

        // CCW in y-down screen space.
        let quad = [
            centroid - x - y,
            centroid + x - y,
            centroid + x + y,
            centroid - x + y,
        ];

        Self {
            centroid,
            axis,
            half,
            quad,
        }
    }

    pub fn centroid(&self) -> Vec2 {
        self.centroid
    }

    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    pub fn quad(&self) -> &[Vec2; 4] {
        &self.quad
    }

    /// Axis-aligned bounding of the rotated quad.
    pub fn extent(&self) -> Aabb {
        let mut min = self.quad[0];
        let mut max = self.quad[0];
        for p in &self.quad[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Aabb::new(min, max)
    }

    fn project_interval(&self, axis: Vec2) -> (f32, f32) {
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for p in &self.quad {
            let d = p.dot(axis);
            lo = lo.min(d);
            hi = hi.max(d);
        }
        (lo, hi)
    }
}

/// OBB-OBB intersection via the separating-axis test over the four unique
/// edge normals (two per box).
pub fn intersect(a: &Obb, b: &Obb) -> bool {
    let axes = [
        a.axis,
        Vec2::new(-a.axis.y, a.axis.x),
        b.axis,
        Vec2::new(-b.axis.y, b.axis.x),
    ];

    for axis in axes {
        let (a_lo, a_hi) = a.project_interval(axis);
        let (b_lo, b_hi) = b.project_interval(axis);
        if a_hi < b_lo || b_hi < a_lo {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_aligned_overlap() {
        let a = Obb::new(Vec2::new(0.0, 0.0), Vec2::X, Vec2::new(10.0, 5.0));
        let b = Obb::new(Vec2::new(15.0, 0.0), Vec2::X, Vec2::new(10.0, 5.0));
        assert!(intersect(&a, &b));

        let c = Obb::new(Vec2::new(25.0, 0.0), Vec2::X, Vec2::new(4.0, 4.0));
        assert!(!intersect(&a, &c));
    }

    #[test]
    fn test_rotated_separation() {
        // Two thin boxes at 45 degrees that share an extent but do not touch.
        let d = std::f32::consts::FRAC_1_SQRT_2;
        let a = Obb::new(Vec2::new(0.0, 0.0), Vec2::new(d, d), Vec2::new(10.0, 1.0));
        let b = Obb::new(Vec2::new(10.0, 0.0), Vec2::new(d, d), Vec2::new(10.0, 1.0));
        assert!(a.extent().intersects(&b.extent()));
        assert!(!intersect(&a, &b));
    }

    #[test]
    fn test_extent_covers_quad() {
        let d = std::f32::consts::FRAC_1_SQRT_2;
        let a = Obb::new(Vec2::new(5.0, 5.0), Vec2::new(d, d), Vec2::new(4.0, 2.0));
        let extent = a.extent();
        for p in a.quad() {
            assert!(p.x >= extent.min.x - 1e-4 && p.x <= extent.max.x + 1e-4);
            assert!(p.y >= extent.min.y - 1e-4 && p.y <= extent.max.y + 1e-4);
        }
    }

    #[test]
    fn test_contained_box_intersects() {
        let outer = Obb::new(Vec2::new(0.0, 0.0), Vec2::X, Vec2::new(20.0, 20.0));
        let inner = Obb::new(Vec2::new(1.0, 1.0), Vec2::Y, Vec2::new(2.0, 2.0));
        assert!(intersect(&outer, &inner));
    }
}
