//! World-to-screen projection for label geometry.

use glam::{Mat4, Vec2, Vec4};

/// Project a world position to y-down screen pixels.
///
/// Returns `None` when the point is behind or at the camera plane
/// (`w <= 1e-4` after the homogeneous transform). Viewport-bounds culling is
/// left to the caller, which knows whether the label participates in
/// collision and therefore how far past the screen edge it may live.
pub fn world_to_screen(mvp: &Mat4, world: Vec2, viewport: Vec2) -> Option<Vec2> {
    let clip = *mvp * Vec4::new(world.x, world.y, 0.0, 1.0);

    if clip.w <= 1e-4 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;

    let screen_x = (ndc_x + 1.0) * 0.5 * viewport.x;
    let screen_y = (1.0 - ndc_y) * 0.5 * viewport.y;

    Some(Vec2::new(screen_x, screen_y))
}

/// Rotate `v` by the unit complex number `rotation`.
#[inline]
pub fn rotate_by(v: Vec2, rotation: Vec2) -> Vec2 {
    Vec2::new(
        v.x * rotation.x - v.y * rotation.y,
        v.x * rotation.y + v.y * rotation.x,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_maps_to_center() {
        let viewport = Vec2::new(800.0, 600.0);
        let p = world_to_screen(&Mat4::IDENTITY, Vec2::ZERO, viewport).unwrap();
        assert!((p.x - 400.0).abs() < 1.0);
        assert!((p.y - 300.0).abs() < 1.0);
    }

    #[test]
    fn test_ndc_corner() {
        let viewport = Vec2::new(800.0, 600.0);
        let p = world_to_screen(&Mat4::IDENTITY, Vec2::new(-1.0, 1.0), viewport).unwrap();
        assert!(p.x.abs() < 1e-3);
        assert!(p.y.abs() < 1e-3);
    }

    #[test]
    fn test_behind_camera_is_clipped() {
        // Scale w to epsilon-positive: still clipped.
        let mut m = Mat4::IDENTITY;
        m.w_axis.w = 1e-5;
        assert!(world_to_screen(&m, Vec2::new(0.5, 0.5), Vec2::new(800.0, 600.0)).is_none());

        m.w_axis.w = -1.0;
        assert!(world_to_screen(&m, Vec2::new(0.5, 0.5), Vec2::new(800.0, 600.0)).is_none());
    }

    #[test]
    fn test_rotate_by() {
        let r = Vec2::new(0.0, 1.0); // 90 degrees
        let v = rotate_by(Vec2::new(1.0, 0.0), r);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
