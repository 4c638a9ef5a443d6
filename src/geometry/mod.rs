//! Screen-space geometry kernel.
//!
//! Provides:
//! - `Aabb` axis-aligned rectangles with half-open overlap
//! - `Obb` oriented rectangles with a separating-axis intersection test
//! - world-to-screen projection with perspective clip detection

mod aabb;
mod obb;
mod projection;

pub use aabb::Aabb;
pub use obb::{intersect, Obb};
pub use projection::{rotate_by, world_to_screen};
