//! Per-frame camera state handed to the engine.

use glam::Vec2;

/// Snapshot of the view for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewState {
    /// Viewport size in pixels.
    pub viewport: Vec2,
    /// Fractional map zoom level.
    pub zoom: f32,
}

impl ViewState {
    pub fn new(viewport: Vec2, zoom: f32) -> Self {
        Self { viewport, zoom }
    }
}
