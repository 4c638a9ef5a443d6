//! Process-wide debug flags and the debug-draw facade.
//!
//! Flags are a read-mostly atomic bit-set; the engine reads them once at the
//! top of each frame.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec2;

static DEBUG_FLAGS: AtomicU32 = AtomicU32::new(0);

/// Recognized debug switches. Anything else a host might carry is ignored
/// by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DebugFlag {
    /// Bypass dead-state culling during collection.
    DrawAllLabels = 1 << 0,
    /// Render the label debug overlay.
    LabelOverlay = 1 << 1,
}

pub fn set_debug_flag(flag: DebugFlag, enabled: bool) {
    if enabled {
        DEBUG_FLAGS.fetch_or(flag as u32, Ordering::Relaxed);
    } else {
        DEBUG_FLAGS.fetch_and(!(flag as u32), Ordering::Relaxed);
    }
}

pub fn debug_flag(flag: DebugFlag) -> bool {
    DEBUG_FLAGS.load(Ordering::Relaxed) & flag as u32 != 0
}

/// Immediate-mode primitive sink for the debug overlay. The host renderer
/// implements this; the engine only emits calls.
pub trait Primitives {
    fn set_color(&mut self, rgb: u32);
    fn draw_line(&mut self, a: Vec2, b: Vec2);
    fn draw_rect(&mut self, min: Vec2, max: Vec2);
    fn draw_poly(&mut self, points: &[Vec2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_toggle() {
        assert!(!debug_flag(DebugFlag::DrawAllLabels));
        set_debug_flag(DebugFlag::DrawAllLabels, true);
        assert!(debug_flag(DebugFlag::DrawAllLabels));
        assert!(!debug_flag(DebugFlag::LabelOverlay));
        set_debug_flag(DebugFlag::DrawAllLabels, false);
        assert!(!debug_flag(DebugFlag::DrawAllLabels));
    }
}
