//! Label types, options and shared constants.

use glam::Vec2;

/// Label shape discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Anchored at a single world position.
    Point,
    /// Anchored along a world segment.
    Line,
    /// Sampled along a world polyline.
    Curved,
    /// Diagnostic overlay text; never participates in occlusion.
    Debug,
}

/// Per-label lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelState {
    None,
    FadingIn,
    Visible,
    Sleep,
    FadingOut,
    Dead,
}

/// Discrete attachment position of a point label relative to its anchor
/// point, y-down screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Anchor {
    /// Unit-step direction of the anchor in y-down screen space: `Top` moves
    /// the label above its point.
    pub fn direction(&self) -> Vec2 {
        match self {
            Anchor::Center => Vec2::new(0.0, 0.0),
            Anchor::Top => Vec2::new(0.0, -1.0),
            Anchor::Bottom => Vec2::new(0.0, 1.0),
            Anchor::Left => Vec2::new(-1.0, 0.0),
            Anchor::Right => Vec2::new(1.0, 0.0),
            Anchor::TopLeft => Vec2::new(-1.0, -1.0),
            Anchor::TopRight => Vec2::new(1.0, -1.0),
            Anchor::BottomLeft => Vec2::new(-1.0, 1.0),
            Anchor::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// Placement options, typically produced by the style layer at tile build.
#[derive(Debug, Clone)]
pub struct LabelOptions {
    /// Occlusion precedence; lower values win.
    pub priority: u32,
    /// Anchor fallbacks, tried in declared order. Must not be empty.
    pub anchors: Vec<Anchor>,
    /// Screen offset applied after projection, rotated for line labels.
    pub offset: Vec2,
    /// Shrinks the collision box relative to the label dimensions.
    pub buffer: Vec2,
    /// Labels sharing a nonzero group are kept `repeat_distance` apart.
    pub repeat_group: u64,
    pub repeat_distance: f32,
    /// A required child drags its parent down when it cannot be placed.
    pub required: bool,
    /// Whether the label participates in the occlusion grid at all.
    pub collide: bool,
    pub interactive: bool,
    /// Nonzero color registers the label for pick lookups.
    pub selection_color: u32,
    /// Seconds for fade-in and fade-out.
    pub fade_time: f32,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            priority: 0,
            anchors: vec![Anchor::Center],
            offset: Vec2::ZERO,
            buffer: Vec2::ZERO,
            repeat_group: 0,
            repeat_distance: 0.0,
            required: false,
            collide: true,
            interactive: false,
            selection_color: 0,
            fade_time: DEFAULT_FADE_TIME,
        }
    }
}

impl LabelOptions {
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_anchors(mut self, anchors: Vec<Anchor>) -> Self {
        debug_assert!(!anchors.is_empty());
        self.anchors = anchors;
        self
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_repeat(mut self, group: u64, distance: f32) -> Self {
        self.repeat_group = group;
        self.repeat_distance = distance;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_collide(mut self, collide: bool) -> Self {
        self.collide = collide;
        self
    }

    pub fn with_selection_color(mut self, color: u32) -> Self {
        self.selection_color = color;
        self
    }
}

/// Per-label vertex attributes forwarded into the text mesh.
#[derive(Debug, Clone, Copy)]
pub struct TextAttributes {
    /// Fill color, packed RGBA.
    pub fill: u32,
    /// Stroke (halo) color, packed RGBA.
    pub stroke: u32,
    /// Font scale, 1/64 units.
    pub font_scale: u16,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            fill: 0xff00_0000,
            stroke: 0,
            font_scale: 64,
        }
    }
}

/// Pixels added to a collision box when the label was occluded last frame,
/// so a sleeping label only reactivates once it is clearly free again.
pub const ACTIVATION_DISTANCE: f32 = 2.0;

/// Seconds a label may stay asleep before it is culled for good.
pub const SLEEP_TTL: f32 = 5.0;

/// Default fade duration in seconds.
pub const DEFAULT_FADE_TIME: f32 = 0.2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_directions_are_screen_space() {
        // y-down: Top must move the label up.
        assert!(Anchor::Top.direction().y < 0.0);
        assert!(Anchor::Bottom.direction().y > 0.0);
        assert!(Anchor::Left.direction().x < 0.0);
    }

    #[test]
    fn test_default_options() {
        let opts = LabelOptions::default();
        assert_eq!(opts.anchors, vec![Anchor::Center]);
        assert!(opts.collide);
        assert_eq!(opts.repeat_group, 0);
    }
}
