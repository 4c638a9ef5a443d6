//! Style handles.
//!
//! The engine only needs a style's identity and whether it produces labels;
//! parsing and the draw-rule machinery live upstream.

/// Style discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    /// Text labels.
    Text,
    /// Point symbols (icons, shields).
    Point,
    /// Filled geometry; carries no labels.
    Polygon,
    /// Stroked geometry; carries no labels.
    Line,
}

/// Handle to a configured style.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    id: u32,
    kind: StyleKind,
}

impl Style {
    pub fn new(id: u32, kind: StyleKind) -> Self {
        Self { id, kind }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> StyleKind {
        self.kind
    }

    /// Whether meshes of this style are label sets.
    pub fn is_label_style(&self) -> bool {
        matches!(self.kind, StyleKind::Text | StyleKind::Point)
    }
}
