//! Screen-space map label placement and occlusion engine.
//!
//! Given a viewport, the visible tiles with their pre-built label sets, the
//! user markers and a frame delta, [`LabelManager::update_label_set`]
//! decides which labels are drawn, in which fade state, and where — then
//! appends the surviving glyph quads to per-atlas dynamic meshes for an
//! external renderer to drain.

pub mod error;
pub mod geometry;
pub mod labels;
pub mod marker;
pub mod mesh;
pub mod style;
pub mod tile;
pub mod view;

pub use error::{Error, Result};
pub use labels::debug::{debug_flag, set_debug_flag, DebugFlag, Primitives};
pub use labels::{
    Anchor, Label, LabelEntry, LabelKind, LabelManager, LabelOptions, LabelSet, LabelState,
    PlacementSnapshot, Range, TextAttributes,
};
pub use marker::Marker;
pub use mesh::{DynamicQuadMesh, GlyphQuad, MeshSet, QuadVertex, TextVertex};
pub use style::{Style, StyleKind};
pub use tile::{Tile, TileCache, TileId};
pub use view::ViewState;
