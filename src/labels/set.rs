//! Label sets: the styled meshes attached to tiles and markers.
//!
//! A set owns its labels, the pre-shaped glyph quads they reference, and the
//! per-atlas output meshes the engine appends vertices into each frame.

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::mesh::{GlyphQuad, MeshSet};

use super::label::Label;

/// Labels and glyph geometry built for one (tile, style) pair.
#[derive(Debug)]
pub struct LabelSet {
    labels: Vec<Rc<RefCell<Label>>>,
    quads: Vec<GlyphQuad>,
    meshes: RefCell<MeshSet>,
}

impl LabelSet {
    pub fn new(labels: Vec<Label>, quads: Vec<GlyphQuad>) -> Rc<Self> {
        Rc::new(Self {
            labels: labels.into_iter().map(|l| Rc::new(RefCell::new(l))).collect(),
            quads,
            meshes: RefCell::new(MeshSet::default()),
        })
    }

    pub fn labels(&self) -> &[Rc<RefCell<Label>>] {
        &self.labels
    }

    pub fn quads(&self) -> &[GlyphQuad] {
        &self.quads
    }

    /// Output meshes for the renderer to drain.
    pub fn meshes(&self) -> std::cell::Ref<'_, MeshSet> {
        self.meshes.borrow()
    }

    pub(crate) fn meshes_mut(&self) -> RefMut<'_, MeshSet> {
        self.meshes.borrow_mut()
    }

    /// Declare `parent` (an index into this set) as the parent of `child`.
    ///
    /// Parents must precede their children; a link that is out of bounds,
    /// self-referential or ordered the wrong way is silently ignored, which
    /// also makes parent cycles unrepresentable.
    pub fn link_parent(&self, child: usize, parent: usize) {
        if parent >= child || child >= self.labels.len() {
            return;
        }
        let weak = Rc::downgrade(&self.labels[parent]);
        self.labels[child].borrow_mut().set_parent(weak);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::transform::Range;
    use crate::labels::types::{LabelOptions, TextAttributes};
    use glam::Vec2;

    fn label(x: f32) -> Label {
        Label::point(
            Vec2::new(x, 0.0),
            Vec2::new(80.0, 20.0),
            LabelOptions::default(),
            TextAttributes::default(),
            x as u64,
            Range::default(),
        )
    }

    #[test]
    fn test_link_parent() {
        let set = LabelSet::new(vec![label(1.0), label(2.0)], Vec::new());
        set.link_parent(1, 0);
        assert!(set.labels()[1].borrow().parent().is_some());
        assert!(set.labels()[0].borrow().parent().is_none());
    }

    #[test]
    fn test_backwards_link_is_ignored() {
        let set = LabelSet::new(vec![label(1.0), label(2.0)], Vec::new());
        set.link_parent(0, 1);
        set.link_parent(0, 0);
        set.link_parent(5, 0);
        assert!(set.labels()[0].borrow().parent().is_none());
    }

    #[test]
    fn test_quads_are_shared() {
        let quads = vec![crate::mesh::GlyphQuad::from_rect(
            0,
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            [0, 0],
            [16, 16],
        )];
        let set = LabelSet::new(vec![label(1.0)], quads);
        assert_eq!(set.quads().len(), 1);
        assert!(set.meshes().quad_count() == 0);
    }
}
