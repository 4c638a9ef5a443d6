//! User-placed marker handles.

use std::rc::Rc;

use glam::Mat4;

use crate::labels::LabelSet;

/// A user-placed marker with an optional label set.
#[derive(Debug)]
pub struct Marker {
    style_id: u32,
    mesh: Option<Rc<LabelSet>>,
    mvp: Mat4,
}

impl Marker {
    pub fn new(style_id: u32, mesh: Option<Rc<LabelSet>>, mvp: Mat4) -> Self {
        Self { style_id, mesh, mvp }
    }

    pub fn style_id(&self) -> u32 {
        self.style_id
    }

    pub fn mesh(&self) -> Option<&Rc<LabelSet>> {
        self.mesh.as_ref()
    }

    pub fn mvp(&self) -> &Mat4 {
        &self.mvp
    }
}
