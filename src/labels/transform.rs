//! Shared per-frame arenas for label screen transforms.
//!
//! Every frame allocates one slice of the shared points buffer per label,
//! identified by a `Range`. Clearing the buffer between frames is O(1) and
//! storage is reused, so the hot path does not touch the allocator after
//! warm-up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle to a slice of a shared per-frame buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: usize,
    pub len: usize,
}

impl Range {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Shared buffer of screen-space points.
///
/// Point and line labels store two points (`position`, `rotation`); curved
/// labels store their sampled screen polyline.
#[derive(Debug, Default)]
pub struct TransformBuffer {
    points: Vec<Vec2>,
}

impl TransformBuffer {
    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Begin a new range at the current end of the buffer.
    pub fn begin(&self) -> Range {
        Range {
            start: self.points.len(),
            len: 0,
        }
    }

    /// Drop a just-written range again. Only valid for the most recent range.
    pub fn discard(&mut self, range: Range) {
        debug_assert_eq!(range.end(), self.points.len());
        self.points.truncate(range.start);
    }

    pub fn slice(&self, range: Range) -> &[Vec2] {
        &self.points[range.start..range.end()]
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Mutable writer for a label's slice during collection.
    pub fn writer<'a>(&'a mut self, range: &'a mut Range) -> ScreenTransform<'a> {
        ScreenTransform { buffer: self, range }
    }
}

/// Append-only view over a label's slice of the transform buffer.
pub struct ScreenTransform<'a> {
    buffer: &'a mut TransformBuffer,
    range: &'a mut Range,
}

impl ScreenTransform<'_> {
    /// Append a point. The range must be contiguous with the buffer end.
    pub fn push(&mut self, point: Vec2) {
        debug_assert_eq!(self.range.end(), self.buffer.points.len());
        self.buffer.points.push(point);
        self.range.len += 1;
    }

    pub fn len(&self) -> usize {
        self.range.len
    }

    pub fn is_empty(&self) -> bool {
        self.range.len == 0
    }

    /// Mutable view of the points written so far.
    pub fn as_mut_slice(&mut self) -> &mut [Vec2] {
        let end = self.range.end();
        &mut self.buffer.points[self.range.start..end]
    }
}

/// Accessor for the two-point transform of point and line labels.
#[derive(Debug, Clone, Copy)]
pub struct PointView<'a>(pub &'a [Vec2]);

impl PointView<'_> {
    pub fn position(&self) -> Vec2 {
        self.0[0]
    }

    pub fn rotation(&self) -> Vec2 {
        self.0[1]
    }
}
