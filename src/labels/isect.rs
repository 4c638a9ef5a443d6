//! Uniform-grid broad-phase intersection index.
//!
//! The viewport is split into fixed-size cells (one per 256-pixel block in
//! practice). Inserted boxes land in every overlapping cell; queries gather
//! the candidates of the overlapped cells, deduplicate them, and hand each
//! one to a visitor that can short-circuit the scan.

use glam::Vec2;

use crate::geometry::Aabb;

/// Grid-based broad phase over screen-space boxes carrying a payload index.
#[derive(Debug, Default)]
pub struct Isect2d {
    split: (usize, usize),
    cell_size: Vec2,
    items: Vec<(Aabb, usize)>,
    cells: Vec<Vec<u32>>,
    // query scratch, reused to keep queries allocation-free after warm-up
    seen: Vec<u32>,
}

impl Isect2d {
    /// Reconfigure the grid for a new viewport. Clears all content.
    pub fn resize(&mut self, split: (usize, usize), extent: Vec2) {
        let split = (split.0.max(1), split.1.max(1));
        self.split = split;
        self.cell_size = Vec2::new(extent.x / split.0 as f32, extent.y / split.1 as f32);
        self.cells.resize(split.0 * split.1, Vec::new());
        self.clear();
    }

    /// Empty all cells, keeping their storage.
    pub fn clear(&mut self) {
        self.items.clear();
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of boxes inserted since the last clear.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Insert a box with its payload into every overlapping cell. Boxes with
    /// an empty extent are skipped.
    pub fn insert(&mut self, aabb: Aabb, payload: usize) {
        if aabb.is_empty() || self.cells.is_empty() {
            return;
        }

        let item = self.items.len() as u32;
        self.items.push((aabb, payload));

        let (c0, c1, r0, r1) = self.cell_span(&aabb);
        for row in r0..r1 {
            for col in c0..c1 {
                self.cells[row * self.split.0 + col].push(item);
            }
        }
    }

    /// Visit every unique inserted box whose extent overlaps `query`.
    ///
    /// The visitor receives the payload and returns `false` to stop the scan.
    /// Each candidate is visited at most once per query even when it spans
    /// several cells.
    pub fn intersect<F>(&mut self, query: &Aabb, mut visit: F)
    where
        F: FnMut(usize) -> bool,
    {
        if query.is_empty() || self.cells.is_empty() {
            return;
        }

        self.seen.clear();

        let (c0, c1, r0, r1) = self.cell_span(query);
        for row in r0..r1 {
            for col in c0..c1 {
                for &item in &self.cells[row * self.split.0 + col] {
                    if self.seen.contains(&item) {
                        continue;
                    }
                    self.seen.push(item);

                    let (aabb, payload) = self.items[item as usize];
                    if query.intersects(&aabb) && !visit(payload) {
                        return;
                    }
                }
            }
        }
    }

    /// Cells overlapped by a box, clamped to the grid: `(col0, col1, row0, row1)`.
    fn cell_span(&self, aabb: &Aabb) -> (usize, usize, usize, usize) {
        let c0 = (aabb.min.x / self.cell_size.x).floor().max(0.0) as usize;
        let r0 = (aabb.min.y / self.cell_size.y).floor().max(0.0) as usize;
        let c1 = (aabb.max.x / self.cell_size.x).ceil().max(0.0) as usize;
        let r1 = (aabb.max.y / self.cell_size.y).ceil().max(0.0) as usize;

        (
            c0.min(self.split.0.saturating_sub(1)),
            c1.min(self.split.0),
            r0.min(self.split.1.saturating_sub(1)),
            r1.min(self.split.1),
        )
    }
}
