//! Label placement and occlusion engine.
//!
//! Provides:
//! - `LabelManager` driving the per-frame placement pipeline
//! - label lifecycle state machines with fade hysteresis
//! - uniform-grid broad phase feeding OBB narrow-phase occlusion
//! - multi-anchor fallback search and repeat-group suppression
//! - zoom-transition continuity via proxy tiles
//!
//! Each frame `update_label_set` collects labels from the visible tiles and
//! markers, sorts them into a strict placement order, resolves occlusions,
//! advances fades, and appends vertices for the surviving labels.

pub mod curved;
pub mod debug;
mod isect;
mod label;
mod set;
mod snapshot;
mod transform;
mod types;

pub use isect::Isect2d;
pub use label::Label;
pub use set::LabelSet;
pub use snapshot::{EntrySnapshot, PlacementSnapshot};
pub use transform::{PointView, Range, ScreenTransform, TransformBuffer};
pub use types::{
    Anchor, LabelKind, LabelOptions, LabelState, TextAttributes, ACTIVATION_DISTANCE,
    DEFAULT_FADE_TIME, SLEEP_TTL,
};

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{Mat4, Vec2};

use crate::geometry::{intersect, Aabb, Obb};
use crate::marker::Marker;
use crate::style::Style;
use crate::tile::{Tile, TileCache, TileId};
use crate::view::ViewState;

use debug::{debug_flag, DebugFlag, Primitives};

/// Pixels the collection bounds extend past the viewport, and the size of a
/// broad-phase grid cell.
const GRID_CELL_SIZE: f32 = 256.0;

/// Per-frame record of a collidable label.
#[derive(Debug)]
pub struct LabelEntry {
    label: Rc<RefCell<Label>>,
    set: Rc<LabelSet>,
    tile: Option<Rc<Tile>>,
    proxy: bool,
    priority: u32,
    transform: Range,
    obbs: Range,
}

impl LabelEntry {
    pub fn label(&self) -> &Rc<RefCell<Label>> {
        &self.label
    }

    pub fn tile(&self) -> Option<&Rc<Tile>> {
        self.tile.as_ref()
    }

    pub fn is_proxy(&self) -> bool {
        self.proxy
    }

    pub fn priority(&self) -> u32 {
        self.priority
    }

    pub fn transform_range(&self) -> Range {
        self.transform
    }

    pub fn obbs_range(&self) -> Range {
        self.obbs
    }
}

#[derive(Debug)]
struct SelectionEntry {
    label: Rc<RefCell<Label>>,
    tile: Option<Rc<Tile>>,
}

/// The placement engine. Owns the per-frame arenas, the broad-phase grid and
/// the sorted entry list; labels stay owned by their tile's `LabelSet`.
#[derive(Default)]
pub struct LabelManager {
    labels: Vec<LabelEntry>,
    selection: Vec<SelectionEntry>,
    transforms: TransformBuffer,
    obbs: Vec<Obb>,
    isect: Isect2d,
    repeat_groups: HashMap<u64, Vec<Vec2>>,
    need_update: bool,
    last_zoom: f32,
}

impl LabelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any fade animation is still running, so the host knows to
    /// keep scheduling frames.
    pub fn needs_update(&self) -> bool {
        self.need_update
    }

    /// Entries collected for the current frame, in placement order.
    pub fn entries(&self) -> &[LabelEntry] {
        &self.labels
    }

    /// The shared OBB arena for the current frame.
    pub fn obb_buffer(&self) -> &[Obb] {
        &self.obbs
    }

    /// The shared screen-transform arena for the current frame.
    pub fn screen_transforms(&self) -> &[Vec2] {
        self.transforms.points()
    }

    /// Run the full placement pipeline for a new frame.
    pub fn update_label_set(
        &mut self,
        view: &ViewState,
        dt: f32,
        styles: &[Style],
        tiles: &[Rc<Tile>],
        markers: &[Marker],
        cache: &dyn TileCache,
    ) {
        self.transforms.clear();
        self.obbs.clear();

        self.collect(view, dt, styles, tiles, markers, false);

        self.sort_labels();

        if self.last_zoom.floor() != view.zoom.floor() {
            self.skip_transitions(styles, tiles, cache, view.zoom);
            self.last_zoom = view.zoom;
        }

        let split = (
            (view.viewport.x / GRID_CELL_SIZE) as usize,
            (view.viewport.y / GRID_CELL_SIZE) as usize,
        );
        self.isect.resize(split, view.viewport);

        self.handle_occlusions();

        log::trace!(
            "inserted {} boxes for {} collidable labels",
            self.isect.len(),
            self.labels.len()
        );

        // Advance fades and emit vertices for labels still visible.
        let screen = Aabb::from_size(view.viewport);
        for entry in &self.labels {
            let mut label = entry.label.borrow_mut();
            self.need_update |= label.eval_state(dt);

            if !label.visible_state() {
                continue;
            }

            if !entry.obbs.is_empty() {
                let on_screen = self.obbs[entry.obbs.start..entry.obbs.end()]
                    .iter()
                    .any(|obb| obb.extent().intersects(&screen));
                if !on_screen {
                    continue;
                }
            }

            label.add_vertices_to_mesh(
                self.transforms.slice(entry.transform),
                view.viewport,
                entry.set.quads(),
                &mut entry.set.meshes_mut(),
            );
        }
    }

    /// Cheap per-frame path while the view is unchanged: keep running fades
    /// without re-resolving placement.
    pub fn update_transitions(
        &mut self,
        view: &ViewState,
        dt: f32,
        styles: &[Style],
        tiles: &[Rc<Tile>],
        markers: &[Marker],
    ) {
        self.collect(view, dt, styles, tiles, markers, true);
    }

    /// Look up a label by its pick color among this frame's visible labels.
    pub fn get_label(&self, selection_color: u32) -> Option<(Rc<RefCell<Label>>, Option<Rc<Tile>>)> {
        self.selection
            .iter()
            .find(|entry| {
                let label = entry.label.borrow();
                label.visible_state() && label.selection_color() == selection_color
            })
            .map(|entry| (Rc::clone(&entry.label), entry.tile.clone()))
    }

    // --- collection ------------------------------------------------------

    fn collect(
        &mut self,
        view: &ViewState,
        dt: f32,
        styles: &[Style],
        tiles: &[Rc<Tile>],
        markers: &[Marker],
        only_transitions: bool,
    ) {
        if !only_transitions {
            self.labels.clear();
        }
        self.selection.clear();
        self.need_update = false;

        let draw_all = debug_flag(DebugFlag::DrawAllLabels);

        for tile in tiles {
            let proxy = tile.is_proxy();
            for style in styles {
                if let Some(mesh) = tile.mesh(style.id()) {
                    let set = Rc::clone(mesh);
                    self.process_label_update(
                        view,
                        dt,
                        &set,
                        Some(tile),
                        tile.mvp(),
                        draw_all,
                        only_transitions,
                        proxy,
                    );
                }
            }
        }

        for marker in markers {
            for style in styles {
                if marker.style_id() != style.id() {
                    continue;
                }
                let Some(mesh) = marker.mesh() else { continue };
                let set = Rc::clone(mesh);
                self.process_label_update(
                    view,
                    dt,
                    &set,
                    None,
                    marker.mvp(),
                    draw_all,
                    only_transitions,
                    false,
                );
            }
        }
    }

    fn process_label_update(
        &mut self,
        view: &ViewState,
        dt: f32,
        set: &Rc<LabelSet>,
        tile: Option<&Rc<Tile>>,
        mvp: &Mat4,
        draw_all: bool,
        only_transitions: bool,
        proxy: bool,
    ) {
        set.meshes_mut().clear();

        let screen_bounds = Aabb::from_size(view.viewport);
        let extended_bounds = screen_bounds.inflated(GRID_CELL_SIZE);

        for label_rc in set.labels() {
            let mut label = label_rc.borrow_mut();

            if !draw_all && label.state() == LabelState::Dead {
                continue;
            }

            let mut range = self.transforms.begin();

            // Collidable labels are kept while near the viewport so that
            // off-screen boxes still suppress on-screen neighbors.
            let bounds = if label.can_occlude() && !only_transitions {
                &extended_bounds
            } else {
                &screen_bounds
            };

            if !label.update(mvp, view, bounds, &mut self.transforms.writer(&mut range)) {
                self.transforms.discard(range);
                continue;
            }

            if only_transitions {
                if label.occluded_last_frame() {
                    label.occlude(true);
                }
                if label.visible_state() || !label.can_occlude() {
                    self.need_update |= label.eval_state(dt);
                    label.add_vertices_to_mesh(
                        self.transforms.slice(range),
                        view.viewport,
                        set.quads(),
                        &mut set.meshes_mut(),
                    );
                }
            } else if label.can_occlude() {
                self.labels.push(LabelEntry {
                    label: Rc::clone(label_rc),
                    set: Rc::clone(set),
                    tile: tile.cloned(),
                    proxy,
                    priority: label.options().priority,
                    transform: range,
                    obbs: Range::default(),
                });
            } else {
                self.need_update |= label.eval_state(dt);
                label.add_vertices_to_mesh(
                    self.transforms.slice(range),
                    view.viewport,
                    set.quads(),
                    &mut set.meshes_mut(),
                );
            }

            if label.selection_color() != 0 {
                self.selection.push(SelectionEntry {
                    label: Rc::clone(label_rc),
                    tile: tile.cloned(),
                });
            }
        }
    }

    // --- ordering --------------------------------------------------------

    fn sort_labels(&mut self) {
        // Stable sort keeps the relative ordering of markers.
        self.labels.sort_by(compare_entries);
    }

    // --- zoom transitions ------------------------------------------------

    fn skip_transitions(
        &self,
        styles: &[Style],
        tiles: &[Rc<Tile>],
        cache: &dyn TileCache,
        current_zoom: f32,
    ) {
        let label_styles: Vec<&Style> = styles.iter().filter(|s| s.is_label_style()).collect();

        for tile in tiles {
            if self.last_zoom < current_zoom {
                // Zooming in: bridge from the one covering parent tile.
                if let Some(parent) = tile.id().parent() {
                    if let Some(proxy) = find_proxy(tile.source_id(), parent, tiles, cache) {
                        skip_transitions_pair(&label_styles, tile, &proxy);
                    }
                }
            } else {
                // Zooming out: bridge from the four covered child tiles.
                for i in 0..4 {
                    let child = tile.id().child(i);
                    if let Some(proxy) = find_proxy(tile.source_id(), child, tiles, cache) {
                        skip_transitions_pair(&label_styles, tile, &proxy);
                    }
                }
            }
        }
    }

    // --- occlusion pass ---------------------------------------------------

    fn handle_occlusions(&mut self) {
        self.isect.clear();
        self.repeat_groups.clear();

        for i in 0..self.labels.len() {
            let label_rc = Rc::clone(&self.labels[i].label);
            let transform_range = self.labels[i].transform;
            let mut label = label_rc.borrow_mut();

            // The parent was processed earlier; its occlusion and anchor are
            // settled for this frame.
            if let Some(parent) = label.parent() {
                if parent.borrow().is_occluded() {
                    label.occlude(true);
                    drop(label);
                    // Keep range starts monotonic for find_label.
                    self.labels[i].obbs = Range {
                        start: self.obbs.len(),
                        len: 0,
                    };
                    continue;
                }
            }

            let mut obbs_range = Range::default();
            label.obbs(
                self.transforms.slice(transform_range),
                &mut self.obbs,
                &mut obbs_range,
                true,
            );

            let repeat_distance = label.options().repeat_distance;
            let repeat_group = label.options().repeat_group;

            if repeat_distance > 0.0
                && self.within_repeat_distance(repeat_group, repeat_distance, label.screen_center())
            {
                label.occlude(true);
            }

            let parent = label.parent();
            let first_anchor = label.anchor_index();

            loop {
                if label.is_occluded() {
                    // Refresh boxes for the anchor under test.
                    label.obbs(
                        self.transforms.slice(transform_range),
                        &mut self.obbs,
                        &mut obbs_range,
                        false,
                    );
                    if first_anchor == label.anchor_index() {
                        break;
                    }
                }

                label.occlude(false);

                for obb_index in obbs_range.start..obbs_range.end() {
                    let query = self.obbs[obb_index].extent();

                    let obbs = &self.obbs;
                    let settled = &self.labels[..i];
                    let mut hit = false;

                    self.isect.intersect(&query, |candidate| {
                        if !intersect(&obbs[obb_index], &obbs[candidate]) {
                            return true;
                        }
                        // Overlap with the own parent does not occlude.
                        if let Some(parent) = &parent {
                            if let Some(owner) = find_label(settled, candidate) {
                                if Rc::ptr_eq(owner.label(), parent) {
                                    return true;
                                }
                            }
                        }
                        hit = true;
                        false
                    });

                    if hit {
                        label.occlude(true);
                        break;
                    }
                }

                if !(label.is_occluded() && label.next_anchor()) {
                    break;
                }
            }

            if label.is_occluded() {
                // A failed required child drags its parent down with it.
                if let Some(parent) = &parent {
                    if label.options().required {
                        parent.borrow_mut().occlude(true);
                    }
                }
            } else {
                for obb_index in obbs_range.start..obbs_range.end() {
                    let extent = self.obbs[obb_index].extent();
                    self.isect.insert(extent, obb_index);
                }
                if repeat_distance > 0.0 {
                    self.repeat_groups
                        .entry(repeat_group)
                        .or_default()
                        .push(label.screen_center());
                }
            }

            drop(label);
            self.labels[i].obbs = obbs_range;
        }
    }

    fn within_repeat_distance(&self, group: u64, distance: f32, center: Vec2) -> bool {
        let threshold = distance * distance;
        self.repeat_groups
            .get(&group)
            .map(|placed| {
                placed
                    .iter()
                    .any(|other| center.distance_squared(*other) < threshold)
            })
            .unwrap_or(false)
    }

    // --- diagnostics -----------------------------------------------------

    /// Capture the frame's arenas and entry ranges.
    pub fn snapshot(&self) -> PlacementSnapshot {
        PlacementSnapshot {
            transforms: self.transforms.points().to_vec(),
            obbs: self.obbs.clone(),
            entries: self
                .labels
                .iter()
                .map(|entry| EntrySnapshot {
                    transform: entry.transform,
                    obbs: entry.obbs,
                })
                .collect(),
        }
    }

    /// Emit the label debug overlay when the `LabelOverlay` flag is set.
    pub fn draw_debug(&self, primitives: &mut dyn Primitives, view: &ViewState) {
        if !debug_flag(DebugFlag::LabelOverlay) {
            return;
        }

        for entry in &self.labels {
            let label = entry.label.borrow();
            if label.kind() == LabelKind::Debug {
                continue;
            }

            primitives.set_color(match label.state() {
                LabelState::Sleep => 0xffffff,
                LabelState::Visible => 0x000000,
                LabelState::None => 0x0000ff,
                LabelState::Dead => 0xff00ff,
                LabelState::FadingIn => 0xffff00,
                LabelState::FadingOut => 0xff0000,
            });

            for obb_index in entry.obbs.start..entry.obbs.end() {
                primitives.draw_poly(self.obbs[obb_index].quad());
            }

            let center = label.screen_center();

            if let Some(parent) = label.parent() {
                primitives.set_color(0xff0000);
                primitives.draw_line(center, parent.borrow().screen_center());
            }

            if label.kind() == LabelKind::Curved {
                let points = self.transforms.slice(entry.transform);
                for (i, pair) in points.windows(2).enumerate() {
                    primitives.set_color(if i % 2 == 0 { 0xff0000 } else { 0x0000ff });
                    primitives.draw_line(pair[0], pair[1]);
                }
            }

            let mut offset = label.options().offset;
            if let Some(parent) = label.parent() {
                offset += parent.borrow().options().offset;
            }
            primitives.set_color(0x000000);
            primitives.draw_line(center, center - Vec2::new(offset.x, -offset.y));
        }

        // Broad-phase grid overlay.
        let cols = ((view.viewport.x / GRID_CELL_SIZE) as usize).max(1);
        let rows = ((view.viewport.y / GRID_CELL_SIZE) as usize).max(1);
        let cell = Vec2::new(
            view.viewport.x / cols as f32,
            view.viewport.y / rows as f32,
        );

        primitives.set_color(0x7ef586);
        for row in 0..rows {
            for col in 0..cols {
                let min = Vec2::new(col as f32 * cell.x, row as f32 * cell.y);
                primitives.draw_rect(min, min + cell);
            }
        }
    }
}

/// Resolve the entry owning an OBB arena index among the entries processed
/// so far. Correct because ranges are assigned in processing order and the
/// entry list is not reordered after the sort.
fn find_label(settled: &[LabelEntry], obb_index: usize) -> Option<&LabelEntry> {
    let upper = settled.partition_point(|entry| entry.obbs.start <= obb_index);
    let entry = settled[..upper].last()?;
    (obb_index < entry.obbs.end()).then_some(entry)
}

fn find_proxy(
    source_id: u32,
    id: TileId,
    tiles: &[Rc<Tile>],
    cache: &dyn TileCache,
) -> Option<Rc<Tile>> {
    if let Some(tile) = cache.get(source_id, id) {
        return Some(tile);
    }
    tiles
        .iter()
        .find(|tile| tile.id() == id && tile.source_id() == source_id)
        .cloned()
}

/// Mark brand-new labels whose proxy-tile counterpart is already visible
/// nearby, so they appear without a fade.
fn skip_transitions_pair(styles: &[&Style], tile: &Rc<Tile>, proxy: &Rc<Tile>) {
    for style in styles {
        let (Some(current), Some(cached)) = (tile.mesh(style.id()), proxy.mesh(style.id())) else {
            continue;
        };

        for current_label in current.labels() {
            let mut l0 = current_label.borrow_mut();
            if !l0.can_occlude() || l0.state() != LabelState::None {
                continue;
            }

            for proxy_label in cached.labels() {
                let l1 = proxy_label.borrow();
                if !l1.visible_state() || !l1.can_occlude() {
                    continue;
                }
                // The repeat group also matches labels with dynamic style
                // properties.
                if l0.options().repeat_group != l1.options().repeat_group {
                    continue;
                }

                let distance = l0.screen_center().distance(l1.screen_center());
                if distance < l0.dimension().x.max(l0.dimension().y) {
                    l0.skip_transitions();
                }
            }
        }
    }
}

/// Total placement order: the first rules favor labels that should keep
/// their slot, the tail provides deterministic tie-breaking.
fn compare_entries(a: &LabelEntry, b: &LabelEntry) -> Ordering {
    if a.proxy != b.proxy {
        return if b.proxy { Ordering::Less } else { Ordering::Greater };
    }

    match a.priority.cmp(&b.priority) {
        Ordering::Equal => {}
        other => return other,
    }

    match (a.tile.is_some(), b.tile.is_some()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    if let (Some(ta), Some(tb)) = (&a.tile, &b.tile) {
        // Deeper tiles are more specific.
        match tb.id().z.cmp(&ta.id().z) {
            Ordering::Equal => {}
            other => return other,
        }
    }

    let la = a.label.borrow();
    let lb = b.label.borrow();

    // Placement history: labels that held a slot last frame keep it. This is
    // intentionally navigation-dependent.
    if la.occluded_last_frame() != lb.occluded_last_frame() {
        return if lb.occluded_last_frame() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    // Prefer labels already on screen; important for repeat groups.
    if la.visible_state() != lb.visible_state() {
        return if la.visible_state() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    if la.kind() == LabelKind::Line && lb.kind() == LabelKind::Line {
        // The longer segment has the better chance to fit.
        if let Some(order) = lb
            .world_line_length_sq()
            .partial_cmp(&la.world_line_length_sq())
        {
            match order {
                Ordering::Equal => {}
                other => return other,
            }
        }
    }

    match la.hash().cmp(&lb.hash()) {
        Ordering::Equal => {}
        other => return other,
    }

    if la.kind() == LabelKind::Curved && lb.kind() == LabelKind::Curved {
        if let Some(order) = lb.candidate_priority().partial_cmp(&la.candidate_priority()) {
            match order {
                Ordering::Equal => {}
                other => return other,
            }
        }
    }

    (Rc::as_ptr(&a.label) as usize).cmp(&(Rc::as_ptr(&b.label) as usize))
}
