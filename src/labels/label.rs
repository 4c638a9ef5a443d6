//! Label lifecycle and per-variant screen placement.
//!
//! A label is a tagged union over point, line, curved and debug shapes with
//! the shared lifecycle state inline. Per frame it is asked to project itself
//! (`update`), to publish collision boxes (`obbs`) and, once placement is
//! settled, to append its glyph quads to the output mesh
//! (`add_vertices_to_mesh`). `eval_state` advances the fade state machine.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glam::{Mat4, Vec2};

use crate::geometry::{rotate_by, world_to_screen, Aabb, Obb};
use crate::mesh::{
    GlyphQuad, MeshSet, QuadVertex, TextVertex, ALPHA_SCALE, INV_POSITION_SCALE, POSITION_SCALE,
};
use crate::view::ViewState;

use super::curved::{candidate_priority, LineSampler};
use super::transform::{PointView, Range, ScreenTransform};
use super::types::{
    Anchor, LabelKind, LabelOptions, LabelState, TextAttributes, ACTIVATION_DISTANCE, SLEEP_TTL,
};

/// World-space geometry of a label, one variant per [`LabelKind`].
#[derive(Debug, Clone)]
enum Geometry {
    Point(Vec2),
    Line(Vec2, Vec2),
    Curved { polyline: Vec<Vec2>, rank: f32 },
}

/// A placeable map label.
#[derive(Debug)]
pub struct Label {
    kind: LabelKind,
    geometry: Geometry,
    options: LabelOptions,
    attributes: TextAttributes,
    /// Unrotated screen-space width and height.
    dim: Vec2,
    /// Stable content hash, used for deterministic tie-breaking.
    hash: u64,
    /// Glyph quads of this label inside the owning set's quad buffer.
    quads: Range,

    state: LabelState,
    alpha: f32,
    anchor_index: usize,
    /// Current anchor offset in screen pixels.
    anchor: Vec2,
    screen_center: Vec2,
    occluded: bool,
    occluded_last_frame: bool,
    skip_transitions: bool,
    sleep_time: f32,
    parent: Option<Weak<RefCell<Label>>>,
}

impl Label {
    fn new(
        kind: LabelKind,
        geometry: Geometry,
        dim: Vec2,
        options: LabelOptions,
        attributes: TextAttributes,
        hash: u64,
        quads: Range,
    ) -> Self {
        debug_assert!(!options.anchors.is_empty());
        let mut label = Self {
            kind,
            geometry,
            options,
            attributes,
            dim,
            hash,
            quads,
            state: LabelState::None,
            alpha: 0.0,
            anchor_index: 0,
            anchor: Vec2::ZERO,
            screen_center: Vec2::ZERO,
            occluded: false,
            occluded_last_frame: false,
            skip_transitions: false,
            sleep_time: 0.0,
            parent: None,
        };
        label.apply_anchor();
        label
    }

    /// Label anchored at a single world position.
    pub fn point(
        position: Vec2,
        dim: Vec2,
        options: LabelOptions,
        attributes: TextAttributes,
        hash: u64,
        quads: Range,
    ) -> Self {
        Self::new(LabelKind::Point, Geometry::Point(position), dim, options, attributes, hash, quads)
    }

    /// Label anchored along a world segment.
    pub fn line(
        p0: Vec2,
        p1: Vec2,
        dim: Vec2,
        options: LabelOptions,
        attributes: TextAttributes,
        hash: u64,
        quads: Range,
    ) -> Self {
        Self::new(LabelKind::Line, Geometry::Line(p0, p1), dim, options, attributes, hash, quads)
    }

    /// Label sampled along a world polyline.
    pub fn curved(
        polyline: Vec<Vec2>,
        dim: Vec2,
        options: LabelOptions,
        attributes: TextAttributes,
        hash: u64,
        quads: Range,
    ) -> Self {
        let rank = candidate_priority(&polyline);
        Self::new(
            LabelKind::Curved,
            Geometry::Curved { polyline, rank },
            dim,
            options,
            attributes,
            hash,
            quads,
        )
    }

    /// Diagnostic overlay label; never collides.
    pub fn debug(position: Vec2, dim: Vec2, attributes: TextAttributes, quads: Range) -> Self {
        Self::new(
            LabelKind::Debug,
            Geometry::Point(position),
            dim,
            LabelOptions::default(),
            attributes,
            0,
            quads,
        )
    }

    // --- accessors -------------------------------------------------------

    pub fn kind(&self) -> LabelKind {
        self.kind
    }

    pub fn state(&self) -> LabelState {
        self.state
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn options(&self) -> &LabelOptions {
        &self.options
    }

    pub fn attributes(&self) -> &TextAttributes {
        &self.attributes
    }

    pub fn dimension(&self) -> Vec2 {
        self.dim
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn screen_center(&self) -> Vec2 {
        self.screen_center
    }

    pub fn anchor_index(&self) -> usize {
        self.anchor_index
    }

    pub fn selection_color(&self) -> u32 {
        self.options.selection_color
    }

    pub fn is_occluded(&self) -> bool {
        self.occluded
    }

    pub fn occluded_last_frame(&self) -> bool {
        self.occluded_last_frame
    }

    /// Whether the label currently contributes pixels (or is about to).
    pub fn visible_state(&self) -> bool {
        matches!(
            self.state,
            LabelState::FadingIn | LabelState::Visible | LabelState::Sleep | LabelState::FadingOut
        )
    }

    /// Whether the label takes part in the occlusion grid.
    pub fn can_occlude(&self) -> bool {
        self.kind != LabelKind::Debug && self.options.collide
    }

    /// Squared world length of the anchoring segment; zero for non-line labels.
    pub fn world_line_length_sq(&self) -> f32 {
        match self.geometry {
            Geometry::Line(p0, p1) => (p1 - p0).length_squared(),
            _ => 0.0,
        }
    }

    /// Placement rank among curved-label candidates; higher wins.
    pub fn candidate_priority(&self) -> f32 {
        match self.geometry {
            Geometry::Curved { rank, .. } => rank,
            _ => 0.0,
        }
    }

    pub fn parent(&self) -> Option<Rc<RefCell<Label>>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub(crate) fn set_parent(&mut self, parent: Weak<RefCell<Label>>) {
        self.parent = Some(parent);
        self.apply_anchor();
    }

    // --- occlusion & state ----------------------------------------------

    /// Mark or clear the occlusion verdict for this frame.
    pub fn occlude(&mut self, occluded: bool) {
        self.occluded = occluded;
    }

    /// Arm the zoom-transition bypass: the next appearance starts fully
    /// visible instead of fading in.
    pub fn skip_transitions(&mut self) {
        self.skip_transitions = true;
    }

    /// Advance to the next declared anchor, wrapping around. Returns false
    /// when there is no other anchor to try.
    pub fn next_anchor(&mut self) -> bool {
        if self.options.anchors.len() <= 1 {
            return false;
        }
        self.anchor_index = (self.anchor_index + 1) % self.options.anchors.len();
        self.apply_anchor();
        true
    }

    fn current_anchor(&self) -> Anchor {
        self.options.anchors[self.anchor_index]
    }

    fn apply_anchor(&mut self) {
        let mut size = self.dim;
        if let Some(parent) = self.parent() {
            size += parent.borrow().dimension();
        }
        self.anchor = self.current_anchor().direction() * size * 0.5;
    }

    /// Consume this frame's occlusion verdict and advance the fade state
    /// machine. Returns true while an animation is running.
    pub fn eval_state(&mut self, dt: f32) -> bool {
        let occluded = self.occluded;
        let was_occluded = self.occluded_last_frame;
        self.occluded_last_frame = occluded;
        self.occluded = false;

        let fade = self.options.fade_time.max(1e-3);

        match self.state {
            LabelState::None => {
                if !occluded {
                    if self.skip_transitions {
                        self.skip_transitions = false;
                        self.state = LabelState::Visible;
                        self.alpha = 1.0;
                    } else {
                        self.state = LabelState::FadingIn;
                        self.alpha = 0.0;
                    }
                    true
                } else {
                    // A required child whose pair failed can never show.
                    if self.options.required && self.parent.is_some() {
                        self.state = LabelState::Dead;
                    }
                    false
                }
            }
            LabelState::FadingIn => {
                if occluded {
                    self.state = LabelState::FadingOut;
                    return true;
                }
                self.alpha = (self.alpha + dt / fade).min(1.0);
                if self.alpha >= 1.0 {
                    self.state = LabelState::Visible;
                }
                true
            }
            LabelState::Visible => {
                if occluded {
                    if was_occluded {
                        // Re-occluded across frames: hide without animation.
                        self.state = LabelState::Sleep;
                        self.alpha = 0.0;
                        self.sleep_time = 0.0;
                    } else {
                        self.state = LabelState::FadingOut;
                    }
                    true
                } else {
                    false
                }
            }
            LabelState::Sleep => {
                if !occluded {
                    self.state = LabelState::FadingIn;
                    true
                } else {
                    self.sleep_time += dt;
                    if self.sleep_time > SLEEP_TTL {
                        self.state = LabelState::Dead;
                    }
                    false
                }
            }
            LabelState::FadingOut => {
                self.alpha = (self.alpha - dt / fade).max(0.0);
                if self.alpha <= 0.0 {
                    self.state = LabelState::Dead;
                    return false;
                }
                true
            }
            LabelState::Dead => false,
        }
    }

    // --- per-frame placement --------------------------------------------

    /// Project the label into screen space, writing its screen transform.
    /// Returns false when the label must be dropped for this frame.
    pub fn update(
        &mut self,
        mvp: &Mat4,
        view: &ViewState,
        bounds: &Aabb,
        transform: &mut ScreenTransform,
    ) -> bool {
        match &self.geometry {
            Geometry::Point(position) => {
                let Some(screen) = world_to_screen(mvp, *position, view.viewport) else {
                    return false;
                };
                self.screen_center = screen;
                if !bounds.contains(screen) {
                    return false;
                }
                transform.push(screen + self.options.offset);
                transform.push(Vec2::new(1.0, 0.0));
                true
            }
            Geometry::Line(p0, p1) => {
                let Some(a) = world_to_screen(mvp, *p0, view.viewport) else {
                    return false;
                };
                let Some(b) = world_to_screen(mvp, *p1, view.viewport) else {
                    return false;
                };

                let length = (b - a).length();

                // Heuristic: the label may be 30% wider than its segment.
                if length < self.dim.x * 0.7 {
                    return false;
                }

                // Keep the screen center at the world segment center; less
                // sliding in tilted views.
                let mid = (*p0 + *p1) * 0.5;
                let Some(center) = world_to_screen(mvp, mid, view.viewport) else {
                    return false;
                };

                let direction = if a.x <= b.x { b - a } else { a - b };
                let rotation = direction / length;

                self.screen_center = center;
                if !bounds.contains(center) {
                    return false;
                }

                transform.push(center + rotate_by(self.options.offset, rotation));
                transform.push(rotation);
                true
            }
            Geometry::Curved { polyline, .. } => {
                for p in polyline {
                    let Some(screen) = world_to_screen(mvp, *p, view.viewport) else {
                        return false;
                    };
                    transform.push(screen);
                }

                let points = transform.as_mut_slice();

                // Keep glyphs reading left to right.
                if points.len() >= 2 && points[0].x > points[points.len() - 1].x {
                    points.reverse();
                }

                let mut sampler = LineSampler::new(points);
                let total = sampler.length();
                if total < self.dim.x {
                    return false;
                }

                let Some((center, _)) = sampler.sample(total * 0.5) else {
                    return false;
                };
                self.screen_center = center;
                bounds.contains(center)
            }
        }
    }

    /// Effective collision dimensions at the current lifecycle state.
    fn collision_dim(&self) -> Vec2 {
        let mut dim = self.dim - self.options.buffer;
        if self.occluded_last_frame {
            dim += Vec2::splat(ACTIVATION_DISTANCE);
        }
        dim
    }

    /// Publish the collision boxes for the current anchor into the shared
    /// OBB buffer. With `append` a fresh range is taken at the buffer end;
    /// otherwise the existing range is overwritten in place.
    pub fn obbs(&self, transform: &[Vec2], obbs: &mut Vec<Obb>, range: &mut Range, append: bool) {
        match &self.geometry {
            Geometry::Curved { .. } => self.curved_obbs(transform, obbs, range, append),
            _ => {
                let view = PointView(transform);
                let rotation = view.rotation();
                let obb = Obb::new(
                    view.position() + self.anchor,
                    rotation,
                    self.collision_dim() * 0.5,
                );

                if append {
                    range.start = obbs.len();
                    range.len = 1;
                    obbs.push(obb);
                } else {
                    obbs[range.start] = obb;
                }
            }
        }
    }

    fn curved_obbs(&self, transform: &[Vec2], obbs: &mut Vec<Obb>, range: &mut Range, append: bool) {
        let dim = self.collision_dim();
        let mut sampler = LineSampler::new(transform);
        let total = sampler.length();

        let width = self.dim.x.min(total);
        let start = (total - width) * 0.5;

        // One box per height-sized chunk of the placement span.
        let step = (dim.y * 2.0).max(8.0);
        let count = ((width / step).ceil() as usize).max(1);
        let chunk = width / count as f32;

        if append {
            range.start = obbs.len();
            range.len = count;
        } else {
            debug_assert_eq!(range.len, count);
        }

        for i in 0..count {
            let mid = start + chunk * (i as f32 + 0.5);
            let (centroid, tangent) = sampler.sample(mid).unwrap_or((transform[0], Vec2::X));
            let obb = Obb::new(centroid, tangent, Vec2::new(chunk * 0.5, dim.y * 0.5));

            if append {
                obbs.push(obb);
            } else {
                obbs[range.start + i] = obb;
            }
        }
    }

    /// Append the label's glyph quads to the per-atlas meshes. Quads fully
    /// outside the screen box expanded by the label height are culled.
    pub fn add_vertices_to_mesh(
        &self,
        transform: &[Vec2],
        viewport: Vec2,
        quads: &[GlyphQuad],
        meshes: &mut MeshSet,
    ) {
        if !self.visible_state() {
            return;
        }

        let lo = Vec2::splat(-self.dim.y) * POSITION_SCALE;
        let hi = (viewport + Vec2::splat(self.dim.y)) * POSITION_SCALE;

        let glyphs = &quads[self.quads.start..self.quads.end()];

        match &self.geometry {
            Geometry::Curved { .. } => {
                self.add_curved_vertices(transform, lo, hi, glyphs, meshes);
            }
            _ => {
                let view = PointView(transform);
                let rotation = view.rotation();
                let rotate = rotation.x != 1.0;
                let origin = (view.position() + self.anchor) * POSITION_SCALE;

                for quad in glyphs {
                    self.push_quad(meshes, quad, lo, hi, |corner| {
                        let local = Vec2::new(corner.pos[0] as f32, corner.pos[1] as f32);
                        let local = if rotate { rotate_by(local, rotation) } else { local };
                        origin + local
                    });
                }
            }
        }
    }

    fn add_curved_vertices(
        &self,
        transform: &[Vec2],
        lo: Vec2,
        hi: Vec2,
        glyphs: &[GlyphQuad],
        meshes: &mut MeshSet,
    ) {
        let mut sampler = LineSampler::new(transform);
        let total = sampler.length();
        let start = (total - self.dim.x).max(0.0) * 0.5;

        for quad in glyphs {
            // Pen-relative cluster center of this glyph.
            let center = (quad.corners[0].pos[0] as f32 + quad.corners[1].pos[0] as f32)
                * 0.5
                * INV_POSITION_SCALE;

            let Some((pos, tangent)) = sampler.sample(start + center) else {
                continue;
            };
            let origin = pos * POSITION_SCALE;
            let center_fixed = center * POSITION_SCALE;

            self.push_quad(meshes, quad, lo, hi, |corner| {
                let local = Vec2::new(corner.pos[0] as f32 - center_fixed, corner.pos[1] as f32);
                origin + rotate_by(local, tangent)
            });
        }
    }

    fn push_quad<F>(&self, meshes: &mut MeshSet, quad: &GlyphQuad, lo: Vec2, hi: Vec2, position: F)
    where
        F: Fn(&QuadVertex) -> Vec2,
    {
        let mut corners = [Vec2::ZERO; 4];
        let mut visible = false;

        for (i, corner) in quad.corners.iter().enumerate() {
            let p = position(corner);
            corners[i] = p;
            visible |= p.x > lo.x && p.x < hi.x && p.y > lo.y && p.y < hi.y;
        }
        if !visible {
            return;
        }

        let alpha = (self.alpha * ALPHA_SCALE) as u16;
        let mesh = meshes.mesh_mut(quad.atlas);

        let vertex = |i: usize| TextVertex {
            pos: [corners[i].x.round() as i16, corners[i].y.round() as i16],
            uv: quad.corners[i].uv,
            fill: self.attributes.fill,
            stroke: self.attributes.stroke,
            alpha,
            font_scale: self.attributes.font_scale,
            selection_color: self.options.selection_color,
        };

        mesh.push_quad([vertex(0), vertex(1), vertex(2), vertex(3)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::transform::TransformBuffer;

    fn view() -> ViewState {
        ViewState::new(Vec2::new(800.0, 600.0), 14.0)
    }

    fn screen_bounds() -> Aabb {
        Aabb::from_size(Vec2::new(800.0, 600.0))
    }

    /// MVP mapping world pixels to NDC for an 800x600 viewport, y-down.
    fn pixel_mvp() -> Mat4 {
        Mat4::from_translation(glam::Vec3::new(-1.0, 1.0, 0.0))
            * Mat4::from_scale(glam::Vec3::new(2.0 / 800.0, -2.0 / 600.0, 1.0))
    }

    fn point_label(x: f32, y: f32) -> Label {
        Label::point(
            Vec2::new(x, y),
            Vec2::new(100.0, 30.0),
            LabelOptions::default(),
            TextAttributes::default(),
            1,
            Range::default(),
        )
    }

    #[test]
    fn test_point_update_stores_position_and_identity_rotation() {
        let mut label = point_label(400.0, 300.0);
        let mut buf = TransformBuffer::default();
        let mut range = buf.begin();

        let ok = label.update(&pixel_mvp(), &view(), &screen_bounds(), &mut buf.writer(&mut range));
        assert!(ok);

        let slice = buf.slice(range);
        let pv = PointView(slice);
        assert!((pv.position().x - 400.0).abs() < 0.1);
        assert!((pv.position().y - 300.0).abs() < 0.1);
        assert_eq!(pv.rotation(), Vec2::new(1.0, 0.0));
        assert!((label.screen_center().x - 400.0).abs() < 0.1);
    }

    #[test]
    fn test_point_outside_bounds_is_dropped() {
        let mut label = point_label(900.0, 300.0);
        let mut buf = TransformBuffer::default();
        let mut range = buf.begin();

        let ok = label.update(&pixel_mvp(), &view(), &screen_bounds(), &mut buf.writer(&mut range));
        assert!(!ok);

        // The extended bounds used for collidable labels keep it.
        let mut range = buf.begin();
        let ok = label.update(
            &pixel_mvp(),
            &view(),
            &screen_bounds().inflated(256.0),
            &mut buf.writer(&mut range),
        );
        assert!(ok);
    }

    #[test]
    fn test_line_too_short_is_dropped() {
        let mut label = Label::line(
            Vec2::new(380.0, 300.0),
            Vec2::new(430.0, 300.0),
            Vec2::new(100.0, 30.0),
            LabelOptions::default(),
            TextAttributes::default(),
            1,
            Range::default(),
        );
        let mut buf = TransformBuffer::default();
        let mut range = buf.begin();

        // Projected length 50 < 0.7 * 100.
        let ok = label.update(&pixel_mvp(), &view(), &screen_bounds(), &mut buf.writer(&mut range));
        assert!(!ok);
    }

    #[test]
    fn test_line_rotation_is_left_to_right() {
        let mut label = Label::line(
            Vec2::new(500.0, 400.0),
            Vec2::new(300.0, 200.0),
            Vec2::new(100.0, 30.0),
            LabelOptions::default(),
            TextAttributes::default(),
            1,
            Range::default(),
        );
        let mut buf = TransformBuffer::default();
        let mut range = buf.begin();
        assert!(label.update(&pixel_mvp(), &view(), &screen_bounds(), &mut buf.writer(&mut range)));

        let rotation = PointView(buf.slice(range)).rotation();
        assert!(rotation.x > 0.0);
        assert!((rotation.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_obb_inflated_after_occlusion() {
        let mut label = point_label(400.0, 300.0);
        let mut buf = TransformBuffer::default();
        let mut range = buf.begin();
        assert!(label.update(&pixel_mvp(), &view(), &screen_bounds(), &mut buf.writer(&mut range)));

        let mut obbs = Vec::new();
        let mut obb_range = Range::default();
        label.obbs(buf.slice(range), &mut obbs, &mut obb_range, true);
        let plain = obbs[0].extent().size();

        label.occlude(true);
        label.eval_state(0.0); // latches occluded_last_frame
        label.obbs(buf.slice(range), &mut obbs, &mut obb_range, false);
        let inflated = obbs[0].extent().size();

        assert!(inflated.x > plain.x);
        assert!(inflated.y > plain.y);
    }

    #[test]
    fn test_state_machine_fade_cycle() {
        let mut label = point_label(0.0, 0.0);
        assert_eq!(label.state(), LabelState::None);

        // Placed: starts fading in.
        assert!(label.eval_state(0.0));
        assert_eq!(label.state(), LabelState::FadingIn);

        // Fade completes.
        label.eval_state(1.0);
        assert_eq!(label.state(), LabelState::Visible);
        assert!((label.alpha() - 1.0).abs() < 1e-6);

        // First occlusion fades out; alpha starts dropping next frame.
        label.occlude(true);
        label.eval_state(0.05);
        assert_eq!(label.state(), LabelState::FadingOut);

        label.eval_state(0.05);
        assert!(label.alpha() < 1.0);

        // Fade-out completes.
        label.eval_state(1.0);
        assert_eq!(label.state(), LabelState::Dead);
        assert!(label.alpha() <= 0.0);
    }

    #[test]
    fn test_visible_reoccluded_goes_to_sleep() {
        let mut label = point_label(0.0, 0.0);
        label.eval_state(0.0);
        label.eval_state(1.0);
        assert_eq!(label.state(), LabelState::Visible);

        label.occlude(true);
        label.eval_state(0.0);
        assert_eq!(label.state(), LabelState::FadingOut);

        // Back to visible, then occluded on two consecutive frames.
        let mut label = point_label(0.0, 0.0);
        label.eval_state(0.0);
        label.eval_state(1.0);
        label.occlude(true);
        label.eval_state(0.0); // fading out, last frame occluded
        label.eval_state(1.0); // dead

        let mut label = point_label(0.0, 0.0);
        label.eval_state(0.0);
        label.eval_state(1.0);
        // Force the re-occluded path: occluded last frame and this frame
        // while still visible.
        label.occlude(true);
        label.occluded_last_frame = true;
        label.eval_state(0.0);
        assert_eq!(label.state(), LabelState::Sleep);
        assert_eq!(label.alpha(), 0.0);

        // Freed again: fades back in.
        label.eval_state(0.1);
        assert_eq!(label.state(), LabelState::FadingIn);
    }

    #[test]
    fn test_sleep_expires() {
        let mut label = point_label(0.0, 0.0);
        label.eval_state(0.0);
        label.eval_state(1.0);
        label.occlude(true);
        label.occluded_last_frame = true;
        label.eval_state(0.0);
        assert_eq!(label.state(), LabelState::Sleep);

        label.occlude(true);
        label.eval_state(SLEEP_TTL + 1.0);
        assert_eq!(label.state(), LabelState::Dead);
    }

    #[test]
    fn test_skip_transitions_starts_visible() {
        let mut label = point_label(0.0, 0.0);
        label.skip_transitions();
        label.eval_state(0.0);
        assert_eq!(label.state(), LabelState::Visible);
        assert!((label.alpha() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_monotone_during_fades() {
        let mut label = point_label(0.0, 0.0);
        label.eval_state(0.0);

        let mut last = label.alpha();
        for _ in 0..10 {
            label.eval_state(0.03);
            assert!(label.alpha() >= last);
            last = label.alpha();
        }

        label.occlude(true);
        label.eval_state(0.0);
        let mut last = label.alpha();
        for _ in 0..10 {
            label.eval_state(0.03);
            assert!(label.alpha() <= last);
            last = label.alpha();
        }
    }

    #[test]
    fn test_anchor_cycle() {
        let mut label = Label::point(
            Vec2::ZERO,
            Vec2::new(100.0, 30.0),
            LabelOptions::default().with_anchors(vec![Anchor::Center, Anchor::Top, Anchor::Bottom]),
            TextAttributes::default(),
            1,
            Range::default(),
        );

        assert_eq!(label.anchor_index(), 0);
        assert!(label.next_anchor());
        assert_eq!(label.anchor_index(), 1);
        // Top anchor moves the box up in y-down screen space.
        assert!(label.anchor.y < 0.0);
        assert!(label.next_anchor());
        assert!(label.next_anchor());
        assert_eq!(label.anchor_index(), 0);

        let mut single = point_label(0.0, 0.0);
        assert!(!single.next_anchor());
    }

    #[test]
    fn test_vertices_carry_alpha_and_colors() {
        let quads = vec![GlyphQuad::from_rect(
            0,
            Vec2::new(-50.0, -15.0),
            Vec2::new(50.0, 15.0),
            [0, 0],
            [64, 64],
        )];

        let mut label = Label::point(
            Vec2::new(400.0, 300.0),
            Vec2::new(100.0, 30.0),
            LabelOptions::default(),
            TextAttributes { fill: 0x11223344, stroke: 0x55667788, font_scale: 64 },
            1,
            Range { start: 0, len: 1 },
        );

        let mut buf = TransformBuffer::default();
        let mut range = buf.begin();
        assert!(label.update(&pixel_mvp(), &view(), &screen_bounds(), &mut buf.writer(&mut range)));
        label.skip_transitions();
        label.eval_state(0.0);

        let mut meshes = MeshSet::default();
        label.add_vertices_to_mesh(buf.slice(range), Vec2::new(800.0, 600.0), &quads, &mut meshes);

        assert_eq!(meshes.quad_count(), 1);
        let v = meshes.meshes()[0].vertices()[0];
        assert_eq!(v.fill, 0x11223344);
        assert_eq!(v.stroke, 0x55667788);
        assert_eq!(v.alpha, ALPHA_SCALE as u16);

        // Screen position is quantized around the label center.
        assert!((v.pos[0] as f32 * 0.25 - 350.0).abs() < 1.0);
    }

    #[test]
    fn test_offscreen_quads_are_culled() {
        let quads = vec![GlyphQuad::from_rect(
            0,
            Vec2::new(-50.0, -15.0),
            Vec2::new(50.0, 15.0),
            [0, 0],
            [64, 64],
        )];

        let mut label = Label::point(
            Vec2::new(1000.0, 300.0),
            Vec2::new(100.0, 30.0),
            LabelOptions::default(),
            TextAttributes::default(),
            1,
            Range { start: 0, len: 1 },
        );

        let mut buf = TransformBuffer::default();
        let mut range = buf.begin();
        let bounds = screen_bounds().inflated(256.0);
        assert!(label.update(&pixel_mvp(), &view(), &bounds, &mut buf.writer(&mut range)));
        label.skip_transitions();
        label.eval_state(0.0);

        let mut meshes = MeshSet::default();
        label.add_vertices_to_mesh(buf.slice(range), Vec2::new(800.0, 600.0), &quads, &mut meshes);
        assert_eq!(meshes.quad_count(), 0);
    }
}
