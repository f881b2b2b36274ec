//! Selection handles and the transform gestures they drive.
//!
//! Box shapes (rectangle, ellipse, text) get eight resize anchors and a
//! rotate handle. Lines and arrows get start, end and a midpoint handle that
//! sits on the curve at `t = 0.5`.

use crate::shapes::{Shape, ShapeId, ShapeUpdate};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    Corner(Corner),
    Edge(Edge),
    /// Rotation handle above the shape.
    Rotate,
    LineStart,
    LineEnd,
    /// Midpoint of a line or arrow; dragging it bends the curve.
    LineMidpoint,
}

impl HandleKind {
    pub fn is_line_handle(&self) -> bool {
        matches!(
            self,
            HandleKind::LineStart | HandleKind::LineEnd | HandleKind::LineMidpoint
        )
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in document coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a document point hits this handle.
    /// `tolerance` should be adjusted for zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.position.distance(point) <= tolerance
    }
}

/// Unit offsets of each resize anchor from the box center, in half-extents.
fn anchor_factors(kind: HandleKind) -> Option<(f64, f64)> {
    Some(match kind {
        HandleKind::Corner(Corner::TopLeft) => (-1.0, -1.0),
        HandleKind::Corner(Corner::TopRight) => (1.0, -1.0),
        HandleKind::Corner(Corner::BottomLeft) => (-1.0, 1.0),
        HandleKind::Corner(Corner::BottomRight) => (1.0, 1.0),
        HandleKind::Edge(Edge::Top) => (0.0, -1.0),
        HandleKind::Edge(Edge::Right) => (1.0, 0.0),
        HandleKind::Edge(Edge::Bottom) => (0.0, 1.0),
        HandleKind::Edge(Edge::Left) => (-1.0, 0.0),
        _ => return None,
    })
}

const BOX_HANDLES: [HandleKind; 8] = [
    HandleKind::Corner(Corner::TopLeft),
    HandleKind::Edge(Edge::Top),
    HandleKind::Corner(Corner::TopRight),
    HandleKind::Edge(Edge::Right),
    HandleKind::Corner(Corner::BottomRight),
    HandleKind::Edge(Edge::Bottom),
    HandleKind::Corner(Corner::BottomLeft),
    HandleKind::Edge(Edge::Left),
];

fn rotate_vec(v: Vec2, degrees: f64) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Get the selection handles for a shape.
///
/// `rotate_offset` is the distance of the rotate handle above the top edge,
/// in document units.
pub fn get_handles(shape: &Shape, rotate_offset: f64) -> Vec<Handle> {
    if let Some(path) = shape.absolute_path() {
        return vec![
            Handle::new(path.start(), HandleKind::LineStart),
            Handle::new(path.end(), HandleKind::LineEnd),
            Handle::new(path.midpoint_handle(), HandleKind::LineMidpoint),
        ];
    }

    let center = shape.bounds().center();
    let half = Vec2::new(shape.width / 2.0, shape.height / 2.0);
    let mut handles: Vec<Handle> = BOX_HANDLES
        .iter()
        .filter_map(|&kind| {
            let (fx, fy) = anchor_factors(kind)?;
            let local = Vec2::new(fx * half.x, fy * half.y);
            Some(Handle::new(center + rotate_vec(local, shape.rotation), kind))
        })
        .collect();
    let rotate = Vec2::new(0.0, -half.y - rotate_offset);
    handles.push(Handle::new(center + rotate_vec(rotate, shape.rotation), HandleKind::Rotate));
    handles
}

/// Find which handle (if any) is hit at the given point.
pub fn hit_test_handles(shape: &Shape, point: Point, tolerance: f64, rotate_offset: f64) -> Option<HandleKind> {
    get_handles(shape, rotate_offset)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Snap an angle to the nearest multiple of `step` if within `tolerance`.
pub fn snap_rotation(degrees: f64, step: f64, tolerance: f64) -> f64 {
    if step <= 0.0 {
        return degrees;
    }
    let nearest = (degrees / step).round() * step;
    if (degrees - nearest).abs() <= tolerance {
        nearest
    } else {
        degrees
    }
}

/// State for moving the selected shapes at once.
#[derive(Debug, Clone)]
pub struct MultiMoveState {
    /// Starting point of the drag (document space).
    pub start_point: Point,
    /// Current point of the drag (document space).
    pub current_point: Point,
    /// Shapes as they were when the drag started.
    pub originals: Vec<Shape>,
    /// Shape under the pointer at press time.
    pub pressed: ShapeId,
}

impl MultiMoveState {
    pub fn new(start_point: Point, originals: Vec<Shape>, pressed: ShapeId) -> Self {
        Self {
            start_point,
            current_point: start_point,
            originals,
            pressed,
        }
    }

    /// Get the drag delta.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    pub fn has_moved(&self) -> bool {
        self.delta().hypot2() > 0.0
    }

    /// The moved shapes as they should currently appear.
    pub fn preview(&self) -> Vec<Shape> {
        let delta = self.delta();
        self.originals
            .iter()
            .map(|s| {
                let mut s = s.clone();
                s.translate(delta);
                s
            })
            .collect()
    }
}

/// Limits applied while transforming.
#[derive(Debug, Clone, Copy)]
pub struct TransformLimits {
    pub min_size: f64,
    pub snap_step: f64,
    pub snap_tolerance: f64,
}

/// An active handle drag on one shape.
///
/// The preview box is kept as the original size times an accumulated scale.
/// [`TransformState::commit`] folds the scale into width/height and resets it.
#[derive(Debug, Clone)]
pub struct TransformState {
    pub shape_id: ShapeId,
    pub handle: HandleKind,
    /// Shape as it was when the drag started.
    pub original: Shape,
    /// Live preview of the shape.
    pub preview: Shape,
    /// Accumulated scale relative to the original box.
    pub scale: Vec2,
    limits: TransformLimits,
}

impl TransformState {
    pub fn new(shape: &Shape, handle: HandleKind, limits: TransformLimits) -> Self {
        Self {
            shape_id: shape.id,
            handle,
            original: shape.clone(),
            preview: shape.clone(),
            scale: Vec2::new(1.0, 1.0),
            limits,
        }
    }

    /// Move the dragged handle to `pointer` (document space).
    pub fn drag_to(&mut self, pointer: Point) {
        match self.handle {
            HandleKind::Rotate => self.rotate_to(pointer),
            HandleKind::LineStart | HandleKind::LineEnd | HandleKind::LineMidpoint => {
                self.move_line_handle(pointer)
            }
            HandleKind::Corner(_) | HandleKind::Edge(_) => self.resize_to(pointer),
        }
    }

    fn rotate_to(&mut self, pointer: Point) {
        let center = self.original.bounds().center();
        let v = pointer - center;
        if v.hypot2() < f64::EPSILON {
            return;
        }
        // Handle sits straight above the center at rotation 0
        let degrees = v.y.atan2(v.x).to_degrees() + 90.0;
        let degrees = snap_rotation(degrees, self.limits.snap_step, self.limits.snap_tolerance);
        self.preview.rotation = degrees.rem_euclid(360.0);
    }

    fn resize_to(&mut self, pointer: Point) {
        let Some((fx, fy)) = anchor_factors(self.handle) else {
            return;
        };
        let original = &self.original;
        let center = original.bounds().center();
        let (w, h) = (original.width, original.height);
        let local = rotate_vec(pointer - center, -original.rotation);

        let (mut x0, mut x1) = (-w / 2.0, w / 2.0);
        let (mut y0, mut y1) = (-h / 2.0, h / 2.0);
        if fx < 0.0 {
            x0 = local.x;
        } else if fx > 0.0 {
            x1 = local.x;
        }
        if fy < 0.0 {
            y0 = local.y;
        } else if fy > 0.0 {
            y1 = local.y;
        }
        let (new_w, new_h) = (x1 - x0, y1 - y0);
        // Only the sides the handle moves are held to the floor
        let min = self.limits.min_size;
        if (fx != 0.0 && new_w < min) || (fy != 0.0 && new_h < min) {
            return;
        }

        let local_center = Vec2::new((x0 + x1) / 2.0, (y0 + y1) / 2.0);
        let new_center = center + rotate_vec(local_center, original.rotation);
        self.scale = Vec2::new(
            if w > 0.0 { new_w / w } else { 1.0 },
            if h > 0.0 { new_h / h } else { 1.0 },
        );
        self.preview.position = new_center - Vec2::new(new_w / 2.0, new_h / 2.0);
        self.preview.width = new_w;
        self.preview.height = new_h;
    }

    fn move_line_handle(&mut self, pointer: Point) {
        let Some(path) = self.preview.absolute_path() else {
            return;
        };
        let edited = match self.handle {
            HandleKind::LineStart => {
                let mut p = path;
                p.set_start(pointer);
                p
            }
            HandleKind::LineEnd => {
                let mut p = path;
                p.set_end(pointer);
                p
            }
            _ => path.with_midpoint_at(pointer),
        };
        self.preview.set_absolute_path(edited);
    }

    /// Final geometry for the shape: exactly what the preview shows. The
    /// accumulated scale is reset.
    pub fn commit(&mut self) -> ShapeUpdate {
        let update = ShapeUpdate::geometry_of(&self.preview);
        self.scale = Vec2::new(1.0, 1.0);
        update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::LinePath;
    use kurbo::Rect;

    const LIMITS: TransformLimits = TransformLimits {
        min_size: 10.0,
        snap_step: 45.0,
        snap_tolerance: 5.0,
    };

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn test_box_handles() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0));
        let handles = get_handles(&shape, 25.0);
        assert_eq!(handles.len(), 9);
        let find = |k| handles.iter().find(|h| h.kind == k).unwrap().position;
        assert!(close(find(HandleKind::Corner(Corner::BottomRight)), Point::new(100.0, 50.0)));
        assert!(close(find(HandleKind::Edge(Edge::Left)), Point::new(0.0, 25.0)));
        assert!(close(find(HandleKind::Rotate), Point::new(50.0, -25.0)));
    }

    #[test]
    fn test_line_midpoint_handle_on_curve() {
        let path = LinePath::curved(Point::new(0.0, 0.0), Point::new(50.0, 100.0), Point::new(100.0, 0.0));
        let shape = Shape::from_absolute_path(path, false);
        let handles = get_handles(&shape, 25.0);
        let mid = handles.iter().find(|h| h.kind == HandleKind::LineMidpoint).unwrap();
        assert!(close(mid.position, Point::new(50.0, 50.0)));
    }

    #[test]
    fn test_hit_test_handles() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(
            hit_test_handles(&shape, Point::new(98.0, 52.0), 5.0, 25.0),
            Some(HandleKind::Corner(Corner::BottomRight))
        );
        assert_eq!(hit_test_handles(&shape, Point::new(50.0, 25.0), 5.0, 25.0), None);
    }

    #[test]
    fn test_resize_bottom_right() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0));
        let mut state = TransformState::new(&shape, HandleKind::Corner(Corner::BottomRight), LIMITS);
        state.drag_to(Point::new(150.0, 100.0));
        assert_eq!(state.preview.position, Point::new(0.0, 0.0));
        assert_eq!(state.preview.width, 150.0);
        assert_eq!(state.scale, Vec2::new(1.5, 2.0));
        let update = state.commit();
        assert_eq!(update.width, Some(150.0));
        assert_eq!(update.height, Some(100.0));
        assert_eq!(state.scale, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_resize_below_floor_keeps_previous_box() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0));
        let mut state = TransformState::new(&shape, HandleKind::Edge(Edge::Left), LIMITS);
        state.drag_to(Point::new(40.0, 25.0));
        assert_eq!(state.preview.width, 60.0);
        state.drag_to(Point::new(95.0, 25.0));
        assert_eq!(state.preview.width, 60.0);
        assert_eq!(state.preview.position, Point::new(40.0, 0.0));
    }

    #[test]
    fn test_resize_flat_box_commits_preview() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 0.0));
        let mut state = TransformState::new(&shape, HandleKind::Edge(Edge::Bottom), LIMITS);
        state.drag_to(Point::new(50.0, 50.0));
        assert_eq!(state.preview.height, 50.0);
        assert_eq!(state.preview.position, Point::new(0.0, 0.0));
        let update = state.commit();
        assert_eq!(update.height, Some(50.0));
        assert_eq!(update.width, Some(100.0));
        assert_eq!(update.position, Some(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_thin_box_resizes_along_free_axis() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 3.0));
        let mut state = TransformState::new(&shape, HandleKind::Edge(Edge::Right), LIMITS);
        state.drag_to(Point::new(200.0, 1.5));
        assert_eq!(state.preview.width, 200.0);
        assert_eq!(state.preview.height, 3.0);
        let update = state.commit();
        assert_eq!(update.width, Some(200.0));
        assert_eq!(update.height, Some(3.0));

        // Corners still move the thin side, so they stay held to the floor
        let mut corner = TransformState::new(&shape, HandleKind::Corner(Corner::BottomRight), LIMITS);
        corner.drag_to(Point::new(200.0, 5.0));
        assert_eq!(corner.preview.width, 100.0);
        corner.drag_to(Point::new(200.0, 20.0));
        assert_eq!(corner.preview.width, 200.0);
        assert_eq!(corner.preview.height, 20.0);
    }

    #[test]
    fn test_resize_rotated_shape_keeps_opposite_anchor() {
        let mut shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 100.0));
        shape.rotation = 90.0;
        let mut state = TransformState::new(&shape, HandleKind::Edge(Edge::Right), LIMITS);
        // With 90 degrees, the local right edge points down in the document
        state.drag_to(Point::new(50.0, 150.0));
        assert!((state.preview.width - 150.0).abs() < 1e-9);
        assert!((state.preview.height - 100.0).abs() < 1e-9);
        let anchor_before = shape.bounds().center() + rotate_vec(Vec2::new(-50.0, 0.0), 90.0);
        let preview = &state.preview;
        let anchor_after = preview.bounds().center() + rotate_vec(Vec2::new(-75.0, 0.0), 90.0);
        assert!(close(anchor_before, anchor_after));
    }

    #[test]
    fn test_rotation_snaps_near_multiples_of_45() {
        let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut state = TransformState::new(&shape, HandleKind::Rotate, LIMITS);
        // Pointer to the right of center: 90 degrees
        state.drag_to(Point::new(150.0, 52.0));
        assert_eq!(state.preview.rotation, 90.0);
        // Pointer at 30 degrees from vertical: not snapped
        let angle = 30.0_f64.to_radians();
        state.drag_to(Point::new(50.0 + 100.0 * angle.sin(), 50.0 - 100.0 * angle.cos()));
        assert!((state.preview.rotation - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_snap_rotation() {
        assert_eq!(snap_rotation(47.0, 45.0, 5.0), 45.0);
        assert_eq!(snap_rotation(60.0, 45.0, 5.0), 60.0);
        assert_eq!(snap_rotation(-3.0, 45.0, 5.0), 0.0);
    }

    #[test]
    fn test_midpoint_drag_promotes_and_renormalizes() {
        let shape = Shape::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let mut state = TransformState::new(&shape, HandleKind::LineMidpoint, LIMITS);
        state.drag_to(Point::new(50.0, 40.0));
        let path = state.preview.absolute_path().unwrap();
        assert!(path.is_curved());
        assert!(close(path.midpoint_handle(), Point::new(50.0, 40.0)));
        assert!(close(path.control().unwrap(), Point::new(50.0, 80.0)));
        assert_eq!(state.preview.height, 80.0);
        let update = state.commit();
        assert!(update.path.is_some_and(|p| p.is_curved()));
    }

    #[test]
    fn test_endpoint_drag() {
        let shape = Shape::arrow(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let mut state = TransformState::new(&shape, HandleKind::LineEnd, LIMITS);
        state.drag_to(Point::new(-50.0, 30.0));
        let path = state.preview.absolute_path().unwrap();
        assert!(close(path.end(), Point::new(-50.0, 30.0)));
        assert!(close(path.start(), Point::ZERO));
        assert_eq!(state.preview.position, Point::new(-50.0, 0.0));
    }
}
