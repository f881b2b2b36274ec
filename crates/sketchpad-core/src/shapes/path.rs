//! Geometry of line and arrow shapes: a straight segment or a quadratic Bezier.

use kurbo::{BezPath, Line, ParamCurve, ParamCurveArclen, ParamCurveNearest, Point, QuadBez, Rect, Vec2};

/// Accuracy used for arc length and nearest-point queries.
const CURVE_ACCURACY: f64 = 1e-3;

/// Points of a line or arrow, relative to the owning shape's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinePath {
    Straight { start: Point, end: Point },
    Curved { start: Point, control: Point, end: Point },
}

impl LinePath {
    pub fn straight(start: Point, end: Point) -> Self {
        LinePath::Straight { start, end }
    }

    pub fn curved(start: Point, control: Point, end: Point) -> Self {
        LinePath::Curved { start, control, end }
    }

    /// Build from a flat `[x1,y1,x2,y2]` or `[x1,y1,cx,cy,x2,y2]` array.
    pub fn from_flat(points: &[f64]) -> Option<Self> {
        match *points {
            [x1, y1, x2, y2] => Some(LinePath::straight(Point::new(x1, y1), Point::new(x2, y2))),
            [x1, y1, cx, cy, x2, y2] => Some(LinePath::curved(
                Point::new(x1, y1),
                Point::new(cx, cy),
                Point::new(x2, y2),
            )),
            _ => None,
        }
    }

    /// Flatten back to the 4- or 6-element array form.
    pub fn to_flat(&self) -> Vec<f64> {
        match self {
            LinePath::Straight { start, end } => vec![start.x, start.y, end.x, end.y],
            LinePath::Curved { start, control, end } => {
                vec![start.x, start.y, control.x, control.y, end.x, end.y]
            }
        }
    }

    pub fn is_curved(&self) -> bool {
        matches!(self, LinePath::Curved { .. })
    }

    pub fn start(&self) -> Point {
        match self {
            LinePath::Straight { start, .. } | LinePath::Curved { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            LinePath::Straight { end, .. } | LinePath::Curved { end, .. } => *end,
        }
    }

    /// Raw control point, if curved.
    pub fn control(&self) -> Option<Point> {
        match self {
            LinePath::Straight { .. } => None,
            LinePath::Curved { control, .. } => Some(*control),
        }
    }

    pub fn set_start(&mut self, point: Point) {
        match self {
            LinePath::Straight { start, .. } | LinePath::Curved { start, .. } => *start = point,
        }
    }

    pub fn set_end(&mut self, point: Point) {
        match self {
            LinePath::Straight { end, .. } | LinePath::Curved { end, .. } => *end = point,
        }
    }

    /// All defining points, control point included.
    pub fn points(&self) -> Vec<Point> {
        match self {
            LinePath::Straight { start, end } => vec![*start, *end],
            LinePath::Curved { start, control, end } => vec![*start, *control, *end],
        }
    }

    /// Evaluate the curve at parameter `t` in `[0, 1]`.
    pub fn eval(&self, t: f64) -> Point {
        match self {
            LinePath::Straight { start, end } => Line::new(*start, *end).eval(t),
            LinePath::Curved { start, control, end } => QuadBez::new(*start, *control, *end).eval(t),
        }
    }

    /// Position of the midpoint handle: the curve evaluated at `t = 0.5`.
    ///
    /// For a quadratic this is `0.25·P0 + 0.5·P1 + 0.25·P2`.
    pub fn midpoint_handle(&self) -> Point {
        match self {
            LinePath::Straight { start, end } => start.midpoint(*end),
            LinePath::Curved { start, control, end } => {
                let v = start.to_vec2() * 0.25 + control.to_vec2() * 0.5 + end.to_vec2() * 0.25;
                v.to_point()
            }
        }
    }

    /// Curve whose midpoint handle sits at `dragged`.
    ///
    /// Inverts the midpoint relation, `P1 = (D − 0.25·P0 − 0.25·P2) / 0.5`.
    /// A straight path is promoted to a curved one.
    pub fn with_midpoint_at(&self, dragged: Point) -> LinePath {
        let start = self.start();
        let end = self.end();
        let control = (dragged.to_vec2() - start.to_vec2() * 0.25 - end.to_vec2() * 0.25) / 0.5;
        LinePath::curved(start, control.to_point(), end)
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            LinePath::Straight { start, end } => {
                *start += delta;
                *end += delta;
            }
            LinePath::Curved { start, control, end } => {
                *start += delta;
                *control += delta;
                *end += delta;
            }
        }
    }

    /// Bounding box of the defining points.
    pub fn bounds(&self) -> Rect {
        let points = self.points();
        let first = Rect::from_points(points[0], points[0]);
        points.iter().skip(1).fold(first, |acc, p| acc.union_pt(*p))
    }

    /// Arc length of the path.
    pub fn length(&self) -> f64 {
        match self {
            LinePath::Straight { start, end } => start.distance(*end),
            LinePath::Curved { start, control, end } => {
                QuadBez::new(*start, *control, *end).arclen(CURVE_ACCURACY)
            }
        }
    }

    /// Distance from `point` to the nearest point on the path.
    pub fn distance_to(&self, point: Point) -> f64 {
        let nearest = match self {
            LinePath::Straight { start, end } => Line::new(*start, *end).nearest(point, CURVE_ACCURACY),
            LinePath::Curved { start, control, end } => {
                QuadBez::new(*start, *control, *end).nearest(point, CURVE_ACCURACY)
            }
        };
        nearest.distance_sq.sqrt()
    }

    /// Direction of travel at the end of the path, used for arrowheads.
    pub fn end_tangent(&self) -> Vec2 {
        match self {
            LinePath::Straight { start, end } => *end - *start,
            LinePath::Curved { control, end, start } => {
                let tangent = *end - *control;
                if tangent.hypot2() > f64::EPSILON {
                    tangent
                } else {
                    *end - *start
                }
            }
        }
    }

    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        match self {
            LinePath::Straight { end, .. } => path.line_to(*end),
            LinePath::Curved { control, end, .. } => path.quad_to(*control, *end),
        }
        path
    }

    pub fn is_finite(&self) -> bool {
        self.points().iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_flat_roundtrip_lengths() {
        assert!(LinePath::from_flat(&[0.0, 0.0, 1.0, 1.0]).is_some());
        assert!(LinePath::from_flat(&[0.0, 0.0, 1.0, 1.0, 2.0, 2.0]).is_some_and(|p| p.is_curved()));
        assert!(LinePath::from_flat(&[0.0, 0.0, 1.0]).is_none());
        assert!(LinePath::from_flat(&[]).is_none());
    }

    #[test]
    fn test_midpoint_handle_formula() {
        let path = LinePath::curved(Point::new(0.0, 0.0), Point::new(40.0, 80.0), Point::new(100.0, 0.0));
        assert_close(path.midpoint_handle(), Point::new(45.0, 40.0));
        assert_close(path.midpoint_handle(), path.eval(0.5));
    }

    #[test]
    fn test_midpoint_inverse_reproduces_dragged_point() {
        let path = LinePath::curved(Point::new(10.0, 5.0), Point::new(-30.0, 70.0), Point::new(90.0, 20.0));
        for dragged in [Point::new(0.0, 0.0), Point::new(55.5, -12.0), Point::new(300.0, 200.0)] {
            let edited = path.with_midpoint_at(dragged);
            assert_close(edited.midpoint_handle(), dragged);
            assert_close(edited.eval(0.5), dragged);
            assert_eq!(edited.start(), path.start());
            assert_eq!(edited.end(), path.end());
        }
    }

    #[test]
    fn test_straight_promoted_when_midpoint_dragged() {
        let path = LinePath::straight(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_close(path.midpoint_handle(), Point::new(50.0, 0.0));
        let edited = path.with_midpoint_at(Point::new(50.0, 30.0));
        assert!(edited.is_curved());
        assert_close(edited.control().unwrap(), Point::new(50.0, 60.0));
    }

    #[test]
    fn test_bounds_include_control_point() {
        let path = LinePath::curved(Point::new(0.0, 0.0), Point::new(50.0, -40.0), Point::new(100.0, 10.0));
        assert_eq!(path.bounds(), Rect::new(0.0, -40.0, 100.0, 10.0));
    }

    #[test]
    fn test_distance_to_straight_line() {
        let path = LinePath::straight(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert!((path.distance_to(Point::new(50.0, 7.0)) - 7.0).abs() < 1e-6);
        assert!((path.length() - 100.0).abs() < 1e-9);
    }
}
