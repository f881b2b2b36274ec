//! Arrowheads and the label gap on lines and arrows.

use kurbo::{Line, ParamCurve, ParamCurveArclen, PathSeg, Point, QuadBez, Vec2};
use sketchpad_core::shapes::LinePath;

const ARCLEN_ACCURACY: f64 = 1e-6;

/// The two barbs of an arrowhead, each from the tip backwards.
///
/// `direction` is the shaft direction at the tip. Barbs are `length` long and
/// open at `angle_degrees` either side of the shaft. Returns `None` when the
/// direction is degenerate.
pub fn arrowhead(tip: Point, direction: Vec2, length: f64, angle_degrees: f64) -> Option<[Line; 2]> {
    let len = direction.hypot();
    if !(len > f64::EPSILON) {
        return None;
    }
    let back = -direction / len * length;
    let angle = angle_degrees.to_radians();
    let barb = |a: f64| {
        let (sin, cos) = a.sin_cos();
        Line::new(tip, tip + Vec2::new(back.x * cos - back.y * sin, back.x * sin + back.y * cos))
    };
    Some([barb(angle), barb(-angle)])
}

/// A line or arrow split around its label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelGap {
    /// Stroke from the start to the gap.
    pub before: PathSeg,
    /// Stroke from the gap to the end.
    pub after: PathSeg,
    /// Where the label is centered.
    pub center: Point,
    /// Arc length left open.
    pub width: f64,
}

/// The whole path as a single kurbo segment.
pub fn to_segment(path: &LinePath) -> PathSeg {
    match *path {
        LinePath::Straight { start, end } => PathSeg::Line(Line::new(start, end)),
        LinePath::Curved { start, control, end } => PathSeg::Quad(QuadBez::new(start, control, end)),
    }
}

/// Parameter at arc length `s` from the start.
fn param_at(seg: &PathSeg, s: f64) -> f64 {
    match seg {
        PathSeg::Line(line) => {
            let len = line.arclen(ARCLEN_ACCURACY);
            if len > 0.0 { (s / len).clamp(0.0, 1.0) } else { 0.0 }
        }
        _ => seg.inv_arclen(s, ARCLEN_ACCURACY),
    }
}

/// Split `path` to leave room for a label at its midpoint (`t = 0.5`).
///
/// The gap is `min(gap, 0.8 × length)` wide so short lines keep visible
/// ends. Returns `None` for zero-length paths.
pub fn label_gap(path: &LinePath, gap: f64) -> Option<LabelGap> {
    let seg = to_segment(path);
    let length = seg.arclen(ARCLEN_ACCURACY);
    if !(length > f64::EPSILON) {
        return None;
    }
    let width = gap.min(0.8 * length).max(0.0);
    let mid = seg.subsegment(0.0..0.5).arclen(ARCLEN_ACCURACY);
    let s0 = (mid - width / 2.0).clamp(0.0, length);
    let s1 = (mid + width / 2.0).clamp(0.0, length);
    let t0 = param_at(&seg, s0);
    let t1 = param_at(&seg, s1);
    Some(LabelGap {
        before: seg.subsegment(0.0..t0),
        after: seg.subsegment(t1..1.0),
        center: seg.eval(0.5),
        width,
    })
}
