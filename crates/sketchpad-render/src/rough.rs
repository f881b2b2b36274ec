//! Seeded hand-drawn stroke generation.
//!
//! Every shape gets a seed derived from its id, so the same shape always
//! produces the same wobble while different shapes look independently
//! sketched. Lines follow the rough.js construction: endpoints are jittered,
//! the stroke bows perpendicular to its direction and is drawn as a cubic
//! through two diverging control points, usually twice.

use kurbo::{BezPath, PathEl, PathSeg, Point, QuadBez, Shape as _, Vec2};
use sketchpad_core::ShapeId;
use std::f64::consts::PI;

/// Stable 32-bit seed for a shape id (FNV-1a over its hyphenated form).
pub fn seed_from_id(id: &ShapeId) -> u32 {
    const OFFSET_BASIS: u32 = 0x811c_9dc5;
    const PRIME: u32 = 0x0100_0193;
    id.hyphenated()
        .to_string()
        .bytes()
        .fold(OFFSET_BASIS, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(PRIME))
}

/// Simple seeded random number generator (xorshift32).
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random float in range [0, 1]
    pub fn next_unit(&mut self) -> f64 {
        self.next_u32() as f64 / u32::MAX as f64
    }

    /// Random float in range [-1, 1]
    pub fn next_f64(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }

    /// Random offset scaled by amount
    pub fn offset(&mut self, amount: f64) -> f64 {
        self.next_f64() * amount
    }
}

/// Tuning for the sketchy look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoughOptions {
    /// 0 draws clean geometry; 1 is the default wobble; 2 is very sketchy.
    pub roughness: f64,
    /// How far lines bow away from straight, relative to their length.
    pub bowing: f64,
    /// Maximum endpoint jitter in document units at roughness 1.
    pub max_randomness_offset: f64,
    /// Draw every outline twice with independent jitter.
    pub multi_stroke: bool,
}

impl Default for RoughOptions {
    fn default() -> Self {
        Self {
            roughness: 1.0,
            bowing: 1.0,
            max_randomness_offset: 2.0,
            multi_stroke: true,
        }
    }
}

impl RoughOptions {
    pub fn with_roughness(self, roughness: f64) -> Self {
        Self {
            roughness: roughness.max(0.0),
            ..self
        }
    }
}

/// Jitter falls off for long lines so they do not look drunk.
fn roughness_gain(length: f64) -> f64 {
    if length < 200.0 {
        1.0
    } else if length > 500.0 {
        0.4
    } else {
        -0.0016668 * length + 1.233334
    }
}

/// Produces sketchy outlines from one seeded random stream.
///
/// The output depends only on the seed, the options and the order of calls.
#[derive(Debug, Clone)]
pub struct RoughGenerator {
    rng: SimpleRng,
    options: RoughOptions,
}

impl RoughGenerator {
    pub fn new(seed: u32, options: RoughOptions) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            options,
        }
    }

    pub fn options(&self) -> &RoughOptions {
        &self.options
    }

    fn is_clean(&self) -> bool {
        self.options.roughness <= 0.0
    }

    fn passes(&self) -> usize {
        if self.options.multi_stroke && !self.is_clean() { 2 } else { 1 }
    }

    /// Uniform offset in `[-x, x]` scaled by roughness and `gain`.
    fn offset_opt(&mut self, x: f64, gain: f64) -> f64 {
        self.options.roughness * gain * self.rng.offset(x)
    }

    fn jitter(&mut self, p: Point, amount: f64, gain: f64) -> Point {
        Point::new(p.x + self.offset_opt(amount, gain), p.y + self.offset_opt(amount, gain))
    }

    /// One rough stroke from `start` to `end`, appended to `path`.
    ///
    /// `overlay` strokes use half the jitter, as the second pass of a double
    /// stroke does.
    fn line_pass(&mut self, path: &mut BezPath, start: Point, end: Point, overlay: bool) {
        let length_sq = (end - start).hypot2();
        let length = length_sq.sqrt();
        let gain = roughness_gain(length);

        let mut offset = self.options.max_randomness_offset;
        if offset * offset * 100.0 > length_sq {
            offset = length / 10.0;
        }
        let offset = if overlay { offset / 2.0 } else { offset };

        let diverge = 0.2 + self.rng.next_unit() * 0.2;
        let bow = self.options.bowing * self.options.max_randomness_offset / 200.0;
        let mid_disp = Vec2::new(
            self.offset_opt(bow * (end.y - start.y), gain),
            self.offset_opt(bow * (start.x - end.x), gain),
        );

        path.move_to(self.jitter(start, offset, gain));
        let delta = end - start;
        let c1 = self.jitter(start + mid_disp + delta * diverge, offset, gain);
        let c2 = self.jitter(start + mid_disp + delta * (2.0 * diverge), offset, gain);
        let to = self.jitter(end, offset, gain);
        path.curve_to(c1, c2, to);
    }

    /// A straight stroke, doubled when multi-stroke is on.
    pub fn line(&mut self, start: Point, end: Point) -> BezPath {
        let mut path = BezPath::new();
        if self.is_clean() {
            path.move_to(start);
            path.line_to(end);
            return path;
        }
        for pass in 0..self.passes() {
            self.line_pass(&mut path, start, end, pass > 0);
        }
        path
    }

    /// A quadratic stroke. The control point moves less than the endpoints.
    pub fn quad(&mut self, quad: QuadBez) -> BezPath {
        let mut path = BezPath::new();
        if self.is_clean() {
            path.move_to(quad.p0);
            path.quad_to(quad.p1, quad.p2);
            return path;
        }
        let length = quad.p0.distance(quad.p2);
        let gain = roughness_gain(length);
        let mut offset = self.options.max_randomness_offset;
        if offset * offset * 100.0 > length * length {
            offset = length / 10.0;
        }
        for pass in 0..self.passes() {
            let amount = if pass > 0 { offset / 2.0 } else { offset };
            path.move_to(self.jitter(quad.p0, amount, gain));
            let control = self.jitter(quad.p1, amount * 0.7, gain);
            let end = self.jitter(quad.p2, amount, gain);
            path.quad_to(control, end);
        }
        path
    }

    /// Stroke a line or quadratic segment.
    pub fn segment(&mut self, seg: PathSeg) -> BezPath {
        match seg {
            PathSeg::Line(line) => self.line(line.p0, line.p1),
            PathSeg::Quad(quad) => self.quad(quad),
            PathSeg::Cubic(cubic) => {
                let mut path = BezPath::new();
                path.move_to(cubic.p0);
                path.curve_to(cubic.p1, cubic.p2, cubic.p3);
                path
            }
        }
    }

    /// Closed polygon outline, each edge its own rough stroke.
    pub fn polygon(&mut self, corners: &[Point]) -> BezPath {
        let mut path = BezPath::new();
        if corners.len() < 2 {
            return path;
        }
        if self.is_clean() {
            path.move_to(corners[0]);
            for corner in &corners[1..] {
                path.line_to(*corner);
            }
            path.close_path();
            return path;
        }
        for i in 0..corners.len() {
            let start = corners[i];
            let end = corners[(i + 1) % corners.len()];
            for pass in 0..self.passes() {
                self.line_pass(&mut path, start, end, pass > 0);
            }
        }
        path
    }

    /// Rectangle outline from `(0,0)` to `(width,height)`.
    pub fn rectangle(&mut self, width: f64, height: f64) -> BezPath {
        self.polygon(&[
            Point::new(0.0, 0.0),
            Point::new(width, 0.0),
            Point::new(width, height),
            Point::new(0.0, height),
        ])
    }

    /// Number of sample points for an ellipse, growing with its size.
    fn ellipse_steps(rx: f64, ry: f64) -> usize {
        const CURVE_STEP_COUNT: f64 = 9.0;
        let psq = (PI * 2.0 * ((rx * rx + ry * ry) / 2.0).sqrt()).sqrt();
        CURVE_STEP_COUNT.max(CURVE_STEP_COUNT / 200f64.sqrt() * psq).ceil() as usize
    }

    /// Ellipse outline centered at `center`.
    ///
    /// Each pass samples the ellipse with a random start angle, jittered
    /// radii and a small overlap past the start, then fits a smooth curve
    /// through the samples.
    pub fn ellipse(&mut self, center: Point, rx: f64, ry: f64) -> BezPath {
        if self.is_clean() {
            return kurbo::Ellipse::new(center, (rx, ry), 0.0).to_path(0.1);
        }
        let steps = Self::ellipse_steps(rx, ry);
        let increment = PI * 2.0 / steps as f64;
        let mut path = BezPath::new();

        for pass in 0..self.passes() {
            let scale = if pass > 0 { 0.5 } else { 1.0 };
            let rx = rx + self.offset_opt(rx * 0.02 * scale, 1.0);
            let ry = ry + self.offset_opt(ry * 0.02 * scale, 1.0);
            let start = self.offset_opt(0.1, 1.0) - PI / 2.0;
            let overlap = increment * (0.05 + self.rng.next_unit() * 0.05) * self.options.roughness;
            let jitter = self.options.max_randomness_offset * 0.5 * scale;

            let mut points = Vec::with_capacity(steps + 3);
            let mut angle = start - increment;
            let end = start + PI * 2.0 + overlap;
            while angle <= end {
                let p = Point::new(center.x + rx * angle.cos(), center.y + ry * angle.sin());
                points.push(self.jitter(p, jitter, 1.0));
                angle += increment;
            }
            let last = Point::new(center.x + rx * end.cos(), center.y + ry * end.sin());
            points.push(self.jitter(last, jitter, 1.0));
            curve_through(&mut path, &points);
        }
        path
    }

    /// Fill path: the outline wobbled at a fraction of the stroke roughness.
    pub fn fill(&mut self, outline: &BezPath) -> BezPath {
        if self.is_clean() {
            return outline.clone();
        }
        let amount = self.options.roughness * 0.3 * self.options.max_randomness_offset;
        let mut result = BezPath::new();
        for el in outline.elements() {
            match *el {
                PathEl::MoveTo(p) => result.move_to(self.jitter(p, amount, 1.0)),
                PathEl::LineTo(p) => result.line_to(self.jitter(p, amount, 1.0)),
                PathEl::QuadTo(p1, p2) => {
                    let p1 = self.jitter(p1, amount * 0.7, 1.0);
                    result.quad_to(p1, self.jitter(p2, amount, 1.0))
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let p1 = self.jitter(p1, amount * 0.5, 1.0);
                    let p2 = self.jitter(p2, amount * 0.5, 1.0);
                    result.curve_to(p1, p2, self.jitter(p3, amount, 1.0))
                }
                PathEl::ClosePath => result.close_path(),
            }
        }
        result
    }
}

/// Append a Catmull-Rom spline through `points` (tightness 0) to `path`.
fn curve_through(path: &mut BezPath, points: &[Point]) {
    if points.len() < 2 {
        return;
    }
    path.move_to(points[0]);
    if points.len() == 2 {
        path.line_to(points[1]);
        return;
    }
    for i in 0..points.len() - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(points.len() - 1)];
        let c1 = p1 + (p2 - p0) / 6.0;
        let c2 = p2 - (p3 - p1) / 6.0;
        path.curve_to(c1, c2, p2);
    }
}
