//! Shape definitions for the canvas.

mod align;
mod path;
mod record;
mod style;

pub use align::{AlignType, alignment_offsets};
pub use path::LinePath;
pub use record::{ShapeError, ShapeRecord};
pub use style::{FontFamily, SerializableColor, ShapeStyle, Sloppiness, TextAlign, TextFormat};

use crate::camera::normalize_rect;
use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Variant-specific part of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
    /// Points are relative to the shape's position.
    Line(LinePath),
    /// Points are relative to the shape's position.
    Arrow(LinePath),
    Text,
}

impl ShapeKind {
    /// Type tag used in the serialized form.
    pub fn tag(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Line(_) => "line",
            ShapeKind::Arrow(_) => "arrow",
            ShapeKind::Text => "text",
        }
    }

    /// Path of a line or arrow.
    pub fn path(&self) -> Option<&LinePath> {
        match self {
            ShapeKind::Line(path) | ShapeKind::Arrow(path) => Some(path),
            _ => None,
        }
    }

    fn path_mut(&mut self) -> Option<&mut LinePath> {
        match self {
            ShapeKind::Line(path) | ShapeKind::Arrow(path) => Some(path),
            _ => None,
        }
    }
}

/// A drawable shape.
///
/// `position` is the top-left of the bounding box in document space and
/// `width`/`height` are never negative. Line and arrow points are stored
/// relative to `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ShapeRecord", into = "ShapeRecord")]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees about the bounding box center.
    pub rotation: f64,
    pub style: ShapeStyle,
    /// Label text; the content of a text shape.
    pub text: Option<String>,
    pub font: TextFormat,
}

impl Shape {
    /// Create a shape of the given kind with a fresh id.
    pub fn new(kind: ShapeKind, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            position,
            width: width.max(0.0),
            height: height.max(0.0),
            rotation: 0.0,
            style: ShapeStyle::default(),
            text: None,
            font: TextFormat::default(),
        }
    }

    /// Rectangle covering `rect`.
    pub fn rectangle(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(ShapeKind::Rectangle, rect.origin(), rect.width(), rect.height())
    }

    /// Ellipse inscribed in `rect`.
    pub fn ellipse(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(ShapeKind::Ellipse, rect.origin(), rect.width(), rect.height())
    }

    /// Straight line between two document points.
    pub fn line(start: Point, end: Point) -> Self {
        Self::from_absolute_path(LinePath::straight(start, end), false)
    }

    /// Straight arrow between two document points.
    pub fn arrow(start: Point, end: Point) -> Self {
        Self::from_absolute_path(LinePath::straight(start, end), true)
    }

    /// Text shape at `position`.
    pub fn text_box(position: Point, width: f64, content: impl Into<String>) -> Self {
        let mut shape = Self::new(ShapeKind::Text, position, width, 0.0);
        shape.height = shape.font.font_size * 1.25;
        shape.text = Some(content.into());
        shape
    }

    /// Build a line or arrow from a path in document coordinates.
    pub fn from_absolute_path(path: LinePath, arrow: bool) -> Self {
        let kind = if arrow {
            ShapeKind::Arrow(path)
        } else {
            ShapeKind::Line(path)
        };
        let mut shape = Self::new(kind, Point::ZERO, 0.0, 0.0);
        shape.normalize_path();
        shape
    }

    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_font(mut self, font: TextFormat) -> Self {
        self.font = font;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Type tag of the shape.
    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn is_linear(&self) -> bool {
        self.kind.path().is_some()
    }

    /// Axis-aligned bounding box, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        normalize_rect(self.position.x, self.position.y, self.width, self.height)
    }

    /// Document-space center: box center for filled shapes, midpoint of the
    /// points for lines and arrows.
    pub fn center(&self) -> Point {
        match self.kind.path() {
            Some(path) => self.position + path.midpoint_handle().to_vec2(),
            None => self.bounds().center(),
        }
    }

    /// Path of a line or arrow in document coordinates.
    pub fn absolute_path(&self) -> Option<LinePath> {
        self.kind.path().map(|path| {
            let mut path = *path;
            path.translate(self.position.to_vec2());
            path
        })
    }

    /// Transform from shape-local coordinates (origin at `position`) to document space.
    pub fn transform(&self) -> Affine {
        if self.rotation == 0.0 || self.is_linear() {
            return Affine::translate(self.position.to_vec2());
        }
        let center = Vec2::new(self.width / 2.0, self.height / 2.0);
        Affine::translate(self.position.to_vec2() + center)
            * Affine::rotate(self.rotation.to_radians())
            * Affine::translate(-center)
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Copy with a fresh id, offset by `delta`.
    pub fn duplicate(&self, delta: Vec2) -> Shape {
        let mut copy = self.clone();
        copy.id = Uuid::new_v4();
        copy.translate(delta);
        copy
    }

    /// Hit test in document space. `tolerance` is in document units.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if let Some(path) = self.kind.path() {
            return path.distance_to(point - self.position.to_vec2())
                <= tolerance + self.style.stroke_width / 2.0;
        }
        let local = self.transform().inverse() * point;
        let rect = Rect::new(0.0, 0.0, self.width, self.height).inflate(tolerance, tolerance);
        match self.kind {
            ShapeKind::Ellipse => {
                let rx = rect.width() / 2.0;
                let ry = rect.height() / 2.0;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let c = rect.center();
                let nx = (local.x - c.x) / rx;
                let ny = (local.y - c.y) / ry;
                nx * nx + ny * ny <= 1.0
            }
            _ => rect.contains(local),
        }
    }

    /// Re-derive position and size from the path so the bounding box is the
    /// tight box around the path's points and the points are relative to it.
    pub fn normalize_path(&mut self) {
        let origin = self.position.to_vec2();
        let Some(path) = self.kind.path_mut() else {
            return;
        };
        path.translate(origin);
        let bounds = path.bounds();
        path.translate(-bounds.origin().to_vec2());
        self.position = bounds.origin();
        self.width = bounds.width();
        self.height = bounds.height();
    }

    /// Replace the path of a line or arrow with one in document coordinates.
    pub fn set_absolute_path(&mut self, path: LinePath) {
        let origin = self.position.to_vec2();
        if let Some(current) = self.kind.path_mut() {
            let mut relative = path;
            relative.translate(-origin);
            *current = relative;
            self.normalize_path();
        }
    }

    /// Apply a partial update. Returns true if anything changed.
    pub fn apply(&mut self, update: &ShapeUpdate) -> bool {
        let before = self.clone();
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(width) = update.width {
            self.width = width;
        }
        if let Some(height) = update.height {
            self.height = height;
        }
        if self.width < 0.0 || self.height < 0.0 {
            let rect = self.bounds();
            self.position = rect.origin();
            self.width = rect.width();
            self.height = rect.height();
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(fill) = update.fill_color {
            self.style.fill_color = fill;
        }
        if let Some(stroke) = update.stroke_color {
            self.style.stroke_color = stroke;
        }
        if let Some(width) = update.stroke_width {
            self.style.stroke_width = width;
        }
        if let Some(roughness) = update.roughness {
            self.style.roughness = roughness;
        }
        if let Some(text) = &update.text {
            self.text = text.clone();
        }
        if let Some(font_size) = update.font_size {
            self.font.font_size = font_size;
        }
        if let Some(font_family) = update.font_family {
            self.font.font_family = font_family;
        }
        if let Some(text_align) = update.text_align {
            self.font.text_align = text_align;
        }
        if let Some(path) = update.path {
            match self.kind.path_mut() {
                Some(current) => *current = path,
                None => log::debug!("Ignoring path update on {} shape {}", self.tag(), self.id),
            }
        }
        *self != before
    }

    pub fn is_finite(&self) -> bool {
        let path_finite = self.kind.path().is_none_or(|p| p.is_finite());
        self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.rotation.is_finite()
            && path_finite
    }
}

/// Partial update applied by [`Shape::apply`]. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeUpdate {
    pub position: Option<Point>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub fill_color: Option<Option<SerializableColor>>,
    pub stroke_color: Option<SerializableColor>,
    pub stroke_width: Option<f64>,
    pub roughness: Option<f64>,
    pub text: Option<Option<String>>,
    pub font_size: Option<f64>,
    pub font_family: Option<FontFamily>,
    pub text_align: Option<TextAlign>,
    /// Relative path for a line or arrow.
    pub path: Option<LinePath>,
}

impl ShapeUpdate {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn text(text: Option<String>) -> Self {
        Self {
            text: Some(text),
            ..Default::default()
        }
    }

    pub fn stroke_color(color: SerializableColor) -> Self {
        Self {
            stroke_color: Some(color),
            ..Default::default()
        }
    }

    /// Update carrying the geometry of `shape`.
    pub fn geometry_of(shape: &Shape) -> Self {
        Self {
            position: Some(shape.position),
            width: Some(shape.width),
            height: Some(shape.height),
            rotation: Some(shape.rotation),
            path: shape.kind.path().copied(),
            ..Default::default()
        }
    }
}
