//! Tool selection and the in-progress drawing state.

use crate::camera::normalize_rect;
use crate::shapes::{LinePath, Shape, ShapeKind, ShapeStyle, TextFormat};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Hand,
    Rectangle,
    Ellipse,
    Line,
    Arrow,
}

impl ToolKind {
    /// Whether pointer-down with this tool starts drawing a shape.
    pub fn is_drawing_tool(self) -> bool {
        matches!(
            self,
            ToolKind::Rectangle | ToolKind::Ellipse | ToolKind::Line | ToolKind::Arrow
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Hand => "Hand",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Ellipse => "Ellipse",
            ToolKind::Line => "Line",
            ToolKind::Arrow => "Arrow",
        }
    }
}

/// A shape being drawn between pointer-down and pointer-up.
#[derive(Debug, Clone)]
pub struct DrawingState {
    /// Document point where the drag started.
    pub start: Point,
    /// Preview of the shape, already normalized.
    pub shape: Shape,
}

impl DrawingState {
    /// Start drawing with `tool` at `start`. Returns `None` for tools that
    /// do not draw.
    ///
    /// The shape starts at zero size; lines and arrows get `[0,0,0,0]` points.
    pub fn begin(tool: ToolKind, start: Point, style: &ShapeStyle, font: &TextFormat) -> Option<Self> {
        let kind = match tool {
            ToolKind::Rectangle => ShapeKind::Rectangle,
            ToolKind::Ellipse => ShapeKind::Ellipse,
            ToolKind::Line => ShapeKind::Line(LinePath::straight(Point::ZERO, Point::ZERO)),
            ToolKind::Arrow => ShapeKind::Arrow(LinePath::straight(Point::ZERO, Point::ZERO)),
            ToolKind::Select | ToolKind::Hand => return None,
        };
        let shape = Shape::new(kind, start, 0.0, 0.0)
            .with_style(style.clone())
            .with_font(*font);
        Some(Self { start, shape })
    }

    /// Update the preview for the current pointer position.
    pub fn update(&mut self, current: Point) {
        let start = self.start;
        let rect = normalize_rect(start.x, start.y, current.x - start.x, current.y - start.y);
        self.shape.position = rect.origin();
        self.shape.width = rect.width();
        self.shape.height = rect.height();
        if let ShapeKind::Line(path) | ShapeKind::Arrow(path) = &mut self.shape.kind {
            let origin = rect.origin().to_vec2();
            *path = LinePath::straight(start - origin, current - origin);
        }
    }

    /// Finish drawing. Returns the shape unless it is no larger than
    /// `min_size` on both axes, which is treated as a click.
    pub fn finish(self, min_size: f64) -> Option<Shape> {
        if self.shape.width <= min_size && self.shape.height <= min_size {
            log::debug!("Discarding {} smaller than {min_size}", self.shape.tag());
            return None;
        }
        Some(self.shape)
    }
}
