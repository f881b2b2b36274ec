//! Backend-neutral display list produced for each frame.

use kurbo::{Affine, BezPath, Point, Rect};
use peniko::Color;
use sketchpad_core::ShapeId;
use sketchpad_core::shapes::{FontFamily, TextAlign};

/// A single drawing operation.
///
/// Geometry is in the coordinate space of whatever owns the command: shape
/// local space for [`ShapeDrawing`], document space for frame overlays.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
        /// Dash and gap length.
        dash: Option<[f64; 2]>,
    },
    Fill {
        path: BezPath,
        color: Color,
    },
    /// Plain text, laid out by the host's text engine.
    Text {
        text: String,
        /// Center of the text block.
        anchor: Point,
        max_width: f64,
        font_size: f64,
        font_family: FontFamily,
        align: TextAlign,
        color: Color,
    },
}

impl DrawCommand {
    pub fn stroke(path: BezPath, color: Color, width: f64) -> Self {
        DrawCommand::Stroke {
            path,
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(path: BezPath, color: Color, width: f64, dash: f64) -> Self {
        DrawCommand::Stroke {
            path,
            color,
            width,
            dash: Some([dash, dash]),
        }
    }

    pub fn fill(path: BezPath, color: Color) -> Self {
        DrawCommand::Fill { path, color }
    }

    /// Bounding box of the geometry, `None` for text.
    pub fn bounds(&self) -> Option<Rect> {
        use kurbo::Shape as _;
        match self {
            DrawCommand::Stroke { path, .. } | DrawCommand::Fill { path, .. } => {
                Some(path.bounding_box())
            }
            DrawCommand::Text { .. } => None,
        }
    }
}

/// Everything drawn for one shape.
#[derive(Debug, Clone)]
pub struct ShapeDrawing {
    pub shape_id: ShapeId,
    /// Shape local space to document space.
    pub transform: Affine,
    pub commands: Vec<DrawCommand>,
}

impl ShapeDrawing {
    /// Stroke paths in drawing order.
    pub fn stroke_paths(&self) -> impl Iterator<Item = &BezPath> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Stroke { path, .. } => Some(path),
            _ => None,
        })
    }

    /// Text commands, at most one per shape.
    pub fn text(&self) -> Option<&str> {
        self.commands.iter().find_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A complete frame, ready for a backend to encode.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Document space to screen space.
    pub view_transform: Affine,
    pub background: Color,
    /// Shapes in z-order, bottom first.
    pub shapes: Vec<ShapeDrawing>,
    /// Selection outlines, handles and the marquee, in document space.
    pub overlay: Vec<DrawCommand>,
    /// Shapes that could not be drawn this frame.
    pub skipped: Vec<ShapeId>,
}

impl Frame {
    pub fn shape(&self, id: ShapeId) -> Option<&ShapeDrawing> {
        self.shapes.iter().find(|drawing| drawing.shape_id == id)
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(|drawing| drawing.shape_id).collect()
    }
}
