//! Flat, serde-facing shape representation and its validation.
//!
//! Every variant shares one record layout with a `type` tag. Converting a
//! record into a [`Shape`] checks the tag and the `points` array, and rejects
//! the record as a whole if either is malformed.

use super::{LinePath, Shape, ShapeId, ShapeKind, ShapeStyle, TextFormat};
use super::{FontFamily, SerializableColor, TextAlign};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structural errors raised when building a shape from untyped data.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("Unknown shape type: {0}")]
    UnknownKind(String),
    #[error("{kind} expects 4 or 6 point coordinates, got {len}")]
    InvalidPoints { kind: String, len: usize },
    #[error("{0} shape is missing its points")]
    MissingPoints(String),
    #[error("{0} shape does not take points")]
    UnexpectedPoints(String),
    #[error("Non-finite value in field {0}")]
    NonFinite(&'static str),
}

/// Untyped record mirroring the persisted/clipboard form of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub id: ShapeId,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub fill: Option<SerializableColor>,
    pub stroke: SerializableColor,
    pub stroke_width: f64,
    pub roughness: f64,
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub font_family: FontFamily,
    #[serde(default)]
    pub text_align: TextAlign,
}

fn default_font_size() -> f64 {
    TextFormat::default().font_size
}

impl From<Shape> for ShapeRecord {
    fn from(shape: Shape) -> Self {
        Self {
            id: shape.id,
            kind: shape.tag().to_string(),
            x: shape.position.x,
            y: shape.position.y,
            width: shape.width,
            height: shape.height,
            fill: shape.style.fill_color,
            stroke: shape.style.stroke_color,
            stroke_width: shape.style.stroke_width,
            roughness: shape.style.roughness,
            rotation: shape.rotation,
            points: shape.kind.path().map(LinePath::to_flat),
            text: shape.text,
            font_size: shape.font.font_size,
            font_family: shape.font.font_family,
            text_align: shape.font.text_align,
        }
    }
}

impl TryFrom<ShapeRecord> for Shape {
    type Error = ShapeError;

    fn try_from(record: ShapeRecord) -> Result<Self, Self::Error> {
        let path = || -> Result<LinePath, ShapeError> {
            let points = record
                .points
                .as_deref()
                .ok_or_else(|| ShapeError::MissingPoints(record.kind.clone()))?;
            if points.iter().any(|v| !v.is_finite()) {
                return Err(ShapeError::NonFinite("points"));
            }
            LinePath::from_flat(points).ok_or_else(|| ShapeError::InvalidPoints {
                kind: record.kind.clone(),
                len: points.len(),
            })
        };

        let kind = match record.kind.as_str() {
            "rectangle" => ShapeKind::Rectangle,
            "ellipse" => ShapeKind::Ellipse,
            "text" => ShapeKind::Text,
            "line" => ShapeKind::Line(path()?),
            "arrow" => ShapeKind::Arrow(path()?),
            other => return Err(ShapeError::UnknownKind(other.to_string())),
        };
        if kind.path().is_none() && record.points.is_some() {
            return Err(ShapeError::UnexpectedPoints(record.kind.clone()));
        }

        for (name, value) in [
            ("x", record.x),
            ("y", record.y),
            ("width", record.width),
            ("height", record.height),
            ("rotation", record.rotation),
            ("strokeWidth", record.stroke_width),
            ("roughness", record.roughness),
        ] {
            if !value.is_finite() {
                return Err(ShapeError::NonFinite(name));
            }
        }

        // Records written by older clients may carry negative extents.
        let bounds = crate::camera::normalize_rect(record.x, record.y, record.width, record.height);
        Ok(Shape {
            id: record.id,
            kind,
            position: Point::new(bounds.x0, bounds.y0),
            width: bounds.width(),
            height: bounds.height(),
            rotation: record.rotation,
            style: ShapeStyle {
                stroke_color: record.stroke,
                stroke_width: record.stroke_width,
                fill_color: record.fill,
                roughness: record.roughness,
            },
            text: record.text,
            font: TextFormat {
                font_size: record.font_size,
                font_family: record.font_family,
                text_align: record.text_align,
            },
        })
    }
}
