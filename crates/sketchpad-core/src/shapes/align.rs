//! Alignment of several shapes to a common edge or center line.

use super::Shape;
use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Alignment target for a multi-shape selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignType {
    Left,
    CenterHorizontal,
    Right,
    Top,
    MiddleVertical,
    Bottom,
}

/// Offsets that move each shape onto the common alignment line.
///
/// The line is derived from the union of the shapes' normalized bounding
/// boxes. Returns one offset per input shape, or an empty vector when fewer
/// than two shapes are given.
pub fn alignment_offsets(shapes: &[&Shape], align: AlignType) -> Vec<Vec2> {
    if shapes.len() < 2 {
        return Vec::new();
    }
    let boxes: Vec<_> = shapes.iter().map(|s| s.bounds()).collect();
    let min_x = boxes.iter().map(|b| b.x0).fold(f64::INFINITY, f64::min);
    let max_x = boxes.iter().map(|b| b.x1).fold(f64::NEG_INFINITY, f64::max);
    let min_y = boxes.iter().map(|b| b.y0).fold(f64::INFINITY, f64::min);
    let max_y = boxes.iter().map(|b| b.y1).fold(f64::NEG_INFINITY, f64::max);
    let mid_x = (min_x + max_x) / 2.0;
    let mid_y = (min_y + max_y) / 2.0;

    boxes
        .iter()
        .map(|b| match align {
            AlignType::Left => Vec2::new(min_x - b.x0, 0.0),
            AlignType::CenterHorizontal => Vec2::new(mid_x - b.center().x, 0.0),
            AlignType::Right => Vec2::new(max_x - b.x1, 0.0),
            AlignType::Top => Vec2::new(0.0, min_y - b.y0),
            AlignType::MiddleVertical => Vec2::new(0.0, mid_y - b.center().y),
            AlignType::Bottom => Vec2::new(0.0, max_y - b.y1),
        })
        .collect()
}
