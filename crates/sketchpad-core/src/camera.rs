//! Viewport module for pan/zoom transforms.
//!
//! The viewport stores the document point shown at the center of the visible
//! area together with a zoom factor. Every screen/document conversion in the
//! crate goes through the free functions in this module.

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Minimum allowed zoom factor.
pub const MIN_ZOOM: f64 = 0.1;
/// Maximum allowed zoom factor.
pub const MAX_ZOOM: f64 = 5.0;
/// Default wheel sensitivity: one unit of wheel delta changes zoom by 0.1%.
pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.001;

/// Viewport describing the screen <-> document mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Document x coordinate rendered at the center of the view.
    pub x: f64,
    /// Document y coordinate rendered at the center of the view.
    pub y: f64,
    /// Zoom factor, always within `[MIN_ZOOM, MAX_ZOOM]`.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Create a viewport, clamping the zoom factor.
    pub fn new(x: f64, y: f64, zoom: f64) -> Self {
        Self {
            x,
            y,
            zoom: clamp_zoom(zoom, MIN_ZOOM, MAX_ZOOM),
        }
    }

    /// Document point shown at the center of the view.
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts document coordinates to screen coordinates.
    pub fn transform(&self, view_size: Size) -> Affine {
        Affine::translate(Vec2::new(view_size.width / 2.0, view_size.height / 2.0))
            * Affine::scale(self.zoom)
            * Affine::translate(-self.center().to_vec2())
    }

    /// Get the inverse transform for input handling.
    pub fn inverse_transform(&self, view_size: Size) -> Affine {
        self.transform(view_size).inverse()
    }

    /// Pan by a delta in screen pixels.
    ///
    /// Dragging the content right moves the view center left, so the
    /// document-space shift is the negated screen delta divided by zoom.
    pub fn pan_by_screen_delta(&mut self, delta: Vec2) {
        self.x -= delta.x / self.zoom;
        self.y -= delta.y / self.zoom;
    }

    /// Scroll the view by a wheel delta in screen pixels.
    pub fn scroll(&mut self, delta: Vec2) {
        self.x += delta.x / self.zoom;
        self.y += delta.y / self.zoom;
    }

    /// Step the zoom linearly, clamped to the allowed range.
    pub fn step_zoom(&mut self, step: f64) {
        self.zoom = clamp_zoom(self.zoom + step, MIN_ZOOM, MAX_ZOOM);
    }

    /// Reset zoom to 100%, keeping the current center.
    pub fn reset_zoom(&mut self) {
        self.zoom = 1.0;
    }

    /// Visible document-space rectangle for the given view size.
    pub fn visible_rect(&self, view_size: Size) -> Rect {
        let top_left = screen_to_document(Point::ZERO, self, view_size);
        let bottom_right =
            screen_to_document(Point::new(view_size.width, view_size.height), self, view_size);
        Rect::from_points(top_left, bottom_right)
    }
}

pub(crate) fn clamp_zoom(zoom: f64, min_zoom: f64, max_zoom: f64) -> f64 {
    if zoom.is_nan() {
        return 1.0_f64.clamp(min_zoom, max_zoom);
    }
    zoom.clamp(min_zoom, max_zoom)
}

/// Convert a screen point to document coordinates.
pub fn screen_to_document(screen: Point, viewport: &Viewport, view_size: Size) -> Point {
    Point::new(
        (screen.x - view_size.width / 2.0) / viewport.zoom + viewport.x,
        (screen.y - view_size.height / 2.0) / viewport.zoom + viewport.y,
    )
}

/// Convert a document point to screen coordinates. Exact inverse of
/// [`screen_to_document`].
pub fn document_to_screen(document: Point, viewport: &Viewport, view_size: Size) -> Point {
    Point::new(
        (document.x - viewport.x) * viewport.zoom + view_size.width / 2.0,
        (document.y - viewport.y) * viewport.zoom + view_size.height / 2.0,
    )
}

/// Compute the viewport after a wheel zoom anchored at `pointer`.
///
/// The document point under `pointer` before the change stays under it
/// afterwards. `sensitivity` scales the wheel delta; a negative delta zooms in.
pub fn zoom_at_point(
    pointer: Point,
    viewport: &Viewport,
    wheel_delta: f64,
    view_size: Size,
    sensitivity: f64,
    min_zoom: f64,
    max_zoom: f64,
) -> Viewport {
    let new_zoom = clamp_zoom(viewport.zoom * (1.0 - wheel_delta * sensitivity), min_zoom, max_zoom);
    if (new_zoom - viewport.zoom).abs() < f64::EPSILON {
        return *viewport;
    }

    let anchor = screen_to_document(pointer, viewport, view_size);
    Viewport {
        x: anchor.x - (pointer.x - view_size.width / 2.0) / new_zoom,
        y: anchor.y - (pointer.y - view_size.height / 2.0) / new_zoom,
        zoom: new_zoom,
    }
}

/// Normalize a rectangle so that width and height are non-negative.
pub fn normalize_rect(x: f64, y: f64, width: f64, height: f64) -> Rect {
    let (x0, x1) = if width < 0.0 { (x + width, x) } else { (x, x + width) };
    let (y0, y1) = if height < 0.0 { (y + height, y) } else { (y, y + height) };
    Rect::new(x0, y0, x1, y1)
}
