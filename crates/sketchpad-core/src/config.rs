//! Tunable constants for interaction and layout.

use crate::camera::{DEFAULT_WHEEL_SENSITIVITY, MAX_ZOOM, MIN_ZOOM};
use serde::{Deserialize, Serialize};

/// Canvas configuration.
///
/// Distances marked "screen px" are divided by the zoom factor before being
/// compared against document coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Wheel delta to zoom factor scale.
    pub wheel_zoom_sensitivity: f64,
    /// Linear step used by the zoom buttons.
    pub zoom_step: f64,
    /// Draws no larger than this on both axes are discarded.
    pub min_draw_size: f64,
    /// Resizes may not shrink a shape below this.
    pub min_transform_size: f64,
    pub rotation_snap_degrees: f64,
    pub rotation_snap_tolerance: f64,
    pub duplicate_offset: f64,
    pub paste_offset: f64,
    /// Shape hit tolerance (screen px).
    pub hit_tolerance: f64,
    /// Handle hit tolerance (screen px).
    pub handle_hit_tolerance: f64,
    /// Distance of the rotate handle above the shape (screen px).
    pub rotate_handle_offset: f64,
    /// Gap left in a line's stroke for its label.
    pub label_gap: f64,
    /// Editor width used for line and arrow labels.
    pub label_width: f64,
    pub double_click_ms: u64,
    /// Pointer travel (screen px) within which two clicks count as a double click.
    pub double_click_distance: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_zoom_sensitivity: DEFAULT_WHEEL_SENSITIVITY,
            zoom_step: 0.1,
            min_draw_size: 5.0,
            min_transform_size: 10.0,
            rotation_snap_degrees: 45.0,
            rotation_snap_tolerance: 5.0,
            duplicate_offset: 10.0,
            paste_offset: 20.0,
            hit_tolerance: 5.0,
            handle_hit_tolerance: 10.0,
            rotate_handle_offset: 25.0,
            label_gap: 60.0,
            label_width: 200.0,
            double_click_ms: 500,
            double_click_distance: 5.0,
        }
    }
}

impl CanvasConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
