//! Scene store: the single owner of shapes, selection, viewport and defaults.
//!
//! Every mutation goes through a method on [`Scene`] and is recorded in a
//! change journal. Readers (the renderer, preference persistence) pull the
//! journal with [`Scene::drain_changes`] instead of holding references into
//! the scene.

use crate::camera::{self, Viewport};
use crate::config::CanvasConfig;
use crate::shapes::{
    AlignType, FontFamily, SerializableColor, Shape, ShapeId, ShapeStyle, ShapeUpdate, TextAlign,
    TextFormat, alignment_offsets,
};
use crate::theme::Theme;
use crate::tools::ToolKind;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One entry in the change journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneChange {
    ShapeAdded(ShapeId),
    ShapeUpdated(ShapeId),
    ShapeRemoved(ShapeId),
    /// Z-order changed without adding or removing shapes.
    OrderChanged,
    /// The shape list was replaced wholesale.
    ShapesReplaced,
    SelectionChanged,
    ViewportChanged,
    ToolChanged,
    /// Style defaults or theme changed.
    PreferencesChanged,
}

/// The persisted subset of scene state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub style: ShapeStyle,
    pub font: TextFormat,
    pub theme: Theme,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            style: ShapeStyle::default(),
            font: TextFormat::default(),
            theme: Theme::default(),
        }
    }
}

/// State a toolbar reflects as enabled/disabled/active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolbarState {
    pub tool: ToolKind,
    pub zoom: f64,
    pub selection_count: usize,
    pub theme: Theme,
}

/// The scene store.
///
/// Mutations append to an in-memory change journal that only
/// [`Scene::drain_changes`] empties. Hosts must drain it once per frame (and
/// hand the changes to the renderer and preferences sync), otherwise it keeps
/// growing for the life of the scene.
#[derive(Debug, Clone)]
pub struct Scene {
    config: CanvasConfig,
    tool: ToolKind,
    /// Shapes back to front.
    shapes: Vec<Shape>,
    selection: HashSet<ShapeId>,
    viewport: Viewport,
    clipboard: Vec<Shape>,
    style: ShapeStyle,
    font: TextFormat,
    theme: Theme,
    changes: Vec<SceneChange>,
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(CanvasConfig::default())
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            tool: ToolKind::default(),
            shapes: Vec::new(),
            selection: HashSet::new(),
            viewport: Viewport::default(),
            clipboard: Vec::new(),
            style: ShapeStyle::default(),
            font: TextFormat::default(),
            theme: Theme::default(),
            changes: Vec::new(),
            revision: 0,
        }
    }

    fn record(&mut self, change: SceneChange) {
        self.revision += 1;
        self.changes.push(change);
    }

    /// Take all changes recorded since the last call.
    pub fn drain_changes(&mut self) -> Vec<SceneChange> {
        std::mem::take(&mut self.changes)
    }

    /// Monotonic counter bumped by every recorded change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    // --- shapes ---

    /// Shapes in z-order, back to front.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Add a shape on top of the stack.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id;
        log::info!("Added {} {id}", shape.tag());
        self.shapes.push(shape);
        self.record(SceneChange::ShapeAdded(id));
        id
    }

    /// Apply a partial update. Returns false if the shape does not exist or
    /// nothing changed.
    pub fn update_shape(&mut self, id: ShapeId, update: &ShapeUpdate) -> bool {
        let Some(index) = self.index_of(id) else {
            log::debug!("update_shape: no shape {id}");
            return false;
        };
        let changed = self.shapes[index].apply(update);
        if changed {
            self.record(SceneChange::ShapeUpdated(id));
        }
        changed
    }

    /// Remove a shape and drop it from the selection.
    pub fn delete_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        let shape = self.shapes.remove(index);
        log::info!("Deleted {} {id}", shape.tag());
        self.record(SceneChange::ShapeRemoved(id));
        if self.selection.remove(&id) {
            self.record(SceneChange::SelectionChanged);
        }
        Some(shape)
    }

    /// Delete every selected shape. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selected_in_order();
        ids.into_iter().filter_map(|id| self.delete_shape(id)).count()
    }

    /// Replace the whole shape list. The selection is pruned to ids that
    /// still exist.
    pub fn set_shapes(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.record(SceneChange::ShapesReplaced);
        let before = self.selection.len();
        let existing: HashSet<ShapeId> = self.shapes.iter().map(|s| s.id).collect();
        self.selection.retain(|id| existing.contains(id));
        if self.selection.len() != before {
            self.record(SceneChange::SelectionChanged);
        }
    }

    /// Topmost shape under a document point. `tolerance` is in screen pixels.
    pub fn shape_at_point(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        let tolerance = tolerance / self.viewport.zoom;
        self.shapes
            .iter()
            .rev()
            .find(|s| s.hit_test(point, tolerance))
            .map(|s| s.id)
    }

    /// Shapes whose normalized bounding box overlaps `rect`, in z-order.
    pub fn shapes_in_rect(&self, rect: Rect) -> Vec<ShapeId> {
        let rect = rect.abs();
        self.shapes
            .iter()
            .filter(|s| {
                let b = s.bounds();
                !(b.x1 < rect.x0 || b.x0 > rect.x1 || b.y1 < rect.y0 || b.y0 > rect.y1)
            })
            .map(|s| s.id)
            .collect()
    }

    // --- selection ---

    pub fn selected_ids(&self) -> &HashSet<ShapeId> {
        &self.selection
    }

    /// Selected ids in z-order.
    pub fn selected_in_order(&self) -> Vec<ShapeId> {
        self.shapes
            .iter()
            .filter(|s| self.selection.contains(&s.id))
            .map(|s| s.id)
            .collect()
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    /// Replace the selection. Unknown ids are ignored.
    pub fn set_selected(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        let selection: HashSet<ShapeId> = ids
            .into_iter()
            .filter(|id| self.index_of(*id).is_some())
            .collect();
        if selection != self.selection {
            self.selection = selection;
            self.record(SceneChange::SelectionChanged);
        }
    }

    /// Add to or remove from the selection.
    pub fn toggle_selected(&mut self, id: ShapeId) {
        if !self.selection.remove(&id) {
            if self.index_of(id).is_none() {
                return;
            }
            self.selection.insert(id);
        }
        self.record(SceneChange::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.record(SceneChange::SelectionChanged);
        }
    }

    pub fn select_all(&mut self) {
        let all: Vec<ShapeId> = self.shapes.iter().map(|s| s.id).collect();
        self.set_selected(all);
    }

    // --- clipboard and duplication ---

    fn insert_copies(&mut self, originals: Vec<Shape>, offset: f64) -> Vec<ShapeId> {
        let delta = Vec2::new(offset, offset);
        let ids: Vec<ShapeId> = originals
            .iter()
            .map(|shape| self.add_shape(shape.duplicate(delta)))
            .collect();
        self.set_selected(ids.iter().copied());
        ids
    }

    /// Clone shapes with fresh ids at a fixed offset and select the clones.
    pub fn duplicate_shapes(&mut self, ids: &[ShapeId]) -> Vec<ShapeId> {
        let originals: Vec<Shape> = self
            .shapes
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect();
        if originals.is_empty() {
            return Vec::new();
        }
        let offset = self.config.duplicate_offset;
        self.insert_copies(originals, offset)
    }

    /// Snapshot shapes into the clipboard.
    pub fn copy_shapes(&mut self, ids: &[ShapeId]) {
        self.clipboard = self
            .shapes
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect();
        log::debug!("Copied {} shapes", self.clipboard.len());
    }

    /// Insert the clipboard contents at an offset and select them.
    pub fn paste_shapes(&mut self) -> Vec<ShapeId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let offset = self.config.paste_offset;
        self.insert_copies(self.clipboard.clone(), offset)
    }

    pub fn clipboard(&self) -> &[Shape] {
        &self.clipboard
    }

    /// Clipboard contents as JSON, for the host's system clipboard.
    pub fn clipboard_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.clipboard)
    }

    /// Replace the clipboard from JSON. Malformed shapes reject the whole payload.
    pub fn set_clipboard_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        self.clipboard = serde_json::from_str(json)?;
        Ok(())
    }

    // --- z-order ---

    /// Move shapes to the top, keeping relative order in both groups.
    pub fn bring_to_front(&mut self, ids: &[ShapeId]) {
        let (moved, rest): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.shapes).into_iter().partition(|s| ids.contains(&s.id));
        let changed = !moved.is_empty();
        self.shapes = rest;
        self.shapes.extend(moved);
        if changed {
            self.record(SceneChange::OrderChanged);
        }
    }

    /// Move shapes to the bottom, keeping relative order in both groups.
    pub fn send_to_back(&mut self, ids: &[ShapeId]) {
        let (mut moved, rest): (Vec<Shape>, Vec<Shape>) =
            std::mem::take(&mut self.shapes).into_iter().partition(|s| ids.contains(&s.id));
        let changed = !moved.is_empty();
        moved.extend(rest);
        self.shapes = moved;
        if changed {
            self.record(SceneChange::OrderChanged);
        }
    }

    // --- alignment ---

    /// Align shapes to a common edge or center line. Needs at least two shapes.
    pub fn align_shapes(&mut self, ids: &[ShapeId], align: AlignType) {
        let targets: Vec<&Shape> = self.shapes.iter().filter(|s| ids.contains(&s.id)).collect();
        let offsets = alignment_offsets(&targets, align);
        let moves: Vec<(ShapeId, Point)> = targets
            .iter()
            .zip(offsets)
            .map(|(s, offset)| (s.id, s.position + offset))
            .collect();
        for (id, position) in moves {
            self.update_shape(id, &ShapeUpdate::position(position));
        }
    }

    // --- viewport ---

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        let viewport = Viewport {
            zoom: camera::clamp_zoom(viewport.zoom, self.config.min_zoom, self.config.max_zoom),
            ..viewport
        };
        if viewport != self.viewport {
            self.viewport = viewport;
            self.record(SceneChange::ViewportChanged);
        }
    }

    /// Pan by a screen-pixel drag delta.
    pub fn pan_by(&mut self, screen_delta: Vec2) {
        let mut viewport = self.viewport;
        viewport.pan_by_screen_delta(screen_delta);
        self.set_viewport(viewport);
    }

    /// Scroll by a wheel delta in screen pixels.
    pub fn scroll_by(&mut self, wheel_delta: Vec2) {
        let mut viewport = self.viewport;
        viewport.scroll(wheel_delta);
        self.set_viewport(viewport);
    }

    /// Pointer-anchored wheel zoom.
    pub fn zoom_at_point(&mut self, pointer: Point, wheel_delta: f64, view_size: Size) {
        let viewport = camera::zoom_at_point(
            pointer,
            &self.viewport,
            wheel_delta,
            view_size,
            self.config.wheel_zoom_sensitivity,
            self.config.min_zoom,
            self.config.max_zoom,
        );
        self.set_viewport(viewport);
    }

    pub fn zoom_in(&mut self) {
        self.step_zoom(self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.step_zoom(-self.config.zoom_step);
    }

    fn step_zoom(&mut self, step: f64) {
        let mut viewport = self.viewport;
        viewport.zoom += step;
        self.set_viewport(viewport);
    }

    pub fn reset_zoom(&mut self) {
        let mut viewport = self.viewport;
        viewport.reset_zoom();
        self.set_viewport(viewport);
    }

    // --- tool ---

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool != self.tool {
            log::debug!("Tool: {}", tool.name());
            self.tool = tool;
            self.record(SceneChange::ToolChanged);
        }
    }

    // --- style defaults ---

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn font(&self) -> &TextFormat {
        &self.font
    }

    /// Update the defaults and every selected shape.
    fn apply_style(&mut self, update: ShapeUpdate, apply_default: impl FnOnce(&mut ShapeStyle, &mut TextFormat)) {
        apply_default(&mut self.style, &mut self.font);
        self.record(SceneChange::PreferencesChanged);
        for id in self.selected_in_order() {
            self.update_shape(id, &update);
        }
    }

    pub fn set_fill_color(&mut self, color: Option<SerializableColor>) {
        let update = ShapeUpdate {
            fill_color: Some(color),
            ..Default::default()
        };
        self.apply_style(update, |style, _| style.fill_color = color);
    }

    pub fn set_stroke_color(&mut self, color: SerializableColor) {
        self.apply_style(ShapeUpdate::stroke_color(color), |style, _| {
            style.stroke_color = color
        });
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        let width = width.max(0.0);
        let update = ShapeUpdate {
            stroke_width: Some(width),
            ..Default::default()
        };
        self.apply_style(update, |style, _| style.stroke_width = width);
    }

    pub fn set_roughness(&mut self, roughness: f64) {
        let roughness = roughness.max(0.0);
        let update = ShapeUpdate {
            roughness: Some(roughness),
            ..Default::default()
        };
        self.apply_style(update, |style, _| style.roughness = roughness);
    }

    pub fn set_font_size(&mut self, font_size: f64) {
        let update = ShapeUpdate {
            font_size: Some(font_size),
            ..Default::default()
        };
        self.apply_style(update, |_, font| font.font_size = font_size);
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        let update = ShapeUpdate {
            font_family: Some(family),
            ..Default::default()
        };
        self.apply_style(update, |_, font| font.font_family = family);
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        let update = ShapeUpdate {
            text_align: Some(align),
            ..Default::default()
        };
        self.apply_style(update, |_, font| font.text_align = align);
    }

    // --- theme ---

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch theme. Shapes (and the default stroke) whose stroke equals the
    /// outgoing theme's default foreground are recolored to the incoming
    /// theme's default; custom colors are kept.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        let old_fg = self.theme.default_foreground();
        let new_fg = theme.default_foreground();
        let recolor: Vec<ShapeId> = self
            .shapes
            .iter()
            .filter(|s| s.style.stroke_color == old_fg)
            .map(|s| s.id)
            .collect();
        let update = ShapeUpdate::stroke_color(new_fg);
        for id in &recolor {
            self.update_shape(*id, &update);
        }
        if self.style.stroke_color == old_fg {
            self.style.stroke_color = new_fg;
        }
        log::info!("Theme {:?} -> {:?}, recolored {} shapes", self.theme, theme, recolor.len());
        self.theme = theme;
        self.record(SceneChange::PreferencesChanged);
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    // --- persistence and host views ---

    /// Snapshot of the persisted subset.
    pub fn preferences(&self) -> Preferences {
        Preferences {
            style: self.style.clone(),
            font: self.font,
            theme: self.theme,
        }
    }

    /// Restore persisted defaults at startup. Shapes are not touched and no
    /// change is journaled, so restoring does not trigger a save.
    pub fn restore_preferences(&mut self, preferences: Preferences) {
        self.style = preferences.style;
        self.font = preferences.font;
        self.theme = preferences.theme;
    }

    pub fn toolbar_state(&self) -> ToolbarState {
        ToolbarState {
            tool: self.tool,
            zoom: self.viewport.zoom,
            selection_count: self.selection.len(),
            theme: self.theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Shape {
        Shape::rectangle(Rect::new(x, y, x + w, y + h))
    }

    fn scene_with(n: usize) -> (Scene, Vec<ShapeId>) {
        let mut scene = Scene::default();
        let ids = (0..n)
            .map(|i| scene.add_shape(rect(i as f64 * 50.0, 0.0, 40.0, 40.0)))
            .collect();
        scene.drain_changes();
        (scene, ids)
    }

    fn order(scene: &Scene) -> Vec<ShapeId> {
        scene.shapes().iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_delete_prunes_selection() {
        let (mut scene, ids) = scene_with(3);
        scene.set_selected([ids[0], ids[1]]);
        scene.delete_shape(ids[0]);
        assert!(!scene.is_selected(ids[0]));
        assert!(scene.is_selected(ids[1]));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn test_set_selected_ignores_unknown_ids() {
        let (mut scene, ids) = scene_with(1);
        scene.set_selected([ids[0], uuid::Uuid::new_v4()]);
        assert_eq!(scene.selected_ids().len(), 1);
    }

    #[test]
    fn test_set_shapes_prunes_selection() {
        let (mut scene, ids) = scene_with(3);
        scene.select_all();
        let keep: Vec<Shape> = scene.shapes()[..1].to_vec();
        scene.set_shapes(keep);
        assert_eq!(scene.selected_in_order(), vec![ids[0]]);
    }

    #[test]
    fn test_duplicate_offsets_and_selects_clones() {
        let (mut scene, ids) = scene_with(2);
        let clones = scene.duplicate_shapes(&[ids[1]]);
        assert_eq!(clones.len(), 1);
        assert_ne!(clones[0], ids[1]);
        let clone = scene.shape(clones[0]).unwrap();
        assert_eq!(clone.position, Point::new(60.0, 10.0));
        assert_eq!(scene.selected_in_order(), clones);
    }

    #[test]
    fn test_clipboard_is_a_snapshot() {
        let (mut scene, ids) = scene_with(1);
        scene.copy_shapes(&ids);
        scene.update_shape(ids[0], &ShapeUpdate::position(Point::new(500.0, 500.0)));
        scene.delete_shape(ids[0]);
        let pasted = scene.paste_shapes();
        assert_eq!(pasted.len(), 1);
        assert_eq!(scene.shape(pasted[0]).unwrap().position, Point::new(20.0, 20.0));
        assert!(scene.is_selected(pasted[0]));
    }

    #[test]
    fn test_clipboard_json_roundtrip() {
        let (mut scene, ids) = scene_with(2);
        scene.copy_shapes(&ids);
        let json = scene.clipboard_json().unwrap();
        let mut other = Scene::default();
        other.set_clipboard_json(&json).unwrap();
        assert_eq!(other.paste_shapes().len(), 2);
        assert!(other.set_clipboard_json(r#"[{"type":"blob"}]"#).is_err());
    }

    #[test]
    fn test_bring_to_front_is_stable_partition() {
        let (mut scene, ids) = scene_with(5);
        scene.bring_to_front(&[ids[3], ids[1]]);
        assert_eq!(order(&scene), vec![ids[0], ids[2], ids[4], ids[1], ids[3]]);
    }

    #[test]
    fn test_send_to_back_is_stable_partition() {
        let (mut scene, ids) = scene_with(5);
        scene.send_to_back(&[ids[4], ids[2]]);
        assert_eq!(order(&scene), vec![ids[2], ids[4], ids[0], ids[1], ids[3]]);
    }

    #[test]
    fn test_align_left_and_single_noop() {
        let mut scene = Scene::default();
        let a = scene.add_shape(rect(10.0, 0.0, 40.0, 20.0));
        let b = scene.add_shape(rect(70.0, 50.0, 10.0, 10.0));
        scene.align_shapes(&[b], AlignType::Left);
        assert_eq!(scene.shape(b).unwrap().position.x, 70.0);
        scene.align_shapes(&[a, b], AlignType::Left);
        assert_eq!(scene.shape(a).unwrap().bounds().x0, 10.0);
        assert_eq!(scene.shape(b).unwrap().bounds().x0, 10.0);
    }

    #[test]
    fn test_shapes_in_rect_overlap() {
        let (scene, ids) = scene_with(3);
        let hits = scene.shapes_in_rect(Rect::new(45.0, 10.0, 30.0, 20.0));
        assert_eq!(hits, vec![ids[0]]);
        let hits = scene.shapes_in_rect(Rect::new(35.0, 10.0, 55.0, 20.0));
        assert_eq!(hits, vec![ids[0], ids[1]]);
    }

    #[test]
    fn test_horizontal_line_is_box_selectable() {
        let mut scene = Scene::default();
        let id = scene.add_shape(Shape::line(Point::new(0.0, 10.0), Point::new(100.0, 10.0)));
        assert_eq!(scene.shapes_in_rect(Rect::new(40.0, 0.0, 60.0, 20.0)), vec![id]);
    }

    #[test]
    fn test_zoom_steps_clamp() {
        let mut scene = Scene::default();
        for _ in 0..100 {
            scene.zoom_in();
        }
        assert!((scene.viewport().zoom - 5.0).abs() < 1e-9);
        scene.reset_zoom();
        scene.zoom_out();
        assert!((scene.viewport().zoom - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_set_viewport_rejects_nan_zoom() {
        let mut scene = Scene::default();
        scene.set_viewport(Viewport {
            x: 10.0,
            y: 0.0,
            zoom: f64::NAN,
        });
        assert_eq!(scene.viewport().zoom, 1.0);
        assert_eq!(scene.viewport().x, 10.0);
        scene.set_viewport(Viewport::new(0.0, 0.0, 50.0));
        assert_eq!(scene.viewport().zoom, scene.config().max_zoom);
    }

    #[test]
    fn test_theme_toggle_remaps_default_strokes_only() {
        let mut scene = Scene::default();
        let default_id = scene.add_shape(rect(0.0, 0.0, 10.0, 10.0));
        let custom = SerializableColor::rgb(200, 30, 30);
        let custom_id = scene.add_shape(rect(0.0, 0.0, 10.0, 10.0).with_style(ShapeStyle {
            stroke_color: custom,
            ..ShapeStyle::default()
        }));
        scene.toggle_theme();
        assert_eq!(scene.theme(), Theme::Dark);
        assert_eq!(
            scene.shape(default_id).unwrap().style.stroke_color,
            Theme::Dark.default_foreground()
        );
        assert_eq!(scene.shape(custom_id).unwrap().style.stroke_color, custom);
        assert_eq!(scene.style().stroke_color, Theme::Dark.default_foreground());
    }

    #[test]
    fn test_style_setter_updates_selection_and_defaults() {
        let (mut scene, ids) = scene_with(2);
        scene.set_selected([ids[0]]);
        scene.set_stroke_width(6.0);
        assert_eq!(scene.style().stroke_width, 6.0);
        assert_eq!(scene.shape(ids[0]).unwrap().style.stroke_width, 6.0);
        assert_eq!(scene.shape(ids[1]).unwrap().style.stroke_width, 2.0);
        assert!(scene.drain_changes().contains(&SceneChange::PreferencesChanged));
    }

    #[test]
    fn test_journal_records_mutations() {
        let mut scene = Scene::default();
        let rev = scene.revision();
        let id = scene.add_shape(rect(0.0, 0.0, 10.0, 10.0));
        scene.update_shape(id, &ShapeUpdate::position(Point::new(5.0, 5.0)));
        scene.delete_shape(id);
        assert_eq!(
            scene.drain_changes(),
            vec![
                SceneChange::ShapeAdded(id),
                SceneChange::ShapeUpdated(id),
                SceneChange::ShapeRemoved(id)
            ]
        );
        assert!(scene.revision() > rev);
        assert!(scene.drain_changes().is_empty());
    }

    #[test]
    fn test_restore_preferences_is_silent() {
        let mut scene = Scene::default();
        let mut prefs = Preferences::default();
        prefs.theme = Theme::Dark;
        scene.restore_preferences(prefs.clone());
        assert_eq!(scene.preferences(), prefs);
        assert!(scene.drain_changes().is_empty());
    }
}
