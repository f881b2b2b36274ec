//! Interaction controller: turns raw input into scene mutations.
//!
//! The controller is the only writer of the [`Scene`]. Gestures keep their
//! in-flight geometry in the current [`InteractionMode`] and touch the scene
//! once when they complete, so an abandoned gesture leaves no trace.

use crate::camera::screen_to_document;
use crate::config::CanvasConfig;
use crate::input::{InputEvent, InputState, Modifiers, MouseButton};
use crate::scene::Scene;
use crate::selection::{MultiMoveState, TransformLimits, TransformState, hit_test_handles};
use crate::shapes::{Shape, ShapeId, ShapeUpdate};
use crate::shortcuts::{self, Command};
use crate::text_edit::{TextEditOverlay, TextEditResult, TextKey};
use crate::tools::{DrawingState, ToolKind};
use kurbo::{Point, Rect, Size};
use winit::keyboard::KeyCode;

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

/// Selection rectangle state for marquee selection.
#[derive(Debug, Clone)]
pub struct SelectionRect {
    /// Starting point in document coordinates.
    pub start: Point,
    /// Current point in document coordinates.
    pub current: Point,
}

impl SelectionRect {
    /// Get the selection rectangle as a normalized Rect.
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

/// Current interaction mode. Exactly one is active at a time.
#[derive(Debug, Clone, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning {
        /// Last pointer position in screen pixels.
        last: Point,
        /// Started by holding Space rather than the hand tool.
        via_space: bool,
    },
    BoxSelecting {
        rect: SelectionRect,
        /// Shift held: add to the existing selection.
        additive: bool,
    },
    DrawingShape(DrawingState),
    DraggingShapes(MultiMoveState),
    Transforming(TransformState),
    TextEditing(TextEditOverlay),
}

impl InteractionMode {
    pub fn name(&self) -> &'static str {
        match self {
            InteractionMode::Idle => "idle",
            InteractionMode::Panning { .. } => "panning",
            InteractionMode::BoxSelecting { .. } => "boxSelecting",
            InteractionMode::DrawingShape(_) => "drawingShape",
            InteractionMode::DraggingShapes(_) => "draggingShapes",
            InteractionMode::Transforming(_) => "transforming",
            InteractionMode::TextEditing(_) => "textEditing",
        }
    }
}

/// Pointer/keyboard state machine driving a [`Scene`].
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: CanvasConfig,
    mode: InteractionMode,
    input: InputState,
    view_size: Size,
    space_held: bool,
    /// An unrelated text input in the host page has focus.
    external_text_focus: bool,
}

impl InteractionController {
    pub fn new(config: CanvasConfig, view_size: Size) -> Self {
        let input = InputState::new(
            Duration::from_millis(config.double_click_ms),
            config.double_click_distance,
        );
        Self {
            config,
            mode: InteractionMode::Idle,
            input,
            view_size,
            space_held: false,
            external_text_focus: false,
        }
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn view_size(&self) -> Size {
        self.view_size
    }

    /// Resize the drawing surface.
    pub fn set_view_size(&mut self, scene: &Scene, size: Size) {
        self.view_size = size;
        self.sync_overlay(scene);
    }

    /// Tell the controller whether a host text input has focus; shortcuts
    /// are ignored while it does.
    pub fn set_external_text_focus(&mut self, focused: bool) {
        self.external_text_focus = focused;
    }

    pub fn is_space_held(&self) -> bool {
        self.space_held
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        if mode.name() != self.mode.name() {
            log::debug!("Interaction: {} -> {}", self.mode.name(), mode.name());
        }
        self.mode = mode;
    }

    fn to_document(&self, scene: &Scene, screen: Point) -> Point {
        screen_to_document(screen, &scene.viewport(), self.view_size)
    }

    fn transform_limits(&self) -> TransformLimits {
        TransformLimits {
            min_size: self.config.min_transform_size,
            snap_step: self.config.rotation_snap_degrees,
            snap_tolerance: self.config.rotation_snap_tolerance,
        }
    }

    /// Process one input event.
    pub fn handle_event(&mut self, scene: &mut Scene, event: InputEvent) {
        self.handle_event_at(scene, event, Instant::now());
    }

    /// Process one input event with an explicit timestamp for click timing.
    pub fn handle_event_at(&mut self, scene: &mut Scene, event: InputEvent, now: Instant) {
        match event {
            InputEvent::PointerDown {
                position,
                button,
                modifiers,
            } => self.pointer_down(scene, position, button, modifiers, now),
            InputEvent::PointerMove { position, modifiers } => {
                self.input.modifiers = modifiers;
                self.pointer_move(scene, position)
            }
            InputEvent::PointerUp {
                position,
                button,
                modifiers,
            } => {
                self.input.modifiers = modifiers;
                if button != MouseButton::Right {
                    self.pointer_up(scene, position)
                }
            }
            InputEvent::PointerLeave => {
                let last = self.input.pointer_position;
                self.pointer_up(scene, last)
            }
            InputEvent::Wheel {
                position,
                delta,
                modifiers,
            } => {
                if modifiers.command() {
                    scene.zoom_at_point(position, delta.y, self.view_size);
                } else {
                    scene.scroll_by(delta);
                }
            }
            InputEvent::Key {
                code,
                pressed,
                modifiers,
                text,
            } => self.key(scene, code, pressed, modifiers, text),
            InputEvent::Blur => {
                if let InteractionMode::TextEditing(overlay) = &self.mode {
                    let result = overlay.blur();
                    self.finish_text_edit(scene, result);
                }
            }
        }
        self.sync_overlay(scene);
    }

    fn sync_overlay(&mut self, scene: &Scene) {
        if let InteractionMode::TextEditing(overlay) = &mut self.mode {
            match scene.shape(overlay.shape_id) {
                Some(shape) => overlay.reproject(shape, &scene.viewport(), self.view_size),
                None => {
                    log::debug!("Edited shape {} disappeared", overlay.shape_id);
                    self.mode = InteractionMode::Idle;
                }
            }
        }
    }

    fn pointer_down(
        &mut self,
        scene: &mut Scene,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        now: Instant,
    ) {
        self.input.modifiers = modifiers;
        let double_click = button == MouseButton::Left && self.input.press_at(position, now);
        if button != MouseButton::Left {
            self.input.move_to(position);
        }

        // Clicking anywhere while editing text blurs the editor.
        if let InteractionMode::TextEditing(overlay) = &self.mode {
            let result = overlay.blur();
            self.finish_text_edit(scene, result);
        }
        if !matches!(self.mode, InteractionMode::Idle) {
            return;
        }

        if button == MouseButton::Middle || self.space_held || scene.tool() == ToolKind::Hand {
            self.set_mode(InteractionMode::Panning {
                last: position,
                via_space: self.space_held,
            });
            return;
        }
        if button != MouseButton::Left {
            return;
        }

        let doc = self.to_document(scene, position);
        let tool = scene.tool();
        if tool.is_drawing_tool() {
            if let Some(drawing) = DrawingState::begin(tool, doc, scene.style(), scene.font()) {
                self.set_mode(InteractionMode::DrawingShape(drawing));
            }
            return;
        }

        let hit = scene.shape_at_point(doc, self.config.hit_tolerance);

        if double_click {
            if let Some(id) = hit {
                self.begin_text_edit(scene, id);
                return;
            }
        }

        if let Some(mode) = self.handle_hit(scene, doc) {
            self.set_mode(mode);
            return;
        }

        match hit {
            Some(id) => {
                if modifiers.shift {
                    scene.toggle_selected(id);
                    if !scene.is_selected(id) {
                        return;
                    }
                } else if !scene.is_selected(id) {
                    scene.set_selected([id]);
                }
                let originals: Vec<Shape> = scene
                    .selected_in_order()
                    .into_iter()
                    .filter_map(|sid| scene.shape(sid).cloned())
                    .collect();
                self.set_mode(InteractionMode::DraggingShapes(MultiMoveState::new(doc, originals, id)));
            }
            None => {
                if !modifiers.shift {
                    scene.clear_selection();
                }
                self.set_mode(InteractionMode::BoxSelecting {
                    rect: SelectionRect {
                        start: doc,
                        current: doc,
                    },
                    additive: modifiers.shift,
                });
            }
        }
    }

    /// Transform mode if `doc` hits a handle of the single selected shape.
    fn handle_hit(&self, scene: &Scene, doc: Point) -> Option<InteractionMode> {
        let selected = scene.selected_ids();
        if selected.len() != 1 {
            return None;
        }
        let id = *selected.iter().next()?;
        let shape = scene.shape(id)?;
        let zoom = scene.viewport().zoom;
        let kind = hit_test_handles(
            shape,
            doc,
            self.config.handle_hit_tolerance / zoom,
            self.config.rotate_handle_offset / zoom,
        )?;
        Some(InteractionMode::Transforming(TransformState::new(
            shape,
            kind,
            self.transform_limits(),
        )))
    }

    fn pointer_move(&mut self, scene: &mut Scene, position: Point) {
        self.input.move_to(position);
        let doc = self.to_document(scene, position);
        match &mut self.mode {
            InteractionMode::Panning { last, .. } => {
                let delta = position - *last;
                *last = position;
                scene.pan_by(delta);
            }
            InteractionMode::BoxSelecting { rect, .. } => rect.current = doc,
            InteractionMode::DrawingShape(drawing) => drawing.update(doc),
            InteractionMode::DraggingShapes(drag) => drag.current_point = doc,
            InteractionMode::Transforming(transform) => transform.drag_to(doc),
            InteractionMode::Idle | InteractionMode::TextEditing(_) => {}
        }
    }

    fn pointer_up(&mut self, scene: &mut Scene, position: Point) {
        if matches!(self.mode, InteractionMode::Idle | InteractionMode::TextEditing(_)) {
            return;
        }
        self.pointer_move(scene, position);
        self.input.release(position);

        match std::mem::take(&mut self.mode) {
            InteractionMode::BoxSelecting { rect, additive } => {
                let mut ids = scene.shapes_in_rect(rect.to_rect());
                if !ids.is_empty() {
                    if additive {
                        ids.extend(scene.selected_ids().iter().copied());
                    }
                    scene.set_selected(ids);
                }
            }
            InteractionMode::DrawingShape(drawing) => {
                if let Some(shape) = drawing.finish(self.config.min_draw_size) {
                    let id = scene.add_shape(shape);
                    scene.set_selected([id]);
                    scene.set_tool(ToolKind::Select);
                }
            }
            InteractionMode::DraggingShapes(drag) => {
                if drag.has_moved() {
                    for shape in drag.preview() {
                        scene.update_shape(shape.id, &ShapeUpdate::position(shape.position));
                    }
                } else if !self.input.modifiers.shift {
                    scene.set_selected([drag.pressed]);
                }
            }
            InteractionMode::Transforming(mut transform) => {
                let update = transform.commit();
                scene.update_shape(transform.shape_id, &update);
            }
            InteractionMode::Panning { .. } | InteractionMode::Idle | InteractionMode::TextEditing(_) => {}
        }
    }

    /// Open the text editor on a shape. The shape is selected alone.
    pub fn begin_text_edit(&mut self, scene: &mut Scene, id: ShapeId) {
        let Some(shape) = scene.shape(id) else {
            return;
        };
        let overlay = TextEditOverlay::begin(shape, &scene.viewport(), self.view_size, self.config.label_width);
        scene.set_selected([id]);
        self.set_mode(InteractionMode::TextEditing(overlay));
    }

    fn finish_text_edit(&mut self, scene: &mut Scene, result: TextEditResult) {
        let InteractionMode::TextEditing(overlay) = &self.mode else {
            return;
        };
        let id = overlay.shape_id;
        match result {
            TextEditResult::Handled => return,
            TextEditResult::Commit(text) => {
                scene.update_shape(id, &ShapeUpdate::text(text));
            }
            TextEditResult::Cancel => log::debug!("Text edit on {id} cancelled"),
        }
        self.set_mode(InteractionMode::Idle);
    }

    fn key(
        &mut self,
        scene: &mut Scene,
        code: KeyCode,
        pressed: bool,
        modifiers: Modifiers,
        text: Option<String>,
    ) {
        self.input.modifiers = modifiers;

        if let InteractionMode::TextEditing(overlay) = &mut self.mode {
            if !pressed {
                return;
            }
            let Some(key) = text_key(code, text) else {
                return;
            };
            let result = overlay.handle_key(key, modifiers.shift);
            self.finish_text_edit(scene, result);
            return;
        }

        if self.external_text_focus {
            return;
        }

        if code == KeyCode::Space {
            self.space_held = pressed;
            if !pressed && matches!(self.mode, InteractionMode::Panning { via_space: true, .. }) {
                self.set_mode(InteractionMode::Idle);
            }
            return;
        }
        if !pressed {
            return;
        }
        if let Some(command) = shortcuts::resolve(code, modifiers) {
            self.execute(scene, command);
        }
    }

    /// Run a shortcut command.
    pub fn execute(&mut self, scene: &mut Scene, command: Command) {
        let selected = scene.selected_in_order();
        match command {
            Command::SelectTool(tool) => {
                self.cancel_gesture();
                scene.set_tool(tool);
            }
            Command::DeleteSelected => {
                if matches!(self.mode, InteractionMode::Idle) {
                    let removed = scene.delete_selected();
                    log::debug!("Deleted {removed} selected shapes");
                }
            }
            Command::SelectAll => scene.select_all(),
            Command::Copy => scene.copy_shapes(&selected),
            Command::Paste => {
                scene.paste_shapes();
            }
            Command::Duplicate => {
                scene.duplicate_shapes(&selected);
            }
            Command::BringToFront => scene.bring_to_front(&selected),
            Command::SendToBack => scene.send_to_back(&selected),
            Command::ZoomIn => scene.zoom_in(),
            Command::ZoomOut => scene.zoom_out(),
            Command::ResetZoom => scene.reset_zoom(),
            Command::Cancel => {
                if matches!(self.mode, InteractionMode::Idle) {
                    scene.clear_selection();
                } else {
                    self.cancel_gesture();
                }
            }
        }
    }

    /// Drop the active gesture without touching the scene.
    pub fn cancel_gesture(&mut self) {
        if !matches!(self.mode, InteractionMode::Idle | InteractionMode::TextEditing(_)) {
            self.set_mode(InteractionMode::Idle);
        }
    }

    // --- read-only views for the renderer and host ---

    /// Shapes whose in-flight geometry differs from the scene, plus a shape
    /// being drawn. Rendered in place of the scene's copies.
    pub fn preview_shapes(&self) -> Vec<Shape> {
        match &self.mode {
            InteractionMode::DrawingShape(drawing) => vec![drawing.shape.clone()],
            InteractionMode::DraggingShapes(drag) => drag.preview(),
            InteractionMode::Transforming(transform) => vec![transform.preview.clone()],
            _ => Vec::new(),
        }
    }

    /// Marquee rectangle in document space, while box selecting.
    pub fn marquee(&self) -> Option<Rect> {
        match &self.mode {
            InteractionMode::BoxSelecting { rect, .. } => Some(rect.to_rect()),
            _ => None,
        }
    }

    /// Shape whose text is being edited.
    pub fn editing_shape(&self) -> Option<ShapeId> {
        self.text_overlay().map(|o| o.shape_id)
    }

    pub fn text_overlay(&self) -> Option<&TextEditOverlay> {
        match &self.mode {
            InteractionMode::TextEditing(overlay) => Some(overlay),
            _ => None,
        }
    }
}

fn text_key(code: KeyCode, text: Option<String>) -> Option<TextKey> {
    Some(match code {
        KeyCode::Enter | KeyCode::NumpadEnter => TextKey::Enter,
        KeyCode::Escape => TextKey::Escape,
        KeyCode::Backspace => TextKey::Backspace,
        KeyCode::Delete => TextKey::Delete,
        KeyCode::ArrowLeft => TextKey::Left,
        KeyCode::ArrowRight => TextKey::Right,
        KeyCode::Home => TextKey::Home,
        KeyCode::End => TextKey::End,
        _ => {
            let text = text.filter(|t| !t.is_empty() && !t.chars().any(char::is_control))?;
            TextKey::Character(text)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ShapeKind;
    use kurbo::Vec2;

    const VIEW: Size = Size::new(800.0, 600.0);

    struct Harness {
        scene: Scene,
        controller: InteractionController,
        clock: Instant,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                scene: Scene::default(),
                controller: InteractionController::new(CanvasConfig::default(), VIEW),
                clock: Instant::now(),
            }
        }

        fn send(&mut self, event: InputEvent) {
            // Space events out so that clicks are never read as double clicks
            self.clock += Duration::from_secs(1);
            self.controller.handle_event_at(&mut self.scene, event, self.clock);
        }

        fn send_quick(&mut self, event: InputEvent) {
            self.clock += Duration::from_millis(50);
            self.controller.handle_event_at(&mut self.scene, event, self.clock);
        }

        fn drag(&mut self, from: Point, to: Point) {
            self.send(InputEvent::pointer_down(from));
            self.send(InputEvent::pointer_move(to));
            self.send(InputEvent::pointer_up(to));
        }

        fn key(&mut self, code: KeyCode) {
            self.send(InputEvent::key_down(code, Modifiers::NONE));
            self.send(InputEvent::key_up(code));
        }
    }

    #[test]
    fn test_draw_rectangle_scenario() {
        let mut h = Harness::new();
        h.scene.set_tool(ToolKind::Rectangle);
        h.drag(Point::new(400.0, 300.0), Point::new(500.0, 380.0));

        assert_eq!(h.scene.len(), 1);
        let shape = &h.scene.shapes()[0];
        assert_eq!(shape.kind, ShapeKind::Rectangle);
        assert_eq!(shape.position, Point::new(0.0, 0.0));
        assert_eq!(shape.width, 100.0);
        assert_eq!(shape.height, 80.0);
        assert_eq!(h.scene.tool(), ToolKind::Select);
        assert!(h.scene.is_selected(shape.id));
        assert!(matches!(h.controller.mode(), InteractionMode::Idle));
    }

    #[test]
    fn test_tiny_draw_discarded() {
        let mut h = Harness::new();
        h.scene.set_tool(ToolKind::Ellipse);
        h.drag(Point::new(400.0, 300.0), Point::new(404.0, 305.0));
        assert!(h.scene.is_empty());
        assert_eq!(h.scene.tool(), ToolKind::Ellipse);
    }

    #[test]
    fn test_drawing_preview_never_negative() {
        let mut h = Harness::new();
        h.scene.set_tool(ToolKind::Rectangle);
        h.send(InputEvent::pointer_down(Point::new(400.0, 300.0)));
        h.send(InputEvent::pointer_move(Point::new(300.0, 200.0)));
        let preview = h.controller.preview_shapes();
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].width, 100.0);
        assert_eq!(preview[0].position, Point::new(-100.0, -100.0));
        assert!(h.scene.is_empty());
    }

    #[test]
    fn test_hand_tool_pans_opposite_to_drag() {
        let mut h = Harness::new();
        h.scene.set_tool(ToolKind::Hand);
        h.scene.set_viewport(crate::camera::Viewport::new(0.0, 0.0, 2.0));
        h.drag(Point::new(100.0, 100.0), Point::new(140.0, 80.0));
        let viewport = h.scene.viewport();
        assert_eq!(viewport.x, -20.0);
        assert_eq!(viewport.y, 10.0);
    }

    #[test]
    fn test_space_overrides_tool_for_panning() {
        let mut h = Harness::new();
        h.scene.set_tool(ToolKind::Rectangle);
        h.send(InputEvent::key_down(KeyCode::Space, Modifiers::NONE));
        h.send(InputEvent::pointer_down(Point::new(100.0, 100.0)));
        h.send(InputEvent::pointer_move(Point::new(90.0, 100.0)));
        assert!(matches!(h.controller.mode(), InteractionMode::Panning { .. }));
        h.send(InputEvent::key_up(KeyCode::Space));
        assert!(matches!(h.controller.mode(), InteractionMode::Idle));
        assert_eq!(h.scene.viewport().x, 10.0);
        assert!(h.scene.is_empty());
    }

    #[test]
    fn test_box_select() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let b = h.scene.add_shape(Shape::rectangle(Rect::new(200.0, 0.0, 250.0, 50.0)));
        // Document (-20,-20)..(60,60) -> screen (380,280)..(460,360)
        h.drag(Point::new(380.0, 280.0), Point::new(460.0, 360.0));
        assert!(h.scene.is_selected(a));
        assert!(!h.scene.is_selected(b));
    }

    #[test]
    fn test_leave_commits_draw_at_last_pointer() {
        let mut h = Harness::new();
        h.scene.set_tool(ToolKind::Rectangle);
        h.send(InputEvent::pointer_down(Point::new(400.0, 300.0)));
        h.send(InputEvent::pointer_move(Point::new(460.0, 340.0)));
        h.send(InputEvent::PointerLeave);

        assert!(matches!(h.controller.mode(), InteractionMode::Idle));
        assert_eq!(h.scene.len(), 1);
        let shape = &h.scene.shapes()[0];
        assert_eq!(shape.width, 60.0);
        assert_eq!(shape.height, 40.0);
        assert_eq!(h.scene.tool(), ToolKind::Select);
    }

    #[test]
    fn test_leave_ends_pan_and_marquee() {
        let mut h = Harness::new();
        h.scene.set_tool(ToolKind::Hand);
        h.send(InputEvent::pointer_down(Point::new(100.0, 100.0)));
        h.send(InputEvent::pointer_move(Point::new(120.0, 100.0)));
        h.send(InputEvent::PointerLeave);
        assert!(matches!(h.controller.mode(), InteractionMode::Idle));
        assert_eq!(h.scene.viewport().x, -20.0);

        // Later moves no longer pan
        h.send(InputEvent::pointer_move(Point::new(200.0, 100.0)));
        assert_eq!(h.scene.viewport().x, -20.0);

        h.scene.set_tool(ToolKind::Select);
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0)));
        // Document (-30,-30)..(30,30) after the pan above
        h.send(InputEvent::pointer_down(Point::new(390.0, 270.0)));
        h.send(InputEvent::pointer_move(Point::new(450.0, 330.0)));
        h.send(InputEvent::PointerLeave);
        assert!(matches!(h.controller.mode(), InteractionMode::Idle));
        assert!(h.scene.is_selected(a));
    }

    #[test]
    fn test_click_empty_clears_selection() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 50.0, 50.0)));
        h.scene.set_selected([a]);
        h.drag(Point::new(700.0, 500.0), Point::new(700.0, 500.0));
        assert!(h.scene.selected_ids().is_empty());
    }

    #[test]
    fn test_drag_shape_commits_position() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 50.0, 50.0)));
        h.send(InputEvent::pointer_down(Point::new(420.0, 320.0)));
        h.send(InputEvent::pointer_move(Point::new(450.0, 330.0)));
        // Preview moves, the scene does not yet
        assert_eq!(h.controller.preview_shapes()[0].position, Point::new(30.0, 10.0));
        assert_eq!(h.scene.shape(a).unwrap().position, Point::ZERO);
        h.send(InputEvent::pointer_up(Point::new(450.0, 330.0)));
        assert_eq!(h.scene.shape(a).unwrap().position, Point::new(30.0, 10.0));
        assert!(h.scene.is_selected(a));
    }

    #[test]
    fn test_click_replaces_selection() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let b = h.scene.add_shape(Shape::rectangle(Rect::new(100.0, 0.0, 150.0, 50.0)));
        h.scene.set_selected([a, b]);
        h.drag(Point::new(420.0, 320.0), Point::new(420.0, 320.0));
        assert_eq!(h.scene.selected_in_order(), vec![a]);
    }

    #[test]
    fn test_escape_cancels_drag() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 50.0, 50.0)));
        h.send(InputEvent::pointer_down(Point::new(420.0, 320.0)));
        h.send(InputEvent::pointer_move(Point::new(500.0, 400.0)));
        h.key(KeyCode::Escape);
        h.send(InputEvent::pointer_up(Point::new(500.0, 400.0)));
        assert_eq!(h.scene.shape(a).unwrap().position, Point::ZERO);
    }

    #[test]
    fn test_resize_handle_commit() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0)));
        h.scene.set_selected([a]);
        // Bottom-right corner at screen (500, 350)
        h.drag(Point::new(500.0, 350.0), Point::new(550.0, 400.0));
        let shape = h.scene.shape(a).unwrap();
        assert_eq!(shape.width, 150.0);
        assert_eq!(shape.height, 100.0);
        assert_eq!(shape.position, Point::ZERO);
    }

    #[test]
    fn test_double_click_enters_text_editing_and_commits() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0)));
        let p = Point::new(420.0, 320.0);
        h.send(InputEvent::pointer_down(p));
        h.send_quick(InputEvent::pointer_up(p));
        h.send_quick(InputEvent::pointer_down(p));
        h.send_quick(InputEvent::pointer_up(p));
        assert_eq!(h.controller.editing_shape(), Some(a));

        // Shortcuts are suppressed while editing
        h.send(InputEvent::typed(KeyCode::KeyR, "r"));
        assert_eq!(h.scene.tool(), ToolKind::Select);
        h.send(InputEvent::typed(KeyCode::KeyE, "e"));
        h.send(InputEvent::key_down(KeyCode::Enter, Modifiers::NONE));
        assert_eq!(h.controller.editing_shape(), None);
        assert_eq!(h.scene.shape(a).unwrap().text.as_deref(), Some("re"));
    }

    #[test]
    fn test_escape_cancels_text_edit() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0)).with_text("keep"));
        h.controller.begin_text_edit(&mut h.scene, a);
        h.send(InputEvent::key_down(KeyCode::Backspace, Modifiers::NONE));
        h.send(InputEvent::key_down(KeyCode::Escape, Modifiers::NONE));
        assert_eq!(h.controller.editing_shape(), None);
        assert_eq!(h.scene.shape(a).unwrap().text.as_deref(), Some("keep"));
    }

    #[test]
    fn test_overlay_follows_wheel_pan() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0)));
        h.controller.begin_text_edit(&mut h.scene, a);
        let before = h.controller.text_overlay().unwrap().placement().center;
        h.send(InputEvent::Wheel {
            position: Point::new(400.0, 300.0),
            delta: Vec2::new(0.0, 40.0),
            modifiers: Modifiers::NONE,
        });
        let after = h.controller.text_overlay().unwrap().placement().center;
        assert_eq!(after, before - Vec2::new(0.0, 40.0));
    }

    #[test]
    fn test_blur_commits() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0)));
        h.controller.begin_text_edit(&mut h.scene, a);
        h.send(InputEvent::typed(KeyCode::KeyX, "x"));
        h.send(InputEvent::Blur);
        assert_eq!(h.scene.shape(a).unwrap().text.as_deref(), Some("x"));
    }

    #[test]
    fn test_ctrl_wheel_zooms_at_pointer() {
        let mut h = Harness::new();
        h.send(InputEvent::Wheel {
            position: Point::new(400.0, 300.0),
            delta: Vec2::new(0.0, -1000.0),
            modifiers: Modifiers::CTRL,
        });
        let viewport = h.scene.viewport();
        assert!((viewport.zoom - 2.0).abs() < 1e-12);
        assert_eq!((viewport.x, viewport.y), (0.0, 0.0));
    }

    #[test]
    fn test_plain_wheel_pans() {
        let mut h = Harness::new();
        h.scene.set_viewport(crate::camera::Viewport::new(0.0, 0.0, 2.0));
        h.send(InputEvent::Wheel {
            position: Point::new(400.0, 300.0),
            delta: Vec2::new(10.0, 20.0),
            modifiers: Modifiers::NONE,
        });
        assert_eq!(h.scene.viewport().x, 5.0);
        assert_eq!(h.scene.viewport().y, 10.0);
    }

    #[test]
    fn test_tool_and_delete_shortcuts() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 50.0)));
        h.key(KeyCode::KeyL);
        assert_eq!(h.scene.tool(), ToolKind::Line);
        h.scene.set_selected([a]);
        h.key(KeyCode::Delete);
        assert!(h.scene.is_empty());
    }

    #[test]
    fn test_external_focus_suppresses_shortcuts() {
        let mut h = Harness::new();
        h.controller.set_external_text_focus(true);
        h.key(KeyCode::KeyR);
        assert_eq!(h.scene.tool(), ToolKind::Select);
        h.controller.set_external_text_focus(false);
        h.key(KeyCode::KeyR);
        assert_eq!(h.scene.tool(), ToolKind::Rectangle);
    }

    #[test]
    fn test_line_midpoint_handle_drag() {
        let mut h = Harness::new();
        let id = h.scene.add_shape(Shape::line(Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
        h.scene.set_selected([id]);
        // Midpoint handle at document (50, 0) -> screen (450, 300)
        h.drag(Point::new(450.0, 300.0), Point::new(450.0, 330.0));
        let path = h.scene.shape(id).unwrap().absolute_path().unwrap();
        assert!(path.is_curved());
        let mid = path.midpoint_handle();
        assert!((mid.x - 50.0).abs() < 1e-9 && (mid.y - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_shift_click_toggles() {
        let mut h = Harness::new();
        let a = h.scene.add_shape(Shape::rectangle(Rect::new(0.0, 0.0, 50.0, 50.0)));
        let b = h.scene.add_shape(Shape::rectangle(Rect::new(100.0, 0.0, 150.0, 50.0)));
        h.scene.set_selected([a]);
        let shift_down = |p| InputEvent::PointerDown {
            position: p,
            button: MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        };
        let shift_up = |p| InputEvent::PointerUp {
            position: p,
            button: MouseButton::Left,
            modifiers: Modifiers::SHIFT,
        };
        h.send(shift_down(Point::new(520.0, 320.0)));
        h.send(shift_up(Point::new(520.0, 320.0)));
        assert!(h.scene.is_selected(a) && h.scene.is_selected(b));
        h.send(shift_down(Point::new(420.0, 320.0)));
        h.send(shift_up(Point::new(420.0, 320.0)));
        assert!(!h.scene.is_selected(a) && h.scene.is_selected(b));
    }
}
