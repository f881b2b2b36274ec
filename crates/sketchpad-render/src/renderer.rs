//! Renderer trait and the frame builder shared by every backend.

use crate::decorations::{arrowhead, label_gap, to_segment};
use crate::display::{DrawCommand, Frame, ShapeDrawing};
use crate::rough::{RoughGenerator, RoughOptions, seed_from_id};
use kurbo::{Affine, BezPath, Circle, Point, Rect, Shape as _, Size};
use peniko::Color;
use sketchpad_core::selection::{HandleKind, get_handles};
use sketchpad_core::shapes::{Shape, ShapeId, ShapeKind};
use sketchpad_core::{InteractionController, Scene, SceneChange};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Per-shape rendering failures. A failing shape is skipped; the rest of
/// the frame still renders.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("Shape {0} has non-finite geometry")]
    NonFiniteGeometry(ShapeId),
    #[error("Shape {0} has no drawable extent")]
    Degenerate(ShapeId),
}

/// Result type for per-shape rendering.
pub type RenderResult<T> = Result<T, RenderError>;

/// Tuning for strokes, decorations and handles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Arrowhead barb length in document units.
    pub arrowhead_length: f64,
    /// Angle between each barb and the shaft.
    pub arrowhead_angle_degrees: f64,
    /// Draw outlines twice, as a pen sketch would.
    pub multi_stroke: bool,
    /// Handle size in screen pixels.
    pub handle_size: f64,
    pub bowing: f64,
    pub max_randomness_offset: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            arrowhead_length: 15.0,
            arrowhead_angle_degrees: 25.0,
            multi_stroke: true,
            handle_size: 8.0,
            bowing: 1.0,
            max_randomness_offset: 2.0,
        }
    }
}

impl RenderOptions {
    fn rough(&self, roughness: f64) -> RoughOptions {
        RoughOptions {
            roughness: roughness.max(0.0),
            bowing: self.bowing,
            max_randomness_offset: self.max_randomness_offset,
            multi_stroke: self.multi_stroke,
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The scene to render.
    pub scene: &'a Scene,
    /// View size in logical pixels.
    pub view_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// In-flight shapes drawn in place of the scene's copies.
    pub previews: Vec<Shape>,
    /// Selection rectangle (marquee) in document coordinates.
    pub selection_rect: Option<Rect>,
    /// Shape whose label is being edited; drawn without it.
    pub editing_shape_id: Option<ShapeId>,
    pub options: RenderOptions,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(scene: &'a Scene, view_size: Size) -> Self {
        Self {
            scene,
            view_size,
            scale_factor: 1.0,
            previews: Vec::new(),
            selection_rect: None,
            editing_shape_id: None,
            options: RenderOptions::default(),
        }
    }

    /// Context reflecting the controller's current gesture.
    pub fn from_controller(scene: &'a Scene, controller: &InteractionController) -> Self {
        Self::new(scene, controller.view_size())
            .with_previews(controller.preview_shapes())
            .with_selection_rect(controller.marquee())
            .with_editing_shape(controller.editing_shape())
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    pub fn with_previews(mut self, previews: Vec<Shape>) -> Self {
        self.previews = previews;
        self
    }

    /// Set the selection rectangle.
    pub fn with_selection_rect(mut self, rect: Option<Rect>) -> Self {
        self.selection_rect = rect;
        self
    }

    /// Set the shape ID being edited.
    pub fn with_editing_shape(mut self, shape_id: Option<ShapeId>) -> Self {
        self.editing_shape_id = shape_id;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    fn zoom(&self) -> f64 {
        self.scene.viewport().zoom
    }

    /// Document space to physical pixels.
    pub fn view_transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.scene.viewport().transform(self.view_size)
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// This method is called once per frame and should prepare all drawing commands.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.scene.theme().background().into()
    }
}

/// Inputs that change a shape's drawing besides the shape itself.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DrawSettings {
    options: RenderOptions,
    label_gap: f64,
    label_width: f64,
}

struct CachedDrawing {
    shape: Shape,
    editing: bool,
    commands: Vec<DrawCommand>,
}

/// Cache hits and misses during the last frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Builds [`Frame`]s, keeping each scene shape's strokes until it changes.
#[derive(Default)]
pub struct SketchRenderer {
    cache: HashMap<ShapeId, CachedDrawing>,
    settings: Option<DrawSettings>,
    stats: CacheStats,
    frame: Option<Frame>,
}

impl SketchRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop cached strokes for shapes the journal reports as changed.
    pub fn apply_changes(&mut self, changes: &[SceneChange]) {
        for change in changes {
            match change {
                SceneChange::ShapeUpdated(id) | SceneChange::ShapeRemoved(id) => {
                    self.cache.remove(id);
                }
                SceneChange::ShapesReplaced => self.cache.clear(),
                _ => {}
            }
        }
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn last_stats(&self) -> CacheStats {
        self.stats
    }

    /// The frame built by the last [`Renderer::build_scene`] call.
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn take_frame(&mut self) -> Option<Frame> {
        self.frame.take()
    }

    /// Build the display list for the current scene state.
    pub fn build_frame(&mut self, ctx: &RenderContext) -> Frame {
        let config = ctx.scene.config();
        let settings = DrawSettings {
            options: ctx.options,
            label_gap: config.label_gap,
            label_width: config.label_width,
        };
        if self.settings != Some(settings) {
            self.cache.clear();
            self.settings = Some(settings);
        }
        self.stats = CacheStats::default();

        let previews: HashMap<ShapeId, &Shape> = ctx.previews.iter().map(|s| (s.id, s)).collect();
        let mut shapes = Vec::with_capacity(ctx.scene.len() + ctx.previews.len());
        let mut skipped = Vec::new();
        let mut seen = HashSet::new();

        for shape in ctx.scene.shapes() {
            seen.insert(shape.id);
            let editing = ctx.editing_shape_id == Some(shape.id);
            let result = match previews.get(&shape.id) {
                Some(preview) => draw_shape(preview, editing, &settings),
                None => self.cached_draw(shape, editing, &settings),
            };
            let drawn = previews.get(&shape.id).copied().unwrap_or(shape);
            push_drawing(drawn, result, &mut shapes, &mut skipped);
        }
        for preview in ctx.previews.iter().filter(|p| !seen.contains(&p.id)) {
            let editing = ctx.editing_shape_id == Some(preview.id);
            push_drawing(preview, draw_shape(preview, editing, &settings), &mut shapes, &mut skipped);
        }
        self.cache.retain(|id, _| seen.contains(id));

        let overlay = overlay_commands(ctx, &previews);
        Frame {
            view_transform: ctx.view_transform(),
            background: ctx.scene.theme().background().into(),
            shapes,
            overlay,
            skipped,
        }
    }

    fn cached_draw(
        &mut self,
        shape: &Shape,
        editing: bool,
        settings: &DrawSettings,
    ) -> RenderResult<Vec<DrawCommand>> {
        if let Some(cached) = self.cache.get(&shape.id) {
            if cached.editing == editing && cached.shape == *shape {
                self.stats.hits += 1;
                return Ok(cached.commands.clone());
            }
        }
        self.stats.misses += 1;
        let commands = draw_shape(shape, editing, settings)?;
        self.cache.insert(
            shape.id,
            CachedDrawing {
                shape: shape.clone(),
                editing,
                commands: commands.clone(),
            },
        );
        Ok(commands)
    }
}

impl Renderer for SketchRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.frame = Some(self.build_frame(ctx));
    }
}

fn push_drawing(
    shape: &Shape,
    result: RenderResult<Vec<DrawCommand>>,
    shapes: &mut Vec<ShapeDrawing>,
    skipped: &mut Vec<ShapeId>,
) {
    match result {
        Ok(commands) => shapes.push(ShapeDrawing {
            shape_id: shape.id,
            transform: shape.transform(),
            commands,
        }),
        Err(err) => {
            match err {
                RenderError::NonFiniteGeometry(_) => log::warn!("Skipping shape: {err}"),
                RenderError::Degenerate(_) => log::debug!("Skipping shape: {err}"),
            }
            skipped.push(shape.id);
        }
    }
}

/// Draw one shape in its local space.
///
/// Pure in the shape and settings: the same shape always yields the same
/// commands, since the stroke jitter is seeded from its id.
fn draw_shape(shape: &Shape, editing: bool, settings: &DrawSettings) -> RenderResult<Vec<DrawCommand>> {
    if !shape.is_finite() {
        return Err(RenderError::NonFiniteGeometry(shape.id));
    }
    let options = &settings.options;
    let mut rough = RoughGenerator::new(seed_from_id(&shape.id), options.rough(shape.style.roughness));
    let stroke_color = shape.style.stroke();
    let stroke_width = shape.style.stroke_width;
    let label = shape.text.as_deref().filter(|text| !text.is_empty() && !editing);
    let mut commands = Vec::new();

    match &shape.kind {
        ShapeKind::Rectangle | ShapeKind::Ellipse => {
            if shape.width <= 0.0 && shape.height <= 0.0 {
                return Err(RenderError::Degenerate(shape.id));
            }
            let is_rect = matches!(shape.kind, ShapeKind::Rectangle);
            let center = Point::new(shape.width / 2.0, shape.height / 2.0);
            if let Some(fill) = shape.style.fill() {
                let outline = if is_rect {
                    Rect::new(0.0, 0.0, shape.width, shape.height).to_path(0.1)
                } else {
                    kurbo::Ellipse::new(center, (center.x, center.y), 0.0).to_path(0.1)
                };
                commands.push(DrawCommand::fill(rough.fill(&outline), fill));
            }
            let outline = if is_rect {
                rough.rectangle(shape.width, shape.height)
            } else {
                rough.ellipse(center, center.x, center.y)
            };
            commands.push(DrawCommand::stroke(outline, stroke_color, stroke_width));
            if let Some(text) = label {
                commands.push(text_command(shape, text, center, shape.width));
            }
        }
        ShapeKind::Line(path) | ShapeKind::Arrow(path) => {
            let gapped = shape.text.as_deref().is_some_and(|t| !t.is_empty()) || editing;
            if gapped {
                let gap = label_gap(path, settings.label_gap).ok_or(RenderError::Degenerate(shape.id))?;
                commands.push(DrawCommand::stroke(rough.segment(gap.before), stroke_color, stroke_width));
                commands.push(DrawCommand::stroke(rough.segment(gap.after), stroke_color, stroke_width));
                if let Some(text) = label {
                    commands.push(text_command(shape, text, gap.center, settings.label_width));
                }
            } else {
                if !(path.length() > f64::EPSILON) {
                    return Err(RenderError::Degenerate(shape.id));
                }
                commands.push(DrawCommand::stroke(rough.segment(to_segment(path)), stroke_color, stroke_width));
            }
            if matches!(shape.kind, ShapeKind::Arrow(_)) {
                let barbs = arrowhead(
                    path.end(),
                    path.end_tangent(),
                    options.arrowhead_length,
                    options.arrowhead_angle_degrees,
                );
                for barb in barbs.into_iter().flatten() {
                    commands.push(DrawCommand::stroke(rough.line(barb.p0, barb.p1), stroke_color, stroke_width));
                }
            }
        }
        ShapeKind::Text => {
            if let Some(text) = label {
                let center = Point::new(shape.width / 2.0, shape.height / 2.0);
                commands.push(text_command(shape, text, center, shape.width));
            }
        }
    }
    Ok(commands)
}

fn text_command(shape: &Shape, text: &str, anchor: Point, max_width: f64) -> DrawCommand {
    DrawCommand::Text {
        text: text.to_string(),
        anchor,
        max_width,
        font_size: shape.font.font_size,
        font_family: shape.font.font_family,
        align: shape.font.text_align,
        color: shape.style.stroke(),
    }
}

/// Selection outlines, handles and the marquee. Sizes are in screen pixels,
/// so everything is divided by zoom.
fn overlay_commands(ctx: &RenderContext, previews: &HashMap<ShapeId, &Shape>) -> Vec<DrawCommand> {
    let zoom = ctx.zoom();
    let selection_color: Color = ctx.scene.theme().selection().into();
    let stroke_width = 1.0 / zoom;
    let dash_len = 4.0 / zoom;
    let mut commands = Vec::new();

    let selected: Vec<&Shape> = ctx
        .scene
        .selected_in_order()
        .into_iter()
        .filter_map(|id| previews.get(&id).copied().or_else(|| ctx.scene.shape(id)))
        .collect();

    for shape in &selected {
        if shape.is_linear() {
            continue;
        }
        let outline = shape.transform() * Rect::new(0.0, 0.0, shape.width, shape.height).to_path(0.1);
        commands.push(DrawCommand::dashed(outline, selection_color, stroke_width, dash_len));
    }

    if let [shape] = selected.as_slice() {
        let size = ctx.options.handle_size / zoom;
        let rotate_offset = ctx.scene.config().rotate_handle_offset / zoom;
        for handle in get_handles(shape, rotate_offset) {
            let path = handle_path(handle.position, handle.kind, size);
            commands.push(DrawCommand::fill(path.clone(), Color::WHITE));
            commands.push(DrawCommand::stroke(path, selection_color, 1.5 / zoom));
        }
    }

    if let Some(rect) = ctx.selection_rect {
        let path = rect.to_path(0.1);
        commands.push(DrawCommand::fill(path.clone(), selection_color.with_alpha(0.1)));
        commands.push(DrawCommand::dashed(path, selection_color, stroke_width, dash_len));
    }
    commands
}

fn handle_path(position: Point, kind: HandleKind, size: f64) -> BezPath {
    let half = size / 2.0;
    match kind {
        HandleKind::Corner(_) | HandleKind::Edge(_) => {
            Rect::new(position.x - half, position.y - half, position.x + half, position.y + half).to_path(0.1)
        }
        _ => Circle::new(position, half).to_path(0.1),
    }
}
