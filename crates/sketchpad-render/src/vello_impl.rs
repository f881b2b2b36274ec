//! Vello-based renderer implementation.

use crate::display::{DrawCommand, Frame};
use crate::renderer::{CacheStats, RenderContext, Renderer, SketchRenderer};
use kurbo::{Affine, Rect, Stroke};
use peniko::Fill;
use sketchpad_core::SceneChange;
use vello::Scene;

/// Encodes frames into a [`vello::Scene`] for GPU rendering.
///
/// Text commands are left to the host, which owns font loading and layout.
#[derive(Default)]
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    sketch: SketchRenderer,
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    pub fn apply_changes(&mut self, changes: &[SceneChange]) {
        self.sketch.apply_changes(changes);
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.sketch.last_stats()
    }

    /// The display list behind the current scene, including text commands.
    pub fn frame(&self) -> Option<&Frame> {
        self.sketch.frame()
    }
}

fn encode(scene: &mut Scene, frame: &Frame, size: kurbo::Size) {
    scene.reset();
    scene.fill(
        Fill::NonZero,
        Affine::IDENTITY,
        frame.background,
        None,
        &Rect::from_origin_size((0.0, 0.0), size),
    );
    for drawing in &frame.shapes {
        let transform = frame.view_transform * drawing.transform;
        for command in &drawing.commands {
            encode_command(scene, command, transform);
        }
    }
    for command in &frame.overlay {
        encode_command(scene, command, frame.view_transform);
    }
}

fn encode_command(scene: &mut Scene, command: &DrawCommand, transform: Affine) {
    match command {
        DrawCommand::Stroke {
            path,
            color,
            width,
            dash,
        } => {
            let mut stroke = Stroke::new(*width);
            if let Some(dash) = dash {
                stroke = stroke.with_dashes(0.0, dash);
            }
            scene.stroke(&stroke, transform, *color, None, path);
        }
        DrawCommand::Fill { path, color } => {
            scene.fill(Fill::NonZero, transform, *color, None, path);
        }
        DrawCommand::Text { .. } => {}
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.sketch.build_scene(ctx);
        let size = kurbo::Size::new(
            ctx.view_size.width * ctx.scale_factor,
            ctx.view_size.height * ctx.scale_factor,
        );
        if let Some(frame) = self.sketch.frame() {
            encode(&mut self.scene, frame, size);
        }
    }
}
