//! Frame building against a live scene and controller.

use kurbo::{Affine, Point, Rect, Shape as _, Size, Vec2};
use sketchpad_core::shapes::{SerializableColor, ShapeUpdate};
use sketchpad_core::{CanvasConfig, InputEvent, InteractionController, Scene, Shape, Viewport};
use sketchpad_render::{DrawCommand, RenderContext, Renderer, SketchRenderer};

const VIEW: Size = Size::new(800.0, 600.0);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene_with(shapes: Vec<Shape>) -> Scene {
    init_logger();
    let mut scene = Scene::new(CanvasConfig::default());
    for shape in shapes {
        scene.add_shape(shape);
    }
    scene.drain_changes();
    scene
}

fn strokes(frame: &sketchpad_render::Frame, index: usize) -> Vec<kurbo::BezPath> {
    frame.shapes[index].stroke_paths().cloned().collect()
}

#[test]
fn test_same_shape_renders_identically() {
    let shape = Shape::rectangle(Rect::new(0.0, 0.0, 120.0, 90.0));
    let scene = scene_with(vec![shape.clone()]);

    let first = SketchRenderer::new().build_frame(&RenderContext::new(&scene, VIEW));
    let second = SketchRenderer::new().build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(strokes(&first, 0), strokes(&second, 0));

    // Moving a shape does not change its local strokes.
    let mut moved = scene_with(vec![shape.clone()]);
    moved.update_shape(shape.id, &ShapeUpdate::position(Point::new(300.0, 200.0)));
    let third = SketchRenderer::new().build_frame(&RenderContext::new(&moved, VIEW));
    assert_eq!(strokes(&first, 0), strokes(&third, 0));
    assert_eq!(third.shapes[0].transform, Affine::translate(Vec2::new(300.0, 200.0)));
}

#[test]
fn test_different_ids_render_differently() {
    let a = Shape::rectangle(Rect::new(0.0, 0.0, 120.0, 90.0));
    let b = Shape::rectangle(Rect::new(0.0, 0.0, 120.0, 90.0));
    let scene = scene_with(vec![a, b]);
    let frame = SketchRenderer::new().build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(frame.shapes.len(), 2);
    assert_ne!(strokes(&frame, 0), strokes(&frame, 1));
}

#[test]
fn test_broken_preview_does_not_abort_frame() {
    let good = Shape::ellipse(Rect::new(0.0, 0.0, 50.0, 50.0));
    let scene = scene_with(vec![good.clone()]);
    let mut broken = Shape::rectangle(Rect::new(0.0, 0.0, 10.0, 10.0));
    broken.position = Point::new(f64::NAN, 0.0);

    let ctx = RenderContext::new(&scene, VIEW).with_previews(vec![broken.clone()]);
    let frame = SketchRenderer::new().build_frame(&ctx);
    assert_eq!(frame.shape_ids(), vec![good.id]);
    assert_eq!(frame.skipped, vec![broken.id]);
}

#[test]
fn test_editing_line_keeps_gap_without_label() {
    let line = Shape::line(Point::new(0.0, 0.0), Point::new(300.0, 0.0)).with_text("hi");
    let scene = scene_with(vec![line.clone()]);
    let mut renderer = SketchRenderer::new();

    let frame = renderer.build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(frame.shapes[0].text(), Some("hi"));
    assert_eq!(frame.shapes[0].stroke_paths().count(), 2);

    let editing = RenderContext::new(&scene, VIEW).with_editing_shape(Some(line.id));
    let frame = renderer.build_frame(&editing);
    assert_eq!(frame.shapes[0].text(), None);
    assert_eq!(frame.shapes[0].stroke_paths().count(), 2);
}

#[test]
fn test_cache_follows_change_journal() {
    let a = Shape::rectangle(Rect::new(0.0, 0.0, 40.0, 40.0));
    let b = Shape::rectangle(Rect::new(100.0, 0.0, 140.0, 40.0));
    let mut scene = scene_with(vec![a.clone(), b.clone()]);
    let mut renderer = SketchRenderer::new();

    renderer.build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(renderer.last_stats().misses, 2);
    renderer.build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(renderer.last_stats().hits, 2);

    scene.update_shape(a.id, &ShapeUpdate::position(Point::new(5.0, 5.0)));
    renderer.apply_changes(&scene.drain_changes());
    assert_eq!(renderer.cache_len(), 1);
    renderer.build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(renderer.last_stats().hits, 1);
    assert_eq!(renderer.last_stats().misses, 1);

    scene.delete_shape(b.id);
    renderer.apply_changes(&scene.drain_changes());
    let frame = renderer.build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(frame.shape_ids(), vec![a.id]);
    assert_eq!(renderer.cache_len(), 1);
}

#[test]
fn test_handles_keep_screen_size() {
    let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 80.0));
    let mut scene = scene_with(vec![shape.clone()]);
    scene.set_selected([shape.id]);
    scene.set_viewport(Viewport::new(0.0, 0.0, 2.0));

    let frame = SketchRenderer::new().build_frame(&RenderContext::new(&scene, VIEW));
    // Dashed outline, then a fill and a stroke per handle.
    assert_eq!(frame.overlay.len(), 1 + 9 * 2);
    match &frame.overlay[1] {
        DrawCommand::Fill { path, .. } => {
            let bounds = path.bounding_box();
            assert!((bounds.width() - 4.0).abs() < 1e-6, "{bounds:?}");
        }
        other => panic!("expected handle fill, got {other:?}"),
    }
}

#[test]
fn test_multi_selection_has_outlines_only() {
    let a = Shape::rectangle(Rect::new(0.0, 0.0, 40.0, 40.0));
    let b = Shape::line(Point::new(100.0, 0.0), Point::new(200.0, 50.0));
    let c = Shape::ellipse(Rect::new(0.0, 100.0, 40.0, 140.0));
    let mut scene = scene_with(vec![a.clone(), b.clone(), c.clone()]);
    scene.set_selected([a.id, b.id, c.id]);

    let frame = SketchRenderer::new().build_frame(&RenderContext::new(&scene, VIEW));
    assert_eq!(frame.overlay.len(), 2);
    assert!(frame
        .overlay
        .iter()
        .all(|c| matches!(c, DrawCommand::Stroke { dash: Some(_), .. })));
}

#[test]
fn test_controller_gestures_reach_the_frame() {
    let shape = Shape::rectangle(Rect::new(0.0, 0.0, 100.0, 80.0));
    let mut scene = scene_with(vec![shape.clone()]);
    let mut controller = InteractionController::new(CanvasConfig::default(), VIEW);
    let mut renderer = SketchRenderer::new();

    // Drag the shape: screen (450, 340) is document (50, 40).
    controller.handle_event(&mut scene, InputEvent::pointer_down(Point::new(450.0, 340.0)));
    controller.handle_event(&mut scene, InputEvent::pointer_move(Point::new(470.0, 350.0)));
    renderer.build_scene(&RenderContext::from_controller(&scene, &controller));
    let frame = renderer.frame().unwrap();
    assert_eq!(frame.shapes[0].transform, Affine::translate(Vec2::new(20.0, 10.0)));
    assert_eq!(scene.shape(shape.id).unwrap().position, Point::ZERO);
    controller.handle_event(&mut scene, InputEvent::pointer_up(Point::new(470.0, 350.0)));

    // Marquee over empty space.
    controller.handle_event(&mut scene, InputEvent::pointer_down(Point::new(700.0, 500.0)));
    controller.handle_event(&mut scene, InputEvent::pointer_move(Point::new(750.0, 550.0)));
    let ctx = RenderContext::from_controller(&scene, &controller);
    assert_eq!(ctx.selection_rect, Some(Rect::new(300.0, 200.0, 350.0, 250.0)));
    let frame = renderer.build_frame(&ctx);
    let marquee_fill = &frame.overlay[frame.overlay.len() - 2];
    assert!(matches!(marquee_fill, DrawCommand::Fill { .. }));
}

#[test]
fn test_theme_sets_background() {
    let mut scene = scene_with(Vec::new());
    let mut renderer = SketchRenderer::new();
    let light = renderer.build_frame(&RenderContext::new(&scene, VIEW)).background;
    scene.toggle_theme();
    let ctx = RenderContext::new(&scene, VIEW);
    let dark = renderer.build_frame(&ctx).background;
    assert_ne!(SerializableColor::from(light), SerializableColor::from(dark));
    assert_eq!(
        SerializableColor::from(renderer.background_color(&ctx)),
        scene.theme().background()
    );
}

#[test]
fn test_view_transform_includes_scale_factor() {
    let scene = scene_with(Vec::new());
    let ctx = RenderContext::new(&scene, VIEW).with_scale_factor(2.0);
    let origin = ctx.view_transform() * Point::ZERO;
    assert_eq!(origin, Point::new(800.0, 600.0));
}
