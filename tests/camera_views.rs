//! Projection swaps, overlay views and keyboard camera actions through
//! `ViewEngine`.

use std::time::Duration;

use approx::assert_relative_eq;
use detview::{
    camera::ProjectionKind,
    input::{CanvasId, InputEvent, KeyAction},
    options::Options,
    renderer::RecordingRenderer,
    scene::{Geometry, Node, Scene},
    ViewEngine,
};
use glam::Vec3;
use web_time::Instant;

fn engine(now: Instant) -> ViewEngine<RecordingRenderer> {
    let mut scene = Scene::new();
    let _ = scene.add_to_root(Node::mesh(
        "Det1",
        Geometry::cuboid(40.0, 40.0, 40.0),
        [1.0; 4],
    ));
    ViewEngine::new(
        RecordingRenderer::new(),
        scene,
        (200, 200),
        Options::default(),
        now,
    )
}

#[test]
fn projection_swap_keeps_target_plane_on_screen() {
    let now = Instant::now();
    let mut engine = engine(now);
    let anchor = Vec3::new(20.0, -15.0, 0.0);
    let before = engine
        .cameras()
        .main_camera()
        .view_projection()
        .project_point3(anchor);

    engine.execute(KeyAction::ToggleProjection, now);
    let camera = engine.cameras().main_camera();
    assert_eq!(camera.kind(), ProjectionKind::Orthographic);
    let after = camera.view_projection().project_point3(anchor);
    assert_relative_eq!(before.x, after.x, epsilon = 1e-4);
    assert_relative_eq!(before.y, after.y, epsilon = 1e-4);
}

#[test]
fn projection_round_trip_restores_pose_and_fov() {
    let now = Instant::now();
    let mut engine = engine(now);
    engine.cameras_mut().main_controls_mut().target = Vec3::new(4.0, 2.0, 0.0);
    let target = engine.cameras().main_controls().target;
    let position = engine.cameras().main_camera().position;
    let fovy = engine.cameras().main_camera().effective_fovy();
    let distance = position.distance(target);

    engine.execute(KeyAction::ToggleProjection, now);
    assert_eq!(engine.cameras().main_camera().effective_fovy(), None);
    engine.execute(KeyAction::ToggleProjection, now);

    let controls = engine.cameras().main_controls();
    assert_eq!(controls.camera.kind(), ProjectionKind::Perspective);
    assert_eq!(controls.target, target);
    assert!(
        controls.camera.position.abs_diff_eq(position, 1e-2),
        "camera at {} instead of {position}",
        controls.camera.position
    );
    assert_relative_eq!(
        controls.camera.position.distance(target),
        distance,
        epsilon = 1e-2
    );
    let restored = controls.camera.effective_fovy();
    assert!(fovy.is_some());
    assert_relative_eq!(restored.unwrap_or_default(), fovy.unwrap_or_default(), epsilon = 1e-4);
}

#[test]
fn renderer_sees_the_swapped_camera() {
    let now = Instant::now();
    let mut engine = engine(now);
    let _ = engine.frame(now);
    engine.execute(KeyAction::ToggleProjection, now);
    let _ = engine.frame(now + Duration::from_millis(16));
    let projections: Vec<ProjectionKind> = engine
        .renderers()
        .main()
        .records()
        .iter()
        .map(|r| r.projection)
        .collect();
    assert_eq!(
        projections,
        vec![ProjectionKind::Perspective, ProjectionKind::Orthographic]
    );
}

#[test]
fn linked_overlay_tracks_main_view() {
    let now = Instant::now();
    let mut engine = engine(now);
    engine.init_overlay(
        RecordingRenderer::new(),
        (100, 100),
        ProjectionKind::Orthographic,
    );
    assert_eq!(engine.handle_key("KeyL", now), Some(KeyAction::LinkOverlay));
    assert!(engine.cameras().is_overlay_linked());

    let _ = engine.frame(now);
    let overlay = engine.cameras().overlay_camera().unwrap();
    let main = engine.cameras().main_camera();
    assert!(overlay.forward().abs_diff_eq(main.forward(), 1e-4));

    let record = engine.renderers().overlay().and_then(|o| o.last().cloned());
    assert_eq!(
        record.map(|r| (r.canvas, r.projection)),
        Some((CanvasId::Overlay, ProjectionKind::Orthographic))
    );
}

#[test]
fn hidden_overlay_is_not_rendered() {
    let now = Instant::now();
    let mut engine = engine(now);
    engine.init_overlay(
        RecordingRenderer::new(),
        (100, 100),
        ProjectionKind::Perspective,
    );
    engine.renderers_mut().overlay_hidden = true;
    let _ = engine.frame(now);
    assert_eq!(engine.renderers().overlay().map(|o| o.records().len()), Some(0));
    assert_eq!(engine.renderers().main().records().len(), 1);
}

#[test]
fn main_resize_reaches_camera_and_renderer() {
    let now = Instant::now();
    let mut engine = engine(now);
    let _ = engine.handle_input(
        &InputEvent::Resized {
            canvas: CanvasId::Main,
            width: 400,
            height: 200,
        },
        now,
    );
    assert_eq!(engine.cameras().main_controls().viewport(), (400, 200));
    assert_eq!(engine.renderers().main().size(), (400, 200));
}

#[test]
fn zoom_keys_tween_towards_target() {
    let start = Instant::now();
    let mut engine = engine(start);
    let target = engine.cameras().main_controls().target;
    let before = engine.cameras().main_camera().position.distance(target);

    assert_eq!(engine.handle_key("Equal", start), Some(KeyAction::ZoomIn));
    let _ = engine.frame(start + Duration::from_millis(500));
    let after = engine.cameras().main_camera().position.distance(target);
    assert!(after < before, "{after} should be closer than {before}");
    assert_eq!(engine.cameras().main_controls().target, target);
}

#[test]
fn look_at_object_flies_camera_past_it() {
    let start = Instant::now();
    let mut scene = Scene::new();
    let det = scene.add_to_root(
        Node::mesh("Det2", Geometry::cuboid(10.0, 10.0, 10.0), [1.0; 4])
            .with_position(Vec3::new(50.0, 0.0, 0.0)),
    );
    let mut engine = ViewEngine::new(
        RecordingRenderer::new(),
        scene,
        (200, 200),
        Options::default(),
        start,
    );
    assert!(engine.look_at_object(det, Vec3::new(0.0, 0.0, 100.0), start));
    let _ = engine.frame(start + Duration::from_secs(1));
    // position * 1.1 + offset
    let position = engine.cameras().main_camera().position;
    assert!(
        position.abs_diff_eq(Vec3::new(55.0, 0.0, 100.0), 1e-3),
        "camera at {position}"
    );
}

#[test]
fn look_at_object_at_origin_is_ignored() {
    let now = Instant::now();
    let mut engine = engine(now);
    let det = engine.scene().object_by_name("Det1").unwrap();
    assert!(!engine.look_at_object(det, Vec3::ZERO, now));
    assert!(engine.cameras().tweens().is_empty());
}
