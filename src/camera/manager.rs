//! Camera/controls manager: the main camera+control pair, an optional
//! overlay pair, projection swaps, overlay linking and camera tweens.

use glam::{Vec2, Vec3};
use web_time::{Duration, Instant};

use super::controls::OrbitControls;
use super::core::{Camera, Projection, ProjectionKind};
use super::sync::{convert_camera, sync_camera};
use super::tween::{CameraTweens, Tween, TweenProperty, TweenValue};
use crate::input::{CanvasId, InputEvent};
use crate::options::CameraOptions;
use crate::scene::{NodeId, NodeKind, Scene};
use crate::util::easing::EasingFunction;

/// Extent scaling applied to a linked overlay after each sync.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OverlayFit {
    ratios: Vec2,
    compensate: bool,
}

/// Owns the main and (optional) overlay orbit controls.
///
/// Every overlay operation is a logged no-op while no overlay has been
/// initialised.
#[derive(Debug, Clone)]
pub struct ControlsManager {
    main: OrbitControls,
    overlay: Option<OrbitControls>,
    overlay_linked: bool,
    overlay_fit: Option<OverlayFit>,
    tweens: CameraTweens,
    options: CameraOptions,
}

fn aspect_of((width, height): (u32, u32)) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Recompute a camera's projection after its viewport aspect changed.
pub fn apply_aspect(camera: &mut Camera, aspect: f32) {
    match &mut camera.projection {
        Projection::Orthographic {
            right, top, bottom, ..
        } => {
            *top = *right / aspect;
            *bottom = -*top;
        }
        Projection::Perspective { aspect: a, .. } => *a = aspect,
    }
    camera.update_projection_matrix();
}

impl ControlsManager {
    /// Main perspective camera at the configured default view.
    #[must_use]
    pub fn new(viewport: (u32, u32), options: &CameraOptions) -> Self {
        let mut camera = Camera::perspective(
            options.fovy,
            aspect_of(viewport),
            options.znear,
            options.zfar,
        );
        camera.position = Vec3::from_array(options.position);
        let target = Vec3::from_array(options.target);
        camera.look_at(target);
        let mut main = OrbitControls::new(camera, CanvasId::Main, target);
        configure_controls(&mut main, options, viewport);
        main.auto_rotate = options.auto_rotate;
        let _ = main.update();
        Self {
            main,
            overlay: None,
            overlay_linked: false,
            overlay_fit: None,
            tweens: CameraTweens::default(),
            options: options.clone(),
        }
    }

    /// Create the overlay camera+control pair, showing the main view through
    /// a camera of model `kind`. Replaces any existing overlay.
    pub fn init_overlay(&mut self, viewport: (u32, u32), kind: ProjectionKind) {
        let camera = convert_camera(
            &self.main.camera,
            kind,
            self.main.target,
            self.options.fovy,
            Some(aspect_of(viewport)),
        );
        let mut overlay =
            OrbitControls::new(camera, CanvasId::Overlay, self.main.target);
        configure_controls(&mut overlay, &self.options, viewport);
        let _ = overlay.update();
        self.overlay = Some(overlay);
        log::debug!("overlay controls initialised ({kind:?})");
    }

    /// Drop the overlay pair and any tween targeting it.
    pub fn remove_overlay(&mut self) {
        self.overlay = None;
        self.overlay_linked = false;
        self.overlay_fit = None;
        self.tweens.cancel_canvas(CanvasId::Overlay);
    }

    /// Whether an overlay pair exists.
    #[must_use]
    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }

    /// Main orbit controls.
    #[must_use]
    pub fn main_controls(&self) -> &OrbitControls {
        &self.main
    }

    /// Main orbit controls, mutably.
    pub fn main_controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.main
    }

    /// Main camera.
    #[must_use]
    pub fn main_camera(&self) -> &Camera {
        &self.main.camera
    }

    /// Overlay orbit controls, if configured.
    #[must_use]
    pub fn overlay_controls(&self) -> Option<&OrbitControls> {
        self.overlay.as_ref()
    }

    /// Overlay orbit controls mutably, if configured.
    pub fn overlay_controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.overlay.as_mut()
    }

    /// Overlay camera, if configured.
    #[must_use]
    pub fn overlay_camera(&self) -> Option<&Camera> {
        self.overlay.as_ref().map(|c| &c.camera)
    }

    /// Controls bound to `canvas`.
    #[must_use]
    pub fn controls_for(&self, canvas: CanvasId) -> Option<&OrbitControls> {
        match canvas {
            CanvasId::Main => Some(&self.main),
            CanvasId::Overlay => self.overlay.as_ref(),
        }
    }

    fn controls_for_mut(
        &mut self,
        canvas: CanvasId,
    ) -> Option<&mut OrbitControls> {
        match canvas {
            CanvasId::Main => Some(&mut self.main),
            CanvasId::Overlay => self.overlay.as_mut(),
        }
    }

    /// Camera rendering into `canvas`.
    #[must_use]
    pub fn camera_for(&self, canvas: CanvasId) -> Option<&Camera> {
        self.controls_for(canvas).map(|c| &c.camera)
    }

    // ── Projection swaps ────────────────────────────────────────────────

    /// Replace the main camera with an equivalent one of model `kind`.
    ///
    /// The new control keeps the canvas, the exact orbit target and the
    /// auto-rotate flag of the one it replaces.
    pub fn swap_main_camera(&mut self, kind: ProjectionKind) {
        let auto_rotate = self.main.auto_rotate;
        let aspect = aspect_of(self.main.viewport());
        self.main = swapped_controls(&self.main, kind, &self.options, aspect);
        self.main.auto_rotate = auto_rotate;
        log::debug!("main camera swapped to {kind:?}");
    }

    /// Use an orthographic (`true`) or perspective (`false`) main camera.
    pub fn set_main_orthographic(&mut self, orthographic: bool) {
        let kind = if orthographic {
            ProjectionKind::Orthographic
        } else {
            ProjectionKind::Perspective
        };
        self.swap_main_camera(kind);
    }

    /// Toggle the overlay camera model. Returns whether the overlay is now
    /// orthographic, or `None` without an overlay.
    pub fn revert_overlay_camera(&mut self) -> Option<bool> {
        let Some(overlay) = self.overlay.as_ref() else {
            log::warn!("revert_overlay_camera: no overlay configured");
            return None;
        };
        let kind = match overlay.camera.kind() {
            ProjectionKind::Perspective => ProjectionKind::Orthographic,
            ProjectionKind::Orthographic => ProjectionKind::Perspective,
        };
        let aspect = aspect_of(overlay.viewport());
        let swapped = swapped_controls(overlay, kind, &self.options, aspect);
        self.overlay = Some(swapped);
        if self.overlay_linked {
            self.apply_linked_overlay();
        }
        Some(kind == ProjectionKind::Orthographic)
    }

    /// Exchange the main and overlay views.
    ///
    /// Each camera is rebuilt for the other canvas' aspect ratio; the main
    /// canvas keeps its auto-rotate flag.
    pub fn switch_contexts(&mut self) {
        let Some(overlay) = self.overlay.take() else {
            log::warn!("switch_contexts: no overlay configured");
            return;
        };
        let main_viewport = self.main.viewport();
        let overlay_viewport = overlay.viewport();
        let auto_rotate = self.main.auto_rotate;

        let mut new_main = rebind(&overlay, CanvasId::Main, &self.options, main_viewport);
        new_main.auto_rotate = auto_rotate;
        let new_overlay =
            rebind(&self.main, CanvasId::Overlay, &self.options, overlay_viewport);

        self.main = new_main;
        self.overlay = Some(new_overlay);
        self.tweens.cancel_canvas(CanvasId::Main);
        self.tweens.cancel_canvas(CanvasId::Overlay);
        log::debug!("switched main and overlay contexts");
    }

    // ── Viewports ───────────────────────────────────────────────────────

    /// Adapt the main camera to a new canvas size.
    pub fn resize_main(&mut self, width: u32, height: u32) {
        self.main.set_viewport(width, height);
        apply_aspect(&mut self.main.camera, aspect_of((width, height)));
    }

    /// Adapt the overlay camera to a new canvas size.
    ///
    /// While linked, the overlay is re-synced from the main camera and its
    /// orthographic extents are scaled by `ratios` (overlay size over main
    /// size). With `compensate`, the camera position and orbit target shift
    /// so the top-left corner of the view stays fixed. Unlinked overlays only
    /// adapt their aspect ratio.
    pub fn resize_overlay(
        &mut self,
        width: u32,
        height: u32,
        ratios: Option<Vec2>,
        compensate: bool,
    ) {
        let Some(overlay) = self.overlay.as_mut() else {
            log::warn!("resize_overlay: no overlay configured");
            return;
        };
        overlay.set_viewport(width, height);
        self.overlay_fit = ratios.map(|ratios| OverlayFit {
            ratios,
            compensate,
        });
        if self.overlay_linked {
            self.apply_linked_overlay();
        } else {
            apply_aspect(&mut overlay.camera, aspect_of((width, height)));
        }
    }

    // ── Overlay linking ─────────────────────────────────────────────────

    /// Toggle linking the overlay camera to the main camera. Returns the new
    /// state (always `false` without an overlay).
    pub fn link_overlay_to_main(&mut self) -> bool {
        if self.overlay.is_none() {
            log::warn!("link_overlay_to_main: no overlay configured");
            return false;
        }
        self.overlay_linked = !self.overlay_linked;
        if self.overlay_linked {
            self.apply_linked_overlay();
        }
        log::info!(
            "overlay {}",
            if self.overlay_linked { "linked" } else { "unlinked" }
        );
        self.overlay_linked
    }

    /// Whether the overlay follows the main camera.
    #[must_use]
    pub fn is_overlay_linked(&self) -> bool {
        self.overlay_linked
    }

    /// One-shot copy of the main camera pose and target into the overlay.
    pub fn sync_overlay_from_main(&mut self) {
        let Some(overlay) = self.overlay.as_mut() else {
            log::warn!("sync_overlay_from_main: no overlay configured");
            return;
        };
        let aspect = aspect_of(overlay.viewport());
        sync_camera(
            &self.main.camera,
            &mut overlay.camera,
            self.main.target,
            Some(aspect),
        );
        overlay.target = self.main.target;
    }

    fn apply_linked_overlay(&mut self) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        let Some(fit) = self.overlay_fit else {
            let aspect = aspect_of(overlay.viewport());
            sync_camera(
                &self.main.camera,
                &mut overlay.camera,
                self.main.target,
                Some(aspect),
            );
            overlay.target = self.main.target;
            return;
        };
        sync_camera(
            &self.main.camera,
            &mut overlay.camera,
            self.main.target,
            Some(aspect_of(self.main.viewport())),
        );
        overlay.target = self.main.target;
        scale_overlay_extents(overlay, fit);
    }

    // ── Zoom and targeting ──────────────────────────────────────────────

    /// Zoom every camera by `factor` over `duration`.
    ///
    /// Orthographic cameras tween `zoom` to `zoom / factor`; perspective
    /// cameras tween their position along the target→camera vector, scaled
    /// by `factor` (so `factor < 1` moves closer).
    pub fn zoom_to(&mut self, factor: f32, duration: Duration, now: Instant) {
        if factor <= 0.0 {
            return;
        }
        for canvas in [CanvasId::Main, CanvasId::Overlay] {
            let Some(controls) = self.controls_for(canvas) else {
                continue;
            };
            let camera = &controls.camera;
            if camera.is_orthographic() {
                let zoom = camera.zoom();
                self.tweens.start_scalar(
                    canvas,
                    TweenProperty::Zoom,
                    Tween::new(zoom, zoom / factor, now, duration, EasingFunction::Linear),
                );
            } else {
                let target = controls.target;
                let to = target + (camera.position - target) * factor;
                self.tweens.start_vector(
                    canvas,
                    TweenProperty::Position,
                    Tween::new(camera.position, to, now, duration, EasingFunction::Linear),
                );
            }
        }
    }

    /// Move every camera toward the object `id` (searched under `group`).
    ///
    /// The cameras travel to `position * 1.1 + offset` over the configured
    /// short duration. Objects at the world origin are ignored.
    pub fn look_at_object(
        &mut self,
        scene: &Scene,
        id: NodeId,
        group: NodeId,
        offset: Vec3,
        duration: Duration,
        now: Instant,
    ) -> bool {
        let in_group = scene.find(group, |n| n.id() == id).is_some();
        if !in_group {
            log::warn!("look_at_object: {id:?} not found under {group:?}");
            return false;
        }
        let Some(position) = object_position(scene, id) else {
            return false;
        };
        if position.length() <= 0.001 {
            return false;
        }
        let destination = position * 1.1 + offset;
        for canvas in [CanvasId::Main, CanvasId::Overlay] {
            if let Some(controls) = self.controls_for(canvas) {
                let from = controls.camera.position;
                self.tweens.start_vector(
                    canvas,
                    TweenProperty::Position,
                    Tween::new(from, destination, now, duration, EasingFunction::Linear),
                );
            }
        }
        true
    }

    /// Smoothly move the orbit target of `canvas` to `point`.
    pub fn animate_target(
        &mut self,
        canvas: CanvasId,
        point: Vec3,
        duration: Duration,
        easing: EasingFunction,
        now: Instant,
    ) -> bool {
        let Some(controls) = self.controls_for(canvas) else {
            log::warn!("animate_target: no controls for {canvas:?}");
            return false;
        };
        let from = controls.target;
        self.tweens.start_vector(
            canvas,
            TweenProperty::Target,
            Tween::new(from, point, now, duration, easing),
        );
        true
    }

    /// Smoothly move the main camera to `position` while retargeting it.
    pub fn animate_camera_transform(
        &mut self,
        position: Vec3,
        target: Vec3,
        duration: Duration,
        now: Instant,
    ) {
        let easing = EasingFunction::CubicOut;
        self.tweens.start_vector(
            CanvasId::Main,
            TweenProperty::Position,
            Tween::new(self.main.camera.position, position, now, duration, easing),
        );
        self.tweens.start_vector(
            CanvasId::Main,
            TweenProperty::Target,
            Tween::new(self.main.target, target, now, duration, easing),
        );
    }

    /// Running camera tweens.
    #[must_use]
    pub fn tweens(&self) -> &CameraTweens {
        &self.tweens
    }

    // ── Per-frame ───────────────────────────────────────────────────────

    /// Feed an input event to the controls of its canvas. Resize events
    /// adapt the matching camera. Returns `true` if consumed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Resized {
                canvas: CanvasId::Main,
                width,
                height,
            } => {
                self.resize_main(width, height);
                if self.overlay_linked {
                    self.apply_linked_overlay();
                }
                true
            }
            InputEvent::Resized {
                canvas: CanvasId::Overlay,
                width,
                height,
            } => {
                let fit = self.overlay_fit;
                self.resize_overlay(
                    width,
                    height,
                    fit.map(|f| f.ratios),
                    fit.is_none_or(|f| f.compensate),
                );
                self.overlay.is_some()
            }
            InputEvent::ModifiersChanged { .. } => {
                let _ = self.main.handle_event(event);
                if let Some(overlay) = self.overlay.as_mut() {
                    let _ = overlay.handle_event(event);
                }
                false
            }
            _ => match event.canvas() {
                Some(canvas) => self
                    .controls_for_mut(canvas)
                    .is_some_and(|c| c.handle_event(event)),
                None => false,
            },
        }
    }

    /// Advance tweens, apply control damping/auto-rotation and keep a linked
    /// overlay in sync. Returns `true` if any camera moved.
    pub fn update(&mut self, now: Instant) -> bool {
        let samples = self.tweens.advance(now);
        let tweened = !samples.is_empty();
        for sample in samples {
            let Some(controls) = self.controls_for_mut(sample.canvas) else {
                continue;
            };
            match (sample.property, sample.value) {
                (TweenProperty::Position, TweenValue::Vector(v)) => {
                    controls.camera.position = v;
                }
                (TweenProperty::Target, TweenValue::Vector(v)) => {
                    controls.target = v;
                }
                (TweenProperty::Zoom, TweenValue::Scalar(z)) => {
                    controls.camera.set_zoom(z);
                    controls.camera.update_projection_matrix();
                }
                _ => {}
            }
        }

        let mut moved = self.main.update() | tweened;
        if self.overlay_linked {
            self.apply_linked_overlay();
        } else if let Some(overlay) = self.overlay.as_mut() {
            moved |= overlay.update();
        }
        moved
    }
}

fn configure_controls(
    controls: &mut OrbitControls,
    options: &CameraOptions,
    viewport: (u32, u32),
) {
    controls.enable_damping = true;
    controls.damping_factor = options.damping_factor;
    controls.rotate_speed = options.rotate_speed;
    controls.pan_speed = options.pan_speed;
    controls.zoom_speed = options.zoom_speed;
    controls.auto_rotate_speed = options.auto_rotate_speed;
    controls.set_viewport(viewport.0, viewport.1);
}

/// New controls on the same canvas with an equivalent camera of `kind`.
fn swapped_controls(
    old: &OrbitControls,
    kind: ProjectionKind,
    options: &CameraOptions,
    aspect: f32,
) -> OrbitControls {
    let target = old.target;
    let camera = convert_camera(&old.camera, kind, target, options.fovy, Some(aspect));
    let mut controls = OrbitControls::new(camera, old.canvas(), target);
    configure_controls(&mut controls, options, old.viewport());
    controls.enable_zoom = old.enable_zoom;
    let _ = controls.update();
    controls
}

/// Copy of `old` bound to `canvas`, with its camera adapted to `viewport`.
fn rebind(
    old: &OrbitControls,
    canvas: CanvasId,
    options: &CameraOptions,
    viewport: (u32, u32),
) -> OrbitControls {
    let camera = convert_camera(
        &old.camera,
        old.camera.kind(),
        old.target,
        options.fovy,
        Some(aspect_of(viewport)),
    );
    let mut controls = OrbitControls::new(camera, canvas, old.target);
    configure_controls(&mut controls, options, viewport);
    let _ = controls.update();
    controls
}

fn scale_overlay_extents(overlay: &mut OrbitControls, fit: OverlayFit) {
    let camera = &mut overlay.camera;
    match &mut camera.projection {
        Projection::Orthographic {
            left,
            right,
            top,
            bottom,
            zoom,
        } => {
            let (old_left, old_top) = (*left, *top);
            *left *= fit.ratios.x;
            *right *= fit.ratios.x;
            *top *= fit.ratios.y;
            *bottom *= fit.ratios.y;
            if fit.compensate {
                let zoom = zoom.max(1e-6);
                let dx = (old_left - *left) / zoom;
                let dy = (old_top - *top) / zoom;
                let shift = camera.orientation * Vec3::X * dx
                    + camera.orientation * Vec3::Y * dy;
                camera.position += shift;
                overlay.target += shift;
            }
        }
        Projection::Perspective { aspect, .. } => {
            *aspect *= fit.ratios.x / fit.ratios.y.max(1e-6);
        }
    }
    overlay.camera.update_projection_matrix();
}

/// World-space focus position of an object.
///
/// Nodes with children resolve to the centroid of their leaf descendants'
/// positions. A leaf sitting at its parent's origin contributes its world
/// bounding-sphere center instead (hits, clusters and other baked
/// geometry). Returns `None` for unknown ids.
#[must_use]
pub fn object_position(scene: &Scene, id: NodeId) -> Option<Vec3> {
    let node = scene.node(id)?;
    if node.children().is_empty() {
        return Some(leaf_position(scene, id));
    }
    let mut sum = Vec3::ZERO;
    let mut count = 0u32;
    scene.traverse(id, |n| {
        if n.id() != id && n.children().is_empty() && n.kind != NodeKind::Outline {
            sum += leaf_position(scene, n.id());
            count += 1;
        }
    });
    if count == 0 {
        return Some(scene.world_position(id));
    }
    Some(sum / count as f32)
}

fn leaf_position(scene: &Scene, id: NodeId) -> Vec3 {
    let world = scene.world_matrix(id);
    let Some(node) = scene.node(id) else {
        return Vec3::ZERO;
    };
    match &node.geometry {
        Some(geometry) if node.transform.position == Vec3::ZERO => {
            world.transform_point3(geometry.bounding_sphere().center)
        }
        _ => world.transform_point3(Vec3::ZERO),
    }
}
