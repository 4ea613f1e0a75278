//! Orbit control: rotates, pans and dollies a camera around a target point.

use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec2, Vec3};

use super::core::{Camera, Projection};
use crate::input::{CanvasId, InputEvent, MouseButton};

const MIN_POLAR: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragMode {
    Rotate,
    Pan,
}

/// Orbit control bound to one camera and one canvas.
///
/// Input events accumulate rotation and pan deltas; [`update`](Self::update)
/// applies them (scaled by `damping_factor` when damping is enabled) and
/// re-orients the camera toward [`target`](Self::target).
#[derive(Debug, Clone)]
pub struct OrbitControls {
    /// The controlled camera.
    pub camera: Camera,
    /// World-space look-at point.
    pub target: Vec3,
    canvas: CanvasId,
    viewport: (u32, u32),
    /// Smooth out rotation and pan over several updates.
    pub enable_damping: bool,
    /// Fraction of the pending delta applied per update.
    pub damping_factor: f32,
    /// Spin around the up axis every update.
    pub auto_rotate: bool,
    /// Auto-rotation step in radians per update.
    pub auto_rotate_speed: f32,
    /// Whether the wheel dollies the camera.
    pub enable_zoom: bool,
    /// Rotation speed multiplier.
    pub rotate_speed: f32,
    /// Pan speed multiplier.
    pub pan_speed: f32,
    /// Dolly speed multiplier.
    pub zoom_speed: f32,
    spherical_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
    drag: Option<DragMode>,
    last_pointer: Vec2,
    shift_pressed: bool,
}

impl OrbitControls {
    /// Bind `camera` to `canvas`, orbiting `target`.
    #[must_use]
    pub fn new(camera: Camera, canvas: CanvasId, target: Vec3) -> Self {
        Self {
            camera,
            target,
            canvas,
            viewport: (1, 1),
            enable_damping: false,
            damping_factor: 0.05,
            auto_rotate: false,
            auto_rotate_speed: TAU / 60.0 / 30.0,
            enable_zoom: true,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            drag: None,
            last_pointer: Vec2::ZERO,
            shift_pressed: false,
        }
    }

    /// The canvas this control listens to.
    #[must_use]
    pub fn canvas(&self) -> CanvasId {
        self.canvas
    }

    /// Canvas size used to scale pointer deltas.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Record the canvas size (pixels).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    /// Whether a rotate or pan drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Feed an input event. Returns `true` if the event was consumed.
    ///
    /// Events from other canvases are ignored.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if let InputEvent::ModifiersChanged { shift } = *event {
            self.shift_pressed = shift;
            return false;
        }
        if event.canvas() != Some(self.canvas) {
            return false;
        }
        match *event {
            InputEvent::PointerDown { x, y, button, .. } => {
                self.last_pointer = Vec2::new(x, y);
                self.drag = match button {
                    MouseButton::Left if self.shift_pressed => Some(DragMode::Pan),
                    MouseButton::Left => Some(DragMode::Rotate),
                    MouseButton::Right | MouseButton::Middle => Some(DragMode::Pan),
                };
                true
            }
            InputEvent::PointerMove { x, y, .. } => {
                let current = Vec2::new(x, y);
                let delta = current - self.last_pointer;
                self.last_pointer = current;
                match self.drag {
                    Some(DragMode::Rotate) => {
                        self.rotate(delta);
                        true
                    }
                    Some(DragMode::Pan) => {
                        self.pan(delta);
                        true
                    }
                    None => false,
                }
            }
            InputEvent::PointerUp { .. } => self.drag.take().is_some(),
            InputEvent::Scroll { delta, .. } if self.enable_zoom => {
                self.dolly(delta);
                true
            }
            _ => false,
        }
    }

    /// Queue a rotation from a pointer delta in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let height = self.viewport.1 as f32;
        self.spherical_delta -= TAU * delta * self.rotate_speed / height;
    }

    /// Queue a pan from a pointer delta in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        let (width, height) = (self.viewport.0 as f32, self.viewport.1 as f32);
        let (per_px_x, per_px_y) = match self.camera.projection {
            Projection::Perspective { .. } => {
                let fovy = self.camera.effective_fovy().unwrap_or(50.0);
                let distance = self.camera.position.distance(self.target)
                    * (fovy.to_radians() * 0.5).tan();
                let unit = 2.0 * distance / height;
                (unit, unit)
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                zoom,
            } => (
                (right - left) / zoom / width,
                (top - bottom) / zoom / height,
            ),
        };
        self.pan_offset += (self.camera.right() * (-delta.x * per_px_x)
            + self.camera.camera_up() * (delta.y * per_px_y))
            * self.pan_speed;
    }

    /// Dolly in (`delta > 0`) or out (`delta < 0`).
    ///
    /// Perspective cameras change orbit radius; orthographic cameras change
    /// zoom.
    pub fn dolly(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.zoom_speed * delta.abs());
        let factor = if delta > 0.0 { step } else { 1.0 / step };
        match self.camera.projection {
            Projection::Perspective { .. } => self.scale *= factor,
            Projection::Orthographic { .. } => {
                let zoom = self.camera.zoom() / factor;
                self.camera.set_zoom(zoom.max(1e-4));
                self.camera.update_projection_matrix();
            }
        }
    }

    /// Apply pending deltas and auto-rotation, then re-orient the camera.
    ///
    /// Returns `true` if the camera moved.
    pub fn update(&mut self) -> bool {
        let before = (self.camera.position, self.camera.orientation);

        // Work in a frame where the camera's up hint is +Y
        let to_y_up = Quat::from_rotation_arc(self.camera.up.normalize_or(Vec3::Y), Vec3::Y);
        let offset = to_y_up * (self.camera.position - self.target);
        let radius = offset.length();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            PI * 0.5
        };

        if self.auto_rotate && self.drag.is_none() {
            theta -= self.auto_rotate_speed;
        }
        let applied = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        theta += self.spherical_delta.x * applied;
        phi += self.spherical_delta.y * applied;
        phi = phi.clamp(MIN_POLAR, PI - MIN_POLAR);
        let radius = (radius * self.scale).max(1e-3);

        self.target += self.pan_offset * applied;

        let local = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        self.camera.position = self.target + to_y_up.inverse() * local;
        self.camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        before.0.distance_squared(self.camera.position) > 1e-8
            || !before.1.abs_diff_eq(self.camera.orientation, 1e-6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn controls() -> OrbitControls {
        let mut camera = Camera::perspective(75.0, 1.0, 1.0, 1000.0);
        camera.position = Vec3::new(0.0, 0.0, 100.0);
        let mut controls = OrbitControls::new(camera, CanvasId::Main, Vec3::ZERO);
        controls.set_viewport(800, 600);
        let _ = controls.update();
        controls
    }

    fn down(x: f32, y: f32, button: MouseButton) -> InputEvent {
        InputEvent::PointerDown {
            canvas: CanvasId::Main,
            x,
            y,
            button,
        }
    }

    fn move_to(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove {
            canvas: CanvasId::Main,
            x,
            y,
        }
    }

    #[test]
    fn update_without_input_keeps_pose() {
        let mut controls = controls();
        let position = controls.camera.position;
        assert!(!controls.update());
        assert!(controls.camera.position.abs_diff_eq(position, 1e-4));
    }

    #[test]
    fn rotate_drag_keeps_radius() {
        let mut controls = controls();
        assert!(controls.handle_event(&down(100.0, 100.0, MouseButton::Left)));
        assert!(controls.handle_event(&move_to(160.0, 130.0)));
        assert!(controls.update());
        assert_relative_eq!(controls.camera.position.length(), 100.0, epsilon = 1e-2);
        assert!(controls.camera.forward().abs_diff_eq(
            (controls.target - controls.camera.position).normalize(),
            1e-4
        ));
    }

    #[test]
    fn right_drag_pans_target() {
        let mut controls = controls();
        let _ = controls.handle_event(&down(100.0, 100.0, MouseButton::Right));
        let _ = controls.handle_event(&move_to(50.0, 100.0));
        let _ = controls.update();
        assert!(controls.target.x > 0.0);
        assert_relative_eq!(controls.target.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn wheel_dollies_perspective_radius() {
        let mut controls = controls();
        let _ = controls.handle_event(&InputEvent::Scroll {
            canvas: CanvasId::Main,
            delta: 1.0,
        });
        let _ = controls.update();
        assert_relative_eq!(controls.camera.position.length(), 95.0, epsilon = 1e-2);
    }

    #[test]
    fn wheel_zooms_orthographic() {
        let camera = Camera::orthographic(-10.0, 10.0, 10.0, -10.0, 1.0, 100.0);
        let mut controls = OrbitControls::new(camera, CanvasId::Overlay, Vec3::ZERO);
        controls.dolly(1.0);
        assert_relative_eq!(controls.camera.zoom(), 1.0 / 0.95, epsilon = 1e-5);
    }

    #[test]
    fn other_canvas_is_ignored() {
        let mut controls = controls();
        assert!(!controls.handle_event(&InputEvent::PointerDown {
            canvas: CanvasId::Overlay,
            x: 0.0,
            y: 0.0,
            button: MouseButton::Left,
        }));
        assert!(!controls.is_dragging());
    }

    #[test]
    fn damping_spreads_rotation_over_updates() {
        let mut controls = controls();
        controls.enable_damping = true;
        controls.damping_factor = 0.25;
        controls.rotate(Vec2::new(100.0, 0.0));
        let _ = controls.update();
        let first = controls.camera.position;
        assert!(controls.update());
        assert!(!controls.camera.position.abs_diff_eq(first, 1e-4));
    }

    #[test]
    fn auto_rotate_spins_around_up() {
        let mut controls = controls();
        controls.auto_rotate = true;
        assert!(controls.update());
        assert_relative_eq!(controls.camera.position.y, 0.0, epsilon = 1e-4);
    }
}
