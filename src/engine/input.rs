//! Input routing and key actions for [`ViewEngine`].

use web_time::{Duration, Instant};

use super::ViewEngine;
use crate::camera::ProjectionKind;
use crate::input::{CanvasId, InputEvent, KeyAction};
use crate::picking::SelectionEvent;
use crate::renderer::Renderer;

impl<R: Renderer> ViewEngine<R> {
    /// Process a platform-agnostic input event.
    ///
    /// Resizes go to the cameras and renderers. Pointer events go to the
    /// selection manager first (gestures, double-click) and then to the
    /// orbit controls of their canvas. Returns what changed in the
    /// selection, if anything.
    pub fn handle_input(
        &mut self,
        event: &InputEvent,
        now: Instant,
    ) -> Option<SelectionEvent> {
        if let InputEvent::Resized {
            canvas,
            width,
            height,
        } = *event
        {
            self.resize(canvas, width, height);
            return None;
        }

        let (selection, mut ctx) = self.selection_parts();
        let outcome = selection.handle_event(event, &mut ctx, now);
        let _ = self.cameras.handle_event(event);
        outcome
    }

    fn resize(&mut self, canvas: CanvasId, width: u32, height: u32) {
        self.renderers.resize(canvas, width, height);
        let overlay_size = match canvas {
            CanvasId::Main => {
                let _ = self.cameras.handle_event(&InputEvent::Resized {
                    canvas,
                    width,
                    height,
                });
                self.cameras.overlay_controls().map(|c| c.viewport())
            }
            CanvasId::Overlay => {
                let Some(controls) = self.cameras.overlay_controls_mut() else {
                    log::warn!("overlay resize without an overlay");
                    return;
                };
                controls.set_viewport(width, height);
                Some((width, height))
            }
        };
        // Overlay extents follow the overlay/main size ratio.
        if let Some((w, h)) = overlay_size {
            let ratios = self.overlay_ratios();
            self.cameras
                .resize_overlay(w, h, ratios, self.compensate_overlay);
        }
    }

    /// Run the action bound to `key` (e.g. `"KeyS"`). Returns the action
    /// that ran.
    pub fn handle_key(&mut self, key: &str, now: Instant) -> Option<KeyAction> {
        let action = self.options.keybindings.lookup(key)?;
        self.execute(action, now);
        Some(action)
    }

    /// Run one key action.
    pub fn execute(&mut self, action: KeyAction, now: Instant) {
        let zoom_duration =
            Duration::from_millis(self.options.camera.zoom_duration_ms);
        let zoom_step = self.options.camera.zoom_step.max(f32::EPSILON);
        match action {
            KeyAction::ToggleSelecting => {
                let enable = !self.selection.is_selecting();
                self.set_selecting(enable);
            }
            KeyAction::ToggleProjection => {
                let orthographic = self.cameras.main_camera().kind()
                    == ProjectionKind::Perspective;
                self.cameras.set_main_orthographic(orthographic);
            }
            KeyAction::ZoomIn => {
                self.cameras.zoom_to(1.0 / zoom_step, zoom_duration, now);
            }
            KeyAction::ZoomOut => {
                self.cameras.zoom_to(zoom_step, zoom_duration, now);
            }
            KeyAction::ClearSelection => {
                let _ = self.clear_selection();
            }
            KeyAction::LinkOverlay => {
                let _ = self.cameras.link_overlay_to_main();
            }
            KeyAction::SyncOverlay => self.cameras.sync_overlay_from_main(),
            KeyAction::SwitchContexts => self.cameras.switch_contexts(),
            KeyAction::ToggleAutoRotate => {
                let controls = self.cameras.main_controls_mut();
                controls.auto_rotate = !controls.auto_rotate;
            }
        }
    }
}
