//! The view engine: owns the scene, cameras, selection, effects and
//! renderers, and drives them once per frame.

mod accessors;
mod input;

use glam::Vec2;
use web_time::Instant;

use crate::camera::{ControlsManager, ProjectionKind};
use crate::effects::EffectsManager;
use crate::info::InfoLogger;
use crate::options::Options;
use crate::picking::{SelectionContext, SelectionManager};
use crate::renderer::{Renderer, RendererPair};
use crate::scene::Scene;
use crate::util::frame_timing::FrameTiming;

/// The viewer's context object: owns the scene and every manager, routes
/// input and runs the per-frame ordering contract.
///
/// Within one [`frame`](Self::frame): camera tweens and orbit controls are
/// advanced, then at most one throttled hit test runs and its hover result
/// is applied, then the scene is rendered (outline time uniforms first).
pub struct ViewEngine<R: Renderer> {
    pub(crate) scene: Scene,
    pub(crate) cameras: ControlsManager,
    pub(crate) selection: SelectionManager,
    pub(crate) effects: EffectsManager,
    pub(crate) renderers: RendererPair<R>,
    pub(crate) log: InfoLogger,
    pub(crate) options: Options,
    pub(crate) frame_timing: FrameTiming,
    /// Keep the overlay's top-left corner fixed when a linked overlay is
    /// resized.
    pub(crate) compensate_overlay: bool,
}

impl<R: Renderer> ViewEngine<R> {
    /// Engine drawing `scene` through `renderer` onto a main canvas of
    /// `viewport` pixels.
    #[must_use]
    pub fn new(
        renderer: R,
        scene: Scene,
        viewport: (u32, u32),
        options: Options,
        now: Instant,
    ) -> Self {
        let mut renderers = RendererPair::new(renderer);
        renderers.resize(crate::input::CanvasId::Main, viewport.0, viewport.1);
        Self {
            cameras: ControlsManager::new(viewport, &options.camera),
            selection: SelectionManager::new(&options.selection),
            effects: EffectsManager::new(options.outline.clone(), now),
            log: InfoLogger::new(options.selection.log_capacity),
            frame_timing: FrameTiming::new(0, now),
            scene,
            renderers,
            options,
            compensate_overlay: true,
        }
    }

    /// Add the overlay canvas with its own renderer and camera model.
    pub fn init_overlay(
        &mut self,
        mut renderer: R,
        viewport: (u32, u32),
        kind: ProjectionKind,
    ) {
        renderer.resize(viewport.0, viewport.1);
        let _ = self.renderers.set_overlay(renderer);
        self.cameras.init_overlay(viewport, kind);
        log::info!("overlay initialised ({}x{}, {kind:?})", viewport.0, viewport.1);
    }

    /// Remove the overlay canvas.
    pub fn remove_overlay(&mut self) {
        let _ = self.renderers.remove_overlay();
        self.cameras.remove_overlay();
    }

    /// Run one frame. Returns `true` if any camera moved.
    pub fn frame(&mut self, now: Instant) -> bool {
        let elapsed = self.frame_timing.begin_frame(now).as_secs_f32();
        let current_fps = if elapsed > 0.0 { 1.0 / elapsed } else { 0.0 };

        let moved = self.cameras.update(now);

        let (selection, mut ctx) = self.selection_parts();
        let _ = selection.process_frame(current_fps, &mut ctx);

        self.effects.render(
            &mut self.renderers,
            &mut self.scene,
            &self.cameras.main_controls().camera,
            self.cameras.overlay_camera(),
            now,
        );
        moved
    }

    /// Tear down every outline artifact and leave selection mode.
    pub fn dispose(&mut self) {
        let (selection, mut ctx) = self.selection_parts();
        selection.set_selecting(false, &mut ctx);
        self.effects.dispose(&mut self.scene);
    }

    pub(crate) fn selection_parts(
        &mut self,
    ) -> (&mut SelectionManager, SelectionContext<'_>) {
        (
            &mut self.selection,
            SelectionContext {
                scene: &mut self.scene,
                effects: &mut self.effects,
                cameras: &mut self.cameras,
                log: &mut self.log,
            },
        )
    }

    /// Overlay size over main size, per axis.
    pub(crate) fn overlay_ratios(&self) -> Option<Vec2> {
        let (mw, mh) = self.cameras.main_controls().viewport();
        let (ow, oh) = self.cameras.overlay_controls()?.viewport();
        Some(Vec2::new(
            ow as f32 / mw.max(1) as f32,
            oh as f32 / mh.max(1) as f32,
        ))
    }
}
