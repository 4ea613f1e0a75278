//! Accessors and programmatic selection/camera operations for
//! [`ViewEngine`].

use glam::Vec3;
use web_time::{Duration, Instant};

use super::ViewEngine;
use crate::camera::ControlsManager;
use crate::effects::EffectsManager;
use crate::info::{InfoLogger, SelectedObjectInfo};
use crate::options::Options;
use crate::picking::SelectionManager;
use crate::renderer::{Renderer, RendererPair};
use crate::scene::{Node, NodeId, Scene};

// ── Accessors ──

impl<R: Renderer> ViewEngine<R> {
    /// The scene graph.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access. Remove objects through
    /// [`remove_object`](Self::remove_object) so selection state stays
    /// consistent.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The main/overlay camera manager.
    #[must_use]
    pub fn cameras(&self) -> &ControlsManager {
        &self.cameras
    }

    /// Mutable camera manager.
    pub fn cameras_mut(&mut self) -> &mut ControlsManager {
        &mut self.cameras
    }

    /// The selection manager.
    #[must_use]
    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// The outline/effects manager.
    #[must_use]
    pub fn effects(&self) -> &EffectsManager {
        &self.effects
    }

    /// The main/overlay renderer pair.
    #[must_use]
    pub fn renderers(&self) -> &RendererPair<R> {
        &self.renderers
    }

    /// Mutable renderer pair.
    pub fn renderers_mut(&mut self) -> &mut RendererPair<R> {
        &mut self.renderers
    }

    /// The info-panel log.
    #[must_use]
    pub fn log(&self) -> &InfoLogger {
        &self.log
    }

    /// The info-panel display record.
    #[must_use]
    pub fn info(&self) -> &SelectedObjectInfo {
        self.selection.info()
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the options. Outline appearance applies to new artifacts;
    /// gesture thresholds apply immediately.
    pub fn set_options(&mut self, options: Options) {
        self.effects.set_options(options.outline.clone());
        self.selection
            .set_click_threshold(options.selection.click_threshold_px);
        self.selection.set_double_click_threshold(Duration::from_millis(
            options.selection.double_click_ms,
        ));
        self.options = options;
    }

    /// Whether a linked overlay keeps its top-left corner fixed on resize.
    pub fn set_overlay_compensation(&mut self, compensate: bool) {
        self.compensate_overlay = compensate;
    }

    /// Choose the direct (`true`) or composed (`false`) render path.
    pub fn set_antialiasing(&mut self, antialiasing: bool) {
        self.effects.set_antialiasing(antialiasing);
    }
}

// ── Selection ──

impl<R: Renderer> ViewEngine<R> {
    /// Turn pointer selection mode on or off.
    pub fn set_selecting(&mut self, enable: bool) {
        let (selection, mut ctx) = self.selection_parts();
        selection.set_selecting(enable, &mut ctx);
    }

    /// Selected nodes in selection order.
    #[must_use]
    pub fn selected_objects(&self) -> Vec<&Node> {
        self.selection
            .selected_objects()
            .iter()
            .filter_map(|id| self.scene.node(*id))
            .collect()
    }

    /// Add an object to the selected set.
    pub fn select_object(&mut self, id: NodeId) -> bool {
        let (selection, mut ctx) = self.selection_parts();
        selection.select(id, &mut ctx)
    }

    /// Remove an object from the selected set.
    pub fn deselect_object(&mut self, id: NodeId) -> bool {
        let (selection, mut ctx) = self.selection_parts();
        selection.deselect(id, &mut ctx)
    }

    /// Flip an object's selection. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, id: NodeId) -> bool {
        let (selection, mut ctx) = self.selection_parts();
        selection.toggle(id, &mut ctx)
    }

    /// Empty the selected set. Returns how many objects were deselected.
    pub fn clear_selection(&mut self) -> usize {
        let (selection, mut ctx) = self.selection_parts();
        selection.clear_all(&mut ctx)
    }

    /// Outline the first object named `name`.
    pub fn highlight_by_name(&mut self, name: &str) -> bool {
        match self.scene.object_by_name(name) {
            Some(id) => self.highlight_object(id),
            None => false,
        }
    }

    /// Outline one object independently of the selected set.
    pub fn highlight_object(&mut self, id: NodeId) -> bool {
        let (selection, mut ctx) = self.selection_parts();
        selection.highlight_object(id, &mut ctx)
    }

    /// Remove the programmatic highlight.
    pub fn disable_highlighting(&mut self) {
        let (selection, mut ctx) = self.selection_parts();
        selection.disable_highlighting(&mut ctx);
    }

    /// Remove a subtree from the scene, deselecting and unhovering anything
    /// in it first.
    pub fn remove_object(&mut self, id: NodeId) -> Option<Node> {
        let mut subtree = Vec::new();
        self.scene.traverse(id, |n| subtree.push(n.id()));
        let (selection, mut ctx) = self.selection_parts();
        selection.forget_objects(&subtree, &mut ctx);
        self.scene.remove(id)
    }
}

// ── Camera ──

impl<R: Renderer> ViewEngine<R> {
    /// Fly every camera toward object `id` (anywhere in the scene), ending
    /// at `position * 1.1 + offset`.
    pub fn look_at_object(&mut self, id: NodeId, offset: Vec3, now: Instant) -> bool {
        let duration =
            Duration::from_millis(self.options.selection.look_at_tween_ms);
        let root = self.scene.root();
        self.cameras
            .look_at_object(&self.scene, id, root, offset, duration, now)
    }

    /// Zoom every camera by `factor` over the configured zoom duration.
    pub fn zoom_to(&mut self, factor: f32, now: Instant) {
        let duration =
            Duration::from_millis(self.options.camera.zoom_duration_ms);
        self.cameras.zoom_to(factor, duration, now);
    }
}
