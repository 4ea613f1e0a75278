//! Renderer contract and the main/overlay renderer pair.
//!
//! The managers never talk to a graphics API directly: they hand a
//! [`RenderFrame`] to a [`Renderer`] and tell it when a node's GPU
//! resources can be dropped. [`RecordingRenderer`] implements the contract
//! without a GPU for tests and headless runs; the `gpu` feature provides a
//! wgpu implementation in [`crate::gpu::scene_renderer`].

use crate::camera::{Camera, ProjectionKind};
use crate::effects::compositor::{PassKind, RenderPath};
use crate::input::CanvasId;
use crate::scene::{NodeId, NodeKind, Scene};

/// Everything a renderer needs to draw one canvas.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    /// Scene to draw.
    pub scene: &'a Scene,
    /// Camera to draw through.
    pub camera: &'a Camera,
    /// Target canvas.
    pub canvas: CanvasId,
    /// Direct draw or composed pass chain.
    pub path: &'a RenderPath,
    /// Outline artifact nodes present in the scene.
    pub outlines: &'a [NodeId],
}

impl RenderFrame<'_> {
    /// Whether `kind` nodes are drawn by `pass`.
    ///
    /// On the direct path every visible node is drawn in one go; on the
    /// composed path the base pass skips outlines and the outline pass
    /// draws only outlines.
    #[must_use]
    pub fn draws(&self, pass: Option<PassKind>, kind: NodeKind) -> bool {
        match (pass, kind) {
            (None, _) => true,
            (Some(PassKind::Base), k) => k != NodeKind::Outline,
            (Some(PassKind::Outline), k) => k == NodeKind::Outline,
        }
    }
}

/// Backend that draws scenes onto one canvas.
pub trait Renderer {
    /// Draw one frame.
    fn render(&mut self, frame: &RenderFrame<'_>);

    /// Drop any cached GPU resources belonging to `node`.
    fn release(&mut self, node: NodeId);

    /// Canvas size changed.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Main renderer plus an optional overlay renderer.
///
/// The overlay is drawn only when present, not hidden and not fixed.
#[derive(Debug)]
pub struct RendererPair<R: Renderer> {
    main: R,
    overlay: Option<R>,
    /// Overlay canvas is hidden by the user.
    pub overlay_hidden: bool,
    /// Overlay shows a frozen image and is not redrawn.
    pub fixed_overlay: bool,
}

impl<R: Renderer> RendererPair<R> {
    /// Pair with no overlay renderer.
    #[must_use]
    pub fn new(main: R) -> Self {
        Self {
            main,
            overlay: None,
            overlay_hidden: false,
            fixed_overlay: false,
        }
    }

    /// Install the overlay renderer, returning the previous one.
    pub fn set_overlay(&mut self, overlay: R) -> Option<R> {
        self.overlay.replace(overlay)
    }

    /// Remove the overlay renderer.
    pub fn remove_overlay(&mut self) -> Option<R> {
        self.overlay.take()
    }

    /// Main canvas renderer.
    #[must_use]
    pub fn main(&self) -> &R {
        &self.main
    }

    /// Main canvas renderer, mutably.
    pub fn main_mut(&mut self) -> &mut R {
        &mut self.main
    }

    /// Overlay renderer, if installed.
    #[must_use]
    pub fn overlay(&self) -> Option<&R> {
        self.overlay.as_ref()
    }

    /// Overlay renderer, mutably.
    pub fn overlay_mut(&mut self) -> Option<&mut R> {
        self.overlay.as_mut()
    }

    /// Whether the overlay would be drawn this frame.
    #[must_use]
    pub fn overlay_drawable(&self) -> bool {
        self.overlay.is_some() && !self.overlay_hidden && !self.fixed_overlay
    }

    /// Draw the main canvas.
    pub fn render_main(&mut self, frame: &RenderFrame<'_>) {
        self.main.render(frame);
    }

    /// Draw the overlay canvas if it is drawable. Returns whether it drew.
    pub fn render_overlay(&mut self, frame: &RenderFrame<'_>) -> bool {
        if !self.overlay_drawable() {
            return false;
        }
        match self.overlay.as_mut() {
            Some(overlay) => {
                overlay.render(frame);
                true
            }
            None => false,
        }
    }

    /// Release `node` on both renderers.
    pub fn release(&mut self, node: NodeId) {
        self.main.release(node);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.release(node);
        }
    }

    /// Forward a resize to the renderer of `canvas`.
    pub fn resize(&mut self, canvas: CanvasId, width: u32, height: u32) {
        match canvas {
            CanvasId::Main => self.main.resize(width, height),
            CanvasId::Overlay => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.resize(width, height);
                }
            }
        }
    }
}

/// What one recorded render call looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRecord {
    /// Canvas drawn.
    pub canvas: CanvasId,
    /// Projection model of the camera used.
    pub projection: ProjectionKind,
    /// Path used.
    pub path: RenderPath,
    /// Outline artifacts passed in.
    pub outline_count: usize,
    /// Visible nodes with geometry.
    pub drawn_nodes: usize,
    /// `time` uniform of the first outline, if any.
    pub outline_time: Option<f32>,
}

/// Renderer that records calls instead of drawing.
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    records: Vec<RenderRecord>,
    released: Vec<NodeId>,
    size: (u32, u32),
}

impl RecordingRenderer {
    /// Renderer with nothing recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every render call so far.
    #[must_use]
    pub fn records(&self) -> &[RenderRecord] {
        &self.records
    }

    /// Most recent render call.
    #[must_use]
    pub fn last(&self) -> Option<&RenderRecord> {
        self.records.last()
    }

    /// Nodes released so far, in order.
    #[must_use]
    pub fn released(&self) -> &[NodeId] {
        &self.released
    }

    /// Last size passed to [`Renderer::resize`].
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Forget recorded calls.
    pub fn clear(&mut self) {
        self.records.clear();
        self.released.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let mut drawn_nodes = 0;
        frame.scene.traverse_visible(frame.scene.root(), |node| {
            if node.geometry.is_some() {
                drawn_nodes += 1;
            }
        });
        let outline_time = frame
            .outlines
            .first()
            .and_then(|id| frame.scene.node(*id))
            .and_then(|n| n.outline_material())
            .map(crate::effects::material::OutlineMaterial::time);
        self.records.push(RenderRecord {
            canvas: frame.canvas,
            projection: frame.camera.kind(),
            path: frame.path.clone(),
            outline_count: frame.outlines.len(),
            drawn_nodes,
            outline_time,
        });
    }

    fn release(&mut self, node: NodeId) {
        self.released.push(node);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, Node};

    fn frame_parts() -> (Scene, Camera) {
        let mut scene = Scene::new();
        let _ = scene.add_to_root(Node::mesh(
            "Module",
            Geometry::cuboid(1.0, 1.0, 1.0),
            [1.0; 4],
        ));
        (scene, Camera::perspective(75.0, 1.0, 1.0, 100.0))
    }

    #[test]
    fn overlay_drawn_only_when_present_visible_and_live() {
        let (scene, camera) = frame_parts();
        let frame = RenderFrame {
            scene: &scene,
            camera: &camera,
            canvas: CanvasId::Overlay,
            path: &RenderPath::Direct,
            outlines: &[],
        };
        let mut pair = RendererPair::new(RecordingRenderer::new());
        assert!(!pair.render_overlay(&frame));

        let _ = pair.set_overlay(RecordingRenderer::new());
        assert!(pair.render_overlay(&frame));

        pair.overlay_hidden = true;
        assert!(!pair.render_overlay(&frame));
        pair.overlay_hidden = false;
        pair.fixed_overlay = true;
        assert!(!pair.render_overlay(&frame));

        let overlay = pair.overlay().map(|o| o.records().len());
        assert_eq!(overlay, Some(1));
    }

    #[test]
    fn recording_captures_frame() {
        let (scene, camera) = frame_parts();
        let mut renderer = RecordingRenderer::new();
        renderer.render(&RenderFrame {
            scene: &scene,
            camera: &camera,
            canvas: CanvasId::Main,
            path: &RenderPath::Composed(vec![PassKind::Base]),
            outlines: &[],
        });
        let record = renderer.last().cloned();
        let record = record.as_ref();
        assert_eq!(record.map(|r| r.drawn_nodes), Some(1));
        assert_eq!(record.map(|r| r.projection), Some(ProjectionKind::Perspective));
        assert_eq!(record.map(|r| r.outline_count), Some(0));
    }

    #[test]
    fn release_reaches_both_renderers() {
        let mut pair = RendererPair::new(RecordingRenderer::new());
        let _ = pair.set_overlay(RecordingRenderer::new());
        pair.release(NodeId(7));
        assert_eq!(pair.main().released(), &[NodeId(7)]);
        assert_eq!(pair.overlay().map(|o| o.released().len()), Some(1));
    }

    #[test]
    fn pass_node_filtering() {
        let (scene, camera) = frame_parts();
        let frame = RenderFrame {
            scene: &scene,
            camera: &camera,
            canvas: CanvasId::Main,
            path: &RenderPath::Direct,
            outlines: &[],
        };
        assert!(frame.draws(None, NodeKind::Outline));
        assert!(!frame.draws(Some(PassKind::Base), NodeKind::Outline));
        assert!(frame.draws(Some(PassKind::Outline), NodeKind::Outline));
        assert!(!frame.draws(Some(PassKind::Outline), NodeKind::Mesh));
    }
}
