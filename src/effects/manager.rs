//! Outline/effects manager: owns every outline artifact and picks the
//! render path each frame.
//!
//! Artifacts are added at the scene root (siblings of their source, with
//! the source's local transform copied) and are the only outline nodes in
//! the scene. Removing one queues its node for release on the renderers,
//! which happens at the start of the next [`EffectsManager::render`].

use web_time::Instant;

use super::compositor::{Compositor, PassContext, RenderPath};
use super::edges::edges_geometry;
use super::material::{OutlineMaterial, OutlineStyle};
use crate::camera::Camera;
use crate::input::CanvasId;
use crate::options::OutlineOptions;
use crate::renderer::{RenderFrame, Renderer, RendererPair};
use crate::scene::{Node, NodeId, NodeKind, Scene, Topology};

/// One outline: the source object and the artifact node ringing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineArtifact {
    /// Object being outlined.
    pub source: NodeId,
    /// Outline node at the scene root.
    pub node: NodeId,
}

/// Creates, tracks and releases outline artifacts.
#[derive(Debug)]
pub struct EffectsManager {
    options: OutlineOptions,
    hover: Option<OutlineArtifact>,
    /// Sticky selections in selection order.
    selections: Vec<OutlineArtifact>,
    /// Programmatic single highlight.
    highlight: Option<OutlineArtifact>,
    pending_releases: Vec<NodeId>,
    released: usize,
    antialiasing: bool,
    compositor: Compositor,
    epoch: Instant,
}

impl EffectsManager {
    /// Manager with no artifacts; `now` starts the outline clock.
    #[must_use]
    pub fn new(options: OutlineOptions, now: Instant) -> Self {
        Self {
            options,
            hover: None,
            selections: Vec::new(),
            highlight: None,
            pending_releases: Vec::new(),
            released: 0,
            antialiasing: true,
            compositor: Compositor::new(),
            epoch: now,
        }
    }

    /// Replace the outline appearance options (affects new artifacts).
    pub fn set_options(&mut self, options: OutlineOptions) {
        self.options = options;
    }

    // ── Render path ──────────────────────────────────────────────────────

    /// Select the direct (`true`) or composed (`false`) render path.
    pub fn set_antialiasing(&mut self, antialiasing: bool) {
        self.antialiasing = antialiasing;
    }

    /// Whether the direct render path is selected.
    #[must_use]
    pub fn antialiasing(&self) -> bool {
        self.antialiasing
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// Source object of the hover outline.
    #[must_use]
    pub fn hovered(&self) -> Option<NodeId> {
        self.hover.map(|a| a.source)
    }

    /// Whether `source` has a sticky selection outline.
    #[must_use]
    pub fn is_selected(&self, source: NodeId) -> bool {
        self.selections.iter().any(|a| a.source == source)
    }

    /// Sticky selections in selection order.
    #[must_use]
    pub fn selected_objects(&self) -> Vec<NodeId> {
        self.selections.iter().map(|a| a.source).collect()
    }

    /// Number of sticky selections.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selections.len()
    }

    /// Source of the programmatic highlight.
    #[must_use]
    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlight.map(|a| a.source)
    }

    /// Every artifact currently in the scene.
    pub fn artifacts(&self) -> impl Iterator<Item = &OutlineArtifact> {
        self.hover
            .iter()
            .chain(self.selections.iter())
            .chain(self.highlight.iter())
    }

    /// Outline nodes currently in the scene.
    #[must_use]
    pub fn outline_nodes(&self) -> Vec<NodeId> {
        self.artifacts().map(|a| a.node).collect()
    }

    /// Number of outline artifacts currently in the scene.
    #[must_use]
    pub fn active_outlines(&self) -> usize {
        self.artifacts().count()
    }

    /// Artifacts removed since construction.
    #[must_use]
    pub fn released_count(&self) -> usize {
        self.released
    }

    // ── Hover ────────────────────────────────────────────────────────────

    /// Move the hover outline to `target`, or clear it with `None`.
    ///
    /// Selected objects never get a hover outline. Returns whether the
    /// hover changed.
    pub fn set_hover_outline(
        &mut self,
        scene: &mut Scene,
        target: Option<NodeId>,
    ) -> bool {
        let target = target.filter(|id| !self.is_selected(*id));
        if self.hovered() == target {
            return false;
        }
        if let Some(previous) = self.hover.take() {
            self.remove_artifact(scene, previous);
        }
        self.hover = target.and_then(|source| {
            self.create_artifact(scene, source, OutlineStyle::Hover)
        });
        true
    }

    // ── Sticky selection ─────────────────────────────────────────────────

    /// Add `source` to the selection. Returns `false` if it was already
    /// selected or cannot be outlined.
    pub fn select_object(&mut self, scene: &mut Scene, source: NodeId) -> bool {
        if self.is_selected(source) {
            return false;
        }
        let Some(artifact) =
            self.create_artifact(scene, source, OutlineStyle::Selection)
        else {
            return false;
        };
        if self.hovered() == Some(source) {
            let _ = self.set_hover_outline(scene, None);
        }
        self.selections.push(artifact);
        true
    }

    /// Remove `source` from the selection. Returns whether it was selected.
    pub fn deselect_object(&mut self, scene: &mut Scene, source: NodeId) -> bool {
        let Some(index) = self.selections.iter().position(|a| a.source == source)
        else {
            return false;
        };
        let artifact = self.selections.remove(index);
        self.remove_artifact(scene, artifact);
        true
    }

    /// Flip membership of `source`. Returns whether it is now selected.
    pub fn toggle_selection(&mut self, scene: &mut Scene, source: NodeId) -> bool {
        if self.deselect_object(scene, source) {
            false
        } else {
            self.select_object(scene, source)
        }
    }

    /// Release every selection outline, then empty the set. Returns how
    /// many were released.
    pub fn clear_all_selections(&mut self, scene: &mut Scene) -> usize {
        let selections = std::mem::take(&mut self.selections);
        let count = selections.len();
        for artifact in selections {
            self.remove_artifact(scene, artifact);
        }
        count
    }

    // ── Programmatic highlight ──────────────────────────────────────────

    /// Outline a single object independently of hover and selection,
    /// replacing any previous highlight.
    pub fn outline_object(&mut self, scene: &mut Scene, source: NodeId) -> bool {
        if self.highlighted() == Some(source) {
            return true;
        }
        self.clear_outline(scene);
        self.highlight =
            self.create_artifact(scene, source, OutlineStyle::Selection);
        self.highlight.is_some()
    }

    /// Remove the programmatic highlight.
    pub fn clear_outline(&mut self, scene: &mut Scene) {
        if let Some(artifact) = self.highlight.take() {
            self.remove_artifact(scene, artifact);
        }
    }

    /// Remove every artifact (hover, selections, highlight).
    pub fn dispose(&mut self, scene: &mut Scene) {
        let _ = self.set_hover_outline(scene, None);
        let _ = self.clear_all_selections(scene);
        self.clear_outline(scene);
        log::debug!("effects disposed, {} outlines released", self.released);
    }

    // ── Rendering ────────────────────────────────────────────────────────

    /// Render path for the current state.
    #[must_use]
    pub fn render_path(&self) -> RenderPath {
        if self.antialiasing {
            RenderPath::Direct
        } else {
            RenderPath::Composed(self.compositor.plan(&PassContext {
                active_outlines: self.active_outlines(),
            }))
        }
    }

    /// Release removed artifacts, advance outline `time` uniforms, then draw
    /// the main canvas and, when drawable, the overlay.
    pub fn render<R: Renderer>(
        &mut self,
        renderers: &mut RendererPair<R>,
        scene: &mut Scene,
        main_camera: &Camera,
        overlay_camera: Option<&Camera>,
        now: Instant,
    ) {
        for node in self.pending_releases.drain(..) {
            renderers.release(node);
        }

        let outlines = self.outline_nodes();
        let time = now.saturating_duration_since(self.epoch).as_secs_f32();
        for id in &outlines {
            if let Some(material) =
                scene.node_mut(*id).and_then(Node::outline_material_mut)
            {
                material.set_time(time);
            }
        }

        let scene: &Scene = scene;
        let path = self.render_path();
        renderers.render_main(&RenderFrame {
            scene,
            camera: main_camera,
            canvas: CanvasId::Main,
            path: &path,
            outlines: &outlines,
        });
        if let Some(camera) = overlay_camera {
            let _ = renderers.render_overlay(&RenderFrame {
                scene,
                camera,
                canvas: CanvasId::Overlay,
                path: &RenderPath::Direct,
                outlines: &outlines,
            });
        }
    }

    // ── Artifact lifecycle ───────────────────────────────────────────────

    fn create_artifact(
        &self,
        scene: &mut Scene,
        source: NodeId,
        style: OutlineStyle,
    ) -> Option<OutlineArtifact> {
        let node = scene.node(source)?;
        if node.kind != NodeKind::Mesh {
            return None;
        }
        let geometry = node.geometry.as_ref()?;
        if geometry.topology != Topology::Triangles {
            return None;
        }
        let (angle, material) = match style {
            OutlineStyle::Hover => (
                self.options.hover_edge_angle,
                OutlineMaterial::hover(
                    self.options.hover_color,
                    self.options.hover_opacity,
                ),
            ),
            OutlineStyle::Selection => (
                self.options.selection_edge_angle,
                OutlineMaterial::selection(self.options.selection_opacity),
            ),
        };
        let outline = Node::outline(
            &format!("{} outline", node.name),
            edges_geometry(geometry, angle),
            material,
            node.transform,
        );
        let id = scene.add_to_root(outline);
        Some(OutlineArtifact { source, node: id })
    }

    fn remove_artifact(&mut self, scene: &mut Scene, artifact: OutlineArtifact) {
        let _ = scene.remove(artifact.node);
        self.pending_releases.push(artifact.node);
        self.released += 1;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::effects::compositor::PassKind;
    use crate::renderer::RecordingRenderer;
    use crate::scene::Geometry;

    fn scene_with_modules(n: usize) -> (Scene, Vec<NodeId>) {
        let mut scene = Scene::new();
        let group = scene.add_to_root(
            Node::group("Barrel").with_position(Vec3::new(0.0, 0.0, 10.0)),
        );
        let ids = (0..n)
            .filter_map(|i| {
                scene.add(
                    group,
                    Node::mesh("Module", Geometry::cuboid(1.0, 1.0, 1.0), [1.0; 4])
                        .with_position(Vec3::new(i as f32 * 2.0, 0.0, 0.0)),
                )
            })
            .collect();
        (scene, ids)
    }

    fn manager() -> EffectsManager {
        EffectsManager::new(OutlineOptions::default(), Instant::now())
    }

    #[test]
    fn outline_is_root_sibling_with_copied_local_transform() {
        let (mut scene, ids) = scene_with_modules(2);
        let mut effects = manager();
        assert!(effects.select_object(&mut scene, ids[1]));
        let artifact = effects.artifacts().next().copied();
        let node = artifact.and_then(|a| scene.node(a.node));
        let node = node.map(|n| (n.kind, n.parent(), n.transform.position));
        assert_eq!(
            node,
            Some((NodeKind::Outline, Some(scene.root()), Vec3::new(2.0, 0.0, 0.0)))
        );
    }

    #[test]
    fn toggle_is_idempotent_pairwise() {
        let (mut scene, ids) = scene_with_modules(1);
        let mut effects = manager();
        assert!(effects.toggle_selection(&mut scene, ids[0]));
        assert!(!effects.toggle_selection(&mut scene, ids[0]));
        assert_eq!(effects.selected_count(), 0);
        assert_eq!(effects.released_count(), 1);
        assert_eq!(effects.active_outlines(), 0);
    }

    #[test]
    fn clear_all_releases_every_artifact() {
        let (mut scene, ids) = scene_with_modules(4);
        let mut effects = manager();
        for id in &ids {
            assert!(effects.select_object(&mut scene, *id));
        }
        let before = scene.len();
        assert_eq!(effects.clear_all_selections(&mut scene), 4);
        assert_eq!(effects.released_count(), 4);
        assert_eq!(scene.len(), before - 4);
        assert!(effects.selected_objects().is_empty());
    }

    #[test]
    fn selected_object_never_gets_hover_outline() {
        let (mut scene, ids) = scene_with_modules(1);
        let mut effects = manager();
        assert!(effects.set_hover_outline(&mut scene, Some(ids[0])));
        assert!(effects.select_object(&mut scene, ids[0]));
        assert_eq!(effects.hovered(), None);
        assert!(!effects.set_hover_outline(&mut scene, Some(ids[0])));
        assert_eq!(effects.active_outlines(), 1);
    }

    #[test]
    fn hover_replacement_releases_previous() {
        let (mut scene, ids) = scene_with_modules(2);
        let mut effects = manager();
        assert!(effects.set_hover_outline(&mut scene, Some(ids[0])));
        assert!(!effects.set_hover_outline(&mut scene, Some(ids[0])));
        assert!(effects.set_hover_outline(&mut scene, Some(ids[1])));
        assert_eq!(effects.released_count(), 1);
        assert_eq!(effects.hovered(), Some(ids[1]));
        let style = effects
            .artifacts()
            .next()
            .and_then(|a| scene.node(a.node))
            .and_then(Node::outline_material)
            .map(OutlineMaterial::style);
        assert_eq!(style, Some(OutlineStyle::Hover));
    }

    #[test]
    fn groups_cannot_be_outlined() {
        let (mut scene, _) = scene_with_modules(1);
        let mut effects = manager();
        let group = scene.object_by_name("Barrel");
        assert_eq!(group.map(|g| effects.select_object(&mut scene, g)), Some(false));
    }

    #[test]
    fn render_paths_follow_antialiasing_and_outline_count() {
        let (mut scene, ids) = scene_with_modules(1);
        let mut effects = manager();
        assert_eq!(effects.render_path(), RenderPath::Direct);
        effects.set_antialiasing(false);
        assert_eq!(effects.render_path(), RenderPath::Composed(vec![PassKind::Base]));
        assert!(effects.select_object(&mut scene, ids[0]));
        assert_eq!(
            effects.render_path(),
            RenderPath::Composed(vec![PassKind::Base, PassKind::Outline])
        );
    }

    #[test]
    fn render_releases_and_advances_time() {
        let (mut scene, ids) = scene_with_modules(2);
        let start = Instant::now();
        let mut effects = EffectsManager::new(OutlineOptions::default(), start);
        let mut renderers = RendererPair::new(RecordingRenderer::new());
        let camera = Camera::perspective(75.0, 1.0, 1.0, 1000.0);

        assert!(effects.select_object(&mut scene, ids[0]));
        assert!(effects.select_object(&mut scene, ids[1]));
        assert!(effects.deselect_object(&mut scene, ids[0]));
        effects.render(
            &mut renderers,
            &mut scene,
            &camera,
            None,
            start + web_time::Duration::from_secs(2),
        );

        let main = renderers.main();
        assert_eq!(main.released().len(), 1);
        let record = main.last().cloned();
        assert_eq!(record.as_ref().map(|r| r.outline_count), Some(1));
        let time = record.and_then(|r| r.outline_time).unwrap_or_default();
        approx::assert_relative_eq!(time, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn dispose_clears_everything() {
        let (mut scene, ids) = scene_with_modules(3);
        let mut effects = manager();
        let _ = effects.set_hover_outline(&mut scene, Some(ids[0]));
        let _ = effects.select_object(&mut scene, ids[1]);
        let _ = effects.outline_object(&mut scene, ids[2]);
        assert_eq!(effects.active_outlines(), 3);
        effects.dispose(&mut scene);
        assert_eq!(effects.active_outlines(), 0);
        assert_eq!(effects.released_count(), 3);
        let mut outlines = 0;
        scene.traverse(scene.root(), |n| {
            if n.kind == NodeKind::Outline {
                outlines += 1;
            }
        });
        assert_eq!(outlines, 0);
    }
}
