//! Selection manager: pointer gestures to hover, sticky multi-selection and
//! double-click focus.
//!
//! The manager owns the selected set, the hover state and the info-display
//! record. Outline artifacts live in the [`EffectsManager`]; cameras in the
//! [`ControlsManager`]. Both are borrowed per call through a
//! [`SelectionContext`].

use glam::Vec2;
use rustc_hash::FxHashMap;
use web_time::{Duration, Instant};

use super::gesture::{ClickResult, DoubleClickDetector, GestureTracker};
use super::listeners::{ListenerKind, ListenerRegistry, SELECTION_LISTENERS};
use super::raycast::{self, Intersection};
use super::scheduler::HitTestScheduler;
use crate::camera::ControlsManager;
use crate::effects::EffectsManager;
use crate::info::{self, InfoLogger, SelectedObjectInfo};
use crate::input::{CanvasId, InputEvent, MouseButton};
use crate::options::SelectionOptions;
use crate::scene::{NodeId, Scene};
use crate::util::easing::EasingFunction;

const CANVASES: [CanvasId; 2] = [CanvasId::Main, CanvasId::Overlay];

/// Collaborators a selection operation reads or mutates.
pub struct SelectionContext<'a> {
    /// Scene being picked from.
    pub scene: &'a mut Scene,
    /// Outline artifact owner.
    pub effects: &'a mut EffectsManager,
    /// Camera source for hit testing and double-click tweens.
    pub cameras: &'a mut ControlsManager,
    /// Info/log sink.
    pub log: &'a mut InfoLogger,
}

/// What a processed pointer event changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// Object added to the selected set.
    Selected(NodeId),
    /// Object removed from the selected set.
    Deselected(NodeId),
    /// The selected set was emptied by a click on empty space.
    Cleared,
    /// A drag started and the hover outline was dropped.
    DragStarted,
    /// A double-click hit something; the orbit target is tweening to it.
    DoubleClick {
        /// Canvas the double-click happened on.
        canvas: CanvasId,
        /// Detailed hit.
        hit: Intersection,
    },
}

/// Hover, click, drag and double-click handling for up to two canvases.
#[derive(Debug)]
pub struct SelectionManager {
    selecting: bool,
    selected: Vec<NodeId>,
    hovered: Option<NodeId>,
    active_object: Option<NodeId>,
    info: SelectedObjectInfo,
    gesture: GestureTracker,
    double_clicks: FxHashMap<CanvasId, DoubleClickDetector>,
    scheduler: HitTestScheduler,
    listeners: ListenerRegistry,
    pre_selection_antialias: Option<bool>,
    pre_highlight_antialias: Option<bool>,
    double_click_tween: Duration,
}

impl SelectionManager {
    /// Manager with selection off and passive double-click detection on
    /// both canvases.
    #[must_use]
    pub fn new(options: &SelectionOptions) -> Self {
        let window = Duration::from_millis(options.double_click_ms);
        let double_clicks = CANVASES
            .iter()
            .map(|c| {
                (*c, DoubleClickDetector::new(window, options.click_threshold_px))
            })
            .collect();
        let mut listeners = ListenerRegistry::default();
        for canvas in CANVASES {
            listeners.attach(canvas, &[ListenerKind::DoubleClick]);
        }
        Self {
            selecting: false,
            selected: Vec::new(),
            hovered: None,
            active_object: None,
            info: SelectedObjectInfo::default(),
            gesture: GestureTracker::new(options.click_threshold_px),
            double_clicks,
            scheduler: HitTestScheduler::new(),
            listeners,
            pre_selection_antialias: None,
            pre_highlight_antialias: None,
            double_click_tween: Duration::from_millis(options.double_click_tween_ms),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Whether pointer selection mode is on.
    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// Selected objects in selection order.
    #[must_use]
    pub fn selected_objects(&self) -> &[NodeId] {
        &self.selected
    }

    /// Whether `id` is in the selected set.
    #[must_use]
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    /// Object under the hover outline.
    #[must_use]
    pub fn hovered_object(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Object last shown in the info display by a selection.
    #[must_use]
    pub fn active_object(&self) -> Option<NodeId> {
        self.active_object
    }

    /// The live info-display record.
    #[must_use]
    pub fn info(&self) -> &SelectedObjectInfo {
        &self.info
    }

    /// The hover hit-test scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &HitTestScheduler {
        &self.scheduler
    }

    /// The click/drag tracker.
    #[must_use]
    pub fn gesture(&self) -> &GestureTracker {
        &self.gesture
    }

    /// Attached listeners per canvas.
    #[must_use]
    pub fn listeners(&self) -> &ListenerRegistry {
        &self.listeners
    }

    // ── Configuration ────────────────────────────────────────────────────

    /// Pixel distance separating a click from a drag. Non-positive values
    /// are ignored.
    pub fn set_click_threshold(&mut self, pixels: f32) {
        if pixels <= 0.0 {
            return;
        }
        self.gesture.set_click_threshold(pixels);
        for detector in self.double_clicks.values_mut() {
            detector.set_distance_threshold(pixels);
        }
    }

    /// Maximum interval between the clicks of a double-click.
    pub fn set_double_click_threshold(&mut self, window: Duration) {
        for detector in self.double_clicks.values_mut() {
            detector.set_window(window);
        }
    }

    /// Attach or detach the passive double-click listeners on both
    /// canvases.
    pub fn set_double_click_enabled(&mut self, enabled: bool) {
        for canvas in CANVASES {
            if enabled {
                self.listeners.attach(canvas, &[ListenerKind::DoubleClick]);
            } else {
                self.listeners.detach(canvas, &[ListenerKind::DoubleClick]);
                if let Some(detector) = self.double_clicks.get_mut(&canvas) {
                    detector.reset();
                }
            }
        }
    }

    // ── Mode ─────────────────────────────────────────────────────────────

    /// Turn pointer selection on or off.
    ///
    /// Enabling attaches the pointer listeners on both canvases and forces
    /// the composed render path so outlines get their own pass. Disabling
    /// detaches them, drops in-flight gesture and scheduler state, clears
    /// hover and selection, and restores the previous antialiasing flag.
    pub fn set_selecting(&mut self, enable: bool, ctx: &mut SelectionContext<'_>) {
        if enable == self.selecting {
            return;
        }
        self.selecting = enable;
        if enable {
            self.pre_selection_antialias = Some(ctx.effects.antialiasing());
            ctx.effects.set_antialiasing(false);
            for canvas in CANVASES {
                self.listeners.attach(canvas, &SELECTION_LISTENERS);
            }
            log::debug!("selection enabled");
        } else {
            for canvas in CANVASES {
                self.listeners.detach(canvas, &SELECTION_LISTENERS);
            }
            self.gesture.reset();
            self.scheduler.reset();
            self.apply_hover(None, ctx);
            let _ = self.clear_all(ctx);
            self.active_object = None;
            self.info.clear();
            if let Some(antialias) = self.pre_selection_antialias.take() {
                ctx.effects.set_antialiasing(antialias);
            }
            log::debug!("selection disabled");
        }
    }

    // ── Programmatic selection ───────────────────────────────────────────

    /// Add `id` to the selected set. Returns `false` if it was already
    /// selected or cannot be outlined.
    pub fn select(&mut self, id: NodeId, ctx: &mut SelectionContext<'_>) -> bool {
        if self.is_selected(id) || !ctx.effects.select_object(ctx.scene, id) {
            return false;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        self.selected.push(id);
        true
    }

    /// Remove `id` from the selected set. Returns whether it was selected.
    pub fn deselect(&mut self, id: NodeId, ctx: &mut SelectionContext<'_>) -> bool {
        let Some(index) = self.selected.iter().position(|s| *s == id) else {
            return false;
        };
        let _ = self.selected.remove(index);
        let _ = ctx.effects.deselect_object(ctx.scene, id);
        true
    }

    /// Flip membership of `id`. Returns whether it is now selected.
    pub fn toggle(&mut self, id: NodeId, ctx: &mut SelectionContext<'_>) -> bool {
        if self.deselect(id, ctx) {
            false
        } else {
            self.select(id, ctx)
        }
    }

    /// Empty the selected set, releasing every outline. Returns how many
    /// objects were deselected.
    pub fn clear_all(&mut self, ctx: &mut SelectionContext<'_>) -> usize {
        let _ = ctx.effects.clear_all_selections(ctx.scene);
        let count = self.selected.len();
        self.selected.clear();
        count
    }

    /// Drop every reference to `ids` (selection, hover, info display)
    /// before the nodes leave the scene.
    pub fn forget_objects(&mut self, ids: &[NodeId], ctx: &mut SelectionContext<'_>) {
        for id in ids {
            let _ = self.deselect(*id, ctx);
        }
        if self.active_object.is_some_and(|a| ids.contains(&a)) {
            self.active_object = None;
            self.info.clear();
        }
        if self.hovered.is_some_and(|h| ids.contains(&h)) {
            self.apply_hover(None, ctx);
        }
        if ctx.effects.highlighted().is_some_and(|h| ids.contains(&h)) {
            ctx.effects.clear_outline(ctx.scene);
        }
    }

    /// Outline one object by id, independently of the selected set.
    ///
    /// Switches to the composed render path until
    /// [`disable_highlighting`](Self::disable_highlighting).
    pub fn highlight_object(&mut self, id: NodeId, ctx: &mut SelectionContext<'_>) -> bool {
        if self.pre_highlight_antialias.is_none() {
            self.pre_highlight_antialias = Some(ctx.effects.antialiasing());
        }
        ctx.effects.set_antialiasing(false);
        ctx.effects.outline_object(ctx.scene, id)
    }

    /// Remove the programmatic highlight.
    pub fn disable_highlighting(&mut self, ctx: &mut SelectionContext<'_>) {
        ctx.effects.clear_outline(ctx.scene);
        if let Some(antialias) = self.pre_highlight_antialias.take() {
            if !self.selecting {
                ctx.effects.set_antialiasing(antialias);
            }
        }
    }

    // ── Events ───────────────────────────────────────────────────────────

    /// Process one input event.
    ///
    /// Gesture handling runs first so the click/drag tracker always sees
    /// the release, then the passive double-click detector runs on the
    /// same event. When both produce an outcome the selection change is
    /// returned; the double-click still logs and retargets the camera.
    pub fn handle_event(
        &mut self,
        event: &InputEvent,
        ctx: &mut SelectionContext<'_>,
        now: Instant,
    ) -> Option<SelectionEvent> {
        let gesture = if self.selecting && self.listeners.accepts(event) {
            self.handle_gesture(event, ctx)
        } else {
            None
        };
        let double_click = self.track_double_click(event, ctx, now);
        gesture.or(double_click)
    }

    /// Per-frame step while selecting: feed the FPS estimate, then run at
    /// most one throttled hit test and apply its hover result. Returns the
    /// hovered object after the step.
    pub fn process_frame(
        &mut self,
        current_fps: f32,
        ctx: &mut SelectionContext<'_>,
    ) -> Option<NodeId> {
        if !self.selecting {
            return self.hovered;
        }
        self.scheduler.record_fps(current_fps);
        let Some(pending) = self.scheduler.tick() else {
            return self.hovered;
        };
        if self.gesture.is_dragging() {
            return self.hovered;
        }
        let target = self
            .hit_test(pending.canvas, pending.position, ctx)
            .map(|hit| hit.node)
            .filter(|id| !self.is_selected(*id));
        self.apply_hover(target, ctx);
        self.hovered
    }

    /// Nearest hit under `pointer` on `canvas`, through that canvas's
    /// camera. Logs and returns `None` when the canvas has no camera.
    pub fn hit_test(
        &self,
        canvas: CanvasId,
        pointer: Vec2,
        ctx: &SelectionContext<'_>,
    ) -> Option<Intersection> {
        let Some(controls) = ctx.cameras.controls_for(canvas) else {
            log::warn!("no camera for the {canvas:?} canvas; hit test skipped");
            return None;
        };
        raycast::hit_test(&*ctx.scene, &controls.camera, pointer, controls.viewport())
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn click(
        &mut self,
        canvas: CanvasId,
        position: Vec2,
        ctx: &mut SelectionContext<'_>,
    ) -> Option<SelectionEvent> {
        let Some(hit) = self.hit_test(canvas, position, ctx) else {
            if self.selected.is_empty() {
                return None;
            }
            let _ = self.clear_all(ctx);
            ctx.log.add("All selections cleared", "Cleared");
            self.active_object = None;
            self.show(None, ctx.scene);
            return Some(SelectionEvent::Cleared);
        };
        let id = hit.node;
        if self.toggle(id, ctx) {
            if let Some(node) = ctx.scene.node(id) {
                ctx.log.add(&info::selection_message(node), "Selected");
            }
            self.active_object = Some(id);
            self.show(Some(id), ctx.scene);
            Some(SelectionEvent::Selected(id))
        } else if !self.is_selected(id) {
            let name = ctx
                .scene
                .node(id)
                .map(|n| n.name.as_str())
                .filter(|n| !n.is_empty())
                .unwrap_or("unnamed object");
            ctx.log.add(name, "Deselected");
            if self.active_object == Some(id) {
                self.active_object = None;
                self.show(None, ctx.scene);
            }
            Some(SelectionEvent::Deselected(id))
        } else {
            None
        }
    }

    fn handle_gesture(
        &mut self,
        event: &InputEvent,
        ctx: &mut SelectionContext<'_>,
    ) -> Option<SelectionEvent> {
        match *event {
            InputEvent::PointerDown {
                x,
                y,
                button: MouseButton::Left,
                ..
            } => {
                self.gesture.pointer_down(Vec2::new(x, y));
                None
            }
            InputEvent::PointerMove { canvas, x, y } => {
                let position = Vec2::new(x, y);
                if self.gesture.pointer_move(position) {
                    self.apply_hover(None, ctx);
                    return Some(SelectionEvent::DragStarted);
                }
                if !self.gesture.is_dragging() {
                    self.scheduler.queue(canvas, position);
                }
                None
            }
            InputEvent::PointerUp {
                canvas,
                x,
                y,
                button: MouseButton::Left,
            } => match self.gesture.pointer_up(Vec2::new(x, y)) {
                ClickResult::Click { position } => self.click(canvas, position, ctx),
                ClickResult::Drag | ClickResult::NoAction => None,
            },
            InputEvent::TouchStart { canvas, x, y } => {
                self.click(canvas, Vec2::new(x, y), ctx)
            }
            _ => None,
        }
    }

    fn track_double_click(
        &mut self,
        event: &InputEvent,
        ctx: &mut SelectionContext<'_>,
        now: Instant,
    ) -> Option<SelectionEvent> {
        let (canvas, position, released) = match *event {
            InputEvent::PointerDown { canvas, x, y, .. } => (canvas, Vec2::new(x, y), false),
            InputEvent::PointerUp { canvas, x, y, .. } => (canvas, Vec2::new(x, y), true),
            _ => return None,
        };
        if !self.listeners.is_attached(canvas, ListenerKind::DoubleClick) {
            return None;
        }
        let detector = self.double_clicks.get_mut(&canvas)?;
        if !released {
            detector.pointer_down(position);
            return None;
        }
        if !detector.pointer_up(position, now) {
            return None;
        }
        let hit = self.hit_test(canvas, position, ctx)?;
        let p = hit.point;
        let n = hit.normal;
        ctx.log.add(
            &format!(
                "Collision at ({:.2}, {:.2}, {:.2}), normal ({:.2}, {:.2}, {:.2}), distance {:.2}",
                p.x, p.y, p.z, n.x, n.y, n.z, hit.distance
            ),
            "Double-click",
        );
        let _ = ctx.cameras.animate_target(
            canvas,
            hit.point,
            self.double_click_tween,
            EasingFunction::CubicOut,
            now,
        );
        Some(SelectionEvent::DoubleClick { canvas, hit })
    }

    /// Move the hover outline and update the info display.
    fn apply_hover(&mut self, target: Option<NodeId>, ctx: &mut SelectionContext<'_>) {
        if target == self.hovered {
            return;
        }
        let _ = ctx.effects.set_hover_outline(ctx.scene, target);
        self.hovered = target;
        match target {
            Some(id) => self.show(Some(id), ctx.scene),
            None => self.show(self.active_object, ctx.scene),
        }
    }

    fn show(&mut self, id: Option<NodeId>, scene: &Scene) {
        match id.and_then(|id| scene.node(id)) {
            Some(node) => self.info = SelectedObjectInfo::from_node(node),
            None => self.info.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::options::{CameraOptions, OutlineOptions};
    use crate::picking::gesture::GesturePhase;
    use crate::scene::{Geometry, Node};

    struct Fixture {
        scene: Scene,
        effects: EffectsManager,
        cameras: ControlsManager,
        log: InfoLogger,
        selection: SelectionManager,
        det: NodeId,
    }

    impl Fixture {
        /// 200x200 canvas looking down -Z at a box centered on the origin.
        fn new() -> Self {
            let mut scene = Scene::new();
            let det = scene.add_to_root(
                Node::mesh("Det1", Geometry::cuboid(40.0, 40.0, 40.0), [1.0; 4])
                    .with_user_data("layer", 1),
            );
            Self {
                scene,
                effects: EffectsManager::new(OutlineOptions::default(), Instant::now()),
                cameras: ControlsManager::new((200, 200), &CameraOptions::default()),
                log: InfoLogger::default(),
                selection: SelectionManager::new(&SelectionOptions::default()),
                det,
            }
        }

        fn ctx(&mut self) -> (&mut SelectionManager, SelectionContext<'_>) {
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

        fn enable(&mut self) {
            let (selection, mut ctx) = self.ctx();
            selection.set_selecting(true, &mut ctx);
        }

        fn send(&mut self, event: InputEvent, now: Instant) -> Option<SelectionEvent> {
            let (selection, mut ctx) = self.ctx();
            selection.handle_event(&event, &mut ctx, now)
        }

        fn click(&mut self, x: f32, y: f32, now: Instant) -> Option<SelectionEvent> {
            let _ = self.send(down(x, y), now);
            self.send(up(x, y), now)
        }

        fn frame(&mut self) -> Option<NodeId> {
            let (selection, mut ctx) = self.ctx();
            selection.process_frame(60.0, &mut ctx)
        }
    }

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            canvas: CanvasId::Main,
            x,
            y,
            button: MouseButton::Left,
        }
    }

    fn up(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerUp {
            canvas: CanvasId::Main,
            x,
            y,
            button: MouseButton::Left,
        }
    }

    fn hover(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove {
            canvas: CanvasId::Main,
            x,
            y,
        }
    }

    #[test]
    fn enable_disable_is_symmetric() {
        let mut f = Fixture::new();
        let passive = f.selection.listeners().len();
        f.effects.set_antialiasing(true);
        f.enable();
        assert!(!f.effects.antialiasing());
        assert_eq!(f.selection.listeners().len(), passive + 8);
        let (selection, mut ctx) = f.ctx();
        selection.set_selecting(false, &mut ctx);
        assert_eq!(f.selection.listeners().len(), passive);
        assert!(f.effects.antialiasing());
    }

    #[test]
    fn click_on_box_selects_it() {
        let mut f = Fixture::new();
        f.enable();
        let now = Instant::now();
        assert_eq!(f.click(100.0, 100.0, now), Some(SelectionEvent::Selected(f.det)));
        assert_eq!(f.selection.selected_objects(), &[f.det]);
        assert_eq!(f.selection.info().name, "Det1");
        assert_eq!(
            f.log.last().map(|e| (e.category.as_str(), e.message.as_str())),
            Some(("Selected", "Det1 with layer=1"))
        );
        assert_eq!(f.effects.selected_count(), 1);
    }

    #[test]
    fn second_click_deselects() {
        let mut f = Fixture::new();
        f.enable();
        let start = Instant::now();
        let _ = f.click(100.0, 100.0, start);
        // Outside the double-click window.
        let later = start + Duration::from_millis(500);
        assert_eq!(f.click(100.0, 100.0, later), Some(SelectionEvent::Deselected(f.det)));
        assert!(f.selection.selected_objects().is_empty());
        assert!(f.selection.info().is_empty());
        assert_eq!(f.log.last().map(|e| e.category.as_str()), Some("Deselected"));
    }

    #[test]
    fn drag_does_not_select() {
        let mut f = Fixture::new();
        f.enable();
        let now = Instant::now();
        let _ = f.send(down(100.0, 100.0), now);
        assert_eq!(f.send(hover(110.0, 100.0), now), Some(SelectionEvent::DragStarted));
        assert_eq!(f.send(up(110.0, 100.0), now), None);
        assert!(f.selection.selected_objects().is_empty());
    }

    #[test]
    fn empty_click_clears_and_logs_once() {
        let mut f = Fixture::new();
        f.enable();
        let start = Instant::now();
        assert_eq!(f.click(5.0, 5.0, start), None);
        assert!(f.log.is_empty());

        let _ = f.click(100.0, 100.0, start + Duration::from_secs(1));
        let cleared = f.click(5.0, 5.0, start + Duration::from_secs(2));
        assert_eq!(cleared, Some(SelectionEvent::Cleared));
        assert!(f.selection.selected_objects().is_empty());
        assert_eq!(f.log.in_category("Cleared").count(), 1);
        assert_eq!(f.effects.active_outlines(), 0);
    }

    #[test]
    fn hover_waits_for_scheduler_and_skips_selected() {
        let mut f = Fixture::new();
        f.enable();
        let now = Instant::now();
        let _ = f.send(hover(100.0, 100.0), now);
        // Default skip is 3 frames.
        assert_eq!(f.frame(), None);
        assert_eq!(f.frame(), None);
        assert_eq!(f.frame(), Some(f.det));
        assert_eq!(f.effects.hovered(), Some(f.det));
        assert_eq!(f.selection.info().name, "Det1");

        let _ = f.click(100.0, 100.0, now);
        assert_eq!(f.effects.hovered(), None);
        let _ = f.send(hover(100.0, 100.0), now);
        for _ in 0..3 {
            let _ = f.frame();
        }
        assert_eq!(f.selection.hovered_object(), None);
        assert_eq!(f.effects.active_outlines(), 1);
    }

    #[test]
    fn hover_off_restores_active_object() {
        let mut f = Fixture::new();
        let other = f.scene.add_to_root(
            Node::mesh("Det2", Geometry::cuboid(10.0, 10.0, 10.0), [1.0; 4])
                .with_position(Vec3::new(60.0, 0.0, 0.0)),
        );
        f.enable();
        let now = Instant::now();
        let _ = f.click(100.0, 100.0, now);
        {
            let (selection, mut ctx) = f.ctx();
            selection.apply_hover(Some(other), &mut ctx);
        }
        assert_eq!(f.selection.info().name, "Det2");
        {
            let (selection, mut ctx) = f.ctx();
            selection.apply_hover(None, &mut ctx);
        }
        assert_eq!(f.selection.info().name, "Det1");
    }

    #[test]
    fn double_click_tweens_target_to_hit() {
        let mut f = Fixture::new();
        let start = Instant::now();
        // Selection mode off: double-click still works.
        let _ = f.click(100.0, 100.0, start);
        let second = f.click(100.0, 100.0, start + Duration::from_millis(200));
        let Some(SelectionEvent::DoubleClick { canvas, hit }) = second else {
            panic!("expected double-click, got {second:?}");
        };
        assert_eq!(canvas, CanvasId::Main);
        assert_eq!(hit.node, f.det);
        assert!((hit.point.z - 20.0).abs() < 1e-3);
        assert!(!f.cameras.tweens().is_empty());
        assert_eq!(f.log.last().map(|e| e.category.as_str()), Some("Double-click"));
    }

    #[test]
    fn double_click_while_selecting_releases_the_gesture() {
        let mut f = Fixture::new();
        f.enable();
        let det = f.det;
        let start = Instant::now();
        assert_eq!(f.click(100.0, 100.0, start), Some(SelectionEvent::Selected(det)));
        let second = f.click(100.0, 100.0, start + Duration::from_millis(100));

        // Both clicks toggle; the double-click still retargets the camera.
        assert_eq!(second, Some(SelectionEvent::Deselected(det)));
        assert!(!f.selection.is_selected(det));
        assert!(!f.cameras.tweens().is_empty());
        assert!(f.log.in_category("Double-click").next().is_some());

        assert_eq!(f.selection.gesture().phase(), GesturePhase::Idle);
        assert_eq!(f.send(hover(150.0, 100.0), start), None);
        assert_eq!(f.selection.gesture().phase(), GesturePhase::Idle);
    }

    #[test]
    fn frame_rate_is_ignored_while_not_selecting() {
        let mut f = Fixture::new();
        let idle = HitTestScheduler::new();
        {
            let (selection, mut ctx) = f.ctx();
            for _ in 0..50 {
                let _ = selection.process_frame(10.0, &mut ctx);
            }
        }
        assert_eq!(f.selection.scheduler().frames_to_skip(), idle.frames_to_skip());
        assert_eq!(f.selection.scheduler().smoothed_fps(), idle.smoothed_fps());

        f.enable();
        {
            let (selection, mut ctx) = f.ctx();
            for _ in 0..50 {
                let _ = selection.process_frame(10.0, &mut ctx);
            }
        }
        assert!(f.selection.scheduler().smoothed_fps() < idle.smoothed_fps());
    }

    #[test]
    fn overlay_hit_test_without_overlay_is_no_hit() {
        let mut f = Fixture::new();
        let (selection, ctx) = f.ctx();
        assert!(selection
            .hit_test(CanvasId::Overlay, Vec2::new(100.0, 100.0), &ctx)
            .is_none());
    }

    #[test]
    fn programmatic_toggle_and_clear() {
        let mut f = Fixture::new();
        let det = f.det;
        let (selection, mut ctx) = f.ctx();
        assert!(selection.toggle(det, &mut ctx));
        assert!(!selection.toggle(det, &mut ctx));
        assert!(selection.select(det, &mut ctx));
        assert!(!selection.select(det, &mut ctx));
        assert_eq!(selection.clear_all(&mut ctx), 1);
        assert!(selection.selected_objects().is_empty());
    }

    #[test]
    fn click_threshold_ignores_non_positive() {
        let mut f = Fixture::new();
        f.selection.set_click_threshold(0.0);
        assert_eq!(f.selection.gesture().click_threshold(), 5.0);
        f.selection.set_click_threshold(12.0);
        assert_eq!(f.selection.gesture().click_threshold(), 12.0);
    }

    #[test]
    fn highlight_forces_composed_path_until_disabled() {
        let mut f = Fixture::new();
        let det = f.det;
        let (selection, mut ctx) = f.ctx();
        assert!(selection.highlight_object(det, &mut ctx));
        assert!(!ctx.effects.antialiasing());
        selection.disable_highlighting(&mut ctx);
        assert!(ctx.effects.antialiasing());
        assert_eq!(ctx.effects.highlighted(), None);
    }
}
