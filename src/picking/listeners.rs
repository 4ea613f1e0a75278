//! Attach/detach bookkeeping for per-canvas event listeners.
//!
//! Managers only react to an event when a listener of the matching kind is
//! attached on the event's canvas. Disabling a mode detaches exactly the set
//! it attached, so repeated enable/disable cycles leave nothing behind.

use rustc_hash::FxHashSet;

use crate::input::{CanvasId, InputEvent};

/// Event kinds a manager can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Pointer moves (hover and drag tracking).
    PointerMove,
    /// Pointer presses.
    PointerDown,
    /// Pointer releases.
    PointerUp,
    /// Touch starts.
    TouchStart,
    /// Passive press/release pairs feeding the double-click detector.
    DoubleClick,
}

/// Listener kinds used by pointer selection mode.
pub const SELECTION_LISTENERS: [ListenerKind; 4] = [
    ListenerKind::PointerMove,
    ListenerKind::PointerDown,
    ListenerKind::PointerUp,
    ListenerKind::TouchStart,
];

impl ListenerKind {
    /// The pointer listener kind an event is delivered to, if any.
    #[must_use]
    pub fn for_event(event: &InputEvent) -> Option<Self> {
        match event {
            InputEvent::PointerMove { .. } => Some(Self::PointerMove),
            InputEvent::PointerDown { .. } => Some(Self::PointerDown),
            InputEvent::PointerUp { .. } => Some(Self::PointerUp),
            InputEvent::TouchStart { .. } => Some(Self::TouchStart),
            _ => None,
        }
    }
}

/// Set of currently attached `(canvas, kind)` listeners.
#[derive(Debug, Default, Clone)]
pub struct ListenerRegistry {
    attached: FxHashSet<(CanvasId, ListenerKind)>,
}

impl ListenerRegistry {
    /// Attach `kinds` on `canvas`. Already-attached kinds are left alone.
    pub fn attach(&mut self, canvas: CanvasId, kinds: &[ListenerKind]) {
        for kind in kinds {
            let _ = self.attached.insert((canvas, *kind));
        }
    }

    /// Detach `kinds` from `canvas`.
    pub fn detach(&mut self, canvas: CanvasId, kinds: &[ListenerKind]) {
        for kind in kinds {
            let _ = self.attached.remove(&(canvas, *kind));
        }
    }

    /// Whether `kind` is attached on `canvas`.
    #[must_use]
    pub fn is_attached(&self, canvas: CanvasId, kind: ListenerKind) -> bool {
        self.attached.contains(&(canvas, kind))
    }

    /// Whether an event would reach a pointer listener.
    #[must_use]
    pub fn accepts(&self, event: &InputEvent) -> bool {
        match (event.canvas(), ListenerKind::for_event(event)) {
            (Some(canvas), Some(kind)) => self.is_attached(canvas, kind),
            _ => false,
        }
    }

    /// Number of attached listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    /// Whether nothing is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attach_detach_is_symmetric() {
        let mut registry = ListenerRegistry::default();
        for _ in 0..3 {
            registry.attach(CanvasId::Main, &SELECTION_LISTENERS);
            registry.attach(CanvasId::Main, &SELECTION_LISTENERS);
            assert_eq!(registry.len(), 4);
            registry.detach(CanvasId::Main, &SELECTION_LISTENERS);
            assert!(registry.is_empty());
        }
    }

    #[test]
    fn accepts_only_attached_canvas_and_kind() {
        let mut registry = ListenerRegistry::default();
        registry.attach(CanvasId::Main, &[ListenerKind::PointerMove]);
        let on_main = InputEvent::PointerMove {
            canvas: CanvasId::Main,
            x: 0.0,
            y: 0.0,
        };
        let on_overlay = InputEvent::PointerMove {
            canvas: CanvasId::Overlay,
            x: 0.0,
            y: 0.0,
        };
        assert!(registry.accepts(&on_main));
        assert!(!registry.accepts(&on_overlay));
        assert!(!registry.accepts(&InputEvent::Scroll {
            canvas: CanvasId::Main,
            delta: 1.0
        }));
    }
}
