/// Platform-agnostic input events.
///
/// Every pointer event is tagged with the [`CanvasId`] that produced it so
/// the engine can route it to the main or overlay viewport. Coordinates are
/// in physical pixels relative to that canvas' top-left corner.
///
/// # Example
///
/// ```ignore
/// engine.handle_input(
///     InputEvent::PointerMove { canvas: CanvasId::Main, x: 100.0, y: 200.0 },
///     Instant::now(),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer button pressed.
    PointerDown {
        /// Originating canvas.
        canvas: CanvasId,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
        /// Which button was pressed.
        button: MouseButton,
    },
    /// Pointer moved.
    PointerMove {
        /// Originating canvas.
        canvas: CanvasId,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Pointer button released.
    PointerUp {
        /// Originating canvas.
        canvas: CanvasId,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
        /// Which button was released.
        button: MouseButton,
    },
    /// Touch began (treated as an immediate click).
    TouchStart {
        /// Originating canvas.
        canvas: CanvasId,
        /// Horizontal position in physical pixels.
        x: f32,
        /// Vertical position in physical pixels.
        y: f32,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Originating canvas.
        canvas: CanvasId,
        /// Scroll amount (positive = zoom in, negative = zoom out).
        delta: f32,
    },
    /// Canvas resized.
    Resized {
        /// Resized canvas.
        canvas: CanvasId,
        /// New width in physical pixels.
        width: u32,
        /// New height in physical pixels.
        height: u32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

impl InputEvent {
    /// Canvas this event belongs to, `None` for window-global events.
    #[must_use]
    pub fn canvas(&self) -> Option<CanvasId> {
        match *self {
            Self::PointerDown { canvas, .. }
            | Self::PointerMove { canvas, .. }
            | Self::PointerUp { canvas, .. }
            | Self::TouchStart { canvas, .. }
            | Self::Scroll { canvas, .. }
            | Self::Resized { canvas, .. } => Some(canvas),
            Self::ModifiersChanged { .. } => None,
        }
    }
}

/// Which viewport an event or camera belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CanvasId {
    /// The main viewport.
    #[default]
    Main,
    /// The secondary overlay viewport.
    Overlay,
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}
