use serde::{Deserialize, Serialize};

/// Viewer actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// toggle_selecting = "KeyS"
/// switch_contexts = "KeyX"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Turn pointer selection mode on or off.
    ToggleSelecting,
    /// Swap the main camera between perspective and orthographic.
    ToggleProjection,
    /// Zoom the main camera in.
    ZoomIn,
    /// Zoom the main camera out.
    ZoomOut,
    /// Clear every sticky selection.
    ClearSelection,
    /// Toggle linking the overlay camera to the main camera.
    LinkOverlay,
    /// One-shot copy of the main camera into the overlay.
    SyncOverlay,
    /// Exchange the main and overlay cameras.
    SwitchContexts,
    /// Toggle orbit auto-rotation.
    ToggleAutoRotate,
}
