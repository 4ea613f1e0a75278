//! Input handling: platform-agnostic pointer, touch, wheel and resize
//! events tagged with the canvas that produced them, plus bindable key
//! actions.

/// Platform-agnostic input events.
pub mod event;
/// Key-bindable viewer actions.
pub mod keyboard;

pub use event::{CanvasId, InputEvent, MouseButton};
pub use keyboard::KeyAction;
