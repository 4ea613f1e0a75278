//! Ray-based object picking and selection management.
//!
//! Pointer positions are turned into camera rays and intersected with the
//! scene's visible meshes on the CPU. Hover hit tests are throttled by a
//! frame-rate-adaptive scheduler; clicks, drags and double-clicks are told
//! apart by the gesture trackers.

pub mod gesture;
pub mod listeners;
pub mod ray;
pub mod raycast;
pub mod scheduler;
pub mod selection;

pub use raycast::{hit_test, Intersection};
pub use selection::{SelectionContext, SelectionEvent, SelectionManager};
