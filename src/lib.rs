// -- Lint policy ---------------------------------------------------------
// Clippy groups are enforced here; rustc lint levels live in Cargo.toml.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]

//! Interactive camera and picking core for particle-detector event displays.
//!
//! detview owns the parts of an event display that carry real control-loop
//! and geometry reasoning: a dual-camera orbit-control manager that swaps
//! between perspective and orthographic projections without a visual jump,
//! a frame-budget-aware picking engine with sticky multi-selection, and the
//! outline effects that visualize selection.
//!
//! # Key entry points
//!
//! - [`engine::ViewEngine`] - owns every manager and runs the frame loop
//! - [`camera::manager::ControlsManager`] - main/overlay cameras and controls
//! - [`picking::selection::SelectionManager`] - hover, click, double-click
//! - [`effects::manager::EffectsManager`] - outline artifacts and render paths
//! - [`scene::Scene`] - the scene graph the managers operate on
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Frame ordering
//!
//! Input events may arrive at any point between frames. Each call to
//! [`engine::ViewEngine::frame`] then advances tweens and orbit controls,
//! runs at most one throttled hit test and applies its hover result, and
//! finally renders (updating outline time uniforms first).

pub mod camera;
pub mod effects;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod info;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::ViewEngine;
pub use error::ViewerError;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
