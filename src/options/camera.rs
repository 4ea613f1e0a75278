use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and orbit control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial camera position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Initial orbit target.
    #[schemars(skip)]
    pub target: [f32; 3],
    /// Fraction of pending rotation/pan applied per update.
    #[schemars(title = "Damping", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub damping_factor: f32,
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 5.0), extend("step" = 0.1))]
    pub zoom_speed: f32,
    /// Spin the main camera around its target.
    #[schemars(title = "Auto Rotate")]
    pub auto_rotate: bool,
    /// Auto-rotation step in radians per frame.
    #[schemars(skip)]
    pub auto_rotate_speed: f32,
    /// Factor applied by one zoom-in key press.
    #[schemars(skip)]
    pub zoom_step: f32,
    /// Duration of keyboard zoom tweens in milliseconds.
    #[schemars(skip)]
    pub zoom_duration_ms: u64,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 10.0,
            zfar: 100_000.0,
            position: [0.0, 0.0, 200.0],
            target: [0.0, 0.0, 0.0],
            damping_factor: 0.25,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            auto_rotate: false,
            auto_rotate_speed: 0.0035,
            zoom_step: 1.2,
            zoom_duration_ms: 200,
        }
    }
}
