use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Selection", inline)]
#[serde(default)]
/// Pointer picking and gesture parameters.
pub struct SelectionOptions {
    /// Maximum pointer travel (px) for a press to count as a click.
    #[schemars(title = "Click Threshold", range(min = 1.0, max = 20.0), extend("step" = 1.0))]
    pub click_threshold_px: f32,
    /// Maximum interval (ms) between two clicks of a double-click.
    #[schemars(title = "Double-click Window", range(min = 100, max = 1000))]
    pub double_click_ms: u64,
    /// Duration (ms) of the orbit-target tween fired by a double-click.
    #[schemars(skip)]
    pub double_click_tween_ms: u64,
    /// Duration (ms) of the camera tween fired by look-at-object.
    #[schemars(skip)]
    pub look_at_tween_ms: u64,
    /// Entries kept by the info logger.
    #[schemars(skip)]
    pub log_capacity: usize,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            click_threshold_px: 5.0,
            double_click_ms: 300,
            double_click_tween_ms: 1000,
            look_at_tween_ms: 200,
            log_capacity: 256,
        }
    }
}
