use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Outlines", inline)]
#[serde(default)]
/// Hover and selection outline appearance.
pub struct OutlineOptions {
    /// Flat RGB color of hover outlines.
    #[schemars(skip)]
    pub hover_color: [f32; 3],
    /// Opacity of hover outlines.
    #[schemars(title = "Hover Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub hover_opacity: f32,
    /// Opacity of selection outlines.
    #[schemars(title = "Selection Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub selection_opacity: f32,
    /// Minimum dihedral angle (degrees) for an edge to appear in hover
    /// outlines.
    #[schemars(title = "Hover Edge Angle", range(min = 1.0, max = 90.0), extend("step" = 1.0))]
    pub hover_edge_angle: f32,
    /// Minimum dihedral angle (degrees) for an edge to appear in selection
    /// outlines.
    #[schemars(title = "Selection Edge Angle", range(min = 1.0, max = 90.0), extend("step" = 1.0))]
    pub selection_edge_angle: f32,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self {
            hover_color: [1.0, 0.85, 0.2],
            hover_opacity: 0.8,
            selection_opacity: 1.0,
            hover_edge_angle: 30.0,
            selection_edge_angle: 15.0,
        }
    }
}
