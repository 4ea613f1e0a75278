//! Outline shader materials and their GPU uniform layout.

use bytemuck::{Pod, Zeroable};

/// WGSL source of the flat-color hover outline shader.
pub const HOVER_SHADER: &str =
    include_str!("../../assets/shaders/outline_hover.wgsl");
/// WGSL source of the animated rainbow selection outline shader.
pub const SELECTION_SHADER: &str =
    include_str!("../../assets/shaders/outline_selection.wgsl");

/// Which outline look a material renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutlineStyle {
    /// Constant flat color.
    Hover,
    /// Rainbow gradient travelling over world space with `time`.
    Selection,
}

impl OutlineStyle {
    /// WGSL source implementing this style.
    #[must_use]
    pub fn shader_source(self) -> &'static str {
        match self {
            Self::Hover => HOVER_SHADER,
            Self::Selection => SELECTION_SHADER,
        }
    }

    /// Virtual file path used when composing the shader.
    #[must_use]
    pub fn shader_path(self) -> &'static str {
        match self {
            Self::Hover => "outline_hover.wgsl",
            Self::Selection => "outline_selection.wgsl",
        }
    }
}

/// Per-outline uniform block, matching `OutlineUniform` in the WGSL shaders.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct OutlineUniform {
    /// RGB color (ignored by the selection shader) plus opacity in `w`.
    pub color: [f32; 4],
    /// Seconds since the effects manager started.
    pub time: f32,
    pub(crate) _pad: [f32; 3],
}

/// Shader material instance attached to an outline artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineMaterial {
    style: OutlineStyle,
    color: [f32; 3],
    opacity: f32,
    time: f32,
}

impl OutlineMaterial {
    /// Flat-color hover material.
    #[must_use]
    pub fn hover(color: [f32; 3], opacity: f32) -> Self {
        Self {
            style: OutlineStyle::Hover,
            color,
            opacity: opacity.clamp(0.0, 1.0),
            time: 0.0,
        }
    }

    /// Animated selection material.
    #[must_use]
    pub fn selection(opacity: f32) -> Self {
        Self {
            style: OutlineStyle::Selection,
            color: [1.0; 3],
            opacity: opacity.clamp(0.0, 1.0),
            time: 0.0,
        }
    }

    /// Hover or selection.
    #[must_use]
    pub fn style(&self) -> OutlineStyle {
        self.style
    }

    /// The `opacity` uniform.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// The `time` uniform in seconds.
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance the `time` uniform.
    pub fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    /// Uniform data for upload.
    #[must_use]
    pub fn uniform(&self) -> OutlineUniform {
        let [r, g, b] = self.color;
        OutlineUniform {
            color: [r, g, b, self.opacity],
            time: self.time,
            _pad: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_sixteen_byte_aligned() {
        assert_eq!(size_of::<OutlineUniform>() % 16, 0);
    }

    #[test]
    fn opacity_per_style() {
        let hover = OutlineMaterial::hover([1.0, 0.0, 0.0], 0.8);
        let selection = OutlineMaterial::selection(1.0);
        assert_eq!(hover.uniform().color, [1.0, 0.0, 0.0, 0.8]);
        assert_eq!(selection.uniform().color[3], 1.0);
        assert_eq!(selection.style(), OutlineStyle::Selection);
        assert_ne!(hover.style().shader_source(), selection.style().shader_source());
    }

    #[test]
    fn time_flows_into_uniform() {
        let mut material = OutlineMaterial::selection(1.0);
        material.set_time(2.5);
        assert_eq!(material.uniform().time, 2.5);
    }
}
