//! Shared wgpu boilerplate for the scene pipelines.

use super::render_context::DEPTH_FORMAT;

/// Bytes per vertex: a single `vec3<f32>` position.
pub const VERTEX_STRIDE: wgpu::BufferAddress = 12;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];

/// Position-only vertex buffer layout shared by every scene shader.
#[must_use]
pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_STRIDE,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Single uniform buffer at binding 0, visible to both stages.
pub fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Uniform buffer of `size` bytes plus its bind group on `layout`.
pub fn uniform_binding(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    size: wgpu::BufferAddress,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    (buffer, bind_group)
}

/// How a pipeline interacts with the depth buffer.
#[derive(Debug, Clone, Copy)]
pub enum DepthMode {
    /// Opaque geometry: `Less` test, depth written.
    Opaque,
    /// Overlays drawn on top of coplanar geometry: `LessEqual`, read-only.
    Overlay,
}

impl DepthMode {
    fn state(self) -> wgpu::DepthStencilState {
        let (depth_write_enabled, depth_compare) = match self {
            Self::Opaque => (true, wgpu::CompareFunction::Less),
            Self::Overlay => (false, wgpu::CompareFunction::LessEqual),
        };
        wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Parameters for [`create_scene_pipeline`].
pub struct ScenePipelineDesc<'a> {
    /// Label prefix.
    pub label: &'a str,
    /// Composed shader module.
    pub shader: &'a wgpu::ShaderModule,
    /// Fragment entry point.
    pub fragment_entry: &'a str,
    /// Surface format.
    pub format: wgpu::TextureFormat,
    /// Triangle or line list.
    pub topology: wgpu::PrimitiveTopology,
    /// Depth behavior.
    pub depth: DepthMode,
    /// Color blending, `None` to replace.
    pub blend: Option<wgpu::BlendState>,
}

/// Scene pipeline with `vs_main`, position-only vertices and the
/// camera/model/material bind group layouts.
pub fn create_scene_pipeline(
    device: &wgpu::Device,
    desc: &ScenePipelineDesc<'_>,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::RenderPipeline {
    let pipeline_layout =
        device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", desc.label)),
            bind_group_layouts,
            push_constant_ranges: &[],
        });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", desc.label)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[position_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some(desc.fragment_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: desc.topology,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(desc.depth.state()),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
