//! wgpu implementation of [`Renderer`].
//!
//! One `SceneRenderer` draws one canvas. Geometry is uploaded lazily the
//! first time a node is drawn and cached by [`NodeId`] until the effects
//! manager (or a scene removal) releases it. Model and material uniforms
//! are rewritten every frame so transforms and outline time stay live.

use rustc_hash::FxHashMap;
use wgpu::util::DeviceExt;

use super::pipeline_helpers::{
    create_scene_pipeline, uniform_binding, uniform_layout, DepthMode,
    ScenePipelineDesc,
};
use super::render_context::{DepthTarget, RenderContext};
use super::shader_composer::{ShaderComposer, MESH_SHADER};
use crate::camera::core::CameraUniform;
use crate::camera::Camera;
use crate::effects::compositor::{PassKind, RenderPath};
use crate::effects::material::OutlineUniform;
use crate::effects::OutlineStyle;
use crate::error::ViewerError;
use crate::renderer::{RenderFrame, Renderer};
use crate::scene::{
    Geometry, Material, Node, NodeId, NodeKind, Scene, Topology,
};

/// Color used for geometry without a material (bare helpers).
const FALLBACK_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Material buffers are sized for the larger of the two uniform blocks.
const MATERIAL_UNIFORM_SIZE: wgpu::BufferAddress =
    std::mem::size_of::<OutlineUniform>() as wgpu::BufferAddress;

const MODEL_UNIFORM_SIZE: wgpu::BufferAddress =
    std::mem::size_of::<[[f32; 4]; 4]>() as wgpu::BufferAddress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PipelineKind {
    Mesh,
    Line,
    HoverOutline,
    SelectionOutline,
}

impl PipelineKind {
    fn for_node(node: &Node, geometry: &Geometry) -> Self {
        match &node.material {
            Some(Material::Outline(m)) => match m.style() {
                OutlineStyle::Hover => Self::HoverOutline,
                OutlineStyle::Selection => Self::SelectionOutline,
            },
            _ => match geometry.topology {
                Topology::Triangles => Self::Mesh,
                Topology::Lines => Self::Line,
            },
        }
    }
}

/// GPU resources cached per drawn node.
struct NodeBuffers {
    vertex: wgpu::Buffer,
    vertex_count: u32,
    index: Option<(wgpu::Buffer, u32)>,
    model: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    material: wgpu::Buffer,
    material_bind_group: wgpu::BindGroup,
    pipeline: PipelineKind,
    kind: NodeKind,
}

impl NodeBuffers {
    fn new(
        device: &wgpu::Device,
        layouts: &Layouts,
        node: &Node,
        geometry: &Geometry,
    ) -> Self {
        let vertex =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Vertices", node.name)),
                contents: bytemuck::cast_slice(&geometry.positions),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index = geometry.indices.as_ref().map(|indices| {
            let buffer =
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Indices", node.name)),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
            (buffer, indices.len() as u32)
        });
        let (model, model_bind_group) = uniform_binding(
            device,
            &layouts.model,
            "Model Uniform",
            MODEL_UNIFORM_SIZE,
        );
        let (material, material_bind_group) = uniform_binding(
            device,
            &layouts.material,
            "Material Uniform",
            MATERIAL_UNIFORM_SIZE,
        );
        Self {
            vertex,
            vertex_count: geometry.positions.len() as u32,
            index,
            model,
            model_bind_group,
            material,
            material_bind_group,
            pipeline: PipelineKind::for_node(node, geometry),
            kind: node.kind,
        }
    }

    fn matches(&self, geometry: &Geometry) -> bool {
        self.vertex_count == geometry.positions.len() as u32
            && self.index.as_ref().map(|(_, n)| *n)
                == geometry.indices.as_ref().map(|i| i.len() as u32)
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.model_bind_group, &[]);
        pass.set_bind_group(2, &self.material_bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex.slice(..));
        match &self.index {
            Some((buffer, count)) => {
                pass.set_index_buffer(buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..*count, 0, 0..1);
            }
            None => pass.draw(0..self.vertex_count, 0..1),
        }
    }
}

struct Layouts {
    camera: wgpu::BindGroupLayout,
    model: wgpu::BindGroupLayout,
    material: wgpu::BindGroupLayout,
}

struct Pipelines {
    mesh: wgpu::RenderPipeline,
    line: wgpu::RenderPipeline,
    hover: wgpu::RenderPipeline,
    selection: wgpu::RenderPipeline,
}

impl Pipelines {
    fn new(
        context: &RenderContext,
        layouts: &Layouts,
    ) -> Result<Self, ViewerError> {
        let device = &context.device;
        let format = context.format();
        let mut composer = ShaderComposer::new()?;
        let mesh_shader =
            composer.compose(device, "Mesh Shader", MESH_SHADER, "mesh.wgsl")?;
        let hover_shader = composer.compose(
            device,
            "Hover Outline Shader",
            OutlineStyle::Hover.shader_source(),
            OutlineStyle::Hover.shader_path(),
        )?;
        let selection_shader = composer.compose(
            device,
            "Selection Outline Shader",
            OutlineStyle::Selection.shader_source(),
            OutlineStyle::Selection.shader_path(),
        )?;

        let bind_group_layouts =
            [&layouts.camera, &layouts.model, &layouts.material];
        let build = |label: &str,
                     shader: &wgpu::ShaderModule,
                     fragment_entry: &str,
                     topology: wgpu::PrimitiveTopology,
                     depth: DepthMode,
                     blend: Option<wgpu::BlendState>| {
            create_scene_pipeline(
                device,
                &ScenePipelineDesc {
                    label,
                    shader,
                    fragment_entry,
                    format,
                    topology,
                    depth,
                    blend,
                },
                &bind_group_layouts,
            )
        };

        Ok(Self {
            mesh: build(
                "Mesh",
                &mesh_shader,
                "fs_main",
                wgpu::PrimitiveTopology::TriangleList,
                DepthMode::Opaque,
                Some(wgpu::BlendState::ALPHA_BLENDING),
            ),
            line: build(
                "Line",
                &mesh_shader,
                "fs_flat",
                wgpu::PrimitiveTopology::LineList,
                DepthMode::Opaque,
                Some(wgpu::BlendState::ALPHA_BLENDING),
            ),
            hover: build(
                "Hover Outline",
                &hover_shader,
                "fs_main",
                wgpu::PrimitiveTopology::LineList,
                DepthMode::Overlay,
                Some(wgpu::BlendState::ALPHA_BLENDING),
            ),
            selection: build(
                "Selection Outline",
                &selection_shader,
                "fs_main",
                wgpu::PrimitiveTopology::LineList,
                DepthMode::Overlay,
                Some(wgpu::BlendState::ALPHA_BLENDING),
            ),
        })
    }

    fn get(&self, kind: PipelineKind) -> &wgpu::RenderPipeline {
        match kind {
            PipelineKind::Mesh => &self.mesh,
            PipelineKind::Line => &self.line,
            PipelineKind::HoverOutline => &self.hover,
            PipelineKind::SelectionOutline => &self.selection,
        }
    }
}

/// Draws scenes onto one window surface.
pub struct SceneRenderer {
    context: RenderContext,
    depth: DepthTarget,
    layouts: Layouts,
    pipelines: Pipelines,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    nodes: FxHashMap<NodeId, NodeBuffers>,
}

impl SceneRenderer {
    /// Build pipelines for `context`'s surface.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if a shader fails to compose.
    pub fn new(context: RenderContext) -> Result<Self, ViewerError> {
        let device = &context.device;
        let layouts = Layouts {
            camera: uniform_layout(device, "Camera Layout"),
            model: uniform_layout(device, "Model Layout"),
            material: uniform_layout(device, "Material Layout"),
        };
        let pipelines = Pipelines::new(&context, &layouts)?;
        let (camera_buffer, camera_bind_group) = uniform_binding(
            device,
            &layouts.camera,
            "Camera Uniform",
            std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
        );
        let (width, height) = context.size();
        let depth = DepthTarget::new(device, width, height);

        Ok(Self {
            context,
            depth,
            layouts,
            pipelines,
            camera_uniform: CameraUniform::new(),
            camera_buffer,
            camera_bind_group,
            nodes: FxHashMap::default(),
        })
    }

    /// Device, queue and surface.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Number of nodes with cached GPU buffers.
    #[must_use]
    pub fn cached_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn write_camera(&mut self, camera: &Camera) {
        self.camera_uniform.update_view_proj(camera);
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&self.camera_uniform),
        );
    }

    /// Upload (if needed) and refresh the uniforms of one node.
    fn sync_node(&mut self, scene: &Scene, node: &Node) {
        let Some(geometry) = &node.geometry else {
            return;
        };
        let id = node.id();
        if !matches!(self.nodes.get(&id), Some(b) if b.matches(geometry)) {
            let buffers = NodeBuffers::new(
                &self.context.device,
                &self.layouts,
                node,
                geometry,
            );
            let _ = self.nodes.insert(id, buffers);
        }
        let Some(buffers) = self.nodes.get_mut(&id) else {
            return;
        };
        buffers.pipeline = PipelineKind::for_node(node, geometry);
        buffers.kind = node.kind;

        let queue = &self.context.queue;
        let model = scene.world_matrix(id).to_cols_array_2d();
        queue.write_buffer(&buffers.model, 0, bytemuck::bytes_of(&model));
        match &node.material {
            Some(Material::Outline(m)) => queue.write_buffer(
                &buffers.material,
                0,
                bytemuck::bytes_of(&m.uniform()),
            ),
            Some(Material::Basic(m)) => queue.write_buffer(
                &buffers.material,
                0,
                bytemuck::bytes_of(&m.color),
            ),
            None => queue.write_buffer(
                &buffers.material,
                0,
                bytemuck::bytes_of(&FALLBACK_COLOR),
            ),
        }
    }

    fn encode_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        frame: &RenderFrame<'_>,
        pass: Option<PassKind>,
        clear: bool,
        draws: &[NodeId],
    ) {
        let color_load = if clear {
            let [r, g, b, a] = frame.scene.background.unwrap_or([0.0; 4]);
            wgpu::LoadOp::Clear(wgpu::Color {
                r: f64::from(r),
                g: f64::from(g),
                b: f64::from(b),
                a: f64::from(a),
            })
        } else {
            wgpu::LoadOp::Load
        };
        let depth_load = if clear {
            wgpu::LoadOp::Clear(1.0)
        } else {
            wgpu::LoadOp::Load
        };
        let label = match pass {
            None => "Scene Pass",
            Some(PassKind::Base) => "Base Pass",
            Some(PassKind::Outline) => "Outline Pass",
        };

        let mut render_pass =
            encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: depth_load,
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                ..Default::default()
            });
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

        let mut bound = None;
        for id in draws {
            let Some(buffers) = self.nodes.get(id) else {
                continue;
            };
            if !frame.draws(pass, buffers.kind) {
                continue;
            }
            if bound != Some(buffers.pipeline) {
                render_pass.set_pipeline(self.pipelines.get(buffers.pipeline));
                bound = Some(buffers.pipeline);
            }
            buffers.draw(&mut render_pass);
        }
    }
}

impl Renderer for SceneRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) {
        let output = match self.context.next_frame() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring");
                self.context.reconfigure();
                return;
            }
            Err(e) => {
                log::warn!("skipping frame: {e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.write_camera(frame.camera);
        let scene = frame.scene;
        self.nodes.retain(|id, _| scene.contains(*id));
        let mut draws = Vec::new();
        scene.traverse_visible(scene.root(), |node| {
            if node.geometry.is_some() {
                draws.push(node.id());
            }
        });
        for id in &draws {
            if let Some(node) = scene.node(*id) {
                self.sync_node(scene, node);
            }
        }

        let passes: Vec<Option<PassKind>> = match frame.path {
            RenderPath::Composed(passes) if !passes.is_empty() => {
                passes.iter().copied().map(Some).collect()
            }
            _ => vec![None],
        };
        let mut encoder = self.context.create_encoder();
        for (i, pass) in passes.iter().enumerate() {
            self.encode_pass(&mut encoder, &view, frame, *pass, i == 0, &draws);
        }
        self.context.submit(encoder);
        output.present();
    }

    fn release(&mut self, node: NodeId) {
        let _ = self.nodes.remove(&node);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.depth = DepthTarget::new(&self.context.device, width, height);
    }
}
