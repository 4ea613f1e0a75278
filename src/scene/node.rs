use glam::{Mat4, Quat, Vec3};
use serde_json::{Map, Value};

use super::geometry::Geometry;
use crate::effects::material::OutlineMaterial;

/// Stable handle to a node in a [`Scene`](super::Scene).
///
/// Ids are never reused within one scene, so a stale id simply resolves to
/// nothing after its node is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Raw numeric value (stable for the lifetime of the scene).
    #[must_use]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Uniform ambient light.
    Ambient,
    /// Directional light.
    Directional,
}

/// Node type tag.
///
/// Lights, helpers and outline artifacts form the non-pickable ignore set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Transform-only container.
    Group,
    /// Triangle geometry; the only pickable kind.
    Mesh,
    /// Line-segment geometry (tracks, wireframes).
    LineSegments,
    /// Light source.
    Light(LightKind),
    /// Visual aid such as axes or grids.
    Helper,
    /// Outline artifact owned by the effects manager.
    Outline,
}

impl NodeKind {
    /// Whether this kind is excluded from traversal-based hit testing.
    #[must_use]
    pub fn is_ignored_for_picking(self) -> bool {
        matches!(self, Self::Light(_) | Self::Helper | Self::Outline)
    }
}

/// Local transform (translation, rotation, scale).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent.
    pub position: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.position,
        )
    }
}

/// Flat-colored surface material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasicMaterial {
    /// Linear RGBA color.
    pub color: [f32; 4],
}

/// Material attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Flat color.
    Basic(BasicMaterial),
    /// Animated outline shader.
    Outline(OutlineMaterial),
}

/// A scene-graph node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) id: NodeId,
    /// Display name (not required to be unique).
    pub name: String,
    /// Type tag.
    pub kind: NodeKind,
    /// Local transform.
    pub transform: Transform,
    /// Whether the node (and its subtree) is drawn and pickable.
    pub visible: bool,
    /// Renderable geometry, if any.
    pub geometry: Option<Geometry>,
    /// Surface material, if any.
    pub material: Option<Material>,
    /// Free-form custom properties (the detector/event payload).
    pub user_data: Map<String, Value>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    fn new(name: &str, kind: NodeKind) -> Self {
        Self {
            id: NodeId(0),
            name: name.to_owned(),
            kind,
            transform: Transform::default(),
            visible: true,
            geometry: None,
            material: None,
            user_data: Map::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Empty group node.
    #[must_use]
    pub fn group(name: &str) -> Self {
        Self::new(name, NodeKind::Group)
    }

    /// Mesh node with a flat color.
    #[must_use]
    pub fn mesh(name: &str, geometry: Geometry, color: [f32; 4]) -> Self {
        let mut node = Self::new(name, NodeKind::Mesh);
        node.geometry = Some(geometry);
        node.material = Some(Material::Basic(BasicMaterial { color }));
        node
    }

    /// Line-segment node with a flat color.
    #[must_use]
    pub fn line_segments(
        name: &str,
        geometry: Geometry,
        color: [f32; 4],
    ) -> Self {
        let mut node = Self::new(name, NodeKind::LineSegments);
        node.geometry = Some(geometry);
        node.material = Some(Material::Basic(BasicMaterial { color }));
        node
    }

    /// Light node.
    #[must_use]
    pub fn light(name: &str, kind: LightKind) -> Self {
        Self::new(name, NodeKind::Light(kind))
    }

    /// Helper node (axes, grids) with optional line geometry.
    #[must_use]
    pub fn helper(name: &str, geometry: Option<Geometry>) -> Self {
        let mut node = Self::new(name, NodeKind::Helper);
        node.geometry = geometry;
        node
    }

    /// Outline artifact node.
    #[must_use]
    pub(crate) fn outline(
        name: &str,
        geometry: Geometry,
        material: OutlineMaterial,
        transform: Transform,
    ) -> Self {
        let mut node = Self::new(name, NodeKind::Outline);
        node.geometry = Some(geometry);
        node.material = Some(Material::Outline(material));
        node.transform = transform;
        node
    }

    /// Builder: set the local position.
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    /// Builder: set the local rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Builder: set the local scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    /// Builder: add a custom property.
    #[must_use]
    pub fn with_user_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        let _ = self.user_data.insert(key.to_owned(), value.into());
        self
    }

    /// This node's id (assigned when added to a scene).
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Parent node, `None` for the scene root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The outline material, if this node carries one.
    #[must_use]
    pub fn outline_material(&self) -> Option<&OutlineMaterial> {
        match &self.material {
            Some(Material::Outline(m)) => Some(m),
            _ => None,
        }
    }

    /// Mutable outline material, if this node carries one.
    pub fn outline_material_mut(&mut self) -> Option<&mut OutlineMaterial> {
        match &mut self.material {
            Some(Material::Outline(m)) => Some(m),
            _ => None,
        }
    }
}
