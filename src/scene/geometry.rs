//! CPU-side geometry: positions, optional indices and UVs, and a cached
//! bounding sphere used for ray-cast early-outs and focus positions.

use glam::{Vec2, Vec3};

/// How vertex data is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// Every three vertices (or indices) form a triangle.
    Triangles,
    /// Every two vertices (or indices) form a line segment.
    Lines,
}

/// Sphere enclosing every vertex of a geometry, in local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: Vec3,
    /// Sphere radius.
    pub radius: f32,
}

impl BoundingSphere {
    /// Bounding sphere centered on the axis-aligned box of `points`.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        let (min, max) = points.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        let center = (min + max) * 0.5;
        let radius = points
            .iter()
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max)
            .sqrt();
        Self { center, radius }
    }
}

/// Renderable geometry owned by a scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Primitive assembly mode.
    pub topology: Topology,
    /// Vertex positions in local space.
    pub positions: Vec<Vec3>,
    /// Optional index buffer; when absent vertices are used in order.
    pub indices: Option<Vec<u32>>,
    /// Optional per-vertex texture coordinates.
    pub uvs: Option<Vec<Vec2>>,
    bounding_sphere: BoundingSphere,
}

impl Geometry {
    /// Indexed triangle geometry.
    #[must_use]
    pub fn triangles(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounding_sphere = BoundingSphere::from_points(&positions);
        Self {
            topology: Topology::Triangles,
            positions,
            indices: Some(indices),
            uvs: None,
            bounding_sphere,
        }
    }

    /// Non-indexed line-segment geometry, two points per segment.
    #[must_use]
    pub fn line_segments(segments: &[[Vec3; 2]]) -> Self {
        let positions: Vec<Vec3> =
            segments.iter().flat_map(|s| s.iter().copied()).collect();
        let bounding_sphere = BoundingSphere::from_points(&positions);
        Self {
            topology: Topology::Lines,
            positions,
            indices: None,
            uvs: None,
            bounding_sphere,
        }
    }

    /// Axis-aligned box centered on the origin with per-face UVs.
    #[must_use]
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let h = Vec3::new(width, height, depth) * 0.5;
        // (normal axis, u axis, v axis) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut uvs = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u_axis, v_axis) in faces {
            let base = positions.len() as u32;
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]
            {
                let corner = normal + u_axis * su + v_axis * sv;
                positions.push(corner * h);
                uvs.push(Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5));
            }
            indices.extend_from_slice(&[
                base,
                base + 1,
                base + 2,
                base,
                base + 2,
                base + 3,
            ]);
        }

        let bounding_sphere = BoundingSphere::from_points(&positions);
        Self {
            topology: Topology::Triangles,
            positions,
            indices: Some(indices),
            uvs: Some(uvs),
            bounding_sphere,
        }
    }

    /// Attach per-vertex UVs.
    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Cached local-space bounding sphere.
    #[must_use]
    pub fn bounding_sphere(&self) -> BoundingSphere {
        self.bounding_sphere
    }

    /// Recompute the bounding sphere after editing `positions`.
    pub fn compute_bounding_sphere(&mut self) {
        self.bounding_sphere = BoundingSphere::from_points(&self.positions);
    }

    /// Vertex indices of each triangle, in primitive order.
    ///
    /// Empty for line geometry.
    #[must_use]
    pub fn triangle_indices(&self) -> Vec<[usize; 3]> {
        if self.topology != Topology::Triangles {
            return Vec::new();
        }
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect(),
            None => (0..self.positions.len() / 3)
                .map(|i| [i * 3, i * 3 + 1, i * 3 + 2])
                .collect(),
        }
    }

    /// Number of primitives (triangles or segments).
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        let vertices = self
            .indices
            .as_ref()
            .map_or(self.positions.len(), Vec::len);
        match self.topology {
            Topology::Triangles => vertices / 3,
            Topology::Lines => vertices / 2,
        }
    }
}
