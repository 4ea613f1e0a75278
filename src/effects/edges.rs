//! Feature-edge extraction for outline geometry.
//!
//! An edge is kept when it borders only one triangle, or when the two
//! triangles sharing it meet at a dihedral angle of at least the threshold.
//! Coincident vertices are welded by position so split-vertex meshes (such
//! as per-face cuboids) produce the same edges as shared-vertex ones.

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::scene::{Geometry, Topology};

const WELD_PRECISION: f32 = 1e4;

type VertexKey = [i64; 3];

fn vertex_key(p: Vec3) -> VertexKey {
    [
        (p.x * WELD_PRECISION).round() as i64,
        (p.y * WELD_PRECISION).round() as i64,
        (p.z * WELD_PRECISION).round() as i64,
    ]
}

struct OpenEdge {
    start: Vec3,
    end: Vec3,
    normal: Vec3,
    closed: bool,
}

/// Line-segment geometry of the feature edges of a triangle `geometry`.
///
/// `threshold_deg` is the minimum angle between adjacent face normals for a
/// shared edge to be kept; smaller thresholds keep more edges. Line
/// geometry yields an empty result.
#[must_use]
pub fn edges_geometry(geometry: &Geometry, threshold_deg: f32) -> Geometry {
    if geometry.topology != Topology::Triangles {
        return Geometry::line_segments(&[]);
    }
    let threshold_dot = threshold_deg.to_radians().cos();
    let positions = &geometry.positions;

    let mut edges: Vec<OpenEdge> = Vec::new();
    let mut lookup: FxHashMap<(VertexKey, VertexKey), usize> =
        FxHashMap::default();
    let mut segments: Vec<[Vec3; 2]> = Vec::new();

    for [ia, ib, ic] in geometry.triangle_indices() {
        let (Some(&a), Some(&b), Some(&c)) =
            (positions.get(ia), positions.get(ib), positions.get(ic))
        else {
            continue;
        };
        let keys = [vertex_key(a), vertex_key(b), vertex_key(c)];
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let corners = [a, b, c];

        for i in 0..3 {
            let j = (i + 1) % 3;
            let reverse = (keys[j], keys[i]);
            match lookup.get(&reverse).copied() {
                Some(index) if !edges[index].closed => {
                    let other = &mut edges[index];
                    other.closed = true;
                    if normal.dot(other.normal) <= threshold_dot {
                        segments.push([other.start, other.end]);
                    }
                    let _ = lookup.remove(&reverse);
                }
                _ => {
                    let forward = (keys[i], keys[j]);
                    if lookup.contains_key(&forward) {
                        continue;
                    }
                    let _ = lookup.insert(forward, edges.len());
                    edges.push(OpenEdge {
                        start: corners[i],
                        end: corners[j],
                        normal,
                        closed: false,
                    });
                }
            }
        }
    }

    // Boundary edges bordering a single triangle.
    segments.extend(
        edges
            .iter()
            .filter(|e| !e.closed)
            .map(|e| [e.start, e.end]),
    );
    Geometry::line_segments(&segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuboid_keeps_its_twelve_edges() {
        let cube = Geometry::cuboid(2.0, 2.0, 2.0);
        for threshold in [15.0, 30.0, 89.0] {
            let edges = edges_geometry(&cube, threshold);
            assert_eq!(edges.topology, Topology::Lines);
            assert_eq!(edges.primitive_count(), 12, "threshold {threshold}");
        }
        // Perpendicular faces are below a 90+ degree threshold.
        assert_eq!(edges_geometry(&cube, 91.0).primitive_count(), 0);
    }

    #[test]
    fn lone_triangle_is_all_boundary() {
        let tri = Geometry::triangles(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
        );
        assert_eq!(edges_geometry(&tri, 30.0).primitive_count(), 3);
    }

    #[test]
    fn shallow_fold_depends_on_threshold() {
        // Two triangles folded 20 degrees along the X axis.
        let fold = 20.0f32.to_radians();
        let tri = Geometry::triangles(
            vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(0.0, -fold.cos(), fold.sin()),
            ],
            vec![0, 1, 2, 1, 0, 3],
        );
        // Selection threshold (15) keeps the fold, hover threshold (30) drops it.
        assert_eq!(edges_geometry(&tri, 15.0).primitive_count(), 5);
        assert_eq!(edges_geometry(&tri, 30.0).primitive_count(), 4);
    }

    #[test]
    fn line_geometry_has_no_edges() {
        let lines = Geometry::line_segments(&[[Vec3::ZERO, Vec3::X]]);
        assert_eq!(edges_geometry(&lines, 15.0).primitive_count(), 0);
    }
}
