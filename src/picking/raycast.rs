//! Scene hit testing: nearest mesh intersection along a camera ray.

use glam::{Mat3, Vec2, Vec3};

use super::ray::Ray;
use crate::camera::Camera;
use crate::scene::{NodeId, NodeKind, Scene, Topology};

/// A ray/mesh intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Intersected node.
    pub node: NodeId,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
    /// World-space unit face normal (not flipped toward the ray).
    pub normal: Vec3,
    /// Index of the intersected triangle.
    pub face_index: usize,
    /// Interpolated texture coordinate, when the geometry has UVs.
    pub uv: Option<Vec2>,
}

/// Convert a pointer position (pixels, +Y down) to normalized device
/// coordinates (`[-1, 1]`, +Y up).
#[must_use]
pub fn pointer_to_ndc(pointer: Vec2, viewport: (u32, u32)) -> Vec2 {
    let width = viewport.0.max(1) as f32;
    let height = viewport.1.max(1) as f32;
    Vec2::new(
        (pointer.x / width) * 2.0 - 1.0,
        -((pointer.y / height) * 2.0 - 1.0),
    )
}

/// Nearest intersection of `ray` with the visible meshes under `root`.
///
/// Invisible subtrees and the ignore set (lights, helpers, outline
/// artifacts) are skipped; only triangle meshes are tested.
#[must_use]
pub fn intersect_scene(scene: &Scene, root: NodeId, ray: &Ray) -> Option<Intersection> {
    let mut nearest: Option<Intersection> = None;
    scene.traverse_visible(root, |node| {
        if node.kind.is_ignored_for_picking() || node.kind != NodeKind::Mesh {
            return;
        }
        let Some(geometry) = node.geometry.as_ref() else {
            return;
        };
        if geometry.topology != Topology::Triangles {
            return;
        }
        let world = scene.world_matrix(node.id());
        let local_ray = ray.transformed(&world.inverse());
        if !local_ray.intersects_sphere(&geometry.bounding_sphere()) {
            return;
        }
        let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
        for (face_index, [ia, ib, ic]) in geometry.triangle_indices().into_iter().enumerate() {
            let positions = &geometry.positions;
            let (Some(&a), Some(&b), Some(&c)) =
                (positions.get(ia), positions.get(ib), positions.get(ic))
            else {
                continue;
            };
            let Some(hit) = local_ray.intersect_triangle(a, b, c) else {
                continue;
            };
            if nearest.is_some_and(|n| n.distance <= hit.t) {
                continue;
            }
            let uv = geometry.uvs.as_ref().and_then(|uvs| {
                Some(hit.interpolate_uv([*uvs.get(ia)?, *uvs.get(ib)?, *uvs.get(ic)?]))
            });
            nearest = Some(Intersection {
                node: node.id(),
                distance: hit.t,
                point: ray.at(hit.t),
                normal: (normal_matrix * (b - a).cross(c - a)).normalize_or_zero(),
                face_index,
                uv,
            });
        }
    });
    nearest
}

/// Nearest intersection under a pointer position on a canvas of size
/// `viewport`, seen through `camera`.
#[must_use]
pub fn hit_test(
    scene: &Scene,
    camera: &Camera,
    pointer: Vec2,
    viewport: (u32, u32),
) -> Option<Intersection> {
    let ray = camera.ray_from_ndc(pointer_to_ndc(pointer, viewport));
    intersect_scene(scene, scene.root(), &ray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Geometry, LightKind, Node};
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        let mut camera = Camera::perspective(75.0, 1.0, 1.0, 1000.0);
        camera.position = Vec3::new(0.0, 0.0, 100.0);
        camera.look_at(Vec3::ZERO);
        camera.update_projection_matrix();
        camera
    }

    #[test]
    fn ndc_maps_corners_and_center() {
        let viewport = (200, 100);
        assert_eq!(pointer_to_ndc(Vec2::new(100.0, 50.0), viewport), Vec2::ZERO);
        assert_eq!(pointer_to_ndc(Vec2::ZERO, viewport), Vec2::new(-1.0, 1.0));
        assert_eq!(pointer_to_ndc(Vec2::new(200.0, 100.0), viewport), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn nearest_box_wins() {
        let mut scene = Scene::new();
        let near = scene.add_to_root(
            Node::mesh("near", Geometry::cuboid(10.0, 10.0, 10.0), [1.0; 4])
                .with_position(Vec3::new(0.0, 0.0, 20.0)),
        );
        let _far = scene.add_to_root(Node::mesh("far", Geometry::cuboid(10.0, 10.0, 10.0), [1.0; 4]));
        let hit = hit_test(&scene, &camera(), Vec2::new(400.0, 300.0), (800, 600)).unwrap();
        assert_eq!(hit.node, near);
        assert_relative_eq!(hit.distance, 75.0, epsilon = 1e-3);
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, 25.0), 1e-3));
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-4));
        assert!(hit.uv.is_some());
    }

    #[test]
    fn hidden_and_ignored_nodes_are_skipped() {
        let mut scene = Scene::new();
        let group = scene.add_to_root(Node::group("hidden"));
        let _ = scene.add(group, Node::mesh("box", Geometry::cuboid(10.0, 10.0, 10.0), [1.0; 4]));
        scene.node_mut(group).unwrap().visible = false;
        let _ = scene.add_to_root(Node::light("sun", LightKind::Directional));
        let _ = scene.add_to_root(Node::helper("axes", Some(Geometry::cuboid(50.0, 50.0, 50.0))));
        assert!(hit_test(&scene, &camera(), Vec2::new(400.0, 300.0), (800, 600)).is_none());
    }

    #[test]
    fn miss_off_to_the_side() {
        let mut scene = Scene::new();
        let _ = scene.add_to_root(Node::mesh("box", Geometry::cuboid(10.0, 10.0, 10.0), [1.0; 4]));
        assert!(hit_test(&scene, &camera(), Vec2::new(5.0, 5.0), (800, 600)).is_none());
    }

    #[test]
    fn scaled_and_rotated_parent_is_respected() {
        let mut scene = Scene::new();
        let group = scene.add_to_root(
            Node::group("rig")
                .with_scale(Vec3::splat(2.0))
                .with_rotation(glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_2)),
        );
        let mesh = scene
            .add(group, Node::mesh("box", Geometry::cuboid(10.0, 10.0, 10.0), [1.0; 4]))
            .unwrap();
        let hit = hit_test(&scene, &camera(), Vec2::new(400.0, 300.0), (800, 600)).unwrap();
        assert_eq!(hit.node, mesh);
        // Scaled box front face at z = 10
        assert_relative_eq!(hit.distance, 90.0, epsilon = 1e-3);
        assert!(hit.normal.abs_diff_eq(Vec3::Z, 1e-4));
    }
}
