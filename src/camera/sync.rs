//! Synchronization between cameras of either projection model.
//!
//! Cross-model synchronization keeps the image at the orbit target visually
//! equivalent: the orthographic extents match the perspective frustum's
//! cross-section at the target distance, and vice versa.

use glam::Vec3;

use super::core::{Camera, Projection, ProjectionKind};

/// Bring `dest` in line with `source` around orbit `target`.
///
/// Dispatches on both projection models. `forced_aspect` overrides the
/// aspect taken from `source` (used when `dest` renders into a viewport with
/// its own width/height ratio). The projection matrix of `dest` is
/// recomputed before returning.
pub fn sync_camera(
    source: &Camera,
    dest: &mut Camera,
    target: Vec3,
    forced_aspect: Option<f32>,
) {
    match (source.projection, dest.projection) {
        (Projection::Perspective { aspect, .. }, Projection::Orthographic { .. }) => {
            let vfov = source.effective_fovy().unwrap_or(50.0).to_radians();
            let focus = source.position.distance(target);
            let half_height = (vfov * 0.5).tan() * focus;
            let half_width = half_height * forced_aspect.unwrap_or(aspect);
            dest.projection = Projection::Orthographic {
                left: -half_width,
                right: half_width,
                top: half_height,
                bottom: -half_height,
                zoom: 1.0,
            };
            dest.position = source.position;
            dest.up = source.up;
            dest.look_at(target);
        }
        (
            Projection::Orthographic {
                top, bottom, zoom, ..
            },
            Projection::Perspective { .. },
        ) => {
            let height = (top - bottom) / zoom.max(1e-6);
            let vfov = dest.effective_fovy().unwrap_or(50.0).to_radians();
            let focus = height / (2.0 * (vfov * 0.5).tan());
            let direction = (source.position - target).normalize_or(Vec3::Z);
            dest.position = target + direction * focus;
            dest.up = source.up;
            if let (Some(forced), Projection::Perspective { aspect, .. }) =
                (forced_aspect, &mut dest.projection)
            {
                *aspect = forced;
            }
            dest.look_at(target);
        }
        (Projection::Perspective { fovy, aspect, zoom }, Projection::Perspective { .. }) => {
            copy_pose(source, dest);
            dest.projection = Projection::Perspective {
                fovy,
                aspect: forced_aspect.unwrap_or(aspect),
                zoom,
            };
        }
        (
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                zoom,
            },
            Projection::Orthographic { .. },
        ) => {
            copy_pose(source, dest);
            let (top, bottom) = match forced_aspect {
                Some(aspect) if aspect > 0.0 => (right / aspect, -right / aspect),
                _ => (top, bottom),
            };
            dest.projection = Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                zoom,
            };
        }
    }
    dest.update_projection_matrix();
}

fn copy_pose(source: &Camera, dest: &mut Camera) {
    dest.position = source.position;
    dest.orientation = source.orientation;
    dest.up = source.up;
    dest.near = source.near;
    dest.far = source.far;
}

/// New camera of model `kind` equivalent to `source` around `target`.
///
/// A perspective result uses `fovy` (degrees) as its own field of view;
/// clipping planes are inherited from `source`. Same-model requests go
/// through the same-model copy path.
#[must_use]
pub fn convert_camera(
    source: &Camera,
    kind: ProjectionKind,
    target: Vec3,
    fovy: f32,
    forced_aspect: Option<f32>,
) -> Camera {
    let mut dest = match kind {
        ProjectionKind::Perspective => {
            let aspect = match source.projection {
                Projection::Perspective { aspect, .. } => aspect,
                Projection::Orthographic {
                    left,
                    right,
                    top,
                    bottom,
                    ..
                } => (right - left) / (top - bottom).max(1e-6),
            };
            Camera::perspective(fovy, aspect, source.near, source.far)
        }
        ProjectionKind::Orthographic => {
            Camera::orthographic(-1.0, 1.0, 1.0, -1.0, source.near, source.far)
        }
    };
    sync_camera(source, &mut dest, target, forced_aspect);
    dest
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn perspective_at(position: Vec3, target: Vec3) -> Camera {
        let mut camera = Camera::perspective(75.0, 1.6, 10.0, 100_000.0);
        camera.position = position;
        camera.look_at(target);
        camera.update_projection_matrix();
        camera
    }

    #[test]
    fn perspective_to_orthographic_matches_cross_section() {
        let target = Vec3::new(5.0, 0.0, 0.0);
        let source = perspective_at(Vec3::new(5.0, 0.0, 200.0), target);
        let ortho = convert_camera(&source, ProjectionKind::Orthographic, target, 75.0, None);
        let Projection::Orthographic { left, right, top, bottom, zoom } = ortho.projection else {
            panic!("expected orthographic");
        };
        let half_height = (37.5f32).to_radians().tan() * 200.0;
        assert_relative_eq!(top, half_height, epsilon = 1e-3);
        assert_relative_eq!(bottom, -half_height, epsilon = 1e-3);
        assert_relative_eq!(right, half_height * 1.6, epsilon = 1e-3);
        assert_relative_eq!(left, -half_height * 1.6, epsilon = 1e-3);
        assert_relative_eq!(zoom, 1.0);
        assert_eq!(ortho.position, source.position);
        assert!(ortho.forward().abs_diff_eq(source.forward(), 1e-5));
    }

    #[test]
    fn forced_aspect_overrides_width() {
        let target = Vec3::ZERO;
        let source = perspective_at(Vec3::new(0.0, 0.0, 100.0), target);
        let ortho = convert_camera(&source, ProjectionKind::Orthographic, target, 75.0, Some(2.0));
        let Projection::Orthographic { right, top, .. } = ortho.projection else {
            panic!("expected orthographic");
        };
        assert_relative_eq!(right, top * 2.0, epsilon = 1e-4);
    }

    #[test]
    fn orthographic_to_perspective_uses_zoomed_height() {
        let target = Vec3::ZERO;
        let mut ortho = Camera::orthographic(-100.0, 100.0, 50.0, -50.0, 10.0, 1000.0);
        ortho.position = Vec3::new(0.0, 30.0, 40.0);
        ortho.set_zoom(2.0);
        ortho.look_at(target);
        let persp = convert_camera(&ortho, ProjectionKind::Perspective, target, 90.0, None);
        // height = 100 / 2 = 50; focus = 50 / (2·tan 45°) = 25
        assert_relative_eq!(persp.position.distance(target), 25.0, epsilon = 1e-3);
        let direction = persp.position.normalize();
        assert!(direction.abs_diff_eq(Vec3::new(0.0, 0.6, 0.8), 1e-5));
    }

    #[test]
    fn same_model_copies_fields() {
        let target = Vec3::ZERO;
        let mut source = Camera::orthographic(-80.0, 80.0, 40.0, -40.0, 1.0, 500.0);
        source.position = Vec3::new(1.0, 2.0, 3.0);
        source.set_zoom(3.0);
        source.look_at(target);
        let mut dest = Camera::orthographic(-1.0, 1.0, 1.0, -1.0, 10.0, 100.0);
        sync_camera(&source, &mut dest, target, Some(4.0));
        assert_eq!(dest.position, source.position);
        assert_eq!(dest.orientation, source.orientation);
        assert_eq!(dest.near, 1.0);
        assert_eq!(
            dest.projection,
            Projection::Orthographic {
                left: -80.0,
                right: 80.0,
                top: 20.0,
                bottom: -20.0,
                zoom: 3.0,
            }
        );
    }
}
