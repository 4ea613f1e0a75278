use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use crate::picking::ray::Ray;

/// Projection model discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    /// Perspective (frustum) projection.
    Perspective,
    /// Orthographic (box) projection.
    Orthographic,
}

/// Projection model with its model-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in degrees.
        fovy: f32,
        /// Viewport aspect ratio (width / height).
        aspect: f32,
        /// Zoom factor narrowing the effective field of view.
        zoom: f32,
    },
    /// Orthographic projection. Extents are in world units at `zoom = 1`.
    Orthographic {
        /// Left extent.
        left: f32,
        /// Right extent.
        right: f32,
        /// Top extent.
        top: f32,
        /// Bottom extent.
        bottom: f32,
        /// Zoom factor dividing the visible extents.
        zoom: f32,
    },
}

impl Projection {
    /// The discriminant of this projection.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        match self {
            Self::Perspective { .. } => ProjectionKind::Perspective,
            Self::Orthographic { .. } => ProjectionKind::Orthographic,
        }
    }
}

/// Camera with a pose (position, orientation, up) and a tagged projection.
///
/// The projection matrix is cached; call
/// [`update_projection_matrix`](Self::update_projection_matrix) after
/// editing [`projection`](Self::projection), `near` or `far`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Rotation from camera space (looking down -Z) to world space.
    pub orientation: Quat,
    /// Up hint used by [`look_at`](Self::look_at) and orbit controls.
    pub up: Vec3,
    /// Near clipping plane distance.
    pub near: f32,
    /// Far clipping plane distance.
    pub far: f32,
    /// Projection model.
    pub projection: Projection,
    projection_matrix: Mat4,
}

impl Camera {
    /// Perspective camera at the origin looking down -Z.
    #[must_use]
    pub fn perspective(fovy: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self::with_projection(
            Projection::Perspective {
                fovy,
                aspect,
                zoom: 1.0,
            },
            near,
            far,
        )
    }

    /// Orthographic camera at the origin looking down -Z.
    #[must_use]
    pub fn orthographic(
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    ) -> Self {
        Self::with_projection(
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                zoom: 1.0,
            },
            near,
            far,
        )
    }

    /// Camera with an explicit projection.
    #[must_use]
    pub fn with_projection(projection: Projection, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            up: Vec3::Y,
            near,
            far,
            projection,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    /// The projection discriminant.
    #[must_use]
    pub fn kind(&self) -> ProjectionKind {
        self.projection.kind()
    }

    /// True for orthographic cameras.
    #[must_use]
    pub fn is_orthographic(&self) -> bool {
        self.kind() == ProjectionKind::Orthographic
    }

    /// Zoom factor of either projection model.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        match self.projection {
            Projection::Perspective { zoom, .. }
            | Projection::Orthographic { zoom, .. } => zoom,
        }
    }

    /// Set the zoom factor of either projection model (projection matrix is
    /// left dirty).
    pub fn set_zoom(&mut self, value: f32) {
        match &mut self.projection {
            Projection::Perspective { zoom, .. }
            | Projection::Orthographic { zoom, .. } => *zoom = value,
        }
    }

    /// Vertical field of view in degrees after applying zoom; `None` for
    /// orthographic cameras.
    #[must_use]
    pub fn effective_fovy(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fovy, zoom, .. } => {
                let half = (fovy.to_radians() * 0.5).tan() / zoom.max(1e-6);
                Some((2.0 * half.atan()).to_degrees())
            }
            Projection::Orthographic { .. } => None,
        }
    }

    /// Rotate the camera so its -Z axis points at `target`, keeping `up`.
    pub fn look_at(&mut self, target: Vec3) {
        let mut z = self.position - target;
        if z.length_squared() == 0.0 {
            z = Vec3::Z;
        }
        z = z.normalize();
        let mut x = self.up.cross(z);
        if x.length_squared() == 0.0 {
            // up is parallel to the view direction: nudge z off-axis
            if self.up.z.abs() == 1.0 {
                z.x += 1e-4;
            } else {
                z.z += 1e-4;
            }
            z = z.normalize();
            x = self.up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);
        self.orientation = Quat::from_mat3(&Mat3::from_cols(x, y, z));
    }

    /// Direction the camera is looking along.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Camera-space +X in world space.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Camera-space +Y in world space.
    #[must_use]
    pub fn camera_up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// World-to-camera matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
            .inverse()
    }

    /// Cached projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    /// Recompute the cached projection matrix from the current parameters.
    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix = match self.projection {
            Projection::Perspective { aspect, .. } => {
                let fovy = self.effective_fovy().unwrap_or(50.0);
                // perspective_rh uses [0,1] depth range (wgpu convention)
                Mat4::perspective_rh(
                    fovy.to_radians(),
                    aspect.max(1e-6),
                    self.near,
                    self.far,
                )
            }
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                zoom,
            } => {
                let zoom = zoom.max(1e-6);
                let dx = (right - left) / (2.0 * zoom);
                let dy = (top - bottom) / (2.0 * zoom);
                let cx = (right + left) * 0.5;
                let cy = (top + bottom) * 0.5;
                Mat4::orthographic_rh(
                    cx - dx,
                    cx + dx,
                    cy - dy,
                    cy + dy,
                    self.near,
                    self.far,
                )
            }
        };
    }

    /// World-space ray through a normalized device coordinate
    /// (`x`, `y` in `[-1, 1]`, +Y up).
    ///
    /// Perspective rays start at the eye. Orthographic rays start on the
    /// camera plane, so hit distances are measured from the camera in both
    /// models.
    #[must_use]
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        match self.projection {
            Projection::Perspective { .. } => {
                let point = inverse.project_point3(ndc.extend(0.5));
                Ray::new(self.position, point - self.position)
            }
            Projection::Orthographic { .. } => {
                let direction = self.forward();
                let on_near = inverse.project_point3(ndc.extend(0.0));
                Ray::new(on_near - direction * self.near, direction)
            }
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// 1.0 for orthographic cameras, 0.0 for perspective.
    pub orthographic: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            orthographic: 0.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.view_projection().to_cols_array_2d();
        self.position = camera.position.to_array();
        self.orthographic = if camera.is_orthographic() { 1.0 } else { 0.0 };
    }
}
