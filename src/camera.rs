use nalgebra::{Matrix4, UnitQuaternion, Vector3};

/// Zoom steps are counted in wheel units of 120 per notch.
pub(crate) const ZOOM_STEP: f32 = 120.0;
const MIN_DISTANCE_EXPONENT: f32 = -8.0 * ZOOM_STEP;
const MAX_DISTANCE_EXPONENT: f32 = 10.0 * ZOOM_STEP;
pub(crate) const DEFAULT_DISTANCE_EXPONENT: f32 = 5.0 * ZOOM_STEP;

/// Viewer looking down -Z at the origin, turned by a trackball.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Camera {
    pub(crate) rotation: UnitQuaternion<f32>,
    pub(crate) distance: f32,
}

impl Camera {
    /// Rotates the world, then pushes it `distance` away from the eye.
    pub(crate) fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(0.0, 0.0, -self.distance))
            * self.rotation.to_homogeneous()
    }
}

/// Clamps a zoom exponent to the supported range.
pub(crate) fn clamp_distance_exponent(exponent: f32) -> f32 {
    exponent.clamp(MIN_DISTANCE_EXPONENT, MAX_DISTANCE_EXPONENT)
}

/// Eye distance for a zoom exponent; grows exponentially so each wheel notch
/// feels the same at any distance.
pub(crate) fn distance_for_exponent(exponent: f32) -> f32 {
    2.0 * (exponent / (10.0 * ZOOM_STEP)).exp()
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Projection {
    pub(crate) aspect: f32,
    /// Vertical field of view in radians.
    pub(crate) fovy: f32,
    pub(crate) znear: f32,
    pub(crate) zfar: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 800.0 / 600.0,
            fovy: std::f32::consts::FRAC_PI_3,
            znear: 0.01,
            zfar: 15.0,
        }
    }
}

impl Projection {
    /// Perspective matrix mapping depth into wgpu's `[0, 1]` clip range.
    pub(crate) fn build_projection_matrix(&self) -> Matrix4<f32> {
        opengl_to_wgpu() * Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar)
    }
}

#[rustfmt::skip]
fn opengl_to_wgpu() -> Matrix4<f32> {
    Matrix4::new(
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 0.5, 0.5,
        0.0, 0.0, 0.0, 1.0,
    )
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct CameraUniform {
    pub(crate) view_proj: [[f32; 4]; 4],
    /// World to eye space, used for head-light shading.
    pub(crate) view: [[f32; 4]; 4],
}

impl CameraUniform {
    pub(crate) fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
            view: Matrix4::identity().into(),
        }
    }

    pub(crate) fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        let view = camera.build_view_matrix();
        self.view_proj = (projection.build_projection_matrix() * view).into();
        self.view = view.into();
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point3, Vector4};

    use super::*;

    #[test]
    fn view_pushes_origin_back_by_distance() {
        let camera = Camera {
            rotation: UnitQuaternion::from_euler_angles(0.2, 0.9, -0.4),
            distance: 3.0,
        };
        let eye_space = camera.build_view_matrix().transform_point(&Point3::origin());
        assert!((eye_space - Point3::new(0.0, 0.0, -3.0)).norm() < 1.0e-6);
    }

    #[test]
    fn view_applies_rotation_before_translation() {
        let camera = Camera {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::FRAC_PI_2),
            distance: 2.0,
        };
        let eye_space = camera.build_view_matrix().transform_point(&Point3::new(0.0, 0.0, 1.0));
        assert!((eye_space - Point3::new(1.0, 0.0, -2.0)).norm() < 1.0e-5);
    }

    #[test]
    fn projection_depth_lands_in_unit_range() {
        let projection = Projection::default();
        let matrix = projection.build_projection_matrix();
        for z in [-projection.znear, -projection.zfar] {
            let clip = matrix * Vector4::new(0.0, 0.0, z, 1.0);
            let depth = clip.z / clip.w;
            assert!((-1.0e-4..=1.0 + 1.0e-4).contains(&depth), "depth {depth}");
        }
    }

    #[test]
    fn distance_exponent_clamps_and_scales() {
        assert_eq!(clamp_distance_exponent(5000.0), MAX_DISTANCE_EXPONENT);
        assert_eq!(clamp_distance_exponent(-5000.0), MIN_DISTANCE_EXPONENT);
        assert_eq!(distance_for_exponent(0.0), 2.0);
        assert!(distance_for_exponent(DEFAULT_DISTANCE_EXPONENT) > 2.0);
    }
}
