//! Viewer camera for the starfield scene

use glam::{Mat3, Mat4, Vec2, Vec3};

/// First-person perspective camera sitting at the viewer's eye.
///
/// Eye space follows the usual right-handed convention: +X right, +Y up,
/// looking down -Z.
#[derive(Debug, Clone)]
pub struct EyeCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl EyeCamera {
    pub fn new(position: Vec3, aspect_ratio: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov: 60.0f32.to_radians(),
            aspect_ratio,
            near: 0.01,
            far: 100.0,
        }
    }

    /// Unit look direction in world space
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Turn the view in place
    pub fn look(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-1.5, 1.5);
    }

    pub fn reset_view(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Rotation part of the view matrix (world -> eye)
    pub fn view_rotation(&self) -> Mat3 {
        Mat3::from_mat4(self.view_matrix())
    }

    /// Rotate an eye-space direction into world space
    pub fn eye_to_world(&self, v: Vec3) -> Vec3 {
        self.view_rotation().transpose() * v
    }

    /// World point under the cursor, `depth` units in front of the eye.
    /// `ndc` is in [-1, 1] with +Y up.
    pub fn cursor_point(&self, ndc: Vec2, depth: f32) -> Vec3 {
        let half_height = (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect_ratio;
        let dir = Vec3::new(ndc.x * half_width, ndc.y * half_height, -1.0);
        self.position + self.eye_to_world(dir * depth)
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// View-projection for geometry that travels with the eye
    pub overlay_view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_eye_camera(camera: &EyeCamera) -> Self {
        let view_proj = camera.view_projection();
        let overlay = view_proj * Mat4::from_translation(camera.position);
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            overlay_view_proj: overlay.to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_forward_maps_to_world_forward() {
        let mut camera = EyeCamera::new(Vec3::new(0.0, 0.0, 2.0), 1.5);
        camera.look(0.7, -0.3);

        let world = camera.eye_to_world(Vec3::NEG_Z);
        assert!((world - camera.forward()).length() < 1e-5);
    }

    #[test]
    fn view_rotation_is_orthonormal() {
        let mut camera = EyeCamera::new(Vec3::ZERO, 1.0);
        camera.look(-1.2, 0.4);

        let r = camera.view_rotation();
        let identity = r * r.transpose();
        assert!(identity.abs_diff_eq(Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn cursor_center_lies_straight_ahead() {
        let camera = EyeCamera::new(Vec3::new(1.0, 2.0, 3.0), 16.0 / 9.0);
        let p = camera.cursor_point(Vec2::ZERO, 2.0);
        assert!((p - (camera.position + camera.forward() * 2.0)).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = EyeCamera::new(Vec3::ZERO, 1.0);
        camera.look(0.0, 10.0);
        assert_eq!(camera.pitch, 1.5);
    }
}
