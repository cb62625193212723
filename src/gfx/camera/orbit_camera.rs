use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};
use crate::config::CameraConfig;
use cgmath::*;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// View the camera returns to on reset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitView {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub target: Vector3<f32>,
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
    home: OrbitView,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // Derived from the spherical coordinates in `update()`
            target,
            up: Vector3::unit_y(),
            bounds: OrbitCameraBounds::default(),
            aspect,
            fovy: Rad(std::f32::consts::FRAC_PI_3),
            znear: 0.1,
            zfar: 10.0,
            uniform: CameraUniform::default(),
            home: OrbitView {
                distance,
                pitch,
                yaw,
                target,
            },
        };
        camera.update();
        camera.update_view_proj();
        camera
    }

    /// Perspective orbit camera around the origin
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::new(
            config.distance,
            config.pitch,
            config.yaw,
            Vector3::zero(),
            config.aspect,
        );
        camera.fovy = Deg(config.fov_y_degrees).into();
        camera.znear = config.znear;
        camera.zfar = config.zfar;
        camera.bounds.min_distance = Some(config.min_distance);
        camera.bounds.max_distance = Some(config.max_distance);
        camera.update_view_proj();
        camera
    }

    pub fn home(&self) -> OrbitView {
        self.home
    }

    pub fn reset_to_default(&mut self) {
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.target = self.home.target;
        self.update();
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(
            self.bounds.min_distance.unwrap_or(f32::EPSILON),
            self.bounds.max_distance.unwrap_or(f32::MAX),
        );
        self.update();
    }

    /// Zoom scaled by the current distance so steps feel even at any range
    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.0 + f32::EPSILON)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        let mut bounded_yaw = yaw;
        if let Some(min_yaw) = self.bounds.min_yaw {
            bounded_yaw = bounded_yaw.max(min_yaw);
        }
        if let Some(max_yaw) = self.bounds.max_yaw {
            bounded_yaw = bounded_yaw.min(max_yaw);
        }
        self.yaw = bounded_yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Pans the focus point relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, delta: (f32, f32)) {
        let forward = (self.target - self.eye).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance * 0.1;

        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;
        self.target += movement;
        self.update();
    }

    /// Recomputes the eye after changing `distance`, `pitch`, `yaw` or `target`.
    fn update(&mut self) {
        self.eye =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: Option<f32>,
    pub max_distance: Option<f32>,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_yaw: Option<f32>,
    pub max_yaw: Option<f32>,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        // Kept shy of the poles so the view never aligns with `up`
        let pitch_limit = std::f32::consts::FRAC_PI_2 - 0.01;
        Self {
            min_distance: None,
            max_distance: Some(16.0),
            min_pitch: -pitch_limit,
            max_pitch: pitch_limit,
            min_yaw: None,
            max_yaw: None,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::from_config(&CameraConfig::default())
    }

    #[test]
    fn test_eye_sits_at_orbit_distance() {
        let camera = camera();
        assert!((camera.eye.magnitude() - 5.0).abs() < 1e-5);
        assert_eq!(camera.up, Vector3::unit_y());
        assert!((camera.fovy.0 - std::f32::consts::FRAC_PI_3).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_is_clamped_short_of_the_poles() {
        let mut camera = camera();
        camera.add_pitch(10.0);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);
        camera.add_pitch(-20.0);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);

        let vp = camera.build_view_projection_matrix();
        assert!(vp.x.x.is_finite() && vp.w.w.is_finite());
    }

    #[test]
    fn test_distance_respects_bounds() {
        let mut camera = camera();
        camera.set_distance(100.0);
        assert_eq!(camera.distance, 9.0);
        camera.set_distance(0.0);
        assert_eq!(camera.distance, 1.5);
    }

    #[test]
    fn test_pan_moves_target_and_keeps_offset() {
        let mut camera = camera();
        let offset = camera.eye - camera.target;
        camera.pan((1.0, 0.5));
        assert!(camera.target.magnitude() > 0.0);
        assert!((camera.eye - camera.target - offset).magnitude() < 1e-5);
    }

    #[test]
    fn test_reset_restores_home_view() {
        let mut camera = camera();
        let home_eye = camera.eye;
        camera.add_yaw(1.0);
        camera.add_pitch(0.3);
        camera.pan((2.0, 2.0));
        camera.set_distance(8.0);

        camera.reset_to_default();
        assert!((camera.eye - home_eye).magnitude() < 1e-6);
        assert_eq!(camera.target, Vector3::zero());
    }

    #[test]
    fn test_resize_ignores_zero_extent() {
        let mut camera = camera();
        camera.resize_projection(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.resize_projection(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
