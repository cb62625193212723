use cgmath::{Matrix4, SquareMatrix};
use winit::{
    event::{DeviceEvent, ElementState, MouseButton},
    keyboard::KeyCode,
};

use super::{camera_controller::CameraController, orbit_camera::OrbitCamera};
use crate::config::CameraConfig;

pub struct CameraManager {
    pub camera: OrbitCamera,
    pub controller: CameraController,
}

impl CameraManager {
    pub fn new(camera: OrbitCamera, controller: CameraController) -> Self {
        Self { camera, controller }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            OrbitCamera::from_config(config),
            CameraController::from_config(config),
        )
    }

    pub fn process_event(&mut self, event: &DeviceEvent) -> bool {
        self.controller.process_event(event)
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        self.controller.process_mouse_button(button, state);
    }

    pub fn process_key(&mut self, key: KeyCode, state: ElementState) {
        self.controller.process_key(key, state);
    }

    /// Applies pending input and refreshes the camera uniform
    pub fn update(&mut self, delta_time: f32) {
        self.controller.update(&mut self.camera, delta_time);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize_projection(width, height);
        self.camera.update_view_proj();
    }

    pub fn uniform(&self) -> CameraUniform {
        self.camera.uniform
    }

    /// Get the view projection matrix from the camera
    pub fn get_view_proj_matrix(&self) -> Matrix4<f32> {
        self.camera.build_view_projection_matrix()
    }
}

pub trait Camera: Sized {
    fn build_view_projection_matrix(&self) -> Matrix4<f32>;
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq)]
pub struct CameraUniform {
    /// The eye position of the camera in homogenous coordinates.
    ///
    /// Homogenous coordinates are used to fullfill the 16 byte alignment requirement.
    pub view_position: [f32; 4],

    /// Contains the view projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    matrix4.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_tracks_camera_after_update() {
        let mut manager = CameraManager::from_config(&CameraConfig::default());
        let before = manager.uniform();

        manager.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        manager.process_event(&DeviceEvent::MouseMotion { delta: (50.0, 0.0) });
        assert_eq!(manager.uniform(), before);

        manager.update(0.016);
        assert_ne!(manager.uniform(), before);
        let eye = manager.camera.eye;
        assert_eq!(manager.uniform().view_position, [eye.x, eye.y, eye.z, 1.0]);
    }

    #[test]
    fn test_matrix_conversion_is_column_major() {
        let m = Matrix4::from_translation(cgmath::Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(convert_matrix4_to_array(m)[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
