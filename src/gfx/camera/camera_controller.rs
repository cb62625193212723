use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta},
    keyboard::KeyCode,
};

use super::orbit_camera::OrbitCamera;
use crate::config::CameraConfig;

/// Turns raw mouse and keyboard input into orbit camera motion
///
/// Events only accumulate into pending deltas; nothing touches the camera
/// until [`CameraController::update`] runs once per frame.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Yaw added per second regardless of input
    pub auto_rotate_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
    pending_rotate: (f32, f32),
    pending_pan: (f32, f32),
    pending_zoom: f32,
    reset_requested: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            auto_rotate_speed: 0.0,
            is_shift_held: false,
            is_mouse_pressed: false,
            pending_rotate: (0.0, 0.0),
            pending_pan: (0.0, 0.0),
            pending_zoom: 0.0,
            reset_requested: false,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        let mut controller = Self::new(config.rotate_speed, config.zoom_speed);
        controller.pan_speed = config.pan_speed;
        controller.auto_rotate_speed = config.auto_rotate_speed;
        controller
    }

    /// Records raw mouse motion and wheel input. Returns true when the
    /// event will move the camera.
    pub fn process_event(&mut self, event: &DeviceEvent) -> bool {
        match event {
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                self.pending_zoom += scroll_amount * self.zoom_speed;
                true
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                let (dx, dy) = (delta.0 as f32, delta.1 as f32);
                if self.is_shift_held {
                    self.pending_pan.0 -= dx * self.pan_speed;
                    self.pending_pan.1 += dy * self.pan_speed;
                } else {
                    self.pending_rotate.0 -= dx * self.rotate_speed;
                    self.pending_rotate.1 += dy * self.rotate_speed;
                }
                true
            }
            _ => false,
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.is_mouse_pressed = state == ElementState::Pressed;
        }
    }

    /// Tracks Shift and queues a reset on Shift+C
    pub fn process_key(&mut self, key: KeyCode, state: ElementState) {
        match (key, state) {
            (KeyCode::ShiftLeft | KeyCode::ShiftRight, state) => {
                self.is_shift_held = state == ElementState::Pressed;
            }
            (KeyCode::KeyC, ElementState::Pressed) if self.is_shift_held => {
                log::info!("Resetting camera to default view");
                self.reset_requested = true;
            }
            _ => (),
        }
    }

    /// Drops any held button or modifier, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.is_mouse_pressed = false;
        self.is_shift_held = false;
    }

    /// Applies the input gathered since the last frame plus auto-rotation
    pub fn update(&mut self, camera: &mut OrbitCamera, delta_time: f32) {
        if std::mem::take(&mut self.reset_requested) {
            camera.reset_to_default();
            self.clear_pending();
        }

        let (yaw, pitch) = std::mem::take(&mut self.pending_rotate);
        let pan = std::mem::take(&mut self.pending_pan);
        let zoom = std::mem::take(&mut self.pending_zoom);

        let yaw = yaw + self.auto_rotate_speed * delta_time.max(0.0);
        if yaw != 0.0 {
            camera.add_yaw(yaw);
        }
        if pitch != 0.0 {
            camera.add_pitch(pitch);
        }
        if pan != (0.0, 0.0) {
            camera.pan(pan);
        }
        if zoom != 0.0 {
            camera.add_distance(zoom);
        }

        camera.update_view_proj();
    }

    fn clear_pending(&mut self) {
        self.pending_rotate = (0.0, 0.0);
        self.pending_pan = (0.0, 0.0);
        self.pending_zoom = 0.0;
    }

    pub fn has_pending_input(&self) -> bool {
        self.reset_requested
            || self.pending_rotate != (0.0, 0.0)
            || self.pending_pan != (0.0, 0.0)
            || self.pending_zoom != 0.0
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CameraController, OrbitCamera) {
        let config = CameraConfig::default();
        (
            CameraController::from_config(&config),
            OrbitCamera::from_config(&config),
        )
    }

    fn motion(dx: f64, dy: f64) -> DeviceEvent {
        DeviceEvent::MouseMotion { delta: (dx, dy) }
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let (mut controller, _) = setup();
        assert!(!controller.process_event(&motion(10.0, 5.0)));
        assert!(!controller.has_pending_input());
    }

    #[test]
    fn test_input_is_applied_only_on_update() {
        let (mut controller, mut camera) = setup();
        let yaw = camera.yaw;

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_rotating());
        assert!(controller.process_event(&motion(20.0, 0.0)));
        assert!(controller.process_event(&motion(20.0, 0.0)));
        assert_eq!(camera.yaw, yaw);

        controller.update(&mut camera, 0.016);
        assert!((camera.yaw - (yaw - 40.0 * 0.005)).abs() < 1e-6);
        assert!(!controller.has_pending_input());

        // Nothing left to apply
        let after = camera.yaw;
        controller.update(&mut camera, 0.016);
        assert_eq!(camera.yaw, after);
    }

    #[test]
    fn test_shift_drag_pans() {
        let (mut controller, mut camera) = setup();
        controller.process_key(KeyCode::ShiftLeft, ElementState::Pressed);
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_panning());

        controller.process_event(&motion(30.0, -10.0));
        let yaw = camera.yaw;
        controller.update(&mut camera, 0.016);
        assert_eq!(camera.yaw, yaw);
        assert!(camera.target.x != 0.0 || camera.target.z != 0.0);
    }

    #[test]
    fn test_wheel_zooms_within_bounds() {
        let (mut controller, mut camera) = setup();
        for _ in 0..200 {
            controller.process_event(&DeviceEvent::MouseWheel {
                delta: MouseScrollDelta::LineDelta(0.0, -1.0),
            });
        }
        controller.update(&mut camera, 0.016);
        assert_eq!(camera.distance, 9.0);
    }

    #[test]
    fn test_shift_c_resets_view() {
        let (mut controller, mut camera) = setup();
        let home_eye = camera.eye;
        camera.add_yaw(1.2);

        controller.process_key(KeyCode::KeyC, ElementState::Pressed);
        controller.update(&mut camera, 0.0);
        assert!((camera.eye - home_eye).x.abs() > 1e-3);

        controller.process_key(KeyCode::ShiftRight, ElementState::Pressed);
        controller.process_key(KeyCode::KeyC, ElementState::Pressed);
        controller.update(&mut camera, 0.0);
        assert!((camera.eye.x - home_eye.x).abs() < 1e-6);
        assert!((camera.eye.z - home_eye.z).abs() < 1e-6);
    }

    #[test]
    fn test_auto_rotation_scales_with_delta_time() {
        let (mut controller, mut camera) = setup();
        controller.auto_rotate_speed = 0.5;
        let yaw = camera.yaw;
        controller.update(&mut camera, 2.0);
        assert!((camera.yaw - (yaw + 1.0)).abs() < 1e-6);
    }

    #[test]
    fn test_release_all_stops_dragging() {
        let (mut controller, _) = setup();
        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        controller.release_all();
        assert!(!controller.process_event(&motion(5.0, 5.0)));
    }
}
