//! The mesh viewer core
//!
//! [`MeshViewer`] builds the scene once from a [`ViewerConfig`]: orbit camera,
//! lights, axes and the generated cylinder with both of its materials. It then
//! only reacts to `update(delta_time)` and `set_wireframe(bool)`. Nothing here
//! touches the GPU, so the whole core runs in plain unit tests.

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::gfx::camera::CameraManager;
use crate::gfx::geometry::{generate_axes, generate_cylinder, GeometryData};
use crate::gfx::resources::{LightConfig, Material, MaterialStyle};
use crate::gfx::scene::Scene;
use crate::ui::ViewerSettings;

pub const SHADED_MATERIAL: &str = "shaded";
pub const WIREFRAME_MATERIAL: &str = "wireframe";
pub const AXES_MATERIAL: &str = "axes";

pub const CYLINDER_OBJECT: &str = "cylinder";
pub const AXES_OBJECT: &str = "axes";

/// The wireframe flag and the material it selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WireframeToggle {
    enabled: bool,
    swaps: u32,
}

impl WireframeToggle {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, swaps: 0 }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Number of times the material has actually been swapped
    pub fn swap_count(&self) -> u32 {
        self.swaps
    }

    /// Material the cylinder should use for the current flag
    pub fn material(&self) -> &'static str {
        if self.enabled {
            WIREFRAME_MATERIAL
        } else {
            SHADED_MATERIAL
        }
    }

    /// Sets the flag; returns the material to switch to, or `None` when the
    /// flag already had this value
    pub fn set(&mut self, enabled: bool) -> Option<&'static str> {
        if self.enabled == enabled {
            return None;
        }
        self.enabled = enabled;
        self.swaps += 1;
        Some(self.material())
    }
}

pub struct MeshViewer {
    scene: Scene,
    geometry: GeometryData,
    cylinder_index: usize,
    toggle: WireframeToggle,
}

impl MeshViewer {
    /// Builds the complete scene described by `config`
    ///
    /// # Errors
    /// Returns an error when the configuration is invalid, e.g. fewer than
    /// three segments or a non-positive height.
    pub fn new(config: &ViewerConfig) -> Result<Self, ViewerError> {
        config.validate()?;

        let geometry = generate_cylinder(config.cylinder.segments, config.cylinder.height);
        geometry.validate()?;

        let mut scene = Scene::new(CameraManager::from_config(&config.camera));
        scene.lighting = LightConfig::from(config.lighting);
        scene.background = config.background;

        let mut shaded = Material::new(SHADED_MATERIAL, MaterialStyle::Gouraud);
        if let Some(texture) = &config.texture {
            shaded = shaded.with_texture(texture.path.clone(), texture.wrap);
        }
        scene.add_material(shaded);
        scene.add_material(Material::new(WIREFRAME_MATERIAL, MaterialStyle::Wireframe));
        scene.add_material(Material::new(AXES_MATERIAL, MaterialStyle::UnlitLines));

        scene.add_geometry_object(AXES_OBJECT, &generate_axes(config.axes_length), AXES_MATERIAL);

        let toggle = WireframeToggle::new(config.start_in_wireframe);
        let cylinder_index = scene.add_geometry_object(CYLINDER_OBJECT, &geometry, toggle.material());

        log::info!(
            "Built cylinder with {} segments, height {}: {}",
            config.cylinder.segments,
            config.cylinder.height,
            scene.get_statistics()
        );

        Ok(Self {
            scene,
            geometry,
            cylinder_index,
            toggle,
        })
    }

    /// Advances the viewer by one frame of `delta_time` seconds
    pub fn update(&mut self, delta_time: f32) {
        self.scene.update(delta_time);
    }

    /// Switches the cylinder between the shaded and wireframe materials
    ///
    /// Returns true when the material was swapped; setting the current value
    /// again changes nothing.
    pub fn set_wireframe(&mut self, enabled: bool) -> bool {
        let Some(material) = self.toggle.set(enabled) else {
            return false;
        };
        self.scene
            .assign_material_to_object(self.cylinder_index, material);
        log::info!(
            "Wireframe {}",
            if enabled { "enabled" } else { "disabled" }
        );
        true
    }

    pub fn is_wireframe(&self) -> bool {
        self.toggle.is_enabled()
    }

    pub fn toggle(&self) -> &WireframeToggle {
        &self.toggle
    }

    /// Current values for the settings panel
    pub fn settings(&self) -> ViewerSettings {
        ViewerSettings {
            wireframe: self.toggle.is_enabled(),
        }
    }

    /// The generated cylinder, exactly as produced at start-up
    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    /// Material currently assigned to the cylinder
    pub fn cylinder_material(&self) -> Option<&str> {
        self.scene
            .get_object(self.cylinder_index)
            .and_then(|object| object.get_material_id())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TextureWrap;
    use crate::error::{ConfigError, GeometryError};
    use winit::event::{DeviceEvent, ElementState, MouseButton};

    fn viewer() -> MeshViewer {
        MeshViewer::new(&ViewerConfig::default()).unwrap()
    }

    #[test]
    fn test_default_scene() {
        let viewer = viewer();
        assert_eq!(viewer.geometry().vertex_count(), 86);
        assert_eq!(viewer.geometry().triangle_count(), 80);
        assert_eq!(viewer.cylinder_material(), Some(SHADED_MATERIAL));
        assert!(!viewer.is_wireframe());

        let scene = viewer.scene();
        assert_eq!(scene.get_object_names(), vec![AXES_OBJECT, CYLINDER_OBJECT]);
        assert_eq!(scene.background, [0.0, 0.0, 0.0]);
        assert_eq!(scene.lighting.ambient_color, [0.25, 0.25, 0.25]);
        assert_eq!(scene.lighting.position, [-2.0, 1.0, 0.0]);

        let axes = scene.get_object(scene.find_object(AXES_OBJECT).unwrap()).unwrap();
        assert_eq!(
            scene.get_material_for_object(axes).style,
            MaterialStyle::UnlitLines
        );
    }

    #[test]
    fn test_toggle_round_trip_swaps_twice_and_keeps_geometry() {
        let mut viewer = viewer();
        let before = viewer.geometry().clone();

        assert!(viewer.set_wireframe(true));
        assert_eq!(viewer.cylinder_material(), Some(WIREFRAME_MATERIAL));
        assert!(viewer.set_wireframe(false));
        assert_eq!(viewer.cylinder_material(), Some(SHADED_MATERIAL));

        assert_eq!(viewer.toggle().swap_count(), 2);
        assert_eq!(viewer.geometry(), &before);
    }

    #[test]
    fn test_setting_same_value_is_noop() {
        let mut viewer = viewer();
        assert!(!viewer.set_wireframe(false));
        assert_eq!(viewer.toggle().swap_count(), 0);

        viewer.set_wireframe(true);
        assert!(!viewer.set_wireframe(true));
        assert_eq!(viewer.toggle().swap_count(), 1);
        assert!(viewer.settings().wireframe);
    }

    #[test]
    fn test_wireframe_material_draws_lines() {
        let mut viewer = viewer();
        viewer.set_wireframe(true);
        let scene = viewer.scene();
        let cylinder = scene.get_object(scene.find_object(CYLINDER_OBJECT).unwrap()).unwrap();
        assert_eq!(
            scene.get_material_for_object(cylinder).style,
            MaterialStyle::Wireframe
        );
        assert_eq!(cylinder.mesh.line_count(), 8 * 20 + 3);
    }

    #[test]
    fn test_can_start_in_wireframe() {
        let viewer = MeshViewer::new(&ViewerConfig::default().with_wireframe(true)).unwrap();
        assert!(viewer.is_wireframe());
        assert_eq!(viewer.cylinder_material(), Some(WIREFRAME_MATERIAL));
        assert_eq!(viewer.toggle().swap_count(), 0);
    }

    #[test]
    fn test_texture_goes_on_the_shaded_material() {
        let config = ViewerConfig::default().with_texture("checker.png", TextureWrap::ClampToEdge);
        let viewer = MeshViewer::new(&config).unwrap();
        let materials = &viewer.scene().material_manager;

        let shaded = materials.get_material(SHADED_MATERIAL).unwrap();
        assert_eq!(shaded.texture.as_ref().map(|t| t.wrap), Some(TextureWrap::ClampToEdge));
        assert!(materials
            .get_material(WIREFRAME_MATERIAL)
            .unwrap()
            .texture
            .is_none());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = MeshViewer::new(&ViewerConfig::default().with_cylinder(2, 3.0));
        assert!(matches!(
            result,
            Err(ViewerError::Config(ConfigError::Geometry(
                GeometryError::TooFewSegments(2)
            )))
        ));
    }

    #[test]
    fn test_update_applies_camera_input() {
        let mut viewer = viewer();
        let eye = viewer.scene().camera_manager.camera.eye;

        let camera = &mut viewer.scene_mut().camera_manager;
        camera.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        camera.process_event(&DeviceEvent::MouseMotion { delta: (40.0, 0.0) });
        assert_eq!(viewer.scene().camera_manager.camera.eye, eye);

        viewer.update(1.0 / 60.0);
        assert_ne!(viewer.scene().camera_manager.camera.eye, eye);
    }
}
