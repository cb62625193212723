use wgpu::Device;

use crate::gfx::{
    camera::camera_utils::CameraManager,
    geometry::GeometryData,
    resources::{
        global_bindings::LightConfig,
        material::{Material, MaterialManager},
    },
    scene::object::{Mesh, Object},
};
use crate::wgpu_utils::binding_builder::BindGroupLayoutWithDesc;

/// Main scene containing objects, materials, lighting and camera
pub struct Scene {
    pub camera_manager: CameraManager,
    pub objects: Vec<Object>,
    pub material_manager: MaterialManager,
    pub lighting: LightConfig,
    pub background: [f32; 3],
}

impl Scene {
    /// Creates a new, empty scene with the given camera manager
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            objects: Vec::new(),
            material_manager: MaterialManager::new(),
            lighting: LightConfig::default(),
            background: [0.0, 0.0, 0.0],
        }
    }

    /// Advances the camera by one frame
    pub fn update(&mut self, delta_time: f32) {
        self.camera_manager.update(delta_time);
    }

    /// Adds an object built from generated geometry and returns its index
    ///
    /// The name is made unique within the scene.
    pub fn add_geometry_object(
        &mut self,
        name: &str,
        geometry: &GeometryData,
        material_id: &str,
    ) -> usize {
        let name = self.ensure_unique_name(name);
        let mut object = Object::new(&name, Mesh::from_geometry(geometry));
        object.set_material(material_id);
        self.objects.push(object);
        self.objects.len() - 1
    }

    pub fn add_material(&mut self, material: Material) {
        self.material_manager.add_material(material);
    }

    /// Initializes GPU resources for all objects and materials
    ///
    /// Must be called after the GPU context is available and before rendering.
    pub fn init_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        transform_layout: &BindGroupLayoutWithDesc,
        material_layout: &BindGroupLayoutWithDesc,
    ) {
        for object in self.objects.iter_mut() {
            if object.gpu_resources.is_none() {
                object.init_gpu_resources(device, transform_layout);
            }
        }

        self.material_manager
            .update_all_gpu_resources(device, queue, material_layout);
    }

    /// Gets material for rendering an object
    ///
    /// Returns the material assigned to the object, or the default material
    /// if no material is assigned or the assigned material doesn't exist.
    pub fn get_material_for_object(&self, object: &Object) -> &Material {
        self.material_manager
            .get_material_for_object(object.get_material_id())
    }

    /// Gets all object names for UI display
    pub fn get_object_names(&self) -> Vec<String> {
        self.objects.iter().map(|obj| obj.name.clone()).collect()
    }

    pub fn get_object(&self, index: usize) -> Option<&Object> {
        self.objects.get(index)
    }

    pub fn find_object(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|obj| obj.name == name)
    }

    /// Assigns a material to an object by index
    ///
    /// Returns false when there is no such object.
    pub fn assign_material_to_object(&mut self, object_index: usize, material_id: &str) -> bool {
        match self.objects.get_mut(object_index) {
            Some(object) => {
                object.set_material(material_id);
                true
            }
            None => false,
        }
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        SceneStatistics {
            object_count: self.objects.len(),
            material_count: self.material_manager.len(),
            total_triangles: self.objects.iter().map(|o| o.mesh.triangle_count()).sum(),
            total_vertices: self.objects.iter().map(|o| o.mesh.vertex_count()).sum(),
            total_lines: self.objects.iter().map(|o| o.mesh.line_count()).sum(),
        }
    }

    pub fn ensure_unique_name(&self, desired_name: &str) -> String {
        let mut counter = 0;
        let mut test_name = desired_name.to_string();

        while self.objects.iter().any(|obj| obj.name == test_name) {
            counter += 1;
            test_name = format!("{} ({})", desired_name, counter);
        }

        test_name
    }
}

/// Scene statistics for logging and UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub material_count: usize,
    pub total_triangles: u32,
    pub total_vertices: u32,
    pub total_lines: u32,
}

impl std::fmt::Display for SceneStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} objects, {} materials, {} vertices, {} triangles, {} lines",
            self.object_count,
            self.material_count,
            self.total_vertices,
            self.total_triangles,
            self.total_lines
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::gfx::geometry::{generate_axes, generate_cylinder};
    use crate::gfx::resources::material::MaterialStyle;

    fn scene() -> Scene {
        Scene::new(CameraManager::from_config(&CameraConfig::default()))
    }

    #[test]
    fn test_statistics_count_every_object() {
        let mut scene = scene();
        scene.add_material(Material::new("shaded", MaterialStyle::Gouraud));
        scene.add_geometry_object("axes", &generate_axes(4.0), "axes");
        scene.add_geometry_object("cylinder", &generate_cylinder(20, 3.0), "shaded");

        let stats = scene.get_statistics();
        assert_eq!(stats.object_count, 2);
        assert_eq!(stats.material_count, 1);
        assert_eq!(stats.total_vertices, 6 + 86);
        assert_eq!(stats.total_triangles, 80);
        assert_eq!(stats.total_lines, 3 + 163);
    }

    #[test]
    fn test_names_are_made_unique() {
        let mut scene = scene();
        let geometry = generate_cylinder(3, 1.0);
        scene.add_geometry_object("cylinder", &geometry, "shaded");
        scene.add_geometry_object("cylinder", &geometry, "shaded");
        assert_eq!(scene.get_object_names(), vec!["cylinder", "cylinder (1)"]);
        assert_eq!(scene.find_object("cylinder (1)"), Some(1));
    }

    #[test]
    fn test_material_reassignment() {
        let mut scene = scene();
        scene.add_material(Material::new("wireframe", MaterialStyle::Wireframe));
        let index = scene.add_geometry_object("cylinder", &generate_cylinder(3, 1.0), "shaded");

        // "shaded" is not registered, so the default stands in
        let object = scene.get_object(index).unwrap();
        assert_eq!(scene.get_material_for_object(object).style, MaterialStyle::Gouraud);

        assert!(scene.assign_material_to_object(index, "wireframe"));
        let object = scene.get_object(index).unwrap();
        assert_eq!(scene.get_material_for_object(object).style, MaterialStyle::Wireframe);
        assert!(!scene.assign_material_to_object(7, "wireframe"));
    }
}
