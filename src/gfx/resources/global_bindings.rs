//! Global uniform bindings for camera and scene data
//!
//! Manages the uniform buffer and bind group holding per-frame state shared by
//! every object in the scene: camera matrices and the ambient plus directional
//! lighting.

use crate::{
    config::LightingConfig,
    gfx::camera::camera_utils::CameraUniform,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    view_position: [f32; 4],  // Camera position (homogeneous coordinates)
    view_proj: [[f32; 4]; 4], // Camera view-projection matrix

    ambient_color: [f32; 4],
    light_direction: [f32; 4], // Unit vector from the surface toward the light
    light_color: [f32; 4],
}
// Total: 16 + 64 + 16 + 16 + 16 = 128 bytes

/// Ambient and directional light as seen by the shaders
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LightConfig {
    pub ambient_color: [f32; 3],
    /// Position the directional light shines from, toward the origin
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        LightingConfig::default().into()
    }
}

impl From<LightingConfig> for LightConfig {
    fn from(lighting: LightingConfig) -> Self {
        Self {
            ambient_color: lighting.ambient_color,
            position: lighting.directional_position,
            color: lighting.directional_color,
        }
    }
}

impl LightConfig {
    /// Normalized direction from any surface point toward the light
    pub fn direction_to_light(&self) -> [f32; 3] {
        let [x, y, z] = self.position;
        let length = (x * x + y * y + z * z).sqrt();
        if length > f32::EPSILON {
            [x / length, y / length, z / length]
        } else {
            [0.0, 1.0, 0.0]
        }
    }
}

impl GlobalUBOContent {
    pub fn new(camera: CameraUniform, light: &LightConfig) -> Self {
        let [dx, dy, dz] = light.direction_to_light();
        let [ar, ag, ab] = light.ambient_color;
        let [lr, lg, lb] = light.color;
        Self {
            view_position: camera.view_position,
            view_proj: camera.view_proj,
            ambient_color: [ar, ag, ab, 1.0],
            light_direction: [dx, dy, dz, 0.0],
            light_color: [lr, lg, lb, 1.0],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light data
///
/// Called every frame; unchanged content is not re-uploaded.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: &LightConfig,
) {
    ubo.update_content(queue, GlobalUBOContent::new(camera, light));
}

/// Manages bind group layouts and bind groups for global uniforms
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    /// Creates the layout and the bind group for `ubo`
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform())
            .create(device, "Globals Bind Group Layout");

        let bind_group = BindGroupBuilder::new(&bind_group_layout)
            .resource(ubo.binding_resource())
            .create(device, "Globals Bind Group");

        GlobalBindings {
            bind_group_layout,
            bind_group,
        }
    }

    /// Used when creating render pipelines that need access to global uniforms.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_size_matches_shader_struct() {
        assert_eq!(std::mem::size_of::<GlobalUBOContent>(), 128);
    }

    #[test]
    fn test_light_direction_is_normalized() {
        let light = LightConfig::default();
        let [x, y, z] = light.direction_to_light();
        assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-6);
        assert!(x < 0.0 && y > 0.0 && z == 0.0);

        let degenerate = LightConfig {
            position: [0.0; 3],
            ..light
        };
        assert_eq!(degenerate.direction_to_light(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_content_packs_lighting() {
        let content = GlobalUBOContent::new(CameraUniform::default(), &LightConfig::default());
        assert_eq!(content.ambient_color, [0.25, 0.25, 0.25, 1.0]);
        assert_eq!(content.light_color, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(content.light_direction[3], 0.0);
    }
}
