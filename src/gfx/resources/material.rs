//! Material system
//!
//! Provides material definitions and centralized management with GPU resource
//! handling. Materials are stored in [`MaterialManager`] and objects reference
//! them by ID, so switching how an object is drawn is a matter of changing
//! that ID.

use std::collections::HashMap;
use std::path::PathBuf;

use wgpu::Device;

use super::texture_resource::TextureResource;
use crate::config::{TextureConfig, TextureWrap};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
    uniform_buffer::UniformBuffer,
};

/// Material ID for referencing materials
pub type MaterialId = String;

pub const DEFAULT_MATERIAL: &str = "default";

/// Which pipeline draws an object and which of its index buffers is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialStyle {
    /// Filled triangles, per-vertex lighting
    Gouraud,
    /// Unique triangle edges as lines
    Wireframe,
    /// The mesh's own line list, no lighting
    UnlitLines,
}

impl MaterialStyle {
    pub const ALL: [MaterialStyle; 3] = [
        MaterialStyle::Gouraud,
        MaterialStyle::Wireframe,
        MaterialStyle::UnlitLines,
    ];

    pub fn topology(self) -> wgpu::PrimitiveTopology {
        match self {
            MaterialStyle::Gouraud => wgpu::PrimitiveTopology::TriangleList,
            MaterialStyle::Wireframe | MaterialStyle::UnlitLines => {
                wgpu::PrimitiveTopology::LineList
            }
        }
    }
}

/// GPU uniform data for materials
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub base_color: [f32; 4],
    /// 1.0 when the diffuse texture should modulate the colour
    pub use_texture: f32,
    _padding: [f32; 3],
}

type MaterialUBO = UniformBuffer<MaterialUniform>;

/// Material bind group layout: uniform, diffuse texture, sampler
pub fn create_material_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_fragment(binding_types::uniform())
        .next_binding_fragment(binding_types::color_texture_2d())
        .next_binding_fragment(binding_types::filtering_sampler())
        .create(device, "Material Bind Group Layout")
}

struct MaterialGpuResources {
    ubo: MaterialUBO,
    texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// Material definition
///
/// Holds the style, a base colour multiplied with the vertex colours and an
/// optional texture image, plus the GPU resources shared by every object
/// using it.
pub struct Material {
    pub name: String,
    pub style: MaterialStyle,
    pub base_color: [f32; 4],
    pub texture: Option<TextureConfig>,
    gpu: Option<MaterialGpuResources>,
}

impl Default for Material {
    fn default() -> Self {
        Self::new(DEFAULT_MATERIAL, MaterialStyle::Gouraud)
    }
}

impl Material {
    pub fn new(name: &str, style: MaterialStyle) -> Self {
        Self {
            name: name.to_string(),
            style,
            base_color: [1.0, 1.0, 1.0, 1.0],
            texture: None,
            gpu: None,
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.base_color = [r, g, b, self.base_color[3]];
        self
    }

    /// Builder pattern: Sample an image file
    pub fn with_texture(mut self, path: impl Into<PathBuf>, wrap: TextureWrap) -> Self {
        self.texture = Some(TextureConfig {
            path: path.into(),
            wrap,
        });
        self
    }

    pub fn uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: self.base_color,
            use_texture: if self.texture.is_some() { 1.0 } else { 0.0 },
            _padding: [0.0; 3],
        }
    }

    /// Creates or refreshes the GPU resources for this material
    ///
    /// The texture is loaded the first time only. An image that cannot be
    /// loaded is replaced by plain white and the material renders untextured.
    pub fn update_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        let uniform = self.uniform();
        if let Some(gpu) = &mut self.gpu {
            gpu.ubo.update_content(queue, uniform);
            return;
        }

        let loaded = self.texture.as_ref().map(|source| {
            TextureResource::from_image_path(device, queue, &source.path, source.wrap)
        });
        let texture = match loaded {
            Some(Ok(texture)) => texture,
            Some(Err(err)) => {
                log::warn!("{err}; material '{}' falls back to white", self.name);
                self.texture = None;
                TextureResource::white(device, queue)
            }
            None => TextureResource::white(device, queue),
        };

        let ubo = MaterialUBO::with_content(device, &self.name, self.uniform());
        let bind_group = BindGroupBuilder::new(layout)
            .resource(ubo.binding_resource())
            .texture(&texture.view)
            .sampler(&texture.sampler)
            .create(device, &format!("Material Bind Group: {}", self.name));

        log::debug!("Created GPU resources for material '{}'", self.name);
        self.gpu = Some(MaterialGpuResources {
            ubo,
            texture,
            bind_group,
        });
    }

    /// Gets the bind group for rendering
    pub fn get_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu.as_ref().map(|gpu| &gpu.bind_group)
    }

    pub fn has_gpu_resources(&self) -> bool {
        self.gpu.is_some()
    }

    pub fn texture_resource(&self) -> Option<&TextureResource> {
        self.gpu.as_ref().map(|gpu| &gpu.texture)
    }
}

/// Manages all materials in the scene
///
/// Centralized storage for all materials. Objects reference materials by ID
/// rather than storing material data directly, enabling sharing of GPU
/// resources between objects.
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, replacing any material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.materials.contains_key(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.default_material
    }

    /// Gets material for an object with fallback to default
    ///
    /// Used during rendering, handling objects with no material assigned or
    /// with an ID that doesn't exist.
    pub fn get_material_for_object(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or(&self.default_material)
    }

    /// Lists all material IDs, sorted
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        let mut ids: Vec<_> = self.materials.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Updates GPU resources for all materials, creating bind groups against
    /// the shared material layout
    pub fn update_all_gpu_resources(
        &mut self,
        device: &Device,
        queue: &wgpu::Queue,
        layout: &BindGroupLayoutWithDesc,
    ) {
        self.default_material
            .update_gpu_resources(device, queue, layout);
        for material in self.materials.values_mut() {
            material.update_gpu_resources(device, queue, layout);
        }
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}
