use cgmath::{Matrix4, SquareMatrix};
use wgpu::{util::DeviceExt, Device};

use super::vertex::Vertex3D;
use crate::gfx::geometry::GeometryData;
use crate::gfx::resources::material::{MaterialId, MaterialStyle};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
    binding_types,
};

/// Bind group layout for the per-object model matrix
pub fn create_transform_layout(device: &Device) -> BindGroupLayoutWithDesc {
    BindGroupLayoutBuilder::new()
        .next_binding_vertex(binding_types::uniform())
        .create(device, "Transform Bind Group Layout")
}

struct MeshBuffers {
    vertex_buffer: wgpu::Buffer,
    triangle_buffer: Option<wgpu::Buffer>,
    line_buffer: Option<wgpu::Buffer>,
}

/// Interleaved vertices plus a triangle list and a line list
///
/// The line list is the geometry's own `line_indices` when it has any,
/// otherwise the unique edges of its triangles.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    triangle_indices: Vec<u32>,
    line_indices: Vec<u32>,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn from_geometry(geometry: &GeometryData) -> Self {
        let (vertices, triangle_indices) = geometry.to_scene_format();
        let line_indices = if geometry.line_indices.is_empty() {
            geometry.wireframe_indices()
        } else {
            geometry.line_indices.clone()
        };

        Self {
            vertices,
            triangle_indices,
            line_indices,
            buffers: None,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn triangle_count(&self) -> u32 {
        (self.triangle_indices.len() / 3) as u32
    }

    pub fn line_count(&self) -> u32 {
        (self.line_indices.len() / 2) as u32
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn triangle_indices(&self) -> &[u32] {
        &self.triangle_indices
    }

    pub fn line_indices(&self) -> &[u32] {
        &self.line_indices
    }

    /// Index list drawn for a material style
    pub fn indices_for(&self, style: MaterialStyle) -> &[u32] {
        match style {
            MaterialStyle::Gouraud => &self.triangle_indices,
            MaterialStyle::Wireframe | MaterialStyle::UnlitLines => &self.line_indices,
        }
    }

    pub fn is_uploaded(&self) -> bool {
        self.buffers.is_some()
    }

    /// Uploads the vertex and index buffers; later calls are no-ops
    pub fn upload(&mut self, device: &Device, label: &str) {
        if self.buffers.is_some() {
            return;
        }

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = |indices: &[u32], kind: &str| {
            (!indices.is_empty()).then(|| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{label} {kind} Index Buffer")),
                    contents: bytemuck::cast_slice(indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
            })
        };

        let buffers = MeshBuffers {
            vertex_buffer,
            triangle_buffer: index_buffer(&self.triangle_indices, "Triangle"),
            line_buffer: index_buffer(&self.line_indices, "Line"),
        };

        log::debug!(
            "Uploaded mesh '{}': {} vertices, {} triangles, {} lines",
            label,
            self.vertex_count(),
            self.triangle_count(),
            self.line_count()
        );
        self.buffers = Some(buffers);
    }
}

// GPU resources struct to hold the transform uniform buffer and bind group
pub struct ObjectGpuResources {
    pub transform_buffer: wgpu::Buffer,
    pub transform_bind_group: wgpu::BindGroup,
}

pub struct Object {
    pub name: String,
    pub mesh: Mesh,
    pub transform: Matrix4<f32>,
    pub visible: bool,
    material_id: Option<MaterialId>,
    pub gpu_resources: Option<ObjectGpuResources>, // None until init_gpu_resources called
}

impl Object {
    /// Create a new Object with identity transformation
    pub fn new(name: &str, mesh: Mesh) -> Self {
        Self {
            name: name.to_string(),
            mesh,
            transform: Matrix4::identity(),
            visible: true,
            material_id: None,
            gpu_resources: None,
        }
    }

    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    pub fn get_material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    /// Get the transform bind group for rendering
    pub fn get_transform_bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources
            .as_ref()
            .map(|res| &res.transform_bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device, layout: &BindGroupLayoutWithDesc) {
        self.mesh.upload(device, &self.name);

        let transform_data: &[f32; 16] = self.transform.as_ref();
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Transform Buffer", self.name)),
            contents: bytemuck::cast_slice(transform_data),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let transform_bind_group = BindGroupBuilder::new(layout)
            .resource(transform_buffer.as_entire_binding())
            .create(device, &format!("{} Transform Bind Group", self.name));

        self.gpu_resources = Some(ObjectGpuResources {
            transform_buffer,
            transform_bind_group,
        });
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh, style: MaterialStyle);
    fn draw_object(&mut self, object: &'a Object, style: MaterialStyle);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh, style: MaterialStyle) {
        let Some(buffers) = &mesh.buffers else {
            return; // Skip drawing if not uploaded
        };
        let index_buffer = match style {
            MaterialStyle::Gouraud => &buffers.triangle_buffer,
            MaterialStyle::Wireframe | MaterialStyle::UnlitLines => &buffers.line_buffer,
        };
        let Some(index_buffer) = index_buffer else {
            return;
        };

        self.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.indices_for(style).len() as u32, 0, 0..1);
    }

    fn draw_object(&mut self, object: &'b Object, style: MaterialStyle) {
        self.draw_mesh(&object.mesh, style);
    }
}
