// src/wgpu_utils/uniform_buffer.rs
use wgpu::util::DeviceExt;

/// A uniform buffer holding exactly one `Content` value
///
/// Keeps a CPU copy of the last written value so per-frame updates with an
/// unchanged camera or material do not touch the queue.
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    current: Content,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    /// Creates the buffer filled with zeroes
    pub fn zeroed(device: &wgpu::Device, label: &str) -> Self {
        Self::with_content(device, label, Content::zeroed())
    }

    /// Creates the buffer with `content` already uploaded
    pub fn with_content(device: &wgpu::Device, label: &str, content: Content) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Uniform Buffer")),
            contents: bytemuck::bytes_of(&content),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self {
            buffer,
            current: content,
        }
    }

    /// Writes `content` to the GPU unless it equals what is already there
    ///
    /// Returns true when a write was queued.
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) -> bool {
        if !content_differs(&self.current, &content) {
            return false;
        }
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&content));
        self.current = content;
        true
    }

    pub fn content(&self) -> &Content {
        &self.current
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

/// Byte-wise comparison; float fields compare by bit pattern
fn content_differs<Content: bytemuck::Pod>(old: &Content, new: &Content) -> bool {
    bytemuck::bytes_of(old) != bytemuck::bytes_of(new)
}
