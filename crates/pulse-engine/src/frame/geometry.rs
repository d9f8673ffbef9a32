use wgpu::util::DeviceExt;

use crate::render::VertexLayout;

/// Static vertex data plus the layout describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub label: String,
    pub vertices: Vec<f32>,
    pub layout: VertexLayout,
}

impl Geometry {
    pub fn new(label: impl Into<String>, vertices: impl Into<Vec<f32>>, layout: VertexLayout) -> Self {
        Self {
            label: label.into(),
            vertices: vertices.into(),
            layout,
        }
    }

    /// Number of vertices, or `None` if the data is not a whole number of
    /// vertices for the layout.
    pub fn vertex_count(&self) -> Option<u32> {
        self.layout.vertex_count(self.vertices.len())
    }
}

/// Uploaded, immutable vertex buffer.
pub(crate) struct GpuMesh {
    label: String,
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl GpuMesh {
    /// Uploads `geometry`. Callers validate the vertex count first.
    pub(crate) fn upload(device: &wgpu::Device, geometry: &Geometry, vertex_count: u32) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} vbo", geometry.label)),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            label: geometry.label.clone(),
            buffer,
            vertex_count,
        }
    }

    pub(crate) fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub(crate) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub(crate) fn destroy(self) {
        self.buffer.destroy();
        log::debug!("released vertex buffer `{}`", self.label);
    }
}
