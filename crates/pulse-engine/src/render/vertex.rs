/// Size of one vertex component in bytes. All attributes are `f32`.
const FLOAT_SIZE: u64 = std::mem::size_of::<f32>() as u64;

/// One float attribute inside a vertex.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    /// Shader input location (`@location(n)` / `layout(location = n)`).
    pub location: u32,

    /// Number of `f32` components, `1..=4`.
    pub components: u8,

    /// Byte offset from the start of the vertex.
    pub offset: u64,
}

impl VertexAttribute {
    /// Returns the matching wgpu vertex format, or `None` for an unsupported
    /// component count.
    pub fn format(&self) -> Option<wgpu::VertexFormat> {
        match self.components {
            1 => Some(wgpu::VertexFormat::Float32),
            2 => Some(wgpu::VertexFormat::Float32x2),
            3 => Some(wgpu::VertexFormat::Float32x3),
            4 => Some(wgpu::VertexFormat::Float32x4),
            _ => None,
        }
    }

    /// Byte size of the attribute.
    #[inline]
    pub fn size(&self) -> u64 {
        self.components as u64 * FLOAT_SIZE
    }
}

/// Layout of a single vertex buffer: stride plus per-location attributes.
///
/// Attributes may be interleaved (several locations inside one stride) or a
/// single attribute per buffer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    /// Distance between consecutive vertices, in bytes.
    pub stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexLayout {
    /// Creates an empty layout whose stride is `floats` `f32` values.
    pub fn floats(floats: u64) -> Self {
        Self {
            stride: floats * FLOAT_SIZE,
            attributes: Vec::new(),
        }
    }

    /// Adds a float attribute; `offset_floats` is measured in `f32` values.
    pub fn with_attribute(mut self, location: u32, components: u8, offset_floats: u64) -> Self {
        self.attributes.push(VertexAttribute {
            location,
            components,
            offset: offset_floats * FLOAT_SIZE,
        });
        self
    }

    /// Position only: `vec3` at location 0.
    pub fn position() -> Self {
        Self::floats(3).with_attribute(0, 3, 0)
    }

    /// Interleaved position + color: `vec3` at location 0, `vec3` at location 1.
    pub fn position_color() -> Self {
        Self::floats(6)
            .with_attribute(0, 3, 0)
            .with_attribute(1, 3, 3)
    }

    /// Looks up the attribute bound to `location`.
    pub fn attribute(&self, location: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.location == location)
    }

    /// Checks component counts, bounds and location uniqueness.
    pub fn validate(&self) -> Result<(), String> {
        if self.stride == 0 {
            return Err("vertex layout has a zero stride".to_string());
        }

        for (i, attr) in self.attributes.iter().enumerate() {
            if attr.format().is_none() {
                return Err(format!(
                    "vertex attribute at location {} has {} components (expected 1..=4)",
                    attr.location, attr.components
                ));
            }
            if attr.offset + attr.size() > self.stride {
                return Err(format!(
                    "vertex attribute at location {} ends at byte {} past the {}-byte stride",
                    attr.location,
                    attr.offset + attr.size(),
                    self.stride
                ));
            }
            if self.attributes[..i].iter().any(|a| a.location == attr.location) {
                return Err(format!("vertex location {} is declared twice", attr.location));
            }
        }

        Ok(())
    }

    /// Number of whole vertices contained in `float_count` floats, or `None`
    /// when the data does not divide evenly into vertices.
    pub fn vertex_count(&self, float_count: usize) -> Option<u32> {
        let bytes = float_count as u64 * FLOAT_SIZE;
        if self.stride == 0 || bytes % self.stride != 0 {
            return None;
        }
        u32::try_from(bytes / self.stride).ok()
    }

    pub(crate) fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.attributes
            .iter()
            .filter_map(|a| {
                a.format().map(|format| wgpu::VertexAttribute {
                    format,
                    offset: a.offset,
                    shader_location: a.location,
                })
            })
            .collect()
    }

    pub(crate) fn buffer_layout<'a>(
        &self,
        attributes: &'a [wgpu::VertexAttribute],
    ) -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        }
    }
}
