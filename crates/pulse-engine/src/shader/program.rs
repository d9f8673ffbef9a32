use std::borrow::Cow;
use std::path::Path;

use crate::render::VertexLayout;

use super::link::{LinkedStages, link_stages};
use super::uniforms::{UniformStore, UniformWrite};
use super::{
    CompiledStage, ShaderError, ShaderSource, ShaderStage, UniformBlock, UniformLocation,
    UniformValue, compile_stage,
};

/// Fixed-function inputs a program is linked against.
#[derive(Debug, Clone, Copy)]
pub struct ProgramDesc<'a> {
    /// Name used in GPU labels and diagnostics.
    pub label: &'a str,
    /// Vertex buffer layout the program reads.
    pub vertex_layout: &'a VertexLayout,
    /// Color target format (the surface format).
    pub target_format: wgpu::TextureFormat,
}

/// One linked GPU program: a render pipeline built from a vertex and a
/// fragment stage, plus its uniform buffers.
///
/// A program is never relinked. Changing shader logic means linking a new
/// program and dropping the old one.
pub struct ShaderProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    bind_group: Option<wgpu::BindGroup>,
    uniform_buffers: Vec<wgpu::Buffer>,
    uniforms: UniformStore,
    vertex_layout: VertexLayout,
}

impl ShaderProgram {
    /// Reads, compiles and links a vertex/fragment pair from disk.
    ///
    /// Both files are read before anything is compiled. Both stages are
    /// compiled (so both logs are reported) before the first error is returned.
    pub fn from_files(
        device: &wgpu::Device,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
        desc: &ProgramDesc<'_>,
    ) -> Result<Self, ShaderError> {
        let vs = ShaderSource::from_file(ShaderStage::Vertex, vertex_path)?;
        let fs = ShaderSource::from_file(ShaderStage::Fragment, fragment_path)?;
        Self::from_sources(device, &vs, &fs, desc)
    }

    /// Compiles and links a vertex/fragment pair held in memory.
    pub fn from_sources(
        device: &wgpu::Device,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
        desc: &ProgramDesc<'_>,
    ) -> Result<Self, ShaderError> {
        let vs = compile_stage(vertex);
        let fs = compile_stage(fragment);
        Self::link(device, vec![vs?, fs?], desc)
    }

    /// Links compiled stages into a program.
    ///
    /// Exactly one vertex and one fragment stage are required. The stages are
    /// consumed in every case; on failure the link log is written to the error
    /// log and returned in [`ShaderError::Link`]. Device validation errors
    /// raised while building the pipeline (for example a color output the
    /// target format cannot store) are reported the same way.
    pub fn link(
        device: &wgpu::Device,
        stages: Vec<CompiledStage>,
        desc: &ProgramDesc<'_>,
    ) -> Result<Self, ShaderError> {
        let LinkedStages {
            vertex,
            fragment,
            uniform_blocks,
        } = link_stages(stages, desc.vertex_layout).map_err(|log| link_failed(desc.label, log))?;

        // Everything below reports through the scope instead of the device's
        // uncaptured-error handler, which panics by default.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let (vs_module, vs_entry) = vertex.into_parts();
        let (fs_module, fs_entry) = fragment.into_parts();

        let vs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} vertex", desc.label)),
            source: wgpu::ShaderSource::Naga(Cow::Owned(vs_module)),
        });
        let fs = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} fragment", desc.label)),
            source: wgpu::ShaderSource::Naga(Cow::Owned(fs_module)),
        });

        let uniforms = UniformStore::new(uniform_blocks);
        let (bind_group_layout, uniform_buffers, bind_group) =
            create_uniform_bindings(device, desc.label, &uniforms);

        let bind_group_layouts: Vec<&wgpu::BindGroupLayout> =
            bind_group_layout.iter().collect();
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} pipeline layout", desc.label)),
            bind_group_layouts: &bind_group_layouts,
            immediate_size: 0,
        });

        let attributes = desc.vertex_layout.wgpu_attributes();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} pipeline", desc.label)),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(&vs_entry),
                compilation_options: Default::default(),
                buffers: &[desc.vertex_layout.buffer_layout(&attributes)],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(&fs_entry),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: desc.target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            for buffer in &uniform_buffers {
                buffer.destroy();
            }
            return Err(link_failed(desc.label, err.to_string()));
        }

        log::info!(
            "linked program `{}` ({} uniform block(s))",
            desc.label,
            uniforms.layout().len()
        );

        Ok(Self {
            label: desc.label.to_string(),
            pipeline,
            bind_group,
            uniform_buffers,
            uniforms,
            vertex_layout: desc.vertex_layout.clone(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Vertex layout the program was linked against.
    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    /// Reflected uniform blocks, ordered by binding.
    pub fn uniform_blocks(&self) -> &[UniformBlock] {
        self.uniforms.layout()
    }

    /// Makes this program current on `pass`: pipeline plus uniform bind group.
    ///
    /// Calling it again for the same pass only repeats the state change.
    pub fn use_program(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_pipeline(&self.pipeline);
        if let Some(bind_group) = self.bind_group.as_ref() {
            pass.set_bind_group(0, bind_group, &[]);
        }
    }

    /// Resolves `name` to its location, caching the result.
    pub fn uniform_location(&mut self, name: &str) -> Option<UniformLocation> {
        self.uniforms.location(name)
    }

    /// Stages a uniform value; it reaches the GPU on the next
    /// [`flush_uniforms`](Self::flush_uniforms).
    ///
    /// Unknown names are ignored. A value whose type does not match the
    /// declared uniform is ignored with a warning.
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.uniforms.set(name, value) {
            UniformWrite::Written => {}
            UniformWrite::Unknown => {
                log::debug!("program `{}`: no active uniform `{name}`", self.label);
            }
            UniformWrite::Mismatch(kind) => {
                log::warn!(
                    "program `{}`: uniform `{name}` is {kind:?}, cannot set {value:?}",
                    self.label
                );
            }
        }
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, value);
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, value);
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, value);
    }

    pub fn set_vec4(&mut self, name: &str, value: [f32; 4]) {
        self.set_uniform(name, value);
    }

    /// Currently staged value of `name`.
    pub fn uniform_value(&self, name: &str) -> Option<UniformValue> {
        self.uniforms.get(name)
    }

    /// Uploads modified uniform blocks.
    pub fn flush_uniforms(&mut self, queue: &wgpu::Queue) {
        let buffers = &self.uniform_buffers;
        self.uniforms.flush_with(|block, bytes| {
            if let Some(buffer) = buffers.get(block) {
                queue.write_buffer(buffer, 0, bytes);
            }
        });
    }

    /// Destroys the uniform buffers ahead of drop.
    pub(crate) fn destroy(self) {
        for buffer in self.uniform_buffers.iter().rev() {
            buffer.destroy();
        }
        log::debug!("released program `{}`", self.label);
    }
}

fn link_failed(label: &str, log: String) -> ShaderError {
    log::error!("program `{label}` failed to link:\n{log}");
    ShaderError::Link {
        label: label.to_string(),
        log,
    }
}

fn create_uniform_bindings(
    device: &wgpu::Device,
    label: &str,
    uniforms: &UniformStore,
) -> (
    Option<wgpu::BindGroupLayout>,
    Vec<wgpu::Buffer>,
    Option<wgpu::BindGroup>,
) {
    let blocks = uniforms.layout();
    if blocks.is_empty() {
        return (None, Vec::new(), None);
    }

    let layout_entries: Vec<wgpu::BindGroupLayoutEntry> = blocks
        .iter()
        .map(|b| wgpu::BindGroupLayoutEntry {
            binding: b.binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: std::num::NonZeroU64::new(b.size as u64),
            },
            count: None,
        })
        .collect();

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{label} bgl")),
        entries: &layout_entries,
    });

    let buffers: Vec<wgpu::Buffer> = (0..blocks.len())
        .map(|i| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&format!(
                    "{label} ubo binding {}",
                    uniforms.binding(i).unwrap_or_default()
                )),
                size: uniforms.block_len(i).unwrap_or(16),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        })
        .collect();

    let entries: Vec<wgpu::BindGroupEntry> = blocks
        .iter()
        .zip(&buffers)
        .map(|(b, buffer)| wgpu::BindGroupEntry {
            binding: b.binding,
            resource: buffer.as_entire_binding(),
        })
        .collect();

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{label} bind group")),
        layout: &bind_group_layout,
        entries: &entries,
    });

    (Some(bind_group_layout), buffers, Some(bind_group))
}
