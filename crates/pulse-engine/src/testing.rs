//! Shader fixtures and a headless device for unit tests.

use crate::shader::{ShaderSource, ShaderStage};

pub(crate) const COLOR_VS_LABEL: &str = "color.vs.wgsl";
pub(crate) const COLOR_FS_LABEL: &str = "color.fs.wgsl";

pub(crate) const COLOR_VS: &str = r#"
struct VsIn {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
};

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) color: vec3<f32>,
};

@vertex
fn vs_main(v: VsIn) -> VsOut {
    var out: VsOut;
    out.clip = vec4<f32>(v.position, 1.0);
    out.color = v.color;
    return out;
}
"#;

pub(crate) const COLOR_FS: &str = r#"
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<f32> {
    return vec4<f32>(color, 1.0);
}
"#;

const GLOBALS: &str = r#"
struct Globals {
    our_color: vec4<f32>,
    scale: f32,
    mode: i32,
    flags: u32,
};

@group(0) @binding(0) var<uniform> globals: Globals;
"#;

const PULSE_VS_BODY: &str = r#"
@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    return vec4<f32>(position * globals.scale, 1.0);
}
"#;

const PULSE_FS_BODY: &str = r#"
@fragment
fn fs_main() -> @location(0) vec4<f32> {
    if (globals.mode == 1 && globals.flags != 0u) {
        return vec4<f32>(1.0);
    }
    return globals.our_color;
}
"#;

pub(crate) fn color_vs() -> ShaderSource {
    ShaderSource::wgsl(ShaderStage::Vertex, COLOR_VS_LABEL, COLOR_VS)
}

pub(crate) fn color_fs() -> ShaderSource {
    ShaderSource::wgsl(ShaderStage::Fragment, COLOR_FS_LABEL, COLOR_FS)
}

/// Position-only vertex stage reading the shared `Globals` block.
pub(crate) fn pulse_vs() -> ShaderSource {
    ShaderSource::wgsl(
        ShaderStage::Vertex,
        "pulse.vs.wgsl",
        format!("{GLOBALS}{PULSE_VS_BODY}"),
    )
}

/// Fragment stage writing `globals.our_color`.
pub(crate) fn pulse_fs() -> ShaderSource {
    ShaderSource::wgsl(
        ShaderStage::Fragment,
        "pulse.fs.wgsl",
        format!("{GLOBALS}{PULSE_FS_BODY}"),
    )
}

pub(crate) fn glsl_vs() -> ShaderSource {
    ShaderSource::glsl(
        ShaderStage::Vertex,
        "shader.vs",
        r#"#version 450
layout(location = 0) in vec3 aPos;
layout(location = 1) in vec3 aColor;
layout(location = 0) out vec3 ourColor;

void main() {
    gl_Position = vec4(aPos, 1.0);
    ourColor = aColor;
}
"#,
    )
}

pub(crate) fn glsl_fs() -> ShaderSource {
    ShaderSource::glsl(
        ShaderStage::Fragment,
        "shader.fs",
        r#"#version 450
layout(location = 0) in vec3 ourColor;
layout(location = 0) out vec4 FragColor;

layout(set = 0, binding = 0) uniform Tint {
    vec4 tint;
};

void main() {
    FragColor = vec4(ourColor, 1.0) * tint;
}
"#,
    )
}

/// Device/queue for GPU-backed tests.
///
/// Uses a real adapter when one exists and falls back to wgpu's no-op
/// backend otherwise, so validation and state logic always run.
pub(crate) fn headless_device() -> (wgpu::Device, wgpu::Queue) {
    let real = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = pollster::block_on(real.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .or_else(|_| {
        let noop = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::NOOP,
            backend_options: wgpu::BackendOptions {
                noop: wgpu::NoopBackendOptions { enable: true },
                ..Default::default()
            },
            ..Default::default()
        });
        pollster::block_on(noop.request_adapter(&wgpu::RequestAdapterOptions::default()))
    })
    .expect("no adapter, not even the no-op backend");

    pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("pulse test device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::downlevel_defaults(),
        experimental_features: wgpu::ExperimentalFeatures::disabled(),
        memory_hints: wgpu::MemoryHints::Performance,
        trace: wgpu::Trace::Off,
    }))
    .expect("test device creation failed")
}

pub(crate) const TEST_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
