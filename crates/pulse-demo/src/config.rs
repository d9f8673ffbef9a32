use std::ffi::OsString;
use std::path::PathBuf;

use pulse_engine::frame::{FrameDriverConfig, TimeUniform};
use pulse_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

/// Environment variable naming the directory that holds the shader files.
pub const SHADER_DIR_VAR: &str = "PULSE_SHADER_DIR";

/// Uniform animated by the pulsing triangles.
pub const PULSE_UNIFORM: &str = "our_color";

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub shader_dir: PathBuf,
    pub runtime: RuntimeConfig,
    pub driver: FrameDriverConfig,
}

impl DemoConfig {
    pub fn from_env() -> Self {
        Self::from_shader_dir(std::env::var_os(SHADER_DIR_VAR))
    }

    fn from_shader_dir(dir: Option<OsString>) -> Self {
        let shader_dir = dir
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders")));

        Self {
            shader_dir,
            ..Self::default()
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            shader_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders")),
            runtime: RuntimeConfig {
                title: "OpenGLtest".to_string(),
                initial_size: LogicalSize::new(800.0, 600.0),
            },
            driver: FrameDriverConfig {
                time_uniforms: vec![TimeUniform::green_pulse(PULSE_UNIFORM)],
                ..Default::default()
            },
        }
    }
}
