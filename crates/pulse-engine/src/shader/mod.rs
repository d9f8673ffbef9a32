//! Shader program lifecycle.
//!
//! Flow:
//! - load a [`ShaderSource`] per stage (file or embedded string)
//! - [`compile_stage`] parses and validates it into a [`CompiledStage`]
//! - [`ShaderProgram::link`] checks the stage interface and builds the GPU pipeline
//! - uniforms are staged by name and flushed before drawing
//!
//! Compile and link failures are logged and returned; nothing in this module
//! terminates the process.

mod compile;
mod error;
mod link;
mod program;
mod reflect;
mod source;
mod uniforms;

pub use compile::{CompiledStage, compile_stage};
pub use error::ShaderError;
pub use program::{ProgramDesc, ShaderProgram};
pub use reflect::{UniformBlock, UniformKind, UniformMember};
pub use source::{ShaderLanguage, ShaderSource, ShaderStage};
pub use uniforms::{UniformLocation, UniformValue};
