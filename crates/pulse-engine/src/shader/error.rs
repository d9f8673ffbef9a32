use std::path::PathBuf;

use thiserror::Error;

use super::ShaderStage;

/// Failure while building a shader program.
///
/// None of these variants are fatal to the process. `Io` is fatal for the
/// program being built; `Compile` and `Link` mean the program must not be used.
#[derive(Debug, Error)]
pub enum ShaderError {
    /// The shader source could not be read.
    #[error("failed to read shader source {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single stage failed to parse or validate.
    #[error("{stage} stage `{label}` failed to compile:\n{log}")]
    Compile {
        stage: ShaderStage,
        label: String,
        log: String,
    },

    /// The stages could not be combined into a program.
    #[error("program `{label}` failed to link:\n{log}")]
    Link { label: String, log: String },
}

impl ShaderError {
    /// Returns the compiler/linker diagnostic log, if this error carries one.
    pub fn log(&self) -> Option<&str> {
        match self {
            ShaderError::Io { .. } => None,
            ShaderError::Compile { log, .. } | ShaderError::Link { log, .. } => Some(log),
        }
    }
}
