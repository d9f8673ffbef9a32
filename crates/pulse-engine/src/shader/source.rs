use std::fmt;
use std::io;
use std::path::Path;

use wgpu::naga;

use super::ShaderError;

/// Pipeline phase a stage targets.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }

    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source language of a stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderLanguage {
    Wgsl,
    Glsl,
}

impl ShaderLanguage {
    /// Infers the language from a file extension.
    ///
    /// `.wgsl` is WGSL; `.vert`, `.frag`, `.vs`, `.fs` and `.glsl` are GLSL.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "wgsl" => Some(ShaderLanguage::Wgsl),
            "vert" | "frag" | "vs" | "fs" | "glsl" => Some(ShaderLanguage::Glsl),
            _ => None,
        }
    }
}

/// Immutable shader text for one stage.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    stage: ShaderStage,
    language: ShaderLanguage,
    label: String,
    text: String,
}

impl ShaderSource {
    pub fn new(
        stage: ShaderStage,
        language: ShaderLanguage,
        label: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            language,
            label: label.into(),
            text: text.into(),
        }
    }

    /// WGSL source, typically from `include_str!`.
    pub fn wgsl(stage: ShaderStage, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(stage, ShaderLanguage::Wgsl, label, text)
    }

    /// GLSL source (`#version 450` style, explicit locations).
    pub fn glsl(stage: ShaderStage, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(stage, ShaderLanguage::Glsl, label, text)
    }

    /// Reads a whole file as UTF-8. The language comes from the extension.
    ///
    /// An unreadable file, invalid UTF-8 or an unknown extension yields
    /// [`ShaderError::Io`].
    pub fn from_file(stage: ShaderStage, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();

        let result = ShaderLanguage::from_path(path)
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "unrecognised shader file extension",
                )
            })
            .and_then(|language| std::fs::read_to_string(path).map(|text| (language, text)));

        match result {
            Ok((language, text)) => {
                log::debug!("loaded {stage} shader {} ({} bytes)", path.display(), text.len());
                Ok(Self::new(stage, language, path.display().to_string(), text))
            }
            Err(source) => {
                log::error!("failed to read {stage} shader {}: {source}", path.display());
                Err(ShaderError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn language(&self) -> ShaderLanguage {
        self.language
    }

    /// Name used in diagnostics (file path or caller-provided label).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn language_from_extension() {
        let lang = |p: &str| ShaderLanguage::from_path(&PathBuf::from(p));
        assert_eq!(lang("triangle.wgsl"), Some(ShaderLanguage::Wgsl));
        assert_eq!(lang("shader.vs"), Some(ShaderLanguage::Glsl));
        assert_eq!(lang("shader.FRAG"), Some(ShaderLanguage::Glsl));
        assert_eq!(lang("shader.txt"), None);
        assert_eq!(lang("shader"), None);
    }

    #[test]
    fn from_file_reads_whole_text() {
        let mut file = tempfile::Builder::new().suffix(".wgsl").tempfile().unwrap();
        write!(file, "// hello\n@vertex fn vs() -> @builtin(position) vec4<f32> {{ return vec4<f32>(); }}").unwrap();

        let src = ShaderSource::from_file(ShaderStage::Vertex, file.path()).unwrap();
        assert_eq!(src.stage(), ShaderStage::Vertex);
        assert_eq!(src.language(), ShaderLanguage::Wgsl);
        assert!(src.text().starts_with("// hello"));
        assert_eq!(src.label(), file.path().display().to_string());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShaderSource::from_file(ShaderStage::Fragment, dir.path().join("nope.fs"))
            .unwrap_err();
        match err {
            ShaderError::Io { source, .. } => assert_eq!(source.kind(), io::ErrorKind::NotFound),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn unknown_extension_is_io_error() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = ShaderSource::from_file(ShaderStage::Vertex, file.path()).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
        assert!(err.log().is_none());
    }

    #[test]
    fn invalid_utf8_is_io_error() {
        let mut file = tempfile::Builder::new().suffix(".glsl").tempfile().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let err = ShaderSource::from_file(ShaderStage::Vertex, file.path()).unwrap_err();
        assert!(matches!(err, ShaderError::Io { .. }));
    }
}
