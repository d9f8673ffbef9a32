use wgpu::naga;

use super::{ShaderError, ShaderLanguage, ShaderSource, ShaderStage};

/// A parsed and validated stage, ready to be linked.
///
/// Produced only by [`compile_stage`]; a failed compilation never yields a
/// handle. Consumed by [`ShaderProgram::link`](super::ShaderProgram::link).
#[derive(Debug)]
pub struct CompiledStage {
    stage: ShaderStage,
    label: String,
    entry_point: String,
    module: naga::Module,
    log: String,
}

impl CompiledStage {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Name of the entry point used for this stage.
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Compiler diagnostics. Empty for a clean compile.
    pub fn log(&self) -> &str {
        &self.log
    }

    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }

    pub(crate) fn entry(&self) -> Option<&naga::EntryPoint> {
        self.module
            .entry_points
            .iter()
            .find(|ep| ep.name == self.entry_point)
    }

    pub(crate) fn into_parts(self) -> (naga::Module, String) {
        (self.module, self.entry_point)
    }
}

/// Parses and validates one stage.
///
/// Fails with [`ShaderError::Compile`] when the source does not parse, does not
/// validate, or declares no entry point for the requested stage. The log is
/// written to the error log before returning.
pub fn compile_stage(source: &ShaderSource) -> Result<CompiledStage, ShaderError> {
    let stage = source.stage();

    let result = parse(source)
        .and_then(|module| validate(source, &module).map(|()| module))
        .and_then(|module| {
            let entry_point = find_entry_point(&module, stage)
                .ok_or_else(|| format!("no {stage} entry point declared"))?;
            Ok((module, entry_point))
        });

    match result {
        Ok((module, entry_point)) => {
            log::debug!(
                "compiled {stage} stage `{}` (entry point `{entry_point}`)",
                source.label()
            );
            Ok(CompiledStage {
                stage,
                label: source.label().to_string(),
                entry_point,
                module,
                log: String::new(),
            })
        }
        Err(log) => {
            log::error!("{stage} stage `{}` failed to compile:\n{log}", source.label());
            Err(ShaderError::Compile {
                stage,
                label: source.label().to_string(),
                log,
            })
        }
    }
}

fn parse(source: &ShaderSource) -> Result<naga::Module, String> {
    match source.language() {
        ShaderLanguage::Wgsl => naga::front::wgsl::parse_str(source.text())
            .map_err(|e| e.emit_to_string(source.text())),
        ShaderLanguage::Glsl => {
            let options = naga::front::glsl::Options::from(source.stage().to_naga());
            naga::front::glsl::Frontend::default()
                .parse(&options, source.text())
                .map_err(|e| e.to_string())
        }
    }
}

fn validate(source: &ShaderSource, module: &naga::Module) -> Result<(), String> {
    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );

    validator
        .validate(module)
        .map(|_| ())
        .map_err(|e| e.emit_to_string(source.text()))
}

fn find_entry_point(module: &naga::Module, stage: ShaderStage) -> Option<String> {
    let wanted = stage.to_naga();
    let mut matching = module.entry_points.iter().filter(|ep| ep.stage == wanted);

    let first = matching.next()?;
    if matching.next().is_some() {
        log::debug!("several {stage} entry points declared; using `{}`", first.name);
    }
    Some(first.name.clone())
}
