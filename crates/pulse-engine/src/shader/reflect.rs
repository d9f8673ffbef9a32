//! Reflection over validated stage modules.
//!
//! Extracts what the linker needs: uniform block layouts and the
//! location-bound inputs/outputs of each entry point.

use wgpu::naga;

/// Host-visible type of a uniform member.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum UniformKind {
    Float,
    Int,
    Uint,
    Vec4,
    /// Any other type; present in the layout but not settable.
    Other,
}

impl UniformKind {
    fn of(inner: &naga::TypeInner) -> Self {
        use naga::{ScalarKind, TypeInner, VectorSize};

        match inner {
            TypeInner::Scalar(s) if s.width == 4 => match s.kind {
                ScalarKind::Float => UniformKind::Float,
                ScalarKind::Sint => UniformKind::Int,
                ScalarKind::Uint => UniformKind::Uint,
                _ => UniformKind::Other,
            },
            TypeInner::Vector {
                size: VectorSize::Quad,
                scalar,
            } if scalar.kind == ScalarKind::Float && scalar.width == 4 => UniformKind::Vec4,
            _ => UniformKind::Other,
        }
    }
}

/// One named value inside a uniform block.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformMember {
    pub name: String,
    /// Byte offset inside the block.
    pub offset: u32,
    pub kind: UniformKind,
}

/// A `var<uniform>` / `uniform` block bound at `@group(0) @binding(n)`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UniformBlock {
    pub binding: u32,
    /// Byte size of the block as laid out by the shader.
    pub size: u32,
    pub members: Vec<UniformMember>,
}

/// A location-bound stage input or output.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Varying {
    pub location: u32,
    pub ty: naga::TypeInner,
    pub interpolation: Option<naga::Interpolation>,
    pub sampling: Option<naga::Sampling>,
}

impl Varying {
    /// Interpolation with the implicit defaults filled in: perspective for
    /// floats, flat for integers.
    pub(crate) fn effective_interpolation(&self) -> naga::Interpolation {
        self.interpolation.unwrap_or(match self.ty.scalar_kind() {
            Some(naga::ScalarKind::Float) => naga::Interpolation::Perspective,
            _ => naga::Interpolation::Flat,
        })
    }

    /// Sampling with the implicit default filled in. Flat varyings are not
    /// interpolated, so their sampling is not compared.
    pub(crate) fn effective_sampling(&self) -> Option<naga::Sampling> {
        match self.effective_interpolation() {
            naga::Interpolation::Flat => None,
            _ => Some(self.sampling.unwrap_or(naga::Sampling::Center)),
        }
    }
}

/// Collects the uniform blocks declared by `module`.
///
/// Only uniform buffers in bind group 0 are supported; textures, samplers and
/// storage buffers are reported as errors.
pub(crate) fn uniform_blocks(module: &naga::Module) -> Result<Vec<UniformBlock>, String> {
    let mut blocks = Vec::new();

    for (_, var) in module.global_variables.iter() {
        let Some(binding) = var.binding.as_ref() else { continue };
        let display_name = var.name.as_deref().unwrap_or("<unnamed>");

        if var.space != naga::AddressSpace::Uniform {
            return Err(format!(
                "resource `{display_name}` at @group({}) @binding({}) is not a uniform buffer; only uniform buffers are supported",
                binding.group, binding.binding
            ));
        }
        if binding.group != 0 {
            return Err(format!(
                "uniform `{display_name}` uses @group({}); only group 0 is supported",
                binding.group
            ));
        }

        let ty = &module.types[var.ty];
        let members = match &ty.inner {
            naga::TypeInner::Struct { members, .. } => members
                .iter()
                .map(|m| UniformMember {
                    name: m.name.clone().unwrap_or_default(),
                    offset: m.offset,
                    kind: UniformKind::of(&module.types[m.ty].inner),
                })
                .collect(),
            inner => vec![UniformMember {
                name: var.name.clone().unwrap_or_default(),
                offset: 0,
                kind: UniformKind::of(inner),
            }],
        };

        blocks.push(UniformBlock {
            binding: binding.binding,
            size: ty.inner.size(module.to_ctx()),
            members,
        });
    }

    blocks.sort_by_key(|b| b.binding);
    Ok(blocks)
}

/// Location-bound arguments of `ep`.
pub(crate) fn inputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        collect(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

/// Location-bound results of `ep`.
pub(crate) fn outputs(module: &naga::Module, ep: &naga::EntryPoint) -> Vec<Varying> {
    let mut out = Vec::new();
    if let Some(result) = ep.function.result.as_ref() {
        collect(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// Whether `ep` writes the clip-space position builtin.
pub(crate) fn writes_position(module: &naga::Module, ep: &naga::EntryPoint) -> bool {
    let Some(result) = ep.function.result.as_ref() else { return false };

    let is_position =
        |b: Option<&naga::Binding>| matches!(b, Some(naga::Binding::BuiltIn(naga::BuiltIn::Position { .. })));

    if is_position(result.binding.as_ref()) {
        return true;
    }
    match &module.types[result.ty].inner {
        naga::TypeInner::Struct { members, .. } => {
            members.iter().any(|m| is_position(m.binding.as_ref()))
        }
        _ => false,
    }
}

fn collect(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(naga::Binding::Location {
            location,
            interpolation,
            sampling,
            ..
        }) => out.push(Varying {
            location: *location,
            ty: module.types[ty].inner.clone(),
            interpolation: *interpolation,
            sampling: *sampling,
        }),
        Some(naga::Binding::BuiltIn(_)) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

/// Number of components of a scalar/vector type.
pub(crate) fn component_count(inner: &naga::TypeInner) -> Option<u32> {
    match inner {
        naga::TypeInner::Scalar(_) => Some(1),
        naga::TypeInner::Vector { size, .. } => Some(*size as u32),
        _ => None,
    }
}
