use crate::render::VertexLayout;

use super::reflect::{self, UniformBlock};
use super::{CompiledStage, ShaderStage};

/// Stages that passed the interface checks, plus the merged uniform layout.
#[derive(Debug)]
pub(crate) struct LinkedStages {
    pub vertex: CompiledStage,
    pub fragment: CompiledStage,
    pub uniform_blocks: Vec<UniformBlock>,
}

/// Checks that `stages` form a complete program for `layout`.
///
/// Requires exactly one vertex and one fragment stage. The stages are consumed
/// whether or not the check passes. On failure the returned string is the link
/// log.
pub(crate) fn link_stages(
    stages: Vec<CompiledStage>,
    layout: &VertexLayout,
) -> Result<LinkedStages, String> {
    let (vertex, fragment) = split_stages(stages)?;

    let vs_entry = vertex
        .entry()
        .ok_or_else(|| format!("vertex entry point `{}` is missing", vertex.entry_point()))?;
    let fs_entry = fragment
        .entry()
        .ok_or_else(|| format!("fragment entry point `{}` is missing", fragment.entry_point()))?;

    layout.validate()?;

    // Vertex inputs must be fed by the vertex layout.
    for input in reflect::inputs(vertex.module(), vs_entry) {
        let Some(attr) = layout.attribute(input.location) else {
            return Err(format!(
                "vertex input at location {} is not provided by the vertex layout",
                input.location
            ));
        };
        if input.ty.scalar_kind() != Some(wgpu::naga::ScalarKind::Float) {
            return Err(format!(
                "vertex input at location {} is not a float type; vertex attributes are f32",
                input.location
            ));
        }
        if reflect::component_count(&input.ty).is_none() {
            return Err(format!(
                "vertex input at location {} is not a scalar or vector (attribute has {} components)",
                input.location, attr.components
            ));
        }
    }

    if !reflect::writes_position(vertex.module(), vs_entry) {
        return Err("vertex stage does not write the position builtin".to_string());
    }

    // Every fragment input must be produced by the vertex stage with the same type.
    let vs_outputs = reflect::outputs(vertex.module(), vs_entry);
    for input in reflect::inputs(fragment.module(), fs_entry) {
        match vs_outputs.iter().find(|o| o.location == input.location) {
            None => {
                return Err(format!(
                    "fragment input at location {} is not written by the vertex stage",
                    input.location
                ));
            }
            Some(out) if out.ty != input.ty => {
                return Err(format!(
                    "varying at location {} has type {:?} in the vertex stage but {:?} in the fragment stage",
                    input.location, out.ty, input.ty
                ));
            }
            Some(out)
                if out.effective_interpolation() != input.effective_interpolation()
                    || out.effective_sampling() != input.effective_sampling() =>
            {
                return Err(format!(
                    "varying at location {} is interpolated as {:?}/{:?} in the vertex stage but {:?}/{:?} in the fragment stage",
                    input.location,
                    out.effective_interpolation(),
                    out.effective_sampling(),
                    input.effective_interpolation(),
                    input.effective_sampling()
                ));
            }
            Some(_) => {}
        }
    }

    if !reflect::outputs(fragment.module(), fs_entry)
        .iter()
        .any(|o| o.location == 0)
    {
        return Err("fragment stage does not write color location 0".to_string());
    }

    let uniform_blocks = merge_uniforms(
        reflect::uniform_blocks(vertex.module())?,
        reflect::uniform_blocks(fragment.module())?,
    )?;

    Ok(LinkedStages {
        vertex,
        fragment,
        uniform_blocks,
    })
}

fn split_stages(stages: Vec<CompiledStage>) -> Result<(CompiledStage, CompiledStage), String> {
    let total = stages.len();
    let (vertex, fragment): (Vec<_>, Vec<_>) = stages
        .into_iter()
        .partition(|s| s.stage() == ShaderStage::Vertex);

    if vertex.len() != 1 || fragment.len() != 1 {
        return Err(format!(
            "a program needs exactly one vertex and one fragment stage; got {} vertex and {} fragment ({total} total)",
            vertex.len(),
            fragment.len()
        ));
    }

    match (vertex.into_iter().next(), fragment.into_iter().next()) {
        (Some(v), Some(f)) => Ok((v, f)),
        _ => Err("a program needs exactly one vertex and one fragment stage".to_string()),
    }
}

/// Unions the blocks of both stages; a binding declared by both must match.
fn merge_uniforms(
    vertex: Vec<UniformBlock>,
    fragment: Vec<UniformBlock>,
) -> Result<Vec<UniformBlock>, String> {
    let mut merged = vertex;

    for block in fragment {
        match merged.iter().find(|b| b.binding == block.binding) {
            Some(existing) if *existing != block => {
                return Err(format!(
                    "uniform block at binding {} differs between the vertex and fragment stages",
                    block.binding
                ));
            }
            Some(_) => {}
            None => merged.push(block),
        }
    }

    merged.sort_by_key(|b| b.binding);
    Ok(merged)
}
