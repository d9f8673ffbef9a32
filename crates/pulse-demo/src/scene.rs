use std::path::Path;

use pulse_engine::frame::{DrawPair, Geometry};
use pulse_engine::render::{RenderCtx, VertexLayout};
use pulse_engine::shader::{ProgramDesc, ShaderProgram};

/// Shader pair plus the shapes drawn with it.
struct Part {
    label: &'static str,
    vertex: &'static str,
    fragment: &'static str,
    layout: VertexLayout,
    shapes: Vec<Geometry>,
}

/// Everything handed to `FrameDriver::setup`.
pub struct Scene<P> {
    pub programs: Vec<P>,
    pub geometry: Vec<Geometry>,
    pub draws: Vec<DrawPair>,
}

fn parts() -> Vec<Part> {
    let colored = VertexLayout::position_color();
    let plain = VertexLayout::position();

    vec![
        Part {
            label: "vertex color",
            vertex: "shader.vs",
            fragment: "shader.fs",
            shapes: vec![Geometry::new(
                "triangle1",
                vec![
                    // position        color
                    0.5, -0.5, 0.0, 1.0, 0.0, 0.0, // bottom right
                    -0.5, -0.5, 0.0, 0.0, 1.0, 0.0, // bottom left
                    0.0, 0.5, 0.0, 0.0, 0.0, 1.0, // top
                ],
                colored.clone(),
            )],
            layout: colored,
        },
        Part {
            label: "pulse",
            vertex: "pulse.vs.wgsl",
            fragment: "pulse.fs.wgsl",
            shapes: vec![
                Geometry::new(
                    "pulse left",
                    vec![-0.9, 0.6, 0.0, -0.6, 0.6, 0.0, -0.75, 0.9, 0.0],
                    plain.clone(),
                ),
                Geometry::new(
                    "pulse right",
                    vec![0.6, 0.6, 0.0, 0.9, 0.6, 0.0, 0.75, 0.9, 0.0],
                    plain.clone(),
                ),
            ],
            layout: plain,
        },
    ]
}

/// Loads every program from `shader_dir`. A program that fails to load,
/// compile or link is logged and its shapes are left out.
pub fn load(ctx: &RenderCtx<'_>, shader_dir: &Path) -> Scene<ShaderProgram> {
    let built = parts().into_iter().map(|part| {
        let program = ShaderProgram::from_files(
            ctx.device,
            shader_dir.join(part.vertex),
            shader_dir.join(part.fragment),
            &ProgramDesc {
                label: part.label,
                vertex_layout: &part.layout,
                target_format: ctx.surface_format,
            },
        );

        match program {
            Ok(p) => (Some(p), part.shapes),
            Err(e) => {
                log::error!("skipping `{}` shapes: {e}", part.label);
                (None, part.shapes)
            }
        }
    });

    assemble(built)
}

/// Flattens programs and their shapes into the index-based draw list.
fn assemble<P>(parts: impl IntoIterator<Item = (Option<P>, Vec<Geometry>)>) -> Scene<P> {
    let mut scene = Scene {
        programs: Vec::new(),
        geometry: Vec::new(),
        draws: Vec::new(),
    };

    for (program, shapes) in parts {
        let Some(program) = program else { continue };

        let program_index = scene.programs.len();
        scene.programs.push(program);
        for shape in shapes {
            scene.draws.push(DrawPair::new(program_index, scene.geometry.len()));
            scene.geometry.push(shape);
        }
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_is_a_whole_triangle() {
        for part in parts() {
            for shape in &part.shapes {
                assert_eq!(shape.vertex_count(), Some(3), "{}", shape.label);
                assert_eq!(shape.layout, part.layout);
            }
        }
    }

    #[test]
    fn draws_point_at_their_own_program() {
        let scene = assemble(parts().into_iter().map(|p| (Some(p.label), p.shapes)));

        assert_eq!(scene.programs, vec!["vertex color", "pulse"]);
        assert_eq!(
            scene.draws,
            vec![DrawPair::new(0, 0), DrawPair::new(1, 1), DrawPair::new(1, 2)]
        );
    }

    #[test]
    fn failed_program_drops_only_its_shapes() {
        let scene = assemble(
            parts()
                .into_iter()
                .map(|p| ((p.label != "vertex color").then_some(p.label), p.shapes)),
        );

        assert_eq!(scene.programs, vec!["pulse"]);
        assert_eq!(scene.geometry.len(), 2);
        assert_eq!(scene.draws, vec![DrawPair::new(0, 0), DrawPair::new(0, 1)]);
    }
}
