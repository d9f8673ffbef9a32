use std::fmt;

use thiserror::Error;

use crate::render::{ColorRgba, RenderCtx, RenderTarget, Viewport};
use crate::shader::ShaderProgram;

use super::animation::TimeUniform;
use super::geometry::{Geometry, GpuMesh};

/// Lifecycle phase of a [`FrameDriver`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DriverPhase {
    Unconfigured,
    Ready,
    Released,
}

impl fmt::Display for DriverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DriverPhase::Unconfigured => "unconfigured",
            DriverPhase::Ready => "ready",
            DriverPhase::Released => "released",
        })
    }
}

/// Contract violations reported by the frame driver.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("`{op}` called while the frame driver is {phase}")]
    InvalidState {
        op: &'static str,
        phase: DriverPhase,
    },

    #[error("invalid frame setup: {0}")]
    Setup(String),
}

/// Draw `geometry` with `program`; both are indices into the setup lists.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DrawPair {
    pub program: usize,
    pub geometry: usize,
}

impl DrawPair {
    pub const fn new(program: usize, geometry: usize) -> Self {
        Self { program, geometry }
    }
}

/// Frame driver configuration.
#[derive(Debug, Clone)]
pub struct FrameDriverConfig {
    /// Clear color for every frame.
    pub background: ColorRgba,
    /// Uniforms recomputed from elapsed time each frame.
    pub time_uniforms: Vec<TimeUniform>,
}

impl Default for FrameDriverConfig {
    fn default() -> Self {
        Self {
            background: ColorRgba::slate(),
            time_uniforms: Vec::new(),
        }
    }
}

struct Scene {
    programs: Vec<ShaderProgram>,
    meshes: Vec<GpuMesh>,
    draws: Vec<DrawPair>,
}

impl Scene {
    /// Releases in reverse acquisition order: buffers (created at setup)
    /// first, then programs (linked before setup).
    fn release(self) {
        let Scene {
            programs, meshes, ..
        } = self;

        for mesh in meshes.into_iter().rev() {
            mesh.destroy();
        }
        for program in programs.into_iter().rev() {
            program.destroy();
        }
    }
}

enum DriverState {
    Unconfigured,
    Ready(Scene),
    Released,
}

/// Owns draw-time GPU state and records one frame per call.
///
/// Lifecycle: `Unconfigured → Ready` via [`setup`](Self::setup), then
/// [`render_frame`](Self::render_frame) any number of times, then
/// [`release`](Self::release) into the terminal `Released` phase.
pub struct FrameDriver {
    config: FrameDriverConfig,
    state: DriverState,
    viewport: Option<Viewport>,
}

impl FrameDriver {
    pub fn new(config: FrameDriverConfig) -> Self {
        Self {
            config,
            state: DriverState::Unconfigured,
            viewport: None,
        }
    }

    pub fn phase(&self) -> DriverPhase {
        match self.state {
            DriverState::Unconfigured => DriverPhase::Unconfigured,
            DriverState::Ready(_) => DriverPhase::Ready,
            DriverState::Released => DriverPhase::Released,
        }
    }

    /// Programs owned by the driver, in setup order. Empty unless `Ready`.
    pub fn programs(&self) -> &[ShaderProgram] {
        match &self.state {
            DriverState::Ready(scene) => &scene.programs,
            _ => &[],
        }
    }

    /// Uploads `geometry`, takes ownership of `programs` and records `draws`.
    ///
    /// Must be called exactly once, before the first frame. Every pair must
    /// reference a program whose vertex layout equals the geometry's layout,
    /// and every drawn geometry must hold a non-zero multiple of three
    /// vertices. Nothing is uploaded when validation fails.
    pub fn setup(
        &mut self,
        ctx: &RenderCtx<'_>,
        geometry: Vec<Geometry>,
        programs: Vec<ShaderProgram>,
        draws: Vec<DrawPair>,
    ) -> Result<(), FrameError> {
        if !matches!(self.state, DriverState::Unconfigured) {
            return Err(FrameError::InvalidState {
                op: "setup",
                phase: self.phase(),
            });
        }

        let vertex_counts = validate_setup(&geometry, &programs, &draws)?;

        let meshes: Vec<GpuMesh> = geometry
            .iter()
            .zip(vertex_counts)
            .map(|(g, count)| GpuMesh::upload(ctx.device, g, count))
            .collect();

        log::info!(
            "frame driver ready: {} program(s), {} vertex buffer(s), {} draw(s)",
            programs.len(),
            meshes.len(),
            draws.len()
        );

        self.state = DriverState::Ready(Scene {
            programs,
            meshes,
            draws,
        });
        Ok(())
    }

    /// Viewport update forwarded from a surface resize. Zero sizes are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if viewport.is_valid() {
            self.viewport = Some(viewport);
        } else {
            log::debug!("ignoring zero-sized viewport {width}x{height}");
        }
    }

    /// Records one frame into `target`.
    ///
    /// Clears to the background color, then for each draw pair activates the
    /// program, pushes the time-dependent uniforms, binds the vertex buffer and
    /// draws its vertices as a triangle list. The pass is ended before
    /// returning, so no pipeline or buffer binding outlives the call.
    pub fn render_frame(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        elapsed_seconds: f32,
    ) -> Result<(), FrameError> {
        let DriverState::Ready(scene) = &mut self.state else {
            return Err(FrameError::InvalidState {
                op: "render_frame",
                phase: self.phase(),
            });
        };

        for program in &mut scene.programs {
            for tu in &self.config.time_uniforms {
                program.set_uniform(tu.uniform(), tu.evaluate(elapsed_seconds));
            }
            program.flush_uniforms(ctx.queue);
        }

        let mut rpass = target.clear_pass("pulse frame pass", self.config.background);

        if let Some(vp) = self.viewport.and_then(|v| ctx.fit_viewport(v)) {
            rpass.set_viewport(0.0, 0.0, vp.width as f32, vp.height as f32, 0.0, 1.0);
        }

        for pair in &scene.draws {
            let (Some(program), Some(mesh)) =
                (scene.programs.get(pair.program), scene.meshes.get(pair.geometry))
            else {
                continue;
            };

            program.use_program(&mut rpass);
            rpass.set_vertex_buffer(0, mesh.buffer().slice(..));
            rpass.draw(0..mesh.vertex_count(), 0..1);
        }

        Ok(())
    }

    /// Destroys every buffer and program. A second call does nothing.
    pub fn release(&mut self) {
        match std::mem::replace(&mut self.state, DriverState::Released) {
            DriverState::Ready(scene) => {
                scene.release();
                log::info!("frame driver released");
            }
            DriverState::Unconfigured => {
                log::debug!("frame driver released before setup; nothing to free");
            }
            DriverState::Released => {
                log::debug!("frame driver already released");
            }
        }
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(FrameDriverConfig::default())
    }
}

/// Returns the vertex count of every geometry entry, in order.
fn validate_setup(
    geometry: &[Geometry],
    programs: &[ShaderProgram],
    draws: &[DrawPair],
) -> Result<Vec<u32>, FrameError> {
    let mut counts = Vec::with_capacity(geometry.len());
    for g in geometry {
        g.layout
            .validate()
            .map_err(|e| FrameError::Setup(format!("geometry `{}`: {e}", g.label)))?;
        let count = g.vertex_count().ok_or_else(|| {
            FrameError::Setup(format!(
                "geometry `{}` holds {} floats, not a whole number of {}-byte vertices",
                g.label,
                g.vertices.len(),
                g.layout.stride
            ))
        })?;
        counts.push(count);
    }

    for pair in draws {
        let program = programs.get(pair.program).ok_or_else(|| {
            FrameError::Setup(format!("draw references missing program {}", pair.program))
        })?;
        let g = geometry.get(pair.geometry).ok_or_else(|| {
            FrameError::Setup(format!("draw references missing geometry {}", pair.geometry))
        })?;

        if program.vertex_layout() != &g.layout {
            return Err(FrameError::Setup(format!(
                "program `{}` was linked for a different vertex layout than geometry `{}`",
                program.label(),
                g.label
            )));
        }

        let count = counts[pair.geometry];
        if count == 0 || count % 3 != 0 {
            return Err(FrameError::Setup(format!(
                "geometry `{}` has {count} vertices; a triangle list needs a non-zero multiple of 3",
                g.label
            )));
        }
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use super::*;
    use crate::render::VertexLayout;
    use crate::shader::{ProgramDesc, UniformValue};
    use crate::testing::{self, TEST_FORMAT};

    const SIZE: u32 = 64;

    fn triangle(layout: VertexLayout) -> Geometry {
        let floats = layout.stride as usize / 4;
        Geometry::new("triangle", vec![0.0; floats * 3], layout)
    }

    fn pulse_program(device: &wgpu::Device, layout: &VertexLayout) -> ShaderProgram {
        ShaderProgram::from_sources(
            device,
            &testing::pulse_vs(),
            &testing::pulse_fs(),
            &ProgramDesc {
                label: "pulse",
                vertex_layout: layout,
                target_format: TEST_FORMAT,
            },
        )
        .unwrap()
    }

    fn color_program(device: &wgpu::Device, layout: &VertexLayout) -> ShaderProgram {
        ShaderProgram::from_sources(
            device,
            &testing::color_vs(),
            &testing::color_fs(),
            &ProgramDesc {
                label: "color",
                vertex_layout: layout,
                target_format: TEST_FORMAT,
            },
        )
        .unwrap()
    }

    fn render(
        driver: &mut FrameDriver,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        elapsed: f32,
    ) -> Result<(), FrameError> {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("test target"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEST_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("test encoder"),
        });

        let ctx = RenderCtx::new(device, queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));
        let result = {
            let mut target = RenderTarget::new(&mut encoder, &view);
            driver.render_frame(&ctx, &mut target, elapsed)
        };
        queue.submit(std::iter::once(encoder.finish()));
        result
    }

    fn green(driver: &FrameDriver, program: usize) -> f32 {
        match driver.programs()[program].uniform_value("our_color") {
            Some(UniformValue::Vec4(c)) => c[1],
            other => panic!("expected our_color to be a vec4, got {other:?}"),
        }
    }

    fn pulsing_driver() -> FrameDriver {
        FrameDriver::new(FrameDriverConfig {
            time_uniforms: vec![TimeUniform::green_pulse("our_color")],
            ..Default::default()
        })
    }

    // ── state machine ─────────────────────────────────────────────────────

    #[test]
    fn new_driver_is_unconfigured() {
        let driver = FrameDriver::default();
        assert_eq!(driver.phase(), DriverPhase::Unconfigured);
        assert!(driver.programs().is_empty());
    }

    #[test]
    fn render_before_setup_is_rejected() {
        let (device, queue) = testing::headless_device();
        let mut driver = FrameDriver::default();

        let err = render(&mut driver, &device, &queue, 0.0).unwrap_err();
        assert!(matches!(
            err,
            FrameError::InvalidState { op: "render_frame", phase: DriverPhase::Unconfigured }
        ));
    }

    #[test]
    fn release_twice_is_idempotent() {
        let mut driver = FrameDriver::default();
        driver.release();
        driver.release();
        assert_eq!(driver.phase(), DriverPhase::Released);
    }

    #[test]
    fn ready_driver_releases_once_and_stays_released() {
        let (device, queue) = testing::headless_device();
        let layout = VertexLayout::position();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));

        let mut driver = FrameDriver::default();
        driver
            .setup(&ctx, vec![triangle(layout.clone())], vec![pulse_program(&device, &layout)], vec![DrawPair::new(0, 0)])
            .unwrap();
        assert_eq!(driver.phase(), DriverPhase::Ready);

        driver.release();
        driver.release();
        assert_eq!(driver.phase(), DriverPhase::Released);
        assert!(driver.programs().is_empty());
        assert!(render(&mut driver, &device, &queue, 0.0).is_err());
    }

    #[test]
    fn second_setup_is_rejected() {
        let (device, queue) = testing::headless_device();
        let layout = VertexLayout::position();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));

        let mut driver = FrameDriver::default();
        driver.setup(&ctx, Vec::new(), Vec::new(), Vec::new()).unwrap();

        let err = driver
            .setup(&ctx, vec![triangle(layout)], Vec::new(), Vec::new())
            .unwrap_err();
        assert!(matches!(err, FrameError::InvalidState { op: "setup", phase: DriverPhase::Ready }));
    }

    // ── setup validation ──────────────────────────────────────────────────

    #[test]
    fn layout_mismatch_is_rejected() {
        let (device, queue) = testing::headless_device();
        let layout = VertexLayout::position();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));

        let mut driver = FrameDriver::default();
        let err = driver
            .setup(
                &ctx,
                vec![triangle(VertexLayout::position_color())],
                vec![pulse_program(&device, &layout)],
                vec![DrawPair::new(0, 0)],
            )
            .unwrap_err();
        assert!(matches!(err, FrameError::Setup(_)));
        assert_eq!(driver.phase(), DriverPhase::Unconfigured);
    }

    #[test]
    fn non_triangle_vertex_count_is_rejected() {
        let (device, queue) = testing::headless_device();
        let layout = VertexLayout::position();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));

        let mut driver = FrameDriver::default();
        let err = driver
            .setup(
                &ctx,
                vec![Geometry::new("quad-ish", vec![0.0; 12], layout.clone())],
                vec![pulse_program(&device, &layout)],
                vec![DrawPair::new(0, 0)],
            )
            .unwrap_err();
        assert!(err.to_string().contains("multiple of 3"));
    }

    #[test]
    fn dangling_pair_is_rejected() {
        let (device, queue) = testing::headless_device();
        let layout = VertexLayout::position();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));

        let mut driver = FrameDriver::default();
        let err = driver
            .setup(&ctx, vec![triangle(layout)], Vec::new(), vec![DrawPair::new(0, 0)])
            .unwrap_err();
        assert!(err.to_string().contains("missing program"));
    }

    // ── time-dependent uniforms ───────────────────────────────────────────

    #[test]
    fn pulse_uniform_follows_elapsed_time() {
        let (device, queue) = testing::headless_device();
        let layout = VertexLayout::position();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));

        let mut driver = pulsing_driver();
        driver
            .setup(&ctx, vec![triangle(layout.clone())], vec![pulse_program(&device, &layout)], vec![DrawPair::new(0, 0)])
            .unwrap();

        render(&mut driver, &device, &queue, 0.0).unwrap();
        assert!((green(&driver, 0) - 0.5).abs() < 1e-5);

        render(&mut driver, &device, &queue, PI).unwrap();
        assert!((green(&driver, 0) - 0.5).abs() < 1e-5);

        render(&mut driver, &device, &queue, FRAC_PI_2).unwrap();
        assert!((green(&driver, 0) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shapes_pulse_in_sync_and_undeclared_programs_are_untouched() {
        let (device, queue) = testing::headless_device();
        let pos = VertexLayout::position();
        let pos_color = VertexLayout::position_color();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(SIZE, SIZE));

        let mut driver = pulsing_driver();
        driver.set_viewport(SIZE * 2, SIZE / 2);
        driver
            .setup(
                &ctx,
                vec![triangle(pos.clone()), triangle(pos.clone()), triangle(pos_color.clone())],
                vec![
                    pulse_program(&device, &pos),
                    pulse_program(&device, &pos),
                    color_program(&device, &pos_color),
                ],
                vec![DrawPair::new(0, 0), DrawPair::new(1, 1), DrawPair::new(2, 2)],
            )
            .unwrap();

        render(&mut driver, &device, &queue, 1.25).unwrap();
        assert_eq!(green(&driver, 0), green(&driver, 1));
        assert_eq!(driver.programs()[2].uniform_value("our_color"), None);
    }
}
