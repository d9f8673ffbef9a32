use pulse_engine::core::{App, AppControl, FrameCtx};
use pulse_engine::frame::FrameDriver;
use pulse_engine::render::RenderCtx;
use pulse_engine::window::is_escape_press;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use crate::config::DemoConfig;
use crate::scene;

/// Draws the triangle scene until Escape or close.
pub struct PulseApp {
    config: DemoConfig,
    driver: FrameDriver,
}

impl PulseApp {
    pub fn new(config: DemoConfig) -> Self {
        let driver = FrameDriver::new(config.driver.clone());
        Self { config, driver }
    }
}

impl App for PulseApp {
    fn on_gpu_ready(&mut self, ctx: &RenderCtx<'_>) -> AppControl {
        log::info!("loading shaders from {}", self.config.shader_dir.display());
        let scene = scene::load(ctx, &self.config.shader_dir);

        if let Err(e) = self
            .driver
            .setup(ctx, scene.geometry, scene.programs, scene.draws)
        {
            log::error!("{e}");
            return AppControl::Exit;
        }

        self.driver.set_viewport(ctx.viewport.width, ctx.viewport.height);
        AppControl::Continue
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if is_escape_press(event) {
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        self.driver.set_viewport(size.width, size.height);
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let elapsed = ctx.time.elapsed;
        let driver = &mut self.driver;
        let mut result = Ok(());

        let control = ctx.render(|rctx, target| {
            result = driver.render_frame(rctx, target, elapsed);
        });

        if let Err(e) = result {
            log::error!("{e}");
            return AppControl::Exit;
        }
        control
    }

    fn on_exit(&mut self) {
        self.driver.release();
    }
}
