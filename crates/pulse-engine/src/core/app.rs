use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use crate::render::RenderCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`Runtime`](crate::window::Runtime).
///
/// Call order: `on_gpu_ready` once, then any mix of `on_window_event`,
/// `on_resize` and `on_frame`, then `on_exit` exactly once before the device
/// is dropped.
pub trait App {
    /// The device and surface exist. Build GPU resources here.
    fn on_gpu_ready(&mut self, ctx: &RenderCtx<'_>) -> AppControl {
        let _ = ctx;
        AppControl::Continue
    }

    /// Every window event, before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Surface was reconfigured to `size` (physical pixels, may be zero).
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Last callback. Release GPU resources here.
    fn on_exit(&mut self) {}
}
