use super::{ColorRgba, Viewport};

/// Device handles plus what a pipeline needs to know about its target.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Drawable size in physical pixels.
    pub viewport: Viewport,
}

impl<'a> RenderCtx<'a> {
    #[inline]
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        Self {
            device,
            queue,
            surface_format,
            viewport,
        }
    }

    /// `requested` limited to the drawable area, or `None` when nothing of it
    /// is drawable.
    pub fn fit_viewport(&self, requested: Viewport) -> Option<Viewport> {
        Some(requested.clamp_to(self.viewport)).filter(|v| v.is_valid())
    }
}

/// Encoder and color attachment for one frame.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    /// Opens a pass on the color attachment that starts by clearing it to
    /// `color`. The pass ends when the returned value is dropped.
    pub fn clear_pass(&mut self, label: &str, color: ColorRgba) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, TEST_FORMAT};

    #[test]
    fn oversized_viewport_is_fitted_to_the_target() {
        let (device, queue) = testing::headless_device();
        let ctx = RenderCtx::new(&device, &queue, TEST_FORMAT, Viewport::new(800, 600));

        assert_eq!(ctx.fit_viewport(Viewport::new(1024, 400)), Some(Viewport::new(800, 400)));
        assert_eq!(ctx.fit_viewport(Viewport::new(0, 400)), None);
    }
}
