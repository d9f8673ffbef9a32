/// One acquired swapchain image plus the encoder recording into it.
///
/// Dropping `surface_texture` after submission presents the image, so the
/// frame must be finalized through [`Gpu::submit`](super::Gpu::submit) before
/// the next one can be acquired.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
