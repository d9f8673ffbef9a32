/// Linear RGBA color.
///
/// Used for clear values. Components are passed to the GPU unchanged; sRGB
/// conversion is left to the surface format.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Dark teal used as the default frame background.
    #[inline]
    pub const fn slate() -> Self {
        Self::new(0.2, 0.3, 0.3, 1.0)
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}
