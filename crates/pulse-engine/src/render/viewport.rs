/// Drawable area in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Returns the component-wise minimum of both viewports.
    ///
    /// A render pass viewport must never exceed the attachment it draws into.
    #[inline]
    pub fn clamp_to(self, bounds: Viewport) -> Viewport {
        Viewport::new(self.width.min(bounds.width), self.height.min(bounds.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_viewport_is_invalid() {
        assert!(!Viewport::new(0, 600).is_valid());
        assert!(!Viewport::new(800, 0).is_valid());
        assert!(Viewport::new(800, 600).is_valid());
    }

    #[test]
    fn clamp_to_keeps_the_smaller_extent() {
        let v = Viewport::new(1024, 400).clamp_to(Viewport::new(800, 600));
        assert_eq!(v, Viewport::new(800, 400));
    }
}
