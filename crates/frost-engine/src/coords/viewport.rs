/// Window viewport size in logical pixels.
///
/// This is what the host reports as its inner window size; the canvas backing
/// store is derived from it by the resolution scale.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Backing-store size for `scale`: `ceil(dimension * scale)` on both axes.
    ///
    /// Negative or non-finite dimensions collapse to zero.
    #[inline]
    pub fn scaled_ceil(self, scale: f32) -> (u32, u32) {
        let w = (self.width * scale).ceil();
        let h = (self.height * scale).ceil();
        let clamp = |v: f32| if v.is_finite() && v > 0.0 { v as u32 } else { 0 };
        (clamp(w), clamp(h))
    }
}

/// Render-target viewport in device pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PixelViewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelViewport {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_ceil_rounds_up() {
        assert_eq!(Viewport::new(801.0, 601.0).scaled_ceil(0.5), (401, 301));
    }

    #[test]
    fn scaled_ceil_identity_at_unit_scale() {
        assert_eq!(Viewport::new(1280.0, 720.0).scaled_ceil(1.0), (1280, 720));
    }

    #[test]
    fn scaled_ceil_collapses_invalid() {
        assert_eq!(Viewport::new(-10.0, f32::NAN).scaled_ceil(1.0), (0, 0));
    }

    #[test]
    fn pixel_viewport_empty() {
        assert!(PixelViewport::new(0, 0, 0, 10).is_empty());
        assert!(!PixelViewport::new(0, 0, 1, 1).is_empty());
    }
}
