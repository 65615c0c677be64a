/// Computed border radius of an element, as reported by the geometry oracle.
///
/// Only the uniform case is modelled; hosts with per-corner radii report the
/// top-left value.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BorderRadius {
    /// Absolute radius in logical pixels.
    Px(f32),
    /// Radius as a percentage of the element box (`50.0` means `50%`).
    Percent(f32),
}

impl BorderRadius {
    /// `true` when the radius turns the element into a circle (`>= 50%`).
    #[inline]
    pub fn is_circular(self) -> bool {
        matches!(self, BorderRadius::Percent(p) if p >= 50.0)
    }

    /// Resolves the radius to logical pixels for a box of the given size.
    ///
    /// Percentages resolve against the shorter side. Negative and non-finite
    /// values resolve to zero.
    #[inline]
    pub fn to_px(self, width: f32, height: f32) -> f32 {
        let px = match self {
            BorderRadius::Px(v) => v,
            BorderRadius::Percent(p) => p / 100.0 * width.min(height),
        };
        if px.is_finite() { px.max(0.0) } else { 0.0 }
    }
}

impl Default for BorderRadius {
    fn default() -> Self {
        BorderRadius::Px(0.0)
    }
}
