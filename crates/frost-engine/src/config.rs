//! Effect configuration.
//!
//! The constants are the compiled-in defaults; `EffectConfig` carries them
//! through the effect so tests and hosts can build variants without globals.

use crate::coords::ColorRgba;

/// Base class that opts an element into the effect.
pub const MARKER_CLASS: &str = "frost";

/// Attribute holding the resolved blur strength of a tracked element.
pub const STRENGTH_ATTRIBUTE: &str = "data-frost-strength";

/// Canvas backing-store pixels per logical viewport pixel.
pub const DEFAULT_RESOLUTION_SCALE: f32 = 0.5;

/// Blur strength used when no valid suffix is present.
pub const DEFAULT_STRENGTH: f32 = 1.0;

/// Largest sample offset the kernel visits on either axis.
///
/// Bounds the per-pixel work at `(2 * 20 + 1)^2 = 1681` candidate samples.
pub const MAX_KERNEL_RADIUS: i32 = 20;

/// Device pixels added on every side of a region box.
pub const GUARD_BAND_PX: i32 = 1;

/// Color the canvas is cleared to before each frame.
pub const CLEAR_COLOR: ColorRgba = ColorRgba::transparent();

/// Texel of the 1x1 blur source texture (straight RGBA8).
///
/// The kernel samples this constant texture, not the content under the canvas.
pub const PLACEHOLDER_TEXEL: [u8; 4] = [255, 255, 255, 64];

/// Runtime view of the effect configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectConfig {
    /// Base marker class (`frost`); `frost-<n>` overrides the strength.
    pub marker: String,
    /// Attribute used to publish the resolved strength on tracked elements.
    pub strength_attribute: String,
    pub default_strength: f32,
    pub resolution_scale: f32,
    pub clear_color: ColorRgba,
    pub guard_band_px: i32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            marker: MARKER_CLASS.to_string(),
            strength_attribute: STRENGTH_ATTRIBUTE.to_string(),
            default_strength: DEFAULT_STRENGTH,
            resolution_scale: DEFAULT_RESOLUTION_SCALE,
            clear_color: CLEAR_COLOR,
            guard_band_px: GUARD_BAND_PX,
        }
    }
}
