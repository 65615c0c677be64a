use crate::coords::{ColorRgba, PixelViewport};

use super::InitError;
use super::RenderError;

/// Per-region kernel inputs for one draw of the full-screen quad.
///
/// All values are in device pixels with a bottom-left origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegionDraw {
    /// `(cx, cy, hw, hh)`; `hh == 0` marks a circle of radius `hw`.
    pub shape: [f32; 4],
    pub corner_radius: f32,
    /// Canvas backing-store size.
    pub resolution: [f32; 2],
    pub strength: f32,
}

impl RegionDraw {
    #[inline]
    pub fn is_circle(&self) -> bool {
        self.shape[3] == 0.0
    }
}

/// The GPU capability the render pipeline drives.
///
/// A backend owns the compiled program, the static quad buffers, the blur
/// source texture and the canvas backing store. Calls arrive in the order
/// `begin_frame`, `draw_region`*, `end_frame`; `resize_canvas` and
/// `set_viewport` happen between frames.
pub trait GpuBackend {
    /// Sets the canvas backing-store size in device pixels.
    fn resize_canvas(&mut self, width: u32, height: u32);

    fn set_viewport(&mut self, viewport: PixelViewport);

    /// Starts a frame; the canvas is cleared to `clear`.
    fn begin_frame(&mut self, clear: ColorRgba) -> Result<(), RenderError>;

    /// Draws the quad once with the kernel clipped to the region's shape.
    fn draw_region(&mut self, draw: &RegionDraw) -> Result<(), RenderError>;

    /// Submits the frame.
    fn end_frame(&mut self) -> Result<(), RenderError>;
}

/// Deferred backend construction.
///
/// Called at most once per effect, when the first region appears.
pub trait BackendFactory {
    type Backend: GpuBackend;

    fn create(&mut self) -> Result<Self::Backend, InitError>;
}

impl<B, F> BackendFactory for F
where
    B: GpuBackend,
    F: FnMut() -> Result<B, InitError>,
{
    type Backend = B;

    fn create(&mut self) -> Result<B, InitError> {
        self()
    }
}
