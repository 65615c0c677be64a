use thiserror::Error;

use crate::coords::{PixelViewport, Viewport};
use crate::render::GpuBackend;

/// Rejected resolution scale.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ScaleError {
    #[error("resolution scale must be finite and greater than zero, got {0}")]
    Invalid(f32),
}

/// Scale plus the canvas size it produced, read once per frame by the renderer.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub scale: f32,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl ViewportState {
    #[inline]
    pub fn canvas_size(self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    #[inline]
    pub fn pixel_viewport(self) -> PixelViewport {
        PixelViewport::new(0, 0, self.canvas_width, self.canvas_height)
    }
}

/// Owns the resolution scale and derives the canvas size from it.
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
}

impl ViewportController {
    /// Controller with no canvas size yet; `resize` establishes it.
    pub fn new(scale: f32) -> Result<Self, ScaleError> {
        validate(scale)?;
        Ok(Self {
            state: ViewportState {
                scale,
                canvas_width: 0,
                canvas_height: 0,
            },
        })
    }

    #[inline]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    /// Recomputes the canvas size for `logical` and applies it to `target`.
    ///
    /// The backend gets the new backing-store size and a viewport covering
    /// all of it. With no target only the state changes.
    pub fn resize<B>(&mut self, target: Option<&mut B>, logical: Viewport) -> ViewportState
    where
        B: GpuBackend + ?Sized,
    {
        let (w, h) = logical.scaled_ceil(self.state.scale);
        self.state.canvas_width = w;
        self.state.canvas_height = h;

        if let Some(backend) = target {
            backend.resize_canvas(w, h);
            backend.set_viewport(self.state.pixel_viewport());
        }

        log::debug!(
            "viewport {}x{} @ {} -> canvas {w}x{h}",
            logical.width,
            logical.height,
            self.state.scale
        );
        self.state
    }

    /// Replaces the scale and resizes immediately against `logical`.
    ///
    /// An invalid scale leaves the controller untouched.
    pub fn set_resolution_scale<B>(
        &mut self,
        target: Option<&mut B>,
        scale: f32,
        logical: Viewport,
    ) -> Result<ViewportState, ScaleError>
    where
        B: GpuBackend + ?Sized,
    {
        validate(scale)?;
        self.state.scale = scale;
        Ok(self.resize(target, logical))
    }
}

fn validate(scale: f32) -> Result<(), ScaleError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(ScaleError::Invalid(scale))
    }
}
