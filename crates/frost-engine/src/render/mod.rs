//! Region rendering.
//!
//! [`RegionRenderer`] turns the published region snapshot into one kernel
//! draw per region every frame. It talks to the GPU only through
//! [`GpuBackend`]; [`gpu::WgpuBackend`] is the real implementation.
//!
//! Convention:
//! - layout rectangles arrive in logical pixels, top-left origin
//! - kernel inputs are device pixels, bottom-left origin

mod backend;
mod ctx;
mod error;
pub mod gpu;
pub mod kernel;
mod pipeline;
pub mod shape;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::{BackendFactory, GpuBackend, RegionDraw};
pub use ctx::{RenderCtx, RenderTarget};
pub use error::{InitError, RenderError};
pub use pipeline::{FrameStats, RegionRenderer};
pub use shape::{PixelBox, RegionShape};
