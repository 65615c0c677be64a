//! wgpu implementation of the render backend.
//!
//! - [`WgpuBackend`]: blur program, static quad, placeholder source texture,
//!   and the offscreen canvas the regions are drawn into
//! - [`CanvasPresenter`]: composites that canvas over a window surface

mod blur;
mod common;
mod present;

pub use blur::{CanvasView, WgpuBackend, WgpuBackendFactory, blur_shader_source, validate_program};
pub use present::CanvasPresenter;
