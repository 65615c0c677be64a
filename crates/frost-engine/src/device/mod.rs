//! GPU device and window surface.
//!
//! - creates the wgpu Instance/Adapter/Device/Queue for a window
//! - configures the surface and reconfigures it on resize or loss
//! - hands out one encoder + view per frame

mod context;
mod init;
mod surface;

pub use context::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
