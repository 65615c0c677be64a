//! Contracts between the window runtime and applications.
//!
//! The runtime owns the platform loop; apps only see [`App`] callbacks and a
//! [`FrameCtx`] per frame.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub(crate) use ctx::logical_viewport;
pub use ctx::{FrameCtx, WindowCtx};
