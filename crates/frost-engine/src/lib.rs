//! GPU blur-behind effect for document-like hosts.
//!
//! Elements opt in with the `frost` class (optionally `frost-<strength>`).
//! The effect tracks them, follows document mutations, and every frame draws
//! a gaussian-blurred, shape-clipped region for each one into a canvas that
//! the host composites over its content.
//!
//! Layers:
//! - [`host`]: traits the embedding document/layout/scheduler implements
//! - [`tracking`]: classification, the tracked set, the mutation observer
//! - [`render`]: per-frame region pipeline and the wgpu backend
//! - [`viewport`]: canvas sizing from the resolution scale
//! - [`effect`]: [`effect::BlurEffect`], the context tying it all together
//! - [`device`], [`window`], [`core`]: a winit/wgpu runtime for native hosts

pub mod config;
pub mod coords;
pub mod core;
pub mod device;
pub mod effect;
pub mod host;
pub mod logging;
pub mod render;
pub mod time;
pub mod tracking;
pub mod viewport;
pub mod window;
