//! The blur-behind effect as one explicit context object.
//!
//! [`BlurEffect`] owns the tracked set, the mutation observer, the viewport
//! controller and (once the first region appears) the renderer. Hosts drive it
//! by forwarding three event sources, each running to completion before the
//! next: mutation batches, window resizes and frame callbacks.

mod context;
mod frame_loop;

pub use context::{BlurEffect, EffectStage};
pub use frame_loop::FrameLoop;
