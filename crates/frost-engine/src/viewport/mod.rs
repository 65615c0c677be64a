//! Canvas sizing.
//!
//! The canvas backing store is the logical window size times the resolution
//! scale, rounded up. [`ViewportController`] owns that scale and pushes the
//! resulting size to the GPU backend.

mod controller;

pub use controller::{ScaleError, ViewportController, ViewportState};
