//! Coordinate and geometry types shared by the tracker, the renderer and hosts.
//!
//! Two spaces are in play:
//! - logical viewport pixels: top-left origin, +Y down (layout space)
//! - device pixels: canvas backing-store pixels after the resolution scale;
//!   the blur kernel sees them with a bottom-left origin

mod color;
mod radius;
mod rect;
mod vec2;
mod viewport;

pub use color::ColorRgba;
pub use radius::BorderRadius;
pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::{PixelViewport, Viewport};
