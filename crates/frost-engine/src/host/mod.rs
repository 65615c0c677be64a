//! Host collaborators.
//!
//! The effect never owns page elements, layout, or the event loop. Hosts
//! expose them through the traits in this module:
//! - [`Document`]: element tree, classes and attributes, canvas mounting
//! - [`GeometryOracle`]: live layout queries, evaluated every frame
//! - [`FrameScheduler`]: the "call me on the next display refresh" primitive
//!
//! [`MemoryDocument`] is a complete in-memory host used by the studio demo and
//! by tests.

mod document;
mod element;
mod memory;
mod mutation;
mod scheduler;

pub use document::{Document, GeometryOracle};
pub use element::ElementId;
pub use memory::MemoryDocument;
pub use mutation::MutationRecord;
pub use scheduler::{FrameScheduler, FrameSignal};
