//! Element tracking.
//!
//! Decides which elements receive the effect and keeps that decision current
//! as the document changes:
//! - [`Classifier`]: class tokens -> participation + blur strength
//! - [`TrackedRegions`]: the authoritative set of blurred elements
//! - [`DomObserver`]: applies batched mutation records to the set

mod classify;
mod observer;
mod regions;

pub use classify::{Classification, Classifier};
pub(crate) use classify::parse_strength;
pub use observer::{DomObserver, ObserverState};
pub use regions::{ReconcileSummary, RegionEntry, TrackedRegions};
