use crate::host::{Document, MutationRecord};

use super::TrackedRegions;

/// Observer state. `Processing` only exists for the duration of one batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ObserverState {
    Idle,
    Processing,
}

/// Applies host mutation batches to the tracked set.
///
/// Rules per record:
/// - added element: tracked if it carries the marker; its subtree is scanned
///   and every marked descendant is tracked as well
/// - `class` attribute change: the target is tracked if it now carries the
///   marker
///
/// Removals are never inferred here. An element that loses the marker or
/// leaves the document stays tracked until the next full reconciliation,
/// including one inserted and detached again within the same batch.
/// Other attribute names and text changes are ignored.
#[derive(Debug)]
pub struct DomObserver {
    state: ObserverState,
    connected: bool,
}

impl Default for DomObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl DomObserver {
    /// Creates a disconnected observer.
    pub fn new() -> Self {
        Self {
            state: ObserverState::Idle,
            connected: false,
        }
    }

    #[inline]
    pub fn state(&self) -> ObserverState {
        self.state
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn connect(&mut self) {
        if !self.connected {
            log::debug!("dom observer connected");
        }
        self.connected = true;
    }

    /// Stops reacting to batches. Pending batches delivered afterwards are dropped.
    pub fn disconnect(&mut self) {
        if self.connected {
            log::debug!("dom observer disconnected");
        }
        self.connected = false;
    }

    /// Processes one batch and returns how many elements were newly tracked.
    pub fn process<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        regions: &mut TrackedRegions,
        records: &[MutationRecord],
    ) -> usize {
        if !self.connected || records.is_empty() {
            return 0;
        }

        self.state = ObserverState::Processing;
        let mut added = 0;

        for record in records {
            match record {
                MutationRecord::ChildList { added: nodes, .. } => {
                    for &node in nodes {
                        if regions.add(doc, node) {
                            added += 1;
                        }
                        for descendant in doc.descendants(node) {
                            if regions.add(doc, descendant) {
                                added += 1;
                            }
                        }
                    }
                }
                MutationRecord::Attributes { target, name } if name == "class" => {
                    if regions.add(doc, *target) {
                        added += 1;
                    }
                }
                MutationRecord::Attributes { .. } | MutationRecord::CharacterData { .. } => {}
            }
        }

        self.state = ObserverState::Idle;

        if added > 0 {
            log::debug!(
                "mutation batch of {} record(s) tracked {added} element(s)",
                records.len()
            );
        }
        added
    }
}
