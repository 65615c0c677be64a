use super::ElementId;

/// One change reported by the host's subtree observation.
///
/// Hosts deliver records in batches; the order inside a batch is the order
/// the changes happened.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationRecord {
    /// Children of `target` were inserted and/or removed.
    ChildList {
        target: ElementId,
        added: Vec<ElementId>,
        removed: Vec<ElementId>,
    },
    /// Attribute `name` of `target` changed.
    Attributes { target: ElementId, name: String },
    /// Text content under `target` changed.
    CharacterData { target: ElementId },
}

impl MutationRecord {
    #[inline]
    pub fn target(&self) -> ElementId {
        match self {
            MutationRecord::ChildList { target, .. }
            | MutationRecord::Attributes { target, .. }
            | MutationRecord::CharacterData { target } => *target,
        }
    }
}
