use std::collections::HashMap;

use crate::host::{Document, ElementId};

use super::Classifier;

/// One published region: element identity plus the strength captured when
/// it was first tracked.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RegionEntry {
    pub element: ElementId,
    pub strength: f32,
}

/// Outcome of a full reconciliation pass.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct ReconcileSummary {
    pub added: usize,
    pub removed: usize,
}

impl ReconcileSummary {
    #[inline]
    pub fn changed(self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Authoritative set of elements currently receiving the effect.
///
/// Each element appears at most once. Its strength is resolved once, on
/// insertion, and mirrored into the strength attribute so the renderer can
/// read it back without reclassifying. Later edits to the suffix class are not
/// picked up until the element leaves the set and is added again.
///
/// Iteration order is insertion order.
#[derive(Debug, Clone)]
pub struct TrackedRegions {
    classifier: Classifier,
    attribute: String,
    strengths: HashMap<ElementId, f32>,
    order: Vec<ElementId>,
}

impl TrackedRegions {
    pub fn new(classifier: Classifier, attribute: impl Into<String>) -> Self {
        Self {
            classifier,
            attribute: attribute.into(),
            strengths: HashMap::new(),
            order: Vec::new(),
        }
    }

    #[inline]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    #[inline]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn contains(&self, element: ElementId) -> bool {
        self.strengths.contains_key(&element)
    }

    /// Strength captured for `element`, if tracked.
    #[inline]
    pub fn strength(&self, element: ElementId) -> Option<f32> {
        self.strengths.get(&element).copied()
    }

    /// Tracked elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.order.iter().copied()
    }

    /// Ordered copy handed to the renderer.
    pub fn snapshot(&self) -> Vec<RegionEntry> {
        self.order
            .iter()
            .map(|&element| RegionEntry {
                element,
                strength: self.strengths.get(&element).copied().unwrap_or_default(),
            })
            .collect()
    }

    /// Starts tracking `element`.
    ///
    /// Returns `false` without touching the document when the element is
    /// already tracked or does not carry the marker.
    pub fn add<D: Document + ?Sized>(&mut self, doc: &mut D, element: ElementId) -> bool {
        if self.contains(element) {
            return false;
        }

        let class = self.classifier.classify(&doc.class_name(element));
        if !class.participates {
            return false;
        }

        doc.set_attribute(element, &self.attribute, &class.strength.to_string());
        self.strengths.insert(element, class.strength);
        self.order.push(element);

        log::debug!("tracking {element:?} with strength {}", class.strength);
        true
    }

    /// Stops tracking `element` and removes its strength attribute.
    ///
    /// Returns `false` when the element was not tracked.
    pub fn remove<D: Document + ?Sized>(&mut self, doc: &mut D, element: ElementId) -> bool {
        if self.strengths.remove(&element).is_none() {
            return false;
        }
        self.order.retain(|&e| e != element);
        doc.remove_attribute(element, &self.attribute);

        log::debug!("untracked {element:?}");
        true
    }

    /// Full rescan.
    ///
    /// Every connected element carrying the marker ends up tracked; every
    /// tracked element that lost the marker or left the document is removed.
    /// This is the only path that shrinks the set without an explicit removal.
    pub fn reconcile_all<D: Document + ?Sized>(&mut self, doc: &mut D) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        for element in doc.elements() {
            if self.classifier.participates(&doc.class_name(element)) && self.add(doc, element) {
                summary.added += 1;
            }
        }

        let stale: Vec<ElementId> = self
            .order
            .iter()
            .copied()
            .filter(|&e| {
                !doc.is_connected(e) || !self.classifier.participates(&doc.class_name(e))
            })
            .collect();

        for element in stale {
            if self.remove(doc, element) {
                summary.removed += 1;
            }
        }

        if summary.changed() {
            log::debug!(
                "reconciled: +{} -{} ({} tracked)",
                summary.added,
                summary.removed,
                self.len()
            );
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{Rect, Viewport};
    use crate::host::MemoryDocument;

    const ATTR: &str = "data-frost-strength";

    fn setup() -> (MemoryDocument, TrackedRegions) {
        let doc = MemoryDocument::new(Viewport::new(800.0, 600.0));
        let regions = TrackedRegions::new(Classifier::new("frost", 1.0), ATTR);
        (doc, regions)
    }

    fn attach(doc: &mut MemoryDocument, class: &str) -> ElementId {
        let el = doc.create_with("div", class, Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.append_child(doc.body(), el);
        el
    }

    #[test]
    fn add_records_strength_attribute() {
        let (mut doc, mut regions) = setup();
        let el = attach(&mut doc, "frost-7.5");

        assert!(regions.add(&mut doc, el));
        assert_eq!(regions.strength(el), Some(7.5));
        assert_eq!(doc.attribute(el, ATTR).as_deref(), Some("7.5"));
    }

    #[test]
    fn add_is_idempotent_and_keeps_first_strength() {
        let (mut doc, mut regions) = setup();
        let el = attach(&mut doc, "frost-3");

        assert!(regions.add(&mut doc, el));
        doc.set_class_name(el, "frost-9");
        assert!(!regions.add(&mut doc, el));

        assert_eq!(regions.len(), 1);
        assert_eq!(regions.strength(el), Some(3.0));
        assert_eq!(doc.attribute(el, ATTR).as_deref(), Some("3"));
    }

    #[test]
    fn add_refuses_unmarked_elements() {
        let (mut doc, mut regions) = setup();
        let el = attach(&mut doc, "card");

        assert!(!regions.add(&mut doc, el));
        assert!(regions.is_empty());
        assert_eq!(doc.attribute(el, ATTR), None);
    }

    #[test]
    fn remove_clears_attribute() {
        let (mut doc, mut regions) = setup();
        let el = attach(&mut doc, "frost");
        regions.add(&mut doc, el);

        assert!(regions.remove(&mut doc, el));
        assert!(!regions.remove(&mut doc, el));
        assert!(!regions.contains(el));
        assert_eq!(doc.attribute(el, ATTR), None);
    }

    #[test]
    fn reconcile_tracks_marked_and_ignores_others() {
        let (mut doc, mut regions) = setup();
        let a = attach(&mut doc, "frost-7.5");
        let b = attach(&mut doc, "frost-abc");
        let c = attach(&mut doc, "frost");
        let plain = attach(&mut doc, "panel frosted");

        let summary = regions.reconcile_all(&mut doc);
        assert_eq!((summary.added, summary.removed), (3, 0));
        assert_eq!(regions.strength(a), Some(7.5));
        assert_eq!(regions.strength(b), Some(1.0));
        assert_eq!(regions.strength(c), Some(1.0));
        assert!(!regions.contains(plain));

        assert_eq!(regions.reconcile_all(&mut doc), ReconcileSummary::default());
    }

    #[test]
    fn reconcile_removes_stripped_elements() {
        let (mut doc, mut regions) = setup();
        let el = attach(&mut doc, "card frost-2");
        regions.reconcile_all(&mut doc);

        doc.remove_class(el, "frost-2");
        let summary = regions.reconcile_all(&mut doc);

        assert_eq!((summary.added, summary.removed), (0, 1));
        assert!(!regions.contains(el));
        assert_eq!(doc.attribute(el, ATTR), None);
    }

    #[test]
    fn reconcile_removes_detached_elements() {
        let (mut doc, mut regions) = setup();
        let el = attach(&mut doc, "frost");
        regions.reconcile_all(&mut doc);

        doc.remove(el);
        assert_eq!(regions.reconcile_all(&mut doc).removed, 1);
        assert!(regions.is_empty());
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let (mut doc, mut regions) = setup();
        let a = attach(&mut doc, "frost-2");
        let b = attach(&mut doc, "frost-4");
        regions.add(&mut doc, b);
        regions.add(&mut doc, a);

        let snap: Vec<(ElementId, f32)> = regions
            .snapshot()
            .into_iter()
            .map(|e| (e.element, e.strength))
            .collect();
        assert_eq!(snap, vec![(b, 4.0), (a, 2.0)]);
    }
}
