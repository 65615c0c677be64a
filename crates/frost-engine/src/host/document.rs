use crate::coords::{BorderRadius, Rect, Viewport};

use super::ElementId;

/// Read/write access to the host element tree.
///
/// Only the operations the tracker needs are exposed. Implementations must
/// treat unknown ids gracefully (empty results, no-op writes).
pub trait Document {
    /// All elements currently connected to the document, in tree order.
    fn elements(&self) -> Vec<ElementId>;

    /// Descendants of `element` in tree order, excluding `element` itself.
    fn descendants(&self, element: ElementId) -> Vec<ElementId>;

    /// The element's class attribute (whitespace-separated tokens).
    fn class_name(&self, element: ElementId) -> String;

    /// `true` while the element is part of the document tree.
    fn is_connected(&self, element: ElementId) -> bool;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    fn remove_attribute(&mut self, element: ElementId, name: &str);

    /// Creates the effect canvas and inserts it as the body's first child.
    fn mount_canvas(&mut self) -> ElementId;
}

/// Live layout queries.
///
/// Results are never cached by the effect: every frame asks again, so scroll,
/// animation, and DOM edits are picked up immediately.
pub trait GeometryOracle {
    /// Bounding rectangle in logical viewport pixels, or `None` when the
    /// element has no layout box (detached or unknown).
    fn bounding_rect(&self, element: ElementId) -> Option<Rect>;

    /// Computed border radius.
    fn border_radius(&self, element: ElementId) -> BorderRadius;

    /// Logical inner size of the window.
    fn viewport_size(&self) -> Viewport;
}
