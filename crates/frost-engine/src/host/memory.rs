use std::collections::{BTreeMap, HashMap};

use crate::coords::{BorderRadius, Rect, Viewport};

use super::{Document, ElementId, GeometryOracle, MutationRecord};

/// In-memory element tree implementing [`Document`] and [`GeometryOracle`].
///
/// There is no layout engine: each element carries the rectangle and border
/// radius the caller assigns, and the oracle reports them verbatim while the
/// element is connected.
///
/// Mutation reporting mirrors a subtree observer on the body configured for
/// child-list and attribute changes: only changes whose target is connected
/// are queued, and [`take_records`](Self::take_records) drains the batch.
#[derive(Debug)]
pub struct MemoryDocument {
    nodes: HashMap<ElementId, Node>,
    body: ElementId,
    next_id: u64,
    records: Vec<MutationRecord>,
    viewport: Viewport,
}

#[derive(Debug)]
struct Node {
    tag: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    attributes: BTreeMap<String, String>,
    rect: Rect,
    radius: BorderRadius,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            rect: Rect::default(),
            radius: BorderRadius::default(),
        }
    }
}

impl MemoryDocument {
    /// Creates a document containing only `<body>`, sized to `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        let body = ElementId::from_raw(1);
        let mut root = Node::new("body");
        root.rect = Rect::new(0.0, 0.0, viewport.width, viewport.height);

        let mut nodes = HashMap::new();
        nodes.insert(body, root);

        Self {
            nodes,
            body,
            next_id: 2,
            records: Vec::new(),
            viewport,
        }
    }

    #[inline]
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId::from_raw(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, Node::new(tag));
        id
    }

    /// Creates a detached element with the given class attribute and box.
    pub fn create_with(&mut self, tag: &str, class_name: &str, rect: Rect) -> ElementId {
        let id = self.create_element(tag);
        if let Some(node) = self.nodes.get_mut(&id) {
            if !class_name.is_empty() {
                node.attributes.insert("class".to_string(), class_name.to_string());
            }
            node.rect = rect;
        }
        id
    }

    /// Appends `child` as the last child of `parent`, moving it if attached elsewhere.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_child(parent, child, false);
    }

    /// Inserts `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_child(parent, child, true);
    }

    /// Detaches `element` (and its subtree) from its parent.
    pub fn remove(&mut self, element: ElementId) {
        let Some(parent) = self.nodes.get(&element).and_then(|n| n.parent) else {
            return;
        };
        let parent_connected = self.is_connected(parent);

        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|&c| c != element);
        }
        if let Some(n) = self.nodes.get_mut(&element) {
            n.parent = None;
        }

        if parent_connected {
            self.records.push(MutationRecord::ChildList {
                target: parent,
                added: Vec::new(),
                removed: vec![element],
            });
        }
    }

    /// Replaces the class attribute.
    pub fn set_class_name(&mut self, element: ElementId, class_name: &str) {
        self.set_attribute(element, "class", class_name);
    }

    /// Adds a class token if it is not present yet.
    pub fn add_class(&mut self, element: ElementId, token: &str) {
        let current = self.class_name(element);
        if current.split_whitespace().any(|t| t == token) {
            return;
        }
        let next = if current.trim().is_empty() {
            token.to_string()
        } else {
            format!("{} {token}", current.trim())
        };
        self.set_attribute(element, "class", &next);
    }

    /// Removes every occurrence of a class token.
    pub fn remove_class(&mut self, element: ElementId, token: &str) {
        let current = self.class_name(element);
        if !current.split_whitespace().any(|t| t == token) {
            return;
        }
        let next: Vec<&str> = current.split_whitespace().filter(|t| *t != token).collect();
        self.set_attribute(element, "class", &next.join(" "));
    }

    /// Sets the layout box reported by the oracle. Not an observed mutation.
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.rect = rect;
        }
    }

    pub fn rect(&self, element: ElementId) -> Option<Rect> {
        self.nodes.get(&element).map(|n| n.rect)
    }

    /// Sets the computed border radius. Not an observed mutation.
    pub fn set_border_radius(&mut self, element: ElementId, radius: BorderRadius) {
        if let Some(node) = self.nodes.get_mut(&element) {
            node.radius = radius;
        }
    }

    /// Resizes the window; the body box follows.
    pub fn set_viewport_size(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(body) = self.nodes.get_mut(&self.body) {
            body.rect = Rect::new(0.0, 0.0, viewport.width, viewport.height);
        }
    }

    pub fn tag(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(&element).map(|n| n.tag.as_str())
    }

    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.nodes.get(&element).map_or(&[], |n| n.children.as_slice())
    }

    /// Drains queued mutation records.
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.records)
    }

    #[inline]
    pub fn has_pending_records(&self) -> bool {
        !self.records.is_empty()
    }

    fn insert_child(&mut self, parent: ElementId, child: ElementId, first: bool) {
        if parent == child || !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child)
        {
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!(
                "refusing to insert {child:?} under its own descendant {parent:?}"
            );
            return;
        }

        self.remove(child);

        if let Some(p) = self.nodes.get_mut(&parent) {
            if first {
                p.children.insert(0, child);
            } else {
                p.children.push(child);
            }
        }
        if let Some(c) = self.nodes.get_mut(&child) {
            c.parent = Some(parent);
        }

        if self.is_connected(parent) {
            self.records.push(MutationRecord::ChildList {
                target: parent,
                added: vec![child],
                removed: Vec::new(),
            });
        }
    }

    fn is_ancestor(&self, ancestor: ElementId, mut node: ElementId) -> bool {
        while let Some(parent) = self.nodes.get(&node).and_then(|n| n.parent) {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }

    fn collect_subtree(&self, element: ElementId, out: &mut Vec<ElementId>) {
        let Some(node) = self.nodes.get(&element) else {
            return;
        };
        for &child in &node.children {
            out.push(child);
            self.collect_subtree(child, out);
        }
    }
}

impl Document for MemoryDocument {
    fn elements(&self) -> Vec<ElementId> {
        let mut out = vec![self.body];
        self.collect_subtree(self.body, &mut out);
        out
    }

    fn descendants(&self, element: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_subtree(element, &mut out);
        out
    }

    fn class_name(&self, element: ElementId) -> String {
        self.attribute(element, "class").unwrap_or_default()
    }

    fn is_connected(&self, element: ElementId) -> bool {
        element == self.body || self.is_ancestor(self.body, element)
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.nodes.get(&element)?.attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(&element) else {
            return;
        };
        node.attributes.insert(name.to_string(), value.to_string());

        if self.is_connected(element) {
            self.records.push(MutationRecord::Attributes {
                target: element,
                name: name.to_string(),
            });
        }
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) {
        let Some(node) = self.nodes.get_mut(&element) else {
            return;
        };
        if node.attributes.remove(name).is_none() {
            return;
        }

        if self.is_connected(element) {
            self.records.push(MutationRecord::Attributes {
                target: element,
                name: name.to_string(),
            });
        }
    }

    fn mount_canvas(&mut self) -> ElementId {
        let canvas = self.create_element("canvas");
        let full = Rect::new(0.0, 0.0, self.viewport.width, self.viewport.height);
        self.set_rect(canvas, full);
        self.prepend_child(self.body, canvas);
        canvas
    }
}

impl GeometryOracle for MemoryDocument {
    fn bounding_rect(&self, element: ElementId) -> Option<Rect> {
        if !self.is_connected(element) {
            return None;
        }
        self.nodes.get(&element).map(|n| n.rect)
    }

    fn border_radius(&self, element: ElementId) -> BorderRadius {
        self.nodes.get(&element).map(|n| n.radius).unwrap_or_default()
    }

    fn viewport_size(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> MemoryDocument {
        MemoryDocument::new(Viewport::new(800.0, 600.0))
    }

    #[test]
    fn elements_are_in_tree_order() {
        let mut d = doc();
        let a = d.create_element("div");
        let a1 = d.create_element("span");
        let b = d.create_element("div");
        d.append_child(d.body(), a);
        d.append_child(a, a1);
        d.append_child(d.body(), b);

        assert_eq!(d.elements(), vec![d.body(), a, a1, b]);
        assert_eq!(d.descendants(a), vec![a1]);
    }

    #[test]
    fn append_to_connected_parent_records_child_list() {
        let mut d = doc();
        let a = d.create_element("div");
        d.append_child(d.body(), a);

        let records = d.take_records();
        let expected = MutationRecord::ChildList {
            target: d.body(),
            added: vec![a],
            removed: vec![],
        };
        assert_eq!(records, vec![expected]);
        assert!(!d.has_pending_records());
    }

    #[test]
    fn detached_changes_are_not_recorded() {
        let mut d = doc();
        let a = d.create_element("div");
        let child = d.create_element("div");
        d.append_child(a, child);
        d.set_class_name(child, "frost");

        assert!(d.take_records().is_empty());
        assert!(!d.is_connected(child));
        assert_eq!(d.bounding_rect(child), None);
    }

    #[test]
    fn class_edits_record_attribute_mutations() {
        let mut d = doc();
        let a = d.create_element("div");
        d.append_child(d.body(), a);
        d.take_records();

        d.add_class(a, "card");
        d.add_class(a, "frost-4");
        d.add_class(a, "frost-4");
        assert_eq!(d.class_name(a), "card frost-4");

        d.remove_class(a, "card");
        assert_eq!(d.class_name(a), "frost-4");

        let records = d.take_records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| matches!(
            r,
            MutationRecord::Attributes { name, .. } if name == "class"
        )));
    }

    #[test]
    fn remove_detaches_subtree() {
        let mut d = doc();
        let a = d.create_element("div");
        let a1 = d.create_element("div");
        d.append_child(d.body(), a);
        d.append_child(a, a1);
        d.take_records();

        d.remove(a);
        assert!(!d.is_connected(a1));
        assert_eq!(d.elements(), vec![d.body()]);
        let expected = MutationRecord::ChildList {
            target: d.body(),
            added: vec![],
            removed: vec![a],
        };
        assert_eq!(d.take_records(), vec![expected]);
    }

    #[test]
    fn mount_canvas_becomes_first_body_child() {
        let mut d = doc();
        let a = d.create_element("div");
        d.append_child(d.body(), a);

        let canvas = d.mount_canvas();
        assert_eq!(d.children(d.body())[0], canvas);
        assert_eq!(d.tag(canvas), Some("canvas"));
        assert_eq!(
            d.bounding_rect(canvas),
            Some(Rect::new(0.0, 0.0, 800.0, 600.0))
        );
    }

    #[test]
    fn refuses_cycles() {
        let mut d = doc();
        let a = d.create_element("div");
        let b = d.create_element("div");
        d.append_child(d.body(), a);
        d.append_child(a, b);
        d.append_child(b, a);

        assert_eq!(d.children(b), &[] as &[ElementId]);
        assert!(d.is_connected(a));
    }
}
