//! DOM Tree implementation.

use crate::element::ElementData;
use crate::node::{Node, NodeId};
use common::Size;
use slotmap::SlotMap;
use std::collections::HashMap;

/// The DOM tree structure.
pub struct DomTree {
    /// All nodes in the tree.
    nodes: SlotMap<NodeId, Node>,
    /// Root node (document).
    root: NodeId,
    /// ID to node mapping for fast lookups.
    id_map: HashMap<String, NodeId>,
}

impl DomTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(Node::new_document);
        Self {
            nodes,
            root,
            id_map: HashMap::new(),
        }
    }

    /// Get the root document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get_element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id).and_then(|n| n.as_element())
    }

    /// Mutable element access. Changes to `id` made through this
    /// reference bypass the id index; use [`DomTree::set_attribute`] for those.
    pub fn get_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id).and_then(|n| n.as_element_mut())
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        let elem_id = data.id.clone();
        let id = self.nodes.insert_with_key(|id| Node::new_element(id, data));
        if let Some(elem_id) = elem_id {
            self.id_map.entry(elem_id.to_string()).or_insert(id);
        }
        id
    }

    pub fn create_text(&mut self, content: String) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new_text(id, content))
    }

    /// Append a child to a parent node, detaching it from its old parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || !self.nodes.contains_key(parent) {
            return;
        }
        self.remove_from_parent(child);

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
    }

    /// Insert a child before a reference node. A missing or foreign
    /// reference appends.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let Some(ref_id) = reference else {
            self.append_child(parent, child);
            return;
        };
        if parent == child || child == ref_id || !self.nodes.contains_key(parent) {
            return;
        }

        self.remove_from_parent(child);

        let pos = self
            .nodes
            .get(parent)
            .and_then(|p| p.children.iter().position(|&id| id == ref_id));

        match pos {
            Some(pos) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.insert(pos, child);
                }
                if let Some(child_node) = self.nodes.get_mut(child) {
                    child_node.parent = Some(parent);
                }
            }
            None => self.append_child(parent, child),
        }
    }

    /// Detach a node from its parent. The node stays in the arena.
    pub fn remove_from_parent(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|id| *id != node);
        }
        if let Some(node_data) = self.nodes.get_mut(node) {
            node_data.parent = None;
        }
    }

    /// Remove a node and its subtree from the tree.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.remove_from_parent(node);

        let mut to_remove = vec![node];
        let mut i = 0;
        while i < to_remove.len() {
            if let Some(n) = self.nodes.get(to_remove[i]) {
                to_remove.extend(n.children.iter().copied());
            }
            i += 1;
        }

        for id in to_remove {
            if let Some(removed) = self.nodes.remove(id) {
                if let Some(elem_id) = removed.as_element().and_then(|e| e.id.clone()) {
                    self.unindex_id(&elem_id, id);
                }
            }
        }
    }

    /// Set an attribute, keeping the id index current.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(elem) = self.get_element_mut(node) else {
            return;
        };
        let old_id = elem.id.clone();
        elem.set_attribute(name, value);

        if name.eq_ignore_ascii_case("id") {
            if let Some(old_id) = old_id {
                self.unindex_id(&old_id, node);
            }
            self.id_map.insert(value.to_string(), node);
        }
    }

    /// Remove an attribute, keeping the id index current.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> Option<String> {
        let removed = self.get_element_mut(node)?.remove_attribute(name);
        if name.eq_ignore_ascii_case("id") {
            if let Some(old_id) = &removed {
                self.unindex_id(old_id, node);
            }
        }
        removed
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(elem) = self.get_element_mut(node) {
            elem.add_class(class);
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(elem) = self.get_element_mut(node) {
            elem.remove_class(class);
        }
    }

    /// Drop `node` from the id index. If another element still carries
    /// the id, the first one in document order (then any detached one)
    /// takes over the entry.
    fn unindex_id(&mut self, id: &str, node: NodeId) {
        if self.id_map.get(id) != Some(&node) {
            return;
        }
        self.id_map.remove(id);

        let carries = |tree: &Self, candidate: NodeId| {
            candidate != node
                && tree.get_element(candidate).and_then(|e| e.id.as_deref()) == Some(id)
        };
        let successor = self
            .descendants(self.root)
            .find(|&candidate| carries(self, candidate))
            .or_else(|| self.nodes.keys().find(|&candidate| carries(self, candidate)));
        if let Some(successor) = successor {
            self.id_map.insert(id.to_string(), successor);
        }
    }

    // Layout

    pub fn rendered_size(&self, node: NodeId) -> Option<Size> {
        self.nodes.get(node).and_then(|n| n.rendered)
    }

    pub fn set_rendered_size(&mut self, node: NodeId, size: Size) {
        if let Some(n) = self.nodes.get_mut(node) {
            n.rendered = Some(size);
        }
    }

    /// Width available to children of `node`: its own rendered width, or
    /// that of the nearest laid-out ancestor (block boxes fill their
    /// containing block). The document node carries the viewport size.
    pub fn available_width(&self, node: NodeId) -> Option<f64> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find_map(|id| self.rendered_size(id))
            .map(|size| size.width)
    }

    // Traversal

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.first_child())
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.children.iter().copied())
    }

    pub fn ancestors(&self, node: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(node),
        }
    }

    /// Descendants in document order (pre-order).
    pub fn descendants(&self, node: NodeId) -> DescendantIterator<'_> {
        let stack = self
            .nodes
            .get(node)
            .map(|n| n.children.iter().rev().copied().collect())
            .unwrap_or_default();
        DescendantIterator { tree: self, stack }
    }

    // Queries

    pub fn find_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied()
    }

    /// Query selector all over compound selectors of the form
    /// `tag`, `.class`, `#id`, `tag.class.other`, joined by commas.
    /// Results are in document order without duplicates.
    pub fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        let compounds: Vec<Compound<'_>> = selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Compound::parse)
            .collect();
        if compounds.is_empty() {
            return Vec::new();
        }

        self.descendants(self.root)
            .filter(|&id| {
                self.get_element(id)
                    .map(|e| compounds.iter().any(|c| c.matches(e)))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector).into_iter().next()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// One comma-separated part of a selector list.
struct Compound<'a> {
    tag: Option<&'a str>,
    id: Option<&'a str>,
    classes: Vec<&'a str>,
}

impl<'a> Compound<'a> {
    fn parse(selector: &'a str) -> Self {
        let mut compound = Compound {
            tag: None,
            id: None,
            classes: Vec::new(),
        };

        let mut start = 0;
        let mut kind = ' ';
        for (i, c) in selector.char_indices().chain(std::iter::once((selector.len(), '.'))) {
            if c == '.' || c == '#' {
                let part = &selector[start..i];
                if !part.is_empty() {
                    match kind {
                        '.' => compound.classes.push(part),
                        '#' => compound.id = Some(part),
                        _ if part != "*" => compound.tag = Some(part),
                        _ => {}
                    }
                }
                kind = c;
                start = i + 1;
            }
        }
        compound
    }

    fn matches(&self, elem: &ElementData) -> bool {
        self.tag.map_or(true, |t| elem.tag_name == t)
            && self.id.map_or(true, |id| elem.id() == Some(id))
            && self.classes.iter().all(|c| elem.has_class(c))
    }
}

/// Iterator over ancestor nodes.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.parent(current);
        Some(current)
    }
}

/// Iterator over descendant nodes (pre-order traversal).
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;

        // Reverse so the first child is visited first
        if let Some(node) = self.tree.nodes.get(current) {
            self.stack.extend(node.children.iter().rev().copied());
        }

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TagName;

    fn element(tree: &mut DomTree, tag: &str, attrs: &str) -> NodeId {
        tree.create_element(ElementData::parse(tag, attrs))
    }

    #[test]
    fn test_append_child() {
        let mut tree = DomTree::new();
        let root = tree.root();

        let div = tree.create_element(ElementData::new(TagName::new("div")));
        tree.append_child(root, div);

        assert_eq!(tree.parent(div), Some(root));
        assert_eq!(tree.first_child(root), Some(div));
        assert_eq!(tree.ancestors(div).collect::<Vec<_>>(), vec![root]);
    }

    #[test]
    fn test_insert_before_then_reparent() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let first = element(&mut tree, "p", "");
        let video = element(&mut tree, "video", "");
        let last = element(&mut tree, "p", "");
        for id in [first, video, last] {
            tree.append_child(root, id);
        }

        let wrapper = element(&mut tree, "div", "");
        tree.insert_before(root, wrapper, Some(video));
        tree.append_child(wrapper, video);

        assert_eq!(tree.children(root).collect::<Vec<_>>(), vec![first, wrapper, last]);
        assert_eq!(tree.parent(video), Some(wrapper));
    }

    #[test]
    fn test_id_index_follows_attribute_changes() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let video = element(&mut tree, "video", r#"id="foo""#);
        let wrapper = element(&mut tree, "div", "");
        tree.append_child(root, video);
        tree.append_child(root, wrapper);
        assert_eq!(tree.find_element_by_id("foo"), Some(video));

        tree.remove_attribute(video, "id");
        assert_eq!(tree.find_element_by_id("foo"), None);

        tree.set_attribute(wrapper, "id", "foo");
        assert_eq!(tree.find_element_by_id("foo"), Some(wrapper));

        tree.set_attribute(wrapper, "id", "bar");
        assert_eq!(tree.find_element_by_id("foo"), None);
        assert_eq!(tree.find_element_by_id("bar"), Some(wrapper));
    }

    #[test]
    fn test_duplicate_id_falls_back_to_remaining_element() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let first = element(&mut tree, "video", r#"id="dup""#);
        let second = element(&mut tree, "video", r#"id="dup""#);
        tree.append_child(root, first);
        tree.append_child(root, second);
        assert_eq!(tree.find_element_by_id("dup"), Some(first));

        tree.remove_attribute(first, "id");
        assert_eq!(tree.find_element_by_id("dup"), Some(second));

        tree.set_attribute(first, "id", "dup");
        assert_eq!(tree.find_element_by_id("dup"), Some(first));
        tree.remove(first);
        assert_eq!(tree.find_element_by_id("dup"), Some(second));

        // Detached carriers are found too
        let detached = element(&mut tree, "div", r#"id="dup""#);
        tree.remove(second);
        assert_eq!(tree.find_element_by_id("dup"), Some(detached));
    }

    #[test]
    fn test_query_selector_all_in_document_order() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = element(&mut tree, "audio", r#"class="om-player""#);
        let b = element(&mut tree, "video", r#"class="om-player""#);
        let c = element(&mut tree, "video", r#"class="other""#);
        let d = element(&mut tree, "iframe", r#"class="om-player""#);
        for id in [a, b, c, d] {
            tree.append_child(root, id);
        }

        assert_eq!(
            tree.query_selector_all("audio.om-player, video.om-player"),
            vec![a, b]
        );
        assert_eq!(tree.query_selector_all(".om-player"), vec![a, b, d]);
        assert_eq!(tree.query_selector_all("video"), vec![b, c]);
        assert_eq!(tree.query_selector_all(".om-player.other"), Vec::<NodeId>::new());
    }

    #[test]
    fn test_available_width_walks_ancestors() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let outer = element(&mut tree, "div", "");
        let inner = element(&mut tree, "div", "");
        tree.append_child(root, outer);
        tree.append_child(outer, inner);

        assert_eq!(tree.available_width(inner), None);
        tree.set_rendered_size(root, Size::new(1280.0, 720.0));
        assert_eq!(tree.available_width(inner), Some(1280.0));
        tree.set_rendered_size(outer, Size::new(400.0, 0.0));
        assert_eq!(tree.available_width(inner), Some(400.0));
    }

    #[test]
    fn test_remove_node() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = element(&mut tree, "div", r#"id="gone""#);
        let span = tree.create_element(ElementData::new(TagName::new("span")));
        tree.append_child(root, div);
        tree.append_child(div, span);

        tree.remove(div);

        assert!(tree.get(div).is_none());
        assert!(tree.get(span).is_none());
        assert_eq!(tree.find_element_by_id("gone"), None);
        assert!(tree.is_empty());
    }
}
