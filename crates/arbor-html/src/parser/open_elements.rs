//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."

use arbor_dom::{DomTree, Namespace, NodeId};

use super::elements::is_special;

/// The element types that bound a scope query.
///
/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope"
    ListItem,
    /// "has an element in button scope"
    Button,
    /// "has an element in table scope"
    Table,
    /// "has an element in select scope"
    Select,
}

impl Scope {
    /// Whether `node` is one of the element types listed for this scope.
    ///
    /// Select scope is inverted: "consisting of all element types except the
    /// following: optgroup in the HTML namespace, option in the HTML namespace".
    fn is_boundary(self, tree: &DomTree, node: NodeId) -> bool {
        let Some(element) = tree.as_element(node) else {
            return false;
        };
        let tag = element.tag_name.as_str();
        match (self, element.namespace) {
            (Self::Select, Namespace::Html) => !matches!(tag, "optgroup" | "option"),
            (Self::Select, _) => true,
            (Self::Table, Namespace::Html) => matches!(tag, "html" | "table" | "template"),
            (Self::Table, _) => false,
            (_, Namespace::Html) => {
                // "applet, caption, html, table, td, th, marquee, object, template"
                matches!(
                    tag,
                    "applet"
                        | "caption"
                        | "html"
                        | "table"
                        | "td"
                        | "th"
                        | "marquee"
                        | "object"
                        | "template"
                ) || (self == Self::ListItem && matches!(tag, "ol" | "ul"))
                    || (self == Self::Button && tag == "button")
            }
            // "MathML mi, MathML mo, MathML mn, MathML ms, MathML mtext, and
            // MathML annotation-xml"
            (_, Namespace::MathMl) => {
                matches!(tag, "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml")
            }
            // "SVG foreignObject, SVG desc, and SVG title"
            (_, Namespace::Svg) => matches!(tag, "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }
}

/// The stack of open elements, stored top (the `html` element) first.
#[derive(Debug, Default, Clone)]
pub struct OpenElements {
    elements: Vec<NodeId>,
}

impl OpenElements {
    /// Create an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
        }
    }

    /// "push onto the stack of open elements"
    pub fn push(&mut self, node: NodeId) {
        self.elements.push(node);
    }

    /// "pop the current node off the stack of open elements"
    pub fn pop(&mut self) -> Option<NodeId> {
        self.elements.pop()
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.elements.last().copied()
    }

    /// The topmost node, normally the `html` element.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.elements.first().copied()
    }

    /// The entry at `index`, counting from the top of the stack.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.elements.get(index).copied()
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `node` is on the stack.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.elements.contains(&node)
    }

    /// Index of `node` counting from the top of the stack.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.elements.iter().position(|&id| id == node)
    }

    /// Iterate from the top (`html`) to the current node.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = NodeId> + '_ {
        self.elements.iter().copied()
    }

    /// Insert `node` at `index`, shifting later entries toward the bottom.
    pub fn insert(&mut self, index: usize, node: NodeId) {
        self.elements.insert(index, node);
    }

    /// Remove `node` from the stack wherever it is.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            let _ = self.elements.remove(index);
        }
    }

    /// Replace the entry for `old` with `new`.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if let Some(index) = self.position(old) {
            self.elements[index] = new;
        }
    }

    /// Drop every entry below the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.elements.truncate(len);
    }

    /// "Pop all the nodes off the stack of open elements."
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Whether the current node is an HTML element named `tag`.
    #[must_use]
    pub fn current_is(&self, tree: &DomTree, tag: &str) -> bool {
        self.current()
            .is_some_and(|node| tree.is_html_element(node, tag))
    }

    /// Whether the current node is an HTML element with one of `tags`.
    #[must_use]
    pub fn current_is_one_of(&self, tree: &DomTree, tags: &[&str]) -> bool {
        self.current()
            .is_some_and(|node| tags.iter().any(|tag| tree.is_html_element(node, tag)))
    }

    /// Whether an HTML element named `tag` is anywhere on the stack.
    #[must_use]
    pub fn contains_tag(&self, tree: &DomTree, tag: &str) -> bool {
        self.elements
            .iter()
            .any(|&node| tree.is_html_element(node, tag))
    }

    /// The lowest (most recently pushed) HTML element named `tag`.
    #[must_use]
    pub fn last_with_tag(&self, tree: &DomTree, tag: &str) -> Option<NodeId> {
        self.elements
            .iter()
            .rev()
            .copied()
            .find(|&node| tree.is_html_element(node, tag))
    }

    /// [§ 13.2.4.3 has an element in the specific scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    ///  2. If node is the target node, terminate in a match state.
    ///  3. Otherwise, if node is one of the element types in list, terminate in
    ///     a failure state.
    ///  4. Otherwise, set node to the previous entry in the stack of open
    ///     elements and return to step 2."
    fn has_in_specific_scope(
        &self,
        tree: &DomTree,
        scope: Scope,
        is_target: impl Fn(NodeId) -> bool,
    ) -> bool {
        for &node in self.elements.iter().rev() {
            if is_target(node) {
                return true;
            }
            if scope.is_boundary(tree, node) {
                return false;
            }
        }
        // The html element is always a boundary, so this is reached only for
        // an empty stack.
        false
    }

    /// Whether an HTML element named `tag` is in `scope`.
    #[must_use]
    pub fn has_in_scope_of(&self, tree: &DomTree, scope: Scope, tag: &str) -> bool {
        self.has_in_specific_scope(tree, scope, |node| tree.is_html_element(node, tag))
    }

    /// "has an element in scope" for an HTML tag name.
    #[must_use]
    pub fn has_in_scope(&self, tree: &DomTree, tag: &str) -> bool {
        self.has_in_scope_of(tree, Scope::Default, tag)
    }

    /// "has an element in button scope"
    #[must_use]
    pub fn has_in_button_scope(&self, tree: &DomTree, tag: &str) -> bool {
        self.has_in_scope_of(tree, Scope::Button, tag)
    }

    /// "has an element in list item scope"
    #[must_use]
    pub fn has_in_list_item_scope(&self, tree: &DomTree, tag: &str) -> bool {
        self.has_in_scope_of(tree, Scope::ListItem, tag)
    }

    /// "has an element in table scope"
    #[must_use]
    pub fn has_in_table_scope(&self, tree: &DomTree, tag: &str) -> bool {
        self.has_in_scope_of(tree, Scope::Table, tag)
    }

    /// "has an element in select scope"
    #[must_use]
    pub fn has_in_select_scope(&self, tree: &DomTree, tag: &str) -> bool {
        self.has_in_scope_of(tree, Scope::Select, tag)
    }

    /// Whether any HTML element with one of `tags` is in `scope`, e.g.
    /// "has an element in scope that is an HTML element with the same tag
    /// name as ... h1, h2, h3, h4, h5, h6".
    #[must_use]
    pub fn has_any_in_scope_of(&self, tree: &DomTree, scope: Scope, tags: &[&str]) -> bool {
        self.has_in_specific_scope(tree, scope, |node| {
            tags.iter().any(|tag| tree.is_html_element(node, tag))
        })
    }

    /// Whether the specific `target` node is in the default scope.
    #[must_use]
    pub fn has_node_in_scope(&self, tree: &DomTree, target: NodeId) -> bool {
        self.has_in_specific_scope(tree, Scope::Default, |node| node == target)
    }

    /// [§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#furthest-block)
    ///
    /// "The furthest block is the topmost node in the stack of open elements
    /// that is lower in the stack than the formatting element, and is an
    /// element in the special category."
    #[must_use]
    pub fn topmost_special_node_below(&self, tree: &DomTree, formatting_element: NodeId) -> Option<NodeId> {
        let index = self.position(formatting_element)?;
        self.elements[index + 1..].iter().copied().find(|&node| {
            tree.as_element(node)
                .is_some_and(|element| is_special(element.namespace, &element.tag_name))
        })
    }

    /// Pop elements until an HTML element named `tag` has been popped.
    pub fn pop_until_tag_popped(&mut self, tree: &DomTree, tag: &str) {
        while let Some(node) = self.pop() {
            if tree.is_html_element(node, tag) {
                break;
            }
        }
    }

    /// Pop elements until an HTML element with one of `tags` has been popped.
    pub fn pop_until_one_of_popped(&mut self, tree: &DomTree, tags: &[&str]) {
        while let Some(node) = self.pop() {
            if tags.iter().any(|tag| tree.is_html_element(node, tag)) {
                break;
            }
        }
    }

    /// Pop elements until `target` has been popped.
    pub fn pop_until_node_popped(&mut self, target: NodeId) {
        while let Some(node) = self.pop() {
            if node == target {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_dom::AttributesMap;

    fn push_html(tree: &mut DomTree, stack: &mut OpenElements, tag: &str) -> NodeId {
        push_ns(tree, stack, Namespace::Html, tag)
    }

    fn push_ns(tree: &mut DomTree, stack: &mut OpenElements, ns: Namespace, tag: &str) -> NodeId {
        let parent = stack.current().unwrap_or(NodeId::ROOT);
        let node = tree.create_element(ns, tag, AttributesMap::new());
        tree.append_child(parent, node);
        stack.push(node);
        node
    }

    #[test]
    fn test_default_scope_stops_at_table() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::new();
        let _ = push_html(&mut tree, &mut stack, "html");
        let _ = push_html(&mut tree, &mut stack, "body");
        let _ = push_html(&mut tree, &mut stack, "p");
        let _ = push_html(&mut tree, &mut stack, "table");

        assert!(!stack.has_in_scope(&tree, "p"));
        assert!(stack.has_in_scope(&tree, "table"));
        assert!(stack.has_in_table_scope(&tree, "table"));
    }

    #[test]
    fn test_button_and_list_item_scopes() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::new();
        let _ = push_html(&mut tree, &mut stack, "html");
        let _ = push_html(&mut tree, &mut stack, "p");
        let _ = push_html(&mut tree, &mut stack, "li");
        let _ = push_html(&mut tree, &mut stack, "ul");
        let _ = push_html(&mut tree, &mut stack, "button");

        assert!(stack.has_in_scope(&tree, "p"));
        assert!(!stack.has_in_button_scope(&tree, "p"));
        assert!(!stack.has_in_list_item_scope(&tree, "li"));
    }

    #[test]
    fn test_select_scope_is_inverted() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::new();
        let _ = push_html(&mut tree, &mut stack, "html");
        let _ = push_html(&mut tree, &mut stack, "select");
        let _ = push_html(&mut tree, &mut stack, "optgroup");
        let _ = push_html(&mut tree, &mut stack, "option");
        assert!(stack.has_in_select_scope(&tree, "select"));

        let _ = push_html(&mut tree, &mut stack, "div");
        assert!(!stack.has_in_select_scope(&tree, "select"));
    }

    #[test]
    fn test_foreign_integration_points_bound_default_scope() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::new();
        let _ = push_html(&mut tree, &mut stack, "html");
        let _ = push_html(&mut tree, &mut stack, "p");
        let _ = push_ns(&mut tree, &mut stack, Namespace::Svg, "svg");
        assert!(stack.has_in_scope(&tree, "p"));

        let _ = push_ns(&mut tree, &mut stack, Namespace::Svg, "foreignObject");
        assert!(!stack.has_in_scope(&tree, "p"));
    }

    #[test]
    fn test_topmost_special_node_below() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::new();
        let _ = push_html(&mut tree, &mut stack, "html");
        let a = push_html(&mut tree, &mut stack, "a");
        let _ = push_html(&mut tree, &mut stack, "span");
        let div = push_html(&mut tree, &mut stack, "div");
        let _ = push_html(&mut tree, &mut stack, "p");

        assert_eq!(stack.topmost_special_node_below(&tree, a), Some(div));
    }

    #[test]
    fn test_pop_until_tag_popped() {
        let mut tree = DomTree::new();
        let mut stack = OpenElements::new();
        let html = push_html(&mut tree, &mut stack, "html");
        let _ = push_html(&mut tree, &mut stack, "ul");
        let _ = push_html(&mut tree, &mut stack, "li");
        let _ = push_html(&mut tree, &mut stack, "b");

        stack.pop_until_tag_popped(&tree, "ul");
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.current(), Some(html));
    }
}
