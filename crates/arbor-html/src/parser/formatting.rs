//! [§ 13.2.4.4 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."

use arbor_dom::NodeId;

use crate::tokenizer::Token;

/// An entry in the list of active formatting elements.
///
/// "The list contains elements in the formatting category, and markers."
#[derive(Debug, Clone)]
pub enum ActiveFormattingElement {
    /// A formatting element together with the token it was created for, so it
    /// can be recreated by "reconstruct the active formatting elements" and
    /// the adoption agency algorithm.
    Element {
        /// The element in the tree.
        node_id: NodeId,
        /// "the token for which the element was created"
        token: Token,
    },
    /// "The markers are inserted when entering applet, object, marquee,
    /// template, td, th, and caption elements, and are used to prevent
    /// formatting from 'leaking' into applet, object, marquee, template, td,
    /// th, and caption elements."
    Marker,
}

impl ActiveFormattingElement {
    /// The element this entry refers to, or `None` for a marker.
    #[must_use]
    pub const fn node_id(&self) -> Option<NodeId> {
        match self {
            Self::Element { node_id, .. } => Some(*node_id),
            Self::Marker => None,
        }
    }

    /// The token the element was created for, or `None` for a marker.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::Element { token, .. } => Some(token),
            Self::Marker => None,
        }
    }

    /// Whether this entry is a marker.
    #[must_use]
    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Marker)
    }
}

/// Whether two start tags have "the same tag name, namespace, and attributes".
///
/// "For these purposes, the attributes must be compared as they were when
/// the elements were created by the parser; two elements have the same
/// attributes if all their parsed attributes can be paired such that the two
/// attributes in each pair have identical names, namespaces, and values (the
/// order of the attributes does not matter)."
fn same_tag_and_attributes(a: &Token, b: &Token) -> bool {
    if a.tag_name() != b.tag_name() {
        return false;
    }
    let (left, right) = (a.attributes(), b.attributes());
    left.len() == right.len()
        && left
            .iter()
            .all(|attr| b.attribute(&attr.name) == Some(attr.value.as_str()))
}

/// The list of active formatting elements.
#[derive(Debug, Default, Clone)]
pub struct ActiveFormattingElements {
    entries: Vec<ActiveFormattingElement>,
}

impl ActiveFormattingElements {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub fn push_marker(&mut self) {
        self.entries.push(ActiveFormattingElement::Marker);
    }

    /// [§ 13.2.4.4 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "1. If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there
    /// are no markers, that have the same tag name, namespace, and attributes
    /// as element, then remove the earliest such element from the list of
    /// active formatting elements.
    ///  2. Add element to the list of active formatting elements."
    ///
    /// This is the Noah's Ark clause.
    pub fn push(&mut self, node_id: NodeId, token: Token) {
        let start = self.index_after_last_marker();
        let matching: Vec<usize> = self.entries[start..]
            .iter()
            .enumerate()
            .filter_map(|(offset, entry)| {
                entry
                    .token()
                    .filter(|existing| same_tag_and_attributes(existing, &token))
                    .map(|_| start + offset)
            })
            .collect();
        if matching.len() >= 3 {
            let _ = self.entries.remove(matching[0]);
        }
        self.entries
            .push(ActiveFormattingElement::Element { node_id, token });
    }

    /// [§ 13.2.4.4 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list.
    ///  2. Remove entry from the list.
    ///  3. If entry was a marker, then stop the algorithm at this point.
    ///  4. Go to step 1."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry.is_marker() {
                break;
            }
        }
    }

    fn index_after_last_marker(&self) -> usize {
        self.entries
            .iter()
            .rposition(ActiveFormattingElement::is_marker)
            .map_or(0, |index| index + 1)
    }

    /// The last element between the end of the list and the last marker (or
    /// the start of the list) whose token has the tag name `tag`.
    #[must_use]
    pub fn last_element_with_tag_after_marker(&self, tag: &str) -> Option<NodeId> {
        self.entries
            .iter()
            .rev()
            .take_while(|entry| !entry.is_marker())
            .find(|entry| entry.token().and_then(Token::tag_name) == Some(tag))
            .and_then(ActiveFormattingElement::node_id)
    }

    /// Whether `node` is in the list.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// Index of the entry for `node`.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.node_id() == Some(node))
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ActiveFormattingElement> {
        self.entries.get(index)
    }

    /// The token `node` was created for.
    #[must_use]
    pub fn token_for(&self, node: NodeId) -> Option<&Token> {
        self.position(node)
            .and_then(|index| self.entries[index].token())
    }

    /// The last entry in the list.
    #[must_use]
    pub fn last(&self) -> Option<&ActiveFormattingElement> {
        self.entries.last()
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries from first to last.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ActiveFormattingElement> + '_ {
        self.entries.iter()
    }

    /// Remove the entry for `node`, if present.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            let _ = self.entries.remove(index);
        }
    }

    /// Insert an element entry at `index`.
    pub fn insert(&mut self, index: usize, node_id: NodeId, token: Token) {
        self.entries
            .insert(index, ActiveFormattingElement::Element { node_id, token });
    }

    /// Point the entry at `index` to `node`, keeping its token.
    pub fn replace_at(&mut self, index: usize, node: NodeId) {
        if let Some(ActiveFormattingElement::Element { node_id, .. }) = self.entries.get_mut(index)
        {
            *node_id = node;
        }
    }

    /// Point the entry for `old` to `new`, keeping its token.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        if let Some(index) = self.position(old) {
            self.replace_at(index, new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_b(list: &ActiveFormattingElements) -> usize {
        list.iter()
            .filter(|entry| entry.token().and_then(Token::tag_name) == Some("b"))
            .count()
    }

    #[test]
    fn test_noahs_ark_keeps_three_identical_entries() {
        let mut list = ActiveFormattingElements::new();
        for i in 0..5 {
            list.push(NodeId(i + 1), Token::start_tag("b"));
        }
        assert_eq!(count_b(&list), 3);
        // The earliest entries were the ones removed.
        assert!(!list.contains(NodeId(1)));
        assert!(!list.contains(NodeId(2)));
        assert!(list.contains(NodeId(5)));
    }

    #[test]
    fn test_noahs_ark_compares_attributes_as_sets() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), Token::start_tag_with_attributes("b", &[("x", "1"), ("y", "2")]));
        list.push(NodeId(2), Token::start_tag_with_attributes("b", &[("y", "2"), ("x", "1")]));
        list.push(NodeId(3), Token::start_tag_with_attributes("b", &[("x", "1"), ("y", "2")]));
        list.push(NodeId(4), Token::start_tag_with_attributes("b", &[("x", "1"), ("y", "2")]));
        assert!(!list.contains(NodeId(1)));

        list.push(NodeId(5), Token::start_tag_with_attributes("b", &[("x", "other")]));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_noahs_ark_only_counts_after_last_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), Token::start_tag("i"));
        list.push(NodeId(2), Token::start_tag("i"));
        list.push(NodeId(3), Token::start_tag("i"));
        list.push_marker();
        list.push(NodeId(4), Token::start_tag("i"));
        assert_eq!(list.len(), 5);
        assert!(list.contains(NodeId(1)));
    }

    #[test]
    fn test_clear_to_last_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), Token::start_tag("b"));
        list.push_marker();
        list.push(NodeId(2), Token::start_tag("i"));
        list.clear_to_last_marker();
        assert_eq!(list.len(), 1);
        assert!(list.contains(NodeId(1)));
    }

    #[test]
    fn test_last_element_with_tag_stops_at_marker() {
        let mut list = ActiveFormattingElements::new();
        list.push(NodeId(1), Token::start_tag("a"));
        list.push_marker();
        assert_eq!(list.last_element_with_tag_after_marker("a"), None);

        list.push(NodeId(2), Token::start_tag("a"));
        assert_eq!(list.last_element_with_tag_after_marker("a"), Some(NodeId(2)));
    }
}
