//! [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)

use arbor_dom::{AttributesMap, Namespace, NodeId, NodeType};

use super::core::HTMLParser;
use super::elements::{is_form_associated, is_listed};
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
///
/// An adjusted insertion location: inside `parent`, immediately before
/// `before`, or after its last child when `before` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionLocation {
    /// The node the new node becomes a child of.
    pub parent: NodeId,
    /// The sibling the new node is inserted before.
    pub before: Option<NodeId>,
}

impl InsertionLocation {
    /// "inside `parent`, after its last child (if any)"
    #[must_use]
    pub const fn append_to(parent: NodeId) -> Self {
        Self {
            parent,
            before: None,
        }
    }
}

/// Characters accumulated for one text node.
///
/// Runs of character tokens bound for the same location are collected here
/// and written into the node in one go when the location changes, another
/// node is inserted, or parsing ends.
#[derive(Debug, Clone)]
pub struct PendingText {
    node: NodeId,
    location: InsertionLocation,
    data: String,
}

impl HTMLParser {
    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "The appropriate place for inserting a node, optionally using a
    /// particular override target, is the position in an element returned by
    /// running the following steps:"
    pub(crate) fn appropriate_place_for_inserting(
        &self,
        override_target: Option<NodeId>,
    ) -> InsertionLocation {
        // STEP 1: "If there was an override target specified, then let target
        // be the override target. Otherwise, let target be the current node."
        let target = override_target
            .or_else(|| self.current_node())
            .unwrap_or(NodeId::ROOT);

        // STEP 2: "Determine the adjusted insertion location using the first
        // matching steps from the following list:"
        let location = if self.foster_parenting
            && ["table", "tbody", "tfoot", "thead", "tr"]
                .iter()
                .any(|tag| self.is_html_element(target, tag))
        {
            // "If foster parenting is enabled and target is a table, tbody,
            // tfoot, thead, or tr element"
            self.foster_parent_location()
        } else {
            // "Otherwise: Let adjusted insertion location be inside target,
            // after its last child (if any)."
            InsertionLocation::append_to(target)
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        // element, let it instead be inside the template element's template
        // contents, after its last child (if any)."
        if let Some(contents) = self
            .tree
            .as_element(location.parent)
            .filter(|element| element.is_html("template"))
            .and_then(|element| element.template_contents)
        {
            return InsertionLocation::append_to(contents);
        }

        // STEP 4: "Return the adjusted insertion location."
        location
    }

    /// [§ 13.2.6.1 Foster parenting](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    fn foster_parent_location(&self) -> InsertionLocation {
        // STEP 1: "Let last template be the last template element in the stack
        // of open elements, if any."
        let last_template = self.open_elements.last_with_tag(&self.tree, "template");

        // STEP 2: "Let last table be the last table element in the stack of
        // open elements, if any."
        let last_table = self.open_elements.last_with_tag(&self.tree, "table");

        // STEP 3: "If there is a last template and either there is no last
        // table, or there is one, but last template is lower (more recently
        // added) than last table in the stack of open elements, then: let
        // adjusted insertion location be inside last template's template
        // contents, after its last child (if any), and abort these steps."
        if let Some(template) = last_template {
            let template_is_lower = last_table.is_none_or(|table| {
                self.open_elements.position(template) > self.open_elements.position(table)
            });
            if template_is_lower {
                let contents = self.tree.template_contents(template).unwrap_or(template);
                return InsertionLocation::append_to(contents);
            }
        }

        // STEP 4: "If there is no last table, then let adjusted insertion
        // location be inside the first element in the stack of open elements
        // (the html element), after its last child (if any), and abort these
        // steps. (fragment case)"
        let Some(table) = last_table else {
            return InsertionLocation::append_to(
                self.open_elements.first().unwrap_or(NodeId::ROOT),
            );
        };

        // STEP 5: "If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before last
        // table, and abort these steps."
        if let Some(parent) = self.tree.parent(table) {
            return InsertionLocation {
                parent,
                before: Some(table),
            };
        }

        // STEP 6: "Let previous element be the element immediately above last
        // table in the stack of open elements."
        // STEP 7: "Let adjusted insertion location be inside previous element,
        // after its last child (if any)."
        let previous = self
            .open_elements
            .position(table)
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| self.open_elements.get(index))
            .unwrap_or(NodeId::ROOT);
        InsertionLocation::append_to(previous)
    }

    /// Physically insert `node` at `location`.
    pub(crate) fn insert_node_at(&mut self, location: InsertionLocation, node: NodeId) {
        self.flush_pending_text();
        match location.before {
            Some(reference) => self.tree.insert_before(location.parent, node, reference),
            None => self.tree.append_child(location.parent, node),
        }
    }

    pub(crate) fn attributes_to_map(attributes: &[Attribute]) -> AttributesMap {
        attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect()
    }

    /// [§ 13.2.6.1 Create an element for the token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "...given a token token, namespace namespace, and Node intendedParent"
    pub(crate) fn create_element_for_token(
        &mut self,
        token: &Token,
        namespace: Namespace,
        intended_parent: NodeId,
    ) -> NodeId {
        let local_name = token.tag_name().unwrap_or_default();

        // STEP 1-9: "Let element be the result of creating an element given
        // document, localName, given namespace, null, is, and
        // willExecuteScript." and "Append each attribute in the given token to
        // element."
        let element = self.tree.create_element(
            namespace,
            local_name,
            Self::attributes_to_map(token.attributes()),
        );

        // STEP 12: "If element is a form-associated element and not a
        // form-associated custom element, the form element pointer is not
        // null, there is no template element on the stack of open elements,
        // element is either not listed or doesn't have a form attribute, and
        // the intendedParent is in the same tree as the element pointed to by
        // the form element pointer, then associate element with the form
        // element pointed to by the form element pointer..."
        if namespace == Namespace::Html
            && is_form_associated(local_name)
            && let Some(form) = self.form_element_pointer
            && !self.open_elements.contains_tag(&self.tree, "template")
            && (!is_listed(local_name) || !token.has_attribute("form"))
            && self.tree.tree_root(intended_parent) == self.tree.tree_root(form)
        {
            self.tree.set_form_owner(element, form);
        }

        element
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// "When the steps below require the user agent to insert a foreign element
    /// for a token token in namespace namespace and with a boolean
    /// onlyAddToElementStack, the user agent must run these steps:"
    pub(crate) fn insert_foreign_element(
        &mut self,
        token: &Token,
        namespace: Namespace,
        only_add_to_element_stack: bool,
    ) -> NodeId {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        // for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 2: "Let element be the result of creating an element for the
        // token given token, namespace, and the element in which the adjusted
        // insertion location finds itself."
        let element = self.create_element_for_token(token, namespace, location.parent);

        // STEP 3: "If onlyAddToElementStack is false, then run insert an element
        // at the adjusted insertion location with element."
        if !only_add_to_element_stack {
            self.insert_node_at(location, element);
        }

        // STEP 4: "Push element onto the stack of open elements so that it is
        // the new current node."
        self.open_elements.push(element);

        // STEP 5: "Return element."
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// with the HTML namespace and false."
    pub(crate) fn insert_html_element(&mut self, token: &Token) -> NodeId {
        self.insert_foreign_element(token, Namespace::Html, false)
    }

    /// Insert an HTML element for a start tag named `tag` with no attributes.
    pub(crate) fn insert_html_element_named(&mut self, tag: &str) -> NodeId {
        self.insert_html_element(&Token::start_tag(tag))
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(crate) fn insert_character(&mut self, c: char) {
        // STEP 2: "Let the adjusted insertion location be the appropriate place
        // for inserting a node."
        let location = self.appropriate_place_for_inserting(None);

        // STEP 3: "If the adjusted insertion location is inside a Document
        // node, then return."
        if matches!(
            self.tree.get(location.parent).map(|node| &node.node_type),
            Some(NodeType::Document)
        ) {
            return;
        }

        if let Some(pending) = self.pending_text.as_mut()
            && pending.location == location
        {
            pending.data.push(c);
            return;
        }
        self.flush_pending_text();

        // STEP 4: "If there is a Text node immediately before the adjusted
        // insertion location, then append data to that Text node's data."
        let previous = match location.before {
            Some(reference) => self.tree.prev_sibling(reference),
            None => self.tree.last_child(location.parent),
        };
        let existing = previous.filter(|&node| self.tree.as_text(node).is_some());

        let node = if let Some(node) = existing {
            node
        } else {
            // STEP 5: "Otherwise, create a new Text node whose data is data and
            // whose node document is the same as that of the element in which
            // the adjusted insertion location finds itself, and insert the
            // newly created node at the adjusted insertion location."
            let node = self.tree.create_text("");
            self.insert_node_at(location, node);
            node
        };

        if self.text_coalescing {
            self.pending_text = Some(PendingText {
                node,
                location,
                data: c.to_string(),
            });
        } else {
            self.tree.append_text(node, c.encode_utf8(&mut [0; 4]));
        }
    }

    /// Write accumulated character data into its text node.
    pub(crate) fn flush_pending_text(&mut self) {
        if let Some(pending) = self.pending_text.take() {
            self.tree.append_text(pending.node, &pending.data);
        }
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "1. Let data be the data given in the comment token being processed.
    ///  2. If position was specified, then let the adjusted insertion location
    ///     be position. Otherwise, let adjusted insertion location be the
    ///     appropriate place for inserting a node.
    ///  3. Create a Comment node whose data attribute is set to data...
    ///  4. Insert the newly created node at the adjusted insertion location."
    pub(crate) fn insert_comment(&mut self, data: &str) {
        let location = self.appropriate_place_for_inserting(None);
        let comment = self.tree.create_comment(data);
        self.insert_node_at(location, comment);
    }

    /// "Insert a comment as the last child of" `parent`.
    pub(crate) fn insert_comment_as_last_child_of(&mut self, data: &str, parent: NodeId) {
        let comment = self.tree.create_comment(data);
        self.insert_node_at(InsertionLocation::append_to(parent), comment);
    }
}
