//! Shared tree construction algorithms.
//!
//! [§ 13.2.4 Parse state](https://html.spec.whatwg.org/multipage/parsing.html#parse-state)
//! [§ 13.2.6.2 Parsing elements that contain only text](https://html.spec.whatwg.org/multipage/parsing.html#parsing-elements-that-contain-only-text)
//! [§ 13.2.6.3 Closing elements that have implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#closing-elements-that-have-implied-end-tags)

use arbor_dom::{Namespace, NodeId};

use super::core::HTMLParser;
use super::elements::{has_implied_end_tag, has_implied_end_tag_thoroughly, is_special};
use super::insertion_mode::InsertionMode;
use crate::tokenizer::{LexerState, Token};

/// The outer loop bound of the adoption agency algorithm.
///
/// "If outerLoopCounter is greater than or equal to 8, then return."
pub const ADOPTION_AGENCY_OUTER_LOOP_LIMIT: usize = 8;

/// How the caller continues after the adoption agency algorithm returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdoptionOutcome {
    /// The end tag has been fully handled.
    DoNothing,
    /// "...return and instead act as described in the "any other end tag"
    /// entry above."
    RunAnyOtherEndTagSteps,
}

// =============================================================================
// Active formatting elements
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.4.4 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the user agent to reconstruct the active
    /// formatting elements, the user agent must perform the following steps:"
    pub(crate) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        // elements, then there is nothing to reconstruct; stop this algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of active
        // formatting elements is a marker, or if it is an element that is in
        // the stack of open elements, then there is nothing to reconstruct;
        // stop this algorithm."
        let Some(last) = self.active_formatting_elements.last() else {
            return;
        };
        if last
            .node_id()
            .is_none_or(|node| self.open_elements.contains(node))
        {
            return;
        }

        // STEP 3: "Let entry be the last (most recently added) element in the
        // list of active formatting elements."
        let mut index = self.active_formatting_elements.len() - 1;

        // STEP 4-6 (Rewind): "If there are no entries before entry in the list
        // of active formatting elements, then jump to the step labeled create.
        // Let entry be the entry one earlier than entry in the list of active
        // formatting elements. If entry is neither a marker nor an element
        // that is also in the stack of open elements, go to the step labeled
        // rewind."
        while index > 0 {
            let earlier = self
                .active_formatting_elements
                .get(index - 1)
                .and_then(super::formatting::ActiveFormattingElement::node_id);
            if earlier.is_none_or(|node| self.open_elements.contains(node)) {
                break;
            }
            index -= 1;
        }

        // STEP 7-10 (Advance, Create): "Insert an HTML element for the token
        // for which the element entry was created, to obtain new element.
        // Replace the entry for entry in the list with an entry for new
        // element. If the entry for new element in the list of active
        // formatting elements is not the last entry in the list, return to
        // the step labeled advance."
        for position in index..self.active_formatting_elements.len() {
            let Some(token) = self
                .active_formatting_elements
                .get(position)
                .and_then(|entry| entry.token().cloned())
            else {
                continue;
            };
            let new_element = self.insert_html_element(&token);
            self.active_formatting_elements
                .replace_at(position, new_element);
        }
    }

    /// [§ 13.2.4.4 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    pub(crate) fn push_active_formatting_element(&mut self, node: NodeId, token: &Token) {
        self.active_formatting_elements.push(node, token.clone());
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// "The adoption agency algorithm, which takes as its only argument a
    /// token token for which the algorithm is being run, consists of the
    /// following steps:"
    pub(crate) fn run_adoption_agency(&mut self, token: &Token) -> AdoptionOutcome {
        self.flush_pending_text();

        // STEP 1: "Let subject be token's tag name."
        let Some(subject) = token.tag_name() else {
            return AdoptionOutcome::DoNothing;
        };

        // STEP 2: "If the current node is an HTML element whose tag name is
        // subject, and the current node is not in the list of active
        // formatting elements, then pop the current node off the stack of
        // open elements and return."
        if let Some(current) = self.current_node()
            && self.is_html_element(current, subject)
            && !self.active_formatting_elements.contains(current)
        {
            let _ = self.open_elements.pop();
            return AdoptionOutcome::DoNothing;
        }

        // STEP 3: "Let outerLoopCounter be 0."
        // STEP 4: "While true:"
        for _ in 0..ADOPTION_AGENCY_OUTER_LOOP_LIMIT {
            // STEP 4.3: "Let formattingElement be the last element in the list
            // of active formatting elements that: is between the end of the
            // list and the last marker in the list, if any, or the start of
            // the list otherwise, and has the tag name subject. If there is no
            // such element, then return and instead act as described in the
            // "any other end tag" entry above."
            let Some(formatting_element) = self
                .active_formatting_elements
                .last_element_with_tag_after_marker(subject)
            else {
                return AdoptionOutcome::RunAnyOtherEndTagSteps;
            };

            // STEP 4.4: "If formattingElement is not in the stack of open
            // elements, then this is a parse error; remove the element from
            // the list, and return."
            if !self.open_elements.contains(formatting_element) {
                self.parse_error("adoption-agency-formatting-element-not-open");
                self.active_formatting_elements.remove(formatting_element);
                return AdoptionOutcome::DoNothing;
            }

            // STEP 4.5: "If formattingElement is in the stack of open elements,
            // but the element is not in scope, then this is a parse error;
            // return."
            if !self
                .open_elements
                .has_node_in_scope(&self.tree, formatting_element)
            {
                self.parse_error("adoption-agency-formatting-element-not-in-scope");
                return AdoptionOutcome::DoNothing;
            }

            // STEP 4.6: "If formattingElement is not the current node, this is
            // a parse error. (But do not return.)"
            if self.current_node() != Some(formatting_element) {
                self.parse_error("adoption-agency-misnested-end-tag");
            }

            // STEP 4.7: "Let furthestBlock be the topmost node in the stack of
            // open elements that is lower in the stack than formattingElement,
            // and is an element in the special category."
            let Some(furthest_block) = self
                .open_elements
                .topmost_special_node_below(&self.tree, formatting_element)
            else {
                // STEP 4.8: "If there is no furthestBlock, then the UA must
                // first pop all the nodes from the bottom of the stack of open
                // elements, from the current node up to and including
                // formattingElement, then remove formattingElement from the
                // list of active formatting elements, and finally return."
                self.open_elements.pop_until_node_popped(formatting_element);
                self.active_formatting_elements.remove(formatting_element);
                return AdoptionOutcome::DoNothing;
            };

            self.adopt_into_furthest_block(formatting_element, furthest_block);
        }
        AdoptionOutcome::DoNothing
    }

    /// Steps 4.9 through 4.19 of the adoption agency algorithm.
    fn adopt_into_furthest_block(&mut self, formatting_element: NodeId, furthest_block: NodeId) {
        let formatting_index = self
            .open_elements
            .position(formatting_element)
            .unwrap_or_else(|| unreachable!("formatting element checked to be open"));

        // STEP 4.9: "Let commonAncestor be the element immediately above
        // formattingElement in the stack of open elements."
        let common_ancestor = formatting_index
            .checked_sub(1)
            .and_then(|index| self.open_elements.get(index))
            .unwrap_or_else(|| unreachable!("the html element is above every formatting element"));

        // STEP 4.10: "Let a bookmark note the position of formattingElement in
        // the list of active formatting elements relative to the elements on
        // either side of it in the list."
        let mut bookmark = self
            .active_formatting_elements
            .position(formatting_element)
            .unwrap_or_else(|| unreachable!("formatting element found in the list"));

        // STEP 4.11: "Let node and lastNode be furthestBlock."
        let mut node_index = self
            .open_elements
            .position(furthest_block)
            .unwrap_or_else(|| unreachable!("furthest block is on the stack"));
        let mut last_node = furthest_block;

        // STEP 4.12: "Let innerLoopCounter be 0."
        // STEP 4.13: "While true:"
        let mut inner_loop_counter = 0;
        loop {
            // STEP 4.13.1: "Increment innerLoopCounter by 1."
            inner_loop_counter += 1;

            // STEP 4.13.2: "Let node be the element immediately above node in
            // the stack of open elements, or if node is no longer in the stack
            // of open elements, the element that was immediately above node in
            // the stack of open elements before node was removed."
            node_index -= 1;
            let Some(mut node) = self.open_elements.get(node_index) else {
                break;
            };

            // STEP 4.13.3: "If node is formattingElement, then break."
            if node == formatting_element {
                break;
            }

            // STEP 4.13.4: "If innerLoopCounter is greater than 3 and node is in
            // the list of active formatting elements, then remove node from the
            // list of active formatting elements."
            if inner_loop_counter > 3
                && let Some(position) = self.active_formatting_elements.position(node)
            {
                self.active_formatting_elements.remove(node);
                if position < bookmark {
                    bookmark -= 1;
                }
            }

            // STEP 4.13.5: "If node is not in the list of active formatting
            // elements, then remove node from the stack of open elements and
            // continue."
            let Some(token) = self.active_formatting_elements.token_for(node).cloned() else {
                self.open_elements.remove(node);
                continue;
            };

            // STEP 4.13.6: "Create an element for the token for which the
            // element node was created, in the HTML namespace, with
            // commonAncestor as the intended parent; replace the entry for node
            // in the list of active formatting elements with an entry for the
            // new element, replace the entry for node in the stack of open
            // elements with an entry for the new element, and let node be the
            // new element."
            let new_element = self.create_element_for_token(&token, Namespace::Html, common_ancestor);
            self.active_formatting_elements.replace(node, new_element);
            self.open_elements.replace(node, new_element);
            node = new_element;

            // STEP 4.13.7: "If lastNode is furthestBlock, then move the
            // aforementioned bookmark to be immediately after the new node in
            // the list of active formatting elements."
            if last_node == furthest_block
                && let Some(position) = self.active_formatting_elements.position(node)
            {
                bookmark = position + 1;
            }

            // STEP 4.13.8: "Append lastNode to node."
            self.tree.append_child(node, last_node);

            // STEP 4.13.9: "Set lastNode to node."
            last_node = node;
        }

        // STEP 4.14: "Insert whatever lastNode ended up being in the appropriate
        // place for inserting a node, but using commonAncestor as the override
        // target."
        let location = self.appropriate_place_for_inserting(Some(common_ancestor));
        self.insert_node_at(location, last_node);

        // STEP 4.15: "Create an element for the token for which formattingElement
        // was created, in the HTML namespace, with furthestBlock as the
        // intended parent."
        let token = self
            .active_formatting_elements
            .token_for(formatting_element)
            .cloned()
            .unwrap_or_else(|| unreachable!("formatting element found in the list"));
        let new_element = self.create_element_for_token(&token, Namespace::Html, furthest_block);

        // STEP 4.16: "Take all of the child nodes of furthestBlock and append
        // them to the element created in the last step."
        self.tree.move_children(furthest_block, new_element);

        // STEP 4.17: "Append that new element to furthestBlock."
        self.tree.append_child(furthest_block, new_element);

        // STEP 4.18: "Remove formattingElement from the list of active
        // formatting elements, and insert the new element into the list of
        // active formatting elements at the position of the aforementioned
        // bookmark."
        if let Some(position) = self.active_formatting_elements.position(formatting_element) {
            self.active_formatting_elements.remove(formatting_element);
            if position < bookmark {
                bookmark -= 1;
            }
        }
        let bookmark = bookmark.min(self.active_formatting_elements.len());
        self.active_formatting_elements
            .insert(bookmark, new_element, token);

        // STEP 4.19: "Remove formattingElement from the stack of open elements,
        // and insert the new element into the stack of open elements
        // immediately below the position of furthestBlock in that stack."
        self.open_elements.remove(formatting_element);
        if let Some(position) = self.open_elements.position(furthest_block) {
            self.open_elements.insert(position + 1, new_element);
        }
    }
}

// =============================================================================
// Closing elements
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "...while the current node is a dd element, a dt element, an li
    /// element, an optgroup element, an option element, a p element, an rb
    /// element, an rp element, an rt element, or an rtc element, the UA must
    /// pop the current node off the stack of open elements."
    pub(crate) fn generate_implied_end_tags(&mut self) {
        self.generate_implied_end_tags_excluding(None);
    }

    /// "If a step requires the UA to generate implied end tags but lists an
    /// element to exclude from the process, then the UA must perform the above
    /// steps as if that element was not in the above list."
    pub(crate) fn generate_implied_end_tags_excluding(&mut self, exclude: Option<&str>) {
        while let Some(current) = self.current_node()
            && let Some(element) = self.tree.as_element(current)
            && element.namespace == Namespace::Html
            && has_implied_end_tag(&element.tag_name)
            && exclude != Some(element.tag_name.as_str())
        {
            let _ = self.open_elements.pop();
        }
    }

    /// [§ 13.2.6.3 Generate all implied end tags thoroughly](https://html.spec.whatwg.org/multipage/parsing.html#generate-all-implied-end-tags-thoroughly)
    pub(crate) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        while let Some(current) = self.current_node()
            && let Some(element) = self.tree.as_element(current)
            && element.namespace == Namespace::Html
            && has_implied_end_tag_thoroughly(&element.tag_name)
        {
            let _ = self.open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.7 Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "1. Generate implied end tags, except for p elements.
    ///  2. If the current node is not a p element, then this is a parse error.
    ///  3. Pop elements from the stack of open elements until a p element has
    ///     been popped from the stack."
    pub(crate) fn close_p_element(&mut self) {
        self.generate_implied_end_tags_excluding(Some("p"));
        if !self.current_node_is("p") {
            self.parse_error("unexpected-open-element-while-closing-p");
        }
        self.open_elements.pop_until_tag_popped(&self.tree, "p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(crate) fn close_p_element_in_button_scope(&mut self) {
        if self.open_elements.has_in_button_scope(&self.tree, "p") {
            self.close_p_element();
        }
    }

    /// Pop elements until an HTML element named `tag` has been popped.
    pub(crate) fn pop_until_tag(&mut self, tag: &str) {
        self.open_elements.pop_until_tag_popped(&self.tree, tag);
    }

    /// Pop elements until an HTML element with one of `tags` has been popped.
    pub(crate) fn pop_until_one_of(&mut self, tags: &[&str]) {
        self.open_elements.pop_until_one_of_popped(&self.tree, tags);
    }

    /// [§ 13.2.6.4.7 "in body" - Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(crate) fn any_other_end_tag(&mut self, tag_name: &str) {
        // STEP 1: "Initialize node to be the current node (the bottommost node
        // of the stack)."
        for index in (0..self.open_elements.len()).rev() {
            let Some(node) = self.open_elements.get(index) else {
                return;
            };

            // STEP 2: "Loop: If node is an HTML element with the same tag name as
            // the token, then:"
            if self.is_html_element(node, tag_name) {
                // "Generate implied end tags, except for HTML elements with the
                // same tag name as the token."
                self.generate_implied_end_tags_excluding(Some(tag_name));
                // "If node is not the current node, then this is a parse error."
                if self.current_node() != Some(node) {
                    self.parse_error("end-tag-without-matching-open-element");
                }
                // "Pop all the nodes from the current node up to node,
                // including node, then stop these steps."
                self.open_elements.pop_until_node_popped(node);
                return;
            }

            // STEP 3: "Otherwise, if node is in the special category, then this
            // is a parse error; ignore the token, and return."
            if self
                .tree
                .as_element(node)
                .is_some_and(|element| is_special(element.namespace, &element.tag_name))
            {
                self.parse_error("unexpected-end-tag");
                return;
            }

            // STEP 4: "Set node to the previous entry in the stack of open
            // elements."
        }
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "...while the current node is not a table, template, or html element,
    /// pop elements from the stack of open elements."
    pub(crate) fn clear_stack_back_to_table_context(&mut self) {
        self.clear_stack_back_to(&["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    ///
    /// "...while the current node is not a tbody, tfoot, thead, template, or
    /// html element, pop elements from the stack of open elements."
    pub(crate) fn clear_stack_back_to_table_body_context(&mut self) {
        self.clear_stack_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    ///
    /// "...while the current node is not a tr, template, or html element, pop
    /// elements from the stack of open elements."
    pub(crate) fn clear_stack_back_to_table_row_context(&mut self) {
        self.clear_stack_back_to(&["tr", "template", "html"]);
    }

    fn clear_stack_back_to(&mut self, tags: &[&str]) {
        while !self.open_elements.is_empty() && !self.current_node_is_one_of(tags) {
            let _ = self.open_elements.pop();
        }
    }

    /// [§ 13.2.6.4.15 Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(crate) fn close_the_cell(&mut self) {
        // STEP 1: "Generate implied end tags."
        self.generate_implied_end_tags();
        // STEP 2: "If the current node is not now a td element or a th element,
        // then this is a parse error."
        if !self.current_node_is_one_of(&["td", "th"]) {
            self.parse_error("unexpected-cell-end");
        }
        // STEP 3: "Pop elements from the stack of open elements stack until a
        // td element or a th element has been popped from the stack."
        self.pop_until_one_of(&["td", "th"]);
        // STEP 4: "Clear the list of active formatting elements up to the last marker."
        self.active_formatting_elements.clear_to_last_marker();
        // STEP 5: "Switch the insertion mode to "in row"."
        self.insertion_mode = InsertionMode::InRow;
    }
}

// =============================================================================
// Insertion mode bookkeeping
// =============================================================================

impl HTMLParser {
    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(crate) fn reset_insertion_mode_appropriately(&mut self) {
        self.insertion_mode = self.appropriate_insertion_mode();
        log::trace!("[Parser] reset insertion mode to {}", self.insertion_mode);
    }

    fn appropriate_insertion_mode(&self) -> InsertionMode {
        // STEP 1: "Let last be false."
        // STEP 2: "Let node be the last node in the stack of open elements."
        for index in (0..self.open_elements.len()).rev() {
            let Some(mut node) = self.open_elements.get(index) else {
                break;
            };

            // STEP 3: "Loop: If node is the first node in the stack of open
            // elements, then set last to true, and, if the parser was created as
            // part of the HTML fragment parsing algorithm (fragment case), set
            // node to the context element passed to that algorithm."
            let last = index == 0;
            if last && let Some(context) = self.context_element {
                node = context;
            }

            let Some(element) = self.tree.as_element(node) else {
                continue;
            };
            if element.namespace != Namespace::Html {
                if last {
                    return InsertionMode::InBody;
                }
                continue;
            }

            match element.tag_name.as_str() {
                // STEP 4: "If node is a select element, run these substeps:"
                "select" => {
                    // "If last is true, jump to the step below labeled done."
                    if !last {
                        // "Let ancestor be node. Loop: If ancestor is the first
                        // node in the stack of open elements, jump to the step
                        // below labeled done. Let ancestor be the node before
                        // ancestor in the stack of open elements. If ancestor is
                        // a template node, jump to the step below labeled done.
                        // If ancestor is a table node, switch the insertion mode
                        // to "in select in table" and return."
                        for ancestor_index in (0..index).rev() {
                            let Some(ancestor) = self.open_elements.get(ancestor_index) else {
                                break;
                            };
                            if self.is_html_element(ancestor, "template") {
                                break;
                            }
                            if self.is_html_element(ancestor, "table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    // "Done: Switch the insertion mode to "in select" and return."
                    return InsertionMode::InSelect;
                }
                // STEP 5: "If node is a td or th element and last is false, then
                // switch the insertion mode to "in cell" and return."
                "td" | "th" if !last => return InsertionMode::InCell,
                // STEP 6: "If node is a tr element, then switch the insertion
                // mode to "in row" and return."
                "tr" => return InsertionMode::InRow,
                // STEP 7: "If node is a tbody, thead, or tfoot element, then
                // switch the insertion mode to "in table body" and return."
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                // STEP 8: "If node is a caption element, then switch the
                // insertion mode to "in caption" and return."
                "caption" => return InsertionMode::InCaption,
                // STEP 9: "If node is a colgroup element, then switch the
                // insertion mode to "in column group" and return."
                "colgroup" => return InsertionMode::InColumnGroup,
                // STEP 10: "If node is a table element, then switch the
                // insertion mode to "in table" and return."
                "table" => return InsertionMode::InTable,
                // STEP 11: "If node is a template element, then switch the
                // insertion mode to the current template insertion mode and
                // return."
                "template" => {
                    return self
                        .template_insertion_modes
                        .last()
                        .copied()
                        .unwrap_or(InsertionMode::InTemplate);
                }
                // STEP 12: "If node is a head element and last is false, then
                // switch the insertion mode to "in head" and return."
                "head" if !last => return InsertionMode::InHead,
                // STEP 13: "If node is a body element, then switch the insertion
                // mode to "in body" and return."
                "body" => return InsertionMode::InBody,
                // STEP 14: "If node is a frameset element, then switch the
                // insertion mode to "in frameset" and return. (fragment case)"
                "frameset" => return InsertionMode::InFrameset,
                // STEP 15: "If node is an html element, run these substeps: If
                // the head element pointer is null, switch the insertion mode to
                // "before head" and return. (fragment case) Otherwise, the head
                // element pointer is not null, switch the insertion mode to
                // "after head" and return."
                "html" => {
                    return if self.head_element_pointer.is_none() {
                        InsertionMode::BeforeHead
                    } else {
                        InsertionMode::AfterHead
                    };
                }
                // STEP 16: "If last is true, then switch the insertion mode to
                // "in body" and return. (fragment case)"
                _ if last => return InsertionMode::InBody,
                // STEP 17: "Let node now be the node before node in the stack of
                // open elements. Return to the step labeled loop."
                _ => {}
            }
        }
        InsertionMode::InBody
    }

    /// [§ 13.2.6.2 Generic raw text / RCDATA element parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "1. Insert an HTML element for the token.
    ///  2. If the algorithm that was invoked is the generic raw text element
    ///     parsing algorithm, switch the tokenizer to the RAWTEXT state;
    ///     otherwise the algorithm invoked was the generic RCDATA element
    ///     parsing algorithm, switch the tokenizer to the RCDATA state.
    ///  3. Let the original insertion mode be the current insertion mode.
    ///  4. Then, switch the insertion mode to "text"."
    pub(crate) fn parse_text_element(&mut self, token: &Token, state: LexerState) {
        let _ = self.insert_html_element(token);
        self.tokenizer.switch_to(state);
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    /// Switch the insertion mode to "text" with the current mode as the
    /// original insertion mode.
    pub(crate) const fn enter_text_mode(&mut self) {
        self.original_insertion_mode = Some(self.insertion_mode);
        self.insertion_mode = InsertionMode::Text;
    }

    /// Merge the attributes of `token` into `element`, skipping those it
    /// already has.
    ///
    /// "...for each attribute on the token, check to see if the attribute is
    /// already present on the top element of the stack of open elements. If
    /// it is not, add the attribute and its corresponding value to that
    /// element."
    pub(crate) fn merge_attributes_into(&mut self, element: NodeId, token: &Token) {
        let Some(data) = self.tree.as_element_mut(element) else {
            return;
        };
        for attr in token.attributes() {
            let _ = data
                .attrs
                .entry(attr.name.clone())
                .or_insert_with(|| attr.value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Token;

    fn parser_after(tokens: &[Token]) -> HTMLParser {
        let mut parser = HTMLParser::from_html("");
        for token in tokens {
            parser.dispatch(token.clone());
        }
        parser
    }

    #[test]
    fn test_reconstruction_is_idempotent() {
        // `</p>` pops the `b`, leaving it in the list but not on the stack.
        let mut parser = parser_after(&[
            Token::start_tag("html"),
            Token::start_tag("body"),
            Token::start_tag("p"),
            Token::start_tag("b"),
            Token::end_tag("p"),
        ]);
        let body = parser.tree.body().unwrap();
        let before = parser.tree.children(body).len();

        parser.reconstruct_active_formatting_elements();
        let after_first = parser.tree.children(body).len();
        assert_eq!(after_first, before + 1);
        assert!(parser.current_node_is("b"));

        parser.reconstruct_active_formatting_elements();
        assert_eq!(parser.tree.children(body).len(), after_first);
        assert_eq!(parser.active_formatting_elements.len(), 1);
    }

    #[test]
    fn test_adoption_agency_without_formatting_element_runs_any_other_end_tag_steps() {
        let mut parser = parser_after(&[Token::start_tag("html"), Token::start_tag("body")]);
        assert_eq!(
            parser.run_adoption_agency(&Token::end_tag("span")),
            AdoptionOutcome::RunAnyOtherEndTagSteps
        );
    }

    #[test]
    fn test_adoption_agency_with_current_formatting_element_pops_it() {
        let mut parser = parser_after(&[
            Token::start_tag("html"),
            Token::start_tag("body"),
            Token::start_tag("b"),
        ]);
        assert_eq!(
            parser.run_adoption_agency(&Token::end_tag("b")),
            AdoptionOutcome::DoNothing
        );
        assert!(parser.current_node_is("body"));
        assert!(parser.active_formatting_elements.is_empty());
    }
}
