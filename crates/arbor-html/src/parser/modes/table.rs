//! Table insertion modes.
//!
//! [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
//! through
//! [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)

use arbor_common::infra::{ascii_case_insensitive_eq, is_ascii_whitespace};

use super::is_whitespace_token;
use crate::parser::core::HTMLParser;
use crate::parser::insertion_mode::InsertionMode;
use crate::parser::open_elements::Scope;
use crate::tokenizer::Token;

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl HTMLParser {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(crate) fn handle_in_table_mode(&mut self, token: &Token) {
        match token {
            // "A character token, if the current node is table, tbody, template,
            // tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of tokens."
            // "Let the original insertion mode be the current insertion mode."
            // "Switch the insertion mode to "in table text" and reprocess the token."
            Token::Character { .. }
                if self
                    .current_node_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                self.pending_table_character_tokens.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::InTableText;
                self.reprocess_token(token);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected-doctype"),

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context."
                // "Insert a marker at the end of the list of active formatting elements."
                // "Insert an HTML element for the token, then switch the insertion
                // mode to "in caption"."
                "caption" => {
                    self.clear_stack_back_to_table_context();
                    self.active_formatting_elements.push_marker();
                    let _ = self.insert_html_element(token);
                    self.insertion_mode = InsertionMode::InCaption;
                }

                // "A start tag whose tag name is "colgroup""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for the token, then switch the insertion
                // mode to "in column group"."
                "colgroup" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token);
                    self.insertion_mode = InsertionMode::InColumnGroup;
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for a "colgroup" start tag token with no
                // attributes, then switch the insertion mode to "in column group"."
                // "Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("colgroup");
                    self.insertion_mode = InsertionMode::InColumnGroup;
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for the token, then switch the insertion
                // mode to "in table body"."
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element(token);
                    self.insertion_mode = InsertionMode::InTableBody;
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                // "Clear the stack back to a table context."
                // "Insert an HTML element for a "tbody" start tag token with no
                // attributes, then switch the insertion mode to "in table body"."
                // "Reprocess the current token."
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to_table_context();
                    let _ = self.insert_html_element_named("tbody");
                    self.insertion_mode = InsertionMode::InTableBody;
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is "table""
                "table" => {
                    // "Parse error."
                    self.parse_error("unexpected-start-tag-table-in-table");
                    // "If the stack of open elements does not have a table element
                    // in table scope, ignore the token."
                    if !self.open_elements.has_in_table_scope(&self.tree, "table") {
                        return;
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    // element has been popped from the stack."
                    // "Reset the insertion mode appropriately."
                    // "Reprocess the token."
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                    self.reprocess_token(token);
                }

                // "A start tag whose tag name is one of: "style", "script", "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "style" | "script" | "template" => {
                    self.process_using_rules_for(InsertionMode::InHead, token);
                }

                // "A start tag whose tag name is "input""
                // "If the token does not have an attribute with the name "type", or
                // if it does, but that attribute's value is not an ASCII
                // case-insensitive match for the string "hidden", then: act as
                // described in the "anything else" entry below."
                // "Otherwise: Parse error. Insert an HTML element for the token.
                // Pop that input element off the stack of open elements.
                // Acknowledge the token's self-closing flag, if it is set."
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|value| ascii_case_insensitive_eq(value, "hidden")) =>
                {
                    self.parse_error("unexpected-hidden-input-in-table");
                    let _ = self.insert_html_element(token);
                    let _ = self.open_elements.pop();
                    self.acknowledge_self_closing_flag();
                }

                // "A start tag whose tag name is "form""
                "form" => {
                    // "Parse error."
                    self.parse_error("unexpected-form-in-table");
                    // "If there is a template element on the stack of open
                    // elements, or if the form element pointer is not null, ignore
                    // the token."
                    if self.open_elements.contains_tag(&self.tree, "template")
                        || self.form_element_pointer.is_some()
                    {
                        return;
                    }
                    // "Otherwise: Insert an HTML element for the token, and set the
                    // form element pointer to point to the element created."
                    // "Pop that form element off the stack of open elements."
                    let form = self.insert_html_element(token);
                    self.form_element_pointer = Some(form);
                    let _ = self.open_elements.pop();
                }

                _ => self.handle_in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                "table" => {
                    // "If the stack of open elements does not have a table element
                    // in table scope, this is a parse error; ignore the token."
                    if !self.open_elements.has_in_table_scope(&self.tree, "table") {
                        self.parse_error("unexpected-end-tag-table");
                        return;
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    // element has been popped from the stack."
                    // "Reset the insertion mode appropriately."
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                }

                // "An end tag whose tag name is one of: "body", "caption", "col",
                // "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => self.parse_error("unexpected-end-tag-in-table"),

                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => self.process_using_rules_for(InsertionMode::InHead, token),

                _ => self.handle_in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            // "Anything else"
            Token::Character { .. } => self.handle_in_table_anything_else(token),
        }
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode - Anything else](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    ///
    /// "Parse error. Enable foster parenting, process the token using the rules
    /// for the "in body" insertion mode, and then disable foster parenting."
    fn handle_in_table_anything_else(&mut self, token: &Token) {
        self.parse_error("foster-parenting");
        self.process_with_foster_parenting(token);
    }

    fn process_with_foster_parenting(&mut self, token: &Token) {
        self.foster_parenting = true;
        self.process_using_rules_for(InsertionMode::InBody, token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(crate) fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => self.parse_error("unexpected-null-character"),

            // "Any other character token"
            // "Append the character token to the pending table character tokens list."
            Token::Character { data } => self.pending_table_character_tokens.push(*data),

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_character_tokens);

                // "If any of the tokens in the pending table character tokens list
                // are character tokens that are not ASCII whitespace, then this is
                // a parse error: reprocess the character tokens in the pending
                // table character tokens list using the rules given in the
                // "anything else" entry in the "in table" insertion mode."
                if pending.iter().any(|&c| !is_ascii_whitespace(c)) {
                    self.parse_error("foster-parenting-character");
                    for c in pending {
                        self.process_with_foster_parenting(&Token::Character { data: c });
                    }
                } else {
                    // "Otherwise, insert the characters given by the pending table
                    // character tokens list."
                    for c in pending {
                        self.insert_character(c);
                    }
                }

                // "Switch the insertion mode to the original insertion mode and
                // reprocess the token."
                self.insertion_mode = self
                    .original_insertion_mode
                    .take()
                    .unwrap_or(InsertionMode::InTable);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(crate) fn handle_in_caption_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption();
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            // "If the stack of open elements does not have a caption element in
            // table scope, this is a parse error; ignore the token. (fragment case)"
            // "Otherwise: ... Reprocess the token."
            _ if token.is_start_tag_named(&[
                "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
            ]) || token.is_end_tag_named(&["table"]) =>
            {
                if self.close_caption() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body"
                        | "col"
                        | "colgroup"
                        | "html"
                        | "tbody"
                        | "td"
                        | "tfoot"
                        | "th"
                        | "thead"
                        | "tr"
                ) =>
            {
                self.parse_error("unexpected-end-tag-in-caption");
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }

    /// Close the caption element, returning whether there was one to close.
    ///
    /// "Generate implied end tags. Now, if the current node is not a caption
    /// element, then this is a parse error. Pop elements from this stack until
    /// a caption element has been popped from the stack. Clear the list of
    /// active formatting elements up to the last marker. Switch the insertion
    /// mode to "in table"."
    fn close_caption(&mut self) -> bool {
        if !self.open_elements.has_in_table_scope(&self.tree, "caption") {
            self.parse_error("unexpected-end-tag-caption");
            return false;
        }
        self.generate_implied_end_tags();
        if !self.current_node_is("caption") {
            self.parse_error("end-tag-without-matching-open-element");
        }
        self.pop_until_tag("caption");
        self.active_formatting_elements.clear_to_last_marker();
        self.insertion_mode = InsertionMode::InTable;
        true
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolgroup)
    pub(crate) fn handle_in_column_group_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if is_whitespace_token(token) => {
                self.insert_character(*data);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => self.insert_comment(data),

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => self.parse_error("unexpected-doctype"),

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.process_using_rules_for(InsertionMode::InBody, token);
            }

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the current
            // node off the stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token);
                let _ = self.open_elements.pop();
                self.acknowledge_self_closing_flag();
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a parse
            // error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements.
            // Switch the insertion mode to "in table"."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if !self.current_node_is("colgroup") {
                    self.parse_error("unexpected-end-tag-colgroup");
                    return;
                }
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if name == "col" => {
                self.parse_error("unexpected-end-tag-col");
            }

            // "A start tag whose tag name is "template""
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            _ if token.is_start_tag_named(&["template"]) || token.is_end_tag_named(&["template"]) => {
                self.process_using_rules_for(InsertionMode::InHead, token);
            }

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.process_using_rules_for(InsertionMode::InBody, token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a parse
            // error; ignore the token."
            // "Otherwise, pop the current node from the stack of open elements."
            // "Switch the insertion mode to "in table"."
            // "Reprocess the token."
            _ => {
                if !self.current_node_is("colgroup") {
                    self.parse_error("unexpected-token-in-column-group");
                    return;
                }
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intbody)
    pub(crate) fn handle_in_table_body_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is "tr""
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for the token, then switch the insertion mode
            // to "in row"."
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "th", "td""
            // "Parse error."
            // "Clear the stack back to a table body context."
            // "Insert an HTML element for a "tr" start tag token with no
            // attributes, then switch the insertion mode to "in row"."
            // "Reprocess the current token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_error("unexpected-cell-in-table-body");
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element_named("tr");
                self.insertion_mode = InsertionMode::InRow;
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                // "If the stack of open elements does not have an element in table
                // scope that is an HTML element with the same tag name as the
                // token, this is a parse error; ignore the token."
                if !self.open_elements.has_in_table_scope(&self.tree, name) {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                // "Otherwise: Clear the stack back to a table body context. Pop the
                // current node from the stack of open elements. Switch the
                // insertion mode to "in table"."
                self.clear_stack_back_to_table_body_context();
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "tfoot", "thead""
            // "An end tag whose tag name is "table""
            _ if token.is_start_tag_named(&[
                "caption", "col", "colgroup", "tbody", "tfoot", "thead",
            ]) || token.is_end_tag_named(&["table"]) =>
            {
                // "If the stack of open elements does not have a tbody, thead, or
                // tfoot element in table scope, this is a parse error; ignore the
                // token."
                if !self
                    .open_elements
                    .has_any_in_scope_of(&self.tree, Scope::Table, TABLE_SECTIONS)
                {
                    self.parse_error("unexpected-token-in-table-body");
                    return;
                }
                // "Otherwise: Clear the stack back to a table body context. Pop the
                // current node from the stack of open elements. Switch the
                // insertion mode to "in table". Reprocess the token."
                self.clear_stack_back_to_table_body_context();
                let _ = self.open_elements.pop();
                self.insertion_mode = InsertionMode::InTable;
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_error("unexpected-end-tag-in-table-body");
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intr)
    pub(crate) fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            // "A start tag whose tag name is one of: "th", "td""
            // "Clear the stack back to a table row context."
            // "Insert an HTML element for the token, then switch the insertion mode
            // to "in cell"."
            // "Insert a marker at the end of the list of active formatting elements."
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCell;
                self.active_formatting_elements.push_marker();
            }

            // "An end tag whose tag name is "tr""
            Token::EndTag { name, .. } if name == "tr" => {
                let _ = self.close_row();
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "tfoot", "thead", "tr""
            // "An end tag whose tag name is "table""
            _ if token.is_start_tag_named(&[
                "caption", "col", "colgroup", "tbody", "tfoot", "thead", "tr",
            ]) || token.is_end_tag_named(&["table"]) =>
            {
                if self.close_row() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
            Token::EndTag { name, .. } if TABLE_SECTIONS.contains(&name.as_str()) => {
                // "If the stack of open elements does not have an element in table
                // scope that is an HTML element with the same tag name as the
                // token, this is a parse error; ignore the token."
                if !self.open_elements.has_in_table_scope(&self.tree, name) {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                // "If the stack of open elements does not have a tr element in
                // table scope, ignore the token."
                if !self.open_elements.has_in_table_scope(&self.tree, "tr") {
                    return;
                }
                // "Otherwise: Clear the stack back to a table row context. Pop the
                // current node (which will be a tr element) from the stack of open
                // elements. Switch the insertion mode to "in table body".
                // Reprocess the token."
                if self.close_row() {
                    self.reprocess_token(token);
                }
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html", "td", "th""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th"
                ) =>
            {
                self.parse_error("unexpected-end-tag-in-row");
            }

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InTable, token),
        }
    }

    /// Close the current row, returning whether there was one to close.
    ///
    /// "If the stack of open elements does not have a tr element in table
    /// scope, this is a parse error; ignore the token. Otherwise: Clear the
    /// stack back to a table row context. Pop the current node (which will be
    /// a tr element) from the stack of open elements. Switch the insertion
    /// mode to "in table body"."
    fn close_row(&mut self) -> bool {
        if !self.open_elements.has_in_table_scope(&self.tree, "tr") {
            self.parse_error("unexpected-end-tag-tr");
            return false;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.open_elements.pop();
        self.insertion_mode = InsertionMode::InTableBody;
        true
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intd)
    pub(crate) fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                // "If the stack of open elements does not have an element in table
                // scope that is an HTML element with the same tag name as that of
                // the token, then this is a parse error; ignore the token."
                if !self.open_elements.has_in_table_scope(&self.tree, name) {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                // "Otherwise: Generate implied end tags."
                self.generate_implied_end_tags();
                // "Now, if the current node is not an HTML element with the same
                // tag name as the token, then this is a parse error."
                if !self.current_node_is(name) {
                    self.parse_error("end-tag-without-matching-open-element");
                }
                // "Pop elements from the stack of open elements stack until an
                // HTML element with the same tag name as the token has been popped
                // from the stack."
                self.pop_until_tag(name);
                // "Clear the list of active formatting elements up to the last marker."
                self.active_formatting_elements.clear_to_last_marker();
                // "Switch the insertion mode to "in row"."
                self.insertion_mode = InsertionMode::InRow;
            }

            // "A start tag whose tag name is one of: "caption", "col", "colgroup",
            // "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in table
            // scope."
            // "Close the cell (see below) and reprocess the token."
            _ if token.is_start_tag_named(&[
                "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
            ]) =>
            {
                if !self
                    .open_elements
                    .has_any_in_scope_of(&self.tree, Scope::Table, &["td", "th"])
                {
                    self.parse_error("unexpected-start-tag-in-cell");
                    return;
                }
                self.close_the_cell();
                self.reprocess_token(token);
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.parse_error("unexpected-end-tag-in-cell");
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of the
            // token, then this is a parse error; ignore the token."
            // "Otherwise, close the cell (see below) and reprocess the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.open_elements.has_in_table_scope(&self.tree, name) {
                    self.parse_error("end-tag-without-matching-open-element");
                    return;
                }
                self.close_the_cell();
                self.reprocess_token(token);
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.process_using_rules_for(InsertionMode::InBody, token),
        }
    }
}
